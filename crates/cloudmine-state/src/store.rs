use chrono::{DateTime, Utc};
use cloudmine_core::config::{AppConfig, ConfigPatch};
use cloudmine_core::task::{default_tasks, Task, TaskPatch};
use cloudmine_core::types::{Amount, TaskId, UserId, WithdrawalId};
use cloudmine_core::user::{User, UserPatch};
use cloudmine_core::withdrawal::{Withdrawal, WithdrawalStatus};
use tracing::{debug, info};

/// Point-in-time copy of everything a view might display.
#[derive(Clone, Debug)]
pub struct StoreSnapshot {
    pub current_user: User,
    pub users: Vec<User>,
    pub tasks: Vec<Task>,
    pub referrals: Vec<User>,
    pub withdrawals: Vec<Withdrawal>,
    pub config: AppConfig,
}

// ── Store ─────────────────────────────────────────────────────────────────────

/// The shared in-memory state.
///
/// The current user is an entry of `users`, addressed by index; users are
/// never removed, so the index stays valid and there is exactly one record
/// per id. The current user's `balance` is the only balance: mining, tasks,
/// the daily bonus and referral credit all add to it.
///
/// Mutators addressed by id silently ignore unknown ids.
pub struct Store {
    users: Vec<User>,
    current: usize,
    tasks: Vec<Task>,
    referrals: Vec<User>,
    withdrawals: Vec<Withdrawal>,
    config: AppConfig,
    next_withdrawal_id: u64,
    next_task_seq: u64,
}

impl Store {
    pub fn new(current_user: UserId, config: AppConfig) -> Self {
        let tasks = default_tasks();
        let next_task_seq = tasks.len() as u64 + 1;
        Self {
            users: vec![User::new(current_user)],
            current: 0,
            tasks,
            referrals: Vec::new(),
            withdrawals: Vec::new(),
            config,
            next_withdrawal_id: 1,
            next_task_seq,
        }
    }

    // ── Reads ────────────────────────────────────────────────────────────────

    pub fn current_user(&self) -> &User {
        &self.users[self.current]
    }

    pub fn balance(&self) -> Amount {
        self.current_user().balance
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn user(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn referrals(&self) -> &[User] {
        &self.referrals
    }

    pub fn withdrawals(&self) -> &[Withdrawal] {
        &self.withdrawals
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            current_user: self.current_user().clone(),
            users: self.users.clone(),
            tasks: self.tasks.clone(),
            referrals: self.referrals.clone(),
            withdrawals: self.withdrawals.clone(),
            config: self.config.clone(),
        }
    }

    // ── Balance credits ──────────────────────────────────────────────────────

    fn current_user_mut(&mut self) -> &mut User {
        &mut self.users[self.current]
    }

    fn user_mut(&mut self, id: &UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| &u.id == id)
    }

    /// One mining tick: credit `rate` and record it as the user's rate.
    pub fn accrue_mining(&mut self, rate: Amount) -> Amount {
        let user = self.current_user_mut();
        user.balance += rate;
        user.mining_rate = rate;
        user.balance
    }

    pub fn credit_daily_bonus(&mut self, amount: Amount) -> Amount {
        let user = self.current_user_mut();
        user.balance += amount;
        info!(user = %user.id, bonus = %amount, "daily bonus credited");
        user.balance
    }

    // ── Tasks ────────────────────────────────────────────────────────────────

    /// Mark a task done and credit its reward. Returns the credited reward,
    /// or `None` when the task is unknown or was already completed.
    pub fn complete_task(&mut self, task_id: &TaskId) -> Option<Amount> {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == task_id) else {
            debug!(task = %task_id, "complete_task: unknown task ignored");
            return None;
        };
        if task.completed {
            debug!(task = %task_id, "complete_task: already completed");
            return None;
        }
        task.completed = true;
        let reward = task.reward;
        self.current_user_mut().balance += reward;
        info!(task = %task_id, reward = %reward, "task completed");
        Some(reward)
    }

    /// Allocate an id no existing task uses.
    pub fn allocate_task_id(&mut self) -> TaskId {
        loop {
            let id = TaskId::new(self.next_task_seq.to_string());
            self.next_task_seq += 1;
            if self.task(&id).is_none() {
                return id;
            }
        }
    }

    pub fn add_task(&mut self, task: Task) {
        info!(task = %task.id, kind = %task.kind, reward = %task.reward, "task added");
        self.tasks.push(task);
    }

    pub fn update_task(&mut self, task_id: &TaskId, patch: &TaskPatch) {
        match self.tasks.iter_mut().find(|t| &t.id == task_id) {
            Some(task) => {
                task.apply(patch);
                debug!(task = %task_id, "task updated");
            }
            None => debug!(task = %task_id, "update_task: unknown task ignored"),
        }
    }

    pub fn remove_task(&mut self, task_id: &TaskId) {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != task_id);
        if self.tasks.len() < before {
            info!(task = %task_id, "task removed");
        }
    }

    // ── Referrals ────────────────────────────────────────────────────────────

    /// Record a referred user and credit the current user with
    /// `referral_profit`% of their balance.
    pub fn add_referral(&mut self, referred: User) -> Amount {
        let bonus = referred.balance.percent(self.config.referral_profit);
        let referred_id = referred.id.clone();
        self.referrals.push(referred);

        let user = self.current_user_mut();
        user.balance += bonus;
        user.referral_earnings += bonus;
        user.referral_count += 1;
        info!(referred = %referred_id, bonus = %bonus, "referral added");
        bonus
    }

    // ── Withdrawals ──────────────────────────────────────────────────────────

    /// Append a pending request. The balance is not reduced; only the
    /// cumulative `total_withdrawn` counter grows.
    pub fn create_withdrawal(
        &mut self,
        address: String,
        amount: Amount,
        now: DateTime<Utc>,
    ) -> WithdrawalId {
        let id = WithdrawalId(self.next_withdrawal_id);
        self.next_withdrawal_id += 1;

        let user = self.current_user_mut();
        user.total_withdrawn += amount;
        let user_id = user.id.clone();

        self.withdrawals.push(Withdrawal {
            id,
            user_id,
            address,
            amount,
            status: WithdrawalStatus::Pending,
            created_at: now,
        });
        info!(withdrawal = %id, amount = %amount, "withdrawal requested");
        id
    }

    pub fn update_withdrawal_status(&mut self, id: WithdrawalId, status: WithdrawalStatus) {
        match self.withdrawals.iter_mut().find(|w| w.id == id) {
            Some(w) => {
                info!(withdrawal = %id, from = %w.status, to = %status, "withdrawal status set");
                w.status = status;
            }
            None => debug!(withdrawal = %id, "status update: unknown withdrawal ignored"),
        }
    }

    // ── Config ───────────────────────────────────────────────────────────────

    /// Merge `patch` into the live config. Crate-private so that every
    /// change goes through `AppContext`, which also publishes it.
    pub(crate) fn update_config(&mut self, patch: &ConfigPatch) -> &AppConfig {
        self.config.apply(patch);
        info!(
            mining_amount = %self.config.mining_amount,
            daily_bonus = %self.config.daily_bonus,
            min_withdrawal = %self.config.min_withdrawal,
            referral_profit = self.config.referral_profit,
            "config updated"
        );
        &self.config
    }

    // ── User management ──────────────────────────────────────────────────────

    pub fn update_user(&mut self, id: &UserId, patch: &UserPatch) {
        match self.user_mut(id) {
            Some(user) => {
                user.apply(patch);
                info!(user = %id, "user updated");
            }
            None => debug!(user = %id, "update_user: unknown user ignored"),
        }
    }

    pub fn set_user_balance(&mut self, id: &UserId, balance: Amount) {
        self.update_user(
            id,
            &UserPatch {
                balance: Some(balance),
                ..Default::default()
            },
        );
    }

    /// Zero both the balance and the recorded mining rate.
    pub fn reset_user_balance(&mut self, id: &UserId) {
        self.update_user(
            id,
            &UserPatch {
                balance: Some(Amount::ZERO),
                mining_rate: Some(Amount::ZERO),
                ..Default::default()
            },
        );
    }

    pub fn add_user_balance(&mut self, id: &UserId, amount: Amount) {
        match self.user_mut(id) {
            Some(user) => {
                user.balance += amount;
                info!(user = %id, amount = %amount, "balance added");
            }
            None => debug!(user = %id, "add_user_balance: unknown user ignored"),
        }
    }

    pub fn block_user(&mut self, id: &UserId) {
        self.set_blocked(id, true);
    }

    pub fn unblock_user(&mut self, id: &UserId) {
        self.set_blocked(id, false);
    }

    fn set_blocked(&mut self, id: &UserId, blocked: bool) {
        self.update_user(
            id,
            &UserPatch {
                is_blocked: Some(blocked),
                ..Default::default()
            },
        );
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(
            UserId::new(cloudmine_core::constants::DEFAULT_USER_ID),
            AppConfig::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmine_core::task::TaskKind;

    fn units(n: u128) -> Amount {
        Amount::from_units(n)
    }

    fn referred(id: &str, balance: Amount) -> User {
        let mut u = User::new(UserId::new(id));
        u.balance = balance;
        u
    }

    // ── Tasks ─────────────────────────────────────────────────────────────────

    #[test]
    fn task_reward_credited_once() {
        let mut store = Store::default();
        let id = TaskId::new("2");
        assert_eq!(store.complete_task(&id), Some(units(2)));
        assert_eq!(store.complete_task(&id), None);
        assert_eq!(store.balance(), units(2));
        assert!(store.task(&id).unwrap().completed);
    }

    #[test]
    fn unknown_task_is_a_no_op() {
        let mut store = Store::default();
        let before = store.snapshot();
        assert_eq!(store.complete_task(&TaskId::new("404")), None);
        assert_eq!(store.balance(), before.current_user.balance);
        assert_eq!(store.tasks(), before.tasks.as_slice());
    }

    #[test]
    fn allocated_task_ids_skip_existing() {
        let mut store = Store::default();
        store.add_task(Task {
            id: TaskId::new("3"),
            title: "Visit".into(),
            description: "Visit the site".into(),
            kind: TaskKind::VisitLink,
            reward: units(4),
            completed: false,
            url: Some("https://example.com".into()),
            channel_id: None,
        });
        let id = store.allocate_task_id();
        assert_eq!(id, TaskId::new("4"));
    }

    #[test]
    fn update_and_remove_task() {
        let mut store = Store::default();
        let id = TaskId::new("1");
        store.update_task(
            &id,
            &TaskPatch {
                reward: Some(units(9)),
                ..Default::default()
            },
        );
        assert_eq!(store.task(&id).unwrap().reward, units(9));
        assert_eq!(store.task(&id).unwrap().title, "Watch AdsGram Video");

        store.remove_task(&id);
        assert!(store.task(&id).is_none());
        assert_eq!(store.tasks().len(), 1);
        store.remove_task(&id);
        assert_eq!(store.tasks().len(), 1);
    }

    // ── Mining / bonus ────────────────────────────────────────────────────────

    #[test]
    fn mining_accrues_on_the_single_balance() {
        let mut store = Store::default();
        for _ in 0..5 {
            store.accrue_mining(units(1));
        }
        assert_eq!(store.balance().to_string(), "0.00000005");
        assert_eq!(store.current_user().mining_rate, units(1));
        assert_eq!(store.user(&UserId::new("1")).unwrap().balance, units(5));
    }

    // ── Referrals ─────────────────────────────────────────────────────────────

    #[test]
    fn referral_credits_profit_share() {
        let mut store = Store::default();
        let bonus = store.add_referral(referred("2", "1".parse().unwrap()));
        assert_eq!(bonus, "0.1".parse::<Amount>().unwrap());
        let me = store.current_user();
        assert_eq!(me.balance, bonus);
        assert_eq!(me.referral_earnings, bonus);
        assert_eq!(me.referral_count, 1);
        assert_eq!(store.referrals().len(), 1);
    }

    // ── Withdrawals ───────────────────────────────────────────────────────────

    #[test]
    fn withdrawal_is_pending_and_does_not_debit() {
        let mut store = Store::default();
        store.add_user_balance(&UserId::new("1"), units(50_000));
        let id = store.create_withdrawal("bc1qxyz".into(), units(10_000), Utc::now());

        assert_eq!(store.withdrawals().len(), 1);
        let w = &store.withdrawals()[0];
        assert_eq!(w.id, id);
        assert_eq!(w.status, WithdrawalStatus::Pending);
        assert_eq!(w.user_id, UserId::new("1"));
        assert_eq!(store.balance(), units(50_000));
        assert_eq!(store.current_user().total_withdrawn, units(10_000));
    }

    #[test]
    fn duplicate_requests_get_distinct_ids() {
        let mut store = Store::default();
        let now = Utc::now();
        let a = store.create_withdrawal("addr".into(), units(1), now);
        let b = store.create_withdrawal("addr".into(), units(1), now);
        assert_ne!(a, b);
        assert_eq!(store.withdrawals().len(), 2);
    }

    #[test]
    fn status_moves_in_any_direction() {
        let mut store = Store::default();
        let id = store.create_withdrawal("addr".into(), units(1), Utc::now());
        store.update_withdrawal_status(id, WithdrawalStatus::Paid);
        assert_eq!(store.withdrawals()[0].status, WithdrawalStatus::Paid);
        store.update_withdrawal_status(id, WithdrawalStatus::Pending);
        assert_eq!(store.withdrawals()[0].status, WithdrawalStatus::Pending);

        store.update_withdrawal_status(WithdrawalId(999), WithdrawalStatus::Paid);
        assert_eq!(store.withdrawals()[0].status, WithdrawalStatus::Pending);
    }

    // ── Config ────────────────────────────────────────────────────────────────

    #[test]
    fn config_update_is_partial() {
        let mut store = Store::default();
        store.update_config(&ConfigPatch {
            referral_profit: Some(50),
            ..Default::default()
        });
        assert_eq!(store.config().referral_profit, 50);
        assert_eq!(store.config().mining_amount, AppConfig::default().mining_amount);
    }

    // ── User management ───────────────────────────────────────────────────────

    #[test]
    fn admin_edits_reach_the_current_user() {
        let mut store = Store::default();
        let me = UserId::new("1");
        store.accrue_mining(units(7));

        store.set_user_balance(&me, units(100));
        assert_eq!(store.balance(), units(100));

        store.add_user_balance(&me, units(5));
        assert_eq!(store.balance(), units(105));

        store.reset_user_balance(&me);
        assert_eq!(store.balance(), Amount::ZERO);
        assert_eq!(store.current_user().mining_rate, Amount::ZERO);

        store.block_user(&me);
        assert!(store.current_user().is_blocked);
        store.unblock_user(&me);
        assert!(!store.current_user().is_blocked);
    }

    #[test]
    fn unknown_user_edits_are_ignored() {
        let mut store = Store::default();
        let ghost = UserId::new("ghost");
        store.add_user_balance(&ghost, units(5));
        store.block_user(&ghost);
        assert_eq!(store.users().len(), 1);
        assert_eq!(store.balance(), Amount::ZERO);
        assert!(!store.current_user().is_blocked);
    }
}
