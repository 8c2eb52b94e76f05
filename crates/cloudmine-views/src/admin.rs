use std::fmt;
use std::str::FromStr;

use cloudmine_core::config::{AppConfig, ConfigPatch};
use cloudmine_core::task::{Task, TaskKind, TaskPatch};
use cloudmine_core::types::{Amount, TaskId, UserId, WithdrawalId};
use cloudmine_core::user::User;
use cloudmine_core::withdrawal::{Withdrawal, WithdrawalStatus};
use cloudmine_state::AppContext;
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Finance,
    Tasks,
    Withdrawals,
    Users,
}

impl fmt::Display for AdminTab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdminTab::Finance => "finance",
            AdminTab::Tasks => "tasks",
            AdminTab::Withdrawals => "withdrawals",
            AdminTab::Users => "users",
        })
    }
}

impl FromStr for AdminTab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "finance" => Ok(AdminTab::Finance),
            "tasks" => Ok(AdminTab::Tasks),
            "withdrawals" => Ok(AdminTab::Withdrawals),
            "users" => Ok(AdminTab::Users),
            other => Err(format!("unknown tab: {other}")),
        }
    }
}

/// The "add task" form.
#[derive(Clone, Debug)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub kind: TaskKind,
    pub reward: Amount,
    pub url: Option<String>,
    pub channel_id: Option<String>,
}

/// The hidden moderation overlay. Access control is the unlock gesture
/// alone; nothing here checks who is calling.
pub struct AdminPanel {
    ctx: AppContext,
    tab: AdminTab,
}

impl AdminPanel {
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            tab: AdminTab::default(),
        }
    }

    pub fn tab(&self) -> AdminTab {
        self.tab
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        self.tab = tab;
    }

    // ── Finance ──────────────────────────────────────────────────────────────

    pub fn finance(&self) -> AppConfig {
        self.ctx.config()
    }

    /// Merge and publish; the mining timer picks up a new rate at once.
    pub async fn save_config(&self, patch: &ConfigPatch) -> AppConfig {
        self.ctx.update_config(patch).await
    }

    // ── Tasks ────────────────────────────────────────────────────────────────

    pub async fn tasks(&self) -> Vec<Task> {
        self.ctx.store().await.tasks().to_vec()
    }

    /// Add a task unless title or description is blank.
    pub async fn create_task(&self, new: NewTask) -> Option<TaskId> {
        if new.title.trim().is_empty() || new.description.trim().is_empty() {
            debug!("create_task: blank title or description ignored");
            return None;
        }
        let mut store = self.ctx.store().await;
        let id = store.allocate_task_id();
        store.add_task(Task {
            id: id.clone(),
            title: new.title,
            description: new.description,
            kind: new.kind,
            reward: new.reward,
            completed: false,
            url: new.url,
            channel_id: new.channel_id,
        });
        Some(id)
    }

    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) {
        self.ctx.store().await.update_task(id, patch);
    }

    pub async fn remove_task(&self, id: &TaskId) {
        self.ctx.store().await.remove_task(id);
    }

    // ── Withdrawals ──────────────────────────────────────────────────────────

    pub async fn withdrawals(&self) -> Vec<Withdrawal> {
        self.ctx.store().await.withdrawals().to_vec()
    }

    pub async fn set_withdrawal_status(&self, id: WithdrawalId, status: WithdrawalStatus) {
        self.ctx.store().await.update_withdrawal_status(id, status);
    }

    // ── Users ────────────────────────────────────────────────────────────────

    pub async fn users(&self) -> Vec<User> {
        self.ctx.store().await.users().to_vec()
    }

    pub async fn set_user_balance(&self, id: &UserId, balance: Amount) {
        self.ctx.store().await.set_user_balance(id, balance);
    }

    pub async fn reset_user_balance(&self, id: &UserId) {
        self.ctx.store().await.reset_user_balance(id);
    }

    pub async fn add_user_balance(&self, id: &UserId, amount: Amount) {
        self.ctx.store().await.add_user_balance(id, amount);
    }

    /// Block an active user or unblock a blocked one. Returns the new
    /// blocked state, or `None` for an unknown id.
    pub async fn toggle_block(&self, id: &UserId) -> Option<bool> {
        let mut store = self.ctx.store().await;
        let blocked = store.user(id)?.is_blocked;
        if blocked {
            store.unblock_user(id);
        } else {
            store.block_user(id);
        }
        info!(user = %id, blocked = !blocked, "block state toggled");
        Some(!blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmine_state::{SlotDb, Store};

    fn panel() -> (AppContext, AdminPanel) {
        let ctx = AppContext::new(Store::default(), SlotDb::temporary().unwrap());
        (ctx.clone(), AdminPanel::new(ctx))
    }

    fn new_task(title: &str, description: &str) -> NewTask {
        NewTask {
            title: title.into(),
            description: description.into(),
            kind: TaskKind::WatchAd,
            reward: Amount::from_units(3),
            url: None,
            channel_id: None,
        }
    }

    #[tokio::test]
    async fn save_config_changes_only_given_fields() {
        let (ctx, admin) = panel();
        let before = admin.finance();
        let after = admin
            .save_config(&ConfigPatch {
                min_withdrawal: Some(Amount::from_units(1)),
                ..Default::default()
            })
            .await;
        assert_eq!(after.min_withdrawal, Amount::from_units(1));
        assert_eq!(after.mining_amount, before.mining_amount);
        assert_eq!(after.daily_bonus, before.daily_bonus);
        assert_eq!(ctx.config(), after);
    }

    #[tokio::test]
    async fn create_task_requires_title_and_description() {
        let (_ctx, admin) = panel();
        assert!(admin.create_task(new_task("", "desc")).await.is_none());
        assert!(admin.create_task(new_task("title", "  ")).await.is_none());

        let id = admin.create_task(new_task("Watch", "A short clip")).await.unwrap();
        assert_eq!(id, TaskId::new("3"));
        let tasks = admin.tasks().await;
        assert_eq!(tasks.len(), 3);
        assert!(!tasks[2].completed);

        admin.remove_task(&id).await;
        assert_eq!(admin.tasks().await.len(), 2);
    }

    #[tokio::test]
    async fn update_task_patches_one_field() {
        let (_ctx, admin) = panel();
        let id = TaskId::new("2");
        admin
            .update_task(
                &id,
                &TaskPatch {
                    reward: Some(Amount::from_units(9)),
                    ..Default::default()
                },
            )
            .await;
        let tasks = admin.tasks().await;
        let task = tasks.iter().find(|t| t.id == id).unwrap();
        assert_eq!(task.reward, Amount::from_units(9));
        assert_eq!(task.title, "Join Our Telegram Channel");
        assert_eq!(task.channel_id.as_deref(), Some("@mining_updates"));
    }

    #[tokio::test]
    async fn toggle_block_flips_state() {
        let (_ctx, admin) = panel();
        let me = UserId::new("1");
        assert_eq!(admin.toggle_block(&me).await, Some(true));
        assert_eq!(admin.toggle_block(&me).await, Some(false));
        assert_eq!(admin.toggle_block(&UserId::new("nobody")).await, None);
    }

    #[tokio::test]
    async fn balance_override_reaches_current_user() {
        let (ctx, admin) = panel();
        let me = UserId::new("1");
        admin.set_user_balance(&me, Amount::from_units(500)).await;
        assert_eq!(ctx.store().await.balance(), Amount::from_units(500));
        admin.add_user_balance(&me, Amount::from_units(5)).await;
        assert_eq!(admin.users().await[0].balance, Amount::from_units(505));
        admin.reset_user_balance(&me).await;
        assert_eq!(ctx.store().await.balance(), Amount::ZERO);
    }

    #[test]
    fn tabs_parse() {
        assert_eq!("users".parse::<AdminTab>().unwrap(), AdminTab::Users);
        assert!("billing".parse::<AdminTab>().is_err());
    }
}
