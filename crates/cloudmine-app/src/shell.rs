use std::time::Instant;

use chrono::{NaiveDate, Utc};
use cloudmine_core::error::CloudmineError;
use cloudmine_core::user::User;
use cloudmine_state::AppContext;
use cloudmine_views::{
    bonus::local_today, AdminGate, AdminPanel, AdminTab, DailyBonus, MiningView, ReferralView,
    TaskView, WithdrawForm,
};
use tracing::{info, warn};

use crate::command::{AdminCommand, Command, ADMIN_HELP, HELP};

pub enum Outcome {
    /// Lines to print before the next prompt.
    Continue(Vec<String>),
    Quit,
}

/// The mounted app: every screen at once, driven by text commands.
///
/// Each input line counts as one tap for the secret gesture, whatever the
/// line says.
pub struct Shell {
    ctx: AppContext,
    mining: MiningView,
    bonus: DailyBonus,
    tasks: TaskView,
    referrals: ReferralView,
    withdraw: WithdrawForm,
    admin: AdminPanel,
    gate: AdminGate,
}

impl Shell {
    /// Mount every view. Starts the mining timer, so this needs a runtime.
    pub fn new(ctx: AppContext, unlock_taps: u32) -> Result<Self, CloudmineError> {
        Ok(Self {
            mining: MiningView::mount(ctx.clone()),
            bonus: DailyBonus::mount(ctx.clone())?,
            tasks: TaskView::new(ctx.clone()),
            referrals: ReferralView::new(ctx.clone()),
            withdraw: WithdrawForm::new(ctx.clone()),
            admin: AdminPanel::new(ctx.clone()),
            gate: AdminGate::new(unlock_taps),
            ctx,
        })
    }

    pub fn admin_open(&self) -> bool {
        self.gate.is_open()
    }

    pub async fn handle(&mut self, line: &str, at: Instant) -> Outcome {
        self.handle_on(line, at, local_today()).await
    }

    /// Like `handle`, with the calendar day supplied by the caller.
    pub async fn handle_on(&mut self, line: &str, at: Instant, today: NaiveDate) -> Outcome {
        let mut out = Vec::new();
        if self.gate.click(at) {
            out.push(format!("admin panel opened ({} tab)", self.admin.tab()));
            out.push(ADMIN_HELP.to_string());
        }

        let cmd = match line.parse::<Command>() {
            Ok(Command::Admin(_)) if !self.gate.is_open() => {
                out.push("unknown command: admin (try `help`)".to_string());
                return Outcome::Continue(out);
            }
            Ok(cmd) => cmd,
            Err(e) => {
                out.push(e);
                return Outcome::Continue(out);
            }
        };

        match cmd {
            Command::Quit => return Outcome::Quit,
            Command::Help => out.push(HELP.to_string()),
            Command::Tap => {}
            Command::Balance => out.extend(self.mining_screen(today).await),
            Command::Bonus => match self.bonus.claim(today, Utc::now()).await {
                Ok(Some(amount)) => out.push(format!("bonus claimed: +{amount}")),
                Ok(None) => out.push("bonus already claimed today".to_string()),
                Err(e) => {
                    warn!(error = %e, "bonus claim failed");
                    out.push(format!("error: {e}"));
                }
            },
            Command::Tasks => {
                for t in self.tasks.list().await {
                    let mark = if t.completed { "x" } else { " " };
                    out.push(format!(
                        "[{mark}] {:>3}  {:<28} +{}  {}",
                        t.id,
                        t.title,
                        t.reward.trimmed(),
                        t.kind.label()
                    ));
                }
            }
            Command::Open(id) => match self.tasks.open(&id).await {
                Some(url) => out.push(url),
                None => out.push(format!("task {id}: nothing to open")),
            },
            Command::Complete(id) => match self.tasks.complete(&id).await {
                Some(reward) => out.push(format!("task {id} completed: +{reward}")),
                None => out.push(format!("task {id}: unknown or already completed")),
            },
            Command::Referrals => {
                out.push(format!("link:  {}", self.referrals.link().await));
                out.push(format!("share: {}", self.referrals.share_url().await));
                let summary = self.referrals.summary().await;
                out.push(format!(
                    "{} referrals, {}% profit, earned {}",
                    summary.count, summary.profit_percent, summary.total_earnings
                ));
                for row in summary.rows {
                    out.push(format!(
                        "  {}  rate {}  earned {}",
                        row.user_id, row.mining_rate, row.earnings
                    ));
                }
            }
            Command::Refer { user, balance } => {
                let mut referred = User::new(user);
                referred.balance = balance;
                let credited = self.referrals.refer(referred).await;
                out.push(format!("referral added: +{credited}"));
            }
            Command::Withdraw { address, amount } => {
                match self.withdraw.submit(&address, &amount).await {
                    Ok(id) => out.push(format!("withdrawal {id} submitted")),
                    Err(e) => out.push(e.to_string()),
                }
            }
            Command::History => {
                let history = self.withdraw.history().await;
                if history.is_empty() {
                    out.push("no withdrawals".to_string());
                }
                for w in history {
                    out.push(format!(
                        "{}  {}  {}  {}  {}",
                        w.id,
                        w.created_at.format("%Y-%m-%d %H:%M"),
                        w.amount,
                        w.address,
                        w.status
                    ));
                }
            }
            Command::Admin(admin) => out.extend(self.admin_command(admin).await),
        }
        Outcome::Continue(out)
    }

    async fn mining_screen(&self, today: NaiveDate) -> Vec<String> {
        let mut out = vec![
            format!("balance: {}", self.mining.balance().await),
            format!("rate:    {}/s", self.mining.rate()),
        ];
        if self.bonus.is_available(today) {
            out.push(format!("daily bonus available: +{}", self.bonus.amount()));
        } else {
            out.push("daily bonus claimed".to_string());
        }
        out
    }

    async fn admin_command(&mut self, cmd: AdminCommand) -> Vec<String> {
        match cmd {
            AdminCommand::Show(tab) => {
                if let Some(tab) = tab {
                    self.admin.select_tab(tab);
                }
                self.render_tab().await
            }
            AdminCommand::Set(patch) => {
                let config = self.admin.save_config(&patch).await;
                vec![format!(
                    "settings saved: mining {} daily {} min {} referral {}%",
                    config.mining_amount,
                    config.daily_bonus,
                    config.min_withdrawal,
                    config.referral_profit
                )]
            }
            AdminCommand::AddTask(new) => match self.admin.create_task(new).await {
                Some(id) => vec![format!("task {id} added")],
                None => vec!["title and description are required".to_string()],
            },
            AdminCommand::EditTask(id, patch) => {
                self.admin.update_task(&id, &patch).await;
                vec![format!("task {id} updated")]
            }
            AdminCommand::RemoveTask(id) => {
                self.admin.remove_task(&id).await;
                vec![format!("task {id} removed")]
            }
            AdminCommand::Status(id, status) => {
                self.admin.set_withdrawal_status(id, status).await;
                vec![format!("withdrawal {id}: {status}")]
            }
            AdminCommand::SetBalance(user, amount) => {
                self.admin.set_user_balance(&user, amount).await;
                vec![format!("user {user}: balance set to {amount}")]
            }
            AdminCommand::Credit(user, amount) => {
                self.admin.add_user_balance(&user, amount).await;
                vec![format!("user {user}: credited {amount}")]
            }
            AdminCommand::Reset(user) => {
                self.admin.reset_user_balance(&user).await;
                vec![format!("user {user}: balance and rate reset")]
            }
            AdminCommand::ToggleBlock(user) => match self.admin.toggle_block(&user).await {
                Some(true) => vec![format!("user {user} blocked")],
                Some(false) => vec![format!("user {user} unblocked")],
                None => vec![format!("user {user}: not found")],
            },
            AdminCommand::Close => {
                self.gate.close();
                vec!["admin panel closed".to_string()]
            }
        }
    }

    async fn render_tab(&self) -> Vec<String> {
        let mut out = vec![format!("── {} ──", self.admin.tab())];
        match self.admin.tab() {
            AdminTab::Finance => {
                let config = self.admin.finance();
                match serde_json::to_string_pretty(&config) {
                    Ok(json) => out.push(json),
                    Err(e) => out.push(format!("error: {e}")),
                }
            }
            AdminTab::Tasks => {
                for t in self.admin.tasks().await {
                    out.push(format!(
                        "{:>3}  {:<12} +{:<12} {}{}",
                        t.id,
                        t.kind.wire_name(),
                        t.reward.trimmed(),
                        t.title,
                        if t.completed { "  (done)" } else { "" }
                    ));
                }
            }
            AdminTab::Withdrawals => {
                for w in self.admin.withdrawals().await {
                    out.push(format!(
                        "{}  user {}  {}  {}  {}",
                        w.id, w.user_id, w.amount, w.address, w.status
                    ));
                }
            }
            AdminTab::Users => {
                for u in self.admin.users().await {
                    out.push(format!(
                        "{}  balance {}  rate {}  refs {}{}",
                        u.id,
                        u.balance,
                        u.mining_rate,
                        u.referral_count,
                        if u.is_blocked { "  [blocked]" } else { "" }
                    ));
                }
            }
        }
        out
    }

    /// Stop mining and flush the bonus slot.
    pub fn shutdown(self) -> Result<(), CloudmineError> {
        let Shell { ctx, mining, .. } = self;
        mining.unmount();
        ctx.slot().flush()?;
        info!("shell closed");
        Ok(())
    }
}
