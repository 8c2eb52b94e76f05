use cloudmine_core::constants::TELEGRAM_BASE_URL;
use cloudmine_core::task::Task;
use cloudmine_core::types::{Amount, TaskId};
use cloudmine_state::AppContext;
use tracing::info;

/// Where the "open" action of a task leads: its own URL first, then the
/// join URL of its channel. Ad tasks have neither.
pub fn action_target(task: &Task) -> Option<String> {
    if let Some(url) = &task.url {
        return Some(url.clone());
    }
    task.channel_id
        .as_ref()
        .map(|channel| format!("{TELEGRAM_BASE_URL}/{}", channel.replace('@', "")))
}

/// The task list. Completion is self-reported; nothing is verified.
pub struct TaskView {
    ctx: AppContext,
}

impl TaskView {
    pub fn new(ctx: AppContext) -> Self {
        Self { ctx }
    }

    pub async fn list(&self) -> Vec<Task> {
        self.ctx.store().await.tasks().to_vec()
    }

    /// URL to open for an incomplete task, if it has one.
    pub async fn open(&self, id: &TaskId) -> Option<String> {
        let store = self.ctx.store().await;
        let task = store.task(id).filter(|t| !t.completed)?;
        let target = action_target(task);
        if let Some(url) = &target {
            info!(task = %id, %url, "task link opened");
        }
        target
    }

    /// Claim the reward. `None` when the task is unknown or already done.
    pub async fn complete(&self, id: &TaskId) -> Option<Amount> {
        self.ctx.store().await.complete_task(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cloudmine_core::task::TaskKind;
    use cloudmine_state::{SlotDb, Store};

    fn ctx() -> AppContext {
        AppContext::new(Store::default(), SlotDb::temporary().unwrap())
    }

    fn task(url: Option<&str>, channel: Option<&str>) -> Task {
        Task {
            id: TaskId::new("t"),
            title: "t".into(),
            description: "d".into(),
            kind: TaskKind::VisitLink,
            reward: Amount::from_units(1),
            completed: false,
            url: url.map(str::to_string),
            channel_id: channel.map(str::to_string),
        }
    }

    #[test]
    fn url_wins_over_channel() {
        let t = task(Some("https://example.com/promo"), Some("@chan"));
        assert_eq!(action_target(&t).as_deref(), Some("https://example.com/promo"));
    }

    #[test]
    fn channel_becomes_join_link() {
        let t = task(None, Some("@mining_updates"));
        assert_eq!(action_target(&t).as_deref(), Some("https://t.me/mining_updates"));
        assert_eq!(action_target(&task(None, None)), None);
    }

    #[tokio::test]
    async fn completing_twice_credits_once() {
        let ctx = ctx();
        let view = TaskView::new(ctx.clone());
        let id = TaskId::new("1");
        assert_eq!(view.complete(&id).await, Some(Amount::from_units(1)));
        assert_eq!(view.complete(&id).await, None);
        assert_eq!(ctx.store().await.balance(), Amount::from_units(1));
        assert!(view.list().await.iter().find(|t| t.id == id).unwrap().completed);
    }

    #[tokio::test]
    async fn completed_task_has_no_action() {
        let view = TaskView::new(ctx());
        let id = TaskId::new("2");
        assert_eq!(view.open(&id).await.as_deref(), Some("https://t.me/mining_updates"));
        view.complete(&id).await;
        assert_eq!(view.open(&id).await, None);
    }
}
