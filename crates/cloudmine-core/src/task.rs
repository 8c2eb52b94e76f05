use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::types::{Amount, TaskId};

// ── TaskKind ──────────────────────────────────────────────────────────────────

/// The fixed set of reward-earning actions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    /// Sponsored advertisement served by the ad network.
    Adsgram,
    /// Generic video view.
    WatchAd,
    JoinChannel,
    VisitLink,
}

impl TaskKind {
    pub const ALL: [TaskKind; 4] = [
        TaskKind::Adsgram,
        TaskKind::WatchAd,
        TaskKind::JoinChannel,
        TaskKind::VisitLink,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TaskKind::Adsgram => "Watch AdsGram",
            TaskKind::WatchAd => "Watch Video",
            TaskKind::JoinChannel => "Join Channel",
            TaskKind::VisitLink => "Visit Link",
        }
    }

    pub fn wire_name(self) -> &'static str {
        match self {
            TaskKind::Adsgram => "adsgram",
            TaskKind::WatchAd => "watch_ad",
            TaskKind::JoinChannel => "join_channel",
            TaskKind::VisitLink => "visit_link",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for TaskKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TaskKind::ALL
            .into_iter()
            .find(|k| k.wire_name() == s)
            .ok_or_else(|| format!("unknown task kind: {s}"))
    }
}

// ── Task ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub kind: TaskKind,
    pub reward: Amount,
    /// Set exactly once, when the reward is credited.
    pub completed: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
}

impl Task {
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(v) = &patch.title {
            self.title = v.clone();
        }
        if let Some(v) = &patch.description {
            self.description = v.clone();
        }
        if let Some(v) = patch.kind {
            self.kind = v;
        }
        if let Some(v) = patch.reward {
            self.reward = v;
        }
        if let Some(v) = patch.completed {
            self.completed = v;
        }
        if let Some(v) = &patch.url {
            self.url = Some(v.clone());
        }
        if let Some(v) = &patch.channel_id {
            self.channel_id = Some(v.clone());
        }
    }
}

/// Partial update of a `Task`. The id is not patchable.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<TaskKind>,
    pub reward: Option<Amount>,
    pub completed: Option<bool>,
    pub url: Option<String>,
    pub channel_id: Option<String>,
}

/// The built-in catalog present at startup.
pub fn default_tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId::new("1"),
            title: "Watch AdsGram Video".into(),
            description: "Watch a 30-second advertisement".into(),
            kind: TaskKind::Adsgram,
            reward: Amount::from_units(1),
            completed: false,
            url: None,
            channel_id: None,
        },
        Task {
            id: TaskId::new("2"),
            title: "Join Our Telegram Channel".into(),
            description: "Join our official updates channel".into(),
            kind: TaskKind::JoinChannel,
            reward: Amount::from_units(2),
            completed: false,
            url: None,
            channel_id: Some("@mining_updates".into()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_wire_names_parse_back() {
        for kind in TaskKind::ALL {
            assert_eq!(kind.wire_name().parse::<TaskKind>().unwrap(), kind);
        }
        assert!("telepathy".parse::<TaskKind>().is_err());
    }

    #[test]
    fn default_catalog_starts_incomplete() {
        let tasks = default_tasks();
        assert_eq!(tasks.len(), 2);
        assert!(tasks.iter().all(|t| !t.completed));
        assert_eq!(tasks[1].channel_id.as_deref(), Some("@mining_updates"));
    }

    #[test]
    fn serde_kind_is_snake_case() {
        let json = serde_json::to_string(&TaskKind::JoinChannel).unwrap();
        assert_eq!(json, "\"join_channel\"");
    }
}
