//! Command surface
//!
//! Hosts send JSON messages tagged by `action`; each maps to one variant.
//!
//! ```text
//! {"action": "suspendInactiveTabs"}
//! {"action": "saveContext", "name": "work"}
//! {"action": "restoreContext", "name": "work"}
//! {"action": "suggestTabs"}
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Command {
    /// Run an eviction sweep; acknowledged before the sweep finishes
    SuspendInactiveTabs,
    /// Snapshot the current window; answered after the write is durable
    SaveContext { name: String },
    /// Rebuild a saved window; answered after every tab creation is issued
    RestoreContext { name: String },
    /// Apply the time-of-day rule; acknowledged immediately
    SuggestTabs,
    ListContexts,
    DeleteContext { name: String },
    TabStats,
}

impl Command {
    pub fn from_json(message: &str) -> serde_json::Result<Self> {
        serde_json::from_str(message)
    }

    pub fn action(&self) -> &'static str {
        match self {
            Command::SuspendInactiveTabs => "suspendInactiveTabs",
            Command::SaveContext { .. } => "saveContext",
            Command::RestoreContext { .. } => "restoreContext",
            Command::SuggestTabs => "suggestTabs",
            Command::ListContexts => "listContexts",
            Command::DeleteContext { .. } => "deleteContext",
            Command::TabStats => "tabStats",
        }
    }
}

/// Open / discarded tab counts, as shown in the popup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabStats {
    pub open: usize,
    pub suspended: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contexts: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<TabStats>,
}

impl CommandResponse {
    pub fn status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            contexts: None,
            stats: None,
        }
    }

    pub fn with_contexts(mut self, contexts: Vec<String>) -> Self {
        self.contexts = Some(contexts);
        self
    }

    pub fn with_stats(mut self, stats: TabStats) -> Self {
        self.stats = Some(stats);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_messages() {
        assert_eq!(
            Command::from_json(r#"{"action":"suspendInactiveTabs"}"#).unwrap(),
            Command::SuspendInactiveTabs
        );
        assert_eq!(
            Command::from_json(r#"{"action":"saveContext","name":"work"}"#).unwrap(),
            Command::SaveContext {
                name: "work".to_string()
            }
        );
        assert_eq!(
            Command::from_json(r#"{"action":"restoreContext","name":"home"}"#).unwrap(),
            Command::RestoreContext {
                name: "home".to_string()
            }
        );
        assert_eq!(
            Command::from_json(r#"{"action":"suggestTabs"}"#).unwrap(),
            Command::SuggestTabs
        );
    }

    #[test]
    fn test_unknown_or_incomplete_rejected() {
        assert!(Command::from_json(r#"{"action":"connectSlack"}"#).is_err());
        assert!(Command::from_json(r#"{"action":"saveContext"}"#).is_err());
        assert!(Command::from_json(r#"{"name":"work"}"#).is_err());
    }

    #[test]
    fn test_action_matches_tag() {
        let commands = [
            Command::SuspendInactiveTabs,
            Command::SaveContext {
                name: "a".to_string(),
            },
            Command::RestoreContext {
                name: "a".to_string(),
            },
            Command::SuggestTabs,
            Command::ListContexts,
            Command::DeleteContext {
                name: "a".to_string(),
            },
            Command::TabStats,
        ];
        for command in commands {
            let value = serde_json::to_value(&command).unwrap();
            assert_eq!(value["action"], command.action());
        }
    }

    #[test]
    fn test_response_omits_empty_fields() {
        let value = serde_json::to_value(CommandResponse::status("ok")).unwrap();
        assert_eq!(value, json!({"status": "ok"}));

        let value = serde_json::to_value(
            CommandResponse::status("ok").with_stats(TabStats {
                open: 3,
                suspended: 1,
            }),
        )
        .unwrap();
        assert_eq!(value["stats"], json!({"open": 3, "suspended": 1}));
    }
}
