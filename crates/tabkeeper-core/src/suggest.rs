//! Time-of-day tab suggestions
//!
//! A fixed calendar rule, not a prediction: on weekday mornings, open a few
//! well-known pages unless a tab on the same host is already open.

use chrono::{Datelike, Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use tabkeeper_tabs::{url_host, CreateTab, TabRegistry};

use crate::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionRule {
    /// Only Monday through Friday
    pub weekdays_only: bool,
    /// First local hour the rule applies, inclusive
    pub start_hour: u32,
    /// Last local hour the rule applies, inclusive
    pub end_hour: u32,
    pub urls: Vec<String>,
}

impl Default for SuggestionRule {
    fn default() -> Self {
        Self {
            weekdays_only: true,
            start_hour: 8,
            end_hour: 10,
            urls: vec![
                "https://news.google.com/".to_string(),
                "https://www.wikipedia.org/".to_string(),
            ],
        }
    }
}

impl SuggestionRule {
    pub fn applies(&self, at: NaiveDateTime) -> bool {
        if self.weekdays_only && at.weekday().number_from_monday() > 5 {
            return false;
        }
        (self.start_hour..=self.end_hour).contains(&at.hour())
    }
}

pub struct TabSuggester {
    registry: Arc<dyn TabRegistry>,
    rule: SuggestionRule,
}

impl TabSuggester {
    pub fn new(registry: Arc<dyn TabRegistry>, rule: SuggestionRule) -> Self {
        Self { registry, rule }
    }

    pub fn rule(&self) -> &SuggestionRule {
        &self.rule
    }

    pub async fn suggest(&self) -> Result<Vec<String>> {
        self.suggest_at(Local::now().naive_local()).await
    }

    /// Open suggested pages for local time `at`. Returns the URLs opened.
    pub async fn suggest_at(&self, at: NaiveDateTime) -> Result<Vec<String>> {
        if !self.rule.applies(at) {
            tracing::info!(at = %at, "No tabs suggested for current time");
            return Ok(Vec::new());
        }

        let open_hosts: Vec<String> = self
            .registry
            .query_tabs()
            .await?
            .iter()
            .filter_map(|t| t.host())
            .collect();

        let mut opened = Vec::new();
        for url in &self.rule.urls {
            let Some(host) = url_host(url) else {
                tracing::warn!(url = %url, "Ignoring unparseable suggestion");
                continue;
            };
            if open_hosts.contains(&host) {
                continue;
            }

            match self.registry.create_tab(CreateTab::new(url.clone())).await {
                Ok(tab) => {
                    tracing::info!(tab_id = %tab.id, url = %url, "Opened suggested tab");
                    opened.push(url.clone());
                }
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Failed to open suggested tab");
                }
            }
        }

        Ok(opened)
    }
}

impl Clone for TabSuggester {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            rule: self.rule.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tabkeeper_tabs::TabManager;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn test_rule_window() {
        let rule = SuggestionRule::default();

        // 2026-10-19 is a Monday
        assert!(rule.applies(at(2026, 10, 19, 8, 0)));
        assert!(rule.applies(at(2026, 10, 19, 10, 59)));
        assert!(!rule.applies(at(2026, 10, 19, 7, 59)));
        assert!(!rule.applies(at(2026, 10, 19, 11, 0)));

        // Friday applies, Saturday and Sunday do not
        assert!(rule.applies(at(2026, 10, 23, 9, 0)));
        assert!(!rule.applies(at(2026, 10, 24, 9, 0)));
        assert!(!rule.applies(at(2026, 10, 25, 9, 0)));

        let any_day = SuggestionRule {
            weekdays_only: false,
            ..SuggestionRule::default()
        };
        assert!(any_day.applies(at(2026, 10, 24, 9, 0)));
    }

    #[tokio::test]
    async fn test_opens_missing_pages_only() {
        let tabs = TabManager::new();
        tabs.open_window();
        tabs.open_tab(CreateTab::new("https://www.wikipedia.org/wiki/Rust"))
            .unwrap();

        let suggester = TabSuggester::new(Arc::new(tabs.clone()), SuggestionRule::default());
        let opened = suggester.suggest_at(at(2026, 10, 19, 9, 0)).await.unwrap();
        assert_eq!(opened, vec!["https://news.google.com/"]);

        // Nothing left to open on a second pass
        let opened = suggester.suggest_at(at(2026, 10, 19, 9, 5)).await.unwrap();
        assert!(opened.is_empty());
        assert_eq!(tabs.query_tabs().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_outside_window_opens_nothing() {
        let tabs = TabManager::new();
        tabs.open_window();

        let suggester = TabSuggester::new(Arc::new(tabs.clone()), SuggestionRule::default());
        let opened = suggester.suggest_at(at(2026, 10, 24, 9, 0)).await.unwrap();
        assert!(opened.is_empty());
        assert!(tabs.query_tabs().await.unwrap().is_empty());
    }
}
