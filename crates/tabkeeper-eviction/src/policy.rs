//! Idle eviction policy
//!
//! ```text
//! evict(tab) = !pinned && !active && !audible
//!           && scheme in {http, https}
//!           && last_accessed < now - suspension_time
//! ```

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use tabkeeper_storage::Settings;
use tabkeeper_tabs::Tab;

/// Why a tab was or was not selected by a sweep
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Evict,
    AlreadyDiscarded,
    Pinned,
    Active,
    Audible,
    NotWeb,
    RecentlyAccessed,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Evict => "evict",
            Verdict::AlreadyDiscarded => "already_discarded",
            Verdict::Pinned => "pinned",
            Verdict::Active => "active",
            Verdict::Audible => "audible",
            Verdict::NotWeb => "not_web",
            Verdict::RecentlyAccessed => "recently_accessed",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvictionPolicy {
    suspension_time: Duration,
}

impl EvictionPolicy {
    pub fn new(suspension_time: Duration) -> Self {
        Self { suspension_time }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.suspension_time())
    }

    pub fn suspension_time(&self) -> Duration {
        self.suspension_time
    }

    /// Tabs last accessed strictly before this instant are idle
    pub fn threshold(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.suspension_time
    }

    pub fn verdict(&self, tab: &Tab, threshold: DateTime<Utc>) -> Verdict {
        if tab.discarded {
            Verdict::AlreadyDiscarded
        } else if tab.pinned {
            Verdict::Pinned
        } else if tab.active {
            Verdict::Active
        } else if tab.audible {
            Verdict::Audible
        } else if !tab.is_navigable_web() {
            Verdict::NotWeb
        } else if tab.last_accessed >= threshold {
            Verdict::RecentlyAccessed
        } else {
            Verdict::Evict
        }
    }

    pub fn should_evict(&self, tab: &Tab, threshold: DateTime<Utc>) -> bool {
        self.verdict(tab, threshold) == Verdict::Evict
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabkeeper_tabs::{TabId, WindowId};

    fn idle_tab(url: &str, last_accessed: DateTime<Utc>) -> Tab {
        Tab {
            id: TabId(1),
            window_id: WindowId(1),
            index: 1,
            url: url.to_string(),
            title: "Idle".to_string(),
            pinned: false,
            active: false,
            audible: false,
            discarded: false,
            last_accessed,
        }
    }

    #[test]
    fn test_default_is_thirty_minutes() {
        let policy = EvictionPolicy::default();
        assert_eq!(policy.suspension_time(), Duration::minutes(30));
    }

    #[test]
    fn test_each_guard_blocks_eviction() {
        let now = Utc::now();
        let policy = EvictionPolicy::new(Duration::minutes(30));
        let threshold = policy.threshold(now);
        let old = now - Duration::hours(2);

        assert_eq!(policy.verdict(&idle_tab("https://a.com", old), threshold), Verdict::Evict);

        let mut tab = idle_tab("https://a.com", old);
        tab.pinned = true;
        assert_eq!(policy.verdict(&tab, threshold), Verdict::Pinned);

        let mut tab = idle_tab("https://a.com", old);
        tab.active = true;
        assert_eq!(policy.verdict(&tab, threshold), Verdict::Active);

        let mut tab = idle_tab("https://a.com", old);
        tab.audible = true;
        assert_eq!(policy.verdict(&tab, threshold), Verdict::Audible);

        for url in ["chrome://settings", "chrome-extension://id/page.html", "about:blank"] {
            assert_eq!(policy.verdict(&idle_tab(url, old), threshold), Verdict::NotWeb);
        }

        let mut tab = idle_tab("https://a.com", old);
        tab.discarded = true;
        assert_eq!(policy.verdict(&tab, threshold), Verdict::AlreadyDiscarded);
    }

    #[test]
    fn test_threshold_is_strict() {
        let now = Utc::now();
        let policy = EvictionPolicy::new(Duration::minutes(30));
        let threshold = policy.threshold(now);

        let at_boundary = idle_tab("https://a.com", now - Duration::minutes(30));
        assert!(!policy.should_evict(&at_boundary, threshold));

        let one_second_older =
            idle_tab("https://a.com", now - Duration::minutes(30) - Duration::seconds(1));
        assert!(policy.should_evict(&one_second_older, threshold));
    }

    #[test]
    fn test_from_settings() {
        let settings = Settings {
            enable_context_switching: true,
            suspension_time_minutes: 5,
        };
        let policy = EvictionPolicy::from_settings(&settings);
        assert_eq!(policy.suspension_time(), Duration::minutes(5));
    }
}
