//! Timer configuration and its normalizer.
//!
//! Persisted configuration may come from older schema generations or be
//! hand-edited, so every load goes through [`normalize_config`], which
//! never fails and falls back to defaults field by field.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::session::SessionCategory;

/// Field names accepted for the focus interval, canonical name first.
const FOCUS_INTERVAL_KEYS: [&str; 2] = ["focusInterval", "workInterval"];
const BREAK_INTERVAL_KEYS: [&str; 1] = ["breakInterval"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroConfig {
    /// Focus interval in seconds.
    pub focus_interval: u64,
    /// Break interval in seconds.
    pub break_interval: u64,
    pub current_category: SessionCategory,
    /// Tag ids applied to the next completed session. Set semantics,
    /// stored in insertion order.
    pub active_tags: Vec<String>,
}

impl PomodoroConfig {
    pub const DEFAULT_FOCUS_INTERVAL: u64 = 1500;
    pub const DEFAULT_BREAK_INTERVAL: u64 = 300;

    /// Replace zero intervals with defaults and drop duplicate tags.
    pub fn normalized(self) -> Self {
        Self {
            focus_interval: nonzero_or(self.focus_interval, Self::DEFAULT_FOCUS_INTERVAL),
            break_interval: nonzero_or(self.break_interval, Self::DEFAULT_BREAK_INTERVAL),
            current_category: self.current_category,
            active_tags: dedup_tags(self.active_tags.iter().map(String::as_str)),
        }
    }

    /// Apply `patch` on top of `self`, then normalize.
    pub fn merged(&self, patch: PomodoroConfigPatch) -> Self {
        Self {
            focus_interval: patch.focus_interval.unwrap_or(self.focus_interval),
            break_interval: patch.break_interval.unwrap_or(self.break_interval),
            current_category: patch.current_category.unwrap_or(self.current_category),
            active_tags: patch.active_tags.unwrap_or_else(|| self.active_tags.clone()),
        }
        .normalized()
    }

    pub fn has_tag(&self, tag_id: &str) -> bool {
        self.active_tags.iter().any(|t| t == tag_id)
    }
}

impl Default for PomodoroConfig {
    fn default() -> Self {
        Self {
            focus_interval: Self::DEFAULT_FOCUS_INTERVAL,
            break_interval: Self::DEFAULT_BREAK_INTERVAL,
            current_category: SessionCategory::Work,
            active_tags: Vec::new(),
        }
    }
}

/// Partial update for [`PomodoroConfig`]; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomodoroConfigPatch {
    pub focus_interval: Option<u64>,
    pub break_interval: Option<u64>,
    pub current_category: Option<SessionCategory>,
    pub active_tags: Option<Vec<String>>,
}

/// Normalize a possibly malformed persisted config. Idempotent.
///
/// Non-object input yields the default config.
pub fn normalize_config(value: &Value) -> PomodoroConfig {
    let Some(obj) = value.as_object() else {
        return PomodoroConfig::default();
    };

    let focus_interval = interval_field(obj, &FOCUS_INTERVAL_KEYS)
        .unwrap_or(PomodoroConfig::DEFAULT_FOCUS_INTERVAL);
    let break_interval = interval_field(obj, &BREAK_INTERVAL_KEYS)
        .unwrap_or(PomodoroConfig::DEFAULT_BREAK_INTERVAL);
    let current_category = obj
        .get("currentCategory")
        .and_then(Value::as_str)
        .and_then(SessionCategory::parse)
        .unwrap_or_default();
    let active_tags = obj
        .get("activeTags")
        .and_then(Value::as_array)
        .map(|items| dedup_tags(items.iter().filter_map(Value::as_str)))
        .unwrap_or_default();

    PomodoroConfig {
        focus_interval,
        break_interval,
        current_category,
        active_tags,
    }
}

fn interval_field(obj: &Map<String, Value>, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .find_map(|key| obj.get(*key).and_then(Value::as_f64).and_then(valid_interval))
}

/// Any positive finite number of seconds, rounded to whole seconds (at least 1).
/// Values beyond `u64::MAX` saturate.
fn valid_interval(secs: f64) -> Option<u64> {
    if !secs.is_finite() || secs <= 0.0 {
        return None;
    }
    Some(secs.round().max(1.0) as u64)
}

fn nonzero_or(secs: u64, default: u64) -> u64 {
    if secs == 0 {
        default
    } else {
        secs
    }
}

fn dedup_tags<'a>(tags: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        if !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_object_yields_default() {
        for value in [json!(null), json!(42), json!("config"), json!([1, 2])] {
            assert_eq!(normalize_config(&value), PomodoroConfig::default());
        }
    }

    #[test]
    fn valid_fields_are_kept() {
        let config = normalize_config(&json!({
            "focusInterval": 3000,
            "breakInterval": 600,
            "currentCategory": "training",
            "activeTags": ["a", "b"],
        }));
        assert_eq!(config.focus_interval, 3000);
        assert_eq!(config.break_interval, 600);
        assert_eq!(config.current_category, SessionCategory::Training);
        assert_eq!(config.active_tags, vec!["a", "b"]);
    }

    #[test]
    fn invalid_intervals_fall_back() {
        let config = normalize_config(&json!({
            "focusInterval": -5,
            "breakInterval": "300",
        }));
        assert_eq!(config.focus_interval, 1500);
        assert_eq!(config.break_interval, 300);

        let config = normalize_config(&json!({ "focusInterval": 0, "breakInterval": -0.2 }));
        assert_eq!(config.focus_interval, 1500);
        assert_eq!(config.break_interval, 300);
    }

    #[test]
    fn any_positive_finite_interval_is_accepted() {
        let config = normalize_config(&json!({ "focusInterval": 1e12, "breakInterval": 0.2 }));
        assert_eq!(config.focus_interval, 1_000_000_000_000);
        assert_eq!(config.break_interval, 1);

        let config = normalize_config(&json!({ "focusInterval": 172_800 }));
        assert_eq!(config.focus_interval, 172_800);
    }

    #[test]
    fn fractional_intervals_round() {
        let config = normalize_config(&json!({ "focusInterval": 1499.6 }));
        assert_eq!(config.focus_interval, 1500);
    }

    #[test]
    fn legacy_work_interval_alias() {
        let config = normalize_config(&json!({ "workInterval": 1800 }));
        assert_eq!(config.focus_interval, 1800);

        // The canonical name wins when both are valid.
        let config = normalize_config(&json!({ "focusInterval": 1200, "workInterval": 1800 }));
        assert_eq!(config.focus_interval, 1200);

        // An invalid canonical value defers to a valid alias.
        let config = normalize_config(&json!({ "focusInterval": null, "workInterval": 1800 }));
        assert_eq!(config.focus_interval, 1800);
    }

    #[test]
    fn tags_filtered_to_strings() {
        let config = normalize_config(&json!({ "activeTags": ["a", 1, null, "b", "a", {"x": 1}] }));
        assert_eq!(config.active_tags, vec!["a", "b"]);

        let config = normalize_config(&json!({ "activeTags": "a" }));
        assert!(config.active_tags.is_empty());
    }

    #[test]
    fn unknown_category_falls_back() {
        let config = normalize_config(&json!({ "currentCategory": "gaming" }));
        assert_eq!(config.current_category, SessionCategory::Work);
        let config = normalize_config(&json!({ "currentCategory": 3 }));
        assert_eq!(config.current_category, SessionCategory::Work);
    }

    #[test]
    fn idempotent() {
        let raw = json!({
            "workInterval": 1799.5,
            "breakInterval": -1,
            "currentCategory": "study",
            "activeTags": ["x", "x", 7, "y"],
        });
        let once = normalize_config(&raw);
        let twice = normalize_config(&serde_json::to_value(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn merge_then_normalize() {
        let base = PomodoroConfig::default();
        let merged = base.merged(PomodoroConfigPatch {
            break_interval: Some(600),
            active_tags: Some(vec!["t".into(), "t".into()]),
            ..Default::default()
        });
        assert_eq!(merged.focus_interval, 1500);
        assert_eq!(merged.break_interval, 600);
        assert_eq!(merged.active_tags, vec!["t"]);
        assert!(merged.has_tag("t"));

        let zeroed = merged.merged(PomodoroConfigPatch {
            focus_interval: Some(0),
            ..Default::default()
        });
        assert_eq!(zeroed.focus_interval, PomodoroConfig::DEFAULT_FOCUS_INTERVAL);
    }
}
