//! Session categories, tags, immutable session records and the reward
//! calculator.

mod id;
mod reward;
mod store;

pub use id::{create_id, fallback_id};
pub use reward::{calculate_reward, XP_PER_FOCUS_MINUTE};
pub use store::{SessionStore, SESSION_STORAGE_KEY};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::TimerPhase;

/// Longest tag label kept after normalization, in characters.
pub const MAX_TAG_LABEL_LEN: usize = 40;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionCategory {
    #[default]
    Work,
    Study,
    Training,
    Custom,
}

impl SessionCategory {
    pub const ALL: [SessionCategory; 4] = [
        SessionCategory::Work,
        SessionCategory::Study,
        SessionCategory::Training,
        SessionCategory::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionCategory::Work => "work",
            SessionCategory::Study => "study",
            SessionCategory::Training => "training",
            SessionCategory::Custom => "custom",
        }
    }

    /// Exact, case-sensitive match against the closed category set.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl std::fmt::Display for SessionCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SessionCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ValidationError::InvalidValue {
            field: "category".into(),
            message: format!("'{s}' is not one of work, study, training, custom"),
        })
    }
}

/// Trim, collapse inner whitespace to single spaces, cap the length.
pub fn normalize_tag_label(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let truncated: String = collapsed.chars().take(MAX_TAG_LABEL_LEN).collect();
    truncated.trim_end().to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTag {
    pub id: String,
    pub label: String,
    pub category: SessionCategory,
}

impl SessionTag {
    /// New tag with a freshly minted id.
    ///
    /// # Errors
    /// Returns `ValidationError::EmptyValue` if the label is blank.
    pub fn new(label: &str, category: SessionCategory) -> Result<Self, ValidationError> {
        Self::with_id(create_id("tag"), label, category)
    }

    pub fn with_id(
        id: impl Into<String>,
        label: &str,
        category: SessionCategory,
    ) -> Result<Self, ValidationError> {
        let label = normalize_tag_label(label);
        if label.is_empty() {
            return Err(ValidationError::EmptyValue {
                field: "label".into(),
            });
        }
        Ok(Self {
            id: id.into(),
            label,
            category,
        })
    }
}

/// Immutable fact of a completed focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    pub category: SessionCategory,
    /// Snapshot of the active tags at completion time.
    pub tag_ids: Vec<String>,
    pub phase: TimerPhase,
    pub duration_seconds: u64,
    pub completed_at: DateTime<Utc>,
    pub xp_earned: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parse_is_closed() {
        assert_eq!(SessionCategory::parse("study"), Some(SessionCategory::Study));
        assert_eq!(SessionCategory::parse("Study"), None);
        assert_eq!(SessionCategory::parse("gaming"), None);
        assert!("custom".parse::<SessionCategory>().is_ok());
        assert!("".parse::<SessionCategory>().is_err());
    }

    #[test]
    fn tag_label_is_normalized() {
        assert_eq!(normalize_tag_label("  deep \t  work\n"), "deep work");
        let long = "a".repeat(60);
        assert_eq!(normalize_tag_label(&long).chars().count(), MAX_TAG_LABEL_LEN);
        // Truncation landing on a space does not leave trailing whitespace.
        let spaced = format!("{} tail", "b".repeat(39));
        assert_eq!(normalize_tag_label(&spaced), "b".repeat(39));
    }

    #[test]
    fn blank_tag_rejected() {
        let err = SessionTag::new("   ", SessionCategory::Work).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EmptyValue {
                field: "label".into()
            }
        );
    }

    #[test]
    fn tags_get_unique_ids() {
        let a = SessionTag::new("reading", SessionCategory::Study).unwrap();
        let b = SessionTag::new("reading", SessionCategory::Study).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.label, "reading");
    }

    #[test]
    fn record_serializes_camel_case() {
        let record = SessionRecord {
            id: "s1".into(),
            category: SessionCategory::Training,
            tag_ids: vec!["t1".into()],
            phase: TimerPhase::Focus,
            duration_seconds: 1500,
            completed_at: Utc::now(),
            xp_earned: 50,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["durationSeconds"], 1500);
        assert_eq!(json["tagIds"][0], "t1");
        assert_eq!(json["phase"], "focus");
        assert_eq!(json["category"], "training");
    }
}
