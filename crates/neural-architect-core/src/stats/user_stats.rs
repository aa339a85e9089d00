use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::storage::{KeyValueStore, SnapshotSlot};

pub const USER_STATS_STORAGE_KEY: &str = "neural-architect-user-stats";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AchievementRarity {
    #[default]
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub unlocked_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub rarity: AchievementRarity,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    /// Accumulated focus time in seconds.
    pub total_work_time: u64,
    pub total_sessions: u64,
    /// Consecutive calendar days with at least one session.
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_session_date: Option<NaiveDate>,
    pub tasks_completed: u64,
    pub achievements: Vec<Achievement>,
}

impl UserStats {
    /// Streak after a session on `today`.
    ///
    /// Same day keeps the streak, the following day extends it, any other
    /// gap starts a new streak of one.
    pub fn with_session_on(&self, today: NaiveDate) -> Self {
        if self.last_session_date == Some(today) {
            return self.clone();
        }
        let continues = self
            .last_session_date
            .and_then(|last| last.succ_opt())
            .is_some_and(|next_day| next_day == today);
        let current_streak = if continues {
            self.current_streak.saturating_add(1)
        } else {
            1
        };
        Self {
            current_streak,
            longest_streak: self.longest_streak.max(current_streak),
            last_session_date: Some(today),
            ..self.clone()
        }
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }
}

/// Owns [`UserStats`] and persists every change.
pub struct UserStatsStore {
    stats: UserStats,
    slot: Option<SnapshotSlot>,
}

impl UserStatsStore {
    pub fn new() -> Self {
        Self {
            stats: UserStats::default(),
            slot: None,
        }
    }

    /// # Errors
    /// Returns the store's error when the snapshot cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Result<Self, StorageError> {
        let slot = SnapshotSlot::new(store, USER_STATS_STORAGE_KEY);
        let stats = slot.load()?.unwrap_or_default();
        Ok(Self {
            stats,
            slot: Some(slot),
        })
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    pub fn add_work_time(&mut self, seconds: u64) {
        let next = UserStats {
            total_work_time: self.stats.total_work_time.saturating_add(seconds),
            ..self.stats.clone()
        };
        self.commit(next);
    }

    /// Count a session and fold it into the daily streak.
    pub fn increment_sessions(&mut self, today: NaiveDate) {
        let next = UserStats {
            total_sessions: self.stats.total_sessions.saturating_add(1),
            ..self.stats.with_session_on(today)
        };
        self.commit(next);
    }

    pub fn update_streak(&mut self, today: NaiveDate) {
        let next = self.stats.with_session_on(today);
        if next != self.stats {
            self.commit(next);
        }
    }

    pub fn complete_task(&mut self) {
        let next = UserStats {
            tasks_completed: self.stats.tasks_completed.saturating_add(1),
            ..self.stats.clone()
        };
        self.commit(next);
    }

    /// Idempotent by achievement id. Returns `true` when newly unlocked.
    pub fn unlock_achievement(&mut self, achievement: Achievement) -> bool {
        if self.stats.has_achievement(&achievement.id) {
            return false;
        }
        tracing::info!(id = %achievement.id, "achievement unlocked");
        let mut next = self.stats.clone();
        next.achievements.push(achievement);
        self.commit(next);
        true
    }

    fn commit(&mut self, next: UserStats) {
        self.stats = next;
        if let Some(slot) = &self.slot {
            slot.save(&self.stats);
        }
    }
}

impl Default for UserStatsStore {
    fn default() -> Self {
        Self::new()
    }
}
