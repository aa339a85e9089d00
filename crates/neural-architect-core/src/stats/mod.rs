//! Lifetime user statistics: work time, session counts, daily streaks and
//! unlocked achievements.

mod user_stats;

pub use user_stats::{
    Achievement, AchievementRarity, UserStats, UserStatsStore, USER_STATS_STORAGE_KEY,
};
