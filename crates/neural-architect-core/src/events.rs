use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::evolution::ArchitectureTier;
use crate::session::SessionRecord;
use crate::timer::{PomodoroConfig, TimerPhase};

/// Every state change in the system produces an Event.
///
/// Completion emits, in order: `SessionCompleted` (focus only),
/// `PhaseCompleted`, then `PhaseChanged` once the next phase is committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: TimerPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        /// Length of the pause window that was excluded from elapsed time.
        paused_ms: u64,
        at: DateTime<Utc>,
    },
    SessionCompleted {
        record: SessionRecord,
    },
    PhaseCompleted {
        phase: TimerPhase,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        phase: TimerPhase,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    ConfigChanged {
        config: PomodoroConfig,
        at: DateTime<Utc>,
    },
    ResetRequested {
        at: DateTime<Utc>,
    },
    ResetCancelled {
        at: DateTime<Utc>,
    },
    TimerReset {
        phase: TimerPhase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    LevelUp {
        from_level: u32,
        to_level: u32,
        tier: ArchitectureTier,
        at: DateTime<Utc>,
    },
    FeatureUnlocked {
        feature_id: String,
        at: DateTime<Utc>,
    },
}
