//! # Neural Architect Core Library
//!
//! Core business logic for the Neural Architect focus timer: a Pomodoro-style
//! Focus/Break cycle whose completed focus sessions earn experience that grows
//! a leveled "neural architecture".
//!
//! ## Architecture
//!
//! - **Timer Engine**: a wall-clock-based state machine. The caller invokes
//!   `tick()` periodically (see [`timer::Ticker`]); remaining time is always
//!   recomputed from the clock, never decremented.
//! - **Evolution**: pure leveling arithmetic plus the [`EvolutionStore`]
//!   aggregate fed by completed sessions.
//! - **Sessions**: tags, immutable session records and the reward calculator.
//! - **Storage**: a key-value contract with SQLite and in-memory backends,
//!   JSON snapshots per aggregate, and TOML application config.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: core timer state machine
//! - [`TimerHooks`]: integration callbacks fired on completion
//! - [`EvolutionStore`]: experience / level aggregate
//! - [`SessionStore`]: tag registry and session history
//! - [`KeyValueStore`]: durable storage contract

pub mod error;
pub mod events;
pub mod evolution;
pub mod format;
pub mod hooks;
pub mod notify;
pub mod session;
pub mod stats;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, Result, StorageError, ValidationError};
pub use events::Event;
pub use evolution::{ArchitectureTier, EvolutionState, EvolutionStore};
pub use hooks::{AppHooks, NoopHooks, TimerHooks};
pub use notify::{Notification, Notifier, NullNotifier};
pub use session::{
    calculate_reward, create_id, SessionCategory, SessionRecord, SessionStore, SessionTag,
};
pub use stats::{UserStats, UserStatsStore};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{
    Clock, ManualClock, PomodoroConfig, PomodoroConfigPatch, SystemClock, TimerEngine,
    TimerPhase, TimerSnapshot, TimerState, TimerStatus,
};
