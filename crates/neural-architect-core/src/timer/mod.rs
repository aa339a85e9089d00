mod clock;
mod config;
mod engine;
mod phase;
mod rehydrate;
mod state;
mod ticker;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{normalize_config, PomodoroConfig, PomodoroConfigPatch};
pub use engine::{TimerEngine, TimerSnapshot, TIMER_STORAGE_KEY};
pub use phase::{duration_for_phase, TimerPhase};
pub use rehydrate::rehydrate_timer_state;
pub use state::{Tick, TimerState, TimerStatus};
pub use ticker::{TickDriver, Ticker};
