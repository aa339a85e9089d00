//! Timer aggregate and its pure transitions.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//!   ^        |
//!   +--------+  (completion / set_phase / reset)
//! ```
//!
//! `reset_pending` is an orthogonal flag available from every state.
//!
//! Each transition takes `&self` plus the current wall-clock time and
//! returns a new snapshot; `None` means the transition does not apply and
//! the caller keeps the current state.

use serde::{Deserialize, Serialize};

use super::config::{PomodoroConfig, PomodoroConfigPatch};
use super::phase::{duration_for_phase, TimerPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
}

/// Result of evaluating a tick against the clock.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Not running; nothing to do.
    Inactive,
    /// Running, but the whole-second remaining time did not change.
    Unchanged,
    /// Running with a new remaining time.
    Updated(TimerState),
    /// Remaining time reached zero; the phase must complete.
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub phase: TimerPhase,
    pub is_running: bool,
    pub is_paused: bool,
    /// Seconds left in the current phase.
    pub time_remaining: u64,
    /// Full length of the current phase in seconds.
    pub total_duration: u64,
    /// Epoch ms the running interval is measured from. `None` unless running.
    pub started_at: Option<u64>,
    /// Epoch ms the pause began. `None` unless paused.
    pub paused_at: Option<u64>,
    /// Elapsed running time captured at pause; restores `started_at` on resume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paused_elapsed_ms: Option<u64>,
    pub reset_pending: bool,
    pub config: PomodoroConfig,
}

impl TimerState {
    /// Idle at the start of a Focus phase.
    pub fn new(config: PomodoroConfig) -> Self {
        let total = duration_for_phase(TimerPhase::Focus, &config);
        Self {
            phase: TimerPhase::Focus,
            is_running: false,
            is_paused: false,
            time_remaining: total,
            total_duration: total,
            started_at: None,
            paused_at: None,
            paused_elapsed_ms: None,
            reset_pending: false,
            config,
        }
    }

    pub fn status(&self) -> TimerStatus {
        if self.is_running {
            TimerStatus::Running
        } else if self.is_paused {
            TimerStatus::Paused
        } else {
            TimerStatus::Idle
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        if self.total_duration == 0 {
            return 0.0;
        }
        1.0 - (self.time_remaining as f64 / self.total_duration as f64)
    }

    /// Whole seconds elapsed since `started_at`, as of `now_ms`.
    pub fn elapsed_secs(&self, now_ms: u64) -> u64 {
        self.started_at
            .map(|started| now_ms.saturating_sub(started) / 1000)
            .unwrap_or(0)
    }

    pub fn start(&self, now_ms: u64) -> Option<Self> {
        if self.status() != TimerStatus::Idle {
            return None;
        }
        Some(Self {
            is_running: true,
            is_paused: false,
            started_at: Some(now_ms),
            paused_at: None,
            paused_elapsed_ms: None,
            ..self.clone()
        })
    }

    pub fn pause(&self, now_ms: u64) -> Option<Self> {
        if !self.is_running {
            return None;
        }
        let elapsed_ms = self
            .started_at
            .map(|started| now_ms.saturating_sub(started))
            .unwrap_or(0);
        Some(Self {
            is_running: false,
            is_paused: true,
            time_remaining: self.total_duration.saturating_sub(elapsed_ms / 1000),
            started_at: None,
            paused_at: Some(now_ms),
            paused_elapsed_ms: Some(elapsed_ms),
            ..self.clone()
        })
    }

    /// Returns the resumed state and the length of the pause in ms.
    ///
    /// The new `started_at` equals the original start shifted forward by
    /// the pause window, so paused time never counts as elapsed.
    pub fn resume(&self, now_ms: u64) -> Option<(Self, u64)> {
        if !self.is_paused {
            return None;
        }
        let paused_at = self.paused_at?;
        let paused_ms = now_ms.saturating_sub(paused_at);
        let started_at = match self.paused_elapsed_ms {
            Some(elapsed) => now_ms.saturating_sub(elapsed),
            None => now_ms,
        };
        let next = Self {
            is_running: true,
            is_paused: false,
            started_at: Some(started_at),
            paused_at: None,
            paused_elapsed_ms: None,
            ..self.clone()
        };
        Some((next, paused_ms))
    }

    /// Recompute remaining time from the clock. Never decrements a counter,
    /// so missed or duplicated ticks are harmless.
    pub fn tick(&self, now_ms: u64) -> Tick {
        let (true, Some(_)) = (self.is_running, self.started_at) else {
            return Tick::Inactive;
        };
        let remaining = self
            .total_duration
            .saturating_sub(self.elapsed_secs(now_ms));
        if remaining == 0 {
            Tick::Completed
        } else if remaining != self.time_remaining {
            Tick::Updated(Self {
                time_remaining: remaining,
                ..self.clone()
            })
        } else {
            Tick::Unchanged
        }
    }

    /// Enter `phase` idle with its full configured duration.
    pub fn with_phase(&self, phase: TimerPhase) -> Self {
        let total = duration_for_phase(phase, &self.config);
        Self {
            phase,
            is_running: false,
            is_paused: false,
            time_remaining: total,
            total_duration: total,
            started_at: None,
            paused_at: None,
            paused_elapsed_ms: None,
            reset_pending: false,
            config: self.config.clone(),
        }
    }

    /// Merge a config patch. Any running or paused progress is discarded.
    pub fn with_config(&self, patch: PomodoroConfigPatch) -> Self {
        let config = self.config.merged(patch);
        let total = duration_for_phase(self.phase, &config);
        Self {
            is_running: false,
            is_paused: false,
            time_remaining: total,
            total_duration: total,
            started_at: None,
            paused_at: None,
            paused_elapsed_ms: None,
            config,
            ..self.clone()
        }
    }

    pub fn request_reset(&self) -> Option<Self> {
        if self.reset_pending {
            return None;
        }
        Some(Self {
            reset_pending: true,
            ..self.clone()
        })
    }

    pub fn cancel_reset(&self) -> Option<Self> {
        if !self.reset_pending {
            return None;
        }
        Some(Self {
            reset_pending: false,
            ..self.clone()
        })
    }

    /// Current phase at full duration, idle, flag cleared.
    pub fn confirm_reset(&self) -> Self {
        self.with_phase(self.phase)
    }

    /// Next phase in the Focus/Break cycle, idle at full duration.
    pub fn advanced(&self) -> Self {
        self.with_phase(self.phase.next())
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(PomodoroConfig::default())
    }
}
