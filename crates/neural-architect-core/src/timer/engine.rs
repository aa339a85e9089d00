//! Timer engine implementation.
//!
//! The timer engine is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically
//! (see [`Ticker`](super::Ticker)).
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(config, Arc::new(SystemClock), NoopHooks);
//! engine.start();
//! // In a loop:
//! for event in engine.tick() { /* ... */ }
//! ```
//!
//! Every command computes a new [`TimerState`] from the current one,
//! commits it (persisting when the engine was loaded from storage) and
//! returns the emitted events.

use std::sync::Arc;

use serde::Serialize;

use super::clock::Clock;
use super::config::{PomodoroConfig, PomodoroConfigPatch};
use super::phase::TimerPhase;
use super::rehydrate::rehydrate_timer_state;
use super::state::{Tick, TimerState, TimerStatus};
use crate::error::Result;
use crate::events::Event;
use crate::format::format_time;
use crate::hooks::{NoopHooks, TimerHooks};
use crate::session::{calculate_reward, create_id, SessionRecord};
use crate::storage::{KeyValueStore, SnapshotSlot};

pub const TIMER_STORAGE_KEY: &str = "neural-architect-timer";

/// Read-only view handed to presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSnapshot {
    #[serde(flatten)]
    pub state: TimerState,
    pub status: TimerStatus,
    pub progress: f64,
    /// `time_remaining` as `MM:SS`.
    pub remaining_display: String,
}

/// Core timer engine.
///
/// Operates on wall-clock deltas from the injected [`Clock`].
pub struct TimerEngine<H: TimerHooks = NoopHooks> {
    state: TimerState,
    clock: Arc<dyn Clock>,
    hooks: H,
    slot: Option<SnapshotSlot>,
}

impl<H: TimerHooks> TimerEngine<H> {
    /// Unpersisted engine, idle at the start of a Focus phase.
    pub fn new(config: PomodoroConfig, clock: Arc<dyn Clock>, hooks: H) -> Self {
        Self {
            state: TimerState::new(config.normalized()),
            clock,
            hooks,
            slot: None,
        }
    }

    /// Rehydrate from storage.
    ///
    /// A persisted snapshot always wins over `fallback_config`; the fallback
    /// only seeds a timer that has never been saved.
    ///
    /// # Errors
    /// Returns `CoreError::Storage` when the snapshot cannot be read. Nothing
    /// is written in that case.
    pub fn load(
        store: Arc<dyn KeyValueStore>,
        fallback_config: PomodoroConfig,
        clock: Arc<dyn Clock>,
        hooks: H,
    ) -> Result<Self> {
        let slot = SnapshotSlot::new(store, TIMER_STORAGE_KEY);
        let state = match slot.load_value()? {
            Some(value) => rehydrate_timer_state(&value),
            None => TimerState::new(fallback_config.normalized()),
        };
        tracing::debug!(
            phase = %state.phase,
            remaining = state.time_remaining,
            "timer state loaded"
        );
        let mut engine = Self {
            state: state.clone(),
            clock,
            hooks,
            slot: Some(slot),
        };
        engine.commit(state);
        Ok(engine)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status()
    }

    pub fn phase(&self) -> TimerPhase {
        self.state.phase
    }

    pub fn config(&self) -> &PomodoroConfig {
        &self.state.config
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            state: self.state.clone(),
            status: self.state.status(),
            progress: self.state.progress(),
            remaining_display: format_time(self.state.time_remaining),
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut H {
        &mut self.hooks
    }

    pub fn into_hooks(self) -> H {
        self.hooks
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        let next = self.state.start(self.clock.now_ms())?;
        self.commit(next);
        tracing::debug!(phase = %self.state.phase, "timer started");
        Some(Event::TimerStarted {
            phase: self.state.phase,
            remaining_secs: self.state.time_remaining,
            at: self.clock.now_utc(),
        })
    }

    pub fn pause(&mut self) -> Option<Event> {
        let next = self.state.pause(self.clock.now_ms())?;
        self.commit(next);
        tracing::debug!(remaining = self.state.time_remaining, "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.state.time_remaining,
            at: self.clock.now_utc(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        let (next, paused_ms) = self.state.resume(self.clock.now_ms())?;
        self.commit(next);
        tracing::debug!(paused_ms, "timer resumed");
        Some(Event::TimerResumed {
            remaining_secs: self.state.time_remaining,
            paused_ms,
            at: self.clock.now_utc(),
        })
    }

    /// Recompute remaining time. Completes the phase once it hits zero.
    ///
    /// Returns the completion events, or nothing for an ordinary tick.
    pub fn tick(&mut self) -> Vec<Event> {
        match self.state.tick(self.clock.now_ms()) {
            Tick::Inactive | Tick::Unchanged => Vec::new(),
            Tick::Updated(next) => {
                self.commit(next);
                Vec::new()
            }
            Tick::Completed => self.complete_session(),
        }
    }

    /// Enter `phase` idle at its full duration.
    pub fn set_phase(&mut self, phase: TimerPhase) -> Event {
        let next = self.state.with_phase(phase);
        self.commit(next);
        tracing::debug!(phase = %phase, total = self.state.total_duration, "phase changed");
        Event::PhaseChanged {
            phase,
            total_secs: self.state.total_duration,
            at: self.clock.now_utc(),
        }
    }

    /// Merge `patch` into the config. Discards in-flight progress.
    pub fn set_config(&mut self, patch: PomodoroConfigPatch) -> Event {
        let next = self.state.with_config(patch);
        self.commit(next);
        tracing::debug!(
            focus_interval = self.state.config.focus_interval,
            break_interval = self.state.config.break_interval,
            "timer config updated"
        );
        Event::ConfigChanged {
            config: self.state.config.clone(),
            at: self.clock.now_utc(),
        }
    }

    /// Finish a break early. No-op during Focus.
    pub fn skip_break(&mut self) -> Vec<Event> {
        if self.state.phase == TimerPhase::Focus {
            return Vec::new();
        }
        self.complete_session()
    }

    pub fn request_reset(&mut self) -> Option<Event> {
        let next = self.state.request_reset()?;
        self.commit(next);
        Some(Event::ResetRequested {
            at: self.clock.now_utc(),
        })
    }

    pub fn confirm_reset(&mut self) -> Event {
        let next = self.state.confirm_reset();
        self.commit(next);
        tracing::debug!(phase = %self.state.phase, "timer reset confirmed");
        self.reset_event()
    }

    pub fn cancel_reset(&mut self) -> Option<Event> {
        let next = self.state.cancel_reset()?;
        self.commit(next);
        Some(Event::ResetCancelled {
            at: self.clock.now_utc(),
        })
    }

    /// Reset without the confirmation gate.
    pub fn reset(&mut self) -> Event {
        let next = self.state.confirm_reset();
        self.commit(next);
        tracing::debug!(phase = %self.state.phase, "timer reset");
        self.reset_event()
    }

    /// End the current phase now and advance to the next one.
    ///
    /// A Focus phase produces a [`SessionRecord`] and its reward. Hooks run
    /// before the next phase is committed.
    pub fn complete_session(&mut self) -> Vec<Event> {
        let ending = self.state.phase;
        let at = self.clock.now_utc();
        let mut events = Vec::with_capacity(3);

        if ending == TimerPhase::Focus {
            let config = &self.state.config;
            let duration_seconds = config.focus_interval;
            let record = SessionRecord {
                id: create_id("session"),
                category: config.current_category,
                tag_ids: config.active_tags.clone(),
                phase: ending,
                duration_seconds,
                completed_at: at,
                xp_earned: calculate_reward(duration_seconds as f64 / 60.0, 1.0),
            };
            tracing::info!(
                session_id = %record.id,
                duration_seconds,
                xp = record.xp_earned,
                "focus session completed"
            );
            self.hooks.on_focus_session_completed(&record);
            events.push(Event::SessionCompleted { record });
        } else {
            tracing::info!(phase = %ending, "phase completed");
        }

        self.hooks.on_phase_completed(ending);
        events.push(Event::PhaseCompleted { phase: ending, at });
        events.push(self.set_phase(ending.next()));
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reset_event(&self) -> Event {
        Event::TimerReset {
            phase: self.state.phase,
            remaining_secs: self.state.time_remaining,
            at: self.clock.now_utc(),
        }
    }

    fn commit(&mut self, next: TimerState) {
        self.state = next;
        if let Some(slot) = &self.slot {
            slot.save(&self.state);
        }
    }
}
