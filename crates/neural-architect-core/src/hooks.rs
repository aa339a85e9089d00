//! Side effects fired by the timer when a phase completes.
//!
//! The timer knows nothing about sessions, experience or notifications; it
//! only calls these hooks. [`AppHooks`] is the standard wiring.

use std::sync::Arc;

use crate::error::Result;
use crate::events::Event;
use crate::evolution::EvolutionStore;
use crate::notify::{dispatch_phase_notification, Notifier, NullNotifier};
use crate::session::{SessionRecord, SessionStore};
use crate::stats::UserStatsStore;
use crate::storage::KeyValueStore;
use crate::timer::TimerPhase;

/// Completion callbacks. Both default to no-ops.
pub trait TimerHooks {
    /// Exactly once per completed Focus phase, before the phase flips.
    fn on_focus_session_completed(&mut self, _record: &SessionRecord) {}

    /// Exactly once per completed phase of either kind.
    fn on_phase_completed(&mut self, _phase: TimerPhase) {}
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHooks;

impl TimerHooks for NoopHooks {}

/// Records sessions, awards experience, keeps user stats and notifies.
pub struct AppHooks {
    sessions: SessionStore,
    evolution: EvolutionStore,
    stats: UserStatsStore,
    notifier: Box<dyn Notifier>,
    events: Vec<Event>,
}

impl AppHooks {
    pub fn new(
        sessions: SessionStore,
        evolution: EvolutionStore,
        stats: UserStatsStore,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            sessions,
            evolution,
            stats,
            notifier,
            events: Vec::new(),
        }
    }

    /// Load every aggregate from `store`.
    ///
    /// # Errors
    /// Returns `CoreError::Storage` if any aggregate cannot be read.
    pub fn load(store: Arc<dyn KeyValueStore>, notifier: Box<dyn Notifier>) -> Result<Self> {
        Ok(Self::new(
            SessionStore::load(store.clone())?,
            EvolutionStore::load(store.clone())?,
            UserStatsStore::load(store)?,
            notifier,
        ))
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn sessions_mut(&mut self) -> &mut SessionStore {
        &mut self.sessions
    }

    pub fn evolution(&self) -> &EvolutionStore {
        &self.evolution
    }

    pub fn evolution_mut(&mut self) -> &mut EvolutionStore {
        &mut self.evolution
    }

    pub fn stats(&self) -> &UserStatsStore {
        &self.stats
    }

    pub fn stats_mut(&mut self) -> &mut UserStatsStore {
        &mut self.stats
    }

    /// Level-ups and unlocks produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}

impl Default for AppHooks {
    fn default() -> Self {
        Self::new(
            SessionStore::new(),
            EvolutionStore::new(),
            UserStatsStore::new(),
            Box::new(NullNotifier),
        )
    }
}

impl TimerHooks for AppHooks {
    fn on_focus_session_completed(&mut self, record: &SessionRecord) {
        if !self.sessions.record_session(record.clone()) {
            return;
        }
        self.stats.add_work_time(record.duration_seconds);
        self.stats.increment_sessions(record.completed_at.date_naive());
        let at = record.completed_at;
        self.events
            .extend(self.evolution.add_experience_at(record.xp_earned, at));
        self.events.extend(self.evolution.unlock_milestones_at(at));
    }

    fn on_phase_completed(&mut self, phase: TimerPhase) {
        dispatch_phase_notification(self.notifier.as_mut(), phase);
    }
}
