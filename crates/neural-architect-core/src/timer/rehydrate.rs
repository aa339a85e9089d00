//! Repair a persisted timer snapshot before the state machine sees it.
//!
//! A timer never survives a restart in a running or paused state: a stale
//! `startedAt` would otherwise produce a huge elapsed delta on the first
//! tick. Durations are recomputed from phase and config, never trusted.

use serde_json::Value;

use super::config::normalize_config;
use super::phase::TimerPhase;
use super::state::TimerState;

/// Rebuild an idle [`TimerState`] from whatever was persisted.
///
/// Total: any input, including non-objects, yields a valid state.
pub fn rehydrate_timer_state(value: &Value) -> TimerState {
    let Some(obj) = value.as_object() else {
        return TimerState::default();
    };

    let phase = obj
        .get("phase")
        .and_then(Value::as_str)
        .map(TimerPhase::from_persisted)
        .unwrap_or_default();
    let config = obj
        .get("config")
        .map(normalize_config)
        .unwrap_or_default();

    let state = TimerState::new(config).with_phase(phase);

    if obj.get("isRunning").and_then(Value::as_bool) == Some(true)
        || obj.get("isPaused").and_then(Value::as_bool) == Some(true)
    {
        tracing::debug!(phase = %phase, "discarding in-flight timer progress on load");
    }

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TimerStatus;
    use serde_json::json;

    #[test]
    fn forces_idle() {
        let state = rehydrate_timer_state(&json!({
            "phase": "focus",
            "isRunning": true,
            "isPaused": true,
            "timeRemaining": 12,
            "totalDuration": 1500,
            "startedAt": 1_000,
            "pausedAt": 2_000,
            "resetPending": true,
            "config": { "focusInterval": 1500, "breakInterval": 300 },
        }));
        assert_eq!(state.status(), TimerStatus::Idle);
        assert!(!state.is_paused);
        assert!(!state.reset_pending);
        assert!(state.started_at.is_none());
        assert!(state.paused_at.is_none());
        assert_eq!(state.time_remaining, 1500);
    }

    #[test]
    fn legacy_break_subtypes_collapse() {
        for raw in ["shortBreak", "longBreak", "break", "LONGBREAK"] {
            let state = rehydrate_timer_state(&json!({
                "phase": raw,
                "config": { "focusInterval": 1500, "breakInterval": 420 },
            }));
            assert_eq!(state.phase, TimerPhase::Break, "{raw}");
            assert_eq!(state.total_duration, 420);
            assert_eq!(state.time_remaining, 420);
        }
    }

    #[test]
    fn unknown_phase_is_focus() {
        let state = rehydrate_timer_state(&json!({ "phase": "meditation" }));
        assert_eq!(state.phase, TimerPhase::Focus);
        let state = rehydrate_timer_state(&json!({ "phase": 7 }));
        assert_eq!(state.phase, TimerPhase::Focus);
    }

    #[test]
    fn persisted_durations_are_not_trusted() {
        let state = rehydrate_timer_state(&json!({
            "phase": "break",
            "timeRemaining": 9999,
            "totalDuration": 9999,
            "config": { "focusInterval": 1500 },
        }));
        assert_eq!(state.total_duration, 300);
        assert_eq!(state.time_remaining, 300);
    }

    #[test]
    fn legacy_config_fields_are_normalized() {
        let state = rehydrate_timer_state(&json!({
            "phase": "work",
            "config": {
                "workInterval": 1800,
                "shortBreakInterval": 300,
                "longBreakInterval": 900,
                "sessionsUntilLongBreak": 4,
                "activeTags": ["deep", "deep"],
            },
        }));
        assert_eq!(state.phase, TimerPhase::Focus);
        assert_eq!(state.config.focus_interval, 1800);
        assert_eq!(state.config.break_interval, 300);
        assert_eq!(state.config.active_tags, vec!["deep"]);
        assert_eq!(state.total_duration, 1800);
    }

    #[test]
    fn garbage_yields_default() {
        assert_eq!(rehydrate_timer_state(&json!(null)), TimerState::default());
        assert_eq!(rehydrate_timer_state(&json!("timer")), TimerState::default());
        assert_eq!(rehydrate_timer_state(&json!({})), TimerState::default());
    }
}
