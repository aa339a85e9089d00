//! Aggregates surviving a restart through the SQLite key-value store.

use std::sync::Arc;

use neural_architect_core::timer::{TimerStatus, TIMER_STORAGE_KEY};
use neural_architect_core::{
    AppHooks, CoreError, KeyValueStore, ManualClock, MemoryStore, NullNotifier, PomodoroConfig, SessionCategory,
    SessionTag, SqliteStore, TimerEngine, TimerPhase,
};

fn open(dir: &tempfile::TempDir) -> Arc<dyn KeyValueStore> {
    Arc::new(SqliteStore::open_at(&dir.path().join("neural-architect.db")).unwrap())
}

#[test]
fn restart_forces_idle_and_keeps_history() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(1_700_000_000_000));

    {
        let kv = open(&dir);
        let hooks = AppHooks::load(kv.clone(), Box::new(NullNotifier)).unwrap();
        let mut engine = TimerEngine::load(kv, PomodoroConfig::default(), clock.clone(), hooks).unwrap();
        engine.start();
        clock.advance_secs(1500);
        engine.tick();
        assert_eq!(engine.phase(), TimerPhase::Break);
        engine.start();
        clock.advance_secs(100);
        engine.tick();
        assert_eq!(engine.state().time_remaining, 200);
    }

    // Hours later, a new process.
    clock.advance_secs(5 * 3600);
    let kv = open(&dir);
    let hooks = AppHooks::load(kv.clone(), Box::new(NullNotifier)).unwrap();
    let engine = TimerEngine::load(kv, PomodoroConfig::default(), clock, hooks).unwrap();

    assert_eq!(engine.status(), TimerStatus::Idle);
    assert_eq!(engine.phase(), TimerPhase::Break);
    assert_eq!(engine.state().time_remaining, 300);
    assert!(engine.state().started_at.is_none());

    let hooks = engine.hooks();
    assert_eq!(hooks.sessions().session_count(), 1);
    assert_eq!(hooks.evolution().state().total_experience, 50);
    assert_eq!(hooks.stats().stats().total_sessions, 1);
}

#[test]
fn legacy_snapshot_is_repaired() {
    let dir = tempfile::tempdir().unwrap();
    let kv = open(&dir);
    kv.set(
        TIMER_STORAGE_KEY,
        r#"{
            "phase": "longBreak",
            "isRunning": true,
            "timeRemaining": 12,
            "totalDuration": 900,
            "startedAt": 1000,
            "config": {
                "workInterval": 3000,
                "shortBreakInterval": 300,
                "longBreakInterval": 900,
                "breakInterval": 600
            }
        }"#,
    )
    .unwrap();

    let clock = Arc::new(ManualClock::new(1_700_000_000_000));
    let engine = TimerEngine::load(kv.clone(), PomodoroConfig::default(), clock, AppHooks::default()).unwrap();
    assert_eq!(engine.phase(), TimerPhase::Break);
    assert_eq!(engine.status(), TimerStatus::Idle);
    assert_eq!(engine.config().focus_interval, 3000);
    assert_eq!(engine.state().total_duration, 600);

    // The repaired snapshot replaces the legacy one.
    let stored: serde_json::Value =
        serde_json::from_str(&kv.get(TIMER_STORAGE_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored["phase"], "break");
    assert_eq!(stored["isRunning"], false);
}

#[test]
fn corrupt_snapshot_falls_back_to_config() {
    let dir = tempfile::tempdir().unwrap();
    let kv = open(&dir);
    kv.set(TIMER_STORAGE_KEY, "{not json").unwrap();

    let fallback = PomodoroConfig {
        focus_interval: 3000,
        ..PomodoroConfig::default()
    };
    let clock = Arc::new(ManualClock::new(0));
    let engine = TimerEngine::load(kv, fallback, clock, AppHooks::default()).unwrap();
    assert_eq!(engine.state().time_remaining, 3000);
}

#[test]
fn tags_survive_and_sever_on_removal() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(ManualClock::new(0));
    let kv = open(&dir);
    let mut hooks = AppHooks::load(kv.clone(), Box::new(NullNotifier)).unwrap();
    let tag = SessionTag::new("Deep Work", SessionCategory::Work).unwrap();
    let tag_id = tag.id.clone();
    hooks.sessions_mut().add_tag(tag);

    let config = PomodoroConfig {
        focus_interval: 60,
        active_tags: vec![tag_id.clone()],
        ..PomodoroConfig::default()
    };
    let mut engine = TimerEngine::load(kv.clone(), config, clock.clone(), hooks).unwrap();
    engine.start();
    clock.advance_secs(60);
    engine.tick();

    let mut hooks = AppHooks::load(kv, Box::new(NullNotifier)).unwrap();
    let record = hooks.sessions().history().next().unwrap().clone();
    assert_eq!(record.tag_ids, vec![tag_id.clone()]);

    assert!(hooks.sessions_mut().remove_tag(&tag_id).is_some());
    assert!(hooks.sessions().tag(&tag_id).is_none());
    let record = hooks.sessions().session(&record.id).unwrap();
    assert!(record.tag_ids.is_empty());
}

#[test]
fn unreadable_timer_snapshot_is_left_alone() {
    let kv = Arc::new(MemoryStore::new());
    let saved = r#"{"phase":"focus","isRunning":false,"timeRemaining":3000,"totalDuration":3000,"config":{"focusInterval":3000,"breakInterval":300}}"#;
    kv.set(TIMER_STORAGE_KEY, saved).unwrap();
    kv.fail_next_reads(1);

    let clock = Arc::new(ManualClock::new(0));
    let result = TimerEngine::load(kv.clone(), PomodoroConfig::default(), clock.clone(), AppHooks::default());
    assert!(matches!(result, Err(CoreError::Storage(_))));
    assert_eq!(kv.get(TIMER_STORAGE_KEY).unwrap().as_deref(), Some(saved));

    let engine = TimerEngine::load(kv, PomodoroConfig::default(), clock, AppHooks::default()).unwrap();
    assert_eq!(engine.config().focus_interval, 3000);
}

#[test]
fn unreadable_evolution_snapshot_keeps_experience() {
    let kv = Arc::new(MemoryStore::new());
    let clock = Arc::new(ManualClock::new(0));
    {
        let hooks = AppHooks::load(kv.clone(), Box::new(NullNotifier)).unwrap();
        let mut engine = TimerEngine::load(kv.clone(), PomodoroConfig::default(), clock.clone(), hooks).unwrap();
        engine.hooks_mut().evolution_mut().add_experience(5000);
    }

    kv.fail_next_reads(1);
    assert!(AppHooks::load(kv.clone(), Box::new(NullNotifier)).is_err());

    let mut hooks = AppHooks::load(kv.clone(), Box::new(NullNotifier)).unwrap();
    hooks.evolution_mut().add_experience(50);
    let reloaded = AppHooks::load(kv, Box::new(NullNotifier)).unwrap();
    assert_eq!(reloaded.evolution().state().total_experience, 5050);
}
