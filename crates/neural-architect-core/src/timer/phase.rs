use serde::{Deserialize, Serialize};

use super::config::PomodoroConfig;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerPhase {
    #[default]
    Focus,
    Break,
}

impl TimerPhase {
    /// Focus alternates with Break.
    pub fn next(self) -> Self {
        match self {
            TimerPhase::Focus => TimerPhase::Break,
            TimerPhase::Break => TimerPhase::Focus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimerPhase::Focus => "focus",
            TimerPhase::Break => "break",
        }
    }

    /// Maps a persisted phase string onto the two-phase model.
    ///
    /// Every break subtype from older snapshots becomes `Break`; anything
    /// unrecognized becomes `Focus`.
    pub fn from_persisted(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "break" | "shortbreak" | "longbreak" | "short_break" | "long_break" => {
                TimerPhase::Break
            }
            _ => TimerPhase::Focus,
        }
    }
}

impl std::fmt::Display for TimerPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Duration in seconds configured for `phase`.
pub fn duration_for_phase(phase: TimerPhase, config: &PomodoroConfig) -> u64 {
    match phase {
        TimerPhase::Focus => config.focus_interval,
        TimerPhase::Break => config.break_interval,
    }
}
