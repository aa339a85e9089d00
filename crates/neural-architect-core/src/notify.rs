//! Phase-completion notifications.
//!
//! Delivery is best effort: an environment without a notification
//! capability silently drops the message and the timer carries on.

use serde::Serialize;

use crate::timer::TimerPhase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub title: &'static str,
    pub body: &'static str,
}

impl Notification {
    /// Content announcing the end of `phase`.
    pub fn phase_completed(phase: TimerPhase) -> Self {
        match phase {
            TimerPhase::Focus => Self {
                title: "Focus Complete",
                body: "Focus Session Complete. Commencing recovery phase.",
            },
            TimerPhase::Break => Self {
                title: "Break Complete",
                body: "Break Concluded. Return to deep work state.",
            },
        }
    }
}

/// A notification sink (desktop toast, terminal bell, ...).
pub trait Notifier: Send {
    /// Whether this environment can deliver notifications at all.
    fn is_supported(&self) -> bool {
        true
    }

    fn notify(&mut self, notification: &Notification);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn is_supported(&self) -> bool {
        false
    }

    fn notify(&mut self, _notification: &Notification) {}
}

/// Send the completion notice for `phase`. No-op when unsupported.
pub fn dispatch_phase_notification(notifier: &mut dyn Notifier, phase: TimerPhase) -> bool {
    if !notifier.is_supported() {
        tracing::debug!(phase = %phase, "notifications unsupported, skipping");
        return false;
    }
    notifier.notify(&Notification::phase_completed(phase));
    true
}
