use std::io::Write;

use neural_architect_core::notify::{Notification, Notifier};
use neural_architect_core::storage::NotificationsConfig;

/// Prints phase notifications to stderr, optionally ringing the bell.
pub struct TerminalNotifier {
    enabled: bool,
    bell: bool,
}

impl TerminalNotifier {
    pub fn from_config(config: &NotificationsConfig) -> Self {
        Self {
            enabled: config.enabled,
            bell: config.bell,
        }
    }
}

impl Notifier for TerminalNotifier {
    fn is_supported(&self) -> bool {
        self.enabled
    }

    fn notify(&mut self, notification: &Notification) {
        let bell = if self.bell { "\x07" } else { "" };
        let mut stderr = std::io::stderr().lock();
        // A closed stderr must not interrupt the timer.
        let _ = writeln!(stderr, "{bell}{}: {}", notification.title, notification.body);
    }
}
