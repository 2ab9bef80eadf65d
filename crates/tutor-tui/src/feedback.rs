//! Tactile feedback.
//!
//! The closest a terminal gets to a haptic pulse is the bell. Pulses are
//! fire-and-forget: failures are ignored and nothing here participates in
//! the send path. Non-interactive runtimes (redirected stdout, tests) get
//! no pulse at all.

use std::io::{IsTerminal, Write};

/// Pulse strength. The terminal bell has one volume; the distinction is
/// kept so call sites read like the intent they carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    /// Dispatch confirmation.
    Light,
    /// Capture confirmation.
    Medium,
}

/// Emit a feedback pulse.
pub fn pulse(kind: Pulse) {
    let mut stdout = std::io::stdout();
    if !stdout.is_terminal() {
        return;
    }
    tracing::trace!(?kind, "feedback pulse");
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pulse_is_silent_off_terminal() {
        // Test runners capture stdout, so this must be a no-op either way.
        pulse(Pulse::Light);
        pulse(Pulse::Medium);
    }
}
