//! Copy-to-clipboard with a short-lived acknowledgment.

use std::io;
use std::time::{Duration, Instant};

/// How long the "copied" acknowledgment stays visible.
pub const COPY_ACK_DURATION: Duration = Duration::from_secs(2);

/// The host platform's clipboard.
pub trait Clipboard {
    fn write_text(&mut self, text: &str) -> io::Result<()>;
}

/// Tracks the transient "copied" state of a copy action.
#[derive(Debug, Default, Clone)]
pub struct CopyIndicator {
    copied_at: Option<Instant>,
}

impl CopyIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies `text` and starts the acknowledgment at `now`.
    pub fn copy<C: Clipboard + ?Sized>(&mut self, clipboard: &mut C, text: &str, now: Instant) -> io::Result<()> {
        clipboard.write_text(text)?;
        self.copied_at = Some(now);
        Ok(())
    }

    /// Whether the acknowledgment should still be shown at `now`.
    pub fn is_copied(&self, now: Instant) -> bool {
        self.copied_at
            .map(|at| now.saturating_duration_since(at) < COPY_ACK_DURATION)
            .unwrap_or(false)
    }
}
