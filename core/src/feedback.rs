//! Feedback Channel
//!
//! One transient status line shown after a register/unregister attempt.
//! Every `show` bumps a generation counter; a dismiss timer carries the
//! generation it was armed for and only hides that exact message, so a newer
//! message is never cut short by an older timer.

use std::time::Duration;

/// How long a message stays up when nothing else is configured.
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
}

impl FeedbackKind {
    /// Class name used by renderers.
    pub fn as_str(self) -> &'static str {
        match self {
            FeedbackKind::Success => "success",
            FeedbackKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackMessage {
    pub kind: FeedbackKind,
    pub text: String,
    pub generation: u64,
}

#[derive(Debug)]
pub struct FeedbackChannel {
    current: Option<FeedbackMessage>,
    generation: u64,
    dismiss_after: Duration,
}

impl FeedbackChannel {
    pub fn new(dismiss_after: Duration) -> Self {
        Self {
            current: None,
            generation: 0,
            dismiss_after,
        }
    }

    /// Show `text`, replacing whatever was visible. Returns the generation the
    /// caller should arm a dismiss timer for.
    pub fn show(&mut self, kind: FeedbackKind, text: impl Into<String>) -> u64 {
        self.generation += 1;
        self.current = Some(FeedbackMessage {
            kind,
            text: text.into(),
            generation: self.generation,
        });
        self.generation
    }

    pub fn success(&mut self, text: impl Into<String>) -> u64 {
        self.show(FeedbackKind::Success, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> u64 {
        self.show(FeedbackKind::Error, text)
    }

    /// Hide the message if it is still the one `generation` refers to.
    ///
    /// Returns true when something was hidden.
    pub fn dismiss(&mut self, generation: u64) -> bool {
        match &self.current {
            Some(message) if message.generation == generation => {
                self.current = None;
                true
            }
            _ => false,
        }
    }

    pub fn visible(&self) -> Option<&FeedbackMessage> {
        self.current.as_ref()
    }

    pub fn dismiss_after(&self) -> Duration {
        self.dismiss_after
    }
}

impl Default for FeedbackChannel {
    fn default() -> Self {
        Self::new(DEFAULT_DISMISS_AFTER)
    }
}
