//! User-facing confirmations and notices.

use std::cell::RefCell;

/// Asks the user before destructive actions and shows short notices.
pub trait UserPrompt {
    /// Ask a yes/no question. `true` lets the action proceed.
    fn confirm(&self, message: &str) -> bool;

    /// Show a message that needs no answer.
    fn notify(&self, message: &str);
}

/// Answers every question with a fixed reply and logs notices.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(pub bool);

impl Default for AutoConfirm {
    fn default() -> Self {
        Self(true)
    }
}

impl UserPrompt for AutoConfirm {
    fn confirm(&self, message: &str) -> bool {
        log::info!("{message} -> {}", if self.0 { "yes" } else { "no" });
        self.0
    }

    fn notify(&self, message: &str) {
        log::warn!("{message}");
    }
}

/// Records every prompt it receives. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct RecordingPrompt {
    answer: bool,
    confirmations: RefCell<Vec<String>>,
    notices: RefCell<Vec<String>>,
}

impl RecordingPrompt {
    pub fn answering(answer: bool) -> Self {
        Self {
            answer,
            ..Self::default()
        }
    }

    pub fn confirmations(&self) -> Vec<String> {
        self.confirmations.borrow().clone()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.borrow().clone()
    }
}

impl UserPrompt for RecordingPrompt {
    fn confirm(&self, message: &str) -> bool {
        self.confirmations.borrow_mut().push(message.to_string());
        self.answer
    }

    fn notify(&self, message: &str) {
        self.notices.borrow_mut().push(message.to_string());
    }
}
