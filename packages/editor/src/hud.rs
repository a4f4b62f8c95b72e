//! Status display.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Content for the status display
///
/// `Text` is shown literally; `Html` is localized markup rendered as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    Text(String),
    Html(String),
}

impl StatusLine {
    pub fn as_str(&self) -> &str {
        match self {
            StatusLine::Text(text) | StatusLine::Html(text) => text,
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait Hud {
    /// Replace the whole status content
    fn set_status(&mut self, line: StatusLine);

    /// Flash a message that fades by itself
    fn transparent_message(&mut self, line: StatusLine);
}

/// In-memory status display
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StatusBar {
    pub status: Option<StatusLine>,
    pub last_message: Option<StatusLine>,
    /// Number of status updates so far
    pub updates: usize,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Hud for StatusBar {
    fn set_status(&mut self, line: StatusLine) {
        tracing::debug!(status = %line, "status updated");
        self.status = Some(line);
        self.updates += 1;
    }

    fn transparent_message(&mut self, line: StatusLine) {
        tracing::debug!(message = %line, "transparent message");
        self.last_message = Some(line);
    }
}

impl<T: Hud> Hud for Rc<RefCell<T>> {
    fn set_status(&mut self, line: StatusLine) {
        self.borrow_mut().set_status(line);
    }

    fn transparent_message(&mut self, line: StatusLine) {
        self.borrow_mut().transparent_message(line);
    }
}
