// ABOUTME: User-facing notices and diagnostic log lines
// ABOUTME: Console reporter for the CLI, recording reporter for tests

use std::sync::Mutex;

pub trait Reporter {
    /// One line the user is meant to see.
    fn notify(&self, text: &str);

    /// Diagnostic detail, only visible with debug logging enabled.
    fn log(&self, text: &str);
}

pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn notify(&self, text: &str) {
        println!("{}", text);
    }

    fn log(&self, text: &str) {
        tracing::debug!("{}", text);
    }
}

/// Keeps everything in memory so callers can assert on it.
#[derive(Default)]
pub struct RecordingReporter {
    notices: Mutex<Vec<String>>,
    logs: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<String> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn logs(&self) -> Vec<String> {
        self.logs.lock().map(|l| l.clone()).unwrap_or_default()
    }
}

impl Reporter for RecordingReporter {
    fn notify(&self, text: &str) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(text.to_string());
        }
    }

    fn log(&self, text: &str) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.push(text.to_string());
        }
    }
}
