// src/joblog.rs

//! The job console log.
//!
//! This is the user-facing output of a publish step (what a CI job shows in
//! its console), separate from the `tracing` diagnostics on stderr.

use std::fmt::Debug;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Append-only sink for job console output.
///
/// Shared between the orchestrator and the tasks pumping child output, hence
/// `Send + Sync` and `&self` methods.
pub trait JobLog: Send + Sync + Debug {
    fn line(&self, line: &str);
    fn warning(&self, message: &str);
    /// Record a failure that terminates the step.
    fn fatal_error(&self, message: &str);
}

/// Writes the job log to stdout.
#[derive(Debug, Clone, Default)]
pub struct ConsoleLog;

impl ConsoleLog {
    fn write(&self, prefix: &str, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not take the step down with it.
        let _ = writeln!(stdout, "{prefix}{text}");
        let _ = stdout.flush();
    }
}

impl JobLog for ConsoleLog {
    fn line(&self, line: &str) {
        self.write("", line);
    }

    fn warning(&self, message: &str) {
        self.write("WARNING: ", message);
    }

    fn fatal_error(&self, message: &str) {
        self.write("FATAL: ", message);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    Line(String),
    Warning(String),
    Fatal(String),
}

/// In-memory job log, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.lock().clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.collect(|e| match e {
            LogEntry::Line(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn warnings(&self) -> Vec<String> {
        self.collect(|e| match e {
            LogEntry::Warning(s) => Some(s.clone()),
            _ => None,
        })
    }

    pub fn fatals(&self) -> Vec<String> {
        self.collect(|e| match e {
            LogEntry::Fatal(s) => Some(s.clone()),
            _ => None,
        })
    }

    fn collect(&self, f: impl Fn(&LogEntry) -> Option<String>) -> Vec<String> {
        self.lock().iter().filter_map(f).collect()
    }

    fn push(&self, entry: LogEntry) {
        self.lock().push(entry);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<LogEntry>> {
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl JobLog for MemoryLog {
    fn line(&self, line: &str) {
        self.push(LogEntry::Line(line.to_string()));
    }

    fn warning(&self, message: &str) {
        self.push(LogEntry::Warning(message.to_string()));
    }

    fn fatal_error(&self, message: &str) {
        self.push(LogEntry::Fatal(message.to_string()));
    }
}
