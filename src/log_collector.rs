//! Decoupled logging pipeline.
//!
//! ```text
//! log::info!() / log::warn!() ...
//!     |
//! [LogCollector] (implements log::Log, never blocks the UI thread)
//!     | (crossbeam unbounded channel)
//!     v
//! [writer thread] -> logs/<YYYYmmdd_HHMMSS>_session.log
//! ```
//!
//! Warnings and errors are echoed to stderr as well. `wait_for_empty()` pushes
//! a flush marker through the channel and returns once everything queued
//! before it is on disk.

use chrono::Local;
use crossbeam_channel::{unbounded, Sender};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Internal log line or special marker
enum LogMessage {
    Line(LogLine),
    /// Flush marker with channel sender to signal completion
    Flush(std::sync::mpsc::Sender<()>),
}

/// A log line with metadata
#[derive(Clone, Debug)]
pub struct LogLine {
    pub message: String,
    pub level: Level,
    /// Local wall-clock time the line was created
    pub timestamp: String,
}

impl LogLine {
    pub fn new(level: Level, message: String) -> Self {
        LogLine {
            message,
            level,
            timestamp: Local::now().format("%H:%M:%S%.3f").to_string(),
        }
    }

    fn formatted(&self) -> String {
        format!("[{}] [{}] {}\n", self.timestamp, self.level, self.message)
    }
}

/// Ensure the logs directory exists
fn ensure_logs_dir_exists(log_dir: &Path) -> Result<(), String> {
    std::fs::create_dir_all(log_dir)
        .map_err(|e| format!("Failed to create logs directory: {}", e))
}

/// Logger that hands every record to a background disk writer
#[derive(Clone)]
pub struct LogCollector {
    tx: Sender<LogMessage>,
    session_log_path: PathBuf,
    max_level: LevelFilter,
}

impl LogCollector {
    /// Create the session log file under `log_dir` and start the writer thread.
    pub fn new(log_dir: PathBuf, max_level: LevelFilter) -> Result<Self, String> {
        ensure_logs_dir_exists(&log_dir)?;
        let session_log_path = log_dir.join(format!(
            "{}_session.log",
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&session_log_path)
            .map_err(|e| format!("Failed to create log file: {}", e))?;

        let (tx, rx) = unbounded::<LogMessage>();

        // OS thread rather than anything tied to the UI loop, so lines reach
        // disk even while a frame is being drawn
        std::thread::spawn(move || {
            let mut file: File = file;
            while let Ok(msg) = rx.recv() {
                match msg {
                    LogMessage::Line(line) => {
                        let _ = file.write_all(line.formatted().as_bytes());
                    }
                    LogMessage::Flush(done) => {
                        let _ = file.flush();
                        let _ = done.send(());
                    }
                }
            }
            let _ = file.flush();
        });

        Ok(LogCollector {
            tx,
            session_log_path,
            max_level,
        })
    }

    /// Install as the global `log` backend.
    pub fn install(&self) -> Result<(), log::SetLoggerError> {
        log::set_boxed_logger(Box::new(self.clone()))?;
        log::set_max_level(self.max_level);
        Ok(())
    }

    pub fn session_log_path(&self) -> &Path {
        &self.session_log_path
    }

    /// Queue a line for the writer thread (non-blocking)
    pub fn push(&self, line: LogLine) {
        let _ = self.tx.send(LogMessage::Line(line));
    }

    /// Block until every line queued so far has been written.
    pub fn wait_for_empty(&self) -> Result<(), String> {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        self.tx
            .send(LogMessage::Flush(tx))
            .map_err(|e| format!("Failed to send flush marker: {}", e))?;
        rx.recv()
            .map_err(|e| format!("Flush signal interrupted: {}", e))
    }
}

impl Log for LogCollector {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogLine::new(record.level(), record.args().to_string());
        if line.level <= Level::Warn {
            eprintln!("[{}] {}", line.level, line.message);
        }
        self.push(line);
    }

    fn flush(&self) {
        let _ = self.wait_for_empty();
    }
}
