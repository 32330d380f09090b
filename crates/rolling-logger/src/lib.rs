//! Rolling Logger
//!
//! A `log` backend that keeps the most recent records in a circular buffer
//! and mirrors every record to the browser console (stderr off wasm).
//! The buffer is what the settings page shows as "recent activity".

use std::collections::VecDeque;
use std::sync::{Mutex, OnceLock};

use chrono::{DateTime, Utc};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Default number of records kept in memory
pub const DEFAULT_CAPACITY: usize = 500;

/// One captured log record
#[derive(Debug, Clone, PartialEq)]
pub struct LogLine {
    pub at: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogLine {
    /// Single-line rendering used for both the console and the UI
    pub fn format(&self) -> String {
        format!(
            "{} {:<5} [{}] {}",
            self.at.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Circular-buffer logger
pub struct RollingLogger {
    app_name: String,
    capacity: usize,
    max_level: LevelFilter,
    lines: Mutex<VecDeque<LogLine>>,
}

impl RollingLogger {
    pub fn new(app_name: &str, capacity: usize) -> Self {
        let max_level = if cfg!(debug_assertions) {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        };
        Self {
            app_name: app_name.to_string(),
            capacity: capacity.max(1),
            max_level,
            lines: Mutex::new(VecDeque::with_capacity(capacity.max(1))),
        }
    }

    pub fn with_max_level(mut self, level: LevelFilter) -> Self {
        self.max_level = level;
        self
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Append a line, evicting the oldest once the buffer is full
    pub fn push(&self, line: LogLine) {
        let mut lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        while lines.len() >= self.capacity {
            lines.pop_front();
        }
        lines.push_back(line);
    }

    /// Snapshot of buffered lines, oldest first
    pub fn recent(&self) -> Vec<LogLine> {
        let lines = self.lines.lock().unwrap_or_else(|e| e.into_inner());
        lines.iter().cloned().collect()
    }

    pub fn clear(&self) {
        self.lines.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }
}

impl Log for RollingLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.max_level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = LogLine {
            at: Utc::now(),
            level: record.level(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        };
        emit(&self.app_name, &line);
        self.push(line);
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn emit(app_name: &str, line: &LogLine) {
    use wasm_bindgen::JsValue;

    let text = JsValue::from_str(&format!("[{}] {}", app_name, line.format()));
    match line.level {
        Level::Error => web_sys::console::error_1(&text),
        Level::Warn => web_sys::console::warn_1(&text),
        Level::Info => web_sys::console::info_1(&text),
        Level::Debug | Level::Trace => web_sys::console::debug_1(&text),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(app_name: &str, line: &LogLine) {
    eprintln!("[{}] {}", app_name, line.format());
}

static LOGGER: OnceLock<RollingLogger> = OnceLock::new();

/// Install the global logger. Only the first call takes effect.
pub fn init_logger(app_name: &str, capacity: usize) -> Result<&'static RollingLogger, SetLoggerError> {
    let logger = LOGGER.get_or_init(|| RollingLogger::new(app_name, capacity));
    log::set_logger(logger)?;
    log::set_max_level(logger.max_level);
    Ok(logger)
}

/// Lines buffered by the global logger (empty before `init_logger`)
pub fn recent_lines() -> Vec<LogLine> {
    LOGGER.get().map(|logger| logger.recent()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(message: &str) -> LogLine {
        LogLine {
            at: Utc::now(),
            level: Level::Info,
            target: "test".to_string(),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_buffer_evicts_oldest() {
        let logger = RollingLogger::new("Test", 3);
        for i in 0..5 {
            logger.push(line(&format!("line {}", i)));
        }

        let recent = logger.recent();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].message, "line 2");
        assert_eq!(recent[2].message, "line 4");
    }

    #[test]
    fn test_level_filter() {
        let logger = RollingLogger::new("Test", 10).with_max_level(LevelFilter::Warn);
        logger.log(
            &Record::builder()
                .level(Level::Info)
                .target("test")
                .args(format_args!("dropped"))
                .build(),
        );
        logger.log(
            &Record::builder()
                .level(Level::Error)
                .target("test")
                .args(format_args!("kept"))
                .build(),
        );

        let recent = logger.recent();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message, "kept");
        assert_eq!(recent[0].level, Level::Error);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let logger = RollingLogger::new("Test", 0);
        logger.push(line("a"));
        logger.push(line("b"));
        assert_eq!(logger.recent().len(), 1);

        logger.clear();
        assert!(logger.recent().is_empty());
    }

    #[test]
    fn test_format_contains_target_and_message() {
        let text = line("hello").format();
        assert!(text.contains("[test]"));
        assert!(text.ends_with("hello"));
    }
}
