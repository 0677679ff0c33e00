//! Process-wide debug logger
//!
//! Keeps the most recent entries in a ring buffer and, once `init` has been
//! called, appends every entry to `debug.log` in the data directory. The TUI
//! owns the terminal, so nothing here ever writes to stdout or stderr.
//!
//! The logger is also installed as the `log` facade backend, so records from
//! dependencies end up in the same file.

use chrono::Local;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;

pub struct DebugLogEntry {
    pub timestamp: String,
    pub level: String,
    pub module: String,
    pub message: String,
}

impl DebugLogEntry {
    fn line(&self) -> String {
        format!(
            "[{}] [{}] [{}] {}",
            self.timestamp, self.level, self.module, self.message
        )
    }
}

pub struct DebugLogger {
    ring_buffer: VecDeque<DebugLogEntry>,
    max_entries: usize,
    file_path: Option<PathBuf>,
}

static LOGGER: OnceLock<Mutex<DebugLogger>> = OnceLock::new();
static FACADE: Facade = Facade;
static MAX_LEVEL: OnceLock<log::LevelFilter> = OnceLock::new();

fn get_logger() -> &'static Mutex<DebugLogger> {
    LOGGER.get_or_init(|| Mutex::new(DebugLogger::new(1000)))
}

impl DebugLogger {
    pub fn new(max_entries: usize) -> Self {
        Self {
            ring_buffer: VecDeque::with_capacity(max_entries),
            max_entries,
            file_path: None,
        }
    }

    pub fn set_file_path(&mut self, path: PathBuf) {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        self.file_path = Some(path);
    }

    pub fn log(&mut self, level: &str, module: &str, message: &str) {
        let entry = DebugLogEntry {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            level: level.to_string(),
            module: module.to_string(),
            message: message.to_string(),
        };

        if let Some(path) = &self.file_path {
            if let Ok(mut file) = OpenOptions::new().create(true).append(true).open(path) {
                let _ = writeln!(file, "{}", entry.line());
            }
        }

        if self.ring_buffer.len() >= self.max_entries {
            self.ring_buffer.pop_front();
        }
        self.ring_buffer.push_back(entry);
    }

    pub fn get_recent(&self, n: usize) -> Vec<String> {
        self.ring_buffer
            .iter()
            .rev()
            .take(n)
            .map(DebugLogEntry::line)
            .collect()
    }
}

/// Bridges `log::info!` and friends into the debug logger.
struct Facade;

impl log::Log for Facade {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let level = record.level().as_str();
        let module = record.module_path().unwrap_or_else(|| record.target());
        get_logger()
            .lock()
            .log(level, module, &record.args().to_string());
    }

    fn flush(&self) {}
}

/// Point the logger at `<data_dir>/debug.log` and install the `log` facade.
///
/// Safe to call more than once; only the first facade install takes effect.
pub fn init(data_dir: PathBuf, level: log::LevelFilter) {
    get_logger().lock().set_file_path(data_dir.join("debug.log"));
    let _ = MAX_LEVEL.set(level);
    if log::set_logger(&FACADE).is_ok() {
        log::set_max_level(level);
    }
}

pub fn log(level: &str, module: &str, message: impl Into<String>) {
    // Everything is kept until init sets a level
    if let (Some(max), Ok(level)) = (MAX_LEVEL.get(), level.parse::<log::Level>()) {
        if level > *max {
            return;
        }
    }
    get_logger().lock().log(level, module, &message.into());
}

pub fn get_recent_logs(n: usize) -> Vec<String> {
    get_logger().lock().get_recent(n)
}

#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::logger::log("DEBUG", module_path!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        $crate::logger::log("INFO", module_path!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! error_log {
    ($($arg:tt)*) => {
        $crate::logger::log("ERROR", module_path!(), format!($($arg)*));
    };
}
