//! Session log for the editor core.
//!
//! Nothing is written until the host calls [`init`] (default location) or
//! [`init_at`]; before that the `log_info!` / `log_warn!` / `log_err!`
//! macros cost one atomic load. The file is truncated on every init so it
//! only holds the latest session.
//!
//! Default location:
//!   Windows:  `%APPDATA%\pixelgrid\pixelgrid.log`
//!   Linux:    `~/.local/share/pixelgrid/pixelgrid.log`
//!   macOS:    `~/Library/Application Support/pixelgrid/pixelgrid.log`

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

struct Sink {
    path: PathBuf,
    file: Mutex<File>,
}

static SINK: OnceLock<Sink> = OnceLock::new();
static MIN_LEVEL: AtomicU8 = AtomicU8::new(Level::Info as u8);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Info = 0,
    Warn = 1,
    Error = 2,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }
}

/// Drop messages below `level` (e.g. `Warn` to hide per-edit chatter).
pub fn set_min_level(level: Level) {
    MIN_LEVEL.store(level as u8, Ordering::Relaxed);
}

pub fn is_initialized() -> bool {
    SINK.get().is_some()
}

pub fn log_path() -> Option<&'static Path> {
    SINK.get().map(|s| s.path.as_path())
}

pub fn write(level: Level, msg: &str) {
    if (level as u8) < MIN_LEVEL.load(Ordering::Relaxed) {
        return;
    }
    if let Some(sink) = SINK.get() {
        append(sink, &format!("[{}] [{}] {}", clock(), level.tag(), msg));
    }
}

fn append(sink: &Sink, line: &str) {
    if let Ok(mut file) = sink.file.lock() {
        let _ = writeln!(file, "{}", line);
    }
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, &format!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, &format!($($arg)*))
    };
}

/// Start logging to `<data dir>/pixelgrid/pixelgrid.log`. Failure to open
/// the file is reported on stderr and leaves logging disabled.
pub fn init() {
    if let Err(e) = init_at(&app_dir().join("pixelgrid.log")) {
        eprintln!("[logger] {}", e);
    }
}

/// Start logging to `path`, truncating it. Only the first successful call in
/// a process takes effect. Also mirrors panics into the log.
pub fn init_at(path: &Path) -> io::Result<()> {
    if is_initialized() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;

    let sink = Sink {
        path: path.to_path_buf(),
        file: Mutex::new(file),
    };
    if SINK.set(sink).is_err() {
        return Ok(());
    }

    if let Some(sink) = SINK.get() {
        append(sink, &format!("=== pixelgrid {} session, {} ===", env!("CARGO_PKG_VERSION"), epoch_label()));
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        if let Some(sink) = SINK.get() {
            append(sink, &format!("[{}] [PANIC] {}", clock(), info));
        }
        previous(info);
    }));
    Ok(())
}

/// `<data dir>/pixelgrid`, shared with the settings file.
pub(crate) fn app_dir() -> PathBuf {
    data_dir().join("pixelgrid")
}

fn data_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata);
        }
    }
    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library").join("Application Support");
        }
    }
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .or_else(|_| std::env::var("HOME").map(|h| PathBuf::from(h).join(".local").join("share")))
        .unwrap_or_else(|_| PathBuf::from("."))
}

/// UTC wall clock as HH:MM:SS.mmm
fn clock() -> String {
    let Ok(d) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return "--:--:--.---".to_string();
    };
    let secs = d.as_secs() % 86_400;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        d.subsec_millis()
    )
}

fn epoch_label() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| format!("unix {}", d.as_secs()))
        .unwrap_or_else(|_| "unknown time".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_are_silent_before_init() {
        assert!(!is_initialized());
        crate::log_info!("grid {}x{}", 6, 8);
        crate::log_err!("nothing to see");
        assert!(log_path().is_none());
    }

    #[test]
    fn clock_shape() {
        let ts = clock();
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }

    #[test]
    fn levels_order_by_severity() {
        assert!(Level::Info < Level::Warn && Level::Warn < Level::Error);
        assert_eq!(Level::Error.tag(), "ERROR");
    }
}
