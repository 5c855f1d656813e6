//! Logging setup.
//!
//! The terminal belongs to the editor UI, so logs always go to a file.
//!
//! ## Environment Variables
//!
//! 1. **`KEYCHORD_LOG`** (highest priority) - e.g. `debug` or `keychord=trace`
//! 2. **`RUST_LOG`** - Standard tracing environment variable
//! 3. **Default** - `warn`
//!
//! ## Log File Location
//!
//! Default: `<data_local_dir>/keychord/logs/keychord-<pid>.log`.
//! Override with `KEYCHORD_LOG_FILE`.

use std::env;
use std::path::{Path, PathBuf};

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, EnvFilter};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Returned from [`init`]; must be held alive to ensure log file flushing.
pub struct LogGuard {
    _file_guard: WorkerGuard,
    pub log_file: PathBuf,
}

/// Initialize file logging.
///
/// Fails if a global subscriber is already installed.
pub fn init() -> Result<LogGuard, BoxError> {
    let log_file = resolve_log_file(env::var_os("KEYCHORD_LOG_FILE").map(PathBuf::from));
    let dir = log_file.parent().unwrap_or_else(|| Path::new("."));
    let filename = log_file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(default_filename);

    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, &filename);
    let (writer, file_guard) = tracing_appender::non_blocking(file_appender);

    fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_env_filter(create_filter())
        .try_init()?;

    Ok(LogGuard {
        _file_guard: file_guard,
        log_file,
    })
}

/// Initialize stdout logging for tests. Safe to call more than once.
pub fn test() {
    let _ = fmt()
        .with_env_filter(create_filter())
        .with_test_writer()
        .try_init();
}

fn default_filename() -> String {
    format!("keychord-{}.log", std::process::id())
}

fn resolve_log_file(override_path: Option<PathBuf>) -> PathBuf {
    if let Some(path) = override_path {
        if path.extension().is_some() {
            return path;
        }
        return path.join(default_filename());
    }

    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("keychord")
        .join("logs")
        .join(default_filename())
}

/// Priority: `KEYCHORD_LOG` > `RUST_LOG` > `warn`.
fn create_filter() -> EnvFilter {
    if let Ok(level) = env::var("KEYCHORD_LOG") {
        if level.contains('=') || level.contains(',') {
            return EnvFilter::new(level);
        }
        return EnvFilter::new(format!("warn,keychord={level}"));
    }

    if let Ok(rust_log) = env::var("RUST_LOG") {
        return EnvFilter::new(rust_log);
    }

    EnvFilter::new("warn")
}
