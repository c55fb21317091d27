//! Tracing setup for the command-line front end

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// File name used when `--log-file` names a directory
pub const LOG_FILE_NAME: &str = "crosscheck.log";
/// Size past which the log is rolled over at startup
const ROLL_AT_BYTES: u64 = 5 * 1024 * 1024;
/// Rolled generations kept next to the active log, `.1` being the newest
const KEPT_GENERATIONS: u32 = 3;

/// `--log-file` may name a file or an existing directory
pub fn resolve_log_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(LOG_FILE_NAME)
    } else {
        path.to_path_buf()
    }
}

fn generation_path(log_path: &Path, generation: u32) -> PathBuf {
    let mut name = log_path.as_os_str().to_owned();
    name.push(format!(".{generation}"));
    PathBuf::from(name)
}

/// Move an oversized log to `<log>.1`, shifting older generations up by one.
///
/// The oldest generation is overwritten. Returns whether a roll happened.
fn roll_log_file(log_path: &Path) -> io::Result<bool> {
    match fs::metadata(log_path) {
        Ok(meta) if meta.len() > ROLL_AT_BYTES => {}
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    }
    for generation in (1..KEPT_GENERATIONS).rev() {
        let from = generation_path(log_path, generation);
        if from.exists() {
            fs::rename(&from, generation_path(log_path, generation + 1))?;
        }
    }
    fs::rename(log_path, generation_path(log_path, 1))?;
    Ok(true)
}

/// Default directive set: the CLI at `level`, the library quieter
pub fn default_filter(level: &str) -> String {
    format!("crosscheck={level},crosscheck_core=warn")
}

/// Initialize logging.
///
/// Without a log file, events go to stderr so stdout stays clean for reports
/// and JSON. With a log file, events are appended to it; a file past 5MB is
/// rolled to `<log>.1` first and at most three generations are kept.
/// `RUST_LOG` overrides `level`.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(level)));
    let registry = tracing_subscriber::registry().with(env_filter);

    let Some(log_file) = log_file else {
        registry
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_target(false)
                    .compact(),
            )
            .init();
        return Ok(());
    };

    let log_path = resolve_log_path(log_file);
    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let rolled = match roll_log_file(&log_path) {
        Ok(rolled) => rolled,
        Err(e) => {
            eprintln!("warning: could not roll {}: {e}", log_path.display());
            false
        }
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)?;
    registry
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true),
        )
        .init();
    tracing::info!(path = %log_path.display(), rolled, "logging to file");
    Ok(())
}
