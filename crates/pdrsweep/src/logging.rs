use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file size that triggers truncation on startup (5 MB)
const MAX_LOG_SIZE: u64 = 5 * 1024 * 1024;
/// Tail retained after truncation (1 MB)
const KEEP_SIZE: u64 = 1024 * 1024;

const ROTATION_MARKER: &[u8] = b"--- Log rotated (older entries removed) ---\n";

/// Truncate `log_path` to its last `keep` bytes once it grows past `max`.
///
/// The retained tail starts on a line boundary. Returns whether the file was
/// rewritten.
fn truncate_log(log_path: &Path, max: u64, keep: u64) -> io::Result<bool> {
    let len = match fs::metadata(log_path) {
        Ok(metadata) => metadata.len(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };
    if len <= max {
        return Ok(false);
    }

    let mut tail = Vec::new();
    {
        let mut file = File::open(log_path)?;
        file.seek(SeekFrom::Start(len.saturating_sub(keep)))?;
        file.read_to_end(&mut tail)?;
    }

    let line_start = tail
        .iter()
        .position(|&b| b == b'\n')
        .map_or(0, |i| i + 1);

    let mut file = File::create(log_path)?;
    file.write_all(ROTATION_MARKER)?;
    file.write_all(&tail[line_start..])?;
    Ok(true)
}

/// Log file handle shared by every writer the subscriber makes
#[derive(Clone)]
struct SharedLogFile(Arc<Mutex<File>>);

impl SharedLogFile {
    fn new(file: File) -> Self {
        Self(Arc::new(Mutex::new(file)))
    }

    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .0
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for SharedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(File::flush)
    }
}

impl<'a> MakeWriter<'a> for SharedLogFile {
    type Writer = SharedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

fn env_filter(level: &str) -> EnvFilter {
    let default_filter = format!("pdrsweep={level},pdrsweep_core={level}");
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter))
}

/// Initialize logging.
///
/// Logs go to stderr unless `log_file` is given, in which case they are
/// appended to that file with size-based rotation: past 5MB only the last
/// 1MB is kept. `RUST_LOG` overrides `level` when set.
pub fn init_logging(log_file: Option<&Path>, level: &str) -> color_eyre::Result<()> {
    match log_file {
        Some(log_path) => {
            if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }

            let rotated = match truncate_log(log_path, MAX_LOG_SIZE, KEEP_SIZE) {
                Ok(rotated) => rotated,
                Err(e) => {
                    eprintln!("warning: failed to rotate {}: {e}", log_path.display());
                    false
                }
            };

            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?;

            tracing_subscriber::registry()
                .with(env_filter(level))
                .with(
                    fmt::layer()
                        .with_writer(SharedLogFile::new(file))
                        .with_ansi(false)
                        .with_target(true)
                        .with_thread_ids(false),
                )
                .try_init()?;

            tracing::info!(path = %log_path.display(), rotated, "logging to file");
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter(level))
                .with(fmt::layer().with_writer(io::stderr).with_target(true))
                .try_init()?;
        }
    }
    Ok(())
}
