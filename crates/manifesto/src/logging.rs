use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const MEGABYTE: u64 = 1024 * 1024;

/// Size limits for the CLI log file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Size past which the file is trimmed
    pub max_bytes: u64,
    /// Bytes of recent history kept after trimming
    pub keep_bytes: u64,
}

impl Rotation {
    /// Caps the log at `megabytes`, keeping the most recent fifth
    pub fn from_megabytes(megabytes: u64) -> Self {
        let max_bytes = megabytes.max(1) * MEGABYTE;
        Self {
            max_bytes,
            keep_bytes: max_bytes / 5,
        }
    }

    /// Trims `log_path` to its last whole lines once it outgrows the cap.
    /// Returns whether the file was rewritten.
    fn apply(&self, log_path: &Path) -> io::Result<bool> {
        let len = match fs::metadata(log_path) {
            Ok(metadata) => metadata.len(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        };
        if len <= self.max_bytes {
            return Ok(false);
        }

        let mut tail = Vec::new();
        {
            let mut file = File::open(log_path)?;
            file.seek(SeekFrom::Start(len.saturating_sub(self.keep_bytes)))?;
            file.read_to_end(&mut tail)?;
        }
        let first_whole_line = tail.iter().position(|&b| b == b'\n').map_or(0, |i| i + 1);

        let mut file = File::create(log_path)?;
        writeln!(file, "--- manifesto log trimmed to the last {} bytes ---", self.keep_bytes)?;
        file.write_all(&tail[first_whole_line..])?;
        Ok(true)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::from_megabytes(5)
    }
}

/// Hands out writers to one shared, append-only log file
#[derive(Clone)]
struct LogWriterFactory {
    file: Arc<Mutex<File>>,
}

struct LogWriter {
    file: Arc<Mutex<File>>,
}

impl LogWriter {
    fn with_file<T>(&self, f: impl FnOnce(&mut File) -> io::Result<T>) -> io::Result<T> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| io::Error::other("log file lock poisoned"))?;
        f(&mut file)
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.with_file(|file| file.write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.with_file(|file| file.flush())
    }
}

impl<'a> MakeWriter<'a> for LogWriterFactory {
    type Writer = LogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LogWriter {
            file: Arc::clone(&self.file),
        }
    }
}

/// Initialize logging to stderr, or to `log_file` when given.
///
/// A log file is appended to and trimmed per `rotation` at startup.
/// `RUST_LOG` overrides `level`.
pub fn init_logging(
    log_file: Option<&Path>,
    level: &str,
    rotation: Rotation,
) -> color_eyre::Result<()> {
    let default_filter = format!("manifesto={level},manifesto_core={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let Some(log_path) = log_file else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .init();
        return Ok(());
    };

    if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let trimmed = rotation.apply(log_path).unwrap_or_else(|e| {
        eprintln!("Warning: failed to trim {}: {e}", log_path.display());
        false
    });

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;
    let writer_factory = LogWriterFactory {
        file: Arc::new(Mutex::new(file)),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer_factory)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();

    tracing::info!(log_path = %log_path.display(), trimmed, "Logging initialized");
    Ok(())
}
