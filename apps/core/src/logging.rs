use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};

use tracing_subscriber::EnvFilter;

const LOG_STEM: &str = "palette";
const MAX_LOG_BYTES: u64 = 1_000_000;
const KEPT_GENERATIONS: usize = 5;

static PANIC_HOOK: Once = Once::new();

#[derive(Debug, thiserror::Error)]
pub enum LoggingError {
    #[error("failed to prepare log file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),
    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

pub fn logs_dir() -> PathBuf {
    crate::config::stable_app_data_dir().join("logs")
}

/// Installs the global subscriber writing to `logs_dir()/palette.log`.
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init(default_filter: &str) -> Result<PathBuf, LoggingError> {
    init_in(&logs_dir(), default_filter)
}

pub fn init_in(log_dir: &Path, default_filter: &str) -> Result<PathBuf, LoggingError> {
    let log = RollingLog::open(log_dir, MAX_LOG_BYTES, KEPT_GENERATIONS)?;
    let log_path = log.path();

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_filter)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_target(true)
        .with_writer(Mutex::new(log))
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    PANIC_HOOK.call_once(route_panics_to_log);
    Ok(log_path)
}

/// Append-only log file. Once a write would push it past `max_bytes` it is
/// renamed to `palette.1.log`, older generations shift up by one, and the
/// generation past `generations` is deleted.
pub struct RollingLog {
    dir: PathBuf,
    file: File,
    written: u64,
    max_bytes: u64,
    generations: usize,
}

impl RollingLog {
    pub fn open(dir: &Path, max_bytes: u64, generations: usize) -> io::Result<Self> {
        fs::create_dir_all(dir)?;
        let file = open_append(&current_path(dir))?;
        let written = file.metadata()?.len();
        Ok(Self {
            dir: dir.to_path_buf(),
            file,
            written,
            max_bytes,
            generations,
        })
    }

    pub fn path(&self) -> PathBuf {
        current_path(&self.dir)
    }

    fn generation_path(&self, generation: usize) -> PathBuf {
        self.dir.join(format!("{LOG_STEM}.{generation}.log"))
    }

    fn roll(&mut self) -> io::Result<()> {
        self.file.flush()?;
        if self.generations == 0 {
            fs::remove_file(self.path())?;
        } else {
            remove_if_present(&self.generation_path(self.generations))?;
            for generation in (1..self.generations).rev() {
                let from = self.generation_path(generation);
                if from.exists() {
                    fs::rename(&from, self.generation_path(generation + 1))?;
                }
            }
            fs::rename(self.path(), self.generation_path(1))?;
        }
        self.file = open_append(&self.path())?;
        self.written = 0;
        Ok(())
    }
}

impl Write for RollingLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        // An oversized record still lands whole in a fresh file.
        if self.written > 0 && self.written + buf.len() as u64 > self.max_bytes {
            self.roll()?;
        }
        let written = self.file.write(buf)?;
        self.written += written as u64;
        Ok(written)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

fn current_path(dir: &Path) -> PathBuf {
    dir.join(format!("{LOG_STEM}.log"))
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(error) if error.kind() != io::ErrorKind::NotFound => Err(error),
        _ => Ok(()),
    }
}

fn route_panics_to_log() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(target: "panic", "{info}");
        previous(info);
    }));
}
