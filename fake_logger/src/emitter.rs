//! The log emitter.
//!
//! The emitter does not coordinate with whatever reads the target file. On
//! every tick of a fixed interval it picks one line from its [`Catalog`] and
//! appends it to the target. The file is opened, written and closed on each
//! append so that a reader is free to move or truncate it between ticks.
//!
//! ## Metrics
//!
//! `lines_written`: Total lines appended
//! `bytes_written`: Total bytes appended, newlines included
//!
use std::path::{Path, PathBuf};

use fake_logger_signal::Watcher;
use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::{
    fs,
    io::AsyncWriteExt,
    time::{self, Duration, Instant, MissedTickBehavior},
};
use tracing::{debug, info};

use crate::{
    catalog::{Catalog, Entry},
    select::{Select, Uniform},
};

#[derive(thiserror::Error, Debug)]
/// Errors produced by [`Emitter`].
pub enum Error {
    /// The target file could not be opened or written.
    #[error("Failed to append to {path:?}: {source}")]
    Io {
        /// The target file
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },
    /// Failed to convert, value is 0
    #[error("Value provided must not be zero")]
    Zero,
}

/// Time between appends when none is configured.
pub const DEFAULT_INTERVAL_MILLISECONDS: u64 = 2_000;

fn default_interval_milliseconds() -> u64 {
    DEFAULT_INTERVAL_MILLISECONDS
}

#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(deny_unknown_fields)]
/// Configuration of [`Emitter`]
pub struct Config {
    /// The file lines are appended to. Created if absent.
    pub path: PathBuf,
    /// Time between appends. The first append happens one full interval
    /// after the emitter starts.
    #[serde(default = "default_interval_milliseconds")]
    pub interval_milliseconds: u64,
    /// The seed for line selection. Drawn from the thread-local generator if
    /// absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Config {
    /// Create a [`Config`] for `path` with the default two second interval
    /// and no fixed seed.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            interval_milliseconds: default_interval_milliseconds(),
            seed: None,
        }
    }
}

/// Append `line` and a trailing newline to the file at `path`, creating it if
/// necessary. The file handle is released before this function returns.
///
/// Returns the number of bytes appended.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened for append or the write
/// fails.
#[allow(clippy::cast_possible_truncation)]
pub async fn append_line(path: &Path, line: &str) -> Result<u64, Error> {
    let io_err = |source| Error::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut buf = String::with_capacity(line.len() + 1);
    buf.push_str(line);
    buf.push('\n');

    let mut fp = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await
        .map_err(io_err)?;
    fp.write_all(buf.as_bytes()).await.map_err(io_err)?;
    // tokio buffers writes on a blocking thread, flush to be sure the bytes
    // have reached the OS before the handle drops.
    fp.flush().await.map_err(io_err)?;

    Ok(buf.len() as u64)
}

#[derive(Debug)]
struct Appender<S> {
    path: PathBuf,
    catalog: Catalog,
    selector: S,
    lines_written: u64,
}

impl<S> Appender<S>
where
    S: Select,
{
    async fn emit(&mut self) -> Result<&'static Entry, Error> {
        let entry = self.selector.select(&self.catalog);
        let bytes = append_line(&self.path, &entry.line()).await?;

        counter!("lines_written").increment(1);
        counter!("bytes_written").increment(bytes);
        self.lines_written += 1;
        debug!(
            lines_written = self.lines_written,
            severity = %entry.severity,
            "appended line"
        );
        Ok(entry)
    }
}

#[derive(Debug)]
/// The log emitter.
///
/// Appends one line of its catalog to the target file per interval until the
/// shutdown signal is received.
pub struct Emitter<S = Uniform> {
    appender: Appender<S>,
    interval: Duration,
    shutdown: Watcher,
}

impl Emitter<Uniform> {
    /// Create a new [`Emitter`] over the default catalog, selecting lines
    /// uniformly at random. A `seed` in `config` makes the selection
    /// reproducible.
    ///
    /// # Errors
    ///
    /// Creation will fail if the configured interval is zero.
    pub fn from_config(config: Config, shutdown: Watcher) -> Result<Self, Error> {
        let selector = config
            .seed
            .map_or_else(Uniform::from_entropy, Uniform::seeded);
        Self::new(config, Catalog::default(), selector, shutdown)
    }
}

impl<S> Emitter<S>
where
    S: Select,
{
    /// Create a new [`Emitter`]
    ///
    /// Nothing touches the filesystem until the first append.
    ///
    /// # Errors
    ///
    /// Creation will fail if the configured interval is zero.
    pub fn new(
        config: Config,
        catalog: Catalog,
        selector: S,
        shutdown: Watcher,
    ) -> Result<Self, Error> {
        if config.interval_milliseconds == 0 {
            return Err(Error::Zero);
        }

        Ok(Self {
            appender: Appender {
                path: config.path,
                catalog,
                selector,
                lines_written: 0,
            },
            interval: Duration::from_millis(config.interval_milliseconds),
            shutdown,
        })
    }

    /// Perform a single append, skipping the wait.
    ///
    /// # Errors
    ///
    /// See [`append_line`].
    pub async fn emit_once(&mut self) -> Result<&'static Entry, Error> {
        self.appender.emit().await
    }

    /// Run [`Emitter`] until a shutdown signal is received.
    ///
    /// # Errors
    ///
    /// This function will terminate with an error on the first failed append,
    /// for instance if the target directory does not exist or is not
    /// writable. There is no retry.
    pub async fn spin(self) -> Result<(), Error> {
        let Self {
            mut appender,
            interval,
            shutdown,
        } = self;

        info!(
            path = %appender.path.display(),
            interval = ?interval,
            "emitter started"
        );

        // A slow append delays the schedule rather than causing a burst of
        // catch-up appends.
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let shutdown_wait = shutdown.recv();
        tokio::pin!(shutdown_wait);
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    appender.emit().await?;
                }
                () = &mut shutdown_wait => {
                    info!(lines_written = appender.lines_written, "shutdown signal received");
                    return Ok(());
                }
            }
        }
    }
}
