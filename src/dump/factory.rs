//! Factories that open one dump sink per outgoing transmission.

use std::fs::{self, OpenOptions};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::DumpConfig;
use crate::error::{DumpError, ValidationError};

use super::{NoopDumper, OutgoingDumper, StreamDumper};

const MAX_NAME_ATTEMPTS: u32 = 64;

/// Creates one dumper per outgoing transmission.
pub trait DumperFactory {
    /// Creates a dumper for the next transmission.
    ///
    /// # Errors
    ///
    /// Returns [`DumpError::Open`] if the dump sink cannot be opened.
    fn create(&self) -> Result<Box<dyn OutgoingDumper>, DumpError>;

    /// Like [`create`](Self::create), but falls back to a [`NoopDumper`] so a
    /// missing dump sink never stops a transmission.
    fn create_or_noop(&self) -> Box<dyn OutgoingDumper> {
        self.create().unwrap_or_else(|err| {
            warn!(error = %err, "outgoing dump unavailable; sending without dump");
            Box::new(NoopDumper)
        })
    }
}

/// Writes each transmission to its own file in a directory.
///
/// Files are named `{prefix}{yyyyMMdd-HHmmss-SSS}-{n}.{extension}`, where `n`
/// counts transmissions made through this factory. Existing files are never
/// overwritten: if the name is taken, for example by another factory writing
/// to the same directory, the next counter value is tried.
#[derive(Debug)]
pub struct DirectoryDumperFactory {
    directory: PathBuf,
    file_prefix: String,
    file_extension: String,
    counter: AtomicU64,
}

impl DirectoryDumperFactory {
    /// Creates a factory writing into `directory` with the default naming.
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        let defaults = DumpConfig::default();
        Self {
            directory: directory.into(),
            file_prefix: defaults.file_prefix,
            file_extension: defaults.file_extension,
            counter: AtomicU64::new(0),
        }
    }

    /// Creates a factory from configuration.
    ///
    /// Returns `Ok(None)` when dumping is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidConfig`] if the configuration is
    /// invalid.
    pub fn from_config(config: &DumpConfig) -> Result<Option<Self>, ValidationError> {
        config.validate()?;
        if !config.enabled {
            return Ok(None);
        }
        Ok(Some(Self {
            directory: config.directory.clone(),
            file_prefix: config.file_prefix.clone(),
            file_extension: config.file_extension.clone(),
            counter: AtomicU64::new(0),
        }))
    }

    /// The directory dump files are written to.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn next_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        let stamp = Utc::now().format("%Y%m%d-%H%M%S-%3f");
        self.directory.join(format!(
            "{}{stamp}-{n}.{}",
            self.file_prefix, self.file_extension
        ))
    }
}

impl DumperFactory for DirectoryDumperFactory {
    fn create(&self) -> Result<Box<dyn OutgoingDumper>, DumpError> {
        fs::create_dir_all(&self.directory).map_err(|source| DumpError::Open {
            path: self.directory.clone(),
            source,
        })?;

        let mut attempts = 0;
        loop {
            let path = self.next_path();
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => {
                    debug!(path = %path.display(), "dumping outgoing transmission");
                    return Ok(Box::new(StreamDumper::new(BufWriter::new(file))));
                }
                Err(err) if err.kind() == io::ErrorKind::AlreadyExists && attempts < MAX_NAME_ATTEMPTS => {
                    attempts += 1;
                    debug!(path = %path.display(), "dump file name taken; trying the next one");
                }
                Err(source) => return Err(DumpError::Open { path, source }),
            }
        }
    }
}
