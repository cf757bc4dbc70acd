//! Error types for the exporter.
//!
//! Only [`ExporterError`] ever reaches the binary. The collection errors are
//! absorbed by the collector and turned into log lines and gauge values.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The status document could not be read.
///
/// Missing file, permission problems and other I/O failures all collapse
/// into this one kind; the source is kept for logging only.
#[derive(Debug, Error)]
#[error("couldn't read summary file {}: {source}", .path.display())]
pub struct ReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// The status document was read but does not hold a usable record.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Malformed YAML or a field of the wrong type.
    #[error("summary file unmarshal error: {0}")]
    Syntax(#[from] serde_yaml::Error),
    /// `time.last_run` is absent or zero.
    #[error("summary file has no time.last_run")]
    MissingLastRun,
}

/// Either way the collector ends up without a valid record.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// The process table could not be enumerated.
#[derive(Debug, Error)]
#[error("couldn't list processes in {}: {source}", .path.display())]
pub struct ProbeError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Startup and serving failures.
#[derive(Debug, Error)]
pub enum ExporterError {
    #[error("metric registration failed: {0}")]
    Metrics(#[from] prometheus::Error),

    #[error("invalid listen address {addr:?}: {source}")]
    ListenAddr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("can't bind on {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}
