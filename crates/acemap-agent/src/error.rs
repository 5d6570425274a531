//! Error types for the Acemap query agent.
//!
//! None of these reach the caller of the pipeline. Each collaborator
//! boundary turns them into its documented fallback, so the variants only
//! need to carry enough to make the warning log useful.

use std::path::PathBuf;
use std::time::Duration;

/// Failure talking to the completion or search service.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Connection, DNS or TLS failure, or an unreadable body.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// Retry middleware gave up or failed internally.
    #[error("retry middleware: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// 429 from upstream.
    #[error("throttled by upstream, retry in {}s", retry_after.as_secs())]
    Throttled {
        /// Wait suggested by `Retry-After`
        retry_after: Duration,
    },

    /// 401 or 403: key missing, wrong or out of quota.
    #[error("credentials rejected ({status}): {body}")]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// 5xx from upstream.
    #[error("upstream unavailable ({status}): {body}")]
    Unavailable {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// Any other non-success status.
    #[error("unexpected status {status}: {body}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body
        body: String,
    },

    /// No response within the configured timeout.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// Body was not the expected JSON.
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Completion service answered without any choice.
    #[error("completion returned no choices")]
    EmptyCompletion,
}

impl ClientError {
    /// Classify a non-success status. `body` is the response text, if any.
    #[must_use]
    pub fn from_status(status: u16, retry_after: Option<u64>, body: String) -> Self {
        match status {
            429 => Self::Throttled { retry_after: Duration::from_secs(retry_after.unwrap_or(60)) },
            401 | 403 => Self::Rejected { status, body },
            500..=599 => Self::Unavailable { status, body },
            _ => Self::Status { status, body },
        }
    }

    /// Whether the same request could succeed later unchanged.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Throttled { .. } | Self::Unavailable { .. } | Self::Timeout(_))
    }

    /// HTTP status behind the error, if there was a response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Throttled { .. } => Some(429),
            Self::Rejected { status, .. }
            | Self::Unavailable { status, .. }
            | Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Failure reading a vocabulary dataset.
#[derive(thiserror::Error, Debug)]
pub enum VocabularyError {
    /// File could not be opened or read
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Dataset path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Parquet decoding error
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    /// CSV decoding error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the dataset schema
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        /// Column name
        column: String,
        /// Dataset path
        path: PathBuf,
    },

    /// File extension is neither `.parquet` nor `.csv`
    #[error("Unsupported vocabulary format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl VocabularyError {
    /// I/O error bound to a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::MissingColumn { column: column.into(), path: path.into() }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub type VocabularyResult<T> = Result<T, VocabularyError>;
