//! Error types for quizbench.
//!
//! Each failure class has its own enum so callers can decide between
//! aborting, degrading and re-prompting without string matching.

use std::path::PathBuf;

use thiserror::Error;

/// Structural violations in a question file. Always fatal for the whole parse.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A question line was not followed by an answer line.
    #[error("expected 'A:' after 'Q:' at line {line}, found {found:?}")]
    MalformedPair { line: usize, found: String },

    /// A question or answer line carried no text after its marker.
    #[error("empty {marker} text at line {line}")]
    EmptyText { line: usize, marker: &'static str },

    /// A question line appeared before any section marker.
    #[error("question at line {line} appears before any '###' section marker")]
    OrphanQuestion { line: usize },

    /// The question file could not be read.
    #[error("failed to read question file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that can occur when requesting a completion.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned a non-success response.
    #[error("API error (HTTP {status}): {message}")]
    Status { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Transport(String),

    /// The response body did not have the expected shape.
    #[error("unexpected response format: {0}")]
    ResponseShape(String),
}

impl ProviderError {
    /// Returns `true` if the remote payload, rather than the transport, was at fault.
    pub fn is_response_shape(&self) -> bool {
        matches!(self, ProviderError::ResponseShape(_))
    }
}

/// What happened to the backup after a failed write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// There was no previous file, so nothing needed restoring.
    NoBackup,
    /// The original file was put back from its backup.
    Restored,
    /// The backup could not be moved back into place.
    Failed(String),
}

impl std::fmt::Display for RestoreOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestoreOutcome::NoBackup => write!(f, "no backup to restore"),
            RestoreOutcome::Restored => write!(f, "restored original from backup"),
            RestoreOutcome::Failed(reason) => write!(f, "could not restore backup: {reason}"),
        }
    }
}

/// Reading or writing a result document failed.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not decode JSON from {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize result document: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("could not write to {} ({restore}): {source}", path.display())]
    Write {
        path: PathBuf,
        restore: RestoreOutcome,
        #[source]
        source: std::io::Error,
    },
}

/// An interactive choice that cannot be acted on. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserInputError {
    #[error("invalid input {0:?}")]
    InvalidChoice(String),

    #[error("number {index} is out of range (1-{len})")]
    OutOfRange { index: usize, len: usize },
}
