use std::path::PathBuf;
use thiserror::Error;

/// Failures opening the mesh membership store. Either one fails the query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("{} not found", .path.display())]
    NotFound { path: PathBuf },

    #[error("Failed to open {}: {reason}", .path.display())]
    Unreadable { path: PathBuf, reason: String },
}

impl StoreError {
    pub fn path(&self) -> &PathBuf {
        match self {
            StoreError::NotFound { path } | StoreError::Unreadable { path, .. } => path,
        }
    }
}

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Mesh store error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("{0}: no next stage found")]
    NoNextStage(&'static str),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("Transport error with {server}: {reason}")]
    Transport { server: String, reason: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// Whether the failure comes from the client's request rather than from
    /// this server or anything behind it.
    pub fn is_client_error(&self) -> bool {
        matches!(self, DomainError::MalformedQuery(_))
    }
}
