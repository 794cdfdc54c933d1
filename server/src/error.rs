//! Error types for the worker service.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("wire error: {0}")]
    Wire(#[from] matmul_types::WireError),

    #[error("compute task failed: {0}")]
    Compute(#[from] tokio::task::JoinError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}
