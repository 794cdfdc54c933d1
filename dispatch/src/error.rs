//! Error types for planning, dispatch and reassembly.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no workers configured")]
    NoWorkers,

    #[error("kernel error: {0}")]
    Kernel(#[from] matmul_types::Error),

    #[error("worker {worker} ({addr}) unreachable: {source}")]
    Connect {
        worker: usize,
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("worker {worker}: {source}")]
    Wire {
        worker: usize,
        #[source]
        source: matmul_types::WireError,
    },

    #[error("worker {worker} reported an error: {message}")]
    Remote { worker: usize, message: String },

    #[error("worker {worker} sent an unexpected response: {reason}")]
    UnexpectedResponse { worker: usize, reason: String },

    #[error("worker {worker} timed out after {after:?}")]
    Timeout { worker: usize, after: Duration },

    #[error("worker {worker} task failed: {source}")]
    TaskFailed {
        worker: usize,
        #[source]
        source: tokio::task::JoinError,
    },

    #[error("no result recorded for worker {0}")]
    MissingResult(usize),

    #[error("result for worker {0} recorded twice")]
    DuplicateResult(usize),

    #[error("unknown split strategy: {0}")]
    UnknownStrategy(String),
}

impl Error {
    /// Index of the worker this error belongs to, if any.
    pub fn worker(&self) -> Option<usize> {
        match self {
            Error::Connect { worker, .. }
            | Error::Wire { worker, .. }
            | Error::Remote { worker, .. }
            | Error::UnexpectedResponse { worker, .. }
            | Error::Timeout { worker, .. }
            | Error::TaskFailed { worker, .. } => Some(*worker),
            Error::MissingResult(worker) | Error::DuplicateResult(worker) => Some(*worker),
            Error::NoWorkers | Error::Kernel(_) | Error::UnknownStrategy(_) => None,
        }
    }
}
