//! Error types for matrix-mul operations.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("dispatch error: {0}")]
    Dispatch(#[from] matmul_dispatch::Error),

    #[error("matrix error: {0}")]
    Matrix(#[from] matmul_types::Error),

    #[error("local worker thread {0} panicked")]
    ThreadPanicked(usize),

    #[error("baseline task failed: {0}")]
    Baseline(#[from] tokio::task::JoinError),

    #[error("{0} result differs from the serial result")]
    Mismatch(String),
}
