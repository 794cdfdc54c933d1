//! Worker side of distributed matrix multiplication.
//!
//! A worker listens on a TCP address and answers one framed [`Request`] per
//! connection with one framed [`Response`].
//!
//! [`Request`]: matmul_types::Request
//! [`Response`]: matmul_types::Response

mod error;
mod service;

pub use error::Error;
pub use service::{compute, WorkerService};

use tokio::net::TcpListener;

/// Binds `addr` and serves connections with `service` until the process exits.
pub async fn run(addr: &str, service: WorkerService) -> Result<(), Error> {
    let listener = TcpListener::bind(addr).await.map_err(|source| Error::Bind {
        addr: addr.to_string(),
        source,
    })?;
    service.serve(listener).await
}
