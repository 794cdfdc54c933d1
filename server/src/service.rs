use futures_util::StreamExt;
use matmul_types::{multiply, FrameCodec, Request, Response};
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio_stream::wrappers::TcpListenerStream;

use crate::Error;

/// A worker that multiplies matrix partitions sent by a coordinator.
///
/// Each accepted connection carries exactly one exchange:
///
/// 1. read one [`Request`] frame
/// 2. multiply the left operand by every right operand, in order
/// 3. write one [`Response`] frame with the blocks in the same order
/// 4. close the connection
///
/// Connections are served one at a time. A failed connection is logged and
/// dropped; the listener keeps accepting.
#[derive(Debug, Clone)]
pub struct WorkerService {
    name: String,
    codec: FrameCodec,
}

impl WorkerService {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            codec: FrameCodec::new(),
        }
    }

    pub fn with_max_frame_len(mut self, max_frame_len: u64) -> Self {
        self.codec = self.codec.with_max_frame_len(max_frame_len);
        self
    }

    /// Runs the accept loop until the listener stops yielding connections.
    pub async fn serve(&self, listener: TcpListener) -> Result<(), Error> {
        let local = listener.local_addr()?;
        tracing::info!(worker = %self.name, addr = %local, "waiting for connections");

        let mut incoming = TcpListenerStream::new(listener);
        while let Some(conn) = incoming.next().await {
            match conn {
                Ok(stream) => {
                    let peer = stream
                        .peer_addr()
                        .map(|a| a.to_string())
                        .unwrap_or_else(|_| "unknown".to_string());
                    tracing::info!(worker = %self.name, %peer, "connected");

                    if let Err(e) = self.handle_connection(stream).await {
                        tracing::warn!(
                            worker = %self.name,
                            %peer,
                            error = %e,
                            "connection aborted"
                        );
                    }
                }
                Err(e) => {
                    tracing::warn!(worker = %self.name, error = %e, "accept failed");
                }
            }
        }

        Ok(())
    }

    /// Serves a single request/response exchange on `stream`.
    ///
    /// The stream is closed when this returns, whether or not it succeeded.
    pub async fn handle_connection(&self, mut stream: TcpStream) -> Result<(), Error> {
        let request: Request = self.codec.read(&mut stream).await?;
        tracing::info!(
            worker = %self.name,
            left = ?request.left.shape(),
            products = request.right.len(),
            "computing partial products"
        );

        let response = tokio::task::spawn_blocking(move || compute(&request)).await?;
        if let Response::Error(message) = &response {
            tracing::warn!(worker = %self.name, error = %message, "kernel rejected request");
        }

        self.codec.write(&mut stream, &response).await?;
        stream.shutdown().await?;
        Ok(())
    }
}

/// Multiplies the request's left operand by each right operand, keeping order.
pub fn compute(request: &Request) -> Response {
    let blocks = request
        .right
        .iter()
        .map(|right| multiply(&request.left, right))
        .collect::<Result<Vec<_>, _>>();

    match blocks {
        Ok(blocks) => Response::Product(blocks),
        Err(e) => Response::Error(e.to_string()),
    }
}
