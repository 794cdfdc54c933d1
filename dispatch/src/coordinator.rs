//! Fan-out / fan-in of partitions across remote workers.

use std::fmt;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

use futures_util::future::join_all;
use matmul_types::{FrameCodec, Matrix, Request, Response};
use tokio::net::TcpStream;
use tracing::Instrument;

use crate::Error;
use crate::assembly::ResultAssembly;
use crate::strategy::SplitStrategy;

/// Computes `A × B` by sending one partition to each configured worker.
///
/// Every call opens a fresh connection per worker, runs all round-trips
/// concurrently, waits for all of them, and only then stacks the partial
/// results in worker order. Any failed worker fails the whole call; there
/// is no partial result and no retry.
///
/// # Example
///
/// ```no_run
/// use matmul_dispatch::{Coordinator, SplitStrategy};
/// use matmul_types::Matrix;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let coordinator = Coordinator::new(["127.0.0.1:5001", "127.0.0.1:5002"])
///         .with_strategy(SplitStrategy::RowOnly);
///
///     let a = Matrix::new(4, 4, (0..16).collect())?;
///     let c = coordinator.distributed_multiply(&a, &Matrix::identity(4)).await?;
///     assert_eq!(c, a);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Coordinator {
    workers: Vec<WorkerAddr>,
    strategy: SplitStrategy,
    timeout: Option<Duration>,
    codec: FrameCodec,
}

impl Coordinator {
    pub fn new<I, A>(workers: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<WorkerAddr>,
    {
        Self {
            workers: workers.into_iter().map(Into::into).collect(),
            strategy: SplitStrategy::default(),
            timeout: None,
            codec: FrameCodec::new(),
        }
    }

    pub fn with_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Bounds each worker's connect + send + receive. Expiry fails that worker.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_max_frame_len(mut self, max_frame_len: u64) -> Self {
        self.codec = self.codec.with_max_frame_len(max_frame_len);
        self
    }

    pub async fn distributed_multiply(&self, a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
        let k = self.workers.len();
        if k == 0 {
            return Err(Error::NoWorkers);
        }
        if a.cols() != b.rows() {
            return Err(matmul_types::Error::DimensionMismatch(
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols(),
            )
            .into());
        }

        let requests = self.strategy.plan(a, b, k)?;
        let expected_blocks = self.strategy.blocks_per_worker(k);
        tracing::debug!(
            strategy = %self.strategy,
            workers = k,
            a = ?a.shape(),
            b = ?b.shape(),
            "dispatching partitions"
        );

        let handles: Vec<_> = requests
            .into_iter()
            .zip(&self.workers)
            .enumerate()
            .map(|(index, (request, addr))| {
                let span = tracing::info_span!("worker", index, addr = %addr);
                tokio::spawn(
                    exchange(
                        index,
                        addr.clone(),
                        request,
                        expected_blocks,
                        self.codec,
                        self.timeout,
                    )
                    .instrument(span),
                )
            })
            .collect();

        // Barrier: every task finishes before any result is looked at.
        let outcomes = join_all(handles).await;

        let mut assembly = ResultAssembly::new(k);
        let mut first_error = None;
        for (index, outcome) in outcomes.into_iter().enumerate() {
            let result = outcome
                .map_err(|source| Error::TaskFailed {
                    worker: index,
                    source,
                })
                .and_then(|result| result)
                .and_then(|blocks| assembly.fill(index, blocks));

            if let Err(e) = result {
                tracing::warn!(worker = index, error = %e, "worker failed");
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }
        assembly.into_matrix()
    }
}

/// One worker's round-trip, optionally bounded by `timeout`.
async fn exchange(
    index: usize,
    addr: WorkerAddr,
    request: Request,
    expected_blocks: usize,
    codec: FrameCodec,
    timeout: Option<Duration>,
) -> Result<Vec<Matrix>, Error> {
    let started = Instant::now();
    let blocks = match timeout {
        Some(after) => tokio::time::timeout(after, round_trip(index, &addr, &request, codec))
            .await
            .map_err(|_| Error::Timeout {
                worker: index,
                after,
            })??,
        None => round_trip(index, &addr, &request, codec).await?,
    };

    check_shapes(index, &request, expected_blocks, &blocks)?;
    tracing::debug!(elapsed = ?started.elapsed(), "partition complete");
    Ok(blocks)
}

async fn round_trip(
    index: usize,
    addr: &WorkerAddr,
    request: &Request,
    codec: FrameCodec,
) -> Result<Vec<Matrix>, Error> {
    let mut stream = TcpStream::connect(addr.as_str())
        .await
        .map_err(|source| Error::Connect {
            worker: index,
            addr: addr.to_string(),
            source,
        })?;

    let wire = |source| Error::Wire {
        worker: index,
        source,
    };
    codec.write(&mut stream, request).await.map_err(wire)?;
    let response: Response = codec.read(&mut stream).await.map_err(wire)?;

    match response {
        Response::Product(blocks) => Ok(blocks),
        Response::Error(message) => Err(Error::Remote {
            worker: index,
            message,
        }),
    }
}

/// There must be `expected` blocks, and block `j` must be
/// `left.rows × right[j].cols`.
fn check_shapes(
    index: usize,
    request: &Request,
    expected: usize,
    blocks: &[Matrix],
) -> Result<(), Error> {
    if blocks.len() != expected {
        return Err(Error::UnexpectedResponse {
            worker: index,
            reason: format!("expected {} blocks, got {}", expected, blocks.len()),
        });
    }
    for (j, (block, right)) in blocks.iter().zip(&request.right).enumerate() {
        let expected = (request.left.rows(), right.cols());
        if block.shape() != expected {
            return Err(Error::UnexpectedResponse {
                worker: index,
                reason: format!(
                    "block {} is {}x{}, expected {}x{}",
                    j,
                    block.rows(),
                    block.cols(),
                    expected.0,
                    expected.1
                ),
            });
        }
    }
    Ok(())
}

/// Address of a worker, as `host:port`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerAddr(pub String);

impl WorkerAddr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WorkerAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for WorkerAddr {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for WorkerAddr {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<SocketAddr> for WorkerAddr {
    fn from(addr: SocketAddr) -> Self {
        Self(addr.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_workers() {
        let coordinator = Coordinator::new(Vec::<WorkerAddr>::new());
        let err = coordinator
            .distributed_multiply(&Matrix::identity(2), &Matrix::identity(2))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NoWorkers));
    }

    #[tokio::test]
    async fn test_dimension_mismatch_fails_before_dispatch() {
        // Nothing listens here; a dispatch attempt would surface as Connect.
        let coordinator = Coordinator::new(["127.0.0.1:1"]);
        let err = coordinator
            .distributed_multiply(&Matrix::zeros(2, 3), &Matrix::zeros(2, 3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Kernel(matmul_types::Error::DimensionMismatch(2, 3, 2, 3))
        ));
    }

    #[test]
    fn test_check_shapes() {
        let request = Request {
            left: Matrix::zeros(2, 3),
            right: vec![Matrix::zeros(3, 1), Matrix::zeros(3, 2)],
        };
        let good = [Matrix::zeros(2, 1), Matrix::zeros(2, 2)];
        assert!(check_shapes(0, &request, 2, &good).is_ok());

        let err = check_shapes(1, &request, 2, &[Matrix::zeros(2, 1)]).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse { worker: 1, .. }));

        let bad = [Matrix::zeros(2, 1), Matrix::zeros(1, 2)];
        let err = check_shapes(1, &request, 2, &bad).unwrap_err();
        assert!(matches!(err, Error::UnexpectedResponse { worker: 1, .. }));
    }

    #[test]
    fn test_block_count_comes_from_strategy() {
        let request = Request {
            left: Matrix::zeros(1, 2),
            right: vec![Matrix::zeros(2, 2)],
        };
        let expected = SplitStrategy::RowAndColumn.blocks_per_worker(3);
        let err = check_shapes(0, &request, expected, &[Matrix::zeros(1, 2)]).unwrap_err();
        match err {
            Error::UnexpectedResponse { worker, reason } => {
                assert_eq!(worker, 0);
                assert_eq!(reason, "expected 3 blocks, got 1");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
