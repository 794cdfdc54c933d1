//! Serial vs. local-parallel vs. distributed matrix multiplication.
//!
//! `matrix-mul` generates two seeded random square matrices, multiplies them
//! three ways, checks that the local-parallel and distributed results are
//! bit-exact with the serial one, and reports timings.
//!
//! # Example
//!
//! ```no_run
//! use matrix_mul::RunConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig {
//!         size: 200,
//!         ..RunConfig::default()
//!     };
//!     let report = matrix_mul::run(&config).await?;
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```

mod baseline;
mod error;
mod report;

pub use baseline::{parallel_local, random_matrix, serial};
pub use error::Error;
pub use report::{Entry, Outcome, Report};

use std::sync::Arc;
use std::time::{Duration, Instant};

use matmul_dispatch::{Coordinator, SplitStrategy};
use matmul_types::Matrix;
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Parameters of one comparison run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Side length of the square input matrices.
    pub size: usize,
    pub seed: u64,
    /// Entries are drawn from `0..max_value`.
    pub max_value: i64,
    pub workers: Vec<String>,
    pub strategy: SplitStrategy,
    pub timeout: Option<Duration>,
    pub skip_distributed: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            size: 1200,
            seed: 0,
            max_value: 10,
            workers: vec!["127.0.0.1:5001".to_string(), "127.0.0.1:5002".to_string()],
            strategy: SplitStrategy::RowAndColumn,
            timeout: None,
            skip_distributed: false,
        }
    }
}

/// Runs all three methods and returns the comparison.
///
/// A distributed failure is recorded in the report rather than returned, so
/// the baseline timings are still shown when workers are down.
pub async fn run(config: &RunConfig) -> Result<Report, Error> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let a = Arc::new(random_matrix(&mut rng, config.size, config.size, config.max_value));
    let b = Arc::new(random_matrix(&mut rng, config.size, config.size, config.max_value));
    let units = config.workers.len().max(1);
    tracing::info!(size = config.size, seed = config.seed, units, "matrices generated");

    let (expected, elapsed) = timed_blocking(&a, &b, serial).await?;
    tracing::info!(?elapsed, "serial run complete");
    let mut report = Report::new(elapsed, units);

    let (parallel, elapsed) =
        timed_blocking(&a, &b, move |a, b| parallel_local(a, b, units)).await?;
    tracing::info!(?elapsed, threads = units, "local parallel run complete");
    report.record(
        "Parallel (local)",
        Outcome::Completed {
            elapsed,
            matches_serial: parallel == expected,
        },
    );

    let method = format!("Distributed ({} workers)", config.workers.len());
    if config.skip_distributed {
        report.record(method, Outcome::Skipped);
        return Ok(report);
    }

    let mut coordinator =
        Coordinator::new(config.workers.iter().cloned()).with_strategy(config.strategy);
    if let Some(timeout) = config.timeout {
        coordinator = coordinator.with_timeout(timeout);
    }

    let started = Instant::now();
    match coordinator.distributed_multiply(&a, &b).await {
        Ok(distributed) => {
            let elapsed = started.elapsed();
            tracing::info!(?elapsed, strategy = %config.strategy, "distributed run complete");
            report.record(
                method,
                Outcome::Completed {
                    elapsed,
                    matches_serial: distributed == expected,
                },
            );
        }
        Err(e) => {
            tracing::error!(error = %e, "distributed run failed");
            report.record(method, Outcome::Failed(e.to_string()));
        }
    }

    Ok(report)
}

/// Runs `f(a, b)` on the blocking pool and times it there.
async fn timed_blocking<F>(
    a: &Arc<Matrix>,
    b: &Arc<Matrix>,
    f: F,
) -> Result<(Matrix, Duration), Error>
where
    F: FnOnce(&Matrix, &Matrix) -> Result<Matrix, Error> + Send + 'static,
{
    let (a, b) = (Arc::clone(a), Arc::clone(b));
    let (product, elapsed) = tokio::task::spawn_blocking(move || {
        let started = Instant::now();
        let product = f(&a, &b);
        (product, started.elapsed())
    })
    .await?;
    Ok((product?, elapsed))
}
