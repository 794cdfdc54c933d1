use std::time::Duration;

use clap::Parser;
use matmul_dispatch::SplitStrategy;
use matrix_mul::RunConfig;
use tracing_subscriber::EnvFilter;

/// Compare serial, local-parallel and distributed matrix multiplication.
///
/// Start the workers first, e.g.
/// `matmul-worker --listen 127.0.0.1:5001 --name "worker 1"` and
/// `matmul-worker --listen 127.0.0.1:5002 --name "worker 2"`.
#[derive(Parser)]
#[command(name = "matrix-mul")]
#[command(version)]
struct Args {
    /// Side length of the square input matrices.
    #[arg(short = 'n', long, default_value_t = 1200)]
    size: usize,

    /// Seed for the random input matrices.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Entries are drawn from 0..max-value.
    #[arg(long, default_value_t = 10)]
    max_value: i64,

    /// Comma-separated worker addresses, in worker-index order.
    #[arg(
        long,
        env = "MATMUL_WORKERS",
        value_delimiter = ',',
        default_value = "127.0.0.1:5001,127.0.0.1:5002"
    )]
    workers: Vec<String>,

    /// Partitioning scheme: row-only or row-and-column.
    #[arg(long, env = "MATMUL_STRATEGY", default_value = "row-and-column")]
    strategy: SplitStrategy,

    /// Per-worker timeout in milliseconds (no timeout when unset).
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Only run the serial and local-parallel methods.
    #[arg(long)]
    skip_distributed: bool,
}

impl From<Args> for RunConfig {
    fn from(args: Args) -> Self {
        RunConfig {
            size: args.size,
            seed: args.seed,
            max_value: args.max_value,
            workers: args.workers,
            strategy: args.strategy,
            timeout: args.timeout_ms.map(Duration::from_millis),
            skip_distributed: args.skip_distributed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = RunConfig::from(Args::parse());
    println!(
        "Multiplying two {}x{} matrices (seed {}, {} workers, {} split)",
        config.size,
        config.size,
        config.seed,
        config.workers.len(),
        config.strategy
    );

    let report = matrix_mul::run(&config).await?;
    println!();
    println!("{}", report);

    let mismatches = report.mismatches();
    if let Some(method) = mismatches.first() {
        return Err(matrix_mul::Error::Mismatch(method.to_string()).into());
    }

    Ok(())
}
