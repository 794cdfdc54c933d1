use clap::Parser;
use tracing_subscriber::EnvFilter;

use matmul_types::DEFAULT_MAX_FRAME_LEN;
use matmul_worker::WorkerService;

/// Worker process for distributed matrix multiplication.
#[derive(Parser)]
#[command(name = "matmul-worker")]
#[command(version)]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "MATMUL_LISTEN", default_value = "127.0.0.1:5001")]
    listen: String,

    /// Name used in log lines (defaults to the listen address).
    #[arg(long, env = "MATMUL_WORKER_NAME")]
    name: Option<String>,

    /// Largest frame body accepted, in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_FRAME_LEN)]
    max_frame_bytes: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let name = args.name.unwrap_or_else(|| args.listen.clone());
    let service = WorkerService::new(name).with_max_frame_len(args.max_frame_bytes);

    matmul_worker::run(&args.listen, service).await?;

    Ok(())
}
