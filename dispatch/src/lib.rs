//! Coordinator for distributed matrix multiplication.
//!
//! `matmul-dispatch` computes `C = A × B` across a fixed list of remote
//! workers. Each call:
//!
//! 1. splits A into row bands (and, with [`SplitStrategy::RowAndColumn`], B
//!    into column blocks) using the front-loaded planner
//! 2. opens one TCP connection per worker and exchanges one framed request and
//!    one framed response on it, all workers concurrently
//! 3. waits for every worker, then stacks the partial products in worker order
//!
//! The result is element-for-element equal to [`matmul_types::multiply`] on
//! the same inputs.
//!
//! # Example
//!
//! ```no_run
//! use matmul_dispatch::Coordinator;
//! use matmul_types::Matrix;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coordinator = Coordinator::new(["127.0.0.1:5001", "127.0.0.1:5002"]);
//!
//!     let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]])?;
//!     let b = Matrix::identity(2);
//!     let c = coordinator.distributed_multiply(&a, &b).await?;
//!     assert_eq!(c, a);
//!     Ok(())
//! }
//! ```

mod assembly;
mod coordinator;
mod error;
mod planner;
mod strategy;

pub use assembly::ResultAssembly;
pub use coordinator::{Coordinator, WorkerAddr};
pub use error::Error;
pub use planner::{partition_ranges, partition_sizes, plan_column_split, plan_row_split};
pub use strategy::SplitStrategy;
