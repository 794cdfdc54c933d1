//! How a product `A × B` is cut into per-worker requests.

use std::fmt;
use std::str::FromStr;

use matmul_types::{Matrix, Request};

use crate::Error;
use crate::planner::{plan_column_split, plan_row_split};

/// Partitioning scheme for a distributed multiply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitStrategy {
    /// Worker `i` gets row band `i` of A and all of B, and returns one block.
    RowOnly,
    /// Worker `i` gets row band `i` of A and every column block of B, and
    /// returns one block per column block. The blocks of a worker form one
    /// row band of the result when placed side by side.
    #[default]
    RowAndColumn,
}

impl SplitStrategy {
    /// Builds one request per worker, indexed like the worker list.
    pub fn plan(&self, a: &Matrix, b: &Matrix, workers: usize) -> Result<Vec<Request>, Error> {
        let bands = plan_row_split(a, workers)?;
        let right = match self {
            SplitStrategy::RowOnly => vec![b.clone()],
            SplitStrategy::RowAndColumn => plan_column_split(b, workers)?,
        };

        Ok(bands
            .into_iter()
            .map(|left| Request {
                left,
                right: right.clone(),
            })
            .collect())
    }

    /// Number of result blocks each worker sends back.
    pub fn blocks_per_worker(&self, workers: usize) -> usize {
        match self {
            SplitStrategy::RowOnly => 1,
            SplitStrategy::RowAndColumn => workers,
        }
    }
}

impl fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitStrategy::RowOnly => write!(f, "row-only"),
            SplitStrategy::RowAndColumn => write!(f, "row-and-column"),
        }
    }
}

impl FromStr for SplitStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "row-only" | "row" => Ok(SplitStrategy::RowOnly),
            "row-and-column" | "block" => Ok(SplitStrategy::RowAndColumn),
            other => Err(Error::UnknownStrategy(other.to_string())),
        }
    }
}
