//! Single-process reference computations.

use std::thread;

use matmul_dispatch::plan_row_split;
use matmul_types::{Matrix, multiply};
use rand::Rng;

use crate::Error;

/// A `rows × cols` matrix with entries drawn uniformly from `0..max_value`.
pub fn random_matrix<R: Rng>(rng: &mut R, rows: usize, cols: usize, max_value: i64) -> Matrix {
    let upper = max_value.max(1);
    Matrix::from_fn(rows, cols, |_, _| rng.gen_range(0..upper))
}

/// `A × B` on the calling thread.
pub fn serial(a: &Matrix, b: &Matrix) -> Result<Matrix, Error> {
    Ok(multiply(a, b)?)
}

/// `A × B` with A split into `threads` row bands, one OS thread per band.
///
/// Bands are stacked in band order once every thread has joined.
pub fn parallel_local(a: &Matrix, b: &Matrix, threads: usize) -> Result<Matrix, Error> {
    if a.cols() != b.rows() {
        return Err(
            matmul_types::Error::DimensionMismatch(a.rows(), a.cols(), b.rows(), b.cols()).into(),
        );
    }
    let bands = plan_row_split(a, threads)?;

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = bands
            .iter()
            .map(|band| scope.spawn(move || multiply(band, b)))
            .collect();
        handles.into_iter().map(|h| h.join()).collect()
    });

    let mut products = Vec::with_capacity(results.len());
    for (index, result) in results.into_iter().enumerate() {
        let product = result.map_err(|_| Error::ThreadPanicked(index))??;
        products.push(product);
    }
    Ok(Matrix::vstack(&products)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_matrix_is_seeded_and_bounded() {
        let a = random_matrix(&mut StdRng::seed_from_u64(0), 5, 4, 10);
        let b = random_matrix(&mut StdRng::seed_from_u64(0), 5, 4, 10);
        assert_eq!(a, b);
        assert!(a.as_slice().iter().all(|v| (0..10).contains(v)));
    }

    #[test]
    fn test_parallel_matches_serial() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = random_matrix(&mut rng, 31, 17, 10);
        let b = random_matrix(&mut rng, 17, 23, 10);
        let expected = serial(&a, &b).unwrap();

        for threads in 1..5 {
            assert_eq!(parallel_local(&a, &b, threads).unwrap(), expected);
        }
    }

    #[test]
    fn test_parallel_rejects_mismatch() {
        let err = parallel_local(&Matrix::zeros(2, 3), &Matrix::zeros(2, 3), 2).unwrap_err();
        assert!(matches!(err, Error::Matrix(_)));
    }
}
