//! Ordered collection of per-worker results.

use matmul_types::Matrix;

use crate::Error;

/// One slot per worker index, each filled exactly once.
///
/// Workers may finish in any order; [`ResultAssembly::into_matrix`] reads the
/// slots strictly by ascending index.
#[derive(Debug)]
pub struct ResultAssembly {
    slots: Vec<Option<Vec<Matrix>>>,
}

impl ResultAssembly {
    pub fn new(workers: usize) -> Self {
        Self {
            slots: vec![None; workers],
        }
    }

    /// Records the blocks returned by worker `index`.
    pub fn fill(&mut self, index: usize, blocks: Vec<Matrix>) -> Result<(), Error> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| Error::UnexpectedResponse {
                worker: index,
                reason: "no such worker".to_string(),
            })?;
        if slot.is_some() {
            return Err(Error::DuplicateResult(index));
        }
        *slot = Some(blocks);
        Ok(())
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Builds the final matrix: each worker's blocks side by side form a row
    /// band, and the bands are stacked in worker order.
    pub fn into_matrix(self) -> Result<Matrix, Error> {
        let mut bands = Vec::with_capacity(self.slots.len());
        for (index, slot) in self.slots.into_iter().enumerate() {
            let blocks = slot.ok_or(Error::MissingResult(index))?;
            bands.push(Matrix::hstack(&blocks)?);
        }
        Ok(Matrix::vstack(&bands)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: Vec<Vec<i64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn test_out_of_order_fill_reassembles_in_index_order() {
        let mut assembly = ResultAssembly::new(2);
        assembly
            .fill(1, vec![m(vec![vec![30]]), m(vec![vec![40]])])
            .unwrap();
        assert!(!assembly.is_complete());
        assembly
            .fill(0, vec![m(vec![vec![10]]), m(vec![vec![20]])])
            .unwrap();
        assert!(assembly.is_complete());

        let result = assembly.into_matrix().unwrap();
        assert_eq!(result, m(vec![vec![10, 20], vec![30, 40]]));
    }

    #[test]
    fn test_single_block_per_worker_stacks_vertically() {
        let mut assembly = ResultAssembly::new(2);
        assembly.fill(0, vec![m(vec![vec![1, 2], vec![3, 4]])]).unwrap();
        assembly.fill(1, vec![m(vec![vec![5, 6]])]).unwrap();

        let result = assembly.into_matrix().unwrap();
        assert_eq!(result, m(vec![vec![1, 2], vec![3, 4], vec![5, 6]]));
    }

    #[test]
    fn test_missing_slot() {
        let mut assembly = ResultAssembly::new(3);
        assembly.fill(0, vec![Matrix::zeros(1, 1)]).unwrap();
        assembly.fill(2, vec![Matrix::zeros(1, 1)]).unwrap();
        assert!(matches!(assembly.into_matrix(), Err(Error::MissingResult(1))));
    }

    #[test]
    fn test_duplicate_fill() {
        let mut assembly = ResultAssembly::new(1);
        assembly.fill(0, vec![Matrix::zeros(1, 1)]).unwrap();
        assert!(matches!(
            assembly.fill(0, vec![Matrix::zeros(1, 1)]),
            Err(Error::DuplicateResult(0))
        ));
    }
}
