//! Splits matrices into contiguous, non-overlapping partitions.
//!
//! `len` items are divided into `k` groups as evenly as possible. When `len`
//! is not a multiple of `k`, the first `len % k` groups get one extra item.

use std::ops::Range;

use matmul_types::Matrix;

use crate::Error;

/// Sizes of the `k` groups covering `len` items.
pub fn partition_sizes(len: usize, k: usize) -> Result<Vec<usize>, Error> {
    if k == 0 {
        return Err(Error::NoWorkers);
    }
    let base = len / k;
    let extra = len % k;
    Ok((0..k).map(|i| base + usize::from(i < extra)).collect())
}

/// Half-open index ranges of the `k` groups covering `0..len`, in order.
pub fn partition_ranges(len: usize, k: usize) -> Result<Vec<Range<usize>>, Error> {
    let mut start = 0;
    Ok(partition_sizes(len, k)?
        .into_iter()
        .map(|size| {
            let range = start..start + size;
            start += size;
            range
        })
        .collect())
}

/// Splits `matrix` into `k` row bands. Bands may be empty when there are
/// fewer rows than groups.
pub fn plan_row_split(matrix: &Matrix, k: usize) -> Result<Vec<Matrix>, Error> {
    partition_ranges(matrix.rows(), k)?
        .into_iter()
        .map(|range| matrix.row_slice(range).map_err(Error::from))
        .collect()
}

/// Splits `matrix` into `k` column blocks.
pub fn plan_column_split(matrix: &Matrix, k: usize) -> Result<Vec<Matrix>, Error> {
    partition_ranges(matrix.cols(), k)?
        .into_iter()
        .map(|range| matrix.column_slice(range).map_err(Error::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_front_loaded_remainder() {
        assert_eq!(partition_sizes(3, 2).unwrap(), vec![2, 1]);
        assert_eq!(partition_sizes(10, 4).unwrap(), vec![3, 3, 2, 2]);
        assert_eq!(partition_sizes(1200, 2).unwrap(), vec![600, 600]);
    }

    #[test]
    fn test_fewer_items_than_groups() {
        assert_eq!(partition_sizes(2, 4).unwrap(), vec![1, 1, 0, 0]);
        assert_eq!(partition_sizes(0, 3).unwrap(), vec![0, 0, 0]);
    }

    #[test]
    fn test_zero_groups_is_an_error() {
        assert!(matches!(partition_sizes(5, 0), Err(Error::NoWorkers)));
    }

    #[test]
    fn test_ranges_are_disjoint_and_cover_everything() {
        for len in 0..40 {
            for k in 1..9 {
                let ranges = partition_ranges(len, k).unwrap();
                assert_eq!(ranges.len(), k);

                let mut next = 0;
                for range in &ranges {
                    assert_eq!(range.start, next);
                    next = range.end;
                }
                assert_eq!(next, len);

                let max = ranges.iter().map(|r| r.len()).max().unwrap();
                let min = ranges.iter().map(|r| r.len()).min().unwrap();
                assert!(max - min <= 1, "len={len} k={k}");
            }
        }
    }

    #[test]
    fn test_row_split_rebuilds_matrix() {
        let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4], vec![5, 6]]).unwrap();
        let parts = plan_row_split(&a, 2).unwrap();

        assert_eq!(parts[0].rows(), 2);
        assert_eq!(parts[1].rows(), 1);
        assert_eq!(parts[1].as_slice(), &[5, 6]);
        assert_eq!(Matrix::vstack(&parts).unwrap(), a);
    }

    #[test]
    fn test_column_split_rebuilds_matrix() {
        let b = Matrix::new(2, 5, (0..10).collect()).unwrap();
        let parts = plan_column_split(&b, 2).unwrap();

        assert_eq!(parts[0].shape(), (2, 3));
        assert_eq!(parts[1].shape(), (2, 2));
        assert_eq!(parts[1].as_slice(), &[3, 4, 8, 9]);
        assert_eq!(Matrix::hstack(&parts).unwrap(), b);
    }
}
