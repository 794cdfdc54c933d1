//! Dense row-major integer matrix and the multiply kernel.

use std::fmt;
use std::ops::Range;

use crate::Error;

/// A dense `rows × cols` matrix of `i64`, stored row-major.
///
/// Zero rows or zero columns are valid shapes; they show up as empty
/// partitions when a matrix has fewer rows than there are workers.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<i64>,
}

impl Matrix {
    /// Builds a matrix from a row-major buffer.
    pub fn new(rows: usize, cols: usize, data: Vec<i64>) -> Result<Self, Error> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::ShapeMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    /// Builds a matrix by calling `f(row, col)` for every element, row-major.
    pub fn from_fn<F>(rows: usize, cols: usize, mut f: F) -> Self
    where
        F: FnMut(usize, usize) -> i64,
    {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1;
        }
        m
    }

    /// Builds a matrix from nested rows. All rows must have the same length.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self, Error> {
        let n = rows.len();
        let cols = rows.first().map_or(0, |row| row.len());
        let mut data = Vec::with_capacity(n * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(Error::StackMismatch {
                    axis: "columns",
                    index,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend(row);
        }
        Ok(Self {
            rows: n,
            cols,
            data,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn as_slice(&self) -> &[i64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    pub fn row(&self, row: usize) -> &[i64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Copies the rows in `range` into a new matrix.
    pub fn row_slice(&self, range: Range<usize>) -> Result<Matrix, Error> {
        if range.start > range.end || range.end > self.rows {
            return Err(Error::OutOfBounds {
                axis: "rows",
                start: range.start,
                end: range.end,
                len: self.rows,
            });
        }
        let data = self.data[range.start * self.cols..range.end * self.cols].to_vec();
        Ok(Matrix {
            rows: range.len(),
            cols: self.cols,
            data,
        })
    }

    /// Copies the columns in `range` into a new matrix.
    pub fn column_slice(&self, range: Range<usize>) -> Result<Matrix, Error> {
        if range.start > range.end || range.end > self.cols {
            return Err(Error::OutOfBounds {
                axis: "columns",
                start: range.start,
                end: range.end,
                len: self.cols,
            });
        }
        let cols = range.len();
        let mut data = Vec::with_capacity(self.rows * cols);
        for r in 0..self.rows {
            data.extend_from_slice(&self.row(r)[range.clone()]);
        }
        Ok(Matrix {
            rows: self.rows,
            cols,
            data,
        })
    }

    /// Stacks blocks on top of each other. All blocks must share a column count.
    ///
    /// An empty slice yields a `0 × 0` matrix.
    pub fn vstack(blocks: &[Matrix]) -> Result<Matrix, Error> {
        let cols = blocks.first().map_or(0, |b| b.cols);
        let mut rows = 0;
        let mut data = Vec::with_capacity(blocks.iter().map(|b| b.data.len()).sum());
        for (index, block) in blocks.iter().enumerate() {
            if block.cols != cols {
                return Err(Error::StackMismatch {
                    axis: "columns",
                    index,
                    expected: cols,
                    found: block.cols,
                });
            }
            rows += block.rows;
            data.extend_from_slice(&block.data);
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Places blocks side by side. All blocks must share a row count.
    pub fn hstack(blocks: &[Matrix]) -> Result<Matrix, Error> {
        let rows = blocks.first().map_or(0, |b| b.rows);
        for (index, block) in blocks.iter().enumerate() {
            if block.rows != rows {
                return Err(Error::StackMismatch {
                    axis: "rows",
                    index,
                    expected: rows,
                    found: block.rows,
                });
            }
        }
        let cols = blocks.iter().map(|b| b.cols).sum();
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for block in blocks {
                data.extend_from_slice(block.row(r));
            }
        }
        Ok(Matrix { rows, cols, data })
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for r in 0..self.rows {
            writeln!(f, "  {:?}", self.row(r))?;
        }
        write!(f, "]")
    }
}

/// Standard matrix product `x × y`.
///
/// Arithmetic wraps on overflow, matching fixed-width integer semantics on
/// every node so results compare bit-exact.
pub fn multiply(x: &Matrix, y: &Matrix) -> Result<Matrix, Error> {
    if x.cols != y.rows {
        return Err(Error::DimensionMismatch(x.rows, x.cols, y.rows, y.cols));
    }

    let mut out = Matrix::zeros(x.rows, y.cols);
    if y.cols == 0 {
        return Ok(out);
    }

    // i-k-j order keeps the inner loop on contiguous rows of `y` and `out`.
    for i in 0..x.rows {
        let out_row = &mut out.data[i * y.cols..(i + 1) * y.cols];
        for (k, &a) in x.row(i).iter().enumerate() {
            if a == 0 {
                continue;
            }
            for (o, &b) in out_row.iter_mut().zip(y.row(k)) {
                *o = o.wrapping_add(a.wrapping_mul(b));
            }
        }
    }

    Ok(out)
}
