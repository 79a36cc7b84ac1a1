//! Matrices over GF(256).
//!
//! Row-major storage. Provides the constructions the Reed-Solomon core
//! needs: Vandermonde matrices, the systematic encoder matrix (identity on
//! top, parity rows below, every k-row submatrix invertible), ordered row
//! selection, and Gauss-Jordan inversion with partial pivoting.

use crate::{FieldError, FieldResult, gf};

/// A dense matrix over GF(256).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<u8>,
}

impl Matrix {
    /// Create a zero matrix.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0u8; rows * cols],
        }
    }

    /// Create an identity matrix of size `n`.
    #[must_use]
    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m.set(i, i, 1);
        }
        m
    }

    /// Create a Vandermonde matrix: entry `(i, j) = point(i)^j` with
    /// `point(i) = i + 1`, wrapping at the field size.
    ///
    /// The points 1, 2, ..., 255, 0 are pairwise distinct for up to 256
    /// rows, so any square submatrix formed from whole rows is invertible.
    /// Column 0 is all ones.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] if `cols > rows`, or if
    /// either dimension is zero, or if `rows` exceeds the field size.
    pub fn vandermonde(rows: usize, cols: usize) -> FieldResult<Self> {
        if rows == 0 || cols == 0 || cols > rows || rows > gf::FIELD_SIZE {
            return Err(FieldError::DimensionMismatch);
        }
        let mut m = Self::new(rows, cols);
        for i in 0..rows {
            let point = ((i + 1) % gf::FIELD_SIZE) as u8;
            for j in 0..cols {
                m.set(i, j, gf::pow(point, j as u32));
            }
        }
        Ok(m)
    }

    /// Build the systematic encoder matrix G(k, n): the Vandermonde matrix
    /// multiplied by the inverse of its own top square. The top `k` rows
    /// become the identity and every `k`-row submatrix remains invertible.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] for invalid `(k, n)`.
    pub fn systematic(k: usize, n: usize) -> FieldResult<Self> {
        if k == 0 || n < k {
            return Err(FieldError::DimensionMismatch);
        }
        let vandermonde = Self::vandermonde(n, k)?;
        let top = vandermonde.sub_matrix(0, 0, k, k);
        vandermonde.multiply(&top.invert()?)
    }

    /// Number of rows.
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Entry at `(row, col)`.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> u8 {
        self.data[row * self.cols + col]
    }

    /// Set entry at `(row, col)`.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: u8) {
        self.data[row * self.cols + col] = value;
    }

    /// Borrow a whole row.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> &[u8] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// Matrix product `self * rhs`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] if the inner dimensions
    /// disagree.
    pub fn multiply(&self, rhs: &Self) -> FieldResult<Self> {
        if self.cols != rhs.rows {
            return Err(FieldError::DimensionMismatch);
        }
        let mut out = Self::new(self.rows, rhs.cols);
        for i in 0..self.rows {
            for j in 0..rhs.cols {
                let mut acc = 0u8;
                for l in 0..self.cols {
                    acc ^= gf::mul(self.get(i, l), rhs.get(l, j));
                }
                out.set(i, j, acc);
            }
        }
        Ok(out)
    }

    /// Copy out the rectangle `[r0, r1) x [c0, c1)`.
    #[must_use]
    pub fn sub_matrix(&self, r0: usize, c0: usize, r1: usize, c1: usize) -> Self {
        let mut out = Self::new(r1 - r0, c1 - c0);
        for i in r0..r1 {
            for j in c0..c1 {
                out.set(i - r0, j - c0, self.get(i, j));
            }
        }
        out
    }

    /// Assemble a submatrix from whole rows, in the order given.
    /// Repeated indices are honored verbatim.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidRowSelection`] if `indices` is empty or
    /// names a row outside the matrix.
    pub fn select_rows(&self, indices: &[usize]) -> FieldResult<Self> {
        if indices.is_empty() {
            return Err(FieldError::InvalidRowSelection);
        }
        let mut out = Self::new(indices.len(), self.cols);
        for (i, &r) in indices.iter().enumerate() {
            if r >= self.rows {
                return Err(FieldError::InvalidRowSelection);
            }
            out.data[i * self.cols..(i + 1) * self.cols].copy_from_slice(self.row(r));
        }
        Ok(out)
    }

    /// Invert a square matrix by Gauss-Jordan elimination with partial
    /// pivoting (first non-zero entry at or below the diagonal).
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::DimensionMismatch`] if the matrix is not
    /// square, or [`FieldError::SingularMatrix`] if no pivot exists for
    /// some column.
    pub fn invert(&self) -> FieldResult<Self> {
        if self.rows != self.cols {
            return Err(FieldError::DimensionMismatch);
        }
        let n = self.rows;

        // Augmented [self | I], reduced in place.
        let width = 2 * n;
        let mut aug = vec![0u8; n * width];
        for i in 0..n {
            aug[i * width..i * width + n].copy_from_slice(self.row(i));
            aug[i * width + n + i] = 1;
        }

        for col in 0..n {
            let pivot_row = (col..n)
                .find(|&r| aug[r * width + col] != 0)
                .ok_or(FieldError::SingularMatrix)?;
            if pivot_row != col {
                for j in 0..width {
                    aug.swap(col * width + j, pivot_row * width + j);
                }
            }

            let pivot_inv = gf::inv(aug[col * width + col])?;
            for j in 0..width {
                aug[col * width + j] = gf::mul(aug[col * width + j], pivot_inv);
            }

            for r in 0..n {
                if r == col {
                    continue;
                }
                let factor = aug[r * width + col];
                if factor == 0 {
                    continue;
                }
                for j in 0..width {
                    let scaled = gf::mul(aug[col * width + j], factor);
                    aug[r * width + j] ^= scaled;
                }
            }
        }

        let mut out = Self::new(n, n);
        for i in 0..n {
            out.data[i * n..(i + 1) * n].copy_from_slice(&aug[i * width + n..(i + 1) * width]);
        }
        Ok(out)
    }

    /// Whether this matrix is the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        self.rows == self.cols
            && (0..self.rows)
                .all(|i| (0..self.cols).all(|j| self.get(i, j) == u8::from(i == j)))
    }
}
