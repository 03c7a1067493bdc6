//! Dynamically sized row-major matrix and the Gauss-Seidel solver.

use std::ops::{Index, IndexMut, Mul};

use super::VecN;

/// An owned M x N matrix of `f32`, stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MatMN {
    rows: usize,
    cols: usize,
    data: Vec<f32>,
}

impl MatMN {
    /// Create an `rows` x `cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Create a square matrix with `diagonal` on its diagonal.
    pub fn from_diagonal(diagonal: &[f32]) -> Self {
        let n = diagonal.len();
        let mut mat = Self::zeros(n, n);
        for (i, d) in diagonal.iter().enumerate() {
            mat[(i, i)] = *d;
        }
        mat
    }

    /// Create a matrix from rows of `N` columns.
    pub fn from_rows<const N: usize>(rows: &[[f32; N]]) -> Self {
        let data = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self {
            rows: rows.len(),
            cols: N,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> &[f32] {
        assert!(i < self.rows, "MatMN row {i} out of bounds ({})", self.rows);
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Mutably borrow row `i`.
    pub fn row_mut(&mut self, i: usize) -> &mut [f32] {
        assert!(i < self.rows, "MatMN row {i} out of bounds ({})", self.rows);
        &mut self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Reset every entry to zero.
    pub fn set_zero(&mut self) {
        self.data.iter_mut().for_each(|x| *x = 0.0);
    }

    pub fn transpose(&self) -> MatMN {
        let mut out = MatMN::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                out[(j, i)] = self[(i, j)];
            }
        }
        out
    }

    /// Matrix-vector product.
    ///
    /// # Panics
    ///
    /// Panics if `v.len() != self.cols()`.
    pub fn mul_vec(&self, v: &VecN) -> VecN {
        assert_eq!(self.cols, v.len(), "MatMN * VecN dimension mismatch");
        (0..self.rows)
            .map(|i| {
                self.row(i)
                    .iter()
                    .zip(v.as_slice())
                    .map(|(a, b)| a * b)
                    .sum()
            })
            .collect()
    }

    /// Matrix-matrix product.
    ///
    /// # Panics
    ///
    /// Panics if `self.cols() != other.rows()`.
    pub fn mul_mat(&self, other: &MatMN) -> MatMN {
        assert_eq!(self.cols, other.rows, "MatMN * MatMN dimension mismatch");
        let mut out = MatMN::zeros(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(i, k)] * other[(k, j)];
                }
                out[(i, j)] = sum;
            }
        }
        out
    }
}

impl Index<(usize, usize)> for MatMN {
    type Output = f32;

    fn index(&self, (i, j): (usize, usize)) -> &f32 {
        assert!(
            i < self.rows && j < self.cols,
            "MatMN index ({i}, {j}) out of bounds ({}x{})",
            self.rows,
            self.cols
        );
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for MatMN {
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f32 {
        assert!(
            i < self.rows && j < self.cols,
            "MatMN index ({i}, {j}) out of bounds ({}x{})",
            self.rows,
            self.cols
        );
        &mut self.data[i * self.cols + j]
    }
}

impl Mul<&VecN> for &MatMN {
    type Output = VecN;

    fn mul(self, rhs: &VecN) -> VecN {
        self.mul_vec(rhs)
    }
}

impl Mul<&MatMN> for &MatMN {
    type Output = MatMN;

    fn mul(self, rhs: &MatMN) -> MatMN {
        self.mul_mat(rhs)
    }
}

/// Solve `a * x = b` with as many Gauss-Seidel sweeps as `b` has components.
pub fn solve_gauss_seidel(a: &MatMN, b: &VecN) -> VecN {
    solve_gauss_seidel_sweeps(a, b, b.len())
}

/// Solve `a * x = b` starting from zero with `sweeps` Gauss-Seidel sweeps.
///
/// A component update that is not finite (a zero pivot from a degenerate
/// Jacobian row) is skipped, leaving that component unchanged.
///
/// # Panics
///
/// Panics if `a` is not square or its size differs from `b.len()`.
pub fn solve_gauss_seidel_sweeps(a: &MatMN, b: &VecN, sweeps: usize) -> VecN {
    let n = b.len();
    assert!(
        a.rows() == n && a.cols() == n,
        "Gauss-Seidel expects a {n}x{n} matrix, got {}x{}",
        a.rows(),
        a.cols()
    );

    let mut x = VecN::zeros(n);
    for _ in 0..sweeps {
        for i in 0..n {
            let row = a.row(i);
            let ax: f32 = row.iter().zip(x.as_slice()).map(|(r, x)| r * x).sum();
            let dx = (b[i] - ax) / row[i];
            if dx.is_finite() {
                x[i] += dx;
            }
        }
    }
    x
}
