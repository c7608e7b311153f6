//! Random input generation and dense matrix arithmetic used by the
//! benchmark drivers, grounded in `utils.h`/`utils.cpp` from the original
//! ParaGroup DAC benchmark suite (random array/matrix generators, matrix
//! add/sub/multiply, `isArraySorted`).

use rand::Rng;
use std::time::Instant;

/// Upper bound (exclusive) used by the original generators for integer
/// array elements.
pub const MAX_INT_NUM: i32 = 999;

/// Upper bound (exclusive) used by the original generators for matrix
/// entries.
pub const MAX_DBL_NUM: f64 = 999.9;

/// Tolerance used when comparing matrices of `f64` for equality.
pub const THRESHOLD: f64 = 0.001;

/// Build an array of `n` random `i32`s in `[0, MAX_INT_NUM)`.
pub fn generate_random_array(n: usize) -> Vec<i32> {
    let mut rng = rand::thread_rng();
    (0..n).map(|_| rng.gen_range(0..MAX_INT_NUM)).collect()
}

/// `true` if `a` is sorted in non-decreasing order.
pub fn is_array_sorted(a: &[i32]) -> bool {
    a.windows(2).all(|w| w[0] <= w[1])
}

/// A square, row-major dense matrix of `f64`.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    pub n: usize,
    data: Vec<f64>,
}

impl Default for Matrix {
    /// The empty `0 x 0` matrix, used only as the placeholder a
    /// divide-and-conquer combine step overwrites before anyone observes it.
    fn default() -> Self {
        Matrix::zeros(0)
    }
}

impl Matrix {
    /// A zero matrix of size `n x n`.
    pub fn zeros(n: usize) -> Self {
        Self {
            n,
            data: vec![0.0; n * n],
        }
    }

    /// A matrix of size `n x n` with random entries in `[0, MAX_DBL_NUM)`.
    /// `n` must be a power of two for the Strassen driver; this function
    /// itself has no such restriction.
    pub fn random(n: usize) -> Self {
        let mut rng = rand::thread_rng();
        let data = (0..n * n).map(|_| rng.gen_range(0.0..MAX_DBL_NUM)).collect();
        Self { n, data }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.n + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.n + col] = value;
    }

    /// Elementwise sum `self + other`. Panics if sizes differ.
    pub fn add(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.n, other.n, "addMatrix requires equal-size operands");
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        Matrix { n: self.n, data }
    }

    /// Elementwise difference `self - other`. Panics if sizes differ.
    pub fn sub(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.n, other.n, "subtMatrix requires equal-size operands");
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect();
        Matrix { n: self.n, data }
    }

    /// Naive O(n^3) matrix product, used as the base-case solver below the
    /// Strassen cutoff (`compactMatmul` in the original).
    pub fn matmul(&self, other: &Matrix) -> Matrix {
        assert_eq!(self.n, other.n, "matmul requires equal-size operands");
        let n = self.n;
        let mut out = Matrix::zeros(n);
        for i in 0..n {
            for k in 0..n {
                let a_ik = self.get(i, k);
                if a_ik == 0.0 {
                    continue;
                }
                for j in 0..n {
                    out.data[i * n + j] += a_ik * other.get(k, j);
                }
            }
        }
        out
    }

    /// Split an `n x n` matrix (`n` even) into its four `n/2 x n/2`
    /// quadrants, in row-major (top-left, top-right, bottom-left,
    /// bottom-right) order.
    pub fn split_quadrants(&self) -> [Matrix; 4] {
        let half = self.n / 2;
        let mut quads = [
            Matrix::zeros(half),
            Matrix::zeros(half),
            Matrix::zeros(half),
            Matrix::zeros(half),
        ];
        for i in 0..half {
            for j in 0..half {
                quads[0].set(i, j, self.get(i, j));
                quads[1].set(i, j, self.get(i, j + half));
                quads[2].set(i, j, self.get(i + half, j));
                quads[3].set(i, j, self.get(i + half, j + half));
            }
        }
        quads
    }

    /// Reassemble four `n/2 x n/2` quadrants (top-left, top-right,
    /// bottom-left, bottom-right) into one `n x n` matrix.
    pub fn from_quadrants(quads: [Matrix; 4]) -> Matrix {
        let half = quads[0].n;
        let mut out = Matrix::zeros(half * 2);
        for i in 0..half {
            for j in 0..half {
                out.set(i, j, quads[0].get(i, j));
                out.set(i, j + half, quads[1].get(i, j));
                out.set(i + half, j, quads[2].get(i, j));
                out.set(i + half, j + half, quads[3].get(i, j));
            }
        }
        out
    }

    /// `true` if every entry of `self` and `other` is within
    /// [`THRESHOLD`] of each other (`areMatrixEqual` in the original).
    pub fn approx_eq(&self, other: &Matrix) -> bool {
        self.n == other.n
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() < THRESHOLD)
    }
}

/// Run `f` and report how long it took. Mirrors the original drivers'
/// `current_time_usecs`/`current_time_nsecs` wall-clock timing, expressed
/// with [`std::time::Instant`] rather than a literal `gettimeofday` port.
pub fn time_it<T>(f: impl FnOnce() -> T) -> (T, std::time::Duration) {
    let start = Instant::now();
    let result = f();
    (result, start.elapsed())
}
