//! Single-threaded baseline.

use crate::matrix::Matrix;

use super::Dims;

/// Textbook i-j-k triple loop with a running scalar sum per cell.
///
/// Zero concurrency overhead. This is the correctness oracle the other
/// strategies are checked against, and its time is the denominator for
/// every speedup figure in the report.
pub(super) fn multiply(a: &Matrix, b: &Matrix, (m, n, k): Dims) -> Matrix {
    let a = a.as_slice();
    let b = b.as_slice();
    let mut c = Matrix::zeros(m, n);
    let out = c.as_mut_slice();

    for i in 0..m {
        for j in 0..n {
            let mut sum = 0.0;
            for p in 0..k {
                sum += a[i * k + p] * b[p * n + j];
            }
            out[i * n + j] = sum;
        }
    }

    c
}
