//! Data-parallel rows on rayon's global pool.

use rayon::prelude::*;

use crate::matrix::Matrix;

use super::{Dims, compute_row};

/// Multiply by mapping row indices over rayon's work-stealing pool.
///
/// Same row-disjoint partition as the chunked strategy, but load balancing
/// and pool sizing are rayon's problem, not ours. No thread count is
/// accepted here; whatever the harness was configured with is ignored for
/// this strategy.
pub(super) fn multiply(a: &Matrix, b: &Matrix, (m, n, k): Dims) -> Matrix {
    let a = a.as_slice();
    let b = b.as_slice();
    let mut c = Matrix::zeros(m, n);

    c.as_mut_slice()
        .par_chunks_mut(n)
        .enumerate()
        .for_each(|(row, out)| compute_row(a, b, row, n, k, out));

    c
}
