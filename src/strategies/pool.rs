//! Fixed-size worker pool, one task per output row.

use crate::matrix::Matrix;

use super::{Dims, MultiplyError, compute_row};

/// Multiply on a dedicated pool of `num_threads` workers.
///
/// One task per output row is spawned into the pool; each task writes a
/// disjoint row slice of C, so the only synchronization is the scope's
/// completion barrier. The pool is built fresh per call and torn down with
/// it, which keeps pool construction cost inside the measurement window
/// where it belongs for this comparison.
///
/// A pool that cannot be built is a configuration problem, not something a
/// retry fixes, so the error propagates as [`MultiplyError::PoolBuild`].
pub(super) fn multiply(
    a: &Matrix,
    b: &Matrix,
    (m, n, k): Dims,
    num_threads: usize,
) -> Result<Matrix, MultiplyError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_threads.max(1))
        .build()?;

    let a = a.as_slice();
    let b = b.as_slice();
    let mut c = Matrix::zeros(m, n);

    pool.scope(|s| {
        for (row, out) in c.as_mut_slice().chunks_mut(n).enumerate() {
            s.spawn(move |_| compute_row(a, b, row, n, k, out));
        }
    });

    Ok(c)
}
