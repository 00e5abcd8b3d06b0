//! Raw threads over contiguous row ranges.

use std::thread;

use tracing::warn;

use crate::matrix::Matrix;

use super::{Dims, MultiplyError, compute_row};

/// Multiply with `num_threads` raw threads, each owning a row range.
///
/// Rows are divided into equal chunks of `rows / num_threads`, with the
/// remainder folded into the last chunk. Each thread writes only its own
/// rows, so the writes are disjoint and need no locking. The thread count
/// is clamped to the row count; a 3-row matrix never spawns more than
/// three workers.
///
/// Every worker is joined before the result is released. If any worker
/// panicked, the remaining joins still run and the call fails with
/// [`MultiplyError::WorkerPanicked`] instead of returning a matrix whose
/// unwritten rows are still zero.
pub(super) fn multiply(
    a: &Matrix,
    b: &Matrix,
    (m, n, k): Dims,
    num_threads: usize,
) -> Result<Matrix, MultiplyError> {
    let workers = num_threads.clamp(1, m.max(1));
    let chunk = m / workers;

    let a = a.as_slice();
    let b = b.as_slice();
    let mut c = Matrix::zeros(m, n);

    let failed = thread::scope(|s| {
        let mut handles = Vec::with_capacity(workers);
        let mut rest = c.as_mut_slice();

        for t in 0..workers {
            let start = t * chunk;
            let end = if t == workers - 1 { m } else { start + chunk };
            let (mine, tail) = std::mem::take(&mut rest).split_at_mut((end - start) * n);
            rest = tail;

            handles.push(s.spawn(move || {
                for row in start..end {
                    let out = &mut mine[(row - start) * n..(row - start + 1) * n];
                    compute_row(a, b, row, n, k, out);
                }
            }));
        }

        let mut failed = 0;
        for handle in handles {
            if handle.join().is_err() {
                warn!("row-chunk worker panicked; joining remaining workers");
                failed += 1;
            }
        }
        failed
    });

    if failed > 0 {
        return Err(MultiplyError::WorkerPanicked { failed });
    }
    Ok(c)
}
