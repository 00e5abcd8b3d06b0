//! Whole-matrix mutex, one thread per row.

use std::sync::Mutex;
use std::thread;

use tracing::warn;

use crate::matrix::Matrix;

use super::{Dims, MultiplyError};

/// Multiply with one thread per row, serializing every cell update through
/// a single mutex over the entire result buffer.
///
/// Each thread takes the lock for one cell's full k-sum, releases it, and
/// moves to the next cell. This is deliberately the coarsest exclusion in
/// the set: it quantifies what full-matrix mutual exclusion costs compared
/// to the per-cell atomic and row-disjoint variants. The guard's `Drop`
/// releases the lock on every exit path, and a poisoned lock is recovered
/// with `into_inner` so one panicked row cannot wedge the remaining rows.
pub(super) fn multiply(a: &Matrix, b: &Matrix, (m, n, k): Dims) -> Result<Matrix, MultiplyError> {
    let result = Mutex::new(vec![0.0_f64; m * n]);

    let a = a.as_slice();
    let b = b.as_slice();

    let failed = thread::scope(|s| {
        let handles: Vec<_> = (0..m)
            .map(|row| {
                let result = &result;
                s.spawn(move || {
                    for j in 0..n {
                        let mut guard = result
                            .lock()
                            .unwrap_or_else(|poisoned| poisoned.into_inner());
                        for p in 0..k {
                            guard[row * n + j] += a[row * k + p] * b[p * n + j];
                        }
                    }
                })
            })
            .collect();

        let mut failed = 0;
        for handle in handles {
            if handle.join().is_err() {
                warn!("mutex-guarded worker panicked; joining remaining workers");
                failed += 1;
            }
        }
        failed
    });

    if failed > 0 {
        return Err(MultiplyError::WorkerPanicked { failed });
    }

    let data = result
        .into_inner()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Ok(Matrix::from_vec(m, n, data))
}
