//! Lock-free per-cell accumulators, one thread per row.

use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;

use tracing::warn;

use crate::matrix::Matrix;

use super::{Dims, MultiplyError};

/// An add-only `f64` cell supporting concurrent increment.
///
/// There is no atomic f64 add in std, so this runs a compare-and-swap loop
/// over the value's bit pattern. Relaxed ordering is enough: the only
/// cross-thread visibility we need is established by joining the workers
/// before any cell is read.
struct AddCell(AtomicU64);

impl AddCell {
    fn new() -> Self {
        Self(AtomicU64::new(0.0_f64.to_bits()))
    }

    fn add(&self, value: f64) {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + value).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    fn sum(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Relaxed))
    }
}

/// Multiply with one thread per output row and a lock-free accumulator per
/// output cell.
///
/// All `m * n` accumulators are allocated before any thread starts. Each
/// row's thread only touches that row's accumulators, so contention is
/// row-local; the point of this strategy is to price fine-grained lock-free
/// accumulation, one allocation and one CAS loop per term. After the join,
/// the accumulators are drained into a plain matrix.
pub(super) fn multiply(a: &Matrix, b: &Matrix, (m, n, k): Dims) -> Result<Matrix, MultiplyError> {
    let cells: Vec<AddCell> = (0..m * n).map(|_| AddCell::new()).collect();

    let a = a.as_slice();
    let b = b.as_slice();

    let failed = thread::scope(|s| {
        let handles: Vec<_> = (0..m)
            .map(|row| {
                let cells = &cells;
                s.spawn(move || {
                    for j in 0..n {
                        let cell = &cells[row * n + j];
                        for p in 0..k {
                            cell.add(a[row * k + p] * b[p * n + j]);
                        }
                    }
                })
            })
            .collect();

        let mut failed = 0;
        for handle in handles {
            if handle.join().is_err() {
                warn!("per-row accumulator worker panicked; joining remaining workers");
                failed += 1;
            }
        }
        failed
    });

    if failed > 0 {
        return Err(MultiplyError::WorkerPanicked { failed });
    }

    let mut c = Matrix::zeros(m, n);
    for (out, cell) in c.as_mut_slice().iter_mut().zip(&cells) {
        *out = cell.sum();
    }
    Ok(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_cell_accumulates_concurrently() {
        let cell = AddCell::new();
        thread::scope(|s| {
            for _ in 0..8 {
                s.spawn(|| {
                    for _ in 0..1000 {
                        cell.add(0.5);
                    }
                });
            }
        });
        assert_eq!(cell.sum(), 4000.0);
    }
}
