//! The multiplication strategy contract and its seven implementations.
//!
//! Each strategy computes `C[i][j] = Σ_k A[i][k]·B[k][j]` over row-major
//! buffers. They differ only in work partitioning and synchronization:
//! row-disjoint writes need no locking at all, while the atomic, mutex and
//! semaphore variants deliberately share the whole result to measure what
//! that contention costs.
//!
//! Dimension checking happens here, before any thread is spawned, so a
//! mismatched pair never schedules work.

pub mod atomic;
pub mod chunked;
pub mod data_parallel;
pub mod mutex;
pub mod pool;
pub mod semaphore;
pub mod sequential;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::matrix::Matrix;

/// Errors produced by a multiply call.
#[derive(Debug, Error)]
pub enum MultiplyError {
    /// `A.cols != B.rows`. Raised before any work is scheduled.
    #[error(
        "dimension mismatch: cannot multiply {left_rows}x{left_cols} by {right_rows}x{right_cols}"
    )]
    DimensionMismatch {
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },

    /// A strategy tag that does not name any known variant.
    #[error("unknown strategy '{0}'")]
    UnknownStrategy(String),

    /// One or more worker threads panicked. All workers are still joined
    /// before this is returned; a partial result is never handed out.
    #[error("{failed} worker thread(s) panicked during multiply")]
    WorkerPanicked { failed: usize },

    /// The fixed-size pool could not be constructed. Treated as a fatal
    /// configuration error rather than a retryable condition.
    #[error("failed to build thread pool")]
    PoolBuild(#[from] rayon::ThreadPoolBuildError),
}

/// The closed set of multiplication strategies.
///
/// `ThreadPool` and `RowThreadsChunked` honor an explicit thread count; the
/// rest either run single-threaded, spawn one thread per row, or delegate
/// sizing to rayon's global pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Sequential,
    ThreadPool,
    RowThreadsChunked,
    DataParallelStream,
    AtomicAccumulator,
    MutexGuarded,
    SemaphoreGuarded,
}

impl Strategy {
    /// Every strategy, in the order the harness runs them. `Sequential` is
    /// first so its time is on record before anything needs a baseline.
    pub const ALL: [Strategy; 7] = [
        Strategy::Sequential,
        Strategy::ThreadPool,
        Strategy::RowThreadsChunked,
        Strategy::DataParallelStream,
        Strategy::AtomicAccumulator,
        Strategy::MutexGuarded,
        Strategy::SemaphoreGuarded,
    ];

    /// The name used in the report's `Implementation` column.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Sequential => "Sequential",
            Strategy::ThreadPool => "ThreadPool",
            Strategy::RowThreadsChunked => "RowThreadsChunked",
            Strategy::DataParallelStream => "DataParallelStream",
            Strategy::AtomicAccumulator => "AtomicAccumulator",
            Strategy::MutexGuarded => "MutexGuarded",
            Strategy::SemaphoreGuarded => "SemaphoreGuarded",
        }
    }

    /// Whether the configured thread count changes this strategy's behavior.
    ///
    /// The per-row and data-parallel strategies have their parallelism fixed
    /// by row count or by rayon; the harness records them with one thread.
    pub fn uses_thread_count(&self) -> bool {
        matches!(self, Strategy::ThreadPool | Strategy::RowThreadsChunked)
    }

    /// Multiply `a` by `b`, using `num_threads` workers where it applies.
    ///
    /// Fails with [`MultiplyError::DimensionMismatch`] when
    /// `a.cols() != b.rows()`. Neither input is mutated; the caller blocks
    /// until every worker has completed, so the returned matrix is always
    /// fully written on success.
    pub fn multiply(
        &self,
        a: &Matrix,
        b: &Matrix,
        num_threads: usize,
    ) -> Result<Matrix, MultiplyError> {
        let dims = check_dims(a, b)?;
        match self {
            Strategy::Sequential => Ok(sequential::multiply(a, b, dims)),
            Strategy::ThreadPool => pool::multiply(a, b, dims, num_threads),
            Strategy::RowThreadsChunked => chunked::multiply(a, b, dims, num_threads),
            Strategy::DataParallelStream => Ok(data_parallel::multiply(a, b, dims)),
            Strategy::AtomicAccumulator => atomic::multiply(a, b, dims),
            Strategy::MutexGuarded => mutex::multiply(a, b, dims),
            Strategy::SemaphoreGuarded => semaphore::multiply(a, b, dims),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Strategy {
    type Err = MultiplyError;

    fn from_str(s: &str) -> Result<Self, MultiplyError> {
        match s.to_ascii_lowercase().as_str() {
            "sequential" => Ok(Strategy::Sequential),
            "pool" | "threadpool" => Ok(Strategy::ThreadPool),
            "chunked" | "rowthreadschunked" => Ok(Strategy::RowThreadsChunked),
            "stream" | "streams" | "dataparallelstream" => Ok(Strategy::DataParallelStream),
            "atomic" | "atomicaccumulator" => Ok(Strategy::AtomicAccumulator),
            "mutex" | "mutexguarded" => Ok(Strategy::MutexGuarded),
            "semaphore" | "semaphoreguarded" => Ok(Strategy::SemaphoreGuarded),
            _ => Err(MultiplyError::UnknownStrategy(s.to_string())),
        }
    }
}

/// Result shape as (rows of C, cols of C, shared dimension).
pub(crate) type Dims = (usize, usize, usize);

/// Validate `a.cols == b.rows` and return `(m, n, k)`.
fn check_dims(a: &Matrix, b: &Matrix) -> Result<Dims, MultiplyError> {
    if a.cols() != b.rows() {
        return Err(MultiplyError::DimensionMismatch {
            left_rows: a.rows(),
            left_cols: a.cols(),
            right_rows: b.rows(),
            right_cols: b.cols(),
        });
    }
    Ok((a.rows(), b.cols(), a.cols()))
}

/// Compute one output row into `out` (a disjoint `n`-element slice of C).
///
/// This is the shared inner kernel for the strategies whose partition scheme
/// is "each worker owns whole rows".
pub(crate) fn compute_row(a: &[f64], b: &[f64], row: usize, n: usize, k: usize, out: &mut [f64]) {
    let a_row = &a[row * k..(row + 1) * k];
    for (j, cell) in out.iter_mut().enumerate() {
        let mut sum = 0.0;
        for (p, &a_val) in a_row.iter().enumerate() {
            sum += a_val * b[p * n + j];
        }
        *cell = sum;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_parse_to_every_variant() {
        for strategy in Strategy::ALL {
            let parsed: Strategy = strategy.name().parse().unwrap();
            assert_eq!(parsed, strategy);
        }
        assert_eq!("pool".parse::<Strategy>().unwrap(), Strategy::ThreadPool);
        assert_eq!(
            "STREAMS".parse::<Strategy>().unwrap(),
            Strategy::DataParallelStream
        );
    }

    #[test]
    fn unknown_tag_is_rejected() {
        let err = "warp-drive".parse::<Strategy>().unwrap_err();
        assert!(matches!(err, MultiplyError::UnknownStrategy(tag) if tag == "warp-drive"));
    }

    #[test]
    fn only_partitioned_strategies_use_thread_count() {
        let partitioned: Vec<_> = Strategy::ALL
            .into_iter()
            .filter(Strategy::uses_thread_count)
            .collect();
        assert_eq!(
            partitioned,
            vec![Strategy::ThreadPool, Strategy::RowThreadsChunked]
        );
    }

    #[test]
    fn check_dims_reports_both_shapes() {
        let a = Matrix::zeros(3, 4);
        let b = Matrix::zeros(5, 6);
        let err = check_dims(&a, &b).unwrap_err();
        match err {
            MultiplyError::DimensionMismatch {
                left_rows,
                left_cols,
                right_rows,
                right_cols,
            } => {
                assert_eq!((left_rows, left_cols, right_rows, right_cols), (3, 4, 5, 6));
            }
            other => panic!("expected DimensionMismatch, got {other:?}"),
        }
    }
}
