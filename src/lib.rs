//! Parallel matrix multiplication strategies, benchmarked against each other.
//!
//! I wrote this to see what different concurrency disciplines actually cost
//! on the same embarrassingly-parallel problem. Seven strategies share one
//! contract, `multiply(A, B) -> C`, and differ only in how they partition
//! the work and synchronize writes to the result:
//!
//! - `Sequential`: single-threaded triple loop, the correctness oracle and
//!   the speedup denominator
//! - `ThreadPool`: fixed-size pool, one task per output row
//! - `RowThreadsChunked`: raw threads over contiguous row ranges
//! - `DataParallelStream`: rayon's work-stealing pool over row indices
//! - `AtomicAccumulator`: lock-free per-cell accumulators (CAS loop)
//! - `MutexGuarded`: whole-matrix mutex held per cell
//! - `SemaphoreGuarded`: same algorithm, gated by a one-permit semaphore
//!
//! The harness drives every (size × threads × strategy) combination, measures
//! wall time, process CPU time and resident-memory delta, derives speedup and
//! efficiency against the sequential baseline, and writes a semicolon-delimited
//! report for downstream charting.
//!
//! ## Usage
//!
//! ```
//! use parmul::{Matrix, Strategy};
//!
//! let a = Matrix::identity(4);
//! let b = Matrix::identity(4);
//!
//! let c = Strategy::ThreadPool.multiply(&a, &b, 2).unwrap();
//! assert!(c.approx_eq(&a, 1e-9));
//! ```

pub mod harness;
pub mod matrix;
pub mod strategies;

pub use harness::report::BenchmarkSample;
pub use harness::{HarnessError, SweepConfig, run_sweep};
pub use matrix::Matrix;
pub use strategies::{MultiplyError, Strategy};
