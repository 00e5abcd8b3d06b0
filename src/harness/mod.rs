//! The benchmark harness: drives every (size × threads × strategy)
//! combination, measures it, derives comparable metrics, and collects the
//! samples for export.
//!
//! Orchestration is single-threaded and strategies never overlap; the only
//! parallelism alive at any moment is inside the strategy being measured.

pub mod probe;
pub mod report;

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{info, warn};

use crate::matrix::{Matrix, generate};
use crate::strategies::{MultiplyError, Strategy};

pub use probe::SystemProbe;
pub use report::{BenchmarkSample, write_report};

/// Errors that abort a sweep.
///
/// An unknown strategy tag is deliberately not in here: it is fatal only to
/// its own sample and the sweep continues without it.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The sweep configuration failed validation before any measurement.
    #[error("invalid sweep configuration: {0}")]
    InvalidConfig(String),

    /// A strategy failed mid-sweep (dimension mismatch, worker panic, pool
    /// build failure).
    #[error(transparent)]
    Multiply(#[from] MultiplyError),

    /// The report file could not be created or written.
    #[error("failed to write report to {path}: {source}")]
    Output {
        path: PathBuf,
        source: io::Error,
    },
}

/// What to sweep and where to put the result.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Square matrix sizes to measure.
    pub sizes: Vec<usize>,
    /// Thread counts for the partitioned strategies.
    pub thread_counts: Vec<usize>,
    /// Strategy tags, parsed per sample so one bad tag only loses that
    /// sample.
    pub strategies: Vec<String>,
    /// Pause before each memory sample to let the allocator settle. There
    /// is no GC to trigger here; a short pause is all the quiescing we get.
    pub settle: Duration,
}

impl SweepConfig {
    /// A full sweep over every strategy.
    pub fn new(sizes: Vec<usize>, thread_counts: Vec<usize>) -> Self {
        Self {
            sizes,
            thread_counts,
            strategies: Strategy::ALL.iter().map(|s| s.name().to_string()).collect(),
            settle: Duration::from_millis(200),
        }
    }

    /// Reject empty lists and zero entries before any measurement begins.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.sizes.is_empty() {
            return Err(HarnessError::InvalidConfig("no matrix sizes given".into()));
        }
        if self.thread_counts.is_empty() {
            return Err(HarnessError::InvalidConfig("no thread counts given".into()));
        }
        if self.strategies.is_empty() {
            return Err(HarnessError::InvalidConfig("no strategies given".into()));
        }
        if let Some(&size) = self.sizes.iter().find(|&&s| s == 0) {
            return Err(HarnessError::InvalidConfig(format!(
                "matrix size must be positive, got {size}"
            )));
        }
        if let Some(&threads) = self.thread_counts.iter().find(|&&t| t == 0) {
            return Err(HarnessError::InvalidConfig(format!(
                "thread count must be positive, got {threads}"
            )));
        }
        Ok(())
    }
}

/// Run the full sweep and return the samples in report order.
///
/// Order is size, then thread count, then strategy. Strategies that ignore
/// the thread count run only at the first thread count and are recorded
/// with one thread. A and B are generated once per size and shared
/// read-only across every strategy invocation at that size.
///
/// The sequential baseline's time feeds the speedup of every other sample
/// at the same size; when a sample has no baseline (the tag list omitted
/// `Sequential`), its own time is used and its speedup is 1.0.
pub fn run_sweep(
    config: &SweepConfig,
    probe: &SystemProbe,
) -> Result<Vec<BenchmarkSample>, HarnessError> {
    config.validate()?;

    let mut samples = Vec::new();
    let mut baselines: HashMap<usize, f64> = HashMap::new();

    for &size in &config.sizes {
        let a = generate::random(size, size);
        let b = generate::random(size, size);

        for (pass, &threads) in config.thread_counts.iter().enumerate() {
            for tag in &config.strategies {
                let strategy: Strategy = match tag.parse() {
                    Ok(s) => s,
                    Err(err) => {
                        warn!(%tag, size, threads, "skipping sample: {err}");
                        continue;
                    }
                };
                if !strategy.uses_thread_count() && pass > 0 {
                    continue;
                }
                let threads_used = if strategy.uses_thread_count() {
                    threads
                } else {
                    1
                };

                let measured = measure(&a, &b, strategy, threads_used, probe, config.settle)?;
                if strategy == Strategy::Sequential {
                    baselines.entry(size).or_insert(measured.wall_ms);
                }
                let baseline_ms = baselines.get(&size).copied().unwrap_or(measured.wall_ms);

                let speedup = if measured.wall_ms > 0.0 {
                    baseline_ms / measured.wall_ms
                } else {
                    1.0
                };
                let sample = BenchmarkSample {
                    matrix_size: size,
                    threads_used,
                    strategy,
                    execution_time_ms: measured.wall_ms,
                    speedup,
                    efficiency: efficiency(threads_used, speedup),
                    memory_used_mb: measured.memory_delta_mb,
                    cpu_used_pct: measured.cpu_pct,
                    cores_used: probe.cores_used(threads_used),
                    total_physical_cores: probe.physical_cores(),
                    total_logical_cores: probe.logical_cores(),
                };
                info!(
                    strategy = %sample.strategy,
                    size,
                    threads = threads_used,
                    time_ms = sample.execution_time_ms,
                    speedup = sample.speedup,
                    "measured"
                );
                samples.push(sample);
            }
        }
    }

    Ok(samples)
}

struct Measurement {
    wall_ms: f64,
    cpu_pct: f64,
    memory_delta_mb: f64,
}

/// Measure one multiply: wall time, CPU utilization, resident-memory delta.
///
/// Memory is sampled after a settle pause on both sides of the call, with
/// the product still live for the second sample so its allocation counts.
fn measure(
    a: &Matrix,
    b: &Matrix,
    strategy: Strategy,
    threads: usize,
    probe: &SystemProbe,
    settle: Duration,
) -> Result<Measurement, MultiplyError> {
    quiesce(settle);
    let memory_before = probe.resident_memory_bytes();

    let cpu_before = probe.process_cpu_time();
    let start = Instant::now();
    let product = strategy.multiply(a, b, threads)?;
    let wall = start.elapsed();
    let cpu_used = probe.process_cpu_time().saturating_sub(cpu_before);

    quiesce(settle);
    let memory_after = probe.resident_memory_bytes();
    // Read one cell so the optimizer cannot discard the product early.
    std::hint::black_box(product.get(0, 0));
    drop(product);

    let wall_secs = wall.as_secs_f64();
    let cpu_pct = if wall_secs > 0.0 {
        let raw = cpu_used.as_secs_f64() / (wall_secs * probe.logical_cores() as f64) * 100.0;
        raw.min(100.0)
    } else {
        0.0
    };

    let memory_delta_mb =
        memory_after.saturating_sub(memory_before) as f64 / (1024.0 * 1024.0);

    Ok(Measurement {
        wall_ms: wall_secs * 1000.0,
        cpu_pct,
        memory_delta_mb,
    })
}

/// Parallel efficiency: exactly 1.0 on one thread, `speedup / threads`
/// otherwise.
fn efficiency(threads: usize, speedup: f64) -> f64 {
    if threads == 1 {
        1.0
    } else {
        speedup / threads as f64
    }
}

fn quiesce(settle: Duration) {
    if !settle.is_zero() {
        thread::sleep(settle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efficiency_is_exactly_one_for_a_single_thread() {
        assert_eq!(efficiency(1, 0.25), 1.0);
        assert_eq!(efficiency(1, 7.3), 1.0);
    }

    #[test]
    fn efficiency_divides_speedup_by_threads() {
        assert_eq!(efficiency(4, 2.0), 0.5);
        assert_eq!(efficiency(8, 8.0), 1.0);
    }

    #[test]
    fn validate_rejects_empty_and_zero_entries() {
        let ok = SweepConfig::new(vec![4], vec![1, 2]);
        assert!(ok.validate().is_ok());

        let empty_sizes = SweepConfig::new(vec![], vec![1]);
        assert!(matches!(
            empty_sizes.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));

        let zero_threads = SweepConfig::new(vec![4], vec![1, 0]);
        assert!(matches!(
            zero_threads.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));

        let zero_size = SweepConfig::new(vec![0], vec![1]);
        assert!(matches!(
            zero_size.validate(),
            Err(HarnessError::InvalidConfig(_))
        ));
    }
}
