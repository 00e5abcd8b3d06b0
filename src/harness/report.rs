//! The benchmark report: one sample per measured combination, exported as a
//! semicolon-delimited file.
//!
//! Column order, delimiter and decimal precision are a contract with the
//! downstream chart tooling. Do not reorder fields.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::strategies::Strategy;

use super::HarnessError;

/// Header row of the report file.
pub const HEADER: &str = "MatrixSize;ThreadsUsed;Implementation;ExecutionTimeMs;Speedup;\
                          Efficiency;MemoryUsedMB;CpuUsedPct;CoresUsed;TotalPhysicalCores;\
                          TotalLogicalCores";

/// One measured observation. Never mutated after the harness creates it.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkSample {
    pub matrix_size: usize,
    pub threads_used: usize,
    pub strategy: Strategy,
    pub execution_time_ms: f64,
    pub speedup: f64,
    pub efficiency: f64,
    pub memory_used_mb: f64,
    pub cpu_used_pct: f64,
    pub cores_used: usize,
    pub total_physical_cores: usize,
    pub total_logical_cores: usize,
}

impl BenchmarkSample {
    /// Format as one report row: 3 decimals for time/speedup/efficiency,
    /// 2 for memory and CPU.
    pub fn to_row(&self) -> String {
        format!(
            "{};{};{};{:.3};{:.3};{:.3};{:.2};{:.2};{};{};{}",
            self.matrix_size,
            self.threads_used,
            self.strategy,
            self.execution_time_ms,
            self.speedup,
            self.efficiency,
            self.memory_used_mb,
            self.cpu_used_pct,
            self.cores_used,
            self.total_physical_cores,
            self.total_logical_cores,
        )
    }
}

/// Write the full report, creating missing parent directories.
///
/// Any I/O failure here is fatal to the run and surfaces the path together
/// with the underlying cause.
pub fn write_report(path: &Path, samples: &[BenchmarkSample]) -> Result<(), HarnessError> {
    let io_err = |source| HarnessError::Output {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
    }

    let mut writer = BufWriter::new(File::create(path).map_err(io_err)?);
    writeln!(writer, "{HEADER}").map_err(io_err)?;
    for sample in samples {
        writeln!(writer, "{}", sample.to_row()).map_err(io_err)?;
    }
    writer.flush().map_err(io_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> BenchmarkSample {
        BenchmarkSample {
            matrix_size: 128,
            threads_used: 4,
            strategy: Strategy::ThreadPool,
            execution_time_ms: 12.3456,
            speedup: 3.14159,
            efficiency: 0.785398,
            memory_used_mb: 1.005,
            cpu_used_pct: 87.654,
            cores_used: 3,
            total_physical_cores: 14,
            total_logical_cores: 20,
        }
    }

    #[test]
    fn row_format_matches_the_chart_contract() {
        assert_eq!(
            sample().to_row(),
            "128;4;ThreadPool;12.346;3.142;0.785;1.00;87.65;3;14;20"
        );
    }

    #[test]
    fn header_has_eleven_fields() {
        assert_eq!(HEADER.split(';').count(), 11);
        assert_eq!(sample().to_row().split(';').count(), 11);
    }
}
