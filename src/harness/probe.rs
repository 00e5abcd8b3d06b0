//! Process and host introspection for the benchmark harness.
//!
//! One `SystemProbe` is built per harness run and passed down to wherever a
//! measurement is taken, instead of reading process-wide globals from inside
//! the strategies.

use std::time::Duration;

/// Snapshot source for resident memory, process CPU time and core topology.
#[derive(Debug, Clone)]
pub struct SystemProbe {
    physical_cores: usize,
    logical_cores: usize,
}

impl SystemProbe {
    /// Probe the host's core topology.
    pub fn new() -> Self {
        Self {
            physical_cores: num_cpus::get_physical().max(1),
            logical_cores: num_cpus::get().max(1),
        }
    }

    /// A probe with a fixed topology, for testing derived-metric math.
    pub fn with_topology(physical_cores: usize, logical_cores: usize) -> Self {
        Self {
            physical_cores: physical_cores.max(1),
            logical_cores: logical_cores.max(1),
        }
    }

    pub fn physical_cores(&self) -> usize {
        self.physical_cores
    }

    pub fn logical_cores(&self) -> usize {
        self.logical_cores
    }

    /// Physical cores engaged by `threads` workers, assuming SMT spreads
    /// threads evenly: `ceil(threads / (logical / physical))`.
    pub fn cores_used(&self, threads: usize) -> usize {
        let threads_per_core = self.logical_cores as f64 / self.physical_cores as f64;
        (threads as f64 / threads_per_core).ceil() as usize
    }

    /// Current resident set size in bytes.
    ///
    /// Linux only; other platforms report zero and the memory column of the
    /// report degrades to zeros rather than failing the run.
    #[cfg(target_os = "linux")]
    pub fn resident_memory_bytes(&self) -> u64 {
        let statm = match std::fs::read_to_string("/proc/self/statm") {
            Ok(s) => s,
            Err(_) => return 0,
        };
        let resident_pages: u64 = statm
            .split_whitespace()
            .nth(1)
            .and_then(|field| field.parse().ok())
            .unwrap_or(0);
        let page_size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        resident_pages * page_size.max(0) as u64
    }

    #[cfg(not(target_os = "linux"))]
    pub fn resident_memory_bytes(&self) -> u64 {
        0
    }

    /// CPU time consumed by this process so far, user plus system.
    #[cfg(unix)]
    pub fn process_cpu_time(&self) -> Duration {
        let mut usage: libc::rusage = unsafe { std::mem::zeroed() };
        let rc = unsafe { libc::getrusage(libc::RUSAGE_SELF, &mut usage) };
        if rc != 0 {
            return Duration::ZERO;
        }
        timeval_duration(usage.ru_utime) + timeval_duration(usage.ru_stime)
    }

    #[cfg(not(unix))]
    pub fn process_cpu_time(&self) -> Duration {
        Duration::ZERO
    }
}

impl Default for SystemProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn timeval_duration(tv: libc::timeval) -> Duration {
    Duration::new(tv.tv_sec.max(0) as u64, (tv.tv_usec.max(0) as u32) * 1000)
}
