//! Wall-clock and process-memory instrumentation for setup and queries.

use std::path::Path;

/// Point-in-time resident memory (RSS) of this process. OS-level, so it
/// captures allocations made inside any external provider call as well.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemorySnapshot {
    pub rss_bytes: u64,
}

impl MemorySnapshot {
    pub fn capture() -> Self {
        #[cfg(target_os = "linux")]
        {
            Self::capture_linux()
        }
        #[cfg(target_os = "macos")]
        {
            Self::capture_macos()
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos")))]
        {
            Self::default()
        }
    }

    #[cfg(target_os = "linux")]
    fn capture_linux() -> Self {
        // /proc/self/statm: total pages, resident pages, ...
        match std::fs::read_to_string("/proc/self/statm") {
            Ok(content) => {
                let page_size = 4096u64;
                let rss_pages = content
                    .split_whitespace()
                    .nth(1)
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(0);
                Self { rss_bytes: rss_pages * page_size }
            }
            Err(_) => Self::default(),
        }
    }

    #[cfg(target_os = "macos")]
    fn capture_macos() -> Self {
        use std::process::Command;
        let output = Command::new("ps")
            .args(["-o", "rss=", "-p", &std::process::id().to_string()])
            .output();
        match output {
            Ok(out) => {
                let text = String::from_utf8_lossy(&out.stdout);
                let rss_kb = text.trim().parse::<u64>().unwrap_or(0);
                Self { rss_bytes: rss_kb * 1024 }
            }
            Err(_) => Self::default(),
        }
    }
}

/// Measures resident-memory growth across a scoped block: snapshot before,
/// snapshot after, report the non-negative delta.
///
/// This approximates peak usage: transient peaks released before the end
/// of the block are missed. Setup allocations are typically monotonic, so
/// the approximation holds. Assumes a single mutator thread during the
/// block; concurrent allocation elsewhere would corrupt the delta.
pub struct MemoryTracker {
    before: MemorySnapshot,
}

impl MemoryTracker {
    pub fn start() -> Self {
        Self { before: MemorySnapshot::capture() }
    }

    /// Non-negative RSS growth since `start`, in MB.
    pub fn growth_mb(&self) -> f64 {
        let after = MemorySnapshot::capture();
        after.rss_bytes.saturating_sub(self.before.rss_bytes) as f64 / 1e6
    }
}

/// Total size in MB of the given file paths that exist on disk.
pub fn measure_storage(paths: &[&Path]) -> f64 {
    paths
        .iter()
        .filter_map(|p| std::fs::metadata(p).ok())
        .map(|m| m.len())
        .sum::<u64>() as f64
        / 1e6
}
