use std::path::{Path, PathBuf};

use crate::environment::signals::{BatteryQuery, SignalSource};
use crate::types::EffectiveConnectionType;

const POWER_SUPPLY_DIR: &str = "/sys/class/power_supply";

/// Largest device-memory hint a browser reports, in GiB.
const MEMORY_HINT_MAX_GB: f64 = 8.0;
/// Smallest device-memory hint a browser reports, in GiB.
const MEMORY_HINT_MIN_GB: f64 = 0.25;

/// Signals read from the local host (OS, CPU, RAM, battery).
///
/// Network type, viewport, reduced-motion preference and user agent have no
/// host equivalent and are reported as unavailable.
#[derive(Debug, Clone)]
pub struct HostSignals {
    pub os_name: String,
    pub cpu_count: usize,
    pub total_ram_mb: u64,
    power_supply_dir: PathBuf,
}

impl HostSignals {
    /// Gather signals from the current host.
    pub fn gather() -> Self {
        Self {
            os_name: std::env::consts::OS.to_string(),
            cpu_count: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(0),
            total_ram_mb: Self::read_total_ram_mb(),
            power_supply_dir: PathBuf::from(POWER_SUPPLY_DIR),
        }
    }

    /// Read battery state from another sysfs-style directory.
    pub fn with_power_supply_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.power_supply_dir = dir.into();
        self
    }

    /// Total RAM in MiB, 0 when unknown.
    #[cfg(target_os = "linux")]
    fn read_total_ram_mb() -> u64 {
        match std::fs::read_to_string("/proc/meminfo") {
            Ok(meminfo) => parse_mem_total_kib(&meminfo).map_or(0, |kib| kib / 1024),
            Err(_) => 0,
        }
    }

    #[cfg(not(target_os = "linux"))]
    fn read_total_ram_mb() -> u64 {
        0
    }
}

/// `MemTotal` in KiB from the text of `/proc/meminfo`.
#[cfg_attr(not(target_os = "linux"), allow(dead_code))]
fn parse_mem_total_kib(meminfo: &str) -> Option<u64> {
    let rest = meminfo
        .lines()
        .find_map(|line| line.strip_prefix("MemTotal:"))?;
    rest.trim().trim_end_matches("kB").trim().parse().ok()
}

/// Convert total RAM to a browser-style device-memory hint: rounded down to a
/// power of two and clamped to 0.25..=8 GiB. `None` when RAM is unknown.
pub fn device_memory_hint(total_ram_mb: u64) -> Option<f64> {
    if total_ram_mb == 0 {
        return None;
    }
    let gb = total_ram_mb as f64 / 1024.0;
    let mut hint = MEMORY_HINT_MAX_GB;
    while hint > MEMORY_HINT_MIN_GB && hint > gb {
        hint /= 2.0;
    }
    Some(hint)
}

/// First `BAT*` entry with a readable `capacity` file, as a ratio.
async fn read_battery_capacity(dir: PathBuf) -> Option<f64> {
    let mut entries = tokio::fs::read_dir(&dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        if !entry.file_name().to_string_lossy().starts_with("BAT") {
            continue;
        }
        let Ok(raw) = tokio::fs::read_to_string(entry.path().join("capacity")).await else {
            continue;
        };
        if let Ok(pct) = raw.trim().parse::<u8>() {
            return Some(f64::from(pct.min(100)) / 100.0);
        }
    }
    None
}

fn has_power_supply(dir: &Path) -> bool {
    dir.is_dir()
}

impl SignalSource for HostSignals {
    fn device_memory_gb(&self) -> Option<f64> {
        device_memory_hint(self.total_ram_mb)
    }

    fn logical_cores(&self) -> Option<usize> {
        (self.cpu_count > 0).then_some(self.cpu_count)
    }

    fn effective_connection_type(&self) -> Option<EffectiveConnectionType> {
        None
    }

    fn viewport_width(&self) -> Option<u32> {
        None
    }

    fn prefers_reduced_motion(&self) -> Option<bool> {
        None
    }

    fn user_agent(&self) -> Option<String> {
        None
    }

    fn battery_level(&self) -> Option<BatteryQuery> {
        if !has_power_supply(&self.power_supply_dir) {
            return None;
        }
        let dir = self.power_supply_dir.clone();
        Some(Box::pin(read_battery_capacity(dir)))
    }
}
