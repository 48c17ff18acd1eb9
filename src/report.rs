use crate::eventlog::LogReportView;
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub generated_at: DateTime<Local>,
    pub title: String,
    pub system: SystemInfo,
    pub cpu: CpuInfo,
    pub memory: MemInfo,
    pub disks: DiskInfo,
    pub event_log: LogReportView,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemInfo {
    pub host_name: Option<String>,
    pub os: Option<String>,
    pub platform: Option<String>,
    pub platform_version: Option<String>,
    pub kernel_version: Option<String>,
    pub architecture: String,
    pub uptime_seconds: u64,
    pub uptime_days: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CpuInfo {
    pub logical_cpus: usize,
    pub physical_cpus: Option<usize>,
    pub model: Option<String>,
    pub frequency_mhz: u64,
    pub usage_overall_percent: Option<f64>,
    pub usage_per_cpu_percent: Vec<f64>,
    pub times: CpuTimes,
    pub load: LoadAverage,
}

/// Cumulative CPU time in seconds since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CpuTimes {
    pub user: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LoadAverage {
    pub one: f64,
    pub five: f64,
    pub fifteen: f64,
}

/// Memory figures in bytes.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MemInfo {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub used_percent: f64,
    pub free: u64,
    pub cached: u64,
    pub buffers: u64,
    pub active: Option<u64>,
    pub inactive: Option<u64>,
    pub shared: Option<u64>,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
    pub swap_used_percent: f64,
    pub swap_in: u64,
    pub swap_out: u64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DiskInfo {
    pub rows: Vec<DiskUsageRow>,
    pub warn_threshold_percent: f64,
    pub warnings: usize,
    pub io: Vec<DiskIoStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiskUsageRow {
    pub mount: String,
    pub fs_type: String,
    pub device: String,
    pub total_bytes: u64,
    pub used_bytes: u64,
    pub free_bytes: u64,
    pub used_percent: f64,
    pub warn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiskIoStat {
    pub name: String,
    pub read_count: u64,
    pub write_count: u64,
    pub read_bytes: u64,
    pub write_bytes: u64,
    pub read_time_ms: u64,
    pub write_time_ms: u64,
}

impl DiskInfo {
    /// Sorts rows by mount point, flags those above the threshold and counts them.
    pub fn from_rows(
        mut rows: Vec<DiskUsageRow>,
        warn_threshold_percent: f64,
        mut io: Vec<DiskIoStat>,
    ) -> Self {
        rows.sort_by(|a, b| a.mount.cmp(&b.mount));
        for row in &mut rows {
            row.warn = row.used_percent > warn_threshold_percent;
        }
        io.sort_by(|a, b| a.name.cmp(&b.name));
        let warnings = rows.iter().filter(|r| r.warn).count();
        Self {
            rows,
            warn_threshold_percent,
            warnings,
            io,
        }
    }
}

/// Some platforms report no available memory; fall back to what the kernel
/// could reclaim.
pub fn resolve_available(available: u64, free: u64, cached: u64, buffers: u64) -> u64 {
    if available > 0 {
        return available;
    }
    free.saturating_add(cached).saturating_add(buffers)
}

pub fn percent(used: f64, total: f64) -> f64 {
    if total <= 0.0 {
        0.0
    } else {
        (used / total) * 100.0
    }
}

pub fn non_zero(v: u64) -> Option<u64> {
    (v > 0).then_some(v)
}
