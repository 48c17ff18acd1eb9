use crate::report::{CpuTimes, DiskIoStat};
#[cfg(target_os = "linux")]
use std::fs;
#[cfg(target_os = "linux")]
use tracing::debug;

const CLOCK_TICKS_PER_SEC: f64 = 100.0;
const SECTOR_BYTES: u64 = 512;
const PAGE_BYTES: u64 = 4096;

/// Memory breakdown sysinfo does not expose, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemDetails {
    pub cached: u64,
    pub buffers: u64,
    pub active: u64,
    pub inactive: u64,
    pub shared: u64,
}

/// Pages swapped in and out since boot, converted to bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapActivity {
    pub swap_in: u64,
    pub swap_out: u64,
}

pub fn parse_meminfo(text: &str) -> MemDetails {
    let mut out = MemDetails::default();
    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let Some(kb) = rest.split_whitespace().next().and_then(|v| v.parse::<u64>().ok()) else {
            continue;
        };
        let bytes = kb.saturating_mul(1024);
        match key.trim() {
            "Cached" => out.cached = bytes,
            "Buffers" => out.buffers = bytes,
            "Active" => out.active = bytes,
            "Inactive" => out.inactive = bytes,
            "Shmem" => out.shared = bytes,
            _ => {}
        }
    }
    out
}

pub fn parse_vmstat(text: &str) -> SwapActivity {
    let mut out = SwapActivity::default();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        let Ok(pages) = value.parse::<u64>() else {
            continue;
        };
        match key {
            "pswpin" => out.swap_in = pages.saturating_mul(PAGE_BYTES),
            "pswpout" => out.swap_out = pages.saturating_mul(PAGE_BYTES),
            _ => {}
        }
    }
    out
}

/// Reads the aggregate `cpu` line of `/proc/stat`.
pub fn parse_cpu_times(text: &str) -> Option<CpuTimes> {
    let line = text.lines().find(|l| l.starts_with("cpu "))?;
    let ticks: Vec<f64> = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<f64>())
        .collect::<Result<_, _>>()
        .ok()?;
    if ticks.len() < 5 {
        return None;
    }
    Some(CpuTimes {
        user: ticks[0] / CLOCK_TICKS_PER_SEC,
        system: ticks[2] / CLOCK_TICKS_PER_SEC,
        idle: ticks[3] / CLOCK_TICKS_PER_SEC,
        iowait: ticks[4] / CLOCK_TICKS_PER_SEC,
    })
}

/// Per-device counters from `/proc/diskstats`. Devices that never saw any I/O
/// are skipped.
pub fn parse_diskstats(text: &str) -> Vec<DiskIoStat> {
    text.lines()
        .filter_map(|line| {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.len() < 11 {
                return None;
            }
            let num = |i: usize| parts[i].parse::<u64>().ok();
            let stat = DiskIoStat {
                name: parts[2].to_string(),
                read_count: num(3)?,
                read_bytes: num(5)?.saturating_mul(SECTOR_BYTES),
                read_time_ms: num(6)?,
                write_count: num(7)?,
                write_bytes: num(9)?.saturating_mul(SECTOR_BYTES),
                write_time_ms: num(10)?,
            };
            if stat.read_count == 0 && stat.write_count == 0 {
                return None;
            }
            Some(stat)
        })
        .collect()
}

#[cfg(target_os = "linux")]
fn read_proc(path: &str) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(err) => {
            debug!(path, error = %err, "proc file unreadable");
            None
        }
    }
}

#[cfg(target_os = "linux")]
pub fn read_mem_details() -> MemDetails {
    read_proc("/proc/meminfo")
        .map(|t| parse_meminfo(&t))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
pub fn read_mem_details() -> MemDetails {
    MemDetails::default()
}

#[cfg(target_os = "linux")]
pub fn read_swap_activity() -> SwapActivity {
    read_proc("/proc/vmstat")
        .map(|t| parse_vmstat(&t))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
pub fn read_swap_activity() -> SwapActivity {
    SwapActivity::default()
}

#[cfg(target_os = "linux")]
pub fn read_cpu_times() -> CpuTimes {
    read_proc("/proc/stat")
        .and_then(|t| parse_cpu_times(&t))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
pub fn read_cpu_times() -> CpuTimes {
    CpuTimes::default()
}

#[cfg(target_os = "linux")]
pub fn read_disk_io() -> Vec<DiskIoStat> {
    read_proc("/proc/diskstats")
        .map(|t| parse_diskstats(&t))
        .unwrap_or_default()
}

#[cfg(not(target_os = "linux"))]
pub fn read_disk_io() -> Vec<DiskIoStat> {
    Vec::new()
}
