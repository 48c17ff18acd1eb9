use crate::collectors::procfs;
use crate::collectors::SystemSnapshot;
use crate::report::{
    non_zero, percent, resolve_available, CpuInfo, DiskInfo, DiskUsageRow, LoadAverage, MemInfo,
    SystemInfo,
};
use std::time::Duration;
use sysinfo::{CpuExt, DiskExt, System, SystemExt};
use tracing::debug;

/// Collects host identity, CPU, memory and disk figures. Blocks for
/// `cpu_sample` so CPU usage covers a real interval instead of a counter.
pub async fn collect_system(
    system: &mut System,
    cpu_sample: Duration,
    disk_warn_threshold_percent: f64,
) -> SystemSnapshot {
    let cpu = collect_cpu(system, cpu_sample).await;
    let memory = collect_memory(system);
    let disks = collect_disks(system, disk_warn_threshold_percent);
    let host = collect_host(system);

    debug!(
        cpus = cpu.logical_cpus,
        disks = disks.rows.len(),
        io_devices = disks.io.len(),
        "system metrics collected"
    );

    SystemSnapshot {
        host,
        cpu,
        memory,
        disks,
    }
}

fn collect_host(system: &System) -> SystemInfo {
    let uptime_seconds = system.uptime();
    SystemInfo {
        host_name: system.host_name(),
        os: system.name(),
        platform: system.long_os_version(),
        platform_version: system.os_version(),
        kernel_version: system.kernel_version(),
        architecture: std::env::consts::ARCH.to_string(),
        uptime_seconds,
        uptime_days: uptime_seconds as f64 / 86_400.0,
    }
}

async fn collect_cpu(system: &mut System, sample: Duration) -> CpuInfo {
    system.refresh_cpu();
    tokio::time::sleep(sample).await;
    system.refresh_cpu();

    let cpus = system.cpus();
    let first = cpus.first();
    let usage_overall_percent = if cpus.is_empty() {
        None
    } else {
        Some(system.global_cpu_info().cpu_usage() as f64)
    };
    let load = system.load_average();

    CpuInfo {
        logical_cpus: cpus.len(),
        physical_cpus: system.physical_core_count(),
        model: first.map(|c| c.brand().trim().to_string()),
        frequency_mhz: first.map(|c| c.frequency()).unwrap_or(0),
        usage_overall_percent,
        usage_per_cpu_percent: cpus.iter().map(|c| c.cpu_usage() as f64).collect(),
        times: procfs::read_cpu_times(),
        load: LoadAverage {
            one: load.one,
            five: load.five,
            fifteen: load.fifteen,
        },
    }
}

fn collect_memory(system: &mut System) -> MemInfo {
    system.refresh_memory();
    let details = procfs::read_mem_details();
    let swap = procfs::read_swap_activity();

    let total = system.total_memory();
    let used = system.used_memory();
    let free = system.free_memory();
    let swap_total = system.total_swap();
    let swap_used = system.used_swap();

    MemInfo {
        total,
        available: resolve_available(
            system.available_memory(),
            free,
            details.cached,
            details.buffers,
        ),
        used,
        used_percent: percent(used as f64, total as f64),
        free,
        cached: details.cached,
        buffers: details.buffers,
        active: non_zero(details.active),
        inactive: non_zero(details.inactive),
        shared: non_zero(details.shared),
        swap_total,
        swap_used,
        swap_free: system.free_swap(),
        swap_used_percent: percent(swap_used as f64, swap_total as f64),
        swap_in: swap.swap_in,
        swap_out: swap.swap_out,
    }
}

fn collect_disks(system: &mut System, warn_threshold_percent: f64) -> DiskInfo {
    system.refresh_disks_list();
    system.refresh_disks();

    let rows = system
        .disks()
        .iter()
        .map(|d| {
            let total = d.total_space();
            let free = d.available_space();
            let used = total.saturating_sub(free);
            DiskUsageRow {
                mount: d.mount_point().to_string_lossy().to_string(),
                fs_type: String::from_utf8_lossy(d.file_system()).to_string(),
                device: d.name().to_string_lossy().to_string(),
                total_bytes: total,
                used_bytes: used,
                free_bytes: free,
                used_percent: percent(used as f64, total as f64),
                warn: false,
            }
        })
        .collect();

    DiskInfo::from_rows(rows, warn_threshold_percent, procfs::read_disk_io())
}
