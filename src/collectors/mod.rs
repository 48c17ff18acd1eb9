pub mod procfs;
pub mod system;

use crate::report::{CpuInfo, DiskInfo, MemInfo, SystemInfo};

#[derive(Debug, Clone)]
pub struct SystemSnapshot {
    pub host: SystemInfo,
    pub cpu: CpuInfo,
    pub memory: MemInfo,
    pub disks: DiskInfo,
}
