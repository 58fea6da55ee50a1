mod disk_manager;

pub use disk_manager::{DiskManager, DiskManagerConfig, ShortReadPolicy, SyncMode};

/// Size of a database page in bytes.
pub const PAGE_SIZE: usize = 4096;
