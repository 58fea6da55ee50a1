//! Storage layer implementation for simpledb.
//!
//! This module is the lowest layer of the engine: fixed-size pages and the
//! file that holds them. Key components:
//!
//! - **Page**: Fixed-size (4KB) zero-initialized byte buffer, the basic unit of I/O
//! - **DiskManager**: Maps a page id to a file offset and performs durable
//!   whole-page reads and writes
//!
//! Caching, free-page tracking, locking and record layout belong to the layers
//! built on top of this one.

pub mod disk;
pub mod error;
pub mod page;

pub use disk::{DiskManager, DiskManagerConfig, ShortReadPolicy, SyncMode, PAGE_SIZE};
pub use error::{StorageError, StorageResult};
pub use page::{Page, PageId};
