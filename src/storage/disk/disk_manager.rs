use crate::storage::error::{StorageError, StorageResult};
use crate::storage::page::{Page, PageId};
use crate::storage::PAGE_SIZE;
use log::{debug, trace};
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

/// How a page write is forced to stable storage before `write_page` returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncMode {
    /// `fsync`: data and file metadata.
    #[default]
    All,
    /// `fdatasync`: data, plus only the metadata needed to read it back.
    Data,
}

/// What `read_page` does when fewer than `PAGE_SIZE` bytes are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShortReadPolicy {
    /// Zero the whole page, discarding any bytes that were read.
    #[default]
    ZeroPage,
    /// Keep the bytes that were read and zero only the remainder.
    ZeroRemainder,
}

/// Disk manager configuration.
#[derive(Debug, Clone)]
pub struct DiskManagerConfig {
    /// Create the database file if it does not exist.
    pub create_if_missing: bool,
    pub sync_mode: SyncMode,
    pub short_read: ShortReadPolicy,
}

impl Default for DiskManagerConfig {
    fn default() -> Self {
        DiskManagerConfig {
            create_if_missing: true,
            sync_mode: SyncMode::All,
            short_read: ShortReadPolicy::ZeroPage,
        }
    }
}

/// Durable, page-granular I/O against a single database file.
///
/// Page `n` lives at byte offset `n * PAGE_SIZE`. Writing past the end of the
/// file grows it; the gap reads back as zeros. Every write is synced before
/// it returns, so there is nothing to flush on close.
pub struct DiskManager {
    file: File,
    path: PathBuf,
    config: DiskManagerConfig,
}

impl DiskManager {
    /// Open the database file at `path`, creating it if it does not exist.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::with_config(path, DiskManagerConfig::default())
    }

    /// Create a fresh, empty database file, truncating any existing one.
    pub fn create(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .map_err(|source| StorageError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Created database file {:?}", path);
        Ok(Self {
            file,
            path: path.to_path_buf(),
            config: DiskManagerConfig::default(),
        })
    }

    pub fn with_config(path: impl AsRef<Path>, config: DiskManagerConfig) -> StorageResult<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(config.create_if_missing)
            .open(path)
            .map_err(|source| StorageError::FileOpen {
                path: path.to_path_buf(),
                source,
            })?;

        debug!("Opened database file {:?} with {:?}", path, config);
        Ok(Self {
            file,
            path: path.to_path_buf(),
            config,
        })
    }

    /// Write `page` to disk at `page_id` and sync it before returning.
    pub fn write_page(&mut self, page_id: PageId, page: &Page) -> StorageResult<()> {
        let offset = page_id.offset();
        trace!("Writing page {} at offset {}", page_id, offset);

        // Seeking past EOF is fine; the write extends the file and leaves a hole.
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.data())?;
        match self.config.sync_mode {
            SyncMode::All => self.file.sync_all()?,
            SyncMode::Data => self.file.sync_data()?,
        }

        Ok(())
    }

    /// Read the page at `page_id` into `page`.
    ///
    /// A page that lies beyond the end of the file reads back as all zeros. A
    /// page that is only partly on disk is handled according to the configured
    /// [`ShortReadPolicy`].
    pub fn read_page(&mut self, page_id: PageId, page: &mut Page) -> StorageResult<()> {
        trace!("Reading page {} at offset {}", page_id, page_id.offset());
        load_page(&mut self.file, page_id, self.config.short_read, page)
    }

    /// Number of whole pages currently in the file.
    pub fn num_pages(&self) -> StorageResult<u64> {
        Ok(whole_pages(self.file_len()?))
    }

    pub fn file_len(&self) -> StorageResult<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DiskManagerConfig {
        &self.config
    }

    /// Release the file handle.
    pub fn close(self) {
        debug!("Closing database file {:?}", self.path);
    }
}

/// Read the page at `page_id` from `reader` into `page`.
///
/// The bytes land in a scratch buffer first, so `page` is left untouched if
/// the read fails.
fn load_page<R: Read + Seek>(
    reader: &mut R,
    page_id: PageId,
    policy: ShortReadPolicy,
    page: &mut Page,
) -> StorageResult<()> {
    let mut buf = [0u8; PAGE_SIZE];
    reader.seek(SeekFrom::Start(page_id.offset()))?;
    let bytes_read = read_up_to(reader, &mut buf)?;

    if bytes_read < PAGE_SIZE {
        debug!(
            "Short read of page {}: {} of {} bytes, applying {:?}",
            page_id, bytes_read, PAGE_SIZE, policy
        );
        if policy == ShortReadPolicy::ZeroPage {
            buf.fill(0);
        }
    }

    page.data_mut().copy_from_slice(&buf);
    Ok(())
}

fn whole_pages(file_size: u64) -> u64 {
    file_size / PAGE_SIZE as u64
}

/// Fill `buf` from `reader` until it is full or EOF is hit, returning the
/// number of bytes read.
fn read_up_to(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
