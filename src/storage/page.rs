use crate::storage::error::{StorageError, StorageResult};
use crate::storage::PAGE_SIZE;
use byteorder::{ByteOrder, LittleEndian};
use std::fmt;
use std::ops::Range;

/// Zero-based index of a page in the database file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PageId(pub u32);

impl PageId {
    /// Byte offset of this page in the database file.
    pub fn offset(self) -> u64 {
        self.0 as u64 * PAGE_SIZE as u64
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A fixed-size, zero-initialized page buffer.
///
/// The page knows nothing about files or other pages. Every byte is either
/// explicitly written or still zero.
#[derive(Clone, PartialEq, Eq)]
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    pub fn new() -> Self {
        Self {
            data: [0u8; PAGE_SIZE],
        }
    }

    /// Copy `src` into the page starting at `offset`.
    ///
    /// Fails with [`StorageError::OutOfRange`] if `offset + src.len()` exceeds
    /// `PAGE_SIZE`; the page is left untouched in that case.
    pub fn write(&mut self, offset: usize, src: &[u8]) -> StorageResult<()> {
        let range = Self::range(offset, src.len())?;
        self.data[range].copy_from_slice(src);
        Ok(())
    }

    /// Copy `dst.len()` bytes starting at `offset` into `dst`.
    pub fn read(&self, offset: usize, dst: &mut [u8]) -> StorageResult<()> {
        let range = Self::range(offset, dst.len())?;
        dst.copy_from_slice(&self.data[range]);
        Ok(())
    }

    pub fn read_u16(&self, offset: usize) -> StorageResult<u16> {
        Ok(LittleEndian::read_u16(&self.data[Self::range(offset, 2)?]))
    }

    pub fn read_u32(&self, offset: usize) -> StorageResult<u32> {
        Ok(LittleEndian::read_u32(&self.data[Self::range(offset, 4)?]))
    }

    pub fn read_u64(&self, offset: usize) -> StorageResult<u64> {
        Ok(LittleEndian::read_u64(&self.data[Self::range(offset, 8)?]))
    }

    pub fn write_u16(&mut self, offset: usize, value: u16) -> StorageResult<()> {
        LittleEndian::write_u16(&mut self.data[Self::range(offset, 2)?], value);
        Ok(())
    }

    pub fn write_u32(&mut self, offset: usize, value: u32) -> StorageResult<()> {
        LittleEndian::write_u32(&mut self.data[Self::range(offset, 4)?], value);
        Ok(())
    }

    pub fn write_u64(&mut self, offset: usize, value: u64) -> StorageResult<()> {
        LittleEndian::write_u64(&mut self.data[Self::range(offset, 8)?], value);
        Ok(())
    }

    pub fn data(&self) -> &[u8; PAGE_SIZE] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8; PAGE_SIZE] {
        &mut self.data
    }

    /// Zero every byte of the page.
    pub fn reset(&mut self) {
        self.data.fill(0);
    }

    pub fn is_zeroed(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    fn range(offset: usize, len: usize) -> StorageResult<Range<usize>> {
        match offset.checked_add(len) {
            Some(end) if end <= PAGE_SIZE => Ok(offset..end),
            _ => Err(StorageError::OutOfRange {
                offset,
                len,
                page_size: PAGE_SIZE,
            }),
        }
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let non_zero = self.data.iter().filter(|&&b| b != 0).count();
        f.debug_struct("Page")
            .field("size", &PAGE_SIZE)
            .field("non_zero_bytes", &non_zero)
            .finish()
    }
}
