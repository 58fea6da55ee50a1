use anyhow::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use simpledb::storage::{DiskManager, Page, PageId, StorageError, PAGE_SIZE};
use tempfile::tempdir;

fn random_page(rng: &mut StdRng) -> Page {
    let mut page = Page::new();
    rng.fill(&mut page.data_mut()[..]);
    page
}

#[test]
fn test_hello_disk_round_trip() -> Result<()> {
    let dir = tempdir()?;
    let mut dm = DiskManager::open(dir.path().join("t.db"))?;

    let mut write_page = Page::new();
    write_page.write(0, b"hello disk")?;
    dm.write_page(PageId(0), &write_page)?;

    let mut read_page = Page::new();
    dm.read_page(PageId(0), &mut read_page)?;

    let mut buf = [0u8; 10];
    read_page.read(0, &mut buf)?;
    assert_eq!(&buf, b"hello disk");
    assert!(read_page.data()[10..].iter().all(|&b| b == 0));
    assert_eq!(read_page.data()[10..].len(), 4086);

    Ok(())
}

#[test]
fn test_round_trip_prefix_patterns() -> Result<()> {
    let dir = tempdir()?;
    let mut dm = DiskManager::open(dir.path().join("test.db"))?;
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for (i, len) in [1usize, 17, 512, PAGE_SIZE - 1, PAGE_SIZE].into_iter().enumerate() {
        let pattern: Vec<u8> = (0..len).map(|_| rng.gen_range(1..=255)).collect();
        let page_id = PageId(i as u32 * 3);

        let mut page = Page::new();
        page.write(0, &pattern)?;
        dm.write_page(page_id, &page)?;

        let mut read_page = Page::new();
        dm.read_page(page_id, &mut read_page)?;
        assert_eq!(&read_page.data()[..len], pattern.as_slice());
        assert!(read_page.data()[len..].iter().all(|&b| b == 0));
    }

    Ok(())
}

#[test]
fn test_auto_extension() -> Result<()> {
    let dir = tempdir()?;
    let mut dm = DiskManager::open(dir.path().join("test.db"))?;
    let mut rng = StdRng::seed_from_u64(5);

    let page = random_page(&mut rng);
    dm.write_page(PageId(5), &page)?;
    assert_eq!(dm.file_len()?, 6 * PAGE_SIZE as u64);

    for i in 0..5 {
        let mut hole = Page::new();
        dm.read_page(PageId(i), &mut hole)?;
        assert!(hole.is_zeroed(), "page {} should read back as zeros", i);
    }

    let mut read_page = Page::new();
    dm.read_page(PageId(5), &mut read_page)?;
    assert_eq!(read_page, page);

    Ok(())
}

#[test]
fn test_uninitialized_read() -> Result<()> {
    let dir = tempdir()?;
    let mut dm = DiskManager::open(dir.path().join("test.db"))?;

    for page_id in [0, 1, 100, u32::MAX] {
        let mut page = Page::new();
        dm.read_page(PageId(page_id), &mut page)?;
        assert_eq!(page.data(), &[0u8; PAGE_SIZE]);
    }

    Ok(())
}

#[test]
fn test_multi_page_independence() -> Result<()> {
    let dir = tempdir()?;
    let mut dm = DiskManager::open(dir.path().join("test.db"))?;
    let mut rng = StdRng::seed_from_u64(42);

    let pages: Vec<Page> = (0..3).map(|_| random_page(&mut rng)).collect();
    for (i, page) in pages.iter().enumerate() {
        dm.write_page(PageId(i as u32), page)?;
    }

    for i in [2usize, 0, 1, 2, 1, 0] {
        let mut read_page = Page::new();
        dm.read_page(PageId(i as u32), &mut read_page)?;
        assert_eq!(read_page, pages[i], "page {} was contaminated", i);
    }

    Ok(())
}

#[test]
fn test_idempotent_writes() -> Result<()> {
    let dir = tempdir()?;
    let mut rng = StdRng::seed_from_u64(7);
    let page = random_page(&mut rng);

    let mut once = DiskManager::open(dir.path().join("once.db"))?;
    once.write_page(PageId(1), &page)?;

    let mut twice = DiskManager::open(dir.path().join("twice.db"))?;
    twice.write_page(PageId(1), &page)?;
    twice.write_page(PageId(1), &page)?;

    let mut a = Page::new();
    let mut b = Page::new();
    once.read_page(PageId(1), &mut a)?;
    twice.read_page(PageId(1), &mut b)?;
    assert_eq!(a, b);
    assert_eq!(a, page);
    assert_eq!(once.file_len()?, twice.file_len()?);

    Ok(())
}

#[test]
fn test_reopen_preserves_pages() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("test.db");
    let mut rng = StdRng::seed_from_u64(11);
    let page = random_page(&mut rng);

    let mut dm = DiskManager::open(&path)?;
    dm.write_page(PageId(3), &page)?;
    dm.close();

    // File layout is raw pages with no header
    let raw = std::fs::read(&path)?;
    assert_eq!(raw.len(), 4 * PAGE_SIZE);
    assert!(raw[..3 * PAGE_SIZE].iter().all(|&b| b == 0));
    assert_eq!(&raw[3 * PAGE_SIZE..], &page.data()[..]);

    let mut dm = DiskManager::open(&path)?;
    let mut read_page = Page::new();
    dm.read_page(PageId(3), &mut read_page)?;
    assert_eq!(read_page, page);

    Ok(())
}

#[test]
fn test_page_out_of_range_surfaces_error() {
    let mut page = Page::new();
    let err = page.write(PAGE_SIZE - 2, b"abc").unwrap_err();
    assert!(matches!(err, StorageError::OutOfRange { .. }));
    assert!(err.to_string().contains("exceeds 4096"));
}
