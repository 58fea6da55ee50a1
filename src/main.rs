//! simpledb page tool - inspect and edit page-structured database files

use anyhow::{bail, Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use simpledb::storage::{DiskManager, DiskManagerConfig, Page, PageId, PAGE_SIZE};
use std::path::{Path, PathBuf};

/// Inspect and edit simpledb database files page by page
#[derive(ClapParser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show file length and page count
    Info {
        /// Database file
        file: PathBuf,
    },

    /// Hex dump a page (pages never written read back as zeros)
    Dump {
        /// Database file
        file: PathBuf,

        /// Page to dump
        page_id: u32,

        /// Number of bytes to show from the start of the page
        #[arg(short, long, default_value_t = PAGE_SIZE)]
        len: usize,
    },

    /// Write text into a page, keeping the rest of its contents
    Write {
        /// Database file
        file: PathBuf,

        /// Page to modify
        page_id: u32,

        /// Byte offset inside the page
        #[arg(short, long, default_value_t = 0)]
        offset: usize,

        /// Text to write
        text: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    match args.command {
        Command::Info { file } => info(file),
        Command::Dump { file, page_id, len } => dump(file, PageId(page_id), len),
        Command::Write {
            file,
            page_id,
            offset,
            text,
        } => write(file, PageId(page_id), offset, &text),
    }
}

fn open_existing(file: &Path) -> Result<DiskManager> {
    let config = DiskManagerConfig {
        create_if_missing: false,
        ..Default::default()
    };
    DiskManager::with_config(file, config)
        .with_context(|| format!("Failed to open database file: {:?}", file))
}

fn info(file: PathBuf) -> Result<()> {
    let dm = open_existing(&file)?;
    let len = dm.file_len()?;

    println!("File:        {}", file.display());
    println!("Length:      {} bytes", len);
    println!("Page size:   {} bytes", PAGE_SIZE);
    println!("Pages:       {}", dm.num_pages()?);
    let trailing = len % PAGE_SIZE as u64;
    if trailing != 0 {
        println!("Trailing:    {} bytes (partial page)", trailing);
    }

    dm.close();
    Ok(())
}

fn dump(file: PathBuf, page_id: PageId, len: usize) -> Result<()> {
    if len > PAGE_SIZE {
        bail!("Length must be at most PAGE_SIZE ({}), got {}", PAGE_SIZE, len);
    }

    let mut dm = open_existing(&file)?;
    let mut page = Page::new();
    dm.read_page(page_id, &mut page)
        .with_context(|| format!("Failed to read page {}", page_id))?;

    for (row, chunk) in page.data()[..len].chunks(16).enumerate() {
        let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() || b == b' ' { b as char } else { '.' })
            .collect();
        println!("{:08x}  {:<47}  |{}|", row * 16, hex.join(" "), ascii);
    }

    dm.close();
    Ok(())
}

fn write(file: PathBuf, page_id: PageId, offset: usize, text: &str) -> Result<()> {
    let mut dm = DiskManager::open(&file)
        .with_context(|| format!("Failed to open database file: {:?}", file))?;

    let mut page = Page::new();
    dm.read_page(page_id, &mut page)
        .with_context(|| format!("Failed to read page {}", page_id))?;
    page.write(offset, text.as_bytes())
        .context("Text does not fit in the page")?;
    dm.write_page(page_id, &page)
        .with_context(|| format!("Failed to write page {}", page_id))?;

    log::info!(
        "Wrote {} bytes to page {} at offset {}",
        text.len(),
        page_id,
        offset
    );

    dm.close();
    Ok(())
}
