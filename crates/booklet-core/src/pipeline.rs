//! Booklet creation pipeline
//!
//! merge inputs -> select pages -> split into booklets -> impose -> compose

use crate::compose::{compose_booklet, save_document};
use crate::error::BookletError;
use crate::imposition::{reorder_for_booklet, split_into_booklets};
use crate::merge::merge_documents;
use crate::options::BookletOptions;
use crate::range::select_pages;
use crate::source::{load_document, InputFile};
use std::path::{Path, PathBuf};
use tracing::info;

/// Receives progress as a percentage (0-100) plus a status message
pub trait Progress {
    fn report(&self, percent: u32, message: &str);
}

impl<F> Progress for F
where
    F: Fn(u32, &str),
{
    fn report(&self, percent: u32, message: &str) {
        self(percent, message)
    }
}

/// Discards progress
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&self, _percent: u32, _message: &str) {}
}

/// One finished booklet
#[derive(Debug, Clone)]
pub struct Booklet {
    /// 0-based position among the produced booklets
    pub index: usize,
    pub bytes: Vec<u8>,
    /// Output pages (two per sheet)
    pub page_count: u32,
    /// Source pages placed in this booklet
    pub source_pages: Vec<usize>,
}

/// Run the whole pipeline on in-memory inputs
pub fn create_booklets(
    inputs: &[InputFile],
    options: &BookletOptions,
    progress: &dyn Progress,
) -> Result<Vec<Booklet>, BookletError> {
    options.validate()?;
    if inputs.is_empty() {
        return Err(BookletError::NoDocuments);
    }

    progress.report(0, "Starting booklet creation...");
    progress.report(5, "Merging PDF files...");

    let documents = inputs
        .iter()
        .map(|input| load_document(&input.name, &input.bytes, options.password.as_deref()))
        .collect::<Result<Vec<_>, _>>()?;
    let merged = merge_documents(documents)?;
    let total_pages = merged.get_pages().len();
    info!("Merged {} file(s) into {} pages", inputs.len(), total_pages);
    progress.report(20, "Merging PDF files...");

    let selected = select_pages(&options.page_range, total_pages)?;

    progress.report(20, "Organizing pages for booklet layout...");
    let chunks = split_into_booklets(&selected, options.split_sheets());
    progress.report(40, "Organizing pages for booklet layout...");

    let total_chunks = chunks.len();
    let mut booklets = Vec::with_capacity(total_chunks);

    for (i, chunk) in chunks.into_iter().enumerate() {
        let status = format!("Processing booklet {} of {}...", i + 1, total_chunks);
        progress.report(40 + (60 * i / total_chunks) as u32, &status);
        info!("{}", status);

        let slots = reorder_for_booklet(&chunk, options.direction);
        let mut document = compose_booklet(&merged, &slots, options)?;
        let page_count = document.get_pages().len() as u32;
        let bytes = save_document(&mut document)?;

        booklets.push(Booklet {
            index: i,
            bytes,
            page_count,
            source_pages: chunk,
        });

        progress.report(40 + (60 * (i + 1) / total_chunks) as u32, &status);
    }

    progress.report(100, "Booklet creation complete");
    Ok(booklets)
}

/// Output file names for `count` booklets.
///
/// A single booklet goes to `base`; several go to `<stem>_part_<n><ext>`.
pub fn output_paths(base: &Path, count: usize) -> Vec<PathBuf> {
    if count <= 1 {
        return vec![base.to_path_buf()];
    }

    let stem = base
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "booklet".to_string());
    let extension = base
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..=count)
        .map(|n| base.with_file_name(format!("{}_part_{}{}", stem, n, extension)))
        .collect()
}

/// Write booklets next to `base`, returning the paths written
pub fn write_booklets(base: &Path, booklets: &[Booklet]) -> Result<Vec<PathBuf>, BookletError> {
    let paths = output_paths(base, booklets.len());
    for (path, booklet) in paths.iter().zip(booklets) {
        std::fs::write(path, &booklet.bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), booklet.bytes.len());
    }
    Ok(paths)
}
