//! Booklet imposition for PDF documents
//!
//! Takes one or more PDFs, concatenates them, and re-paginates the selected
//! pages into saddle-stitch order: printed double-sided and folded, the
//! output reads in order. Each output page holds two source pages side by
//! side, placed as vector Form XObjects with lopdf.
//!
//! Entry points:
//! - `create_booklets`: the full pipeline over in-memory inputs
//! - `BookletSession`: stateful input list + options for interactive front ends
//! - `process_command`: JSON command envelope

pub mod command;
pub mod compose;
pub mod error;
pub mod imposition;
pub mod layout;
pub mod merge;
pub mod options;
pub mod page_info;
pub mod pipeline;
pub mod range;
pub mod session;
pub mod source;

#[cfg(test)]
mod test_support;

pub use command::{process_command, BookletCommand, ProcessMetrics, ProcessResult};
pub use compose::{compose_booklet, save_document};
pub use error::BookletError;
pub use imposition::{reorder_for_booklet, sheets, split_into_booklets, Direction, Sheet, Slot};
pub use layout::{Orientation, PaperSize};
pub use merge::merge_documents;
pub use options::BookletOptions;
pub use page_info::{PageInfo, PageOrientation};
pub use pipeline::{
    create_booklets, output_paths, write_booklets, Booklet, NoProgress, Progress,
};
pub use range::{parse_ranges, parse_spans, select_pages};
pub use session::{BookletSession, DocumentEntry};
pub use source::{get_page_count, load_document, validate_pdf, InputFile, PdfInfo};

/// Format bytes as human-readable string
pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
