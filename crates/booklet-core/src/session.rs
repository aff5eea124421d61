//! Stateful booklet session
//!
//! Holds the ordered input list and the options between user actions, so a
//! front end only forwards events: add, remove, move, configure, execute.

use crate::error::BookletError;
use crate::options::BookletOptions;
use crate::pipeline::{create_booklets, Booklet, Progress};
use crate::range::{parse_spans, select_pages};
use crate::source::{validate_pdf, InputFile, PdfInfo};

/// Input entry with metadata
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub name: String,
    pub bytes: Vec<u8>,
    pub info: PdfInfo,
}

#[derive(Debug, Default)]
pub struct BookletSession {
    documents: Vec<DocumentEntry>,
    options: BookletOptions,
}

impl BookletSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: BookletOptions) -> Self {
        Self {
            documents: Vec::new(),
            options,
        }
    }

    /// Add a document to the end of the list
    pub fn add_document(&mut self, name: &str, bytes: Vec<u8>) -> Result<PdfInfo, BookletError> {
        if self.documents.iter().any(|d| d.name == name) {
            return Err(BookletError::InvalidOptions(format!(
                "{} is already in the list",
                name
            )));
        }

        let info = validate_pdf(&bytes)?;
        if info.encrypted && self.options.password.is_none() {
            tracing::warn!("{} is encrypted; a password may be required", name);
        }

        self.documents.push(DocumentEntry {
            name: name.to_string(),
            bytes,
            info: info.clone(),
        });

        Ok(info)
    }

    /// Remove a document by index
    pub fn remove_document(&mut self, index: usize) -> Result<DocumentEntry, BookletError> {
        self.check_index(index)?;
        Ok(self.documents.remove(index))
    }

    /// Move a document up (negative delta) or down (positive delta)
    pub fn move_document(&mut self, index: usize, delta: isize) -> Result<usize, BookletError> {
        self.check_index(index)?;
        let target = index
            .checked_add_signed(delta)
            .filter(|&t| t < self.documents.len())
            .ok_or_else(|| {
                BookletError::InvalidOptions(format!(
                    "Cannot move document {} by {}",
                    index, delta
                ))
            })?;

        let entry = self.documents.remove(index);
        self.documents.insert(target, entry);
        Ok(target)
    }

    /// Reorder documents; `new_order` lists current indices in the desired order
    pub fn reorder_documents(&mut self, new_order: &[usize]) -> Result<(), BookletError> {
        if new_order.len() != self.documents.len() {
            return Err(BookletError::InvalidOptions(
                "Invalid order: wrong number of indices".into(),
            ));
        }

        let mut seen = vec![false; self.documents.len()];
        for &idx in new_order {
            if idx >= self.documents.len() {
                return Err(BookletError::InvalidOptions(
                    "Invalid order: index out of bounds".into(),
                ));
            }
            if seen[idx] {
                return Err(BookletError::InvalidOptions(
                    "Invalid order: duplicate index".into(),
                ));
            }
            seen[idx] = true;
        }

        let mut slots: Vec<Option<DocumentEntry>> =
            std::mem::take(&mut self.documents).into_iter().map(Some).collect();
        self.documents = new_order
            .iter()
            .filter_map(|&idx| slots[idx].take())
            .collect();

        Ok(())
    }

    /// Set page selection, validated against the current inputs
    pub fn set_page_range(&mut self, range: &str) -> Result<(), BookletError> {
        parse_spans(range)?;
        if !self.documents.is_empty() {
            select_pages(range, self.total_page_count() as usize)?;
        }
        self.options.page_range = range.to_string();
        Ok(())
    }

    pub fn options(&self) -> &BookletOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut BookletOptions {
        &mut self.options
    }

    pub fn documents(&self) -> &[DocumentEntry] {
        &self.documents
    }

    /// Clear inputs and restore default options
    pub fn reset(&mut self) {
        self.documents.clear();
        self.options = BookletOptions::default();
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Total page count across all documents
    pub fn total_page_count(&self) -> u32 {
        self.documents.iter().map(|d| d.info.page_count).sum()
    }

    pub fn can_execute(&self) -> bool {
        !self.documents.is_empty()
    }

    pub fn execute(&self, progress: &dyn Progress) -> Result<Vec<Booklet>, BookletError> {
        if !self.can_execute() {
            return Err(BookletError::NoDocuments);
        }

        let inputs: Vec<InputFile> = self
            .documents
            .iter()
            .map(|d| InputFile::new(d.name.clone(), d.bytes.clone()))
            .collect();

        create_booklets(&inputs, &self.options, progress)
    }

    fn check_index(&self, index: usize) -> Result<(), BookletError> {
        if index >= self.documents.len() {
            return Err(BookletError::InvalidOptions(
                "Document index out of bounds".into(),
            ));
        }
        Ok(())
    }
}
