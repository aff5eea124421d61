//! Page range selection
//!
//! Range text looks like `"1-5, 8, 10-12"`. Tokens are separated by commas
//! or whitespace; whitespace around a `-` is allowed.

use crate::error::BookletError;
use std::collections::BTreeSet;
use std::ops::RangeInclusive;

/// Parse page range text into inclusive spans of 1-based page numbers,
/// in the order written.
///
/// Single pages become one-page spans. Spans are not clamped to any
/// document; `"1-4000000000"` is one span.
pub fn parse_spans(input: &str) -> Result<Vec<RangeInclusive<u32>>, BookletError> {
    let mut spans = Vec::new();

    for part in input.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }

        if let Some((start, end)) = part.split_once('-') {
            // Range like "1-3"; anything around it separated by spaces
            // ("1 3-5 7") contributes single pages.
            let mut before: Vec<&str> = start.split_whitespace().collect();
            let mut after: Vec<&str> = end.split_whitespace().collect();
            let start = before
                .pop()
                .ok_or_else(|| BookletError::InvalidRange(format!("Missing start: {}", part)))?;
            if after.is_empty() {
                return Err(BookletError::InvalidRange(format!("Missing end: {}", part)));
            }
            let end = after.remove(0);

            let start = parse_page(start)?;
            let end = parse_page(end)?;
            if start > end {
                return Err(BookletError::InvalidRange(format!(
                    "Start {} > end {}",
                    start, end
                )));
            }

            for single in before {
                let page = parse_page(single)?;
                spans.push(page..=page);
            }
            spans.push(start..=end);
            for single in after {
                let page = parse_page(single)?;
                spans.push(page..=page);
            }
        } else {
            for single in part.split_whitespace() {
                let page = parse_page(single)?;
                spans.push(page..=page);
            }
        }
    }

    Ok(spans)
}

/// Parse page range string like "1-3, 5, 8-10" into sorted unique page numbers.
///
/// Every span is expanded; use `select_pages` for text that may name
/// pages far beyond a document.
pub fn parse_ranges(input: &str) -> Result<Vec<u32>, BookletError> {
    let pages: BTreeSet<u32> = parse_spans(input)?.into_iter().flatten().collect();
    Ok(pages.into_iter().collect())
}

fn parse_page(token: &str) -> Result<u32, BookletError> {
    token
        .trim()
        .parse()
        .map_err(|_| BookletError::InvalidRange(format!("Invalid page: {}", token)))
}

/// Resolve range text against a document of `total_pages` pages.
///
/// Returns sorted 0-based page indices. Blank text selects every page; page
/// numbers outside the document are dropped. Selecting nothing is an error.
pub fn select_pages(input: &str, total_pages: usize) -> Result<Vec<usize>, BookletError> {
    if input.trim().is_empty() {
        if total_pages == 0 {
            return Err(BookletError::InvalidRange(
                "Invalid page range specified".into(),
            ));
        }
        return Ok((0..total_pages).collect());
    }

    let mut selected = BTreeSet::new();
    for span in parse_spans(input)? {
        // Clamp before expanding so huge upper bounds cost nothing
        let start = (*span.start() as usize).max(1);
        let end = (*span.end() as usize).min(total_pages);
        selected.extend((start..=end).map(|page| page - 1));
    }

    if selected.is_empty() {
        return Err(BookletError::InvalidRange(
            "Invalid page range specified".into(),
        ));
    }

    Ok(selected.into_iter().collect())
}
