//! Saddle-stitch page ordering
//!
//! A booklet of `n` pages (padded to a multiple of four) is printed on
//! `n / 4` sheets. Each sheet carries four slots: front-left, front-right,
//! back-left, back-right. Taking pages alternately from both ends of the
//! page list produces that order, so that the stacked sheets fold into
//! reading order.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Pages per folded sheet (two per side)
pub const PAGES_PER_SHEET: usize = 4;

/// Reading direction of the finished booklet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "LTR", alias = "ltr", alias = "Ltr")]
    Ltr,
    #[serde(rename = "RTL", alias = "rtl", alias = "Rtl")]
    Rtl,
}

/// One half of an output page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Slot {
    /// 0-based index into the merged source document
    Page(usize),
    /// Padding added to fill the last sheet
    Blank,
}

impl Slot {
    pub fn page(&self) -> Option<usize> {
        match self {
            Slot::Page(index) => Some(*index),
            Slot::Blank => None,
        }
    }
}

/// The four slots of one physical sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub front: [Slot; 2],
    pub back: [Slot; 2],
}

/// Split page indices into consecutive booklets of `sheets` sheets each.
///
/// `None` keeps everything in a single booklet.
pub fn split_into_booklets(page_indices: &[usize], sheets: Option<u32>) -> Vec<Vec<usize>> {
    match sheets {
        Some(sheets) if sheets > 0 => {
            let pages_per_booklet = sheets as usize * PAGES_PER_SHEET;
            page_indices
                .chunks(pages_per_booklet)
                .map(|chunk| chunk.to_vec())
                .collect()
        }
        _ => vec![page_indices.to_vec()],
    }
}

/// Number of blank slots needed to fill the last sheet
pub fn padding_for(num_pages: usize) -> usize {
    (PAGES_PER_SHEET - num_pages % PAGES_PER_SHEET) % PAGES_PER_SHEET
}

/// Reorder page indices for booklet printing.
///
/// Consecutive pairs of the result are the left and right halves of one
/// output page; every four slots form one sheet (front, then back).
pub fn reorder_for_booklet(page_indices: &[usize], direction: Direction) -> Vec<Slot> {
    let padding = padding_for(page_indices.len());

    let mut queue: VecDeque<Slot> = page_indices
        .iter()
        .map(|&i| Slot::Page(i))
        .chain(std::iter::repeat(Slot::Blank).take(padding))
        .collect();

    let mut reordered = Vec::with_capacity(queue.len());

    // The queue length is a multiple of four, so each pop is always Some
    while let (Some(a), Some(b), Some(c), Some(d)) = match direction {
        Direction::Ltr => (
            queue.pop_back(),
            queue.pop_front(),
            queue.pop_front(),
            queue.pop_back(),
        ),
        Direction::Rtl => (
            queue.pop_front(),
            queue.pop_back(),
            queue.pop_back(),
            queue.pop_front(),
        ),
    } {
        reordered.extend([a, b, c, d]);
    }

    reordered
}

/// Group an imposed slot sequence into sheets
pub fn sheets(slots: &[Slot]) -> Vec<Sheet> {
    slots
        .chunks(PAGES_PER_SHEET)
        .map(|chunk| {
            let get = |i: usize| chunk.get(i).copied().unwrap_or(Slot::Blank);
            Sheet {
                front: [get(0), get(1)],
                back: [get(2), get(3)],
            }
        })
        .collect()
}
