//! Page-level information extraction
//!
//! Reads the geometry of individual pages, following the page tree for
//! inheritable attributes (MediaBox, Rotate, Resources).

use crate::error::BookletError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

/// Default page box when none is present anywhere in the tree (US Letter)
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Guards against cyclic Parent chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Information about a single PDF page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageInfo {
    /// Page number (1-indexed)
    pub page_num: u32,
    /// MediaBox as [x1, y1, x2, y2]
    pub media_box: [f64; 4],
    /// Page width in points (1 point = 1/72 inch)
    pub width: f64,
    /// Page height in points
    pub height: f64,
    /// Page rotation in degrees (0, 90, 180, 270)
    pub rotation: i32,
    /// Orientation as displayed, accounting for rotation
    pub orientation: PageOrientation,
}

/// Page orientation
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum PageOrientation {
    Portrait,
    Landscape,
    Square,
}

impl PageInfo {
    /// Extract page info by page number
    pub fn from_document(doc: &Document, page_num: u32) -> Result<Self, BookletError> {
        let pages = doc.get_pages();
        let page_id = pages
            .get(&page_num)
            .ok_or_else(|| BookletError::OperationError(format!("Page {} not found", page_num)))?;
        Self::from_page_id(doc, page_num, *page_id)
    }

    /// Extract page info for a known page object
    pub fn from_page_id(
        doc: &Document,
        page_num: u32,
        page_id: ObjectId,
    ) -> Result<Self, BookletError> {
        let page_dict = doc
            .get_dictionary(page_id)
            .map_err(|_| BookletError::OperationError(format!("Page {} is not a dictionary", page_num)))?;

        let media_box = match inherited_attribute(doc, page_dict, b"MediaBox") {
            Some(obj) => parse_box_array(doc, obj)?,
            None => DEFAULT_MEDIA_BOX,
        };
        let (width, height) = (media_box[2] - media_box[0], media_box[3] - media_box[1]);

        let rotation = inherited_attribute(doc, page_dict, b"Rotate")
            .and_then(|o| o.as_i64().ok())
            .map(|angle| normalize_rotation(angle as i32))
            .unwrap_or(0);

        let mut info = Self {
            page_num,
            media_box,
            width,
            height,
            rotation,
            orientation: PageOrientation::Portrait,
        };

        let (effective_width, effective_height) = info.displayed_size();
        info.orientation = if (effective_width - effective_height).abs() < 1.0 {
            PageOrientation::Square
        } else if effective_width > effective_height {
            PageOrientation::Landscape
        } else {
            PageOrientation::Portrait
        };

        Ok(info)
    }

    /// Get all page infos for a document
    pub fn all_from_document(doc: &Document) -> Vec<Result<Self, BookletError>> {
        doc.get_pages()
            .into_iter()
            .map(|(num, id)| Self::from_page_id(doc, num, id))
            .collect()
    }

    /// Size of the page as a viewer shows it (swapped for quarter turns)
    pub fn displayed_size(&self) -> (f64, f64) {
        if self.rotation == 90 || self.rotation == 270 {
            (self.height, self.width)
        } else {
            (self.width, self.height)
        }
    }
}

/// Look up an inheritable page attribute, walking Parent links
pub(crate) fn inherited_attribute<'a>(
    doc: &'a Document,
    page_dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Object> {
    let mut current = page_dict;
    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = current.get(key) {
            return Some(value);
        }
        let parent_id = current.get(b"Parent").and_then(|p| p.as_reference()).ok()?;
        current = doc.get_dictionary(parent_id).ok()?;
    }
    None
}

/// Parse a box array [x1, y1, x2, y2], resolving an indirect array
fn parse_box_array(doc: &Document, obj: &Object) -> Result<[f64; 4], BookletError> {
    let obj = match obj {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| BookletError::OperationError(e.to_string()))?,
        other => other,
    };
    let array = obj
        .as_array()
        .map_err(|_| BookletError::OperationError("MediaBox is not an array".into()))?;

    if array.len() != 4 {
        return Err(BookletError::OperationError(
            "MediaBox must have 4 elements".into(),
        ));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = match obj {
            Object::Integer(n) => *n as f64,
            Object::Real(n) => *n as f64,
            _ => {
                return Err(BookletError::OperationError(format!(
                    "MediaBox element {} is not a number",
                    i
                )))
            }
        };
    }

    // Normalise so that x1 < x2 and y1 < y2
    Ok([
        result[0].min(result[2]),
        result[1].min(result[3]),
        result[0].max(result[2]),
        result[1].max(result[3]),
    ])
}

/// Normalize rotation to 0, 90, 180, or 270
fn normalize_rotation(angle: i32) -> i32 {
    let normalized = angle.rem_euclid(360);
    // Non-quarter angles are invalid per PDF; snap down to a quarter turn
    normalized - normalized % 90
}
