//! Sheet geometry
//!
//! All sizes are PDF points (1/72 inch).

use serde::{Deserialize, Serialize};

/// Share of each half-sheet a page may occupy
pub const FILL_RATIO: f64 = 0.9;

pub const POINTS_PER_INCH: f64 = 72.0;
pub const POINTS_PER_MM: f64 = POINTS_PER_INCH / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    /// Falls back to A4
    #[default]
    Auto,
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    /// Portrait (width, height) in points
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PaperSize::Auto | PaperSize::A4 => (210.0 * POINTS_PER_MM, 297.0 * POINTS_PER_MM),
            PaperSize::A5 => (148.0 * POINTS_PER_MM, 210.0 * POINTS_PER_MM),
            PaperSize::Letter => (8.5 * POINTS_PER_INCH, 11.0 * POINTS_PER_INCH),
            PaperSize::Legal => (8.5 * POINTS_PER_INCH, 14.0 * POINTS_PER_INCH),
        }
    }
}

impl std::str::FromStr for PaperSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(PaperSize::Auto),
            "a4" => Ok(PaperSize::A4),
            "a5" => Ok(PaperSize::A5),
            "letter" => Ok(PaperSize::Letter),
            "legal" => Ok(PaperSize::Legal),
            other => Err(format!(
                "unknown paper size '{}' (expected auto, a4, a5, letter or legal)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Output sheet (width, height) for a paper size and orientation
pub fn sheet_size(paper: PaperSize, orientation: Orientation) -> (f64, f64) {
    let (width, height) = paper.dimensions();
    match orientation {
        Orientation::Portrait => (width, height),
        Orientation::Landscape => (height, width),
    }
}

/// Which half of the output page a slot occupies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Where a source page lands on the output page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub scale: f64,
}

/// Fit a page into one half of the sheet, centred, never enlarged
pub fn place_in_half(sheet: (f64, f64), page: (f64, f64), side: Side) -> Placement {
    let (sheet_width, sheet_height) = sheet;
    let (page_width, page_height) = page;
    let half_width = sheet_width / 2.0;

    let max_width = half_width * FILL_RATIO;
    let max_height = sheet_height * FILL_RATIO;
    let scale = if page_width > 0.0 && page_height > 0.0 {
        (max_width / page_width).min(max_height / page_height).min(1.0)
    } else {
        1.0
    };

    let width = page_width * scale;
    let height = page_height * scale;
    let offset = match side {
        Side::Left => 0.0,
        Side::Right => half_width,
    };

    Placement {
        x: offset + (half_width - width) / 2.0,
        y: (sheet_height - height) / 2.0,
        width,
        height,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_paper_dimensions() {
        let (w, h) = PaperSize::A4.dimensions();
        assert!(approx(w, 595.28) && approx(h, 841.89));
        assert_eq!(PaperSize::Letter.dimensions(), (612.0, 792.0));
        assert_eq!(PaperSize::Legal.dimensions(), (612.0, 1008.0));
        assert_eq!(PaperSize::Auto.dimensions(), PaperSize::A4.dimensions());
    }

    #[test]
    fn test_landscape_swaps_dimensions() {
        assert_eq!(
            sheet_size(PaperSize::Letter, Orientation::Landscape),
            (792.0, 612.0)
        );
    }

    #[test]
    fn test_paper_size_from_str() {
        assert_eq!("A5".parse::<PaperSize>().unwrap(), PaperSize::A5);
        assert_eq!("letter".parse::<PaperSize>().unwrap(), PaperSize::Letter);
        assert!("tabloid".parse::<PaperSize>().is_err());
    }

    #[test]
    fn test_place_letter_pages_on_landscape_letter() {
        let sheet = (792.0, 612.0);
        let left = place_in_half(sheet, (612.0, 792.0), Side::Left);
        // Width bound: 0.9 * 396 / 612
        assert!(approx(left.scale, 356.4 / 612.0));
        assert!(approx(left.width, 356.4));
        assert!(approx(left.height, 792.0 * 356.4 / 612.0));
        assert!(approx(left.x, 19.8));
        assert!(approx(left.y, (612.0 - left.height) / 2.0));

        let right = place_in_half(sheet, (612.0, 792.0), Side::Right);
        assert!(approx(right.x, left.x + 396.0));
        assert_eq!(right.y, left.y);
    }

    #[test]
    fn test_small_pages_are_not_enlarged() {
        let placement = place_in_half((842.0, 595.0), (100.0, 150.0), Side::Left);
        assert_eq!(placement.scale, 1.0);
        assert_eq!((placement.width, placement.height), (100.0, 150.0));
        assert_eq!(placement.x, (421.0 - 100.0) / 2.0);
    }
}
