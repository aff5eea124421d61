//! Booklet creation options

use crate::error::BookletError;
use crate::imposition::Direction;
use crate::layout::{Orientation, PaperSize};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SHEETS_PER_BOOKLET: u32 = 10;
pub const MAX_SHEETS_PER_BOOKLET: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookletOptions {
    /// Page selection, e.g. "1-10, 15"; empty selects every page
    pub page_range: String,
    pub direction: Direction,
    /// Stamp the source page number under each placed page
    pub add_page_numbers: bool,
    pub paper_size: PaperSize,
    pub orientation: Orientation,
    /// Split the selection into booklets of `sheets_per_booklet` sheets
    pub split_booklet: bool,
    pub sheets_per_booklet: u32,
    /// Password for encrypted inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl Default for BookletOptions {
    fn default() -> Self {
        Self {
            page_range: String::new(),
            direction: Direction::Ltr,
            add_page_numbers: true,
            paper_size: PaperSize::Auto,
            orientation: Orientation::Portrait,
            split_booklet: false,
            sheets_per_booklet: DEFAULT_SHEETS_PER_BOOKLET,
            password: None,
        }
    }
}

impl BookletOptions {
    pub fn validate(&self) -> Result<(), BookletError> {
        if !(1..=MAX_SHEETS_PER_BOOKLET).contains(&self.sheets_per_booklet) {
            return Err(BookletError::InvalidOptions(format!(
                "sheets_per_booklet must be between 1 and {}, got {}",
                MAX_SHEETS_PER_BOOKLET, self.sheets_per_booklet
            )));
        }
        Ok(())
    }

    /// Sheets per booklet when splitting is enabled
    pub fn split_sheets(&self) -> Option<u32> {
        self.split_booklet.then_some(self.sheets_per_booklet)
    }

    pub fn from_json(json: &str) -> Result<Self, BookletError> {
        let options: Self = serde_json::from_str(json)
            .map_err(|e| BookletError::SerializationError(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }
}
