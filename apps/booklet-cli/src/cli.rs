//! Command-line arguments

use booklet_core::{BookletOptions, Direction, Orientation, PaperSize};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "booklet")]
#[command(version, about = "Re-paginate PDF documents into printable booklets")]
pub struct Args {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create booklet PDF(s) from one or more input files
    Create(CreateArgs),

    /// Show page count and metadata of input files
    Inspect {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Print the sheet layout for a document of PAGES pages
    Order {
        pages: usize,

        /// Right-to-left reading order
        #[arg(long)]
        rtl: bool,

        /// Split into booklets of N sheets
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        split_sheets: Option<u32>,
    },

    /// Execute a JSON command file and print the JSON result
    Run { command: PathBuf },
}

#[derive(clap::Args, Debug, Default)]
pub struct CreateArgs {
    /// Input PDF files, merged in the given order
    #[arg(required = true)]
    pub inputs: Vec<PathBuf>,

    /// Output file; several booklets are written as <name>_part_<n>.pdf
    #[arg(short, long, default_value = "booklet_output.pdf")]
    pub output: PathBuf,

    /// Pages to include, e.g. "1-10, 15" (default: all)
    #[arg(short, long)]
    pub range: Option<String>,

    /// Right-to-left reading order
    #[arg(long, conflicts_with = "ltr")]
    pub rtl: bool,

    /// Left-to-right reading order
    #[arg(long)]
    pub ltr: bool,

    /// Do not stamp page numbers
    #[arg(long)]
    pub no_page_numbers: bool,

    /// Output paper size: auto, a4, a5, letter, legal
    #[arg(long, env = "BOOKLET_PAPER")]
    pub paper: Option<PaperSize>,

    /// Landscape output sheets
    #[arg(long)]
    pub landscape: bool,

    /// Split into booklets of N sheets (4 pages per sheet)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub split_sheets: Option<u32>,

    /// Password for encrypted inputs
    #[arg(long, env = "BOOKLET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// JSON options file; flags given on the command line take precedence
    #[arg(long, env = "BOOKLET_OPTIONS")]
    pub options: Option<PathBuf>,
}

impl CreateArgs {
    /// Apply command-line flags on top of `base`
    pub fn apply_to(&self, mut base: BookletOptions) -> BookletOptions {
        if let Some(range) = &self.range {
            base.page_range = range.clone();
        }
        if self.rtl {
            base.direction = Direction::Rtl;
        } else if self.ltr {
            base.direction = Direction::Ltr;
        }
        if self.no_page_numbers {
            base.add_page_numbers = false;
        }
        if let Some(paper) = self.paper {
            base.paper_size = paper;
        }
        if self.landscape {
            base.orientation = Orientation::Landscape;
        }
        if let Some(sheets) = self.split_sheets {
            base.split_booklet = true;
            base.sheets_per_booklet = sheets;
        }
        if let Some(password) = &self.password {
            base.password = Some(password.clone());
        }
        base
    }
}
