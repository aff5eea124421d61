//! Subcommand implementations

use crate::cli::CreateArgs;
use anyhow::{Context, Result};
use booklet_core::{
    create_booklets, format_bytes, process_command, reorder_for_booklet, sheets,
    split_into_booklets, validate_pdf, write_booklets, BookletCommand, BookletOptions, Direction,
    InputFile, Slot,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tracing::info;

pub fn create(args: &CreateArgs) -> Result<()> {
    let base = match &args.options {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read options file {}", path.display()))?;
            BookletOptions::from_json(&json)
                .with_context(|| format!("Invalid options file {}", path.display()))?
        }
        None => BookletOptions::default(),
    };
    let options = args.apply_to(base);
    options.validate()?;

    let inputs = args
        .inputs
        .iter()
        .map(|path| {
            InputFile::read(path).with_context(|| format!("Failed to read {}", path.display()))
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Creating booklet from {} file(s), direction {:?}, paper {:?} {:?}",
        inputs.len(),
        options.direction,
        options.paper_size,
        options.orientation
    );

    let bar = ProgressBar::new(100);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {pos:>3}% {msg}")?.progress_chars("##-"),
    );
    let report = |percent: u32, message: &str| {
        bar.set_position(percent as u64);
        bar.set_message(message.to_string());
    };

    let result = create_booklets(&inputs, &options, &report);
    bar.finish_and_clear();
    let booklets = result.context("Booklet creation failed")?;

    let written = write_booklets(&args.output, &booklets)
        .with_context(|| format!("Failed to write {}", args.output.display()))?;

    let names: Vec<String> = written.iter().map(|p| p.display().to_string()).collect();
    println!("Booklet(s) created successfully: {}", names.join(", "));
    Ok(())
}

pub fn inspect(inputs: &[impl AsRef<Path>]) -> Result<()> {
    for path in inputs {
        let path = path.as_ref();
        let input =
            InputFile::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
        let info = validate_pdf(&input.bytes)
            .with_context(|| format!("{} is not a usable PDF", input.name))?;

        println!(
            "{}\t{} pages\tPDF {}\t{}{}",
            input.name,
            info.page_count,
            info.version,
            format_bytes(info.size_bytes),
            if info.encrypted { "\tencrypted" } else { "" }
        );
        if let Some(title) = &info.title {
            println!("  title:  {}", title);
        }
        if let Some(author) = &info.author {
            println!("  author: {}", author);
        }
    }
    Ok(())
}

pub fn order(pages: usize, rtl: bool, split_sheets: Option<u32>) -> Result<()> {
    let direction = if rtl { Direction::Rtl } else { Direction::Ltr };
    print!("{}", describe_order(pages, direction, split_sheets));
    Ok(())
}

/// Human-readable sheet layout, pages numbered from 1
pub fn describe_order(pages: usize, direction: Direction, split_sheets: Option<u32>) -> String {
    let indices: Vec<usize> = (0..pages).collect();
    let label = |slot: Slot| match slot {
        Slot::Page(i) => (i + 1).to_string(),
        Slot::Blank => "-".to_string(),
    };

    let mut out = String::new();
    for (b, chunk) in split_into_booklets(&indices, split_sheets)
        .iter()
        .enumerate()
    {
        out.push_str(&format!("Booklet {}\n", b + 1));
        let slots = reorder_for_booklet(chunk, direction);
        for (s, sheet) in sheets(&slots).into_iter().enumerate() {
            out.push_str(&format!(
                "  sheet {:>3}  front: {:>4} | {:<4}  back: {:>4} | {:<4}\n",
                s + 1,
                label(sheet.front[0]),
                label(sheet.front[1]),
                label(sheet.back[0]),
                label(sheet.back[1]),
            ));
        }
    }
    out
}

pub fn run(command_file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(command_file)
        .with_context(|| format!("Failed to read {}", command_file.display()))?;
    let command: BookletCommand =
        serde_json::from_str(&json).context("Invalid command JSON")?;

    let result = process_command(command);
    if let Some(error) = &result.error {
        tracing::warn!("Command failed: {}", error);
    }
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
