use anyhow::{bail, Result};
use clap::Parser;

use std::path::PathBuf;

use lcatotals::{files, matching_files, read_rows, Report};

/// Sums the environmental impact indicators in a directory of LCA export
/// files and prints grand totals, a per-material breakdown, and any
/// duplicated id/sequence pairs.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Directory containing the export files
    directory: PathBuf,
    /// Case-insensitive substring that selects export files by name
    pattern: String,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = matching_files(&cli.directory, &cli.pattern)?;
    println!("Found {} files to process:", paths.len());
    for path in &paths {
        println!("- {}", files::display_name(path));
    }

    let mut report = Report::new();
    for path in &paths {
        println!("\nProcessing: {}...", files::display_name(path));
        let extraction = read_rows(path);
        for note in &extraction.notes {
            println!("{note}");
        }
        println!("  -> Found {} items.", extraction.rows.len());
        for row in extraction.rows {
            report.add(row);
        }
    }

    if report.rows() == 0 {
        bail!("No items found in any processed file.");
    }

    print!("{report}");
    Ok(())
}
