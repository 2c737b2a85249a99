mod boundary;
mod config;
mod diff;
mod document;
mod error;
mod logger;
mod strip;

use std::{path::PathBuf, process::exit};

use boundary::Policy;
use clap::Parser;
use config::Config;
use document::Document;
use error::StripError;
use log::{debug, error, info};
use strip::StripOutcome;

#[derive(Parser, Debug)]
#[command(author, about, version)]
struct Cli {
    /// The file to edit in place
    path: Option<PathBuf>,

    /// TOML file with the boundary table [default: ./sectionstrip.toml if present]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// End-of-section policy for the built-in boundary table
    #[arg(long, value_enum, default_value_t = Policy::Depth)]
    policy: Policy,

    /// Print the diff instead of writing the file
    #[arg(long)]
    dry_run: bool,

    /// Log every section as it opens and closes
    #[arg(short, long)]
    verbose: bool,
}

fn run(args: Cli) -> Result<(), StripError> {
    let config = Config::load(args.config.as_deref(), args.policy)?;
    let document = Document::at_path(config.target(args.path))?;

    let lines = document.lines();
    let outcome = strip::strip_sections(&lines, &config.boundaries)?;
    let content = outcome.content();
    debug!(
        "{} of {} lines fall inside sections",
        outcome.removed(),
        outcome.original
    );

    for section in &outcome.sections {
        println!(
            "Removed section starting with: {} ({} lines)",
            section.start, section.removed
        );
    }

    if args.dry_run {
        print!("{}", diff::render(&document.content, &content));
        info!("dry run, {} left untouched", document.path().display());
    } else if outcome.sections.is_empty() {
        info!("no sections found in {}", document.path().display());
    } else {
        document.atomic_overwrite(&content)?;
    }

    println!("{}", summary(&outcome, args.dry_run));
    Ok(())
}

fn summary(outcome: &StripOutcome, dry_run: bool) -> String {
    let (kept, original) = (outcome.kept.len(), outcome.original);
    if outcome.sections.is_empty() {
        format!("Nothing to delete ({original} lines unchanged)")
    } else if dry_run {
        format!("Dry run. Would keep {kept} / {original} lines")
    } else {
        format!("✅ Deleted sections. Kept {kept} / {original} lines")
    }
}

fn main() {
    let args = Cli::parse();
    logger::init(args.verbose);

    if let Err(e) = run(args) {
        error!("{e}");
        exit(1);
    }
}
