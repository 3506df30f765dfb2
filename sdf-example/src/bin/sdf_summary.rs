//! Prints a per-record summary of an SD file.
//!
//! ```text
//! sdf-summary molecules.sdf
//! RUST_LOG=debug sdf-summary --strict-properties molecules.sdf
//! ```

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use log::info;
use sdf_parser::FieldPolicy;
use sdf_pipeline::{parse_sdf_with, Compound, ParseFailure, ParserOptions, Progress, YieldPolicy};

#[derive(Parser)]
#[command(name = "sdf-summary", about = "Summarise the records of an SD file", version)]
struct Cli {
    /// SD or MOL file to read
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Fail on property tags that are not part of the V2000 format
    #[arg(long)]
    strict_properties: bool,

    /// Fail on lines shorter than their fixed-width columns
    #[arg(long)]
    strict_fields: bool,

    /// Prefix that marks a data-item tag line
    #[arg(long, value_name = "M", default_value = "> ")]
    marker: String,
}

impl Cli {
    fn options(&self) -> ParserOptions {
        let policy = if self.strict_fields {
            FieldPolicy::Strict
        } else {
            FieldPolicy::ZeroFill
        };
        ParserOptions::default()
            .with_data_tag_marker(self.marker.clone())
            .with_field_policy(policy)
            .with_strict_properties(self.strict_properties)
    }
}

/// Logs progress through the file.
struct LogProgress;

impl Progress for LogProgress {
    fn should_yield(&mut self) -> bool {
        log::log_enabled!(log::Level::Info)
    }

    fn report_progress(&mut self, current: usize, max: usize) {
        info!("{current}/{max} bytes");
    }
}

fn summary(compound: &Compound) -> String {
    let mol = &compound.mol_file;
    let title = match mol.header.title().trim() {
        "" => "(untitled)",
        title => title,
    };
    format!(
        "#{:<4} {:<24} atoms {:>4}  bonds {:>4}  data items {:>3}",
        compound.index,
        title,
        mol.atoms.count,
        mol.bonds.count,
        compound.data_items.count
    )
}

fn run(cli: &Cli) -> anyhow::Result<bool> {
    let input = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    match parse_sdf_with(&input, &cli.options(), YieldPolicy::default(), LogProgress) {
        Ok(file) => {
            for compound in &file {
                println!("{}", summary(compound));
                if let Err(err) = compound.mol_file.check_bond_indices() {
                    println!("      warning: {err}");
                }
            }
            println!("{} records", file.len());
            Ok(true)
        }
        Err(ParseFailure::Parse(err)) => {
            let diagnostic = err.diagnostic();
            eprintln!(
                "{}:{}:{}: {}",
                cli.input.display(),
                diagnostic.line,
                diagnostic.column,
                diagnostic.message
            );
            Ok(false)
        }
        Err(failure @ ParseFailure::Cancelled(_)) => Err(failure.into()),
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
