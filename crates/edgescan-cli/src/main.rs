// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Edgescan — Find, flatten and clean up photographed documents.
//
// Entry point. Initialises logging, parses the command line and reports
// results and failures in plain language.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use edgescan_core::Rotation;
use edgescan_core::human_errors::{HumanError, humanize_error, humanize_no_detection};

use commands::Outcome;

#[derive(Parser)]
#[command(name = "edgescan")]
#[command(version, about = "Detect, crop and enhance photographed documents")]
#[command(propagate_version = true)]
struct Cli {
    /// JSON file overriding pipeline settings
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the corners of the detected document as JSON
    Detect {
        #[command(flatten)]
        input: Input,
    },
    /// Flatten the document into its own image
    Crop {
        #[command(flatten)]
        input: Input,

        /// Output image path (format from extension)
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Corners placed by hand, e.g. "10,12 400,8 410,580 5,590"
        #[arg(long, value_name = "POINTS")]
        corners: Option<String>,

        /// Save the black & white rendition
        #[arg(long)]
        enhance: bool,
    },
    /// Binarise the whole image
    Enhance {
        #[command(flatten)]
        input: Input,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Detect and crop in one step
    Scan {
        #[command(flatten)]
        input: Input,

        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,

        /// Save the black & white rendition
        #[arg(long)]
        enhance: bool,
    },
    /// Print the effective configuration as JSON
    Config,
}

#[derive(Args)]
struct Input {
    /// Path to the photo
    #[arg(value_name = "IMAGE")]
    image: PathBuf,

    /// Clockwise rotation to apply first (0, 90, 180 or 270)
    #[arg(long, default_value = "0", value_parser = parse_rotation, allow_negative_numbers = true)]
    rotate: Rotation,
}

fn parse_rotation(value: &str) -> Result<Rotation, String> {
    let degrees: i32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number of degrees"))?;
    Rotation::from_degrees(degrees)
        .ok_or_else(|| format!("{degrees} is not a multiple of 90 degrees"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match commands::run(cli) {
        Ok(Outcome::Done) => ExitCode::SUCCESS,
        Ok(Outcome::NoDocument) => {
            report(&humanize_no_detection());
            ExitCode::from(2)
        }
        Err(err) => {
            tracing::error!(error = %err, "Command failed");
            report(&humanize_error(&err));
            ExitCode::FAILURE
        }
    }
}

fn report(human: &HumanError) {
    eprintln!("{}", human.message);
    eprintln!("{}", human.suggestion);
}
