// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Subcommand execution. Each command loads its input, drives the scanner and
// writes its result; failures bubble up as `ScanError` for the entry point to
// present.

use std::path::Path;

use edgescan_core::{Point, Result, ScanConfig, ScanError};
use edgescan_vision::image::source::save;
use edgescan_vision::{DocumentScanner, ScanSession, SourceImage, ViewMode};
use image::DynamicImage;
use tracing::info;

use crate::{Cli, Command, Input};

/// How a command finished when it did not fail.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Detection ran but found no page outline.
    NoDocument,
}

pub fn run(cli: Cli) -> Result<Outcome> {
    let config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };

    if let Command::Config = cli.command {
        println!("{}", config.to_json_pretty()?);
        return Ok(Outcome::Done);
    }

    let scanner = DocumentScanner::new(config);
    match cli.command {
        Command::Detect { input } => {
            let image = load(&input)?;
            match scanner.detect(&image)? {
                Some(corners) => {
                    println!("{}", serde_json::to_string_pretty(&corners)?);
                    Ok(Outcome::Done)
                }
                None => Ok(Outcome::NoDocument),
            }
        }
        Command::Crop {
            input,
            output,
            corners,
            enhance,
        } => {
            let mut session = ScanSession::new(load(&input)?)?;
            match corners {
                Some(text) => session.set_corners(parse_corners(&text)?),
                None => {
                    if session.detect(&scanner)?.is_none() {
                        return Ok(Outcome::NoDocument);
                    }
                }
            }
            session.crop(&scanner)?;
            if enhance {
                session.set_mode(ViewMode::BlackAndWhite);
            }
            write(&session.view(&scanner)?, &output)?;
            Ok(Outcome::Done)
        }
        Command::Enhance { input, output } => {
            let image = load(&input)?;
            write(&scanner.enhance(&image)?, &output)?;
            Ok(Outcome::Done)
        }
        Command::Scan {
            input,
            output,
            enhance,
        } => {
            let image = load(&input)?;
            let Some(page) = scanner.scan(&image)? else {
                return Ok(Outcome::NoDocument);
            };
            let page = if enhance { scanner.enhance(&page)? } else { page };
            write(&page, &output)?;
            Ok(Outcome::Done)
        }
        Command::Config => Ok(Outcome::Done),
    }
}

fn load(input: &Input) -> Result<DynamicImage> {
    Ok(SourceImage::open(&input.image)?
        .rotate(input.rotate)
        .into_dynamic())
}

fn write(image: &DynamicImage, path: &Path) -> Result<()> {
    save(image, path)?;
    info!(path = %path.display(), width = image.width(), height = image.height(), "Image written");
    Ok(())
}

/// Parse four whitespace-separated `x,y` pairs, in any order.
pub fn parse_corners(text: &str) -> Result<[Point; 4]> {
    let points = text
        .split_whitespace()
        .map(parse_point)
        .collect::<Result<Vec<_>>>()?;
    <[Point; 4]>::try_from(points).map_err(|points| {
        ScanError::InvalidCorners(format!("expected 4 points, got {}", points.len()))
    })
}

fn parse_point(pair: &str) -> Result<Point> {
    let invalid = || ScanError::InvalidCorners(format!("'{pair}' is not an x,y pair"));
    let (x, y) = pair.split_once(',').ok_or_else(invalid)?;
    let x: f64 = x.trim().parse().map_err(|_| invalid())?;
    let y: f64 = y.trim().parse().map_err(|_| invalid())?;
    if !x.is_finite() || !y.is_finite() {
        return Err(invalid());
    }
    Ok(Point::new(x, y))
}
