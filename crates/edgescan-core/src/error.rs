// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Edgescan.
//
// "No document found" is deliberately absent: detection reports it as
// `Ok(None)` and callers branch on it like any other result.

use thiserror::Error;

/// Top-level error type for all Edgescan operations.
#[derive(Debug, Error)]
pub enum ScanError {
    // -- Input errors --
    #[error("image data is empty")]
    EmptyInput,

    #[error("failed to decode image: {0}")]
    Decode(String),

    #[error("image has invalid dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid corners: {0}")]
    InvalidCorners(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    // -- Geometry errors --
    #[error("corners span a degenerate {width}x{height} region")]
    DegenerateQuad { width: u32, height: u32 },

    // -- Output errors --
    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ScanError>;
