// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// edgescan-vision — Document boundary detection for photographed pages.
//
// Finds the outline of a sheet of paper in a photo (contour extraction and
// quadrilateral detection), flattens it with a perspective warp, and offers a
// black & white rendition for readability.

pub mod contours;
pub mod crop;
pub mod enhance;
pub mod geometry;
pub mod image;
pub mod pipeline;
pub mod quad;
pub mod session;

// Re-export the stage types so callers can use `edgescan_vision::DocumentScanner` etc.
pub use contours::FrameContourExtractor;
pub use crop::PerspectiveCropper;
pub use enhance::Enhancer;
pub use crate::image::SourceImage;
pub use pipeline::DocumentScanner;
pub use quad::{QuadrilateralDetector, order_corners};
pub use session::{ScanSession, ViewMode};
