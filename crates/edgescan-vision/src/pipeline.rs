// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// DocumentScanner — the single entry point wiring extraction, detection,
// cropping and enhancement together from one `ScanConfig`.

use edgescan_core::{Corners, Result, ScanConfig, ScanError};
use image::DynamicImage;
use tracing::{info, instrument, warn};

use crate::contours::FrameContourExtractor;
use crate::crop::PerspectiveCropper;
use crate::enhance::Enhancer;
use crate::image::source::image_size;
use crate::quad::QuadrilateralDetector;

/// Stateless facade over the scanning stages.
///
/// Every call owns its intermediate buffers; a scanner can be shared
/// freely between threads and reused for any number of images.
#[derive(Debug, Clone, Default)]
pub struct DocumentScanner {
    extractor: FrameContourExtractor,
    detector: QuadrilateralDetector,
    cropper: PerspectiveCropper,
    enhancer: Enhancer,
}

impl DocumentScanner {
    pub fn new(config: ScanConfig) -> Self {
        Self {
            extractor: FrameContourExtractor::new(config.extractor),
            detector: QuadrilateralDetector::new(config.detector),
            cropper: PerspectiveCropper::new(config.crop),
            enhancer: Enhancer::new(config.enhancer),
        }
    }

    /// Locate the document outline.
    ///
    /// `Ok(None)` means no page-like quadrilateral was found and the caller
    /// should fall back to manual corner placement. `Err` is reserved for
    /// input the pipeline cannot run on.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn detect(&self, image: &DynamicImage) -> Result<Option<Corners>> {
        let size = image_size(image)?;
        let contours = self.extractor.extract(image);
        let corners = self.detector.detect(&contours, size);
        match &corners {
            Some(found) => info!(
                tl = %found.top_left(),
                br = %found.bottom_right(),
                "Document detected"
            ),
            None => info!(candidates = contours.len(), "No document outline found"),
        }
        Ok(corners)
    }

    /// Flatten the region inside `corners`.
    pub fn crop(&self, image: &DynamicImage, corners: &Corners) -> Result<DynamicImage> {
        self.cropper.crop(image, corners)
    }

    /// Black & white rendition of `image`.
    pub fn enhance(&self, image: &DynamicImage) -> Result<DynamicImage> {
        self.enhancer.enhance(image)
    }

    /// Detect and crop in one go.
    ///
    /// Corners that collapse into a degenerate rectangle are treated like a
    /// missed detection.
    #[instrument(skip_all)]
    pub fn scan(&self, image: &DynamicImage) -> Result<Option<DynamicImage>> {
        let Some(corners) = self.detect(image)? else {
            return Ok(None);
        };
        match self.cropper.crop(image, &corners) {
            Ok(page) => Ok(Some(page)),
            Err(ScanError::DegenerateQuad { width, height }) => {
                warn!(width, height, "Detected outline is degenerate, reporting no detection");
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}
