// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Black & white enhancement for a clean, photocopy-style view of a page.

use edgescan_core::{EnhancerConfig, Result};
use image::DynamicImage;
use tracing::{info, instrument};

use crate::image::filters::adaptive_threshold;
use crate::image::source::image_size;

/// Binarises an image against its local mean brightness.
///
/// Works on either the original photo or a cropped page. The output is
/// always a single-channel image of the same dimensions holding only 0 and
/// 255.
#[derive(Debug, Clone, Default)]
pub struct Enhancer {
    config: EnhancerConfig,
}

impl Enhancer {
    pub fn new(config: EnhancerConfig) -> Self {
        Self { config }
    }

    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn enhance(&self, image: &DynamicImage) -> Result<DynamicImage> {
        image_size(image)?;
        let gray = image.to_luma8();
        let binary = adaptive_threshold(&gray, self.config.block_radius, self.config.offset);
        info!(block = self.config.block_radius * 2 + 1, "Black & white enhancement applied");
        Ok(DynamicImage::ImageLuma8(binary))
    }
}
