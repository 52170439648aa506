// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration. Every default reproduces the tuned constants of
// the scanning pipeline; a JSON file only needs the keys it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScanError};

/// Settings for every stage of the scanning pipeline.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extractor: ExtractorConfig,
    pub detector: DetectorConfig,
    pub crop: CropConfig,
    pub enhancer: EnhancerConfig,
}

impl ScanConfig {
    /// Parse a JSON document; absent keys keep their defaults.
    ///
    /// The result is validated, so a config that parses can be handed to the
    /// pipeline as is.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    /// Reject values the imaging stages cannot run with.
    pub fn validate(&self) -> Result<()> {
        let ex = &self.extractor;
        if !(ex.blur_sigma.is_finite() && ex.blur_sigma > 0.0) {
            return Err(invalid(format!("extractor.blur_sigma must be > 0, got {}", ex.blur_sigma)));
        }
        if !(ex.canny_low.is_finite() && ex.canny_high.is_finite()) || ex.canny_low > ex.canny_high {
            return Err(invalid(format!(
                "extractor.canny_low ({}) must not exceed extractor.canny_high ({})",
                ex.canny_low, ex.canny_high
            )));
        }
        if ex.max_contours == 0 {
            return Err(invalid("extractor.max_contours must be at least 1".into()));
        }
        if self.detector.max_candidates == 0 {
            return Err(invalid("detector.max_candidates must be at least 1".into()));
        }
        let eps = self.detector.epsilon_ratio;
        if !(eps.is_finite() && eps > 0.0) {
            return Err(invalid(format!("detector.epsilon_ratio must be > 0, got {eps}")));
        }
        Ok(())
    }

    /// Pretty-printed JSON, suitable as a starting point for a config file.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn invalid(reason: String) -> ScanError {
    ScanError::InvalidConfig(reason)
}

/// Contour extraction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// White border added on every side so edge-touching shapes close.
    pub padding: u32,
    /// CLAHE clip limit.
    pub clahe_clip_limit: f32,
    /// CLAHE tiles per axis.
    pub clahe_tiles: u32,
    /// Gaussian sigma; 1.1 matches a 5x5 kernel.
    pub blur_sigma: f32,
    /// Adaptive threshold half-window (5 gives an 11x11 window).
    pub threshold_block_radius: u32,
    /// Subtracted from the local mean before comparing.
    pub threshold_offset: f64,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Chebyshev radius of the dilation (1 gives a 3x3 square).
    pub dilation_radius: u8,
    /// Contours enclosing at most this fraction of the padded area are dropped.
    pub min_area_ratio: f64,
    pub max_contours: usize,
    /// Distance from the image border within which a contour is considered
    /// to trace the frame itself.
    pub frame_margin: u32,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            padding: 10,
            clahe_clip_limit: 4.0,
            clahe_tiles: 8,
            blur_sigma: 1.1,
            threshold_block_radius: 5,
            threshold_offset: 2.0,
            canny_low: 50.0,
            canny_high: 150.0,
            dilation_radius: 1,
            min_area_ratio: 0.05,
            max_contours: 25,
            frame_margin: 12,
        }
    }
}

/// Quadrilateral detection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Only the largest `max_candidates` contours are ever examined.
    pub max_candidates: usize,
    /// Polygon simplification tolerance as a fraction of the perimeter.
    pub epsilon_ratio: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_candidates: 5,
            epsilon_ratio: 0.03,
        }
    }
}

/// Perspective crop parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Intensity written where the output samples fall outside the source.
    pub background: u8,
}

/// Black & white enhancement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Adaptive threshold half-window (7 gives a 15x15 window).
    pub block_radius: u32,
    pub offset: f64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            block_radius: 7,
            offset: 15.0,
        }
    }
}
