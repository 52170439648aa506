// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Frame contour extraction — turns a photograph into a ranked list of
// candidate document outlines.

use edgescan_core::{Contour, ExtractorConfig, Point};
use image::{DynamicImage, GrayImage};
use imageproc::contours::{self as traced, BorderType};
use imageproc::distance_transform::Norm;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::morphology::dilate;
use imageproc::point::Point as PixelPoint;
use tracing::{debug, instrument};

use crate::geometry::contour_area;
use crate::image::filters::{adaptive_threshold, clahe, pad};

const PADDING_FILL: u8 = 255;

/// Extracts candidate boundary contours from an image.
///
/// ## Pipeline
///
/// 1. Convert to grayscale and pad with a white border so that shapes
///    touching the image edge still close
/// 2. CLAHE to even out lighting
/// 3. Gaussian blur
/// 4. Local-mean adaptive threshold
/// 5. Canny edge detection
/// 6. Dilation to bridge small gaps in the edges
/// 7. Border following, keeping only outer borders
/// 8. Drop contours enclosing too little area, sort by area (largest
///    first) and keep the top `max_contours`
///
/// Contours are reported in the coordinates of the unpadded input.
#[derive(Debug, Clone, Default)]
pub struct FrameContourExtractor {
    config: ExtractorConfig,
}

impl FrameContourExtractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Run the extraction pipeline. An empty result is a normal outcome.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn extract(&self, image: &DynamicImage) -> Vec<Contour> {
        let cfg = &self.config;

        // Padding commutes with the grayscale conversion for a white fill.
        let padded = pad(&image.to_luma8(), cfg.padding, PADDING_FILL);
        let edges = self.edge_map(&padded);

        let outlines = traced::find_contours::<i32>(&edges);
        let (padded_w, padded_h) = padded.dimensions();
        let frame = FrameBounds::new(padded_w, padded_h, cfg.padding + cfg.frame_margin);
        let outer = scene_borders(&outlines, &frame);
        debug!(traced = outlines.len(), outer = outer.len(), "Contours traced");

        let min_area = cfg.min_area_ratio * f64::from(padded_w) * f64::from(padded_h);
        let offset = f64::from(cfg.padding);
        let mut ranked: Vec<(f64, Contour)> = outer
            .into_iter()
            .map(|idx| compress_chain(&outlines[idx].points, offset))
            .map(|contour| (contour_area(&contour), contour))
            .filter(|(area, _)| *area > min_area)
            .collect();

        ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
        ranked.truncate(cfg.max_contours);

        debug!(
            kept = ranked.len(),
            min_area,
            largest = ranked.first().map(|(area, _)| *area),
            "Contours filtered"
        );
        ranked.into_iter().map(|(_, contour)| contour).collect()
    }

    /// Steps 2-6: turn the padded grayscale image into a dilated edge map.
    fn edge_map(&self, padded: &GrayImage) -> GrayImage {
        let cfg = &self.config;
        let equalised = clahe(padded, cfg.clahe_clip_limit, cfg.clahe_tiles);
        let blurred = gaussian_blur_f32(&equalised, cfg.blur_sigma);
        let binary = adaptive_threshold(&blurred, cfg.threshold_block_radius, cfg.threshold_offset);
        let edges = canny(&binary, cfg.canny_low, cfg.canny_high);
        dilate(&edges, Norm::LInf, cfg.dilation_radius)
    }
}

/// The band along the padded image border where a contour counts as a
/// trace of the image frame rather than of a document.
struct FrameBounds {
    width: i32,
    height: i32,
    reach: i32,
}

impl FrameBounds {
    fn new(width: u32, height: u32, reach: u32) -> Self {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        Self {
            width: clamp(width),
            height: clamp(height),
            reach: clamp(reach),
        }
    }

    /// True when the outline comes within `reach` of all four sides.
    fn is_traced_by(&self, points: &[PixelPoint<i32>]) -> bool {
        let Some(first) = points.first() else {
            return false;
        };
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in points {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        min_x <= self.reach
            && min_y <= self.reach
            && max_x >= self.width - 1 - self.reach
            && max_y >= self.height - 1 - self.reach
    }
}

/// Indices of the outer borders that are not nested in any other shape.
///
/// Frame traces do not count as enclosing shapes: they are skipped and the
/// outer borders sitting directly in their holes are considered instead.
fn scene_borders(outlines: &[traced::Contour<i32>], frame: &FrameBounds) -> Vec<usize> {
    let mut children: Vec<Vec<usize>> = vec![Vec::new(); outlines.len()];
    let mut pending = Vec::new();
    for (idx, outline) in outlines.iter().enumerate() {
        match outline.parent {
            Some(parent) => children[parent].push(idx),
            None => pending.push(idx),
        }
    }
    pending.reverse();

    let mut kept = Vec::new();
    while let Some(idx) = pending.pop() {
        let outline = &outlines[idx];
        if outline.border_type != BorderType::Outer {
            continue;
        }
        if frame.is_traced_by(&outline.points) {
            for &hole in &children[idx] {
                pending.extend(children[hole].iter().rev().copied());
            }
        } else {
            kept.push(idx);
        }
    }
    kept
}

/// Keep only the points where the traced boundary changes direction, and
/// shift them back into unpadded coordinates.
fn compress_chain(points: &[PixelPoint<i32>], offset: f64) -> Contour {
    let to_point = |p: &PixelPoint<i32>| Point::new(f64::from(p.x) - offset, f64::from(p.y) - offset);
    let n = points.len();
    if n < 3 {
        return Contour::new(points.iter().map(to_point).collect());
    }

    let step = |a: &PixelPoint<i32>, b: &PixelPoint<i32>| ((b.x - a.x).signum(), (b.y - a.y).signum());
    let turning = points
        .iter()
        .enumerate()
        .filter(|&(i, p)| {
            let prev = &points[(i + n - 1) % n];
            let next = &points[(i + 1) % n];
            step(prev, p) != step(p, next)
        })
        .map(|(_, p)| to_point(p));
    Contour::new(turning.collect())
}
