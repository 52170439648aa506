// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quadrilateral detection — picks the document outline out of the ranked
// contour candidates and puts its corners in reading order.

use edgescan_core::{Contour, Corners, DetectorConfig, ImageSize, Point};
use tracing::{debug, instrument};

use crate::geometry::{approx_polygon, contour_perimeter, is_convex};

/// Finds the first candidate contour that simplifies to a convex
/// quadrilateral.
///
/// Candidates are expected largest-first. Only the first `max_candidates`
/// are ever examined, and the scan stops at the first match, so the
/// largest plausible page wins.
#[derive(Debug, Clone, Default)]
pub struct QuadrilateralDetector {
    config: DetectorConfig,
}

impl QuadrilateralDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }

    /// `None` when no examined candidate qualifies; this is a routine
    /// outcome, not an error.
    #[instrument(skip_all, fields(candidates = contours.len(), size = %size))]
    pub fn detect(&self, contours: &[Contour], size: ImageSize) -> Option<Corners> {
        let corners = contours
            .iter()
            .take(self.config.max_candidates)
            .enumerate()
            .find_map(|(rank, contour)| {
                let quad = self.as_quadrilateral(contour);
                debug!(rank, found = quad.is_some(), "Candidate examined");
                quad
            })
            .map(|quad| Corners::new(order_corners(quad), size));

        if corners.is_none() {
            debug!("No quadrilateral among the examined candidates");
        }
        corners
    }

    fn as_quadrilateral(&self, contour: &Contour) -> Option<[Point; 4]> {
        let epsilon = self.config.epsilon_ratio * contour_perimeter(contour);
        if epsilon <= 0.0 {
            return None;
        }
        let polygon = approx_polygon(contour.points(), epsilon);
        if polygon.len() != 4 || !is_convex(&polygon) {
            return None;
        }
        Some([polygon[0], polygon[1], polygon[2], polygon[3]])
    }
}

/// Put four points in `[top_left, top_right, bottom_right, bottom_left]`
/// order.
///
/// Top-left minimises `x + y`, bottom-right maximises it; top-right
/// minimises `y - x`, bottom-left maximises it. Exact ties go to the point
/// that comes first in the input.
pub fn order_corners(points: [Point; 4]) -> [Point; 4] {
    let sum = |p: &Point| p.x + p.y;
    let diff = |p: &Point| p.y - p.x;
    [
        extreme(&points, sum, |a, b| a < b),
        extreme(&points, diff, |a, b| a < b),
        extreme(&points, sum, |a, b| a > b),
        extreme(&points, diff, |a, b| a > b),
    ]
}

/// First point whose key is not beaten by any later point.
fn extreme(points: &[Point; 4], key: impl Fn(&Point) -> f64, beats: impl Fn(f64, f64) -> bool) -> Point {
    let mut best = points[0];
    let mut best_key = key(&best);
    for p in &points[1..] {
        let k = key(p);
        if beats(k, best_key) {
            best = *p;
            best_key = k;
        }
    }
    best
}
