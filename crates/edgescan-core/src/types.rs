// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Edgescan document pipeline.

use serde::{Deserialize, Serialize};

/// A floating-point coordinate in image space (x to the right, y down).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.1}, {:.1})", self.x, self.y)
    }
}

/// Pixel dimensions of a raster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

impl ImageSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// True when either side is zero.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An ordered, closed boundary approximated by its turning points.
///
/// Contours are produced fresh by every extraction call and are never
/// shared between calls.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Contour {
    points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The four corners of a detected document, always ordered
/// `[top_left, top_right, bottom_right, bottom_left]`, together with the
/// size of the image they were measured against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corners {
    points: [Point; 4],
    size: ImageSize,
}

impl Corners {
    /// Wrap four points that are already in TL, TR, BR, BL order.
    pub fn new(points: [Point; 4], size: ImageSize) -> Self {
        Self { points, size }
    }

    /// Corners covering the whole image; the starting point for manual
    /// correction when nothing was detected.
    pub fn full_frame(size: ImageSize) -> Self {
        let (w, h) = (f64::from(size.width), f64::from(size.height));
        Self::new(
            [
                Point::new(0.0, 0.0),
                Point::new(w, 0.0),
                Point::new(w, h),
                Point::new(0.0, h),
            ],
            size,
        )
    }

    pub fn points(&self) -> &[Point; 4] {
        &self.points
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn top_left(&self) -> Point {
        self.points[0]
    }

    pub fn top_right(&self) -> Point {
        self.points[1]
    }

    pub fn bottom_right(&self) -> Point {
        self.points[2]
    }

    pub fn bottom_left(&self) -> Point {
        self.points[3]
    }

    /// Area of the quadrilateral.
    pub fn area(&self) -> f64 {
        polygon_area(&self.points)
    }

    /// Rescale the corners onto an image of a different resolution, e.g.
    /// from a downscaled preview onto the full-size capture.
    pub fn scaled_to(&self, target: ImageSize) -> Self {
        if target == self.size || self.size.is_empty() {
            return Self::new(self.points, target);
        }
        let sx = f64::from(target.width) / f64::from(self.size.width);
        let sy = f64::from(target.height) / f64::from(self.size.height);
        Self::new(
            self.points.map(|p| Point::new(p.x * sx, p.y * sy)),
            target,
        )
    }
}

/// Clockwise rotation already known to the caller (e.g. from capture
/// metadata), applied before detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    None,
    Cw90,
    Cw180,
    Cw270,
}

impl Rotation {
    /// Parse a multiple of 90 degrees; negative angles rotate counter-clockwise.
    pub fn from_degrees(degrees: i32) -> Option<Self> {
        match degrees.rem_euclid(360) {
            0 => Some(Self::None),
            90 => Some(Self::Cw90),
            180 => Some(Self::Cw180),
            270 => Some(Self::Cw270),
            _ => None,
        }
    }

    pub fn degrees(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Cw90 => 90,
            Self::Cw180 => 180,
            Self::Cw270 => 270,
        }
    }

    /// Whether width and height trade places.
    pub fn swaps_dimensions(&self) -> bool {
        matches!(self, Self::Cw90 | Self::Cw270)
    }
}

/// Shoelace area of a simple polygon given in order (CW or CCW). Contour
/// areas are measured with the imaging crate; this covers the corner quad.
fn polygon_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut twice_area = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        twice_area += points[i].x * points[j].y;
        twice_area -= points[j].x * points[i].y;
    }
    twice_area.abs() / 2.0
}
