// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Polygon helpers for closed contours: measurement, Douglas-Peucker
// simplification and convexity testing.

use edgescan_core::{Contour, Point};
use imageproc::geometry::{arc_length, contour_area as enclosed_area};
use imageproc::point::Point as PixelPoint;

fn pixel_points(contour: &Contour) -> Vec<PixelPoint<f64>> {
    contour
        .points()
        .iter()
        .map(|p| PixelPoint::new(p.x, p.y))
        .collect()
}

/// Area enclosed by a closed contour, whatever its orientation.
pub fn contour_area(contour: &Contour) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }
    enclosed_area(&pixel_points(contour)).abs()
}

/// Perimeter of a closed contour, including the edge back to the start.
pub fn contour_perimeter(contour: &Contour) -> f64 {
    if contour.len() < 2 {
        return 0.0;
    }
    arc_length(&pixel_points(contour), true)
}

/// Simplify a closed polygon so that no dropped point lies farther than
/// `epsilon` from the simplified outline.
///
/// The ring is first split at two mutually distant points (found by two
/// farthest-point hops starting from the first vertex), each half is
/// simplified with Douglas-Peucker, and a final pass removes vertices that
/// lie within `epsilon` of the chord joining their neighbours.
///
/// `imageproc::geometry::approximate_polygon_dp` is not used because in
/// closed mode it always keeps the first point and splits against the
/// near-zero chord between the first and last points of a traced ring.
///
/// Vertices are always input points. Traced outlines have chamfered
/// corners, so a kept vertex can sit anywhere along the chamfer and an
/// axis-aligned rectangle may come back a pixel or two out of square.
pub fn approx_polygon(points: &[Point], epsilon: f64) -> Vec<Point> {
    let n = points.len();
    if n <= 3 {
        return points.to_vec();
    }

    let first = farthest_from(points, 0);
    let second = farthest_from(points, first);
    if first == second {
        return vec![points[first]];
    }

    // Rotate so the ring starts at `first`, and close it.
    let mut ring: Vec<Point> = points[first..]
        .iter()
        .chain(&points[..first])
        .copied()
        .collect();
    ring.push(points[first]);
    let split = (second + n - first) % n;

    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[split] = true;
    simplify_chain(&ring, 0, split, epsilon, &mut keep);
    simplify_chain(&ring, split, n, epsilon, &mut keep);

    let simplified: Vec<Point> = ring[..n]
        .iter()
        .zip(&keep[..n])
        .filter(|(_, kept)| **kept)
        .map(|(point, _)| *point)
        .collect();

    drop_flat_vertices(simplified, epsilon)
}

/// Whether a closed polygon turns consistently in one direction.
///
/// Collinear vertices (zero turn) are tolerated; fewer than three vertices
/// never form a convex polygon.
pub fn is_convex(points: &[Point]) -> bool {
    let n = points.len();
    if n < 3 {
        return false;
    }
    let mut positive = false;
    let mut negative = false;
    for i in 0..n {
        let turn = cross(points[i], points[(i + 1) % n], points[(i + 2) % n]);
        if turn > 0.0 {
            positive = true;
        } else if turn < 0.0 {
            negative = true;
        }
        if positive && negative {
            return false;
        }
    }
    positive || negative
}

fn farthest_from(points: &[Point], origin: usize) -> usize {
    let anchor = points[origin];
    let mut best = origin;
    let mut best_dist = 0.0;
    for (i, p) in points.iter().enumerate() {
        let dist = anchor.distance(p);
        if dist > best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Mark the points of `ring[start..=end]` that Douglas-Peucker keeps.
fn simplify_chain(ring: &[Point], start: usize, end: usize, epsilon: f64, keep: &mut [bool]) {
    let mut pending = vec![(start, end)];
    while let Some((lo, hi)) = pending.pop() {
        if hi <= lo + 1 {
            continue;
        }
        let mut worst = lo;
        let mut worst_dist = 0.0;
        for i in lo + 1..hi {
            let dist = line_distance(ring[i], ring[lo], ring[hi]);
            if dist > worst_dist {
                worst = i;
                worst_dist = dist;
            }
        }
        if worst_dist > epsilon {
            keep[worst] = true;
            pending.push((lo, worst));
            pending.push((worst, hi));
        }
    }
}

/// Remove vertices lying within `epsilon` of the line through their
/// neighbours, until none remain or only a triangle is left.
fn drop_flat_vertices(mut polygon: Vec<Point>, epsilon: f64) -> Vec<Point> {
    let mut i = 0;
    let mut since_removal = 0;
    while polygon.len() > 3 && since_removal < polygon.len() {
        let n = polygon.len();
        let idx = i % n;
        let prev = polygon[(idx + n - 1) % n];
        let next = polygon[(idx + 1) % n];
        if line_distance(polygon[idx], prev, next) <= epsilon {
            polygon.remove(idx);
            since_removal = 0;
            i = idx;
        } else {
            since_removal += 1;
            i = idx + 1;
        }
    }
    polygon
}

/// Perpendicular distance from `p` to the line through `a` and `b`
/// (distance to `a` when the two coincide).
fn line_distance(p: Point, a: Point, b: Point) -> f64 {
    let length = a.distance(&b);
    if length == 0.0 {
        return p.distance(&a);
    }
    cross(a, b, p).abs() / length
}

/// Z component of (b - a) x (c - b).
fn cross(a: Point, b: Point, c: Point) -> f64 {
    (b.x - a.x) * (c.y - b.y) - (b.y - a.y) * (c.x - b.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every integer point along the boundary of an axis-aligned rectangle,
    /// walked clockwise from the top-left corner.
    fn traced_rectangle(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<Point> {
        let mut points = Vec::new();
        for x in x0..x1 {
            points.push(Point::new(x as f64, y0 as f64));
        }
        for y in y0..y1 {
            points.push(Point::new(x1 as f64, y as f64));
        }
        for x in (x0 + 1..=x1).rev() {
            points.push(Point::new(x as f64, y1 as f64));
        }
        for y in (y0 + 1..=y1).rev() {
            points.push(Point::new(x0 as f64, y as f64));
        }
        points
    }

    #[test]
    fn rectangle_simplifies_to_its_corners() {
        let outline = traced_rectangle(10, 20, 110, 80);
        let simplified = approx_polygon(&outline, 5.0);
        assert_eq!(simplified.len(), 4, "got {:?}", simplified);
        for corner in [
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
            Point::new(110.0, 80.0),
            Point::new(10.0, 80.0),
        ] {
            assert!(simplified.contains(&corner), "missing {corner}");
        }
    }

    #[test]
    fn start_point_mid_edge_is_not_kept() {
        let mut outline = traced_rectangle(0, 0, 60, 40);
        outline.rotate_left(25);
        let simplified = approx_polygon(&outline, 3.0);
        assert_eq!(simplified.len(), 4, "got {:?}", simplified);
    }

    #[test]
    fn noisy_edge_within_tolerance_is_flattened() {
        let mut outline = traced_rectangle(0, 0, 100, 100);
        for (i, p) in outline.iter_mut().enumerate() {
            if p.y == 0.0 && p.x > 5.0 && p.x < 95.0 {
                p.y += (i % 3) as f64;
            }
        }
        assert_eq!(approx_polygon(&outline, 6.0).len(), 4);
    }

    #[test]
    fn chamfered_corners_land_on_the_chamfer() {
        // Cut a 3px diagonal off every corner, as border following does.
        let outline: Vec<Point> = traced_rectangle(0, 0, 120, 80)
            .into_iter()
            .filter(|p| {
                let dx = p.x.min(120.0 - p.x);
                let dy = p.y.min(80.0 - p.y);
                dx + dy >= 3.0
            })
            .collect();
        let simplified = approx_polygon(&outline, 0.03 * 390.0);
        assert_eq!(simplified.len(), 4, "got {:?}", simplified);

        for corner in [
            Point::new(0.0, 0.0),
            Point::new(120.0, 0.0),
            Point::new(120.0, 80.0),
            Point::new(0.0, 80.0),
        ] {
            let nearest = simplified
                .iter()
                .map(|p| p.distance(&corner))
                .fold(f64::MAX, f64::min);
            assert!(nearest <= 3.0 + 1e-9, "no vertex near {corner}: {:?}", simplified);
        }
    }

    #[test]
    fn measures_closed_contours() {
        let contour = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 5.0),
        ]);
        assert!((contour_perimeter(&contour) - 30.0).abs() < 1e-9);
        assert!((contour_area(&contour) - 50.0).abs() < 1e-9);

        let reversed = Contour::new(contour.points().iter().rev().copied().collect());
        assert!((contour_area(&reversed) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_contours_measure_zero() {
        let line = Contour::new(vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0)]);
        assert_eq!(contour_area(&line), 0.0);
        assert_eq!(contour_perimeter(&Contour::default()), 0.0);
    }

    #[test]
    fn triangle_is_returned_as_is() {
        let tri = vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(0.0, 3.0)];
        assert_eq!(approx_polygon(&tri, 1.0), tri);
    }

    #[test]
    fn convex_square_is_convex_in_both_orientations() {
        let mut square = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
        ];
        assert!(is_convex(&square));
        square.reverse();
        assert!(is_convex(&square));
    }

    #[test]
    fn dented_quad_is_not_convex() {
        let dart = vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
            Point::new(0.0, 10.0),
            Point::new(3.0, 5.0),
        ];
        assert!(!is_convex(&dart));
    }

    #[test]
    fn degenerate_polygons_are_not_convex() {
        assert!(!is_convex(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]));
        let line = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
        ];
        assert!(!is_convex(&line));
    }
}
