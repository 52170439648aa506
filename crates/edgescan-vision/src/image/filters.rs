// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Grayscale filters with no `imageproc` equivalent: constant-border padding,
// contrast-limited adaptive histogram equalisation (CLAHE), and local-mean
// adaptive thresholding.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::integral_image::{integral_image, sum_image_pixels};

/// Surround `image` with a `pad`-pixel border of the given intensity.
pub fn pad(image: &GrayImage, pad: u32, fill: u8) -> GrayImage {
    let (width, height) = image.dimensions();
    let mut padded = GrayImage::from_pixel(width + 2 * pad, height + 2 * pad, Luma([fill]));
    image::imageops::replace(&mut padded, image, i64::from(pad), i64::from(pad));
    padded
}

// -- CLAHE --------------------------------------------------------------------

/// Contrast-limited adaptive histogram equalisation.
///
/// The image is split into a `tiles` x `tiles` grid. Each tile gets its own
/// equalisation curve whose histogram bins are capped at
/// `clip_limit * tile_pixels / 256`, with the clipped excess spread evenly
/// over all bins. Pixels are mapped by bilinear interpolation between the
/// curves of the four nearest tile centres, so tile seams do not show.
pub fn clahe(image: &GrayImage, clip_limit: f32, tiles: u32) -> GrayImage {
    let (width, height) = image.dimensions();
    let tiles = tiles.max(1);
    if width < tiles || height < tiles {
        return image.clone();
    }

    let tile_of = |coord: u32, extent: u32| ((coord * tiles) / extent).min(tiles - 1) as usize;
    let grid = tiles as usize;

    // Per-tile histograms.
    let mut histograms = vec![[0u32; 256]; grid * grid];
    let mut populations = vec![0u32; grid * grid];
    for (x, y, pixel) in image.enumerate_pixels() {
        let idx = tile_of(y, height) * grid + tile_of(x, width);
        histograms[idx][pixel.0[0] as usize] += 1;
        populations[idx] += 1;
    }

    let luts: Vec<[u8; 256]> = histograms
        .iter_mut()
        .zip(&populations)
        .map(|(hist, &population)| equalisation_curve(hist, population, clip_limit))
        .collect();

    // Tile centres sit at (t + 0.5) * tile_extent.
    let tile_w = width as f32 / tiles as f32;
    let tile_h = height as f32 / tiles as f32;
    let neighbours = |coord: u32, extent: f32| -> (usize, usize, f32) {
        let pos = (coord as f32 + 0.5) / extent - 0.5;
        let lower = pos.floor().clamp(0.0, (grid - 1) as f32) as usize;
        let upper = (lower + 1).min(grid - 1);
        let weight = (pos - lower as f32).clamp(0.0, 1.0);
        (lower, upper, weight)
    };

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        let (ty0, ty1, wy) = neighbours(y, tile_h);
        for x in 0..width {
            let (tx0, tx1, wx) = neighbours(x, tile_w);
            let value = image.get_pixel(x, y).0[0] as usize;
            let sample = |ty: usize, tx: usize| f32::from(luts[ty * grid + tx][value]);

            let top = sample(ty0, tx0) * (1.0 - wx) + sample(ty0, tx1) * wx;
            let bottom = sample(ty1, tx0) * (1.0 - wx) + sample(ty1, tx1) * wx;
            let mapped = top * (1.0 - wy) + bottom * wy;
            output.put_pixel(x, y, Luma([mapped.round().clamp(0.0, 255.0) as u8]));
        }
    }

    output
}

/// Clip `hist`, redistribute the excess, and turn it into a lookup table.
fn equalisation_curve(hist: &mut [u32; 256], population: u32, clip_limit: f32) -> [u8; 256] {
    let mut lut = [0u8; 256];
    if population == 0 {
        for (i, slot) in lut.iter_mut().enumerate() {
            *slot = i as u8;
        }
        return lut;
    }

    let clip = ((clip_limit * population as f32 / 256.0) as u32).max(1);
    let mut excess = 0u32;
    for bin in hist.iter_mut() {
        if *bin > clip {
            excess += *bin - clip;
            *bin = clip;
        }
    }
    let per_bin = excess / 256;
    let remainder = (excess % 256) as usize;
    for (i, bin) in hist.iter_mut().enumerate() {
        *bin += per_bin;
        if i < remainder {
            *bin += 1;
        }
    }

    let scale = 255.0 / population as f32;
    let mut cumulative = 0u32;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *slot = (cumulative as f32 * scale).round().min(255.0) as u8;
    }
    lut
}

// -- Adaptive threshold ---------------------------------------------------------

/// Binarise against the local mean.
///
/// A pixel becomes white (255) when it is brighter than the mean of the
/// `(2 * block_radius + 1)`-wide square around it minus `offset`, and black
/// (0) otherwise. The window is clamped at the image border.
pub fn adaptive_threshold(gray: &GrayImage, block_radius: u32, offset: f64) -> GrayImage {
    let (width, height) = gray.dimensions();
    let integral = integral_image::<_, u64>(gray);

    let mut output = GrayImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let local_mean = region_mean(&integral, width, height, x, y, block_radius);
            let pixel_val = f64::from(gray.get_pixel(x, y).0[0]);
            let binary = if pixel_val > local_mean - offset { 255u8 } else { 0u8 };
            output.put_pixel(x, y, Luma([binary]));
        }
    }
    output
}

/// Mean pixel value within the square of the given radius centred on
/// (cx, cy), clipped to the image.
fn region_mean(
    integral: &Image<Luma<u64>>,
    img_width: u32,
    img_height: u32,
    cx: u32,
    cy: u32,
    radius: u32,
) -> f64 {
    if img_width == 0 || img_height == 0 {
        return 128.0;
    }
    let left = cx.saturating_sub(radius);
    let top = cy.saturating_sub(radius);
    let right = cx.saturating_add(radius).min(img_width - 1);
    let bottom = cy.saturating_add(radius).min(img_height - 1);

    let area = f64::from(right - left + 1) * f64::from(bottom - top + 1);
    let sum = sum_image_pixels(integral, left, top, right, bottom)[0];
    sum as f64 / area
}
