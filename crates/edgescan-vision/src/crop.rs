// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Perspective cropping — flattens the quadrilateral bounded by four ordered
// corners into an upright rectangle.

use edgescan_core::{CropConfig, Corners, ImageSize, Result, ScanError};
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use tracing::{debug, info, instrument, warn};

use crate::image::source::image_size;

/// Warps a detected page into its own rectangular image.
#[derive(Debug, Clone, Default)]
pub struct PerspectiveCropper {
    config: CropConfig,
}

impl PerspectiveCropper {
    pub fn new(config: CropConfig) -> Self {
        Self { config }
    }

    /// Size of the rectangle `corners` flatten into: the longer of each pair
    /// of opposite sides, truncated to whole pixels.
    pub fn output_size(corners: &Corners) -> ImageSize {
        let [tl, tr, br, bl] = *corners.points();
        let width = br.distance(&bl).max(tr.distance(&tl));
        let height = tr.distance(&br).max(tl.distance(&bl));
        ImageSize::new(width as u32, height as u32)
    }

    /// Map the region inside `corners` onto an upright rectangle.
    ///
    /// Corners measured on an image of a different size (e.g. a preview)
    /// are rescaled onto `image` first. Samples falling outside the source
    /// take the configured background intensity. A zero-area output or a
    /// singular mapping is reported as [`ScanError::DegenerateQuad`].
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn crop(&self, image: &DynamicImage, corners: &Corners) -> Result<DynamicImage> {
        let size = image_size(image)?;
        let corners = corners.scaled_to(size);
        let out = Self::output_size(&corners);
        if out.is_empty() {
            warn!(out_w = out.width, out_h = out.height, "Corners collapse to a degenerate region");
            return Err(ScanError::DegenerateQuad {
                width: out.width,
                height: out.height,
            });
        }

        let (w, h) = (out.width as f32, out.height as f32);
        let dest: [(f32, f32); 4] = [(0.0, 0.0), (w, 0.0), (w, h), (0.0, h)];
        let src = corners.points().map(|p| (p.x as f32, p.y as f32));

        // from_control_points solves the exact four-point mapping src -> dest.
        let projection = Projection::from_control_points(src, dest).ok_or_else(|| {
            warn!("Corners do not define an invertible projection");
            ScanError::DegenerateQuad {
                width: out.width,
                height: out.height,
            }
        })?;
        debug!(out_w = out.width, out_h = out.height, "Projection computed");

        let bg = self.config.background;
        let warped = match image {
            DynamicImage::ImageLuma8(gray) => {
                DynamicImage::ImageLuma8(warp(gray, &projection, out, Luma([bg])))
            }
            DynamicImage::ImageLumaA8(gray) => {
                DynamicImage::ImageLumaA8(warp(gray, &projection, out, LumaA([bg, 255])))
            }
            DynamicImage::ImageRgb8(rgb) => {
                DynamicImage::ImageRgb8(warp(rgb, &projection, out, Rgb([bg, bg, bg])))
            }
            DynamicImage::ImageRgba8(rgba) => {
                DynamicImage::ImageRgba8(warp(rgba, &projection, out, Rgba([bg, bg, bg, 255])))
            }
            other => DynamicImage::ImageRgba8(warp(
                &other.to_rgba8(),
                &projection,
                out,
                Rgba([bg, bg, bg, 255]),
            )),
        };

        info!(out_w = out.width, out_h = out.height, "Perspective crop applied");
        Ok(warped)
    }
}

/// Resample `source` through `projection` into a fresh `size` buffer.
fn warp<P>(
    source: &ImageBuffer<P, Vec<u8>>,
    projection: &Projection,
    size: ImageSize,
    background: P,
) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8> + Send + Sync,
{
    let mut output = ImageBuffer::from_pixel(size.width, size.height, background);
    warp_into(source, projection, Interpolation::Bilinear, background, &mut output);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::Point;
    use image::{GrayImage, RgbImage};

    fn corners(points: [(f64, f64); 4], size: ImageSize) -> Corners {
        Corners::new(points.map(|(x, y)| Point::new(x, y)), size)
    }

    /// A gradient block at (x0, y0) of size w x h on a black canvas.
    fn gradient_block(canvas: (u32, u32), x0: u32, y0: u32, w: u32, h: u32) -> GrayImage {
        GrayImage::from_fn(canvas.0, canvas.1, |x, y| {
            if (x0..x0 + w).contains(&x) && (y0..y0 + h).contains(&y) {
                Luma([(60 + (x - x0) + 2 * (y - y0)) as u8])
            } else {
                Luma([0u8])
            }
        })
    }

    #[test]
    fn output_size_uses_longest_sides() {
        let c = corners(
            [(0.0, 0.0), (100.5, 0.0), (90.0, 60.9), (10.0, 50.0)],
            ImageSize::new(200, 200),
        );
        let out = PerspectiveCropper::output_size(&c);
        assert_eq!(out.width, 100);
        // Right side: hypot(10.5, 60.9) = 61.79.
        assert_eq!(out.height, 61);
    }

    #[test]
    fn axis_aligned_crop_reproduces_region() {
        let (x0, y0, w, h) = (30u32, 40u32, 80u32, 50u32);
        let img = DynamicImage::ImageLuma8(gradient_block((200, 150), x0, y0, w, h));
        let c = corners(
            [
                (x0 as f64, y0 as f64),
                ((x0 + w) as f64, y0 as f64),
                ((x0 + w) as f64, (y0 + h) as f64),
                (x0 as f64, (y0 + h) as f64),
            ],
            ImageSize::new(200, 150),
        );

        let cropped = PerspectiveCropper::default().crop(&img, &c).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (w, h));

        let cropped = cropped.to_luma8();
        let source = img.to_luma8();
        for y in 0..h - 1 {
            for x in 0..w - 1 {
                let expected = i32::from(source.get_pixel(x0 + x, y0 + y).0[0]);
                let actual = i32::from(cropped.get_pixel(x, y).0[0]);
                assert!(
                    (expected - actual).abs() <= 1,
                    "pixel ({x},{y}): expected {expected}, got {actual}"
                );
            }
        }
    }

    #[test]
    fn keeps_channel_layout() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([10, 200, 30])));
        let c = corners(
            [(8.0, 8.0), (56.0, 10.0), (54.0, 50.0), (10.0, 52.0)],
            ImageSize::new(64, 64),
        );
        let cropped = PerspectiveCropper::default().crop(&img, &c).unwrap();
        let rgb = cropped.as_rgb8().expect("RGB input stays RGB");
        let centre = rgb.get_pixel(rgb.width() / 2, rgb.height() / 2);
        for (actual, expected) in centre.0.iter().zip([10u8, 200, 30]) {
            assert!(actual.abs_diff(expected) <= 1, "got {:?}", centre);
        }
    }

    #[test]
    fn collinear_corners_are_degenerate() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(50, 50));
        let c = corners(
            [(10.0, 10.0), (40.0, 10.0), (40.0, 10.0), (10.0, 10.0)],
            ImageSize::new(50, 50),
        );
        assert!(matches!(
            PerspectiveCropper::default().crop(&img, &c),
            Err(ScanError::DegenerateQuad { height: 0, .. })
        ));
    }

    #[test]
    fn preview_corners_are_rescaled() {
        let img = DynamicImage::ImageLuma8(gradient_block((200, 200), 50, 50, 100, 100));
        let preview = corners(
            [(25.0, 25.0), (75.0, 25.0), (75.0, 75.0), (25.0, 75.0)],
            ImageSize::new(100, 100),
        );
        let cropped = PerspectiveCropper::default().crop(&img, &preview).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (100, 100));
    }

    #[test]
    fn outside_samples_use_background() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(40, 40, Luma([200u8])));
        // Quad extending past the left edge of the source.
        let c = corners(
            [(-20.0, 0.0), (20.0, 0.0), (20.0, 40.0), (-20.0, 40.0)],
            ImageSize::new(40, 40),
        );
        let cropper = PerspectiveCropper::new(CropConfig { background: 7 });
        let cropped = cropper.crop(&img, &c).unwrap().to_luma8();
        assert_eq!(cropped.get_pixel(2, 20).0[0], 7);
        assert!(cropped.get_pixel(35, 20).0[0] >= 199);
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 0));
        let c = corners(
            [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)],
            ImageSize::new(1, 1),
        );
        assert!(matches!(
            PerspectiveCropper::default().crop(&img, &c),
            Err(ScanError::InvalidDimensions { .. })
        ));
    }
}
