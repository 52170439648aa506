// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Source image — decoding, orientation and encoding at the boundary of the
// pipeline. Everything past this point works on an in-memory `DynamicImage`.

use edgescan_core::{ImageSize, Result, Rotation, ScanError};
use image::{DynamicImage, ImageFormat};
use tracing::{debug, info, instrument};

/// A decoded raster handed to the pipeline.
///
/// ```ignore
/// let source = SourceImage::open("page.jpg")?.rotate(Rotation::Cw90);
/// let corners = scanner.detect(source.as_dynamic())?;
/// ```
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
}

impl SourceImage {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, etc.).
    ///
    /// An empty slice is rejected before any decoding is attempted.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Err(ScanError::EmptyInput);
        }
        let image = image::load_from_memory(data)
            .map_err(|err| ScanError::Decode(err.to_string()))?;
        debug!(
            width = image.width(),
            height = image.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image })
    }

    /// Read and decode an image file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        let source = Self::from_bytes(&data)?;
        info!(
            width = source.image.width(),
            height = source.image.height(),
            "Image loaded"
        );
        Ok(source)
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn size(&self) -> ImageSize {
        ImageSize::new(self.image.width(), self.image.height())
    }

    /// Borrow the underlying `DynamicImage`.
    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    /// Consume the source and return the underlying `DynamicImage`.
    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Orientation ----------------------------------------------------------

    /// Apply a lossless quarter-turn rotation known to the caller.
    #[instrument(skip(self))]
    pub fn rotate(self, rotation: Rotation) -> Self {
        let image = match rotation {
            Rotation::None => return self,
            Rotation::Cw90 => self.image.rotate90(),
            Rotation::Cw180 => self.image.rotate180(),
            Rotation::Cw270 => self.image.rotate270(),
        };
        debug!(
            degrees = rotation.degrees(),
            width = image.width(),
            height = image.height(),
            "Rotation applied"
        );
        Self { image }
    }
}

/// Dimensions of `image`, rejecting rasters with a zero side.
pub fn image_size(image: &DynamicImage) -> Result<ImageSize> {
    let size = ImageSize::new(image.width(), image.height());
    if size.is_empty() {
        return Err(ScanError::InvalidDimensions {
            width: size.width,
            height: size.height,
        });
    }
    Ok(size)
}

/// Encode the image as PNG bytes.
pub fn to_png_bytes(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, ImageFormat::Png)
        .map_err(|err| ScanError::ImageError(format!("image encoding failed: {}", err)))?;
    Ok(buffer)
}

/// Write the image to a file. The format is inferred from the file extension.
pub fn save(image: &DynamicImage, path: impl AsRef<std::path::Path>) -> Result<()> {
    image.save(path.as_ref()).map_err(|err| {
        ScanError::ImageError(format!(
            "failed to save image to {}: {}",
            path.as_ref().display(),
            err
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, Luma, RgbImage};

    #[test]
    fn empty_bytes_are_rejected_before_decoding() {
        assert!(matches!(
            SourceImage::from_bytes(&[]),
            Err(ScanError::EmptyInput)
        ));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        assert!(matches!(
            SourceImage::from_bytes(b"definitely not an image"),
            Err(ScanError::Decode(_))
        ));
    }

    #[test]
    fn png_round_trip_preserves_size() {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(30, 20, Luma([77u8])));
        let bytes = to_png_bytes(&img).unwrap();
        let decoded = SourceImage::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.size(), ImageSize::new(30, 20));
    }

    #[test]
    fn quarter_turn_swaps_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 10));
        let rotated = SourceImage::from_dynamic(img).rotate(Rotation::Cw90);
        assert_eq!(rotated.size(), ImageSize::new(10, 40));

        let img = DynamicImage::ImageRgb8(RgbImage::new(40, 10));
        let flipped = SourceImage::from_dynamic(img).rotate(Rotation::Cw180);
        assert_eq!(flipped.size(), ImageSize::new(40, 10));
    }

    #[test]
    fn rotation_moves_pixels_clockwise() {
        let mut gray = GrayImage::new(3, 2);
        gray.put_pixel(0, 0, Luma([200u8]));
        let rotated = SourceImage::from_dynamic(DynamicImage::ImageLuma8(gray))
            .rotate(Rotation::Cw90)
            .into_dynamic()
            .to_luma8();
        // Top-left moves to top-right under a clockwise quarter turn.
        assert_eq!(rotated.get_pixel(1, 0).0[0], 200);
    }

    #[test]
    fn zero_sized_image_is_invalid() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(0, 5));
        assert!(matches!(
            image_size(&img),
            Err(ScanError::InvalidDimensions { width: 0, height: 5 })
        ));
    }
}
