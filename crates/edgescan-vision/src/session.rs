// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ScanSession — the state a capture flow carries from one screen to the
// next: the original photo, the corners the user accepted, the cropped page
// and how it should be displayed.

use edgescan_core::{Corners, ImageSize, Point, Result};
use image::DynamicImage;
use tracing::{debug, info};

use crate::image::source::image_size;
use crate::pipeline::DocumentScanner;
use crate::quad::order_corners;

/// How the current page is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Colours as captured.
    #[default]
    Original,
    /// Binarised with the enhancer.
    BlackAndWhite,
}

/// One document being scanned.
///
/// Owned by the caller and passed to each step explicitly; changing the
/// corners discards any crop made from the previous ones.
#[derive(Debug, Clone)]
pub struct ScanSession {
    original: DynamicImage,
    size: ImageSize,
    corners: Option<Corners>,
    cropped: Option<DynamicImage>,
    mode: ViewMode,
}

impl ScanSession {
    /// Start a session on an already oriented image.
    pub fn new(original: DynamicImage) -> Result<Self> {
        let size = image_size(&original)?;
        Ok(Self {
            original,
            size,
            corners: None,
            cropped: None,
            mode: ViewMode::default(),
        })
    }

    pub fn original(&self) -> &DynamicImage {
        &self.original
    }

    pub fn size(&self) -> ImageSize {
        self.size
    }

    pub fn corners(&self) -> Option<&Corners> {
        self.corners.as_ref()
    }

    pub fn cropped(&self) -> Option<&DynamicImage> {
        self.cropped.as_ref()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Run detection on the original and remember the result.
    pub fn detect(&mut self, scanner: &DocumentScanner) -> Result<Option<Corners>> {
        let corners = scanner.detect(&self.original)?;
        self.corners = corners;
        self.cropped = None;
        Ok(corners)
    }

    /// Replace the corners with points placed by hand, in any order.
    pub fn set_corners(&mut self, points: [Point; 4]) {
        let corners = Corners::new(order_corners(points), self.size);
        debug!(tl = %corners.top_left(), br = %corners.bottom_right(), "Manual corners set");
        self.corners = Some(corners);
        self.cropped = None;
    }

    /// The current corners, or the whole image when none were found.
    pub fn corners_or_full_frame(&self) -> Corners {
        self.corners.unwrap_or_else(|| Corners::full_frame(self.size))
    }

    /// Crop the original with the current corners and keep the result.
    pub fn crop(&mut self, scanner: &DocumentScanner) -> Result<&DynamicImage> {
        let page = scanner.crop(&self.original, &self.corners_or_full_frame())?;
        info!(width = page.width(), height = page.height(), "Session page cropped");
        Ok(self.cropped.insert(page))
    }

    /// The image to display: the cropped page if there is one, otherwise
    /// the original, rendered according to the view mode.
    pub fn view(&self, scanner: &DocumentScanner) -> Result<DynamicImage> {
        let base = self.cropped.as_ref().unwrap_or(&self.original);
        match self.mode {
            ViewMode::Original => Ok(base.clone()),
            ViewMode::BlackAndWhite => scanner.enhance(base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edgescan_core::ScanError;
    use image::{GrayImage, Luma, Rgb, RgbImage};

    fn page_on_table() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(400, 300, |x, y| {
            if (120..280).contains(&x) && (90..210).contains(&y) {
                Rgb([250, 250, 245])
            } else {
                Rgb([20, 25, 30])
            }
        }))
    }

    #[test]
    fn rejects_empty_image() {
        let empty = DynamicImage::ImageLuma8(GrayImage::new(10, 0));
        assert!(matches!(
            ScanSession::new(empty),
            Err(ScanError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn starts_in_original_mode_without_corners() {
        let session = ScanSession::new(page_on_table()).unwrap();
        assert_eq!(session.mode(), ViewMode::Original);
        assert!(session.corners().is_none());
        assert!(session.cropped().is_none());
        assert_eq!(session.corners_or_full_frame(), Corners::full_frame(session.size()));
    }

    #[test]
    fn detect_then_crop() {
        let scanner = DocumentScanner::default();
        let mut session = ScanSession::new(page_on_table()).unwrap();
        assert!(session.detect(&scanner).unwrap().is_some());

        let page = session.crop(&scanner).unwrap();
        assert!(page.width() < 400 && page.height() < 300);
        assert!(session.cropped().is_some());
    }

    #[test]
    fn manual_corners_are_ordered_and_reset_crop() {
        let scanner = DocumentScanner::default();
        let mut session = ScanSession::new(page_on_table()).unwrap();
        session.crop(&scanner).unwrap();
        assert_eq!(session.cropped().map(|p| p.width()), Some(400));

        session.set_corners([
            Point::new(280.0, 210.0),
            Point::new(120.0, 90.0),
            Point::new(120.0, 210.0),
            Point::new(280.0, 90.0),
        ]);
        assert!(session.cropped().is_none());
        let corners = session.corners().unwrap();
        assert_eq!(corners.top_left(), Point::new(120.0, 90.0));
        assert_eq!(corners.bottom_right(), Point::new(280.0, 210.0));

        let page = session.crop(&scanner).unwrap();
        assert_eq!((page.width(), page.height()), (160, 120));
    }

    #[test]
    fn black_and_white_view_is_binary() {
        let scanner = DocumentScanner::default();
        let mut session = ScanSession::new(page_on_table()).unwrap();
        session.set_mode(ViewMode::BlackAndWhite);
        let view = session.view(&scanner).unwrap().to_luma8();
        assert_eq!(view.dimensions(), (400, 300));
        assert!(view.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));

        session.set_mode(ViewMode::Original);
        let view = session.view(&scanner).unwrap();
        assert!(view.as_rgb8().is_some());
    }

    #[test]
    fn view_prefers_cropped_page() {
        let scanner = DocumentScanner::default();
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(50, 40, Luma([128u8])));
        let mut session = ScanSession::new(img).unwrap();
        session.set_corners([
            Point::new(10.0, 10.0),
            Point::new(30.0, 10.0),
            Point::new(30.0, 30.0),
            Point::new(10.0, 30.0),
        ]);
        session.crop(&scanner).unwrap();
        let view = session.view(&scanner).unwrap();
        assert_eq!((view.width(), view.height()), (20, 20));
    }
}
