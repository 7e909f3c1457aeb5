//! Synthetic image builders for testing.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};

/// Builder for small deterministic test images.
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    /// RGB image where every pixel value depends on its coordinates.
    ///
    /// Useful for asserting that a crop equals an exact pixel region.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn coordinate_rgb(width: u32, height: u32) -> DynamicImage {
        let img = RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x ^ y) % 256) as u8])
        });
        DynamicImage::ImageRgb8(img)
    }

    /// High-contrast grayscale checkerboard.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32, cell_size: u32) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell_size + y / cell_size) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        DynamicImage::ImageLuma8(img)
    }

    /// Uniform gray image.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> DynamicImage {
        let img = GrayImage::from_fn(width, height, |_, _| Luma([value]));
        DynamicImage::ImageLuma8(img)
    }
}
