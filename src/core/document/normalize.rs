// src/core/document/normalize.rs
//
// Turns a raw document scan into an OCR-ready crop. e-Aadhaar letters are
// usually uploaded as full A4 pages with the physical card printed in the
// bottom region; phone photos are often slightly out of focus.

use image::{DynamicImage, GrayImage};
use tracing::debug;

/// A page this much taller than wide is a full-page scan, not a card photo.
const FULL_PAGE_ASPECT: f64 = 1.4;

/// Fraction of the page height above the card region on an e-Aadhaar letter.
const CARD_REGION_START: f64 = 0.60;

/// Sharpening is only worthwhile in this band: below it the page is likely
/// blank or too degraded, above it the scan is already crisp.
const SHARPEN_BAND_LOW: f64 = 50.0;
const SHARPEN_BAND_HIGH: f64 = 200.0;

const SHARPEN_KERNEL: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];

/// Crops full-page scans down to the card region and sharpens moderately
/// blurry images. Always returns a well-formed image together with its
/// blur score; leaving the image untouched is a valid outcome.
pub fn enhance_card_image(image: DynamicImage) -> (DynamicImage, f64) {
    let (width, height) = (image.width(), image.height());

    let mut image = if (height as f64) > (width as f64) * FULL_PAGE_ASPECT {
        let crop_start = (height as f64 * CARD_REGION_START) as u32;
        debug!(width, height, crop_start, "full-page scan detected, cropping to card region");
        image.crop_imm(0, crop_start, width, height - crop_start)
    } else {
        image
    };

    let blur_score = laplacian_variance(&image.to_luma8());

    if SHARPEN_BAND_LOW < blur_score && blur_score < SHARPEN_BAND_HIGH {
        debug!(blur_score, "moderately blurry scan, applying sharpening kernel");
        image = image.filter3x3(&SHARPEN_KERNEL);
    }

    (image, blur_score)
}

/// Variance of the 4-neighbour Laplacian over the interior pixels; the
/// standard sharpness metric (higher = sharper).
pub fn laplacian_variance(image: &GrayImage) -> f64 {
    let (width, height) = (image.width() as i64, image.height() as i64);
    if width < 3 || height < 3 {
        return 0.0;
    }

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    let mut count = 0u64;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let center = image.get_pixel(x as u32, y as u32).0[0] as f64;
            let top = image.get_pixel(x as u32, (y - 1) as u32).0[0] as f64;
            let bottom = image.get_pixel(x as u32, (y + 1) as u32).0[0] as f64;
            let left = image.get_pixel((x - 1) as u32, y as u32).0[0] as f64;
            let right = image.get_pixel((x + 1) as u32, y as u32).0[0] as f64;

            let laplacian = top + bottom + left + right - 4.0 * center;
            sum += laplacian;
            sum_sq += laplacian * laplacian;
            count += 1;
        }
    }

    let mean = sum / count as f64;
    ((sum_sq / count as f64) - mean * mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma};

    fn flat_gray(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_pixel(width, height, Luma([128u8])))
    }

    /// Checkerboard of amplitude `k` around mid-gray. The interior Laplacian
    /// is exactly +/-4k at every pixel, so the variance is exactly 16k^2.
    fn checkerboard(width: u32, height: u32, k: u8) -> DynamicImage {
        DynamicImage::ImageLuma8(ImageBuffer::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                Luma([128 + k])
            } else {
                Luma([128])
            }
        }))
    }

    #[test]
    fn tall_scan_is_cropped_to_bottom_card_region() {
        let (enhanced, _) = enhance_card_image(flat_gray(100, 200));
        assert_eq!(enhanced.width(), 100);
        assert_eq!(enhanced.height(), 80); // bottom 40% of 200
    }

    #[test]
    fn card_aspect_image_is_not_cropped() {
        let (enhanced, _) = enhance_card_image(flat_gray(100, 130));
        assert_eq!((enhanced.width(), enhanced.height()), (100, 130));
    }

    #[test]
    fn flat_image_scores_zero_and_passes_through() {
        let original = flat_gray(60, 60);
        let (enhanced, blur_score) = enhance_card_image(original.clone());
        assert_eq!(blur_score, 0.0);
        assert_eq!(enhanced.to_luma8().as_raw(), original.to_luma8().as_raw());
    }

    #[test]
    fn moderately_blurry_image_is_sharpened_once() {
        let original = checkerboard(100, 100, 3); // variance 16 * 9 = 144
        let (enhanced, blur_score) = enhance_card_image(original.clone());
        assert!((blur_score - 144.0).abs() < 1e-9);
        assert_ne!(enhanced.to_luma8().as_raw(), original.to_luma8().as_raw());
    }

    #[test]
    fn sharp_image_is_left_alone() {
        let original = checkerboard(100, 100, 8); // variance 1024, above the band
        let (enhanced, blur_score) = enhance_card_image(original.clone());
        assert!((blur_score - 1024.0).abs() < 1e-9);
        assert_eq!(enhanced.to_luma8().as_raw(), original.to_luma8().as_raw());
    }

    #[test]
    fn nearly_flat_image_is_left_alone() {
        let original = checkerboard(100, 100, 1); // variance 16, below the band
        let (enhanced, blur_score) = enhance_card_image(original.clone());
        assert!((blur_score - 16.0).abs() < 1e-9);
        assert_eq!(enhanced.to_luma8().as_raw(), original.to_luma8().as_raw());
    }

    #[test]
    fn tiny_image_scores_zero() {
        assert_eq!(laplacian_variance(&ImageBuffer::from_pixel(2, 2, Luma([10u8]))), 0.0);
    }
}
