//! Image preprocessing ahead of OCR.
//!
//! The chain runs in a fixed order: optional upscale, grayscale, optional
//! contrast boost, optional denoise, binarization. Each step produces a new
//! buffer; nothing aliases the input. The ordering matters: denoising a
//! binarized image would erode glyph edges, and Otsu's histogram is only
//! meaningful on the denoised grayscale.

use crate::config::{DenoiseFilter, PipelineConfig, ThresholdPolicy};
use crate::error::Result;
use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, Luma};
use imageproc::contrast::{otsu_level, threshold, ThresholdType};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use std::path::Path;

/// Load and decode an image file.
///
/// Unreadable or corrupt files surface as `ScanscribeError::Decode`; the
/// batch driver records those as `No text detected` and keeps going.
pub fn load_image(path: impl AsRef<Path>) -> Result<DynamicImage> {
    let image = image::open(path.as_ref())?;
    Ok(image)
}

/// Run the full preprocessing chain on a decoded image.
///
/// Pure pixel transformation; the output is a two-level (0/255) grayscale
/// buffer ready for the OCR backend and the density gate.
pub fn preprocess(image: &DynamicImage, config: &PipelineConfig) -> GrayImage {
    let upscaled = match config.resize_factor {
        Some(factor) => upscale(image, factor),
        None => image.clone(),
    };

    let gray = upscaled.to_luma8();

    let contrasted = match config.contrast_factor {
        Some(factor) => boost_contrast(&gray, factor),
        None => gray,
    };

    let denoised = match config.denoise {
        DenoiseFilter::None => contrasted,
        DenoiseFilter::Gaussian => gaussian_blur_f32(&contrasted, config.gaussian_sigma),
        DenoiseFilter::Median => median_filter(&contrasted, config.median_radius, config.median_radius),
    };

    binarize(&denoised, config)
}

/// Scale each pixel's distance from the image mean by `factor`, clamped to
/// the valid range. Factor 1.0 is the identity; 2.0 doubles the spread,
/// pushing faint ink toward black and paper toward white.
pub fn boost_contrast(gray: &GrayImage, factor: f32) -> GrayImage {
    let count = gray.width() as u64 * gray.height() as u64;
    if count == 0 {
        return gray.clone();
    }
    let total: u64 = gray.pixels().map(|p| u64::from(p.0[0])).sum();
    let mean = total as f32 / count as f32;

    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = f32::from(gray.get_pixel(x, y).0[0]);
        let boosted = mean + (v - mean) * factor;
        Luma([boosted.clamp(0.0, 255.0) as u8])
    })
}

fn upscale(image: &DynamicImage, factor: f32) -> DynamicImage {
    let width = ((image.width() as f32 * factor).round() as u32).max(1);
    let height = ((image.height() as f32 * factor).round() as u32).max(1);
    image.resize_exact(width, height, FilterType::Lanczos3)
}

/// Convert a grayscale image to two levels (0 and 255).
///
/// `Otsu` derives the level from the image's own intensity histogram;
/// `Fixed` applies the configured constant.
pub fn binarize(gray: &GrayImage, config: &PipelineConfig) -> GrayImage {
    let level = match config.threshold {
        ThresholdPolicy::Fixed => config.fixed_threshold,
        ThresholdPolicy::Otsu => otsu_level(gray),
    };
    threshold(gray, level, ThresholdType::Binary)
}
