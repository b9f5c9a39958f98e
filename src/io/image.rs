//! Image loading and the crop, resize and enhancement steps run before quantization

use crate::io::configuration::{BLUR_SIGMA, CONTRAST_BOOST};
use crate::io::error::{PipelineError, Result, invalid_parameter};
use image::RgbImage;
use image::imageops::{self, FilterType};
use std::path::Path;

/// Open any supported image file and convert it to 8-bit RGB
///
/// # Errors
///
/// Returns an error if the file cannot be opened or decoded
pub fn load_rgb<P: AsRef<Path>>(path: P) -> Result<RgbImage> {
    let path_buf = path.as_ref().to_path_buf();
    let img = image::open(&path_buf).map_err(|e| PipelineError::ImageLoad {
        path: path_buf,
        source: e,
    })?;
    Ok(img.to_rgb8())
}

/// Centered square crop with side `min(width, height)`
pub fn crop_to_square(image: &RgbImage) -> RgbImage {
    let (width, height) = image.dimensions();
    let side = width.min(height);
    let left = (width - side) / 2;
    let top = (height - side) / 2;
    imageops::crop_imm(image, left, top, side, side).to_image()
}

/// Gaussian blur for noise reduction followed by a contrast boost
pub fn enhance(image: &RgbImage) -> RgbImage {
    let blurred = imageops::blur(image, BLUR_SIGMA);
    imageops::contrast(&blurred, CONTRAST_BOOST)
}

/// Intermediate images produced by [`preprocess`]
#[derive(Debug, Clone)]
pub struct Preprocessed {
    /// Square crop resized to the target size
    pub resized: RgbImage,
    /// Image handed to quantization (the resized image when enhancement is off)
    pub enhanced: RgbImage,
}

/// Crop to a centered square, resize with Lanczos filtering, then optionally enhance
///
/// # Errors
///
/// Returns an error if the image is empty or `target_size` is zero
pub fn preprocess(image: &RgbImage, target_size: u32, enhance_image: bool) -> Result<Preprocessed> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::InvalidSourceData {
            reason: "image has no pixels".to_string(),
        });
    }
    if target_size == 0 {
        return Err(invalid_parameter(
            "target_size",
            &target_size,
            &"must be positive",
        ));
    }

    let cropped = crop_to_square(image);
    let resized = imageops::resize(&cropped, target_size, target_size, FilterType::Lanczos3);
    let enhanced = if enhance_image {
        enhance(&resized)
    } else {
        resized.clone()
    };

    Ok(Preprocessed { resized, enhanced })
}

/// Flatten an image into RGB triples in row-major order
pub fn pixels_of(image: &RgbImage) -> Vec<[u8; 3]> {
    image.pixels().map(|pixel| pixel.0).collect()
}

/// Build an image from RGB triples listed in row-major order
///
/// # Errors
///
/// Returns an error if the pixel count does not equal `width × height`
pub fn image_from_pixels(width: u32, height: u32, pixels: &[[u8; 3]]) -> Result<RgbImage> {
    let raw: Vec<u8> = pixels.iter().flatten().copied().collect();
    RgbImage::from_raw(width, height, raw).ok_or_else(|| PipelineError::InvalidSourceData {
        reason: format!(
            "{} pixels cannot fill a {width}x{height} image",
            pixels.len()
        ),
    })
}
