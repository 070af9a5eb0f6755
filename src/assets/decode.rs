use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, RgbImage, imageops::FilterType};

use crate::foundation::core::Resolution;
use crate::foundation::error::{FoldError, FoldResult};
use crate::render::backend::FrameRGB;

/// Aspect ratios closer than this are stretched rather than boxed.
pub const ASPECT_TOLERANCE: f64 = 0.01;

/// Decode an image file and fit it to `resolution`.
pub fn load_image(path: impl AsRef<Path>, resolution: Resolution) -> FoldResult<FrameRGB> {
    let path = path.as_ref();
    let img = image::open(path).with_context(|| format!("decode image {}", path.display()))?;
    fit_letterbox(&img, resolution)
}

/// Decode image bytes and fit them to `resolution`.
pub fn decode_image(bytes: &[u8], resolution: Resolution) -> FoldResult<FrameRGB> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    fit_letterbox(&img, resolution)
}

/// Lanczos-resize `img` into `resolution`, centered on black when the aspect ratios differ.
pub fn fit_letterbox(img: &DynamicImage, resolution: Resolution) -> FoldResult<FrameRGB> {
    resolution.validate()?;
    let (tw, th) = (resolution.width, resolution.height);
    let rgb = img.to_rgb8();
    let (sw, sh) = rgb.dimensions();
    if sw == 0 || sh == 0 {
        return Err(FoldError::validation("source image is empty"));
    }
    if (sw, sh) == (tw, th) {
        return FrameRGB::new(tw, th, rgb.into_raw());
    }

    let src_aspect = sw as f64 / sh as f64;
    let dst_aspect = tw as f64 / th as f64;
    if (src_aspect - dst_aspect).abs() < ASPECT_TOLERANCE {
        let resized = image::imageops::resize(&rgb, tw, th, FilterType::Lanczos3);
        return FrameRGB::new(tw, th, resized.into_raw());
    }

    let (nw, nh) = if src_aspect > dst_aspect {
        (tw, ((tw as f64 / src_aspect) as u32).clamp(1, th))
    } else {
        (((th as f64 * src_aspect) as u32).clamp(1, tw), th)
    };
    let resized = image::imageops::resize(&rgb, nw, nh, FilterType::Lanczos3);
    let mut canvas = RgbImage::new(tw, th);
    image::imageops::replace(
        &mut canvas,
        &resized,
        i64::from((tw - nw) / 2),
        i64::from((th - nh) / 2),
    );
    FrameRGB::new(tw, th, canvas.into_raw())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
