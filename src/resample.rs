//! Lanczos resampling of RGBA buffers.
//!
//! Pixels are premultiplied by alpha before filtering so that the color of
//! fully transparent pixels never leaks into visible edges, then divided back
//! out afterward.  The filtering itself is `image`'s separable Lanczos-3
//! resize, run over normalized `f32` samples.

use crate::error::{Error, Result};
use crate::pixels::PixelBuffer;
use crate::size::SizeSpec;
use image::imageops::{self, FilterType};
use image::{Rgba, Rgba32FImage};

//===========================================================================//

/// Resizes `src` to a `size` x `size` square.  Non-square sources are
/// stretched rather than letterboxed.
pub fn resize_square(src: &PixelBuffer, size: SizeSpec) -> PixelBuffer {
    resample(src, size.pixels(), size.pixels())
}

/// Resizes `src` to exactly `width` x `height`.  Returns
/// `Error::InvalidSize` if either dimension is zero.
pub fn resize(
    src: &PixelBuffer,
    width: u32,
    height: u32,
) -> Result<PixelBuffer> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidSize { size: width.min(height) as i64 });
    }
    Ok(resample(src, width, height))
}

fn resample(src: &PixelBuffer, width: u32, height: u32) -> PixelBuffer {
    if src.width() == width && src.height() == height {
        return src.clone();
    }
    let premul = premultiply(src);
    let resized =
        imageops::resize(&premul, width, height, FilterType::Lanczos3);
    PixelBuffer::from_rgba_data(width, height, unpremultiply(&resized))
}

//===========================================================================//

// Samples are scaled into [0, 1], the range `image` clamps float pixels to.
fn premultiply(src: &PixelBuffer) -> Rgba32FImage {
    Rgba32FImage::from_fn(src.width(), src.height(), |x, y| {
        let [red, green, blue, alpha] = src.pixel(x, y);
        let alpha = alpha as f32 / 255.0;
        Rgba([
            red as f32 / 255.0 * alpha,
            green as f32 / 255.0 * alpha,
            blue as f32 / 255.0 * alpha,
            alpha,
        ])
    })
}

fn unpremultiply(premul: &Rgba32FImage) -> Vec<u8> {
    let mut out = Vec::with_capacity(premul.as_raw().len());
    for &Rgba([red, green, blue, alpha]) in premul.pixels() {
        let alpha_byte = to_u8(alpha * 255.0);
        if alpha_byte == 0 {
            out.extend_from_slice(&[0, 0, 0, 0]);
            continue;
        }
        let scale = 255.0 / alpha;
        out.push(to_u8(red * scale));
        out.push(to_u8(green * scale));
        out.push(to_u8(blue * scale));
        out.push(alpha_byte);
    }
    out
}

fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

//===========================================================================//


//===========================================================================//
