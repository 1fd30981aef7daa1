//! Display normalization
//!
//! Converts a decoded image into 8-bit RGBA for on-screen preview. Float
//! images are divided by their global maximum, clipped to [0, 1] and scaled
//! to [0, 255]. The statistics never see these values.

use super::pixels::{DecodedImage, PixelBuffer};
use crate::color::ChannelOrder;

/// Preview caption for grayscale arrays
pub const GRAYSCALE_CAPTION: &str = "Grayscale image";
/// Preview caption for three-channel arrays
pub const COLOR_CAPTION: &str = "RGB image";
/// Shown instead of a preview for other channel counts
pub const UNSUPPORTED_DISPLAY_MESSAGE: &str = "Image format not supported for display.";

/// RGBA8 pixels ready to hand to an image widget
#[derive(Clone, PartialEq)]
pub struct PreviewImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
    pub caption: &'static str,
    /// Channel order the source samples were interpreted with
    pub channels: ChannelOrder,
}

impl std::fmt::Debug for PreviewImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("caption", &self.caption)
            .field("channels", &self.channels)
            .finish()
    }
}

/// Scale samples to 8 bits
///
/// Floats are normalized by the global maximum; the cast truncates, and NaN
/// samples become 0. 16-bit samples keep their high byte.
pub fn to_display_u8(pixels: &PixelBuffer) -> Vec<u8> {
    match pixels {
        PixelBuffer::U8(v) => v.clone(),
        PixelBuffer::U16(v) => v.iter().map(|&x| (x >> 8) as u8).collect(),
        PixelBuffer::F32(v) => {
            let max = v.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            v.iter().map(|&x| normalize(f64::from(x), f64::from(max))).collect()
        }
        PixelBuffer::F64(v) => {
            let max = v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            v.iter().map(|&x| normalize(x, max)).collect()
        }
    }
}

fn normalize(value: f64, max: f64) -> u8 {
    let scaled = (value / max).clamp(0.0, 1.0) * 255.0;
    // `as` saturates and maps NaN to 0
    scaled as u8
}

/// Build a preview, or `None` when the channel layout cannot be shown
pub fn preview(image: &DecodedImage) -> Option<PreviewImage> {
    let samples = to_display_u8(image.pixels());

    let (rgba, caption) = match image.channels() {
        None => (gray_to_rgba(&samples), GRAYSCALE_CAPTION),
        Some(3) => (color_to_rgba(&samples, image.order()), COLOR_CAPTION),
        Some(_) => return None,
    };

    Some(PreviewImage {
        width: image.width() as u32,
        height: image.height() as u32,
        rgba,
        caption,
        channels: image.order(),
    })
}

fn gray_to_rgba(samples: &[u8]) -> Vec<u8> {
    samples.iter().flat_map(|&luma| [luma, luma, luma, 255]).collect()
}

fn color_to_rgba(samples: &[u8], order: ChannelOrder) -> Vec<u8> {
    let (r, b) = (order.red_index(), order.blue_index());
    samples
        .chunks_exact(3)
        .flat_map(|px| [px[r], px[1], px[b], 255])
        .collect()
}
