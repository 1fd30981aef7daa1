//! Channel order and luma weighting
//!
//! Decoded color images carry their channels either as RGB (standard raster
//! formats) or BGR (the HDR path). Luminance is a Rec. 709 weighted sum over
//! the red, green and blue channels.

use serde::{Deserialize, Serialize};

/// Rec. 709 luma weight applied to the red channel
pub const LUMA_RED: f64 = 0.2126;
/// Rec. 709 luma weight applied to the green channel
pub const LUMA_GREEN: f64 = 0.7152;
/// Rec. 709 luma weight applied to the blue channel
pub const LUMA_BLUE: f64 = 0.0722;

/// Order of the first three channels of a color image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChannelOrder {
    Rgb,
    Bgr,
}

impl ChannelOrder {
    /// Index of the red channel within a pixel
    pub fn red_index(self) -> usize {
        match self {
            ChannelOrder::Rgb => 0,
            ChannelOrder::Bgr => 2,
        }
    }

    /// Index of the blue channel within a pixel
    pub fn blue_index(self) -> usize {
        match self {
            ChannelOrder::Rgb => 2,
            ChannelOrder::Bgr => 0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChannelOrder::Rgb => "RGB",
            ChannelOrder::Bgr => "BGR",
        }
    }
}

/// Which channel order the analyzer assumes when weighting color channels
///
/// `AssumeBgr` weights channel 2 as red for every image, including RGB
/// sources. `FollowSource` uses the order recorded on the decoded image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuminanceOrder {
    #[default]
    AssumeBgr,
    FollowSource,
}

impl LuminanceOrder {
    /// Resolve the channel order to weight with for an image decoded as `source`
    pub fn resolve(self, source: ChannelOrder) -> ChannelOrder {
        match self {
            LuminanceOrder::AssumeBgr => ChannelOrder::Bgr,
            LuminanceOrder::FollowSource => source,
        }
    }
}

/// Weighted luma of one pixel's first three channels
///
/// The sum is evaluated red, green, blue in that order so results match the
/// reference reduction bit for bit.
pub fn luma(pixel: [f64; 3], order: ChannelOrder) -> f64 {
    let red = pixel[order.red_index()];
    let green = pixel[1];
    let blue = pixel[order.blue_index()];
    LUMA_RED * red + LUMA_GREEN * green + LUMA_BLUE * blue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgr_weights_channel_two_as_red() {
        let pixel = [10.0, 20.0, 30.0];
        let expected = 0.2126 * 30.0 + 0.7152 * 20.0 + 0.0722 * 10.0;
        assert_eq!(luma(pixel, ChannelOrder::Bgr), expected);
    }

    #[test]
    fn test_rgb_weights_channel_zero_as_red() {
        let pixel = [10.0, 20.0, 30.0];
        let expected = 0.2126 * 10.0 + 0.7152 * 20.0 + 0.0722 * 30.0;
        assert_eq!(luma(pixel, ChannelOrder::Rgb), expected);
    }

    #[test]
    fn test_weights_sum_to_one() {
        assert!((LUMA_RED + LUMA_GREEN + LUMA_BLUE - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_assume_bgr_ignores_source_order() {
        assert_eq!(LuminanceOrder::AssumeBgr.resolve(ChannelOrder::Rgb), ChannelOrder::Bgr);
        assert_eq!(LuminanceOrder::FollowSource.resolve(ChannelOrder::Rgb), ChannelOrder::Rgb);
    }

    #[test]
    fn test_luminance_order_serde_names() {
        let json = serde_json::to_string(&LuminanceOrder::FollowSource).unwrap();
        assert_eq!(json, "\"follow_source\"");
        let order: LuminanceOrder = serde_json::from_str("\"assume_bgr\"").unwrap();
        assert_eq!(order, LuminanceOrder::AssumeBgr);
    }
}
