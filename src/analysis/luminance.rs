use super::AnalyzeError;
use crate::color::{self, LuminanceOrder};
use crate::decode::DecodedImage;

/// Per-pixel luminance, row-major, one value per pixel
#[derive(Debug, Clone, PartialEq)]
pub struct Luminance {
    values: Vec<f64>,
}

impl Luminance {
    /// Compute luminance for a decoded array
    ///
    /// Grayscale arrays are returned unchanged (widened to f64). Color arrays
    /// are weighted over their first three channels with the order chosen by
    /// `order`; extra channels such as alpha are ignored.
    pub fn from_image(image: &DecodedImage, order: LuminanceOrder) -> Result<Self, AnalyzeError> {
        let values = match image.channels() {
            None => image.pixels().to_f64(),
            Some(channels) if channels < 3 => {
                return Err(AnalyzeError::MissingChannels { channels });
            }
            Some(channels) => {
                let weighting = order.resolve(image.order());
                let pixels = image.pixels();
                (0..image.pixel_count())
                    .map(|i| {
                        let base = i * channels;
                        let pixel = [
                            pixels.sample(base),
                            pixels.sample(base + 1),
                            pixels.sample(base + 2),
                        ];
                        color::luma(pixel, weighting)
                    })
                    .collect()
            }
        };

        Ok(Self { values })
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}
