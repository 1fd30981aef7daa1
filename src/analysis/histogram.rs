//! 256-bin luminance histogram
//!
//! Bins span `[min, max]` of the luminance values with the last bin closed.
//! When every value is equal the range is widened to `[v - 0.5, v + 0.5]`,
//! which puts all samples in bin 128. A NaN anywhere makes the range NaN,
//! which is rejected like any other non-finite range.

use super::stats::Reductions;
use super::{AnalyzeError, Luminance};

/// Bin count of every luminance histogram
pub const HISTOGRAM_BINS: usize = 256;

pub const HISTOGRAM_TITLE: &str = "Luminance Histogram";
pub const HISTOGRAM_X_LABEL: &str = "Luminance";
pub const HISTOGRAM_Y_LABEL: &str = "Frequency";

#[derive(Debug, Clone, PartialEq)]
pub struct LuminanceHistogram {
    counts: [u64; HISTOGRAM_BINS],
    lower: f64,
    upper: f64,
}

impl LuminanceHistogram {
    /// Bin luminance over the same `[min, max]` the QC statistics report
    pub fn from_luminance(luminance: &Luminance) -> Result<Self, AnalyzeError> {
        let values = luminance.values();
        let reductions = Reductions::of(values)?;

        Self::with_range(values, reductions.min, reductions.max)
    }

    /// Bin values over an explicit range; values outside it are dropped
    pub fn with_range(values: &[f64], lower: f64, upper: f64) -> Result<Self, AnalyzeError> {
        if !lower.is_finite() || !upper.is_finite() {
            return Err(AnalyzeError::NonFiniteRange { lower, upper });
        }

        let (lower, upper) = if lower == upper {
            (lower - 0.5, upper + 0.5)
        } else {
            (lower, upper)
        };

        let mut histogram = Self {
            counts: [0; HISTOGRAM_BINS],
            lower,
            upper,
        };

        let norm = HISTOGRAM_BINS as f64 / (upper - lower);
        for &v in values {
            if v.is_nan() || v < lower || v > upper {
                continue;
            }
            let bin = histogram.bin_for(v, norm);
            histogram.counts[bin] += 1;
        }

        Ok(histogram)
    }

    fn bin_for(&self, value: f64, norm: f64) -> usize {
        let mut bin = (((value - self.lower) * norm) as usize).min(HISTOGRAM_BINS - 1);

        // rounding in `norm` can land a value one bin off its edges
        if bin > 0 && value < self.edge(bin) {
            bin -= 1;
        } else if bin + 1 < HISTOGRAM_BINS && value >= self.edge(bin + 1) {
            bin += 1;
        }
        bin
    }

    /// Left edge of bin `index`; `edge(HISTOGRAM_BINS)` is the upper bound
    pub fn edge(&self, index: usize) -> f64 {
        let step = (self.upper - self.lower) / HISTOGRAM_BINS as f64;
        index as f64 * step + self.lower
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn range(&self) -> (f64, f64) {
        (self.lower, self.upper)
    }

    pub fn max_count(&self) -> u64 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::LuminanceOrder;
    use crate::decode::pixels::{DecodedImage, PixelBuffer};

    fn total(hist: &LuminanceHistogram) -> u64 {
        hist.counts().iter().sum()
    }

    fn luminance(values: Vec<f64>) -> Luminance {
        let image = DecodedImage::gray(values.len(), 1, PixelBuffer::F64(values)).unwrap();
        Luminance::from_image(&image, LuminanceOrder::AssumeBgr).unwrap()
    }

    #[test]
    fn test_spans_min_to_max() {
        let hist = LuminanceHistogram::from_luminance(&luminance(vec![0.0, 100.0, 50.0, 200.0])).unwrap();

        assert_eq!(hist.counts().len(), HISTOGRAM_BINS);
        assert_eq!(hist.range(), (0.0, 200.0));
        assert_eq!(hist.counts()[0], 1);
        assert_eq!(hist.counts()[64], 1);
        assert_eq!(hist.counts()[128], 1);
        // max lands in the closed last bin
        assert_eq!(hist.counts()[255], 1);
        assert_eq!(total(&hist), 4);
    }

    #[test]
    fn test_constant_input_widens_range() {
        let hist = LuminanceHistogram::from_luminance(&luminance(vec![7.0; 5])).unwrap();

        assert_eq!(hist.range(), (6.5, 7.5));
        assert_eq!(hist.counts()[128], 5);
        assert_eq!(hist.max_count(), 5);
        assert_eq!(hist.counts().len(), 256);
    }

    #[test]
    fn test_single_pixel_still_has_256_bins() {
        let hist = LuminanceHistogram::from_luminance(&luminance(vec![0.25])).unwrap();
        assert_eq!(hist.counts().len(), 256);
        assert_eq!(total(&hist), 1);
    }

    #[test]
    fn test_nan_luminance_is_rejected() {
        let err = LuminanceHistogram::from_luminance(&luminance(vec![0.0, f64::NAN, 1.0])).unwrap_err();
        assert!(matches!(err, AnalyzeError::NonFiniteRange { lower, upper } if lower.is_nan() && upper.is_nan()));
    }

    #[test]
    fn test_range_matches_reported_stats() {
        let lum = luminance(vec![3.0, -1.5, 8.25]);
        let reductions = Reductions::of(lum.values()).unwrap();
        let hist = LuminanceHistogram::from_luminance(&lum).unwrap();
        assert_eq!(hist.range(), (reductions.min, reductions.max));
    }

    #[test]
    fn test_infinite_range_is_rejected() {
        let err = LuminanceHistogram::from_luminance(&luminance(vec![0.0, f64::INFINITY])).unwrap_err();
        assert!(matches!(err, AnalyzeError::NonFiniteRange { .. }));
    }

    #[test]
    fn test_every_uint8_level_gets_its_own_bin() {
        let values: Vec<f64> = (0..=255).map(f64::from).collect();
        let hist = LuminanceHistogram::with_range(&values, 0.0, 255.0).unwrap();
        assert_eq!(total(&hist), 256);
        assert!(hist.counts().iter().all(|&c| c == 1));
    }
}
