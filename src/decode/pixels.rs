//! In-memory representation of a decoded image
//!
//! A `DecodedImage` is a row-major, channel-interleaved array with shape
//! `(H, W)` for grayscale or `(H, W, C)` for multi-channel data.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::color::ChannelOrder;

/// Element type of the sample buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementType {
    U8,
    U16,
    F32,
    F64,
}

impl ElementType {
    /// Conventional array dtype name (`uint8`, `float32`, ...)
    pub fn name(self) -> &'static str {
        match self {
            ElementType::U8 => "uint8",
            ElementType::U16 => "uint16",
            ElementType::F32 => "float32",
            ElementType::F64 => "float64",
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for ElementType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Flat sample storage
#[derive(Debug, Clone, PartialEq)]
pub enum PixelBuffer {
    U8(Vec<u8>),
    U16(Vec<u16>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

impl PixelBuffer {
    pub fn len(&self) -> usize {
        match self {
            PixelBuffer::U8(v) => v.len(),
            PixelBuffer::U16(v) => v.len(),
            PixelBuffer::F32(v) => v.len(),
            PixelBuffer::F64(v) => v.len(),
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            PixelBuffer::U8(_) => ElementType::U8,
            PixelBuffer::U16(_) => ElementType::U16,
            PixelBuffer::F32(_) => ElementType::F32,
            PixelBuffer::F64(_) => ElementType::F64,
        }
    }

    /// Sample at flat `index` widened to f64 (exact for every element type)
    pub fn sample(&self, index: usize) -> f64 {
        match self {
            PixelBuffer::U8(v) => f64::from(v[index]),
            PixelBuffer::U16(v) => f64::from(v[index]),
            PixelBuffer::F32(v) => f64::from(v[index]),
            PixelBuffer::F64(v) => v[index],
        }
    }

    /// All samples widened to f64
    pub fn to_f64(&self) -> Vec<f64> {
        match self {
            PixelBuffer::U8(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::U16(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::F32(v) => v.iter().map(|&x| f64::from(x)).collect(),
            PixelBuffer::F64(v) => v.clone(),
        }
    }
}

/// Array shape, `[H, W]` or `[H, W, C]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Shape(Vec<usize>);

impl Shape {
    pub fn dims(&self) -> &[usize] {
        &self.0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dims: Vec<String> = self.dims().iter().map(|d| d.to_string()).collect();
        write!(f, "({})", dims.join(", "))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("buffer holds {actual} samples but shape {shape} needs {expected}")]
pub struct ShapeError {
    pub shape: Shape,
    pub expected: usize,
    pub actual: usize,
}

/// A decoded image: dimensions, channel layout and samples
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    width: usize,
    height: usize,
    /// `None` for a 2-dimensional grayscale array
    channels: Option<usize>,
    order: ChannelOrder,
    pixels: PixelBuffer,
}

impl DecodedImage {
    /// Build an image, checking the buffer length against the shape
    pub fn new(
        width: usize,
        height: usize,
        channels: Option<usize>,
        order: ChannelOrder,
        pixels: PixelBuffer,
    ) -> Result<Self, ShapeError> {
        let image = Self {
            width,
            height,
            channels,
            order,
            pixels,
        };
        let expected = width * height * image.samples_per_pixel();
        if image.pixels.len() != expected {
            return Err(ShapeError {
                shape: image.shape(),
                expected,
                actual: image.pixels.len(),
            });
        }
        Ok(image)
    }

    /// Grayscale `(H, W)` image
    pub fn gray(width: usize, height: usize, pixels: PixelBuffer) -> Result<Self, ShapeError> {
        Self::new(width, height, None, ChannelOrder::Rgb, pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Channel count of a 3-dimensional array, `None` when grayscale
    pub fn channels(&self) -> Option<usize> {
        self.channels
    }

    pub fn samples_per_pixel(&self) -> usize {
        self.channels.unwrap_or(1)
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn pixels(&self) -> &PixelBuffer {
        &self.pixels
    }

    pub fn element_type(&self) -> ElementType {
        self.pixels.element_type()
    }

    pub fn shape(&self) -> Shape {
        match self.channels {
            Some(c) => Shape(vec![self.height, self.width, c]),
            None => Shape(vec![self.height, self.width]),
        }
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }
}
