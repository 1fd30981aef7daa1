//! Image decoder
//!
//! Turns uploaded bytes plus a file-extension hint into a `DecodedImage`.
//! Radiance HDR and OpenEXR uploads go through the HDR path, which sniffs the
//! content, keeps the sample depth and always yields three BGR channels.
//! Everything else is decoded as a standard raster in the decoder's native
//! layout and RGB order.

use std::io::{BufRead, Seek};
use std::path::PathBuf;

use image::{DynamicImage, ImageReader};
use log::{debug, error, warn};
use thiserror::Error;

use super::pixels::{DecodedImage, PixelBuffer, ShapeError};
use crate::color::ChannelOrder;
use crate::state::data::UploadedFile;

/// Upload extensions the file picker offers (compared case-insensitively)
pub const ACCEPTED_EXTENSIONS: [&str; 7] = ["hdr", "exr", "tiff", "tif", "png", "jpg", "jpeg"];

/// Extensions routed through the HDR decode path
const HDR_EXTENSIONS: [&str; 2] = [".hdr", ".exr"];

/// Message surfaced to the user when the HDR path cannot decode a file
pub const HDR_FAILURE_MESSAGE: &str = "Failed to load HDR image. Format not supported.";

#[derive(Debug, Error)]
pub enum DecodeError {
    /// The HDR path could not decode the bytes. Reported per file, never fatal.
    #[error("Failed to load HDR image. Format not supported.")]
    HdrUnsupported {
        #[source]
        source: image::ImageError,
    },
    #[error("cannot decode image: {0}")]
    Raster(#[from] image::ImageError),
    #[error("cannot read image bytes: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Shape(#[from] ShapeError),
}

impl DecodeError {
    /// Whether this failure only affects its own file
    pub fn is_per_file(&self) -> bool {
        matches!(self, DecodeError::HdrUnsupported { .. })
    }
}

/// Lowercase extension of a file name including the leading dot
///
/// Uses the segment after the last `.`; a name without a dot yields the whole
/// name (`"README"` gives `".readme"`).
pub fn file_extension(name: &str) -> String {
    let last = name.rsplit('.').next().unwrap_or(name);
    format!(".{}", last.to_lowercase())
}

pub fn is_hdr_extension(extension: &str) -> bool {
    HDR_EXTENSIONS.contains(&extension)
}

/// Whether a file name carries one of the accepted upload extensions
pub fn is_accepted(name: &str) -> bool {
    if !name.contains('.') {
        return false;
    }
    let extension = file_extension(name);
    ACCEPTED_EXTENSIONS.contains(&extension.trim_start_matches('.'))
}

/// Decode an image from a re-readable stream
///
/// The reader is rewound to its start first. `extension` must be lowercase
/// and include the dot, as produced by [`file_extension`].
pub fn decode<R: BufRead + Seek>(reader: &mut R, extension: &str) -> Result<DecodedImage, DecodeError> {
    reader.rewind()?;

    if is_hdr_extension(extension) {
        let image = match read_dynamic(reader) {
            Ok(image) => image,
            Err(source) => {
                error!("{} ({}): {}", HDR_FAILURE_MESSAGE, extension, source);
                return Err(DecodeError::HdrUnsupported { source });
            }
        };
        into_bgr_color(image)
    } else {
        let image = read_dynamic(reader)?;
        into_native_array(image)
    }
}

/// Decode an uploaded file using the extension of its name
pub fn decode_upload(file: &UploadedFile) -> Result<DecodedImage, DecodeError> {
    let extension = file.extension();
    debug!("Decoding {} ({} bytes) as {}", file.name(), file.len(), extension);
    decode(&mut file.reader(), &extension)
}

fn read_dynamic<R: BufRead + Seek>(reader: R) -> Result<DynamicImage, image::ImageError> {
    let image = ImageReader::new(reader).with_guessed_format()?.decode()?;
    Ok(image)
}

/// Three-channel BGR array keeping float and 16-bit depth
fn into_bgr_color(image: DynamicImage) -> Result<DecodedImage, DecodeError> {
    let width = image.width() as usize;
    let height = image.height() as usize;

    let pixels = match &image {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            PixelBuffer::F32(swap_red_blue(image.to_rgb32f().into_raw()))
        }
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => PixelBuffer::U16(swap_red_blue(image.to_rgb16().into_raw())),
        _ => PixelBuffer::U8(swap_red_blue(image.to_rgb8().into_raw())),
    };

    Ok(DecodedImage::new(width, height, Some(3), ChannelOrder::Bgr, pixels)?)
}

/// Array in the decoder's own layout: L is 2-D, LA/RGB/RGBA keep their channels
fn into_native_array(image: DynamicImage) -> Result<DecodedImage, DecodeError> {
    let width = image.width() as usize;
    let height = image.height() as usize;

    // only single-channel 16-bit data keeps its depth; multi-channel
    // 16-bit rasters are read as 8-bit through their high byte
    let (channels, pixels) = match image {
        DynamicImage::ImageLuma8(buf) => (None, PixelBuffer::U8(buf.into_raw())),
        DynamicImage::ImageLuma16(buf) => (None, PixelBuffer::U16(buf.into_raw())),
        DynamicImage::ImageLumaA8(buf) => (Some(2), PixelBuffer::U8(buf.into_raw())),
        DynamicImage::ImageRgb8(buf) => (Some(3), PixelBuffer::U8(buf.into_raw())),
        DynamicImage::ImageRgba8(buf) => (Some(4), PixelBuffer::U8(buf.into_raw())),
        DynamicImage::ImageLumaA16(buf) => (Some(2), PixelBuffer::U8(high_bytes(buf.into_raw()))),
        DynamicImage::ImageRgb16(buf) => (Some(3), PixelBuffer::U8(high_bytes(buf.into_raw()))),
        DynamicImage::ImageRgba16(buf) => (Some(4), PixelBuffer::U8(high_bytes(buf.into_raw()))),
        DynamicImage::ImageRgb32F(buf) => (Some(3), PixelBuffer::F32(buf.into_raw())),
        DynamicImage::ImageRgba32F(buf) => (Some(4), PixelBuffer::F32(buf.into_raw())),
        other => (Some(4), PixelBuffer::F32(other.to_rgba32f().into_raw())),
    };

    let image = match channels {
        None => DecodedImage::gray(width, height, pixels)?,
        Some(_) => DecodedImage::new(width, height, channels, ChannelOrder::Rgb, pixels)?,
    };
    Ok(image)
}

fn high_bytes(samples: Vec<u16>) -> Vec<u8> {
    samples.into_iter().map(|v| (v >> 8) as u8).collect()
}

fn swap_red_blue<T>(mut samples: Vec<T>) -> Vec<T> {
    for pixel in samples.chunks_exact_mut(3) {
        pixel.swap(0, 2);
    }
    samples
}

/// Read picked files into memory
///
/// Files without an accepted extension are skipped with a warning.
///
/// # Returns
/// * `Ok(files)` - Uploaded files in the order they were picked
/// * `Err(String)` - Error message if a file cannot be read
pub async fn load_uploads(paths: Vec<PathBuf>) -> Result<Vec<UploadedFile>, String> {
    let mut files = Vec::with_capacity(paths.len());

    for path in paths {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => continue,
        };

        if !is_accepted(&name) {
            warn!("Skipping {}: unsupported extension", path.display());
            continue;
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

        debug!("Read {} ({} bytes)", name, bytes.len());
        files.push(UploadedFile::new(name, bytes));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::pixels::ElementType;
    use image::{GrayImage, ImageBuffer, ImageFormat, Luma, Rgb, Rgb32FImage, RgbImage};
    use std::io::{Cursor, Read};

    fn encode(image: DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut cursor = Cursor::new(Vec::new());
        image.write_to(&mut cursor, format).unwrap();
        cursor.into_inner()
    }

    fn rgb_png() -> Vec<u8> {
        let mut img = RgbImage::new(2, 1);
        img.put_pixel(0, 0, Rgb([10, 20, 30]));
        img.put_pixel(1, 0, Rgb([40, 50, 60]));
        encode(DynamicImage::ImageRgb8(img), ImageFormat::Png)
    }

    #[test]
    fn test_extension_uses_last_segment_lowercased() {
        assert_eq!(file_extension("shot.PNG"), ".png");
        assert_eq!(file_extension("scene.v2.EXR"), ".exr");
        assert_eq!(file_extension("README"), ".readme");
    }

    #[test]
    fn test_accepted_extensions() {
        assert!(is_accepted("a.TIF"));
        assert!(is_accepted("b.jpeg"));
        assert!(is_accepted("c.hdr"));
        assert!(!is_accepted("notes.txt"));
        assert!(!is_accepted("png"));
    }

    #[test]
    fn test_png_decodes_as_rgb_uint8() {
        let bytes = rgb_png();
        let img = decode(&mut Cursor::new(bytes.as_slice()), ".png").unwrap();

        assert_eq!(img.shape().dims(), &[1, 2, 3]);
        assert_eq!(img.element_type(), ElementType::U8);
        assert_eq!(img.order(), ChannelOrder::Rgb);
        assert_eq!(img.pixels(), &PixelBuffer::U8(vec![10, 20, 30, 40, 50, 60]));
    }

    #[test]
    fn test_grayscale_png_is_two_dimensional() {
        let img = GrayImage::from_raw(2, 2, vec![0, 100, 50, 200]).unwrap();
        let bytes = encode(DynamicImage::ImageLuma8(img), ImageFormat::Png);
        let decoded = decode(&mut Cursor::new(bytes.as_slice()), ".png").unwrap();

        assert_eq!(decoded.shape().dims(), &[2, 2]);
        assert_eq!(decoded.pixels(), &PixelBuffer::U8(vec![0, 100, 50, 200]));
    }

    #[test]
    fn test_hdr_path_sniffs_content_and_swaps_to_bgr() {
        let bytes = rgb_png();
        let img = decode(&mut Cursor::new(bytes.as_slice()), ".hdr").unwrap();

        assert_eq!(img.order(), ChannelOrder::Bgr);
        assert_eq!(img.element_type(), ElementType::U8);
        assert_eq!(img.pixels(), &PixelBuffer::U8(vec![30, 20, 10, 60, 50, 40]));
    }

    #[test]
    fn test_exr_keeps_float_samples() {
        let img = Rgb32FImage::from_raw(2, 1, vec![0.5, 1.0, 2.0, 4.0, 8.0, 16.0]).unwrap();
        let bytes = encode(DynamicImage::ImageRgb32F(img), ImageFormat::OpenExr);
        let decoded = decode(&mut Cursor::new(bytes.as_slice()), ".exr").unwrap();

        assert_eq!(decoded.shape().dims(), &[1, 2, 3]);
        assert_eq!(decoded.element_type(), ElementType::F32);
        assert_eq!(decoded.pixels(), &PixelBuffer::F32(vec![2.0, 1.0, 0.5, 16.0, 8.0, 4.0]));
    }

    #[test]
    fn test_radiance_keeps_float_samples_in_bgr_order() {
        // shared exponent 2: mantissas 32, 64 and 128 are exact
        let img = Rgb32FImage::from_raw(1, 1, vec![0.5, 1.0, 2.0]).unwrap();
        let bytes = encode(DynamicImage::ImageRgb32F(img), ImageFormat::Hdr);
        let decoded = decode(&mut Cursor::new(bytes.as_slice()), ".hdr").unwrap();

        assert_eq!(decoded.shape().dims(), &[1, 1, 3]);
        assert_eq!(decoded.element_type(), ElementType::F32);
        assert_eq!(decoded.order(), ChannelOrder::Bgr);
        let PixelBuffer::F32(samples) = decoded.pixels() else {
            panic!("expected float samples, got {:?}", decoded.pixels());
        };
        for (got, want) in samples.iter().zip([2.0f32, 1.0, 0.5]) {
            assert!((got - want).abs() <= want * 0.02, "{} vs {}", got, want);
        }
    }

    #[test]
    fn test_sixteen_bit_rgb_raster_reads_as_uint8() {
        let img = ImageBuffer::<Rgb<u16>, Vec<u16>>::from_raw(1, 1, vec![1000, 30000, 65535]).unwrap();
        let bytes = encode(DynamicImage::ImageRgb16(img), ImageFormat::Png);
        let decoded = decode(&mut Cursor::new(bytes.as_slice()), ".png").unwrap();

        assert_eq!(decoded.element_type(), ElementType::U8);
        assert_eq!(decoded.shape().dims(), &[1, 1, 3]);
        assert_eq!(decoded.pixels(), &PixelBuffer::U8(vec![3, 117, 255]));
    }

    #[test]
    fn test_sixteen_bit_grayscale_raster_stays_uint16() {
        let img = ImageBuffer::<Luma<u16>, Vec<u16>>::from_raw(2, 1, vec![1000, 65535]).unwrap();
        let bytes = encode(DynamicImage::ImageLuma16(img), ImageFormat::Png);
        let decoded = decode(&mut Cursor::new(bytes.as_slice()), ".png").unwrap();

        assert_eq!(decoded.element_type(), ElementType::U16);
        assert_eq!(decoded.shape().dims(), &[1, 2]);
        assert_eq!(decoded.pixels(), &PixelBuffer::U16(vec![1000, 65535]));
    }

    #[test]
    fn test_corrupt_hdr_is_a_per_file_failure() {
        let bytes = b"this is not an image".to_vec();
        let err = decode(&mut Cursor::new(bytes.as_slice()), ".exr").unwrap_err();

        assert!(matches!(err, DecodeError::HdrUnsupported { .. }));
        assert!(err.is_per_file());
        assert_eq!(err.to_string(), HDR_FAILURE_MESSAGE);
    }

    #[test]
    fn test_corrupt_raster_is_not_per_file() {
        let bytes = b"definitely not a png".to_vec();
        let err = decode(&mut Cursor::new(bytes.as_slice()), ".png").unwrap_err();

        assert!(matches!(err, DecodeError::Raster(_)));
        assert!(!err.is_per_file());
    }

    #[test]
    fn test_reader_is_rewound_before_decoding() {
        let bytes = rgb_png();
        let mut cursor = Cursor::new(bytes.as_slice());
        let mut skipped = [0u8; 8];
        cursor.read_exact(&mut skipped).unwrap();

        let img = decode(&mut cursor, ".png").unwrap();
        assert_eq!(img.width(), 2);
    }

    #[test]
    fn test_decode_upload_uses_name_extension() {
        let file = UploadedFile::new("Photo.HDR".to_string(), rgb_png());
        let img = decode_upload(&file).unwrap();
        assert_eq!(img.order(), ChannelOrder::Bgr);
    }

    #[tokio::test]
    async fn test_load_uploads_skips_unaccepted_files() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("a.png");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&png, rgb_png()).unwrap();
        std::fs::write(&txt, b"hello").unwrap();

        let files = load_uploads(vec![png, txt]).await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name(), "a.png");
    }

    #[tokio::test]
    async fn test_load_uploads_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("gone.png");

        let result = load_uploads(vec![missing]).await;
        assert!(result.is_err());
    }
}
