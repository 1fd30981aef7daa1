//! Image decoding module
//!
//! This module handles:
//! - Decoding uploaded bytes into numeric arrays (loader.rs)
//! - The array type itself (pixels.rs)
//! - Normalizing arrays for on-screen preview (display.rs)

pub mod display;
pub mod loader;
pub mod pixels;

pub use loader::{decode, decode_upload, DecodeError};
pub use pixels::DecodedImage;
