#![allow(clippy::needless_return, clippy::similar_names, clippy::inline_always)]
#![warn(clippy::correctness, clippy::perf, clippy::pedantic, clippy::inline_always)]
//! BitGrain: a lossy, JPEG-lineage still-image codec for 8-bit grayscale,
//! RGB, and RGBA raster images.
//!
//! The public surface is a handful of free functions (`encode_*`/`decode`)
//! operating on owned `Vec<u8>` buffers, plus `encode_into`/`decode_into`
//! variants that write into a caller-supplied buffer and report
//! [`errors::BitGrainError::BufferTooSmall`] rather than growing it. Encoding
//! is single-threaded, synchronous, and allocates no state that outlives the
//! call (`spec.md` §5).

#[macro_use]
extern crate log;

pub mod bitstream;
pub mod block;
pub mod blockizer;
pub mod color_convert;
pub mod config;
pub mod container;
pub mod dct;
pub mod decoder;
pub mod encoder;
pub mod errors;
pub mod huffman;
pub mod image;
pub mod metrics;
pub mod quant;
pub mod rle;
pub mod zigzag;

pub use crate::decoder::Decoded;
pub use crate::errors::BitGrainError;
pub use crate::image::{ColorSpace, Image, Plane};

/// Encode an 8-bit grayscale pixel buffer into a `.bg` byte stream.
///
/// `quality` of `0` is treated as the default of 85; other values are
/// clamped to `[1,100]`.
///
/// # Errors
/// `InvalidArgument` if `pixels.len() != width * height`;
/// `DimensionsOutOfRange` if the image exceeds the codec's size limits.
pub fn encode_grayscale(pixels: &[u8], width: usize, height: usize, quality: u8) -> Result<Vec<u8>, BitGrainError> {
    let image = encoder::image_from_interleaved(pixels, width, height, 1)?;
    encoder::encode(&image, quality, None)
}

/// Encode an interleaved 8-bit RGB pixel buffer into a `.bg` byte stream.
///
/// # Errors
/// See [`encode_grayscale`].
pub fn encode_rgb(pixels: &[u8], width: usize, height: usize, quality: u8) -> Result<Vec<u8>, BitGrainError> {
    encode_rgb_with_icc(pixels, width, height, quality, None)
}

/// Like [`encode_rgb`], additionally carrying an opaque ICC profile blob
/// through the container.
///
/// # Errors
/// See [`encode_grayscale`].
pub fn encode_rgb_with_icc(
    pixels: &[u8],
    width: usize,
    height: usize,
    quality: u8,
    icc: Option<&[u8]>
) -> Result<Vec<u8>, BitGrainError> {
    let image = encoder::image_from_interleaved(pixels, width, height, 3)?;
    encoder::encode(&image, quality, icc)
}

/// Encode an interleaved 8-bit RGBA pixel buffer into a `.bg` byte stream.
/// Alpha is coded as a fourth plane, identically to luma.
///
/// # Errors
/// See [`encode_grayscale`].
pub fn encode_rgba(pixels: &[u8], width: usize, height: usize, quality: u8) -> Result<Vec<u8>, BitGrainError> {
    encode_rgba_with_icc(pixels, width, height, quality, None)
}

/// Like [`encode_rgba`], additionally carrying an opaque ICC profile blob
/// through the container.
///
/// # Errors
/// See [`encode_grayscale`].
pub fn encode_rgba_with_icc(
    pixels: &[u8],
    width: usize,
    height: usize,
    quality: u8,
    icc: Option<&[u8]>
) -> Result<Vec<u8>, BitGrainError> {
    let image = encoder::image_from_interleaved(pixels, width, height, 4)?;
    encoder::encode(&image, quality, icc)
}

/// Encode into a caller-supplied buffer rather than growing a fresh `Vec`.
///
/// Returns the number of bytes written.
///
/// # Errors
/// `BufferTooSmall` if `out` is not large enough to hold the encoded
/// stream; otherwise as the corresponding `encode_*` function.
pub fn encode_into(pixels: &[u8], width: usize, height: usize, channels: usize, quality: u8, out: &mut [u8]) -> Result<usize, BitGrainError> {
    let image = encoder::image_from_interleaved(pixels, width, height, channels)?;
    let encoded = encoder::encode(&image, quality, None)?;
    if out.len() < encoded.len() {
        return Err(BitGrainError::BufferTooSmall { needed: encoded.len(), available: out.len() });
    }
    out[..encoded.len()].copy_from_slice(&encoded);
    Ok(encoded.len())
}

/// Decode a `.bg` byte stream into an owned [`Decoded`] image.
///
/// # Errors
/// `MalformedHeader`, `DimensionsOutOfRange`, `TruncatedPayload`, or
/// `MalformedPayload` per `spec.md` §7.
pub fn decode(data: &[u8]) -> Result<Decoded, BitGrainError> {
    decoder::decode(data)
}

/// Decode into a caller-supplied interleaved pixel buffer.
///
/// Returns `(width, height, channels)`. Planes are interleaved in channel
/// order (grayscale: 1 byte/pixel; RGB: 3; RGBA: 4).
///
/// # Errors
/// As [`decode`], plus `BufferTooSmall` if `out` cannot hold
/// `width * height * channels` bytes.
pub fn decode_into(data: &[u8], out: &mut [u8]) -> Result<(usize, usize, usize), BitGrainError> {
    let decoded = decoder::decode(data)?;
    let width = decoded.image.width();
    let height = decoded.image.height();
    let channels = decoded.image.colorspace().num_channels();
    let needed = width * height * channels;

    if out.len() < needed {
        return Err(BitGrainError::BufferTooSmall { needed, available: out.len() });
    }

    for (pixel_index, chunk) in out[..needed].chunks_mut(channels).enumerate() {
        for (c, plane) in decoded.image.planes().iter().enumerate() {
            chunk[c] = plane.samples()[pixel_index];
        }
    }

    Ok((width, height, channels))
}
