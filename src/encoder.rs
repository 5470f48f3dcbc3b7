//! Composes the stages in `spec.md` §4.8 into one encode call
//!
//! Grounded in the shape of the teacher's `decoder.rs` top-level driver
//! (a single struct that owns the per-call pipeline state), mirrored here
//! for the encode direction since the teacher itself has no encoder.

use crate::bitstream::BitWriter;
use crate::blockizer::blockize;
use crate::color_convert::rgb_planes_to_ycbcr;
use crate::config::{check_image_size, normalize_quality};
use crate::container::{write_icc_section, write_quality, Header};
use crate::dct::{choose_kernel, DctKernel};
use crate::errors::BitGrainError;
use crate::huffman::{self, HuffmanTable};
use crate::image::{ColorSpace, Image, Plane};
use crate::quant::{quantize, QuantTable, TableKind};
use crate::rle::{encode_block, DcPredictor, Symbol};
use crate::zigzag::scan;

/// Encode a planar image into a complete `.bg` byte stream.
///
/// `quality` is normalized per [`crate::config::normalize_quality`] (`0`
/// maps to the default of 85).
///
/// # Errors
/// `DimensionsOutOfRange` if the image exceeds the codec's size limits.
pub fn encode(image: &Image, quality: u8, icc: Option<&[u8]>) -> Result<Vec<u8>, BitGrainError> {
    let width = image.width() as u32;
    let height = image.height() as u32;
    let channels = image.colorspace().num_channels() as u32;

    if !check_image_size(width, height, channels) {
        return Err(BitGrainError::DimensionsOutOfRange);
    }

    let quality = normalize_quality(quality);
    debug!("encoding {width}x{height} image, colorspace={:?}, quality={quality}", image.colorspace());

    let header = Header { colorspace: image.colorspace(), width, height };
    let mut out = Vec::new();
    header.write(&mut out);
    write_quality(&mut out, quality);

    if let Some(icc) = icc {
        write_icc_section(&mut out, icc);
    }

    let kernel = choose_kernel();
    let luma_quant = QuantTable::derive(TableKind::Luma, quality);
    let chroma_quant = QuantTable::derive(TableKind::Chroma, quality);
    let luma_dc = huffman::dc_luma_table();
    let luma_ac = huffman::ac_luma_table();
    let chroma_dc = huffman::dc_chroma_table();
    let chroma_ac = huffman::ac_chroma_table();

    for (index, plane) in image.planes().iter().enumerate() {
        let is_chroma = image.colorspace() == ColorSpace::YCbCr && (index == 1 || index == 2)
            || image.colorspace() == ColorSpace::YCbCrA && (index == 1 || index == 2);
        let (quant, dc_table, ac_table) = if is_chroma {
            (&chroma_quant, &chroma_dc, &chroma_ac)
        } else {
            (&luma_quant, &luma_dc, &luma_ac)
        };

        trace!("component {index}: encoding plane ({}x{})", plane.width(), plane.height());
        let payload = encode_plane(plane, kernel.as_ref(), quant, dc_table, ac_table);
        out.extend_from_slice(&payload);
    }

    Ok(out)
}

fn encode_plane(
    plane: &Plane,
    kernel: &dyn DctKernel,
    quant: &QuantTable,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable
) -> Vec<u8> {
    let mut writer = BitWriter::new();
    let mut predictor = DcPredictor::new();

    for mut block in blockize(plane) {
        for sample in block.as_mut_slice() {
            *sample -= 128;
        }
        kernel.forward(&mut block);
        quantize(&mut block, quant);
        let scanned = scan(&block);
        let dc_diff = predictor.difference(scanned[0]);

        for symbol in encode_block(&scanned, dc_diff) {
            encode_symbol(&mut writer, symbol, dc_table, ac_table);
        }
    }

    writer.finish()
}

fn encode_symbol(writer: &mut BitWriter, symbol: Symbol, dc_table: &HuffmanTable, ac_table: &HuffmanTable) {
    match symbol {
        Symbol::Dc(value) => {
            let category = huffman::category(value);
            dc_table.encode_symbol(writer, category);
            writer.put_bits(huffman::encode_magnitude(value, category), category);
        }
        Symbol::Ac { run, value } => {
            let category = huffman::category(value);
            ac_table.encode_symbol(writer, (run << 4) | category);
            writer.put_bits(huffman::encode_magnitude(value, category), category);
        }
        Symbol::ZeroRunEscape => ac_table.encode_symbol(writer, 0xF0),
        Symbol::Eob => ac_table.encode_symbol(writer, 0x00)
    }
}

/// Convert an interleaved RGB(A) pixel buffer into a planar [`Image`], ready
/// for [`encode`].
///
/// `channels` must be 3 (RGB) or 4 (RGBA); alpha, if present, passes through
/// unmodified as a fourth plane.
///
/// # Errors
/// `InvalidArgument` if `channels` is not 3 or 4, or if `pixels.len()` does
/// not match `width * height * channels`.
pub fn image_from_interleaved(pixels: &[u8], width: usize, height: usize, channels: usize) -> Result<Image, BitGrainError> {
    if channels != 1 && channels != 3 && channels != 4 {
        return Err(BitGrainError::InvalidArgument(format!("unsupported channel count {channels}")));
    }
    if pixels.len() != width * height * channels {
        return Err(BitGrainError::InvalidArgument("pixel buffer length does not match dimensions".into()));
    }

    if channels == 1 {
        return Ok(Image::new(vec![Plane::new(pixels.to_vec(), width, height)], ColorSpace::Grayscale));
    }

    let n = width * height;
    let mut r = Vec::with_capacity(n);
    let mut g = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);
    let mut a = Vec::with_capacity(n);
    for px in pixels.chunks_exact(channels) {
        r.push(px[0]);
        g.push(px[1]);
        b.push(px[2]);
        if channels == 4 {
            a.push(px[3]);
        }
    }

    let (y, cb, cr) = rgb_planes_to_ycbcr(&r, &g, &b);
    let y = Plane::new(y, width, height);
    let cb = Plane::new(cb, width, height);
    let cr = Plane::new(cr, width, height);

    if channels == 4 {
        let alpha = Plane::new(a, width, height);
        Ok(Image::new(vec![y, cb, cr, alpha], ColorSpace::YCbCrA))
    } else {
        Ok(Image::new(vec![y, cb, cr], ColorSpace::YCbCr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::decode;

    #[test]
    fn grayscale_round_trip_is_close() {
        let samples: Vec<u8> = (0..64).map(|v| (v * 3 % 251) as u8).collect();
        let image = Image::new(vec![Plane::new(samples.clone(), 8, 8)], ColorSpace::Grayscale);
        let encoded = encode(&image, 90, None).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.image.width(), 8);
        assert_eq!(decoded.image.height(), 8);
        for (a, b) in samples.iter().zip(decoded.image.planes()[0].samples()) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 20);
        }
    }

    #[test]
    fn encode_is_deterministic() {
        let samples: Vec<u8> = (0..256).map(|v| (v % 200) as u8).collect();
        let image = Image::new(vec![Plane::new(samples, 16, 16)], ColorSpace::Grayscale);
        let a = encode(&image, 80, None).unwrap();
        let b = encode(&image, 80, None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn quality_zero_matches_default_85() {
        let samples: Vec<u8> = (0..64).map(|v| v as u8).collect();
        let image = Image::new(vec![Plane::new(samples, 8, 8)], ColorSpace::Grayscale);
        assert_eq!(encode(&image, 0, None).unwrap(), encode(&image, 85, None).unwrap());
    }

    #[test]
    fn single_pixel_image_round_trips() {
        let image = Image::new(vec![Plane::filled(200, 1, 1)], ColorSpace::Grayscale);
        let encoded = encode(&image, 50, None).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.image.width(), 1);
        assert_eq!(decoded.image.height(), 1);
    }

    #[test]
    fn icc_bytes_are_carried_in_the_stream() {
        let samples = vec![10u8; 64];
        let image = Image::new(vec![Plane::new(samples, 8, 8)], ColorSpace::Grayscale);
        let icc = vec![9u8; 64];
        let encoded = encode(&image, 85, Some(&icc)).unwrap();
        let decoded = decode(&encoded).unwrap();
        assert_eq!(decoded.icc, Some(icc));
    }
}
