//! Parses a `.bg` stream and composes the inverse stages (`spec.md` §4.9)
//!
//! Adapted from the shape of the teacher's `decoder.rs` top-level driver: a
//! single call that owns all per-call pipeline state, parses the container,
//! then drives this crate's fixed-Huffman, non-progressive pipeline rather
//! than full baseline+progressive JPEG.

use crate::bitstream::BitReader;
use crate::blockizer::{blocks_per_dim, unblockize};
use crate::color_convert::ycbcr_planes_to_rgb;
use crate::container::{parse_icc_section, parse_quality, Header};
use crate::dct::{choose_kernel, DctKernel};
use crate::errors::BitGrainError;
use crate::huffman::{self, HuffmanTable};
use crate::image::{ColorSpace, Image, Plane};
use crate::quant::{dequantize, QuantTable, TableKind};
use crate::rle::{decode_block, DcPredictor, Symbol};
use crate::zigzag::unscan;

/// Result of decoding a `.bg` stream: the reconstructed image plus any
/// carried ICC profile bytes.
#[derive(Debug)]
pub struct Decoded {
    pub image: Image,
    pub icc: Option<Vec<u8>>
}

/// Decode a complete `.bg` byte stream.
///
/// # Errors
/// `MalformedHeader`/`DimensionsOutOfRange` from header parsing,
/// `TruncatedPayload` if the payload runs out before every block is
/// decoded, or `MalformedPayload` if a Huffman code or run length is
/// invalid. Trailing bytes after the last component's payload are ignored.
pub fn decode(data: &[u8]) -> Result<Decoded, BitGrainError> {
    let header = Header::parse(data)?;
    let quality = parse_quality(&data[11..])?;
    debug!(
        "decoding {}x{} stream, colorspace={:?}, quality={quality}",
        header.width, header.height, header.colorspace
    );

    let (icc, icc_consumed) = parse_icc_section(&data[12..])?;
    let payload = &data[12 + icc_consumed..];

    let kernel = choose_kernel();
    let luma_quant = QuantTable::derive(TableKind::Luma, quality);
    let chroma_quant = QuantTable::derive(TableKind::Chroma, quality);
    let luma_dc = huffman::dc_luma_table();
    let luma_ac = huffman::ac_luma_table();
    let chroma_dc = huffman::dc_chroma_table();
    let chroma_ac = huffman::ac_chroma_table();

    let width = header.width as usize;
    let height = header.height as usize;
    let channels = header.colorspace.num_channels();

    let mut offset = 0usize;
    let mut planes = Vec::with_capacity(channels);

    for index in 0..channels {
        let is_chroma = (header.colorspace == ColorSpace::YCbCr || header.colorspace == ColorSpace::YCbCrA)
            && (index == 1 || index == 2);
        let (quant, dc_table, ac_table) = if is_chroma {
            (&chroma_quant, &chroma_dc, &chroma_ac)
        } else {
            (&luma_quant, &luma_dc, &luma_ac)
        };

        trace!("component {index}: decoding entropy segment at offset {offset}");
        let (plane, consumed) = decode_plane(&payload[offset..], width, height, kernel.as_ref(), quant, dc_table, ac_table)?;
        offset += consumed;
        planes.push(plane);
    }

    let image = if header.colorspace == ColorSpace::Grayscale {
        Image::new(planes, ColorSpace::Grayscale)
    } else {
        let (r, g, b) = ycbcr_planes_to_rgb(planes[0].samples(), planes[1].samples(), planes[2].samples());
        let mut out_planes = vec![
            Plane::new(r, width, height),
            Plane::new(g, width, height),
            Plane::new(b, width, height)
        ];
        if header.colorspace == ColorSpace::YCbCrA {
            out_planes.push(planes[3].clone());
        }
        Image::new(out_planes, header.colorspace)
    };

    Ok(Decoded { image, icc: if icc.is_empty() { None } else { Some(icc) } })
}

fn decode_plane(
    data: &[u8],
    width: usize,
    height: usize,
    kernel: &dyn DctKernel,
    quant: &QuantTable,
    dc_table: &HuffmanTable,
    ac_table: &HuffmanTable
) -> Result<(Plane, usize), BitGrainError> {
    let block_count = blocks_per_dim(width) * blocks_per_dim(height);
    let mut reader = BitReader::new(data);
    let mut predictor = DcPredictor::new();
    let mut blocks = Vec::with_capacity(block_count);

    for _ in 0..block_count {
        let symbols = decode_symbols(&mut reader, dc_table, ac_table)?;
        let (mut scanned, dc_diff) = decode_block(&symbols)
            .map_err(|reason| BitGrainError::MalformedPayload(reason.into()))?;
        scanned[0] = predictor.reconstruct(dc_diff);

        let mut block = unscan(&scanned);
        dequantize(&mut block, quant)?;
        kernel.inverse(&mut block);
        for sample in block.as_mut_slice() {
            *sample += 128;
        }
        blocks.push(block);
    }

    let consumed = reader.byte_pos();
    Ok((unblockize(&blocks, width, height), consumed))
}

/// Decode one block's worth of symbols: a leading DC symbol followed by ACs
/// up to and including the terminating EOB.
fn decode_symbols(reader: &mut BitReader, dc_table: &HuffmanTable, ac_table: &HuffmanTable) -> Result<Vec<Symbol>, BitGrainError> {
    let mut symbols = Vec::with_capacity(16);

    let dc_category = dc_table.decode_symbol(reader)?;
    let dc_bits = reader.get_bits(u32::from(dc_category))?;
    symbols.push(Symbol::Dc(huffman::decode_magnitude(dc_bits, dc_category)));

    loop {
        let byte = ac_table.decode_symbol(reader)?;
        if byte == 0x00 {
            symbols.push(Symbol::Eob);
            break;
        }
        if byte == 0xF0 {
            symbols.push(Symbol::ZeroRunEscape);
            continue;
        }
        let run = byte >> 4;
        let size = byte & 0x0F;
        let bits = reader.get_bits(u32::from(size))?;
        symbols.push(Symbol::Ac { run, value: huffman::decode_magnitude(bits, size) });
    }

    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;

    #[test]
    fn truncated_stream_fails_with_truncated_payload() {
        let samples = vec![128u8; 64];
        let image = Image::new(vec![Plane::new(samples, 8, 8)], ColorSpace::Grayscale);
        let mut encoded = encode(&image, 85, None).unwrap();
        encoded.pop();
        assert!(matches!(decode(&encoded), Err(BitGrainError::TruncatedPayload)));
    }

    #[test]
    fn bad_magic_fails_with_malformed_header() {
        let samples = vec![128u8; 64];
        let image = Image::new(vec![Plane::new(samples, 8, 8)], ColorSpace::Grayscale);
        let mut encoded = encode(&image, 85, None).unwrap();
        encoded[0] = b'X';
        assert!(matches!(decode(&encoded), Err(BitGrainError::MalformedHeader(_))));
    }

    #[test]
    fn solid_color_at_q100_is_near_lossless() {
        let samples = vec![128u8; 64];
        let image = Image::new(vec![Plane::new(samples.clone(), 8, 8)], ColorSpace::Grayscale);
        let encoded = encode(&image, 100, None).unwrap();
        let decoded = decode(&encoded).unwrap();
        for (a, b) in samples.iter().zip(decoded.image.planes()[0].samples()) {
            assert!((i16::from(*a) - i16::from(*b)).abs() <= 1);
        }
    }

    #[test]
    fn header_starts_with_expected_bytes() {
        let samples = vec![128u8; 64];
        let image = Image::new(vec![Plane::new(samples, 8, 8)], ColorSpace::Grayscale);
        let encoded = encode(&image, 85, None).unwrap();
        assert_eq!(&encoded[0..11], &[0x42, 0x47, 0x01, 0x08, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00]);
    }
}
