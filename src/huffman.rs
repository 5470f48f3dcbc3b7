#![allow(clippy::unreadable_literal)]
//! The fixed JPEG baseline Huffman scheme (`spec.md` §4.7, §9)
//!
//! `spec.md` §9 leaves the concrete table choice to the implementer; this
//! crate picks option (a): the standard JPEG Annex K canonical Huffman
//! tables, so no container version bump is required for a nonstandard
//! choice. Table derivation (`mincode`/`maxcode`/`valptr` for decode,
//! `ehufco`/`ehufsi` for encode) follows the classic Annex C algorithm,
//! built here in the spirit of `zune-jpeg::huffman::HuffmanTable`'s
//! size/code/delta/maxcode derivation, extended with the encode-side tables
//! the teacher's decode-only scheme never needed.

use crate::bitstream::{BitReader, BitWriter};
use crate::errors::BitGrainError;

/// A canonical Huffman table, usable for both encode and decode
pub struct HuffmanTable {
    mincode: [i32; 17],
    maxcode: [i32; 17],
    valptr: [i32; 17],
    huffval: Vec<u8>,
    ehufco: [u16; 256],
    ehufsi: [u8; 256]
}

impl HuffmanTable {
    /// `bits[i]` is the number of codes of length `i+1`; `huffval` lists the
    /// symbol bytes in canonical order
    #[must_use]
    pub fn new(bits: [u8; 16], huffval: Vec<u8>) -> Self {
        let mut mincode = [0i32; 17];
        let mut maxcode = [-1i32; 17];
        let mut valptr = [0i32; 17];

        let mut code = 0i32;
        let mut p = 0usize;
        for l in 1..=16usize {
            let count = i32::from(bits[l - 1]);
            if count > 0 {
                valptr[l] = p as i32;
                mincode[l] = code;
                code += count;
                p += count as usize;
                maxcode[l] = code - 1;
            }
            code <<= 1;
        }

        let mut ehufco = [0u16; 256];
        let mut ehufsi = [0u8; 256];
        let mut code = 0u32;
        let mut k = 0usize;
        for l in 1..=16usize {
            for _ in 0..bits[l - 1] {
                let symbol = huffval[k] as usize;
                ehufco[symbol] = code as u16;
                ehufsi[symbol] = l as u8;
                code += 1;
                k += 1;
            }
            code <<= 1;
        }

        HuffmanTable { mincode, maxcode, valptr, huffval, ehufco, ehufsi }
    }

    /// Append the code for `symbol` to `writer`
    pub fn encode_symbol(&self, writer: &mut BitWriter, symbol: u8) {
        let code = self.ehufco[symbol as usize];
        let len = self.ehufsi[symbol as usize];
        writer.put_bits(code, len);
    }

    /// Decode the next symbol from `reader`
    ///
    /// # Errors
    /// `MalformedPayload` if no code of length `1..=16` matches; the
    /// bitstream running out first surfaces as `TruncatedPayload`.
    pub fn decode_symbol(&self, reader: &mut BitReader) -> Result<u8, BitGrainError> {
        let mut code = 0i32;
        for l in 1..=16usize {
            code = (code << 1) | (reader.get_bit()? as i32);
            if self.maxcode[l] != -1 && code <= self.maxcode[l] {
                let idx = (self.valptr[l] + (code - self.mincode[l])) as usize;
                return Ok(self.huffval[idx]);
            }
        }
        Err(BitGrainError::MalformedPayload("no Huffman code matched".into()))
    }
}

/// Number of bits needed to represent `value`'s magnitude; 0 for `value == 0`
#[must_use]
pub fn category(value: i16) -> u8 {
    if value == 0 {
        0
    } else {
        16 - value.unsigned_abs().leading_zeros() as u8
    }
}

/// Encode `value`'s magnitude bits: the value itself if non-negative, or the
/// one's-complement of its absolute value if negative, so the MSB carries
/// the sign
#[must_use]
pub fn encode_magnitude(value: i16, category: u8) -> u16 {
    if category == 0 {
        return 0;
    }
    let mask = (1u16 << category) - 1;
    if value >= 0 {
        (value as u16) & mask
    } else {
        let abs = (-(i32::from(value))) as u16;
        (!abs) & mask
    }
}

/// Inverse of [`encode_magnitude`]
#[must_use]
pub fn decode_magnitude(bits: u32, category: u8) -> i16 {
    if category == 0 {
        return 0;
    }
    let half = 1i32 << (category - 1);
    let bits = bits as i32;
    if bits < half {
        (bits - ((1i32 << category) - 1)) as i16
    } else {
        bits as i16
    }
}

#[rustfmt::skip]
const DC_LUMA_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const DC_LUMA_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

#[rustfmt::skip]
const DC_CHROMA_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const DC_CHROMA_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

#[rustfmt::skip]
const AC_LUMA_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];
#[rustfmt::skip]
const AC_LUMA_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12,
    0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08,
    0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16,
    0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39,
    0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59,
    0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79,
    0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98,
    0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6,
    0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4,
    0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea,
    0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

#[rustfmt::skip]
const AC_CHROMA_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];
#[rustfmt::skip]
const AC_CHROMA_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21,
    0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91,
    0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34,
    0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38,
    0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58,
    0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78,
    0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96,
    0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4,
    0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2,
    0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9,
    0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// Build the canonical luma DC table
#[must_use]
pub fn dc_luma_table() -> HuffmanTable {
    HuffmanTable::new(DC_LUMA_BITS, DC_LUMA_VALUES.to_vec())
}

/// Build the canonical chroma DC table
#[must_use]
pub fn dc_chroma_table() -> HuffmanTable {
    HuffmanTable::new(DC_CHROMA_BITS, DC_CHROMA_VALUES.to_vec())
}

/// Build the canonical luma AC table
#[must_use]
pub fn ac_luma_table() -> HuffmanTable {
    HuffmanTable::new(AC_LUMA_BITS, AC_LUMA_VALUES.to_vec())
}

/// Build the canonical chroma AC table
#[must_use]
pub fn ac_chroma_table() -> HuffmanTable {
    HuffmanTable::new(AC_CHROMA_BITS, AC_CHROMA_VALUES.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_matches_bit_length() {
        assert_eq!(category(0), 0);
        assert_eq!(category(1), 1);
        assert_eq!(category(-1), 1);
        assert_eq!(category(3), 2);
        assert_eq!(category(-4), 3);
        assert_eq!(category(2047), 11);
    }

    #[test]
    fn magnitude_round_trips() {
        for v in -300i16..300 {
            let cat = category(v);
            let bits = encode_magnitude(v, cat);
            assert_eq!(decode_magnitude(u32::from(bits), cat), v);
        }
    }

    #[test]
    fn every_canonical_table_round_trips_every_symbol() {
        for (bits, values) in [
            (DC_LUMA_BITS, DC_LUMA_VALUES.to_vec()),
            (DC_CHROMA_BITS, DC_CHROMA_VALUES.to_vec()),
            (AC_LUMA_BITS, AC_LUMA_VALUES.to_vec()),
            (AC_CHROMA_BITS, AC_CHROMA_VALUES.to_vec())
        ] {
            let table = HuffmanTable::new(bits, values.clone());
            let mut writer = BitWriter::new();
            for &symbol in &values {
                table.encode_symbol(&mut writer, symbol);
            }
            let bytes = writer.finish();
            let mut reader = BitReader::new(&bytes);
            for &symbol in &values {
                assert_eq!(table.decode_symbol(&mut reader).unwrap(), symbol);
            }
        }
    }
}
