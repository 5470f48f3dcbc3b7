#![allow(clippy::unreadable_literal)]
//! Quality-scaled quantization tables and the quantize/dequantize step
//!
//! Base tables are the standard JPEG Annex K luma/chroma tables, grounded in
//! `other_examples/449443db_vstroebel-jpeg-encoder__src-quantization.rs.rs`
//! (`DEFAULT_LUMA_TABLES`/`DEFAULT_CHROMA_TABLES`, index 0). The
//! quality->scale mapping lives in [`crate::config`]. Per `spec.md` §4.5,
//! forward quantization truncates toward zero rather than rounding; a
//! second, float-division "SIMD" path is provided and is required to agree
//! with the scalar integer-truncation path exactly.

use crate::block::{Block, BLOCK_SIZE};
use crate::config::quality_to_scale;

#[rustfmt::skip]
const BASE_LUMA: [u16; BLOCK_SIZE] = [
    16, 11, 10, 16, 24, 40, 51, 61,
    12, 12, 14, 19, 26, 58, 60, 55,
    14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62,
    18, 22, 37, 56, 68, 109, 103, 77,
    24, 35, 55, 64, 81, 104, 113, 92,
    49, 64, 78, 87, 103, 121, 120, 101,
    72, 92, 95, 98, 112, 100, 103, 99,
];

#[rustfmt::skip]
const BASE_CHROMA: [u16; BLOCK_SIZE] = [
    17, 18, 24, 47, 99, 99, 99, 99,
    18, 21, 26, 66, 99, 99, 99, 99,
    24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99,
];

/// Which base table a component's quantization table is derived from
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum TableKind {
    Luma,
    Chroma
}

/// A 64-entry quality-scaled quantization table, every entry `>= 1`
#[derive(Clone, Debug)]
pub struct QuantTable([i16; BLOCK_SIZE]);

impl QuantTable {
    /// Derive a table for `quality` (already normalized into `[1,100]`) from
    /// the given base table
    #[must_use]
    pub fn derive(kind: TableKind, quality: u8) -> Self {
        let base = match kind {
            TableKind::Luma => &BASE_LUMA,
            TableKind::Chroma => &BASE_CHROMA
        };
        let scale = quality_to_scale(quality);
        let mut table = [0i16; BLOCK_SIZE];
        for i in 0..BLOCK_SIZE {
            let scaled = (f32::from(base[i]) * scale).round();
            table[i] = (scaled as i32).clamp(1, 255) as i16;
        }
        QuantTable(table)
    }

    #[must_use]
    pub fn entries(&self) -> &[i16; BLOCK_SIZE] {
        &self.0
    }
}

/// Forward quantization: `q[i] = trunc(block[i] / table[i])`
pub fn quantize(block: &mut Block, table: &QuantTable) {
    for i in 0..BLOCK_SIZE {
        block.as_mut_slice()[i] /= table.entries()[i];
    }
}

/// Inverse quantization: `block[i] = q[i] * table[i]`
///
/// # Errors
/// `MalformedPayload` if any dequantized coefficient overflows `i16`,
/// per `spec.md` §7 (this can only happen on a corrupt or adversarial
/// payload, since a genuinely encoded block's coefficients are bounded by
/// construction).
pub fn dequantize(block: &mut Block, table: &QuantTable) -> Result<(), crate::errors::BitGrainError> {
    for i in 0..BLOCK_SIZE {
        let product = i32::from(block.as_slice()[i]) * i32::from(table.entries()[i]);
        if product < i32::from(i16::MIN) || product > i32::from(i16::MAX) {
            return Err(crate::errors::BitGrainError::MalformedPayload(
                "dequantized coefficient outside int16 range".into()
            ));
        }
        block.as_mut_slice()[i] = product as i16;
    }
    Ok(())
}

/// Float-division variant of [`quantize`], required to match it exactly.
/// Mirrors the SSE2/NEON "convert to float, divide, convert back" path
/// described in `spec.md` §4.5 and `original_source/c/quant.c`.
pub fn quantize_float(block: &mut Block, table: &QuantTable) {
    for i in 0..BLOCK_SIZE {
        let v = f32::from(block.as_slice()[i]);
        let t = f32::from(table.entries()[i]);
        // truncation toward zero, matching integer division
        block.as_mut_slice()[i] = (v / t).trunc() as i16;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_100_is_near_unity() {
        let table = QuantTable::derive(TableKind::Luma, 100);
        assert!(table.entries().iter().all(|&v| v >= 1));
    }

    #[test]
    fn every_entry_at_least_one() {
        for q in 1..=100u8 {
            let luma = QuantTable::derive(TableKind::Luma, q);
            let chroma = QuantTable::derive(TableKind::Chroma, q);
            assert!(luma.entries().iter().all(|&v| v >= 1));
            assert!(chroma.entries().iter().all(|&v| v >= 1));
        }
    }

    #[test]
    fn float_and_integer_quantize_agree() {
        let table = QuantTable::derive(TableKind::Luma, 50);
        let mut a = Block::from([0i16; 64]);
        for (i, v) in a.as_mut_slice().iter_mut().enumerate() {
            *v = (i as i32 * 37 - 900) as i16;
        }
        let mut b = a;
        quantize(&mut a, &table);
        quantize_float(&mut b, &table);
        assert_eq!(a, b);
    }

    #[test]
    fn higher_quality_scale_is_smaller() {
        assert!(quality_to_scale(90) < quality_to_scale(10));
    }

    #[test]
    fn quantize_then_dequantize_recovers_within_table_precision() {
        let table = QuantTable::derive(TableKind::Luma, 90);
        let mut block = Block::from([0i16; 64]);
        for (i, v) in block.as_mut_slice().iter_mut().enumerate() {
            *v = (i as i32 * 5 - 150) as i16;
        }
        let original = block;
        quantize(&mut block, &table);
        dequantize(&mut block, &table).unwrap();
        for (a, b) in original.as_slice().iter().zip(block.as_slice().iter()) {
            assert!((a - b).abs() <= *table.entries().iter().max().unwrap());
        }
    }

    #[test]
    fn dequantize_overflowing_i16_is_malformed_payload() {
        use crate::errors::BitGrainError;
        let table = QuantTable::derive(TableKind::Chroma, 1);
        let mut block = Block::from([0i16; 64]);
        block.as_mut_slice()[0] = i16::MAX;
        assert!(matches!(dequantize(&mut block, &table), Err(BitGrainError::MalformedPayload(_))));
    }
}
