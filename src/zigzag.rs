//! The zigzag permutation: orders an 8x8 frequency grid from low to high
//! spatial frequency
//!
//! `ZIGZAG` is the forward permutation (natural-order index -> zigzag
//! position); `UN_ZIGZAG` is its inverse, reproduced from
//! `zune-jpeg::misc::UN_ZIGZAG`.

use crate::block::{Block, BLOCK_SIZE};

/// natural-order index -> zigzag-scan position
#[rustfmt::skip]
pub const ZIGZAG: [usize; BLOCK_SIZE] = [
    0,  1,  5,  6,  14, 15, 27, 28,
    2,  4,  7,  13, 16, 26, 29, 42,
    3,  8,  12, 17, 25, 30, 41, 43,
    9,  11, 18, 24, 31, 40, 44, 53,
    10, 19, 23, 32, 39, 45, 52, 54,
    20, 22, 33, 38, 46, 51, 55, 60,
    21, 34, 37, 47, 50, 56, 59, 61,
    35, 36, 48, 49, 57, 58, 62, 63,
];

/// zigzag-scan position -> natural-order index (inverse of [`ZIGZAG`])
#[rustfmt::skip]
pub const UN_ZIGZAG: [usize; BLOCK_SIZE] = [
    0,  1,  8,  16, 9,  2,  3, 10,
    17, 24, 32, 25, 18, 11, 4,  5,
    12, 19, 26, 33, 40, 48, 41, 34,
    27, 20, 13, 6,  7,  14, 21, 28,
    35, 42, 49, 56, 57, 50, 43, 36,
    29, 22, 15, 23, 30, 37, 44, 51,
    58, 59, 52, 45, 38, 31, 39, 46,
    53, 60, 61, 54, 47, 55, 62, 63,
];

/// Reorder a block's 64 coefficients from natural (row-major) order into
/// zigzag-scan order
#[must_use]
pub fn scan(block: &Block) -> [i16; BLOCK_SIZE] {
    let mut out = [0i16; BLOCK_SIZE];
    for (natural, &zz) in ZIGZAG.iter().enumerate() {
        out[zz] = block.as_slice()[natural];
    }
    out
}

/// Reorder zigzag-scanned coefficients back into a natural-order block
#[must_use]
pub fn unscan(scanned: &[i16; BLOCK_SIZE]) -> Block {
    let mut block = Block::zeroed();
    for (natural, &zz) in ZIGZAG.iter().enumerate() {
        block.as_mut_slice()[natural] = scanned[zz];
    }
    block
}
