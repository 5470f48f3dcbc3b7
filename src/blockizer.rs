//! Partition a [`Plane`] into 8x8 [`Block`]s, and write them back
//!
//! When width or height is not a multiple of 8 the last column/row of
//! blocks is padded by replicating the last valid sample (edge
//! replication), as `spec.md` §4.2 requires. The inverse only ever writes
//! the valid `W x H` region back out.

use crate::block::{Block, BLOCK_DIM};
use crate::image::Plane;

/// Number of 8x8 blocks needed to cover `dim` samples, rounding up
#[must_use]
pub fn blocks_per_dim(dim: usize) -> usize {
    (dim + BLOCK_DIM - 1) / BLOCK_DIM
}

/// Split a plane into row-major 8x8 blocks, edge-replicating into any
/// trailing partial block
#[must_use]
pub fn blockize(plane: &Plane) -> Vec<Block> {
    let (w, h) = (plane.width(), plane.height());
    let bw = blocks_per_dim(w);
    let bh = blocks_per_dim(h);
    let mut blocks = Vec::with_capacity(bw * bh);

    for by in 0..bh {
        for bx in 0..bw {
            let mut block = Block::zeroed();
            for row in 0..BLOCK_DIM {
                let sy = (by * BLOCK_DIM + row).min(h - 1);
                for col in 0..BLOCK_DIM {
                    let sx = (bx * BLOCK_DIM + col).min(w - 1);
                    block.as_mut_slice()[row * BLOCK_DIM + col] = i16::from(plane.get(sx, sy));
                }
            }
            blocks.push(block);
        }
    }
    blocks
}

/// Inverse of [`blockize`]: write the valid `W x H` region of `blocks` back
/// into a plane, discarding padded columns/rows
#[must_use]
pub fn unblockize(blocks: &[Block], width: usize, height: usize) -> Plane {
    let bw = blocks_per_dim(width);
    let mut plane = Plane::filled(0, width, height);

    for (i, block) in blocks.iter().enumerate() {
        let bx = i % bw;
        let by = i / bw;
        for row in 0..BLOCK_DIM {
            let py = by * BLOCK_DIM + row;
            if py >= height {
                break;
            }
            for col in 0..BLOCK_DIM {
                let px = bx * BLOCK_DIM + col;
                if px >= width {
                    break;
                }
                let v = block.as_slice()[row * BLOCK_DIM + col].clamp(0, 255) as u8;
                plane.set(px, py, v);
            }
        }
    }
    plane
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_multiple_of_eight_round_trips() {
        let samples: Vec<u8> = (0..256).map(|v| (v % 256) as u8).collect();
        let plane = Plane::new(samples.clone(), 16, 16);
        let blocks = blockize(&plane);
        assert_eq!(blocks.len(), 4);
        let back = unblockize(&blocks, 16, 16);
        assert_eq!(back.samples(), samples.as_slice());
    }

    #[test]
    fn padding_does_not_leak_into_output() {
        // 17x17: padded column/row must not appear in unblockize output
        let samples: Vec<u8> = (0..17 * 17).map(|v| (v % 251) as u8).collect();
        let plane = Plane::new(samples.clone(), 17, 17);
        let blocks = blockize(&plane);
        assert_eq!(blocks.len(), blocks_per_dim(17) * blocks_per_dim(17));
        let back = unblockize(&blocks, 17, 17);
        assert_eq!(back.width(), 17);
        assert_eq!(back.height(), 17);
        assert_eq!(back.samples(), samples.as_slice());
    }

    #[test]
    fn edge_replication_fills_padding() {
        // a 1x1 plane should fill the whole 8x8 block with its one sample
        let plane = Plane::new(vec![200], 1, 1);
        let blocks = blockize(&plane);
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].as_slice().iter().all(|&v| v == 200));
    }
}
