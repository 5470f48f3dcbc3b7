#![allow(clippy::many_single_char_names, clippy::similar_names, clippy::cast_possible_truncation)]
//! Forward and inverse 2-D DCT-II on an 8x8 [`Block`]
//!
//! The cosine table and the separable row/column structure are grounded in
//! `original_source/c/dct.c`. Scalar, SSE2, and NEON kernels are required by
//! `spec.md` §4.4/§8.7 to produce bit-identical int16 output for identical
//! int16 input. Rather than letting the per-lane accumulation order of a
//! vectorized dot product drift from the scalar sum (floating point addition
//! is not associative), each kernel only vectorizes the *elementwise
//! product* of a row/column against a cosine table row; the eight products
//! are always reduced to a sum in the same left-to-right order regardless of
//! kernel. That keeps the equivalence contract exact rather than
//! approximate.

use crate::block::{Block, BLOCK_DIM};

/// `cos((2*x+1)*u*pi/16)` for `u,x` in `0..8`. Row `u`, column `x`.
#[rustfmt::skip]
const COS_TABLE: [[f32; 8]; 8] = [
    [ 1.000000,  1.000000,  1.000000,  1.000000,  1.000000,  1.000000,  1.000000,  1.000000],
    [ 0.980785,  0.831470,  0.555570,  0.195090, -0.195090, -0.555570, -0.831470, -0.980785],
    [ 0.923880,  0.382683, -0.382683, -0.923880, -0.923880, -0.382683,  0.382683,  0.923880],
    [ 0.831470, -0.195090, -0.980785, -0.555570,  0.555570,  0.980785,  0.195090, -0.831470],
    [ 0.707107, -0.707107, -0.707107,  0.707107,  0.707107, -0.707107, -0.707107,  0.707107],
    [ 0.555570, -0.980785,  0.195090,  0.831470, -0.831470, -0.195090,  0.980785, -0.555570],
    [ 0.382683, -0.923880,  0.923880, -0.382683, -0.382683,  0.923880, -0.923880,  0.382683],
    [ 0.195090, -0.555570,  0.831470, -0.980785,  0.980785, -0.831470,  0.555570, -0.195090],
];

const INV_SQRT2: f32 = std::f32::consts::FRAC_1_SQRT_2;

/// Elementwise product of two length-8 arrays
type ProductsFn = fn(&[f32; 8], &[f32; 8]) -> [f32; 8];

#[inline]
fn products_scalar(a: &[f32; 8], b: &[f32; 8]) -> [f32; 8] {
    std::array::from_fn(|i| a[i] * b[i])
}

/// Sum eight values in strict left-to-right order, so the result is
/// independent of how the products were computed
#[inline]
fn sum_sequential(values: &[f32; 8]) -> f32 {
    let mut total = 0.0f32;
    for &v in values {
        total += v;
    }
    total
}

/// Round-half-away-from-zero, matching `lroundf` semantics used by the
/// reference C implementation
#[inline]
fn round_half_away_from_zero(x: f32) -> i16 {
    let r = if x >= 0.0 { (x + 0.5).floor() } else { -((-x + 0.5).floor()) };
    r as i16
}

fn dct_1d(input: &[f32; 8], products: ProductsFn) -> [f32; 8] {
    let mut out = [0.0f32; 8];
    for (u, out_u) in out.iter_mut().enumerate() {
        let sum = sum_sequential(&products(input, &COS_TABLE[u]));
        let scale = if u == 0 { 0.5 * INV_SQRT2 } else { 0.5 };
        *out_u = scale * sum;
    }
    out
}

fn idct_1d(input: &[f32; 8], products: ProductsFn) -> [f32; 8] {
    let scaled: [f32; 8] = std::array::from_fn(|u| if u == 0 { INV_SQRT2 * input[u] } else { input[u] });
    let mut out = [0.0f32; 8];
    for (x, out_x) in out.iter_mut().enumerate() {
        let col: [f32; 8] = std::array::from_fn(|u| COS_TABLE[u][x]);
        let sum = sum_sequential(&products(&scaled, &col));
        *out_x = 0.5 * sum;
    }
    out
}

fn dct_block(block: &mut Block, products: ProductsFn) {
    let mut tmp = [0.0f32; 64];
    for y in 0..BLOCK_DIM {
        let row: [f32; 8] = std::array::from_fn(|x| f32::from(block.as_slice()[y * BLOCK_DIM + x]));
        let transformed = dct_1d(&row, products);
        for (u, &v) in transformed.iter().enumerate() {
            tmp[y * BLOCK_DIM + u] = v;
        }
    }
    for u in 0..BLOCK_DIM {
        let col: [f32; 8] = std::array::from_fn(|v| tmp[v * BLOCK_DIM + u]);
        let transformed = dct_1d(&col, products);
        for (v, &val) in transformed.iter().enumerate() {
            block.as_mut_slice()[v * BLOCK_DIM + u] = round_half_away_from_zero(val);
        }
    }
}

fn idct_block(block: &mut Block, products: ProductsFn) {
    let mut tmp = [0.0f32; 64];
    for u in 0..BLOCK_DIM {
        let col: [f32; 8] = std::array::from_fn(|v| f32::from(block.as_slice()[v * BLOCK_DIM + u]));
        let transformed = idct_1d(&col, products);
        for (v, &val) in transformed.iter().enumerate() {
            tmp[v * BLOCK_DIM + u] = val;
        }
    }
    for y in 0..BLOCK_DIM {
        let row: [f32; 8] = std::array::from_fn(|x| tmp[y * BLOCK_DIM + x]);
        let transformed = idct_1d(&row, products);
        for (x, &val) in transformed.iter().enumerate() {
            block.as_mut_slice()[y * BLOCK_DIM + x] = round_half_away_from_zero(val);
        }
    }
}

/// A kernel computing the forward and inverse DCT of an 8x8 block
pub trait DctKernel {
    fn forward(&self, block: &mut Block);
    fn inverse(&self, block: &mut Block);
    fn name(&self) -> &'static str;
}

/// Portable fallback kernel, used when no vector extension is detected
pub struct ScalarKernel;

impl DctKernel for ScalarKernel {
    fn forward(&self, block: &mut Block) {
        dct_block(block, products_scalar);
    }

    fn inverse(&self, block: &mut Block) {
        idct_block(block, products_scalar);
    }

    fn name(&self) -> &'static str {
        "scalar"
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
mod sse2 {
    #[cfg(target_arch = "x86")]
    use std::arch::x86::*;
    #[cfg(target_arch = "x86_64")]
    use std::arch::x86_64::*;

    /// SAFETY: caller must ensure `sse2` is available (checked via
    /// `is_x86_feature_detected!` before this is ever invoked)
    #[target_feature(enable = "sse2")]
    unsafe fn products_sse2_inner(a: &[f32; 8], b: &[f32; 8]) -> [f32; 8] {
        let mut out = [0.0f32; 8];
        for chunk in 0..2 {
            let va = _mm_loadu_ps(a.as_ptr().add(chunk * 4));
            let vb = _mm_loadu_ps(b.as_ptr().add(chunk * 4));
            let vp = _mm_mul_ps(va, vb);
            _mm_storeu_ps(out.as_mut_ptr().add(chunk * 4), vp);
        }
        out
    }

    pub fn products_sse2(a: &[f32; 8], b: &[f32; 8]) -> [f32; 8] {
        // SAFETY: only called by `Sse2Kernel`, which is only constructed
        // after `is_x86_feature_detected!("sse2")` returns true.
        unsafe { products_sse2_inner(a, b) }
    }
}

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
pub struct Sse2Kernel;

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
impl DctKernel for Sse2Kernel {
    fn forward(&self, block: &mut Block) {
        dct_block(block, sse2::products_sse2);
    }

    fn inverse(&self, block: &mut Block) {
        idct_block(block, sse2::products_sse2);
    }

    fn name(&self) -> &'static str {
        "sse2"
    }
}

#[cfg(target_arch = "aarch64")]
mod neon {
    use std::arch::aarch64::*;

    /// SAFETY: caller must ensure NEON is available; on `aarch64` this is
    /// architecturally guaranteed, so the wrapper below never needs runtime
    /// detection.
    #[target_feature(enable = "neon")]
    unsafe fn products_neon_inner(a: &[f32; 8], b: &[f32; 8]) -> [f32; 8] {
        let mut out = [0.0f32; 8];
        for chunk in 0..2 {
            let va = vld1q_f32(a.as_ptr().add(chunk * 4));
            let vb = vld1q_f32(b.as_ptr().add(chunk * 4));
            let vp = vmulq_f32(va, vb);
            vst1q_f32(out.as_mut_ptr().add(chunk * 4), vp);
        }
        out
    }

    pub fn products_neon(a: &[f32; 8], b: &[f32; 8]) -> [f32; 8] {
        // SAFETY: NEON is a mandatory aarch64 feature.
        unsafe { products_neon_inner(a, b) }
    }
}

#[cfg(target_arch = "aarch64")]
pub struct NeonKernel;

#[cfg(target_arch = "aarch64")]
impl DctKernel for NeonKernel {
    fn forward(&self, block: &mut Block) {
        dct_block(block, neon::products_neon);
    }

    fn inverse(&self, block: &mut Block) {
        idct_block(block, neon::products_neon);
    }

    fn name(&self) -> &'static str {
        "neon"
    }
}

/// Pick the best kernel available on the running CPU, mirroring
/// `choose_ycbcr_to_rgb_convert_func`'s detect-then-dispatch pattern
#[must_use]
pub fn choose_kernel() -> Box<dyn DctKernel + Send + Sync> {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("sse2") {
            return Box::new(Sse2Kernel);
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        return Box::new(NeonKernel);
    }
    #[allow(unreachable_code)]
    Box::new(ScalarKernel)
}
