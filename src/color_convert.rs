#![allow(clippy::many_single_char_names, clippy::similar_names, clippy::doc_markdown)]
//! RGB <-> YCbCr color transform
//!
//! Forward (encode-time) and inverse (decode-time) full-range BT.601-like
//! transform, per `spec.md` §4.3, done as fixed-point integer arithmetic
//! rather than float, matching the teacher's `color_convert::scalar`
//! idiom (`(45 * cr) >> 5`-style shifts) instead of a float multiply per
//! pixel. Alpha passes through untouched; grayscale images bypass this
//! stage entirely at the driver level.

/// Limit a value to `[0,255]`
#[inline]
fn clamp_i32(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

// 16-bit fixed-point RGB->YCbCr coefficients (coefficient * 2^16, rounded),
// the teacher has no forward direction of its own so this is the same
// fixed-point precision the JPEG reference RGB->YCbCr transform uses.
const FIX_Y_R: i32 = 19595;
const FIX_Y_G: i32 = 38470;
const FIX_Y_B: i32 = 7471;
const FIX_CB_R: i32 = 11059;
const FIX_CB_G: i32 = 21709;
const FIX_CB_B: i32 = 32768;
const FIX_CR_R: i32 = 32768;
const FIX_CR_G: i32 = 27439;
const FIX_CR_B: i32 = 5329;
const ONE_HALF: i32 = 1 << 15;
const CENTER: i32 = 128 << 16;

/// Convert one RGB pixel to YCbCr
#[inline]
#[must_use]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));

    let y = (FIX_Y_R * r + FIX_Y_G * g + FIX_Y_B * b + ONE_HALF) >> 16;
    let cb = (-FIX_CB_R * r - FIX_CB_G * g + FIX_CB_B * b + CENTER + ONE_HALF) >> 16;
    let cr = (FIX_CR_R * r - FIX_CR_G * g - FIX_CR_B * b + CENTER + ONE_HALF) >> 16;

    (clamp_i32(y), clamp_i32(cb), clamp_i32(cr))
}

/// Convert one YCbCr pixel back to RGB
///
/// Same shift-based fixed-point coefficients as the teacher's
/// `ycbcr_to_rgb_scalar`, applied to a single pixel instead of an 8-wide row.
#[inline]
#[must_use]
pub fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> (u8, u8, u8) {
    let y = i32::from(y);
    let cb = i32::from(cb) - 128;
    let cr = i32::from(cr) - 128;

    let r = y + ((45 * cr) >> 5);
    let g = y - ((11 * cb + 23 * cr) >> 5);
    let b = y + ((113 * cb) >> 6);

    (clamp_i32(r), clamp_i32(g), clamp_i32(b))
}

/// Convert whole `R`,`G`,`B` planes (equal length) into `Y`,`Cb`,`Cr` planes
pub fn rgb_planes_to_ycbcr(r: &[u8], g: &[u8], b: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let n = r.len();
    let mut y = Vec::with_capacity(n);
    let mut cb = Vec::with_capacity(n);
    let mut cr = Vec::with_capacity(n);

    for i in 0..n {
        let (yy, cbcb, crcr) = rgb_to_ycbcr(r[i], g[i], b[i]);
        y.push(yy);
        cb.push(cbcb);
        cr.push(crcr);
    }
    (y, cb, cr)
}

/// Convert whole `Y`,`Cb`,`Cr` planes (equal length) back into `R`,`G`,`B` planes
pub fn ycbcr_planes_to_rgb(y: &[u8], cb: &[u8], cr: &[u8]) -> (Vec<u8>, Vec<u8>, Vec<u8>) {
    let n = y.len();
    let mut r = Vec::with_capacity(n);
    let mut g = Vec::with_capacity(n);
    let mut b = Vec::with_capacity(n);

    for i in 0..n {
        let (rr, gg, bb) = ycbcr_to_rgb(y[i], cb[i], cr[i]);
        r.push(rr);
        g.push(gg);
        b.push(bb);
    }
    (r, g, b)
}
