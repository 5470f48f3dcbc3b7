//! Shared dimension/buffer limits and the quality-to-scale mapping
//!
//! Grounded in `bg_utils.h`/`config.h` of the original C sources: the same
//! four limits gate both the encoder's dimension check and the decoder's
//! header validation.

/// Largest accepted value for either width or height
pub const MAX_DIM: u32 = 65_536;
/// Largest accepted value of `width * height * channels`
pub const MAX_PIXEL_BYTES: u64 = 2 * 1024 * 1024 * 1024;
/// Largest `.bg` stream the decoder will attempt to parse
pub const MAX_BG_FILE: u64 = 2 * 1024 * 1024 * 1024;

/// Default quality used when the caller passes `0`
pub const DEFAULT_QUALITY: u8 = 85;

/// Check width/height/channels against the codec's accepted range
///
/// Mirrors `check_image_size` in `bg_utils.c`.
pub fn check_image_size(width: u32, height: u32, channels: u32) -> bool {
    if width == 0 || height == 0 || width > MAX_DIM || height > MAX_DIM {
        return false;
    }
    let bytes = u64::from(width) * u64::from(height) * u64::from(channels);
    bytes <= MAX_PIXEL_BYTES
}

/// Clamp a caller-supplied quality value into `[1,100]`, mapping `0` to the
/// default of 85
#[must_use]
pub fn normalize_quality(quality: u8) -> u8 {
    if quality == 0 {
        DEFAULT_QUALITY
    } else {
        quality.clamp(1, 100)
    }
}

/// Linear scale factor derived from a quality value, per the classic JPEG
/// formula: `S = (100-q)/50` for `q>=50`, else `S = 50/q`
#[must_use]
pub fn quality_to_scale(quality: u8) -> f32 {
    let q = f32::from(normalize_quality(quality));
    if q >= 50.0 {
        (100.0 - q) / 50.0
    } else {
        50.0 / q
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_quality_is_85() {
        assert_eq!(normalize_quality(0), 85);
    }

    #[test]
    fn quality_clamped_into_range() {
        assert_eq!(normalize_quality(255), 100);
        assert_eq!(normalize_quality(1), 1);
    }

    #[test]
    fn scale_at_85_is_030() {
        assert!((quality_to_scale(85) - 0.30).abs() < 1e-6);
    }

    #[test]
    fn oversized_dimensions_rejected() {
        assert!(!check_image_size(MAX_DIM + 1, 10, 1));
        assert!(!check_image_size(0, 10, 1));
    }

    #[test]
    fn pixel_byte_budget_enforced() {
        // width * height * channels just over 2 GiB
        assert!(!check_image_size(65_536, 65_536, 1));
    }
}
