//! Image-quality metrics: PSNR and a single-global-window SSIM
//!
//! Formulas and constants grounded in `original_source/c/metrics.c`. Both
//! operate over all samples of all channels treated as one flat sequence
//! (`spec.md` §4.10); this is not the sliding-window SSIM variant.

const C1: f64 = 0.01 * 255.0 * 0.01 * 255.0;
const C2: f64 = 0.03 * 255.0 * 0.03 * 255.0;

/// Peak Signal-to-Noise Ratio in decibels, `10*log10(255^2/MSE)`.
///
/// Returns the sentinel `99.0` when the two buffers are identical (MSE=0).
///
/// # Panics
/// If `a.len() != b.len()`.
#[must_use]
pub fn psnr(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len(), "psnr: buffer length mismatch");
    let mse = mean_squared_error(a, b);
    if mse == 0.0 {
        return 99.0;
    }
    10.0 * (255.0 * 255.0 / mse).log10()
}

fn mean_squared_error(a: &[u8], b: &[u8]) -> f64 {
    let n = a.len() as f64;
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    sum / n
}

/// Structural Similarity over a single global window spanning every sample.
///
/// # Panics
/// If `a.len() != b.len()`.
#[must_use]
pub fn ssim(a: &[u8], b: &[u8]) -> f64 {
    assert_eq!(a.len(), b.len(), "ssim: buffer length mismatch");
    let n = a.len() as f64;

    let mean_a: f64 = a.iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let mean_b: f64 = b.iter().map(|&v| f64::from(v)).sum::<f64>() / n;

    let var_a: f64 = a.iter().map(|&v| (f64::from(v) - mean_a).powi(2)).sum::<f64>() / n;
    let var_b: f64 = b.iter().map(|&v| (f64::from(v) - mean_b).powi(2)).sum::<f64>() / n;

    let covar: f64 = a
        .iter()
        .zip(b)
        .map(|(&x, &y)| (f64::from(x) - mean_a) * (f64::from(y) - mean_b))
        .sum::<f64>()
        / n;

    let numerator = (2.0 * mean_a * mean_b + C1) * (2.0 * covar + C2);
    let denominator = (mean_a * mean_a + mean_b * mean_b + C1) * (var_a + var_b + C2);
    numerator / denominator
}
