//! Reconstruction quality of 8-bit samples, for judging lossy round trips.

use crate::error::{Error, Result};

/// Reported when both inputs are identical.
pub const PSNR_IDENTICAL: f64 = 99.0;

const SSIM_C1: f64 = 6.5025; // (0.01 * 255)^2
const SSIM_C2: f64 = 58.5225; // (0.03 * 255)^2

fn same_len(original: &[u8], reconstructed: &[u8]) -> Result<()> {
    if original.len() != reconstructed.len() {
        return Err(Error::invalid_input(format!(
            "sample counts differ: {} vs {}",
            original.len(),
            reconstructed.len()
        )));
    }
    Ok(())
}

/// Peak signal-to-noise ratio in dB.
pub fn psnr(original: &[u8], reconstructed: &[u8]) -> Result<f64> {
    same_len(original, reconstructed)?;
    if original.is_empty() {
        return Ok(0.0);
    }
    let sum_sq: u64 = original
        .iter()
        .zip(reconstructed)
        .map(|(&a, &b)| {
            let d = a as i64 - b as i64;
            (d * d) as u64
        })
        .sum();
    if sum_sq == 0 {
        return Ok(PSNR_IDENTICAL);
    }
    let mse = sum_sq as f64 / original.len() as f64;
    Ok(10.0 * ((255.0 * 255.0) / mse).log10())
}

/// Structural similarity computed over the whole buffer as one window.
pub fn ssim(original: &[u8], reconstructed: &[u8]) -> Result<f64> {
    same_len(original, reconstructed)?;
    if original.is_empty() {
        return Ok(0.0);
    }
    let n = original.len() as f64;
    let (sum_x, sum_y) = original
        .iter()
        .zip(reconstructed)
        .fold((0.0, 0.0), |(sx, sy), (&a, &b)| (sx + a as f64, sy + b as f64));
    let (mu_x, mu_y) = (sum_x / n, sum_y / n);

    let (mut var_x, mut var_y, mut cov) = (0.0, 0.0, 0.0);
    for (&a, &b) in original.iter().zip(reconstructed) {
        let dx = a as f64 - mu_x;
        let dy = b as f64 - mu_y;
        var_x += dx * dx;
        var_y += dy * dy;
        cov += dx * dy;
    }
    var_x /= n;
    var_y /= n;
    cov /= n;

    let (sig_x, sig_y) = (var_x.sqrt(), var_y.sqrt());
    let luminance = (2.0 * mu_x * mu_y + SSIM_C1) / (mu_x * mu_x + mu_y * mu_y + SSIM_C1);
    let contrast = (2.0 * sig_x * sig_y + SSIM_C2) / (var_x + var_y + SSIM_C2);
    let structure = (cov + SSIM_C2 / 2.0) / (sig_x * sig_y + SSIM_C2 / 2.0);
    Ok(luminance * contrast * structure)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_buffers() {
        let a: Vec<u8> = (0..=255).collect();
        assert_eq!(psnr(&a, &a).unwrap(), PSNR_IDENTICAL);
        assert!((ssim(&a, &a).unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_and_mismatched() {
        assert_eq!(psnr(&[], &[]).unwrap(), 0.0);
        assert_eq!(ssim(&[], &[]).unwrap(), 0.0);
        assert!(psnr(&[1, 2], &[1]).is_err());
        assert!(ssim(&[1], &[1, 2]).is_err());
    }

    #[test]
    fn psnr_of_uniform_error() {
        // MSE 1 -> 10*log10(65025) ~= 48.13 dB
        let a = vec![100u8; 64];
        let b = vec![101u8; 64];
        let v = psnr(&a, &b).unwrap();
        assert!((v - 48.1308).abs() < 1e-3, "{v}");
    }

    #[test]
    fn ssim_drops_with_noise() {
        let a: Vec<u8> = (0..1024).map(|i| (i % 256) as u8).collect();
        let b: Vec<u8> = a.iter().map(|&v| 255 - v).collect();
        let s = ssim(&a, &b).unwrap();
        assert!(s < 0.5, "{s}");
    }
}
