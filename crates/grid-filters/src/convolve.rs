//! Separable 2-D convolution with Gaussian kernels.
//!
//! The row pass and the column pass each write one output row per rayon
//! task. Every output cell depends only on the input buffer, so the
//! parallel result is identical to a sequential scan.

use rayon::prelude::*;

use crate::border::clamp_index;

/// Build a normalized 1-D Gaussian kernel.
///
/// `kernel[i] = exp(-(i - center)^2 / (2 * sigma^2))`, scaled so the
/// values sum to 1.
///
/// # Panics
/// If `size` is even or `sigma` is not a positive finite number.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Vec<f64> {
    assert!(size % 2 == 1, "kernel size must be odd, got {size}");
    assert!(
        sigma.is_finite() && sigma > 0.0,
        "sigma must be > 0 and finite, got {sigma}"
    );

    let center = (size / 2) as isize;
    let sigma2 = sigma * sigma;
    let mut kernel: Vec<f64> = (0..size)
        .map(|i| {
            let x = (i as isize - center) as f64;
            (-(x * x) / (2.0 * sigma2)).exp()
        })
        .collect();

    let sum: f64 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }

    kernel
}

/// Convolve a row-major grid with `kernel` along rows, then along columns.
///
/// Out-of-range taps are clamped to the nearest valid row/column.
///
/// # Panics
/// If `data.len() != width * height` or the kernel length is even.
pub fn separable_convolve(data: &[f64], width: usize, height: usize, kernel: &[f64]) -> Vec<f64> {
    assert_eq!(
        data.len(),
        width * height,
        "data length must equal width * height"
    );
    assert!(
        kernel.len() % 2 == 1,
        "kernel length must be odd, got {}",
        kernel.len()
    );
    if data.is_empty() {
        return Vec::new();
    }

    let half = (kernel.len() / 2) as isize;

    // Row pass
    let mut temp = vec![0.0f64; data.len()];
    temp.par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            let row = &data[y * width..(y + 1) * width];
            for (x, out) in out_row.iter_mut().enumerate() {
                let mut acc = 0.0;
                for (k, &kv) in kernel.iter().enumerate() {
                    let sx = clamp_index(x as isize + k as isize - half, width);
                    acc += kv * row[sx];
                }
                *out = acc;
            }
        });

    // Column pass
    let mut result = vec![0.0f64; data.len()];
    result
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, out_row)| {
            for (k, &kv) in kernel.iter().enumerate() {
                let sy = clamp_index(y as isize + k as isize - half, height);
                let src = &temp[sy * width..(sy + 1) * width];
                for (out, &v) in out_row.iter_mut().zip(src) {
                    *out += kv * v;
                }
            }
        });

    result
}

/// Gaussian smoothing: [`gaussian_kernel`] applied with [`separable_convolve`].
pub fn gaussian_smooth(
    data: &[f64],
    width: usize,
    height: usize,
    kernel_size: usize,
    sigma: f64,
) -> Vec<f64> {
    let kernel = gaussian_kernel(kernel_size, sigma);
    separable_convolve(data, width, height, &kernel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for size in [1usize, 3, 5, 7, 9, 15] {
            for sigma in [0.3, 0.5, 1.0, 2.5] {
                let k = gaussian_kernel(size, sigma);
                assert_eq!(k.len(), size);

                let sum: f64 = k.iter().sum();
                assert!((sum - 1.0).abs() < 1e-12, "size {size} sigma {sigma}: {sum}");

                for i in 0..size / 2 {
                    assert!((k[i] - k[size - 1 - i]).abs() < 1e-15);
                }
                assert!(k.iter().all(|&v| v <= k[size / 2]));
            }
        }
    }

    #[test]
    fn kernel_size3_sigma_half_values() {
        let k = gaussian_kernel(3, 0.5);
        let edge = (-2.0f64).exp();
        let total = 1.0 + 2.0 * edge;
        assert!((k[0] - edge / total).abs() < 1e-12);
        assert!((k[1] - 1.0 / total).abs() < 1e-12);
    }

    #[test]
    #[should_panic(expected = "kernel size must be odd")]
    fn kernel_rejects_even_size() {
        gaussian_kernel(4, 1.0);
    }

    #[test]
    #[should_panic(expected = "sigma must be > 0")]
    fn kernel_rejects_zero_sigma() {
        gaussian_kernel(3, 0.0);
    }

    #[test]
    #[should_panic(expected = "data length must equal width * height")]
    fn convolve_rejects_length_mismatch() {
        separable_convolve(&[1.0, 2.0, 3.0], 2, 2, &[1.0]);
    }

    #[test]
    fn constant_field_is_preserved() {
        let data = vec![7.25; 6 * 4];
        let out = gaussian_smooth(&data, 6, 4, 5, 1.0);
        assert!(out.iter().all(|&v| (v - 7.25).abs() < 1e-12));
    }

    #[test]
    fn identity_kernel_is_noop() {
        let data: Vec<f64> = (0..12).map(|v| v as f64).collect();
        let out = separable_convolve(&data, 4, 3, &[1.0]);
        assert_eq!(out, data);
    }

    #[test]
    fn impulse_spreads_as_outer_product() {
        let mut data = vec![0.0; 25];
        data[12] = 1.0;
        let kernel = [0.25, 0.5, 0.25];
        let out = separable_convolve(&data, 5, 5, &kernel);

        assert!((out[12] - 0.25).abs() < 1e-12);
        assert!((out[11] - 0.125).abs() < 1e-12);
        assert!((out[7] - 0.125).abs() < 1e-12);
        assert!((out[6] - 0.0625).abs() < 1e-12);
        assert_eq!(out[0], 0.0);

        let sum: f64 = out.iter().sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn edges_are_clamped_not_zero_padded() {
        // A bright left column must stay bright: clamped taps read itself.
        let data = vec![
            10.0, 0.0, 0.0, //
            10.0, 0.0, 0.0, //
            10.0, 0.0, 0.0,
        ];
        let kernel = [0.25, 0.5, 0.25];
        let out = separable_convolve(&data, 3, 3, &kernel);
        assert!((out[0] - 7.5).abs() < 1e-12);
        assert!((out[1] - 2.5).abs() < 1e-12);
        assert!((out[2] - 0.0).abs() < 1e-12);
    }

    #[test]
    fn empty_grid_returns_empty() {
        assert!(separable_convolve(&[], 0, 0, &[1.0]).is_empty());
    }
}
