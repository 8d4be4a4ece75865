//! Grey-scale morphology on row-major grids.
//!
//! A k x k square neighbourhood with clamped borders is the product of a
//! clamped row window and a clamped column window, so min/max filters are
//! computed as two 1-D passes with exactly the same result as the full
//! 2-D scan.

use rayon::prelude::*;

use crate::border::clamp_index;

/// Morphological operators bound to one grid shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Morphology {
    width: usize,
    height: usize,
}

impl Morphology {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Each output cell is the minimum of its k x k neighbourhood.
    ///
    /// # Panics
    /// If `kernel_size` is even or `data` does not match the grid shape.
    pub fn erode(&self, data: &[f64], kernel_size: usize) -> Vec<f64> {
        self.rank_filter(data, kernel_size, f64::INFINITY, f64::min)
    }

    /// Each output cell is the maximum of its k x k neighbourhood.
    ///
    /// # Panics
    /// If `kernel_size` is even or `data` does not match the grid shape.
    pub fn dilate(&self, data: &[f64], kernel_size: usize) -> Vec<f64> {
        self.rank_filter(data, kernel_size, f64::NEG_INFINITY, f64::max)
    }

    /// Erosion then dilation. Removes high-valued specks smaller than the kernel.
    pub fn open(&self, data: &[f64], kernel_size: usize) -> Vec<f64> {
        let eroded = self.erode(data, kernel_size);
        self.dilate(&eroded, kernel_size)
    }

    /// Dilation then erosion. Fills low-valued gaps smaller than the kernel.
    pub fn close(&self, data: &[f64], kernel_size: usize) -> Vec<f64> {
        let dilated = self.dilate(data, kernel_size);
        self.erode(&dilated, kernel_size)
    }

    /// Opening followed by closing; the denoising composite for
    /// reflectivity-like fields.
    pub fn open_close(&self, data: &[f64], kernel_size: usize) -> Vec<f64> {
        let opened = self.open(data, kernel_size);
        self.close(&opened, kernel_size)
    }

    fn rank_filter(
        &self,
        data: &[f64],
        kernel_size: usize,
        init: f64,
        pick: fn(f64, f64) -> f64,
    ) -> Vec<f64> {
        assert!(
            kernel_size % 2 == 1,
            "kernel size must be odd, got {kernel_size}"
        );
        assert_eq!(
            data.len(),
            self.width * self.height,
            "data length must equal width * height"
        );
        if data.is_empty() {
            return Vec::new();
        }

        let (width, height) = (self.width, self.height);
        let half = (kernel_size / 2) as isize;

        let mut rows = vec![0.0f64; data.len()];
        rows.par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, out_row)| {
                let row = &data[y * width..(y + 1) * width];
                for (x, out) in out_row.iter_mut().enumerate() {
                    let mut acc = init;
                    for k in -half..=half {
                        acc = pick(acc, row[clamp_index(x as isize + k, width)]);
                    }
                    *out = acc;
                }
            });

        let mut result = vec![init; data.len()];
        result
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, out_row)| {
                for k in -half..=half {
                    let sy = clamp_index(y as isize + k, height);
                    let src = &rows[sy * width..(sy + 1) * width];
                    for (out, &v) in out_row.iter_mut().zip(src) {
                        *out = pick(*out, v);
                    }
                }
            });

        result
    }
}
