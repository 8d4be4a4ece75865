//! Signal conditioning ahead of contour extraction.
//!
//! Invalid and below-floor cells become a sentinel that sorts below every
//! level, the field is denoised with an open-close pass and lightly
//! smoothed, and the configured edge margins are forced to the sentinel so
//! every contour closes inside the grid.

use grid_filters::{gaussian_smooth, Morphology};
use isoband_common::{Grid, GridError};
use tracing::debug;

use crate::config::IsobandConfig;
use crate::transform::{wrap_longitude, InitialTransform, MaskContext, PostSmoothTransform};

/// Neighbourhood size of the open-close denoising pass.
pub const DENOISE_KERNEL_SIZE: usize = 3;

/// Gaussian smoothing kernel size.
pub const SMOOTHING_KERNEL_SIZE: usize = 3;

/// Gaussian smoothing sigma.
pub const SMOOTHING_SIGMA: f64 = 0.5;

/// The no-data value for a floor and step.
pub fn sentinel(floor: f64, step: f64) -> f64 {
    floor - step * 10.0
}

/// A normalized grid ready for contouring.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedGrid {
    pub grid: Grid,
    pub sentinel: f64,
}

/// Run the preprocessing stages over a working copy of `grid`.
pub fn preprocess_grid(
    grid: &Grid,
    config: &IsobandConfig,
    initial: &dyn InitialTransform,
    post: &dyn PostSmoothTransform,
) -> Result<PreparedGrid, GridError> {
    let (width, height) = (grid.width(), grid.height());
    let parts = grid.clone().into_parts();
    let (mut values, mut latitudes, mut longitudes) =
        (parts.values, parts.latitudes, parts.longitudes);

    initial.apply(&mut values, width);
    initial.apply(&mut latitudes, width);
    initial.apply(&mut longitudes, width);
    if config.wrap_longitudes {
        longitudes.iter_mut().for_each(|lon| *lon = wrap_longitude(*lon));
    }

    let sentinel = sentinel(config.floor, config.step);
    let mut replaced = 0usize;
    for v in values.iter_mut() {
        if !v.is_finite() || *v < config.floor {
            *v = sentinel;
            replaced += 1;
        }
    }

    let morph = Morphology::new(width, height);
    let denoised = morph.open_close(&values, DENOISE_KERNEL_SIZE);
    let mut smoothed = gaussian_smooth(
        &denoised,
        width,
        height,
        SMOOTHING_KERNEL_SIZE,
        SMOOTHING_SIGMA,
    );

    for (y, row) in smoothed.chunks_exact_mut(width).enumerate() {
        for (x, v) in row.iter_mut().enumerate() {
            if config.margins.contains(x, y, width, height) {
                *v = sentinel;
            }
        }
    }

    let ctx = MaskContext {
        width,
        height,
        sentinel,
        floor: config.floor,
        step: config.step,
    };
    post.apply(&mut smoothed, &ctx);

    debug!(
        width,
        height,
        sentinel,
        replaced,
        "Preprocessed grid"
    );

    Ok(PreparedGrid {
        grid: Grid::new(width, height, smoothed, latitudes, longitudes)?,
        sentinel,
    })
}
