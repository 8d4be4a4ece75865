//! Test data generators for creating synthetic gridded fields.
//!
//! These generators create predictable, verifiable patterns in row-major
//! order (row 0 first, then row 1, etc.).

/// Creates a grid filled with a constant value.
pub fn create_constant_grid(width: usize, height: usize, value: f64) -> Vec<f64> {
    vec![value; width * height]
}

/// Creates a grid of `background` with an axis-aligned plateau.
///
/// Cells with `x0 <= col < x1` and `y0 <= row < y1` take `value`.
///
/// # Example
///
/// ```
/// use test_utils::create_plateau_grid;
///
/// let grid = create_plateau_grid(4, 4, 0.0, (1, 1, 3, 3), 20.0);
/// assert_eq!(grid[5], 20.0);  // col=1, row=1
/// assert_eq!(grid[0], 0.0);
/// ```
pub fn create_plateau_grid(
    width: usize,
    height: usize,
    background: f64,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    value: f64,
) -> Vec<f64> {
    let mut data = vec![background; width * height];
    for row in y0..y1.min(height) {
        for col in x0..x1.min(width) {
            data[row * width + col] = value;
        }
    }
    data
}

/// Creates a ring-shaped band of `value` around the grid centre.
///
/// Cells whose Chebyshev distance from the centre is in
/// `inner..=outer` take `value`, the rest `background`. The enclosed
/// square forms a hole in the band.
pub fn create_annulus_grid(
    width: usize,
    height: usize,
    background: f64,
    value: f64,
    inner: usize,
    outer: usize,
) -> Vec<f64> {
    let cx = (width / 2) as isize;
    let cy = (height / 2) as isize;
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let d = (col as isize - cx).abs().max((row as isize - cy).abs()) as usize;
            data.push(if d >= inner && d <= outer { value } else { background });
        }
    }
    data
}

/// Creates a reflectivity-like field in dBZ.
///
/// Two smooth storm cells peak near 55 dBZ over a clear-air background of
/// -30 dBZ, well below typical display floors.
pub fn create_reflectivity_grid(width: usize, height: usize) -> Vec<f64> {
    let cells = [
        (0.35, 0.40, 0.12, 55.0),
        (0.70, 0.60, 0.08, 42.0),
    ];

    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let fx = col as f64 / width.max(1) as f64;
            let fy = row as f64 / height.max(1) as f64;
            let mut dbz = -30.0f64;
            for &(cx, cy, radius, peak) in &cells {
                let d2 = (fx - cx).powi(2) + (fy - cy).powi(2);
                let v = peak * (-d2 / (2.0 * radius * radius)).exp();
                if v > 1.0 {
                    dbz = dbz.max(v);
                }
            }
            data.push(dbz);
        }
    }
    data
}

/// Creates a grid with isolated one-cell specks of `value` over `background`.
///
/// About one cell in 17 is set, chosen by a deterministic hash.
pub fn create_speckle_grid(
    width: usize,
    height: usize,
    background: f64,
    value: f64,
    seed: u32,
) -> Vec<f64> {
    let mut data = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            let hash = simple_hash(col as u32, row as u32, seed);
            data.push(if hash % 17 == 0 { value } else { background });
        }
    }
    data
}

/// Simple deterministic hash for reproducible test data.
fn simple_hash(x: u32, y: u32, seed: u32) -> u32 {
    let mut h = seed;
    h = h.wrapping_mul(31).wrapping_add(x);
    h = h.wrapping_mul(31).wrapping_add(y);
    h ^= h >> 16;
    h = h.wrapping_mul(0x85ebca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2ae35);
    h ^= h >> 16;
    h
}

/// Creates a grid with NaN values at specified `(col, row)` positions.
pub fn create_grid_with_nans(
    width: usize,
    height: usize,
    fill: f64,
    nan_positions: &[(usize, usize)],
) -> Vec<f64> {
    let mut data = vec![fill; width * height];
    for &(col, row) in nan_positions {
        if col < width && row < height {
            data[row * width + col] = f64::NAN;
        }
    }
    data
}
