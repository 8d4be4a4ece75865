//! Pluggable grid transforms applied around the preprocessing stage.
//!
//! An [`InitialTransform`] reorders raw arrays before any filtering, and is
//! applied identically to values, latitudes and longitudes. A
//! [`PostSmoothTransform`] runs on the smoothed values and can mask extra
//! regions with the sentinel. Plain closures implement both traits.

/// Reorders a row-major array of the given width in place.
pub trait InitialTransform: Send + Sync {
    fn apply(&self, values: &mut [f64], width: usize);
}

/// What a post-smooth transform knows about the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskContext {
    pub width: usize,
    pub height: usize,
    pub sentinel: f64,
    pub floor: f64,
    pub step: f64,
}

/// Edits smoothed values in place, typically by writing the sentinel.
pub trait PostSmoothTransform: Send + Sync {
    fn apply(&self, values: &mut [f64], ctx: &MaskContext);
}

/// Leaves the data unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl InitialTransform for Identity {
    fn apply(&self, _values: &mut [f64], _width: usize) {}
}

impl PostSmoothTransform for Identity {
    fn apply(&self, _values: &mut [f64], _ctx: &MaskContext) {}
}

/// Swaps the left and right halves of every row.
///
/// Re-centres a 0..360 longitude grid onto -180..180. On odd widths the
/// middle column stays in place. Applying it twice restores the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct SwapHalves;

impl InitialTransform for SwapHalves {
    fn apply(&self, values: &mut [f64], width: usize) {
        swap_halves(values, width);
    }
}

/// Swap the first `width / 2` and last `width / 2` entries of each row.
pub fn swap_halves(values: &mut [f64], width: usize) {
    let half = width / 2;
    if half == 0 {
        return;
    }
    for row in values.chunks_exact_mut(width) {
        let (left, rest) = row.split_at_mut(half);
        let right_start = rest.len() - half;
        left.swap_with_slice(&mut rest[right_start..]);
    }
}

/// Forces whole rows at the top and bottom to the sentinel.
///
/// Used on global grids to drop polar rows after smoothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskRows {
    pub top: usize,
    pub bottom: usize,
}

impl PostSmoothTransform for MaskRows {
    fn apply(&self, values: &mut [f64], ctx: &MaskContext) {
        for (y, row) in values.chunks_exact_mut(ctx.width).enumerate() {
            if y < self.top || y + self.bottom >= ctx.height {
                row.fill(ctx.sentinel);
            }
        }
    }
}

impl<F> InitialTransform for F
where
    F: Fn(&mut [f64], usize) + Send + Sync,
{
    fn apply(&self, values: &mut [f64], width: usize) {
        self(values, width)
    }
}

impl<F> PostSmoothTransform for F
where
    F: Fn(&mut [f64], &MaskContext) + Send + Sync,
{
    fn apply(&self, values: &mut [f64], ctx: &MaskContext) {
        self(values, ctx)
    }
}

/// Map a longitude above 180 into [-180, 180).
pub fn wrap_longitude(lon: f64) -> f64 {
    if lon > 180.0 {
        lon - 360.0
    } else {
        lon
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_even_width() {
        let mut values: Vec<f64> = (1..=20).map(f64::from).collect();
        SwapHalves.apply(&mut values, 10);
        let expected: Vec<f64> = [
            6, 7, 8, 9, 10, 1, 2, 3, 4, 5, 16, 17, 18, 19, 20, 11, 12, 13, 14, 15,
        ]
        .iter()
        .map(|&v| v as f64)
        .collect();
        assert_eq!(values, expected);
    }

    #[test]
    fn test_swap_odd_width_keeps_middle() {
        let mut values: Vec<f64> = (1..=10).map(f64::from).collect();
        SwapHalves.apply(&mut values, 5);
        assert_eq!(
            values,
            vec![4.0, 5.0, 3.0, 1.0, 2.0, 9.0, 10.0, 8.0, 6.0, 7.0]
        );
    }

    #[test]
    fn test_swap_twice_is_identity() {
        for width in [1usize, 2, 5, 10, 11] {
            let original: Vec<f64> = (0..width * 3).map(|i| i as f64 * 0.5 - 3.0).collect();
            let mut values = original.clone();
            swap_halves(&mut values, width);
            swap_halves(&mut values, width);
            assert_eq!(values, original, "width {width}");
        }
    }

    #[test]
    fn test_mask_rows() {
        let ctx = MaskContext {
            width: 3,
            height: 4,
            sentinel: -20.0,
            floor: 5.0,
            step: 2.5,
        };
        let mut values = vec![10.0; 12];
        MaskRows { top: 1, bottom: 2 }.apply(&mut values, &ctx);
        assert_eq!(&values[0..3], &[-20.0; 3]);
        assert_eq!(&values[3..6], &[10.0; 3]);
        assert_eq!(&values[6..12], &[-20.0; 6]);
    }

    #[test]
    fn test_closures_are_transforms() {
        let double = |values: &mut [f64], _width: usize| {
            values.iter_mut().for_each(|v| *v *= 2.0);
        };
        let mut values = vec![1.0, 2.0];
        InitialTransform::apply(&double, &mut values, 2);
        assert_eq!(values, vec![2.0, 4.0]);

        let clear = |values: &mut [f64], ctx: &MaskContext| values.fill(ctx.sentinel);
        let ctx = MaskContext {
            width: 2,
            height: 1,
            sentinel: -1.0,
            floor: 0.0,
            step: 1.0,
        };
        PostSmoothTransform::apply(&clear, &mut values, &ctx);
        assert_eq!(values, vec![-1.0, -1.0]);
    }

    #[test]
    fn test_wrap_longitude() {
        assert_eq!(wrap_longitude(359.75), -0.25);
        assert_eq!(wrap_longitude(180.0), 180.0);
        assert_eq!(wrap_longitude(-75.0), -75.0);
        assert_eq!(wrap_longitude(190.0), -170.0);
    }
}
