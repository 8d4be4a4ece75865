//! Helpers shared by the isoband crates' tests and benches.
//!
//! Decoded-grid fixtures are optional: tests that need one go through
//! [`require_test_file!`] and skip quietly when it is missing. Everything
//! else here is synthetic: value generators in [`generators`] and grid
//! layouts in [`fixtures::grid`].

pub mod fixtures;
pub mod generators;
pub mod paths;

pub use fixtures::*;
pub use generators::*;
pub use paths::*;

/// Resolve a decoded-grid fixture by name, or return from the calling test.
///
/// The lookup order is the one used by [`find_test_file`].
#[macro_export]
macro_rules! require_test_file {
    ($name:expr) => {{
        match $crate::find_test_file($name) {
            Some(path) => path,
            None => {
                eprintln!("skipping: fixture {} not found (set TEST_DATA_DIR)", $name);
                return;
            }
        }
    }};
}

/// Assert two lon/lat pairs agree within `tolerance` degrees on each axis.
#[macro_export]
macro_rules! assert_coords_approx_eq {
    (($x1:expr, $y1:expr), ($x2:expr, $y2:expr), $tolerance:expr) => {{
        let (actual, expected): ((f64, f64), (f64, f64)) = (($x1, $y1), ($x2, $y2));
        let tolerance: f64 = $tolerance;
        let dx = (actual.0 - expected.0).abs();
        let dy = (actual.1 - expected.1).abs();
        if dx > tolerance || dy > tolerance {
            panic!(
                "coordinates differ: actual {:?}, expected {:?} (off by {:?}, tolerance {})",
                actual,
                expected,
                (dx, dy),
                tolerance
            );
        }
    }};
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_coords_within_tolerance() {
        assert_coords_approx_eq!((-97.50001, 35.0), (-97.5, 35.00002), 1e-4);
        assert_coords_approx_eq!((0.0, 0.0), (0.0, 0.0), 0.0);
    }

    #[test]
    #[should_panic(expected = "coordinates differ")]
    fn test_coords_outside_tolerance() {
        assert_coords_approx_eq!((-97.5, 35.0), (-97.5, 35.1), 1e-3);
    }
}
