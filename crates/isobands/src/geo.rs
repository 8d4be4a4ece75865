//! Grid-index to geographic coordinate mapping.

use isoband_common::{Grid, Point, Ring};

/// Bilinear mapper from fractional `(column, row)` to `(lon, lat)`.
///
/// Mapped rings are canonicalized so that rings enclosing higher values
/// come out clockwise in lon/lat regardless of the grid's row order. On
/// the usual north-up layout the mapping itself flips winding; on a
/// south-up layout the mapper reverses each ring to get the same result.
#[derive(Debug, Clone, Copy)]
pub struct GeoMapper<'a> {
    grid: &'a Grid,
    reverse_rings: bool,
}

impl<'a> GeoMapper<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        let mut mapper = Self {
            grid,
            reverse_rings: false,
        };
        mapper.reverse_rings = mapper.jacobian_sign() > 0.0;
        mapper
    }

    /// True when index space and lon/lat space share handedness, so mapped
    /// rings are reversed.
    pub fn reverses_rings(&self) -> bool {
        self.reverse_rings
    }

    /// Map a fractional grid coordinate to `(lon, lat)`.
    ///
    /// `x1 = floor(x)` is clamped to `width - 2` and `x2 = x1 + 1`, so the
    /// last column interpolates within the final cell. Rows likewise.
    pub fn index_to_spatial(&self, x: f64, y: f64) -> Point {
        let (x1, x2, fx) = bracket(x, self.grid.width());
        let (y1, y2, fy) = bracket(y, self.grid.height());

        let lons = self.grid.longitudes();
        let lats = self.grid.latitudes();
        let at = |arr: &[f64], cx: usize, cy: usize| arr[self.grid.index(cx, cy)];
        let blend = |arr: &[f64]| {
            let top = at(arr, x1, y1) * (1.0 - fx) + at(arr, x2, y1) * fx;
            let bottom = at(arr, x1, y2) * (1.0 - fx) + at(arr, x2, y2) * fx;
            top * (1.0 - fy) + bottom * fy
        };

        Point::new(blend(lons), blend(lats))
    }

    /// Map every point of an index-space ring, applying canonical winding.
    pub fn map_ring(&self, ring: &Ring) -> Ring {
        let mut mapped: Ring = ring
            .points()
            .iter()
            .map(|p| self.index_to_spatial(p.x, p.y))
            .collect::<Vec<_>>()
            .into();
        if self.reverse_rings {
            mapped.reverse();
        }
        mapped
    }

    /// Sign of the mapping's Jacobian at the grid centre.
    fn jacobian_sign(&self) -> f64 {
        let (w, h) = (self.grid.width(), self.grid.height());
        if w < 2 || h < 2 {
            return 0.0;
        }
        let cx = ((w - 1) / 2) as f64;
        let cy = ((h - 1) / 2) as f64;
        let origin = self.index_to_spatial(cx, cy);
        let right = self.index_to_spatial(cx + 1.0, cy);
        let down = self.index_to_spatial(cx, cy + 1.0);
        let (ax, ay) = (right.x - origin.x, right.y - origin.y);
        let (bx, by) = (down.x - origin.x, down.y - origin.y);
        ax * by - ay * bx
    }
}

/// Lower index, upper index and weight for one axis.
fn bracket(v: f64, len: usize) -> (usize, usize, f64) {
    let lo = (v.floor().max(0.0) as usize).min(len.saturating_sub(2));
    let hi = (lo + 1).min(len.saturating_sub(1));
    (lo, hi, v - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{assert_coords_approx_eq, grid::SIMPLE_10X10};

    fn north_up() -> Grid {
        // lons -10..10, lats 10..-10, 20/9 degrees apart
        SIMPLE_10X10.build(vec![0.0; 100]).unwrap()
    }

    #[test]
    fn test_integer_points_hit_samples() {
        let grid = north_up();
        let mapper = GeoMapper::new(&grid);
        for (x, y) in [(0usize, 0usize), (3, 7), (8, 8)] {
            let p = mapper.index_to_spatial(x as f64, y as f64);
            let idx = grid.index(x, y);
            assert_coords_approx_eq!(
                (p.x, p.y),
                (grid.longitudes()[idx], grid.latitudes()[idx]),
                1e-9
            );
        }
    }

    #[test]
    fn test_far_edge_uses_last_cell() {
        let grid = north_up();
        let mapper = GeoMapper::new(&grid);
        let p = mapper.index_to_spatial(9.0, 9.0);
        assert_coords_approx_eq!((p.x, p.y), (10.0, -10.0), 1e-9);
        let p = mapper.index_to_spatial(9.0, 4.5);
        assert_coords_approx_eq!((p.x, p.y), (10.0, 0.0), 1e-9);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let grid = north_up();
        let mapper = GeoMapper::new(&grid);
        let p = mapper.index_to_spatial(4.5, 4.5);
        assert_coords_approx_eq!((p.x, p.y), (0.0, 0.0), 1e-9);
    }

    #[test]
    fn test_high_rings_clockwise_for_both_row_orders() {
        // Positive area in index space is what the extractor produces
        // around high values.
        let ring = Ring::new(vec![
            Point::new(2.0, 2.0),
            Point::new(4.0, 2.0),
            Point::new(4.0, 4.0),
            Point::new(2.0, 4.0),
            Point::new(2.0, 2.0),
        ]);
        assert!(ring.signed_area() > 0.0);

        let north = north_up();
        let mapper = GeoMapper::new(&north);
        assert!(!mapper.reverses_rings());
        assert!(mapper.map_ring(&ring).signed_area() < 0.0);

        let south = SIMPLE_10X10.build_south_up(vec![0.0; 100]).unwrap();
        let mapper = GeoMapper::new(&south);
        assert!(mapper.reverses_rings());
        assert!(mapper.map_ring(&ring).signed_area() < 0.0);
    }
}
