//! Ring classification and hole nesting for one level.
//!
//! Rings from a single threshold never cross each other; they only nest.
//! Fills are visited largest first and each takes every still-unassigned
//! hole it contains, largest hole first. An assigned hole leaves the pool
//! and its interior is excluded from later containment tests on the same
//! polygon, so a hole inside an island inside a hole is left for the
//! island.

use isoband_common::{Orientation, Polygon, Ring};

/// Split mapped rings into fills and holes.
///
/// Clockwise rings are fills, counter-clockwise rings are holes. Both are
/// reversed before they are returned, so fills come out counter-clockwise
/// and holes clockwise. Zero-area rings are dropped.
pub fn classify_rings(rings: Vec<Ring>) -> (Vec<Ring>, Vec<Ring>) {
    let mut fills = Vec::new();
    let mut holes = Vec::new();

    for mut ring in rings {
        match ring.orientation() {
            Orientation::Clockwise => {
                ring.reverse();
                fills.push(ring);
            }
            Orientation::CounterClockwise => {
                ring.reverse();
                holes.push(ring);
            }
            Orientation::Degenerate => {}
        }
    }

    (fills, holes)
}

/// Nest holes into their containing fills.
///
/// A hole belongs to a fill when the polygon built so far contains the
/// hole's first point or its midpoint. Holes no fill claims are dropped.
pub fn build_polygon_hierarchy(mut fills: Vec<Ring>, mut holes: Vec<Ring>) -> Vec<Polygon> {
    fills.sort_by(|a, b| b.area().total_cmp(&a.area()));
    holes.sort_by(|a, b| b.area().total_cmp(&a.area()));

    let mut polygons = Vec::with_capacity(fills.len());
    for fill in fills {
        let mut polygon = Polygon::new(fill, Vec::new());
        let mut i = 0;
        while i < holes.len() {
            if hole_inside(&polygon, &holes[i]) {
                polygon.holes.push(holes.remove(i));
            } else {
                i += 1;
            }
        }
        polygons.push(polygon);
    }

    polygons
}

fn hole_inside(polygon: &Polygon, hole: &Ring) -> bool {
    let first = hole.first().is_some_and(|p| polygon.contains(p));
    first || hole.midpoint().is_some_and(|p| polygon.contains(p))
}
