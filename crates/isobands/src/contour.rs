//! Contour extraction using the marching squares algorithm.
//!
//! Coordinates are fractional grid indices: `x` is the column and `y` the
//! row, with row 0 first. Every segment is directed so the region at or
//! above the threshold lies to its right when the grid is drawn with row 0
//! at the top. Rings around high ground therefore have positive signed
//! area in raw index coordinates, and rings around low ground negative.

use std::collections::{HashMap, HashSet};

use isoband_common::{Point, Ring};

/// A cell edge. `H(x, y)` joins samples `(x, y)` and `(x + 1, y)`;
/// `V(x, y)` joins `(x, y)` and `(x, y + 1)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EdgeId {
    H(usize, usize),
    V(usize, usize),
}

/// A directed contour segment between two cell edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
    pub start_edge: EdgeId,
    pub end_edge: EdgeId,
}

/// A linked polyline at one threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct Contour {
    pub level: f64,
    pub points: Vec<Point>,
    /// False when the chain ran off the grid boundary.
    pub closed: bool,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

/// Marching squares over a row-major grid.
///
/// A corner is above the threshold when `value >= level`; NaN counts as
/// below. Saddle cells are resolved by the average of the four corners.
pub fn march_squares(data: &[f64], width: usize, height: usize, level: f64) -> Vec<Segment> {
    if width < 2 || height < 2 || data.len() != width * height {
        return vec![];
    }

    let mut segments = Vec::new();

    for y in 0..(height - 1) {
        for x in 0..(width - 1) {
            let tl = data[y * width + x];
            let tr = data[y * width + x + 1];
            let bl = data[(y + 1) * width + x];
            let br = data[(y + 1) * width + x + 1];

            let mut cell_index = 0u8;
            if tl >= level { cell_index |= 1; }
            if tr >= level { cell_index |= 2; }
            if br >= level { cell_index |= 4; }
            if bl >= level { cell_index |= 8; }

            if cell_index == 0 || cell_index == 15 {
                continue;
            }

            let centre_high = (tl + tr + br + bl) / 4.0 >= level;
            for (from, to) in cell_sides(cell_index, centre_high).into_iter().flatten() {
                let start_edge = side_edge(from, x, y);
                let end_edge = side_edge(to, x, y);
                segments.push(Segment {
                    start: edge_point(data, width, start_edge, level),
                    end: edge_point(data, width, end_edge, level),
                    start_edge,
                    end_edge,
                });
            }
        }
    }

    segments
}

/// Directed crossings for a cell case. High corners stay on the right.
fn cell_sides(cell_index: u8, centre_high: bool) -> [Option<(Side, Side)>; 2] {
    use Side::*;
    match cell_index {
        1 => [Some((Top, Left)), None],
        2 => [Some((Right, Top)), None],
        3 => [Some((Right, Left)), None],
        4 => [Some((Bottom, Right)), None],
        5 if centre_high => [Some((Top, Right)), Some((Bottom, Left))],
        5 => [Some((Top, Left)), Some((Bottom, Right))],
        6 => [Some((Bottom, Top)), None],
        7 => [Some((Bottom, Left)), None],
        8 => [Some((Left, Bottom)), None],
        9 => [Some((Top, Bottom)), None],
        10 if centre_high => [Some((Left, Top)), Some((Right, Bottom))],
        10 => [Some((Right, Top)), Some((Left, Bottom))],
        11 => [Some((Right, Bottom)), None],
        12 => [Some((Left, Right)), None],
        13 => [Some((Top, Right)), None],
        14 => [Some((Left, Top)), None],
        _ => [None, None],
    }
}

fn side_edge(side: Side, x: usize, y: usize) -> EdgeId {
    match side {
        Side::Top => EdgeId::H(x, y),
        Side::Bottom => EdgeId::H(x, y + 1),
        Side::Left => EdgeId::V(x, y),
        Side::Right => EdgeId::V(x + 1, y),
    }
}

/// Crossing point on an edge. Both cells sharing the edge compute it from
/// the same corner order, so the result is bit-identical.
fn edge_point(data: &[f64], width: usize, edge: EdgeId, level: f64) -> Point {
    match edge {
        EdgeId::H(x, y) => {
            let (a, b) = (data[y * width + x], data[y * width + x + 1]);
            interpolate_edge(x as f64, y as f64, x as f64 + 1.0, y as f64, a, b, level)
        }
        EdgeId::V(x, y) => {
            let (a, b) = (data[y * width + x], data[(y + 1) * width + x]);
            interpolate_edge(x as f64, y as f64, x as f64, y as f64 + 1.0, a, b, level)
        }
    }
}

/// Linearly interpolate between two edge points based on data values
fn interpolate_edge(
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
    val1: f64,
    val2: f64,
    level: f64,
) -> Point {
    if !val1.is_finite() || !val2.is_finite() || (val2 - val1).abs() < 1e-12 {
        return Point::new((x1 + x2) / 2.0, (y1 + y2) / 2.0);
    }

    let t = ((level - val1) / (val2 - val1)).clamp(0.0, 1.0);

    Point::new(x1 + t * (x2 - x1), y1 + t * (y2 - y1))
}

/// Link directed segments into polylines by shared edge identity.
///
/// Chains that start on the grid boundary are traced first and come back
/// open; everything left over is a closed loop.
pub fn connect_segments(segments: &[Segment], level: f64) -> Vec<Contour> {
    if segments.is_empty() {
        return vec![];
    }

    let by_start: HashMap<EdgeId, usize> = segments
        .iter()
        .enumerate()
        .map(|(i, s)| (s.start_edge, i))
        .collect();
    let ends: HashSet<EdgeId> = segments.iter().map(|s| s.end_edge).collect();

    let mut used = vec![false; segments.len()];
    let mut contours = Vec::new();

    let heads: Vec<usize> = (0..segments.len())
        .filter(|&i| !ends.contains(&segments[i].start_edge))
        .collect();
    for head in heads.into_iter().chain(0..segments.len()) {
        if used[head] {
            continue;
        }

        let mut points = vec![segments[head].start];
        let mut current = head;
        let closed = loop {
            used[current] = true;
            let seg = &segments[current];
            points.push(seg.end);
            match by_start.get(&seg.end_edge) {
                Some(&next) if !used[next] => current = next,
                Some(&next) => break next == head,
                None => break false,
            }
        };

        contours.push(Contour {
            level,
            points,
            closed,
        });
    }

    contours
}

/// Extract closed rings at `threshold` in grid-index coordinates.
///
/// Open chains are closed by repeating their first point. Rings with fewer
/// than 4 points are dropped.
pub fn extract_rings(data: &[f64], width: usize, height: usize, threshold: f64) -> Vec<Ring> {
    let segments = march_squares(data, width, height, threshold);
    connect_segments(&segments, threshold)
        .into_iter()
        .filter_map(|contour| {
            let mut ring = Ring::new(contour.points);
            ring.close();
            (ring.len() >= 4).then_some(ring)
        })
        .collect()
}
