//! Clipping polygons to the four fixed geographic quadrants.
//!
//! Each ring is clipped independently against the quadrant box with
//! Sutherland-Hodgman. A box is convex, so the result is a single ring per
//! input ring; where a concave ring leaves and re-enters the box the pieces
//! are joined along the box edge, which can leave a zero-width strip there.
//!
//! A hole cut by the box comes back running along the box edge, where it
//! shares that stretch with the clipped exterior. Such holes are folded into
//! the exterior as a notch. A hole that touches the box in anything other
//! than one connected stretch stays a hole.

use isoband_common::{BoundingBox, Point, Polygon, Quadrant, Ring};

#[derive(Debug, Clone, Copy)]
enum Edge {
    Left(f64),
    Right(f64),
    Bottom(f64),
    Top(f64),
}

impl Edge {
    fn inside(&self, p: Point) -> bool {
        match *self {
            Edge::Left(x) => p.x >= x,
            Edge::Right(x) => p.x <= x,
            Edge::Bottom(y) => p.y >= y,
            Edge::Top(y) => p.y <= y,
        }
    }

    /// Where segment `a -> b` crosses this edge.
    fn intersect(&self, a: Point, b: Point) -> Point {
        match *self {
            Edge::Left(x) | Edge::Right(x) => {
                let t = (x - a.x) / (b.x - a.x);
                Point::new(x, a.y + t * (b.y - a.y))
            }
            Edge::Bottom(y) | Edge::Top(y) => {
                let t = (y - a.y) / (b.y - a.y);
                Point::new(a.x + t * (b.x - a.x), y)
            }
        }
    }
}

/// Clip one closed ring to `bbox`.
///
/// Returns `None` when nothing with positive area is left. The result is
/// closed, keeps the input winding and has no consecutive duplicates.
pub fn clip_ring(ring: &Ring, bbox: &BoundingBox) -> Option<Ring> {
    let mut points: Vec<Point> = ring.points().to_vec();
    if ring.is_closed() {
        points.pop();
    }

    let edges = [
        Edge::Left(bbox.min_x),
        Edge::Right(bbox.max_x),
        Edge::Bottom(bbox.min_y),
        Edge::Top(bbox.max_y),
    ];
    for edge in edges {
        if points.is_empty() {
            return None;
        }
        let input = std::mem::take(&mut points);
        let mut prev = input[input.len() - 1];
        for &current in &input {
            match (edge.inside(prev), edge.inside(current)) {
                (true, true) => points.push(current),
                (true, false) => points.push(edge.intersect(prev, current)),
                (false, true) => {
                    points.push(edge.intersect(prev, current));
                    points.push(current);
                }
                (false, false) => {}
            }
            prev = current;
        }
    }

    let mut clipped = Ring::new(points);
    clipped.dedup_consecutive();
    clipped.close();
    if clipped.len() < 4 || clipped.area() == 0.0 {
        return None;
    }
    Some(clipped)
}

/// Clip a polygon with holes to `bbox`.
///
/// Fully contained polygons come back unchanged; a polygon whose exterior
/// clips away is dropped along with its holes.
pub fn clip_polygon(polygon: &Polygon, bbox: &BoundingBox) -> Option<Polygon> {
    let extent = polygon.exterior.bbox()?;
    if !bbox.intersects(&extent) {
        return None;
    }
    if bbox.contains_bbox(&extent) {
        return Some(polygon.clone());
    }

    let mut exterior = clip_ring(&polygon.exterior, bbox)?;
    let mut holes = Vec::with_capacity(polygon.holes.len());
    for hole in polygon.holes.iter().filter_map(|hole| clip_ring(hole, bbox)) {
        match fold_edge_hole(&exterior, &hole, bbox) {
            Some(notched) => exterior = notched,
            None => holes.push(hole),
        }
    }
    Some(Polygon::new(exterior, holes))
}

fn on_boundary(p: Point, bbox: &BoundingBox) -> bool {
    p.x == bbox.min_x || p.x == bbox.max_x || p.y == bbox.min_y || p.y == bbox.max_y
}

/// Whether `p` lies on the axis-aligned segment `a -> b`.
fn on_edge_segment(p: Point, a: Point, b: Point) -> bool {
    if a.x == b.x && p.x == a.x {
        p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
    } else if a.y == b.y && p.y == a.y {
        p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x)
    } else {
        false
    }
}

/// Position of `p` in `points`, splitting the edge it lies on if needed.
fn locate_or_insert(points: &mut Vec<Point>, p: Point) -> Option<usize> {
    if let Some(i) = points.iter().position(|&q| q == p) {
        return Some(i);
    }
    let n = points.len();
    let i = (0..n).find(|&i| on_edge_segment(p, points[i], points[(i + 1) % n]))?;
    points.insert(i + 1, p);
    Some(i + 1)
}

/// Merge a clipped hole that runs along the box edge into the exterior.
///
/// Returns the notched exterior, or `None` when the hole does not share a
/// single stretch of box edge with the exterior.
fn fold_edge_hole(exterior: &Ring, hole: &Ring, bbox: &BoundingBox) -> Option<Ring> {
    if exterior.signed_area() * hole.signed_area() >= 0.0 {
        return None;
    }

    let mut h: Vec<Point> = hole.points().to_vec();
    h.pop();
    let n = h.len();
    let on: Vec<bool> = h.iter().map(|&p| on_boundary(p, bbox)).collect();
    let starts: Vec<usize> = (0..n).filter(|&i| on[i] && !on[(i + n - 1) % n]).collect();
    let &[start] = starts.as_slice() else {
        return None;
    };
    let mut end = start;
    while on[(end + 1) % n] {
        let next = (end + 1) % n;
        if !shares_side(h[end], h[next], bbox) {
            return None;
        }
        end = next;
    }
    if end == start {
        return None;
    }

    // Off-edge part of the hole, from the end of its edge stretch back round to the start.
    let mut path = Vec::with_capacity(n);
    let mut i = end;
    loop {
        path.push(h[i]);
        if i == start {
            break;
        }
        i = (i + 1) % n;
    }

    let mut e: Vec<Point> = exterior.points().to_vec();
    e.pop();
    locate_or_insert(&mut e, h[end])?;
    locate_or_insert(&mut e, h[start])?;
    let from = e.iter().position(|&q| q == h[end])?;
    e.rotate_left(from);
    let to = e.iter().position(|&q| q == h[start])?;
    // The exterior must follow the box edge between the two meeting points.
    if e[..=to]
        .windows(2)
        .any(|pair| !shares_side(pair[0], pair[1], bbox))
    {
        return None;
    }

    path.extend_from_slice(&e[to + 1..]);
    let mut notched = Ring::new(path);
    notched.dedup_consecutive();
    notched.close();

    let expected = exterior.signed_area() + hole.signed_area();
    let tolerance = 1e-9 * exterior.area().max(1.0);
    if notched.len() < 4 || (notched.signed_area() - expected).abs() > tolerance {
        return None;
    }
    Some(notched)
}

/// Whether segment `a -> b` runs along one side of the box.
fn shares_side(a: Point, b: Point, bbox: &BoundingBox) -> bool {
    (a.x == b.x && (a.x == bbox.min_x || a.x == bbox.max_x))
        || (a.y == b.y && (a.y == bbox.min_y || a.y == bbox.max_y))
}

/// Split a polygon into its pieces in each quadrant, in NW, NE, SW, SE order.
pub fn split_into_quadrants(polygon: &Polygon) -> Vec<(Quadrant, Polygon)> {
    Quadrant::ALL
        .iter()
        .filter_map(|&q| clip_polygon(polygon, &q.bounds()).map(|p| (q, p)))
        .collect()
}
