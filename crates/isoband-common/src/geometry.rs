//! Planar geometry primitives in lon/lat (x/y) space.

use crate::BoundingBox;

/// A point in 2D space. `x` is longitude and `y` latitude once mapped,
/// or fractional column/row while still in grid-index space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// `[x, y]`, i.e. `[longitude, latitude]` for mapped points.
    pub fn to_array(self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl From<[f64; 2]> for Point {
    fn from(coords: [f64; 2]) -> Self {
        Self::new(coords[0], coords[1])
    }
}

/// Winding direction of a ring, from the sign of its shoelace area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Negative signed area (y axis pointing up).
    Clockwise,
    /// Positive signed area.
    CounterClockwise,
    /// Zero area.
    Degenerate,
}

/// An ordered sequence of points. Closed rings repeat the first point last.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Ring(Vec<Point>);

impl Ring {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Point> {
        self.0.first().copied()
    }

    /// The vertex halfway along the point list.
    pub fn midpoint(&self) -> Option<Point> {
        self.0.get(self.0.len() / 2).copied()
    }

    /// True when the last point equals the first.
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Append the first point if the ring is not already closed.
    pub fn close(&mut self) {
        if let Some(first) = self.0.first().copied() {
            if !self.is_closed() {
                self.0.push(first);
            }
        }
    }

    pub fn reverse(&mut self) {
        self.0.reverse();
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f64 {
        let n = self.0.len();
        if n < 3 {
            return 0.0;
        }

        let mut sum = 0.0;
        for i in 0..n {
            let p1 = self.0[i];
            let p2 = self.0[(i + 1) % n];
            sum += p1.x * p2.y - p2.x * p1.y;
        }
        sum / 2.0
    }

    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    pub fn orientation(&self) -> Orientation {
        let area = self.signed_area();
        if area < 0.0 {
            Orientation::Clockwise
        } else if area > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Degenerate
        }
    }

    /// Point-in-ring test. Points on the boundary are considered inside.
    pub fn contains(&self, point: Point) -> bool {
        let n = self.0.len();
        if n < 3 {
            return false;
        }

        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let a = self.0[i];
            let b = self.0[j];

            if on_segment(point, a, b) {
                return true;
            }

            if ((a.y > point.y) != (b.y > point.y))
                && (point.x < (b.x - a.x) * (point.y - a.y) / (b.y - a.y) + a.x)
            {
                inside = !inside;
            }
            j = i;
        }

        inside
    }

    /// Remove consecutive duplicate vertices.
    pub fn dedup_consecutive(&mut self) {
        self.0.dedup();
    }

    /// Bounding box of all vertices, `None` for an empty ring.
    pub fn bbox(&self) -> Option<BoundingBox> {
        let first = self.0.first()?;
        let mut bbox = BoundingBox::new(first.x, first.y, first.x, first.y);
        for p in &self.0[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    pub fn to_coordinates(&self) -> Vec<[f64; 2]> {
        self.0.iter().map(|p| p.to_array()).collect()
    }
}

impl From<Vec<Point>> for Ring {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}

fn on_segment(p: Point, a: Point, b: Point) -> bool {
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    if cross != 0.0 {
        return false;
    }
    p.x >= a.x.min(b.x) && p.x <= a.x.max(b.x) && p.y >= a.y.min(b.y) && p.y <= a.y.max(b.y)
}

/// An outer ring with zero or more holes.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Polygon {
    pub exterior: Ring,
    pub holes: Vec<Ring>,
}

impl Polygon {
    pub fn new(exterior: Ring, holes: Vec<Ring>) -> Self {
        Self { exterior, holes }
    }

    /// True if the point is inside the exterior and not inside any hole.
    /// Hole boundaries count as outside the polygon.
    pub fn contains(&self, point: Point) -> bool {
        if !self.exterior.contains(point) {
            return false;
        }
        !self.holes.iter().any(|hole| hole.contains(point))
    }

    /// Rings in GeoJSON order: exterior first, then holes.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    pub fn to_coordinates(&self) -> Vec<Vec<[f64; 2]>> {
        self.rings().map(Ring::to_coordinates).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Ring {
        Ring::new(vec![
            Point::new(min, min),
            Point::new(max, min),
            Point::new(max, max),
            Point::new(min, max),
            Point::new(min, min),
        ])
    }

    #[test]
    fn test_signed_area_orientation() {
        let ccw = square(0.0, 2.0);
        assert_eq!(ccw.signed_area(), 4.0);
        assert_eq!(ccw.orientation(), Orientation::CounterClockwise);

        let mut cw = ccw.clone();
        cw.reverse();
        assert_eq!(cw.signed_area(), -4.0);
        assert_eq!(cw.orientation(), Orientation::Clockwise);
        assert_eq!(cw.area(), 4.0);
    }

    #[test]
    fn test_contains_interior_boundary_exterior() {
        let ring = square(0.0, 2.0);
        assert!(ring.contains(Point::new(1.0, 1.0)));
        assert!(ring.contains(Point::new(0.0, 1.0)));
        assert!(ring.contains(Point::new(2.0, 2.0)));
        assert!(!ring.contains(Point::new(3.0, 1.0)));
        assert!(!ring.contains(Point::new(-0.1, -0.1)));
    }

    #[test]
    fn test_polygon_contains_respects_holes() {
        let poly = Polygon::new(square(0.0, 10.0), vec![square(4.0, 6.0)]);
        assert!(poly.contains(Point::new(1.0, 1.0)));
        assert!(!poly.contains(Point::new(5.0, 5.0)));
        assert!(!poly.contains(Point::new(4.0, 5.0)));
    }

    #[test]
    fn test_close_appends_first_point() {
        let mut ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
        ]);
        assert!(!ring.is_closed());
        ring.close();
        assert!(ring.is_closed());
        assert_eq!(ring.len(), 4);

        ring.close();
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_dedup_consecutive() {
        let mut ring = Ring::new(vec![
            Point::new(0.0, 0.0),
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 0.0),
        ]);
        ring.dedup_consecutive();
        assert_eq!(ring.len(), 4);
        assert!(ring.is_closed());
    }

    #[test]
    fn test_bbox() {
        let bbox = square(-3.0, 5.0).bbox().unwrap();
        assert_eq!(bbox, BoundingBox::new(-3.0, -3.0, 5.0, 5.0));
        assert!(Ring::default().bbox().is_none());
    }
}
