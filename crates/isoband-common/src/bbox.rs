//! Bounding boxes and the fixed geographic quadrants used for clipping.

use serde::{Deserialize, Serialize};

/// An axis-aligned box in lon/lat degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the bounding box in coordinate units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the bounding box in coordinate units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Check if this bbox intersects another. Touching edges do not count.
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Check if `other` lies entirely inside this bbox.
    pub fn contains_bbox(&self, other: &BoundingBox) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }

    /// Check if a point is contained within this bbox.
    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }
}

/// One of the four fixed hemispheric quadrants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Quadrant {
    Nw,
    Ne,
    Sw,
    Se,
}

impl Quadrant {
    /// All quadrants in emission order.
    pub const ALL: [Quadrant; 4] = [Quadrant::Nw, Quadrant::Ne, Quadrant::Sw, Quadrant::Se];

    /// Longitude x latitude extent of the quadrant.
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Quadrant::Nw => BoundingBox::new(-180.0, 0.0, 0.0, 90.0),
            Quadrant::Ne => BoundingBox::new(0.0, 0.0, 180.0, 90.0),
            Quadrant::Sw => BoundingBox::new(-180.0, -90.0, 0.0, 0.0),
            Quadrant::Se => BoundingBox::new(0.0, -90.0, 180.0, 0.0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Quadrant::Nw => "NW",
            Quadrant::Ne => "NE",
            Quadrant::Sw => "SW",
            Quadrant::Se => "SE",
        }
    }
}

impl std::fmt::Display for Quadrant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
