//! Decoded scalar grids with per-cell geographic coordinates.

use serde::{Deserialize, Serialize};

use crate::GridError;

/// A dense 2-D scalar grid sampled on a lat/lon mesh.
///
/// `values`, `latitudes` and `longitudes` are row-major and index-aligned:
/// cell `(x, y)` lives at `y * width + x` in all three arrays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridParts", into = "GridParts")]
pub struct Grid {
    width: usize,
    height: usize,
    values: Vec<f64>,
    latitudes: Vec<f64>,
    longitudes: Vec<f64>,
}

/// Unvalidated grid arrays, as they arrive from a decoder or from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridParts {
    pub width: usize,
    pub height: usize,
    pub values: Vec<f64>,
    pub latitudes: Vec<f64>,
    pub longitudes: Vec<f64>,
}

impl Grid {
    /// Create a grid from full row-major meshes.
    pub fn new(
        width: usize,
        height: usize,
        values: Vec<f64>,
        latitudes: Vec<f64>,
        longitudes: Vec<f64>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        let expected = width * height;
        if values.len() != expected {
            return Err(GridError::length_mismatch("values", values.len(), width, height));
        }
        if latitudes.len() != expected {
            return Err(GridError::length_mismatch(
                "latitudes",
                latitudes.len(),
                width,
                height,
            ));
        }
        if longitudes.len() != expected {
            return Err(GridError::length_mismatch(
                "longitudes",
                longitudes.len(),
                width,
                height,
            ));
        }

        Ok(Self {
            width,
            height,
            values,
            latitudes,
            longitudes,
        })
    }

    /// Create a grid from one latitude per row and one longitude per column.
    ///
    /// The axes are expanded into full meshes so downstream code can treat
    /// regular and curvilinear grids the same way.
    pub fn from_axes(
        width: usize,
        height: usize,
        values: Vec<f64>,
        row_latitudes: &[f64],
        column_longitudes: &[f64],
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        if row_latitudes.len() != height {
            return Err(GridError::LengthMismatch {
                array: "row latitudes",
                expected: height,
                actual: row_latitudes.len(),
                width,
                height,
            });
        }
        if column_longitudes.len() != width {
            return Err(GridError::LengthMismatch {
                array: "column longitudes",
                expected: width,
                actual: column_longitudes.len(),
                width,
                height,
            });
        }

        let mut latitudes = Vec::with_capacity(width * height);
        let mut longitudes = Vec::with_capacity(width * height);
        for &lat in row_latitudes {
            latitudes.extend(std::iter::repeat(lat).take(width));
            longitudes.extend_from_slice(column_longitudes);
        }

        Self::new(width, height, values, latitudes, longitudes)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always false for a constructed grid; provided for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Flat index of cell `(x, y)`.
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Value at cell `(x, y)`, or `None` when out of range.
    pub fn value(&self, x: usize, y: usize) -> Option<f64> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.values[self.index(x, y)])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn latitudes(&self) -> &[f64] {
        &self.latitudes
    }

    pub fn longitudes(&self) -> &[f64] {
        &self.longitudes
    }

    /// Replace the value array, keeping the coordinate meshes.
    pub fn with_values(self, values: Vec<f64>) -> Result<Self, GridError> {
        Self::new(
            self.width,
            self.height,
            values,
            self.latitudes,
            self.longitudes,
        )
    }

    /// Decompose into the raw arrays.
    pub fn into_parts(self) -> GridParts {
        GridParts {
            width: self.width,
            height: self.height,
            values: self.values,
            latitudes: self.latitudes,
            longitudes: self.longitudes,
        }
    }
}

impl TryFrom<GridParts> for Grid {
    type Error = GridError;

    fn try_from(parts: GridParts) -> Result<Self, Self::Error> {
        Grid::new(
            parts.width,
            parts.height,
            parts.values,
            parts.latitudes,
            parts.longitudes,
        )
    }
}

impl From<Grid> for GridParts {
    fn from(grid: Grid) -> Self {
        grid.into_parts()
    }
}
