//! Common types shared across the isoband crates.
//!
//! - [`Grid`]: a validated, index-aligned scalar grid with lat/lon meshes
//! - [`Point`], [`Ring`], [`Polygon`]: planar geometry in lon/lat space
//! - [`BoundingBox`] and [`Quadrant`]: axis-aligned clip regions
//! - [`FeatureCollection`]: the GeoJSON-shaped output schema

pub mod bbox;
pub mod error;
pub mod feature;
pub mod geometry;
pub mod grid;

pub use bbox::{BoundingBox, Quadrant};
pub use error::{ConfigError, GridError};
pub use feature::{
    Feature, FeatureCollection, FeatureProperties, Geometry, Properties, PropertyValue,
};
pub use geometry::{Orientation, Point, Polygon, Ring};
pub use grid::Grid;
