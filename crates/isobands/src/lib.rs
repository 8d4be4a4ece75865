//! Raster-to-vector isoband generation.
//!
//! A decoded scalar grid goes through these stages:
//!
//! 1. [`preprocess`]: transforms, sentinel substitution, open-close
//!    denoising, Gaussian smoothing and edge margins
//! 2. [`levels`] and [`contour`]: marching squares at each discrete level
//! 3. [`geo`]: bilinear mapping from grid index to lon/lat
//! 4. [`assemble`]: fill/hole classification and hole nesting
//! 5. [`clip`]: splitting into the four fixed quadrants
//! 6. [`simplify`]: the external isoband collaborator
//!
//! [`IsobandPipeline`] runs them end to end.
//!
//! # Example
//!
//! ```no_run
//! use isoband_common::{Grid, Properties};
//! use isobands::{IsobandConfig, IsobandPipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grid = Grid::from_axes(3, 3, vec![0.0; 9], &[1.0, 0.0, -1.0], &[0.0, 1.0, 2.0])?;
//! let pipeline = IsobandPipeline::new(IsobandConfig::from_env());
//! let isogons = pipeline.isogons(&grid)?;
//! let isobands = pipeline.isobands(&grid, Properties::new())?;
//! # Ok(())
//! # }
//! ```

pub mod assemble;
pub mod clip;
pub mod config;
pub mod contour;
pub mod error;
pub mod geo;
pub mod levels;
pub mod pipeline;
pub mod preprocess;
pub mod simplify;
pub mod transform;

pub use config::{EdgeMargins, HoleMode, IsobandConfig, SimplifierConfig};
pub use error::{IsobandError, IsobandResult, SimplifyError};
pub use geo::GeoMapper;
pub use levels::{generate_levels, level_span, Level, MAX_LEVELS};
pub use pipeline::IsobandPipeline;
pub use preprocess::{preprocess_grid, sentinel, PreparedGrid};
pub use simplify::{CommandSimplifier, IsobandSimplifier, PassthroughSimplifier};
pub use transform::{
    swap_halves, Identity, InitialTransform, MaskContext, MaskRows, PostSmoothTransform,
    SwapHalves,
};
