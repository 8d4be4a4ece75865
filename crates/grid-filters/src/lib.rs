//! Signal conditioning primitives for gridded scalar data.
//!
//! All operators work on row-major `f64` buffers with edge-clamped
//! addressing: a neighbour lookup outside the grid reads the nearest valid
//! row/column. Every operator is pure and returns a new buffer.
//!
//! - [`convolve`]: Gaussian kernels and separable 2-D convolution
//! - [`morphology`]: erosion, dilation and their compositions

pub mod border;
pub mod convolve;
pub mod morphology;

pub use border::clamp_index;
pub use convolve::{gaussian_kernel, gaussian_smooth, separable_convolve};
pub use morphology::Morphology;
