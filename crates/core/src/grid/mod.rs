//! Vector field grid and point sampling
//!
//! - [`VectorGrid`]: the structured field domain, a dense array of vector samples
//! - [`interpolate`] / [`FieldSampler`]: trilinear point queries
//! - [`SyntheticField`]: analytic fields sampled onto a grid

pub mod sampler;
pub mod synthetic;
pub mod vector_grid;

// Re-export main types
pub use sampler::{interpolate, FieldSampler, OutOfBounds, NODE_SNAP_TOLERANCE};
pub use synthetic::SyntheticField;
pub use vector_grid::{GridDimensions, VectorGrid};
