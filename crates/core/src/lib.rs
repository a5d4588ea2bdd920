//! Streamline Tracing Core Library
//!
//! Traces streamlines through a vector field sampled on a regular 3D grid.
//! From a seed point the field's flow is integrated in both temporal
//! directions with classical 4th-order Runge-Kutta, producing a connected
//! polyline that ends where the particle leaves the domain, stalls in a
//! vanishing field, or reaches the step bound.
//!
//! ## Components
//!
//! - **Grid field sampler** ([`grid`]): the [`VectorGrid`] domain and
//!   trilinear point interpolation
//! - **RK4 stepper** ([`integrator::rk4_step`]): one fixed-length step in a
//!   chosen direction
//! - **Streamline tracer** ([`StreamlineTracer`]): bidirectional tracing with
//!   termination policy, producing a [`Streamline`]
//! - **Output** ([`output`]): VTK XML `PolyData` serialization
//!
//! ```rust
//! use streamline_core::{trace_streamline, GridDimensions, IntegrationConfig, Vec3, VectorGrid};
//!
//! let grid = VectorGrid::uniform(
//!     GridDimensions::cube(11),
//!     Vec3::zeros(),
//!     Vec3::new(0.1, 0.1, 0.1),
//!     Vec3::new(1.0, 0.0, 0.0),
//! )
//! .unwrap();
//!
//! let line = trace_streamline(&grid, &Vec3::new(0.5, 0.5, 0.5), IntegrationConfig::default())
//!     .unwrap();
//! assert_eq!(line.points()[line.seed_index()], Vec3::new(0.5, 0.5, 0.5));
//! ```

// Core types and utilities
pub mod core_types;
pub mod error;

// Field domain and integration engine
pub mod grid;
pub mod integrator;
pub mod streamline;

// Serialization of results
pub mod output;

// Re-export core types
pub use core_types::Vec3;
pub use error::{Axis, ConfigError, GridError, OutputError, TraceError};

// Re-export engine types
pub use grid::{interpolate, FieldSampler, GridDimensions, OutOfBounds, SyntheticField, VectorGrid};
pub use integrator::{
    rk4_step, trace_streamline, Direction, DirectionSummary, IntegrationConfig, StepError,
    StreamlineTracer, TerminationReason,
};
pub use output::{write_vtp_file, PolylineSink, VtpWriter};
pub use streamline::{Polyline, Streamline};
