//! Streamline integration engine
//!
//! - [`IntegrationConfig`]: step length, step bound and stall threshold
//! - [`rk4_step`]: one classical Runge-Kutta step in a chosen direction
//! - [`StreamlineTracer`]: bidirectional tracing with termination policy
//!
//! # Example
//!
//! ```rust
//! use streamline_core::grid::SyntheticField;
//! use streamline_core::integrator::{IntegrationConfig, StreamlineTracer};
//! use streamline_core::Vec3;
//!
//! let grid = SyntheticField::tornado().build_unit_cube(33).unwrap();
//! let tracer = StreamlineTracer::new(&grid, IntegrationConfig::for_grid(&grid)).unwrap();
//! let line = tracer.trace(&Vec3::new(0.7, 0.5, 0.1)).unwrap();
//! assert!(line.len() > 1);
//! ```

pub mod config;
mod rk4;
mod tracer;

pub use config::{constants, IntegrationConfig};
pub use rk4::{rk4_step, Direction, StepError};
pub use tracer::{trace_streamline, DirectionSummary, StreamlineTracer, TerminationReason};
