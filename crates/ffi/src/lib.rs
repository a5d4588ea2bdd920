//! C ABI for the streamline tracer
//!
//! Grids and traced results are opaque, heap-allocated handles created with
//! an out-parameter and released with the matching `*_destroy` function.
//! Every fallible call returns a [`StreamlineErrorCode`]; the message for the
//! last failure on the calling thread is available from
//! `streamline_get_last_error`.
//!
//! The C header is generated by `build.rs` with cbindgen.

mod error;
mod helpers;

pub mod grid;
pub mod trace;
pub mod types;

pub use error::{streamline_get_last_error, streamline_get_last_error_code, StreamlineErrorCode};
pub use grid::{
    streamline_grid_destroy, streamline_grid_dimensions, streamline_grid_new, StreamlineGrid,
};
pub use trace::{
    streamline_config_default, streamline_result_copy_points, streamline_result_destroy,
    streamline_result_point_count, streamline_result_seed_index, streamline_result_termination,
    streamline_trace, StreamlineResult,
};
pub use types::{
    StreamlineConfig, StreamlineDimensions, StreamlineDirection, StreamlineTermination,
    StreamlineVec3,
};
