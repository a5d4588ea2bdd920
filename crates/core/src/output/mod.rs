//! Streamline serialization
//!
//! The tracer produces points and connectivity; turning them into a file
//! format is the job of a [`PolylineSink`]. [`VtpWriter`] writes VTK XML
//! `PolyData` that common VTK viewers open directly.

mod vtp;

pub use vtp::{write_vtp_file, VtpWriter};

use crate::error::OutputError;
use crate::streamline::Streamline;

/// Receiver of finished streamlines
pub trait PolylineSink {
    /// Serialize one streamline
    ///
    /// A degenerate (single-point) streamline is valid input and must be
    /// handled, typically as a lone point with no line cells.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError`] if the underlying writer fails.
    fn write_streamline(&mut self, streamline: &Streamline) -> Result<(), OutputError>;
}
