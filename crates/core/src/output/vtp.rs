//! VTK XML `PolyData` (`.vtp`) writer
//!
//! Layout written for an `n`-point streamline:
//!
//! ```text
//! <Piece NumberOfPoints="n" NumberOfLines="1">
//!   <PointData Scalars="step">   signed step index per point, 0 at the seed
//!   <Points>                     n × (x y z), Float64
//!   <Lines>
//!     connectivity               0 1 … n-1
//!     offsets                    n
//! ```
//!
//! A single-point streamline is written with `NumberOfLines="0"` and empty
//! line arrays, so readers see a lone vertex rather than a broken cell.

use super::PolylineSink;
use crate::error::OutputError;
use crate::streamline::Streamline;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Writes streamlines as ASCII VTK XML `PolyData`
#[derive(Debug)]
pub struct VtpWriter<W: Write> {
    inner: W,
}

impl<W: Write> VtpWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Recover the underlying writer
    pub fn into_inner(self) -> W {
        self.inner
    }

    fn write_document(&mut self, streamline: &Streamline) -> std::io::Result<()> {
        let polyline = streamline.polyline();
        let point_count = streamline.len();
        let line_count = usize::from(point_count > 1);
        let w = &mut self.inner;

        writeln!(w, r#"<?xml version="1.0"?>"#)?;
        writeln!(
            w,
            r#"<VTKFile type="PolyData" version="1.0" byte_order="LittleEndian" header_type="UInt64">"#
        )?;
        writeln!(w, "  <PolyData>")?;
        writeln!(
            w,
            r#"    <Piece NumberOfPoints="{point_count}" NumberOfVerts="0" NumberOfLines="{line_count}" NumberOfStrips="0" NumberOfPolys="0">"#
        )?;

        writeln!(w, r#"      <PointData Scalars="step">"#)?;
        writeln!(
            w,
            r#"        <DataArray type="Int64" Name="step" format="ascii">"#
        )?;
        for offset in streamline.step_offsets() {
            writeln!(w, "          {offset}")?;
        }
        writeln!(w, "        </DataArray>")?;
        writeln!(w, "      </PointData>")?;

        writeln!(w, "      <Points>")?;
        writeln!(
            w,
            r#"        <DataArray type="Float64" NumberOfComponents="3" format="ascii">"#
        )?;
        for p in streamline.points() {
            writeln!(w, "          {} {} {}", p.x, p.y, p.z)?;
        }
        writeln!(w, "        </DataArray>")?;
        writeln!(w, "      </Points>")?;

        writeln!(w, "      <Lines>")?;
        writeln!(
            w,
            r#"        <DataArray type="Int64" Name="connectivity" format="ascii">"#
        )?;
        if line_count > 0 {
            for id in polyline.point_ids() {
                writeln!(w, "          {id}")?;
            }
        }
        writeln!(w, "        </DataArray>")?;
        writeln!(
            w,
            r#"        <DataArray type="Int64" Name="offsets" format="ascii">"#
        )?;
        if line_count > 0 {
            writeln!(w, "          {}", polyline.len())?;
        }
        writeln!(w, "        </DataArray>")?;
        writeln!(w, "      </Lines>")?;

        writeln!(w, "    </Piece>")?;
        writeln!(w, "  </PolyData>")?;
        writeln!(w, "</VTKFile>")?;
        w.flush()
    }
}

impl<W: Write> PolylineSink for VtpWriter<W> {
    fn write_streamline(&mut self, streamline: &Streamline) -> Result<(), OutputError> {
        self.write_document(streamline)?;
        Ok(())
    }
}

/// Write one streamline to a `.vtp` file, replacing any existing file
///
/// # Errors
///
/// Returns [`OutputError::Io`] if the file cannot be created or written.
pub fn write_vtp_file<P: AsRef<Path>>(path: P, streamline: &Streamline) -> Result<(), OutputError> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = VtpWriter::new(BufWriter::new(file));
    writer.write_streamline(streamline)?;
    info!(
        "Wrote {} streamline points to {}",
        streamline.len(),
        path.display()
    );
    Ok(())
}
