use std::ptr;
use streamline_core::{GridDimensions, GridError, Vec3, VectorGrid};
use tracing::debug;

use crate::error::{DefaultStreamlineError, StreamlineErrorCode};
use crate::helpers::{clear_last_error, ref_from_ptr, track_error, track_result};
use crate::types::{StreamlineDimensions, StreamlineVec3};

/// Opaque handle to a validated vector grid.
///
/// Created by `streamline_grid_new`, released by `streamline_grid_destroy`.
/// The grid is immutable after creation, so a handle may be shared by any
/// number of threads tracing concurrently.
pub struct StreamlineGrid {
    pub(crate) grid: VectorGrid,
}

impl StreamlineGrid {
    /// Copy caller-owned samples into a validated grid.
    ///
    /// # Safety
    /// `samples` must be null or point to `sample_len` readable `f64` values.
    unsafe fn new(
        dimensions: StreamlineDimensions,
        origin: StreamlineVec3,
        spacing: StreamlineVec3,
        samples: *const f64,
        sample_len: usize,
    ) -> Result<Box<Self>, DefaultStreamlineError> {
        if samples.is_null() {
            return Err(DefaultStreamlineError::null_pointer("samples"));
        }

        // Samples arrive as interleaved (x, y, z) triples
        let dims: GridDimensions = dimensions.into();
        let raw = unsafe { std::slice::from_raw_parts(samples, sample_len) };
        let triples = raw.chunks_exact(3);
        if !triples.remainder().is_empty() {
            let expected = dims.node_count().ok_or_else(|| {
                DefaultStreamlineError::invalid_grid(&GridError::DimensionOverflow)
            })?;
            return Err(DefaultStreamlineError::invalid_grid(
                &GridError::SampleCountMismatch {
                    expected,
                    actual: sample_len / 3,
                },
            ));
        }

        let vectors = triples
            .map(|xyz| Vec3::new(xyz[0], xyz[1], xyz[2]))
            .collect();

        let grid = VectorGrid::new(dims, origin.into(), spacing.into(), vectors)
            .map_err(|e| DefaultStreamlineError::invalid_grid(&e))?;

        Ok(Box::new(Self { grid }))
    }
}

/// Create a vector grid and return it via out-parameter.
///
/// Parameters
/// - `dimensions`: samples along each axis, all non-zero.
/// - `origin`: world position of node (0, 0, 0).
/// - `spacing`: node spacing per axis, finite and positive.
/// - `samples`: `sample_len` doubles holding one `(x, y, z)` vector per node,
///   ordered with `i` fastest and `k` slowest (`index = k*ny*nx + j*nx + i`).
///   The data is copied; the caller may free it after this call.
/// - `out_grid`: receives the created grid. Set to null on failure.
///
/// Returns
/// - `StreamlineErrorCode::Ok` (0) on success
/// - `StreamlineErrorCode::NullPointer` if `samples` or `out_grid` is null
/// - `StreamlineErrorCode::InvalidGrid` if dimensions, origin, spacing or the
///   sample count are invalid, or a sample is NaN or infinite
///
/// Call `streamline_get_last_error()` for a human-readable description.
///
/// # Safety
///
/// - `out_grid` must be a valid, non-null pointer to writable memory.
/// - `samples` must point to at least `sample_len` readable doubles.
/// - The caller takes ownership of the returned grid and MUST call
///   `streamline_grid_destroy` exactly once.
///
/// Example (C)
/// ```c
/// StreamlineGrid* grid = NULL;
/// StreamlineDimensions dims = { 11, 11, 11 };
/// StreamlineVec3 origin = { 0.0, 0.0, 0.0 };
/// StreamlineVec3 spacing = { 0.1, 0.1, 0.1 };
/// if (streamline_grid_new(dims, origin, spacing, data, 3 * 11 * 11 * 11, &grid) != Ok) {
///     fprintf(stderr, "%s\n", streamline_get_last_error());
/// }
/// ```
#[no_mangle]
pub unsafe extern "C" fn streamline_grid_new(
    dimensions: StreamlineDimensions,
    origin: StreamlineVec3,
    spacing: StreamlineVec3,
    samples: *const f64,
    sample_len: usize,
    out_grid: *mut *mut StreamlineGrid,
) -> StreamlineErrorCode {
    if out_grid.is_null() {
        return track_error(&DefaultStreamlineError::null_pointer("out_grid"));
    }

    let created = unsafe { StreamlineGrid::new(dimensions, origin, spacing, samples, sample_len) };
    match track_result(created) {
        Ok(grid) => {
            debug!(
                "Created {}x{}x{} grid over FFI",
                dimensions.nx, dimensions.ny, dimensions.nz
            );
            clear_last_error();
            unsafe {
                *out_grid = Box::into_raw(grid);
            }
            StreamlineErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_grid = ptr::null_mut();
            }
            code
        }
    }
}

/// Destroy a grid previously created by `streamline_grid_new`.
///
/// If `grid` is null this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `streamline_grid_new` and not freed already.
/// - Results traced from this grid stay valid; they own their points.
/// - The caller must not use the pointer after this call.
#[no_mangle]
pub unsafe extern "C" fn streamline_grid_destroy(grid: *mut StreamlineGrid) {
    if grid.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `streamline_grid_new`
    unsafe {
        drop(Box::from_raw(grid));
    }
}

/// Read the number of samples along each axis.
///
/// Returns `StreamlineErrorCode::NullPointer` if `grid` or `out_dimensions` is null.
///
/// # Safety
/// `grid` must be null or a live pointer from `streamline_grid_new`;
/// `out_dimensions` must be null or writable.
#[no_mangle]
pub unsafe extern "C" fn streamline_grid_dimensions(
    grid: *const StreamlineGrid,
    out_dimensions: *mut StreamlineDimensions,
) -> StreamlineErrorCode {
    if out_dimensions.is_null() {
        return track_error(&DefaultStreamlineError::null_pointer("out_dimensions"));
    }

    match track_result(unsafe { ref_from_ptr(grid, "grid") }) {
        Ok(handle) => {
            clear_last_error();
            unsafe {
                *out_dimensions = handle.grid.dimensions().into();
            }
            StreamlineErrorCode::Ok
        }
        Err(code) => code,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::streamline_get_last_error_code;

    const ORIGIN: StreamlineVec3 = StreamlineVec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };
    const SPACING: StreamlineVec3 = StreamlineVec3 {
        x: 0.5,
        y: 0.5,
        z: 0.5,
    };

    #[test]
    fn test_create_query_destroy() {
        let dims = StreamlineDimensions {
            nx: 3,
            ny: 2,
            nz: 2,
        };
        let samples = [1.0; 3 * 12];
        let mut grid = ptr::null_mut();

        let code = unsafe {
            streamline_grid_new(dims, ORIGIN, SPACING, samples.as_ptr(), samples.len(), &mut grid)
        };
        assert_eq!(code, StreamlineErrorCode::Ok);
        assert!(!grid.is_null());

        let mut out = StreamlineDimensions {
            nx: 0,
            ny: 0,
            nz: 0,
        };
        let code = unsafe { streamline_grid_dimensions(grid, &mut out) };
        assert_eq!(code, StreamlineErrorCode::Ok);
        assert_eq!(out, dims);

        unsafe { streamline_grid_destroy(grid) };
    }

    #[test]
    fn test_sample_count_mismatch_is_invalid_grid() {
        let dims = StreamlineDimensions {
            nx: 2,
            ny: 2,
            nz: 2,
        };
        let samples = [0.0; 3 * 7];
        let mut grid = ptr::null_mut();

        let code = unsafe {
            streamline_grid_new(dims, ORIGIN, SPACING, samples.as_ptr(), samples.len(), &mut grid)
        };
        assert_eq!(code, StreamlineErrorCode::InvalidGrid);
        assert!(grid.is_null());
        assert_eq!(
            streamline_get_last_error_code(),
            StreamlineErrorCode::InvalidGrid
        );

        // Not a whole number of vectors
        let code =
            unsafe { streamline_grid_new(dims, ORIGIN, SPACING, samples.as_ptr(), 25, &mut grid) };
        assert_eq!(code, StreamlineErrorCode::InvalidGrid);
    }

    #[test]
    fn test_nan_sample_is_invalid_grid() {
        let dims = StreamlineDimensions {
            nx: 2,
            ny: 1,
            nz: 1,
        };
        let samples = [1.0, 0.0, 0.0, 1.0, f64::NAN, 0.0];
        let mut grid = ptr::null_mut();

        let code = unsafe {
            streamline_grid_new(dims, ORIGIN, SPACING, samples.as_ptr(), samples.len(), &mut grid)
        };
        assert_eq!(code, StreamlineErrorCode::InvalidGrid);
        assert!(grid.is_null());

        let message =
            unsafe { std::ffi::CStr::from_ptr(crate::error::streamline_get_last_error()) };
        assert!(message.to_str().unwrap().contains("sample 1 must be finite"));
    }

    #[test]
    fn test_null_arguments() {
        let dims = StreamlineDimensions {
            nx: 1,
            ny: 1,
            nz: 1,
        };
        let mut grid = ptr::null_mut();

        let code = unsafe { streamline_grid_new(dims, ORIGIN, SPACING, ptr::null(), 3, &mut grid) };
        assert_eq!(code, StreamlineErrorCode::NullPointer);

        let samples = [0.0; 3];
        let code = unsafe {
            streamline_grid_new(dims, ORIGIN, SPACING, samples.as_ptr(), 3, ptr::null_mut())
        };
        assert_eq!(code, StreamlineErrorCode::NullPointer);

        let mut out = StreamlineDimensions {
            nx: 0,
            ny: 0,
            nz: 0,
        };
        let code = unsafe { streamline_grid_dimensions(ptr::null(), &mut out) };
        assert_eq!(code, StreamlineErrorCode::NullPointer);

        // Destroying null is a no-op
        unsafe { streamline_grid_destroy(ptr::null_mut()) };
    }

    #[test]
    fn test_invalid_spacing_reports_message() {
        let dims = StreamlineDimensions {
            nx: 1,
            ny: 1,
            nz: 1,
        };
        let bad_spacing = StreamlineVec3 {
            x: -1.0,
            y: 1.0,
            z: 1.0,
        };
        let samples = [0.0; 3];
        let mut grid = ptr::null_mut();

        let code = unsafe {
            streamline_grid_new(dims, ORIGIN, bad_spacing, samples.as_ptr(), 3, &mut grid)
        };
        assert_eq!(code, StreamlineErrorCode::InvalidGrid);

        let message =
            unsafe { std::ffi::CStr::from_ptr(crate::error::streamline_get_last_error()) };
        assert!(message.to_str().unwrap().contains("spacing"));
    }
}
