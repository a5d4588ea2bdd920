use std::ptr;
use streamline_core::{IntegrationConfig, Streamline, StreamlineTracer, Vec3};

use crate::error::{DefaultStreamlineError, StreamlineErrorCode};
use crate::grid::StreamlineGrid;
use crate::helpers::{clear_last_error, ref_from_ptr, track_error, track_result};
use crate::types::{StreamlineConfig, StreamlineDirection, StreamlineTermination, StreamlineVec3};

/// Opaque handle to one traced streamline.
///
/// Owns its points independently of the grid it was traced through. Release
/// with `streamline_result_destroy`.
pub struct StreamlineResult {
    pub(crate) streamline: Streamline,
}

/// Default integration parameters.
///
/// Step length 0.05, 1000 steps per direction, stall threshold 1e-9.
#[no_mangle]
pub extern "C" fn streamline_config_default() -> StreamlineConfig {
    IntegrationConfig::default().into()
}

/// Trace a streamline through `seed` in both directions.
///
/// Leaving the grid, stalling and reaching the step bound are normal
/// outcomes, reported per direction by `streamline_result_termination`. A
/// result may hold the seed alone.
///
/// Returns
/// - `StreamlineErrorCode::Ok` (0) on success, with `out_result` set
/// - `StreamlineErrorCode::NullPointer` if `grid` or `out_result` is null
/// - `StreamlineErrorCode::InvalidConfig` if `config` fails validation
/// - `StreamlineErrorCode::InvalidSeed` if `seed` has a non-finite component
///
/// # Safety
/// - `grid` must be null or a live pointer from `streamline_grid_new`.
/// - `out_result` must be a valid, non-null pointer to writable memory.
/// - The caller takes ownership of the returned result and MUST call
///   `streamline_result_destroy` exactly once.
#[no_mangle]
pub unsafe extern "C" fn streamline_trace(
    grid: *const StreamlineGrid,
    seed: StreamlineVec3,
    config: StreamlineConfig,
    out_result: *mut *mut StreamlineResult,
) -> StreamlineErrorCode {
    if out_result.is_null() {
        return track_error(&DefaultStreamlineError::null_pointer("out_result"));
    }

    let traced = unsafe { ref_from_ptr(grid, "grid") }.and_then(|handle| {
        let tracer = StreamlineTracer::new(&handle.grid, config.into())?;
        let streamline = tracer.trace(&Vec3::from(seed))?;
        Ok(Box::new(StreamlineResult { streamline }))
    });

    match track_result(traced) {
        Ok(result) => {
            clear_last_error();
            unsafe {
                *out_result = Box::into_raw(result);
            }
            StreamlineErrorCode::Ok
        }
        Err(code) => {
            unsafe {
                *out_result = ptr::null_mut();
            }
            code
        }
    }
}

/// Number of points in the streamline, including the seed.
///
/// Returns 0 if `result` is null; a live result always has at least one point.
///
/// # Safety
/// `result` must be null or a live pointer from `streamline_trace`.
#[no_mangle]
pub unsafe extern "C" fn streamline_result_point_count(result: *const StreamlineResult) -> usize {
    unsafe { result.as_ref() }.map_or(0, |r| r.streamline.len())
}

/// Index of the seed point within the streamline.
///
/// Points before it came from backward integration, points after it from
/// forward integration. Returns 0 if `result` is null.
///
/// # Safety
/// `result` must be null or a live pointer from `streamline_trace`.
#[no_mangle]
pub unsafe extern "C" fn streamline_result_seed_index(result: *const StreamlineResult) -> usize {
    unsafe { result.as_ref() }.map_or(0, |r| r.streamline.seed_index())
}

/// Copy the streamline points, in polyline order, into a caller buffer.
///
/// Query the required size with `streamline_result_point_count` first.
///
/// Returns
/// - `StreamlineErrorCode::Ok` (0) on success
/// - `StreamlineErrorCode::NullPointer` if `result` or `out_points` is null
/// - `StreamlineErrorCode::BufferTooSmall` if `capacity` is below the point
///   count; nothing is written in that case
///
/// # Safety
/// - `result` must be null or a live pointer from `streamline_trace`.
/// - `out_points` must point to writable memory for `capacity` elements.
#[no_mangle]
pub unsafe extern "C" fn streamline_result_copy_points(
    result: *const StreamlineResult,
    out_points: *mut StreamlineVec3,
    capacity: usize,
) -> StreamlineErrorCode {
    if out_points.is_null() {
        return track_error(&DefaultStreamlineError::null_pointer("out_points"));
    }

    let handle = match track_result(unsafe { ref_from_ptr(result, "result") }) {
        Ok(handle) => handle,
        Err(code) => return code,
    };

    let points = handle.streamline.points();
    if capacity < points.len() {
        return track_error(&DefaultStreamlineError::buffer_too_small(
            points.len(),
            capacity,
        ));
    }

    let out = unsafe { std::slice::from_raw_parts_mut(out_points, points.len()) };
    for (dst, src) in out.iter_mut().zip(points) {
        *dst = (*src).into();
    }

    clear_last_error();
    StreamlineErrorCode::Ok
}

/// Report how one direction of the trace ended.
///
/// Writes the termination reason to `out_reason` and, if `out_steps` is not
/// null, the number of steps taken in that direction.
///
/// # Safety
/// - `result` must be null or a live pointer from `streamline_trace`.
/// - `out_reason` must be non-null and writable; `out_steps` may be null.
#[no_mangle]
pub unsafe extern "C" fn streamline_result_termination(
    result: *const StreamlineResult,
    direction: StreamlineDirection,
    out_reason: *mut StreamlineTermination,
    out_steps: *mut usize,
) -> StreamlineErrorCode {
    if out_reason.is_null() {
        return track_error(&DefaultStreamlineError::null_pointer("out_reason"));
    }

    let handle = match track_result(unsafe { ref_from_ptr(result, "result") }) {
        Ok(handle) => handle,
        Err(code) => return code,
    };

    let summary = match direction {
        StreamlineDirection::Backward => handle.streamline.backward(),
        StreamlineDirection::Forward => handle.streamline.forward(),
    };

    unsafe {
        *out_reason = summary.reason.into();
        if !out_steps.is_null() {
            *out_steps = summary.steps;
        }
    }

    clear_last_error();
    StreamlineErrorCode::Ok
}

/// Destroy a result previously created by `streamline_trace`.
///
/// If `result` is null this function is a no-op.
///
/// # Safety
/// - The pointer MUST have been created by `streamline_trace` and not freed already.
/// - The caller must not use the pointer after this call.
#[no_mangle]
pub unsafe extern "C" fn streamline_result_destroy(result: *mut StreamlineResult) {
    if result.is_null() {
        return;
    }

    // SAFETY: created by `Box::into_raw` in `streamline_trace`
    unsafe {
        drop(Box::from_raw(result));
    }
}
