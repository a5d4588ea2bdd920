use crate::error::{
    with_last_error_mut, DefaultStreamlineError, StreamlineError, StreamlineErrorCode,
};
use std::ffi::CString;

/// Set the thread-local error message and code.
/// Internal helper for FFI functions to record failure details.
pub(crate) fn set_last_error(error: &impl StreamlineError) {
    with_last_error_mut(|(cstring, code)| {
        *cstring = CString::new(error.msg()).ok();
        *code = error.code();
    });
}

/// Track an error by setting it in thread-local storage and returning its code.
#[inline]
pub(crate) fn track_error(error: &impl StreamlineError) -> StreamlineErrorCode {
    set_last_error(error);
    error.code()
}

/// Record the error of a failed result, passing successes through untouched.
#[inline]
pub(crate) fn track_result<T, E: StreamlineError>(
    result: Result<T, E>,
) -> Result<T, StreamlineErrorCode> {
    result.map_err(|error| track_error(&error))
}

/// Clear the thread-local error message and code.
/// Internal helper called on successful operations.
pub(crate) fn clear_last_error() {
    with_last_error_mut(|(cstring, code)| {
        *cstring = None;
        *code = StreamlineErrorCode::Ok;
    });
}

/// Borrow the object behind an FFI handle, reporting null as an error.
///
/// # Safety
/// `ptr` must be null or point to a live `T` that outlives `'a` and is not
/// mutated while borrowed.
pub(crate) unsafe fn ref_from_ptr<'a, T>(
    ptr: *const T,
    param_name: &str,
) -> Result<&'a T, DefaultStreamlineError> {
    unsafe { ptr.as_ref() }.ok_or_else(|| DefaultStreamlineError::null_pointer(param_name))
}
