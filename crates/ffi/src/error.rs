use std::cell::RefCell;
use std::ffi::CString;
use std::os::raw::c_char;
use std::ptr;
use streamline_core::{ConfigError, GridError, TraceError};

/// Common interface for FFI error types.
///
/// This trait provides a unified way to handle errors across the FFI boundary,
/// carrying both the code returned to C and a message for diagnostics.
///
/// # Example
/// ```rust,ignore
/// let err = DefaultStreamlineError::null_pointer("out_grid");
/// assert_eq!(err.code(), StreamlineErrorCode::NullPointer);
/// assert_eq!(err.msg(), "Parameter 'out_grid' cannot be null");
/// ```
pub(crate) trait StreamlineError {
    /// Returns the error code to be returned across the FFI boundary.
    fn code(&self) -> StreamlineErrorCode;

    /// Returns the human-readable error message.
    fn msg(&self) -> &str;
}

/// Default implementation of `StreamlineError` for FFI error scenarios.
///
/// Wraps a `StreamlineErrorCode` together with a formatted message and
/// provides one constructor per failure kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DefaultStreamlineError {
    code: StreamlineErrorCode,
    msg: String,
}

impl DefaultStreamlineError {
    /// Create error for null pointer passed where non-null required.
    ///
    /// # Arguments
    /// * `param_name` - The name of the parameter that was null (e.g., `"out_grid"`, `"samples"`)
    pub fn null_pointer(param_name: &str) -> Self {
        Self {
            code: StreamlineErrorCode::NullPointer,
            msg: format!("Parameter '{param_name}' cannot be null"),
        }
    }

    /// Create error for a grid that fails validation.
    pub fn invalid_grid(error: &GridError) -> Self {
        Self {
            code: StreamlineErrorCode::InvalidGrid,
            msg: error.to_string(),
        }
    }

    /// Create error for an integration configuration that fails validation.
    pub fn invalid_config(error: &ConfigError) -> Self {
        Self {
            code: StreamlineErrorCode::InvalidConfig,
            msg: error.to_string(),
        }
    }

    /// Create error for a seed point that cannot be traced.
    pub fn invalid_seed(message: String) -> Self {
        Self {
            code: StreamlineErrorCode::InvalidSeed,
            msg: message,
        }
    }

    /// Create error for a caller buffer smaller than the data to copy.
    ///
    /// # Arguments
    /// * `required` - Number of elements needed
    /// * `capacity` - Number of elements the caller provided room for
    pub fn buffer_too_small(required: usize, capacity: usize) -> Self {
        Self {
            code: StreamlineErrorCode::BufferTooSmall,
            msg: format!("Buffer holds {capacity} points but {required} are required"),
        }
    }
}

impl StreamlineError for DefaultStreamlineError {
    fn code(&self) -> StreamlineErrorCode {
        self.code
    }

    fn msg(&self) -> &str {
        &self.msg
    }
}

impl From<TraceError> for DefaultStreamlineError {
    fn from(error: TraceError) -> Self {
        match error {
            TraceError::Grid(e) => Self::invalid_grid(&e),
            TraceError::Config(e) => Self::invalid_config(&e),
            seed @ TraceError::InvalidSeed(_) => Self::invalid_seed(seed.to_string()),
        }
    }
}

/// FFI error codes returned by streamline functions.
/// Follows standard C convention: 0 = success, non-zero = error.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamlineErrorCode {
    /// Operation completed successfully.
    Ok = 0,

    /// Invalid pointer: null pointer passed where non-null required.
    NullPointer = 1,

    /// Grid dimensions, origin, spacing or sample count are invalid.
    InvalidGrid = 2,

    /// Step length, step bound or stall threshold are invalid.
    InvalidConfig = 3,

    /// Seed point has a non-finite component.
    InvalidSeed = 4,

    /// Output buffer is too small for the requested data.
    BufferTooSmall = 5,
}

impl From<DefaultStreamlineError> for StreamlineErrorCode {
    fn from(error: DefaultStreamlineError) -> Self {
        error.code
    }
}

thread_local! {
    /// Thread-local storage for the most recent FFI error (C string, error code).
    /// Allows callers to retrieve diagnostic information after a failed call.
    /// The CString is stored so the pointer handed out stays valid.
    static LAST_ERROR: RefCell<(Option<CString>, StreamlineErrorCode)> = const { RefCell::new((None, StreamlineErrorCode::Ok)) };
}

/// Internal helper to read `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error<F, R>(f: F) -> R
where
    F: FnOnce(&(Option<CString>, StreamlineErrorCode)) -> R,
{
    LAST_ERROR.with_borrow(f)
}

/// Internal helper to mutate `LAST_ERROR` thread-local storage (cstring, code).
pub(crate) fn with_last_error_mut<F, R>(f: F) -> R
where
    F: FnOnce(&mut (Option<CString>, StreamlineErrorCode)) -> R,
{
    LAST_ERROR.with_borrow_mut(f)
}

/// Retrieve the most recent FFI error message as a null-terminated C string.
///
/// Returns:
/// - A borrowed pointer to the error message if the last call on this thread failed.
/// - `null` if the last call succeeded or the message cannot be converted to a C string.
///
/// # Thread Safety
/// Error messages are stored per-thread (thread-local storage), so each thread
/// has its own independent error state.
///
/// # Lifetime
/// The returned pointer is valid until the next FFI call on this thread that
/// sets or clears the error, or until the thread terminates.
///
/// **DO NOT FREE THIS POINTER** - it is managed internally.
///
/// Example:
/// ```c
/// StreamlineGrid* grid = NULL;
/// StreamlineErrorCode err = streamline_grid_new(dims, origin, spacing, samples, len, &grid);
/// if (err != Ok) {
///     const char* error = streamline_get_last_error();
///     if (error) {
///         printf("Grid creation failed: %s\n", error);
///     }
/// }
/// ```
#[no_mangle]
pub extern "C" fn streamline_get_last_error() -> *const c_char {
    with_last_error(|(cstring, _code)| cstring.as_ref().map_or(ptr::null(), |cs| cs.as_ptr()))
}

/// Retrieve the most recent FFI error code.
///
/// Returns `StreamlineErrorCode::Ok` (0) if the last call on this thread
/// succeeded, otherwise the code of the last failure.
#[no_mangle]
pub extern "C" fn streamline_get_last_error_code() -> StreamlineErrorCode {
    with_last_error(|(_cstring, code)| *code)
}
