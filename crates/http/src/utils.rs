//! Utility macros used internally by the HTTP crate.

/// Returns early with an error if a condition is not met.
///
/// Like `assert!`, but returns `Err($error)` instead of panicking.
///
/// ```text
/// ensure!(body_offset <= max_request_bytes, ParseError::too_large_header(body_offset, max_request_bytes));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
