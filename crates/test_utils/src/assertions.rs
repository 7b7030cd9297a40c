//! Custom Test Assertions
//!
//! Assertions on domain errors that print the code and kind that were
//! actually produced.

use std::fmt::Debug;

use core_kernel::{DomainError, ErrorKind};

/// Asserts that `result` failed with the given error code
///
/// # Panics
///
/// Panics if the result is `Ok` or carries a different code
pub fn assert_error_code<T: Debug, E: DomainError>(result: &Result<T, E>, expected: &str) {
    match result {
        Ok(value) => panic!("Expected error {}, got Ok({:?})", expected, value),
        Err(error) => assert_eq!(
            error.code(),
            expected,
            "Expected error code {}, got {} ({})",
            expected,
            error.code(),
            error
        ),
    }
}

/// Asserts that `result` failed with an error of the given kind
pub fn assert_error_kind<T: Debug, E: DomainError>(result: &Result<T, E>, expected: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {} error, got Ok({:?})", expected, value),
        Err(error) => assert_eq!(
            error.kind(),
            expected,
            "Expected {} error, got {} ({}: {})",
            expected,
            error.kind(),
            error.code(),
            error
        ),
    }
}

/// Asserts the error would be rendered with the given HTTP status
pub fn assert_http_status<E: DomainError>(error: &E, expected: u16) {
    assert_eq!(
        error.kind().status_code(),
        expected,
        "{} ({}) maps to {}, expected {}",
        error.code(),
        error.kind(),
        error.kind().status_code(),
        expected
    );
}
