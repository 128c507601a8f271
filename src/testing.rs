//! Assertion helpers for tests that check failables
//!
//! ```
//! use failable::testing::{assert_failure, assert_success};
//! use failable::{failure, success};
//! use serde_json::json;
//!
//! assert_success(&success(8), Some(&json!(8)));
//! assert_success(&success("anything"), None);
//! assert_failure(&failure("it blew up"), Some("it blew up"));
//! ```

use crate::core::failable::Failable;
use serde_json::Value;

/// Panic unless `actual` is a success, and, when given, carries `expected`
#[track_caller]
pub fn assert_success(actual: &Failable, expected: Option<&Value>) {
    match actual {
        Failable::Success { payload } => {
            if let Some(expected) = expected {
                assert_eq!(
                    payload.as_ref(),
                    Some(expected),
                    "success payload does not match"
                );
            }
        }
        Failable::Failure { error } => {
            panic!("wanted success but got failure: {error}");
        }
    }
}

/// Panic unless `actual` is a failure, and, when given, has message `expected`
#[track_caller]
pub fn assert_failure(actual: &Failable, expected: Option<&str>) {
    match actual {
        Failable::Failure { error } => {
            if let Some(expected) = expected {
                assert_eq!(error.message, expected, "failure message does not match");
            }
        }
        Failable::Success { payload } => {
            panic!("wanted failure but got success: {payload:?}");
        }
    }
}
