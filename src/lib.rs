//! Failable - short-circuiting pipelines over sync and async stages
//!
//! This library provides a two-variant [`Failable`] result, predicates over
//! it, and two combinators that compose stages of any shape (synchronous,
//! returning a future, already returning a failable or not) into strictly
//! sequential pipelines that stop at the first failure.
//!
//! # Quick Start
//!
//! ```
//! use failable::{FailablePipe, FailableSequence, failure, success};
//! use serde_json::{Value, json};
//!
//! # futures::executor::block_on(async {
//! let pipe = FailablePipe::new()
//!     .stage(|n: Value| success(n.as_i64().unwrap_or(0) + 1))
//!     .stage(|n: Value| async move { success(n.as_i64().unwrap_or(0) * 2) });
//! assert_eq!(pipe.run(json!(3)).await, success(8));
//!
//! let sequence = FailableSequence::new()
//!     .stage(|_: Value| failure("it blew up"))
//!     .stage(|n: Value| success(n));
//! assert_eq!(sequence.run(json!(3)).await, failure("it blew up"));
//! # });
//! ```
//!
//! Stages never raise out of band: a panic or `Err` becomes
//! `"function at index N threw an exception"`, and a return value without
//! the failable shape becomes `"function at index N did not return failable"`.

pub mod core;
pub mod stages;
pub mod testing;

// Convenience re-exports
pub use crate::core::aggregate::{all_failable, any_failed, first_failure};
pub use crate::core::error_info::ErrorInfo;
pub use crate::core::failable::{Failable, NotFailable, empty, failure, is_failable, success};
pub use crate::core::failable_pipe::{FailablePipe, failable_pipe};
pub use crate::core::failable_sequence::{
    ALL_FUNCTIONS_SUCCEEDED, FailableSequence, NO_FUNCTIONS_SUPPLIED, failable_sequence,
};
pub use crate::stages::normalise::{
    AsyncStage, NormalisedStage, make_it_async, make_it_failable, normalise_function,
};
pub use crate::stages::stage::{Deferred, Immediate, Stage, StageOutcome, StageOutput};
