//! Predicates over collections of failables

use crate::core::failable::{Failable, is_failable};
use serde_json::Value;

fn all_true(flags: impl IntoIterator<Item = bool>) -> bool {
    flags.into_iter().fold(true, |acc, flag| flag && acc)
}

/// True if at least one result is a failure; false for an empty collection
pub fn any_failed<'a>(results: impl IntoIterator<Item = &'a Failable>) -> bool {
    !all_true(results.into_iter().map(Failable::is_success))
}

/// The first failure in order, returned by reference
pub fn first_failure<'a>(results: impl IntoIterator<Item = &'a Failable>) -> Option<&'a Failable> {
    results.into_iter().find(|result| result.is_failure())
}

/// True if every value has the failable shape
pub fn all_failable<'a>(items: impl IntoIterator<Item = &'a Value>) -> bool {
    all_true(items.into_iter().map(is_failable))
}
