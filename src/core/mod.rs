/// Error information carried by failures
pub mod error_info;

/// The failable value and its predicates
pub mod failable;

/// Predicates over collections of failables
pub mod aggregate;

/// Run stages against one shared argument
pub mod failable_sequence;

/// Thread a value through stages
pub mod failable_pipe;
