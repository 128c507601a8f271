/// Stage shapes and what they settle to
pub mod stage;

/// Adapting stages into uniform, never-throwing async functions
pub mod normalise;
