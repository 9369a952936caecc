//! Pure evaluators. Nothing in here logs, allocates shared state or fails.

pub mod chain;
pub mod comparison;

pub use chain::evaluate_chain;
pub use comparison::compare_methods;
