//! Lint summary parsing and baseline comparison

pub mod compare;
pub mod extract;

pub use compare::compare;
pub use extract::extract;
