//! Helper utilities for integration tests.

pub mod input_generator;

pub use assertions::*;
pub use input_generator::*;
