//! Utility functions

mod format;

pub use format::{group_thousands, round_half_even, round_to};
