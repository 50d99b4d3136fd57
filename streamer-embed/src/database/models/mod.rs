//! Database models.

pub mod claim;

pub use claim::*;
