//! Repository layer for database access.

pub mod claim;

pub use claim::*;
