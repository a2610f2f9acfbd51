//! Provider traits implemented by infrastructure crates.

pub mod cache;
