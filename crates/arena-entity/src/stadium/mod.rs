//! Stadium domain entities.

pub mod model;

pub use model::Stadium;
