//! Staff availability matching.

pub mod matcher;

pub use matcher::StaffMatcher;
