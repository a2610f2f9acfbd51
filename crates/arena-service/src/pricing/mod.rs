//! Rate resolution for fields with tiered and seasonal pricing.

pub mod resolver;

pub use resolver::{PricingResolver, WindowPrice};
