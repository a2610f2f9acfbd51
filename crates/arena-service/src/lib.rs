//! # arena-service
//!
//! Business logic for ArenaHub: the booking scheduling and
//! conflict-resolution engine. Each service orchestrates repositories and
//! the cache to implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references. The decision components
//! (pricing resolution, staff matching, series expansion, cancellation
//! policy) are pure and separately testable; the booking service pairs
//! them with the atomic reservation writes in `arena-database`.

pub mod availability;
pub mod booking;
pub mod context;
pub mod pricing;
pub mod staffing;

pub use availability::{AvailabilityChecker, DayAvailability};
pub use booking::{
    BookingOutcome, BookingService, CancellationOutcome, CancellationPolicy, SeriesGenerator,
    SeriesOutcome,
};
pub use context::RequestContext;
pub use pricing::PricingResolver;
pub use staffing::StaffMatcher;
