//! Booking domain entities: the central reservation record, its status
//! machine, pricing breakdown, membership metadata, and audit history.

pub mod history;
pub mod membership;
pub mod model;
pub mod pricing;
pub mod request;
pub mod status;

pub use history::{BookingHistoryEntry, CreateHistoryEntry};
pub use membership::{MembershipInfo, RecurrencePattern};
pub use model::{AssignedStaff, Booking, CancellationRecord};
pub use pricing::{Discount, PricingBreakdown};
pub use request::{BookingRequest, MembershipBookingRequest, RegularBookingRequest};
pub use status::{BookingStatus, BookingType, PaymentStatus};
