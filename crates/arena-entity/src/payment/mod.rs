//! Payment record entities.

pub mod model;

pub use model::{CreatePayment, PaymentRecord, PaymentRecordStatus};
