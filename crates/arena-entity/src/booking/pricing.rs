//! Booking pricing breakdown and discounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use arena_core::AppError;

/// A discount applied to a booking.
///
/// The `code` doubles as the idempotency key: applying the same code
/// twice is rejected rather than silently stacking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discount {
    /// Unique code identifying the discount (e.g. `"EARLYBIRD10"`).
    pub code: String,
    /// Amount deducted, in minor currency units.
    pub amount: i64,
    /// Optional note recorded with the discount.
    pub note: Option<String>,
    /// When the discount was applied.
    pub applied_at: DateTime<Utc>,
}

/// The monetary breakdown of a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingBreakdown {
    /// Field charge for the booked window.
    pub base_amount: i64,
    /// Hourly rate that resolved for the start of the window.
    pub base_rate: i64,
    /// Name of the pricing tier that applied, if any.
    pub applied_tier: Option<String>,
    /// Sum of assigned-staff charges.
    pub staff_charges: i64,
    /// Applied discounts, in application order.
    pub discounts: Vec<Discount>,
    /// Tax amount.
    pub tax_amount: i64,
    /// Grand total: base + staff + tax - discounts, clamped at zero.
    pub total_amount: i64,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl PricingBreakdown {
    /// Create a breakdown with no staff charges, discounts, or tax.
    pub fn new(base_amount: i64, base_rate: i64, applied_tier: Option<String>, currency: impl Into<String>) -> Self {
        Self {
            base_amount,
            base_rate,
            applied_tier,
            staff_charges: 0,
            discounts: Vec::new(),
            tax_amount: 0,
            total_amount: base_amount,
            currency: currency.into(),
        }
    }

    /// Sum of all applied discounts.
    pub fn discount_total(&self) -> i64 {
        self.discounts.iter().map(|d| d.amount).sum()
    }

    /// Recompute `total_amount` from the components. The total never
    /// goes negative.
    pub fn recompute_total(&mut self) {
        let gross = self.base_amount + self.staff_charges + self.tax_amount;
        self.total_amount = (gross - self.discount_total()).max(0);
    }

    /// Add a staff charge and recompute the total.
    pub fn add_staff_charge(&mut self, amount: i64) {
        self.staff_charges += amount;
        self.recompute_total();
    }

    /// Apply a discount. A duplicate code is rejected; resubmitting the
    /// same discount must not double-apply.
    pub fn apply_discount(&mut self, discount: Discount) -> Result<(), AppError> {
        if discount.amount < 0 {
            return Err(AppError::validation(format!(
                "Discount '{}' has negative amount",
                discount.code
            )));
        }
        if self.discounts.iter().any(|d| d.code == discount.code) {
            return Err(AppError::validation(format!(
                "Discount '{}' has already been applied",
                discount.code
            )));
        }
        self.discounts.push(discount);
        self.recompute_total();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discount(code: &str, amount: i64) -> Discount {
        Discount {
            code: code.to_string(),
            amount,
            note: None,
            applied_at: Utc::now(),
        }
    }

    #[test]
    fn test_recompute_total() {
        let mut pricing = PricingBreakdown::new(300_000, 150_000, Some("evening".into()), "VND");
        pricing.add_staff_charge(100_000);
        assert_eq!(pricing.total_amount, 400_000);
    }

    #[test]
    fn test_duplicate_discount_rejected() {
        let mut pricing = PricingBreakdown::new(200_000, 100_000, None, "VND");
        pricing.apply_discount(discount("PROMO", 50_000)).unwrap();
        assert_eq!(pricing.total_amount, 150_000);
        assert!(pricing.apply_discount(discount("PROMO", 50_000)).is_err());
        assert_eq!(pricing.total_amount, 150_000);
    }

    #[test]
    fn test_distinct_discounts_stack() {
        let mut pricing = PricingBreakdown::new(200_000, 100_000, None, "VND");
        pricing.apply_discount(discount("A", 30_000)).unwrap();
        pricing.apply_discount(discount("B", 20_000)).unwrap();
        assert_eq!(pricing.total_amount, 150_000);
    }

    #[test]
    fn test_total_clamped_at_zero() {
        let mut pricing = PricingBreakdown::new(100_000, 100_000, None, "VND");
        pricing.apply_discount(discount("BIG", 500_000)).unwrap();
        assert_eq!(pricing.total_amount, 0);
    }
}
