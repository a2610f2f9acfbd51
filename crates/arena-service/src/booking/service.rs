//! Booking lifecycle orchestration.
//!
//! The service wires the pure decision components (availability rules,
//! pricing, staff matching, series expansion, cancellation policy) to
//! the repositories. Every write that occupies or moves a slot goes
//! through the atomic repository primitives; the availability check
//! beforehand only produces friendlier errors for the common case.
//! History entries are appended after the corresponding state change has
//! durably succeeded.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use arena_core::AppResult;
use arena_core::config::booking::BookingConfig;
use arena_core::error::AppError;
use arena_core::types::{
    BookingId, MembershipId, PageRequest, PageResponse, StaffId, TimeRange, UserId,
};
use arena_database::repositories::booking::BookingRepository;
use arena_database::repositories::field::FieldRepository;
use arena_database::repositories::history::HistoryRepository;
use arena_database::repositories::payment::PaymentRepository;
use arena_database::repositories::stadium::StadiumRepository;
use arena_database::repositories::staff::StaffRepository;
use arena_entity::booking::{
    AssignedStaff, Booking, BookingHistoryEntry, BookingRequest, BookingStatus, BookingType,
    CancellationRecord, CreateHistoryEntry, Discount, MembershipBookingRequest, MembershipInfo,
    PaymentStatus, PricingBreakdown, RegularBookingRequest,
};
use arena_entity::field::Field;
use arena_entity::payment::{CreatePayment, PaymentRecordStatus};
use arena_entity::stadium::Stadium;
use arena_entity::staff::StaffRole;

use crate::availability::AvailabilityChecker;
use crate::booking::cancellation::{CancellationDenial, CancellationPolicy};
use crate::booking::series::SeriesGenerator;
use crate::context::RequestContext;
use crate::pricing::PricingResolver;
use crate::staffing::StaffMatcher;

/// One occurrence of a membership series that could not be reserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OccurrenceFailure {
    /// The date that failed.
    pub date: NaiveDate,
    /// Why it failed.
    pub reason: String,
}

/// The result of expanding and persisting a membership series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeriesOutcome {
    /// Identifier shared by every persisted occurrence.
    pub membership_id: MembershipId,
    /// The occurrences that were reserved, in date order.
    pub occurrences: Vec<Booking>,
    /// The occurrences that failed, with reasons.
    pub failures: Vec<OccurrenceFailure>,
}

/// The result of a booking creation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookingOutcome {
    /// A single reservation.
    Single(Box<Booking>),
    /// A membership series with per-occurrence results.
    Series(SeriesOutcome),
}

/// The result of a cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CancellationOutcome {
    /// The cancelled booking.
    pub booking: Booking,
    /// Refund issued, in minor currency units.
    pub refund_amount: i64,
}

/// Owns the booking state machine and its audit history.
#[derive(Debug, Clone)]
pub struct BookingService {
    booking_repo: Arc<BookingRepository>,
    field_repo: Arc<FieldRepository>,
    stadium_repo: Arc<StadiumRepository>,
    staff_repo: Arc<StaffRepository>,
    payment_repo: Arc<PaymentRepository>,
    history_repo: Arc<HistoryRepository>,
    availability: Arc<AvailabilityChecker>,
    pricing: PricingResolver,
    matcher: StaffMatcher,
    series: SeriesGenerator,
    policy: CancellationPolicy,
    /// Hours a pending booking may remain unpaid before the expiry
    /// sweep cancels it. Zero disables the sweep.
    pending_hold_hours: i64,
}

impl BookingService {
    /// Creates the booking service.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        booking_repo: Arc<BookingRepository>,
        field_repo: Arc<FieldRepository>,
        stadium_repo: Arc<StadiumRepository>,
        staff_repo: Arc<StaffRepository>,
        payment_repo: Arc<PaymentRepository>,
        history_repo: Arc<HistoryRepository>,
        availability: Arc<AvailabilityChecker>,
        config: &BookingConfig,
    ) -> Self {
        Self {
            booking_repo,
            field_repo,
            stadium_repo,
            staff_repo,
            payment_repo,
            history_repo,
            availability,
            pricing: PricingResolver::new(config),
            matcher: StaffMatcher::new(),
            series: SeriesGenerator::new(config),
            policy: CancellationPolicy::new(config),
            pending_hold_hours: config.pending_payment_hold_hours,
        }
    }

    // ── Creation ───────────────────────────────────────────

    /// Create a booking from either request shape.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        request: BookingRequest,
    ) -> AppResult<BookingOutcome> {
        match request {
            BookingRequest::Regular(req) => self
                .create_regular(ctx, req)
                .await
                .map(|b| BookingOutcome::Single(Box::new(b))),
            BookingRequest::Membership(req) => self
                .create_membership(ctx, req)
                .await
                .map(BookingOutcome::Series),
        }
    }

    /// Create a single reservation.
    pub async fn create_regular(
        &self,
        ctx: &RequestContext,
        request: RegularBookingRequest,
    ) -> AppResult<Booking> {
        let user_id = self.require_actor(ctx)?;
        let range = request.validate()?;
        let (_, field) = self.load_bookable(request.stadium_id, request.field_id).await?;

        if !self
            .availability
            .is_available(&field, request.booking_date, range, None)
            .await?
        {
            return Err(AppError::slot_conflict(format!(
                "Field '{}' is not available on {} {}",
                field.name, request.booking_date, range
            )));
        }

        let price = self.pricing.price_window(&field, request.booking_date, range)?;
        let booking = self.build_booking(
            user_id,
            &field,
            request.booking_date,
            range,
            request.booking_type.unwrap_or(BookingType::Regular),
            PricingBreakdown::new(price.total, price.base_rate, price.applied_tier, &field.currency),
            None,
            request.team_name,
            request.special_requests,
        );

        let booking = self.booking_repo.insert_reserving_slot(&booking).await?;
        self.availability.invalidate(&field, booking.booking_date).await;
        self.append_history(ctx, &booking, "booking.created", None, Some(snapshot(&booking)), None)
            .await?;

        info!(
            booking_number = %booking.booking_number,
            field = %field.name,
            date = %booking.booking_date,
            "Booking created"
        );
        Ok(booking)
    }

    /// Expand a membership request and reserve each occurrence.
    ///
    /// Occurrences are independent atomic writes; one lost slot becomes
    /// a recorded failure, never an abort. The membership counters on
    /// the persisted occurrences reflect only the persisted subset.
    pub async fn create_membership(
        &self,
        ctx: &RequestContext,
        request: MembershipBookingRequest,
    ) -> AppResult<SeriesOutcome> {
        let user_id = self.require_actor(ctx)?;
        let range = request.validate()?;
        let (_, field) = self.load_bookable(request.stadium_id, request.field_id).await?;

        let dates = self.series.occurrence_dates(&request)?;
        let membership_id = MembershipId::new();
        let mut occurrences: Vec<Booking> = Vec::new();
        let mut failures: Vec<OccurrenceFailure> = Vec::new();

        for date in dates {
            if !self.availability.is_available(&field, date, range, None).await? {
                failures.push(OccurrenceFailure {
                    date,
                    reason: "Slot is not available".to_string(),
                });
                continue;
            }

            let price = self.pricing.price_window(&field, date, range)?;
            let membership = MembershipInfo {
                membership_id,
                pattern: request.recurrence_pattern,
                day_of_week: request.day_of_week,
                total_occurrences: 0,
                completed_occurrences: 0,
                next_booking_date: None,
                is_active: true,
            };
            let candidate = self.build_booking(
                user_id,
                &field,
                date,
                range,
                BookingType::Membership,
                PricingBreakdown::new(
                    price.total,
                    price.base_rate,
                    price.applied_tier,
                    &field.currency,
                ),
                Some(membership),
                request.team_name.clone(),
                None,
            );

            match self.booking_repo.insert_reserving_slot(&candidate).await {
                Ok(booking) => {
                    self.availability.invalidate(&field, date).await;
                    occurrences.push(booking);
                }
                Err(e) if e.is_slot_conflict() => {
                    failures.push(OccurrenceFailure {
                        date,
                        reason: e.message.clone(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        // Second pass: the counters describe the persisted subset, which
        // is only known once every occurrence has been attempted. The
        // occurrences are already reserved at this point, so a failure
        // here must not turn the partial success into an apparent full
        // failure for the caller.
        let total = occurrences.len() as u32;
        let persisted_dates: Vec<NaiveDate> = occurrences.iter().map(|b| b.booking_date).collect();
        for (index, booking) in occurrences.iter_mut().enumerate() {
            if let Some(membership) = booking.membership.as_mut() {
                membership.total_occurrences = total;
                membership.next_booking_date = persisted_dates.get(index + 1).copied();
            }
            match self.booking_repo.update_transition(booking).await {
                Ok(updated) => *booking = updated,
                Err(e) => {
                    warn!(
                        booking_number = %booking.booking_number,
                        error = %e,
                        "Failed to persist membership counters; occurrence stays reserved"
                    );
                    continue;
                }
            }
            if let Err(e) = self
                .append_history(ctx, booking, "booking.created", None, Some(snapshot(booking)), None)
                .await
            {
                warn!(
                    booking_number = %booking.booking_number,
                    error = %e,
                    "Failed to append membership history entry"
                );
            }
        }

        info!(
            membership_id = %membership_id,
            persisted = occurrences.len(),
            failed = failures.len(),
            "Membership series expanded"
        );
        Ok(SeriesOutcome {
            membership_id,
            occurrences,
            failures,
        })
    }

    // ── Transitions ────────────────────────────────────────

    /// Confirm a pending booking.
    pub async fn confirm(&self, ctx: &RequestContext, id: BookingId) -> AppResult<Booking> {
        let mut booking = self.authorized_booking(ctx, id).await?;
        self.transition(&mut booking, BookingStatus::Confirmed)?;
        let before = snapshot(&booking);
        let booking = self.booking_repo.update_transition(&booking).await?;
        self.append_history(ctx, &booking, "booking.confirmed", Some(before), Some(snapshot(&booking)), None)
            .await?;
        Ok(booking)
    }

    /// Cancel a booking, applying the cancellation policy.
    pub async fn cancel(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        reason: Option<String>,
    ) -> AppResult<CancellationOutcome> {
        let booking = self.authorized_booking(ctx, id).await?;
        let stadium = self.stadium_repo.get(booking.stadium_id).await?;
        let decision = self
            .policy
            .evaluate(&booking, ctx.role, stadium.tz()?, ctx.request_time)?;

        match decision.denial {
            Some(CancellationDenial::AlreadyTerminal(status)) => {
                return Err(AppError::policy(format!(
                    "Booking {} is already {status} and cannot be cancelled",
                    booking.booking_number
                )));
            }
            Some(CancellationDenial::WithinCutoff { cutoff_hours, .. }) => {
                return Err(AppError::authorization(format!(
                    "Bookings may not be cancelled within {cutoff_hours} hours of their start time"
                )));
            }
            None => {}
        }

        let outcome = self
            .apply_cancellation(ctx, booking, reason, decision.refund_amount)
            .await?;
        info!(
            booking_number = %outcome.booking.booking_number,
            refund = outcome.refund_amount,
            "Booking cancelled"
        );
        Ok(outcome)
    }

    /// Move a booking to a new slot in place, preserving its history.
    pub async fn reschedule(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        new_date: NaiveDate,
        new_range: TimeRange,
    ) -> AppResult<Booking> {
        let booking = self.authorized_booking(ctx, id).await?;
        if booking.status.is_terminal() {
            return Err(AppError::policy(format!(
                "Booking {} is {} and cannot be rescheduled",
                booking.booking_number, booking.status
            )));
        }
        let field = self.field_repo.get(booking.field_id).await?;

        if !self
            .availability
            .is_available(&field, new_date, new_range, Some(id))
            .await?
        {
            return Err(AppError::slot_conflict(format!(
                "Field '{}' is not available on {new_date} {new_range}",
                field.name
            )));
        }

        let before = snapshot(&booking);
        let old_date = booking.booking_date;

        // Reprice for the new window, keeping staff charges and discounts.
        let price = self.pricing.price_window(&field, new_date, new_range)?;
        let mut moved = booking;
        moved.booking_date = new_date;
        moved.start_time = new_range.start;
        moved.end_time = new_range.end;
        moved.duration_hours = new_range.duration_hours();
        moved.pricing.base_amount = price.total;
        moved.pricing.base_rate = price.base_rate;
        moved.pricing.applied_tier = price.applied_tier;
        moved.pricing.recompute_total();
        moved.payment_status = self.derived_payment_status(&moved).await?;

        // The slot move and the repriced breakdown land in one guarded
        // statement; non-overlap is re-validated atomically and a failure
        // leaves the booking on its original slot with its original price.
        let moved = self.booking_repo.reschedule(&moved).await?;

        self.availability.invalidate(&field, old_date).await;
        self.availability.invalidate(&field, new_date).await;
        self.append_history(ctx, &moved, "booking.rescheduled", Some(before), Some(snapshot(&moved)), None)
            .await?;
        Ok(moved)
    }

    /// Mark a confirmed, elapsed booking as a no-show.
    pub async fn mark_no_show(&self, ctx: &RequestContext, id: BookingId) -> AppResult<Booking> {
        if !ctx.is_privileged() {
            return Err(AppError::authorization(
                "Only staff may mark a booking as a no-show",
            ));
        }
        let mut booking = self.booking_repo.get(id).await?;
        let stadium = self.stadium_repo.get(booking.stadium_id).await?;
        if !booking.has_elapsed(stadium.tz()?, ctx.request_time)? {
            return Err(AppError::policy(format!(
                "Booking {} has not elapsed yet",
                booking.booking_number
            )));
        }
        self.transition(&mut booking, BookingStatus::NoShow)?;
        let before = snapshot(&booking);
        let booking = self.booking_repo.update_transition(&booking).await?;
        self.invalidate_for(&booking).await;
        self.append_history(ctx, &booking, "booking.no_show", Some(before), Some(snapshot(&booking)), None)
            .await?;
        Ok(booking)
    }

    // ── Payments and pricing mutations ─────────────────────

    /// Record a settled payment and re-derive the payment status.
    pub async fn record_payment(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        payment: CreatePayment,
    ) -> AppResult<Booking> {
        let mut booking = self.authorized_booking(ctx, id).await?;
        if booking.status == BookingStatus::Cancelled {
            return Err(AppError::policy(format!(
                "Booking {} is cancelled and no longer accepts payments",
                booking.booking_number
            )));
        }
        if payment.amount <= 0 {
            return Err(AppError::validation("Payment amount must be positive"));
        }

        self.payment_repo
            .insert(booking.id, &booking.pricing.currency, &payment)
            .await?;
        let before = snapshot(&booking);
        booking.payment_status = self.derived_payment_status(&booking).await?;
        let booking = self.booking_repo.update_transition(&booking).await?;
        self.append_history(
            ctx,
            &booking,
            "payment.recorded",
            Some(before),
            Some(snapshot(&booking)),
            Some(format!("{} via {}", payment.amount, payment.method)),
        )
        .await?;
        Ok(booking)
    }

    /// Apply a discount. The code is the idempotency key; resubmission
    /// is rejected rather than double-applied.
    pub async fn apply_discount(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        discount: Discount,
    ) -> AppResult<Booking> {
        if !ctx.is_privileged() {
            return Err(AppError::authorization("Only staff may apply discounts"));
        }
        let mut booking = self.booking_repo.get(id).await?;
        if booking.status.is_terminal() {
            return Err(AppError::policy(format!(
                "Booking {} is {} and can no longer be discounted",
                booking.booking_number, booking.status
            )));
        }

        let before = snapshot(&booking);
        let code = discount.code.clone();
        booking.pricing.apply_discount(discount)?;
        booking.payment_status = self.derived_payment_status(&booking).await?;
        let booking = self.booking_repo.update_transition(&booking).await?;
        self.append_history(
            ctx,
            &booking,
            "discount.applied",
            Some(before),
            Some(snapshot(&booking)),
            Some(code),
        )
        .await?;
        Ok(booking)
    }

    /// Auto-assign the first available staff member of `role` to the
    /// booking, charging `hours x hourly rate`.
    ///
    /// The matcher only checks declared availability; staff already
    /// attached to another live booking overlapping the window are
    /// filtered out here.
    pub async fn assign_staff(
        &self,
        ctx: &RequestContext,
        id: BookingId,
        role: StaffRole,
    ) -> AppResult<Booking> {
        if !ctx.is_privileged() {
            return Err(AppError::authorization("Only staff may assign personnel"));
        }
        let mut booking = self.booking_repo.get(id).await?;
        if booking.status.is_terminal() {
            return Err(AppError::policy(format!(
                "Booking {} is {} and can no longer be staffed",
                booking.booking_number, booking.status
            )));
        }

        let roster = self
            .staff_repo
            .find_by_stadium_role(booking.stadium_id, role)
            .await?;
        let busy = self.busy_staff(&booking).await?;
        let range = booking.time_range();

        let pick = self
            .matcher
            .find_available(&roster, booking.booking_date, &range, role)
            .into_iter()
            .find(|s| !busy.contains(&s.id))
            .ok_or_else(|| {
                AppError::not_found(format!(
                    "No available {role} found for {} {}",
                    booking.booking_date, range
                ))
            })?;

        let charge = self.matcher.assignment_charge(pick, &range);
        let before = snapshot(&booking);
        booking.assigned_staff.push(AssignedStaff {
            staff_id: pick.id,
            name: pick.name.clone(),
            role: pick.role,
            charge,
        });
        booking.pricing.add_staff_charge(charge);
        booking.payment_status = self.derived_payment_status(&booking).await?;
        let booking = self.booking_repo.update_transition(&booking).await?;
        self.append_history(
            ctx,
            &booking,
            "staff.assigned",
            Some(before),
            Some(snapshot(&booking)),
            Some(pick.name.clone()),
        )
        .await?;
        Ok(booking)
    }

    // ── Scheduled sweeps ───────────────────────────────────

    /// Mark every live booking whose window has fully elapsed as
    /// completed. Idempotent; invoked by the scheduler.
    pub async fn sweep_elapsed_bookings(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let ctx = RequestContext::system();
        let candidates = self
            .booking_repo
            .find_sweep_candidates(now.date_naive())
            .await?;
        let mut zones: HashMap<_, chrono_tz::Tz> = HashMap::new();
        let mut completed = 0u64;

        for mut booking in candidates {
            let tz = match zones.entry(booking.stadium_id) {
                std::collections::hash_map::Entry::Occupied(e) => *e.get(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    let stadium = self.stadium_repo.get(booking.stadium_id).await?;
                    *e.insert(stadium.tz()?)
                }
            };
            if !booking.has_elapsed(tz, now)? {
                continue;
            }
            let before = snapshot(&booking);
            if let Err(e) = self.transition(&mut booking, BookingStatus::Completed) {
                warn!(booking_number = %booking.booking_number, error = %e, "Sweep skipped booking");
                continue;
            }
            if let Some(membership) = booking.membership.as_mut() {
                membership.completed_occurrences += 1;
            }
            let booking = self.booking_repo.update_transition(&booking).await?;
            self.invalidate_for(&booking).await;
            self.append_history(&ctx, &booking, "booking.completed", Some(before), Some(snapshot(&booking)), None)
                .await?;
            completed += 1;
        }

        if completed > 0 {
            info!(completed, "Elapsed bookings swept");
        }
        Ok(completed)
    }

    /// Cancel pending bookings that stayed unpaid past the configured
    /// hold window. Idempotent; invoked by the scheduler.
    pub async fn expire_unpaid_pending(&self, now: DateTime<Utc>) -> AppResult<u64> {
        if self.pending_hold_hours <= 0 {
            return Ok(0);
        }
        let ctx = RequestContext::system();
        let cutoff = now - Duration::hours(self.pending_hold_hours);
        let expired = self.booking_repo.find_expired_pending(cutoff).await?;
        let mut cancelled = 0u64;

        for booking in expired {
            self.apply_cancellation(
                &ctx,
                booking,
                Some("Pending payment hold expired".to_string()),
                0,
            )
            .await?;
            cancelled += 1;
        }

        if cancelled > 0 {
            info!(cancelled, "Unpaid pending bookings expired");
        }
        Ok(cancelled)
    }

    // ── Reads ──────────────────────────────────────────────

    /// Fetch a booking, enforcing ownership for ordinary users.
    pub async fn get(&self, ctx: &RequestContext, id: BookingId) -> AppResult<Booking> {
        self.authorized_booking(ctx, id).await
    }

    /// A user's bookings, newest first.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        user_id: UserId,
        page: PageRequest,
    ) -> AppResult<PageResponse<Booking>> {
        if !ctx.is_privileged() && ctx.actor_id != Some(user_id) {
            return Err(AppError::authorization(
                "You may only list your own bookings",
            ));
        }
        let items = self.booking_repo.find_by_user(user_id, &page).await?;
        let total = self.booking_repo.count_by_user(user_id).await?;
        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    /// A booking's ordered audit trail.
    pub async fn history(
        &self,
        ctx: &RequestContext,
        id: BookingId,
    ) -> AppResult<Vec<BookingHistoryEntry>> {
        self.authorized_booking(ctx, id).await?;
        self.history_repo.find_by_booking(id).await
    }

    // ── Internals ──────────────────────────────────────────

    fn require_actor(&self, ctx: &RequestContext) -> AppResult<UserId> {
        ctx.actor_id
            .ok_or_else(|| AppError::authorization("A booking needs an acting user"))
    }

    /// Fetch a booking and verify the actor may act on it.
    async fn authorized_booking(
        &self,
        ctx: &RequestContext,
        id: BookingId,
    ) -> AppResult<Booking> {
        let booking = self.booking_repo.get(id).await?;
        if !ctx.is_privileged() && ctx.actor_id != Some(booking.user_id) {
            return Err(AppError::authorization(format!(
                "Booking {} belongs to another user",
                booking.booking_number
            )));
        }
        Ok(booking)
    }

    /// Load a stadium/field pair and verify both accept bookings.
    async fn load_bookable(
        &self,
        stadium_id: arena_core::types::StadiumId,
        field_id: arena_core::types::FieldId,
    ) -> AppResult<(Stadium, Field)> {
        let stadium = self.stadium_repo.get(stadium_id).await?;
        if !stadium.is_active {
            return Err(AppError::policy(format!(
                "Stadium '{}' is not accepting bookings",
                stadium.name
            )));
        }
        let field = self.field_repo.get(field_id).await?;
        if field.stadium_id != stadium_id {
            return Err(AppError::validation(format!(
                "Field '{}' does not belong to stadium '{}'",
                field.name, stadium.name
            )));
        }
        if !field.is_active {
            return Err(AppError::policy(format!(
                "Field '{}' is not accepting bookings",
                field.name
            )));
        }
        Ok((stadium, field))
    }

    #[allow(clippy::too_many_arguments)]
    fn build_booking(
        &self,
        user_id: UserId,
        field: &Field,
        date: NaiveDate,
        range: TimeRange,
        booking_type: BookingType,
        pricing: PricingBreakdown,
        membership: Option<MembershipInfo>,
        team_name: Option<String>,
        special_requests: Option<String>,
    ) -> Booking {
        let now = Utc::now();
        Booking {
            id: BookingId::new(),
            booking_number: generate_booking_number(date),
            user_id,
            stadium_id: field.stadium_id,
            field_id: field.id,
            booking_date: date,
            start_time: range.start,
            end_time: range.end,
            duration_hours: range.duration_hours(),
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            booking_type,
            pricing,
            membership,
            assigned_staff: Vec::new(),
            cancellation: None,
            team_name,
            special_requests,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check and apply a status transition in memory.
    fn transition(&self, booking: &mut Booking, next: BookingStatus) -> AppResult<()> {
        if !booking.status.can_transition_to(next) {
            return Err(AppError::policy(format!(
                "Booking {} cannot move from {} to {next}",
                booking.booking_number, booking.status
            )));
        }
        booking.status = next;
        Ok(())
    }

    /// Set a booking cancelled, record the refund, and free the slot.
    async fn apply_cancellation(
        &self,
        ctx: &RequestContext,
        mut booking: Booking,
        reason: Option<String>,
        refund_amount: i64,
    ) -> AppResult<CancellationOutcome> {
        let before = snapshot(&booking);
        self.transition(&mut booking, BookingStatus::Cancelled)?;
        booking.cancellation = Some(CancellationRecord {
            cancelled_by: ctx.actor_id,
            actor_role: ctx.role,
            reason: reason.clone(),
            refund_amount,
            cancelled_at: ctx.request_time,
        });
        if refund_amount > 0 {
            self.payment_repo
                .insert(
                    booking.id,
                    &booking.pricing.currency,
                    &CreatePayment {
                        amount: refund_amount,
                        method: "refund".to_string(),
                        status: PaymentRecordStatus::Refunded,
                        reference: None,
                    },
                )
                .await?;
            booking.payment_status = PaymentStatus::Refunded;
        }
        if let Some(membership) = booking.membership.as_mut() {
            // Cancelling one occurrence never cancels the others.
            membership.is_active = false;
        }

        let booking = self.booking_repo.update_transition(&booking).await?;
        self.invalidate_for(&booking).await;
        self.append_history(ctx, &booking, "booking.cancelled", Some(before), Some(snapshot(&booking)), reason)
            .await?;
        Ok(CancellationOutcome {
            booking,
            refund_amount,
        })
    }

    /// Payment status derived from the settled payment sum versus the
    /// current total. Never set independently.
    async fn derived_payment_status(&self, booking: &Booking) -> AppResult<PaymentStatus> {
        if booking.payment_status == PaymentStatus::Refunded {
            return Ok(PaymentStatus::Refunded);
        }
        let paid = self.payment_repo.sum_completed(booking.id).await?;
        if paid >= booking.pricing.total_amount {
            return Ok(PaymentStatus::Paid);
        }
        // A failed attempt with nothing settled reads as failed.
        let records = self.payment_repo.find_by_booking(booking.id).await?;
        match records.last() {
            Some(last) if paid == 0 && last.status == PaymentRecordStatus::Failed => {
                Ok(PaymentStatus::Failed)
            }
            _ => Ok(PaymentStatus::Pending),
        }
    }

    /// Staff attached to another live booking overlapping this window.
    async fn busy_staff(&self, booking: &Booking) -> AppResult<HashSet<StaffId>> {
        let range = booking.time_range();
        let others = self
            .booking_repo
            .find_live_by_stadium_date(booking.stadium_id, booking.booking_date)
            .await?;
        Ok(others
            .iter()
            .filter(|b| b.id != booking.id && b.time_range().overlaps(&range))
            .flat_map(|b| b.assigned_staff.iter().map(|s| s.staff_id))
            .collect())
    }

    async fn invalidate_for(&self, booking: &Booking) {
        if let Ok(field) = self.field_repo.get(booking.field_id).await {
            self.availability.invalidate(&field, booking.booking_date).await;
        }
    }

    async fn append_history(
        &self,
        ctx: &RequestContext,
        booking: &Booking,
        action: &str,
        before_state: Option<serde_json::Value>,
        after_state: Option<serde_json::Value>,
        notes: Option<String>,
    ) -> AppResult<()> {
        self.history_repo
            .append(&CreateHistoryEntry {
                booking_id: booking.id,
                action: action.to_string(),
                actor_id: ctx.actor_id,
                actor_role: ctx.role,
                before_state,
                after_state,
                notes,
            })
            .await?;
        Ok(())
    }
}

/// Snapshot of the fields mutated by transitions, for history entries.
fn snapshot(booking: &Booking) -> serde_json::Value {
    serde_json::json!({
        "status": booking.status,
        "payment_status": booking.payment_status,
        "booking_date": booking.booking_date,
        "start_time": booking.start_time,
        "end_time": booking.end_time,
        "total_amount": booking.pricing.total_amount,
        "assigned_staff": booking.assigned_staff.len(),
    })
}

/// Human-readable unique booking reference: `BK-YYYYMMDD-XXXXXX`.
fn generate_booking_number(date: NaiveDate) -> String {
    let suffix: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(6)
        .map(|b| (b as char).to_ascii_uppercase())
        .collect();
    format!("BK-{}-{suffix}", date.format("%Y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_number_shape() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let number = generate_booking_number(date);
        assert!(number.starts_with("BK-20251201-"));
        assert_eq!(number.len(), "BK-20251201-".len() + 6);
        assert!(
            number["BK-20251201-".len()..]
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_booking_numbers_are_random() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 1).unwrap();
        let a = generate_booking_number(date);
        let b = generate_booking_number(date);
        assert_ne!(a, b);
    }
}
