//! Refund workflow: an independent sub-status progression on a booking.
//!
//! `Requested → Pending → Processed`, valid only on a paid booking. A refund
//! comes into existence either automatically — a paid, confirmed booking
//! cancelled by partner/admin — or on explicit customer request after the
//! booking has already ended in `Cancelled`/`Rejected`. Processing is
//! terminal: reprocessing an already-processed refund is rejected, not
//! silently repeated.

use crate::error::BookingError;
use crate::types::{Booking, Money, Refund, RefundStatus};
use chrono::{DateTime, Utc};

fn refund_state_label(booking: &Booking) -> String {
    booking.refund.as_ref().map_or_else(
        || "no_refund".to_string(),
        |refund| {
            let label = match refund.status {
                RefundStatus::Requested => "requested",
                RefundStatus::Pending => "pending",
                RefundStatus::Processed => "processed",
            };
            format!("refund:{label}")
        },
    )
}

fn validated_amount(booking: &Booking, amount: Option<Money>) -> Result<Money, BookingError> {
    match amount {
        None => Ok(booking.price),
        Some(amount) if amount > booking.price => Err(BookingError::validation(format!(
            "refund amount {amount} exceeds booking price {}",
            booking.price
        ))),
        Some(amount) if amount.is_zero() => {
            Err(BookingError::validation("refund amount must be positive"))
        },
        Some(amount) => Ok(amount),
    }
}

/// Attaches a freshly requested refund to the booking.
///
/// Used by the engine when a paid booking is cancelled; the amount defaults
/// to the booking price unless the cancelling party specifies one.
///
/// # Errors
///
/// Returns [`BookingError::Validation`] on an unpaid booking or a malformed
/// amount, [`BookingError::InvalidTransition`] if a refund already exists.
pub(crate) fn create(booking: &mut Booking, amount: Option<Money>) -> Result<(), BookingError> {
    if !booking.is_paid() {
        return Err(BookingError::validation(
            "refund requires a paid booking",
        ));
    }
    if booking.refund.is_some() {
        return Err(BookingError::invalid_transition(
            refund_state_label(booking),
            "request-refund",
        ));
    }

    let amount = validated_amount(booking, amount)?;
    booking.refund = Some(Refund::requested(amount));
    Ok(())
}

/// Customer-initiated refund request on a booking that already ended.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] unless the booking ended in
/// `Cancelled` or `Rejected` with no refund in flight, or
/// [`BookingError::Validation`] if it was never paid.
pub(crate) fn request(booking: &mut Booking) -> Result<(), BookingError> {
    use crate::types::BookingStatus;

    if !matches!(
        booking.status,
        BookingStatus::Cancelled | BookingStatus::Rejected
    ) {
        return Err(BookingError::invalid_transition(
            booking.status,
            "request-refund",
        ));
    }

    create(booking, None)
}

/// Admin picks the refund up for processing (`Requested → Pending`).
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] unless a refund exists in
/// `Requested`.
pub(crate) fn begin(booking: &mut Booking) -> Result<(), BookingError> {
    let state = refund_state_label(booking);
    match booking.refund.as_mut() {
        Some(refund) if refund.status == RefundStatus::Requested => {
            refund.status = RefundStatus::Pending;
            Ok(())
        },
        _ => Err(BookingError::invalid_transition(state, "begin-refund")),
    }
}

/// Pays the refund out (`Pending → Processed`), recording amount and date.
///
/// The admin may override with a partial amount at this point.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] unless a refund exists in
/// `Pending` (an already-processed refund is not reprocessed), or
/// [`BookingError::Validation`] on a malformed override amount.
pub(crate) fn process(
    booking: &mut Booking,
    amount: Option<Money>,
    now: DateTime<Utc>,
) -> Result<(), BookingError> {
    let state = refund_state_label(booking);
    let final_amount = validated_amount(booking, amount)?;

    match booking.refund.as_mut() {
        Some(refund) if refund.status == RefundStatus::Pending => {
            refund.status = RefundStatus::Processed;
            refund.amount = final_amount;
            refund.processed_date = Some(now);
            Ok(())
        },
        _ => Err(BookingError::invalid_transition(state, "process-refund")),
    }
}
