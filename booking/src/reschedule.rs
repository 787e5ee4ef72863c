//! Reschedule negotiation: a partner proposes a new date/slot on a confirmed
//! booking, the customer accepts or rejects.
//!
//! The proposal snapshots the booking's current date/slot as a rollback
//! anchor. While the negotiation is open the original slot stays held, so no
//! third party can claim it mid-negotiation; the proposed slot is only
//! claimed at acceptance time, after re-validating it is still free.

use crate::error::BookingError;
use crate::slots::SlotKey;
use crate::types::{Booking, RescheduleProposal, RescheduleStatus, TimeSlot};
use chrono::NaiveDate;

/// Opens a proposal on the booking, snapshotting the current date/slot.
///
/// The caller is responsible for the status transition itself; this only
/// manages the sub-value.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] if a proposal is already
/// outstanding, or [`BookingError::Validation`] if the proposal changes
/// nothing.
pub(crate) fn open(
    booking: &mut Booking,
    proposed_date: NaiveDate,
    proposed_slot: TimeSlot,
    reason: String,
) -> Result<(), BookingError> {
    if let Some(existing) = &booking.reschedule {
        if existing.status == RescheduleStatus::Requested {
            return Err(BookingError::invalid_transition(
                "reschedule:requested",
                "propose-reschedule",
            ));
        }
    }

    if proposed_date == booking.date && proposed_slot == booking.slot {
        return Err(BookingError::validation(
            "proposed date and slot are identical to the current booking",
        ));
    }

    booking.reschedule = Some(RescheduleProposal {
        status: RescheduleStatus::Requested,
        proposed_date,
        proposed_slot,
        original_date: booking.date,
        original_slot: booking.slot,
        reason,
    });

    Ok(())
}

/// The proposal awaiting a response, if one is open.
pub(crate) fn outstanding(booking: &Booking) -> Result<&RescheduleProposal, BookingError> {
    booking
        .reschedule
        .as_ref()
        .filter(|proposal| proposal.status == RescheduleStatus::Requested)
        .ok_or_else(|| {
            BookingError::invalid_transition(booking.status, "respond-to-reschedule")
        })
}

/// Commits an accepted proposal: the booking moves to the proposed date/slot.
///
/// Returns `(released, acquired)` — the slot key the booking gives up and
/// the one it now claims — for the caller to mirror into the ledger.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] if no proposal is awaiting a
/// response.
pub(crate) fn accept(booking: &mut Booking) -> Result<(SlotKey, SlotKey), BookingError> {
    let proposal = outstanding(booking)?.clone();

    let released = SlotKey::new(
        booking.service_id,
        proposal.original_date,
        proposal.original_slot,
    );
    booking.date = proposal.proposed_date;
    booking.slot = proposal.proposed_slot;
    booking.reschedule = None;

    Ok((released, booking.slot_key()))
}

/// Discards a proposal: the original date/slot stand untouched.
///
/// # Errors
///
/// Returns [`BookingError::InvalidTransition`] if no proposal is awaiting a
/// response.
pub(crate) fn reject(booking: &mut Booking) -> Result<(), BookingError> {
    let proposal = outstanding(booking)?.clone();

    booking.date = proposal.original_date;
    booking.slot = proposal.original_slot;
    booking.reschedule = None;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::{ServiceCategory, ServiceOffering};
    use crate::types::{BookingId, CustomerId, Money, PartnerId, ServiceId};
    use chrono::Utc;

    fn confirmed_booking() -> Booking {
        let service = ServiceOffering {
            id: ServiceId::new(),
            partner_id: PartnerId::new(),
            name: "Stage lighting".to_string(),
            category: ServiceCategory::Decoration,
            price: Money::from_units(300),
            discount_percent: 0,
            duration_hours: 2,
        };
        let mut booking = Booking::new(
            BookingId::new(),
            CustomerId::new(),
            &service,
            "Dana".to_string(),
            "+15550100".to_string(),
            NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            TimeSlot::TenToTwelve,
            Utc::now(),
        );
        booking.status = crate::types::BookingStatus::Confirmed;
        booking
    }

    #[test]
    fn open_snapshots_the_rollback_anchor() {
        let mut booking = confirmed_booking();
        let proposed = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        open(
            &mut booking,
            proposed,
            TimeSlot::FourteenToSixteen,
            "double booked crew".to_string(),
        )
        .unwrap();

        let proposal = booking.reschedule.as_ref().unwrap();
        assert_eq!(proposal.original_date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(proposal.original_slot, TimeSlot::TenToTwelve);
        assert_eq!(proposal.proposed_date, proposed);
        // The booking itself has not moved yet.
        assert_eq!(booking.slot, TimeSlot::TenToTwelve);
    }

    #[test]
    fn second_open_while_requested_is_refused() {
        let mut booking = confirmed_booking();
        let proposed = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        open(&mut booking, proposed, TimeSlot::FourteenToSixteen, String::new()).unwrap();

        let again = open(&mut booking, proposed, TimeSlot::SixteenToEighteen, String::new());
        assert!(matches!(again, Err(BookingError::InvalidTransition { .. })));
    }

    #[test]
    fn reject_restores_exactly_the_original() {
        let mut booking = confirmed_booking();
        let original_date = booking.date;
        let original_slot = booking.slot;

        open(
            &mut booking,
            NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(),
            TimeSlot::FourteenToSixteen,
            String::new(),
        )
        .unwrap();
        reject(&mut booking).unwrap();

        assert_eq!(booking.date, original_date);
        assert_eq!(booking.slot, original_slot);
        assert!(booking.reschedule.is_none());
    }

    #[test]
    fn accept_moves_the_booking_and_reports_both_keys() {
        let mut booking = confirmed_booking();
        let proposed_date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        open(&mut booking, proposed_date, TimeSlot::FourteenToSixteen, String::new()).unwrap();
        let (released, acquired) = accept(&mut booking).unwrap();

        assert_eq!(released.date, NaiveDate::from_ymd_opt(2025, 1, 10).unwrap());
        assert_eq!(released.slot, TimeSlot::TenToTwelve);
        assert_eq!(acquired.date, proposed_date);
        assert_eq!(acquired.slot, TimeSlot::FourteenToSixteen);
        assert_eq!(booking.date, proposed_date);
        assert!(booking.reschedule.is_none());
    }

    #[test]
    fn respond_without_open_proposal_is_refused() {
        let mut booking = confirmed_booking();
        assert!(matches!(
            reject(&mut booking),
            Err(BookingError::InvalidTransition { .. })
        ));
    }
}
