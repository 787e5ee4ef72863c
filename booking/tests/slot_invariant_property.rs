//! Property test: no action sequence can break slot exclusivity.
//!
//! Random command streams are driven through the reducer; after every step
//! the ledger must mirror exactly the slot claims of active bookings, and no
//! slot key may be claimed by more than one active booking.

#![allow(clippy::unwrap_used)]

use booking::{
    BookingAction, BookingEnvironment, BookingReducer, InMemoryServiceDirectory,
    RecordingNotifier, ServiceCategory, ServiceOffering, SlotKey,
    types::{Actor, BookingId, BookingState, Money, PartnerId, ServiceId, TimeSlot},
};
use chrono::NaiveDate;
use proptest::prelude::*;
use slotbook_core::reducer::Reducer;
use slotbook_testing::test_clock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

/// One randomly generated command against the engine.
#[derive(Debug, Clone)]
enum Step {
    Create { date: u8, slot: u8 },
    Assign { idx: u8 },
    Accept { idx: u8 },
    MarkPaid { idx: u8 },
    Verify { idx: u8 },
    CancelByPartner { idx: u8 },
    CancelByCustomer { idx: u8 },
    Complete { idx: u8 },
    Propose { idx: u8, date: u8, slot: u8 },
    Respond { idx: u8, accept: bool },
    Reject { idx: u8 },
}

fn step_strategy() -> impl Strategy<Value = Step> {
    prop_oneof![
        (0u8..3, 0u8..6).prop_map(|(date, slot)| Step::Create { date, slot }),
        (0u8..8).prop_map(|idx| Step::Assign { idx }),
        (0u8..8).prop_map(|idx| Step::Accept { idx }),
        (0u8..8).prop_map(|idx| Step::MarkPaid { idx }),
        (0u8..8).prop_map(|idx| Step::Verify { idx }),
        (0u8..8).prop_map(|idx| Step::CancelByPartner { idx }),
        (0u8..8).prop_map(|idx| Step::CancelByCustomer { idx }),
        (0u8..8).prop_map(|idx| Step::Complete { idx }),
        (0u8..8, 0u8..3, 0u8..6).prop_map(|(idx, date, slot)| Step::Propose { idx, date, slot }),
        (0u8..8, any::<bool>()).prop_map(|(idx, accept)| Step::Respond { idx, accept }),
        (0u8..8).prop_map(|idx| Step::Reject { idx }),
    ]
}

fn date(offset: u8) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 2, 10 + u32::from(offset)).unwrap()
}

fn slot(index: u8) -> TimeSlot {
    TimeSlot::ALL[usize::from(index) % TimeSlot::ALL.len()]
}

/// The ledger must hold exactly one entry per active booking, under that
/// booking's current slot key.
fn assert_ledger_mirrors_active_set(state: &BookingState) {
    let mut expected: HashMap<SlotKey, Vec<BookingId>> = HashMap::new();
    for booking in state.bookings.values() {
        if booking.status.is_active() {
            expected.entry(booking.slot_key()).or_default().push(booking.id);
        }
    }

    for (key, holders) in &expected {
        assert_eq!(
            holders.len(),
            1,
            "slot {key} claimed by {} active bookings",
            holders.len()
        );
        assert_eq!(state.ledger.holder(key), Some(holders[0]));
    }
    assert_eq!(state.ledger.len(), expected.len());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_command_stream_preserves_slot_exclusivity(steps in prop::collection::vec(step_strategy(), 1..80)) {
        let partner_user = Uuid::from_u128(1);
        let customer_user = Uuid::from_u128(2);
        let admin = Actor::admin(Uuid::from_u128(3));
        let service = ServiceOffering {
            id: ServiceId::from_uuid(Uuid::from_u128(10)),
            partner_id: PartnerId::from_uuid(partner_user),
            name: "Venue decoration".to_string(),
            category: ServiceCategory::Decoration,
            price: Money::from_units(200),
            discount_percent: 0,
            duration_hours: 2,
        };
        let env = BookingEnvironment::new(
            Arc::new(test_clock()),
            Arc::new(InMemoryServiceDirectory::new().with_service(service.clone())),
            Arc::new(RecordingNotifier::new()),
        );
        let reducer = BookingReducer::new();
        let mut state = BookingState::new();
        let mut created: Vec<BookingId> = Vec::new();

        let pick = |created: &[BookingId], idx: u8| -> Option<BookingId> {
            if created.is_empty() {
                None
            } else {
                Some(created[usize::from(idx) % created.len()])
            }
        };

        for step in steps {
            let action = match step {
                Step::Create { date: d, slot: s } => {
                    let booking_id = BookingId::new();
                    created.push(booking_id);
                    Some(BookingAction::CreateBooking {
                        actor: Actor::customer(customer_user),
                        booking_id,
                        service_id: service.id,
                        contact_name: "Prop".to_string(),
                        contact_mobile: "+1 555 0100".to_string(),
                        date: date(d),
                        slot: slot(s),
                    })
                },
                Step::Assign { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::Assign { actor: admin, booking_id }
                }),
                Step::Accept { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::AcceptAssignment {
                        actor: Actor::partner(partner_user),
                        booking_id,
                    }
                }),
                Step::MarkPaid { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::MarkPaid {
                        actor: Actor::customer(customer_user),
                        booking_id,
                    }
                }),
                Step::Verify { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::VerifyPayment { actor: admin, booking_id }
                }),
                Step::CancelByPartner { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::Cancel {
                        actor: Actor::partner(partner_user),
                        booking_id,
                        refund_amount: None,
                    }
                }),
                Step::CancelByCustomer { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::Cancel {
                        actor: Actor::customer(customer_user),
                        booking_id,
                        refund_amount: None,
                    }
                }),
                Step::Complete { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::Complete { actor: admin, booking_id }
                }),
                Step::Propose { idx, date: d, slot: s } => pick(&created, idx).map(|booking_id| {
                    BookingAction::ProposeReschedule {
                        actor: Actor::partner(partner_user),
                        booking_id,
                        proposed_date: date(d),
                        proposed_slot: slot(s),
                        reason: "shift".to_string(),
                    }
                }),
                Step::Respond { idx, accept } => pick(&created, idx).map(|booking_id| {
                    BookingAction::RespondToReschedule {
                        actor: Actor::customer(customer_user),
                        booking_id,
                        accept,
                    }
                }),
                Step::Reject { idx } => pick(&created, idx).map(|booking_id| {
                    BookingAction::RejectRequest {
                        actor: admin,
                        booking_id,
                        reason: "triage".to_string(),
                    }
                }),
            };

            if let Some(action) = action {
                // Refusals are expected constantly here; only the invariant matters.
                let _ = reducer.reduce(&mut state, action, &env);
            }

            assert_ledger_mirrors_active_set(&state);

            // Terminal bookings never claim a slot.
            for booking in state.bookings.values() {
                if booking.status.is_terminal() {
                    prop_assert_ne!(
                        state.ledger.holder(&booking.slot_key()),
                        Some(booking.id)
                    );
                }
            }
        }
    }
}
