//! Reducer for the booking engine.
//!
//! All business logic lives here: every action is validated completely —
//! existence, ownership, the transition table, payload checks — before the
//! first mutation, so a refused action leaves the state byte-for-byte
//! unchanged. Mutations are prepared on a working copy of the booking and
//! committed together with the matching ledger updates.

use crate::engine::actions::BookingAction;
use crate::engine::environment::BookingEnvironment;
use crate::engine::transitions::{CommandKind, next_status};
use crate::error::BookingError;
use crate::types::{
    Actor, Booking, BookingId, BookingState, BookingStatus, CustomerId, Money, PaymentStatus,
    RescheduleStatus, Role, ServiceId, TimeSlot,
};
use crate::{refund, reschedule};
use chrono::NaiveDate;
use slotbook_core::{SmallVec, effect::Effect, reducer::Reducer, smallvec};
use std::sync::Arc;
use uuid::Uuid;

/// Effect vector returned by the reducer
type Effects = SmallVec<[Effect<BookingAction>; 4]>;

/// Reducer for the booking engine
#[derive(Clone, Debug, Default)]
pub struct BookingReducer;

impl BookingReducer {
    /// Creates a new `BookingReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn notify(env: &BookingEnvironment, recipient: Uuid, message: String) -> Effect<BookingAction> {
        let notifier = Arc::clone(&env.notifier);
        Effect::future(async move {
            notifier.notify(recipient, message);
            None
        })
    }

    fn require_role(actor: Actor, role: Role) -> Result<(), BookingError> {
        if actor.role == role {
            Ok(())
        } else {
            Err(BookingError::Unauthorized)
        }
    }

    /// Ownership on top of the role table: customers act on their own
    /// bookings, partners on bookings of their services, admins on any.
    fn check_ownership(booking: &Booking, actor: Actor) -> Result<(), BookingError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Customer if booking.is_customer(actor.user_id) => Ok(()),
            Role::Partner if booking.is_partner(actor.user_id) => Ok(()),
            Role::Customer | Role::Partner => Err(BookingError::Unauthorized),
        }
    }

    fn validate_contact(name: &str, mobile: &str) -> Result<(), BookingError> {
        if name.trim().is_empty() {
            return Err(BookingError::validation("contact name must not be empty"));
        }

        let digits = mobile.chars().filter(char::is_ascii_digit).count();
        let well_formed = mobile
            .chars()
            .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | ' '));
        if digits < 7 || !well_formed {
            return Err(BookingError::validation(format!(
                "contact mobile looks malformed: {mobile}"
            )));
        }

        Ok(())
    }

    fn validate_future_date(
        env: &BookingEnvironment,
        date: NaiveDate,
        what: &str,
    ) -> Result<(), BookingError> {
        if date < env.clock.now().date_naive() {
            return Err(BookingError::validation(format!(
                "{what} {date} is in the past"
            )));
        }
        Ok(())
    }

    /// Looks the booking up, checks ownership, and resolves the table row.
    fn prepare(
        state: &BookingState,
        actor: Actor,
        booking_id: BookingId,
        command: CommandKind,
    ) -> Result<BookingStatus, BookingError> {
        let booking = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?;
        Self::check_ownership(booking, actor)?;
        next_status(actor.role, booking.status, command)
    }

    /// Writes the updated booking back and stamps `updated_at`.
    fn commit(state: &mut BookingState, env: &BookingEnvironment, mut updated: Booking) {
        updated.updated_at = env.clock.now();
        state.bookings.insert(updated.id, updated);
    }

    #[allow(clippy::too_many_arguments)]
    fn create(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        service_id: ServiceId,
        contact_name: String,
        contact_mobile: String,
        date: NaiveDate,
        slot: TimeSlot,
    ) -> Result<Effects, BookingError> {
        Self::require_role(actor, Role::Customer)?;

        if state.exists(&booking_id) {
            return Err(BookingError::validation(format!(
                "booking {booking_id} already exists"
            )));
        }

        let service = env
            .services
            .service(service_id)
            .ok_or_else(|| BookingError::not_found(format!("service {service_id}")))?;

        Self::validate_future_date(env, date, "service date")?;
        Self::validate_contact(&contact_name, &contact_mobile)?;

        let booking = Booking::new(
            booking_id,
            CustomerId::from_uuid(actor.user_id),
            &service,
            contact_name,
            contact_mobile,
            date,
            slot,
            env.clock.now(),
        );

        state.ledger.acquire(booking.slot_key(), booking_id)?;
        state.bookings.insert(booking_id, booking);

        Ok(SmallVec::new())
    }

    /// A plain table transition: no payload beyond the status move.
    ///
    /// Releases the slot when the booking leaves the active set.
    fn step(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        command: CommandKind,
    ) -> Result<Booking, BookingError> {
        let to = Self::prepare(state, actor, booking_id, command)?;

        let mut updated = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
            .clone();
        updated.status = to;

        if !to.is_active() {
            state.ledger.release(booking_id);
        }
        Self::commit(state, env, updated.clone());

        Ok(updated)
    }

    fn cancel(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        refund_amount: Option<Money>,
    ) -> Result<Effects, BookingError> {
        let booking = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?;
        Self::check_ownership(booking, actor)?;

        // Cancellation is idempotent: a second cancel neither errors nor
        // creates a second refund.
        if booking.status == BookingStatus::Cancelled {
            return Ok(SmallVec::new());
        }

        let from = booking.status;
        next_status(actor.role, from, CommandKind::Cancel)?;

        let mut updated = booking.clone();
        updated.status = BookingStatus::Cancelled;

        let owed_refund = from == BookingStatus::Confirmed && updated.is_paid();
        if owed_refund {
            refund::create(&mut updated, refund_amount)?;
        } else if refund_amount.is_some() {
            return Err(BookingError::validation(
                "refund amount is only accepted when cancelling a paid, confirmed booking",
            ));
        }

        state.ledger.release(booking_id);
        let customer = *updated.customer_id.as_uuid();
        Self::commit(state, env, updated);

        let effects = if actor.role == Role::Customer {
            SmallVec::new()
        } else {
            smallvec![Self::notify(
                env,
                customer,
                format!("booking {booking_id} was cancelled"),
            )]
        };
        Ok(effects)
    }

    fn propose_reschedule(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        proposed_date: NaiveDate,
        proposed_slot: TimeSlot,
        reason: String,
    ) -> Result<Effects, BookingError> {
        let to = Self::prepare(state, actor, booking_id, CommandKind::ProposeReschedule)?;
        Self::validate_future_date(env, proposed_date, "proposed date")?;

        let mut updated = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
            .clone();
        reschedule::open(&mut updated, proposed_date, proposed_slot, reason)?;
        updated.status = to;

        // The original slot stays held until the customer answers.
        let customer = *updated.customer_id.as_uuid();
        Self::commit(state, env, updated);

        Ok(smallvec![Self::notify(
            env,
            customer,
            format!(
                "reschedule to {proposed_date} {proposed_slot} proposed for booking {booking_id}"
            ),
        )])
    }

    fn respond_to_reschedule(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        accept: bool,
    ) -> Result<Effects, BookingError> {
        let to = Self::prepare(state, actor, booking_id, CommandKind::RespondReschedule)?;

        let mut updated = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
            .clone();

        let outcome = if accept {
            let (released, acquired) = reschedule::accept(&mut updated)?;
            // The proposed slot is re-validated and claimed before the
            // original is given up; a conflict aborts with nothing changed.
            state.ledger.acquire(acquired, booking_id)?;
            state.ledger.release_key(&released);
            "accepted"
        } else {
            reschedule::reject(&mut updated)?;
            "rejected"
        };
        updated.status = to;

        let partner = *updated.partner_id.as_uuid();
        Self::commit(state, env, updated);

        Ok(smallvec![Self::notify(
            env,
            partner,
            format!("reschedule for booking {booking_id} was {outcome}"),
        )])
    }

    fn request_refund(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
    ) -> Result<Effects, BookingError> {
        Self::require_role(actor, Role::Customer)?;

        let booking = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?;
        Self::check_ownership(booking, actor)?;

        let mut updated = booking.clone();
        refund::request(&mut updated)?;
        Self::commit(state, env, updated);

        Ok(SmallVec::new())
    }

    fn begin_refund(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
    ) -> Result<Effects, BookingError> {
        Self::require_role(actor, Role::Admin)?;

        let mut updated = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
            .clone();
        refund::begin(&mut updated)?;
        Self::commit(state, env, updated);

        Ok(SmallVec::new())
    }

    fn process_refund(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        amount: Option<Money>,
    ) -> Result<Effects, BookingError> {
        Self::require_role(actor, Role::Admin)?;

        let mut updated = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
            .clone();
        refund::process(&mut updated, amount, env.clock.now())?;

        let customer = *updated.customer_id.as_uuid();
        let paid_out = updated
            .refund
            .as_ref()
            .map_or(updated.price, |refund| refund.amount);
        Self::commit(state, env, updated);

        Ok(smallvec![Self::notify(
            env,
            customer,
            format!("refund of {paid_out} for booking {booking_id} was processed"),
        )])
    }

    fn override_status(
        state: &mut BookingState,
        env: &BookingEnvironment,
        actor: Actor,
        booking_id: BookingId,
        status: BookingStatus,
    ) -> Result<Effects, BookingError> {
        Self::require_role(actor, Role::Admin)?;

        let booking = state
            .get(&booking_id)
            .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?;

        if booking.status == status {
            return Ok(SmallVec::new());
        }

        let mut updated = booking.clone();
        let was_active = updated.status.is_active();
        updated.status = status;
        // An open proposal cannot outlive the status that carries it.
        if !matches!(status, BookingStatus::RescheduleRequested) {
            if let Some(proposal) = &updated.reschedule {
                if proposal.status == RescheduleStatus::Requested {
                    updated.reschedule = None;
                }
            }
        }

        // The ledger must keep mirroring the active set even across an
        // override, so crossing the boundary releases or re-claims the slot.
        match (was_active, status.is_active()) {
            (true, false) => state.ledger.release(booking_id),
            (false, true) => state.ledger.acquire(updated.slot_key(), booking_id)?,
            _ => {},
        }

        Self::commit(state, env, updated);
        Ok(SmallVec::new())
    }
}

impl Reducer for BookingReducer {
    type State = BookingState;
    type Action = BookingAction;
    type Environment = BookingEnvironment;
    type Error = BookingError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Effects, BookingError> {
        match action {
            BookingAction::CreateBooking {
                actor,
                booking_id,
                service_id,
                contact_name,
                contact_mobile,
                date,
                slot,
            } => Self::create(
                state,
                env,
                actor,
                booking_id,
                service_id,
                contact_name,
                contact_mobile,
                date,
                slot,
            ),

            BookingAction::Assign { actor, booking_id } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Assign)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.partner_id.as_uuid(),
                    format!("booking {booking_id} assigned to you"),
                )])
            },

            BookingAction::RejectRequest {
                actor,
                booking_id,
                reason,
            } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Reject)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.customer_id.as_uuid(),
                    format!("booking {booking_id} was rejected: {reason}"),
                )])
            },

            BookingAction::AcceptAssignment { actor, booking_id } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Accept)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.customer_id.as_uuid(),
                    format!("booking {booking_id} accepted, payment due"),
                )])
            },

            BookingAction::DeclineAssignment {
                actor,
                booking_id,
                reason,
            } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Decline)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.customer_id.as_uuid(),
                    format!("booking {booking_id} was declined: {reason}"),
                )])
            },

            BookingAction::MarkPaid { actor, booking_id } => {
                let to = Self::prepare(state, actor, booking_id, CommandKind::MarkPaid)?;
                let mut updated = state
                    .get(&booking_id)
                    .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?
                    .clone();
                updated.status = to;
                updated.payment_status = PaymentStatus::Paid;
                let partner = *updated.partner_id.as_uuid();
                Self::commit(state, env, updated);

                Ok(smallvec![Self::notify(
                    env,
                    partner,
                    format!("payment reported for booking {booking_id}"),
                )])
            },

            BookingAction::VerifyPayment { actor, booking_id } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Verify)?;
                let customer = *updated.customer_id.as_uuid();
                let partner = *updated.partner_id.as_uuid();
                Ok(smallvec![
                    Self::notify(env, customer, format!("booking {booking_id} is confirmed")),
                    Self::notify(env, partner, format!("booking {booking_id} is confirmed")),
                ])
            },

            BookingAction::RejectPayment {
                actor,
                booking_id,
                reason,
            } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Reject)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.customer_id.as_uuid(),
                    format!("payment for booking {booking_id} was rejected: {reason}"),
                )])
            },

            BookingAction::Cancel {
                actor,
                booking_id,
                refund_amount,
            } => Self::cancel(state, env, actor, booking_id, refund_amount),

            BookingAction::Complete { actor, booking_id } => {
                let updated = Self::step(state, env, actor, booking_id, CommandKind::Complete)?;
                Ok(smallvec![Self::notify(
                    env,
                    *updated.customer_id.as_uuid(),
                    format!("booking {booking_id} completed, thank you"),
                )])
            },

            BookingAction::ProposeReschedule {
                actor,
                booking_id,
                proposed_date,
                proposed_slot,
                reason,
            } => Self::propose_reschedule(
                state,
                env,
                actor,
                booking_id,
                proposed_date,
                proposed_slot,
                reason,
            ),

            BookingAction::RespondToReschedule {
                actor,
                booking_id,
                accept,
            } => Self::respond_to_reschedule(state, env, actor, booking_id, accept),

            BookingAction::RequestRefund { actor, booking_id } => {
                Self::request_refund(state, env, actor, booking_id)
            },

            BookingAction::BeginRefund { actor, booking_id } => {
                Self::begin_refund(state, env, actor, booking_id)
            },

            BookingAction::ProcessRefund {
                actor,
                booking_id,
                amount,
            } => Self::process_refund(state, env, actor, booking_id, amount),

            BookingAction::OverrideStatus {
                actor,
                booking_id,
                status,
                note: _,
            } => Self::override_status(state, env, actor, booking_id, status),
        }
    }
}
