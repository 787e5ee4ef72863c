//! Actions for the booking engine.
//!
//! One variant per external operation. Every action carries the acting party
//! explicitly — there is no ambient "current user" — so the engine stays
//! pure and testable without any request context.

use crate::types::{Actor, BookingId, BookingStatus, Money, ServiceId, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Actions for the booking engine
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BookingAction {
    /// Customer requests a new booking; the slot is claimed atomically
    CreateBooking {
        /// The acting party (must be the customer)
        actor: Actor,
        /// Identity for the new booking
        booking_id: BookingId,
        /// The service to book
        service_id: ServiceId,
        /// Contact person for the event
        contact_name: String,
        /// Contact phone number
        contact_mobile: String,
        /// Requested service date
        date: NaiveDate,
        /// Requested time slot
        slot: TimeSlot,
    },

    /// Admin routes the request to the service partner
    Assign {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking to assign
        booking_id: BookingId,
    },

    /// Admin turns the request down at triage
    RejectRequest {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking to reject
        booking_id: BookingId,
        /// Why the request was turned down
        reason: String,
    },

    /// Partner accepts the assignment
    AcceptAssignment {
        /// The acting party (must be the fulfilling partner)
        actor: Actor,
        /// The booking to accept
        booking_id: BookingId,
    },

    /// Partner declines the assignment
    DeclineAssignment {
        /// The acting party (must be the fulfilling partner)
        actor: Actor,
        /// The booking to decline
        booking_id: BookingId,
        /// Why the partner declined
        reason: String,
    },

    /// Customer reports the payment as made
    MarkPaid {
        /// The acting party (must be the customer)
        actor: Actor,
        /// The booking being paid for
        booking_id: BookingId,
    },

    /// Admin confirms the payment arrived
    VerifyPayment {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking whose payment is verified
        booking_id: BookingId,
    },

    /// Admin rejects the payment claim
    RejectPayment {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking whose payment failed verification
        booking_id: BookingId,
        /// Why verification failed
        reason: String,
    },

    /// Calls the booking off; self-cancel for customers on fresh requests,
    /// admin/partner cancel later in the lifecycle
    Cancel {
        /// The acting party
        actor: Actor,
        /// The booking to cancel
        booking_id: BookingId,
        /// Refund amount override when cancelling a paid booking
        refund_amount: Option<Money>,
    },

    /// Admin or partner marks the service as delivered
    Complete {
        /// The acting party
        actor: Actor,
        /// The booking to complete
        booking_id: BookingId,
    },

    /// Partner proposes moving a confirmed booking to a new date/slot
    ProposeReschedule {
        /// The acting party (must be the fulfilling partner)
        actor: Actor,
        /// The booking to move
        booking_id: BookingId,
        /// Proposed new service date
        proposed_date: NaiveDate,
        /// Proposed new time slot
        proposed_slot: TimeSlot,
        /// Why the partner asks to move
        reason: String,
    },

    /// Customer answers an open reschedule proposal
    RespondToReschedule {
        /// The acting party (must be the customer)
        actor: Actor,
        /// The booking with the open proposal
        booking_id: BookingId,
        /// `true` accepts the proposed date/slot, `false` keeps the original
        accept: bool,
    },

    /// Customer asks for their money back on a booking that already ended
    RequestRefund {
        /// The acting party (must be the customer)
        actor: Actor,
        /// The booking to refund
        booking_id: BookingId,
    },

    /// Admin picks a requested refund up for processing
    BeginRefund {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking whose refund is being processed
        booking_id: BookingId,
    },

    /// Admin pays a refund out, optionally overriding the amount
    ProcessRefund {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking whose refund is paid out
        booking_id: BookingId,
        /// Partial amount override; defaults to the recorded refund amount
        amount: Option<Money>,
    },

    /// Audited admin override: force the booking into the given status,
    /// bypassing the transition table
    OverrideStatus {
        /// The acting party (must be an admin)
        actor: Actor,
        /// The booking to override
        booking_id: BookingId,
        /// The status to force
        status: BookingStatus,
        /// Audit note explaining the override
        note: String,
    },
}

impl BookingAction {
    /// The acting party
    #[must_use]
    pub const fn actor(&self) -> Actor {
        match self {
            Self::CreateBooking { actor, .. }
            | Self::Assign { actor, .. }
            | Self::RejectRequest { actor, .. }
            | Self::AcceptAssignment { actor, .. }
            | Self::DeclineAssignment { actor, .. }
            | Self::MarkPaid { actor, .. }
            | Self::VerifyPayment { actor, .. }
            | Self::RejectPayment { actor, .. }
            | Self::Cancel { actor, .. }
            | Self::Complete { actor, .. }
            | Self::ProposeReschedule { actor, .. }
            | Self::RespondToReschedule { actor, .. }
            | Self::RequestRefund { actor, .. }
            | Self::BeginRefund { actor, .. }
            | Self::ProcessRefund { actor, .. }
            | Self::OverrideStatus { actor, .. } => *actor,
        }
    }

    /// The booking the action targets
    #[must_use]
    pub const fn booking_id(&self) -> BookingId {
        match self {
            Self::CreateBooking { booking_id, .. }
            | Self::Assign { booking_id, .. }
            | Self::RejectRequest { booking_id, .. }
            | Self::AcceptAssignment { booking_id, .. }
            | Self::DeclineAssignment { booking_id, .. }
            | Self::MarkPaid { booking_id, .. }
            | Self::VerifyPayment { booking_id, .. }
            | Self::RejectPayment { booking_id, .. }
            | Self::Cancel { booking_id, .. }
            | Self::Complete { booking_id, .. }
            | Self::ProposeReschedule { booking_id, .. }
            | Self::RespondToReschedule { booking_id, .. }
            | Self::RequestRefund { booking_id, .. }
            | Self::BeginRefund { booking_id, .. }
            | Self::ProcessRefund { booking_id, .. }
            | Self::OverrideStatus { booking_id, .. } => *booking_id,
        }
    }

    /// Stable label for logs and errors
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::CreateBooking { .. } => "create-booking",
            Self::Assign { .. } => "assign",
            Self::RejectRequest { .. } => "reject",
            Self::AcceptAssignment { .. } => "accept",
            Self::DeclineAssignment { .. } => "decline",
            Self::MarkPaid { .. } => "mark-paid",
            Self::VerifyPayment { .. } => "verify",
            Self::RejectPayment { .. } => "reject-payment",
            Self::Cancel { .. } => "cancel",
            Self::Complete { .. } => "complete",
            Self::ProposeReschedule { .. } => "propose-reschedule",
            Self::RespondToReschedule { .. } => "respond-to-reschedule",
            Self::RequestRefund { .. } => "request-refund",
            Self::BeginRefund { .. } => "begin-refund",
            Self::ProcessRefund { .. } => "process-refund",
            Self::OverrideStatus { .. } => "override-status",
        }
    }
}
