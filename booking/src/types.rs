//! Domain types for the booking coordination core.
//!
//! This module contains the value objects, entities, and state types shared
//! by the slot ledger, lifecycle engine, and stats projection: typed
//! identifiers, money, the fixed time-slot grid, actor roles, the booking
//! entity with its optional reschedule/refund sub-values, and the engine
//! state.

use crate::catalog::ServiceOffering;
use crate::error::BookingError;
use crate::slots::{SlotKey, SlotLedger};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// ============================================================================
// Identifiers
// ============================================================================

/// Unique identifier for a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BookingId(Uuid);

impl BookingId {
    /// Creates a new random `BookingId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `BookingId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for BookingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a customer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CustomerId(Uuid);

impl CustomerId {
    /// Creates a new random `CustomerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `CustomerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for CustomerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a service partner
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PartnerId(Uuid);

impl PartnerId {
    /// Creates a new random `PartnerId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `PartnerId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for PartnerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a service offering
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceId(Uuid);

impl ServiceId {
    /// Creates a new random `ServiceId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create a `ServiceId` from a `Uuid`
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Get the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ServiceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Money Value Object (cents-based to avoid floating point errors)
// ============================================================================

/// Represents money in cents to avoid floating-point arithmetic errors
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Money(u64);

impl Money {
    /// Creates a `Money` value from cents
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Creates a `Money` value from whole currency units
    ///
    /// # Panics
    ///
    /// Panics if the conversion would overflow (`units * 100 > u64::MAX`).
    #[must_use]
    #[allow(clippy::panic)]
    pub const fn from_units(units: u64) -> Self {
        match units.checked_mul(100) {
            Some(cents) => Self(cents),
            None => panic!("Money::from_units overflow"),
        }
    }

    /// Returns the amount in cents
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Returns the amount in whole currency units (rounded down)
    #[must_use]
    pub const fn units(&self) -> u64 {
        self.0 / 100
    }

    /// Checks if the amount is zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Adds two money amounts with overflow checking
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(result) => Some(Self(result)),
            None => None,
        }
    }

    /// Subtracts two money amounts (returns None if result would be negative)
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        if self.0 >= other.0 {
            Some(Self(self.0 - other.0))
        } else {
            None
        }
    }

    /// Applies a percentage discount with overflow checking
    #[must_use]
    pub const fn checked_apply_discount(self, percent: u32) -> Option<Self> {
        let discount = match self.0.checked_mul(percent as u64) {
            Some(product) => product / 100,
            None => return None,
        };

        if discount > self.0 {
            return None;
        }

        Some(Self(self.0 - discount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.units(), self.0 % 100)
    }
}

// ============================================================================
// Time Slots
// ============================================================================

/// A bookable time range within a service day.
///
/// The grid is fixed: six two-hour ranges from 08:00 to 20:00. A slot is the
/// unit of allocation — together with a service and a date it forms the
/// uniquely allocatable [`SlotKey`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TimeSlot {
    /// 08:00-10:00
    EightToTen,
    /// 10:00-12:00
    TenToTwelve,
    /// 12:00-14:00
    TwelveToFourteen,
    /// 14:00-16:00
    FourteenToSixteen,
    /// 16:00-18:00
    SixteenToEighteen,
    /// 18:00-20:00
    EighteenToTwenty,
}

impl TimeSlot {
    /// The full slot grid, in day order
    pub const ALL: [Self; 6] = [
        Self::EightToTen,
        Self::TenToTwelve,
        Self::TwelveToFourteen,
        Self::FourteenToSixteen,
        Self::SixteenToEighteen,
        Self::EighteenToTwenty,
    ];

    /// The canonical label for this slot (e.g. "10:00-12:00")
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::EightToTen => "08:00-10:00",
            Self::TenToTwelve => "10:00-12:00",
            Self::TwelveToFourteen => "12:00-14:00",
            Self::FourteenToSixteen => "14:00-16:00",
            Self::SixteenToEighteen => "16:00-18:00",
            Self::EighteenToTwenty => "18:00-20:00",
        }
    }

    /// Hour of day at which this slot starts
    #[must_use]
    pub const fn start_hour(&self) -> u32 {
        match self {
            Self::EightToTen => 8,
            Self::TenToTwelve => 10,
            Self::TwelveToFourteen => 12,
            Self::FourteenToSixteen => 14,
            Self::SixteenToEighteen => 16,
            Self::EighteenToTwenty => 18,
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for TimeSlot {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|slot| slot.label() == s)
            .ok_or_else(|| BookingError::validation(format!("unknown time slot: {s}")))
    }
}

// ============================================================================
// Actors
// ============================================================================

/// Role of the acting party, as established by the external identity layer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// The customer who placed (or is placing) a booking
    Customer,
    /// The service partner fulfilling a booking
    Partner,
    /// A platform administrator
    Admin,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Customer => "customer",
            Self::Partner => "partner",
            Self::Admin => "admin",
        };
        write!(f, "{label}")
    }
}

/// The authenticated party on whose behalf an action runs.
///
/// Authorization happens upstream; the engine still re-checks role and
/// ownership for every action it is handed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// The actor's role
    pub role: Role,
    /// The actor's user identity
    pub user_id: Uuid,
}

impl Actor {
    /// Creates an actor with the given role and identity
    #[must_use]
    pub const fn new(role: Role, user_id: Uuid) -> Self {
        Self { role, user_id }
    }

    /// Creates a customer actor
    #[must_use]
    pub const fn customer(user_id: Uuid) -> Self {
        Self::new(Role::Customer, user_id)
    }

    /// Creates a partner actor
    #[must_use]
    pub const fn partner(user_id: Uuid) -> Self {
        Self::new(Role::Partner, user_id)
    }

    /// Creates an admin actor
    #[must_use]
    pub const fn admin(user_id: Uuid) -> Self {
        Self::new(Role::Admin, user_id)
    }
}

// ============================================================================
// Booking lifecycle states
// ============================================================================

/// Booking lifecycle status.
///
/// A booking is created in `PendingAdminApproval` and ends in exactly one of
/// the three terminal statuses. While a booking is in the *active set* (every
/// non-terminal status) it holds exclusive claim on its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    /// Awaiting admin triage of the new request
    PendingAdminApproval,
    /// Assigned; awaiting the partner's accept/decline
    PendingPartnerApproval,
    /// Accepted; awaiting the customer's payment
    ApprovedPendingPayment,
    /// Customer marked paid; awaiting admin verification
    PaymentVerifying,
    /// Payment verified; service is going ahead
    Confirmed,
    /// A reschedule proposal is awaiting the customer's response
    RescheduleRequested,
    /// Service delivered (terminal)
    Completed,
    /// Called off by a party (terminal)
    Cancelled,
    /// Declined by admin or partner (terminal)
    Rejected,
}

impl BookingStatus {
    /// Whether the booking still holds exclusive claim on its slot
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether this status ends the lifecycle
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Rejected)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::PendingAdminApproval => "pending_admin_approval",
            Self::PendingPartnerApproval => "pending_partner_approval",
            Self::ApprovedPendingPayment => "approved_pending_payment",
            Self::PaymentVerifying => "payment_verifying",
            Self::Confirmed => "confirmed",
            Self::RescheduleRequested => "reschedule_requested",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rejected => "rejected",
        };
        write!(f, "{label}")
    }
}

/// Payment status of a booking
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Not yet paid
    Pending,
    /// Customer has paid (verification may still be outstanding)
    Paid,
}

// ============================================================================
// Sub-values
// ============================================================================

/// Status of a reschedule proposal
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RescheduleStatus {
    /// Awaiting the customer's response
    Requested,
    /// Accepted; the proposed date/slot took effect
    Accepted,
    /// Rejected; the original date/slot stands
    Rejected,
}

/// A partner's pending request to move a confirmed booking.
///
/// Lives as `Option<RescheduleProposal>` on the booking — absence *is* the
/// "no reschedule in flight" state. The original date/slot are snapshotted
/// as the rollback anchor when the proposal opens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RescheduleProposal {
    /// Proposal status
    pub status: RescheduleStatus,
    /// Proposed new service date
    pub proposed_date: NaiveDate,
    /// Proposed new time slot
    pub proposed_slot: TimeSlot,
    /// Date the booking had when the proposal opened
    pub original_date: NaiveDate,
    /// Slot the booking had when the proposal opened
    pub original_slot: TimeSlot,
    /// Why the partner asked to move
    pub reason: String,
}

/// Status of a refund sub-record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefundStatus {
    /// Refund owed, not yet picked up by an admin
    Requested,
    /// An admin is processing the refund
    Pending,
    /// Refund paid out (terminal)
    Processed,
}

/// Tracks reimbursement progress independently of the booking status.
///
/// Only ever present on a booking whose payment status is
/// [`PaymentStatus::Paid`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Refund {
    /// Refund progress
    pub status: RefundStatus,
    /// Amount to reimburse
    pub amount: Money,
    /// When the refund was paid out
    pub processed_date: Option<DateTime<Utc>>,
}

impl Refund {
    /// Creates a freshly requested refund over the given amount
    #[must_use]
    pub const fn requested(amount: Money) -> Self {
        Self {
            status: RefundStatus::Requested,
            amount,
            processed_date: None,
        }
    }
}

// ============================================================================
// Booking entity
// ============================================================================

/// One reservation of a service time slot.
///
/// Owned exclusively by the lifecycle engine; mutated only through validated
/// transitions, never by direct field writes from callers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier
    pub id: BookingId,
    /// The customer who placed the booking
    pub customer_id: CustomerId,
    /// The booked service offering
    pub service_id: ServiceId,
    /// The partner fulfilling the service (captured from the offering)
    pub partner_id: PartnerId,
    /// Contact person for the event
    pub contact_name: String,
    /// Contact phone number
    pub contact_mobile: String,
    /// Service date
    pub date: NaiveDate,
    /// Booked time slot
    pub slot: TimeSlot,
    /// Service duration in hours (captured from the offering)
    pub duration_hours: u8,
    /// Price at booking time (discounted offering price)
    pub price: Money,
    /// Lifecycle status
    pub status: BookingStatus,
    /// Payment status
    pub payment_status: PaymentStatus,
    /// Reschedule negotiation in flight, if any
    pub reschedule: Option<RescheduleProposal>,
    /// Refund progress, if any
    pub refund: Option<Refund>,
    /// When the booking was created
    pub created_at: DateTime<Utc>,
    /// When the booking last changed
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new booking in `PendingAdminApproval`.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BookingId,
        customer_id: CustomerId,
        service: &ServiceOffering,
        contact_name: String,
        contact_mobile: String,
        date: NaiveDate,
        slot: TimeSlot,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            customer_id,
            service_id: service.id,
            partner_id: service.partner_id,
            contact_name,
            contact_mobile,
            date,
            slot,
            duration_hours: service.duration_hours,
            price: service.discounted_price(),
            status: BookingStatus::PendingAdminApproval,
            payment_status: PaymentStatus::Pending,
            reschedule: None,
            refund: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// The slot this booking currently claims
    #[must_use]
    pub const fn slot_key(&self) -> SlotKey {
        SlotKey {
            service_id: self.service_id,
            date: self.date,
            slot: self.slot,
        }
    }

    /// Whether the given user identity owns this booking as its customer
    #[must_use]
    pub fn is_customer(&self, user_id: Uuid) -> bool {
        *self.customer_id.as_uuid() == user_id
    }

    /// Whether the given user identity is this booking's fulfilling partner
    #[must_use]
    pub fn is_partner(&self, user_id: Uuid) -> bool {
        *self.partner_id.as_uuid() == user_id
    }

    /// Whether the booking has been paid for
    #[must_use]
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}

// ============================================================================
// Engine state
// ============================================================================

/// State for the booking engine: every booking plus the slot ledger.
///
/// The ledger is derived data — it mirrors exactly the slot claims of
/// bookings in the active set — and is kept in lockstep by the reducer so
/// that availability checks and check-then-insert acquisition stay atomic
/// under the engine's single writer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingState {
    /// All bookings indexed by ID
    pub bookings: HashMap<BookingId, Booking>,
    /// Slot claims of active bookings
    pub ledger: SlotLedger,
}

impl BookingState {
    /// Creates a new empty `BookingState`
    #[must_use]
    pub fn new() -> Self {
        Self {
            bookings: HashMap::new(),
            ledger: SlotLedger::new(),
        }
    }

    /// Gets a booking by ID
    #[must_use]
    pub fn get(&self, id: &BookingId) -> Option<&Booking> {
        self.bookings.get(id)
    }

    /// Checks if a booking exists
    #[must_use]
    pub fn exists(&self, id: &BookingId) -> bool {
        self.bookings.contains_key(id)
    }

    /// Returns the number of bookings
    #[must_use]
    pub fn count(&self) -> usize {
        self.bookings.len()
    }

    /// Clones all bookings out as one consistent snapshot
    #[must_use]
    pub fn snapshot(&self) -> Vec<Booking> {
        self.bookings.values().cloned().collect()
    }
}

impl Default for BookingState {
    fn default() -> Self {
        Self::new()
    }
}
