//! Slot ledger: who holds which (service, date, slot) tuple.
//!
//! The ledger tracks the slot claims of active bookings and answers
//! availability queries. It lives inside [`crate::types::BookingState`]
//! behind the engine's single writer lock, so `acquire` is a true atomic
//! check-then-insert: of any number of racing callers targeting the same
//! key, exactly one wins and the rest observe [`BookingError::SlotConflict`].

use crate::error::BookingError;
use crate::types::{BookingId, ServiceId, TimeSlot};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// A uniquely allocatable resource-time unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SlotKey {
    /// The service being booked
    pub service_id: ServiceId,
    /// The service date
    pub date: NaiveDate,
    /// The time slot within the date
    pub slot: TimeSlot,
}

impl SlotKey {
    /// Creates a new slot key
    #[must_use]
    pub const fn new(service_id: ServiceId, date: NaiveDate, slot: TimeSlot) -> Self {
        Self {
            service_id,
            date,
            slot,
        }
    }
}

impl std::fmt::Display for SlotKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.service_id, self.date, self.slot)
    }
}

/// Tracks which slots are held by which active booking.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SlotLedger {
    held: HashMap<SlotKey, BookingId>,
}

impl SlotLedger {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self {
            held: HashMap::new(),
        }
    }

    /// True iff no active booking holds the key
    #[must_use]
    pub fn is_available(&self, key: &SlotKey) -> bool {
        !self.held.contains_key(key)
    }

    /// The booking currently holding the key, if any
    #[must_use]
    pub fn holder(&self, key: &SlotKey) -> Option<BookingId> {
        self.held.get(key).copied()
    }

    /// Claims the key for a booking.
    ///
    /// Re-acquiring a key the same booking already holds is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`BookingError::SlotConflict`] when another booking holds the
    /// key; the ledger is unchanged in that case.
    pub fn acquire(&mut self, key: SlotKey, booking_id: BookingId) -> Result<(), BookingError> {
        match self.held.get(&key) {
            Some(current) if *current != booking_id => Err(BookingError::SlotConflict),
            Some(_) => Ok(()),
            None => {
                self.held.insert(key, booking_id);
                Ok(())
            },
        }
    }

    /// Releases one specific key, regardless of holder
    pub fn release_key(&mut self, key: &SlotKey) {
        self.held.remove(key);
    }

    /// Releases every key held by the booking
    pub fn release(&mut self, booking_id: BookingId) {
        self.held.retain(|_, holder| *holder != booking_id);
    }

    /// The slots held by active bookings for a service on a date
    #[must_use]
    pub fn occupied(&self, service_id: ServiceId, date: NaiveDate) -> BTreeSet<TimeSlot> {
        self.held
            .keys()
            .filter(|key| key.service_id == service_id && key.date == date)
            .map(|key| key.slot)
            .collect()
    }

    /// Number of held slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.held.len()
    }

    /// Whether no slot is held
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}
