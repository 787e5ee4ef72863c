//! The booking engine: state behind a single writer, reducer, effects.
//!
//! `dispatch` is the one door through which bookings change. It serializes
//! every mutation behind a `tokio::sync::RwLock` writer — racing callers on
//! the same booking or the same slot resolve to a single winner, and the
//! loser observes the new state through a typed error. Read-side queries
//! take the reader lock and tolerate sub-second staleness.

use crate::config::EngineConfig;
use crate::engine::actions::BookingAction;
use crate::engine::environment::BookingEnvironment;
use crate::engine::reducer::BookingReducer;
use crate::error::BookingError;
use crate::slots::SlotKey;
use crate::stats::BookingStats;
use crate::types::{Booking, BookingId, BookingState, CustomerId, PartnerId, ServiceId, TimeSlot};
use chrono::NaiveDate;
use futures::future::{BoxFuture, join_all};
use slotbook_core::effect::Effect;
use slotbook_core::reducer::Reducer;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

/// The booking engine store.
///
/// Cheap to clone-share via [`Arc`]; all methods take `&self`.
pub struct BookingEngine {
    state: Arc<RwLock<BookingState>>,
    reducer: BookingReducer,
    env: BookingEnvironment,
    dispatch_timeout: Duration,
    stats_top_n: usize,
}

impl BookingEngine {
    /// Creates an engine with default configuration.
    #[must_use]
    pub fn new(env: BookingEnvironment) -> Self {
        Self::with_config(env, &EngineConfig::default())
    }

    /// Creates an engine with the given configuration.
    #[must_use]
    pub fn with_config(env: BookingEnvironment, config: &EngineConfig) -> Self {
        Self {
            state: Arc::new(RwLock::new(BookingState::new())),
            reducer: BookingReducer::new(),
            env,
            dispatch_timeout: config.dispatch_timeout(),
            stats_top_n: config.stats_top_n,
        }
    }

    /// Dispatches one action and returns the updated booking.
    ///
    /// Effects run after the writer lock is released; feedback actions they
    /// produce are dispatched in turn, and their failures are logged rather
    /// than propagated to this caller.
    ///
    /// # Errors
    ///
    /// Any [`BookingError`] the reducer refuses the action with, or
    /// [`BookingError::PersistenceConflict`] when the writer could not be
    /// acquired within the configured timeout.
    pub async fn dispatch(&self, action: BookingAction) -> Result<Booking, BookingError> {
        let (booking, mut feedback) = self.dispatch_once(action).await?;

        while let Some(next) = feedback.pop() {
            match self.dispatch_once(next).await {
                Ok((_, more)) => feedback.extend(more),
                Err(error) => {
                    tracing::warn!(%error, "feedback action failed");
                },
            }
        }

        Ok(booking)
    }

    async fn dispatch_once(
        &self,
        action: BookingAction,
    ) -> Result<(Booking, Vec<BookingAction>), BookingError> {
        let label = action.label();
        let booking_id = action.booking_id();
        let is_override = matches!(action, BookingAction::OverrideStatus { .. });
        let audit_note = match &action {
            BookingAction::OverrideStatus { note, .. } => note.clone(),
            _ => String::new(),
        };
        let actor = action.actor();

        let (booking, effects) = {
            let mut guard = tokio::time::timeout(self.dispatch_timeout, self.state.write())
                .await
                .map_err(|_| BookingError::PersistenceConflict)?;

            let effects = self.reducer.reduce(&mut guard, action, &self.env)?;
            let booking = guard
                .get(&booking_id)
                .cloned()
                .ok_or_else(|| BookingError::not_found(format!("booking {booking_id}")))?;
            (booking, effects)
        };

        if is_override {
            tracing::warn!(
                booking = %booking_id,
                admin = %actor.user_id,
                status = %booking.status,
                note = %audit_note,
                "status forced outside the transition table"
            );
        } else {
            tracing::info!(
                action = label,
                booking = %booking_id,
                role = %actor.role,
                status = %booking.status,
                "booking command handled"
            );
        }

        let mut feedback = Vec::new();
        for effect in effects {
            feedback.extend(run_effect(effect).await);
        }

        Ok((booking, feedback))
    }

    /// A booking by ID
    pub async fn booking(&self, id: BookingId) -> Option<Booking> {
        self.state.read().await.get(&id).cloned()
    }

    /// All bookings placed by the customer
    pub async fn bookings_for_customer(&self, customer_id: CustomerId) -> Vec<Booking> {
        self.state
            .read()
            .await
            .bookings
            .values()
            .filter(|booking| booking.customer_id == customer_id)
            .cloned()
            .collect()
    }

    /// All bookings fulfilled by the partner
    pub async fn bookings_for_partner(&self, partner_id: PartnerId) -> Vec<Booking> {
        self.state
            .read()
            .await
            .bookings
            .values()
            .filter(|booking| booking.partner_id == partner_id)
            .cloned()
            .collect()
    }

    /// One consistent snapshot of every booking (admin listing, stats input)
    pub async fn snapshot(&self) -> Vec<Booking> {
        self.state.read().await.snapshot()
    }

    /// True iff no active booking holds the slot
    pub async fn is_slot_available(&self, key: &SlotKey) -> bool {
        self.state.read().await.ledger.is_available(key)
    }

    /// The slots held by active bookings for a service on a date
    pub async fn occupied_slots(&self, service_id: ServiceId, date: NaiveDate) -> BTreeSet<TimeSlot> {
        self.state.read().await.ledger.occupied(service_id, date)
    }

    /// Stats over one consistent snapshot of the booking collection
    pub async fn stats(&self) -> BookingStats {
        let snapshot = self.snapshot().await;
        BookingStats::compute(&snapshot, self.env.services.as_ref(), self.stats_top_n)
    }
}

/// Executes one effect tree, collecting any feedback actions it yields.
fn run_effect(effect: Effect<BookingAction>) -> BoxFuture<'static, Vec<BookingAction>> {
    Box::pin(async move {
        match effect {
            Effect::None => Vec::new(),
            Effect::Future(future) => future.await.into_iter().collect(),
            Effect::Parallel(children) => join_all(children.into_iter().map(run_effect))
                .await
                .into_iter()
                .flatten()
                .collect(),
            Effect::Sequential(children) => {
                let mut actions = Vec::new();
                for child in children {
                    actions.extend(run_effect(child).await);
                }
                actions
            },
        }
    })
}
