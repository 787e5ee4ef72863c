//! Event-service booking coordination core.
//!
//! Coordinates bookings of event-service time slots among three parties —
//! customer, service partner, and platform admin. The crate owns the booking
//! lifecycle state machine and the time-slot allocation logic; identity,
//! catalog CRUD, reviews, payment gateways, and HTTP are external
//! collaborators reached through injected traits.
//!
//! # Architecture
//!
//! ```text
//! Write side:
//!                  ┌────────────────────────────────────┐
//!    action ──────▶│           BookingEngine            │──▶ Booking | error
//!  (explicit       │  ┌──────────┐      ┌────────────┐  │
//!   actor)         │  │ lifecycle│─────▶│ slot ledger│  │
//!                  │  │  reducer │      │ (exclusive │  │
//!                  │  └──────────┘      │   claims)  │  │
//!                  │        │           └────────────┘  │
//!                  └────────┼───────────────────────────┘
//!                           ▼
//!                     effects (notifications)
//!
//! Read side:
//!    snapshot() ──▶ BookingStats::compute  (counts, revenue, popularity)
//! ```
//!
//! # Key guarantees
//!
//! - **Slot exclusivity**: for a fixed (service, date, slot), at most one
//!   booking in the active set holds the claim; racing acquisitions resolve
//!   to exactly one winner.
//! - **Validated transitions**: one central `(role, status, command)` table
//!   decides every move; anything else is an invalid transition, and a
//!   refused action leaves the booking byte-for-byte unchanged.
//! - **Recoverable branches**: reschedule negotiation and the refund
//!   workflow live as optional sub-values on the booking — absence is the
//!   "nothing in flight" state.

#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod refund;
pub mod reschedule;
pub mod slots;
pub mod stats;
pub mod types;

pub use catalog::{InMemoryServiceDirectory, ServiceCategory, ServiceDirectory, ServiceOffering};
pub use config::{Config, EngineConfig, ServerConfig};
pub use engine::{
    BookingAction, BookingEngine, BookingEnvironment, BookingReducer, Notifier,
    RecordingNotifier, TracingNotifier,
};
pub use error::BookingError;
pub use slots::{SlotKey, SlotLedger};
pub use stats::BookingStats;
