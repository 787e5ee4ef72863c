//! # Slotbook Core
//!
//! Core traits and types for the slotbook booking architecture.
//!
//! This crate provides the fundamental abstractions for building the booking
//! coordination engine as a functional core behind an imperative shell:
//!
//! - **State**: owned domain state for a feature
//! - **Action**: all possible inputs to a reducer
//! - **Reducer**: pure function `(State, Action, Environment) → Result<Effects, Error>`
//! - **Effect**: side-effect descriptions (values, not execution)
//! - **Environment**: injected dependencies via traits
//!
//! ## The `Result` contract
//!
//! Reducers here return `Result`: on `Ok` the state was updated and the
//! returned effects are to be executed; on `Err` the reducer guarantees the
//! state is exactly as it was before the call. This keeps failed commands
//! observable as typed errors instead of flags buried in state, which is what
//! a multi-actor transition engine needs — a caller must be able to tell
//! "rejected, retry later" apart from "rejected, never valid".
//!
//! ## Example
//!
//! ```ignore
//! use slotbook_core::{effect::Effect, reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = CounterState;
//!     type Action = CounterAction;
//!     type Environment = CounterEnvironment;
//!     type Error = CounterError;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut CounterState,
//!         action: CounterAction,
//!         env: &CounterEnvironment,
//!     ) -> Result<SmallVec<[Effect<CounterAction>; 4]>, CounterError> {
//!         match action {
//!             CounterAction::Increment => {
//!                 state.count += 1;
//!                 Ok(SmallVec::new())
//!             }
//!         }
//!     }
//! }
//! ```

// Re-export commonly used types so domain crates import from one place.
pub use chrono::{DateTime, Utc};
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Reducer module - the core trait for business logic.
///
/// Reducers are pure functions: `(State, Action, Environment) → Result<Effects, Error>`.
/// They contain all business logic and are deterministic and testable without
/// any runtime.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for business logic.
    ///
    /// # Type Parameters
    ///
    /// - `State`: the domain state this reducer operates on
    /// - `Action`: the action type this reducer processes
    /// - `Environment`: the injected dependencies this reducer needs
    /// - `Error`: the typed error surfaced when an action is refused
    ///
    /// # Contract
    ///
    /// An implementation must validate an action *completely* before its
    /// first state mutation. When `reduce` returns `Err`, the state is
    /// byte-for-byte what it was before the call — callers and stores rely
    /// on this to retry or surface the error without compensation logic.
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The error type returned when an action is refused
        type Error;

        /// Reduce an action into state changes and effects.
        ///
        /// On success, the state has been updated in place and the returned
        /// effect descriptions are to be executed by the store.
        ///
        /// # Errors
        ///
        /// Returns the reducer's typed error when the action is invalid for
        /// the current state, the acting party, or the environment's view of
        /// the world. The state is left untouched in that case.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<SmallVec<[Effect<Self::Action>; 4]>, Self::Error>;
    }
}

/// Effect module - side-effect descriptions.
///
/// Effects describe side effects to be performed by the store after the
/// reducer has run and the state lock has been released. They are values,
/// composable and inspectable in tests.
pub mod effect {
    use std::future::Future;
    use std::pin::Pin;

    /// Effect type - describes a side effect to be executed.
    ///
    /// Effects are NOT executed immediately. They are descriptions of what
    /// should happen, returned from reducers and executed by the store.
    ///
    /// # Type Parameters
    ///
    /// - `Action`: the action type that effects can produce (feedback loop)
    pub enum Effect<Action> {
        /// No-op effect
        None,

        /// Run effects concurrently
        Parallel(Vec<Effect<Action>>),

        /// Run effects one after another
        Sequential(Vec<Effect<Action>>),

        /// Arbitrary async computation.
        ///
        /// Returns `Option<Action>` - if `Some`, the action is fed back into
        /// the reducer by the store.
        Future(Pin<Box<dyn Future<Output = Option<Action>> + Send>>),
    }

    // Manual Debug implementation since Future doesn't implement Debug
    impl<Action> std::fmt::Debug for Effect<Action>
    where
        Action: std::fmt::Debug,
    {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            match self {
                Effect::None => write!(f, "Effect::None"),
                Effect::Parallel(effects) => {
                    f.debug_tuple("Effect::Parallel").field(effects).finish()
                },
                Effect::Sequential(effects) => {
                    f.debug_tuple("Effect::Sequential").field(effects).finish()
                },
                Effect::Future(_) => write!(f, "Effect::Future(<future>)"),
            }
        }
    }

    impl<Action> Effect<Action> {
        /// Combine effects to run concurrently
        #[must_use]
        pub fn merge(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Parallel(effects)
        }

        /// Chain effects to run one after another
        #[must_use]
        pub fn chain(effects: Vec<Effect<Action>>) -> Effect<Action> {
            Effect::Sequential(effects)
        }

        /// Wrap an async computation as an effect
        pub fn future<F>(fut: F) -> Effect<Action>
        where
            F: Future<Output = Option<Action>> + Send + 'static,
        {
            Effect::Future(Box::pin(fut))
        }
    }
}

/// Environment module - dependency injection traits.
///
/// All external dependencies are abstracted behind traits and injected via
/// the Environment parameter, so reducers stay pure and tests stay
/// deterministic.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability.
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
