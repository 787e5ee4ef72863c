//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable
//! Given-When-Then syntax, including assertions on the typed error a reducer
//! returns when it refuses an action.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use slotbook_core::{effect::Effect, reducer::Reducer};

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<A> = Box<dyn FnOnce(&[Effect<A>])>;

/// Type alias for error assertion functions
type ErrorAssertion<E> = Box<dyn FnOnce(&E)>;

/// Fluent API for testing reducers with Given-When-Then syntax.
///
/// A test either expects success (`then_state` / `then_effects`) or expects
/// the reducer to refuse the action (`then_error`). Expecting an error while
/// the reducer succeeds — or the other way round — fails the test.
///
/// # Example
///
/// ```ignore
/// use slotbook_testing::ReducerTest;
///
/// ReducerTest::new(BookingReducer::new())
///     .with_env(test_environment())
///     .given_state(BookingState::new())
///     .when_action(action)
///     .then_state(|state| assert_eq!(state.count(), 1))
///     .then_effects(|effects| assert!(effects.is_empty()))
///     .run();
/// ```
pub struct ReducerTest<R, S, A, E, Err>
where
    R: Reducer<State = S, Action = A, Environment = E, Error = Err>,
{
    reducer: R,
    environment: Option<E>,
    initial_state: Option<S>,
    action: Option<A>,
    state_assertions: Vec<StateAssertion<S>>,
    effect_assertions: Vec<EffectAssertion<A>>,
    error_assertions: Vec<ErrorAssertion<Err>>,
}

impl<R, S, A, E, Err> ReducerTest<R, S, A, E, Err>
where
    R: Reducer<State = S, Action = A, Environment = E, Error = Err>,
    S: Clone + std::fmt::Debug,
    A: Clone,
    Err: std::fmt::Debug,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
            error_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: E) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: A) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&S) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the resulting effects (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[Effect<A>]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Expect the reducer to refuse the action, and assert on the error (Then).
    ///
    /// When an error assertion is present, `run` also verifies that the state
    /// was left untouched by the failed action.
    #[must_use]
    pub fn then_error<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&Err) + 'static,
    {
        self.error_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions.
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set, if the
    /// reducer's outcome (success vs. refusal) does not match the assertions
    /// registered, or if any assertion fails.
    #[allow(clippy::panic)] // Test code can panic
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let action = self.action.expect("Action must be set with when_action()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        let expect_error = !self.error_assertions.is_empty();
        let before = expect_error.then(|| state.clone());

        // Execute reducer
        match self.reducer.reduce(&mut state, action, &env) {
            Ok(effects) => {
                assert!(
                    !expect_error,
                    "Expected the reducer to refuse the action, but it succeeded"
                );

                for assertion in self.state_assertions {
                    assertion(&state);
                }

                for assertion in self.effect_assertions {
                    assertion(&effects);
                }
            },
            Err(error) => {
                assert!(
                    expect_error,
                    "Reducer refused the action unexpectedly: {error:?}"
                );

                for assertion in self.error_assertions {
                    assertion(&error);
                }

                // A refused action must leave the state untouched.
                if let Some(before) = before {
                    assert_eq!(
                        format!("{before:?}"),
                        format!("{state:?}"),
                        "Reducer mutated state while returning an error"
                    );
                }

                // State assertions still run so tests can pin invariants.
                for assertion in self.state_assertions {
                    assertion(&state);
                }
            },
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    use slotbook_core::effect::Effect;

    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_no_effects<A: std::fmt::Debug>(effects: &[Effect<A>]) {
        assert!(
            effects.is_empty() || matches!(effects, [Effect::None]),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_effects_count<A>(effects: &[Effect<A>], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {} effects, but found {}",
            expected,
            effects.len()
        );
    }

    /// Assert that effects contain at least one Future effect
    ///
    /// # Panics
    ///
    /// Panics if no Future effect is found.
    #[allow(clippy::panic)] // Test assertion
    pub fn assert_has_future_effect<A>(effects: &[Effect<A>]) {
        assert!(
            effects.iter().any(|e| matches!(e, Effect::Future(_))),
            "Expected at least one Future effect, but none found"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotbook_core::SmallVec;

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Refuse,
    }

    #[derive(Debug)]
    struct TestError;

    struct TestReducer;

    struct TestEnv;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Environment = TestEnv;
        type Error = TestError;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            _env: &Self::Environment,
        ) -> Result<SmallVec<[Effect<Self::Action>; 4]>, Self::Error> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    Ok(SmallVec::new())
                },
                TestAction::Refuse => Err(TestError),
            }
        }
    }

    #[test]
    fn test_reducer_test_success_path() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_error_path() {
        ReducerTest::new(TestReducer)
            .with_env(TestEnv)
            .given_state(TestState { count: 3 })
            .when_action(TestAction::Refuse)
            .then_error(|_| {})
            .then_state(|state| {
                assert_eq!(state.count, 3);
            })
            .run();
    }

    #[test]
    fn test_assertions_no_effects() {
        assertions::assert_no_effects::<TestAction>(&[Effect::None]);
        assertions::assert_no_effects::<TestAction>(&[]);
    }

    #[test]
    fn test_assertions_effects_count() {
        assertions::assert_effects_count(&[Effect::<TestAction>::None], 1);
        assertions::assert_effects_count::<TestAction>(&[], 0);
    }
}
