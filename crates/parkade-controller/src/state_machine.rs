//! Controller state tracking.
//!
//! The orchestrator is in one of three states. Between vehicles it is
//! `Idle`; after serving a request it waits in `AwaitingEntryRelease` or
//! `AwaitingExitRelease` until the sensor that triggered the cycle is
//! released, so a vehicle that stays on the loop is not served twice.
//!
//! # Valid Transitions
//!
//! - Idle → AwaitingEntryRelease → Idle
//! - Idle → AwaitingExitRelease → Idle
//!
//! # Examples
//!
//! ```
//! use parkade_controller::{ControllerState, StateMachine};
//!
//! let mut machine = StateMachine::new();
//! assert_eq!(machine.current_state(), ControllerState::Idle);
//!
//! machine.transition_to(ControllerState::AwaitingEntryRelease).unwrap();
//! assert!(machine.transition_to(ControllerState::AwaitingExitRelease).is_err());
//! machine.transition_to(ControllerState::Idle).unwrap();
//! ```

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use parkade_core::{Error, Result, Sensor};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Maximum number of state transitions to keep in history.
///
/// Every vehicle produces two transitions, so this covers the last fifty
/// gate cycles.
const MAX_HISTORY_SIZE: usize = 100;

/// States of the entry/exit orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerState {
    /// Polling both sensors.
    Idle,

    /// Entry served; waiting for the entry sensor to clear.
    AwaitingEntryRelease,

    /// Exit served; waiting for the exit sensor to clear.
    AwaitingExitRelease,
}

impl fmt::Display for ControllerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state_str = match self {
            ControllerState::Idle => "Idle",
            ControllerState::AwaitingEntryRelease => "AwaitingEntryRelease",
            ControllerState::AwaitingExitRelease => "AwaitingExitRelease",
        };
        write!(f, "{}", state_str)
    }
}

impl ControllerState {
    /// The release-wait state for `sensor`.
    pub fn awaiting_release(sensor: Sensor) -> Self {
        match sensor {
            Sensor::Entry => ControllerState::AwaitingEntryRelease,
            Sensor::Exit => ControllerState::AwaitingExitRelease,
        }
    }

    /// Check if transition to target state is valid from this state.
    ///
    /// # Examples
    ///
    /// ```
    /// use parkade_controller::ControllerState;
    ///
    /// assert!(ControllerState::Idle.can_transition_to(&ControllerState::AwaitingExitRelease));
    /// assert!(!ControllerState::Idle.can_transition_to(&ControllerState::Idle));
    /// ```
    pub fn can_transition_to(&self, target: &ControllerState) -> bool {
        matches!(
            (self, target),
            (
                ControllerState::Idle,
                ControllerState::AwaitingEntryRelease | ControllerState::AwaitingExitRelease
            ) | (
                ControllerState::AwaitingEntryRelease | ControllerState::AwaitingExitRelease,
                ControllerState::Idle
            )
        )
    }

    /// Returns `true` while a release is awaited.
    pub fn is_awaiting_release(&self) -> bool {
        !matches!(self, ControllerState::Idle)
    }
}

/// A single state transition with its wall-clock time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateTransition {
    /// The state transitioned from.
    pub from: ControllerState,

    /// The state transitioned to.
    pub to: ControllerState,

    /// When the transition occurred.
    pub timestamp: DateTime<Utc>,
}

impl StateTransition {
    pub fn new(from: ControllerState, to: ControllerState) -> Self {
        Self {
            from,
            to,
            timestamp: Utc::now(),
        }
    }
}

/// Validating state tracker with bounded history.
///
/// This struct is not thread-safe by design; it lives inside the
/// orchestrator and is only touched from its loop.
#[derive(Debug, Clone)]
pub struct StateMachine {
    /// Current state of the controller.
    current_state: ControllerState,

    /// History of state transitions (limited to MAX_HISTORY_SIZE).
    history: VecDeque<StateTransition>,
}

impl StateMachine {
    /// Create a new state machine in the Idle state.
    pub fn new() -> Self {
        Self {
            current_state: ControllerState::Idle,
            history: VecDeque::with_capacity(MAX_HISTORY_SIZE),
        }
    }

    pub fn current_state(&self) -> ControllerState {
        self.current_state
    }

    /// Recent transitions, oldest first.
    pub fn history(&self) -> &VecDeque<StateTransition> {
        &self.history
    }

    /// Get the last N state transitions.
    pub fn last_transitions(&self, count: usize) -> Vec<StateTransition> {
        self.history
            .iter()
            .rev()
            .take(count)
            .rev()
            .cloned()
            .collect()
    }

    /// Transition to a new state, validating the transition.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidStateTransition` if the transition is not
    /// allowed from the current state; the state is left unchanged.
    pub fn transition_to(&mut self, new_state: ControllerState) -> Result<StateTransition> {
        if !self.current_state.can_transition_to(&new_state) {
            return Err(Error::InvalidStateTransition {
                from: self.current_state.to_string(),
                to: new_state.to_string(),
            });
        }

        let transition = StateTransition::new(self.current_state, new_state);
        debug!(from = %transition.from, to = %transition.to, "State transition");

        self.current_state = new_state;
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }

        Ok(transition)
    }

    /// Force the machine back to Idle.
    ///
    /// Used after a hardware fault interrupted a cycle.
    pub fn reset(&mut self) -> StateTransition {
        let transition = StateTransition::new(self.current_state, ControllerState::Idle);
        self.current_state = ControllerState::Idle;
        self.history.push_back(transition.clone());
        if self.history.len() > MAX_HISTORY_SIZE {
            self.history.pop_front();
        }
        transition
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}
