// Per-combatant input state

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::engine::input::Debouncer;

use super::action::Action;

/// A fixed set of action flags for one combatant.
///
/// The key set is decided at construction and never grows; setting an action
/// outside the set is ignored. Only controller logic enforces any exclusivity
/// for the direct-keys variant; the notification-driven wrapper below enforces
/// it by construction.
#[derive(Debug)]
pub struct InputState {
    keys: HashMap<Action, bool>,
}

impl InputState {
    fn with_keys(keys: &[Action]) -> Self {
        Self {
            keys: keys.iter().map(|&a| (a, false)).collect(),
        }
    }

    /// Direct-keys variant for the AI fighter.
    pub fn fighter_keys() -> Self {
        Self::with_keys(&[Action::Punch, Action::Victory, Action::Death, Action::React])
    }

    /// Key set for the player's sword.
    pub fn player_keys() -> Self {
        Self::with_keys(&[
            Action::Chop,
            Action::Slash,
            Action::Guard,
            Action::UpperSlash,
            Action::Idle,
        ])
    }

    pub fn is_set(&self, action: Action) -> bool {
        self.keys.get(&action).copied().unwrap_or(false)
    }

    /// Assert an action flag. No-op for actions outside this set.
    pub fn set(&mut self, action: Action) {
        if let Some(flag) = self.keys.get_mut(&action) {
            *flag = true;
        }
    }

    /// Clear every flag.
    pub fn reset_states(&mut self) {
        for flag in self.keys.values_mut() {
            *flag = false;
        }
    }

    /// How many flags are currently asserted.
    pub fn active_count(&self) -> usize {
        self.keys.values().filter(|&&v| v).count()
    }
}

/// Notification-driven input: the player's BLE sword.
///
/// Codes arrive at unpredictable, possibly bursty timing and are debounced
/// before interpretation. Interpretation is exclusive: every flag is reset,
/// then exactly one is set (idle for unrecognized codes).
#[derive(Debug)]
pub struct NotifyInput {
    pub keys: InputState,
    debouncer: Debouncer,
}

impl NotifyInput {
    pub fn new(quiet: Duration) -> Self {
        Self {
            keys: InputState::player_keys(),
            debouncer: Debouncer::new(quiet),
        }
    }

    /// Stage a raw transport code. Called from the transport at any time; the
    /// staged value is only consumed on the next frame's `poll`.
    pub fn notify(&mut self, code: u8, now: Instant) {
        self.debouncer.notify(code, now);
    }

    /// Consume a debounced notification, if one is due. Returns the action
    /// whose flag is now the only one set.
    pub fn poll(&mut self, now: Instant) -> Option<Action> {
        let code = self.debouncer.poll(now)?;
        let action = Action::from_code(code);
        self.keys.reset_states();
        self.keys.set(action);
        Some(action)
    }
}
