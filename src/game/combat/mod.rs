// Combat module: actions, health, input, state machines, and the two
// combatant controllers.

pub mod action;
pub mod controller;
pub mod fsm;
pub mod health;
pub mod input;
pub mod state;
pub mod tuning;

pub use action::Action;
pub use controller::{paladin_mixer, swordsman_mixer, AiController, MatchContext, PlayerController};
pub use health::Health;
pub use tuning::{CombatTuning, TuningError};
