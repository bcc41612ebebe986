// Finite state machine: one active state per combatant

use std::collections::HashMap;

use super::action::Action;
use super::input::InputState;
use super::state::{
    AiIdleState, FinishGatedState, GuardState, PlayerIdleState, State, StateContext,
    TwoTickAttackState,
};
use super::tuning::CombatTuning;

/// Constructs a fresh state instance on each transition into it.
pub type StateCtor = Box<dyn Fn() -> Box<dyn State>>;

/// Owns exactly zero or one active state and the table of constructors for
/// every state it can transition to.
///
/// Transitions run exit-then-enter: the outgoing state's `exit` fully
/// completes (detaching anything it armed) before the incoming state is
/// constructed and entered. Requesting a state that was never registered is a
/// programming error and fails fast.
#[derive(Default)]
pub struct StateMachine {
    states: HashMap<Action, StateCtor>,
    current: Option<Box<dyn State>>,
}

impl StateMachine {
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
        }
    }

    /// Register a constructor under a state name. Pure bookkeeping.
    pub fn register(&mut self, name: Action, ctor: StateCtor) {
        self.states.insert(name, ctor);
    }

    /// The AI fighter's machine: idle, punch, death, victory, react.
    pub fn character(tuning: &CombatTuning) -> Self {
        let mut fsm = Self::new();
        let blend = tuning.attack_blend;
        let react_blend = tuning.react_blend;

        fsm.register(Action::Idle, Box::new(move || Box::new(AiIdleState::new(blend))));
        fsm.register(
            Action::Punch,
            Box::new(move || {
                Box::new(FinishGatedState::new(Action::Punch, blend, true, Some("slash")))
            }),
        );
        fsm.register(
            Action::Death,
            Box::new(move || Box::new(FinishGatedState::new(Action::Death, blend, false, None))),
        );
        fsm.register(
            Action::Victory,
            Box::new(move || Box::new(FinishGatedState::new(Action::Victory, blend, false, None))),
        );
        fsm.register(
            Action::React,
            Box::new(move || {
                Box::new(FinishGatedState::new(Action::React, react_blend, true, None))
            }),
        );
        fsm
    }

    /// The player's machine: idle, the three attacks, guard, react.
    pub fn player(tuning: &CombatTuning) -> Self {
        let mut fsm = Self::new();
        let react_blend = tuning.react_blend;

        fsm.register(Action::Idle, Box::new(|| Box::new(PlayerIdleState)));
        for attack in Action::ATTACK_SCAN {
            fsm.register(
                attack,
                Box::new(move || Box::new(TwoTickAttackState::new(attack))),
            );
        }
        fsm.register(Action::Guard, Box::new(|| Box::new(GuardState)));
        fsm.register(
            Action::React,
            Box::new(move || {
                Box::new(FinishGatedState::new(Action::React, react_blend, true, None))
            }),
        );
        fsm
    }

    /// Name of the active state, if any.
    pub fn current_name(&self) -> Option<Action> {
        self.current.as_deref().map(|s| s.name())
    }

    /// Whether the active state already applied its hit this activation.
    pub fn current_handled(&self) -> bool {
        self.current.as_deref().map(|s| s.handled()).unwrap_or(false)
    }

    pub fn mark_current_handled(&mut self) {
        if let Some(state) = self.current.as_deref_mut() {
            state.mark_handled();
        }
    }

    /// Transition to `name`. Re-requesting the active state's name is a no-op;
    /// otherwise the old state exits completely, then the new one is
    /// constructed, installed, and entered with the old state's name for
    /// crossfading.
    ///
    /// Panics if `name` was never registered.
    pub fn set_state(&mut self, name: Action, ctx: &mut StateContext<'_>) {
        if self.current_name() == Some(name) {
            return;
        }

        let prev = self.current.take().map(|mut state| {
            state.exit(ctx);
            state.name()
        });

        let ctor = self
            .states
            .get(&name)
            .unwrap_or_else(|| panic!("state {name:?} is not registered"));
        self.current = Some(ctor());
        if let Some(state) = self.current.as_deref_mut() {
            state.enter(ctx, prev);
        }

        self.apply_requests(ctx);
    }

    /// Forward a frame update to the active state.
    pub fn update(&mut self, ctx: &mut StateContext<'_>, dt: f32, input: &InputState) {
        if let Some(state) = self.current.as_deref_mut() {
            state.update(ctx, dt, input);
        }
        self.apply_requests(ctx);
    }

    /// Deliver an animation-finished notification to the active state.
    pub fn notify_finished(&mut self, ctx: &mut StateContext<'_>) {
        if let Some(state) = self.current.as_deref_mut() {
            state.on_finished(ctx);
        }
        self.apply_requests(ctx);
    }

    fn apply_requests(&mut self, ctx: &mut StateContext<'_>) {
        while let Some(next) = ctx.take_pending() {
            self.set_state(next, ctx);
        }
    }
}
