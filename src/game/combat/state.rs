// Combat states
//
// One State is active per combatant at a time, with Enter/Update/Exit
// lifecycle hooks. Rather than one type per state, a few shapes are
// parameterized by small data records: blend duration, auto-return behavior,
// damage kind.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::engine::animation::Mixer;
use crate::engine::audio::EffectSink;

use super::action::Action;
use super::input::InputState;

/// A combat consequence a state hands back to its controller for resolution.
/// States never touch the opponent directly; the controller applies strikes
/// after the state hook returns, which is also what keeps borrows untangled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombatEvent {
    /// A player attack landed its hit tick.
    Strike(Action),
}

/// Everything a state may touch while one of its hooks runs: its combatant's
/// animation mixer, the shared effect/sound sink and RNG, a snapshot of the
/// match-active flag, the event queue, and a slot for requesting a transition.
///
/// Transitions are requested rather than performed so that the machine can
/// finish the current hook (including listener detachment on exit) before any
/// new state's enter runs.
pub struct StateContext<'a> {
    pub animations: &'a mut Mixer,
    pub sink: &'a mut dyn EffectSink,
    pub rng: &'a mut ChaCha8Rng,
    pub match_active: bool,
    pub events: &'a mut Vec<CombatEvent>,
    pending: Option<Action>,
}

impl<'a> StateContext<'a> {
    pub fn new(
        animations: &'a mut Mixer,
        sink: &'a mut dyn EffectSink,
        rng: &'a mut ChaCha8Rng,
        match_active: bool,
        events: &'a mut Vec<CombatEvent>,
    ) -> Self {
        Self {
            animations,
            sink,
            rng,
            match_active,
            events,
            pending: None,
        }
    }

    /// Ask the owning machine to transition once the current hook returns.
    pub fn request(&mut self, next: Action) {
        self.pending = Some(next);
    }

    pub(crate) fn take_pending(&mut self) -> Option<Action> {
        self.pending.take()
    }
}

/// Lifecycle of one named behavior unit.
pub trait State {
    /// The state's identity; doubles as its animation-clip key.
    fn name(&self) -> Action;

    /// Called after the machine installs this state. `prev` names the state
    /// being replaced, for crossfading.
    fn enter(&mut self, ctx: &mut StateContext<'_>, prev: Option<Action>);

    fn update(&mut self, _ctx: &mut StateContext<'_>, _dt: f32, _input: &InputState) {}

    /// Called when this state's armed animation reports completion.
    fn on_finished(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Called before the machine replaces this state. Must leave no armed
    /// listeners behind.
    fn exit(&mut self, _ctx: &mut StateContext<'_>) {}

    /// Whether this activation has already applied its hit.
    fn handled(&self) -> bool {
        false
    }

    fn mark_handled(&mut self) {}
}

/// One-shot animation state that waits for its clip to finish: the AI's
/// punch, death, victory, and both sides' hit reaction.
pub struct FinishGatedState {
    name: Action,
    blend: f32,
    auto_return: bool,
    enter_sound: Option<&'static str>,
    handled: bool,
}

impl FinishGatedState {
    pub fn new(
        name: Action,
        blend: f32,
        auto_return: bool,
        enter_sound: Option<&'static str>,
    ) -> Self {
        Self {
            name,
            blend,
            auto_return,
            enter_sound,
            handled: false,
        }
    }
}

impl State for FinishGatedState {
    fn name(&self) -> Action {
        self.name
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>, prev: Option<Action>) {
        let clip = self.name.label();
        ctx.animations.arm_finished(clip);
        ctx.animations.reset(clip);
        ctx.animations.set_loop_once(clip);
        if let Some(prev) = prev {
            ctx.animations
                .cross_fade_from(clip, prev.label(), self.blend, true);
        }
        ctx.animations.play(clip);

        if let Some(sound) = self.enter_sound {
            ctx.sink.play_sound(sound);
        }
    }

    fn on_finished(&mut self, ctx: &mut StateContext<'_>) {
        ctx.animations.disarm_finished(self.name.label());
        if self.auto_return {
            ctx.request(Action::Idle);
        }
    }

    fn exit(&mut self, ctx: &mut StateContext<'_>) {
        ctx.animations.disarm_finished(self.name.label());
    }

    fn handled(&self) -> bool {
        self.handled
    }

    fn mark_handled(&mut self) {
        self.handled = true;
    }
}

/// Player attack: tick one lands the hit, tick two returns to idle.
pub struct TwoTickAttackState {
    name: Action,
    handled: bool,
}

impl TwoTickAttackState {
    pub fn new(name: Action) -> Self {
        Self {
            name,
            handled: false,
        }
    }
}

impl State for TwoTickAttackState {
    fn name(&self) -> Action {
        self.name
    }

    fn enter(&mut self, _ctx: &mut StateContext<'_>, _prev: Option<Action>) {}

    fn update(&mut self, ctx: &mut StateContext<'_>, _dt: f32, _input: &InputState) {
        if self.handled {
            ctx.request(Action::Idle);
        } else {
            self.handled = true;
            ctx.events.push(CombatEvent::Strike(self.name));
        }
    }

    fn handled(&self) -> bool {
        self.handled
    }

    fn mark_handled(&mut self) {
        self.handled = true;
    }
}

/// Player block. One-shot on enter; bounces back to idle if somehow entered
/// from itself (unreachable through `set_state`, which drops same-name
/// transitions, but kept as a safety net).
pub struct GuardState;

impl State for GuardState {
    fn name(&self) -> Action {
        Action::Guard
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>, prev: Option<Action>) {
        if prev == Some(Action::Guard) {
            ctx.request(Action::Idle);
        }
        ctx.sink.play_sound("block");
    }
}

/// Roll one six-sided die.
fn roll_die(rng: &mut ChaCha8Rng) -> u8 {
    rng.gen_range(1..=6)
}

/// The AI's aggression gate: three independent dice, attack only on 2-2-2
/// (1 chance in 216 per idle frame).
pub(crate) fn attack_roll(rng: &mut ChaCha8Rng) -> bool {
    let rolls = [roll_die(rng), roll_die(rng), roll_die(rng)];
    rolls == [2, 2, 2]
}

/// The AI fighter's idle: loops its idle clip and, while the match is active,
/// rolls the aggression dice every frame.
pub struct AiIdleState {
    blend: f32,
}

impl AiIdleState {
    pub fn new(blend: f32) -> Self {
        Self { blend }
    }
}

impl State for AiIdleState {
    fn name(&self) -> Action {
        Action::Idle
    }

    fn enter(&mut self, ctx: &mut StateContext<'_>, prev: Option<Action>) {
        let clip = Action::Idle.label();
        if let Some(prev) = prev {
            ctx.animations.reset(clip);
            ctx.animations
                .cross_fade_from(clip, prev.label(), self.blend, true);
        }
        ctx.animations.play(clip);
    }

    fn update(&mut self, ctx: &mut StateContext<'_>, _dt: f32, _input: &InputState) {
        if !ctx.match_active {
            return;
        }
        if attack_roll(ctx.rng) {
            ctx.request(Action::Punch);
        }
    }
}

/// The player's idle: does nothing, attacks come from input only.
pub struct PlayerIdleState;

impl State for PlayerIdleState {
    fn name(&self) -> Action {
        Action::Idle
    }

    fn enter(&mut self, _ctx: &mut StateContext<'_>, _prev: Option<Action>) {}
}
