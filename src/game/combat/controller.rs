// Combatant controllers
//
// Two controllers drive the match: the AI fighter (dice-gated punches with
// timing-window hit detection against the animation clock) and the player
// (notification-driven attacks resolved immediately on their hit tick).
// Neither owns its opponent; the arena lends the opponent mutably into each
// per-frame update.

use std::time::Instant;

use log::{debug, info};
use rand_chacha::ChaCha8Rng;

use crate::engine::animation::{AnimationClip, Mixer};
use crate::engine::audio::EffectSink;

use super::action::Action;
use super::fsm::StateMachine;
use super::health::Health;
use super::input::{InputState, NotifyInput};
use super::state::{CombatEvent, StateContext};
use super::tuning::CombatTuning;

/// Shared match facilities threaded explicitly through every update, so no
/// controller depends on ambient global state.
pub struct MatchContext<'a> {
    pub sink: &'a mut dyn EffectSink,
    pub rng: &'a mut ChaCha8Rng,
    /// True while a round is in progress; gates the AI's aggression and is
    /// cleared when either combatant's health runs out.
    pub match_active: &'a mut bool,
    pub tuning: &'a CombatTuning,
}

/// Round to one decimal place, the resolution at which clip durations are
/// compared for timing windows.
pub(crate) fn round_to_1_decimal(value: f32) -> f32 {
    (value * 10.0).round() / 10.0
}

fn state_ctx<'b>(
    animations: &'b mut Mixer,
    m: &'b mut MatchContext<'_>,
    events: &'b mut Vec<CombatEvent>,
) -> StateContext<'b> {
    StateContext::new(animations, &mut *m.sink, &mut *m.rng, *m.match_active, events)
}

/// Clip set for the AI paladin model.
pub fn paladin_mixer() -> Mixer {
    let mut mixer = Mixer::new();
    mixer.add_clip(AnimationClip::looping("idle", 3.2));
    mixer.add_clip(AnimationClip::one_shot("punch", 2.2));
    mixer.add_clip(AnimationClip::one_shot("death", 2.8));
    mixer.add_clip(AnimationClip::one_shot("victory", 3.0));
    mixer.add_clip(AnimationClip::one_shot("react", 0.8));
    mixer
}

/// Clip set for the player's sword rig.
pub fn swordsman_mixer() -> Mixer {
    let mut mixer = Mixer::new();
    mixer.add_clip(AnimationClip::looping("idle", 2.0));
    mixer.add_clip(AnimationClip::one_shot("slash", 0.6));
    mixer.add_clip(AnimationClip::one_shot("chop", 0.5));
    mixer.add_clip(AnimationClip::one_shot("upper_slash", 0.7));
    mixer.add_clip(AnimationClip::one_shot("guard", 0.4));
    mixer.add_clip(AnimationClip::one_shot("react", 0.8));
    mixer
}

/// The AI-controlled fighter.
pub struct AiController {
    pub health: Health,
    /// Direct-keys input variant; flags are set externally, never by the
    /// controller itself.
    pub input: InputState,
    fsm: StateMachine,
    animations: Mixer,
    /// Time accumulated inside the current punch activation
    punch_elapsed: f32,
    /// Whether this punch activation already forced the opponent's guard
    did_guard: bool,
}

impl AiController {
    pub fn new(tuning: &CombatTuning, animations: Mixer) -> Self {
        Self {
            health: Health::new("fighter", tuning.starting_health),
            input: InputState::fighter_keys(),
            fsm: StateMachine::character(tuning),
            animations,
            punch_elapsed: 0.0,
            did_guard: false,
        }
    }

    pub fn current_state(&self) -> Option<Action> {
        self.fsm.current_name()
    }

    /// Transition this fighter's machine from outside (match start, terminal
    /// states, incoming hits).
    pub fn force_state(&mut self, name: Action, m: &mut MatchContext<'_>) {
        let mut events = Vec::new();
        let mut ctx = state_ctx(&mut self.animations, m, &mut events);
        self.fsm.set_state(name, &mut ctx);
    }

    /// Take a hit from the player: lose health and flinch.
    pub fn take_hit(&mut self, damage: i32, m: &mut MatchContext<'_>) {
        self.health.deduct(damage);
        self.force_state(Action::React, m);
    }

    /// Per-frame update. `opponent` is the player, lent by the arena.
    pub fn update(&mut self, dt: f32, m: &mut MatchContext<'_>, opponent: &mut PlayerController) {
        let mut events = Vec::new();
        {
            let mut ctx = state_ctx(&mut self.animations, m, &mut events);
            self.fsm.update(&mut ctx, dt, &self.input);
        }

        if self.fsm.current_name() == Some(Action::Punch) {
            self.punch_elapsed += dt;
            self.resolve_punch(m, opponent);
        } else {
            self.punch_elapsed = 0.0;
            self.did_guard = false;
        }

        let finished = self.animations.advance(dt);
        for _clip in finished {
            let mut ctx = state_ctx(&mut self.animations, m, &mut events);
            self.fsm.notify_finished(&mut ctx);
        }
    }

    /// Timing-gated hit detection against the punch clip's clock.
    fn resolve_punch(&mut self, m: &mut MatchContext<'_>, opponent: &mut PlayerController) {
        let Some(duration) = self.animations.duration(Action::Punch.label()) else {
            return;
        };
        let total = round_to_1_decimal(duration);
        let elapsed = self.punch_elapsed;

        if !opponent.guard_held() {
            let (lo, hi) = m.tuning.hit_window;
            if elapsed > total * lo && elapsed < total * hi && !self.fsm.current_handled() {
                self.fsm.mark_current_handled();
                let damage = m.tuning.punch_damage;
                info!("fighter punch connects for {damage}");
                opponent.take_hit(damage, m);
            }
        } else {
            let (lo, hi) = m.tuning.guard_window;
            if !self.did_guard && elapsed > total * lo && elapsed < total * hi {
                debug!("punch guarded");
                opponent.force_state(Action::Guard, m);
                self.did_guard = true;
            }
        }

        if self.health.is_depleted() || opponent.health.is_depleted() {
            *m.match_active = false;
        }

        // Punch clip looped around: start the next activation's clock
        if elapsed >= total {
            self.punch_elapsed = 0.0;
        }
    }
}

/// One spawned sword-effect overlay. The overlay starts fading once it is
/// older than the tuning TTL; actual removal comes from the presentation
/// layer's transition-end signal.
#[derive(Debug, Clone, PartialEq)]
pub struct EffectOverlay {
    pub name: &'static str,
    pub spawned_at: f32,
    pub fading: bool,
}

/// The input-driven combatant.
pub struct PlayerController {
    pub health: Health,
    pub input: NotifyInput,
    fsm: StateMachine,
    animations: Mixer,
    effects: Vec<EffectOverlay>,
    /// Accumulated match time, used to age effect overlays
    clock: f32,
    /// Blur/grayscale intensity derived from damage taken; purely cosmetic
    dizzy: f32,
}

impl PlayerController {
    pub fn new(tuning: &CombatTuning, animations: Mixer) -> Self {
        Self {
            health: Health::new("player", tuning.starting_health),
            input: NotifyInput::new(tuning.debounce_quiet),
            fsm: StateMachine::player(tuning),
            animations,
            effects: Vec::new(),
            clock: 0.0,
            dizzy: 0.0,
        }
    }

    pub fn current_state(&self) -> Option<Action> {
        self.fsm.current_name()
    }

    /// Whether the guard key is currently asserted. The AI reads this while
    /// timing its punch.
    pub fn guard_held(&self) -> bool {
        self.input.keys.is_set(Action::Guard)
    }

    /// Stage a raw transport code (called at any real-world time).
    pub fn notify(&mut self, code: u8, now: Instant) {
        self.input.notify(code, now);
    }

    /// Consume a debounced notification, if due.
    pub fn poll_input(&mut self, now: Instant) -> Option<Action> {
        self.input.poll(now)
    }

    pub fn force_state(&mut self, name: Action, m: &mut MatchContext<'_>) {
        let mut events = Vec::new();
        let mut ctx = state_ctx(&mut self.animations, m, &mut events);
        self.fsm.set_state(name, &mut ctx);
    }

    /// Take a hit from the fighter: lose health and flinch.
    pub fn take_hit(&mut self, damage: i32, m: &mut MatchContext<'_>) {
        self.health.deduct(damage);
        self.force_state(Action::React, m);
    }

    /// Request an attack of the given type. Unknown types are silently
    /// ignored; known types fire only if their input flag is set, and firing
    /// resets every flag. That reset is what makes one input pulse yield
    /// exactly one activation: the keys are scanned in a fixed order each
    /// frame, and the first match clears the flags before the rest are
    /// checked.
    pub fn attack(&mut self, kind: Action, m: &mut MatchContext<'_>) {
        if !kind.is_player_attack() {
            return;
        }
        if !self.input.keys.is_set(kind) {
            return;
        }
        self.force_state(kind, m);
        self.input.keys.reset_states();
    }

    /// Per-frame update. `opponent` is the AI fighter, lent by the arena.
    pub fn update(&mut self, dt: f32, m: &mut MatchContext<'_>, opponent: &mut AiController) {
        self.clock += dt;

        let mut events = Vec::new();
        {
            let mut ctx = state_ctx(&mut self.animations, m, &mut events);
            self.fsm.update(&mut ctx, dt, &self.input.keys);
        }
        for event in events {
            match event {
                CombatEvent::Strike(kind) => self.resolve_attack(kind, m, opponent),
            }
        }

        // Overlays past their TTL start fading; removal is external
        for effect in &mut self.effects {
            if !effect.fading && self.clock - effect.spawned_at > m.tuning.overlay_ttl {
                effect.fading = true;
            }
        }

        for kind in Action::ATTACK_SCAN {
            if self.input.keys.is_set(kind) {
                self.attack(kind, m);
            }
        }

        self.dizzy = (100 - self.health.points()).abs() as f32 * 0.05;

        let finished = self.animations.advance(dt);
        for _clip in finished {
            let mut events = Vec::new();
            let mut ctx = state_ctx(&mut self.animations, m, &mut events);
            self.fsm.notify_finished(&mut ctx);
        }
    }

    /// Apply a landed attack: damage, flinch, and cosmetic feedback.
    fn resolve_attack(&mut self, kind: Action, m: &mut MatchContext<'_>, opponent: &mut AiController) {
        let damage = m.tuning.damage_for(kind);
        info!("player {} connects for {damage}", kind.label());
        opponent.take_hit(damage, m);
        self.set_effect(kind, m);
    }

    fn set_effect(&mut self, kind: Action, m: &mut MatchContext<'_>) {
        m.sink.play_sound("slash");
        m.sink.play_effect(kind.label());
        self.effects.push(EffectOverlay {
            name: kind.label(),
            spawned_at: self.clock,
            fading: false,
        });
    }

    /// The presentation layer finished an overlay's fade-out transition;
    /// retire the oldest one.
    pub fn overlay_transition_end(&mut self) {
        if !self.effects.is_empty() {
            self.effects.remove(0);
        }
    }

    pub fn effects(&self) -> &[EffectOverlay] {
        &self.effects
    }

    /// Blur/grayscale intensity for the presentation layer.
    pub fn dizzy_level(&self) -> f32 {
        self.dizzy
    }
}
