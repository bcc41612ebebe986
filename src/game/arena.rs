// Arena: owns both combatants and the shared match facilities
//
// The combatants never hold references to one another. Each frame the arena
// lends the opponent mutably into the other's update, which is what lets a
// landed hit deduct health and force a reaction state in the same pass.

use std::time::Instant;

use log::info;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::audio::EffectSink;

use super::combat::controller::{paladin_mixer, swordsman_mixer};
use super::combat::{Action, AiController, CombatTuning, MatchContext, PlayerController, TuningError};

pub struct Arena {
    tuning: CombatTuning,
    fighter: AiController,
    player: PlayerController,
    sink: Box<dyn EffectSink>,
    rng: ChaCha8Rng,
    match_active: bool,
}

impl Arena {
    /// Build an arena with both combatants installed in their idle states.
    /// The match itself does not start until [`Arena::start`].
    pub fn new(
        tuning: CombatTuning,
        sink: Box<dyn EffectSink>,
        seed: u64,
    ) -> Result<Self, TuningError> {
        tuning.validate()?;

        let fighter = AiController::new(&tuning, paladin_mixer());
        let player = PlayerController::new(&tuning, swordsman_mixer());
        let mut arena = Self {
            tuning,
            fighter,
            player,
            sink,
            rng: ChaCha8Rng::seed_from_u64(seed),
            match_active: false,
        };

        let Self {
            tuning,
            fighter,
            player,
            sink,
            rng,
            match_active,
        } = &mut arena;
        let mut m = MatchContext {
            sink: sink.as_mut(),
            rng,
            match_active,
            tuning,
        };
        fighter.force_state(Action::Idle, &mut m);
        player.force_state(Action::Idle, &mut m);

        Ok(arena)
    }

    /// Open the round: from here the AI fighter is allowed to attack.
    pub fn start(&mut self) {
        info!("match started");
        self.match_active = true;
    }

    pub fn is_active(&self) -> bool {
        self.match_active
    }

    /// Feed a raw notification code into the player's debounced input.
    pub fn notify(&mut self, code: u8, now: Instant) {
        self.player.notify(code, now);
    }

    /// One fixed-timestep simulation step.
    pub fn step(&mut self, dt: f32, now: Instant) {
        let Self {
            tuning,
            fighter,
            player,
            sink,
            rng,
            match_active,
        } = self;
        let mut m = MatchContext {
            sink: sink.as_mut(),
            rng,
            match_active,
            tuning,
        };

        player.poll_input(now);
        fighter.update(dt, &mut m, player);
        player.update(dt, &mut m, fighter);

        // Terminal states are forced every frame after depletion; the state
        // machine's same-name no-op keeps the animations from restarting.
        if fighter.health.is_depleted() {
            *m.match_active = false;
            fighter.force_state(Action::Death, &mut m);
        } else if player.health.is_depleted() {
            *m.match_active = false;
            fighter.force_state(Action::Victory, &mut m);
        }
    }

    pub fn fighter(&self) -> &AiController {
        &self.fighter
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::audio::NullSink;
    use std::time::Duration;

    const DT: f32 = 1.0 / 60.0;

    fn arena() -> Arena {
        let mut arena = Arena::new(CombatTuning::standard(), Box::new(NullSink), 7)
            .expect("standard tuning is valid");
        arena.start();
        arena
    }

    #[test]
    fn test_two_phase_construction() {
        let arena = Arena::new(CombatTuning::standard(), Box::new(NullSink), 7)
            .expect("standard tuning is valid");

        // Built but not started: both combatants idle, round closed
        assert!(!arena.is_active());
        assert_eq!(arena.fighter().current_state(), Some(Action::Idle));
        assert_eq!(arena.player().current_state(), Some(Action::Idle));
    }

    #[test]
    fn test_invalid_tuning_is_rejected() {
        let tuning = CombatTuning {
            hit_window: (0.6, 0.5),
            ..CombatTuning::standard()
        };
        assert!(Arena::new(tuning, Box::new(NullSink), 7).is_err());
    }

    #[test]
    fn test_player_attacks_flow_through_arena() {
        let mut arena = arena();

        let t0 = Instant::now();
        arena.notify(1, t0); // slash
        let release = t0 + Duration::from_millis(400);

        for i in 0..3 {
            arena.step(DT, release + Duration::from_millis(i * 17));
        }

        assert_eq!(arena.fighter().health.points(), 80);
    }

    #[test]
    fn test_fighter_defeat_ends_match_with_death() {
        let mut arena = arena();
        arena.fighter.health.deduct(100);

        let now = Instant::now();
        arena.step(DT, now);

        assert!(!arena.is_active());
        assert_eq!(arena.fighter().current_state(), Some(Action::Death));

        // Subsequent frames keep the terminal state without restarting it
        arena.step(DT, now + Duration::from_millis(17));
        arena.step(DT, now + Duration::from_millis(34));
        assert_eq!(arena.fighter().current_state(), Some(Action::Death));
    }

    #[test]
    fn test_player_defeat_ends_match_with_victory() {
        let mut arena = arena();
        arena.player.health.deduct(100);

        arena.step(DT, Instant::now());

        assert!(!arena.is_active());
        assert_eq!(arena.fighter().current_state(), Some(Action::Victory));
        assert_eq!(arena.player().current_state(), Some(Action::Idle));
    }
}
