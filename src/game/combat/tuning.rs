// Combat tuning - every gameplay constant in one place

use std::time::Duration;

use thiserror::Error;

use super::action::Action;

/// Errors produced when validating a tuning table.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TuningError {
    #[error("{0} must be an increasing range strictly inside (0, 1)")]
    InvalidWindow(&'static str),
    #[error("{0} must be positive")]
    NonPositive(&'static str),
}

/// Fixed gameplay constants for a match.
///
/// Both combatants read from the same table; separating these from the
/// controllers keeps the timing windows and damage numbers testable and lets
/// tests shrink or stretch them deliberately.
#[derive(Debug, Clone)]
pub struct CombatTuning {
    /// Hit points each combatant starts with
    pub starting_health: i32,

    // Damage
    /// The AI fighter's punch, applied once per clean (unguarded) activation
    pub punch_damage: i32,
    pub slash_damage: i32,
    pub chop_damage: i32,
    pub upper_slash_damage: i32,

    // Timing, as fractions of the attack clip's duration
    /// Window in which an unguarded punch connects
    pub hit_window: (f32, f32),
    /// Window in which a held guard absorbs the punch
    pub guard_window: (f32, f32),

    // Animation blending
    /// Crossfade length for most transitions
    pub attack_blend: f32,
    /// Crossfade length into a hit reaction
    pub react_blend: f32,

    // Input and effects
    /// Quiet window for coalescing transport notifications
    pub debounce_quiet: Duration,
    /// Seconds before a sword-effect overlay starts fading out
    pub overlay_ttl: f32,
}

/// The one tuning table the demo ships with.
pub const BASE_TUNING: CombatTuning = CombatTuning {
    starting_health: 100,

    punch_damage: 20,
    slash_damage: 20,
    chop_damage: 10,
    upper_slash_damage: 5,

    hit_window: (0.50, 0.55),
    guard_window: (0.30, 0.35),

    attack_blend: 0.5,
    react_blend: 0.2,

    debounce_quiet: Duration::from_millis(350),
    overlay_ttl: 0.5,
};

impl Default for CombatTuning {
    fn default() -> Self {
        BASE_TUNING
    }
}

impl CombatTuning {
    pub fn standard() -> Self {
        BASE_TUNING
    }

    /// Damage dealt by one of the player's attacks. Zero for anything that is
    /// not a player attack.
    pub fn damage_for(&self, attack: Action) -> i32 {
        match attack {
            Action::Slash => self.slash_damage,
            Action::Chop => self.chop_damage,
            Action::UpperSlash => self.upper_slash_damage,
            _ => 0,
        }
    }

    /// Check the table is internally consistent.
    pub fn validate(&self) -> Result<(), TuningError> {
        fn check_window(name: &'static str, (lo, hi): (f32, f32)) -> Result<(), TuningError> {
            if lo <= 0.0 || hi >= 1.0 || lo >= hi {
                return Err(TuningError::InvalidWindow(name));
            }
            Ok(())
        }

        check_window("hit_window", self.hit_window)?;
        check_window("guard_window", self.guard_window)?;

        if self.starting_health <= 0 {
            return Err(TuningError::NonPositive("starting_health"));
        }
        for (name, value) in [
            ("punch_damage", self.punch_damage),
            ("slash_damage", self.slash_damage),
            ("chop_damage", self.chop_damage),
            ("upper_slash_damage", self.upper_slash_damage),
        ] {
            if value <= 0 {
                return Err(TuningError::NonPositive(name));
            }
        }
        if self.attack_blend <= 0.0 {
            return Err(TuningError::NonPositive("attack_blend"));
        }
        if self.react_blend <= 0.0 {
            return Err(TuningError::NonPositive("react_blend"));
        }
        if self.overlay_ttl <= 0.0 {
            return Err(TuningError::NonPositive("overlay_ttl"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_tuning_is_valid() {
        assert_eq!(BASE_TUNING.validate(), Ok(()));
    }

    #[test]
    fn test_standard_equals_default() {
        let standard = CombatTuning::standard();
        let default = CombatTuning::default();
        assert_eq!(standard.punch_damage, default.punch_damage);
        assert_eq!(standard.hit_window, default.hit_window);
    }

    #[test]
    fn test_attack_damage_table() {
        let tuning = CombatTuning::standard();
        assert_eq!(tuning.damage_for(Action::Slash), 20);
        assert_eq!(tuning.damage_for(Action::Chop), 10);
        assert_eq!(tuning.damage_for(Action::UpperSlash), 5);
        assert_eq!(tuning.damage_for(Action::Guard), 0);
    }

    #[test]
    fn test_invalid_window_rejected() {
        let mut tuning = CombatTuning::standard();
        tuning.hit_window = (0.55, 0.50);
        assert_eq!(
            tuning.validate(),
            Err(TuningError::InvalidWindow("hit_window"))
        );

        tuning.hit_window = (0.0, 0.5);
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_nonpositive_damage_rejected() {
        let mut tuning = CombatTuning::standard();
        tuning.chop_damage = 0;
        assert_eq!(
            tuning.validate(),
            Err(TuningError::NonPositive("chop_damage"))
        );
    }
}
