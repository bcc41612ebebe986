// Combatant hit points

use log::debug;

/// Hit points for one combatant.
///
/// The stored value starts at 100 and is deliberately unclamped: it may go
/// arbitrarily negative, and callers only ever compare it against zero. Only
/// the displayed bar width is clamped to [0, 100].
#[derive(Debug)]
pub struct Health {
    owner: String,
    points: i32,
}

impl Health {
    pub fn new(owner: &str, starting: i32) -> Self {
        Self {
            owner: owner.to_string(),
            points: starting,
        }
    }

    /// Subtract `amount` and update the displayed bar. No error conditions.
    pub fn deduct(&mut self, amount: i32) {
        self.points -= amount;
        debug!("{} health bar: {}%", self.owner, self.bar_percent());
    }

    /// The raw, unclamped value, for threshold comparisons.
    pub fn points(&self) -> i32 {
        self.points
    }

    /// Bar width for display, clamped to [0, 100].
    pub fn bar_percent(&self) -> i32 {
        self.points.clamp(0, 100)
    }

    pub fn is_depleted(&self) -> bool {
        self.points <= 0
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_full() {
        let health = Health::new("paladin", 100);
        assert_eq!(health.points(), 100);
        assert_eq!(health.bar_percent(), 100);
        assert!(!health.is_depleted());
    }

    #[test]
    fn test_deduct() {
        let mut health = Health::new("player", 100);
        health.deduct(20);
        assert_eq!(health.points(), 80);
        assert_eq!(health.bar_percent(), 80);
    }

    #[test]
    fn test_internal_value_goes_negative() {
        let mut health = Health::new("player", 100);
        for _ in 0..6 {
            health.deduct(20);
        }
        assert_eq!(health.points(), -20);
        assert!(health.is_depleted());
    }

    #[test]
    fn test_bar_stays_in_range() {
        let mut health = Health::new("player", 100);
        // Any sequence of deductions keeps the bar within [0, 100]
        for amount in [0, 5, 10, 20, 50, 100] {
            health.deduct(amount);
            assert!((0..=100).contains(&health.bar_percent()));
        }
        assert_eq!(health.bar_percent(), 0);
    }
}
