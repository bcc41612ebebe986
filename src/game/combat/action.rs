// Combat action namespace
//
// One flat enum names everything the combat core refers to by name: input
// flags, state identities, and animation-clip keys all share this namespace.

/// Every named action/state in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Standing by (both combatants; behavior differs per machine)
    Idle,
    /// The AI fighter's one heavy attack
    Punch,
    /// Terminal loss animation (AI fighter)
    Death,
    /// Terminal win animation (AI fighter)
    Victory,
    /// Flinch after taking a hit
    React,
    /// Player attack, 20 damage
    Slash,
    /// Player attack, 10 damage
    Chop,
    /// Player attack, 5 damage
    UpperSlash,
    /// Player block
    Guard,
}

impl Action {
    /// The player's attack keys, in the order the controller scans them each
    /// frame. The first asserted key wins: `attack()` resets every flag on
    /// activation, so later entries in the same frame see nothing set.
    pub const ATTACK_SCAN: [Action; 3] = [Action::Slash, Action::Chop, Action::UpperSlash];

    /// Stable name, used as the animation-clip key and in logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::Idle => "idle",
            Action::Punch => "punch",
            Action::Death => "death",
            Action::Victory => "victory",
            Action::React => "react",
            Action::Slash => "slash",
            Action::Chop => "chop",
            Action::UpperSlash => "upper_slash",
            Action::Guard => "guard",
        }
    }

    /// Interpret a transport notification code. The code is an index into the
    /// sword's state table; anything unrecognized reads as idle rather than
    /// failing.
    pub fn from_code(code: u8) -> Action {
        match code {
            0 => Action::Chop,
            1 => Action::Slash,
            2 => Action::Guard,
            3 => Action::UpperSlash,
            _ => Action::Idle,
        }
    }

    /// Whether this is one of the three player attacks.
    pub fn is_player_attack(&self) -> bool {
        matches!(self, Action::Slash | Action::Chop | Action::UpperSlash)
    }
}
