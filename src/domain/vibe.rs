use serde::{Deserialize, Serialize};

const UNSET_TITLE: &str = "Set the vibe ✨";

/// Kind of meetup the organizer has in mind; drives the default title.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Vibe {
    #[default]
    Drink,
    Coffee,
    Dinner,
    Walk,
    Gym,
    Game,
    Study,
    Chill,
    Custom,
}

impl Vibe {
    pub const ALL: [Vibe; 9] = [
        Vibe::Drink,
        Vibe::Coffee,
        Vibe::Dinner,
        Vibe::Walk,
        Vibe::Gym,
        Vibe::Game,
        Vibe::Study,
        Vibe::Chill,
        Vibe::Custom,
    ];

    pub const fn default_title(&self) -> Option<&'static str> {
        match self {
            Vibe::Drink => Some("Ping for a drink?"),
            Vibe::Coffee => Some("Coffee hang?"),
            Vibe::Dinner => Some("Dinner tonight?"),
            Vibe::Walk => Some("Walk & talk?"),
            Vibe::Gym => Some("Gym session?"),
            Vibe::Game => Some("Game night?"),
            Vibe::Study => Some("Study session?"),
            Vibe::Chill => Some("Just chill?"),
            Vibe::Custom => None,
        }
    }

    /// Builds the ping title from the vibe and the organizer's own text.
    pub fn title(&self, extra: &str) -> String {
        let extra = extra.trim();
        match (self.default_title(), extra.is_empty()) {
            (Some(base), true) => base.to_string(),
            (Some(base), false) => format!("{base} – {extra}"),
            (None, true) => UNSET_TITLE.to_string(),
            (None, false) => extra.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles() {
        assert_eq!(Vibe::Coffee.title(""), "Coffee hang?");
        assert_eq!(Vibe::Drink.title("  at Kvarnen "), "Ping for a drink? – at Kvarnen");
        assert_eq!(Vibe::Custom.title(" Board games "), "Board games");
        assert_eq!(Vibe::Custom.title("   "), "Set the vibe ✨");
    }

    #[test]
    fn every_non_custom_vibe_has_a_default() {
        for vibe in Vibe::ALL {
            assert_eq!(vibe.default_title().is_none(), vibe == Vibe::Custom);
        }
    }
}
