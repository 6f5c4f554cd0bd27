//! Heuristic position evaluation.
//!
//! `score = territory·areas + army·Σarmy + continent·controlled
//!          − border·(owned → enemy adjacencies)`
//!
//! The border term can be restricted to one phase (`BorderPenalty`). The
//! scorer never fails: an unknown player scores 0 and a non-finite result
//! is replaced by 0.

use serde::{Deserialize, Serialize};

use crate::core::{GameState, Phase, PlayerId};

/// Phases in which the border-pressure term applies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderPenalty {
    #[default]
    Always,
    ReinforcementOnly,
    BattleOnly,
    Never,
}

impl BorderPenalty {
    fn applies(self, phase: Phase) -> bool {
        match self {
            BorderPenalty::Always => true,
            BorderPenalty::ReinforcementOnly => phase == Phase::Reinforcement,
            BorderPenalty::BattleOnly => phase == Phase::Battle,
            BorderPenalty::Never => false,
        }
    }
}

/// Heuristic weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Per owned territory.
    pub territory: f64,
    /// Per army unit on owned territory.
    pub army: f64,
    /// Per fully controlled continent.
    pub continent: f64,
    /// Per owned-country-to-enemy-neighbour adjacency (subtracted).
    pub border: f64,
    /// When the border term applies.
    pub border_penalty: BorderPenalty,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            territory: 10.0,
            army: 2.0,
            continent: 50.0,
            border: 5.0,
            border_penalty: BorderPenalty::Always,
        }
    }
}

/// Evaluates states from one player's point of view.
#[derive(Clone, Debug, Default)]
pub struct Scorer {
    weights: ScoringWeights,
}

impl Scorer {
    #[must_use]
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    /// Score for the state's current player.
    #[must_use]
    pub fn score(&self, state: &GameState) -> f64 {
        self.score_for(state, &state.current_player)
    }

    /// Score for `player`, 0 if the player is not in the state.
    #[must_use]
    pub fn score_for(&self, state: &GameState, player: &PlayerId) -> f64 {
        let Some(player) = state.player(player) else {
            return 0.0;
        };
        let w = &self.weights;

        let mut army = 0u64;
        let mut borders = 0u64;
        for area in player.areas.iter() {
            let Some(country) = state.country(area) else {
                continue;
            };
            army += u64::from(country.army);
            borders += country
                .neighbours
                .iter()
                .filter_map(|n| state.country(n))
                .filter(|n| !n.is_owned_by(&player.id))
                .count() as u64;
        }

        let continents = state
            .continents
            .iter()
            .filter(|c| state.controls(player, c))
            .count();

        let mut score = w.territory * player.areas.len() as f64
            + w.army * army as f64
            + w.continent * continents as f64;
        if w.border_penalty.applies(state.phase) {
            score -= w.border * borders as f64;
        }

        finite_or_zero(score)
    }
}

/// Replace NaN and infinities by 0.
#[inline]
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::MapBuilder;

    fn continent_state() -> GameState {
        MapBuilder::new()
            .player("P")
            .player("Q")
            .country("A", "P", 1)
            .country("B", "P", 1)
            .country("C", "P", 1)
            .country("D", "Q", 1)
            .link("A", "B")
            .link("B", "C")
            .continent("Trio", &["A", "B", "C"], 0)
            .continent("Solo", &["D"], 0)
            .build("P", Phase::Battle)
    }

    #[test]
    fn test_continent_bonus_once() {
        let state = continent_state();
        let scorer = Scorer::default();
        // 3 territories, 3 armies, 1 continent, no borders.
        assert_eq!(scorer.score(&state), 30.0 + 6.0 + 50.0);
    }

    #[test]
    fn test_losing_one_member_drops_bonus() {
        let mut state = continent_state();
        state.transfer_country(&"C".into(), &PlayerId::from("Q"));
        let scorer = Scorer::default();
        // 2 territories, 2 armies, B borders C.
        assert_eq!(scorer.score(&state), 20.0 + 4.0 - 5.0);
    }

    #[test]
    fn test_border_penalty_phases() {
        let state = MapBuilder::new()
            .player("P")
            .player("Q")
            .country("A", "P", 2)
            .country("Z", "Q", 1)
            .link("A", "Z")
            .build("P", Phase::Battle);

        let always = Scorer::default();
        assert_eq!(always.score(&state), 10.0 + 4.0 - 5.0);

        let reinforcement_only = Scorer::new(ScoringWeights {
            border_penalty: BorderPenalty::ReinforcementOnly,
            ..ScoringWeights::default()
        });
        assert_eq!(reinforcement_only.score(&state), 14.0);
        assert_eq!(
            reinforcement_only.score(&state.with_phase(Phase::Reinforcement)),
            9.0
        );
    }

    #[test]
    fn test_unknown_player_scores_zero() {
        let state = continent_state();
        assert_eq!(Scorer::default().score_for(&state, &PlayerId::from("Ghost")), 0.0);
    }

    #[test]
    fn test_dangling_area_is_skipped() {
        let mut state = continent_state();
        state
            .player_mut(&PlayerId::from("P"))
            .unwrap()
            .areas
            .insert("Atlantis".into());
        // Counted as territory, contributes no army or borders.
        assert_eq!(Scorer::default().score(&state), 40.0 + 6.0 + 50.0);
    }

    #[test]
    fn test_non_finite_weights_yield_zero() {
        let scorer = Scorer::new(ScoringWeights {
            army: f64::NAN,
            ..ScoringWeights::default()
        });
        assert_eq!(scorer.score(&continent_state()), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_empty_continent_never_counts() {
        let mut state = continent_state();
        state.continents.push_back(crate::core::Continent::new("Void", Vec::<&str>::new()));
        assert_eq!(Scorer::default().score(&state), 86.0);
    }
}
