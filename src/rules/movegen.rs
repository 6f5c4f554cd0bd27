//! Legal move generation and terminal detection.
//!
//! `MoveGenerator::generate` dispatches on the state's phase and returns
//! every candidate move paired with its successor state. Lookups that fail
//! (unknown current player, dangling neighbour names) shrink the result
//! instead of raising.

use crate::core::{Allocations, CountryId, GameRng, GameState, Move, Phase};

use super::allocation::{AllocationPolicy, AllocationStrategy};
use super::combat::resolve_attack;

/// Generates candidate moves for a state.
pub struct MoveGenerator {
    allocation: Box<dyn AllocationStrategy>,
}

impl MoveGenerator {
    /// Create a generator using the given allocation policy.
    #[must_use]
    pub fn new(policy: &AllocationPolicy) -> Self {
        Self {
            allocation: policy.strategy(),
        }
    }

    /// Create a generator with a custom allocation strategy.
    pub fn with_strategy<S: AllocationStrategy + 'static>(strategy: S) -> Self {
        Self {
            allocation: Box::new(strategy),
        }
    }

    /// All candidate moves for the state's phase.
    pub fn generate(&self, state: &GameState, rng: &mut GameRng) -> Vec<(Move, GameState)> {
        match state.phase {
            Phase::Reinforcement => self.reinforcement_moves(state, rng),
            Phase::Battle => battle_moves(state, rng),
        }
    }

    /// Reinforcement candidates. Empty when there is no reserve to place.
    pub fn reinforcement_moves(
        &self,
        state: &GameState,
        rng: &mut GameRng,
    ) -> Vec<(Move, GameState)> {
        let reserve = match state.current() {
            Some(player) if player.reserve > 0 => player.reserve,
            _ => return Vec::new(),
        };

        self.allocation
            .allocations(state, reserve, rng)
            .into_iter()
            .map(|allocations| {
                let successor = apply_allocations(state, &allocations);
                (Move::Reinforce { allocations }, successor)
            })
            .collect()
    }
}

impl Default for MoveGenerator {
    fn default() -> Self {
        Self::new(&AllocationPolicy::default())
    }
}

/// Successor after placing `allocations`: armies added, reserve zeroed.
///
/// The phase is left alone; advancing it is the caller's business.
#[must_use]
pub fn apply_allocations(state: &GameState, allocations: &Allocations) -> GameState {
    let mut successor = state.clone();
    for alloc in allocations {
        if let Some(country) = successor.country_mut(&alloc.country) {
            country.army = country.army.saturating_add(alloc.troops);
        }
    }
    let current = successor.current_player.clone();
    if let Some(player) = successor.player_mut(&current) {
        player.reserve = 0;
    }
    successor
}

/// Legal `(from, to)` attack pairs for the current player.
///
/// Sources are owned countries with more than one army, in country-ID
/// order; targets are listed neighbours that exist and belong to someone
/// else (or no one), in neighbour order.
#[must_use]
pub fn attack_pairs(state: &GameState) -> Vec<(CountryId, CountryId)> {
    let player = &state.current_player;
    if state.current().is_none() {
        return Vec::new();
    }

    state
        .owned_countries(player)
        .filter(|country| country.army > 1)
        .flat_map(|country| {
            state
                .enemy_neighbours(country, player)
                .map(move |enemy| (country.id.clone(), enemy.id.clone()))
        })
        .collect()
}

/// Battle candidates: one resolved attack per legal pair.
pub fn battle_moves(state: &GameState, rng: &mut GameRng) -> Vec<(Move, GameState)> {
    attack_pairs(state)
        .into_iter()
        .filter_map(|(from, to)| resolve_attack(state, &from, &to, rng))
        .collect()
}

/// Check if at most one player still holds territory.
#[must_use]
pub fn is_game_over(state: &GameState) -> bool {
    state.alive_players() < 2
}

/// Check if the state admits no further move in its phase.
///
/// True when the game is over, the current player reached its target or
/// cannot be found, or (Reinforcement) the reserve is spent, or (Battle) no
/// attack is available.
#[must_use]
pub fn is_terminal(state: &GameState) -> bool {
    if is_game_over(state) {
        return true;
    }
    let Some(player) = state.current() else {
        return true;
    };
    if player.reached_target() {
        return true;
    }
    match state.phase {
        Phase::Reinforcement => player.reserve == 0,
        Phase::Battle => attack_pairs(state).is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Allocation, PlayerId};
    use crate::maps::MapBuilder;
    use crate::rules::combat::roll_battle;

    fn pincer(phase: Phase) -> GameState {
        MapBuilder::new()
            .player("A")
            .player("B")
            .reserve("A", 5)
            .country("X", "A", 3)
            .country("Y", "A", 1)
            .country("Z", "B", 5)
            .link("X", "Z")
            .link("Y", "Z")
            .build("A", phase)
    }

    #[test]
    fn test_attack_pairs_exclude_single_army() {
        let state = pincer(Phase::Battle);
        assert_eq!(
            attack_pairs(&state),
            vec![(CountryId::from("X"), CountryId::from("Z"))]
        );
    }

    #[test]
    fn test_pincer_attack_rolls_two_against_two() {
        let mut state = pincer(Phase::Battle);
        let outcome = roll_battle(&mut state, &"X".into(), &"Z".into(), &mut GameRng::new(3))
            .unwrap();
        assert_eq!(outcome.attacker_dice, 2);
        assert_eq!(outcome.defender_dice, 2);
        assert_eq!(outcome.attacker_losses + outcome.defender_losses, 2);
    }

    #[test]
    fn test_allocation_saturates_huge_garrison() {
        let state = MapBuilder::new()
            .player("P")
            .player("Q")
            .reserve("P", 5)
            .country("A", "P", u32::MAX - 1)
            .country("Z", "Q", 1)
            .link("A", "Z")
            .build("P", Phase::Reinforcement);

        let moves = MoveGenerator::default().generate(&state, &mut GameRng::new(0));
        assert!(!moves.is_empty());
        for (_, successor) in &moves {
            assert_eq!(successor.army(&"A".into()), u32::MAX);
        }
    }

    #[test]
    fn test_battle_moves_preserve_ownership() {
        let state = pincer(Phase::Battle);
        let moves = battle_moves(&state, &mut GameRng::new(9));
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].0, Move::attack("X", "Z"));
        assert!(moves[0].1.ownership_consistent());
    }

    #[test]
    fn test_reinforcement_successor() {
        let state = pincer(Phase::Reinforcement);
        let generator = MoveGenerator::default();
        let moves = generator.generate(&state, &mut GameRng::new(1));

        assert!(!moves.is_empty());
        for (mv, successor) in &moves {
            assert_eq!(mv.troops_placed(), 5);
            assert_eq!(successor.current().unwrap().reserve, 0);
            assert_eq!(successor.phase, Phase::Reinforcement);
            let added = successor.army(&"X".into()) + successor.army(&"Y".into()) - 4;
            assert_eq!(added, 5);
        }
        // Input untouched.
        assert_eq!(state.current().unwrap().reserve, 5);
    }

    #[test]
    fn test_no_reserve_no_moves() {
        let mut state = pincer(Phase::Reinforcement);
        state.player_mut(&PlayerId::from("A")).unwrap().reserve = 0;
        let moves = MoveGenerator::default().generate(&state, &mut GameRng::new(1));
        assert!(moves.is_empty());
        assert!(is_terminal(&state));
    }

    #[test]
    fn test_unknown_current_player_fails_soft() {
        let mut state = pincer(Phase::Battle);
        state.current_player = PlayerId::from("Nobody");
        assert!(attack_pairs(&state).is_empty());
        assert!(MoveGenerator::default()
            .generate(&state.with_phase(Phase::Reinforcement), &mut GameRng::new(1))
            .is_empty());
        assert!(is_terminal(&state));
    }

    #[test]
    fn test_terminal_conditions() {
        let state = pincer(Phase::Battle);
        assert!(!is_terminal(&state));
        assert!(!is_terminal(&state.with_phase(Phase::Reinforcement)));

        let mut won = state.clone();
        won.player_mut(&PlayerId::from("A")).unwrap().target = Some(2);
        assert!(is_terminal(&won));

        let mut alone = state.clone();
        alone.transfer_country(&"Z".into(), &PlayerId::from("A"));
        assert!(is_game_over(&alone));
        assert!(is_terminal(&alone));
    }

    #[test]
    fn test_apply_allocations_ignores_unknown_country() {
        let state = pincer(Phase::Reinforcement);
        let allocs: Allocations = [Allocation::new("X", 2), Allocation::new("Ghost", 3)]
            .into_iter()
            .collect();
        let successor = apply_allocations(&state, &allocs);
        assert_eq!(successor.army(&"X".into()), 5);
        assert!(successor.country(&"Ghost".into()).is_none());
    }
}
