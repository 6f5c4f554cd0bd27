//! Reinforcement candidate tests across both allocation policies.

use proptest::prelude::*;
use territory_mcts::core::{GameRng, Move, Phase};
use territory_mcts::maps::{two_continents, MapBuilder};
use territory_mcts::rules::{AllocationPolicy, MoveGenerator};

fn with_reserve(reserve: u32) -> territory_mcts::core::GameState {
    let mut state = two_continents(Phase::Reinforcement);
    let red = state.current_player.clone();
    if let Some(player) = state.player_mut(&red) {
        player.reserve = reserve;
    }
    state
}

// =============================================================================
// Sum Invariant
// =============================================================================

proptest! {
    #[test]
    fn test_proportional_moves_place_whole_reserve(reserve in 1u32..60, seed in any::<u64>()) {
        let state = with_reserve(reserve);
        let generator = MoveGenerator::new(&AllocationPolicy::default());
        let moves = generator.generate(&state, &mut GameRng::new(seed));

        prop_assert!(!moves.is_empty());
        for (mv, successor) in &moves {
            prop_assert_eq!(mv.troops_placed(), u64::from(reserve));
            prop_assert_eq!(successor.current().unwrap().reserve, 0);
            prop_assert!(successor.ownership_consistent());
        }
    }

    #[test]
    fn test_top_k_moves_place_whole_reserve(reserve in 1u32..12, k in 1usize..4) {
        let state = with_reserve(reserve);
        let generator = MoveGenerator::new(&AllocationPolicy::top_k(k));
        let moves = generator.generate(&state, &mut GameRng::new(0));

        prop_assert!(!moves.is_empty());
        for (mv, _) in &moves {
            prop_assert_eq!(mv.troops_placed(), u64::from(reserve));
        }
    }
}

// =============================================================================
// Policy Behaviour
// =============================================================================

#[test]
fn test_successor_armies_grow_by_reserve() {
    let state = with_reserve(6);
    let generator = MoveGenerator::default();
    let before: u64 = state.countries.values().map(|c| u64::from(c.army)).sum();

    for (_, successor) in generator.generate(&state, &mut GameRng::new(1)) {
        let after: u64 = successor.countries.values().map(|c| u64::from(c.army)).sum();
        assert_eq!(after, before + 6);
    }
}

#[test]
fn test_variation_count_is_upper_bound() {
    let state = with_reserve(6);
    let generator = MoveGenerator::new(&AllocationPolicy::default().with_variations(50));
    let moves = generator.generate(&state, &mut GameRng::new(9));

    assert!(!moves.is_empty());
    assert!(moves.len() <= 50);
    // The first candidate is the unperturbed split.
    assert!(moves[0].0.is_reinforce());
}

#[test]
fn test_no_reserve_no_moves() {
    let state = with_reserve(0);
    let generator = MoveGenerator::default();
    assert!(generator.generate(&state, &mut GameRng::new(0)).is_empty());
}

#[test]
fn test_interior_only_player_spreads_round_robin() {
    // P borders nobody, so every country has priority 0.
    let state = MapBuilder::new()
        .player("P")
        .player("Q")
        .reserve("P", 3)
        .country("A", "P", 1)
        .country("B", "P", 1)
        .country("Z", "Q", 1)
        .link("A", "B")
        .build("P", Phase::Reinforcement);

    let moves = MoveGenerator::default().generate(&state, &mut GameRng::new(0));
    let (mv, _) = &moves[0];
    match mv {
        Move::Reinforce { allocations } => {
            let troops: Vec<u32> = allocations.iter().map(|a| a.troops).collect();
            assert_eq!(troops, vec![2, 1]);
        }
        Move::Attack { .. } => panic!("expected a reinforcement"),
    }
}
