//! MCTS integration tests on small maps.

use territory_mcts::core::{GameState, Move, Phase};
use territory_mcts::io::{load_state, save_state};
use territory_mcts::maps::{two_continents, MapBuilder};
use territory_mcts::mcts::{search, MCTSConfig, MCTSSearch, ScoringMode};
use territory_mcts::rules::{AllocationPolicy, Scorer, ScoringWeights};

/// P owns X (3) and Y (1); Q owns Z (2). Both of P's countries touch Z.
fn xyz() -> GameState {
    MapBuilder::new()
        .player("P")
        .player("Q")
        .country("X", "P", 3)
        .country("Y", "P", 1)
        .country("Z", "Q", 2)
        .link("X", "Z")
        .link("Y", "Z")
        .build("P", Phase::Battle)
}

// =============================================================================
// Basic Search Tests
// =============================================================================

#[test]
fn test_only_legal_attack_is_recommended() {
    let recs = search(&xyz(), Phase::Battle, 200);

    assert_eq!(recs.moves.len(), 1);
    assert_eq!(recs.moves[0].mv, Move::attack("X", "Z"));
    assert_eq!(recs.moves[0].visits, 200);
    assert_eq!(recs.min_score, recs.max_score);
}

#[test]
fn test_reinforcement_recommendations_place_reserve() {
    let state = two_continents(Phase::Reinforcement);
    let recs = search(&state, Phase::Reinforcement, 300);

    assert!(!recs.is_empty());
    assert!(recs.moves.len() <= 5);
    for rec in &recs.moves {
        assert!(rec.mv.is_reinforce());
        assert_eq!(rec.mv.troops_placed(), 6);
    }
}

#[test]
fn test_scores_sorted_and_within_range() {
    let state = two_continents(Phase::Battle);
    let recs = search(&state, Phase::Battle, 300);

    let scores: Vec<f64> = recs.moves.iter().map(|r| r.score).collect();
    assert!(scores.windows(2).all(|w| w[0] >= w[1]));
    let (min, max) = (recs.min_score.unwrap(), recs.max_score.unwrap());
    assert!(scores.iter().all(|&s| s >= min && s <= max));
}

#[test]
fn test_no_moves_is_empty_not_error() {
    // Nobody can attack: the only army on each side is 1.
    let state = MapBuilder::new()
        .player("P")
        .player("Q")
        .country("A", "P", 1)
        .country("B", "Q", 1)
        .link("A", "B")
        .build("P", Phase::Battle);

    let recs = search(&state, Phase::Battle, 100);
    assert!(recs.is_empty());
    assert!(recs.min_score.is_none());
    assert!(recs.render().is_empty());
}

#[test]
fn test_missing_current_player_is_empty() {
    let mut state = xyz();
    state.current_player = "Nobody".into();
    assert!(search(&state, Phase::Battle, 50).is_empty());
}

// =============================================================================
// Determinism Tests
// =============================================================================

#[test]
fn test_same_seed_same_recommendations() {
    let state = two_continents(Phase::Reinforcement);
    let config = MCTSConfig::default().with_seed(12345).with_iterations(300);

    let a = MCTSSearch::new(config.clone()).recommend(&state, Phase::Reinforcement);
    let b = MCTSSearch::new(config).recommend(&state, Phase::Reinforcement);

    assert_eq!(a.moves, b.moves);
    assert_eq!(a.max_score, b.max_score);
}

#[test]
fn test_root_merge_is_deterministic() {
    let state = two_continents(Phase::Battle);
    let search = MCTSSearch::new(MCTSConfig::default().with_iterations(100));

    let a = search.recommend_roots(&state, Phase::Battle, 4);
    let b = search.recommend_roots(&state, Phase::Battle, 4);

    assert_eq!(a.moves, b.moves);
    assert_eq!(a.stats.roots, 4);
    assert_eq!(a.stats.iterations, 400);
    let visits: u32 = a.moves.iter().map(|r| r.visits).sum();
    assert!(visits <= 400);
}

// =============================================================================
// Configuration Variants
// =============================================================================

#[test]
fn test_win_rate_scores_are_rates() {
    let config = MCTSConfig::default()
        .with_scoring_mode(ScoringMode::WinRate)
        .with_iterations(300);
    let recs = MCTSSearch::new(config).recommend(&two_continents(Phase::Battle), Phase::Battle);

    assert!(!recs.is_empty());
    for rec in &recs.moves {
        assert!((0.0..=1.0).contains(&rec.score));
    }
}

#[test]
fn test_top_k_policy_search() {
    let config = MCTSConfig::default()
        .with_allocation(AllocationPolicy::top_k(2))
        .with_iterations(200)
        .with_top_n(3);
    let recs = MCTSSearch::new(config)
        .recommend(&two_continents(Phase::Reinforcement), Phase::Reinforcement);

    assert_eq!(recs.moves.len(), 3);
    assert!(recs.moves.iter().all(|r| r.mv.troops_placed() == 6));
}

#[test]
fn test_no_turn_cycle_search() {
    let config = MCTSConfig::default().with_turn_cycle(false).with_iterations(100);
    let recs = MCTSSearch::new(config).recommend(&xyz(), Phase::Battle);
    assert_eq!(recs.moves.len(), 1);
}

#[test]
fn test_reached_target_has_no_recommendations() {
    let state = MapBuilder::new()
        .player("Red")
        .player("Blue")
        .target("Red", 2)
        .country("A", "Red", 4)
        .country("B", "Red", 3)
        .country("C", "Blue", 1)
        .link("A", "C")
        .link("B", "C")
        .build("Red", Phase::Battle);

    let recs = search(&state, Phase::Battle, 100);
    assert!(recs.is_empty());
    assert_eq!(recs.stats.nodes_expanded, 0);
}

#[test]
fn test_zero_weights_score_everything_zero() {
    let weights = ScoringWeights {
        territory: 0.0,
        army: 0.0,
        continent: 0.0,
        border: 0.0,
        ..ScoringWeights::default()
    };
    let config = MCTSConfig::default().with_weights(weights).with_iterations(200);
    let recs = MCTSSearch::new(config).recommend(&two_continents(Phase::Battle), Phase::Battle);

    assert!(!recs.is_empty());
    assert!(recs.moves.iter().all(|r| r.score == 0.0));
    assert_eq!(recs.min_score, Some(0.0));
    assert_eq!(recs.max_score, Some(0.0));
}

#[test]
fn test_input_state_untouched() {
    let state = two_continents(Phase::Reinforcement);
    let before = state.clone();
    let score = Scorer::default().score(&state);

    search(&state, Phase::Reinforcement, 200);
    search(&state, Phase::Battle, 200);

    assert_eq!(state, before);
    assert_eq!(Scorer::default().score(&state), score);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_snapshot_round_trip_both_formats() {
    let dir = std::env::temp_dir().join(format!("territory-mcts-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let state = two_continents(Phase::Reinforcement);

    for name in ["snapshot.json", "snapshot.bin"] {
        let path = dir.join(name);
        save_state(&state, &path).unwrap();
        assert_eq!(load_state(&path).unwrap(), state);
    }

    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn test_render_lines() {
    let recs = search(&xyz(), Phase::Battle, 50);
    let lines = recs.render();

    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("1. Attack from X to Z (Score: "));
    assert!(lines[0].contains(" in range "));
}
