//! Ranked move recommendations built from the root of a search tree.

use std::cmp::Ordering;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{GameState, Move, Phase};
use crate::error::StageError;
use crate::rules::scoring::finite_or_zero;

use super::config::MCTSConfig;
use super::search::MCTSSearch;
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// One candidate move with its root statistics.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    /// The move.
    #[serde(rename = "move")]
    pub mv: Move,

    /// Mean payoff per visit (a win rate in win-rate mode).
    pub score: f64,

    /// Visits of the root child.
    pub visits: u32,

    /// Sum of payoffs of the root child.
    pub total_score: f64,
}

impl Recommendation {
    /// Build from raw counters; an unvisited move scores 0.
    #[must_use]
    pub fn new(mv: Move, visits: u32, total_score: f64) -> Self {
        let score = if visits == 0 {
            0.0
        } else {
            finite_or_zero(total_score / f64::from(visits))
        };
        Self {
            mv,
            score,
            visits,
            total_score,
        }
    }
}

/// Result of a search: the best moves and the score range of all candidates.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendations {
    /// Best moves, highest score first.
    pub moves: Vec<Recommendation>,

    /// Lowest score over every root child (not only the listed ones).
    pub min_score: Option<f64>,

    /// Highest score over every root child.
    pub max_score: Option<f64>,

    /// Statistics of the search that produced this.
    pub stats: SearchStats,
}

impl Recommendations {
    /// Rank `candidates` and keep the best `top_n`.
    ///
    /// Sorting is stable, so equal scores keep generation order.
    pub fn rank(mut candidates: Vec<Recommendation>, top_n: usize, stats: SearchStats) -> Self {
        if candidates.is_empty() {
            warn!("search produced no candidate moves");
            return Self {
                stats,
                ..Self::default()
            };
        }

        let min_score = candidates.iter().map(|r| r.score).reduce(f64::min);
        let max_score = candidates.iter().map(|r| r.score).reduce(f64::max);

        candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        candidates.truncate(top_n);

        Self {
            moves: candidates,
            min_score,
            max_score,
            stats,
        }
    }

    /// Check if there is nothing to recommend.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The top move, if any.
    #[must_use]
    pub fn best(&self) -> Option<&Recommendation> {
        self.moves.first()
    }

    /// Numbered display lines, one per move.
    #[must_use]
    pub fn render(&self) -> Vec<String> {
        let min = self.min_score.unwrap_or(0.0);
        let max = self.max_score.unwrap_or(0.0);
        self.moves
            .iter()
            .enumerate()
            .map(|(i, rec)| {
                format!(
                    "{}. {} (Score: {:.2} in range {:.2} - {:.2})",
                    i + 1,
                    rec.mv,
                    rec.score,
                    min,
                    max
                )
            })
            .collect()
    }
}

/// Root children of a finished tree as unranked candidates.
#[must_use]
pub fn root_candidates(tree: &MCTSTree) -> Vec<Recommendation> {
    tree.root_children()
        .filter_map(|child| {
            child
                .incoming
                .clone()
                .map(|mv| Recommendation::new(mv, child.visits, child.total_score))
        })
        .collect()
}

/// Merge candidates from independent trees by move.
///
/// Visits and totals add up; moves keep the order they were first seen in.
#[must_use]
pub fn merge_candidates(per_root: Vec<Vec<Recommendation>>) -> Vec<Recommendation> {
    let mut index: FxHashMap<Move, usize> = FxHashMap::default();
    let mut merged: Vec<(Move, u32, f64)> = Vec::new();

    for rec in per_root.into_iter().flatten() {
        match index.get(&rec.mv) {
            Some(&i) => {
                merged[i].1 += rec.visits;
                merged[i].2 += rec.total_score;
            }
            None => {
                index.insert(rec.mv.clone(), merged.len());
                merged.push((rec.mv, rec.visits, rec.total_score));
            }
        }
    }

    merged
        .into_iter()
        .map(|(mv, visits, total)| Recommendation::new(mv, visits, total))
        .collect()
}

/// Search `root` in `phase` with the default configuration.
pub fn search(root: &GameState, phase: Phase, iterations: u32) -> Recommendations {
    MCTSSearch::new(MCTSConfig::default()).search(root, phase, iterations)
}

/// Stage label used by the game UI.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Troop placement ("Fortify").
    Fortify,
    /// Attacks.
    Battle,
    /// The computer is playing; nothing to recommend.
    AiTurn,
}

impl Stage {
    /// Phase to search, None during the AI's turn.
    #[must_use]
    pub fn phase(self) -> Option<Phase> {
        match self {
            Stage::Fortify => Some(Phase::Reinforcement),
            Stage::Battle => Some(Phase::Battle),
            Stage::AiTurn => None,
        }
    }
}

impl FromStr for Stage {
    type Err = StageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "fortify" | "reinforcement" | "reinforce" => Ok(Stage::Fortify),
            "battle" | "attack" => Ok(Stage::Battle),
            "aiturn" => Ok(Stage::AiTurn),
            _ => Err(StageError(s.to_string())),
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Fortify => write!(f, "Fortify"),
            Stage::Battle => write!(f, "Battle"),
            Stage::AiTurn => write!(f, "AI Turn"),
        }
    }
}
