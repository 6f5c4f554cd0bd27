//! Reinforcement allocation strategies.
//!
//! A strategy turns a player's reserve into candidate allocation lists. Two
//! are provided:
//!
//! - `ProportionalVariation`: split the reserve by border priority, then
//!   sample random one-troop transfers around that split.
//! - `TopKCombinatorial`: enumerate every way to split the reserve across the
//!   K most exposed countries.
//!
//! Every candidate places exactly the whole reserve.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{Allocation, Allocations, CountryId, GameRng, GameState, PlayerId};

/// Border exposure of one owned country.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exposure {
    /// The owned country.
    pub country: CountryId,
    /// Number of enemy neighbours.
    pub enemy_neighbours: u32,
    /// Total army on enemy neighbours.
    pub enemy_army: u64,
}

impl Exposure {
    /// `2 × enemy neighbours + Σ enemy neighbour army`.
    #[must_use]
    pub fn priority(&self) -> u64 {
        2 * u64::from(self.enemy_neighbours) + self.enemy_army
    }
}

/// Exposure of every country `player` owns, in country-ID order.
#[must_use]
pub fn exposures(state: &GameState, player: &PlayerId) -> Vec<Exposure> {
    state
        .owned_countries(player)
        .map(|country| {
            let mut enemy_neighbours = 0;
            let mut enemy_army = 0u64;
            for enemy in state.enemy_neighbours(country, player) {
                enemy_neighbours += 1;
                enemy_army += u64::from(enemy.army);
            }
            Exposure {
                country: country.id.clone(),
                enemy_neighbours,
                enemy_army,
            }
        })
        .collect()
}

/// Produces candidate allocations for a reserve.
pub trait AllocationStrategy: Send + Sync {
    /// Candidate allocations for the current player of `state`.
    ///
    /// Each returned list sums to `reserve`. Empty if `reserve` is 0 or the
    /// player owns nothing.
    fn allocations(&self, state: &GameState, reserve: u32, rng: &mut GameRng) -> Vec<Allocations>;
}

/// Configurable choice of allocation strategy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// See `ProportionalVariation`.
    ProportionalVariation {
        /// Upper bound on candidates, including the base split.
        variations: usize,
    },
    /// See `TopKCombinatorial`.
    TopKCombinatorial {
        /// Number of countries to spread the reserve over.
        k: usize,
        /// Enumeration cap.
        max_candidates: usize,
    },
}

impl Default for AllocationPolicy {
    fn default() -> Self {
        AllocationPolicy::ProportionalVariation { variations: 1000 }
    }
}

impl AllocationPolicy {
    /// Top-K policy with the default enumeration cap.
    #[must_use]
    pub fn top_k(k: usize) -> Self {
        AllocationPolicy::TopKCombinatorial {
            k,
            max_candidates: TopKCombinatorial::DEFAULT_MAX_CANDIDATES,
        }
    }

    /// Same policy with a different variation count (proportional only).
    #[must_use]
    pub fn with_variations(&self, variations: usize) -> Self {
        match self {
            AllocationPolicy::ProportionalVariation { .. } => {
                AllocationPolicy::ProportionalVariation { variations }
            }
            other => other.clone(),
        }
    }

    /// Instantiate the strategy.
    #[must_use]
    pub fn strategy(&self) -> Box<dyn AllocationStrategy> {
        match *self {
            AllocationPolicy::ProportionalVariation { variations } => {
                Box::new(ProportionalVariation { variations })
            }
            AllocationPolicy::TopKCombinatorial { k, max_candidates } => {
                Box::new(TopKCombinatorial { k, max_candidates })
            }
        }
    }
}

// =============================================================================
// Proportional with variation
// =============================================================================

/// Priority-proportional split plus random one-troop transfers.
#[derive(Clone, Debug)]
pub struct ProportionalVariation {
    /// Upper bound on candidates, including the base split.
    pub variations: usize,
}

impl AllocationStrategy for ProportionalVariation {
    fn allocations(&self, state: &GameState, reserve: u32, rng: &mut GameRng) -> Vec<Allocations> {
        if reserve == 0 {
            return Vec::new();
        }

        let mut ranked: Vec<(CountryId, u64)> = exposures(state, &state.current_player)
            .into_iter()
            .map(|e| {
                let priority = e.priority();
                (e.country, priority)
            })
            .collect();
        if ranked.is_empty() {
            return Vec::new();
        }
        // Stable: equal priorities keep country-ID order.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        let base = proportional_split(&ranked, reserve);
        vary(base, self.variations, rng)
    }
}

/// Floor-proportional split of `reserve` by score.
///
/// `ranked` must be ordered highest score first. The remainder left by
/// flooring is handed out one troop at a time from the top of the ranking,
/// wrapping around, so the result always sums to `reserve`. With an all-zero
/// ranking the whole reserve goes round-robin.
#[must_use]
pub fn proportional_split(ranked: &[(CountryId, u64)], reserve: u32) -> Allocations {
    if ranked.is_empty() {
        return Allocations::new();
    }

    let total: u64 = ranked.iter().map(|(_, score)| score).sum();
    let mut split: Allocations = ranked
        .iter()
        .map(|(country, score)| {
            let troops = if total == 0 {
                0
            } else {
                // u128 so that large armies cannot overflow the product.
                (u128::from(*score) * u128::from(reserve) / u128::from(total)) as u32
            };
            Allocation::new(country.clone(), troops)
        })
        .collect();

    let placed: u32 = split.iter().map(|a| a.troops).sum();
    let mut remaining = reserve - placed;
    let mut i = 0;
    while remaining > 0 {
        split[i].troops += 1;
        remaining -= 1;
        i = (i + 1) % split.len();
    }
    split
}

/// Base split followed by up to `count - 1` sampled one-troop transfers.
///
/// A draw whose source is already 0 produces nothing, and duplicates are
/// dropped, so `count` is an upper bound.
fn vary(base: Allocations, count: usize, rng: &mut GameRng) -> Vec<Allocations> {
    let mut seen: FxHashSet<Allocations> = FxHashSet::default();
    seen.insert(base.clone());
    let mut out = vec![base.clone()];

    if base.len() < 2 {
        return out;
    }

    for _ in 1..count {
        let from = rng.gen_range_usize(0..base.len());
        let mut to = rng.gen_range_usize(0..base.len() - 1);
        if to >= from {
            to += 1;
        }
        if base[from].troops == 0 {
            continue;
        }
        let mut variant = base.clone();
        variant[from].troops -= 1;
        variant[to].troops += 1;
        if seen.insert(variant.clone()) {
            out.push(variant);
        }
    }
    out
}

// =============================================================================
// Top-K combinatorial
// =============================================================================

/// Every composition of the reserve over the K most exposed countries.
#[derive(Clone, Debug)]
pub struct TopKCombinatorial {
    /// Number of countries.
    pub k: usize,
    /// Enumeration cap.
    pub max_candidates: usize,
}

impl TopKCombinatorial {
    pub const DEFAULT_MAX_CANDIDATES: usize = 10_000;
}

impl AllocationStrategy for TopKCombinatorial {
    fn allocations(&self, state: &GameState, reserve: u32, _rng: &mut GameRng) -> Vec<Allocations> {
        if reserve == 0 || self.k == 0 {
            return Vec::new();
        }

        let mut ranked = exposures(state, &state.current_player);
        ranked.sort_by(|a, b| b.enemy_neighbours.cmp(&a.enemy_neighbours));
        ranked.truncate(self.k);
        if ranked.is_empty() {
            return Vec::new();
        }

        let targets: Vec<CountryId> = ranked.into_iter().map(|e| e.country).collect();
        let total = composition_count(reserve, targets.len());
        if total > self.max_candidates as u128 {
            warn!(
                reserve,
                k = targets.len(),
                total = %total,
                cap = self.max_candidates,
                "allocation enumeration truncated"
            );
        }

        let mut out = Vec::new();
        let mut parts = vec![0u32; targets.len()];
        compositions(reserve, 0, &mut parts, &mut |parts| {
            if out.len() >= self.max_candidates {
                return false;
            }
            out.push(
                targets
                    .iter()
                    .zip(parts.iter())
                    .map(|(country, &troops)| Allocation::new(country.clone(), troops))
                    .collect(),
            );
            true
        });
        out
    }
}

/// Number of compositions of `n` into `k` non-negative parts: C(n+k-1, k-1).
#[must_use]
pub fn composition_count(n: u32, k: usize) -> u128 {
    if k == 0 {
        return u128::from(n == 0);
    }
    let n = u128::from(n);
    let mut count = 1u128;
    for i in 1..k as u128 {
        count = count.saturating_mul(n + i) / i;
    }
    count
}

/// Visit every composition of `remaining` into `parts[idx..]`.
///
/// The visitor returns false to stop; the return value propagates it.
fn compositions(
    remaining: u32,
    idx: usize,
    parts: &mut [u32],
    visit: &mut dyn FnMut(&[u32]) -> bool,
) -> bool {
    if idx + 1 == parts.len() {
        parts[idx] = remaining;
        return visit(parts);
    }
    for troops in (0..=remaining).rev() {
        parts[idx] = troops;
        if !compositions(remaining - troops, idx + 1, parts, visit) {
            return false;
        }
    }
    true
}
