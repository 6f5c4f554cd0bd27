//! Dice-based attack resolution.
//!
//! Risk-style rule: the attacker rolls `min(army(from) - 1, 3)` dice, the
//! defender `min(army(to), 2)`. Rolls are sorted highest first and compared
//! pairwise over the shorter list; the lower die loses one army, ties go to
//! the defender. A defender left with no armies is captured: the attacker
//! moves exactly as many armies as it rolled dice into the country and
//! ownership changes hands in the same step.

use smallvec::SmallVec;

use crate::core::{CountryId, GameRng, GameState, Move};

/// Maximum attacker dice.
pub const MAX_ATTACK_DICE: u32 = 3;

/// Maximum defender dice.
pub const MAX_DEFEND_DICE: u32 = 2;

/// What happened in one round of dice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CombatOutcome {
    /// Dice rolled by the attacker.
    pub attacker_dice: u32,
    /// Dice rolled by the defender.
    pub defender_dice: u32,
    /// Attacker rolls, highest first.
    pub attacker_rolls: SmallVec<[u8; 3]>,
    /// Defender rolls, highest first.
    pub defender_rolls: SmallVec<[u8; 3]>,
    /// Armies lost at the source country.
    pub attacker_losses: u32,
    /// Armies lost at the target country.
    pub defender_losses: u32,
    /// Whether the target changed hands.
    pub captured: bool,
}

/// Dice counts for an attack between garrisons of the given size.
#[must_use]
pub fn dice_counts(attacker_army: u32, defender_army: u32) -> (u32, u32) {
    (
        attacker_army.saturating_sub(1).min(MAX_ATTACK_DICE),
        defender_army.min(MAX_DEFEND_DICE),
    )
}

/// Roll one battle and apply it to `state` in place.
///
/// `state` must be an owned successor, never a shared snapshot. Returns
/// `None` (leaving `state` untouched) if either country is missing or the
/// source has no owner.
pub fn roll_battle(
    state: &mut GameState,
    from: &CountryId,
    to: &CountryId,
    rng: &mut GameRng,
) -> Option<CombatOutcome> {
    let source = state.country(from)?;
    let target = state.country(to)?;
    let attacker = source.owner.clone()?;

    let (attacker_dice, defender_dice) = dice_counts(source.army, target.army);
    let attacker_rolls = rng.roll_sorted(attacker_dice as usize);
    let defender_rolls = rng.roll_sorted(defender_dice as usize);

    let mut attacker_losses = 0;
    let mut defender_losses = 0;
    for (a, d) in attacker_rolls.iter().zip(defender_rolls.iter()) {
        if a > d {
            defender_losses += 1;
        } else {
            attacker_losses += 1;
        }
    }

    let source = state.country_mut(from)?;
    source.army = source.army.saturating_sub(attacker_losses);
    let target = state.country_mut(to)?;
    target.army = target.army.saturating_sub(defender_losses);

    let captured = target.army == 0;
    if captured {
        target.army = attacker_dice;
        let source = state.country_mut(from)?;
        source.army = source.army.saturating_sub(attacker_dice);
        state.transfer_country(to, &attacker);
    }

    Some(CombatOutcome {
        attacker_dice,
        defender_dice,
        attacker_rolls,
        defender_rolls,
        attacker_losses,
        defender_losses,
        captured,
    })
}

/// Resolve an attack on a copy of `state`.
///
/// The input is never modified. The returned move records only the
/// endpoints.
#[must_use]
pub fn resolve_attack(
    state: &GameState,
    from: &CountryId,
    to: &CountryId,
    rng: &mut GameRng,
) -> Option<(Move, GameState)> {
    let mut successor = state.clone();
    roll_battle(&mut successor, from, to, rng)?;
    Some((Move::attack(from.clone(), to.clone()), successor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maps::MapBuilder;
    use crate::core::{Phase, PlayerId};

    fn duel(attacker_army: u32, defender_army: u32) -> GameState {
        MapBuilder::new()
            .player("Red")
            .player("Blue")
            .country("X", "Red", attacker_army)
            .country("Z", "Blue", defender_army)
            .link("X", "Z")
            .build("Red", Phase::Battle)
    }

    #[test]
    fn test_dice_counts() {
        assert_eq!(dice_counts(1, 5), (0, 2));
        assert_eq!(dice_counts(3, 5), (2, 2));
        assert_eq!(dice_counts(10, 1), (3, 1));
        assert_eq!(dice_counts(0, 0), (0, 0));
    }

    #[test]
    fn test_losses_match_comparisons() {
        let state = duel(4, 5);
        let mut rng = GameRng::new(3);
        for _ in 0..100 {
            let mut successor = state.clone();
            let outcome =
                roll_battle(&mut successor, &"X".into(), &"Z".into(), &mut rng).unwrap();
            assert_eq!(outcome.attacker_dice, 3);
            assert_eq!(outcome.defender_dice, 2);
            assert_eq!(outcome.attacker_losses + outcome.defender_losses, 2);
            assert!(!outcome.captured);
            assert_eq!(successor.army(&"X".into()), 4 - outcome.attacker_losses);
            assert_eq!(successor.army(&"Z".into()), 5 - outcome.defender_losses);
        }
    }

    #[test]
    fn test_ties_favour_defender() {
        let state = duel(2, 1);
        let mut rng = GameRng::new(11);
        for _ in 0..200 {
            let mut successor = state.clone();
            let outcome =
                roll_battle(&mut successor, &"X".into(), &"Z".into(), &mut rng).unwrap();
            let (a, d) = (outcome.attacker_rolls[0], outcome.defender_rolls[0]);
            assert_eq!(outcome.captured, a > d);
        }
    }

    #[test]
    fn test_capture_moves_dice_count_and_ownership() {
        let state = duel(4, 1);
        let mut rng = GameRng::new(0);
        let mut captures = 0;
        for _ in 0..100 {
            let mut successor = state.clone();
            let outcome =
                roll_battle(&mut successor, &"X".into(), &"Z".into(), &mut rng).unwrap();
            if outcome.captured {
                captures += 1;
                let z = successor.country(&"Z".into()).unwrap();
                assert_eq!(z.owner, Some(PlayerId::from("Red")));
                assert_eq!(z.army, 3);
                assert_eq!(successor.army(&"X".into()), 1);
                assert!(successor.ownership_consistent());
                assert_eq!(successor.alive_players(), 1);
            }
        }
        assert!(captures > 0);
    }

    #[test]
    fn test_resolve_attack_leaves_input_untouched() {
        let state = duel(4, 1);
        let before = state.clone();
        let mut rng = GameRng::new(5);

        let (mv, _successor) =
            resolve_attack(&state, &"X".into(), &"Z".into(), &mut rng).unwrap();

        assert_eq!(mv, Move::attack("X", "Z"));
        assert_eq!(state, before);
    }

    #[test]
    fn test_missing_country_is_none() {
        let state = duel(4, 1);
        let mut rng = GameRng::new(5);
        assert!(resolve_attack(&state, &"X".into(), &"Nowhere".into(), &mut rng).is_none());
    }
}
