//! Game state snapshot: countries, players, continents, turn.
//!
//! ## Value semantics
//!
//! A `GameState` is a value. Move generation never mutates the state it was
//! handed; every successor is a fresh `GameState` produced by `clone()` and
//! then edited. Collections are `im` persistent structures so the clone is
//! O(1) and siblings share unchanged structure without aliasing.
//!
//! ## Ownership invariant
//!
//! For every player, `player.areas` is exactly the set of countries whose
//! `owner` is that player. `transfer_country` is the only mutation that
//! touches ownership, and it updates both sides together.

use im::{OrdMap, OrdSet, Vector};
use serde::{Deserialize, Serialize};

use super::ids::{CountryId, PlayerId};

/// Interactive phase of a player's turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Distribute reserve troops among owned countries.
    #[default]
    #[serde(alias = "Fortify", alias = "fortify", alias = "reinforcement")]
    Reinforcement,
    /// Attack adjacent enemy countries.
    #[serde(alias = "battle")]
    Battle,
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Reinforcement => write!(f, "Reinforcement"),
            Phase::Battle => write!(f, "Battle"),
        }
    }
}

/// A territory on the map.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Unique name.
    #[serde(alias = "name")]
    pub id: CountryId,

    /// Owning player, if any.
    #[serde(default)]
    pub owner: Option<PlayerId>,

    /// Garrisoned troops.
    #[serde(default)]
    pub army: u32,

    /// Adjacent countries. Symmetry is expected but not enforced.
    #[serde(default)]
    pub neighbours: Vec<CountryId>,
}

impl Country {
    /// Create an unowned, empty country.
    #[must_use]
    pub fn new(id: impl Into<CountryId>) -> Self {
        Self {
            id: id.into(),
            owner: None,
            army: 0,
            neighbours: Vec::new(),
        }
    }

    /// Check if `player` owns this country.
    #[inline]
    #[must_use]
    pub fn is_owned_by(&self, player: &PlayerId) -> bool {
        self.owner.as_ref() == Some(player)
    }
}

/// A named group of countries.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Continent {
    /// Continent name.
    #[serde(alias = "id")]
    pub name: String,

    /// Member countries.
    #[serde(alias = "areas")]
    pub members: OrdSet<CountryId>,

    /// Troop income granted to the controller at the start of a turn.
    #[serde(default)]
    pub bonus: u32,
}

impl Continent {
    /// Create a continent from its members.
    pub fn new<I, C>(name: impl Into<String>, members: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<CountryId>,
    {
        Self {
            name: name.into(),
            members: members.into_iter().map(Into::into).collect(),
            bonus: 0,
        }
    }

    /// Set the income bonus.
    #[must_use]
    pub fn with_bonus(mut self, bonus: u32) -> Self {
        self.bonus = bonus;
        self
    }
}

/// A participant in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Unique name.
    #[serde(alias = "name")]
    pub id: PlayerId,

    /// Countries owned by this player.
    #[serde(default)]
    pub areas: OrdSet<CountryId>,

    /// Troops still to be placed (Reinforcement phase only).
    #[serde(default)]
    pub reserve: u32,

    /// Owned-area count at which the player has won, if any.
    #[serde(default)]
    pub target: Option<u32>,
}

impl Player {
    /// Create a player with no areas and no reserve.
    #[must_use]
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self {
            id: id.into(),
            areas: OrdSet::new(),
            reserve: 0,
            target: None,
        }
    }

    /// Check if this player still owns anything.
    #[inline]
    #[must_use]
    pub fn is_alive(&self) -> bool {
        !self.areas.is_empty()
    }

    /// Check if the player reached its victory threshold.
    #[must_use]
    pub fn reached_target(&self) -> bool {
        self.target
            .map_or(false, |target| self.areas.len() as u64 >= u64::from(target))
    }
}

/// Complete snapshot consumed by the search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    /// Countries by ID (serialized as a list).
    #[serde(with = "country_list")]
    pub countries: OrdMap<CountryId, Country>,

    /// Players in turn order.
    pub players: Vector<Player>,

    /// The player to move. Also accepted as a player object.
    #[serde(alias = "currentPlayer", deserialize_with = "player_ref::deserialize")]
    pub current_player: PlayerId,

    /// Continents.
    #[serde(default)]
    pub continents: Vector<Continent>,

    /// Phase of the current player's turn.
    #[serde(default, alias = "stage")]
    pub phase: Phase,
}

impl GameState {
    /// Create an empty state.
    #[must_use]
    pub fn new(current_player: impl Into<PlayerId>, phase: Phase) -> Self {
        Self {
            countries: OrdMap::new(),
            players: Vector::new(),
            current_player: current_player.into(),
            continents: Vector::new(),
            phase,
        }
    }

    /// Copy of this state in a different phase.
    #[must_use]
    pub fn with_phase(&self, phase: Phase) -> Self {
        let mut state = self.clone();
        state.phase = phase;
        state
    }

    // === Lookup ===

    /// Get a country.
    #[must_use]
    pub fn country(&self, id: &CountryId) -> Option<&Country> {
        self.countries.get(id)
    }

    /// Get a mutable country.
    pub fn country_mut(&mut self, id: &CountryId) -> Option<&mut Country> {
        self.countries.get_mut(id)
    }

    /// Army at a country, 0 if it does not exist.
    #[must_use]
    pub fn army(&self, id: &CountryId) -> u32 {
        self.country(id).map_or(0, |c| c.army)
    }

    /// Get a player.
    #[must_use]
    pub fn player(&self, id: &PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Get a mutable player.
    pub fn player_mut(&mut self, id: &PlayerId) -> Option<&mut Player> {
        let idx = self.players.iter().position(|p| &p.id == id)?;
        self.players.get_mut(idx)
    }

    /// The player to move, if the reference resolves.
    #[must_use]
    pub fn current(&self) -> Option<&Player> {
        self.player(&self.current_player)
    }

    /// Countries owned by `player`, in ID order.
    pub fn owned_countries<'a>(&'a self, player: &'a PlayerId) -> impl Iterator<Item = &'a Country> + 'a {
        self.countries.values().filter(move |c| c.is_owned_by(player))
    }

    /// Existing neighbours of `country` not owned by `player`.
    pub fn enemy_neighbours<'a>(
        &'a self,
        country: &'a Country,
        player: &'a PlayerId,
    ) -> impl Iterator<Item = &'a Country> + 'a {
        country
            .neighbours
            .iter()
            .filter_map(move |n| self.country(n))
            .filter(move |n| !n.is_owned_by(player))
    }

    /// Check if `player` owns every member of a non-empty continent.
    #[must_use]
    pub fn controls(&self, player: &Player, continent: &Continent) -> bool {
        !continent.members.is_empty()
            && continent.members.iter().all(|m| player.areas.contains(m))
    }

    /// Number of players still holding at least one area.
    #[must_use]
    pub fn alive_players(&self) -> usize {
        self.players.iter().filter(|p| p.is_alive()).count()
    }

    /// Next player after the current one (turn order) who still holds areas.
    #[must_use]
    pub fn next_player(&self) -> Option<PlayerId> {
        let len = self.players.len();
        let start = self.players.iter().position(|p| p.id == self.current_player)?;
        (1..=len)
            .map(|offset| &self.players[(start + offset) % len])
            .find(|p| p.is_alive())
            .map(|p| p.id.clone())
    }

    // === Ownership ===

    /// Hand a country to `new_owner`, updating both players' area sets.
    ///
    /// Returns false if the country does not exist.
    pub fn transfer_country(&mut self, id: &CountryId, new_owner: &PlayerId) -> bool {
        let previous = match self.country_mut(id) {
            Some(country) => country.owner.replace(new_owner.clone()),
            None => return false,
        };

        if let Some(previous) = previous {
            if let Some(loser) = self.player_mut(&previous) {
                loser.areas.remove(id);
            }
        }
        if let Some(winner) = self.player_mut(new_owner) {
            winner.areas.insert(id.clone());
        }
        true
    }

    /// Check the bijection between `Country.owner` and `Player.areas`.
    #[must_use]
    pub fn ownership_consistent(&self) -> bool {
        let areas_match = self.players.iter().all(|player| {
            let owned: OrdSet<CountryId> = self
                .owned_countries(&player.id)
                .map(|c| c.id.clone())
                .collect();
            owned == player.areas
        });

        // Countries owned by someone who is not in `players` are orphans.
        let no_orphans = self.countries.values().all(|c| match &c.owner {
            Some(owner) => self.player(owner).is_some(),
            None => true,
        });

        areas_match && no_orphans
    }

    /// Recompute every `Player.areas` from `Country.owner`.
    pub fn rebuild_areas(&mut self) {
        let countries = self.countries.clone();
        for player in self.players.iter_mut() {
            player.areas = countries
                .values()
                .filter(|c| c.is_owned_by(&player.id))
                .map(|c| c.id.clone())
                .collect();
        }
    }
}

/// Serialize the country map as a flat list keyed by each country's `id`.
mod country_list {
    use im::OrdMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Country, CountryId};

    pub fn serialize<S: Serializer>(
        countries: &OrdMap<CountryId, Country>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let list: Vec<&Country> = countries.values().collect();
        list.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<OrdMap<CountryId, Country>, D::Error> {
        let list = Vec::<Country>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|c| (c.id.clone(), c)).collect())
    }
}

/// Read a player reference given either as a name or as a player object.
mod player_ref {
    use serde::{Deserialize, Deserializer};

    use super::PlayerId;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum PlayerRef {
        Name(PlayerId),
        Object {
            #[serde(alias = "name")]
            id: PlayerId,
        },
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PlayerId, D::Error> {
        // Binary formats cannot drive an untagged enum; they always carry the bare ID.
        if !deserializer.is_human_readable() {
            return PlayerId::deserialize(deserializer);
        }
        Ok(match PlayerRef::deserialize(deserializer)? {
            PlayerRef::Name(id) | PlayerRef::Object { id } => id,
        })
    }
}
