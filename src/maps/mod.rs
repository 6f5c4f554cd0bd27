//! Map construction helpers.
//!
//! `MapBuilder` assembles a `GameState` from countries, links and continents
//! and derives every player's area set from country ownership, so built
//! states always satisfy the ownership invariant. `two_continents` is a small
//! ready-made map used by the CLI demo, benches and tests.

use im::OrdMap;

use crate::core::{Continent, Country, CountryId, GameState, Phase, Player, PlayerId};

/// Builder for game states.
#[derive(Clone, Debug, Default)]
pub struct MapBuilder {
    countries: OrdMap<CountryId, Country>,
    players: Vec<Player>,
    continents: Vec<Continent>,
}

impl MapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player (turn order is insertion order).
    pub fn player(mut self, name: &str) -> Self {
        self.players.push(Player::new(name));
        self
    }

    /// Set a player's reserve.
    pub fn reserve(mut self, name: &str, reserve: u32) -> Self {
        if let Some(player) = self.players.iter_mut().find(|p| p.id.as_str() == name) {
            player.reserve = reserve;
        }
        self
    }

    /// Set a player's victory threshold.
    pub fn target(mut self, name: &str, target: u32) -> Self {
        if let Some(player) = self.players.iter_mut().find(|p| p.id.as_str() == name) {
            player.target = Some(target);
        }
        self
    }

    /// Add an owned country.
    pub fn country(mut self, name: &str, owner: &str, army: u32) -> Self {
        let mut country = Country::new(name);
        country.owner = Some(PlayerId::new(owner));
        country.army = army;
        self.countries.insert(country.id.clone(), country);
        self
    }

    /// Add an unowned country.
    pub fn unowned(mut self, name: &str, army: u32) -> Self {
        let mut country = Country::new(name);
        country.army = army;
        self.countries.insert(country.id.clone(), country);
        self
    }

    /// Make two countries adjacent in both directions.
    pub fn link(self, a: &str, b: &str) -> Self {
        self.link_one_way(a, b).link_one_way(b, a)
    }

    /// Make `b` a neighbour of `a` only.
    pub fn link_one_way(mut self, a: &str, b: &str) -> Self {
        let b = CountryId::new(b);
        if let Some(country) = self.countries.get_mut(&CountryId::new(a)) {
            if !country.neighbours.contains(&b) {
                country.neighbours.push(b);
            }
        }
        self
    }

    /// Add a continent.
    pub fn continent(mut self, name: &str, members: &[&str], bonus: u32) -> Self {
        self.continents
            .push(Continent::new(name, members.iter().copied()).with_bonus(bonus));
        self
    }

    /// Finish the state.
    pub fn build(self, current_player: &str, phase: Phase) -> GameState {
        let mut state = GameState::new(current_player, phase);
        state.countries = self.countries;
        state.players = self.players.into_iter().collect();
        state.continents = self.continents.into_iter().collect();
        state.rebuild_areas();
        state
    }
}

/// Three-player map with two continents joined by a single bridge.
///
/// ```text
///   North (bonus 3)            South (bonus 2)
///   Alpha - Bravo - Charlie    Foxtrot - Golf
///     |       |                   |       |
///   Delta - Echo ----(bridge)-- Hotel - India
/// ```
pub fn two_continents(phase: Phase) -> GameState {
    MapBuilder::new()
        .player("Red")
        .player("Blue")
        .player("Green")
        .reserve("Red", 6)
        .country("Alpha", "Red", 3)
        .country("Bravo", "Red", 2)
        .country("Charlie", "Blue", 4)
        .country("Delta", "Red", 5)
        .country("Echo", "Blue", 2)
        .country("Foxtrot", "Green", 3)
        .country("Golf", "Green", 1)
        .country("Hotel", "Blue", 3)
        .country("India", "Green", 2)
        .link("Alpha", "Bravo")
        .link("Bravo", "Charlie")
        .link("Alpha", "Delta")
        .link("Bravo", "Echo")
        .link("Delta", "Echo")
        .link("Echo", "Hotel")
        .link("Foxtrot", "Golf")
        .link("Foxtrot", "Hotel")
        .link("Golf", "India")
        .link("Hotel", "India")
        .continent("North", &["Alpha", "Bravo", "Charlie", "Delta", "Echo"], 3)
        .continent("South", &["Foxtrot", "Golf", "Hotel", "India"], 2)
        .build("Red", phase)
}
