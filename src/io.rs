//! Reading and writing game snapshots and search configs.
//!
//! Snapshots ending in `.json` are JSON; anything else is bincode. Configs
//! are always JSON. Snapshots are normalized on load: area sets are
//! rebuilt from country owners when the two disagree.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::core::GameState;
use crate::error::LoadError;
use crate::mcts::MCTSConfig;

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Parse a snapshot from JSON text.
pub fn state_from_json(json: &str) -> Result<GameState, LoadError> {
    let state: GameState = serde_json::from_str(json)?;
    Ok(normalize(state))
}

/// Load a snapshot, choosing the format by extension.
pub fn load_state(path: impl AsRef<Path>) -> Result<GameState, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LoadError::io(path, e))?;
    let state: GameState = if is_json(path) {
        serde_json::from_slice(&bytes)?
    } else {
        bincode::deserialize(&bytes)?
    };
    debug!(
        path = %path.display(),
        countries = state.countries.len(),
        players = state.players.len(),
        "loaded snapshot"
    );
    Ok(normalize(state))
}

/// Save a snapshot, choosing the format by extension.
pub fn save_state(state: &GameState, path: impl AsRef<Path>) -> Result<(), LoadError> {
    let path = path.as_ref();
    let bytes = if is_json(path) {
        serde_json::to_vec_pretty(state)?
    } else {
        bincode::serialize(state)?
    };
    fs::write(path, bytes).map_err(|e| LoadError::io(path, e))
}

/// Load a search config from JSON. Missing fields take their defaults.
pub fn load_config(path: impl AsRef<Path>) -> Result<MCTSConfig, LoadError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

fn normalize(mut state: GameState) -> GameState {
    if !state.ownership_consistent() {
        warn!("snapshot areas disagree with country owners; rebuilding");
        state.rebuild_areas();
    }
    state
}
