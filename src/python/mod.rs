//! Python bindings for the move recommender.
//!
//! # Quick Start
//!
//! ```python
//! import territory_mcts as tm
//!
//! state_json = open("snapshot.json").read()
//! for rec in tm.recommend(state_json, "Battle", iterations=500, seed=7):
//!     print(rec["text"], rec["score"])
//! ```

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};

use crate::core::Move;
use crate::io::state_from_json;
use crate::mcts::{MCTSConfig, MCTSSearch, Recommendation, Recommendations, Stage};
use crate::rules::Scorer;

fn to_py_err(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn recommendation_dict<'py>(
    py: Python<'py>,
    rec: &Recommendation,
    recs: &Recommendations,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    dict.set_item("text", rec.mv.to_string())?;
    match &rec.mv {
        Move::Reinforce { allocations } => {
            dict.set_item("type", "reinforce")?;
            let pairs: Vec<(String, u32)> = allocations
                .iter()
                .map(|a| (a.country.to_string(), a.troops))
                .collect();
            dict.set_item("allocations", pairs)?;
        }
        Move::Attack { from, to } => {
            dict.set_item("type", "attack")?;
            dict.set_item("from", from.as_str())?;
            dict.set_item("to", to.as_str())?;
        }
    }
    dict.set_item("score", rec.score)?;
    dict.set_item("visits", rec.visits)?;
    dict.set_item("total_score", rec.total_score)?;
    dict.set_item("min_score", recs.min_score)?;
    dict.set_item("max_score", recs.max_score)?;
    Ok(dict)
}

/// Recommend moves for a JSON snapshot.
///
/// # Arguments
/// - state_json: Snapshot as JSON text
/// - stage: "Fortify", "Battle" or "AI Turn" (the latter returns [])
/// - iterations: Search iterations
/// - seed: RNG seed (default: the config default)
#[pyfunction]
#[pyo3(signature = (state_json, stage, iterations = 1000, seed = None))]
fn recommend<'py>(
    py: Python<'py>,
    state_json: &str,
    stage: &str,
    iterations: u32,
    seed: Option<u64>,
) -> PyResult<Bound<'py, PyList>> {
    let stage: Stage = stage.parse().map_err(to_py_err)?;
    let list = PyList::empty_bound(py);
    let Some(phase) = stage.phase() else {
        return Ok(list);
    };

    let state = state_from_json(state_json).map_err(to_py_err)?;
    let mut config = MCTSConfig::default().with_iterations(iterations);
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }

    let recs = py.allow_threads(|| MCTSSearch::new(config).recommend(&state, phase));
    for rec in &recs.moves {
        list.append(recommendation_dict(py, rec, &recs)?)?;
    }
    Ok(list)
}

/// Heuristic score of a JSON snapshot for `player` (default: current player).
#[pyfunction]
#[pyo3(signature = (state_json, player = None))]
fn score(state_json: &str, player: Option<&str>) -> PyResult<f64> {
    let state = state_from_json(state_json).map_err(to_py_err)?;
    let scorer = Scorer::default();
    Ok(match player {
        Some(name) => scorer.score_for(&state, &name.into()),
        None => scorer.score(&state),
    })
}

/// territory_mcts: MCTS move recommendations for territory-conquest games.
#[pymodule]
fn territory_mcts(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(recommend, m)?)?;
    m.add_function(wrap_pyfunction!(score, m)?)?;
    Ok(())
}
