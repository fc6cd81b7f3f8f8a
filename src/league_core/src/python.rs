//! Python bindings, built with the `python` feature.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::aggregate::{Simulation, SimulationConfig};
use crate::distribution::GoalDistribution;
use crate::error::SimError;
use crate::ledger::{Fixture, LeagueTable};
use crate::team::TeamStanding;
use crate::trial;

impl From<SimError> for PyErr {
    fn from(err: SimError) -> PyErr {
        if err.is_configuration() {
            PyValueError::new_err(err.to_string())
        } else {
            PyRuntimeError::new_err(err.to_string())
        }
    }
}

/// A table row passed from Python as a dict.
#[derive(FromPyObject)]
struct StandingRow {
    #[pyo3(item)]
    team: String,
    #[pyo3(item)]
    played: u32,
    #[pyo3(item)]
    wins: u32,
    #[pyo3(item)]
    draws: u32,
    #[pyo3(item)]
    losses: u32,
    #[pyo3(item)]
    goals_for: u32,
    #[pyo3(item)]
    goals_against: u32,
    #[pyo3(item)]
    goal_difference: i64,
    #[pyo3(item)]
    points: u32,
}

impl From<StandingRow> for TeamStanding {
    fn from(row: StandingRow) -> Self {
        TeamStanding {
            team: row.team,
            played: row.played,
            wins: row.wins,
            draws: row.draws,
            losses: row.losses,
            goals_for: row.goals_for,
            goals_against: row.goals_against,
            goal_difference: row.goal_difference,
            points: row.points,
        }
    }
}

type WeightsArg = (Vec<u32>, Vec<f64>);

fn build_table(standings: Vec<StandingRow>) -> PyResult<LeagueTable> {
    Ok(LeagueTable::new(standings.into_iter().map(TeamStanding::from).collect())?)
}

fn build_fixtures(fixtures: Vec<(String, String)>) -> Vec<Fixture> {
    fixtures.into_iter().map(Fixture::from).collect()
}

fn build_distributions(
    home: Option<WeightsArg>,
    away: Option<WeightsArg>,
) -> PyResult<(GoalDistribution, GoalDistribution)> {
    let home = match home {
        Some((goals, weights)) => GoalDistribution::new(goals, weights)?,
        None => GoalDistribution::default_home(),
    };
    let away = match away {
        Some((goals, weights)) => GoalDistribution::new(goals, weights)?,
        None => GoalDistribution::default_away(),
    };
    Ok((home, away))
}

fn make_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

fn standing_to_dict<'py>(py: Python<'py>, row: &TeamStanding) -> PyResult<Bound<'py, PyDict>> {
    let d = PyDict::new_bound(py);
    d.set_item("team", &row.team)?;
    d.set_item("played", row.played)?;
    d.set_item("wins", row.wins)?;
    d.set_item("draws", row.draws)?;
    d.set_item("losses", row.losses)?;
    d.set_item("goals_for", row.goals_for)?;
    d.set_item("goals_against", row.goals_against)?;
    d.set_item("goal_difference", row.goal_difference)?;
    d.set_item("points", row.points)?;
    Ok(d)
}

/// Draw one goal count from a weighted distribution.
#[pyfunction]
#[pyo3(signature = (goals, weights, seed = None))]
fn sample(goals: Vec<u32>, weights: Vec<f64>, seed: Option<u64>) -> PyResult<u32> {
    let dist = GoalDistribution::new(goals, weights)?;
    Ok(dist.sample(&mut make_rng(seed)))
}

/// Simulate the remaining fixtures once.
///
/// Returns {"table": [row dicts in ranked order], "skipped": [(home, away), ...]}.
#[pyfunction]
#[pyo3(signature = (standings, fixtures, home = None, away = None, seed = None))]
fn run_trial(
    py: Python<'_>,
    standings: Vec<StandingRow>,
    fixtures: Vec<(String, String)>,
    home: Option<WeightsArg>,
    away: Option<WeightsArg>,
    seed: Option<u64>,
) -> PyResult<PyObject> {
    let table = build_table(standings)?;
    let fixtures = build_fixtures(fixtures);
    let (home, away) = build_distributions(home, away)?;

    let outcome = trial::run_trial(&table, &fixtures, &home, &away, &mut make_rng(seed));

    let rows = PyList::empty_bound(py);
    for row in outcome.ranking.to_standings() {
        rows.append(standing_to_dict(py, &row)?)?;
    }
    let skipped = PyList::empty_bound(py);
    for skip in &outcome.skipped {
        skipped.append((skip.fixture.home.as_str(), skip.fixture.away.as_str()))?;
    }

    let result = PyDict::new_bound(py);
    result.set_item("table", rows)?;
    result.set_item("skipped", skipped)?;
    Ok(result.into_any().unbind())
}

/// Simulate `trials` seasons.
///
/// Returns {"matrix": {team: {rank: percentage}}, "skipped": [(home, away), ...]}.
#[pyfunction]
#[pyo3(signature = (standings, fixtures, trials, home = None, away = None, seed = None, parallel = false))]
#[allow(clippy::too_many_arguments)]
fn aggregate(
    py: Python<'_>,
    standings: Vec<StandingRow>,
    fixtures: Vec<(String, String)>,
    trials: usize,
    home: Option<WeightsArg>,
    away: Option<WeightsArg>,
    seed: Option<u64>,
    parallel: bool,
) -> PyResult<PyObject> {
    let table = build_table(standings)?;
    let fixtures = build_fixtures(fixtures);
    let (home, away) = build_distributions(home, away)?;

    let mut config = SimulationConfig::new(trials).with_parallel(parallel);
    if let Some(s) = seed {
        config = config.with_seed(s);
    }

    let forecast = py.allow_threads(|| {
        Simulation::new(&table, &fixtures)
            .with_distributions(home, away)
            .with_config(config)
            .run()
    })?;

    let skipped = PyList::empty_bound(py);
    for skip in &forecast.skipped {
        skipped.append((skip.fixture.home.as_str(), skip.fixture.away.as_str()))?;
    }

    let result = PyDict::new_bound(py);
    result.set_item("matrix", forecast.matrix.to_nested())?;
    result.set_item("skipped", skipped)?;
    Ok(result.into_any().unbind())
}

/// Python module definition
#[pymodule]
fn league_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(sample, m)?)?;
    m.add_function(wrap_pyfunction!(run_trial, m)?)?;
    m.add_function(wrap_pyfunction!(aggregate, m)?)?;

    m.add("WIN_POINTS", crate::constants::WIN_POINTS)?;
    m.add("DRAW_POINTS", crate::constants::DRAW_POINTS)?;
    m.add("DEFAULT_GOALS", crate::constants::DEFAULT_GOALS.to_vec())?;
    m.add("DEFAULT_HOME_WEIGHTS", crate::constants::DEFAULT_HOME_WEIGHTS.to_vec())?;
    m.add("DEFAULT_AWAY_WEIGHTS", crate::constants::DEFAULT_AWAY_WEIGHTS.to_vec())?;

    Ok(())
}
