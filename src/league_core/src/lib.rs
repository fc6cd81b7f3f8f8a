//! League Core - Monte Carlo prediction of final league standings.
//!
//! The remaining fixtures of a season are played out many times with goal counts drawn
//! from weighted distributions; each simulated season ends in a ranked table, and the
//! finishing ranks over all trials become a team × rank probability matrix.
//! Python bindings are available with the `python` feature.

pub mod aggregate;
pub mod constants;
pub mod distribution;
pub mod error;
pub mod ledger;
pub mod matrix;
pub mod ranking;
pub mod tally;
pub mod team;
pub mod trial;

#[cfg(feature = "python")]
mod python;

pub use aggregate::{aggregate, SeasonForecast, Simulation, SimulationConfig};
pub use constants::{DEFAULT_AWAY_WEIGHTS, DEFAULT_GOALS, DEFAULT_HOME_WEIGHTS, DRAW_POINTS, WIN_POINTS};
pub use distribution::{sample_score, GoalDistribution};
pub use error::{Result, SimError};
pub use ledger::{Fixture, LeagueTable, SkipReason, SkippedFixture, Standings, UnknownTeamPolicy};
pub use matrix::ProbabilityMatrix;
pub use ranking::{Ranking, TieBreak};
pub use tally::{OutcomeCounts, PlacementTally};
pub use team::{TeamRecord, TeamStanding};
pub use trial::{run_trial, TrialOutcome};
