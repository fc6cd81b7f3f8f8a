use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::constants::{DEFAULT_BATCH_SIZE, DEFAULT_TRIALS};
use crate::distribution::GoalDistribution;
use crate::error::{Result, SimError};
use crate::ledger::{Fixture, LeagueTable, SkippedFixture, UnknownTeamPolicy};
use crate::matrix::ProbabilityMatrix;
use crate::ranking::sort_order;
use crate::tally::{OutcomeCounts, PlacementTally};
use crate::trial::play_season;

/// Run `trial_count` seasons drawing from `rng` and turn the finishing ranks into
/// percentages.
///
/// Fixtures naming unknown teams are left out of every trial and returned in
/// `SeasonForecast::skipped`. The rng belongs to the caller, so `seed` is `None`.
pub fn aggregate<R: Rng + ?Sized>(
    table: &LeagueTable,
    fixtures: &[Fixture],
    home: &GoalDistribution,
    away: &GoalDistribution,
    trial_count: usize,
    rng: &mut R,
) -> Result<SeasonForecast> {
    if trial_count < 1 {
        return Err(SimError::config("trials", "must be at least 1"));
    }
    let resolved = table.resolve_with_policy(fixtures, UnknownTeamPolicy::Skip)?;
    let (tally, outcomes) = run_trials(table, &resolved.matches, home, away, trial_count, rng, None)?;
    Ok(SeasonForecast {
        matrix: ProbabilityMatrix::from_tally(
            table.names().to_vec(),
            tally,
            table.matchdays_played(),
        ),
        outcomes,
        skipped: resolved.skipped,
        seed: None,
    })
}

/// Sequential trial loop over one random stream.
///
/// The working standings and the rank buffer are allocated once and reset per trial.
fn run_trials<R: Rng + ?Sized>(
    table: &LeagueTable,
    matches: &[(usize, usize)],
    home: &GoalDistribution,
    away: &GoalDistribution,
    trials: usize,
    rng: &mut R,
    cancel: Option<&AtomicBool>,
) -> Result<(PlacementTally, OutcomeCounts)> {
    let mut tally = PlacementTally::new(table.len());
    let mut outcomes = OutcomeCounts::default();
    let mut standings = table.standings();
    let mut order = Vec::with_capacity(table.len());

    for done in 0..trials {
        if cancel.map_or(false, |flag| flag.load(Ordering::Relaxed)) {
            return Err(SimError::Cancelled { completed: done });
        }
        standings.reset();
        play_season(&mut standings, matches, home, away, rng, &mut outcomes);
        sort_order(standings.records(), table.names(), table.tie_break(), &mut order);
        tally.record(&order);
    }

    Ok((tally, outcomes))
}

/// Run parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SimulationConfig {
    pub trials: usize,
    /// Top-level seed; drawn from entropy when absent
    pub seed: Option<u64>,
    /// Spread batches over the rayon thread pool
    pub parallel: bool,
    pub batch_size: usize,
    pub unknown_team_policy: UnknownTeamPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            trials: DEFAULT_TRIALS,
            seed: None,
            parallel: false,
            batch_size: DEFAULT_BATCH_SIZE,
            unknown_team_policy: UnknownTeamPolicy::Skip,
        }
    }
}

impl SimulationConfig {
    pub fn new(trials: usize) -> Self {
        SimulationConfig {
            trials,
            ..Default::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_unknown_team_policy(mut self, policy: UnknownTeamPolicy) -> Self {
        self.unknown_team_policy = policy;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.trials < 1 {
            return Err(SimError::config("trials", "must be at least 1"));
        }
        if self.batch_size < 1 {
            return Err(SimError::config("batch_size", "must be at least 1"));
        }
        Ok(())
    }

    fn batch_count(&self) -> usize {
        self.trials.div_ceil(self.batch_size)
    }

    fn batch_len(&self, batch: usize) -> usize {
        let start = batch * self.batch_size;
        self.batch_size.min(self.trials - start)
    }
}

/// Everything a finished run produces.
#[derive(Clone, Debug, Serialize)]
pub struct SeasonForecast {
    pub matrix: ProbabilityMatrix,
    pub outcomes: OutcomeCounts,
    pub skipped: Vec<SkippedFixture>,
    /// Seed a `Simulation` ran with, so an unseeded run can be repeated.
    /// `None` when the caller supplied the rng.
    pub seed: Option<u64>,
}

/// Monte Carlo driver: batches of trials, one ChaCha stream per batch.
///
/// Batch `b` draws from `ChaCha8Rng::seed_from_u64(seed)` on stream `b`, so a seeded
/// run gives the same matrix sequentially or in parallel, on any number of threads.
pub struct Simulation<'a> {
    table: &'a LeagueTable,
    fixtures: &'a [Fixture],
    home: GoalDistribution,
    away: GoalDistribution,
    config: SimulationConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl<'a> Simulation<'a> {
    /// Simulation with the built-in goal distributions and default config.
    pub fn new(table: &'a LeagueTable, fixtures: &'a [Fixture]) -> Self {
        Simulation {
            table,
            fixtures,
            home: GoalDistribution::default_home(),
            away: GoalDistribution::default_away(),
            config: SimulationConfig::default(),
            cancel: None,
        }
    }

    pub fn with_distributions(mut self, home: GoalDistribution, away: GoalDistribution) -> Self {
        self.home = home;
        self.away = away;
        self
    }

    pub fn with_config(mut self, config: SimulationConfig) -> Self {
        self.config = config;
        self
    }

    /// Checked between trials; setting it makes `run` return `Cancelled`.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn run(&self) -> Result<SeasonForecast> {
        self.config.validate()?;
        let resolved = self
            .table
            .resolve_with_policy(self.fixtures, self.config.unknown_team_policy)?;

        let seed = self
            .config
            .seed
            .unwrap_or_else(|| ChaCha8Rng::from_entropy().gen());
        let batches = self.config.batch_count();

        info!(
            trials = self.config.trials,
            teams = self.table.len(),
            fixtures = resolved.matches.len(),
            skipped = resolved.skipped.len(),
            batches,
            seed,
            parallel = self.config.parallel,
            "starting season simulation"
        );

        let completed = AtomicUsize::new(0);
        let run_batch = |batch: usize| -> Result<(PlacementTally, OutcomeCounts)> {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            rng.set_stream(batch as u64);
            let len = self.config.batch_len(batch);

            let result = run_trials(
                self.table,
                &resolved.matches,
                &self.home,
                &self.away,
                len,
                &mut rng,
                self.cancel.as_deref(),
            );
            match result {
                Ok(partial) => {
                    completed.fetch_add(len, Ordering::Relaxed);
                    debug!(batch, trials = len, "batch finished");
                    Ok(partial)
                }
                Err(SimError::Cancelled { completed: local }) => Err(SimError::Cancelled {
                    completed: completed.load(Ordering::Relaxed) + local,
                }),
                Err(e) => Err(e),
            }
        };

        let teams = self.table.len();
        let identity = || (PlacementTally::new(teams), OutcomeCounts::default());
        let merge = |mut a: (PlacementTally, OutcomeCounts), b: (PlacementTally, OutcomeCounts)| {
            a.0.merge(&b.0);
            a.1.merge(&b.1);
            a
        };

        let (tally, outcomes) = if self.config.parallel {
            (0..batches)
                .into_par_iter()
                .map(run_batch)
                .try_reduce(identity, |a, b| Ok(merge(a, b)))?
        } else {
            (0..batches).map(run_batch).try_fold(identity(), |acc, part| part.map(|p| merge(acc, p)))?
        };

        info!(
            trials = tally.trials(),
            matches = outcomes.total(),
            "season simulation finished"
        );

        Ok(SeasonForecast {
            matrix: ProbabilityMatrix::from_tally(
                self.table.names().to_vec(),
                tally,
                self.table.matchdays_played(),
            ),
            outcomes,
            skipped: resolved.skipped,
            seed: Some(seed),
        })
    }
}
