use rand::Rng;

use crate::distribution::{sample_score, GoalDistribution};
use crate::ledger::{Fixture, LeagueTable, SkippedFixture, Standings};
use crate::ranking::Ranking;
use crate::tally::OutcomeCounts;

/// Final table of one simulated season, plus what could not be simulated.
#[derive(Clone, Debug)]
pub struct TrialOutcome<'t> {
    pub ranking: Ranking<'t>,
    pub skipped: Vec<SkippedFixture>,
    pub outcomes: OutcomeCounts,
}

/// Simulate the rest of one season.
///
/// Works on a fresh copy of the starting table: each fixture, in order, gets a home
/// and an away goal draw, and the result is booked before the next one. Fixtures
/// naming unknown teams consume no draws and come back in `skipped`.
pub fn run_trial<'t, R: Rng + ?Sized>(
    table: &'t LeagueTable,
    fixtures: &[Fixture],
    home: &GoalDistribution,
    away: &GoalDistribution,
    rng: &mut R,
) -> TrialOutcome<'t> {
    let resolved = table.resolve_fixtures(fixtures);
    let mut standings = table.standings();
    let mut outcomes = OutcomeCounts::default();

    play_season(&mut standings, &resolved.matches, home, away, rng, &mut outcomes);

    TrialOutcome {
        ranking: standings.rank(),
        skipped: resolved.skipped,
        outcomes,
    }
}

/// Hot loop shared by single trials and the aggregator.
///
/// Only resolved matches reach this loop, so a skipped fixture consumes no random
/// draws: adding an unknown-team fixture leaves the rest of the season unchanged for
/// a given seed. Older versions drew a score for it and then threw the score away.
pub(crate) fn play_season<R: Rng + ?Sized>(
    standings: &mut Standings<'_>,
    matches: &[(usize, usize)],
    home: &GoalDistribution,
    away: &GoalDistribution,
    rng: &mut R,
    outcomes: &mut OutcomeCounts,
) {
    for &(h, a) in matches {
        let (home_goals, away_goals) = sample_score(home, away, rng);
        standings.apply_indexed(h, a, home_goals, away_goals);
        outcomes.record(home_goals, away_goals);
    }
}
