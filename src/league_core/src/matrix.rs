use serde::Serialize;
use std::collections::BTreeMap;

use crate::constants::PERCENT_DECIMALS;
use crate::tally::PlacementTally;

/// Probability of every team finishing at every rank, as percentages (0-100).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProbabilityMatrix {
    teams: Vec<String>,
    trials: u64,
    matchdays_played: u32,
    /// team-major, same layout as the tally
    percentages: Vec<f64>,
    #[serde(skip)]
    tally: PlacementTally,
}

/// Round a percentage to the reported precision.
pub fn round_percent(value: f64) -> f64 {
    let scale = 10f64.powi(PERCENT_DECIMALS);
    (value * scale).round() / scale
}

impl ProbabilityMatrix {
    /// Normalize raw counts: count / trials * 100 for every (team, rank).
    pub fn from_tally(teams: Vec<String>, tally: PlacementTally, matchdays_played: u32) -> Self {
        let trials = tally.trials();
        let n = tally.teams();
        let mut percentages = Vec::with_capacity(n * n);
        for team in 0..n {
            for &count in tally.team_counts(team) {
                let pct = if trials == 0 {
                    0.0
                } else {
                    count as f64 / trials as f64 * 100.0
                };
                percentages.push(pct);
            }
        }

        ProbabilityMatrix {
            teams,
            trials,
            matchdays_played,
            percentages,
            tally,
        }
    }

    pub fn teams(&self) -> &[String] {
        &self.teams
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Matches the first team of the starting table had played.
    pub fn matchdays_played(&self) -> u32 {
        self.matchdays_played
    }

    pub fn tally(&self) -> &PlacementTally {
        &self.tally
    }

    fn team_index(&self, team: &str) -> Option<usize> {
        self.teams.iter().position(|t| t == team)
    }

    /// Unrounded percentage of `team` finishing at 1-indexed `rank`.
    pub fn percentage(&self, team: &str, rank: usize) -> Option<f64> {
        let n = self.teams.len();
        if rank == 0 || rank > n {
            return None;
        }
        self.team_index(team).map(|i| self.percentages[i * n + rank - 1])
    }

    /// One team's (rank, percentage) row, ranks ascending.
    pub fn team_distribution(&self, team: &str) -> Option<Vec<(usize, f64)>> {
        let n = self.teams.len();
        self.team_index(team).map(|i| {
            self.percentages[i * n..(i + 1) * n]
                .iter()
                .enumerate()
                .map(|(pos, &pct)| (pos + 1, pct))
                .collect()
        })
    }

    /// Every team's percentage at 1-indexed `rank`, in table order.
    pub fn rank_distribution(&self, rank: usize) -> Vec<(&str, f64)> {
        let n = self.teams.len();
        if rank == 0 || rank > n {
            return Vec::new();
        }
        self.teams
            .iter()
            .enumerate()
            .map(|(i, team)| (team.as_str(), self.percentages[i * n + rank - 1]))
            .collect()
    }

    /// Mean finishing rank over all trials.
    pub fn expected_position(&self, team: &str) -> Option<f64> {
        let i = self.team_index(team)?;
        if self.trials == 0 {
            return None;
        }
        let weighted: u64 = self
            .tally
            .team_counts(i)
            .iter()
            .enumerate()
            .map(|(pos, &count)| (pos as u64 + 1) * count)
            .sum();
        Some(weighted as f64 / self.trials as f64)
    }

    /// team -> rank -> percentage, rounded to two decimals.
    pub fn to_nested(&self) -> BTreeMap<String, BTreeMap<usize, f64>> {
        let n = self.teams.len();
        self.teams
            .iter()
            .enumerate()
            .map(|(i, team)| {
                let row = (0..n)
                    .map(|pos| (pos + 1, round_percent(self.percentages[i * n + pos])))
                    .collect();
                (team.clone(), row)
            })
            .collect()
    }
}
