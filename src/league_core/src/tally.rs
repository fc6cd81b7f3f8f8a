use serde::Serialize;

/// Finishing-rank counters per team, accumulated over many trials.
///
/// Stored team-major: `counts[team * n + (rank - 1)]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlacementTally {
    teams: usize,
    trials: u64,
    counts: Vec<u64>,
}

impl PlacementTally {
    pub fn new(teams: usize) -> Self {
        PlacementTally {
            teams,
            trials: 0,
            counts: vec![0; teams * teams],
        }
    }

    /// Book one trial. `order[pos]` is the team index finishing at rank `pos + 1`.
    pub fn record(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.teams);
        for (pos, &team) in order.iter().enumerate() {
            self.counts[team * self.teams + pos] += 1;
        }
        self.trials += 1;
    }

    /// Pairwise sum of counters. Order of merging never changes the result.
    pub fn merge(&mut self, other: &PlacementTally) {
        debug_assert_eq!(self.teams, other.teams);
        for (mine, theirs) in self.counts.iter_mut().zip(&other.counts) {
            *mine += theirs;
        }
        self.trials += other.trials;
    }

    pub fn merged(mut self, other: PlacementTally) -> Self {
        self.merge(&other);
        self
    }

    pub fn teams(&self) -> usize {
        self.teams
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Times `team` finished at 1-indexed `rank`.
    pub fn count(&self, team: usize, rank: usize) -> u64 {
        if team >= self.teams || rank == 0 || rank > self.teams {
            return 0;
        }
        self.counts[team * self.teams + rank - 1]
    }

    pub fn team_counts(&self, team: usize) -> &[u64] {
        &self.counts[team * self.teams..(team + 1) * self.teams]
    }

    pub fn team_total(&self, team: usize) -> u64 {
        self.team_counts(team).iter().sum()
    }

    pub fn rank_total(&self, rank: usize) -> u64 {
        (0..self.teams).map(|team| self.count(team, rank)).sum()
    }
}

/// Home win / draw / away win counts over every simulated match.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeCounts {
    pub home_wins: u64,
    pub draws: u64,
    pub away_wins: u64,
}

impl OutcomeCounts {
    pub fn record(&mut self, home_goals: u32, away_goals: u32) {
        if home_goals > away_goals {
            self.home_wins += 1;
        } else if home_goals < away_goals {
            self.away_wins += 1;
        } else {
            self.draws += 1;
        }
    }

    pub fn merge(&mut self, other: &OutcomeCounts) {
        self.home_wins += other.home_wins;
        self.draws += other.draws;
        self.away_wins += other.away_wins;
    }

    pub fn total(&self) -> u64 {
        self.home_wins + self.draws + self.away_wins
    }

    /// (home win, draw, away win) as percentages; all zero if nothing was played.
    pub fn percentages(&self) -> (f64, f64, f64) {
        let total = self.total();
        if total == 0 {
            return (0.0, 0.0, 0.0);
        }
        let pct = |n: u64| n as f64 / total as f64 * 100.0;
        (pct(self.home_wins), pct(self.draws), pct(self.away_wins))
    }
}
