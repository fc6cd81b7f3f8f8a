use serde::{Deserialize, Serialize};

use crate::constants::{DRAW_POINTS, WIN_POINTS};

/// Goals for minus goals against; i64 holds every difference of two u32 counts.
pub fn goal_difference(goals_for: u32, goals_against: u32) -> i64 {
    goals_for as i64 - goals_against as i64
}

/// One row of a league table as supplied by (and returned to) collaborators.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamStanding {
    pub team: String,
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl TeamStanding {
    /// Create a row with goal difference derived from the goal columns.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        team: impl Into<String>,
        played: u32,
        wins: u32,
        draws: u32,
        losses: u32,
        goals_for: u32,
        goals_against: u32,
        points: u32,
    ) -> Self {
        TeamStanding {
            team: team.into(),
            played,
            wins,
            draws,
            losses,
            goals_for,
            goals_against,
            goal_difference: goal_difference(goals_for, goals_against),
            points,
        }
    }

    /// A team that has not played yet.
    pub fn empty(team: impl Into<String>) -> Self {
        Self::new(team, 0, 0, 0, 0, 0, 0, 0)
    }

    pub(crate) fn record(&self) -> TeamRecord {
        TeamRecord {
            played: self.played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: goal_difference(self.goals_for, self.goals_against),
            points: self.points,
        }
    }
}

/// Counters of one team inside a trial. Copy-sized so a whole table clones as a flat array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamRecord {
    pub played: u32,
    pub wins: u32,
    pub draws: u32,
    pub losses: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
}

impl TeamRecord {
    /// Book one match from this team's point of view.
    pub(crate) fn record_match(&mut self, scored: u32, conceded: u32) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = goal_difference(self.goals_for, self.goals_against);

        if scored > conceded {
            self.wins += 1;
            self.points += WIN_POINTS;
        } else if scored < conceded {
            self.losses += 1;
        } else {
            self.draws += 1;
            self.points += DRAW_POINTS;
        }
    }

    /// played == wins + draws + losses and goal difference matches the goal columns
    pub fn is_consistent(&self) -> bool {
        self.played as u64 == self.wins as u64 + self.draws as u64 + self.losses as u64
            && self.goal_difference == goal_difference(self.goals_for, self.goals_against)
    }

    pub fn to_standing(&self, team: &str) -> TeamStanding {
        TeamStanding {
            team: team.to_string(),
            played: self.played,
            wins: self.wins,
            draws: self.draws,
            losses: self.losses,
            goals_for: self.goals_for,
            goals_against: self.goals_against,
            goal_difference: self.goal_difference,
            points: self.points,
        }
    }
}
