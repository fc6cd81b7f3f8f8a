use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::error::{Result, SimError};
use crate::ranking::{Ranking, TieBreak};
use crate::team::{TeamRecord, TeamStanding};

/// A remaining match, home side first.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fixture {
    pub home: String,
    pub away: String,
}

impl Fixture {
    pub fn new(home: impl Into<String>, away: impl Into<String>) -> Self {
        Fixture {
            home: home.into(),
            away: away.into(),
        }
    }
}

impl<H: Into<String>, A: Into<String>> From<(H, A)> for Fixture {
    fn from((home, away): (H, A)) -> Self {
        Fixture::new(home, away)
    }
}

/// What to do with a fixture naming a team that is not in the table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnknownTeamPolicy {
    /// Leave the fixture out and report it alongside the result
    #[default]
    Skip,
    /// Fail the run before any trial
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    UnknownTeams(Vec<String>),
    /// Home and away name the same team
    SameTeam,
}

/// A fixture left out of every trial, with its position in the input list.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SkippedFixture {
    pub index: usize,
    pub fixture: Fixture,
    pub reason: SkipReason,
}

/// Fixtures translated to table indices once per run.
#[derive(Clone, Debug, Default)]
pub struct ResolvedFixtures {
    pub matches: Vec<(usize, usize)>,
    pub skipped: Vec<SkippedFixture>,
}

/// Starting table: the template every trial copies its working standings from.
///
/// Names and the name index live here once; a trial only copies the flat
/// `TeamRecord` array.
#[derive(Clone, Debug)]
pub struct LeagueTable {
    names: Vec<String>,
    index: HashMap<String, usize>,
    start: Vec<TeamRecord>,
    tie_break: TieBreak,
}

impl LeagueTable {
    /// Build the template from externally supplied rows, in table order.
    ///
    /// Rejects an empty table, duplicate team names and rows where
    /// played != wins + draws + losses. A supplied goal difference that disagrees
    /// with the goal columns is recomputed.
    pub fn new(rows: Vec<TeamStanding>) -> Result<Self> {
        if rows.is_empty() {
            return Err(SimError::config("standings", "starting table is empty"));
        }

        let mut names = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());
        let mut start = Vec::with_capacity(rows.len());

        for (i, row) in rows.into_iter().enumerate() {
            let decided = row.wins.checked_add(row.draws).and_then(|s| s.checked_add(row.losses));
            if decided != Some(row.played) {
                return Err(SimError::config(
                    format!("standings[{}].played", i),
                    format!(
                        "{} played {} but won {}, drew {}, lost {}",
                        row.team, row.played, row.wins, row.draws, row.losses
                    ),
                ));
            }
            let record = row.record();
            if record.goal_difference != row.goal_difference {
                warn!(
                    team = %row.team,
                    supplied = row.goal_difference,
                    computed = record.goal_difference,
                    "goal difference disagrees with goals for/against, using computed value"
                );
            }
            if index.insert(row.team.clone(), i).is_some() {
                return Err(SimError::DuplicateTeam(row.team));
            }
            names.push(row.team);
            start.push(record);
        }

        Ok(LeagueTable {
            names,
            index,
            start,
            tie_break: TieBreak::default(),
        })
    }

    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }

    pub fn tie_break(&self) -> TieBreak {
        self.tie_break
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn team_index(&self, team: &str) -> Option<usize> {
        self.index.get(team).copied()
    }

    pub fn start_records(&self) -> &[TeamRecord] {
        &self.start
    }

    /// Matches played by the first team in the table, i.e. the completed matchdays.
    pub fn matchdays_played(&self) -> u32 {
        self.start.first().map(|r| r.played).unwrap_or(0)
    }

    /// Fresh working copy of the starting table.
    pub fn standings(&self) -> Standings<'_> {
        Standings {
            table: self,
            records: self.start.clone(),
        }
    }

    /// Ranking of the table as supplied.
    pub fn starting_ranking(&self) -> Ranking<'_> {
        Ranking::new(&self.names, &self.start, self.tie_break)
    }

    /// Map fixtures to table indices, collecting the ones that cannot be played.
    pub fn resolve_fixtures(&self, fixtures: &[Fixture]) -> ResolvedFixtures {
        let mut resolved = ResolvedFixtures {
            matches: Vec::with_capacity(fixtures.len()),
            skipped: Vec::new(),
        };

        for (i, fixture) in fixtures.iter().enumerate() {
            match (self.team_index(&fixture.home), self.team_index(&fixture.away)) {
                (Some(h), Some(a)) if h == a => resolved.skipped.push(SkippedFixture {
                    index: i,
                    fixture: fixture.clone(),
                    reason: SkipReason::SameTeam,
                }),
                (Some(h), Some(a)) => resolved.matches.push((h, a)),
                (h, a) => {
                    let mut missing = Vec::new();
                    if h.is_none() {
                        missing.push(fixture.home.clone());
                    }
                    if a.is_none() {
                        missing.push(fixture.away.clone());
                    }
                    resolved.skipped.push(SkippedFixture {
                        index: i,
                        fixture: fixture.clone(),
                        reason: SkipReason::UnknownTeams(missing),
                    });
                }
            }
        }

        resolved
    }

    /// Resolve fixtures under `policy`; `Reject` turns the first skip into an error.
    pub fn resolve_with_policy(
        &self,
        fixtures: &[Fixture],
        policy: UnknownTeamPolicy,
    ) -> Result<ResolvedFixtures> {
        let resolved = self.resolve_fixtures(fixtures);

        if policy == UnknownTeamPolicy::Reject {
            if let Some(skip) = resolved.skipped.first() {
                return Err(match &skip.reason {
                    SkipReason::UnknownTeams(missing) => SimError::UnknownTeam {
                        fixture: skip.index,
                        team: missing.first().cloned().unwrap_or_default(),
                    },
                    SkipReason::SameTeam => SimError::config(
                        format!("fixtures[{}]", skip.index),
                        format!("{} is drawn against itself", skip.fixture.home),
                    ),
                });
            }
        }

        for skip in &resolved.skipped {
            warn!(
                fixture = skip.index,
                home = %skip.fixture.home,
                away = %skip.fixture.away,
                reason = ?skip.reason,
                "fixture left out of the simulation"
            );
        }

        Ok(resolved)
    }
}

/// Working standings of one trial. The only place a match result changes state.
#[derive(Clone, Debug)]
pub struct Standings<'t> {
    table: &'t LeagueTable,
    records: Vec<TeamRecord>,
}

impl<'t> Standings<'t> {
    /// Apply a result by team name.
    ///
    /// Returns false, changing nothing, when either team is missing from the table
    /// or both names are the same team.
    pub fn apply_result(&mut self, home: &str, away: &str, home_goals: u32, away_goals: u32) -> bool {
        match (self.table.team_index(home), self.table.team_index(away)) {
            (Some(h), Some(a)) if h != a => {
                self.apply_indexed(h, a, home_goals, away_goals);
                true
            }
            _ => false,
        }
    }

    /// Apply a result between two distinct table indices.
    pub(crate) fn apply_indexed(&mut self, home: usize, away: usize, home_goals: u32, away_goals: u32) {
        debug_assert_ne!(home, away);
        self.records[home].record_match(home_goals, away_goals);
        self.records[away].record_match(away_goals, home_goals);
    }

    /// Return to the starting table without reallocating.
    pub fn reset(&mut self) {
        self.records.copy_from_slice(&self.table.start);
    }

    pub fn get(&self, team: &str) -> Option<&TeamRecord> {
        self.table.team_index(team).map(|i| &self.records[i])
    }

    pub fn records(&self) -> &[TeamRecord] {
        &self.records
    }

    pub fn table(&self) -> &'t LeagueTable {
        self.table
    }

    pub fn rank(&self) -> Ranking<'t> {
        Ranking::new(&self.table.names, &self.records, self.table.tie_break)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_table() -> LeagueTable {
        LeagueTable::new(vec![
            TeamStanding::new("A", 2, 1, 1, 0, 4, 2, 4),
            TeamStanding::new("B", 2, 0, 1, 1, 1, 3, 1),
            TeamStanding::new("C", 2, 1, 0, 1, 3, 3, 3),
        ])
        .unwrap()
    }

    #[test]
    fn test_home_win() {
        let table = make_table();
        let mut standings = table.standings();
        assert!(standings.apply_result("B", "C", 3, 1));

        let b = standings.get("B").unwrap();
        assert_eq!((b.played, b.wins, b.points), (3, 1, 4));
        assert_eq!((b.goals_for, b.goals_against, b.goal_difference), (4, 4, 0));

        let c = standings.get("C").unwrap();
        assert_eq!((c.played, c.losses, c.points), (3, 2, 3));
        assert_eq!(c.goal_difference, -2);
    }

    #[test]
    fn test_away_win_and_draw() {
        let table = make_table();
        let mut standings = table.standings();
        standings.apply_result("A", "B", 0, 2);
        standings.apply_result("A", "C", 1, 1);

        let a = standings.get("A").unwrap();
        assert_eq!((a.played, a.wins, a.draws, a.losses), (4, 1, 2, 1));
        assert_eq!(a.points, 5);
        assert_eq!(standings.get("B").unwrap().points, 4);
        assert_eq!(standings.get("C").unwrap().draws, 1);
    }

    #[test]
    fn test_unknown_team_is_noop() {
        let table = make_table();
        let mut standings = table.standings();
        assert!(!standings.apply_result("A", "Nowhere", 5, 0));
        assert!(!standings.apply_result("A", "A", 5, 0));
        assert_eq!(standings.records(), table.start_records());
    }

    #[test]
    fn test_working_copy_does_not_alias_template() {
        let table = make_table();
        let mut first = table.standings();
        first.apply_result("A", "B", 1, 0);
        let second = table.standings();
        assert_eq!(second.get("A").unwrap().played, 2);

        first.reset();
        assert_eq!(first.records(), table.start_records());
    }

    #[test]
    fn test_invalid_tables_rejected() {
        assert!(LeagueTable::new(vec![]).is_err());

        let dup = LeagueTable::new(vec![TeamStanding::empty("A"), TeamStanding::empty("A")]);
        assert_eq!(dup.unwrap_err(), SimError::DuplicateTeam("A".to_string()));

        let bad = LeagueTable::new(vec![TeamStanding::new("A", 3, 1, 0, 0, 2, 0, 3)]);
        match bad.unwrap_err() {
            SimError::InvalidConfiguration { field, .. } => assert_eq!(field, "standings[0].played"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_overflowing_results_rejected() {
        // wins + draws wraps to 0 in u32
        let row = TeamStanding::new("A", 0, u32::MAX, 1, 0, 0, 0, 0);
        match LeagueTable::new(vec![row]).unwrap_err() {
            SimError::InvalidConfiguration { field, .. } => assert_eq!(field, "standings[0].played"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_resolve_fixtures() {
        let table = make_table();
        let fixtures = vec![
            Fixture::new("A", "B"),
            Fixture::new("X", "C"),
            Fixture::new("C", "C"),
            Fixture::new("C", "A"),
        ];

        let resolved = table.resolve_fixtures(&fixtures);
        assert_eq!(resolved.matches, vec![(0, 1), (2, 0)]);
        assert_eq!(resolved.skipped.len(), 2);
        assert_eq!(resolved.skipped[0].index, 1);
        assert_eq!(resolved.skipped[0].reason, SkipReason::UnknownTeams(vec!["X".to_string()]));
        assert_eq!(resolved.skipped[1].reason, SkipReason::SameTeam);

        let err = table
            .resolve_with_policy(&fixtures, UnknownTeamPolicy::Reject)
            .unwrap_err();
        assert_eq!(
            err,
            SimError::UnknownTeam {
                fixture: 1,
                team: "X".to_string()
            }
        );
    }

    #[test]
    fn test_matchdays_played() {
        assert_eq!(make_table().matchdays_played(), 2);
    }

    proptest! {
        #[test]
        fn prop_ledger_invariants_hold(
            results in prop::collection::vec((0usize..4, 0usize..4, 0u32..7, 0u32..7), 0..60),
        ) {
            let table = LeagueTable::new(
                ["A", "B", "C", "D"].iter().map(|n| TeamStanding::empty(*n)).collect(),
            ).unwrap();
            let mut standings = table.standings();
            let mut expected_played = [0u32; 4];

            for (h, a, hg, ag) in results {
                let applied = standings.apply_result(&table.names()[h], &table.names()[a], hg, ag);
                prop_assert_eq!(applied, h != a);
                if applied {
                    expected_played[h] += 1;
                    expected_played[a] += 1;
                }
                for rec in standings.records() {
                    prop_assert!(rec.is_consistent());
                }
            }

            for (i, rec) in standings.records().iter().enumerate() {
                prop_assert_eq!(rec.played, expected_played[i]);
            }
            let total_points: u32 = standings.records().iter().map(|r| r.points).sum();
            let draws: u32 = standings.records().iter().map(|r| r.draws).sum();
            let wins: u32 = standings.records().iter().map(|r| r.wins).sum();
            prop_assert_eq!(total_points, 3 * wins + draws);
        }
    }
}
