use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::team::{TeamRecord, TeamStanding};

/// What decides the order of teams level on points, goal difference and goals scored.
///
/// `None` leaves such teams in starting-table order, the way the league table has
/// always been sorted (a stable sort on the three keys). `TableOrder` gives the same
/// order as an explicit rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreak {
    #[default]
    None,
    /// Earlier row in the starting table ranks higher
    TableOrder,
    /// Lexicographically smaller team name ranks higher
    Alphabetical,
}

/// Compare two records on (points, goal difference, goals for), ascending.
pub fn compare_keys(a: &TeamRecord, b: &TeamRecord) -> Ordering {
    a.points
        .cmp(&b.points)
        .then(a.goal_difference.cmp(&b.goal_difference))
        .then(a.goals_for.cmp(&b.goals_for))
}

/// Fill `order` with team indices, best team first.
///
/// `order` is reused across calls so ranking a trial does not allocate.
pub fn sort_order(records: &[TeamRecord], names: &[String], tie_break: TieBreak, order: &mut Vec<usize>) {
    order.clear();
    order.extend(0..records.len());

    match tie_break {
        TieBreak::None => {
            // stable: level teams keep their row order
            order.sort_by(|&a, &b| compare_keys(&records[b], &records[a]));
        }
        TieBreak::TableOrder => {
            order.sort_unstable_by(|&a, &b| compare_keys(&records[b], &records[a]).then(a.cmp(&b)));
        }
        TieBreak::Alphabetical => {
            order.sort_unstable_by(|&a, &b| {
                compare_keys(&records[b], &records[a]).then_with(|| names[a].cmp(&names[b]))
            });
        }
    }
}

/// League table for one snapshot: team names borrowed from the table template,
/// counters copied out of the ledger that produced it.
#[derive(Clone, Debug)]
pub struct Ranking<'t> {
    names: &'t [String],
    records: Vec<TeamRecord>,
    order: Vec<usize>,
}

impl<'t> Ranking<'t> {
    pub(crate) fn new(names: &'t [String], records: &[TeamRecord], tie_break: TieBreak) -> Self {
        let mut order = Vec::with_capacity(records.len());
        sort_order(records, names, tie_break, &mut order);
        Ranking {
            names,
            records: records.to_vec(),
            order,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Team index (row in the starting table) for each position, best first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Team at 1-indexed `rank`.
    pub fn team_at(&self, rank: usize) -> Option<&'t str> {
        let names = self.names;
        rank.checked_sub(1)
            .and_then(|pos| self.order.get(pos))
            .map(|&idx| names[idx].as_str())
    }

    /// 1-indexed rank of `team`.
    pub fn position_of(&self, team: &str) -> Option<usize> {
        self.order
            .iter()
            .position(|&idx| self.names[idx] == team)
            .map(|pos| pos + 1)
    }

    pub fn record_of(&self, team: &str) -> Option<&TeamRecord> {
        self.names
            .iter()
            .position(|n| n == team)
            .map(|idx| &self.records[idx])
    }

    /// (rank, team, record) in table order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'t str, &TeamRecord)> + '_ {
        let names = self.names;
        self.order
            .iter()
            .enumerate()
            .map(move |(pos, &idx)| (pos + 1, names[idx].as_str(), &self.records[idx]))
    }

    pub fn team_names(&self) -> Vec<&'t str> {
        self.iter().map(|(_, name, _)| name).collect()
    }

    /// Rows in ranked order, in the collaborator-facing record shape.
    pub fn to_standings(&self) -> Vec<TeamStanding> {
        self.iter().map(|(_, name, rec)| rec.to_standing(name)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(points: u32, goals_for: u32, goals_against: u32) -> TeamRecord {
        TeamRecord {
            points,
            goals_for,
            goals_against,
            goal_difference: crate::team::goal_difference(goals_for, goals_against),
            ..TeamRecord::default()
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_points_then_difference_then_goals() {
        let names = names(&["A", "B", "C", "D"]);
        let records = vec![rec(10, 5, 5), rec(12, 3, 9), rec(10, 8, 4), rec(10, 9, 5)];

        let ranking = Ranking::new(&names, &records, TieBreak::None);
        assert_eq!(ranking.team_names(), vec!["B", "D", "C", "A"]);
        assert_eq!(ranking.position_of("C"), Some(3));
        assert_eq!(ranking.team_at(1), Some("B"));
        assert_eq!(ranking.team_at(0), None);
        assert_eq!(ranking.team_at(5), None);
    }

    #[test]
    fn test_tie_breaks() {
        let names = names(&["Zwickau", "Aalen", "Mainz"]);
        let records = vec![rec(5, 4, 2), rec(5, 4, 2), rec(5, 4, 2)];

        let by_table = Ranking::new(&names, &records, TieBreak::TableOrder);
        assert_eq!(by_table.team_names(), vec!["Zwickau", "Aalen", "Mainz"]);

        let by_name = Ranking::new(&names, &records, TieBreak::Alphabetical);
        assert_eq!(by_name.team_names(), vec!["Aalen", "Mainz", "Zwickau"]);

        let plain = Ranking::new(&names, &records, TieBreak::None);
        assert_eq!(plain.team_names(), vec!["Zwickau", "Aalen", "Mainz"]);
    }

    #[test]
    fn test_level_teams_keep_table_order_in_large_table() {
        // 24 rows in four blocks of six level teams; big enough that an unstable sort
        // would reorder within a block
        let names: Vec<String> = (0..24).map(|i| format!("T{:02}", i)).collect();
        let records: Vec<TeamRecord> = (0..24).map(|i| rec(3 * ((i * 7) % 4), 0, 0)).collect();

        let ranking = Ranking::new(&names, &records, TieBreak::None);
        let expected: Vec<String> = [3u32, 2, 1, 0]
            .iter()
            .flat_map(|&residue| (0..24u32).filter(move |i| (i * 7) % 4 == residue))
            .map(|i| format!("T{:02}", i))
            .collect();
        assert_eq!(ranking.team_names(), expected);
        assert_eq!(&ranking.team_names()[..5], &["T01", "T05", "T09", "T13", "T17"]);

        let explicit = Ranking::new(&names, &records, TieBreak::TableOrder);
        assert_eq!(explicit.order(), ranking.order());
    }

    #[test]
    fn test_sort_order_reuses_buffer() {
        let names = names(&["A", "B"]);
        let records = vec![rec(0, 0, 1), rec(3, 1, 0)];
        let mut order = vec![9, 9, 9, 9];
        sort_order(&records, &names, TieBreak::None, &mut order);
        assert_eq!(order, vec![1, 0]);
    }
}
