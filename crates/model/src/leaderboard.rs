use indexmap::IndexMap;
use itertools::Itertools;
use schemars::JsonSchema;
use serde::Serialize;
use utility::id::Id;

use crate::{completion::CompletionRecord, user::User};

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RunningSummary {
    pub user_id: Id<User>,
    pub name: String,
    pub total_distance_km: f64,
    pub total_time_secs: i64,
    pub runs: usize,
}

/// Ranks users by the total distance of their completed runs, longest first.
/// Ties keep the order in which users first appear in `records`.
pub fn running_leaderboard<'a, I>(records: I) -> Vec<(usize, RunningSummary)>
where
    I: IntoIterator<Item = &'a CompletionRecord>,
{
    let mut by_user: IndexMap<Id<User>, RunningSummary> = IndexMap::new();
    for record in records {
        let summary = by_user
            .entry(record.user_id.clone())
            .or_insert_with(|| RunningSummary {
                user_id: record.user_id.clone(),
                name: record.user_name.clone(),
                total_distance_km: 0.0,
                total_time_secs: 0,
                runs: 0,
            });
        summary.total_distance_km += record.distance_km;
        summary.total_time_secs += record.time_taken.num_seconds();
        summary.runs += 1;
    }

    by_user
        .into_values()
        .sorted_by(|a, b| b.total_distance_km.total_cmp(&a.total_distance_km))
        .enumerate()
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::ExampleData;

    fn record(user: &str, distance_km: f64, secs: i64) -> CompletionRecord {
        CompletionRecord {
            user_id: Id::new(user.to_owned()),
            user_name: user.to_uppercase(),
            distance_km,
            time_taken: Duration::seconds(secs),
            ..CompletionRecord::example_data()
        }
    }

    #[test]
    fn test_groups_and_ranks_by_distance() {
        let records = vec![
            record("ana", 3.0, 900),
            record("luis", 5.0, 1500),
            record("ana", 4.0, 1200),
            record("eva", 1.0, 400),
        ];
        let board = running_leaderboard(&records);

        let ranked: Vec<_> = board
            .iter()
            .map(|(rank, s)| (*rank, s.user_id.raw(), s.runs))
            .collect();
        assert_eq!(
            vec![
                (0, "ana".to_owned(), 2),
                (1, "luis".to_owned(), 1),
                (2, "eva".to_owned(), 1)
            ],
            ranked
        );
        assert_eq!(7.0, board[0].1.total_distance_km);
        assert_eq!(2100, board[0].1.total_time_secs);
        assert_eq!("ANA", board[0].1.name);
    }

    #[test]
    fn test_ties_keep_first_appearance() {
        let records = vec![record("b", 2.0, 1), record("a", 2.0, 1)];
        let board = running_leaderboard(&records);
        assert_eq!("b", board[0].1.user_id.raw());
    }

    #[test]
    fn test_empty() {
        assert!(running_leaderboard(&Vec::<CompletionRecord>::new()).is_empty());
    }
}
