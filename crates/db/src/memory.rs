use std::collections::HashMap;

use chrono::Utc;
use dashmap::DashMap;
use matchform_models::{
    HistoricalMatch, MapAggregate, PredictionRecord, Result, ScheduledMatch,
    StoredPredictionSummary, TeamStats, UpcomingMatch,
};
use parking_lot::RwLock;

use crate::repository::MatchHistoryStore;

/// Process-local store with the same query semantics as the Postgres one.
///
/// Rows keep insertion order, which plays the role of the database's
/// natural row order for stable sorts downstream.
#[derive(Default)]
pub struct InMemoryStore {
    matches: RwLock<Vec<HistoricalMatch>>,
    team_stats: DashMap<i64, TeamStats>,
    schedule: RwLock<Vec<ScheduledMatch>>,
    predictions: DashMap<i64, PredictionRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_matches(matches: impl IntoIterator<Item = HistoricalMatch>) -> Self {
        let store = Self::new();
        store.matches.write().extend(matches);
        store
    }

    pub fn insert_match(&self, record: HistoricalMatch) {
        self.matches.write().push(record);
    }

    pub fn set_team_stats(&self, stats: TeamStats) {
        self.team_stats.insert(stats.team_id, stats);
    }

    pub fn schedule_match(&self, fixture: ScheduledMatch) {
        self.schedule.write().push(fixture);
    }

    pub fn prediction_count(&self) -> usize {
        self.predictions.len()
    }

    /// Matches satisfying `filter` that have been played, newest first.
    fn played_newest_first(
        &self,
        limit: usize,
        filter: impl Fn(&HistoricalMatch) -> bool,
    ) -> Vec<HistoricalMatch> {
        let now = Utc::now();
        let mut selected: Vec<HistoricalMatch> = self
            .matches
            .read()
            .iter()
            .filter(|m| m.played_at < now && filter(m))
            .cloned()
            .collect();
        selected.sort_by(|a, b| b.played_at.cmp(&a.played_at));
        selected.truncate(limit);
        selected
    }
}

impl MatchHistoryStore for InMemoryStore {
    async fn recent_matches(&self, team_id: i64, limit: usize) -> Result<Vec<HistoricalMatch>> {
        Ok(self.played_newest_first(limit, |m| m.involves(team_id)))
    }

    async fn head_to_head_matches(
        &self,
        team1_id: i64,
        team2_id: i64,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>> {
        Ok(self.played_newest_first(limit, |m| m.is_between(team1_id, team2_id)))
    }

    async fn map_aggregates(&self, team_id: i64, min_matches: i64) -> Result<Vec<MapAggregate>> {
        let mut groups: Vec<MapAggregate> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for m in self.matches.read().iter().filter(|m| m.involves(team_id)) {
            let Some(map_name) = m.map_name.as_ref() else {
                continue;
            };
            let slot = *index.entry(map_name.clone()).or_insert_with(|| {
                groups.push(MapAggregate {
                    map_name: map_name.clone(),
                    total_matches: 0,
                    wins: 0,
                    rounds_won: 0,
                    rounds_lost: 0,
                });
                groups.len() - 1
            });

            let (own, opponent) = m.scores_for(team_id);
            let group = &mut groups[slot];
            group.total_matches += 1;
            group.wins += i64::from(m.is_won_by(team_id));
            group.rounds_won += i64::from(own);
            group.rounds_lost += i64::from(opponent);
        }

        groups.retain(|g| g.total_matches >= min_matches);
        Ok(groups)
    }

    async fn team_stats(&self, team_id: i64) -> Result<Option<TeamStats>> {
        Ok(self.team_stats.get(&team_id).map(|s| s.clone()))
    }

    async fn upsert_prediction(&self, record: &PredictionRecord) -> Result<PredictionRecord> {
        let stored = PredictionRecord {
            created_at: Utc::now(),
            ..record.clone()
        };
        self.predictions.insert(stored.match_id, stored.clone());
        Ok(stored)
    }

    async fn prediction(&self, match_id: i64) -> Result<Option<PredictionRecord>> {
        Ok(self.predictions.get(&match_id).map(|p| p.clone()))
    }

    async fn scheduled_match(&self, match_id: i64) -> Result<Option<ScheduledMatch>> {
        Ok(self.schedule.read().iter().find(|f| f.id == match_id).cloned())
    }

    async fn upcoming_matches(&self, team_id: i64, limit: usize) -> Result<Vec<UpcomingMatch>> {
        let now = Utc::now();
        let mut fixtures: Vec<ScheduledMatch> = self
            .schedule
            .read()
            .iter()
            .filter(|f| f.team1.id == team_id || f.team2.id == team_id)
            .filter(|f| f.scheduled_at.is_some_and(|at| at > now))
            .cloned()
            .collect();
        fixtures.sort_by_key(|f| f.scheduled_at);
        fixtures.truncate(limit);

        Ok(fixtures
            .into_iter()
            .map(|f| {
                let prediction = self.predictions.get(&f.id).map(|p| StoredPredictionSummary {
                    team1_score: p.predicted_team1_score,
                    team2_score: p.predicted_team2_score,
                    confidence: p.confidence_score,
                });
                UpcomingMatch {
                    id: f.id,
                    scheduled_at: f.scheduled_at,
                    league_name: f.league_name,
                    team1: f.team1,
                    team2: f.team2,
                    prediction,
                }
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use matchform_models::TeamRef;

    fn played(id: i64, team1_id: i64, team2_id: i64, score: (i32, i32), days_ago: i64, map: Option<&str>) -> HistoricalMatch {
        HistoricalMatch {
            id,
            team1_id,
            team2_id,
            team1_score: score.0,
            team2_score: score.1,
            winner_id: Some(if score.0 >= score.1 { team1_id } else { team2_id }),
            played_at: Utc::now() - Duration::days(days_ago),
            map_name: map.map(str::to_string),
            event_name: None,
        }
    }

    #[tokio::test]
    async fn test_recent_matches_newest_first_and_limited() {
        let store = InMemoryStore::with_matches([
            played(1, 1, 2, (16, 10), 5, None),
            played(2, 3, 1, (16, 14), 1, None),
            played(3, 1, 4, (9, 16), 3, None),
            played(4, 5, 6, (16, 0), 0, None),
        ]);

        let recent = store.recent_matches(1, 2).await.unwrap();
        let ids: Vec<_> = recent.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_future_matches_are_ignored() {
        let mut upcoming = played(1, 1, 2, (0, 0), 0, None);
        upcoming.played_at = Utc::now() + Duration::days(2);
        let store = InMemoryStore::with_matches([upcoming]);

        assert!(store.recent_matches(1, 5).await.unwrap().is_empty());
        assert!(store.head_to_head_matches(1, 2, 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_map_aggregates_group_and_filter() {
        let store = InMemoryStore::with_matches([
            played(1, 1, 2, (16, 10), 1, Some("Inferno")),
            played(2, 3, 1, (16, 14), 2, Some("Inferno")),
            played(3, 1, 4, (16, 8), 3, Some("Inferno")),
            played(4, 1, 2, (16, 3), 4, Some("Mirage")),
            played(5, 2, 1, (5, 16), 5, Some("Mirage")),
            played(6, 1, 2, (16, 3), 6, None),
        ]);

        let maps = store.map_aggregates(1, 3).await.unwrap();
        assert_eq!(maps.len(), 1);
        let inferno = &maps[0];
        assert_eq!(inferno.map_name, "Inferno");
        assert_eq!(inferno.total_matches, 3);
        assert_eq!(inferno.wins, 2);
        assert_eq!(inferno.rounds_won, 16 + 14 + 16);
        assert_eq!(inferno.rounds_lost, 10 + 16 + 8);
    }

    #[tokio::test]
    async fn test_upsert_keeps_one_row_per_match() {
        let store = InMemoryStore::new();
        let mut record = PredictionRecord {
            match_id: 9,
            predicted_winner_id: Some(1),
            confidence_score: 40.0,
            predicted_team1_score: 14,
            predicted_team2_score: 12,
            prediction_model: "heuristic_v1".to_string(),
            created_at: Utc::now(),
        };
        store.upsert_prediction(&record).await.unwrap();
        record.confidence_score = 55.0;
        store.upsert_prediction(&record).await.unwrap();

        assert_eq!(store.prediction_count(), 1);
        let stored = store.prediction(9).await.unwrap().unwrap();
        assert_eq!(stored.confidence_score, 55.0);
    }

    #[tokio::test]
    async fn test_upcoming_matches_join_predictions() {
        let store = InMemoryStore::new();
        let team = |id| TeamRef { id, name: None, image_url: None };
        store.schedule_match(ScheduledMatch {
            id: 100,
            scheduled_at: Some(Utc::now() + Duration::days(3)),
            team1: team(1),
            team2: team(2),
            league_name: None,
            series_name: None,
        });
        store.schedule_match(ScheduledMatch {
            id: 101,
            scheduled_at: Some(Utc::now() + Duration::days(1)),
            team1: team(3),
            team2: team(1),
            league_name: None,
            series_name: None,
        });
        store.schedule_match(ScheduledMatch {
            id: 102,
            scheduled_at: Some(Utc::now() - Duration::days(1)),
            team1: team(1),
            team2: team(4),
            league_name: None,
            series_name: None,
        });
        store
            .upsert_prediction(&PredictionRecord {
                match_id: 100,
                predicted_winner_id: Some(1),
                confidence_score: 30.0,
                predicted_team1_score: 14,
                predicted_team2_score: 13,
                prediction_model: "heuristic_v1".to_string(),
                created_at: Utc::now(),
            })
            .await
            .unwrap();

        let upcoming = store.upcoming_matches(1, 5).await.unwrap();
        let ids: Vec<_> = upcoming.iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![101, 100]);
        assert!(upcoming[0].prediction.is_none());
        assert_eq!(upcoming[1].prediction.as_ref().unwrap().team1_score, 14);
    }
}
