// Shared fixtures for the integration tests
#![allow(dead_code)]

use chrono::{Duration, Utc};
use matchform_db::{InMemoryStore, MatchHistoryStore};
use matchform_models::{
    AnalyticsError, HistoricalMatch, MapAggregate, PredictionRecord, Result, ScheduledMatch,
    TeamRef, TeamStats, UpcomingMatch,
};

pub const TEAM_A: i64 = 1;
pub const TEAM_B: i64 = 2;

/// A completed match `days_ago` days back. The winner is whoever scored more.
pub fn played(
    id: i64,
    team1_id: i64,
    team2_id: i64,
    score: (i32, i32),
    days_ago: i64,
    map: Option<&str>,
) -> HistoricalMatch {
    HistoricalMatch {
        id,
        team1_id,
        team2_id,
        team1_score: score.0,
        team2_score: score.1,
        winner_id: Some(if score.0 > score.1 { team1_id } else { team2_id }),
        played_at: Utc::now() - Duration::days(days_ago),
        map_name: map.map(str::to_string),
        event_name: Some("ESL Pro League".to_string()),
    }
}

pub fn team_stats(team_id: i64, win_rate: f64) -> TeamStats {
    TeamStats {
        team_id,
        total_matches: 20,
        wins: (win_rate / 5.0) as i64,
        losses: 20 - (win_rate / 5.0) as i64,
        rounds_won: 0,
        rounds_lost: 0,
        win_rate: Some(win_rate),
        avg_rounds_won: None,
    }
}

pub fn team_ref(id: i64, name: &str) -> TeamRef {
    TeamRef {
        id,
        name: Some(name.to_string()),
        image_url: None,
    }
}

pub fn fixture(id: i64, team1_id: i64, team2_id: i64, days_ahead: i64) -> ScheduledMatch {
    ScheduledMatch {
        id,
        scheduled_at: Some(Utc::now() + Duration::days(days_ahead)),
        team1: team_ref(team1_id, "Vitality"),
        team2: team_ref(team2_id, "FaZe"),
        league_name: Some("BLAST Premier".to_string()),
        series_name: Some("Spring Finals".to_string()),
    }
}

/// TEAM_A's last five, newest first: W 16-5, W 16-10, L 3-16, W 16-14, L 8-16.
pub fn scenario_a_store() -> InMemoryStore {
    InMemoryStore::with_matches([
        played(1, TEAM_A, 10, (16, 5), 1, None),
        played(2, 11, TEAM_A, (10, 16), 2, None),
        played(3, TEAM_A, 12, (3, 16), 3, None),
        played(4, TEAM_A, 13, (16, 14), 4, None),
        played(5, 14, TEAM_A, (16, 8), 5, None),
    ])
}

/// Store whose every query fails as an unreachable database would.
pub struct UnavailableStore;

fn unavailable<T>() -> Result<T> {
    Err(AnalyticsError::Database(sqlx::Error::PoolTimedOut))
}

impl MatchHistoryStore for UnavailableStore {
    async fn recent_matches(&self, _team_id: i64, _limit: usize) -> Result<Vec<HistoricalMatch>> {
        unavailable()
    }

    async fn head_to_head_matches(
        &self,
        _team1_id: i64,
        _team2_id: i64,
        _limit: usize,
    ) -> Result<Vec<HistoricalMatch>> {
        unavailable()
    }

    async fn map_aggregates(&self, _team_id: i64, _min_matches: i64) -> Result<Vec<MapAggregate>> {
        unavailable()
    }

    async fn team_stats(&self, _team_id: i64) -> Result<Option<TeamStats>> {
        unavailable()
    }

    async fn upsert_prediction(&self, _record: &PredictionRecord) -> Result<PredictionRecord> {
        unavailable()
    }

    async fn prediction(&self, _match_id: i64) -> Result<Option<PredictionRecord>> {
        unavailable()
    }

    async fn scheduled_match(&self, _match_id: i64) -> Result<Option<ScheduledMatch>> {
        unavailable()
    }

    async fn upcoming_matches(&self, _team_id: i64, _limit: usize) -> Result<Vec<UpcomingMatch>> {
        unavailable()
    }
}
