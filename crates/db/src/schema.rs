use chrono::{DateTime, Utc};
use matchform_models::{
    HistoricalMatch, MapAggregate, PredictionRecord, ScheduledMatch, StoredPredictionSummary,
    TeamRef, TeamStats, UpcomingMatch,
};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct HistoricalMatchRecord {
    pub id: i64,
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_score: i32,
    pub team2_score: i32,
    pub winner_id: Option<i64>,
    pub played_at: DateTime<Utc>,
    pub map_name: Option<String>,
    pub event_name: Option<String>,
}

impl From<HistoricalMatchRecord> for HistoricalMatch {
    fn from(row: HistoricalMatchRecord) -> Self {
        Self {
            id: row.id,
            team1_id: row.team1_id,
            team2_id: row.team2_id,
            team1_score: row.team1_score,
            team2_score: row.team2_score,
            winner_id: row.winner_id,
            played_at: row.played_at,
            map_name: row.map_name,
            event_name: row.event_name,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamStatsRecord {
    pub team_id: i64,
    pub total_matches: i64,
    pub wins: i64,
    pub losses: i64,
    pub rounds_won: i64,
    pub rounds_lost: i64,
    pub win_rate: Option<f64>,
    pub avg_rounds_won: Option<f64>,
}

impl From<TeamStatsRecord> for TeamStats {
    fn from(row: TeamStatsRecord) -> Self {
        Self {
            team_id: row.team_id,
            total_matches: row.total_matches,
            wins: row.wins,
            losses: row.losses,
            rounds_won: row.rounds_won,
            rounds_lost: row.rounds_lost,
            win_rate: row.win_rate,
            avg_rounds_won: row.avg_rounds_won,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MapAggregateRecord {
    pub map_name: String,
    pub total_matches: i64,
    pub wins: Option<i64>,
    pub rounds_won: Option<i64>,
    pub rounds_lost: Option<i64>,
}

impl From<MapAggregateRecord> for MapAggregate {
    fn from(row: MapAggregateRecord) -> Self {
        Self {
            map_name: row.map_name,
            total_matches: row.total_matches,
            wins: row.wins.unwrap_or(0),
            rounds_won: row.rounds_won.unwrap_or(0),
            rounds_lost: row.rounds_lost.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PredictionRow {
    pub match_id: i64,
    pub predicted_winner_id: Option<i64>,
    pub confidence_score: f64,
    pub predicted_team1_score: i32,
    pub predicted_team2_score: i32,
    pub prediction_model: String,
    pub created_at: DateTime<Utc>,
}

impl From<PredictionRow> for PredictionRecord {
    fn from(row: PredictionRow) -> Self {
        Self {
            match_id: row.match_id,
            predicted_winner_id: row.predicted_winner_id,
            confidence_score: row.confidence_score,
            predicted_team1_score: row.predicted_team1_score,
            predicted_team2_score: row.predicted_team2_score,
            prediction_model: row.prediction_model,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ScheduledMatchRecord {
    pub id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub league_name: Option<String>,
    pub series_name: Option<String>,
    pub team1_id: i64,
    pub team1_name: Option<String>,
    pub team1_image: Option<String>,
    pub team2_id: i64,
    pub team2_name: Option<String>,
    pub team2_image: Option<String>,
}

impl From<ScheduledMatchRecord> for ScheduledMatch {
    fn from(row: ScheduledMatchRecord) -> Self {
        Self {
            id: row.id,
            scheduled_at: row.scheduled_at,
            team1: TeamRef {
                id: row.team1_id,
                name: row.team1_name,
                image_url: row.team1_image,
            },
            team2: TeamRef {
                id: row.team2_id,
                name: row.team2_name,
                image_url: row.team2_image,
            },
            league_name: row.league_name,
            series_name: row.series_name,
        }
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UpcomingMatchRecord {
    pub id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub league_name: Option<String>,
    pub team1_id: i64,
    pub team1_name: Option<String>,
    pub team1_image: Option<String>,
    pub team2_id: i64,
    pub team2_name: Option<String>,
    pub team2_image: Option<String>,
    pub predicted_team1_score: Option<i32>,
    pub predicted_team2_score: Option<i32>,
    pub confidence_score: Option<f64>,
}

impl From<UpcomingMatchRecord> for UpcomingMatch {
    fn from(row: UpcomingMatchRecord) -> Self {
        // A stored prediction always carries both scores; the LEFT JOIN leaves them NULL otherwise.
        let prediction = match (row.predicted_team1_score, row.predicted_team2_score) {
            (Some(team1_score), Some(team2_score)) => Some(StoredPredictionSummary {
                team1_score,
                team2_score,
                confidence: row.confidence_score.unwrap_or(0.0),
            }),
            _ => None,
        };

        Self {
            id: row.id,
            scheduled_at: row.scheduled_at,
            league_name: row.league_name,
            team1: TeamRef {
                id: row.team1_id,
                name: row.team1_name,
                image_url: row.team1_image,
            },
            team2: TeamRef {
                id: row.team2_id,
                name: row.team2_name,
                image_url: row.team2_image,
            },
            prediction,
        }
    }
}
