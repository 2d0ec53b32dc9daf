use matchform_models::{
    HistoricalMatch, MapAggregate, PredictionRecord, Result, ScheduledMatch, TeamStats,
    UpcomingMatch,
};
use sqlx::PgPool;
use tracing::debug;

use crate::schema::*;

/// Read surface over persisted match history plus the prediction upsert.
///
/// Every list query is bounded by an explicit limit. Matches are only
/// returned once played, most recent first.
pub trait MatchHistoryStore {
    /// Last `limit` completed matches involving `team_id`.
    async fn recent_matches(&self, team_id: i64, limit: usize) -> Result<Vec<HistoricalMatch>>;

    /// Last `limit` completed matches between the unordered pair.
    async fn head_to_head_matches(
        &self,
        team1_id: i64,
        team2_id: i64,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>>;

    /// Per-map totals for `team_id`, skipping unnamed maps and groups
    /// with fewer than `min_matches` rows.
    async fn map_aggregates(&self, team_id: i64, min_matches: i64) -> Result<Vec<MapAggregate>>;

    async fn team_stats(&self, team_id: i64) -> Result<Option<TeamStats>>;

    /// Insert or overwrite the prediction for `record.match_id`, refreshing
    /// its timestamp. Returns the stored row.
    async fn upsert_prediction(&self, record: &PredictionRecord) -> Result<PredictionRecord>;

    async fn prediction(&self, match_id: i64) -> Result<Option<PredictionRecord>>;

    async fn scheduled_match(&self, match_id: i64) -> Result<Option<ScheduledMatch>>;

    /// Next `limit` fixtures for `team_id`, soonest first.
    async fn upcoming_matches(&self, team_id: i64, limit: usize) -> Result<Vec<UpcomingMatch>>;
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

pub struct PgMatchHistoryStore {
    pool: PgPool,
}

impl PgMatchHistoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl MatchHistoryStore for PgMatchHistoryStore {
    async fn recent_matches(&self, team_id: i64, limit: usize) -> Result<Vec<HistoricalMatch>> {
        let rows = sqlx::query_as::<_, HistoricalMatchRecord>(
            r#"
            SELECT id, team1_id, team2_id, team1_score, team2_score,
                   winner_id, played_at, map_name, event_name
            FROM historical_matches
            WHERE (team1_id = $1 OR team2_id = $1)
              AND played_at < NOW()
            ORDER BY played_at DESC
            LIMIT $2
            "#,
        )
        .bind(team_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(team_id, rows = rows.len(), "fetched recent matches");
        Ok(rows.into_iter().map(HistoricalMatch::from).collect())
    }

    async fn head_to_head_matches(
        &self,
        team1_id: i64,
        team2_id: i64,
        limit: usize,
    ) -> Result<Vec<HistoricalMatch>> {
        let rows = sqlx::query_as::<_, HistoricalMatchRecord>(
            r#"
            SELECT id, team1_id, team2_id, team1_score, team2_score,
                   winner_id, played_at, map_name, event_name
            FROM historical_matches
            WHERE ((team1_id = $1 AND team2_id = $2) OR (team1_id = $2 AND team2_id = $1))
              AND played_at < NOW()
            ORDER BY played_at DESC
            LIMIT $3
            "#,
        )
        .bind(team1_id)
        .bind(team2_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        debug!(team1_id, team2_id, rows = rows.len(), "fetched head-to-head matches");
        Ok(rows.into_iter().map(HistoricalMatch::from).collect())
    }

    async fn map_aggregates(&self, team_id: i64, min_matches: i64) -> Result<Vec<MapAggregate>> {
        let rows = sqlx::query_as::<_, MapAggregateRecord>(
            r#"
            SELECT map_name,
                   COUNT(*) AS total_matches,
                   SUM(CASE WHEN winner_id = $1 THEN 1 ELSE 0 END)::BIGINT AS wins,
                   SUM(CASE WHEN team1_id = $1 THEN team1_score ELSE team2_score END)::BIGINT AS rounds_won,
                   SUM(CASE WHEN team1_id = $1 THEN team2_score ELSE team1_score END)::BIGINT AS rounds_lost
            FROM historical_matches
            WHERE (team1_id = $1 OR team2_id = $1)
              AND map_name IS NOT NULL
            GROUP BY map_name
            HAVING COUNT(*) >= $2
            ORDER BY map_name
            "#,
        )
        .bind(team_id)
        .bind(min_matches)
        .fetch_all(&self.pool)
        .await?;

        debug!(team_id, maps = rows.len(), "fetched map aggregates");
        Ok(rows.into_iter().map(MapAggregate::from).collect())
    }

    async fn team_stats(&self, team_id: i64) -> Result<Option<TeamStats>> {
        let row = sqlx::query_as::<_, TeamStatsRecord>(
            r#"
            SELECT team_id, total_matches, wins, losses, rounds_won, rounds_lost,
                   win_rate, avg_rounds_won
            FROM team_stats
            WHERE team_id = $1
            "#,
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeamStats::from))
    }

    async fn upsert_prediction(&self, record: &PredictionRecord) -> Result<PredictionRecord> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            INSERT INTO predictions
                (match_id, predicted_winner_id, confidence_score,
                 predicted_team1_score, predicted_team2_score, prediction_model, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            ON CONFLICT (match_id) DO UPDATE SET
                predicted_winner_id = EXCLUDED.predicted_winner_id,
                confidence_score = EXCLUDED.confidence_score,
                predicted_team1_score = EXCLUDED.predicted_team1_score,
                predicted_team2_score = EXCLUDED.predicted_team2_score,
                prediction_model = EXCLUDED.prediction_model,
                created_at = NOW()
            RETURNING match_id, predicted_winner_id, confidence_score,
                      predicted_team1_score, predicted_team2_score, prediction_model, created_at
            "#,
        )
        .bind(record.match_id)
        .bind(record.predicted_winner_id)
        .bind(record.confidence_score)
        .bind(record.predicted_team1_score)
        .bind(record.predicted_team2_score)
        .bind(&record.prediction_model)
        .fetch_one(&self.pool)
        .await?;

        Ok(PredictionRecord::from(row))
    }

    async fn prediction(&self, match_id: i64) -> Result<Option<PredictionRecord>> {
        let row = sqlx::query_as::<_, PredictionRow>(
            r#"
            SELECT match_id, predicted_winner_id, confidence_score,
                   predicted_team1_score, predicted_team2_score, prediction_model, created_at
            FROM predictions
            WHERE match_id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PredictionRecord::from))
    }

    async fn scheduled_match(&self, match_id: i64) -> Result<Option<ScheduledMatch>> {
        let row = sqlx::query_as::<_, ScheduledMatchRecord>(
            r#"
            SELECT m.id, m.scheduled_at, m.league_name, m.series_name,
                   m.team1_id, t1.name AS team1_name, t1.image_url AS team1_image,
                   m.team2_id, t2.name AS team2_name, t2.image_url AS team2_image
            FROM matches m
            LEFT JOIN teams t1 ON m.team1_id = t1.id
            LEFT JOIN teams t2 ON m.team2_id = t2.id
            WHERE m.id = $1
            "#,
        )
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ScheduledMatch::from))
    }

    async fn upcoming_matches(&self, team_id: i64, limit: usize) -> Result<Vec<UpcomingMatch>> {
        let rows = sqlx::query_as::<_, UpcomingMatchRecord>(
            r#"
            SELECT m.id, m.scheduled_at, m.league_name,
                   m.team1_id, t1.name AS team1_name, t1.image_url AS team1_image,
                   m.team2_id, t2.name AS team2_name, t2.image_url AS team2_image,
                   p.predicted_team1_score, p.predicted_team2_score, p.confidence_score
            FROM matches m
            LEFT JOIN teams t1 ON m.team1_id = t1.id
            LEFT JOIN teams t2 ON m.team2_id = t2.id
            LEFT JOIN predictions p ON m.id = p.match_id
            WHERE (m.team1_id = $1 OR m.team2_id = $1)
              AND m.scheduled_at > NOW()
            ORDER BY m.scheduled_at ASC
            LIMIT $2
            "#,
        )
        .bind(team_id)
        .bind(sql_limit(limit))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UpcomingMatch::from).collect())
    }
}
