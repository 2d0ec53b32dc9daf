use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Win rate assumed for a team with no stored stats.
pub const DEFAULT_WIN_RATE: f64 = 50.0;

/// Which side of a match record a team occupied.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Team1,
    Team2,
}

/// A completed match as persisted by the ingestion layer.
///
/// Records never describe self-play: `team1_id != team2_id`, and when
/// `winner_id` is set it names one of the two participants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoricalMatch {
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

/// A single match viewed from one team's side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamResult {
    pub won: bool,
    pub team_score: i32,
    pub opponent_score: i32,
}

impl TeamResult {
    pub fn score_diff(&self) -> i32 {
        self.team_score - self.opponent_score
    }
}

impl HistoricalMatch {
    pub fn involves(&self, team_id: i64) -> bool {
        self.team1_id == team_id || self.team2_id == team_id
    }

    pub fn is_between(&self, team_a: i64, team_b: i64) -> bool {
        (self.team1_id == team_a && self.team2_id == team_b)
            || (self.team1_id == team_b && self.team2_id == team_a)
    }

    /// Slot of `team_id`; anything that is not team1 is treated as team2.
    pub fn slot_of(&self, team_id: i64) -> Slot {
        if self.team1_id == team_id {
            Slot::Team1
        } else {
            Slot::Team2
        }
    }

    /// Own and opponent score for `team_id`.
    pub fn scores_for(&self, team_id: i64) -> (i32, i32) {
        match self.slot_of(team_id) {
            Slot::Team1 => (self.team1_score, self.team2_score),
            Slot::Team2 => (self.team2_score, self.team1_score),
        }
    }

    pub fn is_won_by(&self, team_id: i64) -> bool {
        self.winner_id == Some(team_id)
    }

    pub fn result_for(&self, team_id: i64) -> TeamResult {
        let (team_score, opponent_score) = self.scores_for(team_id);
        TeamResult {
            won: self.is_won_by(team_id),
            team_score,
            opponent_score,
        }
    }
}

/// Aggregated per-team snapshot maintained by the ingestion layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub team_id: i64,
    pub total_matches: i64,
    pub wins: i64,
    pub losses: i64,
    pub rounds_won: i64,
    pub rounds_lost: i64,
    pub win_rate: Option<f64>,
    pub avg_rounds_won: Option<f64>,
}

impl TeamStats {
    /// Resolve the win rate a consumer should use for an optional snapshot.
    pub fn effective_win_rate(stats: Option<&Self>) -> f64 {
        stats
            .and_then(|s| s.win_rate)
            .unwrap_or(DEFAULT_WIN_RATE)
    }
}

/// Per-map totals for one team, as returned by the store's grouped query.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapAggregate {
    pub map_name: String,
    pub total_matches: i64,
    pub wins: i64,
    pub rounds_won: i64,
    pub rounds_lost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamRef {
    pub id: i64,
    pub name: Option<String>,
    pub image_url: Option<String>,
}

/// A fixture from the schedule, joined with both teams' display data.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledMatch {
    pub id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub team1: TeamRef,
    pub team2: TeamRef,
    pub league_name: Option<String>,
    pub series_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredPredictionSummary {
    pub team1_score: i32,
    pub team2_score: i32,
    pub confidence: f64,
}

/// An upcoming fixture with whatever prediction has been stored for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpcomingMatch {
    pub id: i64,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub league_name: Option<String>,
    pub team1: TeamRef,
    pub team2: TeamRef,
    pub prediction: Option<StoredPredictionSummary>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample_match() -> HistoricalMatch {
        HistoricalMatch {
            id: 1,
            team1_id: 10,
            team2_id: 20,
            team1_score: 16,
            team2_score: 12,
            winner_id: Some(10),
            played_at: Utc::now() - Duration::days(1),
            map_name: Some("Inferno".to_string()),
            event_name: None,
        }
    }

    #[test]
    fn test_scores_follow_slot() {
        let m = sample_match();
        assert_eq!(m.scores_for(10), (16, 12));
        assert_eq!(m.scores_for(20), (12, 16));
        assert_eq!(m.slot_of(20), Slot::Team2);
    }

    #[test]
    fn test_result_for_each_side() {
        let m = sample_match();
        let home = m.result_for(10);
        let away = m.result_for(20);

        assert!(home.won);
        assert_eq!(home.score_diff(), 4);
        assert!(!away.won);
        assert_eq!(away.score_diff(), -4);
    }

    #[test]
    fn test_pair_matching_is_unordered() {
        let m = sample_match();
        assert!(m.is_between(10, 20));
        assert!(m.is_between(20, 10));
        assert!(!m.is_between(10, 30));
        assert!(m.involves(20));
    }

    #[test]
    fn test_win_rate_default() {
        assert_eq!(TeamStats::effective_win_rate(None), DEFAULT_WIN_RATE);

        let stats = TeamStats {
            team_id: 1,
            total_matches: 10,
            wins: 7,
            losses: 3,
            rounds_won: 150,
            rounds_lost: 120,
            win_rate: Some(70.0),
            avg_rounds_won: Some(15.0),
        };
        assert_eq!(TeamStats::effective_win_rate(Some(&stats)), 70.0);

        let unset = TeamStats { win_rate: None, ..stats };
        assert_eq!(TeamStats::effective_win_rate(Some(&unset)), DEFAULT_WIN_RATE);
    }
}
