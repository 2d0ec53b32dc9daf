// Feature engineering

use matchform_models::{HistoricalMatch, TeamResult, TeamStats};
use serde::{Deserialize, Serialize};

/// What the predictor knows about one side of a matchup.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct TeamFormFeatures {
    pub win_rate: f64,
    pub recent_wins: u32,
    /// Mean own-minus-opponent score over the recent window, 0 with no samples.
    pub recent_avg_score_diff: f64,
    pub recent_samples: usize,
}

impl TeamFormFeatures {
    pub fn from_results(win_rate: f64, results: &[TeamResult]) -> Self {
        let recent_wins = results.iter().filter(|r| r.won).count() as u32;
        let recent_avg_score_diff = if results.is_empty() {
            0.0
        } else {
            let total: i32 = results.iter().map(TeamResult::score_diff).sum();
            f64::from(total) / results.len() as f64
        };

        Self {
            win_rate,
            recent_wins,
            recent_avg_score_diff,
            recent_samples: results.len(),
        }
    }
}

/// Inputs of a single two-team prediction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MatchupFeatures {
    pub team1: TeamFormFeatures,
    pub team2: TeamFormFeatures,
    pub h2h_team1_wins: u32,
    pub h2h_team2_wins: u32,
    pub h2h_samples: usize,
}

impl MatchupFeatures {
    pub fn total_samples(&self) -> usize {
        self.team1.recent_samples + self.team2.recent_samples + self.h2h_samples
    }
}

/// Raw store data for one matchup, before feature extraction.
#[derive(Debug, Clone, Copy)]
pub struct MatchupHistory<'a> {
    pub team1_id: i64,
    pub team2_id: i64,
    pub team1_stats: Option<&'a TeamStats>,
    pub team2_stats: Option<&'a TeamStats>,
    pub team1_recent: &'a [HistoricalMatch],
    pub team2_recent: &'a [HistoricalMatch],
    pub head_to_head: &'a [HistoricalMatch],
}

pub struct FeatureEngineer;

impl FeatureEngineer {
    pub fn new() -> Self {
        Self
    }

    pub fn extract_features(&self, history: &MatchupHistory<'_>) -> MatchupFeatures {
        let team1 = Self::team_features(history.team1_id, history.team1_stats, history.team1_recent);
        let team2 = Self::team_features(history.team2_id, history.team2_stats, history.team2_recent);

        let h2h_team1_wins = history
            .head_to_head
            .iter()
            .filter(|m| m.is_won_by(history.team1_id))
            .count() as u32;
        let h2h_team2_wins = history
            .head_to_head
            .iter()
            .filter(|m| m.is_won_by(history.team2_id))
            .count() as u32;

        MatchupFeatures {
            team1,
            team2,
            h2h_team1_wins,
            h2h_team2_wins,
            h2h_samples: history.head_to_head.len(),
        }
    }

    fn team_features(
        team_id: i64,
        stats: Option<&TeamStats>,
        recent: &[HistoricalMatch],
    ) -> TeamFormFeatures {
        let results: Vec<TeamResult> = recent.iter().map(|m| m.result_for(team_id)).collect();
        TeamFormFeatures::from_results(TeamStats::effective_win_rate(stats), &results)
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self::new()
    }
}
