// Prediction models

use matchform_models::{round2, Prediction, ScorePair, WinProbability};
use tracing::debug;

use crate::features::{MatchupFeatures, TeamFormFeatures};

/// Starting predicted score for each side before adjustments.
pub const BASE_SCORE: f64 = 13.0;
/// Win rate treated as neutral.
pub const WIN_RATE_PIVOT: f64 = 50.0;
/// Win-rate points worth one predicted round.
pub const WIN_RATE_DIVISOR: f64 = 20.0;
pub const RECENT_WIN_WEIGHT: f64 = 0.8;
pub const SCORE_DIFF_WEIGHT: f64 = 0.15;
pub const H2H_WIN_WEIGHT: f64 = 0.5;
pub const MAX_SCORE: u8 = 16;
pub const LOGISTIC_SLOPE: f64 = 0.4;
/// Sample count at which the data factor saturates.
pub const FULL_DATA_SAMPLES: f64 = 15.0;
/// Score gap at which the margin factor saturates.
pub const DECISIVE_SCORE_GAP: f64 = 8.0;
pub const DATA_CONFIDENCE_WEIGHT: f64 = 0.4;
pub const MARGIN_CONFIDENCE_WEIGHT: f64 = 0.6;

pub trait PredictionModel: Send + Sync {
    fn model_name(&self) -> &str;
    fn model_version(&self) -> &str;
    fn predict(&self, features: &MatchupFeatures) -> Prediction;

    /// Tag stored alongside persisted predictions, e.g. `heuristic_v1`.
    fn model_tag(&self) -> String {
        format!("{}_{}", self.model_name(), self.model_version())
    }
}

/// Deterministic, explainable score model over win rate, recent form and
/// head-to-head record.
pub struct HeuristicModel {
    name: String,
    version: String,
}

impl HeuristicModel {
    pub fn new() -> Self {
        Self {
            name: "heuristic".to_string(),
            version: "v1".to_string(),
        }
    }

    fn base_score(own: &TeamFormFeatures, opp: &TeamFormFeatures, own_h2h: u32, opp_h2h: u32) -> f64 {
        BASE_SCORE
            + (own.win_rate - WIN_RATE_PIVOT) / WIN_RATE_DIVISOR
            + (f64::from(own.recent_wins) - f64::from(opp.recent_wins)) * RECENT_WIN_WEIGHT
            + (own.recent_avg_score_diff - opp.recent_avg_score_diff) * SCORE_DIFF_WEIGHT
            + (f64::from(own_h2h) - f64::from(opp_h2h)) * H2H_WIN_WEIGHT
    }

    /// Nearest whole round (ties to even), clamped to the playable range.
    fn to_round_score(base: f64) -> u8 {
        base.round_ties_even().clamp(0.0, f64::from(MAX_SCORE)) as u8
    }

    /// Logistic win probability for team1, as a percentage.
    pub fn win_probability(score_diff: i32) -> WinProbability {
        let p = 1.0 / (1.0 + (-LOGISTIC_SLOPE * f64::from(score_diff)).exp());
        let team1 = round2(p * 100.0);
        WinProbability {
            team1,
            team2: round2(100.0 - team1),
        }
    }

    pub fn confidence(total_samples: usize, score_diff: i32) -> f64 {
        let data_factor = (total_samples as f64 / FULL_DATA_SAMPLES).min(1.0);
        let diff_factor = (f64::from(score_diff.abs()) / DECISIVE_SCORE_GAP).min(1.0);
        round2((DATA_CONFIDENCE_WEIGHT * data_factor + MARGIN_CONFIDENCE_WEIGHT * diff_factor) * 100.0)
    }
}

impl Default for HeuristicModel {
    fn default() -> Self {
        Self::new()
    }
}

impl PredictionModel for HeuristicModel {
    fn model_name(&self) -> &str {
        &self.name
    }

    fn model_version(&self) -> &str {
        &self.version
    }

    fn predict(&self, features: &MatchupFeatures) -> Prediction {
        let base_team1 = Self::base_score(
            &features.team1,
            &features.team2,
            features.h2h_team1_wins,
            features.h2h_team2_wins,
        );
        let base_team2 = Self::base_score(
            &features.team2,
            &features.team1,
            features.h2h_team2_wins,
            features.h2h_team1_wins,
        );

        let mut team1 = Self::to_round_score(base_team1);
        let mut team2 = Self::to_round_score(base_team2);

        // Break a level prediction in favour of the side with more recent wins.
        if team1 == team2 {
            match features.team1.recent_wins.cmp(&features.team2.recent_wins) {
                std::cmp::Ordering::Greater => team1 = (team1 + 1).min(MAX_SCORE),
                std::cmp::Ordering::Less => team2 = (team2 + 1).min(MAX_SCORE),
                std::cmp::Ordering::Equal => {}
            }
        }

        let predicted_score = ScorePair { team1, team2 };
        let score_diff = predicted_score.diff();

        debug!(base_team1, base_team2, team1, team2, "heuristic score prediction");

        Prediction {
            predicted_score,
            win_probability: Self::win_probability(score_diff),
            confidence: Self::confidence(features.total_samples(), score_diff),
        }
    }
}
