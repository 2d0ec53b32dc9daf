use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Predicted round score for both sides.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScorePair {
    pub team1: u8,
    pub team2: u8,
}

impl ScorePair {
    pub fn diff(&self) -> i32 {
        i32::from(self.team1) - i32::from(self.team2)
    }
}

/// Win probabilities as percentages; the two sides sum to 100.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WinProbability {
    pub team1: f64,
    pub team2: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Prediction {
    pub predicted_score: ScorePair,
    pub win_probability: WinProbability,
    /// Heuristic confidence in [0, 100].
    pub confidence: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PredictedOutcome {
    Team1Win,
    Even,
    Team2Win,
}

impl Prediction {
    pub fn most_likely_outcome(&self) -> PredictedOutcome {
        let p = self.win_probability;
        if p.team1 > p.team2 {
            PredictedOutcome::Team1Win
        } else if p.team2 > p.team1 {
            PredictedOutcome::Team2Win
        } else {
            PredictedOutcome::Even
        }
    }

    /// Team1 only when strictly favoured; an even prediction goes to team2.
    pub fn predicted_winner(&self, team1_id: i64, team2_id: i64) -> i64 {
        match self.most_likely_outcome() {
            PredictedOutcome::Team1Win => team1_id,
            PredictedOutcome::Team2Win | PredictedOutcome::Even => team2_id,
        }
    }
}

/// The stored form of a prediction, one row per match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionRecord {
    pub match_id: i64,
    pub predicted_winner_id: Option<i64>,
    pub confidence_score: f64,
    pub predicted_team1_score: i32,
    pub predicted_team2_score: i32,
    pub prediction_model: String,
    pub created_at: DateTime<Utc>,
}

impl PredictionRecord {
    pub fn from_prediction(
        match_id: i64,
        team1_id: i64,
        team2_id: i64,
        prediction: &Prediction,
        model_tag: &str,
    ) -> Self {
        Self {
            match_id,
            predicted_winner_id: Some(prediction.predicted_winner(team1_id, team2_id)),
            confidence_score: prediction.confidence,
            predicted_team1_score: i32::from(prediction.predicted_score.team1),
            predicted_team2_score: i32::from(prediction.predicted_score.team2),
            prediction_model: model_tag.to_string(),
            created_at: Utc::now(),
        }
    }

    /// True when every prediction field matches, ignoring `created_at`.
    pub fn same_prediction(&self, other: &Self) -> bool {
        self.match_id == other.match_id
            && self.predicted_winner_id == other.predicted_winner_id
            && self.confidence_score == other.confidence_score
            && self.predicted_team1_score == other.predicted_team1_score
            && self.predicted_team2_score == other.predicted_team2_score
            && self.prediction_model == other.prediction_model
    }
}
