// Prediction service

use matchform_db::MatchHistoryStore;
use matchform_ml::{FeatureEngineer, HeuristicModel, MatchupHistory, PredictionModel};
use matchform_models::{Prediction, PredictionRecord, Result};
use tracing::{debug, info};

/// Recent matches per team fed to the model.
pub const PREDICTION_FORM_WINDOW: usize = 5;
/// Head-to-head matches fed to the model.
pub const PREDICTION_H2H_WINDOW: usize = 5;

pub struct PredictionEngine<M: PredictionModel = HeuristicModel> {
    model: M,
    features: FeatureEngineer,
}

impl PredictionEngine<HeuristicModel> {
    pub fn new() -> Self {
        Self::with_model(HeuristicModel::new())
    }
}

impl Default for PredictionEngine<HeuristicModel> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: PredictionModel> PredictionEngine<M> {
    pub fn with_model(model: M) -> Self {
        Self {
            model,
            features: FeatureEngineer::new(),
        }
    }

    /// Predict a match between the two teams. Missing stats or history fall
    /// back to neutral inputs; only store failures are returned as errors.
    pub async fn predict<S: MatchHistoryStore>(
        &self,
        store: &S,
        team1_id: i64,
        team2_id: i64,
    ) -> Result<Prediction> {
        let team1_stats = store.team_stats(team1_id).await?;
        let team2_stats = store.team_stats(team2_id).await?;
        let team1_recent = store.recent_matches(team1_id, PREDICTION_FORM_WINDOW).await?;
        let team2_recent = store.recent_matches(team2_id, PREDICTION_FORM_WINDOW).await?;
        let head_to_head = store
            .head_to_head_matches(team1_id, team2_id, PREDICTION_H2H_WINDOW)
            .await?;

        let features = self.features.extract_features(&MatchupHistory {
            team1_id,
            team2_id,
            team1_stats: team1_stats.as_ref(),
            team2_stats: team2_stats.as_ref(),
            team1_recent: &team1_recent,
            team2_recent: &team2_recent,
            head_to_head: &head_to_head,
        });
        debug!(team1_id, team2_id, samples = features.total_samples(), "extracted prediction features");

        Ok(self.model.predict(&features))
    }

    /// Predict and upsert the result as the match's single stored prediction.
    pub async fn persist_prediction<S: MatchHistoryStore>(
        &self,
        store: &S,
        match_id: i64,
        team1_id: i64,
        team2_id: i64,
    ) -> Result<PredictionRecord> {
        let prediction = self.predict(store, team1_id, team2_id).await?;
        self.save_prediction(store, match_id, team1_id, team2_id, &prediction)
            .await
    }

    /// Upsert an already computed prediction for `match_id`.
    pub async fn save_prediction<S: MatchHistoryStore>(
        &self,
        store: &S,
        match_id: i64,
        team1_id: i64,
        team2_id: i64,
        prediction: &Prediction,
    ) -> Result<PredictionRecord> {
        let record = PredictionRecord::from_prediction(
            match_id,
            team1_id,
            team2_id,
            prediction,
            &self.model.model_tag(),
        );
        let stored = store.upsert_prediction(&record).await?;

        info!(
            "🎯 Stored prediction for match {}: {}-{} ({:.2}% confidence)",
            match_id,
            stored.predicted_team1_score,
            stored.predicted_team2_score,
            stored.confidence_score
        );
        Ok(stored)
    }
}
