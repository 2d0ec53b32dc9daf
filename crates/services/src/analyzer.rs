use std::collections::HashMap;

use matchform_db::MatchHistoryStore;
use matchform_ml::{HeuristicModel, PredictionModel};
use matchform_models::{
    AnalyticsError, CommonMap, MapAnalysis, MapStat, MatchAnalysis, MatchComparison,
    MatchupReport, Result, TeamMaps, TeamOverview,
};
use tracing::info;

use crate::form::{FormScorer, DEFAULT_FORM_WINDOW};
use crate::head_to_head::{HeadToHeadAnalyzer, DEFAULT_H2H_WINDOW};
use crate::map_performance::{MapPerformanceAnalyzer, MIN_MAP_MATCHES};
use crate::predictor::PredictionEngine;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisSettings {
    pub form_window: usize,
    pub h2h_window: usize,
    pub min_map_matches: i64,
    /// Results listed in a team overview.
    pub overview_window: usize,
    pub upcoming_limit: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            form_window: DEFAULT_FORM_WINDOW,
            h2h_window: DEFAULT_H2H_WINDOW,
            min_map_matches: MIN_MAP_MATCHES,
            overview_window: 10,
            upcoming_limit: 5,
        }
    }
}

/// Maps both teams have enough data on, most lopsided first.
pub fn common_maps(team1_maps: &[MapStat], team2_maps: &[MapStat]) -> Vec<CommonMap> {
    let team2_by_name: HashMap<&str, &MapStat> =
        team2_maps.iter().map(|m| (m.map_name.as_str(), m)).collect();

    let mut shared: Vec<CommonMap> = team1_maps
        .iter()
        .filter_map(|t1| {
            team2_by_name.get(t1.map_name.as_str()).map(|t2| CommonMap {
                map_name: t1.map_name.clone(),
                team1_win_rate: t1.win_rate,
                team2_win_rate: t2.win_rate,
                team1_avg_rounds: t1.avg_rounds_won,
                team2_avg_rounds: t2.avg_rounds_won,
            })
        })
        .collect();

    shared.sort_by(|a, b| b.win_rate_gap().total_cmp(&a.win_rate_gap()));
    shared
}

pub struct MatchAnalyzer<M: PredictionModel = HeuristicModel> {
    settings: AnalysisSettings,
    form: FormScorer,
    head_to_head: HeadToHeadAnalyzer,
    maps: MapPerformanceAnalyzer,
    predictor: PredictionEngine<M>,
}

impl MatchAnalyzer<HeuristicModel> {
    pub fn new(settings: AnalysisSettings) -> Self {
        Self::with_predictor(settings, PredictionEngine::new())
    }
}

impl Default for MatchAnalyzer<HeuristicModel> {
    fn default() -> Self {
        Self::new(AnalysisSettings::default())
    }
}

impl<M: PredictionModel> MatchAnalyzer<M> {
    pub fn with_predictor(settings: AnalysisSettings, predictor: PredictionEngine<M>) -> Self {
        Self {
            settings,
            form: FormScorer::new(),
            head_to_head: HeadToHeadAnalyzer::new(),
            maps: MapPerformanceAnalyzer::new(settings.min_map_matches),
            predictor,
        }
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    pub fn form_scorer(&self) -> &FormScorer {
        &self.form
    }

    pub fn head_to_head(&self) -> &HeadToHeadAnalyzer {
        &self.head_to_head
    }

    pub fn map_performance(&self) -> &MapPerformanceAnalyzer {
        &self.maps
    }

    pub fn predictor(&self) -> &PredictionEngine<M> {
        &self.predictor
    }

    pub async fn compare_teams<S: MatchHistoryStore>(
        &self,
        store: &S,
        team1_id: i64,
        team2_id: i64,
    ) -> Result<MatchComparison> {
        let team1_form = self.form.compute_form(store, team1_id, self.settings.form_window).await?;
        let team2_form = self.form.compute_form(store, team2_id, self.settings.form_window).await?;
        let head_to_head = self
            .head_to_head
            .compute_h2h(store, team1_id, team2_id, self.settings.h2h_window)
            .await?;
        let team1_maps = self.maps.compute_map_performance(store, team1_id).await?;
        let team2_maps = self.maps.compute_map_performance(store, team2_id).await?;

        let common_maps = common_maps(&team1_maps, &team2_maps);

        Ok(MatchComparison {
            team1_form,
            team2_form,
            head_to_head,
            map_analysis: MapAnalysis {
                team1_maps,
                team2_maps,
                common_maps,
            },
        })
    }

    /// Comparison plus prediction for two teams; nothing is stored.
    pub async fn matchup_report<S: MatchHistoryStore>(
        &self,
        store: &S,
        team1_id: i64,
        team2_id: i64,
    ) -> Result<MatchupReport> {
        let analysis = self.compare_teams(store, team1_id, team2_id).await?;
        let prediction = self.predictor.predict(store, team1_id, team2_id).await?;
        let maps = TeamMaps {
            team1: analysis.map_analysis.team1_maps.clone(),
            team2: analysis.map_analysis.team2_maps.clone(),
        };

        Ok(MatchupReport {
            analysis,
            maps,
            prediction,
        })
    }

    /// Full report for a scheduled match. Stores the prediction it contains.
    pub async fn analyze_match<S: MatchHistoryStore>(
        &self,
        store: &S,
        match_id: i64,
    ) -> Result<MatchAnalysis> {
        let scheduled = store
            .scheduled_match(match_id)
            .await?
            .ok_or(AnalyticsError::MatchNotFound { match_id })?;
        let (team1_id, team2_id) = (scheduled.team1.id, scheduled.team2.id);

        let matchup = self.matchup_report(store, team1_id, team2_id).await?;
        self.predictor
            .save_prediction(store, match_id, team1_id, team2_id, &matchup.prediction)
            .await?;

        info!("📊 Analyzed match {} ({} vs {})", match_id, team1_id, team2_id);
        Ok(MatchAnalysis { scheduled, matchup })
    }

    pub async fn team_overview<S: MatchHistoryStore>(
        &self,
        store: &S,
        team_id: i64,
    ) -> Result<TeamOverview> {
        let form = self.form.compute_form(store, team_id, self.settings.form_window).await?;
        let maps = self.maps.compute_map_performance(store, team_id).await?;
        let recent_matches = self
            .form
            .compute_form(store, team_id, self.settings.overview_window)
            .await?
            .recent_results;
        let upcoming_matches = store
            .upcoming_matches(team_id, self.settings.upcoming_limit)
            .await?;

        Ok(TeamOverview {
            form,
            maps,
            recent_matches,
            upcoming_matches,
        })
    }
}
