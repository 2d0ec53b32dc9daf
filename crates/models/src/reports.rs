use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matches::{ScheduledMatch, UpcomingMatch};
use crate::predictions::Prediction;

/// Round to two decimal places, the precision every report exposes.
/// Exact halves go to the even neighbour.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// `part / whole * 100`, or 0 when `whole` is zero.
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormResult {
    pub match_id: i64,
    pub won: bool,
    /// Own score first, e.g. `"16-9"`.
    pub score: String,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormReport {
    pub form_score: f64,
    /// Most recent first.
    pub recent_results: Vec<FormResult>,
}

impl FormReport {
    pub fn wins(&self) -> usize {
        self.recent_results.iter().filter(|r| r.won).count()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum H2hWinner {
    Team1,
    Team2,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct H2hMatch {
    pub match_id: i64,
    /// Requested team1's score first.
    pub score: String,
    /// `None` when the recorded winner is neither team.
    pub winner: Option<H2hWinner>,
    pub map: Option<String>,
    pub event: Option<String>,
    pub played_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HeadToHeadReport {
    pub total_matches: usize,
    pub team1_wins: usize,
    pub team2_wins: usize,
    pub team1_win_rate: f64,
    pub team2_win_rate: f64,
    pub recent_matches: Vec<H2hMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapStat {
    pub map_name: String,
    pub total_matches: i64,
    pub wins: i64,
    pub losses: i64,
    pub win_rate: f64,
    pub avg_rounds_won: f64,
    pub avg_rounds_lost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommonMap {
    pub map_name: String,
    pub team1_win_rate: f64,
    pub team2_win_rate: f64,
    pub team1_avg_rounds: f64,
    pub team2_avg_rounds: f64,
}

impl CommonMap {
    pub fn win_rate_gap(&self) -> f64 {
        (self.team1_win_rate - self.team2_win_rate).abs()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapAnalysis {
    pub team1_maps: Vec<MapStat>,
    pub team2_maps: Vec<MapStat>,
    /// Largest win-rate gap first.
    pub common_maps: Vec<CommonMap>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchComparison {
    pub team1_form: FormReport,
    pub team2_form: FormReport,
    pub head_to_head: HeadToHeadReport,
    pub map_analysis: MapAnalysis,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamMaps {
    pub team1: Vec<MapStat>,
    pub team2: Vec<MapStat>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchupReport {
    pub analysis: MatchComparison,
    pub maps: TeamMaps,
    pub prediction: Prediction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchAnalysis {
    #[serde(rename = "match")]
    pub scheduled: ScheduledMatch,
    #[serde(flatten)]
    pub matchup: MatchupReport,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamOverview {
    pub form: FormReport,
    pub maps: Vec<MapStat>,
    pub recent_matches: Vec<FormResult>,
    pub upcoming_matches: Vec<UpcomingMatch>,
}
