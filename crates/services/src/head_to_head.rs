use matchform_db::MatchHistoryStore;
use matchform_models::{
    percentage, round2, AnalyticsError, H2hMatch, H2hWinner, HeadToHeadReport, HistoricalMatch,
    Result,
};
use tracing::{debug, warn};

pub const DEFAULT_H2H_WINDOW: usize = 5;

/// Summarize matches between `team1_id` and `team2_id` from team1's side,
/// whichever slot each team held in the stored record.
pub fn summarize_head_to_head(
    team1_id: i64,
    team2_id: i64,
    matches: &[HistoricalMatch],
) -> HeadToHeadReport {
    let mut team1_wins = 0;
    let mut team2_wins = 0;
    let mut recent_matches = Vec::with_capacity(matches.len());

    for m in matches {
        let (team1_score, team2_score) = m.scores_for(team1_id);

        let winner = if m.is_won_by(team1_id) {
            team1_wins += 1;
            Some(H2hWinner::Team1)
        } else if m.is_won_by(team2_id) {
            team2_wins += 1;
            Some(H2hWinner::Team2)
        } else {
            warn!(match_id = m.id, winner_id = ?m.winner_id, "head-to-head match won by neither team");
            None
        };

        recent_matches.push(H2hMatch {
            match_id: m.id,
            score: format!("{team1_score}-{team2_score}"),
            winner,
            map: m.map_name.clone(),
            event: m.event_name.clone(),
            played_at: m.played_at,
        });
    }

    let total = matches.len();
    HeadToHeadReport {
        total_matches: total,
        team1_wins,
        team2_wins,
        team1_win_rate: round2(percentage(team1_wins as i64, total as i64)),
        team2_win_rate: round2(percentage(team2_wins as i64, total as i64)),
        recent_matches,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeadToHeadAnalyzer;

impl HeadToHeadAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub async fn compute_h2h<S: MatchHistoryStore>(
        &self,
        store: &S,
        team1_id: i64,
        team2_id: i64,
        last_n: usize,
    ) -> Result<HeadToHeadReport> {
        if last_n == 0 {
            return Err(AnalyticsError::InvalidWindow { window: last_n });
        }

        let matches = store.head_to_head_matches(team1_id, team2_id, last_n).await?;
        debug!(team1_id, team2_id, matches = matches.len(), "computed head-to-head");
        Ok(summarize_head_to_head(team1_id, team2_id, &matches))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn played(id: i64, team1_id: i64, team2_id: i64, scores: (i32, i32), winner_id: Option<i64>) -> HistoricalMatch {
        HistoricalMatch {
            id,
            team1_id,
            team2_id,
            team1_score: scores.0,
            team2_score: scores.1,
            winner_id,
            played_at: Utc::now() - Duration::days(id),
            map_name: Some("Ancient".to_string()),
            event_name: Some("IEM Katowice".to_string()),
        }
    }

    #[test]
    fn test_no_shared_history() {
        let report = summarize_head_to_head(1, 2, &[]);
        assert_eq!(report.total_matches, 0);
        assert_eq!(report.team1_win_rate, 0.0);
        assert_eq!(report.team2_win_rate, 0.0);
        assert!(report.recent_matches.is_empty());
    }

    #[test]
    fn test_scores_normalized_to_requested_order() {
        let matches = vec![
            played(1, 2, 1, (16, 12), Some(2)),
            played(2, 1, 2, (16, 9), Some(1)),
            played(3, 2, 1, (11, 16), Some(1)),
        ];
        let report = summarize_head_to_head(1, 2, &matches);

        assert_eq!(report.total_matches, 3);
        assert_eq!(report.team1_wins, 2);
        assert_eq!(report.team2_wins, 1);
        assert_eq!(report.team1_win_rate, 66.67);
        assert_eq!(report.team2_win_rate, 33.33);

        let scores: Vec<_> = report.recent_matches.iter().map(|m| m.score.as_str()).collect();
        assert_eq!(scores, vec!["12-16", "16-9", "16-11"]);
        assert_eq!(report.recent_matches[0].winner, Some(H2hWinner::Team2));
        assert_eq!(report.recent_matches[2].winner, Some(H2hWinner::Team1));
        assert_eq!(report.recent_matches[0].map.as_deref(), Some("Ancient"));
    }

    #[test]
    fn test_foreign_winner_counts_for_nobody() {
        let matches = vec![played(1, 1, 2, (16, 14), Some(1)), played(2, 1, 2, (15, 15), Some(77))];
        let report = summarize_head_to_head(1, 2, &matches);

        assert_eq!(report.total_matches, 2);
        assert_eq!(report.team1_wins + report.team2_wins, 1);
        assert_eq!(report.recent_matches[1].winner, None);
        assert_eq!(report.team1_win_rate, 50.0);
    }
}
