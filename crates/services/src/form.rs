use matchform_db::MatchHistoryStore;
use matchform_models::{round2, AnalyticsError, FormReport, FormResult, HistoricalMatch, Result};
use tracing::debug;

pub const DEFAULT_FORM_WINDOW: usize = 5;
/// Extra weight per older match still to come; the newest match weighs most.
pub const FORM_RECENCY_STEP: f64 = 0.2;
pub const FORM_WIN_POINTS: f64 = 20.0;
/// Cap on the margin bonus a win can add (bonus is `2 * score_diff`).
pub const FORM_MARGIN_BONUS_CAP: i32 = 10;
pub const FORM_LOSS_POINTS: f64 = 10.0;
/// A loss costs `FORM_LOSS_POINTS - min(|score_diff|, cap)`.
pub const FORM_LOSS_MARGIN_CAP: u32 = 5;

/// Weight of the match at `index` (0 = newest) in a window of `count`.
pub fn recency_weight(index: usize, count: usize) -> f64 {
    let older = count.saturating_sub(index + 1);
    1.0 + FORM_RECENCY_STEP * older as f64
}

fn match_points(won: bool, score_diff: i32) -> f64 {
    if won {
        FORM_WIN_POINTS + f64::from(score_diff.saturating_mul(2).min(FORM_MARGIN_BONUS_CAP))
    } else {
        -(FORM_LOSS_POINTS - f64::from(score_diff.unsigned_abs().min(FORM_LOSS_MARGIN_CAP)))
    }
}

/// Score `team_id`'s form over `matches`, which must be newest first.
///
/// The raw weighted sum is rescaled against the best and worst sums
/// reachable with the same weights, then clamped to [0, 100].
pub fn score_form(team_id: i64, matches: &[HistoricalMatch]) -> FormReport {
    let count = matches.len();
    let mut raw = 0.0;
    let mut best = 0.0;
    let mut worst = 0.0;
    let mut recent_results = Vec::with_capacity(count);

    for (index, m) in matches.iter().enumerate() {
        let weight = recency_weight(index, count);
        let result = m.result_for(team_id);

        raw += match_points(result.won, result.score_diff()) * weight;
        best += (FORM_WIN_POINTS + f64::from(FORM_MARGIN_BONUS_CAP)) * weight;
        worst -= FORM_LOSS_POINTS * weight;

        recent_results.push(FormResult {
            match_id: m.id,
            won: result.won,
            score: format!("{}-{}", result.team_score, result.opponent_score),
            played_at: m.played_at,
        });
    }

    let span = best - worst;
    let form_score = if span > 0.0 {
        ((raw - worst) / span * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    FormReport {
        form_score: round2(form_score),
        recent_results,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FormScorer;

impl FormScorer {
    pub fn new() -> Self {
        Self
    }

    pub async fn compute_form<S: MatchHistoryStore>(
        &self,
        store: &S,
        team_id: i64,
        last_n: usize,
    ) -> Result<FormReport> {
        if last_n == 0 {
            return Err(AnalyticsError::InvalidWindow { window: last_n });
        }

        let matches = store.recent_matches(team_id, last_n).await?;
        let report = score_form(team_id, &matches);
        debug!(team_id, matches = matches.len(), form_score = report.form_score, "computed form");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    const TEAM: i64 = 1;

    /// A match for TEAM against team 2; `own`/`opp` are TEAM's and the opponent's scores.
    fn result(id: i64, own: i32, opp: i32, team_is_team1: bool) -> HistoricalMatch {
        let (team1_id, team2_id, team1_score, team2_score) = if team_is_team1 {
            (TEAM, 2, own, opp)
        } else {
            (2, TEAM, opp, own)
        };
        HistoricalMatch {
            id,
            team1_id,
            team2_id,
            team1_score,
            team2_score,
            winner_id: Some(if own > opp { TEAM } else { 2 }),
            played_at: Utc::now() - Duration::days(id),
            map_name: None,
            event_name: None,
        }
    }

    #[test]
    fn test_weights_decay_into_the_past() {
        assert!((recency_weight(0, 5) - 1.8).abs() < 1e-9);
        assert!((recency_weight(2, 5) - 1.4).abs() < 1e-9);
        assert!((recency_weight(4, 5) - 1.0).abs() < 1e-9);
        assert!((recency_weight(0, 1) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_history_scores_zero() {
        let report = score_form(TEAM, &[]);
        assert_eq!(report.form_score, 0.0);
        assert!(report.recent_results.is_empty());
    }

    #[test]
    fn test_mostly_winning_form() {
        let matches = vec![
            result(1, 16, 5, true),
            result(2, 16, 10, false),
            result(3, 3, 16, true),
            result(4, 16, 14, false),
            result(5, 8, 16, true),
        ];
        let report = score_form(TEAM, &matches);

        // raw 118.8 rescaled over [-70, 210]
        assert_eq!(report.form_score, 67.43);
        assert!(report.form_score > 50.0);
        assert_eq!(report.wins(), 3);
    }

    #[test]
    fn test_results_keep_order_and_own_perspective() {
        let matches = vec![result(1, 16, 12, false), result(2, 7, 16, true)];
        let report = score_form(TEAM, &matches);

        let ids: Vec<_> = report.recent_results.iter().map(|r| r.match_id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(report.recent_results[0].score, "16-12");
        assert!(report.recent_results[0].won);
        assert_eq!(report.recent_results[1].score, "7-16");
        assert!(!report.recent_results[1].won);
    }

    #[test]
    fn test_perfect_and_worst_runs_hit_the_bounds() {
        let dominant: Vec<_> = (1..=5).map(|id| result(id, 16, 0, true)).collect();
        assert_eq!(score_form(TEAM, &dominant).form_score, 100.0);

        // Only zero-margin losses take the full penalty.
        let level_losses: Vec<_> = (1..=5).map(|id| result(id, 15, 15, true)).collect();
        assert_eq!(score_form(TEAM, &level_losses).form_score, 0.0);
    }

    #[test]
    fn test_loss_penalty_shrinks_with_margin() {
        // Single match: best 30, worst -10.
        let narrow = score_form(TEAM, &[result(1, 14, 16, true)]);
        assert_eq!(narrow.form_score, 5.0);

        let five_down = score_form(TEAM, &[result(1, 11, 16, true)]);
        let blowout = score_form(TEAM, &[result(1, 0, 16, true)]);
        assert_eq!(five_down.form_score, 12.5);
        assert_eq!(blowout.form_score, five_down.form_score);
    }
}
