use matchform_db::MatchHistoryStore;
use matchform_models::{round2, MapAggregate, MapStat, Result};
use tracing::debug;

/// Fewest matches on a map before it is reported.
pub const MIN_MAP_MATCHES: i64 = 3;

/// Turn per-map totals into stats, dropping thin samples and ordering by
/// win rate. Equal win rates keep their input order.
pub fn map_stats(aggregates: Vec<MapAggregate>, min_matches: i64) -> Vec<MapStat> {
    let mut ranked: Vec<(f64, MapStat)> = aggregates
        .into_iter()
        .filter(|a| a.total_matches >= min_matches && a.total_matches > 0)
        .map(|a| {
            let total = a.total_matches as f64;
            let ratio = a.wins as f64 / total;
            let stat = MapStat {
                win_rate: round2(ratio * 100.0),
                avg_rounds_won: round2(a.rounds_won as f64 / total),
                avg_rounds_lost: round2(a.rounds_lost as f64 / total),
                losses: a.total_matches - a.wins,
                wins: a.wins,
                total_matches: a.total_matches,
                map_name: a.map_name,
            };
            (ratio, stat)
        })
        .collect();

    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranked.into_iter().map(|(_, stat)| stat).collect()
}

#[derive(Debug, Clone, Copy)]
pub struct MapPerformanceAnalyzer {
    min_matches: i64,
}

impl MapPerformanceAnalyzer {
    /// Thresholds below [`MIN_MAP_MATCHES`] are raised to it.
    pub fn new(min_matches: i64) -> Self {
        Self {
            min_matches: min_matches.max(MIN_MAP_MATCHES),
        }
    }

    pub fn min_matches(&self) -> i64 {
        self.min_matches
    }

    pub async fn compute_map_performance<S: MatchHistoryStore>(
        &self,
        store: &S,
        team_id: i64,
    ) -> Result<Vec<MapStat>> {
        let aggregates = store.map_aggregates(team_id, self.min_matches).await?;
        let stats = map_stats(aggregates, self.min_matches);
        debug!(team_id, maps = stats.len(), "computed map performance");
        Ok(stats)
    }
}

impl Default for MapPerformanceAnalyzer {
    fn default() -> Self {
        Self::new(MIN_MAP_MATCHES)
    }
}
