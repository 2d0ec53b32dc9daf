mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::AppConfig;
use matchform_db::{DatabaseConnection, PgMatchHistoryStore};
use matchform_services::MatchAnalyzer;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "matchform")]
#[command(about = "Team form, head-to-head and map analysis with match predictions", long_about = None)]
struct Cli {
    /// Emit logs as JSON regardless of configuration
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Weighted form score over a team's recent matches
    Form {
        team_id: i64,
        /// Number of recent matches (defaults to the configured window)
        #[arg(long)]
        last: Option<usize>,
    },
    /// Per-map win rates for a team
    Maps { team_id: i64 },
    /// Head-to-head record between two teams
    H2h {
        team1_id: i64,
        team2_id: i64,
        #[arg(long)]
        last: Option<usize>,
    },
    /// Form, head-to-head and map comparison of two teams
    Compare { team1_id: i64, team2_id: i64 },
    /// Predict a score without storing it
    Predict { team1_id: i64, team2_id: i64 },
    /// Predict and store the prediction for a match
    Persist {
        match_id: i64,
        team1_id: i64,
        team2_id: i64,
    },
    /// Form, maps, recent results and upcoming fixtures of a team
    Team { team_id: i64 },
    /// Comparison plus prediction for two teams
    Matchup { team1_id: i64, team2_id: i64 },
    /// Full report for a scheduled match; stores its prediction
    AnalyzeMatch { match_id: i64 },
}

fn init_tracing(json: bool) {
    // Reports go to stdout, so logs stay on stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchform=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = AppConfig::new()?;
    init_tracing(cli.json_logs || config.logging.json);

    info!("✅ Configuration loaded");

    let db = DatabaseConnection::new(config.database_url(), config.database.max_connections).await?;
    info!("📊 Connected to database");

    if matches!(cli.command, Commands::Migrate) {
        db.run_migrations().await?;
        return Ok(());
    }

    let store = PgMatchHistoryStore::new(db.pool().clone());
    let settings = config.analysis_settings();
    let analyzer = MatchAnalyzer::new(settings);

    match cli.command {
        Commands::Migrate => {}
        Commands::Form { team_id, last } => {
            let window = last.unwrap_or(settings.form_window);
            print_json(&analyzer.form_scorer().compute_form(&store, team_id, window).await?)?;
        }
        Commands::Maps { team_id } => {
            print_json(&analyzer.map_performance().compute_map_performance(&store, team_id).await?)?;
        }
        Commands::H2h { team1_id, team2_id, last } => {
            let window = last.unwrap_or(settings.h2h_window);
            let report = analyzer
                .head_to_head()
                .compute_h2h(&store, team1_id, team2_id, window)
                .await?;
            print_json(&report)?;
        }
        Commands::Compare { team1_id, team2_id } => {
            print_json(&analyzer.compare_teams(&store, team1_id, team2_id).await?)?;
        }
        Commands::Predict { team1_id, team2_id } => {
            print_json(&analyzer.predictor().predict(&store, team1_id, team2_id).await?)?;
        }
        Commands::Persist { match_id, team1_id, team2_id } => {
            let record = analyzer
                .predictor()
                .persist_prediction(&store, match_id, team1_id, team2_id)
                .await?;
            print_json(&record)?;
        }
        Commands::Team { team_id } => {
            print_json(&analyzer.team_overview(&store, team_id).await?)?;
        }
        Commands::Matchup { team1_id, team2_id } => {
            print_json(&analyzer.matchup_report(&store, team1_id, team2_id).await?)?;
        }
        Commands::AnalyzeMatch { match_id } => {
            print_json(&analyzer.analyze_match(&store, match_id).await?)?;
        }
    }

    Ok(())
}
