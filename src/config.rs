use config::{Config, ConfigError, Environment, File};
use matchform_models::{AnalyticsError, Result};
use matchform_services::AnalysisSettings;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub analysis: AnalysisConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub form_window: usize,
    pub h2h_window: usize,
    pub min_map_matches: i64,
    pub overview_window: usize,
    pub upcoming_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub json: bool,
}

impl AppConfig {
    pub fn new() -> Result<Self> {
        let config = Self::load().map_err(|e| AnalyticsError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn load() -> std::result::Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let defaults = AnalysisSettings::default();

        let config = Config::builder()
            .set_default("database.url", "postgresql://localhost:5432/matchform_dev")?
            .set_default("database.max_connections", 5)?
            .set_default("analysis.form_window", defaults.form_window as u64)?
            .set_default("analysis.h2h_window", defaults.h2h_window as u64)?
            .set_default("analysis.min_map_matches", defaults.min_map_matches)?
            .set_default("analysis.overview_window", defaults.overview_window as u64)?
            .set_default("analysis.upcoming_limit", defaults.upcoming_limit as u64)?
            .set_default("logging.json", false)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // MATCHFORM__ANALYSIS__FORM_WINDOW=10 and friends
            .add_source(Environment::with_prefix("MATCHFORM").separator("__"))
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    fn validate(&self) -> Result<()> {
        let windows = [
            ("analysis.form_window", self.analysis.form_window),
            ("analysis.h2h_window", self.analysis.h2h_window),
            ("analysis.overview_window", self.analysis.overview_window),
        ];
        if let Some((key, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(AnalyticsError::Config(format!("{key} must be at least 1")));
        }
        if self.database.max_connections == 0 {
            return Err(AnalyticsError::Config(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn database_url(&self) -> &str {
        &self.database.url
    }

    pub fn analysis_settings(&self) -> AnalysisSettings {
        AnalysisSettings {
            form_window: self.analysis.form_window,
            h2h_window: self.analysis.h2h_window,
            min_map_matches: self.analysis.min_map_matches,
            overview_window: self.analysis.overview_window,
            upcoming_limit: self.analysis.upcoming_limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AppConfig {
        AppConfig {
            database: DatabaseConfig {
                url: "postgresql://localhost/test".to_string(),
                max_connections: 2,
            },
            analysis: AnalysisConfig {
                form_window: 8,
                h2h_window: 3,
                min_map_matches: 4,
                overview_window: 12,
                upcoming_limit: 2,
            },
            logging: LoggingConfig { json: false },
        }
    }

    #[test]
    fn test_analysis_settings_mapping() {
        let config = sample();
        let settings = config.analysis_settings();
        assert_eq!(settings.form_window, 8);
        assert_eq!(settings.h2h_window, 3);
        assert_eq!(settings.min_map_matches, 4);
        assert_eq!(settings.upcoming_limit, 2);
        assert_eq!(config.database_url(), "postgresql://localhost/test");
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = sample();
        config.analysis.h2h_window = 0;

        let err = config.validate().unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(ref msg) if msg.contains("h2h_window")));
        assert!(sample().validate().is_ok());
    }
}
