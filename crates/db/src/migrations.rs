// Migration utilities and helpers

use sqlx::migrate::Migrator;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub const ANALYSIS_TABLES: &str = include_str!("../../../migrations/001_create_analysis_tables.sql");

pub fn get_migrations() -> Vec<(&'static str, &'static str)> {
    vec![
        ("001", ANALYSIS_TABLES),
    ]
}
