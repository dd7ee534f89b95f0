use std::env;

use crate::report::SheetSelector;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    /// Sheet read from each report unless overridden on the command line
    pub report_sheet: SheetSelector,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Config {
            database_url: env::var("DATABASE_URL")?,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            report_sheet: env::var("REPORT_SHEET")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        })
    }
}
