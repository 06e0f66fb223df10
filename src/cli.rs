use crate::database_factory::StoreConfig;
use crate::error::Result;
use crate::session_queue::QuizMode;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_CATALOG_PATH: &str = "data/flags.json";
pub const DEFAULT_TIME_LIMIT_SECS: u64 = 60;

/// Flag quiz with spaced repetition
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(name = "Flag Practice")]
#[command(about = "Learn the world's flags with spaced repetition", long_about = None)]
#[command(version)]
pub struct Args {
    /// Use in-memory database for testing
    #[arg(long, help = "Use in-memory database for testing")]
    pub test: bool,

    #[arg(long, value_name = "PATH", help = "Use custom database file path")]
    pub db_path: Option<PathBuf>,

    #[arg(
        long,
        value_name = "DATE",
        help = "Override current date (YYYY-MM-DD format)"
    )]
    pub override_date: Option<String>,

    #[arg(long, value_name = "PATH", default_value = DEFAULT_CATALOG_PATH)]
    pub catalog: PathBuf,

    /// endless, timed, practice, hard or category
    #[arg(long, default_value = "practice")]
    pub mode: String,

    /// Category for category mode, e.g. "Europe"
    #[arg(long)]
    pub category: Option<String>,

    /// Session length in seconds for timed mode
    #[arg(long, value_name = "SECONDS", default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    pub time_limit: u64,

    /// Seed for reproducible question order
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, help = "Disable colored output")]
    pub no_color: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Args::parse()
    }

    /// Validate the override_date argument if provided
    pub fn validate_override_date(&self) -> std::result::Result<Option<NaiveDate>, String> {
        match &self.override_date {
            Some(date_str) => NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
                .map(Some)
                .map_err(|_| {
                    format!(
                        "Invalid date format for --override-date: '{}'. Expected YYYY-MM-DD",
                        date_str
                    )
                }),
            None => Ok(None),
        }
    }

    pub fn quiz_mode(&self) -> Result<QuizMode> {
        QuizMode::from_parts(&self.mode, self.category.as_deref())
    }

    pub fn store_config(&self) -> std::result::Result<StoreConfig, String> {
        let mut builder = StoreConfig::builder().override_date(self.validate_override_date()?);
        if self.test {
            builder = builder.test_mode();
        }
        if let Some(path) = &self.db_path {
            builder = builder.path(path.to_string_lossy());
        }
        Ok(builder.build())
    }
}
