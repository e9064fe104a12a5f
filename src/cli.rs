use crate::error::{AgroSmartError, Result};
use crate::logic::MAX_CALENDAR_DAYS;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "agrosmart",
    version,
    about = "Soil fertility scoring and planting-window forecasts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config.yaml
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Re-run interactive setup
    Init,
    /// Validate config and test connections
    Check,
    /// Score a soil sample and print the advisory
    Score(ScoreArgs),
    /// Show the planting-window calendar for a region
    Window(WindowArgs),
    /// List known regions
    Regions,
}

#[derive(Args)]
pub struct ScoreArgs {
    /// Soil acidity (pH, 0-14)
    #[arg(long)]
    pub ph: f64,

    /// Organic matter, percent
    #[arg(long)]
    pub organic: f64,

    /// Volumetric moisture, percent
    #[arg(long)]
    pub moisture: f64,

    /// Nitrogen, mg/kg
    #[arg(long)]
    pub nitrogen: f64,

    /// Phosphorus, mg/kg
    #[arg(long)]
    pub phosphorus: f64,

    /// Potassium, mg/kg
    #[arg(long)]
    pub potassium: f64,

    /// Region to attach to the stored submission
    #[arg(long)]
    pub region: Option<String>,

    /// User identifier to attach to the stored submission
    #[arg(long)]
    pub user_id: Option<String>,

    /// Record the submission in the local database
    #[arg(long)]
    pub save: bool,

    /// Print the JSON response instead of the summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct WindowArgs {
    /// Region id or name (see `agrosmart regions`)
    #[arg(long)]
    pub region: Option<String>,

    /// Calendar length in days (padded to a week, at most 366)
    #[arg(long)]
    pub days: Option<u32>,

    /// Print the JSON response instead of the summary
    #[arg(long)]
    pub json: bool,
}

impl WindowArgs {
    /// Resolve the requested span against the configured default. Bounded
    /// here so an implausible value never reaches the calendar engine,
    /// whether it came from the flag or from config.yaml.
    pub fn effective_days(&self, default_days: u32) -> Result<u32> {
        let days = self.days.unwrap_or(default_days);
        if days > MAX_CALENDAR_DAYS {
            return Err(AgroSmartError::Validation(format!(
                "A planting window of {} days is out of range (maximum {})",
                days, MAX_CALENDAR_DAYS
            )));
        }
        Ok(days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window_args(days: Option<u32>) -> WindowArgs {
        WindowArgs {
            region: None,
            days,
            json: false,
        }
    }

    #[test]
    fn window_days_fall_back_to_the_configured_default() {
        assert_eq!(window_args(None).effective_days(10).unwrap(), 10);
        assert_eq!(window_args(Some(30)).effective_days(10).unwrap(), 30);
    }

    #[test]
    fn oversized_window_requests_are_rejected_before_the_engine() {
        let err = window_args(Some(4_000_000_000))
            .effective_days(7)
            .unwrap_err();
        assert!(matches!(err, AgroSmartError::Validation(_)));

        assert!(window_args(Some(MAX_CALENDAR_DAYS + 1))
            .effective_days(7)
            .is_err());
        assert_eq!(
            window_args(Some(MAX_CALENDAR_DAYS))
                .effective_days(7)
                .unwrap(),
            MAX_CALENDAR_DAYS
        );
    }

    #[test]
    fn oversized_configured_default_is_rejected_too() {
        assert!(window_args(None).effective_days(4_000_000_000).is_err());
    }
}
