mod cli;
mod config;
mod datasources;
mod db;
mod error;
mod logic;
mod models;

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands, ScoreArgs, WindowArgs};
use config::Config;
use datasources::OpenWeatherMapClient;
use db::Database;
use error::{AgroSmartError, Result};
use logic::{build_calendar, FavorabilityCriteria, SoilScorer};
use models::{Region, ScoreBreakdown, SoilSample, SoilSubmission, WindowReport};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let mut cli = Cli::parse();

    // Initialize logging; RUST_LOG takes priority over -v
    let default_filter = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    match cli.command.take() {
        Some(Commands::Init) => {
            Config::setup_interactive()?;
            Ok(())
        }
        Some(Commands::Check) => run_check(&cli).await,
        Some(Commands::Score(args)) => run_score(&cli, args),
        Some(Commands::Window(args)) => run_window(&cli, args).await,
        Some(Commands::Regions) => {
            run_regions();
            Ok(())
        }
        None => {
            // No config yet means a first run: go straight to setup
            if Config::exists(cli.config.as_ref()) {
                Cli::command().print_help()?;
                println!();
            } else {
                Config::setup_interactive()?;
            }
            Ok(())
        }
    }
}

async fn run_check(cli: &Cli) -> Result<()> {
    let config = Config::load(cli.config.clone())?;
    println!(
        "Config OK (default region: {}, days: {})",
        config.advisory.default_region, config.advisory.default_days
    );

    let db = Database::open(cli.data_dir.as_ref())?;
    let count = db.soil_submission_count()?;
    println!("Database OK at {} ({} submissions)", db.path().display(), count);
    if count > 0 {
        println!("Latest submissions:");
        for sub in db.recent_soil_submissions(3)? {
            println!(
                "  {}  total {:>3} ({})  region {}",
                sub.submitted_at.format("%Y-%m-%d %H:%M"),
                sub.total,
                sub.tier,
                sub.region.as_deref().unwrap_or("-"),
            );
        }
    }

    match &config.openweathermap {
        Some(owm) if owm.enabled => {
            // Test against the default region if it is forecastable, else any district
            let coords = Region::find(&config.advisory.default_region)
                .and_then(|r| r.coords)
                .or_else(|| Region::forecast_districts().next().and_then(|r| r.coords));

            match coords {
                Some(coords) => {
                    let client = OpenWeatherMapClient::new(owm.clone());
                    if client.test_connection(&coords).await? {
                        println!("OpenWeatherMap OK");
                    } else {
                        println!("OpenWeatherMap FAILED (check the API key)");
                    }
                }
                None => println!("OpenWeatherMap configured but no forecastable region found"),
            }
        }
        Some(_) => println!("OpenWeatherMap disabled"),
        None => println!("OpenWeatherMap not configured (window forecasts unavailable)"),
    }

    Ok(())
}

fn run_score(cli: &Cli, args: ScoreArgs) -> Result<()> {
    let sample = SoilSample {
        ph: args.ph,
        organic_matter_percent: args.organic,
        moisture_percent: args.moisture,
        nitrogen: args.nitrogen,
        phosphorus: args.phosphorus,
        potassium: args.potassium,
    };
    sample.validate()?;

    let scorer = SoilScorer::new();
    let result = scorer.score(&sample);

    if args.save {
        // Fire-and-forget: a failed write never blocks the advisory
        let submission = SoilSubmission::new(
            sample,
            &result,
            scorer.calibration().version,
            args.user_id,
            args.region,
        );
        let saved = Database::open(cli.data_dir.as_ref())
            .and_then(|db| db.record_soil_submission(&submission));
        if let Err(e) = saved {
            tracing::warn!("Failed to record soil submission: {}", e);
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_score_summary(&result);
    }

    Ok(())
}

fn print_score_summary(result: &ScoreBreakdown) {
    println!("Soil fertility: {}/100 ({})", result.total, result.tier);
    println!();
    println!("  pH          {:>3}", result.breakdown.ph);
    println!("  Organic     {:>3}", result.breakdown.organic);
    println!("  Moisture    {:>3}", result.breakdown.moisture);
    println!("  Nitrogen    {:>3}", result.breakdown.nitrogen);
    println!("  Phosphorus  {:>3}", result.breakdown.phosphorus);
    println!("  Potassium   {:>3}", result.breakdown.potassium);

    if !result.findings.is_empty() {
        println!();
        println!("Findings:");
        for finding in &result.findings {
            println!("  - {}", finding);
        }
    }

    println!();
    println!("{}", result.recommendation());
}

async fn run_window(cli: &Cli, args: WindowArgs) -> Result<()> {
    let config = Config::load(cli.config.clone())?;

    let region_key = args
        .region
        .as_deref()
        .unwrap_or(&config.advisory.default_region);
    let region = Region::find(region_key)
        .ok_or_else(|| AgroSmartError::UnknownRegion(region_key.to_string()))?;
    let coords = region.coords.ok_or_else(|| {
        let districts: Vec<&str> = Region::forecast_districts().map(|r| r.id).collect();
        AgroSmartError::Validation(format!(
            "No forecast coordinates for region '{}'; try one of: {}",
            region.name,
            districts.join(", ")
        ))
    })?;

    let owm = config
        .openweathermap
        .as_ref()
        .filter(|c| c.enabled)
        .ok_or_else(|| {
            AgroSmartError::Config(
                "OpenWeatherMap is not configured. Run `agrosmart init` and provide an API key."
                    .into(),
            )
        })?;

    let client = OpenWeatherMapClient::new(owm.clone());
    let observations = client.fetch_forecast(&coords).await?;

    let criteria = FavorabilityCriteria::default();
    let favorable = criteria.select_favorable_days(&observations);

    let days = args.effective_days(config.advisory.default_days)?;
    let reference = chrono::Local::now().date_naive();
    let window = build_calendar(reference, days, &favorable);

    let report = WindowReport {
        region: region.id.to_string(),
        days: window.days,
        favorable_days: favorable,
        dropped: window.dropped,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_window_summary(&report, &criteria);
    }

    Ok(())
}

fn print_window_summary(report: &WindowReport, criteria: &FavorabilityCriteria) {
    println!(
        "Planting window for {} ({} days):",
        report.region,
        report.days.len()
    );
    println!();

    for day in &report.days {
        if day.favorable {
            let temp = day.temp.unwrap_or_default();
            let mark = if criteria.is_ideal_temp(temp) { "**" } else { "* " };
            let rain = day
                .rain
                .map(|r| format!(", rain {:.1} mm", r))
                .unwrap_or_default();
            println!(
                "  {} {}  {:.0} C, wind {:.0} m/s{}",
                mark,
                day.label,
                temp,
                day.wind.unwrap_or_default(),
                rain
            );
        } else {
            println!("     {}  -", day.label);
        }
    }

    if report.favorable_days.is_empty() {
        println!();
        println!("No favorable days in the forecast range.");
    }
    if report.dropped > 0 {
        println!();
        println!(
            "Warning: {} forecast record(s) dropped for unparsable dates.",
            report.dropped
        );
    }
}

fn run_regions() {
    println!("Known regions (* = forecast available):");
    println!();
    for region in Region::all() {
        let mark = if region.coords.is_some() { "*" } else { " " };
        println!(
            "  {} {:<12} {:<20} {:<18} {}",
            mark,
            region.id,
            region.name,
            region.soil,
            region.crops.join(", ")
        );
    }

    println!();
    println!("District soil baselines:");
    for region in Region::forecast_districts() {
        if let Some(baseline) = region.baseline() {
            println!(
                "  {:<12} {:>3}/100  {}; {}",
                region.id, baseline.score, baseline.description, baseline.recommendation
            );
        }
    }
}
