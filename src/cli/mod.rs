//! Command-line front end: loads a snapshot, runs the forecast, prints the report.

use std::{
    io::{self, IsTerminal, Write},
    path::PathBuf,
};

use chrono::{DateTime, NaiveDate, Utc};
use colored::{ColoredString, Colorize};

use crate::config::ConfigManager;
use crate::core::{
    clock::{Clock, FixedClock, SystemClock},
    format::{AmountFormatter, PlainAmountFormatter},
    services::{BudgetPrediction, PredictionOptions, PredictionReport, PredictionService, RiskLevel},
};
use crate::errors::ForecastError;
use crate::ledger::{Category, CategoryDirectory};
use crate::storage::load_snapshot_from_path;
use crate::utils::build_info;

const USAGE: &str = "\
Usage: budget_forecast_cli <snapshot.json> [--now <RFC3339>] [--json]
       budget_forecast_cli --version

Options:
  --now <RFC3339>  Forecast as of this instant instead of the current time
  --json           Print the report as JSON
  --version        Print build information
  --help           Print this message";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliArgs {
    pub snapshot: Option<PathBuf>,
    pub now: Option<DateTime<Utc>>,
    pub json: bool,
    pub version: bool,
    pub help: bool,
}

impl CliArgs {
    pub fn parse<I, T>(args: I) -> Result<Self, ForecastError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut parsed = CliArgs::default();
        let mut iter = args.into_iter().map(Into::into);
        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--json" => parsed.json = true,
                "--version" | "-V" => parsed.version = true,
                "--help" | "-h" => parsed.help = true,
                "--now" => {
                    let value = iter.next().ok_or_else(|| {
                        ForecastError::InvalidInput("--now expects an RFC3339 timestamp".into())
                    })?;
                    let instant = DateTime::parse_from_rfc3339(&value).map_err(|err| {
                        ForecastError::InvalidInput(format!("invalid --now `{value}`: {err}"))
                    })?;
                    parsed.now = Some(instant.with_timezone(&Utc));
                }
                flag if flag.starts_with('-') => {
                    return Err(ForecastError::InvalidInput(format!(
                        "unknown option `{flag}`"
                    )))
                }
                path => {
                    if parsed.snapshot.is_some() {
                        return Err(ForecastError::InvalidInput(
                            "only one snapshot path may be given".into(),
                        ));
                    }
                    parsed.snapshot = Some(PathBuf::from(path));
                }
            }
        }
        Ok(parsed)
    }
}

/// Entry point used by the binary.
pub fn run_cli() -> Result<(), ForecastError> {
    let args = CliArgs::parse(std::env::args().skip(1))?;
    let stdout = io::stdout();
    colored::control::set_override(
        stdout.is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    );
    let mut out = stdout.lock();
    run_with_args(&args, &mut out)
}

pub fn run_with_args<W: Write>(args: &CliArgs, out: &mut W) -> Result<(), ForecastError> {
    if args.help {
        writeln!(out, "{USAGE}")?;
        return Ok(());
    }
    if args.version {
        writeln!(out, "{}", build_info::current().summary())?;
        return Ok(());
    }
    let path = args
        .snapshot
        .as_ref()
        .ok_or_else(|| ForecastError::InvalidInput(format!("missing snapshot path\n\n{USAGE}")))?;

    let config = ConfigManager::new()?.load()?;
    let snapshot = load_snapshot_from_path(path)?;
    let clock: Box<dyn Clock> = match args.now {
        Some(instant) => Box::new(FixedClock(instant)),
        None => Box::new(SystemClock),
    };
    let formatter = PlainAmountFormatter::from_config(&config);
    let options = PredictionOptions {
        config: &config,
        categories: &snapshot.categories,
        formatter: &formatter,
    };
    let report = PredictionService::compute_now(
        &snapshot.budgets,
        &snapshot.transactions,
        clock.as_ref(),
        &options,
    );
    tracing::debug!(path = %path.display(), predictions = report.predictions.len(), "forecast ready");

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &report)?;
        writeln!(out)?;
    } else {
        render_report(out, &report, &snapshot.categories, &formatter, clock.today())?;
    }
    Ok(())
}

fn render_report<W: Write>(
    out: &mut W,
    report: &PredictionReport,
    categories: &[Category],
    formatter: &dyn AmountFormatter,
    today: NaiveDate,
) -> io::Result<()> {
    writeln!(out, "{}", format!("Forecast as of {}", today.format("%Y-%m-%d")).bold())?;
    if !report.predictions.is_empty() {
        writeln!(
            out,
            "{:<18} {:>16} {:>16} {:>16} {:>7} {:>5} {:>16}",
            "Category", "Spent", "Projected", "Limit", "Risk", "Conf", "Daily limit"
        )?;
    }
    for prediction in report.by_risk() {
        let name = category_label(categories, prediction);
        writeln!(
            out,
            "{:<18} {:>16} {:>16} {:>16} {:>7} {:>4.0}% {:>16}",
            name,
            formatter.format_amount(prediction.current_spend),
            formatter.format_amount(prediction.projected_spend),
            formatter.format_amount(prediction.budget_limit),
            risk_label(prediction.risk_level),
            prediction.confidence * 100.0,
            formatter.format_amount(prediction.recommended_daily_limit),
        )?;
        writeln!(out, "  {}", prediction.insight)?;
        if let Some(note) = &prediction.seasonal_note {
            writeln!(out, "  {}", note.italic())?;
        }
    }
    for skipped in &report.skipped {
        writeln!(
            out,
            "{} budget {}: {}",
            "skipped".yellow(),
            skipped.budget_id,
            skipped.reason
        )?;
    }
    writeln!(out, "{}", report.summary)?;
    Ok(())
}

fn category_label(categories: &[Category], prediction: &BudgetPrediction) -> String {
    let name = categories
        .find_by_id(prediction.category_id)
        .map(|category| category.name.clone())
        .unwrap_or_else(|| prediction.category_id.to_string()[..8].to_string());
    if name.chars().count() > 18 {
        let truncated: String = name.chars().take(17).collect();
        format!("{truncated}…")
    } else {
        name
    }
}

fn risk_label(level: RiskLevel) -> ColoredString {
    let label = format!("{:>7}", level.to_string());
    match level {
        RiskLevel::Low => label.green(),
        RiskLevel::Medium => label.yellow(),
        RiskLevel::High => label.red().bold(),
    }
}
