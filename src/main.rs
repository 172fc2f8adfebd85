//! Cash-flow planner CLI
//!
//! Runs a projection from defaults or a scenario JSON file, prints the
//! month table with the summary cards, and writes the CSV export.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use cashflow_planner::projection::export::{self, DEFAULT_EXPORT_NAME};
use cashflow_planner::scenario::{load_many, load_params, parse_month_field};
use cashflow_planner::{ProjectionResult, ScenarioParams, ScenarioRunner, Variant};

#[derive(Parser, Debug)]
#[command(name = "cashflow_planner", about = "Monthly cash-flow projection calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Project a single scenario and write the CSV export
    Project {
        /// Scenario JSON file; defaults are used when omitted
        #[arg(short, long)]
        scenario: Option<PathBuf>,

        /// Calculator: basic, financing or milestones
        #[arg(short, long, value_parser = parse_variant)]
        variant: Option<Variant>,

        /// Months to project (0-60)
        #[arg(long)]
        horizon: Option<u32>,

        /// First month, YYYY-MM
        #[arg(long, value_parser = parse_start)]
        start: Option<NaiveDate>,

        /// CSV output path
        #[arg(short, long, default_value = DEFAULT_EXPORT_NAME)]
        output: PathBuf,

        /// Rows to print before truncating the table
        #[arg(long, default_value_t = 24)]
        rows: usize,
    },
    /// Compare scenario files, or every calculator on one scenario
    Compare {
        /// Scenario JSON files; without any, the defaults run through every calculator
        scenarios: Vec<PathBuf>,

        /// Months to project (0-60)
        #[arg(long)]
        horizon: Option<u32>,
    },
}

fn parse_variant(raw: &str) -> std::result::Result<Variant, String> {
    Variant::parse(raw).ok_or_else(|| format!("unknown calculator {raw:?}"))
}

fn parse_start(raw: &str) -> std::result::Result<NaiveDate, String> {
    parse_month_field(raw).ok_or_else(|| format!("expected YYYY-MM, got {raw:?}"))
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Commands::Project {
            scenario,
            variant,
            horizon,
            start,
            output,
            rows,
        } => {
            let mut params = match &scenario {
                Some(path) => load_params(path)
                    .with_context(|| format!("loading scenario {}", path.display()))?,
                None => ScenarioParams::default(),
            };
            if let Some(v) = variant {
                params = params.with_variant(v);
            }
            if let Some(h) = horizon {
                params = params.with_horizon(h);
            }
            if let Some(s) = start {
                params = params.with_start_month(s);
            }

            let runner = ScenarioRunner::with_params(params, today);
            let result = runner.run_base();

            print_table(&result, rows);
            print_summary(&result);

            export::write_csv_file(&result, &output)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("\nCSV written to: {}", output.display());
        }
        Commands::Compare { scenarios, horizon } => {
            let runner = ScenarioRunner::new(today);
            let (names, mut batch): (Vec<String>, Vec<ScenarioParams>) = if scenarios.is_empty() {
                Variant::ALL
                    .iter()
                    .map(|&v| (v.as_str().to_string(), runner.params().with_variant(v)))
                    .unzip()
            } else {
                let loaded = load_many(&scenarios).context("loading scenarios")?;
                let names = scenarios.iter().map(|p| p.display().to_string()).collect();
                (names, loaded)
            };
            if batch.is_empty() {
                return Err(anyhow!("nothing to compare"));
            }
            if let Some(h) = horizon {
                batch = batch.iter().map(|p| p.with_horizon(h)).collect();
            }

            let summaries = runner.summarize_batch(&batch);

            println!(
                "{:<28} {:>6} {:>14} {:>14} {:>10} {:>10}",
                "Scenario", "Months", "Final", "Minimum", "MinMonth", "Negative"
            );
            for (name, s) in names.iter().zip(&summaries) {
                println!(
                    "{:<28} {:>6} {:>14.2} {:>14.2} {:>10} {:>10}",
                    name,
                    s.total_months,
                    s.final_balance,
                    s.min_balance,
                    s.min_balance_month.map_or("-".to_string(), |m| m.to_string()),
                    s.first_negative_month.map_or("-".to_string(), |m| m.to_string()),
                );
            }
        }
    }

    Ok(())
}

fn print_table(result: &ProjectionResult, max_rows: usize) {
    println!(
        "Calculator: {}  Start: {}  Opening cash: {:.2}\n",
        result.variant.as_str(),
        result.start_month.format("%Y-%m"),
        result.cash_start
    );
    println!(
        "{:>4} {:>8} {:>12} {:>12} {:>12} {:>14}  Events",
        "Month", "Date", "Inflow", "Outflow", "Net", "Balance"
    );
    for row in result.rows.iter().take(max_rows) {
        println!(
            "{:>4} {:>8} {:>12.2} {:>12.2} {:>12.2} {:>14.2}  {}",
            row.index,
            row.label,
            row.inflow,
            row.outflow,
            row.net,
            row.balance,
            row.events().join(", "),
        );
    }
    if result.rows.len() > max_rows {
        println!("... ({} more months)", result.rows.len() - max_rows);
    }
}

fn print_summary(result: &ProjectionResult) {
    let summary = result.summary();
    println!("\nSummary:");
    println!("  Months:          {}", summary.total_months);
    println!("  Start balance:   {:.2}", summary.starting_balance);
    println!("  Final balance:   {:.2}", summary.final_balance);
    match summary.min_balance_month {
        Some(m) => println!("  Minimum balance: {:.2} (month {m})", summary.min_balance),
        None => println!("  Minimum balance: {:.2}", summary.min_balance),
    }
    println!("  Total inflow:    {:.2}", summary.total_inflow);
    println!("  Total outflow:   {:.2}", summary.total_outflow);
    if let Some(m) = summary.first_negative_month {
        println!("  Balance goes negative in month {m}");
    }
}
