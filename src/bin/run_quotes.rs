//! Run a batch of saved quotes and/or screen a listings export
//!
//! Outputs one summary row per quote for comparison in a spreadsheet

use anyhow::{bail, Context, Result};
use clap::Parser;
use investment_engine::deal::{load_listings, load_quotes};
use investment_engine::projection::SecondaryEngine;
use investment_engine::{ComparisonReport, QuoteRunner};
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(
    name = "run_quotes",
    about = "Batch-run saved quotes and screen secondary listings"
)]
struct Cli {
    /// JSON array of saved quotes to run
    #[arg(long)]
    quotes: Option<PathBuf>,

    /// CSV of secondary listings to screen on year-one metrics
    #[arg(long)]
    listings: Option<PathBuf>,

    /// Summary CSV written for the quote batch
    #[arg(long, default_value = "quote_summary.csv")]
    out: PathBuf,

    /// Calendar year used to anchor listing projections
    #[arg(long, default_value_t = 2024)]
    anchor_year: i32,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    if cli.quotes.is_none() && cli.listings.is_none() {
        bail!("provide --quotes and/or --listings");
    }

    if let Some(path) = &cli.quotes {
        run_quote_batch(path, &cli.out)?;
    }
    if let Some(path) = &cli.listings {
        screen_listings(path, cli.anchor_year)?;
    }
    Ok(())
}

fn run_quote_batch(path: &PathBuf, out: &PathBuf) -> Result<()> {
    let start = Instant::now();
    let quotes = load_quotes(path).with_context(|| format!("loading {}", path.display()))?;
    println!("Loaded {} quotes in {:?}", quotes.len(), start.elapsed());

    let runner = QuoteRunner::new();
    let proj_start = Instant::now();
    let reports: Vec<ComparisonReport> = quotes.par_iter().map(|q| runner.run(q)).collect();
    println!("Ran {} quotes in {:?}", reports.len(), proj_start.elapsed());

    let mut file =
        File::create(out).with_context(|| format!("creating {}", out.display()))?;
    writeln!(
        file,
        "QuoteId,Valid,OffPlanDayOne,OffPlanAtHandover,SecondaryDayOne,OffPlanWealthY5,OffPlanWealthY10,SecLTWealthY10,SecSTWealthY10,OffPlanReturnY10Pct,SecLTReturnY10Pct,CrossoverLT,CrossoverST"
    )?;
    for report in &reports {
        let m = &report.metrics;
        writeln!(
            file,
            "{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.4},{:.4},{},{}",
            report.quote_id,
            report.is_valid(),
            m.off_plan_day_one_capital,
            m.off_plan_capital_at_handover,
            m.secondary_day_one_capital,
            m.off_plan_wealth_year5,
            m.off_plan_wealth_year10,
            m.secondary_wealth_year10_long_term,
            m.secondary_wealth_year10_short_term,
            m.off_plan_return_year10_pct,
            m.secondary_return_year10_long_term_pct,
            format_crossover(m.crossover_year_long_term),
            format_crossover(m.crossover_year_short_term),
        )?;
    }
    println!("Summary written to {}", out.display());

    for report in reports.iter().filter(|r| !r.is_valid()) {
        for issue in &report.off_plan.validation.issues {
            println!("  {}: off-plan: {}", report.quote_id, issue);
        }
        for issue in &report.secondary.validation.issues {
            println!("  {}: secondary: {}", report.quote_id, issue);
        }
    }
    Ok(())
}

fn screen_listings(path: &PathBuf, anchor_year: i32) -> Result<()> {
    let listings =
        load_listings(path).with_context(|| format!("loading {}", path.display()))?;
    println!("Screening {} listings...", listings.len());

    let metrics: Vec<_> = listings
        .par_iter()
        .map(|deal| SecondaryEngine::new(deal.clone(), anchor_year).year_one())
        .collect();

    println!(
        "{:>12} {:>10} {:>12} {:>10} {:>8} {:>10}",
        "Price", "DayOne", "NetRentLT", "YieldLT%", "DSCR-LT", "CoC-LT%"
    );
    println!("{}", "-".repeat(68));
    for (deal, year1) in listings.iter().zip(&metrics) {
        println!(
            "{:>12.0} {:>10.0} {:>12.2} {:>9.2}% {:>8.3} {:>9.2}%",
            deal.price,
            year1.day_one_capital,
            year1.net_rent_long_term,
            year1.net_yield_long_term_pct,
            year1.dscr_long_term,
            year1.cash_on_cash_long_term_pct,
        );
    }
    Ok(())
}

fn format_crossover(year: Option<u32>) -> String {
    match year {
        Some(y) => y.to_string(),
        None => "none".to_string(),
    }
}
