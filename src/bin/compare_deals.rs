//! Deep-dive comparison for a single saved quote
//!
//! Prints the two acquisition tracks side by side; `--json` dumps the
//! full report for downstream tooling.

use anyhow::{Context, Result};
use clap::Parser;
use investment_engine::deal::load_quote;
use investment_engine::QuoteRunner;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "compare_deals",
    about = "Compare the off-plan and secondary sides of one saved quote"
)]
struct Cli {
    /// Saved quote JSON file
    quote: PathBuf,

    /// Extra exit months to price on top of the quote's own
    #[arg(long = "exit-month")]
    exit_months: Vec<u32>,

    /// Print the full report as pretty JSON instead of tables
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut quote = load_quote(&cli.quote)
        .with_context(|| format!("loading {}", cli.quote.display()))?;
    quote.exit_months.extend(&cli.exit_months);

    let runner = QuoteRunner::new();
    let report = runner.run(&quote);

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", "=".repeat(60));
    println!("Quote {} ({})", report.quote_id, report.label);
    println!("{}", "=".repeat(60));
    if !report.is_valid() {
        for issue in report
            .off_plan
            .validation
            .issues
            .iter()
            .chain(&report.secondary.validation.issues)
        {
            println!("  warning: {}", issue);
        }
    }

    let m = &report.metrics;
    println!("\n{:<34} {:>14} {:>14}", "", "Off-Plan", "Secondary LT");
    print_pair(
        "Day-one capital",
        m.off_plan_day_one_capital,
        m.secondary_day_one_capital,
    );
    print_pair(
        "Capital by handover",
        m.off_plan_capital_at_handover,
        m.secondary_day_one_capital,
    );
    print_pair(
        "Wealth year 5",
        m.off_plan_wealth_year5,
        m.secondary_wealth_year5_long_term,
    );
    print_pair(
        "Wealth year 10",
        m.off_plan_wealth_year10,
        m.secondary_wealth_year10_long_term,
    );
    print_pair(
        "Annualized return year 10 (%)",
        m.off_plan_return_year10_pct,
        m.secondary_return_year10_long_term_pct,
    );
    print_pair("DSCR", m.off_plan_dscr, m.secondary_dscr_long_term);

    println!(
        "\nIncome-free months (off-plan): {}",
        m.income_free_months
    );
    println!(
        "Crossover year: LT {} / ST {}",
        m.crossover_year_long_term
            .map_or("none".to_string(), |y| y.to_string()),
        m.crossover_year_short_term
            .map_or("none".to_string(), |y| y.to_string()),
    );

    println!("\nExit scenarios:");
    for exit in &report.exit_scenarios {
        println!(
            "  month {:>3} ({}): off-plan {:>14.2}  secondary LT {:>14.2}  ST {:>14.2}{}",
            exit.month,
            exit.calendar,
            exit.off_plan_exit_profit,
            exit.secondary_exit_profit_long_term,
            exit.secondary_exit_profit_short_term,
            if exit.clamped { "  (clamped)" } else { "" },
        );
    }
    Ok(())
}

fn print_pair(label: &str, off_plan: f64, secondary: f64) {
    println!("{:<34} {:>14.2} {:>14.2}", label, off_plan, secondary);
}
