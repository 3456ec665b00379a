//! Investment Engine CLI
//!
//! Runs a demonstration quote and prints the schedule, projections,
//! and comparison metrics

use investment_engine::deal::{
    Financing, Handover, MonthYear, Mortgage, OffPlanDeal, PaymentMilestone, PhasedRates, Quote,
    SecondaryDeal,
};
use investment_engine::projection::RentalMode;
use investment_engine::QuoteRunner;
use std::fs::File;
use std::io::Write;

fn main() {
    env_logger::init();

    println!("Investment Engine v0.1.0");
    println!("========================\n");

    // Demonstration quote: marina off-plan tower against a ready apartment
    let quote = Quote {
        id: "demo-001".to_string(),
        label: "Marina tower vs ready apartment".to_string(),
        off_plan: OffPlanDeal {
            base_price: 2_000_000.0,
            down_payment_pct: 20.0,
            pre_handover_pct: 60.0,
            booking_fee: 50_000.0,
            admin_fee: 3_000.0,
            registration_fee_pct: 4.0,
            booking: MonthYear::new(1, 2024),
            handover: Handover::Quarter {
                quarter: 1,
                year: 2026,
            },
            milestones: vec![
                PaymentMilestone::at_month(1, 6, 10.0),
                PaymentMilestone::at_construction_pct(2, 50.0, 10.0),
                PaymentMilestone::at_month(3, 18, 20.0),
            ],
            appreciation: PhasedRates {
                construction_rate_pct: 12.0,
                growth_rate_pct: 8.0,
                mature_rate_pct: 4.0,
                growth_years: 3,
            },
            rental_yield_pct: 7.0,
            rent_growth_pct: 3.0,
            post_handover: None,
        },
        secondary: SecondaryDeal {
            price: 1_200_000.0,
            area_sqft: 650.0,
            closing_costs_pct: 6.0,
            rental_yield_pct: 7.0,
            rent_growth_pct: 2.0,
            nightly_rate: 850.0,
            occupancy_pct: 80.0,
            operating_expense_pct: 25.0,
            management_fee_pct: 15.0,
            nightly_rate_growth_pct: 4.0,
            appreciation_rate_pct: 5.0,
            service_charge_per_sqft: 22.0,
            mortgage: Some(Mortgage {
                financing: Financing::Percent(60.0),
                annual_rate_pct: 4.5,
                term_years: 25,
            }),
        },
        exit_months: vec![36, 60, 120],
    };

    let runner = QuoteRunner::new();
    let report = runner.run(&quote);

    println!("Quote: {} ({})", report.quote_id, report.label);
    println!("  Valid inputs: {}", report.is_valid());
    for issue in &report.off_plan.validation.issues {
        println!("  Off-plan issue: {}", issue);
    }
    for issue in &report.secondary.validation.issues {
        println!("  Secondary issue: {}", issue);
    }
    println!();

    // Payment schedule
    println!("Off-Plan Payment Schedule:");
    println!(
        "{:>5} {:>8} {:>14} {:>7} {:>14}  {}",
        "Month", "Date", "Kind", "Pct", "Amount", "Label"
    );
    println!("{}", "-".repeat(90));
    for event in &report.schedule.events {
        println!(
            "{:>5} {:>8} {:>14} {:>6.1}% {:>14.2}  {}",
            event.month,
            event.calendar.to_string(),
            event.kind.as_str(),
            event.pct_of_price,
            event.amount,
            event.label,
        );
    }
    let schedule_summary = report.schedule.summary();
    println!(
        "Total: {:.2} ({:.1}% of price), day one {:.2}, by handover {:.2}\n",
        schedule_summary.total_amount,
        schedule_summary.total_pct_of_price,
        schedule_summary.day_one_capital,
        schedule_summary.capital_at_handover,
    );

    // Ten-year series side by side
    println!("Ten-Year Wealth Projection:");
    println!(
        "{:>4} {:>6} {:>14} {:>12} {:>14} {:>14} {:>14}",
        "Year", "Cal", "OffPlan Value", "OffPlan Rent", "OffPlan Wealth", "Sec LT Wealth", "Sec ST Wealth"
    );
    println!("{}", "-".repeat(96));
    for (i, row) in report.off_plan.rows.iter().enumerate() {
        let lt = &report.secondary.long_term[i];
        let st = &report.secondary.short_term[i];
        let marker = if row.is_handover {
            " <- handover"
        } else if row.is_break_even {
            " <- break even"
        } else {
            ""
        };
        println!(
            "{:>4} {:>6} {:>14.2} {:>12.2} {:>14.2} {:>14.2} {:>14.2}{}",
            row.year, row.calendar_year, row.property_value, row.net_rent, row.wealth, lt.wealth,
            st.wealth, marker,
        );
    }
    println!();

    // Year-one underwriting for the ready unit
    let year1 = &report.secondary.year1;
    println!("Secondary Year One:");
    println!("  Day-one capital: {:.2}", year1.day_one_capital);
    println!("  Monthly payment: {:.2}", year1.monthly_payment);
    println!(
        "  Net rent LT/ST: {:.2} / {:.2}",
        year1.net_rent_long_term, year1.net_rent_short_term
    );
    println!(
        "  DSCR LT/ST: {:.3} / {:.3}",
        year1.dscr_long_term, year1.dscr_short_term
    );
    println!(
        "  Cash-on-cash LT/ST: {:.2}% / {:.2}%",
        year1.cash_on_cash_long_term_pct, year1.cash_on_cash_short_term_pct
    );
    println!();

    // Comparison metrics
    let metrics = &report.metrics;
    println!("Comparison:");
    println!(
        "  Capital day one: off-plan {:.2} vs secondary {:.2}",
        metrics.off_plan_day_one_capital, metrics.secondary_day_one_capital
    );
    println!(
        "  Off-plan capital by handover: {:.2} ({} income-free months)",
        metrics.off_plan_capital_at_handover, metrics.income_free_months
    );
    println!(
        "  Year 5 wealth: off-plan {:.2} vs LT {:.2} vs ST {:.2}",
        metrics.off_plan_wealth_year5,
        metrics.secondary_wealth_year5_long_term,
        metrics.secondary_wealth_year5_short_term
    );
    println!(
        "  Year 10 return: off-plan {:.2}% vs LT {:.2}% vs ST {:.2}%",
        metrics.off_plan_return_year10_pct,
        metrics.secondary_return_year10_long_term_pct,
        metrics.secondary_return_year10_short_term_pct
    );
    match metrics.crossover_year_long_term {
        Some(year) => println!("  Crossover vs LT track: year {}", year),
        None => println!("  Crossover vs LT track: none within horizon"),
    }
    match metrics.crossover_year_short_term {
        Some(year) => println!("  Crossover vs ST track: year {}", year),
        None => println!("  Crossover vs ST track: none within horizon"),
    }
    println!();

    // Exit scenarios
    println!("Exit Scenarios:");
    println!(
        "{:>7} {:>8} {:>14} {:>14} {:>14} {:>14}",
        "Month", "Date", "OffPlan Value", "OffPlan P/L", "Sec LT P/L", "Sec ST P/L"
    );
    println!("{}", "-".repeat(78));
    for exit in &report.exit_scenarios {
        println!(
            "{:>7} {:>8} {:>14.2} {:>14.2} {:>14.2} {:>14.2}{}",
            exit.month,
            exit.calendar.to_string(),
            exit.off_plan_exit_value,
            exit.off_plan_exit_profit,
            exit.secondary_exit_profit_long_term,
            exit.secondary_exit_profit_short_term,
            if exit.clamped { " (clamped)" } else { "" },
        );
    }

    // Write the schedule to CSV for spreadsheet checks
    let csv_path = "payment_schedule.csv";
    let mut file = File::create(csv_path).expect("Unable to create CSV file");
    writeln!(file, "Month,Date,Kind,Label,PctOfPrice,Amount").unwrap();
    for event in &report.schedule.events {
        writeln!(
            file,
            "{},{},{},{},{:.4},{:.2}",
            event.month,
            event.date,
            event.kind.as_str(),
            event.label,
            event.pct_of_price,
            event.amount,
        )
        .unwrap();
    }
    println!("\nSchedule written to: {}", csv_path);

    // Ten-year projection CSV, one row per year and mode
    let proj_path = "projection_output.csv";
    let mut file = File::create(proj_path).expect("Unable to create CSV file");
    writeln!(
        file,
        "Side,Mode,Year,CalendarYear,Value,GrossRent,NetRent,CumulativeRent,LoanBalance,DebtService,Equity,Wealth"
    )
    .unwrap();
    for row in &report.off_plan.rows {
        write_projection_row(&mut file, "off_plan", "long_term", row);
    }
    for mode in [RentalMode::LongTerm, RentalMode::ShortTerm] {
        for row in report.secondary.rows(mode) {
            write_projection_row(&mut file, "secondary", mode.as_str(), row);
        }
    }
    println!("Projections written to: {}", proj_path);
}

fn write_projection_row(
    file: &mut File,
    side: &str,
    mode: &str,
    row: &investment_engine::YearlyProjection,
) {
    writeln!(
        file,
        "{},{},{},{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
        side,
        mode,
        row.year,
        row.calendar_year,
        row.property_value,
        row.gross_rent,
        row.net_rent,
        row.cumulative_rent,
        row.loan_balance,
        row.debt_service,
        row.equity,
        row.wealth,
    )
    .unwrap();
}
