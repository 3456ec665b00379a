//! Head-to-head comparison of the two acquisition structures
//!
//! Reconciles an off-plan projection against a secondary projection into
//! a single metrics block, and prices arbitrary exit months for both
//! sides from the same engines that built the yearly series.

use serde::{Deserialize, Serialize};

use crate::deal::MonthYear;
use crate::projection::{
    OffPlanEngine, OffPlanProjection, RentalMode, SecondaryEngine, SecondaryProjection,
    YearlyProjection, HORIZON_MONTHS,
};
use crate::schedule::PaymentSchedule;

/// Transaction cost charged on the exit price when a unit is sold
pub const TRANSACTION_COST_PCT: f64 = 2.0;

/// Unified comparison block for one quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonMetrics {
    pub off_plan_day_one_capital: f64,
    pub secondary_day_one_capital: f64,

    /// Day-one capital plus all pre-handover installments
    pub off_plan_capital_at_handover: f64,

    pub off_plan_wealth_year5: f64,
    pub off_plan_wealth_year10: f64,
    pub off_plan_return_year5_pct: f64,
    pub off_plan_return_year10_pct: f64,

    pub secondary_wealth_year5_long_term: f64,
    pub secondary_wealth_year10_long_term: f64,
    pub secondary_return_year5_long_term_pct: f64,
    pub secondary_return_year10_long_term_pct: f64,

    pub secondary_wealth_year5_short_term: f64,
    pub secondary_wealth_year10_short_term: f64,
    pub secondary_return_year5_short_term_pct: f64,
    pub secondary_return_year10_short_term_pct: f64,

    /// Always positive infinity: off-plan purchases carry no mortgage
    pub off_plan_dscr: f64,
    pub secondary_dscr_long_term: f64,
    pub secondary_dscr_short_term: f64,

    /// Months from booking with zero off-plan rental income
    pub income_free_months: u32,

    /// First year off-plan wealth overtakes the secondary track
    pub crossover_year_long_term: Option<u32>,
    pub crossover_year_short_term: Option<u32>,
}

/// Both sides priced at an arbitrary exit month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitScenario {
    pub requested_month: u32,

    /// Requested month after clamping to the projection horizon
    pub month: u32,
    pub clamped: bool,

    /// Calendar month of the exit, anchored at the off-plan booking
    pub calendar: MonthYear,

    pub off_plan_exit_value: f64,
    pub off_plan_rent_collected: f64,
    pub off_plan_capital_paid: f64,
    pub off_plan_transaction_cost: f64,
    pub off_plan_exit_profit: f64,

    pub secondary_exit_value: f64,
    pub secondary_loan_balance: f64,
    pub secondary_transaction_cost: f64,
    pub secondary_rent_long_term: f64,
    pub secondary_exit_profit_long_term: f64,
    pub secondary_rent_short_term: f64,
    pub secondary_exit_profit_short_term: f64,
}

/// Complete output snapshot for one quote
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub quote_id: String,
    pub label: String,
    pub schedule: PaymentSchedule,
    pub off_plan: OffPlanProjection,
    pub secondary: SecondaryProjection,
    pub metrics: ComparisonMetrics,
    pub exit_scenarios: Vec<ExitScenario>,
}

impl ComparisonReport {
    /// True when both sides passed input validation
    pub fn is_valid(&self) -> bool {
        self.off_plan.validation.is_valid && self.secondary.validation.is_valid
    }
}

/// Simple annualized return: total growth over capital, averaged per
/// year. Zero when the capital base is degenerate.
pub fn annualized_return_pct(wealth: f64, capital: f64, years: u32) -> f64 {
    if capital <= 0.0 || years == 0 {
        return 0.0;
    }
    wealth / capital / years as f64 * 100.0
}

/// First year where off-plan wealth, previously at or below the
/// secondary track, becomes strictly greater. None when the series
/// never cross inside the horizon.
pub fn crossover_year(off_plan: &[YearlyProjection], secondary: &[YearlyProjection]) -> Option<u32> {
    let years = off_plan.len().min(secondary.len());
    for i in 1..years {
        let was_behind = off_plan[i - 1].wealth <= secondary[i - 1].wealth;
        let now_ahead = off_plan[i].wealth > secondary[i].wealth;
        if was_behind && now_ahead {
            return Some(off_plan[i].year);
        }
    }
    None
}

/// Assemble the metrics block from both projections
pub fn compare(
    off_plan: &OffPlanProjection,
    secondary: &SecondaryProjection,
) -> ComparisonMetrics {
    let op_capital = off_plan.capital_at_handover;
    let sec_capital = secondary.year1.day_one_capital;

    let op_wealth = |year: usize| off_plan.rows[year - 1].wealth;
    let lt_wealth = |year: usize| secondary.long_term[year - 1].wealth;
    let st_wealth = |year: usize| secondary.short_term[year - 1].wealth;

    ComparisonMetrics {
        off_plan_day_one_capital: off_plan.capital_day_one,
        secondary_day_one_capital: sec_capital,
        off_plan_capital_at_handover: op_capital,

        off_plan_wealth_year5: op_wealth(5),
        off_plan_wealth_year10: op_wealth(10),
        off_plan_return_year5_pct: annualized_return_pct(op_wealth(5), op_capital, 5),
        off_plan_return_year10_pct: annualized_return_pct(op_wealth(10), op_capital, 10),

        secondary_wealth_year5_long_term: lt_wealth(5),
        secondary_wealth_year10_long_term: lt_wealth(10),
        secondary_return_year5_long_term_pct: annualized_return_pct(lt_wealth(5), sec_capital, 5),
        secondary_return_year10_long_term_pct: annualized_return_pct(
            lt_wealth(10),
            sec_capital,
            10,
        ),

        secondary_wealth_year5_short_term: st_wealth(5),
        secondary_wealth_year10_short_term: st_wealth(10),
        secondary_return_year5_short_term_pct: annualized_return_pct(st_wealth(5), sec_capital, 5),
        secondary_return_year10_short_term_pct: annualized_return_pct(
            st_wealth(10),
            sec_capital,
            10,
        ),

        off_plan_dscr: f64::INFINITY,
        secondary_dscr_long_term: secondary.year1.dscr_long_term,
        secondary_dscr_short_term: secondary.year1.dscr_short_term,

        income_free_months: off_plan.income_free_months,

        crossover_year_long_term: crossover_year(&off_plan.rows, &secondary.long_term),
        crossover_year_short_term: crossover_year(&off_plan.rows, &secondary.short_term),
    }
}

/// Price both sides at an exit month. Months beyond the horizon clamp
/// to it and flag the result instead of extrapolating.
pub fn exit_scenario(
    requested_month: u32,
    off_plan: &OffPlanEngine,
    secondary: &SecondaryEngine,
) -> ExitScenario {
    let month = requested_month.min(HORIZON_MONTHS);
    let clamped = month != requested_month;

    let op_value = off_plan.value_at_month(month);
    let op_rent = off_plan.rent_accrued_through(month);
    let op_capital = off_plan.capital_paid_through(month);
    let op_cost = op_value * TRANSACTION_COST_PCT / 100.0;

    let sec_value = secondary.value_at_month(month);
    let sec_balance = secondary.loan_balance_after(month);
    let sec_cost = sec_value * TRANSACTION_COST_PCT / 100.0;
    let sec_day_one = secondary.day_one_capital();
    let sec_rent_lt = secondary.rent_accrued_through(month, RentalMode::LongTerm);
    let sec_rent_st = secondary.rent_accrued_through(month, RentalMode::ShortTerm);
    let sec_net_proceeds = sec_value - sec_balance - sec_cost - sec_day_one;

    ExitScenario {
        requested_month,
        month,
        clamped,
        calendar: off_plan.deal().calendar_at(month),

        off_plan_exit_value: op_value,
        off_plan_rent_collected: op_rent,
        off_plan_capital_paid: op_capital,
        off_plan_transaction_cost: op_cost,
        off_plan_exit_profit: op_value + op_rent - op_capital - op_cost,

        secondary_exit_value: sec_value,
        secondary_loan_balance: sec_balance,
        secondary_transaction_cost: sec_cost,
        secondary_rent_long_term: sec_rent_lt,
        secondary_exit_profit_long_term: sec_net_proceeds + sec_rent_lt,
        secondary_rent_short_term: sec_rent_st,
        secondary_exit_profit_short_term: sec_net_proceeds + sec_rent_st,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{
        Financing, Handover, MonthYear, Mortgage, OffPlanDeal, PaymentMilestone, PhasedRates,
        SecondaryDeal,
    };
    use crate::projection::YearlyProjection;
    use approx::assert_abs_diff_eq;

    fn off_plan_deal() -> OffPlanDeal {
        OffPlanDeal {
            base_price: 2_000_000.0,
            down_payment_pct: 20.0,
            pre_handover_pct: 60.0,
            booking_fee: 50_000.0,
            admin_fee: 3_000.0,
            registration_fee_pct: 4.0,
            booking: MonthYear {
                month: 1,
                year: 2024,
            },
            handover: Handover::Month {
                month: 1,
                year: 2026,
            },
            milestones: vec![
                PaymentMilestone::at_month(1, 12, 10.0),
                PaymentMilestone::at_month(2, 18, 30.0),
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
        }
    }

    fn secondary_deal() -> SecondaryDeal {
        SecondaryDeal {
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
        }
    }

    fn wealth_series(values: &[f64]) -> Vec<YearlyProjection> {
        values
            .iter()
            .enumerate()
            .map(|(i, w)| {
                let mut row = YearlyProjection::new(i as u32 + 1, 2024 + i as i32);
                row.wealth = *w;
                row
            })
            .collect()
    }

    #[test]
    fn test_annualized_return() {
        assert_abs_diff_eq!(
            annualized_return_pct(500_000.0, 1_000_000.0, 5),
            10.0,
            epsilon = 1e-9
        );
        assert_eq!(annualized_return_pct(500_000.0, 0.0, 5), 0.0);
        assert_eq!(annualized_return_pct(500_000.0, -1.0, 5), 0.0);
        assert_eq!(annualized_return_pct(500_000.0, 1_000_000.0, 0), 0.0);
    }

    #[test]
    fn test_crossover_found() {
        let off_plan = wealth_series(&[-100.0, 50.0, 300.0, 400.0]);
        let secondary = wealth_series(&[0.0, 100.0, 200.0, 250.0]);
        assert_eq!(crossover_year(&off_plan, &secondary), Some(3));
    }

    #[test]
    fn test_crossover_absent() {
        let off_plan = wealth_series(&[-100.0, 0.0, 100.0]);
        let secondary = wealth_series(&[200.0, 300.0, 400.0]);
        assert_eq!(crossover_year(&off_plan, &secondary), None);

        // Already ahead in year 1 and never behind: no crossover event
        let off_plan = wealth_series(&[500.0, 600.0, 700.0]);
        let secondary = wealth_series(&[0.0, 100.0, 200.0]);
        assert_eq!(crossover_year(&off_plan, &secondary), None);
    }

    #[test]
    fn test_compare_metrics_block() {
        let op_engine = OffPlanEngine::new(off_plan_deal());
        let sec_engine = SecondaryEngine::new(secondary_deal(), 2024);
        let op = op_engine.project();
        let sec = sec_engine.project();
        let metrics = compare(&op, &sec);

        assert_abs_diff_eq!(metrics.off_plan_day_one_capital, 483_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            metrics.off_plan_capital_at_handover,
            1_283_000.0,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(metrics.secondary_day_one_capital, 552_000.0, epsilon = 1e-6);
        assert_eq!(metrics.income_free_months, 24);
        assert!(metrics.off_plan_dscr.is_infinite());

        assert_abs_diff_eq!(metrics.off_plan_wealth_year5, op.rows[4].wealth, epsilon = 1e-9);
        assert_abs_diff_eq!(
            metrics.off_plan_return_year5_pct,
            op.rows[4].wealth / 1_283_000.0 / 5.0 * 100.0,
            epsilon = 1e-9
        );
        assert_abs_diff_eq!(
            metrics.secondary_return_year10_long_term_pct,
            sec.long_term[9].wealth / 552_000.0 / 10.0 * 100.0,
            epsilon = 1e-9
        );

        // Reported crossovers satisfy the strict-overtake rule
        for crossover in [
            metrics.crossover_year_long_term.map(|y| (y, &sec.long_term)),
            metrics
                .crossover_year_short_term
                .map(|y| (y, &sec.short_term)),
        ]
        .into_iter()
        .flatten()
        {
            let (year, rows) = crossover;
            let i = year as usize - 1;
            assert!(op.rows[i].wealth > rows[i].wealth);
            assert!(op.rows[i - 1].wealth <= rows[i - 1].wealth);
        }
    }

    #[test]
    fn test_exit_scenario_components() {
        let op_engine = OffPlanEngine::new(off_plan_deal());
        let sec_engine = SecondaryEngine::new(secondary_deal(), 2024);

        let exit = exit_scenario(36, &op_engine, &sec_engine);
        assert_eq!(exit.month, 36);
        assert!(!exit.clamped);
        assert_eq!(
            exit.calendar,
            MonthYear {
                month: 1,
                year: 2027
            }
        );

        // One growth year past handover; every installment is paid
        assert_abs_diff_eq!(exit.off_plan_exit_value, 2_508_800.0 * 1.08, epsilon = 1.0);
        assert_abs_diff_eq!(exit.off_plan_rent_collected, 140_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(exit.off_plan_capital_paid, 2_083_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            exit.off_plan_transaction_cost,
            exit.off_plan_exit_value * 0.02,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            exit.off_plan_exit_profit,
            exit.off_plan_exit_value + 140_000.0 - 2_083_000.0 - exit.off_plan_transaction_cost,
            epsilon = 1e-6
        );

        // Secondary side settles the loan out of the sale price
        assert_abs_diff_eq!(
            exit.secondary_exit_value,
            1_200_000.0 * 1.05_f64.powf(3.0),
            epsilon = 1e-3
        );
        assert!(exit.secondary_loan_balance > 0.0);
        assert_abs_diff_eq!(
            exit.secondary_exit_profit_long_term,
            exit.secondary_exit_value - exit.secondary_loan_balance
                + exit.secondary_rent_long_term
                - 552_000.0
                - exit.secondary_transaction_cost,
            epsilon = 1e-6
        );
        assert!(exit.secondary_rent_short_term > exit.secondary_rent_long_term);
    }

    #[test]
    fn test_exit_month_clamps_to_horizon() {
        let op_engine = OffPlanEngine::new(off_plan_deal());
        let sec_engine = SecondaryEngine::new(secondary_deal(), 2024);

        let exit = exit_scenario(240, &op_engine, &sec_engine);
        assert_eq!(exit.requested_month, 240);
        assert_eq!(exit.month, 120);
        assert!(exit.clamped);

        let at_horizon = exit_scenario(120, &op_engine, &sec_engine);
        assert_abs_diff_eq!(
            exit.off_plan_exit_profit,
            at_horizon.off_plan_exit_profit,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_exit_at_booking_month() {
        let op_engine = OffPlanEngine::new(off_plan_deal());
        let sec_engine = SecondaryEngine::new(secondary_deal(), 2024);

        let exit = exit_scenario(0, &op_engine, &sec_engine);
        assert_abs_diff_eq!(exit.off_plan_exit_value, 2_000_000.0, epsilon = 1e-6);
        assert_eq!(exit.off_plan_rent_collected, 0.0);
        // Only the booking-day block has been paid
        assert_abs_diff_eq!(exit.off_plan_capital_paid, 483_000.0, epsilon = 1e-6);
    }
}
