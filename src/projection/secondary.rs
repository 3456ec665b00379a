//! Ready-property (secondary market) projection
//!
//! Produces year-one underwriting metrics plus parallel ten-year tracks
//! for long-term and short-term letting. The mortgage is amortized once
//! for the full term; yearly rows and exit queries both read from that
//! schedule.

use serde::{Deserialize, Serialize};

use crate::deal::{validate_secondary, SecondaryDeal, ValidationReport};
use crate::finance::{amortize, FlatCurve, LoanSchedule};

use super::rows::{ProjectionSummary, YearlyProjection};
use super::{RentalMode, HORIZON_YEARS};

/// Annual inflation applied to the service charge
pub const SERVICE_CHARGE_INFLATION_PCT: f64 = 2.0;

/// First-year underwriting metrics for a ready property
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Year1Metrics {
    pub closing_costs: f64,
    pub loan_amount: f64,
    pub equity: f64,
    pub day_one_capital: f64,

    pub monthly_payment: f64,
    pub annual_debt_service: f64,

    pub gross_rent_long_term: f64,
    pub net_rent_long_term: f64,
    pub gross_rent_short_term: f64,
    pub net_rent_short_term: f64,

    /// Net rent over price, percent
    pub net_yield_long_term_pct: f64,
    pub net_yield_short_term_pct: f64,

    /// Net monthly rent over the mortgage payment; positive infinity
    /// when there is no mortgage
    pub dscr_long_term: f64,
    pub dscr_short_term: f64,

    /// Net rent less debt service, per month
    pub monthly_cashflow_long_term: f64,
    pub monthly_cashflow_short_term: f64,

    /// Annual cashflow after debt service over day-one capital, percent
    pub cash_on_cash_long_term_pct: f64,
    pub cash_on_cash_short_term_pct: f64,
}

/// Ten-year secondary projection with both rental tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecondaryProjection {
    pub year1: Year1Metrics,
    pub long_term: Vec<YearlyProjection>,
    pub short_term: Vec<YearlyProjection>,
    pub validation: ValidationReport,
}

impl SecondaryProjection {
    pub fn rows(&self, mode: RentalMode) -> &[YearlyProjection] {
        match mode {
            RentalMode::LongTerm => &self.long_term,
            RentalMode::ShortTerm => &self.short_term,
        }
    }

    pub fn summary(&self, mode: RentalMode) -> ProjectionSummary {
        ProjectionSummary::from_rows(self.rows(mode))
    }
}

/// Projection engine for a single ready-property deal
pub struct SecondaryEngine {
    deal: SecondaryDeal,
    anchor_year: i32,
    curve: FlatCurve,
    loan: LoanSchedule,
}

impl SecondaryEngine {
    /// `anchor_year` is the calendar year of the purchase, used only to
    /// label rows; it keeps outputs independent of the wall clock
    pub fn new(deal: SecondaryDeal, anchor_year: i32) -> Self {
        let curve = FlatCurve::new(deal.price, deal.appreciation_rate_pct);
        let loan = match &deal.mortgage {
            Some(m) => amortize(
                deal.loan_amount(),
                m.annual_rate_pct,
                m.term_years,
                m.term_years.saturating_mul(12),
            ),
            None => amortize(0.0, 0.0, 0, 0),
        };
        Self {
            deal,
            anchor_year,
            curve,
            loan,
        }
    }

    pub fn deal(&self) -> &SecondaryDeal {
        &self.deal
    }

    pub fn monthly_payment(&self) -> f64 {
        self.loan.monthly_payment
    }

    pub fn day_one_capital(&self) -> f64 {
        self.deal.day_one_capital()
    }

    pub fn value_at_month(&self, month: u32) -> f64 {
        self.curve.value_at_month(month)
    }

    pub fn loan_balance_after(&self, months: u32) -> f64 {
        self.loan.balance_after(months)
    }

    /// Gross rent for a projection year under a rental mode
    fn annual_gross_rent(&self, mode: RentalMode, year: u32) -> f64 {
        match mode {
            RentalMode::LongTerm => {
                let base = self.deal.price * self.deal.rental_yield_pct / 100.0;
                base * growth_factor(self.deal.rent_growth_pct, year)
            }
            RentalMode::ShortTerm => {
                let base = self.deal.nightly_rate * 365.0 * self.deal.occupancy_pct / 100.0;
                base * growth_factor(self.deal.nightly_rate_growth_pct, year)
            }
        }
    }

    /// Net rent for a projection year: short-term letting pays operating
    /// and management percentages off gross, both modes pay the inflating
    /// service charge
    fn annual_net_rent(&self, mode: RentalMode, year: u32) -> f64 {
        let gross = self.annual_gross_rent(mode, year);
        let service =
            self.deal.annual_service_charge() * growth_factor(SERVICE_CHARGE_INFLATION_PCT, year);
        match mode {
            RentalMode::LongTerm => gross - service,
            RentalMode::ShortTerm => {
                let cost_pct =
                    (self.deal.operating_expense_pct + self.deal.management_fee_pct) / 100.0;
                gross * (1.0 - cost_pct) - service
            }
        }
    }

    /// Net rent accrued from purchase up to (not including) month
    /// `month`, at one twelfth of the running year's rent per month
    pub fn rent_accrued_through(&self, month: u32, mode: RentalMode) -> f64 {
        (0..month)
            .map(|m| self.annual_net_rent(mode, m / 12 + 1) / 12.0)
            .sum()
    }

    /// First-year underwriting snapshot
    pub fn year_one(&self) -> Year1Metrics {
        let deal = &self.deal;
        let day_one = deal.day_one_capital();
        let payment = self.loan.monthly_payment;

        let gross_lt = self.annual_gross_rent(RentalMode::LongTerm, 1);
        let net_lt = self.annual_net_rent(RentalMode::LongTerm, 1);
        let gross_st = self.annual_gross_rent(RentalMode::ShortTerm, 1);
        let net_st = self.annual_net_rent(RentalMode::ShortTerm, 1);

        let dscr = |net_annual: f64| {
            if payment > 0.0 {
                net_annual / 12.0 / payment
            } else {
                f64::INFINITY
            }
        };
        let net_yield_pct = |net_annual: f64| {
            if deal.price > 0.0 {
                net_annual / deal.price * 100.0
            } else {
                0.0
            }
        };
        let cash_on_cash_pct = |net_annual: f64| {
            if day_one > 0.0 {
                (net_annual - 12.0 * payment) / day_one * 100.0
            } else {
                0.0
            }
        };

        Year1Metrics {
            closing_costs: deal.closing_costs(),
            loan_amount: deal.loan_amount(),
            equity: deal.equity(),
            day_one_capital: day_one,
            monthly_payment: payment,
            annual_debt_service: self.loan.paid_between(1, 12),
            gross_rent_long_term: gross_lt,
            net_rent_long_term: net_lt,
            gross_rent_short_term: gross_st,
            net_rent_short_term: net_st,
            net_yield_long_term_pct: net_yield_pct(net_lt),
            net_yield_short_term_pct: net_yield_pct(net_st),
            dscr_long_term: dscr(net_lt),
            dscr_short_term: dscr(net_st),
            monthly_cashflow_long_term: net_lt / 12.0 - payment,
            monthly_cashflow_short_term: net_st / 12.0 - payment,
            cash_on_cash_long_term_pct: cash_on_cash_pct(net_lt),
            cash_on_cash_short_term_pct: cash_on_cash_pct(net_st),
        }
    }

    fn project_track(&self, mode: RentalMode) -> Vec<YearlyProjection> {
        let day_one = self.deal.day_one_capital();
        let mut rows = Vec::with_capacity(HORIZON_YEARS as usize);
        let mut cumulative_rent = 0.0;

        for year in 1..=HORIZON_YEARS {
            let mut row = YearlyProjection::new(year, self.anchor_year + year as i32 - 1);
            row.property_value = self.curve.value_at_year(year);
            row.gross_rent = self.annual_gross_rent(mode, year);
            row.net_rent = self.annual_net_rent(mode, year);
            cumulative_rent += row.net_rent;
            row.cumulative_rent = cumulative_rent;

            // Installment windows are 1-based and inclusive
            let from = (year - 1) * 12 + 1;
            let to = year * 12;
            row.principal_paid = self.loan.principal_between(from, to);
            row.debt_service = self.loan.paid_between(from, to);
            row.loan_balance = self.loan.balance_after(to);

            row.net_cashflow = row.net_rent - row.debt_service;
            row.equity = row.property_value - row.loan_balance;
            row.wealth = row.equity + cumulative_rent - day_one;
            rows.push(row);
        }
        rows
    }

    pub fn project(&self) -> SecondaryProjection {
        SecondaryProjection {
            year1: self.year_one(),
            long_term: self.project_track(RentalMode::LongTerm),
            short_term: self.project_track(RentalMode::ShortTerm),
            validation: validate_secondary(&self.deal),
        }
    }
}

/// Compound growth factor for a 1-based projection year; bases at or
/// below -100% clamp to zero rather than alternating sign
fn growth_factor(annual_rate_pct: f64, year: u32) -> f64 {
    let base = (1.0 + annual_rate_pct / 100.0).max(0.0);
    base.powi(year as i32 - 1)
}
