//! Off-plan acquisition projection
//!
//! Combines the payment schedule with the phased value curve to produce
//! the ten-year wealth series. Rent starts at handover; the committed
//! capital baseline is everything paid through the pre-handover
//! milestones, so construction years show negative wealth until value
//! growth catches up.

use serde::{Deserialize, Serialize};

use crate::deal::{OffPlanDeal, ValidationReport};
use crate::finance::AppreciationCurve;
use crate::schedule::{build_schedule, PaymentSchedule};

use super::rows::{ProjectionSummary, YearlyProjection};
use super::HORIZON_YEARS;

/// Ten-year off-plan projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OffPlanProjection {
    pub rows: Vec<YearlyProjection>,

    /// Booking-day outlay: booking fee, remaining down payment,
    /// registration and admin fees
    pub capital_day_one: f64,

    /// Day-one outlay plus pre-handover installments
    pub capital_at_handover: f64,

    /// Months from booking to handover
    pub handover_month: u32,

    /// Projected value at handover
    pub handover_value: f64,

    /// Months with no rental income (the construction window)
    pub income_free_months: u32,

    pub validation: ValidationReport,
}

impl OffPlanProjection {
    pub fn summary(&self) -> ProjectionSummary {
        ProjectionSummary::from_rows(&self.rows)
    }
}

/// Projection engine for a single off-plan deal.
///
/// Precomputes the payment schedule and value curve once so the yearly
/// series and any number of exit-month queries stay consistent.
pub struct OffPlanEngine {
    deal: OffPlanDeal,
    schedule: PaymentSchedule,
    curve: AppreciationCurve,
}

impl OffPlanEngine {
    pub fn new(deal: OffPlanDeal) -> Self {
        let schedule = build_schedule(&deal);
        let curve = AppreciationCurve::for_deal(&deal);
        Self {
            deal,
            schedule,
            curve,
        }
    }

    pub fn deal(&self) -> &OffPlanDeal {
        &self.deal
    }

    pub fn schedule(&self) -> &PaymentSchedule {
        &self.schedule
    }

    pub fn curve(&self) -> &AppreciationCurve {
        &self.curve
    }

    pub fn handover_month(&self) -> u32 {
        self.curve.construction_months
    }

    /// Projected value at a month offset from booking
    pub fn value_at_month(&self, month: u32) -> f64 {
        self.curve.value_at_month(month)
    }

    /// Cash paid into the schedule through a month offset, inclusive
    pub fn capital_paid_through(&self, month: u32) -> f64 {
        self.schedule.paid_through(month)
    }

    /// Annual rent run-rate during month `month`: zero before handover,
    /// then yield on the contract price growing once per completed
    /// post-handover year
    fn annual_rent_at(&self, month: u32) -> f64 {
        let handover = self.handover_month();
        if month < handover {
            return 0.0;
        }
        let years_since = (month - handover) / 12;
        let first_year = self.deal.base_price * self.deal.rental_yield_pct / 100.0;
        first_year * (1.0 + self.deal.rent_growth_pct / 100.0).powi(years_since as i32)
    }

    /// Rent accrued from handover up to (not including) month `month`,
    /// at one twelfth of the running annual rate per month
    pub fn rent_accrued_through(&self, month: u32) -> f64 {
        let handover = self.handover_month();
        let mut total = 0.0;
        for m in handover..month {
            total += self.annual_rent_at(m) / 12.0;
        }
        total
    }

    pub fn project(&self) -> OffPlanProjection {
        let handover_month = self.handover_month();
        let capital_at_handover = self.schedule.capital_at_handover();

        let mut rows = Vec::with_capacity(HORIZON_YEARS as usize);
        let mut cumulative_rent = 0.0;

        for year in 1..=HORIZON_YEARS {
            let start_month = (year - 1) * 12;
            let end_month = year * 12;

            let mut row = YearlyProjection::new(year, self.deal.calendar_at(start_month).year);
            row.property_value = self.curve.value_at_year(year);

            let mut year_rent = 0.0;
            for m in start_month..end_month {
                year_rent += self.annual_rent_at(m) / 12.0;
            }
            cumulative_rent += year_rent;

            // No financing on the off-plan side: gross and net coincide
            // and equity is the full property value
            row.gross_rent = year_rent;
            row.net_rent = year_rent;
            row.cumulative_rent = cumulative_rent;
            row.net_cashflow = year_rent;
            row.equity = row.property_value;
            row.wealth = row.equity + cumulative_rent - capital_at_handover;
            row.is_construction = end_month <= handover_month;
            row.is_handover = (start_month..end_month).contains(&handover_month);

            rows.push(row);
        }

        if let Some(row) = rows.iter_mut().find(|r| r.wealth > capital_at_handover) {
            row.is_break_even = true;
        }

        OffPlanProjection {
            rows,
            capital_day_one: self.schedule.day_one_capital(),
            capital_at_handover,
            handover_month,
            handover_value: self.curve.handover_value(),
            income_free_months: handover_month,
            validation: self.schedule.validation.clone(),
        }
    }
}
