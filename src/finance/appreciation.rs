//! Property value curves
//!
//! Two curve families drive every valuation in the engine:
//! - phased off-plan appreciation (construction, growth, mature regimes)
//! - flat secondary compounding at a single annual rate
//!
//! Exit-price queries call the same `value_at_month` used by the yearly
//! projections, so scheduled rows and ad-hoc queries can never diverge.

use serde::{Deserialize, Serialize};

use crate::deal::{OffPlanDeal, PhasedRates};

/// Value regime containing a given month offset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Booking up to handover
    Construction,
    /// The configured growth window after handover
    Growth,
    /// Everything beyond the growth window
    Mature,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Construction => "construction",
            Phase::Growth => "growth",
            Phase::Mature => "mature",
        }
    }
}

/// Monthly-equivalent growth factor over a span of months for an annual
/// percent rate. Rates at or below -100% clamp to a zero factor instead
/// of producing NaN from a negative base.
fn compound_months(annual_rate_pct: f64, months: f64) -> f64 {
    let annual_factor = (1.0 + annual_rate_pct / 100.0).max(0.0);
    annual_factor.powf(months / 12.0)
}

/// Phased appreciation curve anchored at the booking month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppreciationCurve {
    /// Contract price at booking
    pub base_price: f64,

    /// Months from booking to handover
    pub construction_months: u32,

    /// Per-regime annual rates and the growth window length
    pub rates: PhasedRates,
}

impl AppreciationCurve {
    pub fn new(base_price: f64, construction_months: u32, rates: PhasedRates) -> Self {
        Self {
            base_price,
            construction_months,
            rates,
        }
    }

    pub fn for_deal(deal: &OffPlanDeal) -> Self {
        Self::new(deal.base_price, deal.construction_months(), deal.appreciation)
    }

    /// First month of the mature regime
    fn growth_end_month(&self) -> u32 {
        self.construction_months + self.rates.growth_years * 12
    }

    /// Regime containing a month offset; a month exactly on a boundary
    /// belongs to the next regime
    pub fn phase_at_month(&self, months_from_booking: u32) -> Phase {
        if months_from_booking < self.construction_months {
            Phase::Construction
        } else if months_from_booking < self.growth_end_month() {
            Phase::Growth
        } else {
            Phase::Mature
        }
    }

    /// Projected value at handover
    pub fn handover_value(&self) -> f64 {
        self.base_price
            * compound_months(
                self.rates.construction_rate_pct,
                self.construction_months as f64,
            )
    }

    /// Projected value where the growth window hands off to the mature rate
    pub fn growth_boundary_value(&self) -> f64 {
        self.handover_value()
            * compound_months(self.rates.growth_rate_pct, (self.rates.growth_years * 12) as f64)
    }

    /// Projected value at a month offset from booking.
    ///
    /// Each regime compounds monthly-equivalent growth from the value at
    /// its own anchor: base price, handover value, growth-boundary value.
    pub fn value_at_month(&self, months_from_booking: u32) -> f64 {
        let m = months_from_booking as f64;
        let handover = self.construction_months as f64;
        let growth_end = self.growth_end_month() as f64;

        match self.phase_at_month(months_from_booking) {
            Phase::Construction => {
                self.base_price * compound_months(self.rates.construction_rate_pct, m)
            }
            Phase::Growth => {
                self.handover_value() * compound_months(self.rates.growth_rate_pct, m - handover)
            }
            Phase::Mature => {
                self.growth_boundary_value()
                    * compound_months(self.rates.mature_rate_pct, m - growth_end)
            }
        }
    }

    /// Value for a projection-year row (year 1 = the booking-month value)
    pub fn value_at_year(&self, year: u32) -> f64 {
        self.value_at_month(year.saturating_sub(1) * 12)
    }
}

/// Flat compounding curve for a ready property
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FlatCurve {
    pub base_price: f64,
    pub annual_rate_pct: f64,
}

impl FlatCurve {
    pub fn new(base_price: f64, annual_rate_pct: f64) -> Self {
        Self {
            base_price,
            annual_rate_pct,
        }
    }

    /// Value at a month offset from purchase
    pub fn value_at_month(&self, months: u32) -> f64 {
        self.base_price * compound_months(self.annual_rate_pct, months as f64)
    }

    /// Value for a projection-year row: `price x (1+rate)^(year-1)`
    pub fn value_at_year(&self, year: u32) -> f64 {
        self.value_at_month(year.saturating_sub(1) * 12)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn test_curve() -> AppreciationCurve {
        AppreciationCurve::new(
            2_000_000.0,
            24,
            PhasedRates {
                construction_rate_pct: 12.0,
                growth_rate_pct: 8.0,
                mature_rate_pct: 4.0,
                growth_years: 3,
            },
        )
    }

    #[test]
    fn test_handover_value_two_year_construction() {
        let curve = test_curve();
        // 2,000,000 * 1.12^2
        assert_abs_diff_eq!(curve.handover_value(), 2_508_800.0, epsilon = 1.0);
        assert_abs_diff_eq!(curve.value_at_month(24), 2_508_800.0, epsilon = 1.0);
    }

    #[test]
    fn test_phase_boundaries_belong_to_next_regime() {
        let curve = test_curve();
        assert_eq!(curve.phase_at_month(0), Phase::Construction);
        assert_eq!(curve.phase_at_month(23), Phase::Construction);
        assert_eq!(curve.phase_at_month(24), Phase::Growth);
        assert_eq!(curve.phase_at_month(59), Phase::Growth);
        assert_eq!(curve.phase_at_month(60), Phase::Mature);
        assert_eq!(curve.phase_at_month(120), Phase::Mature);
    }

    #[test]
    fn test_value_continuous_across_boundaries() {
        let curve = test_curve();
        let before = curve.value_at_month(23);
        let at = curve.value_at_month(24);
        let after = curve.value_at_month(25);
        assert!(before < at && at < after);

        // Growth regime compounds from the handover value
        let one_year_in = curve.value_at_month(36);
        assert_abs_diff_eq!(one_year_in, curve.handover_value() * 1.08, epsilon = 1.0);

        // Mature regime compounds from the growth boundary
        let mature = curve.value_at_month(72);
        assert_abs_diff_eq!(
            mature,
            curve.growth_boundary_value() * 1.04,
            epsilon = 1.0
        );
    }

    #[test]
    fn test_monotonic_for_positive_rates() {
        let curve = test_curve();
        let mut prior = 0.0;
        for month in 0..=180 {
            let value = curve.value_at_month(month);
            assert!(value >= prior, "value dipped at month {}", month);
            prior = value;
        }
    }

    #[test]
    fn test_extreme_negative_rate_never_nan() {
        let curve = AppreciationCurve::new(
            1_000_000.0,
            24,
            PhasedRates {
                construction_rate_pct: -150.0,
                growth_rate_pct: 5.0,
                mature_rate_pct: 5.0,
                growth_years: 2,
            },
        );
        let value = curve.value_at_month(12);
        assert!(value.is_finite());
        assert_eq!(value, 0.0);
    }

    #[test]
    fn test_flat_curve_year_convention() {
        let flat = FlatCurve::new(1_200_000.0, 5.0);
        assert_abs_diff_eq!(flat.value_at_year(1), 1_200_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(flat.value_at_year(2), 1_260_000.0, epsilon = 1e-6);
        assert_abs_diff_eq!(
            flat.value_at_year(10),
            1_200_000.0 * 1.05_f64.powi(9),
            epsilon = 1e-6
        );
    }
}
