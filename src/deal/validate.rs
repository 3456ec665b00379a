//! Non-fatal input validation
//!
//! Invariant violations never abort a computation: results carry a
//! `ValidationReport` alongside fully computed numbers so callers can
//! surface what is wrong next to the figures themselves.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::data::{MonthYear, OffPlanDeal, SecondaryDeal, MAX_LTV_PCT};

/// Allowed drift when payment percents are summed against 100
pub const PERCENT_TOLERANCE: f64 = 0.5;

/// A single finding against the inputs
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ValidationIssue {
    #[error("payment percents sum to {total:.2}, expected 100 within {tolerance} points")]
    PercentClosure { total: f64, tolerance: f64 },

    #[error("{field} must be positive, got {value}")]
    NonPositive { field: String, value: f64 },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: String, value: f64 },

    #[error("{field} is {value}, outside 0-100")]
    PercentOutOfRange { field: String, value: f64 },

    #[error("declared financing is {declared_pct:.1}% of price, above the {cap_pct:.0}% cap")]
    LtvAboveCap { declared_pct: f64, cap_pct: f64 },

    #[error("handover {handover} is not after booking {booking}")]
    HandoverNotAfterBooking {
        booking: MonthYear,
        handover: MonthYear,
    },

    #[error("mortgage term is zero years")]
    ZeroMortgageTerm,
}

/// Outcome of validating one deal's inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// False whenever any finding is present
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Self {
        Self {
            is_valid: issues.is_empty(),
            issues,
        }
    }

    pub fn clean() -> Self {
        Self::from_issues(Vec::new())
    }

    /// Merge two reports into one combined finding list
    pub fn merged(&self, other: &ValidationReport) -> ValidationReport {
        let mut issues = self.issues.clone();
        issues.extend(other.issues.iter().cloned());
        Self::from_issues(issues)
    }

    pub fn has(&self, predicate: impl Fn(&ValidationIssue) -> bool) -> bool {
        self.issues.iter().any(predicate)
    }
}

fn check_non_positive(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) {
    if value <= 0.0 {
        issues.push(ValidationIssue::NonPositive {
            field: field.to_string(),
            value,
        });
    }
}

fn check_negative(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) {
    if value < 0.0 {
        issues.push(ValidationIssue::Negative {
            field: field.to_string(),
            value,
        });
    }
}

fn check_percent_range(issues: &mut Vec<ValidationIssue>, field: &str, value: f64) {
    if !(0.0..=100.0).contains(&value) {
        issues.push(ValidationIssue::PercentOutOfRange {
            field: field.to_string(),
            value,
        });
    }
}

/// Validate off-plan inputs; every finding is non-fatal
pub fn validate_off_plan(deal: &OffPlanDeal) -> ValidationReport {
    let mut issues = Vec::new();

    check_non_positive(&mut issues, "base_price", deal.base_price);
    check_negative(&mut issues, "down_payment_pct", deal.down_payment_pct);
    check_negative(&mut issues, "booking_fee", deal.booking_fee);
    check_negative(&mut issues, "admin_fee", deal.admin_fee);
    check_negative(&mut issues, "registration_fee_pct", deal.registration_fee_pct);

    let total = deal.declared_pct_total();
    if (total - 100.0).abs() > PERCENT_TOLERANCE {
        issues.push(ValidationIssue::PercentClosure {
            total,
            tolerance: PERCENT_TOLERANCE,
        });
    }

    let handover = deal.handover_month_year();
    if deal.booking.months_until(&handover) <= 0 {
        issues.push(ValidationIssue::HandoverNotAfterBooking {
            booking: deal.booking,
            handover,
        });
    }

    ValidationReport::from_issues(issues)
}

/// Validate secondary inputs; every finding is non-fatal
pub fn validate_secondary(deal: &SecondaryDeal) -> ValidationReport {
    let mut issues = Vec::new();

    check_non_positive(&mut issues, "price", deal.price);
    check_negative(&mut issues, "area_sqft", deal.area_sqft);
    check_negative(&mut issues, "closing_costs_pct", deal.closing_costs_pct);
    check_negative(&mut issues, "service_charge_per_sqft", deal.service_charge_per_sqft);
    check_percent_range(&mut issues, "occupancy_pct", deal.occupancy_pct);
    check_percent_range(&mut issues, "operating_expense_pct", deal.operating_expense_pct);
    check_percent_range(&mut issues, "management_fee_pct", deal.management_fee_pct);

    if let Some(mortgage) = &deal.mortgage {
        if mortgage.term_years == 0 {
            issues.push(ValidationIssue::ZeroMortgageTerm);
        }
        let declared = deal.declared_ltv_pct();
        if declared > MAX_LTV_PCT {
            issues.push(ValidationIssue::LtvAboveCap {
                declared_pct: declared,
                cap_pct: MAX_LTV_PCT,
            });
        }
    }

    ValidationReport::from_issues(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::data::{
        Financing, Handover, Mortgage, PaymentMilestone, PhasedRates,
    };

    fn valid_off_plan() -> OffPlanDeal {
        let mut deal = OffPlanDeal::new(
            2_000_000.0,
            20.0,
            60.0,
            50_000.0,
            3_000.0,
            MonthYear::new(1, 2024),
            Handover::Month {
                month: 1,
                year: 2026,
            },
            PhasedRates {
                construction_rate_pct: 12.0,
                growth_rate_pct: 8.0,
                mature_rate_pct: 4.0,
                growth_years: 3,
            },
            7.0,
            3.0,
        );
        // 20 down + 10 + 30 installments + 40 completion = 100
        deal.milestones.push(PaymentMilestone::at_month(1, 12, 10.0));
        deal.milestones.push(PaymentMilestone::at_month(2, 18, 30.0));
        deal
    }

    #[test]
    fn test_valid_deal_is_clean() {
        let report = validate_off_plan(&valid_off_plan());
        assert!(report.is_valid, "unexpected issues: {:?}", report.issues);
    }

    #[test]
    fn test_percent_closure_flagged_not_fatal() {
        let mut deal = valid_off_plan();
        deal.milestones.pop();

        let report = validate_off_plan(&deal);
        assert!(!report.is_valid);
        assert!(report.has(|i| matches!(
            i,
            ValidationIssue::PercentClosure { total, .. } if (*total - 70.0).abs() < 1e-9
        )));
    }

    #[test]
    fn test_closure_tolerance_band() {
        let mut deal = valid_off_plan();
        deal.down_payment_pct = 20.4;
        assert!(validate_off_plan(&deal).is_valid);

        deal.down_payment_pct = 20.6;
        assert!(!validate_off_plan(&deal).is_valid);
    }

    #[test]
    fn test_handover_ordering() {
        let mut deal = valid_off_plan();
        deal.handover = Handover::Month {
            month: 1,
            year: 2024,
        };
        let report = validate_off_plan(&deal);
        assert!(report.has(|i| matches!(i, ValidationIssue::HandoverNotAfterBooking { .. })));
    }

    #[test]
    fn test_secondary_ltv_cap_finding() {
        let mut deal = SecondaryDeal::new(1_200_000.0, 650.0, 6.0, 7.0, 2.0, 5.0, 22.0);
        deal.mortgage = Some(Mortgage {
            financing: Financing::Percent(85.0),
            annual_rate_pct: 4.5,
            term_years: 25,
        });

        let report = validate_secondary(&deal);
        assert!(!report.is_valid);
        assert!(report.has(|i| matches!(i, ValidationIssue::LtvAboveCap { .. })));
    }

    #[test]
    fn test_issue_messages_render() {
        let issue = ValidationIssue::PercentClosure {
            total: 70.0,
            tolerance: PERCENT_TOLERANCE,
        };
        assert_eq!(
            issue.to_string(),
            "payment percents sum to 70.00, expected 100 within 0.5 points"
        );
    }
}
