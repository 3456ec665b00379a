//! Amortizing loan math: level annuity payment and month-by-month schedules

use serde::{Deserialize, Serialize};

/// Level monthly payment for a fixed-rate loan using the standard annuity
/// formula `P * r(1+r)^n / ((1+r)^n - 1)`.
///
/// A zero rate falls back to straight-line `principal / months`; a zero
/// term or non-positive principal yields no payment (validation flags
/// those inputs, the math stays finite).
pub fn monthly_payment(principal: f64, annual_rate_pct: f64, term_years: u32) -> f64 {
    let months = term_years.saturating_mul(12);
    if months == 0 || principal <= 0.0 {
        return 0.0;
    }
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;
    if monthly_rate.abs() < 1e-12 {
        return principal / months as f64;
    }
    let factor = (1.0 + monthly_rate).powi(months as i32);
    principal * monthly_rate * factor / (factor - 1.0)
}

/// One month of an amortization schedule
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LoanInstallment {
    /// Month number, 1-based
    pub month: u32,

    /// Cash paid this month (interest + principal)
    pub payment: f64,

    /// Interest portion: balance at start of month times the monthly rate
    pub interest: f64,

    /// Principal portion, capped at the remaining balance
    pub principal: f64,

    /// Balance after this payment
    pub balance: f64,
}

/// Amortization schedule over a requested window of months
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub principal: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub monthly_payment: f64,
    pub installments: Vec<LoanInstallment>,
}

impl LoanSchedule {
    /// Balance after `months` payments. Month 0 is the original principal;
    /// past the materialized window the last row's balance applies, which
    /// is exactly zero for a schedule run to term.
    pub fn balance_after(&self, months: u32) -> f64 {
        if self.principal <= 0.0 {
            return 0.0;
        }
        if months == 0 || self.installments.is_empty() {
            return self.principal;
        }
        let idx = (months as usize).min(self.installments.len());
        self.installments[idx - 1].balance
    }

    /// Principal repaid across a window of months (1-based, inclusive)
    pub fn principal_between(&self, from_month: u32, to_month: u32) -> f64 {
        self.window(from_month, to_month).iter().map(|i| i.principal).sum()
    }

    /// Cash paid across a window of months (1-based, inclusive)
    pub fn paid_between(&self, from_month: u32, to_month: u32) -> f64 {
        self.window(from_month, to_month).iter().map(|i| i.payment).sum()
    }

    pub fn total_interest(&self) -> f64 {
        self.installments.iter().map(|i| i.interest).sum()
    }

    pub fn total_principal(&self) -> f64 {
        self.installments.iter().map(|i| i.principal).sum()
    }

    fn window(&self, from_month: u32, to_month: u32) -> &[LoanInstallment] {
        if from_month == 0 || from_month > to_month {
            return &[];
        }
        let start = (from_month as usize - 1).min(self.installments.len());
        let end = (to_month as usize).min(self.installments.len());
        &self.installments[start..end]
    }
}

/// Amortize a loan for up to `for_months` months.
///
/// Each month: interest = balance x monthly rate; principal = payment -
/// interest, capped at the remaining balance; the final scheduled month
/// clears the balance exactly so it never goes negative and ends at 0.0
/// precisely at term. Rows past an early payoff carry zeros so the row
/// count stays `min(for_months, term months)`.
pub fn amortize(
    principal: f64,
    annual_rate_pct: f64,
    term_years: u32,
    for_months: u32,
) -> LoanSchedule {
    let term_months = term_years.saturating_mul(12);
    let payment = monthly_payment(principal, annual_rate_pct, term_years);
    let monthly_rate = annual_rate_pct / 100.0 / 12.0;

    let mut schedule = LoanSchedule {
        principal,
        annual_rate_pct,
        term_years,
        monthly_payment: payment,
        installments: Vec::new(),
    };
    if principal <= 0.0 || term_months == 0 {
        return schedule;
    }

    let months = for_months.min(term_months);
    schedule.installments.reserve(months as usize);
    let mut balance = principal;

    for month in 1..=months {
        let interest = if balance > 0.0 { balance * monthly_rate } else { 0.0 };
        let principal_portion = if month == term_months {
            // Clamp the final payment so the balance lands on exactly zero
            balance
        } else {
            (payment - interest).min(balance).max(0.0)
        };
        balance -= principal_portion;

        schedule.installments.push(LoanInstallment {
            month,
            payment: interest + principal_portion,
            interest,
            principal: principal_portion,
            balance,
        });
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_payment_matches_closed_form() {
        // 720k at 4.5% over 25 years
        let payment = monthly_payment(720_000.0, 4.5, 25);

        let r: f64 = 0.045 / 12.0;
        let factor = (1.0 + r).powi(300);
        let expected = 720_000.0 * r * factor / (factor - 1.0);
        assert_abs_diff_eq!(payment, expected, epsilon = 1e-9);
        assert_abs_diff_eq!(payment, 4_001.99, epsilon = 0.05);
    }

    #[test]
    fn test_zero_rate_straight_line() {
        let payment = monthly_payment(120_000.0, 0.0, 10);
        assert_abs_diff_eq!(payment, 1_000.0, epsilon = 1e-9);

        let schedule = amortize(120_000.0, 0.0, 10, 120);
        assert_eq!(schedule.installments.len(), 120);
        assert!(schedule.installments.iter().all(|i| i.interest == 0.0));
        assert_eq!(schedule.installments[119].balance, 0.0);
    }

    #[test]
    fn test_degenerate_inputs_stay_finite() {
        assert_eq!(monthly_payment(500_000.0, 4.0, 0), 0.0);
        assert_eq!(monthly_payment(0.0, 4.0, 25), 0.0);
        assert_eq!(monthly_payment(-10.0, 4.0, 25), 0.0);

        let schedule = amortize(0.0, 4.0, 25, 300);
        assert!(schedule.installments.is_empty());
        assert_eq!(schedule.balance_after(60), 0.0);
    }

    #[test]
    fn test_amortization_closure() {
        let schedule = amortize(720_000.0, 4.5, 25, 300);
        assert_eq!(schedule.installments.len(), 300);

        // Principal portions telescope back to the original principal
        let total_principal = schedule.total_principal();
        assert_abs_diff_eq!(total_principal, 720_000.0, epsilon = 1e-6);

        // Balance ends at exactly zero and never dips below it
        assert_eq!(schedule.installments[299].balance, 0.0);
        assert!(schedule.installments.iter().all(|i| i.balance >= 0.0));

        // Balance decreases monotonically
        for pair in schedule.installments.windows(2) {
            assert!(pair[1].balance <= pair[0].balance);
        }
    }

    #[test]
    fn test_requested_window_caps_at_term() {
        let schedule = amortize(100_000.0, 5.0, 5, 120);
        assert_eq!(schedule.installments.len(), 60);

        let partial = amortize(100_000.0, 5.0, 5, 24);
        assert_eq!(partial.installments.len(), 24);
        assert!(partial.installments[23].balance > 0.0);
    }

    #[test]
    fn test_balance_after_and_windows() {
        let schedule = amortize(720_000.0, 4.5, 25, 300);

        assert_abs_diff_eq!(schedule.balance_after(0), 720_000.0, epsilon = 1e-9);
        assert_eq!(schedule.balance_after(300), 0.0);
        assert_eq!(schedule.balance_after(400), 0.0);

        // First-year principal equals the balance drawdown
        let year1_principal = schedule.principal_between(1, 12);
        assert_abs_diff_eq!(
            year1_principal,
            720_000.0 - schedule.balance_after(12),
            epsilon = 1e-6
        );

        // Interior months pay the level payment
        let year1_paid = schedule.paid_between(1, 12);
        assert_abs_diff_eq!(
            year1_paid,
            schedule.monthly_payment * 12.0,
            epsilon = 1e-6
        );
    }
}
