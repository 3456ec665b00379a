//! Yearly projection rows shared by both acquisition engines

use serde::{Deserialize, Serialize};

/// One year of a ten-year projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YearlyProjection {
    /// Year index, 1-based
    pub year: u32,

    /// Calendar year the row covers
    pub calendar_year: i32,

    /// Property value at the year's opening month
    pub property_value: f64,

    /// Gross rent collected during the year
    pub gross_rent: f64,

    /// Rent after operating costs and service charges
    pub net_rent: f64,

    /// Net rent accumulated through the end of this year
    pub cumulative_rent: f64,

    /// Loan balance after this year's payments; zero when unmortgaged
    pub loan_balance: f64,

    /// Principal repaid during the year
    pub principal_paid: f64,

    /// Cash paid to the lender during the year
    pub debt_service: f64,

    /// Net rent less debt service
    pub net_cashflow: f64,

    /// Property value less loan balance
    pub equity: f64,

    /// Equity plus cumulative rent less capital invested
    pub wealth: f64,

    /// Year ends at or before handover; no rental income
    pub is_construction: bool,

    /// Year containing the handover month
    pub is_handover: bool,

    /// First year whose wealth exceeds the invested capital
    pub is_break_even: bool,
}

impl YearlyProjection {
    /// Zeroed row; engines fill the fields they model
    pub fn new(year: u32, calendar_year: i32) -> Self {
        Self {
            year,
            calendar_year,
            property_value: 0.0,
            gross_rent: 0.0,
            net_rent: 0.0,
            cumulative_rent: 0.0,
            loan_balance: 0.0,
            principal_paid: 0.0,
            debt_service: 0.0,
            net_cashflow: 0.0,
            equity: 0.0,
            wealth: 0.0,
            is_construction: false,
            is_handover: false,
            is_break_even: false,
        }
    }
}

/// Roll-up of a ten-year series for table footers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub years: u32,
    pub final_value: f64,
    pub final_equity: f64,
    pub total_net_rent: f64,
    pub final_wealth: f64,
    pub break_even_year: Option<u32>,
}

impl ProjectionSummary {
    pub fn from_rows(rows: &[YearlyProjection]) -> Self {
        let last = rows.last();
        Self {
            years: rows.len() as u32,
            final_value: last.map_or(0.0, |r| r.property_value),
            final_equity: last.map_or(0.0, |r| r.equity),
            total_net_rent: last.map_or(0.0, |r| r.cumulative_rent),
            final_wealth: last.map_or(0.0, |r| r.wealth),
            break_even_year: rows.iter().find(|r| r.is_break_even).map(|r| r.year),
        }
    }
}
