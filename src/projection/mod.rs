//! Ten-year projections for both acquisition structures

use serde::{Deserialize, Serialize};

mod offplan;
mod rows;
mod secondary;

pub use offplan::{OffPlanEngine, OffPlanProjection};
pub use rows::{ProjectionSummary, YearlyProjection};
pub use secondary::{
    SecondaryEngine, SecondaryProjection, Year1Metrics, SERVICE_CHARGE_INFLATION_PCT,
};

/// Years covered by every projection series
pub const HORIZON_YEARS: u32 = 10;

/// Month horizon matching [`HORIZON_YEARS`]
pub const HORIZON_MONTHS: u32 = HORIZON_YEARS * 12;

/// Which letting strategy a secondary figure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RentalMode {
    LongTerm,
    ShortTerm,
}

impl RentalMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalMode::LongTerm => "long_term",
            RentalMode::ShortTerm => "short_term",
        }
    }
}
