//! Deal input structures, validation, and quote loading

mod data;
mod validate;
pub mod loader;

pub use data::{
    Financing, Handover, MilestoneTrigger, MonthYear, Mortgage, OffPlanDeal, PaymentMilestone,
    PhasedRates, PostHandoverMilestone, PostHandoverPlan, Quote, SecondaryDeal, MAX_LTV_PCT,
};
pub use loader::{load_listings, load_quote, load_quotes, QuoteLoadError};
pub use validate::{
    validate_off_plan, validate_secondary, ValidationIssue, ValidationReport, PERCENT_TOLERANCE,
};
