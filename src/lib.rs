//! Investment Engine - Projection and comparison engine for off-plan and secondary property deals
//!
//! This library provides:
//! - Milestone-based off-plan payment schedules with validation
//! - Phased appreciation curves and loan amortization
//! - Ten-year rental and wealth projections for both acquisition structures
//! - Head-to-head comparison metrics and arbitrary exit-month pricing
//! - Quote loading from JSON and listings from CSV

pub mod comparison;
pub mod deal;
pub mod finance;
pub mod projection;
pub mod scenario;
pub mod schedule;

// Re-export commonly used types
pub use comparison::{ComparisonMetrics, ComparisonReport, ExitScenario};
pub use deal::{OffPlanDeal, Quote, SecondaryDeal, ValidationReport};
pub use projection::{OffPlanEngine, SecondaryEngine, YearlyProjection};
pub use scenario::{QuoteRunner, ReportCache};
pub use schedule::{build_schedule, PaymentSchedule};
