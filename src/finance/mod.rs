//! Leaf financial math shared by both acquisition engines

mod appreciation;
mod loan;

pub use appreciation::{AppreciationCurve, FlatCurve, Phase};
pub use loan::{amortize, monthly_payment, LoanInstallment, LoanSchedule};
