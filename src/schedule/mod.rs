//! Off-plan payment schedule resolution

mod builder;
mod events;

pub use builder::build_schedule;
pub use events::{PaymentEvent, PaymentKind, PaymentSchedule, ScheduleSummary};
