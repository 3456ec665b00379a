//! Payment schedule rows and their container

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::deal::{MonthYear, ValidationReport};

/// What a cash outflow pays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentKind {
    BookingFee,
    DownPayment,
    RegistrationFee,
    AdminFee,
    Installment,
    Handover,
    PostHandover,
}

impl PaymentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentKind::BookingFee => "Booking fee",
            PaymentKind::DownPayment => "Down payment balance",
            PaymentKind::RegistrationFee => "Registration fee",
            PaymentKind::AdminFee => "Admin fee",
            PaymentKind::Installment => "Installment",
            PaymentKind::Handover => "Handover payment",
            PaymentKind::PostHandover => "Post-handover installment",
        }
    }

    /// Display order for events falling in the same month
    fn rank(&self) -> u8 {
        match self {
            PaymentKind::BookingFee => 0,
            PaymentKind::DownPayment => 1,
            PaymentKind::RegistrationFee => 2,
            PaymentKind::AdminFee => 3,
            PaymentKind::Installment => 4,
            PaymentKind::Handover => 5,
            PaymentKind::PostHandover => 6,
        }
    }
}

/// One cash outflow with its trigger description and estimated date
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentEvent {
    /// Months from booking
    pub month: u32,

    /// Calendar month the outflow falls in
    pub calendar: MonthYear,

    /// Estimated date (first of the calendar month)
    pub date: NaiveDate,

    pub kind: PaymentKind,

    /// Trigger description, e.g. "10% at 60% construction"
    pub label: String,

    /// Share of base price, percent; zero for flat fees
    pub pct_of_price: f64,

    pub amount: f64,
}

/// Resolved off-plan payment schedule with its validation outcome
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSchedule {
    pub base_price: f64,

    /// Months from booking to handover
    pub construction_months: u32,

    /// Events ordered by month, then by kind within a month
    pub events: Vec<PaymentEvent>,

    pub validation: ValidationReport,
}

/// Roll-up totals for table footers
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleSummary {
    pub event_count: usize,
    pub total_amount: f64,
    pub total_pct_of_price: f64,
    pub day_one_capital: f64,
    pub capital_at_handover: f64,
}

impl PaymentSchedule {
    pub fn new(base_price: f64, construction_months: u32, validation: ValidationReport) -> Self {
        Self {
            base_price,
            construction_months,
            events: Vec::new(),
            validation,
        }
    }

    pub fn add_event(&mut self, event: PaymentEvent) {
        self.events.push(event);
    }

    /// Order events by month, kind rank within a month, insertion order last
    pub fn sort_events(&mut self) {
        self.events.sort_by_key(|e| (e.month, e.kind.rank()));
    }

    pub fn total_amount(&self) -> f64 {
        self.events.iter().map(|e| e.amount).sum()
    }

    /// Cash paid through a month offset, inclusive
    pub fn paid_through(&self, month: u32) -> f64 {
        self.events
            .iter()
            .filter(|e| e.month <= month)
            .map(|e| e.amount)
            .sum()
    }

    /// Booking-day outflows: booking fee, down payment balance, fees
    pub fn day_one_capital(&self) -> f64 {
        self.paid_through(0)
    }

    /// Day-one capital plus every pre-handover installment; the handover
    /// balance and post-handover installments stay out of this figure
    pub fn capital_at_handover(&self) -> f64 {
        let installments: f64 = self
            .events
            .iter()
            .filter(|e| e.kind == PaymentKind::Installment)
            .map(|e| e.amount)
            .sum();
        self.day_one_capital() + installments
    }

    pub fn handover_event(&self) -> Option<&PaymentEvent> {
        self.events.iter().find(|e| e.kind == PaymentKind::Handover)
    }

    pub fn summary(&self) -> ScheduleSummary {
        ScheduleSummary {
            event_count: self.events.len(),
            total_amount: self.total_amount(),
            total_pct_of_price: self.events.iter().map(|e| e.pct_of_price).sum(),
            day_one_capital: self.day_one_capital(),
            capital_at_handover: self.capital_at_handover(),
        }
    }
}
