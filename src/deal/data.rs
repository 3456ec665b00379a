//! Deal input structures matching the saved quote format

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Statutory land-department transfer fee, percent of base price
fn default_registration_fee_pct() -> f64 {
    4.0
}

/// A calendar month without a day component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthYear {
    /// Month number, 1-12
    pub month: u32,
    /// Calendar year
    pub year: i32,
}

impl MonthYear {
    pub fn new(month: u32, year: i32) -> Self {
        Self { month, year }
    }

    /// Month arithmetic normalized across year boundaries
    pub fn add_months(&self, months: u32) -> MonthYear {
        let zero_based = self.year * 12 + (self.month as i32 - 1) + months as i32;
        MonthYear {
            month: (zero_based.rem_euclid(12) + 1) as u32,
            year: zero_based.div_euclid(12),
        }
    }

    /// Signed month count from `self` to `other`
    pub fn months_until(&self, other: &MonthYear) -> i32 {
        (other.year * 12 + other.month as i32) - (self.year * 12 + self.month as i32)
    }

    /// First day of the month; month is normalized so only absurd years fall through
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month.clamp(1, 12), 1).unwrap_or(NaiveDate::MIN)
    }
}

impl std::fmt::Display for MonthYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// Handover timing as captured on the form: exact month or quarter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Handover {
    Month { month: u32, year: i32 },
    Quarter { quarter: u32, year: i32 },
}

impl Handover {
    /// Resolve to a concrete month; a quarter resolves to its last month
    /// ("Q4 2026" means delivery by end of December 2026)
    pub fn month_year(&self) -> MonthYear {
        match *self {
            Handover::Month { month, year } => MonthYear::new(month, year),
            Handover::Quarter { quarter, year } => MonthYear::new(quarter.clamp(1, 4) * 3, year),
        }
    }
}

/// What a milestone's trigger value means
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "trigger_value", rename_all = "lowercase")]
pub enum MilestoneTrigger {
    /// Months from booking
    Time(u32),
    /// Cumulative construction-percentage threshold; mapped to a month
    /// for sequencing only, never prorating the cash amount
    Construction(f64),
}

impl MilestoneTrigger {
    /// Effective month from booking used for ordering and display dates
    pub fn effective_month(&self, construction_months: u32) -> u32 {
        match *self {
            MilestoneTrigger::Time(months) => months,
            MilestoneTrigger::Construction(pct) => {
                ((pct / 100.0) * construction_months as f64).round() as u32
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MilestoneTrigger::Time(_) => "time",
            MilestoneTrigger::Construction(_) => "construction",
        }
    }
}

/// A single pre-handover installment milestone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentMilestone {
    /// Identifier unique within the deal
    pub id: u32,

    /// Trigger kind and value (time offset or construction percentage)
    #[serde(flatten)]
    pub trigger: MilestoneTrigger,

    /// Installment size as percent of base price
    pub payment_pct: f64,
}

impl PaymentMilestone {
    pub fn at_month(id: u32, months: u32, payment_pct: f64) -> Self {
        Self {
            id,
            trigger: MilestoneTrigger::Time(months),
            payment_pct,
        }
    }

    pub fn at_construction_pct(id: u32, pct: f64, payment_pct: f64) -> Self {
        Self {
            id,
            trigger: MilestoneTrigger::Construction(pct),
            payment_pct,
        }
    }
}

/// Installment due a fixed number of months after handover
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PostHandoverMilestone {
    pub id: u32,
    pub months_after_handover: u32,
    pub payment_pct: f64,
}

/// Post-handover payment plan: a declared on-handover percent followed by
/// installments at flat month offsets from handover
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostHandoverPlan {
    pub on_handover_pct: f64,
    #[serde(default)]
    pub milestones: Vec<PostHandoverMilestone>,
}

/// Annual appreciation rates for the three value regimes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhasedRates {
    /// Annual rate from booking to handover, percent
    pub construction_rate_pct: f64,

    /// Annual rate for the growth window after handover, percent
    pub growth_rate_pct: f64,

    /// Annual rate once the growth window ends, percent
    pub mature_rate_pct: f64,

    /// Growth window length in years
    pub growth_years: u32,
}

/// Off-plan acquisition inputs as captured on the quote form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffPlanDeal {
    /// Contract price of the unit
    pub base_price: f64,

    /// Down payment as percent of base price
    pub down_payment_pct: f64,

    /// Percent of base price paid before handover (down payment plus installments)
    pub pre_handover_pct: f64,

    /// Declared EOI/booking fee; clipped to the down-payment amount
    pub booking_fee: f64,

    /// Administrative ("oqood") registration fee, flat amount due at booking
    pub admin_fee: f64,

    /// Land-department registration fee, percent of base price
    #[serde(default = "default_registration_fee_pct")]
    pub registration_fee_pct: f64,

    /// Booking month
    pub booking: MonthYear,

    /// Declared handover timing
    pub handover: Handover,

    /// Pre-handover installment milestones
    #[serde(default)]
    pub milestones: Vec<PaymentMilestone>,

    /// Phased appreciation assumptions
    pub appreciation: PhasedRates,

    /// First-year rental yield as percent of base price
    pub rental_yield_pct: f64,

    /// Annual rent growth after handover, percent
    #[serde(default)]
    pub rent_growth_pct: f64,

    /// Optional post-handover payment plan; absent means pre-handover-only
    #[serde(default)]
    pub post_handover: Option<PostHandoverPlan>,
}

impl OffPlanDeal {
    /// Create a deal with no installment milestones and no post-handover plan
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        base_price: f64,
        down_payment_pct: f64,
        pre_handover_pct: f64,
        booking_fee: f64,
        admin_fee: f64,
        booking: MonthYear,
        handover: Handover,
        appreciation: PhasedRates,
        rental_yield_pct: f64,
        rent_growth_pct: f64,
    ) -> Self {
        Self {
            base_price,
            down_payment_pct,
            pre_handover_pct,
            booking_fee,
            admin_fee,
            registration_fee_pct: default_registration_fee_pct(),
            booking,
            handover,
            milestones: Vec::new(),
            appreciation,
            rental_yield_pct,
            rent_growth_pct,
            post_handover: None,
        }
    }

    /// Down payment in currency
    pub fn down_payment_amount(&self) -> f64 {
        self.base_price * (self.down_payment_pct / 100.0)
    }

    /// Booking fee after clipping to the down-payment amount
    pub fn booking_fee_actual(&self) -> f64 {
        self.booking_fee.min(self.down_payment_amount())
    }

    /// Down payment still due at booking after the fee is applied
    pub fn remaining_down_payment(&self) -> f64 {
        self.down_payment_amount() - self.booking_fee_actual()
    }

    /// Statutory registration fee in currency
    pub fn registration_fee(&self) -> f64 {
        self.base_price * (self.registration_fee_pct / 100.0)
    }

    /// Resolved handover month
    pub fn handover_month_year(&self) -> MonthYear {
        self.handover.month_year()
    }

    /// Months from booking to handover; clamped at zero when the declared
    /// handover precedes booking (flagged by validation)
    pub fn construction_months(&self) -> u32 {
        self.booking
            .months_until(&self.handover_month_year())
            .max(0) as u32
    }

    /// Completion percent due at handover: the post-handover plan's declared
    /// on-handover percent, otherwise the balance of the pre-handover split
    pub fn completion_pct(&self) -> f64 {
        match &self.post_handover {
            Some(plan) => plan.on_handover_pct,
            None => 100.0 - self.pre_handover_pct,
        }
    }

    /// Handover/completion payment in currency
    pub fn handover_payment(&self) -> f64 {
        self.base_price * (self.completion_pct() / 100.0)
    }

    /// Sum of every declared percent: down payment, installments,
    /// completion, and any post-handover installments
    pub fn declared_pct_total(&self) -> f64 {
        let milestones: f64 = self.milestones.iter().map(|m| m.payment_pct).sum();
        let post: f64 = self
            .post_handover
            .as_ref()
            .map(|p| p.milestones.iter().map(|m| m.payment_pct).sum())
            .unwrap_or(0.0);
        self.down_payment_pct + milestones + self.completion_pct() + post
    }

    /// Calendar month at an offset from booking
    pub fn calendar_at(&self, months_from_booking: u32) -> MonthYear {
        self.booking.add_months(months_from_booking)
    }

    /// Projection year containing a month offset (year 1 = months 0-11)
    pub fn projection_year(&self, months_from_booking: u32) -> u32 {
        months_from_booking / 12 + 1
    }
}

/// How a mortgage principal is declared
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", content = "value", rename_all = "lowercase")]
pub enum Financing {
    /// Percent of purchase price
    Percent(f64),
    /// Fixed amount, capped at the policy loan-to-value limit
    Amount(f64),
}

/// Mortgage terms for a secondary purchase
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Mortgage {
    pub financing: Financing,
    pub annual_rate_pct: f64,
    pub term_years: u32,
}

/// Policy cap on loan-to-value, percent
pub const MAX_LTV_PCT: f64 = 80.0;

/// Secondary (ready) acquisition inputs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SecondaryDeal {
    /// Purchase price
    pub price: f64,

    /// Unit area in square feet
    pub area_sqft: f64,

    /// Closing costs as percent of price
    pub closing_costs_pct: f64,

    /// Long-term rental yield as percent of price
    pub rental_yield_pct: f64,

    /// Annual long-term rent growth, percent
    #[serde(default)]
    pub rent_growth_pct: f64,

    /// Short-term average nightly rate
    #[serde(default)]
    pub nightly_rate: f64,

    /// Short-term occupancy, percent of the year
    #[serde(default)]
    pub occupancy_pct: f64,

    /// Short-term operating expenses, percent of gross
    #[serde(default)]
    pub operating_expense_pct: f64,

    /// Short-term management fee, percent of gross
    #[serde(default)]
    pub management_fee_pct: f64,

    /// Annual nightly-rate growth, percent
    #[serde(default)]
    pub nightly_rate_growth_pct: f64,

    /// Flat annual appreciation rate, percent
    pub appreciation_rate_pct: f64,

    /// Annual service charge per square foot
    pub service_charge_per_sqft: f64,

    /// Optional mortgage; absent means an all-cash purchase
    #[serde(default)]
    pub mortgage: Option<Mortgage>,
}

impl SecondaryDeal {
    /// Create an all-cash deal; set `mortgage` and the short-term fields
    /// directly for the richer variants
    pub fn new(
        price: f64,
        area_sqft: f64,
        closing_costs_pct: f64,
        rental_yield_pct: f64,
        rent_growth_pct: f64,
        appreciation_rate_pct: f64,
        service_charge_per_sqft: f64,
    ) -> Self {
        Self {
            price,
            area_sqft,
            closing_costs_pct,
            rental_yield_pct,
            rent_growth_pct,
            nightly_rate: 0.0,
            occupancy_pct: 0.0,
            operating_expense_pct: 0.0,
            management_fee_pct: 0.0,
            nightly_rate_growth_pct: 0.0,
            appreciation_rate_pct,
            service_charge_per_sqft,
            mortgage: None,
        }
    }

    /// Loan principal after applying the financing basis; fixed amounts are
    /// capped at the policy LTV limit
    pub fn loan_amount(&self) -> f64 {
        match self.mortgage {
            None => 0.0,
            Some(Mortgage { financing, .. }) => match financing {
                Financing::Percent(pct) => self.price * (pct / 100.0),
                Financing::Amount(amount) => amount.min(self.price * (MAX_LTV_PCT / 100.0)),
            },
        }
    }

    /// Loan-to-value of the declared financing, percent of price
    pub fn declared_ltv_pct(&self) -> f64 {
        if self.price <= 0.0 {
            return 0.0;
        }
        match self.mortgage {
            None => 0.0,
            Some(Mortgage { financing, .. }) => match financing {
                Financing::Percent(pct) => pct,
                Financing::Amount(amount) => amount / self.price * 100.0,
            },
        }
    }

    /// Closing costs in currency
    pub fn closing_costs(&self) -> f64 {
        self.price * (self.closing_costs_pct / 100.0)
    }

    /// Cash equity required at purchase
    pub fn equity(&self) -> f64 {
        self.price - self.loan_amount()
    }

    /// Cash required on day one: equity plus closing costs
    pub fn day_one_capital(&self) -> f64 {
        self.equity() + self.closing_costs()
    }

    /// Annual service charge for the unit
    pub fn annual_service_charge(&self) -> f64 {
        self.service_charge_per_sqft * self.area_sqft
    }
}

/// A saved quote: both acquisition structures stored verbatim plus the
/// exit months requested for comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Stable identifier used for caching and file naming
    pub id: String,

    #[serde(default)]
    pub label: String,

    pub off_plan: OffPlanDeal,

    pub secondary: SecondaryDeal,

    /// Requested exit points, in months from booking
    #[serde(default)]
    pub exit_months: Vec<u32>,
}
