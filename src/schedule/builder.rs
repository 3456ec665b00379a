//! Off-plan payment schedule construction

use crate::deal::{validate_off_plan, MilestoneTrigger, OffPlanDeal};

use super::events::{PaymentEvent, PaymentKind, PaymentSchedule};

/// Resolve an off-plan deal into its ordered cash-outflow schedule.
///
/// Booking-day events come first (booking fee clipped to the down payment,
/// down payment balance, statutory registration fee, admin fee), then the
/// installment milestones ordered by effective month, the handover
/// balance, and any post-handover installments. Validation findings ride
/// along on the schedule; the events are produced either way.
pub fn build_schedule(deal: &OffPlanDeal) -> PaymentSchedule {
    let validation = validate_off_plan(deal);
    let construction_months = deal.construction_months();
    let mut schedule = PaymentSchedule::new(deal.base_price, construction_months, validation);

    push_event(
        &mut schedule,
        deal,
        0,
        PaymentKind::BookingFee,
        "EOI fee applied to down payment".to_string(),
        deal.booking_fee_actual(),
    );
    push_event(
        &mut schedule,
        deal,
        0,
        PaymentKind::DownPayment,
        format!("{}% down payment less booking fee", deal.down_payment_pct),
        deal.remaining_down_payment(),
    );
    push_event(
        &mut schedule,
        deal,
        0,
        PaymentKind::RegistrationFee,
        format!("{}% land-department registration", deal.registration_fee_pct),
        deal.registration_fee(),
    );
    push_event(
        &mut schedule,
        deal,
        0,
        PaymentKind::AdminFee,
        "Unit registration admin fee".to_string(),
        deal.admin_fee,
    );

    // Installments ordered by effective month, declaration order on ties.
    // Construction triggers map to a month for sequencing only; the cash
    // amount stays price x percent regardless of delivery pace.
    let mut milestones = deal.milestones.clone();
    milestones.sort_by_key(|m| (m.trigger.effective_month(construction_months), m.id));
    for milestone in &milestones {
        let month = milestone.trigger.effective_month(construction_months);
        let label = match milestone.trigger {
            MilestoneTrigger::Time(at) => {
                format!("{}% at month {}", milestone.payment_pct, at)
            }
            MilestoneTrigger::Construction(pct) => {
                format!("{}% at {}% construction", milestone.payment_pct, pct)
            }
        };
        push_event(
            &mut schedule,
            deal,
            month,
            PaymentKind::Installment,
            label,
            deal.base_price * (milestone.payment_pct / 100.0),
        );
    }

    push_event(
        &mut schedule,
        deal,
        construction_months,
        PaymentKind::Handover,
        format!("{}% on handover", deal.completion_pct()),
        deal.handover_payment(),
    );

    if let Some(plan) = &deal.post_handover {
        let mut post = plan.milestones.clone();
        post.sort_by_key(|m| (m.months_after_handover, m.id));
        for milestone in &post {
            push_event(
                &mut schedule,
                deal,
                construction_months + milestone.months_after_handover,
                PaymentKind::PostHandover,
                format!(
                    "{}% {} months after handover",
                    milestone.payment_pct, milestone.months_after_handover
                ),
                deal.base_price * (milestone.payment_pct / 100.0),
            );
        }
    }

    schedule.sort_events();
    schedule
}

fn push_event(
    schedule: &mut PaymentSchedule,
    deal: &OffPlanDeal,
    month: u32,
    kind: PaymentKind,
    label: String,
    amount: f64,
) {
    let calendar = deal.calendar_at(month);
    let pct_of_price = if deal.base_price > 0.0 {
        amount / deal.base_price * 100.0
    } else {
        0.0
    };
    schedule.add_event(PaymentEvent {
        month,
        calendar,
        date: calendar.first_day(),
        kind,
        label,
        pct_of_price,
        amount,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deal::{
        Handover, MonthYear, PaymentMilestone, PhasedRates, PostHandoverMilestone,
        PostHandoverPlan,
    };

    fn booking_2024_deal() -> OffPlanDeal {
        OffPlanDeal::new(
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
        )
    }

    #[test]
    fn test_booking_day_block() {
        let mut deal = booking_2024_deal();
        deal.milestones.push(PaymentMilestone::at_month(1, 12, 10.0));
        let schedule = build_schedule(&deal);

        let day_one: Vec<_> = schedule.events.iter().filter(|e| e.month == 0).collect();
        assert_eq!(day_one.len(), 4);
        assert_eq!(day_one[0].kind, PaymentKind::BookingFee);
        assert!((day_one[0].amount - 50_000.0).abs() < 1e-9);
        assert_eq!(day_one[1].kind, PaymentKind::DownPayment);
        assert!((day_one[1].amount - 350_000.0).abs() < 1e-9);
        assert_eq!(day_one[2].kind, PaymentKind::RegistrationFee);
        assert!((day_one[2].amount - 80_000.0).abs() < 1e-9);
        assert_eq!(day_one[3].kind, PaymentKind::AdminFee);
        assert!((day_one[3].amount - 3_000.0).abs() < 1e-9);

        assert!((schedule.day_one_capital() - 483_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_two_year_plan_events_and_dates() {
        let mut deal = booking_2024_deal();
        deal.milestones.push(PaymentMilestone::at_month(1, 12, 10.0));
        let schedule = build_schedule(&deal);

        // Declared percents total 70, so the closure finding rides along
        // while the events are still produced
        assert!(!schedule.validation.is_valid);

        let installment = schedule
            .events
            .iter()
            .find(|e| e.kind == PaymentKind::Installment)
            .unwrap();
        assert_eq!(installment.month, 12);
        assert_eq!(installment.calendar, MonthYear::new(1, 2025));
        assert!((installment.amount - 200_000.0).abs() < 1e-9);

        let handover = schedule.handover_event().unwrap();
        assert_eq!(handover.month, 24);
        assert_eq!(handover.calendar, MonthYear::new(1, 2026));
        assert!((handover.amount - 800_000.0).abs() < 1e-9);
        assert!((handover.pct_of_price - 40.0).abs() < 1e-9);

        assert!((schedule.capital_at_handover() - 683_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_construction_triggers_interleave_by_effective_month() {
        let mut deal = booking_2024_deal();
        deal.milestones.push(PaymentMilestone::at_month(1, 6, 10.0));
        deal.milestones
            .push(PaymentMilestone::at_construction_pct(2, 50.0, 10.0));
        deal.milestones.push(PaymentMilestone::at_month(3, 18, 10.0));
        let schedule = build_schedule(&deal);

        let months: Vec<u32> = schedule
            .events
            .iter()
            .filter(|e| e.kind == PaymentKind::Installment)
            .map(|e| e.month)
            .collect();
        // 50% of 24 construction months lands between the time triggers
        assert_eq!(months, vec![6, 12, 18]);

        let construction = &schedule.events[5];
        assert_eq!(construction.month, 12);
        assert_eq!(construction.label, "10% at 50% construction");
        // Amount is percent of price, untouched by the month mapping
        assert!((construction.amount - 200_000.0).abs() < 1e-9);
    }

    #[test]
    fn test_post_handover_plan_events() {
        let mut deal = booking_2024_deal();
        deal.milestones.push(PaymentMilestone::at_month(1, 12, 40.0));
        deal.post_handover = Some(PostHandoverPlan {
            on_handover_pct: 10.0,
            milestones: vec![
                PostHandoverMilestone {
                    id: 2,
                    months_after_handover: 24,
                    payment_pct: 15.0,
                },
                PostHandoverMilestone {
                    id: 1,
                    months_after_handover: 12,
                    payment_pct: 15.0,
                },
            ],
        });
        let schedule = build_schedule(&deal);

        let handover = schedule.handover_event().unwrap();
        assert!((handover.amount - 200_000.0).abs() < 1e-9);

        let post: Vec<_> = schedule
            .events
            .iter()
            .filter(|e| e.kind == PaymentKind::PostHandover)
            .collect();
        assert_eq!(post.len(), 2);
        assert_eq!(post[0].month, 36);
        assert_eq!(post[1].month, 48);
        assert_eq!(post[0].label, "15% 12 months after handover");

        // 20 + 40 + 10 + 30 closes at 100
        assert!(schedule.validation.is_valid);
    }

    #[test]
    fn test_oversized_booking_fee_clips() {
        let mut deal = booking_2024_deal();
        deal.booking_fee = 900_000.0;
        deal.milestones.push(PaymentMilestone::at_month(1, 12, 40.0));
        let schedule = build_schedule(&deal);

        let fee = &schedule.events[0];
        assert_eq!(fee.kind, PaymentKind::BookingFee);
        assert!((fee.amount - 400_000.0).abs() < 1e-9);
        let down = &schedule.events[1];
        assert_eq!(down.kind, PaymentKind::DownPayment);
        assert!(down.amount.abs() < 1e-9);
    }

    #[test]
    fn test_deterministic_rebuild() {
        let mut deal = booking_2024_deal();
        deal.milestones
            .push(PaymentMilestone::at_construction_pct(1, 30.0, 10.0));
        deal.milestones.push(PaymentMilestone::at_month(2, 7, 10.0));

        let a = build_schedule(&deal);
        let b = build_schedule(&deal);
        let a_json = serde_json::to_string(&a.events).unwrap();
        let b_json = serde_json::to_string(&b.events).unwrap();
        assert_eq!(a_json, b_json);
    }
}
