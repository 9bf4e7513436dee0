//! Property tests for the budget engine invariants.

use budget_core::calculations::FundAllocator;
use budget_core::calculations::expenses::expense_ratio;
use budget_core::calculations::projection::{
    CompoundingFrequency, ContributionTiming, GrowthProjector, ProjectionInput,
    RequiredContributionInput,
};
use budget_core::calculations::tax::progressive_tax;
use budget_core::calculations::zones::classify;
use budget_core::{AllocationPolicy, BudgetZone, TaxBracket, TaxSchedule};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn federal_schedule() -> TaxSchedule {
    let bounds = [
        (dec!(0), Some(dec!(57375)), dec!(0.15)),
        (dec!(57375), Some(dec!(114750)), dec!(0.205)),
        (dec!(114750), Some(dec!(177882)), dec!(0.26)),
        (dec!(177882), Some(dec!(253414)), dec!(0.29)),
        (dec!(253414), None, dec!(0.33)),
    ];
    TaxSchedule::new(
        bounds
            .into_iter()
            .map(|(min_income, max_income, rate)| TaxBracket {
                min_income,
                max_income,
                rate,
            })
            .collect(),
    )
    .expect("valid schedule")
}

fn cents(max: i64) -> impl Strategy<Value = Decimal> {
    (0..=max).prop_map(|c| Decimal::new(c, 2))
}

fn frequency() -> impl Strategy<Value = CompoundingFrequency> {
    prop::sample::select(vec![
        CompoundingFrequency::Annually,
        CompoundingFrequency::SemiAnnually,
        CompoundingFrequency::Quarterly,
        CompoundingFrequency::Monthly,
        CompoundingFrequency::BiWeekly,
        CompoundingFrequency::Weekly,
        CompoundingFrequency::Daily,
    ])
}

fn timing() -> impl Strategy<Value = ContributionTiming> {
    prop::sample::select(vec![
        ContributionTiming::StartOfPeriod,
        ContributionTiming::EndOfPeriod,
    ])
}

proptest! {
    #[test]
    fn progressive_tax_is_monotonic(a in cents(50_000_000), b in cents(50_000_000)) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let schedule = federal_schedule();
        let tax_low = progressive_tax(&schedule, low);
        let tax_high = progressive_tax(&schedule, high);

        prop_assert!(tax_low <= tax_high);
        if low > Decimal::ZERO {
            // tax_low / low <= tax_high / high, cross-multiplied
            prop_assert!(tax_low * high <= tax_high * low);
        }
    }

    #[test]
    fn allocation_sums_to_surplus(
        disposable in cents(2_000_000),
        expenses in cents(2_500_000),
        savings_pct in 0i64..=150,
        investments_pct in 0i64..=150,
    ) {
        let policy = AllocationPolicy::default();
        let zone = classify(expense_ratio(expenses, disposable), &policy.zones);
        let allocation = FundAllocator::new(&policy).allocate(
            disposable,
            expenses,
            zone,
            Decimal::from(savings_pct),
            Decimal::from(investments_pct),
        );
        let remainder = disposable - expenses;

        prop_assert_eq!(allocation.total(), remainder);
        if remainder >= Decimal::ZERO {
            prop_assert!(allocation.monthly_savings >= Decimal::ZERO);
            prop_assert!(allocation.monthly_investments >= Decimal::ZERO);
            prop_assert!(allocation.monthly_cashflow >= Decimal::ZERO);
        }
    }

    #[test]
    fn investing_blocked_outside_green_zone(
        disposable in cents(2_000_000),
        expenses in cents(2_000_000),
        investments_pct in 0i64..=100,
        zone in prop::sample::select(vec![BudgetZone::Moderate, BudgetZone::Red]),
    ) {
        let policy = AllocationPolicy::default();
        let allocation = FundAllocator::new(&policy).allocate(
            disposable,
            expenses,
            zone,
            dec!(25),
            Decimal::from(investments_pct),
        );

        prop_assert_eq!(allocation.monthly_investments, Decimal::ZERO);
        if zone == BudgetZone::Red {
            prop_assert_eq!(allocation.monthly_savings, Decimal::ZERO);
        }
    }

    #[test]
    fn required_contribution_round_trips(
        starting_amount in cents(10_000_000),
        extra in cents(100_000_000),
        rate_bp in 1i64..=2_000,
        years in 1u32..=40,
        frequency in frequency(),
        timing in timing(),
    ) {
        let annual_rate_pct = Decimal::new(rate_bp, 2);
        let start_only = GrowthProjector::project(&ProjectionInput {
            starting_amount,
            contribution: Decimal::ZERO,
            annual_rate_pct,
            years,
            frequency,
            timing,
        })
        .expect("projection");
        let target_amount = start_only.future_value + extra;

        let contribution = GrowthProjector::required_contribution(&RequiredContributionInput {
            target_amount,
            starting_amount,
            annual_rate_pct,
            years,
            frequency,
            timing,
        })
        .expect("required contribution");
        let projected = GrowthProjector::project(&ProjectionInput {
            starting_amount,
            contribution,
            annual_rate_pct,
            years,
            frequency,
            timing,
        })
        .expect("projection");

        prop_assert!((projected.future_value - target_amount).abs() <= dec!(0.000001));
    }

    #[test]
    fn zero_rate_is_linear(
        starting_amount in cents(10_000_000),
        contribution in cents(1_000_000),
        years in 0u32..=50,
        frequency in frequency(),
        timing in timing(),
    ) {
        let projection = GrowthProjector::project(&ProjectionInput {
            starting_amount,
            contribution,
            annual_rate_pct: Decimal::ZERO,
            years,
            frequency,
            timing,
        })
        .expect("projection");
        let periods = Decimal::from(years) * Decimal::from(frequency.periods_per_year());

        prop_assert_eq!(projection.future_value, starting_amount + contribution * periods);
    }
}

#[test]
fn progressive_tax_is_continuous_at_bracket_boundaries() {
    let schedule = federal_schedule();
    let epsilon = dec!(0.01);

    for bracket in schedule.brackets() {
        let Some(boundary) = bracket.max_income else {
            continue;
        };
        let below = progressive_tax(&schedule, boundary - epsilon);
        let at = progressive_tax(&schedule, boundary);
        let above = progressive_tax(&schedule, boundary + epsilon);

        assert_eq!(at - below, epsilon * bracket.rate, "jump below {boundary}");
        assert!(above - at <= epsilon * dec!(0.33), "jump above {boundary}");
    }
}
