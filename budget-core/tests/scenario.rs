//! End-to-end budget computation for a $75,000 income.

use budget_core::{
    AllocationPolicy, AllocationRequest, BudgetEngine, BudgetInput, BudgetZone, DeductionKind,
    JurisdictionConfig, SignalStore, TaxBracket, TaxPolicy, TaxSchedule, publish_investment_hints,
    signals,
};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

fn engine() -> BudgetEngine {
    let federal = TaxSchedule::new(vec![
        TaxBracket {
            min_income: dec!(0),
            max_income: Some(dec!(57375)),
            rate: dec!(0.15),
        },
        TaxBracket {
            min_income: dec!(57375),
            max_income: Some(dec!(114750)),
            rate: dec!(0.205),
        },
        TaxBracket {
            min_income: dec!(114750),
            max_income: None,
            rate: dec!(0.26),
        },
    ])
    .expect("valid schedule");

    BudgetEngine::new(
        TaxPolicy::Progressive(JurisdictionConfig::new("CA", federal)),
        AllocationPolicy::default(),
    )
}

fn input() -> BudgetInput {
    BudgetInput::new(dec!(75000), "")
        .with_expense("rent", dec!(1400))
        .with_expense("groceries", dec!(450))
        .with_expense("transit", dec!(150))
        .with_allocation(AllocationRequest::Custom {
            savings_pct: dec!(15),
            investments_pct: dec!(20),
        })
}

#[test]
fn seventy_five_thousand_income_scenario() {
    let result = engine().compute(&input());

    assert_eq!(result.deductions.len(), 1);
    assert_eq!(result.deductions[0].kind, DeductionKind::FederalTax);
    // 57375 × 15% + 17625 × 20.5% = 8606.25 + 3613.125
    assert_eq!(result.total_deductions, dec!(12219.38));
    assert_eq!(result.annual_disposable, dec!(62780.62));
    assert_eq!(result.monthly_disposable, dec!(5231.72));
    assert_eq!(result.total_monthly_expenses, dec!(2000));
    assert_eq!(result.zone, BudgetZone::Green);

    let custom = result.custom.clone().expect("custom allocation");
    assert_eq!(custom.cash_buffer_target, dec!(523.17));
    assert_eq!(custom.monthly_savings, dec!(406.28));
    assert_eq!(custom.monthly_investments, dec!(541.71));
    assert_eq!(custom.monthly_cashflow, dec!(2283.73));
    assert_eq!(custom.total(), result.monthly_disposable - dec!(2000));
    assert!(custom.adequate_cashflow);

    let recommended = &result.recommended;
    assert_eq!(recommended.monthly_savings, dec!(1083.42));
    assert_eq!(recommended.monthly_investments, dec!(1625.13));
    assert_eq!(recommended.total(), result.monthly_surplus());
}

#[test]
fn scenario_publishes_custom_investment_hints() {
    let result = engine().compute(&input());
    let mut store = SignalStore::new();

    publish_investment_hints(&result, &mut store);

    assert_eq!(store.get(signals::MONTHLY_INVESTMENT), Some(dec!(541.71)));
    assert_eq!(store.get(signals::ANNUAL_INVESTMENT), Some(dec!(6500.52)));
}

#[test]
fn retirement_contribution_lowers_tax_and_disposable_income() {
    let without = engine().compute(&input());
    let with = engine().compute(&input().with_retirement_pct(dec!(5)));

    let federal = |r: &budget_core::BudgetResult| {
        r.deductions
            .iter()
            .find(|d| d.kind == DeductionKind::FederalTax)
            .map(|d| d.amount)
    };
    assert!(federal(&with) < federal(&without));
    assert!(with.monthly_disposable < without.monthly_disposable);
}
