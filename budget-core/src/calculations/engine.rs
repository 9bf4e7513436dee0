//! The budget entry point: one immutable [`BudgetInput`] in, one fresh
//! [`BudgetResult`] out.
//!
//! The pipeline runs the deduction calculator, derives disposable income,
//! totals expenses, classifies the budget zone and runs the fund allocator
//! twice (recommended, then custom when requested). Every step is total, so
//! [`BudgetEngine::compute`] cannot fail.

use rust_decimal::Decimal;
use tracing::{debug, debug_span};

use crate::calculations::allocator::FundAllocator;
use crate::calculations::common::{clamp, non_negative};
use crate::calculations::disposable::DisposableIncome;
use crate::calculations::expenses::{expense_ratio, total_monthly_expenses};
use crate::calculations::tax::DeductionCalculator;
use crate::calculations::zones::classify;
use crate::models::{AllocationPolicy, AllocationRequest, BudgetInput, BudgetResult, TaxPolicy};

#[derive(Debug, Clone)]
pub struct BudgetEngine {
    tax_policy: TaxPolicy,
    allocation_policy: AllocationPolicy,
}

impl BudgetEngine {
    pub fn new(
        tax_policy: TaxPolicy,
        allocation_policy: AllocationPolicy,
    ) -> Self {
        Self {
            tax_policy,
            allocation_policy,
        }
    }

    pub fn compute(
        &self,
        input: &BudgetInput,
    ) -> BudgetResult {
        let _span = debug_span!("compute_budget", region = %input.region).entered();

        let summary = DeductionCalculator::new(&self.tax_policy).calculate(
            input.gross_annual_income,
            &input.region,
            input.retirement_pct,
        );
        let gross = non_negative(input.gross_annual_income);
        let disposable = DisposableIncome::derive(gross, summary.total);
        let total_expenses = total_monthly_expenses(&input.monthly_expenses);
        let ratio = expense_ratio(total_expenses, disposable.monthly);
        let zone = classify(ratio, &self.allocation_policy.zones);

        let allocator = FundAllocator::new(&self.allocation_policy);
        let recommended = allocator.recommended(disposable.monthly, total_expenses, zone);
        let custom = match input.allocation {
            AllocationRequest::Recommended => None,
            AllocationRequest::Custom {
                savings_pct,
                investments_pct,
            } => {
                let (savings_pct, investments_pct) =
                    self.validate_custom(savings_pct, investments_pct);
                Some(allocator.allocate(
                    disposable.monthly,
                    total_expenses,
                    zone,
                    savings_pct,
                    investments_pct,
                ))
            }
        };

        debug!(
            monthly_disposable = %disposable.monthly,
            %total_expenses,
            %ratio,
            %zone,
            "budget computed"
        );

        BudgetResult {
            deductions: summary.deductions,
            total_deductions: summary.total,
            annual_disposable: disposable.annual,
            monthly_disposable: disposable.monthly,
            total_monthly_expenses: total_expenses,
            expense_ratio: ratio,
            zone,
            recommended,
            custom,
        }
    }

    /// Clamps custom percentages into `[0, policy maximum]`.
    fn validate_custom(
        &self,
        savings_pct: Decimal,
        investments_pct: Decimal,
    ) -> (Decimal, Decimal) {
        let policy = &self.allocation_policy;
        let savings = clamp(savings_pct, Decimal::ZERO, policy.max_savings_pct);
        let investments = clamp(investments_pct, Decimal::ZERO, policy.max_investments_pct);
        if savings != savings_pct || investments != investments_pct {
            debug!(
                %savings_pct,
                %investments_pct,
                %savings,
                %investments,
                "custom percentages clamped"
            );
        }
        (savings, investments)
    }
}
