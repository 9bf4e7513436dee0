//! Fund allocation of the monthly surplus.
//!
//! The surplus (monthly disposable income minus expenses) is split into
//! savings, investments and cashflow:
//!
//! 1. A cash buffer of `cash_buffer_pct`% of monthly disposable income is
//!    reserved first.
//! 2. If the surplus cannot cover the buffer, all of it stays as cashflow and
//!    the allocation is flagged as inadequate.
//! 3. Otherwise the requested percentages are applied to what is left after
//!    the buffer (the allocatable amount), after zeroing any percentage the
//!    budget zone forbids.
//! 4. Requests that add up to more than the allocatable amount are scaled
//!    down proportionally so they use it exactly.
//! 5. Cashflow takes the residual, so the three amounts always add up to the
//!    surplus.
//!
//! With zero or negative disposable income nothing is allocated and the
//! (possibly negative) surplus is reported as cashflow so callers can show a
//! deficit.

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{HUNDRED, clamp, non_negative, percent_of, round_half_up};
use crate::models::{Allocation, AllocationPolicy, BudgetZone};

#[derive(Debug, Clone)]
pub struct FundAllocator<'a> {
    policy: &'a AllocationPolicy,
}

impl<'a> FundAllocator<'a> {
    pub fn new(policy: &'a AllocationPolicy) -> Self {
        Self { policy }
    }

    /// Allocation at the policy's recommended percentages.
    pub fn recommended(
        &self,
        monthly_disposable: Decimal,
        total_expenses: Decimal,
        zone: BudgetZone,
    ) -> Allocation {
        self.allocate(
            monthly_disposable,
            total_expenses,
            zone,
            self.policy.recommended_savings_pct,
            self.policy.recommended_investments_pct,
        )
    }

    /// Allocation at the given 0–100 percentages of the allocatable amount.
    ///
    /// Percentages are expected to be validated by the caller; negative
    /// values are treated as zero.
    pub fn allocate(
        &self,
        monthly_disposable: Decimal,
        total_expenses: Decimal,
        zone: BudgetZone,
        savings_pct: Decimal,
        investments_pct: Decimal,
    ) -> Allocation {
        let remainder = monthly_disposable.saturating_sub(total_expenses);

        if monthly_disposable <= Decimal::ZERO {
            debug!(%monthly_disposable, %remainder, "no disposable income, nothing to allocate");
            return Allocation {
                monthly_savings: Decimal::ZERO,
                monthly_investments: Decimal::ZERO,
                monthly_cashflow: remainder,
                adequate_cashflow: false,
                cash_buffer_target: Decimal::ZERO,
            };
        }

        let cash_buffer_target = self.cash_buffer_target(monthly_disposable);

        if remainder < cash_buffer_target {
            debug!(%remainder, %cash_buffer_target, "surplus below cash buffer target");
            return Allocation {
                monthly_savings: Decimal::ZERO,
                monthly_investments: Decimal::ZERO,
                monthly_cashflow: remainder,
                adequate_cashflow: false,
                cash_buffer_target,
            };
        }

        let allocatable = remainder - cash_buffer_target;
        let (savings_pct, investments_pct) = self.gate(zone, savings_pct, investments_pct);
        let desired_savings = round_half_up(percent_of(allocatable, savings_pct));
        let desired_investments = round_half_up(percent_of(allocatable, investments_pct));

        let (monthly_savings, monthly_investments) =
            if desired_savings + desired_investments > allocatable {
                self.ration(allocatable, desired_savings, desired_investments)
            } else {
                (desired_savings, desired_investments)
            };

        let monthly_cashflow = remainder - monthly_savings - monthly_investments;

        debug!(
            %zone,
            %allocatable,
            %monthly_savings,
            %monthly_investments,
            %monthly_cashflow,
            "allocated monthly surplus"
        );

        Allocation {
            monthly_savings,
            monthly_investments,
            monthly_cashflow,
            adequate_cashflow: true,
            cash_buffer_target,
        }
    }

    /// Buffer reserved ahead of savings and investments.
    pub fn cash_buffer_target(
        &self,
        monthly_disposable: Decimal,
    ) -> Decimal {
        let pct = clamp(self.policy.cash_buffer_pct, Decimal::ZERO, HUNDRED);
        round_half_up(percent_of(non_negative(monthly_disposable), pct))
    }

    /// Zeroes percentages the zone does not permit.
    fn gate(
        &self,
        zone: BudgetZone,
        savings_pct: Decimal,
        investments_pct: Decimal,
    ) -> (Decimal, Decimal) {
        let savings = if zone.allows_savings() {
            non_negative(savings_pct)
        } else {
            Decimal::ZERO
        };
        let investments = if zone.allows_investing() {
            non_negative(investments_pct)
        } else {
            Decimal::ZERO
        };
        (savings, investments)
    }

    /// Scales both amounts down so they sum to exactly `allocatable`.
    fn ration(
        &self,
        allocatable: Decimal,
        desired_savings: Decimal,
        desired_investments: Decimal,
    ) -> (Decimal, Decimal) {
        let desired_total = desired_savings + desired_investments;
        let savings =
            round_half_up(allocatable * desired_savings / desired_total).min(allocatable);
        (savings, allocatable - savings)
    }
}
