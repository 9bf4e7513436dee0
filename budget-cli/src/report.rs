//! Plain-text rendering of engine results for the terminal.

use std::fmt;

use budget_core::calculations::projection::{Projection, YearlyBalance};
use budget_core::{Allocation, BudgetResult, SignalStore};
use rust_decimal::Decimal;

use crate::utils::format_money;

const LABEL_WIDTH: usize = 30;
const VALUE_WIDTH: usize = 16;

fn line(
    f: &mut fmt::Formatter<'_>,
    label: impl fmt::Display,
    value: impl fmt::Display,
) -> fmt::Result {
    let label = label.to_string();
    let value = value.to_string();
    writeln!(f, "  {label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}")
}

fn money_line(
    f: &mut fmt::Formatter<'_>,
    label: impl fmt::Display,
    amount: Decimal,
) -> fmt::Result {
    line(f, label, format_money(amount))
}

/// Full budget breakdown: deductions, disposable income, zone, allocations.
pub struct BudgetReport<'a>(pub &'a BudgetResult);

impl fmt::Display for BudgetReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let result = self.0;

        writeln!(f, "Deductions")?;
        for deduction in &result.deductions {
            let label = format!("{} ({}%)", deduction.kind, deduction.percentage_of_gross);
            money_line(f, label, deduction.amount)?;
        }
        money_line(f, "Total deductions", result.total_deductions)?;

        writeln!(f)?;
        writeln!(f, "Income")?;
        money_line(f, "Annual disposable", result.annual_disposable)?;
        money_line(f, "Monthly disposable", result.monthly_disposable)?;
        money_line(f, "Monthly expenses", result.total_monthly_expenses)?;
        money_line(f, "Monthly surplus", result.monthly_surplus())?;
        line(f, "Expense ratio", result.expense_ratio)?;
        line(f, "Budget zone", result.zone)?;

        writeln!(f)?;
        write!(f, "{}", AllocationReport::new("Recommended allocation", &result.recommended))?;
        if let Some(custom) = &result.custom {
            writeln!(f)?;
            write!(f, "{}", AllocationReport::new("Custom allocation", custom))?;
        }
        Ok(())
    }
}

pub struct AllocationReport<'a> {
    title: &'a str,
    allocation: &'a Allocation,
}

impl<'a> AllocationReport<'a> {
    pub fn new(
        title: &'a str,
        allocation: &'a Allocation,
    ) -> Self {
        Self { title, allocation }
    }
}

impl fmt::Display for AllocationReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let allocation = self.allocation;

        writeln!(f, "{}", self.title)?;
        money_line(f, "Savings", allocation.monthly_savings)?;
        money_line(f, "Investments", allocation.monthly_investments)?;
        money_line(f, "Cashflow", allocation.monthly_cashflow)?;
        money_line(f, "Cash buffer target", allocation.cash_buffer_target)?;
        if allocation.is_deficit() {
            writeln!(f, "  ! expenses exceed disposable income")?;
        } else if !allocation.adequate_cashflow {
            writeln!(f, "  ! surplus does not cover the cash buffer")?;
        }
        Ok(())
    }
}

/// Every published signal, one per line.
pub struct SignalReport<'a>(pub &'a SignalStore);

impl fmt::Display for SignalReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Signals")?;
        for (name, value) in self.0.entries() {
            money_line(f, name, value)?;
        }
        Ok(())
    }
}

/// A projection summary, optionally followed by a year-by-year table.
pub struct ProjectionReport<'a> {
    pub projection: &'a Projection,
    pub schedule: &'a [YearlyBalance],
}

impl fmt::Display for ProjectionReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, "Projection")?;
        money_line(f, "Future value", self.projection.future_value)?;
        money_line(f, "Total contributions", self.projection.total_contributions)?;
        money_line(f, "Interest earned", self.projection.interest_earned)?;
        line(f, "Periods", self.projection.periods)?;

        if !self.schedule.is_empty() {
            writeln!(f)?;
            writeln!(
                f,
                "  {:>4}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                "Year", "Balance", "Contributed", "Interest"
            )?;
            for row in self.schedule {
                writeln!(
                    f,
                    "  {:>4}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}{:>VALUE_WIDTH$}",
                    row.year,
                    format_money(row.balance),
                    format_money(row.contributions),
                    format_money(row.interest)
                )?;
            }
        }
        Ok(())
    }
}
