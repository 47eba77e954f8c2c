//! Snapshot builder
//!
//! Turns a period's raw time-series block and a profile's expense categories
//! into the normalized `Snapshot` every chart and narrative reads from.
//! Pure: no I/O, no hidden state, identical inputs give identical output.

use crate::error::{Error, Result};
use crate::models::{
    ExpenseConfig, ExpenseShare, FlowGrain, FlowSeries, Snapshot, TimeSeries,
};

/// Build the snapshot for `period`.
///
/// Fails only when `time_series` has no block for `period`.
pub fn build_snapshot(
    period: &str,
    time_series: &TimeSeries,
    expenses: &ExpenseConfig,
) -> Result<Snapshot> {
    let block = time_series
        .get(period)
        .ok_or_else(|| Error::UnknownPeriod(period.to_string()))?;

    let salary_monthly = block.metrics.salary;
    let monthly_expense_total: f64 = expenses.categories.iter().map(|c| c.monthly).sum();
    let savings_est_monthly = (salary_monthly - monthly_expense_total).max(0.0);

    let grain = FlowGrain::for_period(period);
    let flow = build_flow(&block.labels, salary_monthly, monthly_expense_total, grain);

    Ok(Snapshot {
        period: period.to_string(),
        labels: block.labels.clone(),
        wealth: block.points.clone(),
        metrics: block.metrics.clone(),
        salary_monthly,
        resilience: block.metrics.resilience,
        liquidity: block.metrics.liq,
        expenses: expense_shares(expenses, monthly_expense_total),
        monthly_expense_total,
        savings_est_monthly,
        flow,
    })
}

/// Expense categories with their percentage share, largest first.
///
/// A zero total uses a denominator of 1 so every share resolves to 0.
fn expense_shares(expenses: &ExpenseConfig, total: f64) -> Vec<ExpenseShare> {
    let denom = if total > 0.0 { total } else { 1.0 };

    let mut shares: Vec<ExpenseShare> = expenses
        .categories
        .iter()
        .map(|c| ExpenseShare {
            key: c.key.clone(),
            label: c.label.clone(),
            monthly: c.monthly,
            pct: round_to_tenth(c.monthly / denom * 100.0),
        })
        .collect();

    // sort_by is stable: equal amounts keep their input order
    shares.sort_by(|a, b| {
        b.monthly
            .partial_cmp(&a.monthly)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    shares
}

/// Flow series held constant across every label at the given grain
fn build_flow(labels: &[String], salary: f64, spend: f64, grain: FlowGrain) -> FlowSeries {
    let factor = grain.factor();
    let income = salary * factor;
    let expense = spend * factor;
    let savings = ((salary - spend) * factor).max(0.0);

    FlowSeries {
        grain,
        labels: labels.to_vec(),
        income: vec![income; labels.len()],
        expense: vec![expense; labels.len()],
        savings: vec![savings; labels.len()],
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
