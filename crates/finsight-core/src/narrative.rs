//! Narrative engine
//!
//! Rule-based summary of a snapshot. The question is matched by substring,
//! so a single question can trigger several scenario branches; the holiday
//! branch always runs before the retirement branch.

use std::sync::OnceLock;

use regex::Regex;

use crate::format::{gbp, percent, whole};
use crate::models::{Snapshot, Summary};

/// Disclaimer attached to every rule-based summary
pub const SUMMARY_NOTE: &str = "POC output. Not financial advice.";

/// Retirement age assumed when the question names none
pub const DEFAULT_RETIREMENT_AGE: u32 = 55;

/// Share of income that counts as "on track" for retirement
pub const TARGET_SAVINGS_RATE: f64 = 0.35;

/// Months of expenses a full liquidity score is worth
const LIQUIDITY_BUFFER_MONTHS: f64 = 3.0;

/// Months of expenses kept back when sizing a holiday budget
const SAFETY_MONTHS: f64 = 1.0;

/// Scenario intents recognised in a question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Intents {
    pub holiday: bool,
    pub retirement: bool,
}

impl Intents {
    /// Detect intents in an already trimmed, lower-cased question
    pub fn detect(question: &str) -> Self {
        Self {
            holiday: question.contains("holiday") || question.contains("vacation"),
            retirement: question.contains("retire"),
        }
    }

    pub fn any(&self) -> bool {
        self.holiday || self.retirement
    }
}

/// Summarize a snapshot, optionally steered by a free-text question
pub fn summarize(snapshot: &Snapshot, question: &str) -> Summary {
    let q = question.trim().to_lowercase();
    let intents = Intents::detect(&q);

    let salary = snapshot.salary_monthly;
    let spend = snapshot.monthly_expense_total;
    let savings = snapshot.savings_est_monthly;

    let headline = format!(
        "{} snapshot: estimated savings {}/month.",
        snapshot.period,
        gbp(savings)
    );

    let mut bullets = vec![
        format!("Income: {}/month | Expenses: {}/month", gbp(salary), gbp(spend)),
        format!(
            "Resilience: {} | Liquidity: {}",
            percent(snapshot.resilience),
            percent(snapshot.liquidity)
        ),
    ];

    match snapshot.expenses.first() {
        Some(top) => bullets.push(format!(
            "Top expense: {} ({}/month)",
            top.label,
            gbp(top.monthly)
        )),
        None => bullets.push("No expense categories loaded.".to_string()),
    }

    if intents.holiday {
        let ceiling = holiday_ceiling(snapshot.liquidity, spend);
        bullets.push(format!(
            "Holiday scenario: spend ceiling ≈ {} (keeps ~1 month safety buffer).",
            gbp(ceiling)
        ));
    }

    if intents.retirement {
        bullets.push(retirement_bullet(&q, salary, savings));
    }

    if !q.is_empty() && !intents.any() {
        bullets.push("Try: 'retire at 55' or 'holiday budget'.".to_string());
    }

    Summary {
        headline,
        bullets,
        note: SUMMARY_NOTE.to_string(),
    }
}

/// Holiday spend ceiling: the liquidity-scaled buffer minus one month of safety
pub fn holiday_ceiling(liquidity: f64, monthly_spend: f64) -> f64 {
    let buffer = (liquidity / 100.0) * LIQUIDITY_BUFFER_MONTHS * monthly_spend;
    let safety = SAFETY_MONTHS * monthly_spend;
    (buffer - safety).max(0.0)
}

/// Monthly shortfall against the target savings rate (zero or negative when on track)
pub fn retirement_gap(salary_monthly: f64, savings_monthly: f64) -> f64 {
    TARGET_SAVINGS_RATE * salary_monthly - savings_monthly
}

fn retirement_bullet(question: &str, salary: f64, savings: f64) -> String {
    let age = extract_age(question).unwrap_or(DEFAULT_RETIREMENT_AGE);
    let target = whole(TARGET_SAVINGS_RATE * 100.0);
    let gap = retirement_gap(salary, savings);

    if gap <= 0.0 {
        format!(
            "Retire at {}: savings rate looks strong vs a {}% target (model).",
            age, target
        )
    } else {
        format!(
            "Retire at {}: needs ~{}/month extra savings to reach a {}% target (model).",
            age,
            gbp(gap),
            target
        )
    }
}

/// First standalone two-digit number in the text, if it is non-zero.
///
/// Three-digit numbers never match, so "retire at 100" yields `None`, and
/// only the first match counts: "retire at 00 or 60" also yields `None`.
/// Word boundaries and digits are ASCII-only.
pub fn extract_age(text: &str) -> Option<u32> {
    static AGE_RE: OnceLock<Regex> = OnceLock::new();
    let re = AGE_RE
        .get_or_init(|| Regex::new(r"(?-u:\b)([0-9]{2})(?-u:\b)").expect("valid regex"));

    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .filter(|&age| age != 0)
}
