//! Domain models for Finsight
//!
//! Input records (`TimeSeriesBlock`, `ExpenseConfig`, `Profile`) mirror the
//! per-profile JSON data files. Every field is optional on the wire: missing
//! or non-numeric values fall back to zero and missing collections to empty,
//! so a sparse data file still produces a renderable dashboard.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Time series keyed by period ("6M", "1Y", "3Y", "5Y", ...)
pub type TimeSeries = BTreeMap<String, TimeSeriesBlock>;

/// Raw per-period data block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeSeriesBlock {
    /// Period-point names (months or years)
    #[serde(deserialize_with = "de::labels")]
    pub labels: Vec<String>,
    /// Wealth-index values, one per label
    #[serde(deserialize_with = "de::numbers")]
    pub points: Vec<f64>,
    pub metrics: Metrics,
}

/// Pre-computed scalar metrics for a period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Metrics {
    /// Monthly income
    #[serde(deserialize_with = "de::number")]
    pub salary: f64,
    /// Resilience score, 0-100
    #[serde(deserialize_with = "de::number")]
    pub resilience: f64,
    /// Liquidity score, 0-100
    #[serde(deserialize_with = "de::number")]
    pub liq: f64,
    /// Any other metrics carried by the data file, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// A single expense category from a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseCategory {
    pub key: String,
    pub label: String,
    #[serde(deserialize_with = "de::number")]
    pub monthly: f64,
}

impl ExpenseCategory {
    pub fn new(key: impl Into<String>, label: impl Into<String>, monthly: f64) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            monthly,
        }
    }
}

/// Expense configuration for a profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseConfig {
    pub categories: Vec<ExpenseCategory>,
}

/// An expense category with its share of the monthly total
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpenseShare {
    pub key: String,
    pub label: String,
    pub monthly: f64,
    /// Percentage of the monthly total, one decimal place
    pub pct: f64,
}

/// Time resolution of the flow series
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlowGrain {
    #[default]
    Monthly,
    Yearly,
}

impl FlowGrain {
    /// Short periods are charted month by month, longer ones year by year
    pub fn for_period(period: &str) -> Self {
        match period {
            "6M" | "1Y" => FlowGrain::Monthly,
            _ => FlowGrain::Yearly,
        }
    }

    /// Multiplier applied to monthly figures at this grain
    pub fn factor(&self) -> f64 {
        match self {
            FlowGrain::Monthly => 1.0,
            FlowGrain::Yearly => 12.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlowGrain::Monthly => "monthly",
            FlowGrain::Yearly => "yearly",
        }
    }
}

impl fmt::Display for FlowGrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Income / expense / savings series aligned to the period labels
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowSeries {
    pub grain: FlowGrain,
    pub labels: Vec<String>,
    pub income: Vec<f64>,
    pub expense: Vec<f64>,
    pub savings: Vec<f64>,
}

/// Normalized per-period view-model consumed by every chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub period: String,
    pub labels: Vec<String>,
    pub wealth: Vec<f64>,
    pub metrics: Metrics,
    pub salary_monthly: f64,
    pub resilience: f64,
    pub liquidity: f64,
    /// Sorted by `monthly`, largest first
    pub expenses: Vec<ExpenseShare>,
    pub monthly_expense_total: f64,
    /// Never negative
    pub savings_est_monthly: f64,
    pub flow: FlowSeries,
}

/// Rule-based narrative summary of a snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub headline: String,
    pub bullets: Vec<String>,
    pub note: String,
}

/// Answer to a scenario question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub heading: String,
    pub lines: Vec<String>,
    /// UI hint: false only when the scenario service could not be reached
    pub enabled: bool,
}

/// A user profile as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Profile {
    pub name: Option<String>,
    pub expenses: ExpenseConfig,
    pub time_series: TimeSeries,
}

/// Profile listing entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileInfo {
    pub id: String,
    pub name: String,
}

/// Expense line included in the facts sent to a language model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopExpense {
    pub label: String,
    pub monthly: f64,
}

/// Fact block handed to a language model; the model must not invent numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFacts {
    pub period: String,
    pub salary_monthly: f64,
    pub expenses_monthly: f64,
    pub savings_monthly: f64,
    pub resilience_pct: f64,
    pub liquidity_pct: f64,
    pub top_expenses: Vec<TopExpense>,
    pub flow_grain: FlowGrain,
}

impl ScenarioFacts {
    /// Number of expense categories included in the fact block
    pub const TOP_EXPENSES: usize = 5;

    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        Self {
            period: snapshot.period.clone(),
            salary_monthly: snapshot.salary_monthly,
            expenses_monthly: snapshot.monthly_expense_total,
            savings_monthly: snapshot.savings_est_monthly,
            resilience_pct: snapshot.resilience,
            liquidity_pct: snapshot.liquidity,
            top_expenses: snapshot
                .expenses
                .iter()
                .take(Self::TOP_EXPENSES)
                .map(|e| TopExpense {
                    label: e.label.clone(),
                    monthly: e.monthly,
                })
                .collect(),
            flow_grain: snapshot.flow.grain,
        }
    }
}

/// Snapshot as posted back by a dashboard client.
///
/// Holds only the fields a scenario prompt reads. Missing, null or
/// mistyped values become zero or empty instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClientSnapshot {
    #[serde(deserialize_with = "de::text")]
    pub period: String,
    #[serde(deserialize_with = "de::number")]
    pub salary_monthly: f64,
    #[serde(deserialize_with = "de::number")]
    pub monthly_expense_total: f64,
    #[serde(deserialize_with = "de::number")]
    pub savings_est_monthly: f64,
    #[serde(deserialize_with = "de::number")]
    pub resilience: f64,
    #[serde(deserialize_with = "de::number")]
    pub liquidity: f64,
    #[serde(deserialize_with = "de::top_expenses")]
    pub expenses: Vec<TopExpense>,
}

impl From<&ClientSnapshot> for ScenarioFacts {
    fn from(snapshot: &ClientSnapshot) -> Self {
        Self {
            period: snapshot.period.clone(),
            salary_monthly: snapshot.salary_monthly,
            expenses_monthly: snapshot.monthly_expense_total,
            savings_monthly: snapshot.savings_est_monthly,
            resilience_pct: snapshot.resilience,
            liquidity_pct: snapshot.liquidity,
            top_expenses: snapshot
                .expenses
                .iter()
                .take(Self::TOP_EXPENSES)
                .cloned()
                .collect(),
            flow_grain: FlowGrain::for_period(&snapshot.period),
        }
    }
}

/// Lenient deserializers for hand-edited data files and client payloads
mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Numbers and numeric strings; anything else is 0
    fn to_number(value: &Value) -> f64 {
        match value {
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(0.0),
            other => other.as_f64().unwrap_or(0.0),
        }
    }

    pub fn number<'de, D>(deserializer: D) -> Result<f64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(to_number(&value))
    }

    pub fn numbers<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items.iter().map(to_number).collect()),
            _ => Ok(Vec::new()),
        }
    }

    /// Strings as-is, null as empty, anything else in its JSON form
    fn to_text(value: Value) -> String {
        match value {
            Value::String(s) => s,
            Value::Null => String::new(),
            other => other.to_string(),
        }
    }

    pub fn text<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(to_text(Value::deserialize(deserializer)?))
    }

    /// Expense entries reduced to label and amount; non-object entries are skipped
    pub fn top_expenses<'de, D>(deserializer: D) -> Result<Vec<super::TopExpense>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items
                .into_iter()
                .filter_map(|item| match item {
                    Value::Object(mut fields) => Some(super::TopExpense {
                        label: to_text(fields.remove("label").unwrap_or(Value::Null)),
                        monthly: fields.get("monthly").map(to_number).unwrap_or(0.0),
                    }),
                    _ => None,
                })
                .collect()),
            _ => Ok(Vec::new()),
        }
    }

    pub fn labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(items) => Ok(items.into_iter().map(to_text).collect()),
            _ => Ok(Vec::new()),
        }
    }
}
