//! Snapshot command implementation

use std::path::Path;

use anyhow::Result;
use finsight_core::format::{gbp, percent};
use finsight_core::{narrative, scenario, AIClient, Snapshot, Summary};

use super::{load_snapshot, truncate};

pub async fn cmd_snapshot(
    data_dir: &Path,
    profile: &str,
    period: &str,
    question: &str,
    ai_summary: bool,
    json: bool,
) -> Result<()> {
    let snapshot = load_snapshot(data_dir, profile, period)?;

    let summary = if ai_summary {
        let ai = AIClient::from_env();
        if ai.is_none() {
            tracing::warn!("No AI backend configured, using rule-based summary");
        }
        scenario::summarize_with_ai(ai.as_ref(), &snapshot, question).await
    } else {
        narrative::summarize(&snapshot, question)
    };

    if json {
        let body = serde_json::json!({ "snapshot": snapshot, "summary": summary });
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print!("{}", render_snapshot(profile, &snapshot, &summary));
    }

    Ok(())
}

/// Human-readable snapshot report
pub fn render_snapshot(profile: &str, snapshot: &Snapshot, summary: &Summary) -> String {
    let mut out = String::new();

    out.push_str(&format!("📊 {} snapshot ({})\n", snapshot.period, profile));
    out.push_str(&format!(
        "   Income:   {}/month\n",
        gbp(snapshot.salary_monthly)
    ));
    out.push_str(&format!(
        "   Expenses: {}/month\n",
        gbp(snapshot.monthly_expense_total)
    ));
    out.push_str(&format!(
        "   Savings:  {}/month\n",
        gbp(snapshot.savings_est_monthly)
    ));
    out.push_str(&format!(
        "   Resilience {} | Liquidity {}\n",
        percent(snapshot.resilience),
        percent(snapshot.liquidity)
    ));

    if !snapshot.expenses.is_empty() {
        out.push_str("\nExpenses:\n");
        for share in &snapshot.expenses {
            out.push_str(&format!(
                "   {:<22} {:>8} {:>6.1}%\n",
                truncate(&share.label, 22),
                gbp(share.monthly),
                share.pct
            ));
        }
    }

    out.push_str(&format!("\n💡 {}\n", summary.headline));
    for bullet in &summary.bullets {
        out.push_str(&format!("   • {}\n", bullet));
    }
    out.push_str(&format!("   {}\n", summary.note));

    out
}
