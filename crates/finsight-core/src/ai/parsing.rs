//! Text parsing helpers for AI backend responses
//!
//! Scenario replies are free text: a heading line followed by guidance lines,
//! usually decorated with list markers the dashboard does not want.

use crate::error::{Error, Result};

use super::types::ScenarioReply;

/// Line used when the model returns a heading and nothing else
pub const NO_GUIDANCE_LINE: &str = "No detailed guidance returned.";

/// Parse a scenario completion into a heading and guidance lines
///
/// Blank lines are dropped and leading bullet markers (`-`, `•`, `*`,
/// whitespace) are stripped. The first remaining line becomes the heading.
pub fn parse_simulation_text(text: &str) -> Result<ScenarioReply> {
    let mut cleaned = text
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string);

    let heading = cleaned
        .next()
        .ok_or_else(|| Error::InvalidData("Empty scenario response from AI".into()))?;

    let mut lines: Vec<String> = cleaned.collect();
    if lines.is_empty() {
        lines.push(NO_GUIDANCE_LINE.to_string());
    }

    Ok(ScenarioReply { heading, lines })
}

/// Trim a summary completion, rejecting empty output
pub fn parse_summary_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidData("Empty summary response from AI".into()));
    }
    Ok(trimmed.to_string())
}

fn strip_bullet(line: &str) -> &str {
    line.trim_start_matches(|c: char| c == '-' || c == '•' || c == '*' || c.is_whitespace())
        .trim_end()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_heading_and_lines() {
        let text = "Retiring at 60 looks achievable\n\n- Keep saving £1500/month\n• Review pension fees\n  * Hold 3 months of cash\n";
        let reply = parse_simulation_text(text).unwrap();

        assert_eq!(reply.heading, "Retiring at 60 looks achievable");
        assert_eq!(
            reply.lines,
            vec![
                "Keep saving £1500/month",
                "Review pension fees",
                "Hold 3 months of cash",
            ]
        );
    }

    #[test]
    fn test_bulleted_heading_is_stripped() {
        let reply = parse_simulation_text("- **Plan**\n- one").unwrap();
        // Only leading markers go; emphasis inside the line is kept
        assert_eq!(reply.heading, "Plan**");
        assert_eq!(reply.lines, vec!["one"]);
    }

    #[test]
    fn test_heading_only() {
        let reply = parse_simulation_text("Just a heading").unwrap();
        assert_eq!(reply.heading, "Just a heading");
        assert_eq!(reply.lines, vec![NO_GUIDANCE_LINE]);
    }

    #[test]
    fn test_empty_text_is_error() {
        assert!(parse_simulation_text("").is_err());
        assert!(parse_simulation_text("  \n - \n•\n").is_err());
    }

    #[test]
    fn test_negative_amounts_lose_leading_dash() {
        // Leading '-' is always treated as a marker
        let reply = parse_simulation_text("Heading\n-200 shortfall").unwrap();
        assert_eq!(reply.lines, vec!["200 shortfall"]);
    }

    #[test]
    fn test_parse_summary_text() {
        assert_eq!(parse_summary_text("  You save well.\n").unwrap(), "You save well.");
        assert!(parse_summary_text(" \n ").is_err());
    }
}
