//! Number formatting shared by the narrative, fallback and prompt text

/// Round to the nearest whole unit for display
pub fn whole(value: f64) -> i64 {
    value.round() as i64
}

/// Whole-pound amount, e.g. `£1500`
pub fn gbp(value: f64) -> String {
    format!("£{}", whole(value))
}

/// Whole percentage, e.g. `64%`
pub fn percent(value: f64) -> String {
    format!("{}%", whole(value))
}
