use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NumberOrExpr {
    Number(f64),
    Expr(String),
}

impl NumberOrExpr {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Expr(text) if text.trim().is_empty())
    }
}

pub fn round_to(value: f64, decimal_places: u8) -> f64 {
    let factor = 10f64.powi(i32::from(decimal_places));
    let scaled = value * factor;
    if !scaled.is_finite() {
        return value;
    }
    let rounded = scaled.round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Always prints `decimal_places` fractional digits: `1.5` at 2dp is `"1.50"`.
pub fn format_fixed(value: f64, decimal_places: u8) -> String {
    let text = format!(
        "{:.*}",
        usize::from(decimal_places),
        round_to(value, decimal_places)
    );
    if text.starts_with('-') && text[1..].chars().all(|ch| ch == '0' || ch == '.') {
        text[1..].to_string()
    } else {
        text
    }
}

/// Rounds then drops trailing zeros, the way numbers print in the editor.
pub fn format_trimmed(value: f64, decimal_places: u8) -> String {
    let rounded = round_to(value, decimal_places);
    if rounded.fract().abs() < f64::EPSILON {
        return format!("{:.0}", rounded);
    }
    let text = format_fixed(rounded, decimal_places);
    text.trim_end_matches('0').trim_end_matches('.').to_string()
}

pub fn percent_label(deviation: f64) -> String {
    format!("{}%", format_trimmed(deviation * 100.0, 6))
}
