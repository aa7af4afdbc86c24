//! KPI text formatting.

/// Default currency symbol for cost-per-hire (Indian Rupee).
pub const DEFAULT_CURRENCY_SYMBOL: &str = "₹";

/// Format `value` as a whole-number currency amount with comma thousands separators.
///
/// Ties round to even like the other KPI formatters: `1000.5` becomes `₹1,000`,
/// `-1234.6` becomes `-₹1,235`.
pub fn format_currency(value: f64, symbol: &str) -> String {
    let digits = format!("{:.0}", value.abs());
    let is_zero = digits.chars().all(|c| c == '0');
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };
    format!("{}{}{}", sign, symbol, group_thousands(&digits))
}

pub fn format_percent(value: f64) -> String {
    format!("{:.1}%", value)
}

pub fn format_days(value: f64) -> String {
    format!("{:.1} days", value)
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
