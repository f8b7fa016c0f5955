//! Display helpers: bar-chart scaling and money formatting.

use crate::core::pricing::PricingResult;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: f64,
    /// Length relative to the largest bar, in `[0, 1]`.
    pub fraction: f64,
}

/// Scales each value against the largest one in the set.
///
/// Negative and non-finite values get a zero-length bar. When no value is
/// positive every fraction is zero.
pub fn scale_bars<L, I>(values: I) -> Vec<Bar>
where
    L: Into<String>,
    I: IntoIterator<Item = (L, f64)>,
{
    let values: Vec<(String, f64)> = values.into_iter().map(|(l, v)| (l.into(), v)).collect();
    let max = values
        .iter()
        .map(|(_, v)| *v)
        .filter(|v| v.is_finite())
        .fold(0.0_f64, f64::max);

    values
        .into_iter()
        .map(|(label, value)| {
            let fraction = if max > 0.0 && value.is_finite() {
                (value / max).clamp(0.0, 1.0)
            } else {
                0.0
            };
            Bar {
                label,
                value,
                fraction,
            }
        })
        .collect()
}

/// Breakdown bars for a priced listing, largest-first as laid out on screen.
pub fn pricing_bars(result: &PricingResult, target_currency: &str) -> Vec<Bar> {
    scale_bars([
        ("Suggested Price".to_string(), result.suggested_price),
        (format!("Total Cost ({target_currency})"), result.total_cost_target),
        ("eBay Fee".to_string(), result.ebay_fee),
        ("Ad Fee".to_string(), result.ad_fee),
        ("Net Profit".to_string(), result.net_profit),
    ])
}

/// Rounds to two decimal places, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn format_money(value: f64, symbol: &str) -> String {
    let rounded = round_cents(value);
    if rounded < 0.0 {
        format!("-{symbol}{:.2}", -rounded)
    } else {
        format!("{symbol}{:.2}", rounded.abs())
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", round_cents(value))
}

/// Conventional symbol for a currency code, falling back to the code itself.
pub fn currency_symbol(code: &str) -> String {
    match code.to_uppercase().as_str() {
        "USD" => "$".to_string(),
        "MYR" => "RM".to_string(),
        "EUR" => "€".to_string(),
        "GBP" => "£".to_string(),
        other => format!("{other} "),
    }
}
