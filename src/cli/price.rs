use super::ui;
use crate::core::config::{AppConfig, CurrencyConfig};
use crate::core::presentation::{self, currency_symbol, format_money};
use crate::core::pricing::{self, PricingInputs, PricingResult};
use anyhow::Result;
use comfy_table::Cell;

const BAR_WIDTH: usize = 30;

/// Pricing fields that can be set on the command line. Unset fields keep
/// the value they are applied over.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct PricingOverrides {
    /// Product cost in the source currency
    #[arg(long)]
    pub product_cost: Option<f64>,
    /// Shipping cost in the source currency
    #[arg(long)]
    pub shipping: Option<f64>,
    /// Source-currency units per target-currency unit
    #[arg(long = "rate")]
    pub conversion_rate: Option<f64>,
    /// Markup applied to the converted cost (%)
    #[arg(long = "markup", allow_negative_numbers = true)]
    pub markup_percent: Option<f64>,
    /// Marketplace final value fee (%)
    #[arg(long = "ebay-fee")]
    pub ebay_fee_percent: Option<f64>,
    /// Promoted listing fee (%)
    #[arg(long = "ad-fee")]
    pub ad_fee_percent: Option<f64>,
}

impl PricingOverrides {
    pub fn apply(&self, base: PricingInputs) -> PricingInputs {
        PricingInputs {
            product_cost: self.product_cost.unwrap_or(base.product_cost),
            shipping: self.shipping.unwrap_or(base.shipping),
            conversion_rate: self.conversion_rate.unwrap_or(base.conversion_rate),
            markup_percent: self.markup_percent.unwrap_or(base.markup_percent),
            ebay_fee_percent: self.ebay_fee_percent.unwrap_or(base.ebay_fee_percent),
            ad_fee_percent: self.ad_fee_percent.unwrap_or(base.ad_fee_percent),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.product_cost.is_none()
            && self.shipping.is_none()
            && self.conversion_rate.is_none()
            && self.markup_percent.is_none()
            && self.ebay_fee_percent.is_none()
            && self.ad_fee_percent.is_none()
    }
}

/// Renders the priced breakdown followed by its bar chart.
pub fn render_breakdown(result: &PricingResult, currency: &CurrencyConfig) -> String {
    let source = currency_symbol(&currency.source);
    let target = currency_symbol(&currency.target);

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Amount")]);

    let rows = [
        (
            format!("Total Cost ({})", currency.source),
            format_money(result.total_cost_source, &source),
        ),
        (
            format!("Total Cost ({})", currency.target),
            format_money(result.total_cost_target, &target),
        ),
        ("Markup".to_string(), format_money(result.markup, &target)),
        (
            "Suggested Price".to_string(),
            format_money(result.suggested_price, &target),
        ),
        ("eBay Fee".to_string(), format_money(result.ebay_fee, &target)),
        ("Ad Fee".to_string(), format_money(result.ad_fee, &target)),
    ];
    for (label, amount) in rows {
        table.add_row(vec![Cell::new(label), ui::amount_cell(amount)]);
    }
    table.add_row(vec![
        Cell::new("Net Profit").add_attribute(comfy_table::Attribute::Bold),
        ui::profit_cell(result.net_profit, format_money(result.net_profit, &target)),
    ]);

    let mut output = table.to_string();
    output.push_str(&format!(
        "\n\n{}\n",
        ui::style_text("Profit Breakdown", ui::StyleType::TotalLabel)
    ));

    let bars = presentation::pricing_bars(result, &currency.target);
    let label_width = bars.iter().map(|b| b.label.len()).max().unwrap_or(0);
    for b in &bars {
        output.push_str(&format!(
            "{:<label_width$}  {}  {}\n",
            b.label,
            ui::bar(b.fraction, BAR_WIDTH),
            format_money(b.value, &target),
        ));
    }
    output
}

pub fn run(config: &AppConfig, overrides: &PricingOverrides) -> Result<()> {
    let inputs = overrides.apply(config.baseline());
    let result = pricing::compute(&inputs)?;

    println!(
        "{}\n",
        ui::style_text("Listing Price", ui::StyleType::Title)
    );
    println!("{}", render_breakdown(&result, &config.currency));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_keep_unset_fields() {
        let overrides = PricingOverrides {
            shipping: Some(12.0),
            ad_fee_percent: Some(3.0),
            ..PricingOverrides::default()
        };
        let inputs = overrides.apply(PricingInputs::BASELINE);

        assert_eq!(inputs.shipping, 12.0);
        assert_eq!(inputs.ad_fee_percent, 3.0);
        assert_eq!(inputs.product_cost, PricingInputs::BASELINE.product_cost);
        assert_eq!(inputs.conversion_rate, PricingInputs::BASELINE.conversion_rate);
        assert!(!overrides.is_empty());
        assert!(PricingOverrides::default().is_empty());
    }

    #[test]
    fn test_breakdown_shows_rounded_amounts() {
        let result = pricing::compute(&PricingInputs::default()).unwrap();
        let output = render_breakdown(&result, &CurrencyConfig::default());

        assert!(output.contains("Total Cost (MYR)"));
        assert!(output.contains("RM43.00"));
        assert!(output.contains("$10.75"));
        assert!(output.contains("$17.20"));
        assert!(output.contains("$2.24"));
        assert!(output.contains("$4.21"));
        assert!(output.contains("Profit Breakdown"));
    }
}
