//! Listing price model: converts a source-currency cost into a suggested
//! target-currency sale price with marketplace fees deducted.

use crate::core::error::{Error, Result};
use crate::core::numeric;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inputs to the price model. Costs are in the source currency, percentages
/// are expressed as whole numbers (`13.0` means 13%).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingInputs {
    #[serde(deserialize_with = "numeric::number")]
    pub product_cost: f64,
    #[serde(deserialize_with = "numeric::number")]
    pub shipping: f64,
    /// Source-currency units per one target-currency unit.
    #[serde(deserialize_with = "numeric::number")]
    pub conversion_rate: f64,
    #[serde(deserialize_with = "numeric::number")]
    pub markup_percent: f64,
    #[serde(deserialize_with = "numeric::number")]
    pub ebay_fee_percent: f64,
    #[serde(deserialize_with = "numeric::number")]
    pub ad_fee_percent: f64,
}

impl PricingInputs {
    pub const BASELINE: PricingInputs = PricingInputs {
        product_cost: 3.0,
        shipping: 40.0,
        conversion_rate: 4.0,
        markup_percent: 60.0,
        ebay_fee_percent: 13.0,
        ad_fee_percent: 0.0,
    };

    /// Checks the inputs against the accepted bounds.
    ///
    /// Every field must be finite. Costs cannot be negative, the conversion
    /// rate must be strictly positive, markup cannot go below -100% and fee
    /// percentages must fall within `[0, 100]`.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("productCost", self.product_cost),
            ("shipping", self.shipping),
            ("conversionRate", self.conversion_rate),
            ("markupPercent", self.markup_percent),
            ("ebayFeePercent", self.ebay_fee_percent),
            ("adFeePercent", self.ad_fee_percent),
        ];
        for (field, value) in fields {
            if !value.is_finite() {
                return Err(Error::invalid(field, format!("{value} is not a finite number")));
            }
        }

        if self.product_cost < 0.0 {
            return Err(Error::invalid("productCost", "must not be negative"));
        }
        if self.shipping < 0.0 {
            return Err(Error::invalid("shipping", "must not be negative"));
        }
        if self.conversion_rate <= 0.0 {
            return Err(Error::invalid(
                "conversionRate",
                format!("must be greater than zero, got {}", self.conversion_rate),
            ));
        }
        if self.markup_percent < -100.0 {
            return Err(Error::invalid("markupPercent", "must not be below -100"));
        }
        for (field, value) in [
            ("ebayFeePercent", self.ebay_fee_percent),
            ("adFeePercent", self.ad_fee_percent),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(Error::invalid(field, format!("{value} is outside 0..=100")));
            }
        }
        Ok(())
    }
}

impl Default for PricingInputs {
    fn default() -> Self {
        Self::BASELINE
    }
}

/// Priced outcome for one set of inputs. Values are kept at full precision;
/// rounding happens only when formatting for display.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub total_cost_source: f64,
    pub total_cost_target: f64,
    pub markup: f64,
    pub suggested_price: f64,
    pub ebay_fee: f64,
    pub ad_fee: f64,
    pub net_profit: f64,
}

/// Prices a listing. Pure; rejects inputs that fail [`PricingInputs::validate`].
pub fn compute(inputs: &PricingInputs) -> Result<PricingResult> {
    inputs.validate()?;

    let total_cost_source = inputs.product_cost + inputs.shipping;
    let total_cost_target = total_cost_source / inputs.conversion_rate;
    let markup = (inputs.markup_percent / 100.0) * total_cost_target;
    let suggested_price = total_cost_target + markup;
    let ebay_fee = (inputs.ebay_fee_percent / 100.0) * suggested_price;
    let ad_fee = (inputs.ad_fee_percent / 100.0) * suggested_price;
    let net_profit = suggested_price - total_cost_target - ebay_fee - ad_fee;

    debug!(
        total_cost_target,
        suggested_price, net_profit, "Computed listing price"
    );

    Ok(PricingResult {
        total_cost_source,
        total_cost_target,
        markup,
        suggested_price,
        ebay_fee,
        ad_fee,
        net_profit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn test_baseline_example() {
        let result = compute(&PricingInputs::default()).unwrap();

        assert!(close(result.total_cost_source, 43.0));
        assert!(close(result.total_cost_target, 10.75));
        assert!(close(result.markup, 6.45));
        assert!(close(result.suggested_price, 17.2));
        assert!(close(result.ebay_fee, 2.236));
        assert!(close(result.ad_fee, 0.0));
        assert!(close(result.net_profit, 4.214));
    }

    #[test]
    fn test_price_identities_hold() {
        let inputs = [
            PricingInputs::BASELINE,
            PricingInputs {
                product_cost: 120.5,
                shipping: 18.25,
                conversion_rate: 4.72,
                markup_percent: 35.0,
                ebay_fee_percent: 12.9,
                ad_fee_percent: 4.5,
            },
            PricingInputs {
                product_cost: 0.0,
                shipping: 0.0,
                conversion_rate: 1.0,
                markup_percent: -20.0,
                ebay_fee_percent: 0.0,
                ad_fee_percent: 100.0,
            },
        ];

        for input in inputs {
            let r = compute(&input).unwrap();
            assert!(close(
                r.suggested_price,
                r.total_cost_target * (1.0 + input.markup_percent / 100.0)
            ));
            assert!(close(
                r.net_profit,
                r.suggested_price - r.total_cost_target - r.ebay_fee - r.ad_fee
            ));
        }
    }

    #[test]
    fn test_zero_conversion_rate_is_rejected() {
        let inputs = PricingInputs {
            conversion_rate: 0.0,
            ..PricingInputs::BASELINE
        };
        match compute(&inputs) {
            Err(Error::InvalidInput { field, .. }) => assert_eq!(field, "conversionRate"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_non_finite_input_is_rejected() {
        let inputs = PricingInputs {
            shipping: f64::NAN,
            ..PricingInputs::BASELINE
        };
        assert!(matches!(
            compute(&inputs),
            Err(Error::InvalidInput { field: "shipping", .. })
        ));
    }

    #[test]
    fn test_bounds_on_percentages() {
        let negative_fee = PricingInputs {
            ebay_fee_percent: -1.0,
            ..PricingInputs::BASELINE
        };
        assert!(compute(&negative_fee).is_err());

        let huge_ad_fee = PricingInputs {
            ad_fee_percent: 150.0,
            ..PricingInputs::BASELINE
        };
        assert!(compute(&huge_ad_fee).is_err());

        let discount = PricingInputs {
            markup_percent: -50.0,
            ..PricingInputs::BASELINE
        };
        assert!(compute(&discount).is_ok());

        let below_free = PricingInputs {
            markup_percent: -101.0,
            ..PricingInputs::BASELINE
        };
        assert!(compute(&below_free).is_err());
    }

    #[test]
    fn test_compute_is_deterministic() {
        let first = compute(&PricingInputs::default()).unwrap();
        let second = compute(&PricingInputs::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_inputs_use_camel_case_and_accept_strings() {
        let json = r#"{
            "productCost": "5",
            "shipping": 40,
            "conversionRate": "4.7",
            "markupPercent": 60,
            "ebayFeePercent": 13,
            "adFeePercent": "0"
        }"#;
        let inputs: PricingInputs = serde_json::from_str(json).unwrap();
        assert_eq!(inputs.product_cost, 5.0);
        assert_eq!(inputs.conversion_rate, 4.7);

        let out = serde_json::to_string(&PricingInputs::BASELINE).unwrap();
        assert!(out.contains("\"ebayFeePercent\":13.0"));
    }
}
