//! Portfolio-level profit summary over a product collection.
use crate::core::product::Product;
use serde::Serialize;
use tracing::debug;

/// Totals over an already filtered product sequence. Recomputed on demand,
/// never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats<'a> {
    pub total_products: usize,
    pub total_sold: u64,
    pub total_value: f64,
    pub total_profit: f64,
    pub average_profit: f64,
    pub profit_margin_percent: f64,
    pub average_rating: f64,
    pub top_seller: Option<&'a Product>,
}

/// Summarizes `products`.
///
/// A product whose value or profit cannot be computed contributes zero to
/// that total instead of poisoning it. The top seller is the product with
/// the most units sold, the earliest one winning ties.
pub fn aggregate<'a, I>(products: I) -> AggregateStats<'a>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut total_products = 0usize;
    let mut total_sold = 0u64;
    let mut total_value = 0.0;
    let mut total_profit = 0.0;
    let mut rating_sum = 0.0;
    let mut top_seller: Option<&Product> = None;

    for product in products {
        total_products += 1;
        total_sold = total_sold.saturating_add(product.sold);

        match product.value() {
            Some(value) => total_value += value,
            None => debug!(title = %product.title, "Excluding product from total value"),
        }
        match product.profit() {
            Some(profit) => total_profit += profit,
            None => debug!(title = %product.title, "Excluding product from total profit"),
        }
        rating_sum += product.rating.filter(|r| r.is_finite()).unwrap_or(0.0);

        if top_seller.is_none_or(|top| product.sold > top.sold) {
            top_seller = Some(product);
        }
    }

    let average_profit = if total_products > 0 {
        total_profit / total_products as f64
    } else {
        0.0
    };
    let profit_margin_percent = if total_value != 0.0 {
        total_profit / total_value * 100.0
    } else {
        0.0
    };
    let average_rating = if total_products > 0 {
        rating_sum / total_products as f64
    } else {
        0.0
    };

    AggregateStats {
        total_products,
        total_sold,
        total_value,
        total_profit,
        average_profit,
        profit_margin_percent,
        average_rating,
        top_seller,
    }
}
