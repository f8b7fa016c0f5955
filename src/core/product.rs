//! Product records as supplied by the record store, and their normalized form.

use crate::core::numeric;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use tracing::debug;

/// Largest sold count accepted from a record. Beyond this an `f64` no longer
/// holds every integer exactly.
pub const MAX_SOLD: f64 = 9_007_199_254_740_991.0;

/// Row shape of the product table. Column names follow the record store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "numeric::lenient")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "numeric::lenient")]
    pub sold: Option<f64>,
    #[serde(default, deserialize_with = "numeric::lenient")]
    pub rating: Option<f64>,
    #[serde(default, rename = "cost_price_myr", deserialize_with = "numeric::lenient")]
    pub cost_price_source: Option<f64>,
    #[serde(default, rename = "cost_price_usd", deserialize_with = "numeric::lenient")]
    pub cost_price_target: Option<f64>,
    /// Single-currency cost column used before source costs were recorded.
    #[serde(default, rename = "cost_price", deserialize_with = "numeric::lenient")]
    pub legacy_cost_price: Option<f64>,
    #[serde(default, rename = "exchange_rate", deserialize_with = "numeric::lenient")]
    pub conversion_rate: Option<f64>,
    #[serde(default, deserialize_with = "numeric::lenient")]
    pub postage_cost: Option<f64>,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc)))
}

/// Unit cost of a product, in whichever representation the record carries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ProductCost {
    /// Cost recorded in the source currency together with its rate.
    Converted { source_amount: f64, rate: f64 },
    /// Cost recorded directly in the target currency.
    Direct(f64),
    Unknown,
}

impl ProductCost {
    /// Prefers a source-currency cost with a usable rate, then a direct
    /// target-currency cost.
    pub fn resolve(source_amount: Option<f64>, rate: Option<f64>, direct: Option<f64>) -> Self {
        match (source_amount, rate, direct) {
            (Some(source_amount), Some(rate), _) if rate != 0.0 => {
                ProductCost::Converted { source_amount, rate }
            }
            (_, _, Some(amount)) => ProductCost::Direct(amount),
            _ => ProductCost::Unknown,
        }
    }

    pub fn in_target(&self) -> f64 {
        match *self {
            ProductCost::Converted {
                source_amount,
                rate,
            } => source_amount / rate,
            ProductCost::Direct(amount) => amount,
            ProductCost::Unknown => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub title: String,
    pub price: Option<f64>,
    pub sold: u64,
    pub rating: Option<f64>,
    pub cost: ProductCost,
    pub postage_cost: f64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<ProductRecord> for Product {
    fn from(record: ProductRecord) -> Self {
        let title = record.title.unwrap_or_default();
        let sold = match record.sold {
            Some(n) if (0.0..=MAX_SOLD).contains(&n) && n.fract() == 0.0 => n as u64,
            Some(n) => {
                debug!(%title, sold = n, "Ignoring invalid sold count");
                0
            }
            None => 0,
        };
        let direct = record.cost_price_target.or(record.legacy_cost_price);

        Product {
            cost: ProductCost::resolve(record.cost_price_source, record.conversion_rate, direct),
            price: record.price,
            sold,
            rating: record.rating,
            postage_cost: record.postage_cost.unwrap_or(0.0),
            created_at: record.created_at,
            title,
        }
    }
}

impl Product {
    /// Profit on a single sale, `None` when it cannot be computed.
    pub fn unit_profit(&self) -> Option<f64> {
        let price = self.price?;
        Some(price - self.cost.in_target() - self.postage_cost).filter(|p| p.is_finite())
    }

    /// Profit over all units sold.
    pub fn profit(&self) -> Option<f64> {
        self.unit_profit()
            .map(|p| p * self.sold as f64)
            .filter(|p| p.is_finite())
    }

    /// Gross sales value over all units sold.
    pub fn value(&self) -> Option<f64> {
        self.price
            .map(|p| p * self.sold as f64)
            .filter(|v| v.is_finite())
    }
}

/// Supplies products from the record store.
pub trait ProductSource {
    fn products(&self) -> anyhow::Result<Vec<Product>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first by creation time; undated products last.
    #[default]
    Latest,
    /// Most units sold first.
    HighestSold,
}

impl FromStr for SortOrder {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "latest" => Ok(SortOrder::Latest),
            "highest" | "sold" => Ok(SortOrder::HighestSold),
            _ => Err(anyhow::anyhow!("Invalid sort order: {}", s)),
        }
    }
}

/// Title search and ordering applied before aggregation.
#[derive(Debug, Clone, Default)]
pub struct ProductQuery {
    pub search: Option<String>,
    pub sort: SortOrder,
}

impl ProductQuery {
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let needle = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let mut matched: Vec<&Product> = products
            .iter()
            .filter(|p| {
                needle
                    .as_ref()
                    .is_none_or(|n| p.title.to_lowercase().contains(n))
            })
            .collect();

        match self.sort {
            SortOrder::Latest => matched.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::HighestSold => matched.sort_by(|a, b| b.sold.cmp(&a.sold)),
        }
        matched
    }
}
