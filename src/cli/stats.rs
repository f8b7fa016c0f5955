use super::ui;
use crate::core::config::AppConfig;
use crate::core::presentation::{currency_symbol, format_money, format_percent};
use crate::core::product::{ProductQuery, ProductSource, SortOrder};
use crate::core::stats::{self, AggregateStats};
use crate::providers::JsonFileSource;
use anyhow::Result;
use comfy_table::Cell;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, clap::Args)]
pub struct StatsOptions {
    /// Product export to summarize; defaults to `products_path` from config
    #[arg(long)]
    pub products: Option<PathBuf>,
    /// Only include products whose title contains this text
    #[arg(long)]
    pub search: Option<String>,
    /// Product ordering: latest or highest
    #[arg(long, default_value = "latest")]
    pub sort: SortOrder,
}

impl StatsOptions {
    fn query(&self) -> ProductQuery {
        ProductQuery {
            search: self.search.clone(),
            sort: self.sort,
        }
    }
}

pub fn render_stats(stats: &AggregateStats<'_>, target_currency: &str) -> String {
    let symbol = currency_symbol(target_currency);
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);

    let top_seller = stats.top_seller.map_or("N/A".to_string(), |p| {
        format!("{} ({} sold)", p.title, p.sold)
    });
    let rows = [
        ("Total Products", stats.total_products.to_string()),
        ("Total Sold", stats.total_sold.to_string()),
        ("Total Value", format_money(stats.total_value, &symbol)),
        ("Avg. Rating", format!("{:.2}", stats.average_rating)),
        ("Top Seller", top_seller),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label), ui::amount_cell(value)]);
    }
    table.add_row(vec![
        Cell::new("Total Profit"),
        ui::profit_cell(stats.total_profit, format_money(stats.total_profit, &symbol)),
    ]);
    table.add_row(vec![
        Cell::new("Avg. Profit/Product"),
        ui::profit_cell(
            stats.average_profit,
            format_money(stats.average_profit, &symbol),
        ),
    ]);
    table.add_row(vec![
        Cell::new("Profit Margin"),
        ui::profit_cell(
            stats.profit_margin_percent,
            format_percent(stats.profit_margin_percent),
        ),
    ]);

    table.to_string()
}

pub fn run(config: &AppConfig, options: &StatsOptions) -> Result<()> {
    let path = match (&options.products, &config.products_path) {
        (Some(path), _) => path.clone(),
        (None, Some(path)) => PathBuf::from(path),
        (None, None) => anyhow::bail!(
            "No products file given. Pass --products or set products_path in the config"
        ),
    };

    let products = JsonFileSource::new(&path).products()?;
    let selected = options.query().apply(&products);
    let summary = stats::aggregate(selected);

    println!(
        "{}\n",
        ui::style_text("Product Stats", ui::StyleType::Title)
    );
    println!("{}", render_stats(&summary, &config.currency.target));
    Ok(())
}
