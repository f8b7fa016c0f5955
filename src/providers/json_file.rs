use crate::core::product::{Product, ProductRecord, ProductSource};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads products from a JSON array exported from the product table.
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ProductSource for JsonFileSource {
    fn products(&self) -> Result<Vec<Product>> {
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read products file: {}", self.path.display()))?;
        let records: Vec<ProductRecord> = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse products file: {}", self.path.display()))?;
        debug!(count = records.len(), "Loaded product records");
        Ok(records.into_iter().map(Product::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_product_export() -> Result<()> {
        let file = tempfile::NamedTempFile::new()?;
        fs::write(
            file.path(),
            r#"[
                {"title": "Batik scarf", "price": 20, "sold": 5, "cost_price_myr": 47, "exchange_rate": 4.7, "postage_cost": 1},
                {"title": "Kite", "price": "10", "sold": 3, "cost_price_usd": 4}
            ]"#,
        )?;

        let products = JsonFileSource::new(file.path()).products()?;
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].price, Some(10.0));
        Ok(())
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let source = JsonFileSource::new("/definitely/not/here.json");
        let err = source.products().unwrap_err();
        assert!(err.to_string().contains("Failed to read products file"));
    }
}
