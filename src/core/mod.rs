//! Core business logic: pricing, scenarios and profit aggregation

pub mod config;
pub mod error;
pub mod kv;
pub mod log;
pub mod numeric;
pub mod presentation;
pub mod pricing;
pub mod product;
pub mod scenario;
pub mod stats;

// Re-export main types for cleaner imports
pub use error::{Error, Result};
pub use kv::KeyValueStore;
pub use pricing::{PricingInputs, PricingResult, compute};
pub use product::{Product, ProductCost, ProductQuery, ProductSource, SortOrder};
pub use scenario::{Scenario, ScenarioId, ScenarioStore, Selection};
pub use stats::{AggregateStats, aggregate};
