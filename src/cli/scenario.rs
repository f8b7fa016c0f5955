use super::price::{PricingOverrides, render_breakdown};
use super::ui;
use crate::core::config::AppConfig;
use crate::core::kv::KeyValueStore;
use crate::core::presentation::{currency_symbol, format_money};
use crate::core::pricing;
use crate::core::scenario::{ScenarioId, ScenarioStore};
use anyhow::{Result, anyhow, bail};
use comfy_table::Cell;
use tracing::debug;

#[derive(Debug, Clone, clap::Subcommand)]
pub enum ScenarioCommand {
    /// List saved scenarios
    List,
    /// Save a new scenario from the baseline plus any overrides
    Save {
        /// Label shown in the scenario list
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        inputs: PricingOverrides,
    },
    /// Price a saved scenario
    Show {
        /// Position in the list (1-based) or id prefix
        reference: String,
    },
    /// Change fields of a saved scenario
    Update {
        /// Position in the list (1-based) or id prefix
        reference: String,
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        inputs: PricingOverrides,
    },
    /// Delete a saved scenario
    Delete {
        /// Position in the list (1-based) or id prefix
        reference: String,
    },
}

const SHORT_ID_LEN: usize = 8;

/// Resolves a 1-based list position, a full id or a unique id prefix.
///
/// Digit-only references shorter than a short id are always positions, so an
/// out-of-range position fails instead of matching an id that starts with
/// the same digits.
pub fn resolve<S: KeyValueStore>(store: &ScenarioStore<S>, reference: &str) -> Result<ScenarioId> {
    let reference = reference.trim();
    if reference.is_empty() {
        bail!("Empty scenario reference");
    }
    let is_position =
        reference.len() < SHORT_ID_LEN && reference.bytes().all(|b| b.is_ascii_digit());
    if is_position {
        let position: usize = reference.parse()?;
        if position == 0 {
            bail!("Scenario positions start at 1");
        }
        return Ok(store.id_at(position - 1)?);
    }
    if let Ok(id) = reference.parse::<ScenarioId>() {
        return store
            .get(&id)
            .map(|s| s.id)
            .ok_or_else(|| anyhow!("Scenario not found: {id}"));
    }

    let needle = reference.to_lowercase();
    let mut matches = store
        .list()
        .iter()
        .filter(|s| s.id.to_string().starts_with(&needle));
    match (matches.next(), matches.next()) {
        (Some(s), None) => Ok(s.id),
        (Some(_), Some(_)) => bail!("Scenario reference '{reference}' is ambiguous"),
        (None, _) => bail!("No scenario matches '{reference}'"),
    }
}

fn short_id(id: &ScenarioId) -> String {
    id.to_string().chars().take(SHORT_ID_LEN).collect()
}

pub fn render_list<S: KeyValueStore>(store: &ScenarioStore<S>, config: &AppConfig) -> String {
    if store.is_empty() {
        return ui::style_text("No saved scenarios.", ui::StyleType::Subtle);
    }

    let source = currency_symbol(&config.currency.source);
    let target = currency_symbol(&config.currency.target);
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Id"),
        ui::header_cell("Name"),
        ui::header_cell("Cost"),
        ui::header_cell("Rate"),
        ui::header_cell("Markup (%)"),
        ui::header_cell("eBay (%)"),
        ui::header_cell("Ad (%)"),
        ui::header_cell("Price"),
        ui::header_cell("Net Profit"),
    ]);

    for (i, scenario) in store.list().iter().enumerate() {
        let inputs = &scenario.inputs;
        let mut row = vec![
            Cell::new(i + 1),
            Cell::new(short_id(&scenario.id)),
            Cell::new(scenario.name.as_deref().unwrap_or("-")),
            Cell::new(format!(
                "{}+{}",
                format_money(inputs.product_cost, &source),
                format_money(inputs.shipping, &source)
            )),
            ui::amount_cell(format!("{}", inputs.conversion_rate)),
            ui::amount_cell(format!("{}", inputs.markup_percent)),
            ui::amount_cell(format!("{}", inputs.ebay_fee_percent)),
            ui::amount_cell(format!("{}", inputs.ad_fee_percent)),
        ];
        match pricing::compute(inputs) {
            Ok(result) => {
                row.push(ui::amount_cell(format_money(result.suggested_price, &target)));
                row.push(ui::profit_cell(
                    result.net_profit,
                    format_money(result.net_profit, &target),
                ));
            }
            Err(e) => {
                debug!(id = %scenario.id, error = %e, "Cannot price scenario");
                row.push(ui::na_cell(true));
                row.push(ui::na_cell(true));
            }
        }
        table.add_row(row);
    }
    table.to_string()
}

/// Runs one scenario command against `store`.
pub fn execute<S: KeyValueStore>(
    store: &mut ScenarioStore<S>,
    config: &AppConfig,
    command: &ScenarioCommand,
) -> Result<String> {
    let output = match command {
        ScenarioCommand::List => render_list(store, config),
        ScenarioCommand::Save { name, inputs } => {
            let inputs = inputs.apply(*store.current());
            let id = store.save_named(name.clone(), inputs)?;
            format!("Saved scenario {} ({})", store.len(), short_id(&id))
        }
        ScenarioCommand::Show { reference } => {
            let id = resolve(store, reference)?;
            let inputs = store.load(&id)?;
            let result = pricing::compute(&inputs)?;
            store.clear();

            let title = store
                .get(&id)
                .and_then(|s| s.name.clone())
                .unwrap_or_else(|| format!("Scenario {}", short_id(&id)));
            format!(
                "{}\n\n{}",
                ui::style_text(&title, ui::StyleType::Title),
                render_breakdown(&result, &config.currency)
            )
        }
        ScenarioCommand::Update {
            reference,
            name,
            inputs,
        } => {
            if inputs.is_empty() && name.is_none() {
                bail!("Nothing to update. Pass at least one field to change");
            }
            let id = resolve(store, reference)?;
            let loaded = store.load(&id)?;
            let saved = store.save_named(name.clone(), inputs.apply(loaded));
            if saved.is_err() {
                store.clear();
            }
            saved?;
            format!("Updated scenario {}", short_id(&id))
        }
        ScenarioCommand::Delete { reference } => {
            let id = resolve(store, reference)?;
            store.delete(&id)?;
            format!("Deleted scenario {}", short_id(&id))
        }
    };
    Ok(output)
}

pub fn run<S: KeyValueStore>(storage: S, config: &AppConfig, command: &ScenarioCommand) -> Result<()> {
    let mut store = ScenarioStore::open_with_baseline(storage, config.baseline())?;
    let output = execute(&mut store, config, command)?;
    println!("{output}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Error;
    use crate::core::pricing::PricingInputs;
    use crate::core::scenario::SCENARIOS_KEY;
    use crate::store::memory::MemoryStore;

    fn store_with(count: usize) -> ScenarioStore<MemoryStore> {
        let mut store = ScenarioStore::open(MemoryStore::new()).unwrap();
        for i in 0..count {
            store
                .save(PricingInputs {
                    product_cost: i as f64,
                    ..PricingInputs::BASELINE
                })
                .unwrap();
        }
        store
    }

    #[test]
    fn test_resolve_by_position_and_id() {
        let store = store_with(3);
        let second = store.list()[1].id;

        assert_eq!(resolve(&store, "2").unwrap(), second);
        assert_eq!(resolve(&store, &second.to_string()).unwrap(), second);
        assert_eq!(resolve(&store, &short_id(&second)).unwrap(), second);
        assert!(resolve(&store, "0").is_err());
        assert!(resolve(&store, "4").is_err());
        assert!(resolve(&store, "zz-not-an-id").is_err());
        assert!(resolve(&store, "  ").is_err());
    }

    /// Store holding scenarios with the given ids, in order.
    fn store_with_ids(ids: &[&str]) -> ScenarioStore<MemoryStore> {
        let storage = MemoryStore::new();
        let rows: Vec<String> = ids
            .iter()
            .map(|id| {
                format!(
                    r#"{{"id":"{id}","productCost":3,"shipping":40,"conversionRate":4,"markupPercent":60,"ebayFeePercent":13,"adFeePercent":0}}"#
                )
            })
            .collect();
        storage
            .set(SCENARIOS_KEY, &format!("[{}]", rows.join(",")))
            .unwrap();
        ScenarioStore::open(storage).unwrap()
    }

    #[test]
    fn test_out_of_range_position_never_matches_id_prefix() {
        let mut store = store_with_ids(&[
            "40000000-0000-4000-8000-000000000001",
            "41000000-0000-4000-8000-000000000002",
            "12345678-0000-4000-8000-000000000003",
        ]);
        let config = AppConfig::default();

        let err = resolve(&store, "4").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::IndexOutOfRange { index: 3, len: 3 })
        ));

        let delete = ScenarioCommand::Delete {
            reference: "4".into(),
        };
        assert!(execute(&mut store, &config, &delete).is_err());
        assert_eq!(store.len(), 3);

        assert_eq!(resolve(&store, "3").unwrap(), store.list()[2].id);
        assert!(matches!(
            resolve(&store, "41").unwrap_err().downcast_ref::<Error>(),
            Some(Error::IndexOutOfRange { index: 40, .. })
        ));
        assert_eq!(resolve(&store, "12345678").unwrap(), store.list()[2].id);
        assert_eq!(resolve(&store, "40000000").unwrap(), store.list()[0].id);
    }

    #[test]
    fn test_save_update_delete_flow() {
        let config = AppConfig::default();
        let mut store = store_with(0);

        let save = ScenarioCommand::Save {
            name: Some("scarf".into()),
            inputs: PricingOverrides {
                product_cost: Some(47.0),
                conversion_rate: Some(4.7),
                ..PricingOverrides::default()
            },
        };
        execute(&mut store, &config, &save).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].inputs.product_cost, 47.0);
        assert_eq!(store.list()[0].inputs.shipping, PricingInputs::BASELINE.shipping);

        let update = ScenarioCommand::Update {
            reference: "1".into(),
            name: None,
            inputs: PricingOverrides {
                markup_percent: Some(80.0),
                ..PricingOverrides::default()
            },
        };
        execute(&mut store, &config, &update).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.list()[0].inputs.markup_percent, 80.0);
        assert_eq!(store.list()[0].inputs.product_cost, 47.0);
        assert_eq!(store.list()[0].name.as_deref(), Some("scarf"));

        let listing = execute(&mut store, &config, &ScenarioCommand::List).unwrap();
        assert!(listing.contains("scarf"));

        let shown = execute(
            &mut store,
            &config,
            &ScenarioCommand::Show {
                reference: "1".into(),
            },
        )
        .unwrap();
        assert!(shown.contains("Suggested Price"));

        execute(
            &mut store,
            &config,
            &ScenarioCommand::Delete {
                reference: "1".into(),
            },
        )
        .unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_invalid_update_is_rejected() {
        let config = AppConfig::default();
        let mut store = store_with(1);
        let update = ScenarioCommand::Update {
            reference: "1".into(),
            name: None,
            inputs: PricingOverrides {
                conversion_rate: Some(0.0),
                ..PricingOverrides::default()
            },
        };

        assert!(execute(&mut store, &config, &update).is_err());
        assert_eq!(store.list()[0].inputs.conversion_rate, 4.0);

        let empty = ScenarioCommand::Update {
            reference: "1".into(),
            name: None,
            inputs: PricingOverrides::default(),
        };
        assert!(execute(&mut store, &config, &empty).is_err());
    }
}
