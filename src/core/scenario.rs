//! Named, persisted snapshots of pricing inputs.
//!
//! The whole collection is written to the key-value store as one JSON
//! document on every mutation. Mutations are staged on a copy and only
//! committed in memory once the write succeeds, so a storage failure leaves
//! the store exactly as it was.

use crate::core::error::{Error, Result};
use crate::core::kv::KeyValueStore;
use crate::core::pricing::PricingInputs;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Storage key holding the serialized collection.
pub const SCENARIOS_KEY: &str = "pricing_scenarios";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioId(Uuid);

impl ScenarioId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ScenarioId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ScenarioId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scenario {
    pub id: ScenarioId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub inputs: PricingInputs,
}

/// On-disk shape. Collections written before scenarios carried ids have
/// neither `id` nor `name`.
#[derive(Deserialize)]
struct StoredScenario {
    #[serde(default)]
    id: Option<ScenarioId>,
    #[serde(default)]
    name: Option<String>,
    #[serde(flatten)]
    inputs: PricingInputs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    NoSelection,
    Editing(ScenarioId),
}

pub struct ScenarioStore<S: KeyValueStore> {
    storage: S,
    scenarios: Vec<Scenario>,
    selection: Selection,
    current: PricingInputs,
    baseline: PricingInputs,
}

impl<S: KeyValueStore> ScenarioStore<S> {
    /// Opens the store with [`PricingInputs::BASELINE`] as the reset value.
    pub fn open(storage: S) -> Result<Self> {
        Self::open_with_baseline(storage, PricingInputs::BASELINE)
    }

    /// Reads the persisted collection once. Scenarios without an id are
    /// assigned one and the collection is written back so ids stay stable
    /// across sessions.
    pub fn open_with_baseline(storage: S, baseline: PricingInputs) -> Result<Self> {
        let stored: Vec<StoredScenario> = match storage.get(SCENARIOS_KEY)? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };

        let mut needs_ids = false;
        let scenarios: Vec<Scenario> = stored
            .into_iter()
            .map(|s| {
                needs_ids |= s.id.is_none();
                Scenario {
                    id: s.id.unwrap_or_default(),
                    name: s.name,
                    inputs: s.inputs,
                }
            })
            .collect();
        debug!(count = scenarios.len(), "Loaded scenarios");

        let store = Self {
            storage,
            scenarios,
            selection: Selection::NoSelection,
            current: baseline,
            baseline,
        };
        if needs_ids {
            info!("Assigning ids to legacy scenarios");
            store.persist(&store.scenarios)?;
        }
        Ok(store)
    }

    pub fn list(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Inputs currently being worked on.
    pub fn current(&self) -> &PricingInputs {
        &self.current
    }

    pub fn set_current(&mut self, inputs: PricingInputs) {
        self.current = inputs;
    }

    pub fn get(&self, id: &ScenarioId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.id == *id)
    }

    pub fn position(&self, id: &ScenarioId) -> Option<usize> {
        self.scenarios.iter().position(|s| s.id == *id)
    }

    /// Id of the scenario at `index` in insertion order.
    pub fn id_at(&self, index: usize) -> Result<ScenarioId> {
        self.scenarios
            .get(index)
            .map(|s| s.id)
            .ok_or(Error::IndexOutOfRange {
                index,
                len: self.scenarios.len(),
            })
    }

    pub fn save(&mut self, inputs: PricingInputs) -> Result<ScenarioId> {
        self.save_named(None, inputs)
    }

    /// Appends a new scenario, or overwrites the one being edited.
    ///
    /// With no selection a new entry is appended and nothing becomes
    /// selected. While editing, the selected entry is replaced in place (its
    /// name kept unless `name` is given) and the selection is cleared.
    pub fn save_named(&mut self, name: Option<String>, inputs: PricingInputs) -> Result<ScenarioId> {
        inputs.validate()?;

        let mut staged = self.scenarios.clone();
        let id = match self.selection {
            Selection::NoSelection => {
                let scenario = Scenario {
                    id: ScenarioId::new(),
                    name,
                    inputs,
                };
                let id = scenario.id;
                staged.push(scenario);
                id
            }
            Selection::Editing(id) => {
                let slot = staged
                    .iter_mut()
                    .find(|s| s.id == id)
                    .ok_or(Error::ScenarioNotFound(id))?;
                slot.inputs = inputs;
                if name.is_some() {
                    slot.name = name;
                }
                id
            }
        };

        self.commit(staged)?;
        debug!(%id, was = ?self.selection, "Saved scenario");
        self.selection = Selection::NoSelection;
        self.current = inputs;
        Ok(id)
    }

    /// Returns the stored inputs and starts editing that scenario.
    pub fn load(&mut self, id: &ScenarioId) -> Result<PricingInputs> {
        let inputs = self.get(id).ok_or(Error::ScenarioNotFound(*id))?.inputs;
        self.selection = Selection::Editing(*id);
        self.current = inputs;
        debug!(%id, "Loaded scenario for editing");
        Ok(inputs)
    }

    pub fn load_at(&mut self, index: usize) -> Result<PricingInputs> {
        let id = self.id_at(index)?;
        self.load(&id)
    }

    /// Replaces a scenario's inputs without touching the selection.
    pub fn update(&mut self, id: &ScenarioId, inputs: PricingInputs) -> Result<()> {
        inputs.validate()?;

        let mut staged = self.scenarios.clone();
        let slot = staged
            .iter_mut()
            .find(|s| s.id == *id)
            .ok_or(Error::ScenarioNotFound(*id))?;
        slot.inputs = inputs;

        self.commit(staged)?;
        debug!(%id, "Updated scenario");
        Ok(())
    }

    /// Removes a scenario. Selecting by id means deleting some other entry
    /// never changes which scenario is being edited.
    pub fn delete(&mut self, id: &ScenarioId) -> Result<Scenario> {
        let index = self.position(id).ok_or(Error::ScenarioNotFound(*id))?;

        let mut staged = self.scenarios.clone();
        let removed = staged.remove(index);
        self.commit(staged)?;

        if self.selection == Selection::Editing(*id) {
            self.selection = Selection::NoSelection;
        }
        debug!(%id, index, "Deleted scenario");
        Ok(removed)
    }

    pub fn delete_at(&mut self, index: usize) -> Result<Scenario> {
        let id = self.id_at(index)?;
        self.delete(&id)
    }

    /// Resets the working inputs to the baseline and drops the selection.
    /// The stored collection is left alone.
    pub fn clear(&mut self) -> PricingInputs {
        self.current = self.baseline;
        self.selection = Selection::NoSelection;
        self.current
    }

    fn commit(&mut self, staged: Vec<Scenario>) -> Result<()> {
        self.persist(&staged)?;
        self.scenarios = staged;
        Ok(())
    }

    fn persist(&self, scenarios: &[Scenario]) -> Result<()> {
        let raw = serde_json::to_string(scenarios)?;
        self.storage.set(SCENARIOS_KEY, &raw).inspect_err(|e| {
            warn!(error = %e, "Failed to persist scenarios");
        })
    }
}
