//! Serde schema for catalog data files.
//!
//! Field names are camelCase on the wire in every supported format. The
//! schema converts into the core builder's registration specs; reference
//! resolution and validation happen in `CatalogBuilder::build`.

use serde::Deserialize;
use starfoundry_core::catalog::{EffectSpec, ProducerSpec, UpgradeSpec};
use starfoundry_core::resource::{ResourceKind, ResourceVec};
use std::collections::BTreeMap;

/// Top-level catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogData {
    #[serde(default)]
    pub producers: Vec<ProducerData>,
    #[serde(default)]
    pub upgrades: Vec<UpgradeData>,
}

/// A producer blueprint entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProducerData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub base_cost: ResourceMapData,
    /// Falls back to the engine-wide default growth when absent.
    #[serde(default)]
    pub cost_growth: Option<f64>,
    #[serde(default)]
    pub outputs: ResourceMapData,
    #[serde(default)]
    pub energy_upkeep: f64,
    #[serde(default)]
    pub requires_upgrade: Option<String>,
}

/// A sparse per-resource amount map. Absent resources are zero.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceMapData {
    #[serde(default)]
    pub stardust: f64,
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub research: f64,
}

impl ResourceMapData {
    pub fn to_vec(self) -> ResourceVec {
        let mut v = ResourceVec::ZERO;
        v.set(ResourceKind::Stardust, self.stardust);
        v.set(ResourceKind::Energy, self.energy);
        v.set(ResourceKind::Research, self.research);
        v
    }
}

/// An upgrade entry.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpgradeData {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cost: ResourceMapData,
    #[serde(default)]
    pub effects: EffectsData,
}

/// The effect block of an upgrade, in the original data shape.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectsData {
    /// Additive Stardust per manual action.
    #[serde(default)]
    pub click_power: f64,
    /// Additive Energy per manual action.
    #[serde(default)]
    pub click_energy: f64,
    /// Additive Research per manual action.
    #[serde(default)]
    pub click_research: f64,
    #[serde(default)]
    pub global_multipliers: GlobalMultipliersData,
    /// Per-producer output multipliers, keyed by producer key.
    #[serde(default)]
    pub automation_multipliers: BTreeMap<String, f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalMultipliersData {
    #[serde(default)]
    pub stardust: Option<f64>,
    #[serde(default)]
    pub energy: Option<f64>,
    #[serde(default)]
    pub research: Option<f64>,
}

impl From<ProducerData> for ProducerSpec {
    fn from(data: ProducerData) -> Self {
        ProducerSpec {
            key: data.key,
            name: data.name,
            description: data.description,
            base_cost: data.base_cost.to_vec(),
            cost_growth: data.cost_growth,
            outputs: data.outputs.to_vec(),
            energy_upkeep: data.energy_upkeep,
            requires_upgrade: data.requires_upgrade,
        }
    }
}

impl From<UpgradeData> for UpgradeSpec {
    fn from(data: UpgradeData) -> Self {
        let mut effects = Vec::new();
        let e = data.effects;
        for (resource, amount) in [
            (ResourceKind::Stardust, e.click_power),
            (ResourceKind::Energy, e.click_energy),
            (ResourceKind::Research, e.click_research),
        ] {
            if amount != 0.0 {
                effects.push(EffectSpec::ClickBonus { resource, amount });
            }
        }
        for (resource, factor) in [
            (ResourceKind::Stardust, e.global_multipliers.stardust),
            (ResourceKind::Energy, e.global_multipliers.energy),
            (ResourceKind::Research, e.global_multipliers.research),
        ] {
            if let Some(factor) = factor {
                effects.push(EffectSpec::GlobalMultiplier { resource, factor });
            }
        }
        for (producer, factor) in e.automation_multipliers {
            effects.push(EffectSpec::ProducerMultiplier { producer, factor });
        }
        UpgradeSpec {
            key: data.key,
            name: data.name,
            description: data.description,
            cost: data.cost.to_vec(),
            effects,
        }
    }
}
