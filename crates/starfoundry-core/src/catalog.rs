//! Static game content: producer blueprints and upgrade definitions.
//!
//! Content is registered into a [`CatalogBuilder`] and frozen into an
//! immutable [`Catalog`] at startup. Cross-references (producer unlock
//! prerequisites, per-producer upgrade effects) are given as string keys at
//! registration time and resolved to typed ids when the catalog is built,
//! so registration order never matters.

use crate::id::{ProducerId, UpgradeId};
use crate::resource::{ResourceKind, ResourceVec};
use std::collections::HashMap;

/// Per-unit cost growth applied when a blueprint does not override it.
pub const COST_GROWTH_DEFAULT: f64 = 1.16;

// ---------------------------------------------------------------------------
// Definitions (frozen)
// ---------------------------------------------------------------------------

/// A producer blueprint: a purchasable unit that generates output every
/// tick at a count-scaled rate, optionally consuming Energy upkeep.
#[derive(Debug, Clone)]
pub struct ProducerDef {
    pub key: String,
    pub name: String,
    pub description: String,
    /// Cost of the first unit. Subsequent units scale by `cost_growth`.
    pub base_cost: ResourceVec,
    /// Per-unit compounding price factor.
    pub cost_growth: f64,
    /// Per-unit output rates, per second.
    pub outputs: ResourceVec,
    /// Energy drained per second per owned unit. Zero-upkeep producers
    /// never idle under scarcity.
    pub energy_upkeep: f64,
    /// Upgrade that must be purchased before this blueprint unlocks.
    pub requires_upgrade: Option<UpgradeId>,
}

/// One effect of an upgrade. A closed set so the resolver's fold is
/// total and exhaustive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UpgradeEffect {
    /// Adds to the manual-action yield of a resource.
    ClickBonus { resource: ResourceKind, amount: f64 },
    /// Multiplies the global output multiplier for a resource.
    GlobalMultiplier { resource: ResourceKind, factor: f64 },
    /// Multiplies a single producer's output multiplier.
    ProducerMultiplier { producer: ProducerId, factor: f64 },
}

/// An upgrade definition: a one-time purchase with a fixed cost and a set
/// of permanent effects.
#[derive(Debug, Clone)]
pub struct UpgradeDef {
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: ResourceVec,
    pub effects: Vec<UpgradeEffect>,
}

// ---------------------------------------------------------------------------
// Registration specs (string-keyed, pre-resolution)
// ---------------------------------------------------------------------------

/// Producer registration input. References upgrades by key.
#[derive(Debug, Clone, Default)]
pub struct ProducerSpec {
    pub key: String,
    pub name: String,
    pub description: String,
    pub base_cost: ResourceVec,
    /// `None` means [`COST_GROWTH_DEFAULT`].
    pub cost_growth: Option<f64>,
    pub outputs: ResourceVec,
    pub energy_upkeep: f64,
    pub requires_upgrade: Option<String>,
}

/// Upgrade effect registration input. References producers by key.
#[derive(Debug, Clone)]
pub enum EffectSpec {
    ClickBonus { resource: ResourceKind, amount: f64 },
    GlobalMultiplier { resource: ResourceKind, factor: f64 },
    ProducerMultiplier { producer: String, factor: f64 },
}

/// Upgrade registration input.
#[derive(Debug, Clone, Default)]
pub struct UpgradeSpec {
    pub key: String,
    pub name: String,
    pub description: String,
    pub cost: ResourceVec,
    pub effects: Vec<EffectSpec>,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("duplicate key: '{0}'")]
    DuplicateKey(String),
    #[error("producer '{producer}' requires unknown upgrade '{upgrade}'")]
    UnknownUpgradeRef { producer: String, upgrade: String },
    #[error("upgrade '{upgrade}' targets unknown producer '{producer}'")]
    UnknownProducerRef { upgrade: String, producer: String },
    #[error("upgrade '{upgrade}' has non-positive multiplier {factor}")]
    InvalidFactor { upgrade: String, factor: f64 },
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Collects specs, then resolves and validates them into a frozen
/// [`Catalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    producers: Vec<ProducerSpec>,
    upgrades: Vec<UpgradeSpec>,
}

impl CatalogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a producer blueprint. Returns the id it will have once built.
    pub fn register_producer(&mut self, spec: ProducerSpec) -> ProducerId {
        let id = ProducerId(self.producers.len() as u32);
        self.producers.push(spec);
        id
    }

    /// Register an upgrade definition. Returns the id it will have once built.
    pub fn register_upgrade(&mut self, spec: UpgradeSpec) -> UpgradeId {
        let id = UpgradeId(self.upgrades.len() as u32);
        self.upgrades.push(spec);
        id
    }

    /// Resolve references, validate, and freeze.
    pub fn build(self) -> Result<Catalog, CatalogError> {
        let mut producer_ids = HashMap::new();
        for (i, spec) in self.producers.iter().enumerate() {
            if producer_ids
                .insert(spec.key.clone(), ProducerId(i as u32))
                .is_some()
            {
                return Err(CatalogError::DuplicateKey(spec.key.clone()));
            }
        }
        let mut upgrade_ids = HashMap::new();
        for (i, spec) in self.upgrades.iter().enumerate() {
            if upgrade_ids.contains_key(&spec.key) || producer_ids.contains_key(&spec.key) {
                return Err(CatalogError::DuplicateKey(spec.key.clone()));
            }
            upgrade_ids.insert(spec.key.clone(), UpgradeId(i as u32));
        }

        let mut producers = Vec::with_capacity(self.producers.len());
        for spec in self.producers {
            let requires_upgrade = match &spec.requires_upgrade {
                None => None,
                Some(key) => Some(*upgrade_ids.get(key).ok_or_else(|| {
                    CatalogError::UnknownUpgradeRef {
                        producer: spec.key.clone(),
                        upgrade: key.clone(),
                    }
                })?),
            };
            producers.push(ProducerDef {
                key: spec.key,
                name: spec.name,
                description: spec.description,
                base_cost: spec.base_cost,
                cost_growth: spec.cost_growth.unwrap_or(COST_GROWTH_DEFAULT),
                outputs: spec.outputs,
                energy_upkeep: spec.energy_upkeep,
                requires_upgrade,
            });
        }

        let mut upgrades = Vec::with_capacity(self.upgrades.len());
        for spec in self.upgrades {
            let mut effects = Vec::with_capacity(spec.effects.len());
            for effect in spec.effects {
                let resolved = match effect {
                    EffectSpec::ClickBonus { resource, amount } => {
                        UpgradeEffect::ClickBonus { resource, amount }
                    }
                    EffectSpec::GlobalMultiplier { resource, factor } => {
                        if factor <= 0.0 {
                            return Err(CatalogError::InvalidFactor {
                                upgrade: spec.key.clone(),
                                factor,
                            });
                        }
                        UpgradeEffect::GlobalMultiplier { resource, factor }
                    }
                    EffectSpec::ProducerMultiplier { producer, factor } => {
                        if factor <= 0.0 {
                            return Err(CatalogError::InvalidFactor {
                                upgrade: spec.key.clone(),
                                factor,
                            });
                        }
                        let id = *producer_ids.get(&producer).ok_or_else(|| {
                            CatalogError::UnknownProducerRef {
                                upgrade: spec.key.clone(),
                                producer: producer.clone(),
                            }
                        })?;
                        UpgradeEffect::ProducerMultiplier {
                            producer: id,
                            factor,
                        }
                    }
                };
                effects.push(resolved);
            }
            upgrades.push(UpgradeDef {
                key: spec.key,
                name: spec.name,
                description: spec.description,
                cost: spec.cost,
                effects,
            });
        }

        Ok(Catalog {
            producers,
            producer_ids,
            upgrades,
            upgrade_ids,
        })
    }
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// Immutable game content. Frozen after build(). Safe to share.
#[derive(Debug)]
pub struct Catalog {
    producers: Vec<ProducerDef>,
    producer_ids: HashMap<String, ProducerId>,
    upgrades: Vec<UpgradeDef>,
    upgrade_ids: HashMap<String, UpgradeId>,
}

impl Catalog {
    pub fn producer(&self, id: ProducerId) -> Option<&ProducerDef> {
        self.producers.get(id.0 as usize)
    }

    pub fn upgrade(&self, id: UpgradeId) -> Option<&UpgradeDef> {
        self.upgrades.get(id.0 as usize)
    }

    pub fn producer_id(&self, key: &str) -> Option<ProducerId> {
        self.producer_ids.get(key).copied()
    }

    pub fn upgrade_id(&self, key: &str) -> Option<UpgradeId> {
        self.upgrade_ids.get(key).copied()
    }

    pub fn producer_count(&self) -> usize {
        self.producers.len()
    }

    pub fn upgrade_count(&self) -> usize {
        self.upgrades.len()
    }

    /// Iterate producers in registration order.
    pub fn producers(&self) -> impl Iterator<Item = (ProducerId, &ProducerDef)> {
        self.producers
            .iter()
            .enumerate()
            .map(|(i, def)| (ProducerId(i as u32), def))
    }

    /// Iterate upgrades in registration order.
    pub fn upgrades(&self) -> impl Iterator<Item = (UpgradeId, &UpgradeDef)> {
        self.upgrades
            .iter()
            .enumerate()
            .map(|(i, def)| (UpgradeId(i as u32), def))
    }
}
