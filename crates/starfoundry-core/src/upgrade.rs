//! Derived upgrade effects and the recompute fold.
//!
//! [`Effects`] is never persisted: it is a pure function of the purchased
//! upgrade set (plus the legacy import bonus), recomputed from baseline
//! after every purchase and every load. That keeps stored multipliers from
//! ever drifting out of sync with the upgrades that produced them.

use crate::catalog::{Catalog, UpgradeEffect};
use crate::id::{ProducerId, UpgradeId};
use crate::resource::{ResourceKind, ResourceVec};

/// Derived per-session modifiers: manual-action yields, global per-resource
/// output multipliers, and per-producer output multipliers.
#[derive(Debug, Clone, PartialEq)]
pub struct Effects {
    /// Resources granted per manual action. Baseline: 1 Stardust.
    pub click_yield: ResourceVec,
    /// Global output multiplier per resource. Baseline: 1.
    pub global_mult: ResourceVec,
    /// Output multiplier per producer. Baseline: 1.
    producer_mult: Vec<f64>,
}

impl Effects {
    /// The unmodified baseline for a catalog with `producer_count` producers.
    pub fn baseline(producer_count: usize) -> Self {
        Self {
            click_yield: ResourceVec::of(ResourceKind::Stardust, 1.0),
            global_mult: ResourceVec::splat(1.0),
            producer_mult: vec![1.0; producer_count],
        }
    }

    /// Fold every purchased upgrade's effects over the baseline.
    ///
    /// Additive click bonuses sum; multipliers multiply. The fold reads no
    /// prior effect state, so it is idempotent and order-independent.
    /// Unknown ids are skipped (restore already filters them).
    pub fn recompute(catalog: &Catalog, purchased: &[UpgradeId], legacy_stardust_bonus: f64) -> Self {
        let mut effects = Effects::baseline(catalog.producer_count());
        for &id in purchased {
            let Some(def) = catalog.upgrade(id) else {
                continue;
            };
            for &effect in &def.effects {
                match effect {
                    UpgradeEffect::ClickBonus { resource, amount } => {
                        effects.click_yield.add(resource, amount);
                    }
                    UpgradeEffect::GlobalMultiplier { resource, factor } => {
                        effects.global_mult[resource] *= factor;
                    }
                    UpgradeEffect::ProducerMultiplier { producer, factor } => {
                        if let Some(slot) = effects.producer_mult.get_mut(producer.0 as usize) {
                            *slot *= factor;
                        }
                    }
                }
            }
        }
        effects.global_mult[ResourceKind::Stardust] *= legacy_stardust_bonus;
        effects
    }

    /// Output multiplier for a producer. 1 for unknown ids.
    pub fn producer_mult(&self, id: ProducerId) -> f64 {
        self.producer_mult.get(id.0 as usize).copied().unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogBuilder, EffectSpec, ProducerSpec, UpgradeSpec};

    fn catalog() -> Catalog {
        let mut b = CatalogBuilder::new();
        b.register_producer(ProducerSpec {
            key: "drone".into(),
            outputs: ResourceVec::of(ResourceKind::Stardust, 0.9),
            ..Default::default()
        });
        b.register_upgrade(UpgradeSpec {
            key: "protocols".into(),
            effects: vec![
                EffectSpec::ClickBonus {
                    resource: ResourceKind::Stardust,
                    amount: 2.0,
                },
                EffectSpec::ClickBonus {
                    resource: ResourceKind::Energy,
                    amount: 1.0,
                },
            ],
            ..Default::default()
        });
        b.register_upgrade(UpgradeSpec {
            key: "containment".into(),
            effects: vec![EffectSpec::GlobalMultiplier {
                resource: ResourceKind::Stardust,
                factor: 1.55,
            }],
            ..Default::default()
        });
        b.register_upgrade(UpgradeSpec {
            key: "megastructure".into(),
            effects: vec![EffectSpec::GlobalMultiplier {
                resource: ResourceKind::Stardust,
                factor: 1.4,
            }],
            ..Default::default()
        });
        b.register_upgrade(UpgradeSpec {
            key: "overseer".into(),
            effects: vec![EffectSpec::ProducerMultiplier {
                producer: "drone".into(),
                factor: 1.5,
            }],
            ..Default::default()
        });
        b.build().unwrap()
    }

    #[test]
    fn baseline_click_is_one_stardust() {
        let e = Effects::baseline(3);
        assert_eq!(e.click_yield[ResourceKind::Stardust], 1.0);
        assert_eq!(e.click_yield[ResourceKind::Energy], 0.0);
        assert_eq!(e.global_mult, ResourceVec::splat(1.0));
        assert_eq!(e.producer_mult(ProducerId(0)), 1.0);
    }

    #[test]
    fn click_bonuses_sum() {
        let c = catalog();
        let purchased = vec![c.upgrade_id("protocols").unwrap()];
        let e = Effects::recompute(&c, &purchased, 1.0);
        assert_eq!(e.click_yield[ResourceKind::Stardust], 3.0);
        assert_eq!(e.click_yield[ResourceKind::Energy], 1.0);
    }

    #[test]
    fn global_multipliers_multiply_not_add() {
        let c = catalog();
        let purchased = vec![
            c.upgrade_id("containment").unwrap(),
            c.upgrade_id("megastructure").unwrap(),
        ];
        let e = Effects::recompute(&c, &purchased, 1.0);
        let m = e.global_mult[ResourceKind::Stardust];
        assert!((m - 2.17).abs() < 1e-9, "expected 1.55 * 1.4 = 2.17, got {m}");
    }

    #[test]
    fn producer_multiplier_targets_single_producer() {
        let c = catalog();
        let purchased = vec![c.upgrade_id("overseer").unwrap()];
        let e = Effects::recompute(&c, &purchased, 1.0);
        assert_eq!(e.producer_mult(c.producer_id("drone").unwrap()), 1.5);
        assert_eq!(e.producer_mult(ProducerId(99)), 1.0);
    }

    #[test]
    fn recompute_is_idempotent() {
        let c = catalog();
        let purchased = vec![
            c.upgrade_id("protocols").unwrap(),
            c.upgrade_id("containment").unwrap(),
        ];
        let once = Effects::recompute(&c, &purchased, 1.0);
        let twice = Effects::recompute(&c, &purchased, 1.0);
        assert_eq!(once, twice);
    }

    #[test]
    fn recompute_is_order_independent() {
        let c = catalog();
        let forward = vec![
            c.upgrade_id("containment").unwrap(),
            c.upgrade_id("megastructure").unwrap(),
            c.upgrade_id("overseer").unwrap(),
        ];
        let reversed: Vec<_> = forward.iter().rev().copied().collect();
        assert_eq!(
            Effects::recompute(&c, &forward, 1.0),
            Effects::recompute(&c, &reversed, 1.0)
        );
    }

    #[test]
    fn legacy_bonus_folds_into_stardust() {
        let c = catalog();
        let e = Effects::recompute(&c, &[], 2.0);
        assert_eq!(e.global_mult[ResourceKind::Stardust], 2.0);
        assert_eq!(e.global_mult[ResourceKind::Energy], 1.0);
    }

    #[test]
    fn unknown_ids_are_skipped() {
        let c = catalog();
        let e = Effects::recompute(&c, &[UpgradeId(999)], 1.0);
        assert_eq!(e, Effects::baseline(c.producer_count()));
    }
}
