//! Resource kinds and the dense per-kind value vector.
//!
//! All quantities, rates, costs, yields, and multipliers in the engine are
//! carried as a [`ResourceVec`]: one `f64` slot per [`ResourceKind`].

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Maximum Energy that can be banked. Production beyond the cap is
/// discarded, not carried forward.
pub const ENERGY_STORAGE_CAP: f64 = 1e12;

// ---------------------------------------------------------------------------
// Resource kinds
// ---------------------------------------------------------------------------

/// The three resources tracked by the economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// The primary currency.
    Stardust,
    /// Powers upkeep-bearing producers. Capped at [`ENERGY_STORAGE_CAP`].
    Energy,
    /// Spent on upgrades.
    Research,
}

impl ResourceKind {
    /// All kinds, in canonical order. Use for exhaustive iteration.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Stardust,
        ResourceKind::Energy,
        ResourceKind::Research,
    ];

    /// Display name.
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Stardust => "Stardust",
            ResourceKind::Energy => "Energy",
            ResourceKind::Research => "Research",
        }
    }

    fn slot(self) -> usize {
        match self {
            ResourceKind::Stardust => 0,
            ResourceKind::Energy => 1,
            ResourceKind::Research => 2,
        }
    }
}

// ---------------------------------------------------------------------------
// ResourceVec
// ---------------------------------------------------------------------------

/// A dense per-kind vector of `f64`. Zero by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceVec([f64; 3]);

impl ResourceVec {
    /// The all-zero vector.
    pub const ZERO: ResourceVec = ResourceVec([0.0; 3]);

    /// A vector with the same value in every slot.
    pub fn splat(value: f64) -> Self {
        ResourceVec([value; 3])
    }

    /// A vector with a single nonzero slot.
    pub fn of(kind: ResourceKind, amount: f64) -> Self {
        let mut v = ResourceVec::ZERO;
        v[kind] = amount;
        v
    }

    /// Read a slot.
    pub fn get(&self, kind: ResourceKind) -> f64 {
        self.0[kind.slot()]
    }

    /// Overwrite a slot.
    pub fn set(&mut self, kind: ResourceKind, value: f64) {
        self.0[kind.slot()] = value;
    }

    /// Add to a slot.
    pub fn add(&mut self, kind: ResourceKind, delta: f64) {
        self.0[kind.slot()] += delta;
    }

    /// Iterate `(kind, value)` pairs in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        ResourceKind::ALL.iter().map(|&k| (k, self.get(k)))
    }

    /// True if every slot is exactly zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&v| v == 0.0)
    }
}

impl Index<ResourceKind> for ResourceVec {
    type Output = f64;

    fn index(&self, kind: ResourceKind) -> &f64 {
        &self.0[kind.slot()]
    }
}

impl IndexMut<ResourceKind> for ResourceVec {
    fn index_mut(&mut self, kind: ResourceKind) -> &mut f64 {
        &mut self.0[kind.slot()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_zero() {
        let v = ResourceVec::default();
        assert!(v.is_zero());
        for kind in ResourceKind::ALL {
            assert_eq!(v.get(kind), 0.0);
        }
    }

    #[test]
    fn of_sets_single_slot() {
        let v = ResourceVec::of(ResourceKind::Energy, 35.0);
        assert_eq!(v[ResourceKind::Energy], 35.0);
        assert_eq!(v[ResourceKind::Stardust], 0.0);
        assert_eq!(v[ResourceKind::Research], 0.0);
    }

    #[test]
    fn index_mut_and_add() {
        let mut v = ResourceVec::ZERO;
        v[ResourceKind::Stardust] = 10.0;
        v.add(ResourceKind::Stardust, 2.5);
        assert_eq!(v.get(ResourceKind::Stardust), 12.5);
    }

    #[test]
    fn iter_canonical_order() {
        let mut v = ResourceVec::ZERO;
        v[ResourceKind::Stardust] = 1.0;
        v[ResourceKind::Energy] = 2.0;
        v[ResourceKind::Research] = 3.0;
        let collected: Vec<_> = v.iter().collect();
        assert_eq!(
            collected,
            vec![
                (ResourceKind::Stardust, 1.0),
                (ResourceKind::Energy, 2.0),
                (ResourceKind::Research, 3.0),
            ]
        );
    }

    #[test]
    fn splat_fills_every_slot() {
        let v = ResourceVec::splat(1.0);
        for kind in ResourceKind::ALL {
            assert_eq!(v[kind], 1.0);
        }
    }

    #[test]
    fn serde_round_trip() {
        let v = ResourceVec::of(ResourceKind::Research, 45.0);
        let json = serde_json::to_string(&v).unwrap();
        let back: ResourceVec = serde_json::from_str(&json).unwrap();
        assert_eq!(v, back);
    }

    #[test]
    fn kind_names() {
        assert_eq!(ResourceKind::Stardust.name(), "Stardust");
        assert_eq!(ResourceKind::Energy.name(), "Energy");
        assert_eq!(ResourceKind::Research.name(), "Research");
    }
}
