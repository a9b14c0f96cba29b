//! Starfoundry Core -- the simulation engine for an incremental
//! resource-accrual game.
//!
//! A player accrues Stardust through manual actions and owned producers,
//! spends it (and Research) on producers and one-time upgrades, and keeps
//! progressing while away: elapsed wall-clock time is reconciled against a
//! persisted snapshot and replayed as a single catch-up step.
//!
//! # Two-Phase Tick
//!
//! Each call to [`engine::Engine::apply_delta`] advances the economy by an
//! arbitrary elapsed duration in two phases:
//!
//! 1. **Theoretical** -- nominal per-second outputs and Energy upkeep are
//!    summed across every owned producer, with upgrade multipliers applied.
//! 2. **Constrained** -- Energy supply (stock plus concurrent production)
//!    is balanced against upkeep demand; the resulting satisfaction ratio
//!    scales the non-Energy outputs of upkeep-bearing producers.
//!
//! The computation is time-scale invariant: one 10-second step equals ten
//! 1-second steps up to floating-point rounding, which is what lets the
//! same code serve per-frame ticking and hours-long offline catch-up.
//!
//! # Key Types
//!
//! - [`engine::Engine`] -- owns the catalog and economy state; the sole
//!   mutator of resource quantities during play.
//! - [`catalog::Catalog`] -- immutable producer blueprints and upgrade
//!   definitions, frozen at startup by [`catalog::CatalogBuilder`].
//! - [`economy::EconomyState`] -- quantities, owned counts, purchased
//!   upgrades, derived effects, and the bounded event log.
//! - [`upgrade::Effects`] -- derived multipliers, recomputed from scratch
//!   after every purchase and load (never persisted).
//! - [`save`] -- versioned JSON snapshots, legacy-format recovery, and
//!   offline reconciliation over a [`save::SaveStore`].
//! - [`session::Session`] -- the host-facing command surface (frame tick,
//!   purchases, save/load/reset, autosave accounting).
//! - [`clock::Clock`] -- injectable time source for deterministic tests.

pub mod catalog;
pub mod clock;
pub mod economy;
pub mod engine;
pub mod event;
pub mod id;
pub mod resource;
pub mod save;
pub mod session;
pub mod upgrade;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
