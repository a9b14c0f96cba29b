//! Host-facing command surface.
//!
//! A [`Session`] owns the engine, a [`SaveStore`], and a [`Clock`], and
//! exposes the commands the UI collaborator wires to buttons and timers:
//! per-frame ticking, manual actions, purchases, save/load/reset. Commands
//! return [`Status`] values for the presentation layer to render; no
//! failure escapes as a panic or terminates the session.

use crate::catalog::Catalog;
use crate::clock::Clock;
use crate::engine::{Engine, PurchaseError, TickOutcome};
use crate::save::{self, LoadOutcome, OfflineGains, SaveStore};

/// Seconds between automatic saves.
pub const AUTO_SAVE_INTERVAL_SECS: f64 = 30.0;

/// User-facing feedback from session commands.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Saved,
    SaveFailed,
    Loaded,
    LegacyImported,
    NoSaveFound,
    CorruptSave,
    StorageUnavailable,
    ProducerDeployed(String),
    UpgradeResearched(String),
    UnknownKey(String),
    InsufficientResources,
    LockedByResearch,
    AlreadyResearched,
    EnergyStrained,
    OfflineProgress(OfflineGains),
    ProgressReset,
}

/// Owns one play session end to end.
#[derive(Debug)]
pub struct Session<S: SaveStore, C: Clock> {
    engine: Engine,
    store: S,
    clock: C,
    /// Seconds until the next autosave.
    autosave_countdown: f64,
}

impl<S: SaveStore, C: Clock> Session<S, C> {
    pub fn new(catalog: Catalog, store: S, clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            engine: Engine::new(catalog, now),
            store,
            clock,
            autosave_countdown: AUTO_SAVE_INTERVAL_SECS,
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Startup sequence: attempt a load; a fresh session gets a greeting
    /// log entry instead.
    pub fn start(&mut self) -> Vec<Status> {
        let now = self.clock.now_ms();
        let statuses = self.load_inner(now, false);
        if self.engine.state.log.is_empty() {
            self.engine
                .state
                .log
                .push("Command deck online. Systems nominal.", now);
        }
        statuses
    }

    /// One scheduling frame: tick the engine and run autosave accounting.
    pub fn frame(&mut self) -> Vec<Status> {
        let now = self.clock.now_ms();
        let outcome: TickOutcome = self.engine.tick(now);

        let mut statuses = Vec::new();
        if outcome.energy_strained {
            statuses.push(Status::EnergyStrained);
        }

        self.autosave_countdown -= outcome.elapsed_secs;
        if self.autosave_countdown <= 0.0 {
            self.autosave_countdown = AUTO_SAVE_INTERVAL_SECS;
            // Autosave is silent; a transient store failure retries later.
            let _ = save::save(&self.engine, &mut self.store, now);
        }
        statuses
    }

    pub fn manual_action(&mut self) {
        self.engine.manual_action();
    }

    /// Buy one unit of the producer with the given catalog key.
    pub fn buy_producer(&mut self, key: &str) -> Status {
        let Some(id) = self.engine.catalog().producer_id(key) else {
            return Status::UnknownKey(key.to_string());
        };
        let now = self.clock.now_ms();
        match self.engine.buy_producer(id, now) {
            Ok(_) => {
                let _ = save::save(&self.engine, &mut self.store, now);
                let name = self
                    .engine
                    .catalog()
                    .producer(id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                Status::ProducerDeployed(name)
            }
            Err(e) => purchase_status(e, key),
        }
    }

    /// Purchase the upgrade with the given catalog key.
    pub fn purchase_upgrade(&mut self, key: &str) -> Status {
        let Some(id) = self.engine.catalog().upgrade_id(key) else {
            return Status::UnknownKey(key.to_string());
        };
        let now = self.clock.now_ms();
        match self.engine.purchase_upgrade(id, now) {
            Ok(()) => {
                let _ = save::save(&self.engine, &mut self.store, now);
                let name = self
                    .engine
                    .catalog()
                    .upgrade(id)
                    .map(|d| d.name.clone())
                    .unwrap_or_default();
                Status::UpgradeResearched(name)
            }
            Err(e) => purchase_status(e, key),
        }
    }

    /// Explicit save. Feedback only when requested (autosaves are silent).
    pub fn save(&mut self, feedback: bool) -> Option<Status> {
        let now = self.clock.now_ms();
        match save::save(&self.engine, &mut self.store, now) {
            Ok(()) => feedback.then_some(Status::Saved),
            Err(_) => feedback.then_some(Status::SaveFailed),
        }
    }

    /// Explicit load.
    pub fn load(&mut self, feedback: bool) -> Vec<Status> {
        let now = self.clock.now_ms();
        self.load_inner(now, feedback)
    }

    fn load_inner(&mut self, now: i64, feedback: bool) -> Vec<Status> {
        let mut statuses = Vec::new();
        match save::load(&mut self.engine, &self.store, now) {
            Err(_) => {
                if feedback {
                    statuses.push(Status::StorageUnavailable);
                }
            }
            Ok(report) => {
                match report.outcome {
                    LoadOutcome::NoSaveFound => {
                        if feedback {
                            statuses.push(Status::NoSaveFound);
                        }
                    }
                    LoadOutcome::CorruptUnrecoverable => {
                        if feedback {
                            statuses.push(Status::CorruptSave);
                        }
                    }
                    LoadOutcome::LoadedCurrent => {
                        if feedback {
                            statuses.push(Status::Loaded);
                        }
                    }
                    LoadOutcome::LoadedLegacy => {
                        self.engine
                            .state
                            .log
                            .push("Legacy systems imported into the new command deck.", now);
                        statuses.push(Status::LegacyImported);
                    }
                }
                if let Some(gains) = report.offline {
                    self.engine.state.log.push(
                        format!(
                            "Recovered {:.0} Stardust and {:.0} Research while away ({:.0}s)",
                            gains.stardust, gains.research, gains.elapsed_secs
                        ),
                        now,
                    );
                    statuses.push(Status::OfflineProgress(gains));
                }
            }
        }
        statuses
    }

    /// Wipe all progress. Confirmation is the caller's responsibility.
    pub fn reset(&mut self) -> Status {
        let now = self.clock.now_ms();
        self.engine.reset(now);
        self.autosave_countdown = AUTO_SAVE_INTERVAL_SECS;
        let _ = save::save(&self.engine, &mut self.store, now);
        Status::ProgressReset
    }
}

fn purchase_status(error: PurchaseError, key: &str) -> Status {
    match error {
        PurchaseError::Unaffordable(_) => Status::InsufficientResources,
        PurchaseError::Locked(_) => Status::LockedByResearch,
        PurchaseError::AlreadyPurchased(_) => Status::AlreadyResearched,
        PurchaseError::UnknownProducer(_) | PurchaseError::UnknownUpgrade(_) => {
            Status::UnknownKey(key.to_string())
        }
    }
}
