//! The persistence reconciler: versioned snapshots, legacy-format
//! recovery, clamped restore, and offline catch-up.
//!
//! Snapshots are camelCase JSON objects written to a key-value
//! [`SaveStore`]. A missing or unparseable save is never fatal: every load
//! resolves to a [`LoadOutcome`] and the session continues with defaults.
//! On a successful restore the elapsed offline time (clamped to
//! [`OFFLINE_PROGRESS_CAP_SECS`]) is replayed through the tick engine as a
//! single step.

use crate::economy::EconomyState;
use crate::engine::Engine;
use crate::event::LogEntry;
use crate::id::{ProducerId, UpgradeId};
use crate::resource::{ENERGY_STORAGE_CAP, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current snapshot format version.
pub const SAVE_VERSION: u32 = 2;

/// Key holding the current-format snapshot.
pub const PRIMARY_SAVE_KEY: &str = "starfoundry.save.v2";

/// Key holding a legacy (version-less) snapshot. Read-only.
pub const LEGACY_SAVE_KEY: &str = "starfoundry.save";

/// Offline catch-up is clamped to 12 hours.
pub const OFFLINE_PROGRESS_CAP_SECS: f64 = 12.0 * 60.0 * 60.0;

/// Offline intervals at or below this are not replayed.
pub const OFFLINE_MIN_SECS: f64 = 1.0;

// ---------------------------------------------------------------------------
// Store abstraction
// ---------------------------------------------------------------------------

/// Errors from the persistence medium.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A last-write-wins key-value persistence medium.
pub trait SaveStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// In-memory store. The `failing` constructor simulates an unavailable
/// medium for error-path tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    poisoned: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every access fails.
    pub fn failing() -> Self {
        Self {
            entries: HashMap::new(),
            poisoned: true,
        }
    }
}

impl SaveStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        if self.poisoned {
            return Err(StoreError::Unavailable("memory store poisoned".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        if self.poisoned {
            return Err(StoreError::Unavailable("memory store poisoned".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// One file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

fn unity() -> f64 {
    1.0
}

fn is_unity(v: &f64) -> bool {
    *v == 1.0
}

/// The versioned v2 snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub version: u32,
    pub stardust: f64,
    pub energy: f64,
    pub research: f64,
    pub automations: Vec<AutomationEntry>,
    pub purchased_upgrades: Vec<String>,
    #[serde(default)]
    pub log: Vec<LogEntry>,
    /// Epoch milliseconds of the write. Absent in hand-edited saves.
    #[serde(default)]
    pub last_update: Option<i64>,
    /// Stardust bonus carried over from a legacy import.
    #[serde(default = "unity", skip_serializing_if = "is_unity")]
    pub legacy_multiplier: f64,
}

/// Owned-count entry. Counts are lenient on read and clamped on restore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomationEntry {
    pub key: String,
    pub count: f64,
}

/// The legacy version-less format, accepted read-only.
#[derive(Debug, Clone, Deserialize)]
struct LegacySaveData {
    #[serde(default)]
    stardust: Option<f64>,
    #[serde(default)]
    automations: Vec<LegacyAutomationEntry>,
    #[serde(default, rename = "productionMultiplier")]
    production_multiplier: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyAutomationEntry {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    count: Option<f64>,
}

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// How a load resolved. Only `CorruptUnrecoverable` is error-like; every
/// other outcome proceeds to normal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    NoSaveFound,
    LoadedCurrent,
    LoadedLegacy,
    CorruptUnrecoverable,
}

/// Production granted by the offline catch-up step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OfflineGains {
    pub elapsed_secs: f64,
    pub stardust: f64,
    pub research: f64,
    pub net_energy: f64,
}

/// Result of a completed load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    pub offline: Option<OfflineGains>,
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("snapshot encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Save
// ---------------------------------------------------------------------------

/// Capture the current state as a v2 snapshot with a fresh timestamp.
pub fn snapshot(engine: &Engine, now_ms: i64) -> SaveData {
    let state = &engine.state;
    SaveData {
        version: SAVE_VERSION,
        stardust: state.resources[ResourceKind::Stardust],
        energy: state.resources[ResourceKind::Energy],
        research: state.resources[ResourceKind::Research],
        automations: engine
            .catalog()
            .producers()
            .map(|(id, def)| AutomationEntry {
                key: def.key.clone(),
                count: state.owned(id) as f64,
            })
            .collect(),
        purchased_upgrades: state
            .purchased()
            .iter()
            .filter_map(|&id| engine.catalog().upgrade(id).map(|u| u.key.clone()))
            .collect(),
        log: state.log.entries().cloned().collect(),
        last_update: Some(now_ms),
        legacy_multiplier: state.legacy_stardust_bonus,
    }
}

/// Serialize and write the primary snapshot.
pub fn save(engine: &Engine, store: &mut dyn SaveStore, now_ms: i64) -> Result<(), SaveError> {
    let encoded = serde_json::to_string(&snapshot(engine, now_ms))?;
    store.write(PRIMARY_SAVE_KEY, &encoded)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Load
// ---------------------------------------------------------------------------

/// Read, parse, restore, and replay offline time.
///
/// `Err` is reserved for an unavailable primary store; parse problems
/// resolve to a [`LoadOutcome`] instead.
pub fn load(
    engine: &mut Engine,
    store: &dyn SaveStore,
    now_ms: i64,
) -> Result<LoadReport, StoreError> {
    let mut from_legacy_key = false;
    let mut raw = store.read(PRIMARY_SAVE_KEY)?;
    if raw.is_none() {
        // A broken legacy key never masks a usable session.
        raw = store.read(LEGACY_SAVE_KEY).ok().flatten();
        from_legacy_key = raw.is_some();
    }
    let Some(raw) = raw else {
        return Ok(LoadReport {
            outcome: LoadOutcome::NoSaveFound,
            offline: None,
        });
    };

    if !from_legacy_key {
        if let Ok(data) = serde_json::from_str::<SaveData>(&raw) {
            if data.version == SAVE_VERSION {
                let offline = apply_snapshot(engine, data, now_ms);
                return Ok(LoadReport {
                    outcome: LoadOutcome::LoadedCurrent,
                    offline,
                });
            }
        }
        // Fall through: primary parse failed (or foreign version); try a
        // legacy-format recovery parse before reporting corruption.
    }

    match serde_json::from_str::<LegacySaveData>(&raw) {
        Ok(legacy) => {
            apply_legacy(engine, legacy, now_ms);
            Ok(LoadReport {
                outcome: LoadOutcome::LoadedLegacy,
                offline: None,
            })
        }
        Err(_) => Ok(LoadReport {
            outcome: LoadOutcome::CorruptUnrecoverable,
            offline: None,
        }),
    }
}

/// Finite and floored at zero, or ignored.
fn sanitize(value: f64) -> Option<f64> {
    value.is_finite().then(|| value.max(0.0))
}

fn apply_snapshot(engine: &mut Engine, data: SaveData, now_ms: i64) -> Option<OfflineGains> {
    engine.state = EconomyState::new(engine.catalog(), now_ms);

    if let Some(v) = sanitize(data.stardust) {
        engine.state.resources.set(ResourceKind::Stardust, v);
    }
    if let Some(v) = sanitize(data.energy) {
        engine
            .state
            .resources
            .set(ResourceKind::Energy, v.min(ENERGY_STORAGE_CAP));
    }
    if let Some(v) = sanitize(data.research) {
        engine.state.resources.set(ResourceKind::Research, v);
    }

    // Unknown blueprint keys are ignored.
    let counts: Vec<(ProducerId, u32)> = data
        .automations
        .iter()
        .filter_map(|entry| {
            let id = engine.catalog().producer_id(&entry.key)?;
            let count = sanitize(entry.count)?;
            Some((id, count.floor() as u32))
        })
        .collect();
    for (id, count) in counts {
        engine.state.set_owned(id, count);
    }

    // Unknown upgrade keys are filtered; dedup and cap happen in restore.
    let purchased: Vec<UpgradeId> = data
        .purchased_upgrades
        .iter()
        .filter_map(|key| engine.catalog().upgrade_id(key))
        .collect();
    engine.state.restore_purchased(purchased);

    engine.state.log.restore(data.log);

    if data.legacy_multiplier.is_finite() {
        engine.state.legacy_stardust_bonus = data.legacy_multiplier.max(1.0);
    }

    engine.recompute_effects();

    let offline = data.last_update.and_then(|stored| {
        let elapsed = ((now_ms - stored) as f64 / 1000.0).clamp(0.0, OFFLINE_PROGRESS_CAP_SECS);
        (elapsed > OFFLINE_MIN_SECS).then(|| {
            let (_, gains) = engine.apply_delta(elapsed);
            OfflineGains {
                elapsed_secs: elapsed,
                stardust: gains.stardust,
                research: gains.research,
                net_energy: gains.net_energy,
            }
        })
    });

    engine.state.last_update_ms = now_ms;
    offline
}

fn apply_legacy(engine: &mut Engine, data: LegacySaveData, now_ms: i64) {
    engine.state = EconomyState::new(engine.catalog(), now_ms);

    if let Some(v) = data.stardust.and_then(sanitize) {
        engine.state.resources.set(ResourceKind::Stardust, v);
    }

    let counts: Vec<(ProducerId, u32)> = data
        .automations
        .iter()
        .filter_map(|entry| {
            let id = engine.catalog().producer_id(entry.key.as_deref()?)?;
            let count = entry.count.and_then(sanitize)?;
            Some((id, count.floor() as u32))
        })
        .collect();
    for (id, count) in counts {
        engine.state.set_owned(id, count);
    }

    if let Some(multiplier) = data.production_multiplier.filter(|m| m.is_finite()) {
        engine.state.legacy_stardust_bonus = multiplier.max(1.0);
    }

    engine.recompute_effects();
}
