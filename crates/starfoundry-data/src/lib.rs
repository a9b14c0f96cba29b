//! Data-driven catalog loading for Starfoundry.
//!
//! Game content (producer blueprints and upgrade definitions) lives in
//! data files rather than code. This crate provides the serde schema for
//! those files, a loader with format detection (RON/TOML/JSON), and the
//! built-in content shipped with the game.

pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, builtin_catalog, load_catalog_file};
