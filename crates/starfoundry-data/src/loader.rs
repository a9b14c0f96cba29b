//! Catalog file loading: format detection, deserialization, and building.

use crate::schema::CatalogData;
use starfoundry_core::catalog::{Catalog, CatalogBuilder, CatalogError};
use std::path::{Path, PathBuf};

/// Errors that can occur while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error: {0}")]
    Parse(String),

    /// The parsed content failed catalog validation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

/// Deserialize catalog data from a string in the given format.
pub fn parse_catalog_str(contents: &str, format: Format) -> Result<CatalogData, DataLoadError> {
    match format {
        Format::Ron => ron::from_str(contents).map_err(|e| DataLoadError::Parse(e.to_string())),
        Format::Toml => toml::from_str(contents).map_err(|e| DataLoadError::Parse(e.to_string())),
        Format::Json => {
            serde_json::from_str(contents).map_err(|e| DataLoadError::Parse(e.to_string()))
        }
    }
}

/// Register parsed data and freeze it into a validated [`Catalog`].
pub fn build_catalog(data: CatalogData) -> Result<Catalog, CatalogError> {
    let mut builder = CatalogBuilder::new();
    for producer in data.producers {
        builder.register_producer(producer.into());
    }
    for upgrade in data.upgrades {
        builder.register_upgrade(upgrade.into());
    }
    builder.build()
}

/// Load a catalog from a data file, detecting the format by extension.
pub fn load_catalog_file(path: &Path) -> Result<Catalog, DataLoadError> {
    let format = detect_format(path)?;
    let contents = std::fs::read_to_string(path)?;
    let data = parse_catalog_str(&contents, format)?;
    Ok(build_catalog(data)?)
}

/// The content shipped with the game, compiled in.
pub fn builtin_catalog() -> Result<Catalog, DataLoadError> {
    let data = parse_catalog_str(include_str!("../assets/catalog.json"), Format::Json)?;
    Ok(build_catalog(data)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use starfoundry_core::resource::ResourceKind;

    #[test]
    fn builtin_catalog_builds() {
        let catalog = builtin_catalog().unwrap();
        assert_eq!(catalog.producer_count(), 6);
        assert_eq!(catalog.upgrade_count(), 7);
    }

    #[test]
    fn builtin_values_survive_loading() {
        let catalog = builtin_catalog().unwrap();

        let drone = catalog.producer(catalog.producer_id("drone").unwrap()).unwrap();
        assert_eq!(drone.base_cost[ResourceKind::Stardust], 25.0);
        assert_eq!(drone.cost_growth, 1.15);
        assert_eq!(drone.outputs[ResourceKind::Stardust], 0.9);

        let lab = catalog
            .producer(catalog.producer_id("researchLab").unwrap())
            .unwrap();
        assert_eq!(lab.energy_upkeep, 3.2);
        assert_eq!(lab.outputs[ResourceKind::Research], 1.8);

        let forge = catalog
            .producer(catalog.producer_id("quantumForge").unwrap())
            .unwrap();
        assert_eq!(
            forge.requires_upgrade,
            Some(catalog.upgrade_id("stellarMegastructure").unwrap())
        );
    }

    #[test]
    fn builtin_upgrade_effects_resolve() {
        use starfoundry_core::catalog::UpgradeEffect;
        let catalog = builtin_catalog().unwrap();
        let containment = catalog
            .upgrade(catalog.upgrade_id("stellarContainment").unwrap())
            .unwrap();
        assert_eq!(containment.cost[ResourceKind::Research], 260.0);
        assert_eq!(
            containment.effects,
            vec![UpgradeEffect::GlobalMultiplier {
                resource: ResourceKind::Stardust,
                factor: 1.55,
            }]
        );

        let overseer = catalog
            .upgrade(catalog.upgrade_id("droneOverseer").unwrap())
            .unwrap();
        assert_eq!(
            overseer.effects,
            vec![UpgradeEffect::ProducerMultiplier {
                producer: catalog.producer_id("drone").unwrap(),
                factor: 1.5,
            }]
        );
    }

    #[test]
    fn format_detection() {
        assert_eq!(detect_format(Path::new("c.ron")).unwrap(), Format::Ron);
        assert_eq!(detect_format(Path::new("c.toml")).unwrap(), Format::Toml);
        assert_eq!(detect_format(Path::new("c.json")).unwrap(), Format::Json);
        assert!(matches!(
            detect_format(Path::new("c.yaml")),
            Err(DataLoadError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn toml_catalog_parses() {
        let doc = r#"
            [[producers]]
            key = "mine"
            name = "Mine"
            costGrowth = 1.2

            [producers.baseCost]
            stardust = 10.0

            [producers.outputs]
            stardust = 0.5
        "#;
        let data = parse_catalog_str(doc, Format::Toml).unwrap();
        let catalog = build_catalog(data).unwrap();
        let mine = catalog.producer(catalog.producer_id("mine").unwrap()).unwrap();
        assert_eq!(mine.cost_growth, 1.2);
        assert_eq!(mine.outputs[ResourceKind::Stardust], 0.5);
    }

    #[test]
    fn ron_catalog_parses() {
        let doc = r#"(
            producers: [
                (
                    key: "mine",
                    name: "Mine",
                    baseCost: (stardust: 10.0),
                    outputs: (stardust: 0.5),
                ),
            ],
        )"#;
        let data = parse_catalog_str(doc, Format::Ron).unwrap();
        let catalog = build_catalog(data).unwrap();
        assert!(catalog.producer_id("mine").is_some());
    }

    #[test]
    fn unresolved_reference_fails_build() {
        let doc = r#"{
            "upgrades": [
                {
                    "key": "boost",
                    "name": "Boost",
                    "effects": {"automationMultipliers": {"missing": 2.0}}
                }
            ]
        }"#;
        let data = parse_catalog_str(doc, Format::Json).unwrap();
        assert!(matches!(
            build_catalog(data),
            Err(CatalogError::UnknownProducerRef { .. })
        ));
    }

    #[test]
    fn garbage_input_is_a_parse_error() {
        assert!(matches!(
            parse_catalog_str("{not json", Format::Json),
            Err(DataLoadError::Parse(_))
        ));
    }
}
