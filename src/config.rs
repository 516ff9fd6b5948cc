//! Catalog configuration loaded at startup

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{CatalogBuilder, PermissionCatalog};
use crate::error::CatalogError;

/// A permission added on top of the built-in table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionDef {
    pub name: String,
    pub bit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDef {
    pub name: String,
    pub permissions: Vec<String>,
}

/// Extensions to the standard catalog
///
/// Applied in field order: new permissions first, then retirements, then bundles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub permissions: Vec<PermissionDef>,
    pub retired: Vec<String>,
    pub bundles: Vec<BundleDef>,
}

impl CatalogConfig {
    /// Parse a config document; only a JSON object is accepted
    pub fn from_json(s: &str) -> Result<Self, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(s).map_err(|e| CatalogError::Config(e.to_string()))?;
        if !value.is_object() {
            return Err(CatalogError::Config("catalog config must be a JSON object".into()));
        }
        serde_json::from_value(value).map_err(|e| CatalogError::Config(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Config(format!("{}: {}", path.display(), e)))?;
        let cfg = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            permissions = cfg.permissions.len(),
            retired = cfg.retired.len(),
            bundles = cfg.bundles.len(),
            "loaded catalog config"
        );
        Ok(cfg)
    }
}

impl PermissionCatalog {
    /// Standard catalog extended by `cfg`
    pub fn from_config(cfg: &CatalogConfig) -> Result<Self, CatalogError> {
        let mut b = CatalogBuilder::standard();
        for p in &cfg.permissions {
            b.define(&p.name, p.bit)?;
        }
        for name in &cfg.retired {
            b.retire(name)?;
        }
        for bundle in &cfg.bundles {
            b.bundle(&bundle.name, &bundle.permissions)?;
        }
        Ok(b.build())
    }
}
