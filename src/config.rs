//! Column-mapping configuration.
//!
//! A configuration says which column of the exported table holds which semantic field. It is
//! plain data: build it in code or deserialize it from camelCase JSON.
//!
//! ```rust
//! use sheet_compiler::config::ProjectConfig;
//!
//! let config = ProjectConfig::from_json_str(r#"{
//!     "parameters": {
//!         "sectorColumns": [0, 1],
//!         "fields": { "name": 2, "type": 3, "display": 4 },
//!         "typeAliases": { "Number": "number" }
//!     }
//! }"#).unwrap();
//! assert_eq!(config.parameters.sector_columns, vec![0, 1]);
//! assert!(config.actions.is_none());
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CompileError, CompileResult};

/// Configuration for a whole project compile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub parameters: ParameterConfig,
    /// When `None`, action compilation is skipped entirely.
    #[serde(default)]
    pub actions: Option<ActionConfig>,
}

impl ProjectConfig {
    /// Decode a configuration from JSON text.
    pub fn from_json_str(input: &str) -> CompileResult<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Read and decode a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> CompileResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }
}

/// Display metadata for a sector at a given sibling ordinal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorStyle {
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
}

impl SectorStyle {
    pub fn new(color: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            icon: Some(icon.into()),
        }
    }
}

/// Column index of each parameter field. Unset fields keep their default value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ParameterColumns {
    pub name: Option<usize>,
    pub unit: Option<usize>,
    pub description: Option<usize>,
    #[serde(rename = "type")]
    pub kind: Option<usize>,
    pub initial_value: Option<usize>,
    pub value: Option<usize>,
    pub possible_values: Option<usize>,
    pub min: Option<usize>,
    pub max: Option<usize>,
    pub step: Option<usize>,
    pub display: Option<usize>,
}

/// Configuration for [`crate::compile::sectors`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterConfig {
    /// Sector-name columns, ordered shallow to deep.
    pub sector_columns: Vec<usize>,
    #[serde(default)]
    pub fields: ParameterColumns,
    /// Styles for top-level sectors, indexed by sibling ordinal.
    #[serde(default)]
    pub sector_styles: Vec<SectorStyle>,
    /// Styles for second-level sectors, indexed by ordinal within their parent.
    #[serde(default)]
    pub sub_sector_styles: Vec<SectorStyle>,
    /// Raw type string -> canonical type string.
    #[serde(default)]
    pub type_aliases: BTreeMap<String, String>,
}

impl ParameterConfig {
    pub(crate) fn validate(&self) -> CompileResult<()> {
        if self.sector_columns.is_empty() {
            return Err(CompileError::InvalidConfig {
                message: "parameters.sectorColumns must list at least one column".to_string(),
            });
        }
        if self.fields.name.is_none() {
            return Err(CompileError::InvalidConfig {
                message: "parameters.fields.name is not configured".to_string(),
            });
        }
        Ok(())
    }

    /// Style for a sector at `depth` with the given sibling ordinal (depth 0 and 1 only).
    pub fn style_for(&self, depth: usize, ordinal: usize) -> Option<&SectorStyle> {
        match depth {
            0 => self.sector_styles.get(ordinal),
            1 => self.sub_sector_styles.get(ordinal),
            _ => None,
        }
    }
}

/// Column index of each action field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionColumns {
    pub sector: Option<usize>,
    pub types: Option<usize>,
    pub title: usize,
    pub link: Option<usize>,
    pub cost: Option<usize>,
    pub difficulty: Option<usize>,
    pub duration: Option<usize>,
    pub display: Option<usize>,
}

/// Column index of each impact field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImpactColumns {
    pub scope: Option<usize>,
    pub value: Option<usize>,
    pub unit: Option<usize>,
    pub percentage: Option<usize>,
    pub priority: Option<usize>,
    pub absolute_value: Option<usize>,
    pub absolute_percentage: Option<usize>,
}

/// Configuration for [`crate::compile::actions`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionConfig {
    #[serde(default)]
    pub columns: ActionColumns,
    #[serde(default)]
    pub impact: ImpactColumns,
}
