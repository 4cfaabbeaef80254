//! Parameter tree types.

use serde::Serialize;

use crate::config::SectorStyle;

/// Display information of a sector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectorInformation {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A named grouping node holding sub-sectors and/or parameters, in row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sector {
    pub information: SectorInformation,
    pub sectors: Vec<Sector>,
    pub parameters: Vec<Parameter>,
}

impl Sector {
    /// Create an empty sector, optionally styled.
    pub fn new(name: impl Into<String>, style: Option<&SectorStyle>) -> Self {
        Self {
            information: SectorInformation {
                name: name.into(),
                color: style.and_then(|s| s.color.clone()),
                icon: style.and_then(|s| s.icon.clone()),
            },
            sectors: Vec::new(),
            parameters: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.information.name
    }

    /// Returns `true` when neither parameters nor child sectors remain.
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty() && self.parameters.is_empty()
    }

    /// All parameters of this subtree, depth-first in row order.
    pub fn all_parameters(&self) -> Vec<&Parameter> {
        let mut out = Vec::new();
        collect_parameters(self, &mut out);
        out
    }
}

fn collect_parameters<'a>(sector: &'a Sector, out: &mut Vec<&'a Parameter>) {
    out.extend(sector.parameters.iter());
    for child in &sector.sectors {
        collect_parameters(child, out);
    }
}

/// All parameters of a forest of sectors, depth-first in row order.
pub fn all_parameters(sectors: &[Sector]) -> Vec<&Parameter> {
    let mut out = Vec::new();
    for s in sectors {
        collect_parameters(s, &mut out);
    }
    out
}

/// Value of a parameter: plain text, or a list for list-like types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParameterValue {
    Text(String),
    List(Vec<String>),
}

impl Default for ParameterValue {
    fn default() -> Self {
        ParameterValue::Text(String::new())
    }
}

impl ParameterValue {
    /// Returns `true` for an empty text or an empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            ParameterValue::Text(s) => s.trim().is_empty(),
            ParameterValue::List(items) => items.is_empty(),
        }
    }
}

/// A leaf parameter built from one row.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    /// Zero-based ordinal of the originating row; the only identity stable across rebuilds.
    pub index: usize,
    pub name: String,
    pub unit: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub initial_value: String,
    pub value: ParameterValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
    pub display: bool,
    /// Field extraction failures, joined with `"; "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
