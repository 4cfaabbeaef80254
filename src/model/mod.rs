//! Output model of the compilers.
//!
//! - [`sector`]: the parameter tree ([`Sector`], [`Parameter`])
//! - [`result`]: presentation blocks ([`ResultBlock`])
//! - [`action`]: the action catalogue ([`Action`], [`Impact`])
//!
//! Every value is produced fresh on each compile; nothing but [`Parameter::index`] is stable
//! across rebuilds.

pub mod action;
pub mod result;
pub mod sector;

use serde::Serialize;

pub use action::{Action, Impact};
pub use result::{ResultBlock, ResultKind};
pub use sector::{Parameter, ParameterValue, Sector, SectorInformation};

/// Answer of the completion-rate collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub completion_rate: f64,
    pub uncompleted: Vec<Parameter>,
}

/// The part of an uncompleted parameter exposed to consumers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UncompletedParameter {
    pub index: usize,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub possible_values: Option<Vec<String>>,
}

impl From<Parameter> for UncompletedParameter {
    fn from(p: Parameter) -> Self {
        Self {
            index: p.index,
            name: p.name,
            possible_values: p.possible_values,
        }
    }
}

/// Compiled projection of one project.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompiledProject {
    pub sectors: Vec<Sector>,
    pub completion_rate: f64,
    pub uncompleted: Vec<UncompletedParameter>,
    pub results: Vec<ResultBlock>,
    /// `None` when the configuration has no actions section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actions: Option<Vec<Action>>,
}
