use serde::Serialize;

/// One measured effect of an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Impact {
    pub scope: String,
    /// `-1` marks the impact as intentionally not applicable.
    pub value: f64,
    pub unit: String,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<f64>,
    pub absolute_value: f64,
    pub absolute_percentage: f64,
}

impl Impact {
    /// Sentinel for "not applicable".
    pub const NOT_APPLICABLE: f64 = -1.0;

    pub fn is_not_applicable(&self) -> bool {
        self.value == Self::NOT_APPLICABLE
    }
}

/// A deduplicated action; `title` is the dedup key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    pub sector: String,
    pub types: Vec<String>,
    pub title: String,
    pub link: String,
    pub impacts: Vec<Impact>,
    pub cost: String,
    pub difficulty: String,
    pub duration: String,
    /// Always the sum of `impacts[].absolute_percentage`.
    pub impact_value: f64,
    pub display: bool,
}
