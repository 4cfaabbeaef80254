//! Presentation result blocks.
//!
//! [`ResultBlock`] is a closed union over every block kind the result sheet can declare. Every
//! kind-specific field is optional: `None` means the block did not mention it.

use serde::Serialize;

/// Kind of a result block as written after `##` in a marker row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ResultKind {
    ScoreCard,
    Indicator,
    Indicator2Values,
    Treemap,
    Nav,
    Title,
    Subtitle,
    GlobalScore,
    Pie1D,
    BarStacked2D,
    BarStacked1D,
    BarSingle1D,
    Bar1D,
    Text,
    Table,
    /// Reserved for the action sheet; never produces a result block.
    Actions,
}

impl ResultKind {
    /// Parse a marker kind name (case-sensitive).
    pub fn from_marker(name: &str) -> Option<Self> {
        let kind = match name {
            "ScoreCard" => Self::ScoreCard,
            "Indicator" => Self::Indicator,
            "Indicator2Values" => Self::Indicator2Values,
            "Treemap" => Self::Treemap,
            "Nav" => Self::Nav,
            "Title" => Self::Title,
            "Subtitle" => Self::Subtitle,
            "GlobalScore" => Self::GlobalScore,
            "Pie1D" => Self::Pie1D,
            "BarStacked2D" => Self::BarStacked2D,
            "BarStacked1D" => Self::BarStacked1D,
            "BarSingle1D" => Self::BarSingle1D,
            "Bar1D" => Self::Bar1D,
            "Text" => Self::Text,
            "Table" => Self::Table,
            "Actions" => Self::Actions,
            _ => return None,
        };
        Some(kind)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ResultBlock {
    ScoreCard(ScoreCard),
    Indicator(Indicator),
    Indicator2Values(Indicator2Values),
    Treemap(Treemap),
    Nav(Nav),
    Title(Heading),
    Subtitle(Heading),
    GlobalScore(GlobalScore),
    Pie1D(Pie1D),
    BarStacked2D(BarChart),
    BarStacked1D(BarChart),
    BarSingle1D(BarChart),
    Bar1D(Bar1D),
    Text(TextBlock),
    Table(TableBlock),
}

impl ResultBlock {
    pub fn kind(&self) -> ResultKind {
        match self {
            ResultBlock::ScoreCard(_) => ResultKind::ScoreCard,
            ResultBlock::Indicator(_) => ResultKind::Indicator,
            ResultBlock::Indicator2Values(_) => ResultKind::Indicator2Values,
            ResultBlock::Treemap(_) => ResultKind::Treemap,
            ResultBlock::Nav(_) => ResultKind::Nav,
            ResultBlock::Title(_) => ResultKind::Title,
            ResultBlock::Subtitle(_) => ResultKind::Subtitle,
            ResultBlock::GlobalScore(_) => ResultKind::GlobalScore,
            ResultBlock::Pie1D(_) => ResultKind::Pie1D,
            ResultBlock::BarStacked2D(_) => ResultKind::BarStacked2D,
            ResultBlock::BarStacked1D(_) => ResultKind::BarStacked1D,
            ResultBlock::BarSingle1D(_) => ResultKind::BarSingle1D,
            ResultBlock::Bar1D(_) => ResultKind::Bar1D,
            ResultBlock::Text(_) => ResultKind::Text,
            ResultBlock::Table(_) => ResultKind::Table,
        }
    }

    /// The block's `code` field, if it has one.
    pub fn code(&self) -> Option<&str> {
        let code = match self {
            ResultBlock::ScoreCard(b) => &b.code,
            ResultBlock::Indicator(b) => &b.code,
            ResultBlock::Indicator2Values(b) => &b.code,
            ResultBlock::Treemap(b) => &b.code,
            ResultBlock::Nav(b) => &b.code,
            ResultBlock::Title(b) | ResultBlock::Subtitle(b) => &b.code,
            ResultBlock::GlobalScore(b) => &b.code,
            ResultBlock::Pie1D(b) => &b.code,
            ResultBlock::BarStacked2D(b) | ResultBlock::BarStacked1D(b) | ResultBlock::BarSingle1D(b) => &b.code,
            ResultBlock::Bar1D(b) => &b.code,
            ResultBlock::Text(b) => &b.code,
            ResultBlock::Table(b) => &b.code,
        };
        code.as_deref()
    }

    pub fn display(&self) -> Option<bool> {
        match self {
            ResultBlock::ScoreCard(b) => b.display,
            ResultBlock::Indicator(b) => b.display,
            ResultBlock::Indicator2Values(b) => b.display,
            ResultBlock::Treemap(b) => b.display,
            ResultBlock::Nav(b) => b.display,
            ResultBlock::Title(b) | ResultBlock::Subtitle(b) => b.display,
            ResultBlock::GlobalScore(b) => b.display,
            ResultBlock::Pie1D(b) => b.display,
            ResultBlock::BarStacked2D(b) | ResultBlock::BarStacked1D(b) | ResultBlock::BarSingle1D(b) => b.display,
            ResultBlock::Bar1D(b) => b.display,
            ResultBlock::Text(b) => b.display,
            ResultBlock::Table(b) => b.display,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreCard {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abacus: Option<Abacus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

/// Letter grading scale of a score card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Abacus {
    pub letters: Vec<String>,
    /// Score boundaries; one more entry than `letters` thanks to the trailing `"0"`.
    pub scores: Vec<String>,
    pub colors: Vec<AbacusColor>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AbacusColor {
    pub primary: String,
    pub secondary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Indicator2Values {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit1: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit2: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

/// Shared shape of `Title` and `Subtitle` blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Heading {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalScore {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Treemap {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<TreemapNode>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

/// A treemap node. Sectors with sub-sectors are containers and carry no value of their own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreemapNode {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreemapNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Nav {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries: Option<Vec<NavEntry>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NavEntry {
    pub link: String,
    pub icon: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pie1D {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slices: Option<Vec<PieSlice>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub fill: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// Shared shape of the `BarStacked2D`, `BarStacked1D` and `BarSingle1D` blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarChart {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<BarCategory>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

/// A bar (or bar group) scored against a ceiling.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BarCategory {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    pub total: f64,
    pub score: f64,
    pub series: Vec<BarSeries>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sub_categories: Vec<BarCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarSeries {
    pub key: String,
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Bar1D {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Series names from the header row.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub series: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bars: Option<Vec<BarGroup>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarGroup {
    pub name: String,
    pub color: String,
    /// One entry per header series, keyed by series name.
    pub values: Vec<BarSeries>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}
