//! Key/value block kinds: fields are copied as-is from the value cell.

use crate::diagnostics::{Diagnostic, Stage};
use crate::model::ResultBlock;
use crate::model::result::{
    Abacus, AbacusColor, GlobalScore, Heading, Indicator, Indicator2Values, Nav, NavEntry, ScoreCard, TextBlock,
};
use crate::types::Row;

use super::{field_value, is_yes, marker_name, read_fields, texts_from};

/// Rows making up a score card abacus: letters, scores, primary colors, secondary colors.
const ABACUS_ROWS: usize = 4;

pub(super) fn indicator(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = Indicator::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "number" => b.number = v,
            "unit" => b.unit = v,
            "description" => b.description = v,
            "color" => b.color = v,
            "icon" => b.icon = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Indicator(b), next)
}

pub(super) fn indicator_2_values(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = Indicator2Values::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "number1" => b.number1 = v,
            "unit1" => b.unit1 = v,
            "number2" => b.number2 = v,
            "unit2" => b.unit2 = v,
            "description" => b.description = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Indicator2Values(b), next)
}

fn heading(rows: &[Row], start: usize) -> (Heading, usize) {
    let mut b = Heading::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "description" => b.description = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });
    (b, next)
}

pub(super) fn title(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let (b, next) = heading(rows, start);
    (ResultBlock::Title(b), next)
}

pub(super) fn subtitle(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let (b, next) = heading(rows, start);
    (ResultBlock::Subtitle(b), next)
}

pub(super) fn global_score(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = GlobalScore::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "score" => b.score = v,
            "letter" => b.letter = v,
            "color" => b.color = v,
            "unit" => b.unit = v,
            "description" => b.description = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });
    (ResultBlock::GlobalScore(b), next)
}

pub(super) fn text(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = TextBlock::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "text" => b.text = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });
    (ResultBlock::Text(b), next)
}

pub(super) fn score_card(rows: &[Row], start: usize) -> (ResultBlock, usize) {
    let mut b = ScoreCard::default();
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "score" => b.score = v,
            "letter" => b.letter = v,
            "unit" => b.unit = v,
            "description" => b.description = v,
            "display" => b.display = Some(is_yes(row)),
            "abacus" => {
                let (parsed, next) = abacus(rows, i);
                b.abacus = Some(parsed);
                return next;
            }
            _ => {}
        }
        i + 1
    });
    (ResultBlock::ScoreCard(b), next)
}

/// Read the fixed four-row abacus layout starting at the `abacus` row itself.
///
/// The layout stops early at the next block marker; missing lines read as empty. Returns the
/// abacus and the index of the first row not consumed.
fn abacus(rows: &[Row], at: usize) -> (Abacus, usize) {
    let limit = (at + ABACUS_ROWS).min(rows.len());
    let end = (at + 1..limit)
        .find(|&k| marker_name(&rows[k]).is_some())
        .unwrap_or(limit);
    let line = |offset: usize| {
        let k = at + offset;
        if k < end { texts_from(&rows[k], 1) } else { Vec::new() }
    };

    let letters = line(0).into_iter().filter(|s| !s.is_empty()).collect();

    let mut scores = line(1);
    scores.push("0".to_string());
    scores.retain(|s| !s.is_empty());

    let secondary = line(3);
    let colors = line(2)
        .into_iter()
        .enumerate()
        .filter(|(_, primary)| !primary.is_empty())
        .map(|(k, primary)| AbacusColor {
            primary,
            secondary: secondary.get(k).cloned().unwrap_or_default(),
        })
        .collect();

    (Abacus { letters, scores, colors }, end)
}

/// Navigation block.
///
/// `links/icons` and `titles` are parallel `", "`-separated lists. On a length mismatch the block
/// keeps an empty entry list and a warning is reported.
pub(super) fn nav(rows: &[Row], start: usize, diagnostics: &mut Vec<Diagnostic>) -> (ResultBlock, usize) {
    let mut b = Nav::default();
    let mut links: Option<String> = None;
    let mut titles: Option<String> = None;
    let next = read_fields(rows, start, |key, i| {
        let row = &rows[i];
        let v = Some(field_value(row));
        match key {
            "code" => b.code = v,
            "title" => b.title = v,
            "links/icons" => links = v,
            "titles" => titles = v,
            "display" => b.display = Some(is_yes(row)),
            _ => {}
        }
        i + 1
    });

    if links.is_some() || titles.is_some() {
        let links = split_list(links.as_deref().unwrap_or_default());
        let titles = split_list(titles.as_deref().unwrap_or_default());
        if links.len() == titles.len() {
            b.entries = Some(links.into_iter().zip(titles).map(|(l, t)| nav_entry(l, t)).collect());
        } else {
            diagnostics.push(Diagnostic::warning(
                Stage::Results,
                start.saturating_sub(1),
                format!(
                    "nav block has {} links/icons but {} titles; no entries produced",
                    links.len(),
                    titles.len()
                ),
            ));
            b.entries = Some(Vec::new());
        }
    }

    (ResultBlock::Nav(b), next)
}

fn split_list(s: &str) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(", ").map(|p| p.trim().to_string()).collect()
}

fn nav_entry(item: String, title: String) -> NavEntry {
    let icon = item.trim_start_matches('#').to_string();
    let link = if item.starts_with('#') { item } else { format!("#{item}") };
    NavEntry { link, icon, title }
}
