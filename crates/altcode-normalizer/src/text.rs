//! Styled text segments → maximal uniform runs.

use altcode_core::raw::{DesignNode, RawFontName, RawTextSegment, RawUnit, RawUnitValue};
use altcode_core::{
    Diagnostics, LineHeight, NodeId, PaintEntry, TextAlign, TextAutoResize, TextCase,
    TextContent, TextDecoration, TextRun,
};
use altcode_resolver::convert_paint;

const DEFAULT_FONT_SIZE: f64 = 12.0;
const DEFAULT_FONT_WEIGHT: u16 = 400;
const DEFAULT_FONT_FAMILY: &str = "Inter";

fn decoration(value: Option<&str>) -> TextDecoration {
    match value {
        Some("UNDERLINE") => TextDecoration::Underline,
        Some("STRIKETHROUGH") => TextDecoration::Strikethrough,
        _ => TextDecoration::None,
    }
}

fn case_transform(value: Option<&str>) -> TextCase {
    match value {
        Some("UPPER") => TextCase::Upper,
        Some("LOWER") => TextCase::Lower,
        Some("TITLE") => TextCase::Title,
        _ => TextCase::Original,
    }
}

fn letter_spacing(value: Option<RawUnitValue>, font_size: f64) -> f64 {
    match value {
        Some(RawUnitValue {
            value,
            unit: RawUnit::Percent,
        }) => value / 100.0 * font_size,
        Some(RawUnitValue {
            value,
            unit: RawUnit::Pixels,
        }) => value,
        _ => 0.0,
    }
}

fn line_height(value: Option<RawUnitValue>) -> LineHeight {
    match value {
        Some(RawUnitValue {
            value,
            unit: RawUnit::Pixels,
        }) => LineHeight::Pixels(value),
        Some(RawUnitValue {
            value,
            unit: RawUnit::Percent,
        }) => LineHeight::Percent(value),
        _ => LineHeight::Auto,
    }
}

fn font_family(name: Option<&RawFontName>) -> String {
    name.map(|n| n.family.clone())
        .filter(|family| !family.is_empty())
        .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string())
}

fn is_italic(name: Option<&RawFontName>) -> bool {
    name.is_some_and(|n| n.style.to_ascii_lowercase().contains("italic"))
}

/// The run a node would have without per-segment styling.
fn base_run(raw: &DesignNode, characters: String, fill_ref: Option<usize>) -> TextRun {
    let font_size = raw.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    TextRun {
        characters,
        font_size,
        font_weight: raw.font_weight.unwrap_or(DEFAULT_FONT_WEIGHT),
        font_family: font_family(raw.font_name.as_ref()),
        italic: is_italic(raw.font_name.as_ref()),
        decoration: TextDecoration::None,
        case_transform: TextCase::Original,
        fill_ref,
        letter_spacing: 0.0,
        line_height: LineHeight::Auto,
    }
}

/// Index of `entry` in `fills`, appending it when absent.
fn fill_index(fills: &mut Vec<PaintEntry>, entry: PaintEntry) -> usize {
    match fills.iter().position(|existing| *existing == entry) {
        Some(index) => index,
        None => {
            fills.push(entry);
            fills.len() - 1
        }
    }
}

fn segment_run(
    raw: &DesignNode,
    segment: &RawTextSegment,
    fills: &mut Vec<PaintEntry>,
    id: NodeId,
    diagnostics: &mut Diagnostics,
) -> TextRun {
    let font_size = segment
        .font_size
        .or(raw.font_size)
        .unwrap_or(DEFAULT_FONT_SIZE);
    let font_name = segment.font_name.as_ref().or(raw.font_name.as_ref());

    let segment_fill = segment
        .fills
        .iter()
        .find_map(|paint| convert_paint(paint, id, diagnostics));
    let fill_ref = match segment_fill {
        Some(entry) => Some(fill_index(fills, entry)),
        None if fills.is_empty() => None,
        None => Some(0),
    };

    TextRun {
        characters: segment.characters.clone(),
        font_size,
        font_weight: segment
            .font_weight
            .or(raw.font_weight)
            .unwrap_or(DEFAULT_FONT_WEIGHT),
        font_family: font_family(font_name),
        italic: is_italic(font_name),
        decoration: decoration(segment.text_decoration.as_deref()),
        case_transform: case_transform(segment.text_case.as_deref()),
        fill_ref,
        letter_spacing: letter_spacing(segment.letter_spacing, font_size),
        line_height: line_height(segment.line_height),
    }
}

/// Merge adjacent runs with identical styling.
fn merge_runs(runs: Vec<TextRun>) -> Vec<TextRun> {
    let mut merged: Vec<TextRun> = Vec::with_capacity(runs.len());
    for run in runs {
        match merged.last_mut() {
            Some(last) if last.same_style(&run) => last.characters.push_str(&run.characters),
            _ => merged.push(run),
        }
    }
    merged
}

/// Build a text node's content. Run fills that are not already among
/// `fills` are appended to it so `fill_ref` can point at them.
pub(crate) fn build_text(
    raw: &DesignNode,
    fills: &mut Vec<PaintEntry>,
    id: NodeId,
    diagnostics: &mut Diagnostics,
) -> TextContent {
    let characters = raw.characters.clone().unwrap_or_default();
    let default_fill = (!fills.is_empty()).then_some(0);

    let runs = if raw.segments.is_empty() {
        vec![base_run(raw, characters, default_fill)]
    } else {
        let fill_count = fills.len();
        let runs: Vec<TextRun> = raw
            .segments
            .iter()
            .map(|segment| segment_run(raw, segment, fills, id, diagnostics))
            .collect();
        let joined: String = runs.iter().map(|r| r.characters.as_str()).collect();
        if joined == characters {
            merge_runs(runs)
        } else {
            diagnostics.warn(
                Some(id),
                "text segments do not reproduce the node's characters; using a single run",
            );
            fills.truncate(fill_count);
            vec![base_run(raw, characters, default_fill)]
        }
    };

    TextContent {
        runs,
        align: match raw.text_align_horizontal.as_deref() {
            Some("CENTER") => TextAlign::Center,
            Some("RIGHT") => TextAlign::Right,
            Some("JUSTIFIED") => TextAlign::Justified,
            _ => TextAlign::Left,
        },
        auto_resize: match raw.text_auto_resize.as_deref() {
            Some("HEIGHT") => TextAutoResize::Height,
            Some("WIDTH_AND_HEIGHT") => TextAutoResize::WidthAndHeight,
            _ => TextAutoResize::None,
        },
    }
}
