//! Auto-layout classification.
//!
//! Maps the host's auto-layout strings onto [`LayoutDescriptor`] and decides
//! how each child is placed and sized inside its parent.

use altcode_core::raw::DesignNode;
use altcode_core::{
    ChildSizing, CounterAlign, Diagnostics, Direction, LayoutDescriptor, NodeId, Padding,
    Positioning, PrimaryAlign, SizingMode,
};

/// The container's flow descriptor, or `None` when it places children freely.
pub fn classify_layout(
    raw: &DesignNode,
    id: NodeId,
    diagnostics: &mut Diagnostics,
) -> Option<LayoutDescriptor> {
    let direction = match raw.layout_mode.as_deref() {
        Some("HORIZONTAL") => Direction::Row,
        Some("VERTICAL") => Direction::Column,
        Some("NONE") | None => return None,
        Some(other) => {
            diagnostics.warn(Some(id), format!("unknown layout mode: {}", other));
            return None;
        }
    };

    let primary_align = match raw.primary_axis_align_items.as_deref() {
        Some("CENTER") => PrimaryAlign::Center,
        Some("MAX") => PrimaryAlign::End,
        Some("SPACE_BETWEEN") => PrimaryAlign::SpaceBetween,
        _ => PrimaryAlign::Start,
    };

    let counter_align = match raw.counter_axis_align_items.as_deref() {
        Some("CENTER") => CounterAlign::Center,
        Some("MAX") => CounterAlign::End,
        Some("BASELINE") => CounterAlign::Baseline,
        Some("SPACE_BETWEEN") => {
            diagnostics.warn(
                Some(id),
                "space-between is not supported on the counter axis; using start",
            );
            CounterAlign::Start
        }
        _ => CounterAlign::Start,
    };

    let padding = Padding {
        top: raw.padding_top.unwrap_or(0.0),
        right: raw.padding_right.unwrap_or(0.0),
        bottom: raw.padding_bottom.unwrap_or(0.0),
        left: raw.padding_left.unwrap_or(0.0),
    };

    Some(LayoutDescriptor {
        direction,
        primary_align,
        counter_align,
        wrap: raw.layout_wrap.as_deref() == Some("WRAP"),
        gap: raw.item_spacing.unwrap_or(0.0),
        padding,
        primary_sizing: axis_sizing(raw.primary_axis_sizing_mode.as_deref()),
        counter_sizing: axis_sizing(raw.counter_axis_sizing_mode.as_deref()),
        has_absolute_children: false,
    })
}

fn axis_sizing(mode: Option<&str>) -> SizingMode {
    match mode {
        Some("AUTO") | Some("HUG") => SizingMode::Hug,
        Some("FILL") => SizingMode::Fill,
        _ => SizingMode::Fixed,
    }
}

/// Placement and sizing of a node inside its parent.
///
/// `own_layout` is the node's own descriptor (if it is an auto-flow
/// container); its axis sizing is the fallback when the host gives no
/// explicit per-axis sizing.
pub fn classify_child(
    raw: &DesignNode,
    own_layout: Option<&LayoutDescriptor>,
    parent_layout: Option<&LayoutDescriptor>,
    id: NodeId,
    diagnostics: &mut Diagnostics,
) -> (Positioning, ChildSizing) {
    let positioning = match parent_layout {
        Some(_) if raw.layout_positioning.as_deref() == Some("ABSOLUTE") => Positioning::Absolute,
        Some(_) => Positioning::Flow,
        None => Positioning::Absolute,
    };

    let mut sizing = ChildSizing {
        horizontal: raw
            .layout_sizing_horizontal
            .as_deref()
            .map(|mode| axis_sizing(Some(mode)))
            .or_else(|| own_layout.map(LayoutDescriptor::horizontal_sizing))
            .unwrap_or_default(),
        vertical: raw
            .layout_sizing_vertical
            .as_deref()
            .map(|mode| axis_sizing(Some(mode)))
            .or_else(|| own_layout.map(LayoutDescriptor::vertical_sizing))
            .unwrap_or_default(),
    };

    let flows = parent_layout.is_some() && positioning == Positioning::Flow;
    for (axis, mode) in [
        ("horizontal", &mut sizing.horizontal),
        ("vertical", &mut sizing.vertical),
    ] {
        if *mode == SizingMode::Fill && !flows {
            diagnostics.warn(
                Some(id),
                format!(
                    "{} FILL sizing needs a parent with auto layout; using FIXED",
                    axis
                ),
            );
            *mode = SizingMode::Fixed;
        }
    }

    (positioning, sizing)
}

/// Flag a flow container whose children include absolutely placed ones.
///
/// The flag is also set when every child is absolute: the backends still
/// need the overlay wrapper to position them, even with an empty flow.
pub fn mark_absolute_children(
    layout: &mut LayoutDescriptor,
    children: impl IntoIterator<Item = Positioning>,
) {
    layout.has_absolute_children = children
        .into_iter()
        .any(|positioning| positioning == Positioning::Absolute);
    if layout.has_absolute_children {
        log::trace!("layout container has absolute children; overlay required");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(mode: &str) -> DesignNode {
        DesignNode {
            kind: "FRAME".to_string(),
            layout_mode: Some(mode.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_layout() {
        let mut diags = Diagnostics::new();
        assert!(classify_layout(&frame("NONE"), NodeId(0), &mut diags).is_none());
        assert!(classify_layout(&DesignNode::default(), NodeId(0), &mut diags).is_none());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_horizontal_with_defaults() {
        let mut diags = Diagnostics::new();
        let layout = classify_layout(&frame("HORIZONTAL"), NodeId(0), &mut diags).unwrap();
        assert_eq!(layout.direction, Direction::Row);
        assert_eq!(layout.gap, 0.0);
        assert!(layout.padding.is_zero());
        assert_eq!(layout.primary_sizing, SizingMode::Fixed);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_vertical_alignment_and_padding() {
        let raw = DesignNode {
            primary_axis_align_items: Some("SPACE_BETWEEN".to_string()),
            counter_axis_align_items: Some("BASELINE".to_string()),
            item_spacing: Some(12.0),
            padding_top: Some(8.0),
            primary_axis_sizing_mode: Some("AUTO".to_string()),
            layout_wrap: Some("WRAP".to_string()),
            ..frame("VERTICAL")
        };
        let mut diags = Diagnostics::new();
        let layout = classify_layout(&raw, NodeId(0), &mut diags).unwrap();
        assert_eq!(layout.direction, Direction::Column);
        assert_eq!(layout.primary_align, PrimaryAlign::SpaceBetween);
        assert_eq!(layout.counter_align, CounterAlign::Baseline);
        assert_eq!(layout.gap, 12.0);
        assert_eq!(layout.padding.top, 8.0);
        assert_eq!(layout.vertical_sizing(), SizingMode::Hug);
        assert!(layout.wrap);
    }

    #[test]
    fn test_counter_space_between_degrades() {
        let raw = DesignNode {
            counter_axis_align_items: Some("SPACE_BETWEEN".to_string()),
            ..frame("HORIZONTAL")
        };
        let mut diags = Diagnostics::new();
        let layout = classify_layout(&raw, NodeId(4), &mut diags).unwrap();
        assert_eq!(layout.counter_align, CounterAlign::Start);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_fill_without_parent_layout_downgrades() {
        let raw = DesignNode {
            layout_sizing_horizontal: Some("FILL".to_string()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let (positioning, sizing) = classify_child(&raw, None, None, NodeId(2), &mut diags);
        assert_eq!(positioning, Positioning::Absolute);
        assert_eq!(sizing.horizontal, SizingMode::Fixed);
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn test_fill_inside_flow_is_kept() {
        let parent = LayoutDescriptor::new(Direction::Row);
        let raw = DesignNode {
            layout_sizing_horizontal: Some("FILL".to_string()),
            layout_sizing_vertical: Some("HUG".to_string()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let (positioning, sizing) =
            classify_child(&raw, None, Some(&parent), NodeId(2), &mut diags);
        assert_eq!(positioning, Positioning::Flow);
        assert_eq!(sizing.horizontal, SizingMode::Fill);
        assert_eq!(sizing.vertical, SizingMode::Hug);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_absolute_child_marks_parent() {
        let mut parent = LayoutDescriptor::new(Direction::Column);
        let raw = DesignNode {
            layout_positioning: Some("ABSOLUTE".to_string()),
            ..Default::default()
        };
        let mut diags = Diagnostics::new();
        let (positioning, _) = classify_child(&raw, None, Some(&parent), NodeId(1), &mut diags);
        assert_eq!(positioning, Positioning::Absolute);

        mark_absolute_children(&mut parent, [Positioning::Flow, positioning]);
        assert!(parent.has_absolute_children);
        mark_absolute_children(&mut parent, [Positioning::Flow]);
        assert!(!parent.has_absolute_children);
        mark_absolute_children(&mut parent, [Positioning::Absolute, Positioning::Absolute]);
        assert!(parent.has_absolute_children);
    }
}
