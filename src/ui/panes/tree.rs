//! Syntax tree pane rendering
//!
//! The tree is flattened with [`Node::outline`] and drawn as an indented
//! list, the node kind coloured and the value, if any, after it.

use super::{clamp_scroll, pane_block, visible_height};
use crate::parser::ast::Node;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding},
    Frame,
};

/// Split an outline label into its kind and value parts
fn split_label(label: &str) -> (&str, Option<&str>) {
    match label.split_once(": ") {
        Some((kind, value)) => (kind, Some(value)),
        None => (label, None),
    }
}

pub fn render_tree_pane(
    frame: &mut Frame,
    area: Rect,
    module: &Node,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Syntax Tree ", is_focused).padding(Padding::new(1, 0, 0, 0));
    let outline = module.outline();
    let visible = visible_height(area);
    clamp_scroll(scroll_offset, outline.len(), visible);

    let items: Vec<ListItem> = outline
        .iter()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(depth, label)| {
            let (kind, value) = split_label(label);
            let mut spans = vec![
                Span::raw("  ".repeat(*depth)),
                Span::styled(kind.to_string(), Style::default().fg(DEFAULT_THEME.node_kind)),
            ];
            if let Some(value) = value {
                spans.push(Span::styled(
                    format!(" {}", value),
                    Style::default().fg(DEFAULT_THEME.secondary),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("binary_op: +"), ("binary_op", Some("+")));
        assert_eq!(split_label("suite"), ("suite", None));
        assert_eq!(split_label("string: \"a: b\""), ("string", Some("\"a: b\"")));
    }
}
