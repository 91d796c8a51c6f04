//! Diagnostics pane rendering

use super::{clamp_scroll, pane_block, visible_height};
use crate::parser::error::{Diagnostic, Phase};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

fn phase_style(phase: Phase) -> Style {
    let color = match phase {
        Phase::Lexical => DEFAULT_THEME.secondary,
        Phase::Indentation => DEFAULT_THEME.structural,
        Phase::Syntax => DEFAULT_THEME.error,
    };
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

/// Render the diagnostics list with `selected` highlighted
pub fn render_diagnostics_pane(
    frame: &mut Frame,
    area: Rect,
    diagnostics: &[Diagnostic],
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Diagnostics ", is_focused);

    if diagnostics.is_empty() {
        let paragraph = Paragraph::new("(no diagnostics)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.success));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible = visible_height(area);

    // Keep the selection on screen
    if selected < *scroll_offset {
        *scroll_offset = selected;
    } else if selected >= *scroll_offset + visible {
        *scroll_offset = selected + 1 - visible;
    }
    clamp_scroll(scroll_offset, diagnostics.len(), visible);

    let items: Vec<ListItem> = diagnostics
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(idx, diag)| {
            let line = Line::from(vec![
                Span::styled(format!("{:<12}", diag.phase.to_string()), phase_style(diag.phase)),
                Span::styled(
                    format!("{:>4}:{:<3} ", diag.location.line, diag.location.column),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(diag.message.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]);
            let item = ListItem::new(line);
            if idx == selected {
                item.style(Style::default().bg(DEFAULT_THEME.current_line_bg))
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
