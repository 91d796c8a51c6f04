//! Token stream pane rendering

use super::{clamp_scroll, pane_block, visible_height};
use crate::parser::token::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{List, ListItem, Padding},
    Frame,
};

fn token_style(kind: TokenKind) -> Style {
    match kind {
        TokenKind::Indent | TokenKind::Dedent => Style::default()
            .fg(DEFAULT_THEME.structural)
            .add_modifier(Modifier::BOLD),
        kind if kind.is_structural() => Style::default().fg(DEFAULT_THEME.comment),
        TokenKind::Integer | TokenKind::Float => Style::default().fg(DEFAULT_THEME.number),
        TokenKind::SingleString | TokenKind::DoubleString => {
            Style::default().fg(DEFAULT_THEME.string)
        }
        kind if kind.is_keyword() => Style::default().fg(DEFAULT_THEME.keyword),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the filtered token stream, one `line:col KIND 'text'` entry per row
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Tokens ", is_focused).padding(Padding::new(1, 0, 0, 0));
    let visible = visible_height(area);
    clamp_scroll(scroll_offset, tokens.len(), visible);

    let items: Vec<ListItem> = tokens
        .iter()
        .skip(*scroll_offset)
        .take(visible)
        .map(|token| ListItem::new(token.listing()).style(token_style(token.kind)))
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
