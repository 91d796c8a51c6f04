//! TUI pane rendering modules
//!
//! This module provides the rendering logic for all visual panes in the TUI,
//! organized by responsibility.
//!
//! # Pane Modules
//!
//! - [`source`]: Source text with syntax highlighting and error markers
//! - [`tokens`]: The filtered token stream, INDENT / DEDENT included
//! - [`tree`]: Indented outline of the syntax tree
//! - [`diagnostics`]: Recorded faults, one per line, with a selection
//! - [`status`]: Status bar with counts and keybindings
//!
//! Each pane module exports a `render_*` function taking the frame, its
//! area, the data to show, focus state and its scroll offset.

pub mod diagnostics;
pub mod source;
pub mod status;
pub mod tokens;
pub mod tree;

pub use diagnostics::render_diagnostics_pane;
pub use source::render_source_pane;
pub use status::{render_status_bar, StatusRenderData};
pub use tokens::render_tokens_pane;
pub use tree::render_tree_pane;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered, titled block, highlighted when focused
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Rows available inside a bordered pane, at least 1
pub(crate) fn visible_height(area: Rect) -> usize {
    area.height.saturating_sub(2).max(1) as usize
}

/// Clamp a scroll offset so the last page stays full
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
