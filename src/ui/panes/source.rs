//! Source pane rendering with syntax highlighting
//!
//! Displays the source file with line numbers. Lines carrying at least one
//! diagnostic get a marker in the gutter, and the line of the selected
//! diagnostic is highlighted and kept in view.

use super::{clamp_scroll, pane_block, visible_height};
use crate::parser::token::keyword;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rustc_hash::FxHashSet;

/// Simple syntax highlighting for one source line
fn highlight_source_line(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<char> = line.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '#' {
            flush_word(&mut spans, &mut current_word);
            let rest: String = chars[i..].iter().collect();
            spans.push(Span::styled(rest, Style::default().fg(DEFAULT_THEME.comment)));
            break;
        }

        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word);
            let mut end = i + 1;
            while end < chars.len() && chars[end] != c {
                end += if chars[end] == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let literal: String = chars[i..end].iter().collect();
            spans.push(Span::styled(literal, Style::default().fg(DEFAULT_THEME.string)));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' {
            flush_word(&mut spans, &mut current_word);
            let style = match c {
                '(' | ')' | '[' | ']' | '{' | '}' | ':' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word);
    Line::from(spans)
}

fn flush_word(spans: &mut Vec<Span<'_>>, word: &mut String) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn word_style(word: &str) -> Style {
    if keyword(word).is_some() {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if word.starts_with(|c: char| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else {
        Style::default().fg(DEFAULT_THEME.fg)
    }
}

/// Split on the same line breaks the scanner counts, bare CR included
fn source_lines(source: &str) -> Vec<&str> {
    source.lines().flat_map(|line| line.split('\r')).collect()
}

/// Render the source pane.
///
/// `error_lines` holds the 1-based lines with diagnostics; `current_line`
/// is the line to highlight and scroll into view, if any.
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source: &str,
    error_lines: &FxHashSet<usize>,
    current_line: Option<usize>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Source ", is_focused);
    let lines = source_lines(source);
    let visible = visible_height(area);

    if let Some(line) = current_line {
        let idx = line.saturating_sub(1);
        if idx < *scroll_offset || idx >= *scroll_offset + visible {
            *scroll_offset = idx.saturating_sub(visible / 2);
        }
    }
    clamp_scroll(scroll_offset, lines.len(), visible);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let has_error = error_lines.contains(&line_num);
            let is_current = current_line == Some(line_num);

            let marker = if has_error { "●" } else { " " };
            let num_style = if has_error {
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut content = highlight_source_line(line);
            if is_current {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(bg);
                }
            }

            let mut spans = vec![Span::styled(format!("{}{:4} ", marker, line_num), num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
