//! Main TUI application state and logic

use crate::parser::ast::Node;
use crate::parser::error::Diagnostic;
use crate::parser::options::ParseOptions;
use crate::parser::token::Token;
use crate::parser::{parse_with, tokenize_with};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use rustc_hash::FxHashSet;
use std::io;
use std::time::Duration;

/// Rows moved by PageUp / PageDown
const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Tree,
    Diagnostics,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: source -> diagnostics -> tokens -> tree)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Diagnostics,
            FocusedPane::Diagnostics => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Tree,
            FocusedPane::Tree => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tree,
            FocusedPane::Diagnostics => FocusedPane::Source,
            FocusedPane::Tokens => FocusedPane::Diagnostics,
            FocusedPane::Tree => FocusedPane::Tokens,
        }
    }
}

/// The main application state
pub struct App {
    pub file_name: String,
    pub source: String,

    /// Filtered token stream, INDENT / DEDENT included
    pub tokens: Vec<Token>,
    pub module: Node,
    /// Every diagnostic recorded while parsing, in source order of detection
    pub diagnostics: Vec<Diagnostic>,
    error_lines: FxHashSet<usize>,
    node_count: usize,

    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub source_scroll: usize,
    pub tokens_scroll: usize,
    pub tree_scroll: usize,
    pub diagnostics_scroll: usize,

    /// Index of the selected diagnostic; its line is highlighted in the source
    pub selected_diagnostic: usize,

    pub should_quit: bool,
    pub status_message: String,
}

impl App {
    /// Tokenize and parse `source`, keeping everything the panes display
    pub fn new(file_name: impl Into<String>, source: String, options: &ParseOptions) -> Self {
        let (tokens, _) = tokenize_with(&source, options);
        let output = parse_with(&source, options);
        let error_lines = output.errors.iter().map(|d| d.location.line).collect();
        let node_count = output.module.count();

        let status_message = if output.errors.is_empty() {
            String::from("Parsed cleanly")
        } else {
            String::from("Parsed with diagnostics")
        };

        App {
            file_name: file_name.into(),
            source,
            tokens,
            module: output.module,
            diagnostics: output.errors,
            error_lines,
            node_count,
            focused_pane: FocusedPane::Source,
            source_scroll: 0,
            tokens_scroll: 0,
            tree_scroll: 0,
            diagnostics_scroll: 0,
            selected_diagnostic: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        while !self.should_quit {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Line of the selected diagnostic, if there is one
    fn current_line(&self) -> Option<usize> {
        self.diagnostics
            .get(self.selected_diagnostic)
            .map(|d| d.location.line)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // 4 panes in 2 columns, plus status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
            .split(main_chunks[0]);

        // Left column: Source (top) | Diagnostics (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Tokens (top) | Tree (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let current_line = self.current_line();

        super::panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source,
            &self.error_lines,
            current_line,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        super::panes::render_diagnostics_pane(
            frame,
            left_rows[1],
            &self.diagnostics,
            self.selected_diagnostic,
            self.focused_pane == FocusedPane::Diagnostics,
            &mut self.diagnostics_scroll,
        );

        super::panes::render_tokens_pane(
            frame,
            right_rows[0],
            &self.tokens,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.tokens_scroll,
        );

        super::panes::render_tree_pane(
            frame,
            right_rows[1],
            &self.module,
            self.focused_pane == FocusedPane::Tree,
            &mut self.tree_scroll,
        );

        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &super::panes::StatusRenderData {
                file_name: &self.file_name,
                message: &self.status_message,
                token_count: self.tokens.len(),
                node_count: self.node_count,
                error_count: self.diagnostics.len(),
            },
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Home => self.scroll_up(usize::MAX),
            KeyCode::End => self.scroll_down(usize::MAX),
            _ => {}
        }
    }

    fn scroll_up(&mut self, rows: usize) {
        match self.focused_pane {
            FocusedPane::Diagnostics => {
                self.selected_diagnostic = self.selected_diagnostic.saturating_sub(rows);
                self.describe_selection();
            }
            _ => {
                let offset = self.scroll_offset();
                *offset = offset.saturating_sub(rows);
            }
        }
    }

    fn scroll_down(&mut self, rows: usize) {
        match self.focused_pane {
            FocusedPane::Diagnostics => {
                let last = self.diagnostics.len().saturating_sub(1);
                self.selected_diagnostic = self.selected_diagnostic.saturating_add(rows).min(last);
                self.describe_selection();
            }
            // Panes clamp the offset to their content when rendering
            _ => {
                let offset = self.scroll_offset();
                *offset = offset.saturating_add(rows);
            }
        }
    }

    fn scroll_offset(&mut self) -> &mut usize {
        match self.focused_pane {
            FocusedPane::Source => &mut self.source_scroll,
            FocusedPane::Tokens => &mut self.tokens_scroll,
            FocusedPane::Tree => &mut self.tree_scroll,
            FocusedPane::Diagnostics => &mut self.diagnostics_scroll,
        }
    }

    fn describe_selection(&mut self) {
        if let Some(diag) = self.diagnostics.get(self.selected_diagnostic) {
            self.status_message = format!(
                "{}/{}: line {}",
                self.selected_diagnostic + 1,
                self.diagnostics.len(),
                diag.location.line
            );
        }
    }
}
