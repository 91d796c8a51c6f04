//! Terminal viewer built on [ratatui](https://github.com/ratatui-org/ratatui).
//!
//! The UI is organized into three layers:
//!
//! - **[`app`]**: application state, keyboard event loop, pane focus and selection
//! - **[`panes`]**: stateless render functions for each visible pane (source,
//!   tokens, syntax tree, diagnostics, status bar)
//! - **[`theme`]**: centralized color palette used by all panes
//!
//! The entry point for consumers is [`App`]: construct it with the source text
//! and [`ParseOptions`], then call [`App::run`] to start the event loop.
//!
//! [`ParseOptions`]: crate::parser::options::ParseOptions
//! [`App::run`]: app::App::run

pub mod app;
pub mod panes;
pub mod theme;

pub use app::App;
