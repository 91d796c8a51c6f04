//! Parse configuration

/// What the grammar engine does after a syntax error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Recovery {
    /// Discard the offending token and keep parsing, collecting every error
    #[default]
    Permissive,
    /// Stop at the first syntax error and return the partial module
    Conservative,
}

/// How leading whitespace is measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabPolicy {
    /// Every whitespace character counts as one column
    #[default]
    Raw,
    /// A tab advances to the next multiple of the given width
    Expand(usize),
    /// Tabs in leading whitespace are an indentation error (measured raw)
    Reject,
}

impl TabPolicy {
    /// Width of a run of leading whitespace under this policy.
    pub fn measure(self, whitespace: &str) -> usize {
        match self {
            TabPolicy::Raw | TabPolicy::Reject => whitespace.chars().count(),
            TabPolicy::Expand(size) => {
                let size = size.max(1);
                whitespace.chars().fold(0, |width, ch| {
                    if ch == '\t' {
                        (width / size + 1) * size
                    } else {
                        width + 1
                    }
                })
            }
        }
    }
}

/// Options for one tokenize / parse run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    pub recovery: Recovery,
    pub tabs: TabPolicy,
    /// Append an END_OF_INPUT marker after the final DEDENTs
    pub end_marker: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            recovery: Recovery::Permissive,
            tabs: TabPolicy::Raw,
            end_marker: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_recovery(mut self, recovery: Recovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn with_tabs(mut self, tabs: TabPolicy) -> Self {
        self.tabs = tabs;
        self
    }

    pub fn with_end_marker(mut self, end_marker: bool) -> Self {
        self.end_marker = end_marker;
        self
    }
}
