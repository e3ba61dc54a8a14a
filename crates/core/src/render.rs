//! Output sink abstraction and the renderer that appends styled runs to it.

use std::fmt;
use tracing::warn;

use crate::format::{field_style, field_text, method_style, method_text};
use crate::types::{ClassHeader, FieldEntry, MethodEntry, Style, StyledRun};

// ---------------------------------------------------------------------------
// Sink contract
// ---------------------------------------------------------------------------

/// Rejected styled insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError {
    BadLocation { offset: usize, len: usize },
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::BadLocation { offset, len } => {
                write!(f, "invalid insertion offset {offset} (document length {len})")
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// Anything the renderer can write styled text into. Lengths and offsets are
/// counted in characters.
pub trait OutputSink {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&mut self, offset: usize, text: &str, style: Style) -> Result<(), InsertError>;

    /// Unstyled append used when a styled insertion is rejected.
    fn append_plain(&mut self, text: &str);

    fn clear(&mut self);
}

// ---------------------------------------------------------------------------
// In-memory styled document
// ---------------------------------------------------------------------------

/// Ordered runs of styled text. The default sink.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyledDocument {
    runs: Vec<StyledRun>,
    len: usize,
}

impl StyledDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> &[StyledRun] {
        &self.runs
    }

    pub fn into_runs(self) -> Vec<StyledRun> {
        self.runs
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Index of the run containing char `offset` and the char position inside it.
    fn locate(&self, offset: usize) -> (usize, usize) {
        let mut seen = 0;
        for (i, run) in self.runs.iter().enumerate() {
            let run_len = run.text.chars().count();
            if offset < seen + run_len {
                return (i, offset - seen);
            }
            seen += run_len;
        }
        (self.runs.len(), 0)
    }
}

impl OutputSink for StyledDocument {
    fn len(&self) -> usize {
        self.len
    }

    fn insert(&mut self, offset: usize, text: &str, style: Style) -> Result<(), InsertError> {
        if offset > self.len {
            return Err(InsertError::BadLocation {
                offset,
                len: self.len,
            });
        }
        if text.is_empty() {
            return Ok(());
        }

        let run = StyledRun::new(text, style);
        let (idx, inner) = self.locate(offset);
        if inner == 0 {
            self.runs.insert(idx, run);
        } else {
            // Split the run the offset falls into.
            let existing = &mut self.runs[idx];
            let split_at = existing
                .text
                .char_indices()
                .nth(inner)
                .map_or(existing.text.len(), |(b, _)| b);
            let tail_text = existing.text.split_off(split_at);
            let tail = StyledRun {
                text: tail_text,
                ..existing.clone()
            };
            self.runs.insert(idx + 1, run);
            self.runs.insert(idx + 2, tail);
        }
        self.len += text.chars().count();
        Ok(())
    }

    fn append_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.len += text.chars().count();
        self.runs.push(StyledRun::new(text, Style::PLAIN));
    }

    fn clear(&mut self) {
        self.runs.clear();
        self.len = 0;
    }
}

// ---------------------------------------------------------------------------
// Renderer
// ---------------------------------------------------------------------------

/// Insert at the sink's current end; on rejection, fall back to a plain append.
pub fn append_run(sink: &mut dyn OutputSink, text: &str, style: Style) {
    let at = sink.len();
    if let Err(e) = sink.insert(at, text, style) {
        warn!(error = %e, "Styled insertion rejected, appending plain text");
        sink.append_plain(text);
    }
}

/// Append the class header, then every field, then every method.
pub fn render(
    header: Option<&ClassHeader>,
    fields: &[FieldEntry],
    methods: &[MethodEntry],
    show_parameters: bool,
    sink: &mut dyn OutputSink,
) {
    if let Some(h) = header {
        let style = Style {
            italic: h.is_abstract,
            underline: false,
        };
        append_run(sink, &format!("{}\n", h.name), style);
    }
    for field in fields {
        append_run(sink, &field_text(field), field_style(field));
    }
    for method in methods {
        append_run(
            sink,
            &method_text(method, show_parameters),
            method_style(method),
        );
    }
}
