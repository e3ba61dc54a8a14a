//! Core types shared across umlgen: classified source lines, body spans, the
//! per-pass buckets, formatted UML entries, styled output runs, and runtime
//! configuration.

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Line classification
// ---------------------------------------------------------------------------

/// Classification tag assigned to every surviving line of the cleaned text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    SubclassHead,
    Enum,
    Accessor,
    Method,
    Field,
    Noise,
}

impl LineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            LineKind::SubclassHead => "subclass_head",
            LineKind::Enum => "enum",
            LineKind::Accessor => "accessor",
            LineKind::Method => "method",
            LineKind::Field => "field",
            LineKind::Noise => "noise",
        }
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One line of the cleaned text after normalization.
///
/// `raw` is the line as it appeared after preprocessing; `text` has leading
/// whitespace, initializers and trailing whitespace removed. `text` is what the
/// predicates look at and what ends up in a bucket.
#[derive(Debug, Clone, Serialize)]
pub struct SourceLine {
    pub raw: String,
    pub text: String,
    pub kind: LineKind,
}

/// Half-open range of snapshot line indices consumed by a declaration's body.
///
/// `start` is the first line after the declaration header. An empty span
/// (`start == end`) means the declaration had no multi-line body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodySpan {
    pub start: usize,
    pub end: usize,
}

impl BodySpan {
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

/// Raw text of a getter/setter-bearing line. Only ever used as a lookup target
/// when deciding a field's stereotype.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessorRecord(pub String);

/// Result of one classification pass: the surviving lines with their tags and
/// the three buckets the formatters consume.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Lines that were classified (subclass heads included); body lines are absent.
    pub lines: Vec<SourceLine>,
    pub fields: Vec<String>,
    pub methods: Vec<String>,
    pub accessors: Vec<AccessorRecord>,
}

// ---------------------------------------------------------------------------
// Formatted UML entries
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AccessSpecifier {
    Public,
    Protected,
    Private,
}

impl AccessSpecifier {
    pub fn marker(self) -> char {
        match self {
            AccessSpecifier::Public => '+',
            AccessSpecifier::Protected => '#',
            AccessSpecifier::Private => '-',
        }
    }
}

/// Accessor annotation attached to a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stereotype {
    None,
    Get,
    Set,
    GetSet,
}

impl Stereotype {
    /// Guillemet-wrapped label, or `None` when there is nothing to show.
    pub fn label(self) -> Option<&'static str> {
        match self {
            Stereotype::None => None,
            Stereotype::Get => Some("«get»"),
            Stereotype::Set => Some("«set»"),
            Stereotype::GetSet => Some("«get, set»"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassHeader {
    pub name: String,
    pub is_abstract: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldEntry {
    pub access: AccessSpecifier,
    pub name: String,
    pub declared_type: String,
    pub stereotype: Stereotype,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodEntry {
    pub access: AccessSpecifier,
    pub name: String,
    /// Parameter list without the surrounding parentheses, names already removed.
    pub parameters: String,
    /// Empty when the declaration has no explicit (non-void) return token.
    pub return_type: String,
    pub is_abstract: bool,
    pub is_static: bool,
}

// ---------------------------------------------------------------------------
// Styled output
// ---------------------------------------------------------------------------

/// Presentation-independent emphasis for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Style {
    pub italic: bool,
    pub underline: bool,
}

impl Style {
    pub const PLAIN: Style = Style {
        italic: false,
        underline: false,
    };

    pub fn is_plain(&self) -> bool {
        !self.italic && !self.underline
    }
}

/// The sole output unit: a piece of text with its emphasis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub text: String,
    pub italic: bool,
    pub underline: bool,
}

impl StyledRun {
    pub fn new(text: impl Into<String>, style: Style) -> Self {
        Self {
            text: text.into(),
            italic: style.italic,
            underline: style.underline,
        }
    }

    pub fn style(&self) -> Style {
        Style {
            italic: self.italic,
            underline: self.underline,
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime configuration, loaded from .umlgen.toml or defaults
// ---------------------------------------------------------------------------

/// Runtime configuration for one generator.
#[derive(Debug, Clone)]
pub struct UmlConfig {
    /// Lines matching one of these markers are dropped before classification.
    /// Bracketed attribute markers match anywhere; the rest must prefix the trimmed line.
    pub skip_markers: BTreeSet<String>,
    /// Modifier keywords removed from method headers without affecting styling.
    pub method_modifiers: BTreeSet<String>,
    /// Return tokens that render as "no return type".
    pub empty_return_types: BTreeSet<String>,
    /// Remove runs of Cyrillic letters before classification.
    pub strip_localized: bool,
    /// Render methods as `name(params)` instead of the bare name.
    pub show_parameters: bool,
}

impl Default for UmlConfig {
    fn default() -> Self {
        Self {
            skip_markers: [
                "[SerializeField]",
                "using ",
                "import ",
                "package ",
                "namespace ",
                "#include",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            method_modifiers: [
                "virtual",
                "new",
                "override",
                "sealed",
                "final",
                "async",
                "synchronized",
                "extern",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            empty_return_types: ["void"].iter().map(|s| s.to_string()).collect(),
            strip_localized: true,
            show_parameters: false,
        }
    }
}
