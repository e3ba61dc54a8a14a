//! Field and method formatters plus the stereotype matcher.
//!
//! Turns bucketed declaration lines into [`FieldEntry`] / [`MethodEntry`] values
//! and renders each into the text of one output run.

use regex::Regex;
use std::sync::OnceLock;
use tracing::trace;

use crate::classify::contains_keyword;
use crate::types::*;

static METHOD_NAME_RE: OnceLock<Regex> = OnceLock::new();
static ACCESS_KEYWORD_RE: OnceLock<Regex> = OnceLock::new();
static ABSTRACT_RE: OnceLock<Regex> = OnceLock::new();
static STATIC_RE: OnceLock<Regex> = OnceLock::new();

/// A name (optionally with generic parameters) directly followed by its
/// parameter list. Greedy up to the last `)`.
fn method_name_re() -> &'static Regex {
    METHOD_NAME_RE.get_or_init(|| Regex::new(r"\s*(\w+)(<[^()]*>)?\s*\((.*)\)").unwrap())
}

fn access_keyword_re() -> &'static Regex {
    ACCESS_KEYWORD_RE.get_or_init(|| {
        Regex::new(r"\b(?:public|protected|private|internal|default)\s+").unwrap()
    })
}

fn abstract_re() -> &'static Regex {
    ABSTRACT_RE.get_or_init(|| Regex::new(r"\babstract\b\s*").unwrap())
}

fn static_re() -> &'static Regex {
    STATIC_RE.get_or_init(|| Regex::new(r"\bstatic\b\s*").unwrap())
}

/// Regex removing the configured cosmetic modifiers. `None` if the list is empty.
fn modifier_re(config: &UmlConfig) -> Option<Regex> {
    if config.method_modifiers.is_empty() {
        return None;
    }
    let alternatives: Vec<String> = config
        .method_modifiers
        .iter()
        .map(|m| regex::escape(m))
        .collect();
    Regex::new(&format!(r"\b(?:{})\s+", alternatives.join("|"))).ok()
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// `public` → `+`, `protected` → `#`, anything else is private.
pub fn access_specifier(line: &str) -> AccessSpecifier {
    if contains_keyword(line, "public") {
        AccessSpecifier::Public
    } else if contains_keyword(line, "protected") {
        AccessSpecifier::Protected
    } else {
        AccessSpecifier::Private
    }
}

pub fn is_static(line: &str) -> bool {
    contains_keyword(line, "static")
}

// ---------------------------------------------------------------------------
// Stereotype matcher
// ---------------------------------------------------------------------------

/// First accessor line that mentions `field_name` (case-insensitive substring)
/// decides the stereotype.
pub fn match_stereotype(field_name: &str, accessors: &[AccessorRecord]) -> Stereotype {
    if field_name.is_empty() {
        return Stereotype::None;
    }
    let needle = field_name.to_lowercase();
    let Some(AccessorRecord(line)) = accessors
        .iter()
        .find(|AccessorRecord(line)| line.to_lowercase().contains(&needle))
    else {
        return Stereotype::None;
    };

    match (line.contains("get;"), line.contains("set;")) {
        (true, true) => Stereotype::GetSet,
        (true, false) => Stereotype::Get,
        (false, true) => Stereotype::Set,
        (false, false) => Stereotype::None,
    }
}

// ---------------------------------------------------------------------------
// Field formatter
// ---------------------------------------------------------------------------

/// `[modifiers] Type name;` → entry. Lines with fewer than two tokens yield `None`.
pub fn format_field(line: &str, accessors: &[AccessorRecord]) -> Option<FieldEntry> {
    let cleaned = line.replace(';', " ");
    let words: Vec<&str> = cleaned.split_whitespace().collect();
    if words.len() < 2 {
        return None;
    }
    let name = words[words.len() - 1];
    let declared_type = words[words.len() - 2];

    Some(FieldEntry {
        access: access_specifier(line),
        name: name.to_string(),
        declared_type: declared_type.to_string(),
        stereotype: match_stereotype(name, accessors),
        is_static: is_static(line),
    })
}

pub fn format_fields(lines: &[String], accessors: &[AccessorRecord]) -> Vec<FieldEntry> {
    lines
        .iter()
        .filter_map(|line| format_field(line, accessors))
        .collect()
}

/// `- name: Type  «get, set» ` (stereotype and its trailing space only when
/// present), newline-terminated.
pub fn field_text(field: &FieldEntry) -> String {
    let mut out = format!(
        "{} {}: {}",
        field.access.marker(),
        field.name,
        field.declared_type
    );
    if let Some(label) = field.stereotype.label() {
        out.push_str("  ");
        out.push_str(label);
        out.push(' ');
    }
    out.push('\n');
    out
}

pub fn field_style(field: &FieldEntry) -> Style {
    Style {
        italic: false,
        underline: field.is_static,
    }
}

// ---------------------------------------------------------------------------
// Method formatter
// ---------------------------------------------------------------------------

fn format_method_with(
    line: &str,
    config: &UmlConfig,
    modifiers: Option<&Regex>,
) -> Option<MethodEntry> {
    let access = access_specifier(line);
    let mut rest = access_keyword_re().replace_all(line, "").into_owned();
    if let Some(re) = modifiers {
        rest = re.replace_all(&rest, "").into_owned();
    }

    let Some(caps) = method_name_re().captures(&rest) else {
        trace!(line, "No name(...) pattern in method line, dropped");
        return None;
    };
    let name = format!("{}{}", &caps[1], caps.get(2).map_or("", |m| m.as_str()));
    let parameters = caps[3].trim().to_string();
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    rest.replace_range(whole, "");

    let is_abstract = contains_keyword(&rest, "abstract");
    if is_abstract {
        rest = abstract_re().replace_all(&rest, "").into_owned();
    }
    let is_static = contains_keyword(&rest, "static");
    if is_static {
        rest = static_re().replace_all(&rest, "").into_owned();
    }

    let mut return_type: String = rest.split_whitespace().collect();
    if config.empty_return_types.contains(&return_type) {
        return_type.clear();
    }

    Some(MethodEntry {
        access,
        name,
        parameters,
        return_type,
        is_abstract,
        is_static,
    })
}

/// Break a cleaned method header into its UML parts. `None` when the line has
/// no `name(...)` shape to render.
pub fn format_method(line: &str, config: &UmlConfig) -> Option<MethodEntry> {
    format_method_with(line, config, modifier_re(config).as_ref())
}

pub fn format_methods(lines: &[String], config: &UmlConfig) -> Vec<MethodEntry> {
    let modifiers = modifier_re(config);
    lines
        .iter()
        .filter_map(|line| format_method_with(line, config, modifiers.as_ref()))
        .collect()
}

/// `+ name: Return`, or `+ name` when there is no return type.
pub fn method_text(method: &MethodEntry, show_parameters: bool) -> String {
    let mut out = format!("{} {}", method.access.marker(), method.name);
    if show_parameters {
        out.push('(');
        out.push_str(&method.parameters);
        out.push(')');
    }
    if !method.return_type.is_empty() {
        out.push_str(": ");
        out.push_str(&method.return_type);
    }
    out.push('\n');
    out
}

pub fn method_style(method: &MethodEntry) -> Style {
    Style {
        italic: method.is_abstract,
        underline: method.is_static,
    }
}
