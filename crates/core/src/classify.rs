// ---------------------------------------------------------------------------
// Line classification — bucket declarations, collapse bodies
// ---------------------------------------------------------------------------

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;
use tracing::{debug, trace};

use crate::types::{AccessorRecord, BodySpan, Classification, LineKind, SourceLine, UmlConfig};

static INITIALIZER_RE: OnceLock<Regex> = OnceLock::new();
static PARAM_NAME_RE: OnceLock<Regex> = OnceLock::new();
static TRAILING_TERMINATOR_RE: OnceLock<Regex> = OnceLock::new();

/// ` = value` up to, not including, the statement terminator.
fn initializer_re() -> &'static Regex {
    INITIALIZER_RE.get_or_init(|| Regex::new(r"\s+=[^;]*").unwrap())
}

/// A parameter name sitting between its type and a `,` or `)`.
fn param_name_re() -> &'static Regex {
    PARAM_NAME_RE.get_or_init(|| Regex::new(r"([\w>\]?*&])\s+\w+\s*([),])").unwrap())
}

fn trailing_terminator_re() -> &'static Regex {
    TRAILING_TERMINATOR_RE.get_or_init(|| Regex::new(r"\s*;\s*$|\s+$").unwrap())
}

// ---------------------------------------------------------------------------
// Keyword and brace helpers
// ---------------------------------------------------------------------------

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offset of the first whole-word occurrence of `word` in `text`.
/// Member access (`Foo.class`) does not count as a keyword.
pub(crate) fn find_keyword(text: &str, word: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut from = 0;
    while let Some(pos) = text[from..].find(word) {
        let start = from + pos;
        let end = start + word.len();
        let before_ok = start == 0 || !(is_word_byte(bytes[start - 1]) || bytes[start - 1] == b'.');
        let after_ok = end >= bytes.len() || !is_word_byte(bytes[end]);
        if before_ok && after_ok {
            return Some(start);
        }
        from = end;
    }
    None
}

pub(crate) fn contains_keyword(text: &str, word: &str) -> bool {
    find_keyword(text, word).is_some()
}

/// Byte offset of a `class` keyword that declares a type, i.e. one followed by
/// a name. `where T : class` and `Foo.class` are not declarations.
pub(crate) fn find_class_keyword(text: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = find_keyword(&text[from..], "class") {
        let start = from + pos;
        let after = &text[start + "class".len()..];
        let rest = after.trim_start_matches(&[' ', '\t'][..]);
        let spaced = rest.len() < after.len();
        if spaced && rest.starts_with(|c: char| c.is_alphabetic() || c == '_') {
            return Some(start);
        }
        from = start + "class".len();
    }
    None
}

pub(crate) fn is_class_declaration(text: &str) -> bool {
    find_class_keyword(text).is_some()
}

/// Net change in brace depth across one line.
fn brace_delta(line: &str) -> i32 {
    line.chars().fold(0, |depth, ch| match ch {
        '{' => depth + 1,
        '}' => depth - 1,
        _ => depth,
    })
}

fn has_brace(line: &str) -> bool {
    line.contains('{') || line.contains('}')
}

fn line_before_brace(line: &str) -> &str {
    match line.find('{') {
        Some(pos) => line[..pos].trim_end(),
        None => line,
    }
}

// ---------------------------------------------------------------------------
// Snapshot construction
// ---------------------------------------------------------------------------

/// Attribute markers (`[SerializeField]`) match anywhere in the line; directive
/// markers (`using `, `import `) must start the trimmed line.
fn is_skipped(line: &str, markers: &BTreeSet<String>) -> bool {
    let trimmed = line.trim_start();
    markers.iter().any(|m| {
        if m.starts_with('[') {
            line.contains(m.as_str())
        } else {
            trimmed.starts_with(m.as_str())
        }
    })
}

/// Standalone annotations and attributes: `@Override`, `[Header("Stats")]`.
fn is_annotation(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.len() < 2 || !bytes[1].is_ascii_uppercase() {
        return false;
    }
    bytes[0] == b'@' || (bytes[0] == b'[' && line.ends_with(']'))
}

/// Whether the `=` at `i` assigns, as opposed to `==`, `!=`, `<=`, `>=` or `=>`.
fn is_assignment(bytes: &[u8], i: usize) -> bool {
    let prev_ok = i == 0 || !matches!(bytes[i - 1], b'=' | b'!' | b'<' | b'>');
    let next_ok = !matches!(bytes.get(i + 1), Some(b'=') | Some(b'>'));
    prev_ok && next_ok
}

/// Index of the `}` closing the block opened at `open`, when that block is an
/// auto-property accessor list such as `{ get; private set; }`.
fn accessor_block_end(line: &str, open: usize) -> Option<usize> {
    let mut depth = 0;
    for (i, b) in line.bytes().enumerate().skip(open) {
        match b {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    let inner = &line[open + 1..i];
                    return (inner.contains("get;") || inner.contains("set;")).then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Split one physical line into declaration-sized pieces: after each `;` and
/// `{`, and around each `}`.
///
/// Text inside parentheses, accessor lists and `= initializer` tails up to
/// their terminating `;` is never split.
fn split_statements(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut parens: i32 = 0;
    // Brace depth inside an initializer tail, while one is open.
    let mut initializer: Option<i32> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(depth) = initializer.as_mut() {
            match b {
                b'{' => *depth += 1,
                b'}' => *depth -= 1,
                b';' if *depth <= 0 => {
                    pieces.push(&line[start..=i]);
                    start = i + 1;
                    initializer = None;
                }
                _ => {}
            }
            i += 1;
            continue;
        }

        match b {
            b'(' => parens += 1,
            b')' => parens -= 1,
            _ if parens > 0 => {}
            b'=' if is_assignment(bytes, i) => initializer = Some(0),
            b';' => {
                pieces.push(&line[start..=i]);
                start = i + 1;
            }
            b'{' => {
                if let Some(close) = accessor_block_end(line, i) {
                    i = close + 1;
                    continue;
                }
                pieces.push(&line[start..=i]);
                start = i + 1;
            }
            b'}' => {
                pieces.push(&line[start..i]);
                pieces.push(&line[i..=i]);
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    pieces.push(&line[start..]);
    pieces.retain(|p| !p.trim().is_empty());
    pieces
}

/// Leading whitespace, a trailing `= initializer`, and trailing whitespace removed.
/// An `=` inside a parameter list (`void F(int a = 5)`) is a default value, not
/// an initializer, and is kept.
pub fn normalize_line(line: &str) -> String {
    let trimmed = line.trim_start();
    let in_params = match (trimmed.find('('), trimmed.find('=')) {
        (Some(paren), Some(eq)) => paren < eq,
        _ => false,
    };
    if in_params {
        return trimmed.trim_end().to_string();
    }
    let without_init = initializer_re().replace_all(trimmed, "");
    without_init.trim_end().to_string()
}

/// Immutable, index-addressable view of the cleaned text that the scan runs
/// over. One entry per declaration-sized piece, so several members written on
/// one physical line are classified separately.
fn snapshot(cleaned: &str, config: &UmlConfig) -> Vec<SourceLine> {
    cleaned
        .lines()
        .flat_map(split_statements)
        .filter(|raw| !is_skipped(raw, &config.skip_markers))
        .filter_map(|raw| {
            let text = normalize_line(raw);
            if text.is_empty() || is_annotation(&text) {
                return None;
            }
            Some(SourceLine {
                raw: raw.to_string(),
                text,
                kind: LineKind::Noise,
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Nesting and body spans
// ---------------------------------------------------------------------------

/// For every line, whether it carries the `class` keyword while an earlier
/// class body is still open at that position.
fn nested_class_lines(lines: &[&str]) -> Vec<bool> {
    let mut nested = Vec::with_capacity(lines.len());
    let mut depth: i32 = 0;
    // Depth outside each class body that is currently open.
    let mut open_classes: Vec<i32> = Vec::new();
    // Depth of a class header whose `{` has not been seen yet.
    let mut pending: Option<i32> = None;

    for line in lines {
        let is_class = is_class_declaration(line);
        nested.push(is_class && !open_classes.is_empty());
        if is_class {
            pending = Some(depth);
        }
        for ch in line.chars() {
            match ch {
                '{' => {
                    if let Some(outer) = pending.take() {
                        if outer == depth {
                            open_classes.push(outer);
                        }
                    }
                    depth += 1;
                }
                '}' => {
                    pending = None;
                    depth -= 1;
                    while open_classes.last().is_some_and(|&outer| depth <= outer) {
                        open_classes.pop();
                    }
                }
                _ => {}
            }
        }
        // Forward declaration, no body follows.
        if pending.is_some() && line.ends_with(';') {
            pending = None;
        }
    }
    nested
}

/// Lines consumed by the body of the declaration at `decl`.
///
/// Depth starts at the declaration's own net brace count. A body opened and
/// closed on the header line consumes nothing; otherwise every following line
/// is consumed until depth returns to zero, including the closing line. A
/// header ending in `;` without a `{` has no body.
pub fn body_span(lines: &[&str], decl: usize) -> BodySpan {
    let start = decl + 1;
    let head = lines[decl];
    let mut depth = brace_delta(head);

    let bodiless = !head.contains('{') && head.ends_with(';');
    if bodiless || (head.contains('{') && depth <= 0) {
        return BodySpan { start, end: start };
    }

    let mut end = start;
    while end < lines.len() {
        let line = lines[end];
        let before = depth;
        depth += brace_delta(line);
        if depth <= 0 {
            if before > 0 && has_brace(line) {
                end += 1;
            }
            break;
        }
        end += 1;
    }
    BodySpan { start, end }
}

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub fn is_accessor(line: &str) -> bool {
    line.contains("get;") || line.contains("set;")
}

pub fn is_method(line: &str) -> bool {
    line.contains('(') && line.contains(')')
}

pub fn is_field(line: &str) -> bool {
    !is_accessor(line)
        && !is_class_declaration(line)
        && !line.contains(&['(', ')', '{', '}'][..])
        && line.split_whitespace().nth(1).is_some()
}

/// Tag one normalized line. `nested_class` comes from the brace balance of
/// everything before it.
pub fn classify_line(line: &str, nested_class: bool) -> LineKind {
    if nested_class {
        LineKind::SubclassHead
    } else if contains_keyword(line, "enum") {
        LineKind::Enum
    } else if is_accessor(line) {
        LineKind::Accessor
    } else if is_method(line) {
        LineKind::Method
    } else if is_field(line) {
        LineKind::Field
    } else {
        LineKind::Noise
    }
}

/// Keywords of declarations whose body holds members rather than code.
const CONTAINER_KEYWORDS: &[&str] = &["class", "interface", "struct", "record", "namespace"];

/// A non-member line that opens a block of its own, such as `public int Hp {`
/// with accessor bodies or a Java `static {` initializer. Its contents are not
/// members.
fn opens_foreign_block(line: &str) -> bool {
    line != "{"
        && line.ends_with('{')
        && !CONTAINER_KEYWORDS.iter().any(|k| contains_keyword(line, k))
}

/// `public enum Color : byte {` → `public enum Color`.
fn enum_header(line: &str) -> String {
    let head = line_before_brace(line);
    match head.find(':') {
        Some(pos) => head[..pos].trim_end().to_string(),
        None => head.to_string(),
    }
}

/// Header up to and including the `)` closing the first parameter list.
/// Drops `throws`, `where` and `: base(...)` clauses and expression bodies.
fn through_parameter_list(line: &str) -> &str {
    let Some(open) = line.find('(') else {
        return line;
    };
    let mut depth = 0;
    for (i, b) in line.bytes().enumerate().skip(open) {
        match b {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return &line[..=i];
                }
            }
            _ => {}
        }
    }
    line
}

/// Method header with inline body, parameter names and terminator removed:
/// `public int Add(int a, int b) {` → `public int Add(int, int)`.
pub fn clean_method_header(line: &str) -> String {
    let head = through_parameter_list(line_before_brace(line));
    let without_names = param_name_re().replace_all(head, "$1$2");
    trailing_terminator_re().replace_all(&without_names, "").into_owned()
}

// ---------------------------------------------------------------------------
// Classification pass
// ---------------------------------------------------------------------------

/// Classify the cleaned text into field, method and accessor buckets.
///
/// Runs one left-to-right scan over an immutable snapshot. Declarations with
/// bodies advance the cursor past their [`BodySpan`], so body lines are never
/// classified themselves.
pub fn classify(cleaned: &str, config: &UmlConfig) -> Classification {
    let snapshot = snapshot(cleaned, config);
    let texts: Vec<&str> = snapshot.iter().map(|l| l.text.as_str()).collect();
    let nested = nested_class_lines(&texts);

    let mut result = Classification::default();
    let mut cursor = 0;

    while cursor < snapshot.len() {
        let text = texts[cursor];
        let kind = classify_line(text, nested[cursor]);
        let mut next = cursor + 1;

        match kind {
            LineKind::SubclassHead => {
                let span = body_span(&texts, cursor);
                trace!(
                    line = cursor,
                    consumed = span.len(),
                    "Skipping nested class"
                );
                next = span.end;
            }
            LineKind::Enum => {
                next = body_span(&texts, cursor).end;
                result.fields.push(enum_header(text));
            }
            LineKind::Accessor => result.accessors.push(AccessorRecord(text.to_string())),
            LineKind::Method => {
                next = body_span(&texts, cursor).end;
                result.methods.push(clean_method_header(text));
            }
            LineKind::Field => result.fields.push(text.to_string()),
            LineKind::Noise => {
                if opens_foreign_block(text) {
                    next = body_span(&texts, cursor).end;
                }
            }
        }

        result.lines.push(SourceLine {
            kind,
            ..snapshot[cursor].clone()
        });
        cursor = next;
    }

    debug!(
        lines = snapshot.len(),
        classified = result.lines.len(),
        fields = result.fields.len(),
        methods = result.methods.len(),
        accessors = result.accessors.len(),
        "Classification complete"
    );
    result
}
