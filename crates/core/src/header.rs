//! Class header recovery: the first `class` declaration in the cleaned text.

use crate::classify::{contains_keyword, find_class_keyword};
use crate::types::ClassHeader;

const CLASS_KEYWORD: &str = "class";

/// Full line around byte offset `pos`, found by searching for newline
/// boundaries on either side.
fn line_around(text: &str, pos: usize) -> &str {
    let start = text[..pos].rfind('\n').map(|p| p + 1).unwrap_or(0);
    let end = text[pos..].find('\n').map(|p| pos + p).unwrap_or(text.len());
    text[start..end].trim()
}

/// Bare class name from whatever follows the `class` keyword.
///
/// Stops at whitespace, `:` or `{` outside a generic parameter list, which
/// drops `: Base`, `extends Base`, `implements I` and `where T : new()` clauses.
fn bare_name(rest: &str) -> &str {
    let rest = rest.trim_start();
    let mut angle = 0i32;
    for (i, ch) in rest.char_indices() {
        match ch {
            '<' => angle += 1,
            '>' => angle -= 1,
            ':' | '{' | '(' | ';' if angle <= 0 => return &rest[..i],
            c if c.is_whitespace() && angle <= 0 => return &rest[..i],
            _ => {}
        }
    }
    rest
}

/// Locate the first `class` declaration and derive the class name and its
/// `abstract` flag from that line. `None` when the text has no class keyword
/// or nothing follows it.
pub fn extract_class_header(cleaned: &str) -> Option<ClassHeader> {
    let pos = find_class_keyword(cleaned)?;
    let line = line_around(cleaned, pos);

    let after = pos + CLASS_KEYWORD.len();
    let line_end = cleaned[after..].find('\n').map(|p| after + p).unwrap_or(cleaned.len());
    let name = bare_name(&cleaned[after..line_end]);
    if name.is_empty() {
        return None;
    }

    Some(ClassHeader {
        name: name.to_string(),
        is_abstract: contains_keyword(line, "abstract"),
    })
}
