//! Noise removal ahead of classification: localized filler words and comments.

use regex::Regex;
use std::sync::OnceLock;

static LOCALIZED_RE: OnceLock<Regex> = OnceLock::new();
static COMMENT_RE: OnceLock<Regex> = OnceLock::new();

/// Runs of Cyrillic letters plus the spaces or tabs after them. Line breaks
/// survive so a localized comment never joins two declarations.
fn localized_re() -> &'static Regex {
    LOCALIZED_RE.get_or_init(|| Regex::new(r"[а-яА-Я]+[ \t]*").unwrap())
}

/// `// ...` to end of line, or a non-greedy `/* ... */` spanning lines.
fn comment_re() -> &'static Regex {
    COMMENT_RE.get_or_init(|| Regex::new(r"//[^\n]*|(?s:/\*.*?\*/)").unwrap())
}

/// Strip localized filler and comments. Never fails; text without matches is
/// returned unchanged.
pub fn preprocess(code: &str, strip_localized: bool) -> String {
    let code = if strip_localized {
        localized_re().replace_all(code, "").into_owned()
    } else {
        code.to_string()
    };
    comment_re().replace_all(&code, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_comment_removed() {
        let out = preprocess("int x; // counter\nint y;", true);
        assert_eq!(out, "int x; \nint y;");
    }

    #[test]
    fn test_block_comment_is_non_greedy() {
        let out = preprocess("/** doc */\nint x;\n/* a\n b */\nint y;", true);
        assert_eq!(out, "\nint x;\n\nint y;");
    }

    #[test]
    fn test_cyrillic_filler_removed() {
        let out = preprocess("private int счет ;\nпривет мир public int x;", true);
        assert_eq!(out, "private int ;\npublic int x;");
    }

    #[test]
    fn test_cyrillic_comment_does_not_join_lines() {
        let out = preprocess("int x; // счетчик\nint y;", true);
        assert_eq!(out, "int x; \nint y;");
    }

    #[test]
    fn test_cyrillic_kept_when_disabled() {
        let out = preprocess("int счет;", false);
        assert_eq!(out, "int счет;");
    }

    #[test]
    fn test_no_matches_is_identity() {
        let src = "public class A\n{\n}\n";
        assert_eq!(preprocess(src, true), src);
    }
}
