//! Presentation of styled runs: plain text, ANSI terminal escapes, HTML, JSON.

use crate::types::StyledRun;

const ANSI_ITALIC: &str = "\x1b[3m";
const ANSI_UNDERLINE: &str = "\x1b[4m";
const ANSI_RESET: &str = "\x1b[0m";

pub fn to_plain(runs: &[StyledRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

/// Emphasis codes wrap the visible text; the trailing newline stays outside
/// the reset so terminals do not carry underline onto the next line.
pub fn to_ansi(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    for run in runs {
        if run.style().is_plain() {
            out.push_str(&run.text);
            continue;
        }
        let (body, newline) = match run.text.strip_suffix('\n') {
            Some(body) => (body, "\n"),
            None => (run.text.as_str(), ""),
        };
        if run.italic {
            out.push_str(ANSI_ITALIC);
        }
        if run.underline {
            out.push_str(ANSI_UNDERLINE);
        }
        out.push_str(body);
        out.push_str(ANSI_RESET);
        out.push_str(newline);
    }
    out
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn to_html(runs: &[StyledRun]) -> String {
    let mut out = String::new();
    for run in runs {
        let (body, newline) = match run.text.strip_suffix('\n') {
            Some(body) => (body, true),
            None => (run.text.as_str(), false),
        };
        let mut piece = escape_html(body);
        if run.underline {
            piece = format!("<u>{piece}</u>");
        }
        if run.italic {
            piece = format!("<i>{piece}</i>");
        }
        out.push_str(&piece);
        if newline {
            out.push_str("<br>\n");
        }
    }
    out
}

pub fn to_json(runs: &[StyledRun]) -> serde_json::Value {
    serde_json::json!(runs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Style;

    fn runs() -> Vec<StyledRun> {
        let italic = Style {
            italic: true,
            underline: false,
        };
        let underline = Style {
            italic: false,
            underline: true,
        };
        vec![
            StyledRun::new("Shape\n", italic),
            StyledRun::new("- count: int\n", underline),
            StyledRun::new("+ Items: List<int>\n", Style::PLAIN),
        ]
    }

    #[test]
    fn test_plain() {
        assert_eq!(
            to_plain(&runs()),
            "Shape\n- count: int\n+ Items: List<int>\n"
        );
    }

    #[test]
    fn test_ansi_reset_before_newline() {
        let out = to_ansi(&runs());
        assert!(out.starts_with("\x1b[3mShape\x1b[0m\n"), "got {out:?}");
        assert!(out.contains("\x1b[4m- count: int\x1b[0m\n"), "got {out:?}");
        assert!(out.ends_with("+ Items: List<int>\n"), "got {out:?}");
    }

    #[test]
    fn test_html_escapes_and_wraps() {
        let out = to_html(&runs());
        assert_eq!(
            out,
            "<i>Shape</i><br>\n<u>- count: int</u><br>\n+ Items: List&lt;int&gt;<br>\n"
        );
    }

    #[test]
    fn test_json_shape() {
        let v = to_json(&runs());
        assert_eq!(v[0]["text"], "Shape\n");
        assert_eq!(v[0]["italic"], true);
        assert_eq!(v[1]["underline"], true);
        assert_eq!(v.as_array().map(|a| a.len()), Some(3));
    }
}
