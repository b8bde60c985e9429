use regex::Regex;
use std::sync::LazyLock;

// CSI sequences (ESC[ ... cmd): colors, cursor movement, screen clears.
static ANSI_CSI: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").ok());

/// Makes server-supplied text safe to print in a menu line: strips ANSI
/// sequences and control characters, folds whitespace, caps the length.
pub fn sanitize_for_terminal(s: &str, max_chars: usize) -> String {
    let no_ansi = match ANSI_CSI.as_ref() {
        Some(re) => re.replace_all(s, "").into_owned(),
        None => s.to_string(),
    };

    let cleaned: String = no_ansi
        .chars()
        .map(|ch| if matches!(ch, '\n' | '\r' | '\t') { ' ' } else { ch })
        .filter(|ch| *ch >= ' ' && *ch != '\x7f')
        .collect();

    cleaned.trim().chars().take(max_chars).collect()
}

/// Escapes text for interpolation into element content or a quoted
/// attribute value.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_ansi_and_controls() {
        let raw = "\x1b[31mRed\x1b[0m title\x07\nnext";
        assert_eq!(sanitize_for_terminal(raw, 200), "Red title next");
    }

    #[test]
    fn truncates_by_chars() {
        assert_eq!(sanitize_for_terminal("héllo world", 5), "héllo");
    }

    #[test]
    fn escapes_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
