use once_cell::sync::Lazy;
use regex::Regex;

static WS_RUN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("ws run"));
static NON_PRINTABLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x20-\x7E]").expect("non printable"));

/// Trim, collapse whitespace runs to a single space, then strip everything
/// outside printable ASCII. Both the index values and the selection texts go
/// through this, so matching is insensitive to spacing and to characters the
/// host inserts around list text.
///
/// The strip runs after the collapse, so a paragraph that starts with a
/// non-ASCII character can normalize to a string with a leading space. That
/// matches how the original matching behaved and both sides of a comparison
/// see the same form.
pub fn normalize_text(text: &str) -> String {
    let collapsed = WS_RUN_RE.replace_all(text.trim(), " ");
    NON_PRINTABLE_RE.replace_all(&collapsed, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::normalize_text;

    #[test]
    fn collapses_whitespace_runs() {
        assert_eq!(normalize_text("  a \t b\n\nc  "), "a b c");
    }

    #[test]
    fn strips_non_printable_ascii() {
        // NBSP is whitespace to `\s` and collapses; the han character is
        // stripped outright.
        assert_eq!(normalize_text("a\u{00A0}b\u{4E2D}c"), "a bc");
        assert_eq!(normalize_text("plain"), "plain");
    }

    #[test]
    fn empty_and_blank_normalize_to_empty() {
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \t\r\n"), "");
    }
}
