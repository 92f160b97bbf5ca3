use std::sync::OnceLock;

use regex::Regex;

/// Turns LaTeX-flavoured author text into plain expression syntax.
pub fn sanitize_expression(source: &str) -> String {
    let opened = open_bracket_regex().replace_all(source, "(");
    let closed = close_bracket_regex().replace_all(&opened, ")");
    closed.replace('\\', "")
}

fn open_bracket_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[\[{]").expect("open bracket regex"))
}

fn close_bracket_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(r"[\]}]").expect("close bracket regex"))
}
