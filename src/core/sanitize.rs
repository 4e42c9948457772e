// src/core/sanitize.rs

/// Spaces the site pads values with that `char::is_whitespace` doesn't all catch.
const ODD_SPACES: [char; 3] = ['\u{3000}', '\u{00A0}', '\u{200B}'];

const ASCII_PUNCT: &str = ".,!?;:'\"()[]{}<>@#$%^&*-_+=/\\|`~";
const CJK_PUNCT: &str = "·！￥（）—【】《》？，。；：‘’“”€£¥";

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

fn allowed(ch: char) -> bool {
    ch.is_alphanumeric()
        || ch == '_'
        || ch.is_whitespace()
        || ASCII_PUNCT.contains(ch)
        || CJK_PUNCT.contains(ch)
}

/// Clean one scraped value: odd spaces become plain spaces, characters
/// outside the allow-list are dropped, whitespace is collapsed and trimmed.
/// Filtering happens before collapsing so a second pass is a no-op.
pub fn clean_text(s: &str) -> String {
    let filtered: String = s
        .chars()
        .map(|c| if ODD_SPACES.contains(&c) { ' ' } else { c })
        .filter(|&c| allowed(c))
        .collect();
    normalize_ws(&filtered)
}

/// `clean_text` over an optional value; `None` passes through.
pub fn clean_opt(s: Option<String>) -> Option<String> {
    s.map(|v| clean_text(&v))
}

/// Like `clean_opt`, but a value that cleans down to nothing becomes `None`.
pub fn clean_non_empty(s: Option<String>) -> Option<String> {
    clean_opt(s).filter(|v| !v.is_empty())
}
