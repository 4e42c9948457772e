// src/core/html.rs
// Thin helpers over `scraper` for the two text shapes the site uses:
// an element's own text node (label/value pairs) and its whole text (archive items).

use scraper::{ElementRef, Html, Selector};

use crate::error::{Error, Result};

/// Compile a CSS selector, keeping the offending source in the error.
pub fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|_| Error::Selector(s!(css)))
}

/// First non-blank text node that is a direct child of `el`, trimmed.
pub fn own_text(el: ElementRef<'_>) -> Option<String> {
    el.children()
        .filter_map(|node| node.value().as_text())
        .map(|t| t.trim())
        .find(|t| !t.is_empty())
        .map(str::to_string)
}

/// All descendant text concatenated, trimmed.
pub fn all_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Own text of the first element in `doc` matching `sel`.
pub fn first_own_text(doc: &Html, sel: &Selector) -> Option<String> {
    doc.select(sel).next().and_then(own_text)
}

/// Own text of the first match of `sel` under `el`.
pub fn child_own_text(el: ElementRef<'_>, sel: &Selector) -> Option<String> {
    el.select(sel).next().and_then(own_text)
}
