// src/clean/coerce.rs
//! Per-cell coercions from scraped text to typed values.
//! Each one is total: anything it can't make sense of comes back as `None`.

use std::borrow::Cow;
use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]{4})[/\-年]([0-9]{1,2})").expect("static date pattern"));
static DISPLACEMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9]+\.[0-9]+|[0-9]+)\s*([TL])?").expect("static displacement pattern"));
static HORSEPOWER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(?:马力|PS)").expect("static horsepower pattern"));
static DIGITS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static digits pattern"));

fn is_cjk(ch: char) -> bool {
    ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}

/// Brand = first contiguous run of CJK ideographs in the name.
/// A run that is just `款` (model-year suffix) is no brand.
pub fn extract_brand(name: Option<&str>) -> Option<String> {
    let name = name?;
    let run: String = name
        .chars()
        .skip_while(|c| !is_cjk(*c))
        .take_while(|c| is_cjk(*c))
        .collect();
    match run.as_str() {
        "" | "款" => None,
        _ => Some(run),
    }
}

/// Full-width digits and point (`０`-`９`, `．`) as ASCII; everything else untouched.
fn ascii_digits(s: &str) -> Cow<'_, str> {
    if !s.chars().any(|c| ('０'..='９').contains(&c) || c == '．') {
        return Cow::Borrowed(s);
    }
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '．' => '.',
            _ => c,
        })
        .collect()
}

fn numeric_part(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit() || *c == '.').collect()
}

/// Price in 10k CNY; must be positive. A leading minus sign counts.
pub fn clean_price(s: &str) -> Option<f64> {
    if s.trim_start().starts_with('-') { return None; }
    numeric_part(&ascii_digits(s)).parse::<f64>().ok().filter(|p| *p > 0.0)
}

/// Mileage in 10k km.
pub fn clean_mileage(s: &str) -> Option<f64> {
    numeric_part(&ascii_digits(s)).parse::<f64>().ok()
}

/// `(year, month)` from a leading `YYYY` + `/`, `-` or `年` + month.
/// Years outside `1900..=current_year + 2` and months outside `1..=12` are rejected.
pub fn parse_date_in(s: &str, current_year: i32) -> Option<(i32, u32)> {
    let s = ascii_digits(s.trim());
    let cap = DATE_RE.captures(&s)?;
    let year: i32 = cap[1].parse().ok()?;
    let month: u32 = cap[2].parse().ok()?;
    ((1900..=current_year + 2).contains(&year) && (1..=12).contains(&month)).then_some((year, month))
}

pub fn parse_date(s: &str) -> Option<(i32, u32)> {
    parse_date_in(s, chrono::Local::now().year())
}

/// `自动 / 1.5L` → `自动`.
pub fn transmission(s: &str) -> Option<String> {
    let first = s.split('/').next()?.trim();
    (!first.is_empty()).then(|| s!(first))
}

/// Litres from engine text like `1.5T 150马力 L4`.
pub fn displacement(engine: &str) -> Option<f64> {
    let upper = ascii_digits(engine).to_uppercase();
    let cap = DISPLACEMENT_RE.captures(&upper)?;
    cap[1].parse().ok()
}

pub fn horsepower(engine: &str) -> Option<u32> {
    let upper = ascii_digits(engine).to_uppercase();
    let cap = HORSEPOWER_RE.captures(&upper)?;
    cap[1].parse().ok()
}

pub fn transfer_count(s: &str) -> Option<u32> {
    DIGITS_RE.find(&ascii_digits(s))?.as_str().parse().ok()
}
