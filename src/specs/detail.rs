// src/specs/detail.rs
//! Scraping *spec* for a vehicle detail page (`/dealer/{dealer}/{info}.html`).
//!
//! Four independent sources feed one `RawFieldSet`:
//! - title block: `h3.car-brand-name` and `span.price`;
//! - "basic info": `ul.brand-unit-item.fn-clear > li`, label in `<p>`, value in `<h4>`;
//! - "archive": `ul.basic-item-ul > li`, label and value fused in one string;
//! - message blob: `p#messageBox` inside the `leave-message-box` div, holding
//!   `【label】value` segments.
//!
//! A missing element is never an error; the field is just absent. Everything
//! fallible (selectors, patterns) is compiled once in `DetailExtractor::new`.

use regex::Regex;
use scraper::{Html, Selector};

use super::fields::{DetailField, RawFieldSet};
use super::rules::{self, ARCHIVE, BASIC_INFO, CONFIG_MARKER, MESSAGE_MARKERS};
use crate::core::html::{all_text, child_own_text, first_own_text, selector};
use crate::core::sanitize::{clean_text, normalize_ws};
use crate::error::Result;

pub struct DetailExtractor {
    name: Selector,
    price: Selector,
    basic_items: Selector,
    basic_label: Selector,
    basic_value: Selector,
    archive_items: Selector,
    message: Selector,
    config_re: Regex,
    marker_res: Vec<(DetailField, Regex)>,
}

impl DetailExtractor {
    pub fn new() -> Result<Self> {
        let config_re = Regex::new(&format!(r"【{}】(.*)$", regex::escape(CONFIG_MARKER.1)))?;
        let marker_res = MESSAGE_MARKERS
            .iter()
            .map(|(field, marker)| {
                Regex::new(&format!(r"【{}】(.*?)【", regex::escape(marker))).map(|re| (*field, re))
            })
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(Self {
            name: selector("h3.car-brand-name")?,
            price: selector("span.price")?,
            basic_items: selector("ul.brand-unit-item.fn-clear > li")?,
            basic_label: selector("p")?,
            basic_value: selector("h4")?,
            archive_items: selector("ul.basic-item-ul > li")?,
            message: selector(r#"div[class*="leave-message-box"] p#messageBox"#)?,
            config_re,
            marker_res,
        })
    }

    /// Extract every field the page offers. `None` (page not fetched) yields an empty set.
    pub fn extract(&self, html: Option<&str>) -> RawFieldSet {
        let Some(html) = html else { return RawFieldSet::new() };
        let doc = Html::parse_document(html);
        let fields = self.extract_doc(&doc);
        logd!("Detail: {} fields", fields.len());
        fields
    }

    pub fn extract_doc(&self, doc: &Html) -> RawFieldSet {
        let mut fields = RawFieldSet::new();

        // Title block: present-but-empty when the element is missing.
        let name = first_own_text(doc, &self.name).unwrap_or_default();
        fields.set_once(DetailField::Name, clean_text(&name));
        let price = first_own_text(doc, &self.price).unwrap_or_default();
        fields.set_once(DetailField::Price, clean_text(&price));

        self.basic_info(doc, &mut fields);
        self.archive(doc, &mut fields);
        self.message(doc, &mut fields);
        fields
    }

    fn basic_info(&self, doc: &Html, fields: &mut RawFieldSet) {
        for item in doc.select(&self.basic_items) {
            let (Some(label), Some(value)) = (
                child_own_text(item, &self.basic_label),
                child_own_text(item, &self.basic_value),
            ) else {
                continue;
            };
            if let Some(rule) = rules::first_match(&BASIC_INFO, &label) {
                fields.set_once(rule.field, clean_text(&rule.value(&value)));
            }
        }
    }

    fn archive(&self, doc: &Html, fields: &mut RawFieldSet) {
        for item in doc.select(&self.archive_items) {
            let text = all_text(item);
            if text.is_empty() { continue; }
            match rules::first_match(&ARCHIVE, &text) {
                Some(rule) => fields.set_once(rule.field, clean_text(&rule.value(&text))),
                None => logd!("Detail: unmatched archive item `{text}`"),
            }
        }
    }

    fn message(&self, doc: &Html, fields: &mut RawFieldSet) {
        if let Some(raw) = first_own_text(doc, &self.message) {
            self.parse_message(&raw, fields);
        }
    }

    /// Split a message blob into its bracketed sub-fields. The blob itself is kept too.
    pub fn parse_message(&self, raw: &str, fields: &mut RawFieldSet) {
        let text = normalize_ws(raw);
        fields.set_once(DetailField::Message, clean_text(&text));

        if let Some(cap) = self.config_re.captures(&text) {
            fields.set_once(CONFIG_MARKER.0, clean_text(&cap[1]));
        }
        for (field, re) in &self.marker_res {
            if let Some(cap) = re.captures(&text) {
                fields.set_once(*field, clean_text(&cap[1]));
            }
        }
    }
}
