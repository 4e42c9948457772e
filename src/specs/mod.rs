// src/specs/mod.rs
//! # Scraping “specs” module
//!
//! Page-specific scraping specifications for che168. Each spec focuses on a
//! single page shape and encodes *where the ground truth lives in the HTML*
//! and *how to extract it without failing*.
//!
//! ## What lives here
//! - **Pure HTML parsing** of fetched pages (city listing pages, vehicle detail pages).
//! - **Label precedence** as ordered rule tables (`rules`): first match wins.
//! - **Field naming**: `fields::DetailField` is the closed set of raw columns.
//!
//! ## What does **not** live here
//! - **Fetching, delays, cookies**: `scrape` and `core::net`.
//! - **Merging listing + detail data**: `record`.
//! - **Type coercion and column reconciliation**: `clean`.
//!
//! ## Typical call chain
//! ```text
//! scrape::crawl → specs::listing::parse_tiles   (one list page)
//!               → specs::detail::DetailExtractor (one detail page per tile)
//!               → record::VehicleRecord::assemble
//! ```
//!
//! ## Testing notes
//! Specs are tested offline against small captured-shape fixtures.
pub mod detail;
pub mod fields;
pub mod listing;
pub mod rules;
