// src/scrape/mod.rs
mod crawl;

pub use crawl::{crawl, CrawlOutcome};
