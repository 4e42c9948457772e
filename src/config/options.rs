// src/config/options.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;
use rand::Rng;
use serde::Deserialize;

use super::consts::*;
use crate::cities::{self, City};

#[derive(Clone, Debug, PartialEq, Default)]
pub struct AppOptions {
    pub crawl: CrawlOptions,
    pub clean: CleanOptions,
    pub report: ReportOptions,
    /// Debug log destination; `None` logs to stderr.
    pub log_file: Option<PathBuf>,
}

/// When to stop paging through a city.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PagePolicy {
    /// Always request `pages` pages, even if some come back empty.
    #[default]
    Fixed,
    /// Stop at the first page without listing tiles (or `pages`, whichever first).
    UntilEmpty,
}

/// A pause of `base_ms` plus a uniform `0..jitter_ms` extra.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Deserialize)]
pub struct Delay {
    pub base_ms: u64,
    #[serde(default)]
    pub jitter_ms: u64,
}

impl Delay {
    pub const fn new((base_ms, jitter_ms): (u64, u64)) -> Self {
        Self { base_ms, jitter_ms }
    }

    pub fn is_zero(&self) -> bool {
        self.base_ms == 0 && self.jitter_ms == 0
    }

    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let extra = if self.jitter_ms > 0 { rng.random_range(0..self.jitter_ms) } else { 0 };
        Duration::from_millis(self.base_ms + extra)
    }

    /// Backoff before retry `attempt` (1-based): base grows linearly, jitter stays.
    pub fn backoff<R: Rng + ?Sized>(&self, attempt: u32, rng: &mut R) -> Duration {
        let scaled = Delay { base_ms: self.base_ms * attempt as u64, jitter_ms: self.jitter_ms };
        scaled.pick(rng)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Delays {
    pub detail: Delay,
    pub page: Delay,
    pub city: Delay,
    pub retry: Delay,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            detail: Delay::new(DETAIL_PAUSE_MS),
            page: Delay::new(PAGE_PAUSE_MS),
            city: Delay::new(CITY_PAUSE_MS),
            retry: Delay::new((RETRY_BASE_MS, RETRY_JITTER_MS)),
        }
    }
}

impl Delays {
    /// No sleeping at all (tests, offline replays).
    pub fn none() -> Self {
        Self { detail: Delay::default(), page: Delay::default(), city: Delay::default(), retry: Delay::default() }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct CrawlOptions {
    pub cities: Vec<City>,
    pub pages: u32,
    pub policy: PagePolicy,
    pub cookie: String,
    pub retries: u32,
    pub timeout_secs: u64,
    pub delays: Delays,
    pub output: PathBuf,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            cities: cities::henan(),
            pages: DEFAULT_PAGES,
            policy: PagePolicy::Fixed,
            cookie: s!(DEFAULT_COOKIE),
            retries: RETRIES,
            timeout_secs: REQUEST_TIMEOUT_SECS,
            delays: Delays::default(),
            output: PathBuf::from(DEFAULT_OUT_DIR).join(RAW_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanOptions {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_OUT_DIR).join(RAW_FILE),
            output: PathBuf::from(DEFAULT_OUT_DIR).join(CLEANED_FILE),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ReportOptions {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub top_brands: usize,
    pub trees: usize,
    pub seed: u64,
    pub test_ratio: f64,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_OUT_DIR).join(CLEANED_FILE),
            out_dir: PathBuf::from(DEFAULT_OUT_DIR).join(REPORT_SUBDIR),
            top_brands: TOP_BRANDS,
            trees: FOREST_TREES,
            seed: FOREST_SEED,
            test_ratio: TEST_RATIO,
        }
    }
}
