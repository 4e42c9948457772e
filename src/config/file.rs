// src/config/file.rs
//! Optional TOML overrides. Every key is optional; anything left out keeps
//! the compiled-in default from `consts`.
//!
//! ```toml
//! [crawl]
//! pages = 3
//! policy = "until-empty"
//! cities = ["郑州", "luoyang"]          # filter the built-in list
//!
//! [[crawl.city]]                       # or replace it outright
//! name = "北京"
//! slug = "beijing"
//! scheme = "list"
//!
//! [delays]
//! detail = { base_ms = 500, jitter_ms = 500 }
//!
//! [paths]
//! raw = "out/raw.csv"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::options::{AppOptions, Delay, PagePolicy};
use crate::cities::{self, City};
use crate::error::{Error, Result};

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub crawl: CrawlSection,
    #[serde(default)]
    pub delays: DelaySection,
    #[serde(default)]
    pub paths: PathSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CrawlSection {
    pub pages: Option<u32>,
    pub policy: Option<PagePolicy>,
    pub cookie: Option<String>,
    pub retries: Option<u32>,
    pub timeout_secs: Option<u64>,
    /// Names or slugs picked from the current city list.
    #[serde(default)]
    pub cities: Vec<String>,
    /// Replaces the built-in city list.
    #[serde(default, rename = "city")]
    pub custom_cities: Vec<City>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DelaySection {
    pub detail: Option<Delay>,
    pub page: Option<Delay>,
    pub city: Option<Delay>,
    pub retry: Option<Delay>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathSection {
    pub raw: Option<PathBuf>,
    pub cleaned: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text, path)
    }

    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|source| Error::Config { path: origin.to_path_buf(), source })
    }

    /// Overlay onto `opts`. Raw/cleaned paths feed both the stage that writes
    /// them and the stage that reads them.
    pub fn apply(self, opts: &mut AppOptions) {
        let c = self.crawl;
        if let Some(v) = c.pages { opts.crawl.pages = v; }
        if let Some(v) = c.policy { opts.crawl.policy = v; }
        if let Some(v) = c.cookie { opts.crawl.cookie = v; }
        if let Some(v) = c.retries { opts.crawl.retries = v; }
        if let Some(v) = c.timeout_secs { opts.crawl.timeout_secs = v; }
        if !c.custom_cities.is_empty() {
            opts.crawl.cities = c.custom_cities;
        }
        if !c.cities.is_empty() {
            let all = std::mem::take(&mut opts.crawl.cities);
            opts.crawl.cities = cities::select(all, &c.cities);
        }

        let d = self.delays;
        if let Some(v) = d.detail { opts.crawl.delays.detail = v; }
        if let Some(v) = d.page { opts.crawl.delays.page = v; }
        if let Some(v) = d.city { opts.crawl.delays.city = v; }
        if let Some(v) = d.retry { opts.crawl.delays.retry = v; }

        let p = self.paths;
        if let Some(v) = p.raw {
            opts.crawl.output = v.clone();
            opts.clean.input = v;
        }
        if let Some(v) = p.cleaned {
            opts.clean.output = v.clone();
            opts.report.input = v;
        }
        if let Some(v) = p.report_dir { opts.report.out_dir = v; }
        if let Some(v) = p.log_file { opts.log_file = Some(v); }
    }
}
