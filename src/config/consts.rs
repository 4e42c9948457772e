// src/config/consts.rs

// Net config
pub const HOST: &str = "https://www.che168.com";
pub const REFERER: &str = "https://www.che168.com/";
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
    (KHTML, like Gecko) Chrome/96.0.4664.110 Safari/537.36";
pub const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8";
pub const ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,en;q=0.8";
pub const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Site cookies captured from a browser session. Only the area and visit
/// counters matter to the listing pages; override via config for a fresh session.
pub const DEFAULT_COOKIE: &str = "userarea=410700; listuserarea=410700; area=410702; \
    carDownPrice=1; ahpvno=8; showNum=8; v_no=7";

/// Visit counters the site expects to grow between page views: (key, default).
pub const COOKIE_COUNTERS: [(&str, u64); 2] = [("v_no", 7), ("ahpvno", 8)];

// Retry
pub const RETRIES: u32 = 3;
pub const RETRY_BASE_MS: u64 = 2_000;   // multiplied by attempt number
pub const RETRY_JITTER_MS: u64 = 2_000; // extra 0..2000 ms

// Courtesy pauses: (base, jitter) in ms
pub const DETAIL_PAUSE_MS: (u64, u64) = (1_000, 1_000);
pub const PAGE_PAUSE_MS: (u64, u64) = (2_000, 3_000);
pub const CITY_PAUSE_MS: (u64, u64) = (5_000, 5_000);

// Crawl
pub const DEFAULT_PAGES: u32 = 8;
/// Written by the crawler for tile attributes the page didn't carry.
pub const UNKNOWN: &str = "未知";

// Files
pub const DEFAULT_OUT_DIR: &str = "out";
pub const RAW_FILE: &str = "raw_listings.csv";
pub const CLEANED_FILE: &str = "cleaned.csv";
pub const REPORT_SUBDIR: &str = "report";

// Report
pub const TOP_BRANDS: usize = 15;
pub const FOREST_TREES: usize = 100;
pub const FOREST_SEED: u64 = 42;
pub const TEST_RATIO: f64 = 0.2;
