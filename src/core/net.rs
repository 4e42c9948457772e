// src/core/net.rs
// Blocking HTTP GET with the site's browser headers, cookie session and retries.

use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::config::consts::{ACCEPT, ACCEPT_LANGUAGE, COOKIE_COUNTERS, REFERER, USER_AGENT};
use crate::config::options::Delay;
use crate::error::{Error, Result};

/// Cookie state for one crawl run. Passed by reference into every request
/// and updated by the crawler between list pages.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
    cookies: Vec<(String, String)>,
}

impl Session {
    pub fn from_cookie_str(raw: &str) -> Self {
        Self { cookies: parse_cookies(raw) }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.cookies.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    pub fn set(&mut self, key: &str, value: String) {
        match self.cookies.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.cookies.push((s!(key), value)),
        }
    }

    /// Advance the visit counters the site tracks per page view.
    /// Absent or non-numeric counters restart from their defaults.
    pub fn bump_counters(&mut self) {
        for (key, default) in COOKIE_COUNTERS {
            let current = self.get(key).and_then(|v| v.parse::<u64>().ok()).unwrap_or(default);
            self.set(key, (current + 1).to_string());
        }
    }

    /// `Cookie:` header value, in the order the cookies were given.
    pub fn cookie_header(&self) -> String {
        self.cookies
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Split `k=v; k2=v2` into pairs. Values may contain `=`; entries without one are skipped.
pub fn parse_cookies(raw: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    for item in raw.split(';') {
        let item = item.trim();
        if item.is_empty() { continue; }
        match item.split_once('=') {
            Some((k, v)) => out.push((s!(k.trim()), s!(v.trim()))),
            None => logw!("Ignoring malformed cookie entry `{item}`"),
        }
    }
    out
}

/// Page source. `None` means the page could not be fetched and should be skipped.
pub trait Fetch {
    fn fetch(&mut self, url: &str, session: &Session) -> Option<String>;
}

pub struct HttpFetcher {
    client: Client,
    retries: u32,
    backoff: Delay,
}

impl HttpFetcher {
    pub fn new(timeout_secs: u64, retries: u32, backoff: Delay) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, HeaderValue::from_static(USER_AGENT));
        headers.insert(header::ACCEPT, HeaderValue::from_static(ACCEPT));
        headers.insert(header::ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE));
        headers.insert(header::REFERER, HeaderValue::from_static(REFERER));
        headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self { client, retries: retries.max(1), backoff })
    }

    fn try_get(&self, url: &str, session: &Session) -> Result<String> {
        let mut req = self.client.get(url);
        let cookie = session.cookie_header();
        if !cookie.is_empty() {
            req = req.header(header::COOKIE, cookie);
        }
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(Error::Status { status: status.as_u16(), url: s!(url) });
        }
        Ok(resp.text()?)
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&mut self, url: &str, session: &Session) -> Option<String> {
        let mut rng = rand::rng();
        for attempt in 1..=self.retries {
            match self.try_get(url, session) {
                Ok(body) => return Some(body),
                Err(e) => {
                    logw!("Attempt {attempt}/{} failed for {url}: {e}", self.retries);
                    if attempt < self.retries {
                        let wait = self.backoff.backoff(attempt, &mut rng);
                        logd!("Retrying {url} in {:.2}s", wait.as_secs_f64());
                        thread::sleep(wait);
                    }
                }
            }
        }
        loge!("Giving up on {url} after {} attempts", self.retries);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cookies_keeps_order_and_inner_equals() {
        let c = parse_cookies("a=1; b=x=y ;; junk; c=");
        assert_eq!(
            c,
            vec![(s!("a"), s!("1")), (s!("b"), s!("x=y")), (s!("c"), s!(""))]
        );
    }

    #[test]
    fn bump_counters_increments_both() {
        let mut s = Session::from_cookie_str("area=410702; ahpvno=8; v_no=7");
        s.bump_counters();
        assert_eq!(s.get("v_no"), Some("8"));
        assert_eq!(s.get("ahpvno"), Some("9"));
        s.bump_counters();
        assert_eq!(s.get("v_no"), Some("9"));
        assert_eq!(s.cookie_header(), "area=410702; ahpvno=10; v_no=9");
    }

    #[test]
    fn bump_counters_restarts_missing_or_garbage() {
        let mut s = Session::from_cookie_str("v_no=abc");
        s.bump_counters();
        assert_eq!(s.get("v_no"), Some("8"));
        assert_eq!(s.get("ahpvno"), Some("9"));
    }

    #[test]
    fn empty_cookie_string_gives_empty_header() {
        assert_eq!(Session::from_cookie_str("").cookie_header(), "");
    }
}
