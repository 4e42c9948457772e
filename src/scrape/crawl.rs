// src/scrape/crawl.rs
use std::thread;

use rand::Rng;

use crate::{
    cities::City,
    config::options::{CrawlOptions, Delay, PagePolicy},
    core::net::{Fetch, Session},
    error::Result,
    progress::Progress,
    record::{detail_url, RecordMeta, VehicleRecord},
    specs::{detail::DetailExtractor, listing},
};

/// Everything one crawl run produced, held in memory until the caller saves it.
#[derive(Debug, Default)]
pub struct CrawlOutcome {
    pub records: Vec<VehicleRecord>,
    /// Records per city, in crawl order.
    pub per_city: Vec<(String, usize)>,
    pub skipped_pages: usize,
}

fn pause<R: Rng + ?Sized>(delay: &Delay, rng: &mut R) {
    if delay.is_zero() { return; }
    let wait = delay.pick(rng);
    logd!("Sleeping {:.2}s", wait.as_secs_f64());
    thread::sleep(wait);
}

/// Crawl every configured city, page by page, fetching each listing's detail page.
///
/// A page that cannot be fetched is skipped without touching the session or
/// sleeping; every fetched list page bumps the session counters afterwards.
pub fn crawl(
    opts: &CrawlOptions,
    fetcher: &mut dyn Fetch,
    session: &mut Session,
    mut progress: Option<&mut dyn Progress>,
) -> Result<CrawlOutcome> {
    let extractor = DetailExtractor::new()?;
    let mut rng = rand::rng();
    let mut out = CrawlOutcome::default();

    if let Some(p) = progress.as_deref_mut() {
        p.begin(opts.cities.len());
    }

    for (i, city) in opts.cities.iter().enumerate() {
        let before = out.records.len();
        logf!("Crawling {} ({}), up to {} pages", city.name, city.slug, opts.pages);

        for page in 1..=opts.pages {
            match crawl_page(opts, city, page, &extractor, fetcher, session, &mut rng, &mut out)? {
                PageResult::Skipped => {
                    out.skipped_pages += 1;
                    if let Some(p) = progress.as_deref_mut() {
                        p.item_failed(&format!("{} page {page}", city.name));
                    }
                    continue;
                }
                PageResult::Empty => {
                    session.bump_counters();
                    if opts.policy == PagePolicy::UntilEmpty {
                        logf!("{}: no listings on page {page}, moving on", city.name);
                        break;
                    }
                }
                PageResult::Records(n) => {
                    session.bump_counters();
                    logf!("{} page {page}: {n} records", city.name);
                }
            }
            pause(&opts.delays.page, &mut rng);
        }

        let count = out.records.len() - before;
        out.per_city.push((city.name.clone(), count));
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(&city.name, count);
        }
        if i + 1 < opts.cities.len() {
            pause(&opts.delays.city, &mut rng);
        }
    }

    logf!("Crawl finished: {} records from {} cities", out.records.len(), out.per_city.len());
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Total: {} vehicles", out.records.len()));
        for (city, n) in &out.per_city {
            p.log(&format!("  {city}: {n}"));
        }
        p.finish();
    }
    Ok(out)
}

enum PageResult {
    Skipped,
    Empty,
    Records(usize),
}

#[allow(clippy::too_many_arguments)]
fn crawl_page<R: Rng + ?Sized>(
    opts: &CrawlOptions,
    city: &City,
    page: u32,
    extractor: &DetailExtractor,
    fetcher: &mut dyn Fetch,
    session: &Session,
    rng: &mut R,
    out: &mut CrawlOutcome,
) -> Result<PageResult> {
    let url = city.page_url(page);
    logd!("GET {url}");
    let Some(html) = fetcher.fetch(&url, session) else {
        logw!("{} page {page}: fetch failed, skipping", city.name);
        return Ok(PageResult::Skipped);
    };

    let tiles = listing::parse_tiles(&html)?;
    if tiles.is_empty() {
        logw!("{} page {page}: no listing tiles found", city.name);
        return Ok(PageResult::Empty);
    }

    let n = tiles.len();
    for tile in tiles {
        let url = detail_url(&tile.dealer_id, &tile.info_id);
        logd!("Detail {} ({})", tile.car_name, url);
        let html = fetcher.fetch(&url, session);
        let detail = extractor.extract(html.as_deref());
        let meta = RecordMeta {
            city: city.name.clone(),
            page,
            url,
            dealer_id: tile.dealer_id.clone(),
            info_id: tile.info_id.clone(),
        };
        let record = VehicleRecord::assemble(tile, detail, meta);
        logd!("Record {}: {} detail fields", record.id(), record.detail.len());
        out.records.push(record);
        pause(&opts.delays.detail, rng);
    }
    Ok(PageResult::Records(n))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::cities::UrlScheme;
    use crate::config::options::Delays;
    use crate::progress::testing::RecordingProgress;
    use crate::specs::fields::DetailField;

    /// Serves canned pages by URL and remembers what it was asked, with which cookies.
    #[derive(Default)]
    struct MockFetch {
        pages: HashMap<String, String>,
        calls: Vec<(String, String)>,
    }

    impl MockFetch {
        fn with(mut self, url: &str, body: &str) -> Self {
            self.pages.insert(s!(url), s!(body));
            self
        }
    }

    impl Fetch for MockFetch {
        fn fetch(&mut self, url: &str, session: &Session) -> Option<String> {
            self.calls.push((s!(url), session.cookie_header()));
            self.pages.get(url).cloned()
        }
    }

    fn tiles(ids: &[&str]) -> String {
        let lis: String = ids
            .iter()
            .map(|id| format!(r#"<li class="cards-li" carname="车{id}" price="9.9" infoid="{id}" dealerid="77"></li>"#))
            .collect();
        format!("<ul>{lis}</ul>")
    }

    const DETAIL: &str = r#"<h3 class="car-brand-name">比亚迪秦</h3><span class="price">10.50</span>
        <ul class="basic-item-ul"><li>燃油标号95号</li></ul>"#;

    fn opts(pages: u32, policy: PagePolicy) -> CrawlOptions {
        CrawlOptions {
            cities: vec![City::new("安阳", "anyang", UrlScheme::List)],
            pages,
            policy,
            delays: Delays::none(),
            ..CrawlOptions::default()
        }
    }

    fn page(n: u32) -> String {
        City::new("安阳", "anyang", UrlScheme::List).page_url(n)
    }

    #[test]
    fn assembles_records_with_detail_data() {
        let mut f = MockFetch::default()
            .with(&page(1), &tiles(&["1", "2"]))
            .with(&detail_url("77", "1"), DETAIL);
        let mut session = Session::from_cookie_str("v_no=7; ahpvno=8");
        let mut rec = RecordingProgress::default();

        let out = crawl(&opts(1, PagePolicy::Fixed), &mut f, &mut session, Some(&mut rec)).unwrap();

        assert_eq!(out.records.len(), 2);
        let first = &out.records[0];
        assert_eq!(first.meta.city, "安阳");
        assert_eq!(first.meta.page, 1);
        assert_eq!(first.meta.url, "https://www.che168.com/dealer/77/1.html");
        assert_eq!(first.detail.get(DetailField::FuelGrade), Some("95号"));
        // detail page for "2" wasn't served: record kept, detail empty
        assert!(out.records[1].detail.is_empty());
        assert_eq!(out.per_city, vec![(s!("安阳"), 2)]);
        assert_eq!(rec.done, vec![(s!("安阳"), 2)]);
        assert!(rec.finished);
    }

    #[test]
    fn fixed_policy_requests_every_page_and_bumps_counters() {
        let mut f = MockFetch::default()
            .with(&page(1), &tiles(&["1"]))
            .with(&page(2), "<html></html>")
            .with(&page(3), &tiles(&["3"]));
        let mut session = Session::from_cookie_str("v_no=7; ahpvno=8");

        let out = crawl(&opts(3, PagePolicy::Fixed), &mut f, &mut session, None).unwrap();

        assert_eq!(out.records.len(), 2);
        assert_eq!(session.get("v_no"), Some("10"));
        assert_eq!(session.get("ahpvno"), Some("11"));
        // second list request already carries the bumped counter
        let list_calls: Vec<_> = f.calls.iter().filter(|(u, _)| u.contains("/list/")).collect();
        assert_eq!(list_calls.len(), 3);
        assert_eq!(list_calls[1].1, "v_no=8; ahpvno=9");
    }

    #[test]
    fn until_empty_stops_at_first_empty_page() {
        let mut f = MockFetch::default()
            .with(&page(1), &tiles(&["1"]))
            .with(&page(2), "<html></html>")
            .with(&page(3), &tiles(&["3"]));
        let mut session = Session::default();

        let out = crawl(&opts(3, PagePolicy::UntilEmpty), &mut f, &mut session, None).unwrap();

        assert_eq!(out.records.len(), 1);
        assert!(!f.calls.iter().any(|(u, _)| *u == page(3)));
    }

    #[test]
    fn unfetchable_page_is_skipped_without_bump() {
        let mut f = MockFetch::default().with(&page(2), &tiles(&["5"]));
        let mut session = Session::from_cookie_str("v_no=7; ahpvno=8");
        let mut rec = RecordingProgress::default();

        let out = crawl(&opts(2, PagePolicy::UntilEmpty), &mut f, &mut session, Some(&mut rec)).unwrap();

        assert_eq!(out.skipped_pages, 1);
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].meta.page, 2);
        assert_eq!(session.get("v_no"), Some("8"));
        assert_eq!(rec.failed, vec![s!("安阳 page 1")]);
    }
}
