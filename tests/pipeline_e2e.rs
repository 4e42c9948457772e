// tests/pipeline_e2e.rs
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use che_scrape::cities::{City, UrlScheme};
use che_scrape::clean::{self, CanonicalRow, CleanStats};
use che_scrape::config::options::{CleanOptions, CrawlOptions, Delays, PagePolicy, ReportOptions};
use che_scrape::core::net::{Fetch, Session};
use che_scrape::progress::NullProgress;
use che_scrape::record::detail_url;
use che_scrape::{report, scrape, store};

const DETAIL: &str = include_str!("fixtures/detail_page.html");
const LISTING: &str = include_str!("fixtures/listing_page.html");

fn tmp_dir(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("che_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    fs::create_dir_all(&p).unwrap();
    p
}

struct Canned(HashMap<String, String>);

impl Fetch for Canned {
    fn fetch(&mut self, url: &str, _session: &Session) -> Option<String> {
        self.0.get(url).cloned()
    }
}

fn zhengzhou() -> City {
    City::new("郑州", "zhengzhou", UrlScheme::Filtered)
}

#[test]
fn crawl_clean_report_offline() {
    let dir = tmp_dir("pipeline");
    let city = zhengzhou();
    let mut fetcher = Canned(HashMap::from([
        (city.page_url(1), LISTING.to_string()),
        (detail_url("301122", "48211001"), DETAIL.to_string()),
    ]));

    let crawl_opts = CrawlOptions {
        cities: vec![city],
        pages: 1,
        policy: PagePolicy::Fixed,
        delays: Delays::none(),
        output: dir.join("raw.csv"),
        ..CrawlOptions::default()
    };
    let mut session = Session::from_cookie_str("");
    let outcome = scrape::crawl(&crawl_opts, &mut fetcher, &mut session, None).unwrap();
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.skipped_pages, 0);
    store::save_raw(&crawl_opts.output, &outcome.records).unwrap();

    let raw = store::load_dataset(&crawl_opts.output).unwrap();
    assert_eq!(raw.len(), 3);
    assert!(raw.has_column("留言_车辆配置"));

    // only the vehicle whose detail page was served carries a fuel grade
    let clean_opts = CleanOptions { input: crawl_opts.output.clone(), output: dir.join("cleaned.csv") };
    let stats = clean::clean_file(&clean_opts, Some(&mut NullProgress)).unwrap();
    assert_eq!(stats, CleanStats { input: 3, after_fuel_filter: 1, after_dedup: 1, output: 1 });

    let rows: Vec<CanonicalRow> = store::load_records(&clean_opts.output).unwrap();
    let car = &rows[0];
    assert_eq!(car.id, "48211001");
    assert_eq!(car.name, "途观L 2019款 330TSI 自动两驱豪华版");
    assert_eq!(car.brand, "途观");
    assert_eq!(car.city, "郑州");
    assert_eq!(car.price, 16.8);
    assert_eq!(car.mileage, 4.5);
    assert_eq!((car.reg_year, car.reg_month), (2019, 6));
    assert_eq!(car.transmission, "自动");
    assert_eq!(car.displacement, 2.0);
    assert_eq!(car.horsepower, 186);
    assert_eq!(car.transfers, 1);
    assert_eq!(car.fuel, "95号");
    assert_eq!(car.dealer_id, "301122");

    let report_opts = ReportOptions {
        input: clean_opts.output.clone(),
        out_dir: dir.join("report"),
        trees: 3,
        ..ReportOptions::default()
    };
    let summary = report::report_file(&report_opts, None).unwrap();
    assert_eq!(summary.rows, 1);
    assert_eq!(summary.files.len(), 5);
    assert!(summary.files.iter().all(|f| f.exists()));
    // a single row cannot be split
    assert_eq!(summary.model.score.test_rows, 0);
    assert_eq!(summary.model.score.rmse, None);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn missing_raw_file_writes_nothing() {
    let dir = tmp_dir("missing");
    let opts = CleanOptions { input: dir.join("nope.csv"), output: dir.join("cleaned.csv") };
    assert!(clean::clean_file(&opts, None).is_err());
    assert!(!opts.output.exists());
    let _ = fs::remove_dir_all(&dir);
}
