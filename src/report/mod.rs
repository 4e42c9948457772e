// src/report/mod.rs
//! Reporting layer: cleaned table → chart-ready CSV tables and a price model.
//!
//! Output directory layout:
//! ```text
//! price_vs_mileage.csv          scatter points, one per vehicle
//! price_by_year.csv             price spread per registration year
//! brand_mean_price_top15.csv    brands by mean price (top N)
//! price_by_class.csv            price spread per vehicle class
//! feature_importance.csv        model feature weights, highest first
//! ```

pub mod encode;
pub mod forest;
pub mod stats;

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::clean::CanonicalRow;
use crate::config::options::ReportOptions;
use crate::error::{Error, Result};
use crate::file;
use crate::progress::Progress;
use crate::store;
use encode::FEATURE_NAMES;
use forest::{Forest, Regressor};
use smartcore::metrics::{mean_squared_error, r2};
use smartcore::model_selection::train_test_split;
use stats::SPREAD_HEADERS;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FeatureWeight {
    #[serde(rename = "特征")]
    pub feature: String,
    #[serde(rename = "重要性")]
    pub importance: f64,
}

/// Held-out evaluation of the price model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ModelScore {
    pub train_rows: usize,
    pub test_rows: usize,
    /// `None` when the test split is empty.
    pub rmse: Option<f64>,
    pub r2: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModelReport {
    pub importances: Vec<FeatureWeight>,
    pub score: ModelScore,
}

#[derive(Clone, Debug)]
pub struct ReportSummary {
    pub rows: usize,
    pub files: Vec<PathBuf>,
    pub model: ModelReport,
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Fit `model` on a seeded split of `rows`, score it on the held-out side and
/// rank the features. Too few rows to split: fit on everything, no score.
pub fn price_model(rows: &[CanonicalRow], model: &mut dyn Regressor, opts: &ReportOptions) -> Result<ModelReport> {
    let data = encode::encode(rows);
    if data.is_empty() {
        return Ok(ModelReport {
            importances: weights(vec![0.0; FEATURE_NAMES.len()]),
            score: ModelScore { train_rows: 0, test_rows: 0, rmse: None, r2: None },
        });
    }
    let x = forest::dense(&data.x);

    let score = match encode::test_rows(data.len(), opts.test_ratio) {
        Some(_) => {
            let (x_train, x_test, y_train, y_test) =
                train_test_split(&x, &data.y, opts.test_ratio as f32, true, Some(opts.seed));
            model.fit(&x_train, &y_train)?;
            let pred = model.predict(&x_test)?;
            ModelScore {
                train_rows: y_train.len(),
                test_rows: y_test.len(),
                rmse: finite(mean_squared_error(&y_test, &pred).sqrt()),
                r2: finite(r2(&y_test, &pred)),
            }
        }
        None => {
            logw!("{} rows are too few to hold out a test split; model score skipped", data.len());
            model.fit(&x, &data.y)?;
            ModelScore { train_rows: data.len(), test_rows: 0, rmse: None, r2: None }
        }
    };

    let importances = weights(forest::permutation_importance(model, &data.x, &data.y, opts.seed)?);
    Ok(ModelReport { importances, score })
}

fn weights(values: Vec<f64>) -> Vec<FeatureWeight> {
    let mut out: Vec<FeatureWeight> = FEATURE_NAMES
        .iter()
        .zip(values)
        .map(|(name, importance)| FeatureWeight { feature: s!(*name), importance })
        .collect();
    out.sort_by(|a, b| b.importance.total_cmp(&a.importance));
    out
}

fn spread_table<K: ToString>(path: &Path, key_header: &str, groups: impl Iterator<Item = (K, stats::Spread)>) -> Result<()> {
    let mut headers = vec![s!(key_header)];
    headers.extend(SPREAD_HEADERS.iter().map(|h| s!(*h)));
    let rows: Vec<Vec<String>> = groups
        .map(|(key, spread)| {
            let mut row = vec![key.to_string()];
            row.extend(spread.cells());
            row
        })
        .collect();
    file::write_table(path, &headers, &rows)
}

/// Write every report table for `rows` into `out_dir`.
pub fn write_report(rows: &[CanonicalRow], opts: &ReportOptions, model: &mut dyn Regressor) -> Result<(Vec<PathBuf>, ModelReport)> {
    file::ensure_directory(&opts.out_dir)?;
    let dir = &opts.out_dir;
    let mut files = Vec::new();

    let path = dir.join("price_vs_mileage.csv");
    file::write_records(&path, &stats::price_vs_mileage(rows))?;
    files.push(path);

    let path = dir.join("price_by_year.csv");
    spread_table(&path, "上牌年份", stats::price_by_year(rows).into_iter().map(|g| (g.year, g.spread)))?;
    files.push(path);

    let path = dir.join(format!("brand_mean_price_top{}.csv", opts.top_brands));
    file::write_records(&path, &stats::top_brands_by_mean(rows, opts.top_brands))?;
    files.push(path);

    let path = dir.join("price_by_class.csv");
    spread_table(&path, "车辆级别", stats::price_by_class(rows).into_iter().map(|g| (g.class, g.spread)))?;
    files.push(path);

    let report = price_model(rows, model, opts)?;
    let path = dir.join("feature_importance.csv");
    file::write_records(&path, &report.importances)?;
    files.push(path);

    Ok((files, report))
}

/// Read the cleaned file and produce the report with the default forest.
/// An empty cleaned table is an error.
pub fn report_file(opts: &ReportOptions, mut progress: Option<&mut dyn Progress>) -> Result<ReportSummary> {
    let rows: Vec<CanonicalRow> = store::load_records(&opts.input)?;
    if rows.is_empty() {
        return Err(Error::EmptyDataset(opts.input.display().to_string()));
    }
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Reporting on {} vehicles from {}", rows.len(), opts.input.display()));
    }

    let mut forest = Forest::new(opts.trees, opts.seed, FEATURE_NAMES.len());
    let (files, model) = write_report(&rows, opts, &mut forest)?;
    logf!("Report written to {} ({} files)", opts.out_dir.display(), files.len());

    if let Some(p) = progress.as_deref_mut() {
        let s = model.score;
        match (s.rmse, s.r2) {
            (Some(rmse), Some(r2)) => p.log(&format!(
                "Model ({} train / {} test): RMSE {rmse:.2} 万元, R² {r2:.2}",
                s.train_rows, s.test_rows
            )),
            _ => p.log(&format!("Model trained on {} rows; too few rows to score", s.train_rows)),
        }
        for w in &model.importances {
            p.log(&format!("  {:<8} {:.2}", w.feature, w.importance));
        }
        for f in &files {
            p.log(&format!("Saved {}", f.display()));
        }
        p.finish();
    }
    Ok(ReportSummary { rows: rows.len(), files, model })
}

#[cfg(test)]
mod tests {
    use super::*;
    use stats::tests::row;

    fn sample() -> Vec<CanonicalRow> {
        (0..40)
            .map(|i| {
                let brand = ["大众", "宝马", "丰田", "奥迪"][i % 4];
                let class = if i % 2 == 0 { "SUV" } else { "轿车" };
                let mileage = (i % 10) as f64;
                let price = 30.0 - 2.0 * mileage;
                row(&i.to_string(), brand, class, 2015 + (i % 6) as i32, mileage, price)
            })
            .collect()
    }

    #[test]
    fn model_ranks_mileage_first() {
        let mut forest = Forest::new(20, 42, FEATURE_NAMES.len());
        let report = price_model(&sample(), &mut forest, &ReportOptions::default()).unwrap();
        assert_eq!(report.importances[0].feature, "里程_万公里");
        assert_eq!(report.importances.len(), 4);
        assert_eq!((report.score.train_rows, report.score.test_rows), (32, 8));
        assert!(report.score.r2.unwrap() > 0.9);
    }

    #[test]
    fn too_few_rows_fit_without_a_score() {
        let all = sample();
        let rows = &all[..3];
        let mut forest = Forest::new(5, 42, FEATURE_NAMES.len());
        let report = price_model(rows, &mut forest, &ReportOptions::default()).unwrap();
        assert_eq!(report.score, ModelScore { train_rows: 3, test_rows: 0, rmse: None, r2: None });
        assert_eq!(report.importances.len(), 4);
    }

    #[test]
    fn writes_every_table() {
        let dir = std::env::temp_dir().join(format!("che_scrape_report_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let opts = ReportOptions { out_dir: dir.clone(), trees: 5, ..ReportOptions::default() };
        let mut forest = Forest::new(opts.trees, opts.seed, FEATURE_NAMES.len());

        let (files, _) = write_report(&sample(), &opts, &mut forest).unwrap();

        let names: Vec<_> = files.iter().filter_map(|p| p.file_name()?.to_str()).collect();
        assert_eq!(
            names,
            [
                "price_vs_mileage.csv",
                "price_by_year.csv",
                "brand_mean_price_top15.csv",
                "price_by_class.csv",
                "feature_importance.csv"
            ]
        );
        let years = std::fs::read_to_string(dir.join("price_by_year.csv")).unwrap();
        assert!(years.trim_start_matches('\u{feff}').starts_with("上牌年份,数量,最小值"));
        assert_eq!(years.lines().count(), 7);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn empty_cleaned_file_is_an_error() {
        let dir = std::env::temp_dir().join(format!("che_scrape_report_empty_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let input = dir.join("cleaned.csv");
        std::fs::write(&input, "\u{feff}车辆ID,车名\n").unwrap();
        let opts = ReportOptions { input, out_dir: dir.join("report"), ..ReportOptions::default() };
        assert!(matches!(report_file(&opts, None), Err(Error::EmptyDataset(_))));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
