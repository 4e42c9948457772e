// src/report/stats.rs
//! Grouped price summaries behind the report tables.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::clean::CanonicalRow;

/// Five-number summary plus count, for one group.
#[derive(Clone, Debug, PartialEq)]
pub struct Spread {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Column names after the group key in the spread tables.
pub const SPREAD_HEADERS: [&str; 6] = ["数量", "最小值", "下四分位", "中位数", "上四分位", "最大值"];

/// Quantile of sorted data with linear interpolation between closest ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

impl Spread {
    /// `None` for an empty group.
    pub fn of(mut values: Vec<f64>) -> Option<Self> {
        if values.is_empty() { return None; }
        values.sort_by(f64::total_cmp);
        Some(Self {
            count: values.len(),
            min: values[0],
            q1: quantile(&values, 0.25),
            median: quantile(&values, 0.5),
            q3: quantile(&values, 0.75),
            max: values[values.len() - 1],
        })
    }

    pub fn cells(&self) -> Vec<String> {
        let mut out = vec![self.count.to_string()];
        out.extend([self.min, self.q1, self.median, self.q3, self.max].map(|v| format!("{v:.2}")));
        out
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct YearSpread {
    pub year: i32,
    pub spread: Spread,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ClassSpread {
    pub class: String,
    pub spread: Spread,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BrandMean {
    #[serde(rename = "品牌")]
    pub brand: String,
    #[serde(rename = "平均价格_万")]
    pub mean_price: f64,
    #[serde(rename = "数量")]
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ScatterPoint {
    #[serde(rename = "里程_万公里")]
    pub mileage: f64,
    #[serde(rename = "价格_万")]
    pub price: f64,
    #[serde(rename = "车辆级别")]
    pub class: String,
}

fn group_prices<K: Ord>(rows: &[CanonicalRow], key: impl Fn(&CanonicalRow) -> K) -> BTreeMap<K, Vec<f64>> {
    let mut groups: BTreeMap<K, Vec<f64>> = BTreeMap::new();
    for r in rows {
        groups.entry(key(r)).or_default().push(r.price);
    }
    groups
}

pub fn price_vs_mileage(rows: &[CanonicalRow]) -> Vec<ScatterPoint> {
    rows.iter()
        .map(|r| ScatterPoint { mileage: r.mileage, price: r.price, class: r.class.clone() })
        .collect()
}

/// Ascending by year.
pub fn price_by_year(rows: &[CanonicalRow]) -> Vec<YearSpread> {
    group_prices(rows, |r| r.reg_year)
        .into_iter()
        .filter_map(|(year, prices)| Spread::of(prices).map(|spread| YearSpread { year, spread }))
        .collect()
}

/// Ordered by class name.
pub fn price_by_class(rows: &[CanonicalRow]) -> Vec<ClassSpread> {
    group_prices(rows, |r| r.class.clone())
        .into_iter()
        .filter_map(|(class, prices)| Spread::of(prices).map(|spread| ClassSpread { class, spread }))
        .collect()
}

/// The `top` brands by mean price, highest first; ties go by brand name.
pub fn top_brands_by_mean(rows: &[CanonicalRow], top: usize) -> Vec<BrandMean> {
    let mut means: Vec<BrandMean> = group_prices(rows, |r| r.brand.clone())
        .into_iter()
        .map(|(brand, prices)| BrandMean {
            brand,
            mean_price: prices.iter().sum::<f64>() / prices.len() as f64,
            count: prices.len(),
        })
        .collect();
    means.sort_by(|a, b| b.mean_price.total_cmp(&a.mean_price).then_with(|| a.brand.cmp(&b.brand)));
    means.truncate(top);
    means
}
