// src/report/encode.rs
//! Turning cleaned rows into a numeric feature matrix for the price model.

use std::collections::BTreeSet;

use crate::clean::CanonicalRow;

pub const FEATURE_NAMES: [&str; 4] = ["里程_万公里", "上牌年份", "品牌", "车辆级别"];

/// Maps each distinct label to its rank in sorted order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn fit<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let set: BTreeSet<&str> = labels.into_iter().collect();
        Self { classes: set.into_iter().map(str::to_string).collect() }
    }

    pub fn transform(&self, label: &str) -> Option<usize> {
        self.classes.binary_search_by(|c| c.as_str().cmp(label)).ok()
    }

    pub fn classes(&self) -> &[String] { &self.classes }
}

/// Feature rows (`FEATURE_NAMES` order) and price targets.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Matrix {
    pub x: Vec<Vec<f64>>,
    pub y: Vec<f64>,
}

impl Matrix {
    pub fn len(&self) -> usize { self.y.len() }
    pub fn is_empty(&self) -> bool { self.y.is_empty() }
}

pub fn encode(rows: &[CanonicalRow]) -> Matrix {
    let brands = LabelEncoder::fit(rows.iter().map(|r| r.brand.as_str()));
    let classes = LabelEncoder::fit(rows.iter().map(|r| r.class.as_str()));
    let mut m = Matrix::default();
    for r in rows {
        // both encoders were fitted on these very rows
        let (Some(b), Some(c)) = (brands.transform(&r.brand), classes.transform(&r.class)) else { continue };
        m.x.push(vec![r.mileage, f64::from(r.reg_year), b as f64, c as f64]);
        m.y.push(r.price);
    }
    m
}

/// Rows the held-out side of a split gets: `floor(n * ratio)`.
/// `None` when that leaves either side empty.
pub fn test_rows(n: usize, ratio: f64) -> Option<usize> {
    if ratio.is_nan() || ratio <= 0.0 || ratio >= 1.0 { return None; }
    let n_test = (n as f32 * ratio as f32) as usize;
    (n_test >= 1 && n_test < n).then_some(n_test)
}
