// src/clean/mod.rs
//! Column reconciler: wide raw crawl table → one typed, complete row per vehicle.
//!
//! Steps, in order:
//! 1. merge alias columns (`coalesce`) and derive brand from name;
//! 2. coerce each field on its own (a failure only blanks that field);
//! 3. keep rows whose fuel grade mentions 92 or 95, when the column exists;
//! 4. clean text fields;
//! 5. drop rows without id, sort by id, keep the first row per id;
//! 6. drop rows that still miss any field.

pub mod coalesce;
pub mod coerce;

use serde::{Deserialize, Serialize};

use crate::config::options::CleanOptions;
use crate::core::sanitize::clean_non_empty;
use crate::error::Result;
use crate::progress::Progress;
use crate::store::{self, DataSet};
use coalesce::{coalesce, ColumnIndex, RawRow};

pub const FUEL_COLUMN: &str = "燃油标号";

/// Cleaned-file header row, in column order.
pub const CANONICAL_HEADERS: [&str; 18] = [
    "车辆ID", "车名", "品牌", "城市", "价格_万", "里程_万公里", "上牌年份", "上牌月份",
    "变速箱类型", "排量_L", "发动机马力_PS", "排放标准", "过户次数", "车辆级别",
    "车身颜色", "燃油标号", "驱动方式", "经销商ID",
];

/// One row of the cleaned table. Every field is present and parsed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CanonicalRow {
    #[serde(rename = "车辆ID")]
    pub id: String,
    #[serde(rename = "车名")]
    pub name: String,
    #[serde(rename = "品牌")]
    pub brand: String,
    #[serde(rename = "城市")]
    pub city: String,
    #[serde(rename = "价格_万")]
    pub price: f64,
    #[serde(rename = "里程_万公里")]
    pub mileage: f64,
    #[serde(rename = "上牌年份")]
    pub reg_year: i32,
    #[serde(rename = "上牌月份")]
    pub reg_month: u32,
    #[serde(rename = "变速箱类型")]
    pub transmission: String,
    #[serde(rename = "排量_L")]
    pub displacement: f64,
    #[serde(rename = "发动机马力_PS")]
    pub horsepower: u32,
    #[serde(rename = "排放标准")]
    pub emission: String,
    #[serde(rename = "过户次数")]
    pub transfers: u32,
    #[serde(rename = "车辆级别")]
    pub class: String,
    #[serde(rename = "车身颜色")]
    pub color: String,
    #[serde(rename = "燃油标号")]
    pub fuel: String,
    #[serde(rename = "驱动方式")]
    pub drive: String,
    #[serde(rename = "经销商ID")]
    pub dealer_id: String,
}

impl CanonicalRow {
    pub fn to_cells(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.brand.clone(),
            self.city.clone(),
            self.price.to_string(),
            self.mileage.to_string(),
            self.reg_year.to_string(),
            self.reg_month.to_string(),
            self.transmission.clone(),
            self.displacement.to_string(),
            self.horsepower.to_string(),
            self.emission.clone(),
            self.transfers.to_string(),
            self.class.clone(),
            self.color.clone(),
            self.fuel.clone(),
            self.drive.clone(),
            self.dealer_id.clone(),
        ]
    }
}

/// A row mid-reconciliation; `None` = missing.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PartialRow {
    pub id: Option<String>,
    pub name: Option<String>,
    pub brand: Option<String>,
    pub city: Option<String>,
    pub price: Option<f64>,
    pub mileage: Option<f64>,
    pub reg: Option<(i32, u32)>,
    pub transmission: Option<String>,
    pub displacement: Option<f64>,
    pub horsepower: Option<u32>,
    pub emission: Option<String>,
    pub transfers: Option<u32>,
    pub class: Option<String>,
    pub color: Option<String>,
    pub fuel: Option<String>,
    pub drive: Option<String>,
    pub dealer_id: Option<String>,
}

fn owned(v: Option<&str>) -> Option<String> {
    v.map(str::to_string)
}

impl PartialRow {
    /// Merge and coerce one raw row. Text fields are left as scraped.
    pub fn from_raw(row: &RawRow<'_>) -> Self {
        let name = owned(coalesce(row, coalesce::NAME));
        let engine = row.get("发动机");
        Self {
            id: owned(row.get("车辆ID")),
            brand: coerce::extract_brand(name.as_deref()),
            name,
            city: owned(row.get("城市")),
            price: coalesce(row, coalesce::PRICE).and_then(coerce::clean_price),
            mileage: coalesce(row, coalesce::MILEAGE).and_then(coerce::clean_mileage),
            reg: coalesce(row, coalesce::REGISTRATION).and_then(coerce::parse_date),
            transmission: coalesce(row, coalesce::TRANSMISSION).and_then(coerce::transmission),
            displacement: engine.and_then(coerce::displacement),
            horsepower: engine.and_then(coerce::horsepower),
            emission: owned(row.get("排放标准")),
            transfers: row.get("过户次数").and_then(coerce::transfer_count),
            class: owned(row.get("车辆级别")),
            color: owned(row.get("车身颜色")),
            fuel: owned(row.get(FUEL_COLUMN)),
            drive: owned(row.get("驱动方式")),
            dealer_id: owned(row.get("经销商ID")),
        }
    }

    /// `clean_text` over every text field; a value that cleans to nothing becomes missing.
    pub fn clean_text_fields(&mut self) {
        for field in [
            &mut self.name,
            &mut self.brand,
            &mut self.city,
            &mut self.dealer_id,
            &mut self.emission,
            &mut self.class,
            &mut self.color,
            &mut self.fuel,
            &mut self.drive,
            &mut self.transmission,
        ] {
            *field = clean_non_empty(field.take());
        }
    }

    /// Promote to a `CanonicalRow` when nothing is missing.
    pub fn complete(self) -> Option<CanonicalRow> {
        let (reg_year, reg_month) = self.reg?;
        Some(CanonicalRow {
            id: self.id?,
            name: self.name?,
            brand: self.brand?,
            city: self.city?,
            price: self.price?,
            mileage: self.mileage?,
            reg_year,
            reg_month,
            transmission: self.transmission?,
            displacement: self.displacement?,
            horsepower: self.horsepower?,
            emission: self.emission?,
            transfers: self.transfers?,
            class: self.class?,
            color: self.color?,
            fuel: self.fuel?,
            drive: self.drive?,
            dealer_id: self.dealer_id?,
        })
    }
}

/// Row counts after each step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CleanStats {
    pub input: usize,
    pub after_fuel_filter: usize,
    pub after_dedup: usize,
    pub output: usize,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Reconciled {
    pub rows: Vec<CanonicalRow>,
    pub stats: CleanStats,
}

fn fuel_ok(raw: Option<&str>) -> bool {
    raw.is_some_and(|f| f.contains("92") || f.contains("95"))
}

/// Pure transformation of a raw table into cleaned rows.
pub fn reconcile(data: &DataSet) -> Reconciled {
    let cols = ColumnIndex::new(data);
    let mut stats = CleanStats { input: data.len(), ..CleanStats::default() };
    let filter_fuel = cols.has(FUEL_COLUMN);
    if !filter_fuel {
        logw!("No {FUEL_COLUMN} column; fuel filter skipped");
    }

    let mut rows: Vec<PartialRow> = data
        .rows
        .iter()
        .map(|cells| cols.row(cells))
        .filter(|row| !filter_fuel || fuel_ok(row.get(FUEL_COLUMN)))
        .map(|row| PartialRow::from_raw(&row))
        .collect();
    stats.after_fuel_filter = rows.len();

    for row in &mut rows {
        row.clean_text_fields();
    }

    rows.retain(|r| r.id.is_some());
    rows.sort_by(|a, b| a.id.cmp(&b.id));
    rows.dedup_by(|later, first| later.id == first.id);
    // full duplicates would be adjacent after the sort
    rows.dedup();
    stats.after_dedup = rows.len();

    let rows: Vec<CanonicalRow> = rows.into_iter().filter_map(PartialRow::complete).collect();
    stats.output = rows.len();

    logf!(
        "Reconciled {} → {} rows (fuel filter {}, dedup {})",
        stats.input, stats.output, stats.after_fuel_filter, stats.after_dedup
    );
    Reconciled { rows, stats }
}

pub fn canonical_headers() -> Vec<String> {
    CANONICAL_HEADERS.iter().map(|h| s!(*h)).collect()
}

/// Load the raw file, reconcile, write the cleaned file.
/// A missing or unreadable input is an error and nothing is written.
pub fn clean_file(opts: &CleanOptions, mut progress: Option<&mut dyn Progress>) -> Result<CleanStats> {
    if let Some(p) = progress.as_deref_mut() {
        p.log(&format!("Cleaning {}", opts.input.display()));
    }
    let raw = store::load_dataset(&opts.input)?;
    let out = reconcile(&raw);
    if out.rows.is_empty() {
        logw!("No complete rows left after cleaning");
    }
    let rows: Vec<Vec<String>> = out.rows.iter().map(CanonicalRow::to_cells).collect();
    store::save_dataset(&opts.output, &DataSet::new(canonical_headers(), rows))?;

    if let Some(p) = progress.as_deref_mut() {
        let s = out.stats;
        p.log(&format!("  input rows:          {}", s.input));
        p.log(&format!("  after fuel filter:   {}", s.after_fuel_filter));
        p.log(&format!("  after dedup:         {}", s.after_dedup));
        p.log(&format!("  complete rows saved: {}", s.output));
        p.log(&format!("Saved {}", opts.output.display()));
        p.finish();
    }
    Ok(out.stats)
}
