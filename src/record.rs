// src/record.rs
//! One crawled vehicle: listing tile + detail fields + where it came from.
//!
//! Listing values keep their own `列表_…` columns so they survive next to the
//! detail page's values; the reconciler decides which one wins.

use crate::config::consts::HOST;
use crate::specs::fields::{DetailField, RawFieldSet};
use crate::specs::listing::ListingTile;

/// Columns before the detail fields in the raw file.
pub const LISTING_HEADERS: [&str; 9] = [
    "列表_车名",
    "列表_价格(万)",
    "列表_里程(万公里)",
    "列表_上牌时间",
    "车辆ID",
    "经销商ID",
    "城市",
    "页码",
    "详情URL",
];

/// Full raw-file header row.
pub fn raw_headers() -> Vec<String> {
    LISTING_HEADERS
        .iter()
        .copied()
        .chain(DetailField::ALL.iter().map(|f| f.header()))
        .map(str::to_string)
        .collect()
}

pub fn detail_url(dealer_id: &str, info_id: &str) -> String {
    format!("{HOST}/dealer/{dealer_id}/{info_id}.html")
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordMeta {
    pub city: String,
    pub page: u32,
    pub url: String,
    pub dealer_id: String,
    pub info_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VehicleRecord {
    pub tile: ListingTile,
    pub detail: RawFieldSet,
    pub meta: RecordMeta,
}

impl VehicleRecord {
    pub fn assemble(tile: ListingTile, detail: RawFieldSet, meta: RecordMeta) -> Self {
        Self { tile, detail, meta }
    }

    pub fn id(&self) -> &str { &self.meta.info_id }

    /// Cells in `raw_headers()` order.
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(LISTING_HEADERS.len() + DetailField::ALL.len());
        row.extend([
            self.tile.car_name.clone(),
            self.tile.price.clone(),
            self.tile.mileage.clone(),
            self.tile.reg_date.clone(),
            self.meta.info_id.clone(),
            self.meta.dealer_id.clone(),
            self.meta.city.clone(),
            self.meta.page.to_string(),
            self.meta.url.clone(),
        ]);
        row.extend(self.detail.to_cells());
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile() -> ListingTile {
        ListingTile {
            car_name: s!("比亚迪秦"),
            price: s!("10.50"),
            mileage: s!("3.2"),
            reg_date: s!("2019/6"),
            info_id: s!("4801"),
            dealer_id: s!("2001"),
        }
    }

    #[test]
    fn url_uses_dealer_then_listing() {
        assert_eq!(detail_url("2001", "4801"), "https://www.che168.com/dealer/2001/4801.html");
    }

    #[test]
    fn row_matches_header_shape() {
        let mut detail = RawFieldSet::new();
        detail.set_once(DetailField::Price, s!("10.80"));
        detail.set_once(DetailField::FuelGrade, s!("95号"));
        let meta = RecordMeta {
            city: s!("郑州"),
            page: 3,
            url: detail_url("2001", "4801"),
            dealer_id: s!("2001"),
            info_id: s!("4801"),
        };
        let rec = VehicleRecord::assemble(tile(), detail, meta);
        let headers = raw_headers();
        let row = rec.to_row();

        assert_eq!(headers.len(), 43);
        assert_eq!(row.len(), headers.len());
        let cell = |h: &str| &row[headers.iter().position(|x| x == h).unwrap()];
        assert_eq!(cell("列表_价格(万)"), "10.50");
        assert_eq!(cell("价格(万)"), "10.80");
        assert_eq!(cell("页码"), "3");
        assert_eq!(cell("燃油标号"), "95号");
        assert_eq!(cell("车辆名称"), "");
        assert_eq!(rec.id(), "4801");
    }
}
