// src/clean/coalesce.rs
//! Header-addressed access to raw rows, and the one merge rule used for
//! every canonical field that has more than one source column.

use std::collections::HashMap;

use crate::config::consts::UNKNOWN;
use crate::store::DataSet;

/// `价格(万)` ▸ `列表_价格(万)`
pub const PRICE: &[&str] = &["价格(万)", "列表_价格(万)"];
/// `表显里程` ▸ `列表_里程(万公里)` ▸ `档案_表显里程`
pub const MILEAGE: &[&str] = &["表显里程", "列表_里程(万公里)", "档案_表显里程"];
/// `上牌时间` ▸ `列表_上牌时间` ▸ `档案_上牌时间`
pub const REGISTRATION: &[&str] = &["上牌时间", "列表_上牌时间", "档案_上牌时间"];
/// `车辆名称` ▸ `列表_车名`
pub const NAME: &[&str] = &["车辆名称", "列表_车名"];
/// `挡位排量` ▸ `变速箱`
pub const TRANSMISSION: &[&str] = &["挡位排量", "变速箱"];

/// Blank after trimming, or the crawler's placeholder.
pub fn is_missing(cell: &str) -> bool {
    let t = cell.trim();
    t.is_empty() || t == UNKNOWN
}

/// Header name → column index for one table.
pub struct ColumnIndex {
    index: HashMap<String, usize>,
}

impl ColumnIndex {
    pub fn new(data: &DataSet) -> Self {
        let mut index = HashMap::new();
        for (i, h) in data.headers.iter().flatten().enumerate() {
            // first column wins on duplicate headers
            index.entry(h.clone()).or_insert(i);
        }
        Self { index }
    }

    pub fn has(&self, name: &str) -> bool { self.index.contains_key(name) }

    pub fn row<'a>(&'a self, cells: &'a [String]) -> RawRow<'a> {
        RawRow { cols: self, cells }
    }
}

/// One raw row, addressed by header name.
#[derive(Clone, Copy)]
pub struct RawRow<'a> {
    cols: &'a ColumnIndex,
    cells: &'a [String],
}

impl<'a> RawRow<'a> {
    /// The cell under `name`, or `None` when the column is absent or the cell is missing.
    pub fn get(&self, name: &str) -> Option<&'a str> {
        let i = *self.cols.index.get(name)?;
        self.cells.get(i).map(String::as_str).filter(|c| !is_missing(c))
    }
}

/// First non-missing value among `aliases`, in order.
pub fn coalesce<'a>(row: &RawRow<'a>, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|name| row.get(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> DataSet {
        DataSet::new(
            headers!["价格(万)", "列表_价格(万)", "表显里程"],
            vec![
                vec![s!(""), s!("10.5"), s!("未知")],
                vec![s!("11.0"), s!("10.5"), s!(" ")],
            ],
        )
    }

    #[test]
    fn first_present_alias_wins() {
        let ds = table();
        let cols = ColumnIndex::new(&ds);
        assert_eq!(coalesce(&cols.row(&ds.rows[0]), PRICE), Some("10.5"));
        assert_eq!(coalesce(&cols.row(&ds.rows[1]), PRICE), Some("11.0"));
    }

    #[test]
    fn placeholder_blank_and_absent_columns_are_missing() {
        let ds = table();
        let cols = ColumnIndex::new(&ds);
        // 表显里程 is 未知 / blank, the other two mileage columns don't exist
        assert_eq!(coalesce(&cols.row(&ds.rows[0]), MILEAGE), None);
        assert_eq!(coalesce(&cols.row(&ds.rows[1]), MILEAGE), None);
        assert!(!cols.has("档案_表显里程"));
    }

    #[test]
    fn short_row_reads_as_missing() {
        let ds = table();
        let cols = ColumnIndex::new(&ds);
        let short = vec![s!("9.9")];
        assert_eq!(cols.row(&short).get("表显里程"), None);
        assert_eq!(cols.row(&short).get("价格(万)"), Some("9.9"));
    }

    #[test]
    fn archive_gearbox_backs_up_transmission() {
        let ds = DataSet::new(
            headers!["挡位排量", "变速箱"],
            vec![vec![s!("未知"), s!("7挡双离合")], vec![s!("自动 / 2.0T"), s!("7挡双离合")]],
        );
        let cols = ColumnIndex::new(&ds);
        assert_eq!(coalesce(&cols.row(&ds.rows[0]), TRANSMISSION), Some("7挡双离合"));
        assert_eq!(coalesce(&cols.row(&ds.rows[1]), TRANSMISSION), Some("自动 / 2.0T"));
    }
}
