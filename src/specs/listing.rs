// src/specs/listing.rs
//! Scraping *spec* for a city search-results page.
//!
//! Every vehicle is an `li.cards-li` tile whose summary lives entirely in
//! attributes (`carname`, `price`, `milage`, `regdate`, `infoid`, `dealerid`).
//! The site spells mileage `milage`; we read it as-is.

use scraper::{ElementRef, Html};

use crate::config::consts::UNKNOWN;
use crate::core::html::selector;
use crate::core::sanitize::clean_text;
use crate::error::Result;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListingTile {
    pub car_name: String,
    pub price: String,
    pub mileage: String,
    pub reg_date: String,
    pub info_id: String,
    pub dealer_id: String,
}

impl ListingTile {
    fn from_element(el: ElementRef<'_>) -> Self {
        let attr = |name: &str| {
            el.value()
                .attr(name)
                .map(clean_text)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| s!(UNKNOWN))
        };
        Self {
            car_name: attr("carname"),
            price: attr("price"),
            mileage: attr("milage"),
            reg_date: attr("regdate"),
            info_id: attr("infoid"),
            dealer_id: attr("dealerid"),
        }
    }
}

/// All tiles on the page, in document order. An empty vec means no listings.
pub fn parse_tiles(html: &str) -> Result<Vec<ListingTile>> {
    let sel = selector("li.cards-li")?;
    let doc = Html::parse_document(html);
    Ok(doc.select(&sel).map(ListingTile::from_element).collect())
}
