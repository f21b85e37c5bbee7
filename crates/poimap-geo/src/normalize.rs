//! Normalization of raw provider records into [`SearchResult`] values.

use poimap_core::{Coordinate, ResultPage, SearchResult, ADDRESS_UNAVAILABLE, UNNAMED_PLACE};

use crate::types::{PoiRecord, SearchPoiInfo};

/// Maps one raw record to a [`SearchResult`].
///
/// Returns `None` when the record has no usable coordinate, since a result
/// that cannot be plotted is useless to the caller. Missing names and
/// addresses degrade to placeholder labels instead.
#[must_use]
pub fn normalize_poi(record: &PoiRecord) -> Option<SearchResult> {
    let location = Coordinate::new(record.noor_lat?, record.noor_lon?);
    if !location.is_valid() {
        return None;
    }

    let name = non_blank(record.name.as_deref())
        .map_or_else(|| UNNAMED_PLACE.to_owned(), str::to_owned);

    Some(SearchResult {
        name,
        full_address: compose_address(record),
        location,
    })
}

/// Builds the display address from the record's administrative parts.
///
/// Parts are joined with single spaces and blank parts are skipped. The lot
/// number is `firstNo`, or `firstNo-secondNo` when the sub number is present
/// and not `0`.
#[must_use]
pub fn compose_address(record: &PoiRecord) -> String {
    let lot = match (
        non_blank(record.first_no.as_deref()),
        non_blank(record.second_no.as_deref()).filter(|s| *s != "0"),
    ) {
        (Some(main), Some(sub)) => Some(format!("{main}-{sub}")),
        (Some(main), None) => Some(main.to_owned()),
        (None, _) => None,
    };

    let parts: Vec<&str> = [
        non_blank(record.upper_addr_name.as_deref()),
        non_blank(record.middle_addr_name.as_deref()),
        non_blank(record.lower_addr_name.as_deref()),
        non_blank(record.detail_addr_name.as_deref()),
        lot.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        ADDRESS_UNAVAILABLE.to_owned()
    } else {
        parts.join(" ")
    }
}

/// Converts one decoded search page into a [`ResultPage`].
///
/// `requested_page` is used when the provider omits the page number. Records
/// without usable coordinates are dropped with a warning.
#[must_use]
pub fn normalize_page(info: SearchPoiInfo, keyword: &str, requested_page: u32) -> ResultPage {
    let page_number = info.page.filter(|p| *p >= 1).unwrap_or(requested_page);
    let received = info.pois.poi.len();
    let items: Vec<SearchResult> = info
        .pois
        .poi
        .iter()
        .filter_map(|record| {
            let normalized = normalize_poi(record);
            if normalized.is_none() {
                tracing::warn!(
                    keyword,
                    page = page_number,
                    id = record.id.as_deref().unwrap_or("?"),
                    "skipping point of interest without a usable coordinate"
                );
            }
            normalized
        })
        .collect();

    let skipped = received - items.len();
    ResultPage {
        items,
        page_number,
        query_keyword: keyword.to_owned(),
        total_count: info.total_count,
        skipped,
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
