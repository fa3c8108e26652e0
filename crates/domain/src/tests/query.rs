// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseStatus, PageLimits, Pagination, StatusFilter, normalize_search_text, parse_since};
use time::macros::datetime;

#[test]
fn test_pagination_defaults() {
    let page: Pagination = Pagination::clamped(None, None, PageLimits::DISPATCH);
    assert_eq!(page.page(), 1);
    assert_eq!(page.limit(), 100);
    assert_eq!(page.offset(), 0);
}

#[test]
fn test_pagination_clamps_dispatch_limit() {
    assert_eq!(
        Pagination::clamped(None, Some(10_000), PageLimits::DISPATCH).limit(),
        500
    );
    assert_eq!(
        Pagination::clamped(None, Some(-5), PageLimits::DISPATCH).limit(),
        1
    );
    assert_eq!(
        Pagination::clamped(None, Some(0), PageLimits::DISPATCH).limit(),
        100
    );
}

#[test]
fn test_pagination_clamps_actor_limit() {
    let page: Pagination = Pagination::clamped(Some(3), Some(250), PageLimits::ACTORS);
    assert_eq!(page.limit(), 100);
    assert_eq!(page.offset(), 200);
    assert_eq!(
        Pagination::clamped(None, None, PageLimits::ACTORS).limit(),
        20
    );
}

#[test]
fn test_pagination_non_positive_page_is_first() {
    assert_eq!(Pagination::clamped(Some(0), None, PageLimits::ACTORS).page(), 1);
    assert_eq!(Pagination::clamped(Some(-2), None, PageLimits::ACTORS).page(), 1);
}

#[test]
fn test_status_filter_default_dispatch_set() {
    assert_eq!(
        StatusFilter::parse_dispatch(None),
        StatusFilter::OneOf(vec![
            CaseStatus::Open,
            CaseStatus::Assigned,
            CaseStatus::EnRoute
        ])
    );
    assert_eq!(
        StatusFilter::parse_dispatch(Some("  ")),
        StatusFilter::parse_dispatch(None)
    );
}

#[test]
fn test_status_filter_comma_separated() {
    let filter: StatusFilter = StatusFilter::parse_dispatch(Some("open, RESOLVED,open"));
    assert_eq!(
        filter,
        StatusFilter::OneOf(vec![CaseStatus::Open, CaseStatus::Resolved])
    );
    assert!(filter.allows(CaseStatus::Resolved));
    assert!(!filter.allows(CaseStatus::Assigned));
}

#[test]
fn test_status_filter_unknown_values_match_nothing() {
    let filter: StatusFilter = StatusFilter::parse_dispatch(Some("bogus"));
    assert_eq!(filter, StatusFilter::OneOf(Vec::new()));
    for status in CaseStatus::ALL {
        assert!(!filter.allows(status));
    }
}

#[test]
fn test_parse_since_accepts_rfc3339_and_dates() {
    assert_eq!(
        parse_since("2024-03-01T10:00:00Z"),
        Some(datetime!(2024-03-01 10:00:00 UTC))
    );
    assert_eq!(
        parse_since("2024-03-01"),
        Some(datetime!(2024-03-01 00:00:00 UTC))
    );
    assert_eq!(parse_since("yesterday"), None);
}

#[test]
fn test_search_text_blank_is_absent() {
    assert_eq!(normalize_search_text(Some("   ")), None);
    assert_eq!(normalize_search_text(Some(" fire ")), Some(String::from("fire")));
}
