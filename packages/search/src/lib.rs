#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Listing filter and sort pipeline.
//!
//! Runs every time the search parameters change. All active clauses of a
//! [`SearchParams`] are AND-ed; the surviving listings are sorted with a
//! stable sort so that ties keep their input order in both directions.

use std::cmp::Ordering;

use lost_found_listing_models::Listing;
use lost_found_search_models::SearchParams;
use lost_found_spatial::within_distance;

/// A [`SearchParams`] prepared for repeated evaluation.
#[derive(Debug)]
pub struct ListingFilter<'a> {
    params: &'a SearchParams,
    keyword: String,
}

impl<'a> ListingFilter<'a> {
    #[must_use]
    pub fn new(params: &'a SearchParams) -> Self {
        Self {
            params,
            keyword: params.keyword.to_lowercase(),
        }
    }

    /// Returns `true` if `listing` satisfies every active clause.
    #[must_use]
    pub fn matches(&self, listing: &Listing) -> bool {
        let params = self.params;

        if !params.listing_type.accepts(listing.listing_type) {
            return false;
        }

        if !self.keyword.is_empty()
            && !listing.title.to_lowercase().contains(&self.keyword)
            && !listing.description.to_lowercase().contains(&self.keyword)
        {
            return false;
        }

        if params.category.is_some_and(|c| c != listing.category) {
            return false;
        }

        if params.status.is_some_and(|s| s != listing.status) {
            return false;
        }

        if let Some(location) = &params.location {
            let center = location.point();
            if !listing
                .markers
                .iter()
                .any(|m| within_distance(m.point(), center, location.radius).matched)
            {
                return false;
            }
        }

        true
    }
}

/// Returns the listings matching `params`, sorted by `params.sort_by` in
/// `params.sort_order`. The input slice is left untouched.
#[must_use]
pub fn filter_and_sort(listings: &[Listing], params: &SearchParams) -> Vec<Listing> {
    let filter = ListingFilter::new(params);

    let mut results: Vec<Listing> = listings
        .iter()
        .filter(|listing| filter.matches(listing))
        .cloned()
        .collect();

    stable_sort_by(&mut results, |a, b| {
        params.sort_order.apply(params.sort_by.compare(a, b))
    });

    log::debug!(
        "filter_and_sort: {} of {} listings matched (sort by {} {})",
        results.len(),
        listings.len(),
        params.sort_by,
        params.sort_order
    );

    results
}

/// Stable insertion sort that only ever compares neighbours.
///
/// Absent sort keys compare equal to everything, which is not a total order,
/// so `slice::sort_by` may panic on them. Here an element only moves past
/// neighbours that compare strictly greater, so a listing with an absent key
/// stays where it is and the runs between such listings are sorted.
fn stable_sort_by<T>(items: &mut [T], mut compare: impl FnMut(&T, &T) -> Ordering) {
    for i in 1..items.len() {
        let mut j = i;
        while j > 0 && compare(&items[j - 1], &items[j]) == Ordering::Greater {
            items.swap(j - 1, j);
            j -= 1;
        }
    }
}
