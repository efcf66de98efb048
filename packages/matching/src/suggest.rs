//! Ranks counterpart listings as potential matches.
//!
//! A lost listing's counterparts are active found listings in the same
//! category whose geofences overlap one of its own, and vice versa.
//! Counterparts are scored by the text similarity of title plus description.

use lost_found_listing_models::{Listing, ListingStatus};
use lost_found_spatial::{listings_overlap, nearest_marker_distance};
use serde::Serialize;

use crate::similarity::cosine_similarity;

/// Tuning knobs for [`suggest_matches`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchOptions {
    /// Extra meters added around each geofence before testing overlap.
    pub overlap_buffer_meters: f64,
    /// Suggestions scoring below this are dropped.
    pub min_similarity: f64,
    /// Maximum number of suggestions returned.
    pub max_results: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            overlap_buffer_meters: 100.0,
            min_similarity: 0.1,
            max_results: 10,
        }
    }
}

/// A ranked potential match.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSuggestion {
    /// ID of the suggested counterpart listing.
    pub listing_id: String,
    /// Title of the counterpart, for display.
    pub title: String,
    /// Text similarity in `[0, 1]`.
    pub score: f64,
    /// Distance between the closest pair of marker centers.
    pub nearest_distance_meters: f64,
}

/// Returns `true` if `candidate` could be the other half of `listing`:
/// a different, active listing of the opposite type in the same category.
#[must_use]
pub fn is_counterpart(listing: &Listing, candidate: &Listing) -> bool {
    candidate.id != listing.id
        && listing.status == ListingStatus::Active
        && candidate.status == ListingStatus::Active
        && candidate.listing_type == listing.listing_type.opposite()
        && candidate.category == listing.category
}

fn match_text(listing: &Listing) -> String {
    format!("{} {}", listing.title, listing.description)
}

/// Ranks `candidates` as matches for `listing`, best first.
///
/// Candidates must pass [`is_counterpart`] and have at least one marker
/// overlapping one of `listing`'s markers. Ties keep candidate order.
#[must_use]
pub fn suggest_matches(
    listing: &Listing,
    candidates: &[Listing],
    options: &MatchOptions,
) -> Vec<MatchSuggestion> {
    let text = match_text(listing);

    let mut suggestions: Vec<MatchSuggestion> = candidates
        .iter()
        .filter(|candidate| is_counterpart(listing, candidate))
        .filter(|candidate| listings_overlap(listing, candidate, options.overlap_buffer_meters))
        .filter_map(|candidate| {
            let nearest_distance_meters = nearest_marker_distance(listing, candidate)?;
            let score = cosine_similarity(&text, &match_text(candidate));
            (score >= options.min_similarity).then(|| MatchSuggestion {
                listing_id: candidate.id.clone(),
                title: candidate.title.clone(),
                score,
                nearest_distance_meters,
            })
        })
        .collect();

    suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
    suggestions.truncate(options.max_results);

    log::debug!(
        "suggest_matches: {} suggestions for listing {} from {} candidates",
        suggestions.len(),
        listing.id,
        candidates.len()
    );

    suggestions
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use lost_found_listing_models::{
        ExpiryPolicy, ListingCategory, ListingDraft, ListingType, Marker,
    };

    use super::*;

    fn listing(
        listing_type: ListingType,
        title: &str,
        description: &str,
        category: ListingCategory,
        marker: Option<(f64, f64)>,
    ) -> Listing {
        let mut listing = Listing::new(
            ListingDraft {
                listing_type,
                title: title.to_string(),
                description: description.to_string(),
                category,
                user_id: "u".to_string(),
            },
            Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap(),
            &ExpiryPolicy::default(),
        );
        if let Some((lat, lng)) = marker {
            listing
                .add_marker(Marker::new("spot", lat, lng, 50.0))
                .unwrap();
        }
        listing
    }

    const MALL: (f64, f64) = (1.3040, 103.8318);
    const NEAR_MALL: (f64, f64) = (1.3045, 103.8320);
    const AIRPORT: (f64, f64) = (1.3644, 103.9915);

    fn lost_wallet() -> Listing {
        listing(
            ListingType::Lost,
            "Lost black wallet",
            "Leather wallet with library card",
            ListingCategory::Wallets,
            Some(MALL),
        )
    }

    #[test]
    fn ranks_overlapping_counterparts_by_similarity() {
        let subject = lost_wallet();
        let exact = listing(
            ListingType::Found,
            "Found black leather wallet",
            "Has a library card inside",
            ListingCategory::Wallets,
            Some(NEAR_MALL),
        );
        let vague = listing(
            ListingType::Found,
            "Wallet",
            "Picked up near the escalator",
            ListingCategory::Wallets,
            Some(MALL),
        );

        let suggestions = suggest_matches(
            &subject,
            &[vague.clone(), exact.clone()],
            &MatchOptions::default(),
        );

        let ids: Vec<&str> = suggestions.iter().map(|s| s.listing_id.as_str()).collect();
        assert_eq!(ids, vec![exact.id.as_str(), vague.id.as_str()]);
        assert!(suggestions[0].score > suggestions[1].score);
        assert!(suggestions[0].nearest_distance_meters < 100.0);
    }

    #[test]
    fn excludes_non_counterparts() {
        let subject = lost_wallet();
        let same_type = listing(
            ListingType::Lost,
            "Lost black wallet",
            "",
            ListingCategory::Wallets,
            Some(MALL),
        );
        let other_category = listing(
            ListingType::Found,
            "Black wallet",
            "",
            ListingCategory::Bags,
            Some(MALL),
        );
        let mut resolved = listing(
            ListingType::Found,
            "Black wallet",
            "",
            ListingCategory::Wallets,
            Some(MALL),
        );
        resolved.status = ListingStatus::Resolved;
        let far_away = listing(
            ListingType::Found,
            "Black wallet",
            "",
            ListingCategory::Wallets,
            Some(AIRPORT),
        );
        let unplaced = listing(
            ListingType::Found,
            "Black wallet",
            "",
            ListingCategory::Wallets,
            None,
        );

        let candidates = [
            subject.clone(),
            same_type,
            other_category,
            resolved,
            far_away,
            unplaced,
        ];
        assert!(suggest_matches(&subject, &candidates, &MatchOptions::default()).is_empty());
    }

    #[test]
    fn drops_low_scores_and_truncates() {
        let subject = lost_wallet();
        let unrelated = listing(
            ListingType::Found,
            "Umbrella",
            "Green with a wooden handle",
            ListingCategory::Wallets,
            Some(MALL),
        );
        let similar: Vec<Listing> = (0..5)
            .map(|i| {
                listing(
                    ListingType::Found,
                    &format!("Black wallet #{i}"),
                    "",
                    ListingCategory::Wallets,
                    Some(MALL),
                )
            })
            .collect();

        let mut candidates = vec![unrelated];
        candidates.extend(similar);

        let options = MatchOptions {
            max_results: 3,
            ..MatchOptions::default()
        };
        let suggestions = suggest_matches(&subject, &candidates, &options);
        assert_eq!(suggestions.len(), 3);
        assert!(suggestions.iter().all(|s| s.title.starts_with("Black wallet")));
    }

    #[test]
    fn counterpart_rules() {
        let subject = lost_wallet();
        let found = listing(
            ListingType::Found,
            "Wallet",
            "",
            ListingCategory::Wallets,
            None,
        );
        assert!(is_counterpart(&subject, &found));
        assert!(is_counterpart(&found, &subject));
        assert!(!is_counterpart(&subject, &subject));
    }
}
