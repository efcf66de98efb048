#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Listing, marker, and geographic point types.
//!
//! These are the value shapes produced by the persistence layer and consumed
//! by the search, spatial, and matching crates. A [`Listing`] exclusively
//! owns its [`Marker`]s: markers are added and removed only through the
//! owning listing, which keeps each marker's `listing_id` in sync.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Maximum number of markers a single listing may carry.
pub const MAX_MARKERS: usize = 3;

/// Number of days a listing stays live before it expires.
pub const DEFAULT_EXPIRY_DAYS: u32 = 30;

/// A latitude/longitude pair in decimal degrees (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, expected in `[-90, 90]`.
    pub lat: f64,
    /// Longitude, expected in `[-180, 180]`.
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a new point from latitude and longitude.
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if both coordinates are finite and within range.
    ///
    /// None of the distance or filter functions call this; callers that
    /// accept coordinates from users validate explicitly.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Whether the poster lost the item or found it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingType {
    /// The poster is looking for an item they lost.
    Lost,
    /// The poster is holding an item they found.
    Found,
}

impl ListingType {
    /// Returns the type a counterpart listing must have to be a match.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Lost => Self::Found,
            Self::Found => Self::Lost,
        }
    }
}

/// Lifecycle state of a listing.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ListingStatus {
    /// Visible and open for matching.
    Active,
    /// The item was returned to its owner.
    Resolved,
    /// Hidden by the poster or expired.
    Archived,
}

/// Item category shown in the category picker.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum ListingCategory {
    Electronics,
    Bags,
    Wallets,
    Keys,
    Documents,
    Clothing,
    Accessories,
    Jewelry,
    Pets,
    Others,
}

impl ListingCategory {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Electronics,
            Self::Bags,
            Self::Wallets,
            Self::Keys,
            Self::Documents,
            Self::Clothing,
            Self::Accessories,
            Self::Jewelry,
            Self::Pets,
            Self::Others,
        ]
    }
}

/// A named point-radius geofence attached to a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    /// Unique marker ID.
    pub id: String,
    /// ID of the owning listing.
    pub listing_id: String,
    /// Human-readable place name (e.g. "Central Library").
    pub name: String,
    /// Center latitude.
    pub latitude: f64,
    /// Center longitude.
    pub longitude: f64,
    /// Geofence radius in meters.
    pub radius: f64,
}

impl Marker {
    /// Creates a marker with a fresh ID. The `listing_id` is assigned when
    /// the marker is attached via [`Listing::add_marker`].
    #[must_use]
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64, radius: f64) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            listing_id: String::new(),
            name: name.into(),
            latitude,
            longitude,
            radius,
        }
    }

    /// Returns the marker center.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// How expiry timestamps are assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpiryPolicy {
    /// Days from creation (or last update) until expiry.
    pub days: u32,
    /// Whether an update pushes `expires_at` out to `now + days`.
    pub refresh_on_update: bool,
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self {
            days: DEFAULT_EXPIRY_DAYS,
            refresh_on_update: true,
        }
    }
}

impl ExpiryPolicy {
    /// Returns the expiry timestamp for a listing written at `at`.
    #[must_use]
    pub fn expires_from(&self, at: DateTime<Utc>) -> DateTime<Utc> {
        at.checked_add_signed(TimeDelta::days(i64::from(self.days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// The user-supplied part of a new listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingDraft {
    /// Lost or found.
    pub listing_type: ListingType,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Item category.
    pub category: ListingCategory,
    /// ID of the posting user.
    pub user_id: String,
}

/// A lost/found item post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// Unique listing ID.
    pub id: String,
    /// Lost or found.
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Item category.
    pub category: ListingCategory,
    /// Lifecycle state.
    pub status: ListingStatus,
    /// ID of the posting user.
    #[serde(default)]
    pub user_id: String,
    /// Base64-encoded photos.
    #[serde(default)]
    pub images: Vec<String>,
    /// When the listing was posted.
    pub created_at: DateTime<Utc>,
    /// When the listing was last edited. Absent on records that predate
    /// edit tracking.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// When the listing stops being shown.
    pub expires_at: DateTime<Utc>,
    /// Geofences where the item was lost or found, in display order.
    #[serde(default)]
    pub markers: Vec<Marker>,
}

impl Listing {
    /// Creates an active listing posted at `now`.
    #[must_use]
    pub fn new(draft: ListingDraft, now: DateTime<Utc>, policy: &ExpiryPolicy) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            listing_type: draft.listing_type,
            title: draft.title,
            description: draft.description,
            category: draft.category,
            status: ListingStatus::Active,
            user_id: draft.user_id,
            images: Vec::new(),
            created_at: now,
            updated_at: Some(now),
            expires_at: policy.expires_from(now),
            markers: Vec::new(),
        }
    }

    /// Attaches a marker, assigning it to this listing.
    ///
    /// # Errors
    ///
    /// Returns [`TooManyMarkersError`] if the listing already holds
    /// [`MAX_MARKERS`] markers.
    pub fn add_marker(&mut self, mut marker: Marker) -> Result<&Marker, TooManyMarkersError> {
        if self.markers.len() >= MAX_MARKERS {
            return Err(TooManyMarkersError {
                listing_id: self.id.clone(),
            });
        }
        marker.listing_id.clone_from(&self.id);
        self.markers.push(marker);
        Ok(&self.markers[self.markers.len() - 1])
    }

    /// Removes the marker with the given ID, returning it if present.
    pub fn remove_marker(&mut self, marker_id: &str) -> Option<Marker> {
        let idx = self.markers.iter().position(|m| m.id == marker_id)?;
        Some(self.markers.remove(idx))
    }

    /// Records an edit made at `now`.
    pub fn touch(&mut self, now: DateTime<Utc>, policy: &ExpiryPolicy) {
        self.updated_at = Some(now);
        if policy.refresh_on_update {
            self.expires_at = policy.expires_from(now);
        }
    }

    /// Returns `true` once `now` has reached `expires_at`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Error returned when attaching a marker to a listing that is already at
/// [`MAX_MARKERS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooManyMarkersError {
    /// The listing that rejected the marker.
    pub listing_id: String,
}

impl std::fmt::Display for TooManyMarkersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "listing {} already has {MAX_MARKERS} markers",
            self.listing_id
        )
    }
}

impl std::error::Error for TooManyMarkersError {}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::TimeZone;

    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            listing_type: ListingType::Lost,
            title: "Lost Wallet".to_string(),
            description: "Brown leather wallet".to_string(),
            category: ListingCategory::Wallets,
            user_id: "user-1".to_string(),
        }
    }

    fn at(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_listing_expires_after_thirty_days() {
        let listing = Listing::new(draft(), at(1), &ExpiryPolicy::default());
        assert_eq!(listing.status, ListingStatus::Active);
        assert_eq!(listing.updated_at, Some(at(1)));
        assert_eq!(listing.expires_at - listing.created_at, TimeDelta::days(30));
        assert!(!listing.is_expired(at(30)));
        assert!(listing.is_expired(at(31)));
    }

    #[test]
    fn touch_refreshes_expiry_by_default() {
        let policy = ExpiryPolicy::default();
        let mut listing = Listing::new(draft(), at(1), &policy);
        listing.touch(at(10), &policy);
        assert_eq!(listing.updated_at, Some(at(10)));
        assert_eq!(listing.expires_at, at(10) + TimeDelta::days(30));
    }

    #[test]
    fn touch_preserves_expiry_when_refresh_disabled() {
        let policy = ExpiryPolicy {
            days: 30,
            refresh_on_update: false,
        };
        let mut listing = Listing::new(draft(), at(1), &policy);
        let original = listing.expires_at;
        listing.touch(at(10), &policy);
        assert_eq!(listing.expires_at, original);
        assert_eq!(listing.updated_at, Some(at(10)));
    }

    #[test]
    fn add_marker_assigns_owner_and_caps_count() {
        let mut listing = Listing::new(draft(), at(1), &ExpiryPolicy::default());
        for i in 0..MAX_MARKERS {
            let owner = listing
                .add_marker(Marker::new(format!("spot {i}"), 1.0, 2.0, 50.0))
                .unwrap()
                .listing_id
                .clone();
            assert_eq!(owner, listing.id);
        }
        let err = listing
            .add_marker(Marker::new("one too many", 1.0, 2.0, 50.0))
            .unwrap_err();
        assert_eq!(err.listing_id, listing.id);
        assert_eq!(listing.markers.len(), MAX_MARKERS);
    }

    #[test]
    fn remove_marker_by_id() {
        let mut listing = Listing::new(draft(), at(1), &ExpiryPolicy::default());
        let id = listing
            .add_marker(Marker::new("bus stop", 1.0, 2.0, 50.0))
            .unwrap()
            .id
            .clone();
        assert!(listing.remove_marker("missing").is_none());
        assert_eq!(
            listing.remove_marker(&id).map(|m| m.name),
            Some("bus stop".to_string())
        );
        assert!(listing.markers.is_empty());
    }

    #[test]
    fn geo_point_validity() {
        assert!(GeoPoint::new(1.3521, 103.8198).is_valid());
        assert!(GeoPoint::new(-90.0, 180.0).is_valid());
        assert!(!GeoPoint::new(91.0, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::NAN).is_valid());
    }

    #[test]
    fn enum_string_forms() {
        assert_eq!(ListingType::Lost.to_string(), "lost");
        assert_eq!(
            ListingStatus::from_str("resolved").unwrap(),
            ListingStatus::Resolved
        );
        assert_eq!(
            ListingCategory::from_str("Bags").unwrap(),
            ListingCategory::Bags
        );
        assert_eq!(ListingType::Found.opposite(), ListingType::Lost);
    }

    #[test]
    fn deserializes_stored_record_without_optional_fields() {
        let json = r#"{
            "id": "abc",
            "type": "found",
            "title": "Blue Cap",
            "description": "Left on a bench",
            "category": "Clothing",
            "status": "active",
            "createdAt": "2025-03-01T12:00:00Z",
            "expiresAt": "2025-03-31T12:00:00Z"
        }"#;
        let listing: Listing = serde_json::from_str(json).unwrap();
        assert_eq!(listing.listing_type, ListingType::Found);
        assert_eq!(listing.category, ListingCategory::Clothing);
        assert!(listing.updated_at.is_none());
        assert!(listing.markers.is_empty());
        assert!(listing.images.is_empty());
    }
}
