#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Spherical distance and geofence helpers for listing markers.
//!
//! Everything here is a pure function over already-loaded values. Inputs are
//! not validated: out-of-range or non-finite coordinates propagate into the
//! result (use [`GeoPoint::is_valid`] at the edges where user input arrives).

use geo::{Centroid, MultiPoint, Point};
use lost_found_listing_models::{GeoPoint, Listing, Marker};

/// Earth radius used for great-circle distances, in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Great-circle distance between two points in meters (haversine formula).
#[must_use]
pub fn haversine_distance_meters(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_METERS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Result of a [`within_distance`] check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Proximity {
    /// Whether the distance is at most the threshold.
    pub matched: bool,
    /// The actual distance in meters.
    pub distance_meters: f64,
}

/// Tests whether `a` and `b` lie within `max_meters` of each other.
///
/// Pass [`f64::INFINITY`] to get the raw distance with `matched` always set.
#[must_use]
pub fn within_distance(a: GeoPoint, b: GeoPoint, max_meters: f64) -> Proximity {
    let distance_meters = haversine_distance_meters(a, b);
    Proximity {
        matched: distance_meters <= max_meters,
        distance_meters,
    }
}

/// A circular geofence: a center point and a radius in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geofence {
    /// Center of the circle.
    pub center: GeoPoint,
    /// Radius in meters.
    pub radius: f64,
}

impl Geofence {
    #[must_use]
    pub const fn new(center: GeoPoint, radius: f64) -> Self {
        Self { center, radius }
    }
}

impl From<&Marker> for Geofence {
    fn from(marker: &Marker) -> Self {
        Self::new(marker.point(), marker.radius)
    }
}

/// Whether two geofences overlap once each is grown by `buffer` meters.
///
/// Inclusive: circles that exactly touch count as overlapping.
#[must_use]
pub fn markers_overlap(m1: &Geofence, m2: &Geofence, buffer: f64) -> bool {
    within_distance(m1.center, m2.center, 2.0f64.mul_add(buffer, m1.radius + m2.radius)).matched
}

/// Whether any marker of `a` overlaps any marker of `b`.
///
/// Listings with no markers never overlap anything.
#[must_use]
pub fn listings_overlap(a: &Listing, b: &Listing, buffer: f64) -> bool {
    a.markers.iter().any(|ma| {
        let fa = Geofence::from(ma);
        b.markers
            .iter()
            .any(|mb| markers_overlap(&fa, &Geofence::from(mb), buffer))
    })
}

/// Smallest center-to-center distance between the markers of two listings.
///
/// Returns `None` if either listing has no markers.
#[must_use]
pub fn nearest_marker_distance(a: &Listing, b: &Listing) -> Option<f64> {
    a.markers
        .iter()
        .flat_map(|ma| {
            b.markers
                .iter()
                .map(move |mb| haversine_distance_meters(ma.point(), mb.point()))
        })
        .min_by(f64::total_cmp)
}

/// Arithmetic mean of a listing's marker coordinates, for centering a map.
///
/// This is a planar centroid, not a spherical mean. Returns `None` when the
/// listing has no markers.
#[must_use]
pub fn average_marker_location(listing: &Listing) -> Option<GeoPoint> {
    let points: MultiPoint<f64> = listing
        .markers
        .iter()
        .map(|m| Point::new(m.longitude, m.latitude))
        .collect();

    points.centroid().map(|c| GeoPoint::new(c.y(), c.x()))
}
