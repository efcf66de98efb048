#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Search parameter types for the listing filter pipeline.
//!
//! [`SearchParams`] is the typed filter session the UI hands to
//! `lost_found_search`. [`SearchQueryParams`] is the raw, all-optional shape
//! as it arrives from a query string or command-line flags.
//!
//! Sortable fields form a closed set ([`SortField`]); each maps to an
//! extractor function rather than a dynamic field lookup.

use std::cmp::Ordering;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use lost_found_listing_models::{GeoPoint, Listing, ListingCategory, ListingStatus, ListingType};
use serde::{Deserialize, Deserializer, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Which listing types a search includes.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TypeFilter {
    /// Both lost and found listings.
    #[default]
    All,
    /// Only lost listings.
    Lost,
    /// Only found listings.
    Found,
}

impl TypeFilter {
    /// Returns `true` if listings of type `listing_type` pass this filter.
    #[must_use]
    pub const fn accepts(self, listing_type: ListingType) -> bool {
        matches!(
            (self, listing_type),
            (Self::All, _) | (Self::Lost, ListingType::Lost) | (Self::Found, ListingType::Found)
        )
    }
}

/// A value extracted from a listing for sorting.
///
/// Only keys produced by the same [`SortField`] are ever compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortKey<'a> {
    /// Compared lexicographically.
    Text(&'a str),
    /// Compared chronologically.
    Time(DateTime<Utc>),
}

/// Extracts a sort key from a listing, or `None` if the field is absent.
pub type SortKeyExtractor = for<'a> fn(&'a Listing) -> Option<SortKey<'a>>;

/// The closed set of fields a search can sort by.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum SortField {
    Title,
    Description,
    Type,
    Category,
    Status,
    #[default]
    CreatedAt,
    UpdatedAt,
    ExpiresAt,
}

fn title_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Text(&listing.title))
}

fn description_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Text(&listing.description))
}

fn type_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Text(listing.listing_type.as_ref()))
}

fn category_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Text(listing.category.as_ref()))
}

fn status_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Text(listing.status.as_ref()))
}

fn created_at_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Time(listing.created_at))
}

fn updated_at_key(listing: &Listing) -> Option<SortKey<'_>> {
    listing.updated_at.map(SortKey::Time)
}

fn expires_at_key(listing: &Listing) -> Option<SortKey<'_>> {
    Some(SortKey::Time(listing.expires_at))
}

const SORT_FIELDS: &[SortField] = &[
    SortField::Title,
    SortField::Description,
    SortField::Type,
    SortField::Category,
    SortField::Status,
    SortField::CreatedAt,
    SortField::UpdatedAt,
    SortField::ExpiresAt,
];

impl SortField {
    /// Returns all sortable fields.
    #[must_use]
    pub fn all() -> Vec<Self> {
        SORT_FIELDS.to_vec()
    }

    /// Returns the extractor for this field.
    #[must_use]
    pub const fn extractor(self) -> SortKeyExtractor {
        match self {
            Self::Title => title_key,
            Self::Description => description_key,
            Self::Type => type_key,
            Self::Category => category_key,
            Self::Status => status_key,
            Self::CreatedAt => created_at_key,
            Self::UpdatedAt => updated_at_key,
            Self::ExpiresAt => expires_at_key,
        }
    }

    /// Extracts this field's sort key from `listing`.
    #[must_use]
    pub fn key(self, listing: &Listing) -> Option<SortKey<'_>> {
        (self.extractor())(listing)
    }

    /// Compares two listings on this field.
    ///
    /// If either listing lacks the field the result is [`Ordering::Equal`],
    /// leaving their relative order to the (stable) sort.
    #[must_use]
    pub fn compare(self, a: &Listing, b: &Listing) -> Ordering {
        match (self.key(a), self.key(b)) {
            (Some(ka), Some(kb)) => ka.cmp(&kb),
            _ => Ordering::Equal,
        }
    }
}

/// Sort direction.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[serde(alias = "asc")]
    #[strum(to_string = "ascending", serialize = "asc")]
    Ascending,
    #[default]
    #[serde(alias = "desc")]
    #[strum(to_string = "descending", serialize = "desc")]
    Descending,
}

impl SortOrder {
    /// Applies this direction to an ascending comparison result.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Ascending => ordering,
            Self::Descending => ordering.reverse(),
        }
    }
}

/// A location-radius constraint: a listing passes if any of its markers
/// lies within `radius` meters of the point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationFilter {
    /// Display name of the searched place.
    #[serde(default)]
    pub name: String,
    /// Latitude of the search center.
    pub lat: f64,
    /// Longitude of the search center.
    pub lng: f64,
    /// Search radius in meters.
    pub radius: f64,
}

impl LocationFilter {
    /// Returns the search center.
    #[must_use]
    pub const fn point(&self) -> GeoPoint {
        GeoPoint::new(self.lat, self.lng)
    }
}

/// A complete filter session. Every clause is optional; the default
/// matches every listing and sorts newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    /// Case-insensitive substring matched against title and description.
    pub keyword: String,
    /// Listing type filter.
    #[serde(rename = "type")]
    pub listing_type: TypeFilter,
    /// Exact category, `None` for any. An empty string deserializes as `None`.
    #[serde(deserialize_with = "empty_as_none")]
    pub category: Option<ListingCategory>,
    /// Exact status, `None` for any. An empty string deserializes as `None`.
    #[serde(deserialize_with = "empty_as_none")]
    pub status: Option<ListingStatus>,
    /// Field to sort by.
    pub sort_by: SortField,
    /// Sort direction.
    pub sort_order: SortOrder,
    /// Location-radius constraint.
    pub location: Option<LocationFilter>,
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("unknown value {s:?}"))),
    }
}

/// Raw search parameters as received from a query string or CLI flags.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQueryParams {
    /// Keyword substring.
    pub keyword: Option<String>,
    /// `all`, `lost`, or `found`.
    #[serde(rename = "type")]
    pub listing_type: Option<String>,
    /// Category name (e.g. `"Bags"`), empty for any.
    pub category: Option<String>,
    /// Status name (e.g. `"active"`), empty for any.
    pub status: Option<String>,
    /// Sort field name (e.g. `"createdAt"`).
    pub sort_by: Option<String>,
    /// `ascending`/`asc` or `descending`/`desc`.
    pub sort_order: Option<String>,
    /// Display name of the searched place.
    pub location_name: Option<String>,
    /// Search center latitude.
    pub lat: Option<f64>,
    /// Search center longitude.
    pub lng: Option<f64>,
    /// Search radius in meters.
    pub radius: Option<f64>,
}

impl SearchQueryParams {
    /// Validates and converts into [`SearchParams`].
    ///
    /// `default_radius_meters` is used when a center is given without a
    /// radius.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidSearchParamError`] if an enum-valued parameter is not
    /// recognized, or if only one of `lat`/`lng` is given.
    pub fn into_search_params(
        self,
        default_radius_meters: f64,
    ) -> Result<SearchParams, InvalidSearchParamError> {
        let location = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(LocationFilter {
                name: self.location_name.unwrap_or_default(),
                lat,
                lng,
                radius: self.radius.unwrap_or(default_radius_meters),
            }),
            (None, None) => None,
            (Some(_), None) => return Err(InvalidSearchParamError::missing("lng")),
            (None, Some(_)) => return Err(InvalidSearchParamError::missing("lat")),
        };

        Ok(SearchParams {
            keyword: self.keyword.unwrap_or_default(),
            listing_type: parse_optional("type", self.listing_type)?.unwrap_or_default(),
            category: parse_optional("category", self.category)?,
            status: parse_optional("status", self.status)?,
            sort_by: parse_optional("sortBy", self.sort_by)?.unwrap_or_default(),
            sort_order: parse_optional("sortOrder", self.sort_order)?.unwrap_or_default(),
            location,
        })
    }
}

/// Parses an optional raw value, treating missing and blank as `None`.
fn parse_optional<T: FromStr>(
    field: &'static str,
    raw: Option<String>,
) -> Result<Option<T>, InvalidSearchParamError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| InvalidSearchParamError::new(field, s)),
    }
}

/// Error returned when a raw search parameter cannot be interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidSearchParamError {
    /// Name of the offending parameter.
    pub field: &'static str,
    /// The rejected value, empty if the parameter was required but missing.
    pub value: String,
}

impl InvalidSearchParamError {
    fn new(field: &'static str, value: impl ToString) -> Self {
        Self {
            field,
            value: value.to_string(),
        }
    }

    const fn missing(field: &'static str) -> Self {
        Self {
            field,
            value: String::new(),
        }
    }
}

impl std::fmt::Display for InvalidSearchParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.value.is_empty() {
            write!(f, "missing search parameter {}", self.field)
        } else {
            write!(
                f,
                "invalid search parameter {}: {:?}",
                self.field, self.value
            )
        }
    }
}

impl std::error::Error for InvalidSearchParamError {}
