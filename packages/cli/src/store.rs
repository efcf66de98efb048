//! Listings loaded from a JSON export of the document store.

use std::path::{Path, PathBuf};

use lost_found_listing_models::{Listing, MAX_MARKERS};

/// Errors that can occur while loading or looking up listings.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The listings file could not be read.
    #[error("Failed to read listings file {path}: {source}")]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The listings file is not a JSON array of listings.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// No listing has the requested ID.
    #[error("Listing not found: {id}")]
    NotFound {
        /// The requested ID.
        id: String,
    },
}

/// An in-memory, read-only set of listings.
#[derive(Debug, Default)]
pub struct ListingStore {
    listings: Vec<Listing>,
}

impl ListingStore {
    /// Reads a JSON array of listings from `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self::from_json_str(&contents)?;
        log::info!(
            "Loaded {} listings from {}",
            store.listings.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parses a JSON array of listings.
    ///
    /// Records that break the listing invariants (out-of-range coordinates,
    /// too many markers, markers owned by another listing) are kept but
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Json`] if the JSON is malformed.
    pub fn from_json_str(json: &str) -> Result<Self, StoreError> {
        let listings: Vec<Listing> = serde_json::from_str(json)?;

        for problem in listings.iter().flat_map(integrity_problems) {
            log::warn!("{problem}");
        }

        Ok(Self { listings })
    }

    /// All listings in file order.
    #[must_use]
    pub fn all(&self) -> &[Listing] {
        &self.listings
    }

    /// Looks up a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] if no listing has that ID.
    pub fn get(&self, id: &str) -> Result<&Listing, StoreError> {
        self.listings
            .iter()
            .find(|l| l.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })
    }
}

/// Describes every way `listing` violates the marker invariants.
fn integrity_problems(listing: &Listing) -> Vec<String> {
    let mut problems = Vec::new();

    if listing.markers.len() > MAX_MARKERS {
        problems.push(format!(
            "Listing {} has {} markers (max {MAX_MARKERS})",
            listing.id,
            listing.markers.len()
        ));
    }

    for marker in &listing.markers {
        if marker.listing_id != listing.id {
            problems.push(format!(
                "Listing {} marker {} belongs to listing {}",
                listing.id, marker.id, marker.listing_id
            ));
        }
        if !marker.point().is_valid() {
            problems.push(format!(
                "Listing {} marker {} has out-of-range coordinates ({}, {})",
                listing.id, marker.id, marker.latitude, marker.longitude
            ));
        }
    }

    problems
}
