#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the lost-and-found listing tools.
//!
//! Loads a JSON export of listings and runs searches, distance and overlap
//! checks, map centering, text similarity, and match suggestions against it.

mod store;

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use lost_found_config::Config;
use lost_found_listing_models::GeoPoint;
use lost_found_search_models::SearchQueryParams;
use lost_found_spatial::{
    average_marker_location, haversine_distance_meters, listings_overlap,
    nearest_marker_distance,
};

use crate::store::ListingStore;

// ---------------------------------------------------------------------------
// CLI definitions
// ---------------------------------------------------------------------------

/// Search and match lost-and-found listings.
#[derive(Parser)]
#[command(name = "lost_found")]
#[command(about = "Search and match lost-and-found listings")]
struct Cli {
    /// Path to a TOML config file (defaults to `$LOST_FOUND_CONFIG`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Path to a JSON array of listings.
    #[arg(long, global = true, default_value = "data/listings.json")]
    listings: PathBuf,

    /// Subcommand to execute.
    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Filter and sort listings, printing the result as JSON.
    Search(SearchArgs),

    /// Great-circle distance in meters between two points.
    Distance {
        #[arg(allow_negative_numbers = true)]
        lat1: f64,
        #[arg(allow_negative_numbers = true)]
        lng1: f64,
        #[arg(allow_negative_numbers = true)]
        lat2: f64,
        #[arg(allow_negative_numbers = true)]
        lng2: f64,
    },

    /// Check whether any markers of two listings overlap.
    Overlap {
        listing_a: String,
        listing_b: String,

        /// Buffer in meters added around each marker (default from config).
        #[arg(long)]
        buffer: Option<f64>,
    },

    /// Average marker location of a listing, for centering a map.
    Centroid { listing_id: String },

    /// Cosine similarity between two texts.
    Similarity { text1: String, text2: String },

    /// Ranked match suggestions for a listing, as JSON.
    Matches { listing_id: String },
}

/// Filter flags for the `search` subcommand.
#[derive(Args)]
struct SearchArgs {
    /// Case-insensitive substring of title or description.
    #[arg(long)]
    keyword: Option<String>,

    /// `all`, `lost`, or `found`.
    #[arg(long = "type")]
    listing_type: Option<String>,

    /// Exact category (e.g. "Bags").
    #[arg(long)]
    category: Option<String>,

    /// Exact status ("active", "resolved", "archived").
    #[arg(long)]
    status: Option<String>,

    /// Field to sort by (e.g. "createdAt", "title").
    #[arg(long)]
    sort_by: Option<String>,

    /// "ascending"/"asc" or "descending"/"desc".
    #[arg(long)]
    sort_order: Option<String>,

    /// Latitude of the search center.
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,

    /// Longitude of the search center.
    #[arg(long, allow_negative_numbers = true)]
    lng: Option<f64>,

    /// Search radius in meters (default from config).
    #[arg(long)]
    radius: Option<f64>,

    /// Display name of the search center.
    #[arg(long)]
    location_name: Option<String>,
}

impl From<SearchArgs> for SearchQueryParams {
    fn from(args: SearchArgs) -> Self {
        Self {
            keyword: args.keyword,
            listing_type: args.listing_type,
            category: args.category,
            status: args.status,
            sort_by: args.sort_by,
            sort_order: args.sort_order,
            location_name: args.location_name,
            lat: args.lat,
            lng: args.lng,
            radius: args.radius,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };

    match cli.command {
        Commands::Search(args) => cmd_search(&config, &cli.listings, args),
        Commands::Distance {
            lat1,
            lng1,
            lat2,
            lng2,
        } => {
            cmd_distance(GeoPoint::new(lat1, lng1), GeoPoint::new(lat2, lng2));
            Ok(())
        }
        Commands::Overlap {
            listing_a,
            listing_b,
            buffer,
        } => cmd_overlap(&config, &cli.listings, &listing_a, &listing_b, buffer),
        Commands::Centroid { listing_id } => cmd_centroid(&cli.listings, &listing_id),
        Commands::Similarity { text1, text2 } => {
            println!("{:.4}", lost_found_matching::cosine_similarity(&text1, &text2));
            Ok(())
        }
        Commands::Matches { listing_id } => cmd_matches(&config, &cli.listings, &listing_id),
    }
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Runs the filter pipeline and prints matching listings.
fn cmd_search(
    config: &Config,
    listings_path: &Path,
    args: SearchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let params = SearchQueryParams::from(args)
        .into_search_params(config.search.default_radius_meters)?;
    let store = ListingStore::load(listings_path)?;

    let results = lost_found_search::filter_and_sort(store.all(), &params);
    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

/// Prints the distance between two points.
fn cmd_distance(a: GeoPoint, b: GeoPoint) {
    for point in [a, b].iter().filter(|p| !p.is_valid()) {
        log::warn!("Coordinates out of range: ({}, {})", point.lat, point.lng);
    }
    println!("{:.1}", haversine_distance_meters(a, b));
}

/// Prints whether two listings have overlapping markers.
fn cmd_overlap(
    config: &Config,
    listings_path: &Path,
    listing_a: &str,
    listing_b: &str,
    buffer: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ListingStore::load(listings_path)?;
    let a = store.get(listing_a)?;
    let b = store.get(listing_b)?;
    let buffer = buffer.unwrap_or(config.matching.overlap_buffer_meters);

    let overlaps = listings_overlap(a, b, buffer);
    match nearest_marker_distance(a, b) {
        Some(distance) => println!("{overlaps} (nearest markers {distance:.1} m apart)"),
        None => println!("{overlaps} (at least one listing has no markers)"),
    }

    Ok(())
}

/// Prints the average marker location of a listing.
fn cmd_centroid(
    listings_path: &Path,
    listing_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ListingStore::load(listings_path)?;
    let listing = store.get(listing_id)?;

    match average_marker_location(listing) {
        Some(center) => println!("{:.6}, {:.6}", center.lat, center.lng),
        None => println!("none"),
    }

    Ok(())
}

/// Prints ranked match suggestions for a listing.
fn cmd_matches(
    config: &Config,
    listings_path: &Path,
    listing_id: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let store = ListingStore::load(listings_path)?;
    let listing = store.get(listing_id)?;

    let suggestions =
        lost_found_matching::suggest_matches(listing, store.all(), &config.match_options());
    log::info!(
        "Found {} match suggestions for {}",
        suggestions.len(),
        listing.id
    );
    println!("{}", serde_json::to_string_pretty(&suggestions)?);

    Ok(())
}
