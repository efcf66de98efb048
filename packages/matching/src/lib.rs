#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Match suggestions between lost and found listings.
//!
//! [`similarity`] scores free text with a term-frequency cosine measure;
//! [`suggest`] combines that score with geofence overlap to rank the found
//! listings a lost item might be (and vice versa).

pub mod similarity;
pub mod suggest;

pub use similarity::{cosine_similarity, tokenize};
pub use suggest::{MatchOptions, MatchSuggestion, is_counterpart, suggest_matches};
