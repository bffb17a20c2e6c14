//! Failure modes of the browse engine
//!
//! None of these is ever shown to the user as text. Fetch problems degrade to a
//! sentinel row ("Loading…", "No items", "No results"), bad selections are
//! ignored, and window pulls past the end are clamped. They exist so callers
//! and logs can tell what happened.

use crate::surface::SurfaceId;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum BrowseError {
    /// The catalog did not answer within the loading timeout
    #[error("Catalog request timed out")]
    FetchTimeout,

    /// The catalog answered with an error, treated like an empty result
    #[error("Catalog request failed: {0}")]
    FetchFailed(String),

    /// A sentinel row or a row index past the list was selected
    #[error("Selection is not actionable")]
    InvalidSelection,

    /// The display asked for rows past the end of the current list
    #[error("Window starting at {start} is past the list end ({len})")]
    StaleWindow { start: usize, len: usize },

    #[error("No page is shown on surface {0}")]
    UnknownSurface(SurfaceId),

    #[error("Depth {depth} is outside the navigation stack ({len} pages)")]
    NoSuchDepth { depth: usize, len: usize },
}
