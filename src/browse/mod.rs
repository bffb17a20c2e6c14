//! Paged catalog browsing for a remote list display 🚗
//!
//! A [`NavigationStack`] of [`BrowsePage`]s, one per folder level, each
//! loading its list in the background and answering the display's window
//! pulls from cache.

pub mod actions;
pub mod collapse;
pub mod error;
pub mod fetch;
pub mod input;
pub mod navigation;
pub mod page;
pub mod rows;

pub use actions::{ActionMenu, BrowseAction};
pub use error::BrowseError;
pub use input::{InputOutcome, InputSession};
pub use navigation::{NavTarget, NavigationStack};
pub use page::{BrowsePage, LoadState};
pub use rows::Sentinel;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock page state, recovering it if a holder panicked; it is never left half-written
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
