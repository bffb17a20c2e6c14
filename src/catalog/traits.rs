use super::item::{CatalogItem, MusicAction, SourceInfo};
use anyhow::Result;
use futures::future::BoxFuture;

/// Pending directory listing or search result.
///
/// May resolve late or never; the browse engine bounds every wait on it.
pub type CatalogFuture = BoxFuture<'static, Result<Vec<CatalogItem>>>;

/// The unified interface for any third-party catalog source 🎵
pub trait CatalogSource: Send + Sync {
    /// Name and searchability, if the source has connected far enough to say
    fn info(&self) -> Option<SourceInfo>;

    /// List the children of `folder`, or the root when `None`
    fn browse(&self, folder: Option<&CatalogItem>) -> CatalogFuture;

    fn search(&self, query: &str) -> CatalogFuture;

    fn is_supported_action(&self, _action: MusicAction) -> bool {
        false
    }

    /// Start playback of a playable entry
    fn play_song(&self, item: &CatalogItem) -> Result<()>;

    fn play_from_search(&self, _query: &str) -> Result<()> {
        Ok(())
    }
}
