use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Encoded artwork bytes attached to a catalog entry 🎨
///
/// Cloning is cheap, the bytes are shared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt(Arc<Vec<u8>>);

impl CoverArt {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Arc::new(bytes))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

// Only the size goes over the wire in logs and console dumps
impl Serialize for CoverArt {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.0.len() as u64)
    }
}

/// One browsable or playable node of the catalog (artist, album, playlist, track)
///
/// Equality is identity: two items are equal when their `id` matches, no matter
/// what artwork has been attached since. Use [`CatalogItem::same_metadata`] to
/// compare every field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub browseable: bool,
    #[serde(default)]
    pub playable: bool,
    #[serde(skip)]
    pub cover_art: Option<CoverArt>,
    #[serde(default)]
    pub queue_position: Option<u32>,
}

impl CatalogItem {
    /// A folder that can be browsed into
    pub fn folder(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            browseable: true,
            ..Default::default()
        }
    }

    /// A playable track
    pub fn track(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            playable: true,
            ..Default::default()
        }
    }

    pub fn with_subtitle(mut self, subtitle: &str) -> Self {
        self.subtitle = Some(subtitle.to_string());
        self
    }

    pub fn with_cover_art(mut self, art: CoverArt) -> Self {
        self.cover_art = Some(art);
        self
    }

    /// Field-by-field comparison, used to spot artwork that arrived after a row was drawn
    pub fn same_metadata(&self, other: &CatalogItem) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.subtitle == other.subtitle
            && self.browseable == other.browseable
            && self.playable == other.playable
            && self.cover_art == other.cover_art
            && self.queue_position == other.queue_position
    }
}

impl PartialEq for CatalogItem {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for CatalogItem {}

impl std::hash::Hash for CatalogItem {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Name and capabilities the catalog source advertises about itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SourceInfo {
    pub name: String,
    #[serde(default)]
    pub searchable: bool,
}

/// Optional actions a catalog source may support
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MusicAction {
    PlayFromSearch,
}
