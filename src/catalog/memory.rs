use super::item::{CatalogItem, MusicAction, SourceInfo};
use super::traits::{CatalogFuture, CatalogSource};
use anyhow::{Context, Result};
use futures::FutureExt;
use fuzzy_matcher::{skim::SkimMatcherV2, FuzzyMatcher};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Duration;
use tracing::info;

const MAX_SEARCH_RESULTS: usize = 50;

/// Catalog file layout (TOML) 📂
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub source: SourceSection,
    #[serde(default)]
    pub entries: Vec<CatalogEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SourceSection {
    pub name: String,
    #[serde(default)]
    pub searchable: bool,
    #[serde(default)]
    pub play_from_search: bool,
    /// Artificial delay before every answer, to exercise timeouts
    #[serde(default)]
    pub latency_ms: u64,
}

#[derive(Debug, Deserialize)]
pub struct CatalogEntry {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub playable: bool,
    #[serde(default)]
    pub children: Vec<CatalogEntry>,
}

impl CatalogEntry {
    fn to_item(&self) -> CatalogItem {
        CatalogItem {
            id: self.id.clone(),
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            browseable: !self.children.is_empty(),
            playable: self.playable || self.children.is_empty(),
            cover_art: None,
            queue_position: None,
        }
    }
}

/// In-memory catalog loaded from a TOML file, searched with fuzzy matching
pub struct MemoryCatalog {
    info: SourceInfo,
    play_from_search: bool,
    latency: Duration,
    root: Vec<CatalogItem>,
    children: HashMap<String, Vec<CatalogItem>>,
    all: Vec<CatalogItem>,
    pub now_playing: Mutex<Option<CatalogItem>>,
}

impl MemoryCatalog {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content).context("Invalid catalog file")?;
        Ok(Self::from_file(file))
    }

    pub fn from_file(file: CatalogFile) -> Self {
        let mut children = HashMap::new();
        let mut all = Vec::new();
        let root = file.entries.iter().map(CatalogEntry::to_item).collect();
        for entry in &file.entries {
            Self::index(entry, &mut children, &mut all);
        }

        Self {
            info: SourceInfo {
                name: file.source.name,
                searchable: file.source.searchable,
            },
            play_from_search: file.source.play_from_search,
            latency: Duration::from_millis(file.source.latency_ms),
            root,
            children,
            all,
            now_playing: Mutex::new(None),
        }
    }

    fn index(
        entry: &CatalogEntry,
        children: &mut HashMap<String, Vec<CatalogItem>>,
        all: &mut Vec<CatalogItem>,
    ) {
        all.push(entry.to_item());
        if !entry.children.is_empty() {
            children.insert(
                entry.id.clone(),
                entry.children.iter().map(CatalogEntry::to_item).collect(),
            );
            for child in &entry.children {
                Self::index(child, children, all);
            }
        }
    }

    fn delayed(&self, items: Vec<CatalogItem>) -> CatalogFuture {
        let latency = self.latency;
        async move {
            if !latency.is_zero() {
                tokio::time::sleep(latency).await;
            }
            Ok::<_, anyhow::Error>(items)
        }
        .boxed()
    }
}

impl CatalogSource for MemoryCatalog {
    fn info(&self) -> Option<SourceInfo> {
        Some(self.info.clone())
    }

    fn browse(&self, folder: Option<&CatalogItem>) -> CatalogFuture {
        let items = match folder {
            None => self.root.clone(),
            Some(f) => self.children.get(&f.id).cloned().unwrap_or_default(),
        };
        self.delayed(items)
    }

    fn search(&self, query: &str) -> CatalogFuture {
        let matcher = SkimMatcherV2::default();
        // Fuzzy Match 🔍
        let mut matched: Vec<(i64, &CatalogItem)> = self
            .all
            .iter()
            .filter_map(|item| {
                let text = format!(
                    "{} {}",
                    item.title,
                    item.subtitle.as_deref().unwrap_or("")
                );
                matcher.fuzzy_match(&text, query).map(|score| (score, item))
            })
            .collect();

        // Sort by score (descending)
        matched.sort_by(|a, b| b.0.cmp(&a.0));

        let results = matched
            .into_iter()
            .take(MAX_SEARCH_RESULTS)
            .map(|(_, item)| item.clone())
            .collect();
        self.delayed(results)
    }

    fn is_supported_action(&self, action: MusicAction) -> bool {
        action == MusicAction::PlayFromSearch && self.play_from_search
    }

    fn play_song(&self, item: &CatalogItem) -> Result<()> {
        info!("Playing {} ({})", item.title, item.id);
        let mut now_playing = self
            .now_playing
            .lock()
            .map_err(|_| anyhow::anyhow!("now playing mutex poisoned"))?;
        *now_playing = Some(item.clone());
        Ok(())
    }

    fn play_from_search(&self, query: &str) -> Result<()> {
        info!("Playing from search \"{}\"", query);
        Ok(())
    }
}
