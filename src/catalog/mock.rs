use super::item::{CatalogItem, MusicAction, SourceInfo};
use super::traits::{CatalogFuture, CatalogSource};
use crate::browse::lock;
use anyhow::Result;
use futures::FutureExt;
use std::{collections::HashMap, sync::Arc, sync::Mutex};
use tokio::sync::watch;

/// A catalog result that the test completes later
#[derive(Clone)]
pub struct Deferred {
    tx: Arc<watch::Sender<Option<Vec<CatalogItem>>>>,
}

impl Default for Deferred {
    fn default() -> Self {
        Self::new()
    }
}

impl Deferred {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn complete(&self, items: Vec<CatalogItem>) {
        self.tx.send_replace(Some(items));
    }

    fn wait(&self) -> CatalogFuture {
        let mut rx = self.tx.subscribe();
        async move {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(items) = current {
                    return Ok(items);
                }
                if rx.changed().await.is_err() {
                    return Err(anyhow::anyhow!("deferred result dropped"));
                }
            }
        }
        .boxed()
    }
}

/// How the mock answers one browse or search request
#[derive(Clone)]
pub enum MockResponse {
    Ready(Vec<CatalogItem>),
    /// Never resolves
    Pending,
    Failure(String),
    Deferred(Deferred),
}

impl MockResponse {
    fn into_future(self) -> CatalogFuture {
        match self {
            MockResponse::Ready(items) => async move { Ok::<_, anyhow::Error>(items) }.boxed(),
            MockResponse::Pending => futures::future::pending::<Result<Vec<CatalogItem>>>().boxed(),
            MockResponse::Failure(msg) => async move { Err::<Vec<CatalogItem>, _>(anyhow::anyhow!(msg)) }.boxed(),
            MockResponse::Deferred(deferred) => deferred.wait(),
        }
    }
}

/// Scriptable catalog for tests, records every call it receives
pub struct MockCatalog {
    pub info: Option<SourceInfo>,
    pub supported_actions: Vec<MusicAction>,
    /// Keyed by folder id, `None` is the root
    pub browse_responses: Mutex<HashMap<Option<String>, MockResponse>>,
    pub search_responses: Mutex<HashMap<String, MockResponse>>,
    pub search_fallback: Mutex<MockResponse>,
    pub browse_calls: Mutex<Vec<Option<String>>>,
    pub search_calls: Mutex<Vec<String>>,
    pub played: Mutex<Vec<CatalogItem>>,
    pub played_from_search: Mutex<Vec<String>>,
}

impl Default for MockCatalog {
    fn default() -> Self {
        Self {
            info: Some(SourceInfo {
                name: "Mock".to_string(),
                searchable: false,
            }),
            supported_actions: Vec::new(),
            browse_responses: Mutex::new(HashMap::new()),
            search_responses: Mutex::new(HashMap::new()),
            search_fallback: Mutex::new(MockResponse::Ready(Vec::new())),
            browse_calls: Mutex::new(Vec::new()),
            search_calls: Mutex::new(Vec::new()),
            played: Mutex::new(Vec::new()),
            played_from_search: Mutex::new(Vec::new()),
        }
    }
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn searchable(mut self, searchable: bool) -> Self {
        if let Some(info) = self.info.as_mut() {
            info.searchable = searchable;
        }
        self
    }

    pub fn with_action(mut self, action: MusicAction) -> Self {
        self.supported_actions.push(action);
        self
    }

    pub fn with_folder(self, folder_id: Option<&str>, response: MockResponse) -> Self {
        self.set_folder(folder_id, response);
        self
    }

    pub fn with_search(self, query: &str, response: MockResponse) -> Self {
        lock(&self.search_responses).insert(query.to_string(), response);
        self
    }

    pub fn set_folder(&self, folder_id: Option<&str>, response: MockResponse) {
        lock(&self.browse_responses).insert(folder_id.map(str::to_string), response);
    }

    pub fn set_search_fallback(&self, response: MockResponse) {
        *lock(&self.search_fallback) = response;
    }

    pub fn browse_count(&self, folder_id: Option<&str>) -> usize {
        let key = folder_id.map(str::to_string);
        lock(&self.browse_calls)
            .iter()
            .filter(|c| **c == key)
            .count()
    }

    pub fn search_count(&self) -> usize {
        lock(&self.search_calls).len()
    }
}

impl CatalogSource for MockCatalog {
    fn info(&self) -> Option<SourceInfo> {
        self.info.clone()
    }

    fn browse(&self, folder: Option<&CatalogItem>) -> CatalogFuture {
        let key = folder.map(|f| f.id.clone());
        lock(&self.browse_calls).push(key.clone());
        let response = lock(&self.browse_responses)
            .get(&key)
            .cloned()
            .unwrap_or(MockResponse::Ready(Vec::new()));
        response.into_future()
    }

    fn search(&self, query: &str) -> CatalogFuture {
        lock(&self.search_calls).push(query.to_string());
        let response = lock(&self.search_responses)
            .get(query)
            .cloned()
            .unwrap_or_else(|| lock(&self.search_fallback).clone());
        response.into_future()
    }

    fn is_supported_action(&self, action: MusicAction) -> bool {
        self.supported_actions.contains(&action)
    }

    fn play_song(&self, item: &CatalogItem) -> Result<()> {
        lock(&self.played).push(item.clone());
        Ok(())
    }

    fn play_from_search(&self, query: &str) -> Result<()> {
        lock(&self.played_from_search).push(query.to_string());
        Ok(())
    }
}
