//! Filter and search screens opened from a page's action list

use super::error::BrowseError;
use super::fetch::{await_pending, OnTimeout, TaskSlot, TaskTicket};
use super::lock;
use super::rows::{clean_text, filter_row, search_row, Sentinel};
use crate::app::config::BrowseConfig;
use crate::catalog::{CatalogItem, CatalogSource, MusicAction};
use crate::surface::InputSurface;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// What picking a suggestion amounts to
#[derive(Debug, Clone, PartialEq)]
pub enum InputOutcome {
    /// Navigate as if the entry was clicked in the list
    Selected(CatalogItem),
    /// Ask the source to play whatever matches the query
    PlayFromSearch { query: String },
    /// Nothing actionable under the cursor; stay in the input screen
    Rejected,
}

/// Suggestions for `input`: word-prefix matches first, then substring matches
pub fn filter_suggestions(
    items: &[CatalogItem],
    input: &str,
    max_results: usize,
) -> Vec<CatalogItem> {
    let needle = input.to_lowercase();
    // match on what the suggestion row shows, not the raw title
    let titles: Vec<String> = items
        .iter()
        .map(|i| clean_text(&i.title).to_lowercase())
        .collect();

    let word_prefix = items
        .iter()
        .zip(&titles)
        .filter(|(_, title)| title.split_whitespace().any(|w| w.starts_with(&needle)));
    let substring = items
        .iter()
        .zip(&titles)
        .filter(|(_, title)| title.contains(&needle));

    let mut results: Vec<CatalogItem> = Vec::new();
    for (item, _) in word_prefix.chain(substring) {
        if results.len() == max_results {
            break;
        }
        if !results.contains(item) {
            results.push(item.clone());
        }
    }
    results
}

/// Narrows the page's cached list as the user types
pub struct FilterSession {
    surface: Arc<dyn InputSurface>,
    max_results: usize,
    suggestions: Vec<CatalogItem>,
}

impl FilterSession {
    pub fn new(surface: Arc<dyn InputSurface>, max_results: usize) -> Self {
        Self {
            surface,
            max_results,
            suggestions: Vec::new(),
        }
    }

    fn on_entry(&mut self, input: &str, items: &[CatalogItem]) {
        self.suggestions = filter_suggestions(items, input, self.max_results);
        debug!("Filter \"{}\" matched {} entries", input, self.suggestions.len());
        self.surface
            .send_suggestions(self.suggestions.iter().map(filter_row).collect());
    }

    fn on_select(&self, index: usize) -> InputOutcome {
        match self.suggestions.get(index) {
            Some(item) => InputOutcome::Selected(item.clone()),
            None => InputOutcome::Rejected,
        }
    }
}

struct SearchShared {
    surface: Arc<dyn InputSurface>,
    catalog: Arc<dyn CatalogSource>,
    config: BrowseConfig,
    play_from_search: bool,
    suggestions: Mutex<Vec<CatalogItem>>,
}

impl SearchShared {
    /// Replace the suggestion list, prefixed with "Play from search" when supported
    fn publish(&self, items: Vec<CatalogItem>) -> Vec<CatalogItem> {
        let mut list = Vec::with_capacity(items.len() + 1);
        if self.play_from_search {
            list.push(Sentinel::PlayFromSearch.item());
        }
        list.extend(items);
        self.surface
            .send_suggestions(list.iter().map(search_row).collect());
        list
    }
}

async fn run_search(shared: Arc<SearchShared>, query: String, ticket: TaskTicket) {
    let timeout = shared.config.loading_timeout();
    let mut retries_left = shared.config.search_max_retries;
    loop {
        debug!("Searching for \"{}\"", query);
        let call = shared.catalog.search(&query);
        let results = match await_pending(call, timeout, |_| OnTimeout::GiveUp).await {
            Ok(results) => results,
            Err(BrowseError::FetchTimeout) if retries_left > 0 => {
                retries_left -= 1;
                debug!(
                    "Search for \"{}\" timed out, {} retries left",
                    query, retries_left
                );
                continue;
            }
            Err(e) => {
                warn!("Search for \"{}\" gave up: {}", query, e);
                Vec::new()
            }
        };
        debug!("Search for \"{}\" found {} results", query, results.len());

        let mut suggestions = lock(&shared.suggestions);
        if !ticket.is_current() {
            debug!("Discarding stale results for \"{}\"", query);
            return;
        }
        *suggestions = if results.is_empty() {
            shared.publish(vec![Sentinel::NoResults.item()])
        } else {
            shared.publish(results)
        };
        return;
    }
}

/// Queries the source as the user types, one request in flight at a time
pub struct SearchSession {
    shared: Arc<SearchShared>,
    input: String,
    task: TaskSlot,
}

impl SearchSession {
    pub fn new(
        surface: Arc<dyn InputSurface>,
        catalog: Arc<dyn CatalogSource>,
        config: BrowseConfig,
    ) -> Self {
        let play_from_search = catalog.is_supported_action(MusicAction::PlayFromSearch);
        Self {
            shared: Arc::new(SearchShared {
                surface,
                catalog,
                config,
                play_from_search,
                suggestions: Mutex::new(Vec::new()),
            }),
            input: String::new(),
            task: TaskSlot::new(),
        }
    }

    fn on_entry(&mut self, input: &str) {
        self.input = input.to_string();
        if input.chars().count() < self.shared.config.search_min_chars {
            return;
        }

        {
            let mut suggestions = lock(&self.shared.suggestions);
            self.task.cancel();
            *suggestions = self.shared.publish(vec![Sentinel::Searching.item()]);
        }

        let shared = Arc::clone(&self.shared);
        let query = self.input.clone();
        self.task
            .spawn(move |ticket| run_search(shared, query, ticket));
    }

    fn on_select(&self, index: usize) -> InputOutcome {
        let picked = lock(&self.shared.suggestions).get(index).cloned();
        let Some(item) = picked else {
            return InputOutcome::Rejected;
        };
        match Sentinel::of(&item) {
            None => InputOutcome::Selected(item),
            Some(sentinel) if sentinel.is_inert() => {
                debug!("Ignoring selection of \"{}\"", item.title);
                self.shared.surface.reset_suggestion_cursor();
                InputOutcome::Rejected
            }
            Some(_) => {
                info!("Playing from search \"{}\"", self.input);
                InputOutcome::PlayFromSearch {
                    query: self.input.clone(),
                }
            }
        }
    }
}

/// The input screen currently open on a page
pub enum InputSession {
    Filter(FilterSession),
    Search(SearchSession),
}

impl InputSession {
    /// The text in the input field changed
    pub fn on_entry(&mut self, input: &str, items: &[CatalogItem]) {
        match self {
            InputSession::Filter(filter) => filter.on_entry(input, items),
            InputSession::Search(search) => search.on_entry(input),
        }
    }

    pub fn on_select(&mut self, index: usize) -> InputOutcome {
        match self {
            InputSession::Filter(filter) => filter.on_select(index),
            InputSession::Search(search) => search.on_select(index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Deferred, MockCatalog, MockResponse};
    use crate::surface::RecordingInput;
    use std::time::Duration;

    fn titles(items: &[CatalogItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_filter_ranks_word_prefix_first() {
        let items = vec![
            CatalogItem::track("1", "Also Sprach"),
            CatalogItem::track("2", "Person"),
            CatalogItem::track("3", "Soul"),
            CatalogItem::track("4", "Big Soul"),
        ];
        let ranked = filter_suggestions(&items, "so", 15);
        assert_eq!(titles(&ranked), vec!["Soul", "Big Soul", "Also Sprach", "Person"]);
    }

    #[test]
    fn test_filter_is_case_insensitive_and_capped() {
        let items: Vec<CatalogItem> = (0..40)
            .map(|i| CatalogItem::track(&i.to_string(), &format!("MATCH {}", i)))
            .collect();
        let ranked = filter_suggestions(&items, "match", 15);
        assert_eq!(ranked.len(), 15);
        assert_eq!(ranked[0].title, "MATCH 0");
    }

    #[test]
    fn test_filter_dedup_keeps_room_for_later_matches() {
        // every prefix hit is also a substring hit; the cap counts distinct entries
        let mut items: Vec<CatalogItem> = (0..10)
            .map(|i| CatalogItem::track(&format!("p{}", i), &format!("Rock {}", i)))
            .collect();
        items.extend((0..10).map(|i| CatalogItem::track(&format!("s{}", i), &format!("Hardrock {}", i))));
        let ranked = filter_suggestions(&items, "rock", 15);
        assert_eq!(ranked.len(), 15);
        assert_eq!(ranked[10].id, "s0");
    }

    #[test]
    fn test_filter_session_selects_by_index() {
        let surface = Arc::new(RecordingInput::new());
        let items = vec![
            CatalogItem::track("1", "Soul 🎷"),
            CatalogItem::track("2", "Jazz"),
        ];
        let mut session = InputSession::Filter(FilterSession::new(surface.clone(), 15));
        session.on_entry("so", &items);

        assert_eq!(surface.last_suggestions(), vec!["Soul"]);
        assert_eq!(session.on_select(0), InputOutcome::Selected(items[0].clone()));
        assert_eq!(session.on_select(1), InputOutcome::Rejected);
    }

    #[test]
    fn test_filter_matches_cleaned_title() {
        let items = vec![
            CatalogItem::track("1", "Bolso"),
            CatalogItem::track("2", "🎷Soul"),
        ];
        let ranked = filter_suggestions(&items, "so", 15);
        let rows: Vec<String> = ranked.iter().map(filter_row).collect();
        assert_eq!(rows, vec!["Soul", "Bolso"]);
    }

    #[test]
    fn test_filter_word_prefix_before_substring() {
        let items = vec![
            CatalogItem::track("1", "Song 1"),
            CatalogItem::track("2", "Bolso"),
            CatalogItem::track("3", "Soup"),
        ];
        assert_eq!(
            titles(&filter_suggestions(&items, "so", 15)),
            vec!["Song 1", "Soup", "Bolso"]
        );
    }

    fn search_session(catalog: Arc<MockCatalog>, surface: Arc<RecordingInput>) -> InputSession {
        InputSession::Search(SearchSession::new(surface, catalog, BrowseConfig::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_shows_results() {
        let catalog = Arc::new(MockCatalog::new().searchable(true).with_search(
            "abba",
            MockResponse::Ready(vec![CatalogItem::track("w", "Waterloo").with_subtitle("ABBA")]),
        ));
        let surface = Arc::new(RecordingInput::new());
        let mut session = search_session(catalog, surface.clone());

        session.on_entry("abba", &[]);
        assert_eq!(surface.last_suggestions(), vec!["Searching…"]);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(surface.last_suggestions(), vec!["Waterloo\nABBA"]);
        assert!(matches!(session.on_select(0), InputOutcome::Selected(item) if item.id == "w"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_does_not_search() {
        let catalog = Arc::new(MockCatalog::new().searchable(true));
        let surface = Arc::new(RecordingInput::new());
        let mut session = search_session(catalog.clone(), surface.clone());

        session.on_entry("a", &[]);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(catalog.search_count(), 0);
        assert_eq!(surface.suggestion_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_retries_then_no_results() {
        let catalog = Arc::new(MockCatalog::new().searchable(true));
        catalog.set_search_fallback(MockResponse::Pending);
        let surface = Arc::new(RecordingInput::new());
        let mut session = search_session(catalog.clone(), surface.clone());

        session.on_entry("queen", &[]);
        tokio::time::sleep(Duration::from_millis(5900)).await;
        assert_eq!(surface.last_suggestions(), vec!["Searching…"]);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(catalog.search_count(), 3);
        assert_eq!(surface.last_suggestions(), vec!["No results"]);

        assert_eq!(session.on_select(0), InputOutcome::Rejected);
        assert_eq!(surface.cursor_resets(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_from_search_is_prepended() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_action(MusicAction::PlayFromSearch)
                .with_search("jazz", MockResponse::Ready(vec![CatalogItem::track("j", "So What")])),
        );
        let surface = Arc::new(RecordingInput::new());
        let mut session = search_session(catalog, surface.clone());

        session.on_entry("jazz", &[]);
        assert_eq!(surface.last_suggestions(), vec!["Play from search", "Searching…"]);
        assert_eq!(session.on_select(1), InputOutcome::Rejected);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(surface.last_suggestions(), vec!["Play from search", "So What"]);
        assert_eq!(
            session.on_select(0),
            InputOutcome::PlayFromSearch {
                query: "jazz".to_string()
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_keystroke_discards_older_results() {
        let slow = Deferred::new();
        let catalog = Arc::new(
            MockCatalog::new()
                .searchable(true)
                .with_search("be", MockResponse::Deferred(slow.clone()))
                .with_search("bee", MockResponse::Ready(vec![CatalogItem::track("g", "Gees")])),
        );
        let surface = Arc::new(RecordingInput::new());
        let mut session = search_session(catalog, surface.clone());

        session.on_entry("be", &[]);
        session.on_entry("bee", &[]);
        tokio::time::sleep(Duration::from_millis(1)).await;
        slow.complete(vec![CatalogItem::track("x", "Stale")]);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(surface.last_suggestions(), vec!["Gees"]);
    }
}
