//! One level of the catalog on one remote surface

use super::actions::{ActionContext, ActionMenu, BrowseAction};
use super::collapse::single_folder;
use super::error::BrowseError;
use super::fetch::{await_pending, OnTimeout, TaskSlot, TaskTicket};
use super::input::{FilterSession, InputOutcome, InputSession, SearchSession};
use super::lock;
use super::rows::{convert_row, Sentinel};
use crate::app::config::BrowseConfig;
use crate::catalog::{CatalogItem, CatalogSource, CoverArt, MusicAction};
use crate::surface::{FocusEvent, InputSurface, ListRow, ListSurface, ListWindow, SurfaceId};
use std::ops::Range;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Deepest folder the user has browsed to, kept current by the navigation stack
pub type JumpbackTarget = Arc<Mutex<Option<CatalogItem>>>;

/// Everything a page needs besides its own surface
#[derive(Clone)]
pub struct PageEnv {
    pub catalog: Arc<dyn CatalogSource>,
    pub jumpback: JumpbackTarget,
    pub config: BrowseConfig,
}

/// Where the page's list is in its lifecycle 📋
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Loaded,
    Empty,
}

struct PageState {
    folder: Option<CatalogItem>,
    load_state: LoadState,
    items: Vec<CatalogItem>,
    selected_index: usize,
    previously_selected: Option<CatalogItem>,
    collapse_depth: usize,
    /// Set while shown; pulls for a hidden page are dropped
    accepting_pulls: bool,
    visible_rows: Range<usize>,
    visible_rows_original: Vec<CatalogItem>,
}

impl PageState {
    fn list_height(&self) -> usize {
        match self.load_state {
            LoadState::Loaded => self.items.len(),
            _ => 1,
        }
    }
}

struct PageShared {
    origin: Option<CatalogItem>,
    state: Mutex<PageState>,
    surface: Arc<dyn ListSurface>,
    actions: ActionMenu,
    env: PageEnv,
}

impl PageShared {
    fn render_window(&self, st: &mut PageState, start: usize, count: usize) {
        let height = st.list_height();
        if start > height {
            debug!(
                "{}",
                BrowseError::StaleWindow {
                    start,
                    len: height
                }
            );
        }
        let from = start.min(height);
        let to = start.saturating_add(count).min(height);

        let rows: Vec<ListRow> = match st.load_state {
            LoadState::Loaded => {
                let max_len = self.env.config.row_line_max_length;
                let rows = st.items[from..to]
                    .iter()
                    .map(|item| convert_row(item, st.previously_selected.as_ref(), max_len))
                    .collect();
                st.visible_rows = from..to;
                st.visible_rows_original = st.items[from..to].to_vec();
                rows
            }
            LoadState::Empty => placeholder(Sentinel::Empty, from..to),
            LoadState::Idle | LoadState::Loading => placeholder(Sentinel::Loading, from..to),
        };

        self.surface.set_window(ListWindow {
            start,
            total_rows: height,
            rows,
        });
    }

    fn show_loading(&self, st: &mut PageState) {
        st.load_state = LoadState::Loading;
        self.surface.set_enabled(false);
        self.render_window(st, 0, self.env.config.initial_window_rows);
    }

    fn show_title(&self, st: &PageState) {
        let origin_title = match &self.origin {
            Some(folder) => folder.title.clone(),
            None => self
                .env
                .catalog
                .info()
                .map(|info| info.name)
                .unwrap_or_default(),
        };
        let folder_title = st.folder.as_ref().map(|f| f.title.as_str()).unwrap_or("");
        let title = match st.collapse_depth {
            0 => origin_title,
            1 => format!("{} / {}", origin_title, folder_title),
            _ => format!("{} /../ {}", origin_title, folder_title),
        };
        self.surface.set_title(&title);
    }

    /// Move the display cursor to the previous selection, or the top
    fn focus_previous(&self, st: &mut PageState) {
        let index = st
            .previously_selected
            .as_ref()
            .and_then(|prev| st.items.iter().position(|item| item == prev))
            .unwrap_or(0);
        st.selected_index = index;
        self.surface.raise_focus_event(FocusEvent {
            component_id: self.surface.list_component_id(),
            row_index: index,
        });
    }

    fn refresh_actions(&self) {
        let has_items = !lock(&self.state).items.is_empty();
        let catalog = &self.env.catalog;
        let ctx = ActionContext {
            at_root: self.origin.is_none(),
            searchable: catalog.info().is_some_and(|info| info.searchable),
            play_from_search: catalog.is_supported_action(MusicAction::PlayFromSearch),
            has_jumpback: lock(&self.env.jumpback).is_some(),
            has_items,
        };
        self.actions.refresh(&ctx, self.surface.as_ref());
    }
}

fn placeholder(sentinel: Sentinel, range: Range<usize>) -> Vec<ListRow> {
    range.map(|_| ListRow::text(sentinel.label())).collect()
}

/// Fetch the folder's children until they arrive, descending through single folders
async fn load(shared: Arc<PageShared>, ticket: TaskTicket) {
    let timeout = shared.env.config.loading_timeout();
    loop {
        let folder = {
            let st = lock(&shared.state);
            if !ticket.is_current() {
                return;
            }
            st.folder.clone()
        };
        let folder_id = folder.as_ref().map(|f| f.id.clone()).unwrap_or_default();
        debug!("Browsing \"{}\"", folder_id);

        let call = shared.env.catalog.browse(folder.as_ref());
        let items = match await_pending(call, timeout, |_| OnTimeout::GiveUp).await {
            Ok(items) => items,
            Err(BrowseError::FetchTimeout) => {
                debug!("Browsing \"{}\" timed out, retrying", folder_id);
                {
                    let mut st = lock(&shared.state);
                    if !ticket.is_current() {
                        return;
                    }
                    if st.items.is_empty() {
                        shared.show_loading(&mut st);
                    }
                }
                tokio::time::sleep(shared.env.config.retry_delay()).await;
                continue;
            }
            Err(e) => {
                warn!("Browsing \"{}\" failed: {}", folder_id, e);
                Vec::new()
            }
        };
        debug!("Browsing \"{}\" resulted in {} items", folder_id, items.len());

        let mut st = lock(&shared.state);
        if !ticket.is_current() {
            debug!("Discarding late listing of \"{}\"", folder_id);
            return;
        }

        if items.is_empty() {
            st.items.clear();
            st.load_state = LoadState::Empty;
            shared.surface.set_enabled(false);
            shared.render_window(&mut st, 0, shared.env.config.initial_window_rows);
            drop(st);
            shared.refresh_actions();
            return;
        }

        if let Some(next) = single_folder(&items) {
            // keep the loading row up and go one level deeper
            info!("Collapsing single folder \"{}\" into \"{}\"", folder_id, next.id);
            st.folder = Some(next.clone());
            st.collapse_depth += 1;
            shared.show_title(&st);
            continue;
        }

        st.items = items;
        st.load_state = LoadState::Loaded;
        shared.surface.set_enabled(true);
        shared.render_window(&mut st, 0, shared.env.config.initial_window_rows);
        shared.focus_previous(&mut st);
        drop(st);

        // having the list loaded may change the available actions
        shared.refresh_actions();
        return;
    }
}

/// One level of the browse hierarchy
///
/// Owns the asynchronously loaded list of a folder, serves window pulls from
/// its cache, keeps its action menu and any open filter/search session.
pub struct BrowsePage {
    shared: Arc<PageShared>,
    loader: TaskSlot,
    input: Option<InputSession>,
}

impl BrowsePage {
    pub fn new(
        folder: Option<CatalogItem>,
        previously_selected: Option<CatalogItem>,
        surface: Arc<dyn ListSurface>,
        env: PageEnv,
    ) -> Self {
        let state = PageState {
            folder: folder.clone(),
            load_state: LoadState::Idle,
            items: Vec::new(),
            selected_index: 0,
            previously_selected,
            collapse_depth: 0,
            accepting_pulls: false,
            visible_rows: 0..0,
            visible_rows_original: Vec::new(),
        };
        Self {
            shared: Arc::new(PageShared {
                origin: folder,
                state: Mutex::new(state),
                surface,
                actions: ActionMenu::new(),
                env,
            }),
            loader: TaskSlot::new(),
            input: None,
        }
    }

    /// Draw the page and load its list if there is nothing cached yet
    pub fn show(&mut self) {
        let shared = Arc::clone(&self.shared);
        let loaded = {
            let mut st = lock(&shared.state);
            st.accepting_pulls = true;
            shared.show_title(&st);
            st.load_state == LoadState::Loaded
        };
        shared.refresh_actions();

        if loaded {
            let mut st = lock(&shared.state);
            shared.surface.set_enabled(true);
            shared.render_window(&mut st, 0, shared.env.config.initial_window_rows);
            shared.focus_previous(&mut st);
            return;
        }

        {
            let mut st = lock(&shared.state);
            // Cancel under the page lock so a finishing loader can't apply after this point
            self.loader.cancel();
            shared.show_loading(&mut st);
        }
        self.loader.spawn(move |ticket| load(shared, ticket));
    }

    /// Stop loading and searching, and ignore pulls until shown again
    pub fn hide(&mut self) {
        let mut st = lock(&self.shared.state);
        st.accepting_pulls = false;
        self.loader.cancel();
        // dropping the session cancels its search
        self.input = None;
    }

    /// The display wants rows `[start, start + count)`
    pub fn on_window_requested(&self, start: usize, count: usize) {
        let mut st = lock(&self.shared.state);
        if !st.accepting_pulls {
            debug!("Ignoring pull {}+{} for a hidden page", start, count);
            return;
        }
        debug!(
            "Car requested more data, {}:{}",
            start,
            start.saturating_add(count)
        );
        self.shared.render_window(&mut st, start, count);
    }

    /// The display cursor moved onto `index`
    pub fn on_row_focused(&self, index: usize) {
        lock(&self.shared.state).selected_index = index;
    }

    /// The entry under a clicked row, remembered as this page's selection
    pub fn on_row_clicked(&self, index: usize) -> Option<CatalogItem> {
        let mut st = lock(&self.shared.state);
        let entry = match st.load_state {
            LoadState::Loaded => st.items.get(index).cloned(),
            _ => None,
        };
        match entry {
            Some(entry) => {
                info!("User selected browse entry {}", entry.id);
                st.previously_selected = Some(entry.clone());
                Some(entry)
            }
            None => {
                warn!(
                    "User selected index {} but the list is only {} long",
                    index,
                    st.items.len()
                );
                None
            }
        }
    }

    pub fn action_at(&self, index: usize) -> Option<BrowseAction> {
        self.shared.actions.get(index)
    }

    pub fn actions(&self) -> Vec<BrowseAction> {
        self.shared.actions.current()
    }

    /// Re-render the rows around the cursor if any visible entry changed since drawn
    pub fn redraw(&self) -> bool {
        let mut st = lock(&self.shared.state);
        if !st.accepting_pulls || st.load_state != LoadState::Loaded {
            return false;
        }
        let start = st.visible_rows.start;
        let changed = st
            .visible_rows_original
            .iter()
            .enumerate()
            .any(|(offset, original)| {
                st.items
                    .get(start + offset)
                    .map_or(true, |current| !current.same_metadata(original))
            });
        if changed {
            let rows = self.shared.env.config.redraw_window_rows;
            let from = st.selected_index.saturating_sub(rows / 2);
            self.shared.render_window(&mut st, from, rows);
        }
        changed
    }

    /// Attach artwork that arrived late, returns whether any cached entry took it
    pub fn attach_cover_art(&self, id: &str, art: &CoverArt) -> bool {
        let mut st = lock(&self.shared.state);
        let mut attached = false;
        for item in st.items.iter_mut().filter(|item| item.id == id) {
            item.cover_art = Some(art.clone());
            attached = true;
        }
        attached
    }

    pub fn start_filter(&mut self, surface: Arc<dyn InputSurface>) {
        let max_results = self.shared.env.config.filter_max_results;
        self.input = Some(InputSession::Filter(FilterSession::new(surface, max_results)));
    }

    pub fn start_search(&mut self, surface: Arc<dyn InputSurface>) {
        let session = SearchSession::new(
            surface,
            Arc::clone(&self.shared.env.catalog),
            self.shared.env.config.clone(),
        );
        self.input = Some(InputSession::Search(session));
    }

    pub fn close_input(&mut self) {
        self.input = None;
    }

    pub fn input(&self) -> Option<&InputSession> {
        self.input.as_ref()
    }

    /// New text in the input screen
    pub fn input_entry(&mut self, text: &str) {
        let items = self.items();
        if let Some(session) = self.input.as_mut() {
            session.on_entry(text, &items);
        }
    }

    /// A suggestion was picked; real entries become this page's selection
    pub fn input_select(&mut self, index: usize) -> InputOutcome {
        let outcome = match self.input.as_mut() {
            Some(session) => session.on_select(index),
            None => InputOutcome::Rejected,
        };
        if let InputOutcome::Selected(item) = &outcome {
            self.set_previously_selected(Some(item.clone()));
        }
        outcome
    }

    pub fn surface_id(&self) -> SurfaceId {
        self.shared.surface.id()
    }

    /// Folder the page was opened for
    pub fn origin(&self) -> Option<&CatalogItem> {
        self.shared.origin.as_ref()
    }

    /// Folder actually listed, deeper than `origin` after collapsing
    pub fn folder(&self) -> Option<CatalogItem> {
        lock(&self.shared.state).folder.clone()
    }

    pub fn load_state(&self) -> LoadState {
        lock(&self.shared.state).load_state
    }

    pub fn items(&self) -> Vec<CatalogItem> {
        lock(&self.shared.state).items.clone()
    }

    pub fn collapse_depth(&self) -> usize {
        lock(&self.shared.state).collapse_depth
    }

    pub fn selected_index(&self) -> usize {
        lock(&self.shared.state).selected_index
    }

    pub fn previously_selected(&self) -> Option<CatalogItem> {
        lock(&self.shared.state).previously_selected.clone()
    }

    pub fn set_previously_selected(&self, item: Option<CatalogItem>) {
        lock(&self.shared.state).previously_selected = item;
    }

    pub fn is_shown(&self) -> bool {
        lock(&self.shared.state).accepting_pulls
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_running()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Deferred, MockCatalog, MockResponse};
    use crate::surface::{RecordingSurface, RowImage};
    use std::time::Duration;

    fn env(catalog: Arc<MockCatalog>) -> PageEnv {
        PageEnv {
            catalog,
            jumpback: Arc::new(Mutex::new(None)),
            config: BrowseConfig::default(),
        }
    }

    fn tracks(n: usize) -> Vec<CatalogItem> {
        (0..n)
            .map(|i| CatalogItem::track(&format!("t{}", i), &format!("Song {}", i)))
            .collect()
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(1)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_then_loaded() {
        let deferred = Deferred::new();
        let catalog = Arc::new(
            MockCatalog::new().with_folder(None, MockResponse::Deferred(deferred.clone())),
        );
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        assert_eq!(page.load_state(), LoadState::Loading);
        assert_eq!(surface.enabled(), Some(false));
        assert_eq!(surface.total_rows(), Some(1));
        assert_eq!(surface.last_rows(), vec!["Loading…"]);
        assert_eq!(surface.title().as_deref(), Some("Mock"));

        deferred.complete(vec![
            CatalogItem::folder("f1", "Folder"),
            CatalogItem::folder("f2", "Folder2"),
            CatalogItem::track("t1", "File1"),
        ]);
        settle().await;

        assert_eq!(page.load_state(), LoadState::Loaded);
        assert_eq!(surface.enabled(), Some(true));
        assert_eq!(surface.total_rows(), Some(3));
        assert_eq!(surface.last_rows(), vec!["Folder", "Folder2", "File1"]);
        assert_eq!(surface.focus_events().last().map(|e| e.row_index), Some(0));
        assert_eq!(surface.actions(), vec!["Filter"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_listing() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(vec![])));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;

        assert_eq!(page.load_state(), LoadState::Empty);
        assert_eq!(surface.enabled(), Some(false));
        assert_eq!(surface.last_rows(), vec!["No items"]);
        assert_eq!(surface.total_rows(), Some(1));
        assert!(surface.actions().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_renders_empty() {
        let catalog = Arc::new(
            MockCatalog::new().with_folder(None, MockResponse::Failure("offline".into())),
        );
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;

        assert_eq!(page.load_state(), LoadState::Empty);
        assert_eq!(surface.last_rows(), vec!["No items"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_retries_until_navigated_away() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Pending));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog.clone()));

        page.show();
        // three full rounds of 2s + 100ms delay
        tokio::time::sleep(Duration::from_millis(6400)).await;
        assert!(catalog.browse_count(None) >= 3);
        assert_eq!(page.load_state(), LoadState::Loading);
        assert_eq!(surface.last_rows(), vec!["Loading…"]);

        page.hide();
        let calls = catalog.browse_count(None);
        tokio::time::sleep(Duration::from_millis(10_000)).await;
        assert_eq!(catalog.browse_count(None), calls);
        assert!(!page.is_loading());
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_then_success_on_reissue() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Pending));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog.clone()));

        page.show();
        tokio::time::sleep(Duration::from_millis(2050)).await;
        catalog.set_folder(None, MockResponse::Ready(tracks(2)));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(page.load_state(), LoadState::Loaded);
        assert_eq!(surface.last_rows(), vec!["Song 0", "Song 1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collapses_single_folder() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_folder(
                    Some("artist"),
                    MockResponse::Ready(vec![
                        CatalogItem::track("all", "Play All"),
                        CatalogItem::track("shuffle", "Shuffle"),
                        CatalogItem::folder("albums", "Albums"),
                    ]),
                )
                .with_folder(Some("albums"), MockResponse::Ready(tracks(4))),
        );
        let surface = Arc::new(RecordingSurface::new(12, 63));
        let artist = CatalogItem::folder("artist", "Artist");
        let mut page = BrowsePage::new(Some(artist.clone()), None, surface.clone(), env(catalog));

        page.show();
        settle().await;

        assert_eq!(page.collapse_depth(), 1);
        assert_eq!(page.folder().map(|f| f.id), Some("albums".to_string()));
        assert_eq!(page.origin(), Some(&artist));
        assert_eq!(surface.total_rows(), Some(4));
        assert_eq!(surface.title().as_deref(), Some("Artist / Albums"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_folder_then_track_renders_both() {
        let catalog = Arc::new(MockCatalog::new().with_folder(
            None,
            MockResponse::Ready(vec![
                CatalogItem::folder("f", "Folder"),
                CatalogItem::track("t", "Track"),
            ]),
        ));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;

        assert_eq!(page.collapse_depth(), 0);
        assert_eq!(surface.total_rows(), Some(2));
        let window = surface.last_window().unwrap();
        assert_eq!(window.rows[0].image, RowImage::Folder);
        assert_eq!(window.rows[1].image, RowImage::Track);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deep_collapse_title() {
        let catalog = Arc::new(
            MockCatalog::new()
                .with_folder(Some("a"), MockResponse::Ready(vec![CatalogItem::folder("b", "B")]))
                .with_folder(Some("b"), MockResponse::Ready(vec![CatalogItem::folder("c", "C")]))
                .with_folder(Some("c"), MockResponse::Ready(tracks(2))),
        );
        let surface = Arc::new(RecordingSurface::new(12, 63));
        let mut page = BrowsePage::new(
            Some(CatalogItem::folder("a", "A")),
            None,
            surface.clone(),
            env(catalog),
        );

        page.show();
        settle().await;

        assert_eq!(page.collapse_depth(), 2);
        assert_eq!(surface.title().as_deref(), Some("A /../ C"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_window_pulls_are_exact_and_clamped() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(tracks(30))));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;
        // proactive first push
        assert_eq!(surface.last_window().unwrap().rows.len(), 20);

        page.on_window_requested(25, 10);
        let window = surface.last_window().unwrap();
        assert_eq!(window.start, 25);
        assert_eq!(window.total_rows, 30);
        assert_eq!(
            surface.last_rows(),
            vec!["Song 25", "Song 26", "Song 27", "Song 28", "Song 29"]
        );

        page.on_window_requested(40, 5);
        assert!(surface.last_window().unwrap().rows.is_empty());
        assert_eq!(surface.total_rows(), Some(30));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extreme_pull_with_debug_logging() {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(tracks(3))));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;
        page.on_window_requested(usize::MAX - 1, 10);

        let window = surface.last_window().unwrap();
        assert_eq!(window.start, usize::MAX - 1);
        assert_eq!(window.total_rows, 3);
        assert!(window.rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pulls_ignored_after_hide() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(tracks(3))));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;
        page.hide();
        let before = surface.window_count();
        page.on_window_requested(0, 10);
        assert_eq!(surface.window_count(), before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hidden_page_discards_late_result() {
        let deferred = Deferred::new();
        let catalog = Arc::new(
            MockCatalog::new().with_folder(None, MockResponse::Deferred(deferred.clone())),
        );
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        page.hide();
        deferred.complete(tracks(3));
        settle().await;

        assert_eq!(page.load_state(), LoadState::Loading);
        assert!(page.items().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_reshow_uses_cache_and_restores_focus() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(tracks(5))));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog.clone()));

        page.show();
        settle().await;
        let clicked = page.on_row_clicked(3).unwrap();
        assert_eq!(clicked.id, "t3");
        page.hide();

        page.show();
        assert_eq!(catalog.browse_count(None), 1);
        assert_eq!(surface.total_rows(), Some(5));
        assert_eq!(surface.focus_events().last().map(|e| e.row_index), Some(3));
        let window = surface.last_window().unwrap();
        assert!(window.rows[3].checkmark);
        assert!(!window.rows[0].checkmark);
    }

    #[tokio::test(start_paused = true)]
    async fn test_click_out_of_range_or_while_loading() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Pending));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface, env(catalog));

        page.show();
        assert!(page.on_row_clicked(0).is_none());
        assert!(page.previously_selected().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_redraw_after_artwork_arrives() {
        let catalog = Arc::new(MockCatalog::new().with_folder(None, MockResponse::Ready(tracks(30))));
        let surface = Arc::new(RecordingSurface::new(11, 51));
        let mut page = BrowsePage::new(None, None, surface.clone(), env(catalog));

        page.show();
        settle().await;
        page.on_window_requested(0, 10);
        page.on_row_focused(6);

        // nothing changed yet
        assert!(!page.redraw());

        let art = CoverArt::new(vec![1, 2, 3]);
        assert!(page.attach_cover_art("t5", &art));
        assert!(page.redraw());

        let window = surface.last_window().unwrap();
        assert_eq!(window.start, 2);
        assert_eq!(window.rows.len(), 8);
        assert_eq!(window.rows[3].image, RowImage::CoverArt(art));
        // identity is unchanged by artwork
        assert_eq!(page.items()[5], CatalogItem::track("t5", "Song 5"));
    }
}
