use super::traits::{
    FocusEvent, InputSurface, ListProperty, ListSurface, ListWindow, SurfaceId,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Everything a page has pushed to a surface so far
#[derive(Debug, Default, Clone)]
pub struct SurfaceLog {
    pub title: Option<String>,
    pub actions: Vec<String>,
    pub windows: Vec<ListWindow>,
    pub enabled: Option<bool>,
    pub properties: HashMap<ListProperty, bool>,
    pub focus_events: Vec<FocusEvent>,
}

/// Surface that keeps every call, for tests and for inspecting a session
pub struct RecordingSurface {
    id: SurfaceId,
    component_id: u32,
    log: Mutex<SurfaceLog>,
}

impl RecordingSurface {
    pub fn new(id: SurfaceId, component_id: u32) -> Self {
        Self {
            id,
            component_id,
            log: Mutex::new(SurfaceLog::default()),
        }
    }

    fn log(&self) -> MutexGuard<'_, SurfaceLog> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> SurfaceLog {
        self.log().clone()
    }

    pub fn last_window(&self) -> Option<ListWindow> {
        self.log().windows.last().cloned()
    }

    /// Text of each row in the last window
    pub fn last_rows(&self) -> Vec<String> {
        self.last_window()
            .map(|w| w.rows.into_iter().map(|r| r.text).collect())
            .unwrap_or_default()
    }

    pub fn total_rows(&self) -> Option<usize> {
        self.last_window().map(|w| w.total_rows)
    }

    pub fn enabled(&self) -> Option<bool> {
        self.log().enabled
    }

    pub fn property(&self, property: ListProperty) -> Option<bool> {
        self.log().properties.get(&property).copied()
    }

    pub fn title(&self) -> Option<String> {
        self.log().title.clone()
    }

    pub fn actions(&self) -> Vec<String> {
        self.log().actions.clone()
    }

    pub fn focus_events(&self) -> Vec<FocusEvent> {
        self.log().focus_events.clone()
    }

    pub fn window_count(&self) -> usize {
        self.log().windows.len()
    }

    pub fn clear_windows(&self) {
        self.log().windows.clear();
    }
}

impl ListSurface for RecordingSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn list_component_id(&self) -> u32 {
        self.component_id
    }

    fn set_title(&self, title: &str) {
        self.log().title = Some(title.to_string());
    }

    fn set_actions(&self, actions: &[String]) {
        self.log().actions = actions.to_vec();
    }

    fn set_window(&self, window: ListWindow) {
        self.log().windows.push(window);
    }

    fn set_enabled(&self, enabled: bool) {
        self.log().enabled = Some(enabled);
    }

    fn set_property(&self, property: ListProperty, value: bool) {
        self.log().properties.insert(property, value);
    }

    fn raise_focus_event(&self, event: FocusEvent) {
        self.log().focus_events.push(event);
    }
}

/// Input screen that keeps every suggestion list it was sent
#[derive(Default)]
pub struct RecordingInput {
    suggestions: Mutex<Vec<Vec<String>>>,
    cursor_resets: Mutex<usize>,
}

impl RecordingInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_suggestions(&self) -> Vec<String> {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
            .unwrap_or_default()
    }

    pub fn suggestion_count(&self) -> usize {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn cursor_resets(&self) -> usize {
        *self
            .cursor_resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl InputSurface for RecordingInput {
    fn send_suggestions(&self, rows: Vec<String>) {
        self.suggestions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(rows);
    }

    fn reset_suggestion_cursor(&self) {
        *self
            .cursor_resets
            .lock()
            .unwrap_or_else(PoisonError::into_inner) += 1;
    }
}
