use crate::catalog::CoverArt;
use serde::Serialize;

/// Identifier of one remote page state (the car addresses focus events by it)
pub type SurfaceId = u32;

/// Leading image of a list row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum RowImage {
    None,
    CoverArt(CoverArt),
    Folder,
    Track,
}

/// One rendered row of the catalog list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListRow {
    pub checkmark: bool,
    pub image: RowImage,
    /// Title, plus `\n` and the subtitle when there is one
    pub text: String,
}

impl ListRow {
    /// Text-only row, used for the loading/empty placeholders
    pub fn text(text: &str) -> Self {
        Self {
            checkmark: false,
            image: RowImage::None,
            text: text.to_string(),
        }
    }
}

/// A slice of the list pushed to the display
///
/// `rows` covers `[start, start + rows.len())` of a list that is `total_rows` long.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListWindow {
    pub start: usize,
    pub total_rows: usize,
    pub rows: Vec<ListRow>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ListProperty {
    Visible,
    /// `false` asks the display to page the list dynamically
    Valid,
}

/// Moves the display's cursor onto a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FocusEvent {
    pub component_id: u32,
    pub row_index: usize,
}

/// The remote page a BrowsePage draws into.
///
/// The display pulls rows on demand; those pulls, row clicks and focus moves
/// arrive through the owning `NavigationStack`, this trait only carries output.
pub trait ListSurface: Send + Sync {
    fn id(&self) -> SurfaceId;
    fn list_component_id(&self) -> u32;
    fn set_title(&self, title: &str);
    /// Fill the small side list of page actions
    fn set_actions(&self, actions: &[String]);
    fn set_window(&self, window: ListWindow);
    fn set_enabled(&self, enabled: bool);
    fn set_property(&self, property: ListProperty, value: bool);
    fn raise_focus_event(&self, event: FocusEvent);
}

/// The text-entry screen with its suggestion list
pub trait InputSurface: Send + Sync {
    fn send_suggestions(&self, rows: Vec<String>);
    /// Put the suggestion cursor back on the first row
    fn reset_suggestion_cursor(&self);
}
