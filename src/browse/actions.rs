use crate::surface::ListSurface;
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// Entries of a page's side list 🎛️
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrowseAction {
    Jumpback,
    Filter,
    Search,
}

impl BrowseAction {
    pub fn label(self) -> &'static str {
        match self {
            BrowseAction::Jumpback => "Jump back",
            BrowseAction::Filter => "Filter",
            BrowseAction::Search => "Search",
        }
    }
}

impl fmt::Display for BrowseAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Facts the action list depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionContext {
    pub at_root: bool,
    pub searchable: bool,
    pub play_from_search: bool,
    pub has_jumpback: bool,
    pub has_items: bool,
}

/// Actions valid for a page, each rule gating only its own entry
pub fn compute_actions(ctx: &ActionContext) -> Vec<BrowseAction> {
    let mut actions = Vec::new();
    if ctx.at_root && (ctx.searchable || ctx.play_from_search) {
        actions.push(BrowseAction::Search);
    }
    if ctx.at_root && ctx.has_jumpback {
        actions.push(BrowseAction::Jumpback);
    }
    if ctx.has_items {
        actions.push(BrowseAction::Filter);
    }
    actions
}

/// The action list of one page.
///
/// Rebuilt from the dispatch thread and from the page's loader task, so every
/// rebuild and lookup happens under one lock.
#[derive(Debug, Default)]
pub struct ActionMenu {
    actions: Mutex<Vec<BrowseAction>>,
}

impl ActionMenu {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the list and push it to the surface
    pub fn refresh(&self, ctx: &ActionContext, surface: &dyn ListSurface) {
        let mut actions = self.actions.lock().unwrap_or_else(PoisonError::into_inner);
        *actions = compute_actions(ctx);
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        surface.set_actions(&labels);
    }

    pub fn get(&self, index: usize) -> Option<BrowseAction> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .copied()
    }

    pub fn current(&self) -> Vec<BrowseAction> {
        self.actions
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;

    #[test]
    fn test_root_with_everything() {
        let ctx = ActionContext {
            at_root: true,
            searchable: true,
            play_from_search: false,
            has_jumpback: true,
            has_items: true,
        };
        assert_eq!(
            compute_actions(&ctx),
            vec![BrowseAction::Search, BrowseAction::Jumpback, BrowseAction::Filter]
        );
    }

    #[test]
    fn test_play_from_search_alone_enables_search() {
        let ctx = ActionContext {
            at_root: true,
            play_from_search: true,
            ..Default::default()
        };
        assert_eq!(compute_actions(&ctx), vec![BrowseAction::Search]);
    }

    #[test]
    fn test_subfolder_only_filters() {
        let ctx = ActionContext {
            at_root: false,
            searchable: true,
            has_jumpback: true,
            has_items: true,
            ..Default::default()
        };
        assert_eq!(compute_actions(&ctx), vec![BrowseAction::Filter]);
    }

    #[test]
    fn test_empty_page_has_no_filter() {
        assert!(compute_actions(&ActionContext::default()).is_empty());
    }

    #[test]
    fn test_menu_pushes_labels() {
        let surface = RecordingSurface::new(11, 51);
        let menu = ActionMenu::new();
        menu.refresh(
            &ActionContext {
                at_root: true,
                searchable: true,
                has_items: true,
                ..Default::default()
            },
            &surface,
        );
        assert_eq!(surface.actions(), vec!["Search", "Filter"]);
        assert_eq!(menu.get(1), Some(BrowseAction::Filter));
        assert_eq!(menu.get(2), None);
    }
}
