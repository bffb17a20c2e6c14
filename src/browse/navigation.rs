//! The stack of pages between the catalog root and the folder on screen
//!
//! Pages alternate between a fixed set of surfaces (page `i` draws on surface
//! `i % n`) so the page being left and the page being entered never share one.
//! The display reports focus moving between those surfaces; focus arriving on
//! the surface below the top page means the user went back.
//!
//! Two parallel records are kept:
//! - `location_stack` holds the folder of every page and always has exactly as
//!   many entries as `page_stack`.
//! - `trail` is the path the user last took. It outlives backing out, so going
//!   into the same folder again restores the selection marks further down,
//!   and it also records the last played entry.

use super::actions::BrowseAction;
use super::error::BrowseError;
use super::input::InputOutcome;
use super::lock;
use super::page::{BrowsePage, JumpbackTarget, PageEnv};
use crate::app::config::BrowseConfig;
use crate::catalog::{CatalogItem, CatalogSource, CoverArt};
use crate::surface::{InputSurface, ListProperty, ListSurface, SurfaceId};
use anyhow::{ensure, Result};
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Where the display should go after an event was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavTarget {
    /// Show the page drawn on this surface
    Page(SurfaceId),
    /// Something started playing
    Playback,
    /// Open the text input screen
    Input,
    /// Nothing to do
    Stay,
}

pub struct NavigationStack {
    surfaces: Vec<Arc<dyn ListSurface>>,
    input_surface: Arc<dyn InputSurface>,
    env: PageEnv,
    page_stack: Vec<BrowsePage>,
    location_stack: Vec<Option<CatalogItem>>,
    trail: Vec<Option<CatalogItem>>,
}

impl NavigationStack {
    /// Build the stack with its root page on the first surface
    pub fn new(
        catalog: Arc<dyn CatalogSource>,
        surfaces: Vec<Arc<dyn ListSurface>>,
        input_surface: Arc<dyn InputSurface>,
        config: BrowseConfig,
    ) -> Result<Self> {
        ensure!(!surfaces.is_empty(), "at least one page surface is required");

        for surface in &surfaces {
            surface.set_property(ListProperty::Visible, true);
            // rows are pulled on demand
            surface.set_property(ListProperty::Valid, false);
        }

        let jumpback: JumpbackTarget = Arc::new(Mutex::new(None));
        let mut stack = Self {
            surfaces,
            input_surface,
            env: PageEnv {
                catalog,
                jumpback,
                config,
            },
            page_stack: Vec::new(),
            location_stack: Vec::new(),
            trail: Vec::new(),
        };
        stack.push_page(None);
        Ok(stack)
    }

    /// Open `folder` as a new page on top of the stack
    pub fn push_page(&mut self, folder: Option<CatalogItem>) -> SurfaceId {
        let depth = self.page_stack.len();
        if self.trail.get(depth) != Some(&folder) {
            self.trail.truncate(depth);
            self.trail.push(folder.clone());
        }
        if let Some(parent) = self.page_stack.last() {
            parent.set_previously_selected(folder.clone());
        }

        let previously_selected = self.trail.get(depth + 1).cloned().flatten();
        let surface = Arc::clone(&self.surfaces[depth % self.surfaces.len()]);
        let surface_id = surface.id();
        info!(
            "Pushing page {} for \"{}\" on surface {}",
            depth,
            folder.as_ref().map(|f| f.id.as_str()).unwrap_or(""),
            surface_id
        );

        self.location_stack.push(folder.clone());
        self.page_stack
            .push(BrowsePage::new(folder, previously_selected, surface, self.env.clone()));
        self.update_jumpback();
        surface_id
    }

    /// Drop every page above `depth` and show the page at `depth`
    pub fn pop_to(&mut self, depth: usize) -> Result<SurfaceId, BrowseError> {
        let len = self.page_stack.len();
        if depth >= len {
            return Err(BrowseError::NoSuchDepth { depth, len });
        }
        let exited = self.location_stack.get(depth + 1).cloned().flatten();
        self.truncate_pages(depth + 1);
        if exited.is_some() {
            if let Some(page) = self.page_stack.last() {
                page.set_previously_selected(exited);
            }
        }
        Ok(self.show_top())
    }

    /// Go up one level, back to the page below the top
    pub fn go_back(&mut self) -> Result<SurfaceId, BrowseError> {
        let len = self.page_stack.len();
        if len < 2 {
            return Err(BrowseError::NoSuchDepth { depth: 0, len });
        }
        debug!("Going back from depth {}", len - 1);
        self.pop_to(len - 2)
    }

    /// The display moved focus onto or away from `surface`
    pub fn on_focus_changed(
        &mut self,
        surface: SurfaceId,
        focused: bool,
    ) -> Result<NavTarget, BrowseError> {
        if !self.surfaces.iter().any(|s| s.id() == surface) {
            return Err(BrowseError::UnknownSurface(surface));
        }

        if !focused {
            for page in self.page_stack.iter_mut().filter(|p| p.surface_id() == surface) {
                if page.is_shown() {
                    page.hide();
                }
            }
            return Ok(NavTarget::Stay);
        }

        let top = self.page_stack.len() - 1;
        if self.page_stack[top].surface_id() == surface {
            return Ok(NavTarget::Page(self.show_top()));
        }
        if top > 0 && self.page_stack[top - 1].surface_id() == surface {
            return self.go_back().map(NavTarget::Page);
        }
        warn!("Focus moved to surface {} which holds no current page", surface);
        Err(BrowseError::UnknownSurface(surface))
    }

    /// The display pulls rows `[start, start + count)` for the page on `surface`
    pub fn on_window_requested(
        &self,
        surface: SurfaceId,
        start: usize,
        count: usize,
    ) -> Result<(), BrowseError> {
        let depth = self.depth_of(surface)?;
        self.page_stack[depth].on_window_requested(start, count);
        Ok(())
    }

    pub fn on_row_focused(&self, surface: SurfaceId, index: usize) -> Result<(), BrowseError> {
        let depth = self.depth_of(surface)?;
        self.page_stack[depth].on_row_focused(index);
        Ok(())
    }

    /// A row of the list on `surface` was clicked
    pub fn on_row_clicked(
        &mut self,
        surface: SurfaceId,
        index: usize,
    ) -> Result<NavTarget, BrowseError> {
        let depth = self.depth_of(surface)?;
        let item = self.page_stack[depth]
            .on_row_clicked(index)
            .ok_or(BrowseError::InvalidSelection)?;
        Ok(self.on_list_selection(depth, item))
    }

    /// An entry of the side action list on `surface` was clicked
    pub fn on_action_clicked(
        &mut self,
        surface: SurfaceId,
        index: usize,
    ) -> Result<NavTarget, BrowseError> {
        let depth = self.depth_of(surface)?;
        let action = self.page_stack[depth]
            .action_at(index)
            .ok_or(BrowseError::InvalidSelection)?;
        info!("User picked action {}", action);

        let input = Arc::clone(&self.input_surface);
        let page = &mut self.page_stack[depth];
        match action {
            BrowseAction::Jumpback => Ok(self.jump_back()),
            BrowseAction::Filter => {
                page.start_filter(input);
                Ok(NavTarget::Input)
            }
            BrowseAction::Search => {
                page.start_search(input);
                Ok(NavTarget::Input)
            }
        }
    }

    /// Text typed into the open filter or search screen
    pub fn on_input_entry(&mut self, text: &str) -> Result<(), BrowseError> {
        let depth = self.input_depth()?;
        self.page_stack[depth].input_entry(text);
        Ok(())
    }

    /// A suggestion of the open filter or search screen was picked
    pub fn on_suggestion_selected(&mut self, index: usize) -> Result<NavTarget, BrowseError> {
        let depth = self.input_depth()?;
        match self.page_stack[depth].input_select(index) {
            InputOutcome::Selected(item) => {
                self.page_stack[depth].close_input();
                Ok(self.on_list_selection(depth, item))
            }
            InputOutcome::PlayFromSearch { query } => {
                if let Err(e) = self.env.catalog.play_from_search(&query) {
                    warn!("Play from search \"{}\" failed: {:#}", query, e);
                }
                self.page_stack[depth].close_input();
                Ok(NavTarget::Playback)
            }
            InputOutcome::Rejected => Ok(NavTarget::Stay),
        }
    }

    /// Leave the input screen without picking anything
    pub fn close_input(&mut self) {
        for page in &mut self.page_stack {
            page.close_input();
        }
    }

    /// Rebuild the path to the deepest folder browsed and land on it
    pub fn jump_back(&mut self) -> NavTarget {
        let path: Vec<CatalogItem> = self
            .trail
            .iter()
            .skip(1)
            .flatten()
            .take_while(|item| item.browseable)
            .cloned()
            .collect();
        if path.is_empty() {
            debug!("Nothing to jump back to");
            return NavTarget::Stay;
        }

        info!("Jumping back {} levels", path.len());
        self.truncate_pages(1);
        let mut surface = self.page_stack[0].surface_id();
        for folder in path {
            surface = self.push_page(Some(folder));
        }
        NavTarget::Page(surface)
    }

    /// Hand late artwork to every page caching the entry, then redraw what changed
    pub fn attach_cover_art(&self, id: &str, art: &CoverArt) -> bool {
        let mut attached = false;
        for page in &self.page_stack {
            attached |= page.attach_cover_art(id, art);
        }
        self.redraw();
        attached
    }

    pub fn redraw(&self) {
        for page in self.page_stack.iter().filter(|p| p.is_shown()) {
            page.redraw();
        }
    }

    fn on_list_selection(&mut self, depth: usize, item: CatalogItem) -> NavTarget {
        if item.browseable {
            self.truncate_pages(depth + 1);
            return NavTarget::Page(self.push_page(Some(item)));
        }

        if self.trail.get(depth + 1) != Some(&Some(item.clone())) {
            self.trail.truncate(depth + 1);
            self.trail.push(Some(item.clone()));
        }
        self.update_jumpback();

        info!("Playing \"{}\"", item.id);
        if let Err(e) = self.env.catalog.play_song(&item) {
            warn!("Playing \"{}\" failed: {:#}", item.id, e);
        }
        NavTarget::Playback
    }

    fn show_top(&mut self) -> SurfaceId {
        match self.page_stack.last_mut() {
            Some(page) => {
                page.show();
                page.surface_id()
            }
            None => self.surfaces[0].id(),
        }
    }

    fn truncate_pages(&mut self, len: usize) {
        while self.page_stack.len() > len {
            if let Some(mut page) = self.page_stack.pop() {
                page.hide();
            }
            self.location_stack.pop();
        }
    }

    /// Depth of the page currently drawn on `surface`
    fn depth_of(&self, surface: SurfaceId) -> Result<usize, BrowseError> {
        let mut fallback = None;
        for (depth, page) in self.page_stack.iter().enumerate().rev() {
            if page.surface_id() != surface {
                continue;
            }
            if page.is_shown() {
                return Ok(depth);
            }
            fallback.get_or_insert(depth);
        }
        fallback.ok_or(BrowseError::UnknownSurface(surface))
    }

    fn input_depth(&self) -> Result<usize, BrowseError> {
        self.page_stack
            .iter()
            .rposition(|page| page.input().is_some())
            .ok_or(BrowseError::InvalidSelection)
    }

    fn update_jumpback(&self) {
        let target = self
            .trail
            .iter()
            .skip(1)
            .flatten()
            .take_while(|item| item.browseable)
            .last()
            .cloned();
        *lock(&self.env.jumpback) = target;
    }

    pub fn page_stack(&self) -> &[BrowsePage] {
        &self.page_stack
    }

    pub fn location_stack(&self) -> &[Option<CatalogItem>] {
        &self.location_stack
    }

    pub fn trail(&self) -> &[Option<CatalogItem>] {
        &self.trail
    }

    pub fn top(&self) -> &BrowsePage {
        // never empty, the root page is pushed on construction
        &self.page_stack[self.page_stack.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.page_stack.len() - 1
    }

    pub fn jumpback_target(&self) -> Option<CatalogItem> {
        lock(&self.env.jumpback).clone()
    }
}
