//! Map widget glue.
//!
//! Turns county map events into finder updates and renderer-agnostic
//! [`MapCommand`]s. The adapter tracks focus, the keyboard cursor and the
//! county it last framed; the selection itself lives in [`ResourceFinder`].
//! Selections made elsewhere (the county combobox) reach the map through
//! [`MapAdapter::sync`].

use serde::Serialize;

use crate::finder::ResourceFinder;
use crate::types::{Coordinates, GeographyOption};

/// Statewide view the map starts at and returns to.
pub const DEFAULT_CENTER: Coordinates = Coordinates {
    lon: -79.0193,
    lat: 35.7596,
};
pub const DEFAULT_ZOOM: f64 = 6.0;

/// Keyboard input while the map has focus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapKey {
    Next,
    Previous,
    Enter,
    Escape,
}

impl MapKey {
    /// Map a DOM-style key name; unhandled keys yield `None`.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "ArrowRight" | "ArrowDown" => Some(MapKey::Next),
            "ArrowLeft" | "ArrowUp" => Some(MapKey::Previous),
            "Enter" => Some(MapKey::Enter),
            "Escape" => Some(MapKey::Escape),
            _ => None,
        }
    }
}

/// Input from the map widget. County events carry the county value.
#[derive(Clone, Debug, PartialEq)]
pub enum MapEvent {
    CountyClicked(String),
    CountyHovered(String),
    PointerLeft,
    Focused,
    Blurred,
    Key(MapKey),
}

/// Instructions for the map renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "command", content = "value", rename_all = "snake_case")]
pub enum MapCommand {
    Highlight(String),
    ClearHighlight,
    /// Zoom to fit the county's boundary.
    FitCounty(String),
    /// Fly back to [`DEFAULT_CENTER`] at [`DEFAULT_ZOOM`].
    ResetView,
    /// Text for the screen-reader live region.
    Announce(String),
}

/// Map-side state for one finder: focus, keyboard cursor and the selection
/// the renderer currently shows.
#[derive(Debug, Clone, Default)]
pub struct MapAdapter {
    focused: bool,
    cursor: Option<usize>,
    touch: bool,
    /// Geography value last framed on the map; `None` is the statewide view.
    rendered: Option<String>,
}

impl MapAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Touch devices get no hover highlighting.
    pub fn with_touch(mut self, touch: bool) -> Self {
        self.touch = touch;
        self
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// Index of the keyboard-focused county among the index's counties.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Apply one map event, returning what the renderer should do.
    pub fn handle(&mut self, event: MapEvent, finder: &mut ResourceFinder) -> Vec<MapCommand> {
        match event {
            MapEvent::CountyClicked(value) => {
                let Some(option) = finder.geography_index().get(&value).cloned() else {
                    tracing::debug!(county = %value, "Ignoring click on unknown county");
                    return Vec::new();
                };
                finder.select_geography(option);
                self.sync(finder)
            }
            MapEvent::CountyHovered(value) if !self.touch => vec![MapCommand::Highlight(value)],
            MapEvent::PointerLeft if !self.touch => vec![MapCommand::ClearHighlight],
            MapEvent::CountyHovered(_) | MapEvent::PointerLeft => Vec::new(),
            MapEvent::Focused => {
                self.focused = true;
                Vec::new()
            }
            MapEvent::Blurred => {
                self.focused = false;
                Vec::new()
            }
            MapEvent::Key(key) if self.focused => self.handle_key(key, finder),
            MapEvent::Key(_) => Vec::new(),
        }
    }

    /// Bring the map in line with the finder's selection.
    ///
    /// Emits nothing when the selection is the one already shown, so it can
    /// be called after every finder update.
    pub fn sync(&mut self, finder: &ResourceFinder) -> Vec<MapCommand> {
        let selected = finder.query().geography.as_ref().map(|g| g.value.clone());
        if selected == self.rendered {
            return Vec::new();
        }
        self.rendered = selected.clone();
        match selected {
            Some(value) => vec![
                MapCommand::Highlight(value.clone()),
                MapCommand::FitCounty(value),
            ],
            None => vec![MapCommand::ClearHighlight, MapCommand::ResetView],
        }
    }

    fn handle_key(&mut self, key: MapKey, finder: &mut ResourceFinder) -> Vec<MapCommand> {
        let counties: Vec<GeographyOption> =
            finder.geography_index().counties().cloned().collect();
        if counties.is_empty() {
            return Vec::new();
        }
        let last = counties.len() - 1;

        let mut commands = match key {
            MapKey::Next => {
                let next = match self.cursor {
                    Some(i) if i < last => i + 1,
                    _ => 0,
                };
                self.cursor = Some(next);
                vec![MapCommand::Highlight(counties[next].value.clone())]
            }
            MapKey::Previous => {
                let previous = match self.cursor {
                    Some(i) if i > 0 => i - 1,
                    _ => last,
                };
                self.cursor = Some(previous);
                vec![MapCommand::Highlight(counties[previous].value.clone())]
            }
            MapKey::Enter => match self.cursor.and_then(|i| counties.get(i)) {
                Some(option) => {
                    finder.select_geography(option.clone());
                    self.sync(finder)
                }
                None => Vec::new(),
            },
            MapKey::Escape => {
                self.focused = false;
                self.cursor = None;
                return vec![MapCommand::ResetView];
            }
        };

        if let Some(option) = self.cursor.and_then(|i| counties.get(i)) {
            commands.push(MapCommand::Announce(format!(
                "Focused on {} County",
                option.label
            )));
        }
        commands
    }
}
