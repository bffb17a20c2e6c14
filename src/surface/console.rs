use super::traits::{
    FocusEvent, InputSurface, ListProperty, ListSurface, ListWindow, RowImage, SurfaceId,
};
use serde::Serialize;

/// One surface call, as printed in `--json` mode
#[derive(Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum ConsoleOp<'a> {
    Title { surface: SurfaceId, title: &'a str },
    Actions { surface: SurfaceId, actions: &'a [String] },
    Window { surface: SurfaceId, window: &'a ListWindow },
    Enabled { surface: SurfaceId, enabled: bool },
    Property { surface: SurfaceId, property: ListProperty, value: bool },
    Focus { surface: SurfaceId, event: FocusEvent },
    Suggestions { rows: &'a [String] },
}

fn emit(json: bool, op: &ConsoleOp<'_>, human: impl FnOnce() -> String) {
    if json {
        match serde_json::to_string(op) {
            Ok(line) => println!("{}", line),
            Err(e) => tracing::warn!("Failed to encode surface call: {}", e),
        }
    } else {
        println!("{}", human());
    }
}

/// Prints every surface call to stdout, for the demo driver 🖥️
pub struct ConsoleSurface {
    id: SurfaceId,
    component_id: u32,
    json: bool,
}

impl ConsoleSurface {
    pub fn new(id: SurfaceId, component_id: u32, json: bool) -> Self {
        Self {
            id,
            component_id,
            json,
        }
    }
}

impl ListSurface for ConsoleSurface {
    fn id(&self) -> SurfaceId {
        self.id
    }

    fn list_component_id(&self) -> u32 {
        self.component_id
    }

    fn set_title(&self, title: &str) {
        emit(self.json, &ConsoleOp::Title { surface: self.id, title }, || {
            format!("[{}] ━━━ {} ━━━", self.id, title)
        });
    }

    fn set_actions(&self, actions: &[String]) {
        emit(
            self.json,
            &ConsoleOp::Actions {
                surface: self.id,
                actions,
            },
            || format!("[{}] actions: {}", self.id, actions.join(" | ")),
        );
    }

    fn set_window(&self, window: ListWindow) {
        emit(
            self.json,
            &ConsoleOp::Window {
                surface: self.id,
                window: &window,
            },
            || {
                let mut out = format!(
                    "[{}] rows {}..{} of {}",
                    self.id,
                    window.start,
                    window.start + window.rows.len(),
                    window.total_rows
                );
                for (offset, row) in window.rows.iter().enumerate() {
                    let check = if row.checkmark { "✓" } else { " " };
                    let icon = match row.image {
                        RowImage::None => " ",
                        RowImage::CoverArt(_) => "▣",
                        RowImage::Folder => "📁",
                        RowImage::Track => "♪",
                    };
                    let text = row.text.replace('\n', " · ");
                    out.push_str(&format!(
                        "\n  {:>3} {} {} {}",
                        window.start + offset,
                        check,
                        icon,
                        text
                    ));
                }
                out
            },
        );
    }

    fn set_enabled(&self, enabled: bool) {
        emit(
            self.json,
            &ConsoleOp::Enabled {
                surface: self.id,
                enabled,
            },
            || format!("[{}] list {}", self.id, if enabled { "enabled" } else { "disabled" }),
        );
    }

    fn set_property(&self, property: ListProperty, value: bool) {
        emit(
            self.json,
            &ConsoleOp::Property {
                surface: self.id,
                property,
                value,
            },
            || format!("[{}] {:?} = {}", self.id, property, value),
        );
    }

    fn raise_focus_event(&self, event: FocusEvent) {
        emit(
            self.json,
            &ConsoleOp::Focus {
                surface: self.id,
                event,
            },
            || format!("[{}] focus row {}", self.id, event.row_index),
        );
    }
}

/// Prints suggestion lists of the input screen
pub struct ConsoleInput {
    json: bool,
}

impl ConsoleInput {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl InputSurface for ConsoleInput {
    fn send_suggestions(&self, rows: Vec<String>) {
        emit(self.json, &ConsoleOp::Suggestions { rows: &rows }, || {
            let mut out = String::from("[input] suggestions:");
            for (i, row) in rows.iter().enumerate() {
                out.push_str(&format!("\n  {:>3} {}", i, row.replace('\n', " · ")));
            }
            out
        });
    }

    fn reset_suggestion_cursor(&self) {
        if !self.json {
            println!("[input] cursor reset");
        }
    }
}
