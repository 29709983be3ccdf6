// src/window/commands.rs
//! Deferred surface mutations.
//!
//! A `Command` carries only the parameters it needs; the window name is
//! supplied when it is applied, so a queued command follows a rename.

use crate::display::messages::{Position, Size, SurfaceError, WindowProperty};
use crate::display::surface::DisplaySurface;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    SetProperty { property: WindowProperty, value: f64 },
    SetTitle(String),
    /// Resize by explicit width and height.
    Resize { width: u32, height: u32 },
    ResizeTo(Size),
    Move(Position),
}

impl Command {
    /// Short name used in log lines.
    pub fn kind(&self) -> &'static str {
        match self {
            Command::SetProperty { .. } => "set_property",
            Command::SetTitle(_) => "set_title",
            Command::Resize { .. } | Command::ResizeTo(_) => "resize",
            Command::Move(_) => "move",
        }
    }

    pub fn apply(&self, surface: &mut dyn DisplaySurface, name: &str) -> Result<(), SurfaceError> {
        match self {
            Command::SetProperty { property, value } => {
                surface.set_property(name, *property, *value)
            }
            Command::SetTitle(title) => surface.set_title(name, title),
            Command::Resize { width, height } => surface.resize(name, Size::new(*width, *height)),
            Command::ResizeTo(size) => surface.resize(name, *size),
            Command::Move(position) => surface.move_window(name, *position),
        }
    }
}
