// src/display/messages.rs
//! Value types exchanged between a `DisplayWindow` and its `DisplaySurface`.
//!
//! Everything here is plain data: owned, `Clone`, and cheap to move between
//! the producer side and the display worker.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;

bitflags! {
    /// Flags applied when a surface is realized.
    ///
    /// The empty set is a normal, user-resizable window.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct WindowFlags: u32 {
        const AUTOSIZE    = 1 << 0; // Size follows the frame; user cannot resize.
        const OPENGL      = 1 << 1;
        const FREE_RATIO  = 1 << 2; // Stretch without keeping the frame's aspect ratio.
        const GUI_NORMAL  = 1 << 3; // No toolbar/status bar decorations.
        const FULLSCREEN  = 1 << 4;
    }
}

/// A property that can be changed on a live surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindowProperty {
    Fullscreen,
    Autosize,
    AspectRatio,
    OpenGl,
    Visible,
    Topmost,
}

/// Top-left corner of a window in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Failure reported by a `DisplaySurface` call.
///
/// The display worker never retries on these; it logs them and moves on to
/// the next unit of work.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The display system refused the operation.
    Rejected {
        operation: &'static str,
        reason: String,
    },
    /// No surface exists under this name.
    NotFound(String),
    /// The display system itself is not reachable.
    Unavailable(String),
}

impl SurfaceError {
    pub fn rejected(operation: &'static str, reason: impl Into<String>) -> Self {
        SurfaceError::Rejected {
            operation,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SurfaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurfaceError::Rejected { operation, reason } => {
                write!(f, "{} rejected: {}", operation, reason)
            }
            SurfaceError::NotFound(name) => write!(f, "no surface named '{}'", name),
            SurfaceError::Unavailable(reason) => write!(f, "display unavailable: {}", reason),
        }
    }
}

impl std::error::Error for SurfaceError {}
