// src/display/surface.rs
//! DisplaySurface trait - the window-system primitives a display worker drives.
//!
//! Implementations wrap whatever actually puts pixels on screen. The engine
//! in `crate::window` guarantees the calling discipline, so implementations
//! do not need their own locking.
//!
//! ## Threading Model
//! - A surface is moved into its `DisplayWindow` at construction and never
//!   handed out again.
//! - Calls for one window are serialized: at most one call is in flight at a
//!   time. Nearly all of them come from the window's worker thread;
//!   `rename` and `set_location` issue their destroy/move from the caller's
//!   thread under the same lock.
//!
//! ## Lifecycle
//! 1. `create_or_show` - realize a surface under a name (first frame, or
//!    first frame after a destroy)
//! 2. `render_frame` / `pump_events` / property calls while realized
//! 3. `destroy` - on hide, rename, or shutdown

use crate::display::messages::{Position, Size, SurfaceError, WindowFlags, WindowProperty};
use crate::frame::Frame;
use std::time::Duration;

/// Minimal window-system interface consumed by a display worker.
pub trait DisplaySurface: Send {
    /// Create the named surface (or show it if the display system already
    /// has one) with the given flags, placed at `position`.
    fn create_or_show(
        &mut self,
        name: &str,
        flags: WindowFlags,
        position: Position,
    ) -> Result<(), SurfaceError>;

    fn destroy(&mut self, name: &str) -> Result<(), SurfaceError>;

    fn render_frame(&mut self, name: &str, frame: &Frame) -> Result<(), SurfaceError>;

    /// Let the display system process input and redraws for at most
    /// `timeout`.
    fn pump_events(&mut self, timeout: Duration) -> Result<(), SurfaceError>;

    fn set_property(
        &mut self,
        name: &str,
        property: WindowProperty,
        value: f64,
    ) -> Result<(), SurfaceError>;

    fn set_title(&mut self, name: &str, title: &str) -> Result<(), SurfaceError>;

    fn resize(&mut self, name: &str, size: Size) -> Result<(), SurfaceError>;

    fn move_window(&mut self, name: &str, position: Position) -> Result<(), SurfaceError>;
}
