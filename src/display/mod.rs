// src/display/mod.rs
//! Display surface abstraction.
//!
//! - DisplaySurface: window-system primitives (create, render, destroy, ...)
//! - Messages: plain data passed to the surface (flags, geometry, errors)
//! - Drivers: concrete surfaces (headless logger, call recorder)

pub mod drivers;
pub mod messages;
pub mod surface;

pub use drivers::{CallLog, HeadlessSurface, RecordingSurface, SurfaceCall};
pub use messages::{Position, Size, SurfaceError, WindowFlags, WindowProperty};
pub use surface::DisplaySurface;
