// src/lib.rs

//! Asynchronous per-window display updates.
//!
//! A `DisplayWindow` owns one worker thread that serializes every call to
//! its `DisplaySurface`. Producer threads submit frames and window requests
//! without ever blocking on the display system.

pub mod config;
pub mod display;
pub mod frame;
pub mod window;

pub use config::{Config, WindowConfig, CONFIG};
pub use display::{DisplaySurface, Position, Size, SurfaceError, WindowFlags, WindowProperty};
pub use frame::Frame;
pub use window::{Command, DisplayWindow};
