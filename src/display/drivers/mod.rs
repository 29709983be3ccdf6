// src/display/drivers/mod.rs
//! Concrete display surface implementations.

pub mod headless;
pub mod recording;

pub use headless::HeadlessSurface;
pub use recording::{CallLog, RecordingSurface, SurfaceCall};
