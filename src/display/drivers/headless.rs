//! Headless display surface implementation.
//!
//! Keeps an in-memory table of the windows a real display system would show
//! and logs every call. Calls against a name that was never realized fail
//! with `SurfaceError::NotFound`, just as a real window system would refuse
//! them.

use crate::display::messages::{Position, Size, SurfaceError, WindowFlags, WindowProperty};
use crate::display::surface::DisplaySurface;
use crate::frame::Frame;
use log::{info, trace};
use std::collections::HashMap;
use std::time::Duration;

/// What the headless display knows about one realized window.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    pub flags: WindowFlags,
    pub position: Position,
    pub size: Size,
    pub title: String,
    pub frames_rendered: u64,
    pub properties: HashMap<WindowProperty, f64>,
}

#[derive(Debug, Default)]
pub struct HeadlessSurface {
    windows: HashMap<String, HeadlessWindow>,
}

impl HeadlessSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, name: &str) -> Option<&HeadlessWindow> {
        self.windows.get(name)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn window_mut(&mut self, name: &str) -> Result<&mut HeadlessWindow, SurfaceError> {
        self.windows
            .get_mut(name)
            .ok_or_else(|| SurfaceError::NotFound(name.to_string()))
    }
}

impl DisplaySurface for HeadlessSurface {
    fn create_or_show(
        &mut self,
        name: &str,
        flags: WindowFlags,
        position: Position,
    ) -> Result<(), SurfaceError> {
        info!(
            "HeadlessSurface: create_or_show '{}' flags={:?} at ({}, {})",
            name, flags, position.x, position.y
        );
        let window = self
            .windows
            .entry(name.to_string())
            .or_insert_with(|| HeadlessWindow {
                flags,
                position,
                size: Size::default(),
                title: name.to_string(),
                frames_rendered: 0,
                properties: HashMap::new(),
            });
        window.flags = flags;
        window.position = position;
        Ok(())
    }

    fn destroy(&mut self, name: &str) -> Result<(), SurfaceError> {
        info!("HeadlessSurface: destroy '{}'", name);
        self.windows
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| SurfaceError::NotFound(name.to_string()))
    }

    fn render_frame(&mut self, name: &str, frame: &Frame) -> Result<(), SurfaceError> {
        trace!("HeadlessSurface: render '{}' {:?}", name, frame);
        let window = self.window_mut(name)?;
        if window.flags.contains(WindowFlags::AUTOSIZE) || window.size == Size::default() {
            window.size = Size::new(frame.width(), frame.height());
        }
        window.frames_rendered += 1;
        Ok(())
    }

    fn pump_events(&mut self, timeout: Duration) -> Result<(), SurfaceError> {
        // No input source; nothing to wait for.
        trace!("HeadlessSurface: pump_events {:?}", timeout);
        Ok(())
    }

    fn set_property(
        &mut self,
        name: &str,
        property: WindowProperty,
        value: f64,
    ) -> Result<(), SurfaceError> {
        info!("HeadlessSurface: set_property '{}' {:?}={}", name, property, value);
        self.window_mut(name)?.properties.insert(property, value);
        Ok(())
    }

    fn set_title(&mut self, name: &str, title: &str) -> Result<(), SurfaceError> {
        info!("HeadlessSurface: set_title '{}' -> '{}'", name, title);
        self.window_mut(name)?.title = title.to_string();
        Ok(())
    }

    fn resize(&mut self, name: &str, size: Size) -> Result<(), SurfaceError> {
        info!(
            "HeadlessSurface: resize '{}' to {}x{}",
            name, size.width, size.height
        );
        let window = self.window_mut(name)?;
        if window.flags.contains(WindowFlags::AUTOSIZE) {
            return Err(SurfaceError::rejected(
                "resize",
                "autosized windows follow the frame size",
            ));
        }
        window.size = size;
        Ok(())
    }

    fn move_window(&mut self, name: &str, position: Position) -> Result<(), SurfaceError> {
        info!(
            "HeadlessSurface: move '{}' to ({}, {})",
            name, position.x, position.y
        );
        self.window_mut(name)?.position = position;
        Ok(())
    }
}
