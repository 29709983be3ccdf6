// src/window/mod.rs
//! DisplayWindow - a thread-safe handle to one asynchronously updated window.
//!
//! Any number of producer threads can push frames and window requests
//! through a shared `&DisplayWindow`. None of the public operations touch
//! the display system on the caller's thread except `rename` and
//! `set_location`, which act on an already realized surface under the
//! surface lock.
//!
//! Frames are "latest value wins": a frame that is superseded before the
//! worker picks it up is never rendered. A frame submitted while the window
//! is hidden stays pending and is rendered on the first wake after the
//! window is shown again.

pub mod commands;
pub mod state;
mod worker;

#[cfg(test)]
mod tests;

pub use commands::Command;

use crate::config::WindowConfig;
use crate::display::messages::{Position, Size, WindowFlags, WindowProperty};
use crate::display::surface::DisplaySurface;
use crate::frame::Frame;
use anyhow::{Context, Result};
use log::*;
use state::{FrameState, SurfaceState};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use worker::{DisplayWorker, Shared};

pub struct DisplayWindow {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl DisplayWindow {
    /// Create a window with default settings and start its worker.
    ///
    /// No surface is created until the first frame arrives.
    pub fn new(name: impl Into<String>, surface: impl DisplaySurface + 'static) -> Result<Self> {
        Self::with_config(name, surface, &WindowConfig::default())
    }

    pub fn with_config(
        name: impl Into<String>,
        surface: impl DisplaySurface + 'static,
        config: &WindowConfig,
    ) -> Result<Self> {
        let name = name.into();
        let shared = Arc::new(Shared::new(
            FrameState::new(config.visible),
            SurfaceState::new(Box::new(surface), name.clone(), config.flags, config.position),
            Duration::from_millis(config.pump_interval_ms),
        ));

        let worker = DisplayWorker::new(Arc::clone(&shared), name.clone());
        let handle = thread::Builder::new()
            .name(format!("display-{}", name))
            .spawn(move || worker.run())
            .with_context(|| format!("Failed to spawn display worker for '{}'", name))?;

        info!("DisplayWindow: '{}' created", name);

        Ok(Self {
            shared,
            worker: Mutex::new(Some(handle)),
        })
    }

    /// Copy `frame` into the pending slot, replacing any frame the worker
    /// has not picked up yet.
    pub fn submit_frame(&self, frame: &Frame) {
        let frame = frame.clone();
        {
            let mut frames = self.shared.frames();
            if frames.shutdown_requested {
                debug!("DisplayWindow: submit_frame after shutdown ignored");
                return;
            }
            frames.slot.submit(frame);
        }
        self.shared.notify();
    }

    /// Show or hide the window.
    ///
    /// Hiding destroys the surface on the worker's next wake. Showing does
    /// not replay anything already rendered; only a pending frame is drawn.
    pub fn set_visible(&self, visible: bool) {
        {
            let mut frames = self.shared.frames();
            if frames.shutdown_requested {
                debug!("DisplayWindow: set_visible after shutdown ignored");
                return;
            }
            frames.visible = visible;
        }
        self.shared.notify();
    }

    pub fn enqueue_command(&self, command: Command) {
        {
            let mut frames = self.shared.frames();
            if frames.shutdown_requested {
                debug!("DisplayWindow: {:?} after shutdown ignored", command);
                return;
            }
            frames.commands.push_back(command);
        }
        self.shared.notify();
    }

    /// Point the window at a new display name. A realized surface under the
    /// old name is destroyed now; the next frame realizes the new one.
    pub fn rename(&self, new_name: impl Into<String>) {
        let new_name = new_name.into();
        let mut surface = self.shared.surface();
        if surface.is_closed() {
            return;
        }
        surface.destroy("rename");
        info!("DisplayWindow: '{}' renamed to '{}'", surface.name, new_name);
        surface.name = new_name;
    }

    /// Set where the window is placed. Takes effect immediately on a
    /// realized surface, otherwise at realization.
    pub fn set_location(&self, x: i32, y: i32) {
        let mut surface = self.shared.surface();
        if surface.is_closed() {
            return;
        }
        surface.relocate(Position::new(x, y));
    }

    /// Flags used the next time the surface is realized.
    pub fn set_window_flags(&self, flags: WindowFlags) {
        let mut surface = self.shared.surface();
        if surface.is_closed() {
            return;
        }
        surface.flags = flags;
    }

    /// Bounded wait for the event-pump tick after each render.
    pub fn set_pump_interval(&self, interval: Duration) {
        self.shared.set_pump_interval(interval);
    }

    pub fn set_property(&self, property: WindowProperty, value: f64) {
        self.enqueue_command(Command::SetProperty { property, value });
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.enqueue_command(Command::SetTitle(title.into()));
    }

    pub fn resize(&self, width: u32, height: u32) {
        self.enqueue_command(Command::Resize { width, height });
    }

    pub fn resize_to(&self, size: Size) {
        self.enqueue_command(Command::ResizeTo(size));
    }

    /// Queued move, applied in order with other commands. See
    /// `set_location` for the immediate form.
    pub fn move_window(&self, x: i32, y: i32) {
        self.enqueue_command(Command::Move(Position::new(x, y)));
    }

    pub fn name(&self) -> String {
        self.shared.surface().name.clone()
    }

    pub fn is_visible(&self) -> bool {
        self.shared.frames().visible
    }

    pub fn is_realized(&self) -> bool {
        self.shared.surface().is_realized()
    }

    pub fn is_shut_down(&self) -> bool {
        self.shared.frames().shutdown_requested
    }

    /// Stop the worker and destroy any surface. Safe to call more than
    /// once; also run on drop.
    pub fn shutdown(&self) {
        self.shared.frames().shutdown_requested = true;
        self.shared.notify_all();

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                error!("DisplayWindow: worker thread panicked");
            }
            info!("DisplayWindow: '{}' shut down", self.name());
        }

        // No-op when the worker already closed it.
        self.shared.surface().close();
    }

    #[cfg(test)]
    pub(crate) fn worker_wakes(&self) -> usize {
        self.shared.wakes()
    }
}

impl Drop for DisplayWindow {
    fn drop(&mut self) {
        self.shutdown();
    }
}
