// src/window/state.rs
//! State shared between a `DisplayWindow` handle and its worker.
//!
//! Two locks, never nested:
//! - `FrameState` (frame slot, command queue, visibility, shutdown) guards
//!   the wake condition. Never held across a surface call, so producers are
//!   not stalled by a slow display system.
//! - `SurfaceState` (the surface itself, name, geometry, lifecycle) is held
//!   across surface calls.
//!
//! Geometry that arrives while no surface exists is folded into stored state
//! rather than queued: a move updates the stored position, and only the
//! latest title and size are kept for the next realization.

use crate::display::messages::{Position, Size, WindowFlags};
use crate::display::surface::DisplaySurface;
use crate::frame::Frame;
use crate::window::commands::Command;
use log::{debug, info, warn};
use std::collections::VecDeque;
use std::time::Duration;

/// Single-slot "latest frame" buffer.
#[derive(Debug, Default)]
pub struct FrameSlot {
    frame: Option<Frame>,
}

impl FrameSlot {
    /// Replace whatever is pending. An unconsumed frame is discarded.
    pub fn submit(&mut self, frame: Frame) {
        self.frame = Some(frame);
    }

    /// Take the pending frame and clear the slot.
    pub fn consume(&mut self) -> Option<Frame> {
        self.frame.take()
    }

    pub fn is_pending(&self) -> bool {
        self.frame.is_some()
    }
}

/// Everything the worker's wake predicate reads.
#[derive(Debug)]
pub struct FrameState {
    pub slot: FrameSlot,
    pub commands: VecDeque<Command>,
    pub visible: bool,
    pub shutdown_requested: bool,
}

impl FrameState {
    pub fn new(visible: bool) -> Self {
        Self {
            slot: FrameSlot::default(),
            commands: VecDeque::new(),
            visible,
            shutdown_requested: false,
        }
    }

    pub fn frame_ready(&self) -> bool {
        self.visible && self.slot.is_pending()
    }

    /// The composite wake predicate.
    pub fn has_work(&self) -> bool {
        self.shutdown_requested || self.frame_ready() || !self.commands.is_empty()
    }
}

/// The surface and everything needed to realize it.
pub struct SurfaceState {
    surface: Box<dyn DisplaySurface>,
    pub name: String,
    pub flags: WindowFlags,
    pub position: Position,
    realized: bool,
    closed: bool,
    /// Latest title and size requested while no surface existed.
    pending_title: Option<String>,
    pending_size: Option<Size>,
}

impl SurfaceState {
    pub fn new(
        surface: Box<dyn DisplaySurface>,
        name: String,
        flags: WindowFlags,
        position: Position,
    ) -> Self {
        Self {
            surface,
            name,
            flags,
            position,
            realized: false,
            closed: false,
            pending_title: None,
            pending_size: None,
        }
    }

    pub fn is_realized(&self) -> bool {
        self.realized
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn pending_title(&self) -> Option<&str> {
        self.pending_title.as_deref()
    }

    pub fn pending_size(&self) -> Option<Size> {
        self.pending_size
    }

    /// Render onto the realized surface, then give the display system one
    /// bounded event-pump tick. A refused render skips the pump.
    pub fn render(&mut self, frame: &Frame, pump_timeout: Duration) {
        if let Err(e) = self.surface.render_frame(&self.name, frame) {
            warn!("DisplayWorker[{}]: render failed: {}", self.name, e);
            return;
        }
        if let Err(e) = self.surface.pump_events(pump_timeout) {
            warn!("DisplayWorker[{}]: pump_events failed: {}", self.name, e);
        }
    }

    /// Store a new position and, if a surface exists, move it right away.
    pub fn relocate(&mut self, position: Position) {
        self.position = position;
        if !self.realized {
            return;
        }
        if let Err(e) = self.surface.move_window(&self.name, position) {
            warn!("DisplayWorker[{}]: move failed: {}", self.name, e);
        }
    }

    /// Create the surface with the stored flags and position, then apply the
    /// stored title and size. On failure the lifecycle stays at no-surface
    /// so the next frame tries again.
    pub fn realize(&mut self) -> bool {
        if let Err(e) = self
            .surface
            .create_or_show(&self.name, self.flags, self.position)
        {
            warn!("DisplayWorker[{}]: create failed: {}", self.name, e);
            return false;
        }
        info!(
            "DisplayWorker[{}]: surface realized at ({}, {})",
            self.name, self.position.x, self.position.y
        );
        self.realized = true;

        if let Some(title) = self.pending_title.take() {
            self.apply_now(&Command::SetTitle(title));
        }
        if let Some(size) = self.pending_size.take() {
            self.apply_now(&Command::ResizeTo(size));
        }
        true
    }

    /// Destroy the surface if one exists. The lifecycle moves to no-surface
    /// even when the display system reports an error.
    pub fn destroy(&mut self, reason: &str) {
        if !self.realized {
            return;
        }
        self.realized = false;
        match self.surface.destroy(&self.name) {
            Ok(()) => info!("DisplayWorker[{}]: surface destroyed ({})", self.name, reason),
            Err(e) => warn!(
                "DisplayWorker[{}]: destroy ({}) failed: {}",
                self.name, reason, e
            ),
        }
    }

    /// Apply a command against the live surface, or fold it into the state
    /// used at the next realization.
    pub fn apply(&mut self, command: Command) {
        if let Command::Move(position) = command {
            self.position = position;
        }
        if self.realized {
            self.apply_now(&command);
            return;
        }
        match command {
            Command::SetProperty { .. } => {
                debug!(
                    "DisplayWorker[{}]: no surface, dropping {:?}",
                    self.name, command
                );
            }
            Command::SetTitle(title) => self.pending_title = Some(title),
            Command::Resize { width, height } => {
                self.pending_size = Some(Size::new(width, height));
            }
            Command::ResizeTo(size) => self.pending_size = Some(size),
            Command::Move(_) => {}
        }
    }

    fn apply_now(&mut self, command: &Command) {
        if let Err(e) = command.apply(self.surface.as_mut(), &self.name) {
            warn!(
                "DisplayWorker[{}]: {} failed: {}",
                self.name,
                command.kind(),
                e
            );
        }
    }

    /// Final teardown. Destroys any surface and refuses further work.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.destroy("shutdown");
        self.pending_title = None;
        self.pending_size = None;
        self.closed = true;
    }
}
