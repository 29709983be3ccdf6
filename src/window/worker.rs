// src/window/worker.rs
//! DisplayWorker - the dedicated thread that owns one window's surface.
//!
//! Each wake performs one bounded unit of work:
//! 1. destroy the surface if the window is hidden
//! 2. render at most one pending frame (realizing the surface first if
//!    needed), followed by one event-pump tick
//! 3. drain every queued command in order
//!
//! The only blocking point is the wait on `Shared::wake`.

use crate::frame::Frame;
use crate::window::commands::Command;
use crate::window::state::{FrameState, SurfaceState};
use log::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// State shared by a `DisplayWindow` handle and its worker.
pub(crate) struct Shared {
    frames: Mutex<FrameState>,
    wake: Condvar,
    surface: Mutex<SurfaceState>,
    pump_interval_ms: AtomicU64,
    /// Number of times the worker evaluated its wake predicate.
    wakes: AtomicUsize,
}

impl Shared {
    pub(crate) fn new(frames: FrameState, surface: SurfaceState, pump_interval: Duration) -> Self {
        Self {
            frames: Mutex::new(frames),
            wake: Condvar::new(),
            surface: Mutex::new(surface),
            pump_interval_ms: AtomicU64::new(pump_interval.as_millis() as u64),
            wakes: AtomicUsize::new(0),
        }
    }

    pub(crate) fn frames(&self) -> MutexGuard<'_, FrameState> {
        self.frames.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn surface(&self) -> MutexGuard<'_, SurfaceState> {
        self.surface.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn notify(&self) {
        self.wake.notify_one();
    }

    pub(crate) fn notify_all(&self) {
        self.wake.notify_all();
    }

    pub(crate) fn pump_interval(&self) -> Duration {
        Duration::from_millis(self.pump_interval_ms.load(Ordering::Relaxed))
    }

    pub(crate) fn set_pump_interval(&self, interval: Duration) {
        self.pump_interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    #[cfg(test)]
    pub(crate) fn wakes(&self) -> usize {
        self.wakes.load(Ordering::SeqCst)
    }
}

/// One unit of work taken out of `FrameState` under the lock.
struct Work {
    frame: Option<Frame>,
    commands: VecDeque<Command>,
}

pub(crate) struct DisplayWorker {
    shared: Arc<Shared>,
    label: String,
}

impl DisplayWorker {
    pub(crate) fn new(shared: Arc<Shared>, label: String) -> Self {
        Self { shared, label }
    }

    /// Run until shutdown is requested. The surface is always destroyed
    /// before this returns.
    pub(crate) fn run(self) {
        info!("DisplayWorker[{}]: Thread started", self.label);

        while let Some(work) = self.wait_for_work() {
            if let Some(frame) = work.frame {
                self.present(frame);
            }
            if !work.commands.is_empty() {
                self.apply_commands(work.commands);
            }
        }

        self.shared.surface().close();
        info!("DisplayWorker[{}]: Thread stopped", self.label);
    }

    /// Block until the wake predicate holds, then take the work out of the
    /// shared state. Returns `None` once shutdown is requested.
    fn wait_for_work(&self) -> Option<Work> {
        let mut frames = self.shared.frames();
        loop {
            // Checked on every wake, whichever condition fired. The frame
            // lock is released first; state is re-read after reacquiring.
            if !frames.visible {
                drop(frames);
                self.shared.surface().destroy("hidden");
                frames = self.shared.frames();
            }
            self.shared.wakes.fetch_add(1, Ordering::SeqCst);

            if frames.shutdown_requested {
                if !frames.commands.is_empty() {
                    debug!(
                        "DisplayWorker[{}]: discarding {} queued commands at shutdown",
                        self.label,
                        frames.commands.len()
                    );
                }
                return None;
            }

            if frames.has_work() {
                let frame = if frames.frame_ready() {
                    frames.slot.consume()
                } else {
                    None
                };
                let commands = std::mem::take(&mut frames.commands);
                return Some(Work { frame, commands });
            }

            frames = self
                .shared
                .wake
                .wait(frames)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    fn present(&self, frame: Frame) {
        if !frame.is_valid() {
            debug!(
                "DisplayWorker[{}]: skipping invalid frame {:?}",
                self.label, frame
            );
            return;
        }

        let pump_timeout = self.shared.pump_interval();
        let mut surface = self.shared.surface();
        if surface.is_closed() {
            return;
        }
        if !surface.is_realized() && !surface.realize() {
            return;
        }
        trace!("DisplayWorker[{}]: rendering {:?}", surface.name, frame);
        surface.render(&frame, pump_timeout);
    }

    fn apply_commands(&self, commands: VecDeque<Command>) {
        let mut surface = self.shared.surface();
        if surface.is_closed() {
            return;
        }
        for command in commands {
            trace!("DisplayWorker[{}]: applying {:?}", surface.name, command);
            surface.apply(command);
        }
    }
}
