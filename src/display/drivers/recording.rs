//! Recording display surface.
//!
//! Every call is appended to a shared `CallLog` that stays readable after the
//! surface has been moved into a `DisplayWindow`. Failures of creation,
//! rendering and title changes can be injected to exercise the worker's
//! error paths.

use crate::display::messages::{Position, Size, SurfaceError, WindowFlags, WindowProperty};
use crate::display::surface::DisplaySurface;
use crate::frame::Frame;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// One observed `DisplaySurface` call.
#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceCall {
    CreateOrShow {
        name: String,
        flags: WindowFlags,
        position: Position,
    },
    Destroy {
        name: String,
    },
    Render {
        name: String,
        frame: Frame,
    },
    PumpEvents {
        timeout: Duration,
    },
    SetProperty {
        name: String,
        property: WindowProperty,
        value: f64,
    },
    SetTitle {
        name: String,
        title: String,
    },
    Resize {
        name: String,
        size: Size,
    },
    Move {
        name: String,
        position: Position,
    },
}

impl SurfaceCall {
    /// The window name the call targets. `PumpEvents` is not tied to one.
    pub fn target(&self) -> Option<&str> {
        match self {
            SurfaceCall::CreateOrShow { name, .. }
            | SurfaceCall::Destroy { name }
            | SurfaceCall::Render { name, .. }
            | SurfaceCall::SetProperty { name, .. }
            | SurfaceCall::SetTitle { name, .. }
            | SurfaceCall::Resize { name, .. }
            | SurfaceCall::Move { name, .. } => Some(name.as_str()),
            SurfaceCall::PumpEvents { .. } => None,
        }
    }
}

/// Shared, cloneable view of the calls a `RecordingSurface` has seen.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    calls: Arc<Mutex<Vec<SurfaceCall>>>,
}

impl CallLog {
    fn push(&self, call: SurfaceCall) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(call);
    }

    /// Copy of every call so far, oldest first.
    pub fn calls(&self) -> Vec<SurfaceCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, predicate: impl Fn(&SurfaceCall) -> bool) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|call| predicate(call))
            .count()
    }

    /// Frames rendered so far, oldest first.
    pub fn rendered_frames(&self) -> Vec<Frame> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter_map(|call| match call {
                SurfaceCall::Render { frame, .. } => Some(frame.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn render_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Render { .. }))
    }

    pub fn create_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::CreateOrShow { .. }))
    }

    pub fn destroy_count(&self) -> usize {
        self.count(|call| matches!(call, SurfaceCall::Destroy { .. }))
    }
}

#[derive(Debug, Default)]
struct Failures {
    creates: AtomicUsize,
    renders: AtomicUsize,
    titles: AtomicUsize,
}

/// Consume one injected failure from `counter`, if any remain.
fn take_failure(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    log: CallLog,
    failures: Arc<Failures>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the call log; stays valid after the surface is moved away.
    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    /// Make the next `count` calls to `create_or_show` fail. The attempts are
    /// still recorded.
    pub fn fail_next_creates(&self, count: usize) {
        self.failures.creates.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` calls to `render_frame` fail.
    pub fn fail_next_renders(&self, count: usize) {
        self.failures.renders.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` calls to `set_title` fail.
    pub fn fail_next_titles(&self, count: usize) {
        self.failures.titles.store(count, Ordering::SeqCst);
    }
}

impl DisplaySurface for RecordingSurface {
    fn create_or_show(
        &mut self,
        name: &str,
        flags: WindowFlags,
        position: Position,
    ) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::CreateOrShow {
            name: name.to_string(),
            flags,
            position,
        });
        if take_failure(&self.failures.creates) {
            return Err(SurfaceError::Unavailable("injected create failure".to_string()));
        }
        Ok(())
    }

    fn destroy(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::Destroy {
            name: name.to_string(),
        });
        Ok(())
    }

    fn render_frame(&mut self, name: &str, frame: &Frame) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::Render {
            name: name.to_string(),
            frame: frame.clone(),
        });
        if take_failure(&self.failures.renders) {
            return Err(SurfaceError::rejected("render_frame", "injected failure"));
        }
        Ok(())
    }

    fn pump_events(&mut self, timeout: Duration) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::PumpEvents { timeout });
        Ok(())
    }

    fn set_property(
        &mut self,
        name: &str,
        property: WindowProperty,
        value: f64,
    ) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::SetProperty {
            name: name.to_string(),
            property,
            value,
        });
        Ok(())
    }

    fn set_title(&mut self, name: &str, title: &str) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::SetTitle {
            name: name.to_string(),
            title: title.to_string(),
        });
        if take_failure(&self.failures.titles) {
            return Err(SurfaceError::rejected("set_title", "injected failure"));
        }
        Ok(())
    }

    fn resize(&mut self, name: &str, size: Size) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::Resize {
            name: name.to_string(),
            size,
        });
        Ok(())
    }

    fn move_window(&mut self, name: &str, position: Position) -> Result<(), SurfaceError> {
        self.log.push(SurfaceCall::Move {
            name: name.to_string(),
            position,
        });
        Ok(())
    }
}
