// src/window/tests.rs

use super::*;
use crate::display::drivers::{CallLog, RecordingSurface, SurfaceCall};
use crate::display::messages::SurfaceError;
use anyhow::Result;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::time::Instant;
use test_log::test;

const TIMEOUT: Duration = Duration::from_secs(5);

fn wait_until(what: &str, condition: impl Fn() -> bool) {
    let deadline = Instant::now() + TIMEOUT;
    while !condition() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        thread::sleep(Duration::from_millis(1));
    }
}

/// Run `op`, then wait until the worker has evaluated its wake predicate
/// at least once more. Only meaningful while the worker is idle.
fn settle(window: &DisplayWindow, op: impl FnOnce(&DisplayWindow)) {
    let before = window.worker_wakes();
    op(window);
    wait_until("a worker wake", || window.worker_wakes() > before);
}

fn recording_window(name: &str) -> Result<(DisplayWindow, CallLog)> {
    recording_window_with(name, &WindowConfig::default())
}

fn recording_window_with(name: &str, config: &WindowConfig) -> Result<(DisplayWindow, CallLog)> {
    let surface = RecordingSurface::new();
    let log = surface.log();
    Ok((DisplayWindow::with_config(name, surface, config)?, log))
}

fn hidden() -> WindowConfig {
    WindowConfig {
        visible: false,
        ..WindowConfig::default()
    }
}

fn frame(shade: u8) -> Frame {
    Frame::filled(4, 4, &[shade, 0, 0])
}

/// Submit a frame and wait until it has been rendered.
fn show(window: &DisplayWindow, log: &CallLog, frame: &Frame) {
    let renders = log.render_count();
    window.submit_frame(frame);
    wait_until("render", || log.render_count() > renders);
}

// --- Realization and rendering ---

#[test]
fn first_frame_realizes_at_stored_location_then_renders_and_pumps() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.set_location(300, 300);
    assert!(log.is_empty(), "location change before realization is stored only");

    show(&window, &log, &frame(1));
    window.shutdown();

    let calls = log.calls();
    assert_eq!(
        calls[..3],
        [
            SurfaceCall::CreateOrShow {
                name: "W".into(),
                flags: WindowFlags::empty(),
                position: Position::new(300, 300),
            },
            SurfaceCall::Render {
                name: "W".into(),
                frame: frame(1),
            },
            SurfaceCall::PumpEvents {
                timeout: Duration::from_millis(1),
            },
        ]
    );
    Ok(())
}

#[test]
fn stored_window_flags_and_pump_interval_are_used() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.set_window_flags(WindowFlags::AUTOSIZE);
    window.set_pump_interval(Duration::from_millis(5));

    show(&window, &log, &frame(1));
    window.shutdown();

    let calls = log.calls();
    assert!(matches!(
        &calls[0],
        SurfaceCall::CreateOrShow { flags, .. } if *flags == WindowFlags::AUTOSIZE
    ));
    assert!(calls.contains(&SurfaceCall::PumpEvents {
        timeout: Duration::from_millis(5)
    }));
    Ok(())
}

// --- Last-write-wins ---

#[test]
fn superseded_frame_is_never_rendered() -> Result<()> {
    let (window, log) = recording_window_with("W", &hidden())?;
    window.submit_frame(&frame(0xA));
    window.submit_frame(&frame(0xB));
    window.set_visible(true);

    wait_until("render", || log.render_count() == 1);
    window.shutdown();

    assert_eq!(log.rendered_frames(), vec![frame(0xB)]);
    Ok(())
}

/// Blocks inside the first `render_frame` until the test releases it.
struct GatedSurface {
    inner: RecordingSurface,
    gate: Option<(Sender<()>, Receiver<()>)>,
}

impl DisplaySurface for GatedSurface {
    fn create_or_show(
        &mut self,
        name: &str,
        flags: WindowFlags,
        position: Position,
    ) -> Result<(), SurfaceError> {
        self.inner.create_or_show(name, flags, position)
    }

    fn destroy(&mut self, name: &str) -> Result<(), SurfaceError> {
        self.inner.destroy(name)
    }

    fn render_frame(&mut self, name: &str, frame: &Frame) -> Result<(), SurfaceError> {
        if let Some((entered, release)) = self.gate.take() {
            let _ = entered.send(());
            let _ = release.recv();
        }
        self.inner.render_frame(name, frame)
    }

    fn pump_events(&mut self, timeout: Duration) -> Result<(), SurfaceError> {
        self.inner.pump_events(timeout)
    }

    fn set_property(
        &mut self,
        name: &str,
        property: WindowProperty,
        value: f64,
    ) -> Result<(), SurfaceError> {
        self.inner.set_property(name, property, value)
    }

    fn set_title(&mut self, name: &str, title: &str) -> Result<(), SurfaceError> {
        self.inner.set_title(name, title)
    }

    fn resize(&mut self, name: &str, size: Size) -> Result<(), SurfaceError> {
        self.inner.resize(name, size)
    }

    fn move_window(&mut self, name: &str, position: Position) -> Result<(), SurfaceError> {
        self.inner.move_window(name, position)
    }
}

#[test]
fn frames_submitted_while_worker_is_busy_collapse_to_the_latest() -> Result<()> {
    let (entered_tx, entered_rx) = channel();
    let (release_tx, release_rx) = channel();
    let inner = RecordingSurface::new();
    let log = inner.log();
    let window = DisplayWindow::new(
        "W",
        GatedSurface {
            inner,
            gate: Some((entered_tx, release_rx)),
        },
    )?;

    window.submit_frame(&frame(0x1));
    entered_rx.recv_timeout(TIMEOUT)?;

    // Worker is stuck inside render; producers must not be.
    window.submit_frame(&frame(0xA));
    window.submit_frame(&frame(0xB));
    release_tx.send(())?;

    wait_until("second render", || log.render_count() == 2);
    window.shutdown();

    assert_eq!(log.rendered_frames(), vec![frame(0x1), frame(0xB)]);
    Ok(())
}

#[test]
fn submitted_frame_outlives_the_callers_copy() -> Result<()> {
    let (window, log) = recording_window_with("W", &hidden())?;
    let submitted = Frame::new(4, 4, 3, vec![9u8; 4 * 4 * 3]);
    window.submit_frame(&submitted);
    drop(submitted);

    window.set_visible(true);
    wait_until("render", || log.render_count() == 1);
    assert!(log.rendered_frames()[0].pixels().iter().all(|&b| b == 9));
    Ok(())
}

// --- Commands ---

#[test]
fn commands_apply_in_enqueue_order_while_realized() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));

    window.set_title("a");
    window.resize(640, 480);
    window.move_window(10, 20);
    window.set_property(WindowProperty::Topmost, 1.0);
    window.resize_to(Size::new(320, 240));
    window.set_title("b");

    let is_command = |call: &SurfaceCall| {
        !matches!(
            call,
            SurfaceCall::CreateOrShow { .. }
                | SurfaceCall::Render { .. }
                | SurfaceCall::PumpEvents { .. }
        )
    };
    wait_until("six commands", || log.count(is_command) == 6);

    let commands: Vec<SurfaceCall> = log.calls().into_iter().filter(|c| is_command(c)).collect();
    assert_eq!(
        commands,
        vec![
            SurfaceCall::SetTitle {
                name: "W".into(),
                title: "a".into()
            },
            SurfaceCall::Resize {
                name: "W".into(),
                size: Size::new(640, 480)
            },
            SurfaceCall::Move {
                name: "W".into(),
                position: Position::new(10, 20)
            },
            SurfaceCall::SetProperty {
                name: "W".into(),
                property: WindowProperty::Topmost,
                value: 1.0
            },
            SurfaceCall::Resize {
                name: "W".into(),
                size: Size::new(320, 240)
            },
            SurfaceCall::SetTitle {
                name: "W".into(),
                title: "b".into()
            },
        ]
    );
    Ok(())
}

fn titles(log: &CallLog) -> Vec<String> {
    log.calls()
        .into_iter()
        .filter_map(|call| match call {
            SurfaceCall::SetTitle { title, .. } => Some(title),
            _ => None,
        })
        .collect()
}

#[test]
fn latest_title_enqueued_before_realization_wins() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.enqueue_command(Command::SetTitle("t1".into()));
    window.enqueue_command(Command::SetTitle("t2".into()));
    wait_until("titles folded", || {
        window.shared.surface().pending_title() == Some("t2")
    });

    show(&window, &log, &frame(1));
    window.shutdown();

    assert_eq!(titles(&log), vec!["t2".to_string()]);
    assert!(matches!(log.calls()[0], SurfaceCall::CreateOrShow { .. }));
    Ok(())
}

#[test]
fn explicit_location_overrides_an_earlier_queued_move() -> Result<()> {
    let (window, log) = recording_window_with("W", &hidden())?;
    window.move_window(10, 10);
    wait_until("move folded", || {
        window.shared.surface().position == Position::new(10, 10)
    });
    window.set_location(50, 50);
    for n in 0..1000 {
        window.set_title(format!("title {}", n));
    }
    wait_until("titles folded", || {
        window.shared.surface().pending_title() == Some("title 999")
    });

    window.submit_frame(&frame(1));
    window.set_visible(true);
    wait_until("render", || log.render_count() == 1);
    window.shutdown();

    let calls = log.calls();
    assert_eq!(
        calls[..3],
        [
            SurfaceCall::CreateOrShow {
                name: "W".into(),
                flags: WindowFlags::empty(),
                position: Position::new(50, 50),
            },
            SurfaceCall::SetTitle {
                name: "W".into(),
                title: "title 999".into(),
            },
            SurfaceCall::Render {
                name: "W".into(),
                frame: frame(1),
            },
        ]
    );
    assert!(!calls
        .iter()
        .any(|call| matches!(call, SurfaceCall::Move { .. })));
    Ok(())
}

#[test]
fn property_change_without_a_surface_is_dropped() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.set_property(WindowProperty::Fullscreen, 1.0);
    wait_until("command drain", || window.shared.frames().commands.is_empty());

    show(&window, &log, &frame(1));
    window.shutdown();

    assert_eq!(
        log.count(|call| matches!(call, SurfaceCall::SetProperty { .. })),
        0
    );
    Ok(())
}

// --- Visibility ---

#[test]
fn hiding_destroys_and_pending_frame_renders_once_shown() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));

    window.set_visible(false);
    wait_until("destroy", || log.destroy_count() == 1);
    assert!(!window.is_realized());

    // Hidden: the frame stays pending and nothing is drawn.
    settle(&window, |w| w.submit_frame(&frame(2)));
    assert_eq!(log.render_count(), 1);

    // The pending flag survives the toggle.
    window.set_visible(true);
    wait_until("render after show", || log.render_count() == 2);
    window.shutdown();

    assert_eq!(log.rendered_frames(), vec![frame(1), frame(2)]);
    assert_eq!(log.create_count(), 2);
    Ok(())
}

#[test]
fn showing_without_a_pending_frame_renders_nothing() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));

    window.set_visible(false);
    wait_until("destroy", || log.destroy_count() == 1);

    settle(&window, |w| w.set_visible(true));
    assert!(window.is_visible());
    assert!(!window.is_realized());
    assert_eq!(log.render_count(), 1);
    assert_eq!(log.create_count(), 1);
    Ok(())
}

// --- Rename and location ---

#[test]
fn rename_destroys_old_surface_and_redirects_later_calls() -> Result<()> {
    let (window, log) = recording_window("W1")?;
    show(&window, &log, &frame(1));

    window.rename("W2");
    assert_eq!(
        log.calls().last(),
        Some(&SurfaceCall::Destroy { name: "W1".into() }),
        "rename destroys synchronously"
    );
    assert_eq!(window.name(), "W2");
    let cutoff = log.len();

    show(&window, &log, &frame(2));
    window.set_location(5, 5);
    window.set_title("renamed");
    wait_until("title", || {
        log.count(|call| matches!(call, SurfaceCall::SetTitle { .. })) == 1
    });
    window.shutdown();

    let after = &log.calls()[cutoff..];
    assert!(after
        .iter()
        .filter_map(SurfaceCall::target)
        .all(|name| name == "W2"));
    assert!(after.contains(&SurfaceCall::Destroy { name: "W2".into() }));
    Ok(())
}

#[test]
fn set_location_moves_a_realized_surface_immediately() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));

    window.set_location(42, 24);
    assert_eq!(
        log.calls().last(),
        Some(&SurfaceCall::Move {
            name: "W".into(),
            position: Position::new(42, 24)
        })
    );
    Ok(())
}

// --- Failures ---

#[test]
fn invalid_frames_are_skipped_without_realizing() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.submit_frame(&Frame::empty());
    wait_until("empty frame consumed", || {
        !window.shared.frames().slot.is_pending()
    });
    window.submit_frame(&Frame::new(4, 4, 3, vec![0u8; 5]));
    wait_until("short frame consumed", || {
        !window.shared.frames().slot.is_pending()
    });

    show(&window, &log, &frame(7));
    window.shutdown();

    assert_eq!(log.create_count(), 1);
    assert_eq!(log.rendered_frames(), vec![frame(7)]);
    Ok(())
}

#[test]
fn failed_create_leaves_no_surface_and_next_frame_retries() -> Result<()> {
    let surface = RecordingSurface::new();
    surface.fail_next_creates(1);
    let log = surface.log();
    let window = DisplayWindow::new("W", surface)?;

    window.submit_frame(&frame(1));
    wait_until("create attempt", || log.create_count() == 1);
    assert!(!window.is_realized());
    assert_eq!(log.render_count(), 0);

    show(&window, &log, &frame(2));
    assert!(window.is_realized());
    assert_eq!(log.create_count(), 2);
    assert_eq!(log.rendered_frames(), vec![frame(2)]);
    Ok(())
}

#[test]
fn failed_render_skips_the_pump_and_next_frame_renders() -> Result<()> {
    let surface = RecordingSurface::new();
    surface.fail_next_renders(1);
    let log = surface.log();
    let window = DisplayWindow::new("W", surface)?;

    window.submit_frame(&frame(1));
    wait_until("render attempt", || log.render_count() == 1);
    assert!(window.is_realized());

    show(&window, &log, &frame(2));
    window.shutdown();

    assert_eq!(log.rendered_frames(), vec![frame(1), frame(2)]);
    assert_eq!(
        log.count(|call| matches!(call, SurfaceCall::PumpEvents { .. })),
        1
    );
    assert_eq!(log.create_count(), 1);
    Ok(())
}

#[test]
fn failed_command_does_not_stop_the_rest_of_the_drain() -> Result<()> {
    let surface = RecordingSurface::new();
    let control = surface.clone();
    let log = surface.log();
    let window = DisplayWindow::new("W", surface)?;
    show(&window, &log, &frame(1));

    control.fail_next_titles(1);
    window.move_window(1, 2);
    window.set_title("refused");
    window.resize(3, 4);
    window.set_title("accepted");

    let is_command = |call: &SurfaceCall| {
        matches!(
            call,
            SurfaceCall::Move { .. } | SurfaceCall::SetTitle { .. } | SurfaceCall::Resize { .. }
        )
    };
    wait_until("four commands", || log.count(is_command) == 4);
    show(&window, &log, &frame(2));
    window.shutdown();

    let commands: Vec<SurfaceCall> = log.calls().into_iter().filter(|c| is_command(c)).collect();
    assert_eq!(
        commands,
        vec![
            SurfaceCall::Move {
                name: "W".into(),
                position: Position::new(1, 2)
            },
            SurfaceCall::SetTitle {
                name: "W".into(),
                title: "refused".into()
            },
            SurfaceCall::Resize {
                name: "W".into(),
                size: Size::new(3, 4)
            },
            SurfaceCall::SetTitle {
                name: "W".into(),
                title: "accepted".into()
            },
        ]
    );
    assert_eq!(log.rendered_frames(), vec![frame(1), frame(2)]);
    Ok(())
}

// --- Shutdown ---

#[test]
fn shutdown_is_idempotent_and_leaves_no_surface() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));

    window.shutdown();
    window.shutdown();

    assert!(window.is_shut_down());
    assert!(!window.is_realized());
    assert_eq!(log.destroy_count(), 1);
    Ok(())
}

#[test]
fn operations_after_shutdown_are_ignored() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));
    window.shutdown();
    let calls = log.len();

    window.submit_frame(&frame(2));
    window.set_visible(false);
    window.set_title("late");
    window.rename("late");
    window.set_location(1, 1);
    window.set_window_flags(WindowFlags::OPENGL);

    assert_eq!(log.len(), calls);
    assert_eq!(window.name(), "W");
    assert!(window.is_visible());
    Ok(())
}

#[test]
fn dropping_the_handle_destroys_the_surface() -> Result<()> {
    let (window, log) = recording_window("W")?;
    show(&window, &log, &frame(1));
    drop(window);

    assert_eq!(
        log.calls().last(),
        Some(&SurfaceCall::Destroy { name: "W".into() })
    );
    Ok(())
}

#[test]
fn shutting_down_an_unrealized_window_touches_nothing() -> Result<()> {
    let (window, log) = recording_window("W")?;
    window.shutdown();
    assert!(log.is_empty());
    Ok(())
}
