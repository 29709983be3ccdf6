// src/main.rs

//! Demo driver: a grid of headless windows, each fed by its own producer
//! thread, plus one window shared by every producer.

use anyhow::Context;
use log::{info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use window_worker::display::HeadlessSurface;
use window_worker::{DisplayWindow, Frame, WindowFlags, CONFIG};

fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    info!("Starting window-worker demo...");
    let demo = &CONFIG.demo;
    let columns = demo.columns.max(1);

    let shared_window = Arc::new(
        DisplayWindow::with_config("demo: shared", HeadlessSurface::new(), &CONFIG.window)
            .context("Failed to create shared window")?,
    );
    shared_window.set_location((demo.frame_width as usize * columns) as i32, 0);
    shared_window.set_title("demo: every producer writes here");

    let running = Arc::new(AtomicBool::new(true));
    let mut producers = Vec::with_capacity(demo.windows);

    for index in 0..demo.windows {
        let running = Arc::clone(&running);
        let shared_window = Arc::clone(&shared_window);
        let demo = demo.clone();
        let window_config = CONFIG.window.clone();

        let producer = thread::Builder::new()
            .name(format!("producer-{}", index))
            .spawn(move || -> anyhow::Result<u64> {
                let window = DisplayWindow::with_config(
                    format!("demo: window {}", index),
                    HeadlessSurface::new(),
                    &window_config,
                )?;
                let x = (index % columns) as u32 * demo.frame_width;
                let y = (index / columns) as u32 * demo.frame_height;
                window.set_location(x as i32, y as i32);
                window.set_window_flags(WindowFlags::AUTOSIZE);

                let mut shade: u8 = 0;
                let mut submitted = 0;
                while running.load(Ordering::Relaxed) {
                    let frame = Frame::filled(demo.frame_width, demo.frame_height, &[shade, 0, 0]);
                    window.submit_frame(&frame);
                    shared_window.submit_frame(&frame);
                    shade = shade.wrapping_add(1);
                    submitted += 1;
                    thread::sleep(Duration::from_millis(demo.frame_interval_ms));
                }
                Ok(submitted)
            })
            .context("Failed to spawn producer thread")?;
        producers.push(producer);
    }

    thread::sleep(Duration::from_millis(demo.run_for_ms / 2));
    info!("Hiding shared window");
    shared_window.set_visible(false);
    thread::sleep(Duration::from_millis(demo.run_for_ms / 4));
    info!("Showing shared window");
    shared_window.set_visible(true);
    thread::sleep(Duration::from_millis(demo.run_for_ms / 4));

    running.store(false, Ordering::Relaxed);
    for (index, producer) in producers.into_iter().enumerate() {
        match producer.join() {
            Ok(Ok(submitted)) => info!("producer-{} submitted {} frames", index, submitted),
            Ok(Err(e)) => warn!("producer-{} failed: {:#}", index, e),
            Err(_) => warn!("producer-{} panicked", index),
        }
    }

    shared_window.shutdown();
    info!("window-worker demo exited successfully.");
    Ok(())
}
