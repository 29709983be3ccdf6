// src/frame.rs

//! Defines `Frame`, an immutable snapshot of a pixel buffer handed to a
//! display window.
//!
//! Frames are copied on submission, so a producer can keep mutating its own
//! buffer after calling `DisplayWindow::submit_frame`.

use std::fmt;

/// An immutable, tightly packed pixel buffer.
///
/// Pixels are stored row-major with `channels` interleaved bytes per pixel
/// (e.g. 3 for BGR, 4 for BGRA). No stride padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Frame {
    width: u32,
    height: u32,
    channels: u8,
    pixels: Box<[u8]>,
}

impl Frame {
    /// Wraps raw pixel bytes. The length is not checked here; a frame whose
    /// byte count does not match its dimensions is reported by `is_valid`
    /// and never rendered.
    pub fn new(width: u32, height: u32, channels: u8, pixels: impl Into<Box<[u8]>>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels: pixels.into(),
        }
    }

    /// A frame with every pixel set to `color`. The channel count is
    /// `color.len()`; more than 255 channels yields a frame with zero
    /// channels, which `is_valid` rejects.
    pub fn filled(width: u32, height: u32, color: &[u8]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut pixels = Vec::with_capacity(pixel_count * color.len());
        for _ in 0..pixel_count {
            pixels.extend_from_slice(color);
        }
        let channels = u8::try_from(color.len()).unwrap_or(0);
        Self::new(width, height, channels, pixels)
    }

    /// A zero-sized frame. Submitting it consumes the pending slot but
    /// renders nothing.
    pub fn empty() -> Self {
        Self::new(0, 0, 0, Vec::new())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Number of bytes the dimensions call for.
    pub fn expected_len(&self) -> usize {
        self.width as usize * self.height as usize * self.channels as usize
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.channels == 0 || self.pixels.is_empty()
    }

    /// True when the frame has pixels and its byte count matches its
    /// dimensions.
    pub fn is_valid(&self) -> bool {
        !self.is_empty() && self.pixels.len() == self.expected_len()
    }
}

// Pixel data is omitted; a 1080p frame in a debug log is not useful.
impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("channels", &self.channels)
            .field("len", &self.pixels.len())
            .finish()
    }
}
