//! Sentinel-delimited frame decoder.
//!
//! Every byte other than [`SENTINEL`] is a pixel sample written at the
//! current cursor through the mirrored raster mapping. A sentinel emits the
//! working buffer and starts a fresh, zeroed one.
//!
//! Short frames (sentinel before 1225 samples) are emitted with their
//! unwritten cells left at zero. Overlong frames wrap: sample 1225 lands on
//! the same cell as sample 0.

use core::mem;

use crate::frame::{Frame, FRAME_PIXELS, SENTINEL};

/// A frame emitted at a sentinel boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameCompleted {
    /// The decoded image
    pub frame: Frame,
    /// Pixel bytes consumed since the previous boundary (saturating)
    pub samples: usize,
}

impl FrameCompleted {
    /// Exactly one frame's worth of samples arrived
    pub fn is_full(&self) -> bool {
        self.samples == FRAME_PIXELS
    }

    /// The sentinel arrived before the frame was filled
    pub fn is_short(&self) -> bool {
        self.samples < FRAME_PIXELS
    }

    /// More samples arrived than fit; early cells were overwritten
    pub fn overran(&self) -> bool {
        self.samples > FRAME_PIXELS
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FrameCompleted {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "FrameCompleted(samples={}, frame={})", self.samples, self.frame);
    }
}

/// Incremental decoder for the PAA3905 frame stream
///
/// Holds one working frame and its fill state. `feed` is total: it accepts
/// every byte value in every order and never fails.
#[derive(Debug, Clone)]
pub struct FrameDecoder {
    buffer: Frame,
    /// Write index into the raster order, always `< FRAME_PIXELS`
    cursor: usize,
    samples: usize,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with an empty working frame
    pub const fn new() -> Self {
        Self {
            buffer: Frame::blank(),
            cursor: 0,
            samples: 0,
        }
    }

    /// Discard the in-progress frame
    pub fn reset(&mut self) {
        self.buffer = Frame::blank();
        self.cursor = 0;
        self.samples = 0;
    }

    /// Samples written since the last boundary
    pub fn count(&self) -> usize {
        self.samples
    }

    /// Raster index the next sample will be written to
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The frame being accumulated
    pub fn working_frame(&self) -> &Frame {
        &self.buffer
    }

    /// Feed a single byte to the decoder
    ///
    /// Returns `Some(completed)` when `byte` is the sentinel, `None` when it
    /// was stored as a sample.
    pub fn feed(&mut self, byte: u8) -> Option<FrameCompleted> {
        if byte == SENTINEL {
            let completed = FrameCompleted {
                frame: mem::take(&mut self.buffer),
                samples: self.samples,
            };
            self.cursor = 0;
            self.samples = 0;
            return Some(completed);
        }

        self.buffer.write_sample(self.cursor, byte);
        self.cursor = (self.cursor + 1) % FRAME_PIXELS;
        self.samples = self.samples.saturating_add(1);
        None
    }

    /// Feed multiple bytes to the decoder
    ///
    /// Stops at the first completed frame and returns it together with the
    /// number of bytes consumed (including the sentinel). Bytes after the
    /// sentinel are not consumed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> (usize, Option<FrameCompleted>) {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(completed) = self.feed(byte) {
                return (i + 1, Some(completed));
            }
        }
        (bytes.len(), None)
    }
}
