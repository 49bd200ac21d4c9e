//! Frame sink trait
//!
//! Defines the interface for displays that present decoded frames.

use paa3905_protocol::Frame;

/// Nearest-neighbour upscale factor used by windowed sinks
pub const DEFAULT_SCALE: usize = 10;

/// Title for windowed sinks
pub const WINDOW_TITLE: &str = "PAA3905 [ESC to quit]";

/// Rendering errors shared by sink implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DisplayError {
    /// Output buffer cannot hold the rendered image
    BufferTooSmall,
    /// Scale factor of zero, or too large for the upscaled image to fit
    InvalidScale,
}

impl core::fmt::Display for DisplayError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DisplayError::BufferTooSmall => f.write_str("output buffer too small"),
            DisplayError::InvalidScale => f.write_str("scale factor out of range"),
        }
    }
}

/// What the read loop should do after a sink call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SinkControl {
    /// Keep reading
    Continue,
    /// The user asked to stop (e.g. pressed ESC)
    Quit,
}

impl SinkControl {
    /// Returns true if processing should stop
    pub fn is_quit(self) -> bool {
        matches!(self, SinkControl::Quit)
    }
}

/// Frame sink trait
///
/// Consumes completed frames. Implementations handle the specifics of
/// windows, terminals or recorders.
pub trait FrameSink {
    /// Error type for present/poll operations
    type Error;

    /// Present a completed frame
    ///
    /// Called once per frame boundary, in stream order.
    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Self::Error>;

    /// Service the sink while no frame is pending
    ///
    /// Windowed sinks pump their event queue here so a stalled stream does
    /// not freeze the UI.
    fn poll(&mut self) -> Result<SinkControl, Self::Error> {
        Ok(SinkControl::Continue)
    }
}

impl<K: FrameSink + ?Sized> FrameSink for &mut K {
    type Error = K::Error;

    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Self::Error> {
        (**self).present(frame)
    }

    fn poll(&mut self) -> Result<SinkControl, Self::Error> {
        (**self).poll()
    }
}
