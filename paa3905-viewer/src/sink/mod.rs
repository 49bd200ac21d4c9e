//! Frame sinks for the host viewer

mod terminal;
#[cfg(feature = "sdl")]
mod sdl;

pub use terminal::TerminalSink;
#[cfg(feature = "sdl")]
pub use sdl::SdlSink;

use std::io;

/// Errors from frame sinks
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// Writing to the output failed
    #[error("output failed: {0}")]
    Io(#[from] io::Error),
    /// Image conversion failed
    #[cfg(feature = "sdl")]
    #[error("render failed: {0}")]
    Render(paa3905_display::DisplayError),
    /// SDL reported an error
    #[cfg(feature = "sdl")]
    #[error("SDL error: {0}")]
    Sdl(String),
}

#[cfg(feature = "sdl")]
impl From<paa3905_display::DisplayError> for SinkError {
    fn from(e: paa3905_display::DisplayError) -> Self {
        SinkError::Render(e)
    }
}
