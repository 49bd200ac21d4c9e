//! ANSI terminal sink
//!
//! Draws each frame with upper-half-block characters: one character cell
//! covers two frame rows, foreground for the upper row and background for
//! the lower one. Uses the 24-step grayscale ramp of the 256-colour palette.
//!
//! A terminal has no close button, so the sink watches a shared stop flag
//! instead. `main` sets it from the Ctrl-C handler.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use paa3905_display::{FrameSink, SinkControl};
use paa3905_protocol::{Frame, FRAME_SIDE};

use super::SinkError;

/// First entry of the 256-colour grayscale ramp
const GRAY_RAMP_START: u8 = 232;
/// Palette black, used below an odd last row
const PALETTE_BLACK: u8 = 16;

const CURSOR_HOME: &str = "\x1b[H";
const CLEAR_SCREEN: &str = "\x1b[2J";
const RESET: &str = "\x1b[0m";

/// Map an intensity to the 256-colour grayscale ramp (232..=255)
pub fn ansi_gray(value: u8) -> u8 {
    GRAY_RAMP_START + (u16::from(value) * 24 / 256) as u8
}

/// Renders frames as text to any writer
pub struct TerminalSink<W: Write> {
    out: W,
    frames: u64,
    stop: Arc<AtomicBool>,
}

impl<W: Write> TerminalSink<W> {
    /// Render to `out` until `stop` is set
    pub fn new(out: W, stop: Arc<AtomicBool>) -> Self {
        Self {
            out,
            frames: 0,
            stop,
        }
    }

    fn control(&self) -> SinkControl {
        if self.stop.load(Ordering::Relaxed) {
            SinkControl::Quit
        } else {
            SinkControl::Continue
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn draw(&mut self, frame: &Frame) -> std::io::Result<()> {
        if self.frames == 0 {
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
        }
        self.out.write_all(CURSOR_HOME.as_bytes())?;

        let rows: Vec<&[u8; FRAME_SIDE]> = frame.rows().collect();
        for pair in rows.chunks(2) {
            let upper = pair[0];
            let lower = pair.get(1).copied();
            for col in 0..FRAME_SIDE {
                let bg = lower.map_or(PALETTE_BLACK, |row| ansi_gray(row[col]));
                write!(
                    self.out,
                    "\x1b[38;5;{}m\x1b[48;5;{}m\u{2580}",
                    ansi_gray(upper[col]),
                    bg
                )?;
            }
            writeln!(self.out, "{RESET}")?;
        }

        let (lo, hi) = frame.min_max();
        writeln!(
            self.out,
            "frame {:>6}  min {:>3}  max {:>3}  mean {:>3}  (Ctrl-C to quit)",
            self.frames + 1,
            lo,
            hi,
            frame.mean()
        )?;
        self.out.flush()
    }
}

impl<W: Write> FrameSink for TerminalSink<W> {
    type Error = SinkError;

    fn present(&mut self, frame: &Frame) -> Result<SinkControl, Self::Error> {
        self.draw(frame)?;
        self.frames += 1;
        Ok(self.control())
    }

    fn poll(&mut self) -> Result<SinkControl, Self::Error> {
        Ok(self.control())
    }
}
