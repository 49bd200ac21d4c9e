//! PAA3905 Hardware Abstraction Layer
//!
//! Defines the pull-based byte source the frame decoder is driven from.
//! Host applications implement it over a serial port; tests implement it
//! over in-memory buffers.
//!
//! ```text
//! ┌──────────────┐   bytes   ┌──────────────┐  frames  ┌──────────────┐
//! │  ByteSource  │ ────────▶ │ FrameDecoder │ ───────▶ │  FrameSink   │
//! └──────────────┘           └──────────────┘          └──────────────┘
//! ```

#![no_std]
#![deny(unsafe_code)]

pub mod source;

pub use source::{ByteSource, DataBits, Exhausted, Parity, SliceSource, StopBits, UartConfig};
