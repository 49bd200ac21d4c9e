//! Frame sink abstraction and rendering helpers for PAA3905 viewers
//!
//! This crate provides:
//! - `FrameSink` trait for anything that consumes decoded frames (windows,
//!   terminals, recorders)
//! - `SinkControl` for propagating a user cancel back to the read loop
//! - Nearest-neighbour upscaling and grayscale pixel conversion
//!
//! # Architecture
//!
//! Sinks only see complete frames. They never touch the byte stream or the
//! decoder, so the same sink works for live serial input and for replayed
//! captures.

#![no_std]
#![deny(unsafe_code)]

pub mod sink;
pub mod upscale;

// Re-export key types
pub use sink::{DisplayError, FrameSink, SinkControl, DEFAULT_SCALE, WINDOW_TITLE};
pub use upscale::{gray_to_rgb, scaled_side, upscale};
