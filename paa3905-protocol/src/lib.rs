//! PAA3905 Frame Stream Protocol
//!
//! This crate decodes the raw-image stream that PAA3905 sensor firmware
//! writes to a serial port. The sensor grabs a 35x35 grid of 8-bit samples
//! and streams it without any framing metadata beyond a single terminator:
//!
//! ```text
//! ┌──────────┬──────────┬─────┬─────────────┬──────────┐
//! │ SAMPLE 0 │ SAMPLE 1 │ ... │ SAMPLE 1224 │ SENTINEL │
//! │ 1B       │ 1B       │     │ 1B          │ 0xFF     │
//! └──────────┴──────────┴─────┴─────────────┴──────────┘
//! ```
//!
//! Samples arrive in the sensor's raster order and are stored mirrored on
//! both axes, so sample 0 lands in the bottom-right cell. There is no
//! escaping: an intensity of 255 can never be transmitted.
//!
//! The decoder is a bounded-state, byte-at-a-time transducer with no I/O,
//! suitable for running forever on an unbounded stream.
//!
//! # Motion reports
//!
//! In its normal mode the same sensor answers motion-burst reads instead of
//! streaming images. [`MotionBurst`] decodes a captured 14-byte report, which
//! is what flight-controller firmware and log replay tools need to judge
//! whether a flow sample is trustworthy:
//!
//! ```
//! use paa3905_protocol::{LightMode, MotionBurst};
//!
//! let report = [0x80, 0x00, 0x05, 0x00, 0xFD, 0xFF, 0, 60, 0, 0, 0, 0x00, 0x10, 0x00];
//! let burst = MotionBurst::from_slice(&report).unwrap();
//!
//! assert!(burst.motion_available);
//! assert_eq!(burst.light_mode, LightMode::Bright);
//! assert_eq!((burst.delta_x, burst.delta_y), (5, -3));
//! assert!(burst.data_above_thresholds());
//! ```

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod decoder;
pub mod frame;
pub mod motion;

pub use decoder::{FrameCompleted, FrameDecoder};
pub use frame::{
    encode_frame, Frame, FRAME_PIXELS, FRAME_SIDE, MAX_INTENSITY, SENTINEL, WIRE_FRAME_LEN,
};
pub use motion::{LightMode, MotionBurst, MOTION_BURST_LEN};
