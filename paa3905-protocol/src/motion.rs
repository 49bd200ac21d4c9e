//! Motion burst report decoding
//!
//! The sensor answers a motion-burst read with a fixed 14-byte report:
//!
//! | Byte   | Content                                   |
//! |--------|-------------------------------------------|
//! | 0      | bit 7 motion available, bit 0 challenging |
//! | 1      | bits 7..6 light mode                      |
//! | 2..=3  | delta X, little-endian i16                |
//! | 4..=5  | delta Y, little-endian i16                |
//! | 7      | surface quality (SQUAL)                   |
//! | 8      | raw data sum                              |
//! | 9      | raw data max                              |
//! | 10     | raw data min                              |
//! | 11..=13| shutter, big-endian, 23 bits              |
//!
//! Image capture and motion reporting are separate sensor modes; the frame
//! stream never carries these reports.

/// Length of a motion burst report in bytes
pub const MOTION_BURST_LEN: usize = 14;

const MOTION_AVAILABLE: u8 = 0x80;
const CHALLENGING_SURFACE: u8 = 0x01;
const SHUTTER_MASK: u32 = 0x7F_FFFF;

const SHUTTER_LIMIT_BRIGHT_LOW: u32 = 0x00_FF80;
const SHUTTER_LIMIT_SUPERLOW: u32 = 0x02_5998;

/// Illumination mode the sensor selected for the current frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LightMode {
    Bright,
    Low,
    SuperLow,
    Unknown,
}

impl LightMode {
    /// Decode from the two mode bits (bits 7..6 of the observation byte)
    pub fn from_bits(byte: u8) -> Self {
        match (byte & 0xC0) >> 6 {
            0 => LightMode::Bright,
            1 => LightMode::Low,
            2 => LightMode::SuperLow,
            _ => LightMode::Unknown,
        }
    }

    /// Minimum SQUAL and shutter ceiling for trustworthy motion data
    fn thresholds(self) -> Option<(u8, u32)> {
        match self {
            LightMode::Bright => Some((25, SHUTTER_LIMIT_BRIGHT_LOW)),
            LightMode::Low => Some((70, SHUTTER_LIMIT_BRIGHT_LOW)),
            LightMode::SuperLow => Some((85, SHUTTER_LIMIT_SUPERLOW)),
            LightMode::Unknown => None,
        }
    }
}

/// A decoded motion burst report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionBurst {
    pub motion_available: bool,
    pub challenging_surface: bool,
    pub light_mode: LightMode,
    pub delta_x: i16,
    pub delta_y: i16,
    pub surface_quality: u8,
    pub raw_data_sum: u8,
    pub raw_data_max: u8,
    pub raw_data_min: u8,
    /// Exposure time, 23-bit
    pub shutter: u32,
}

impl MotionBurst {
    /// Decode a raw 14-byte report
    pub fn parse(data: &[u8; MOTION_BURST_LEN]) -> Self {
        Self {
            motion_available: data[0] & MOTION_AVAILABLE != 0,
            challenging_surface: data[0] & CHALLENGING_SURFACE != 0,
            light_mode: LightMode::from_bits(data[1]),
            delta_x: i16::from_le_bytes([data[2], data[3]]),
            delta_y: i16::from_le_bytes([data[4], data[5]]),
            surface_quality: data[7],
            raw_data_sum: data[8],
            raw_data_max: data[9],
            raw_data_min: data[10],
            shutter: u32::from_be_bytes([0, data[11], data[12], data[13]]) & SHUTTER_MASK,
        }
    }

    /// Decode from a slice, or `None` if it is shorter than a report
    pub fn from_slice(data: &[u8]) -> Option<Self> {
        data.get(..MOTION_BURST_LEN)
            .and_then(|head| <&[u8; MOTION_BURST_LEN]>::try_from(head).ok())
            .map(Self::parse)
    }

    /// Whether SQUAL and shutter indicate usable motion data
    ///
    /// Data is rejected only when surface quality is below the mode's
    /// minimum *and* the shutter has reached the mode's ceiling.
    pub fn data_above_thresholds(&self) -> bool {
        match self.light_mode.thresholds() {
            Some((min_squal, shutter_limit)) => {
                !(self.surface_quality < min_squal && self.shutter >= shutter_limit)
            }
            None => true,
        }
    }
}
