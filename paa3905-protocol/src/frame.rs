//! Frame storage and the sensor-side wire encoding.
//!
//! Wire format, one frame:
//! - SAMPLES (1225 bytes): raw-data grab in sensor raster order
//! - SENTINEL (1 byte): 0xFF frame boundary

use heapless::Vec;

/// Samples per frame side
pub const FRAME_SIDE: usize = 35;

/// Samples per frame
pub const FRAME_PIXELS: usize = FRAME_SIDE * FRAME_SIDE;

/// Frame boundary marker. Never stored as pixel data.
pub const SENTINEL: u8 = 0xFF;

/// Largest intensity that can travel on the wire
pub const MAX_INTENSITY: u8 = SENTINEL - 1;

/// Encoded frame size (SAMPLES + SENTINEL)
pub const WIRE_FRAME_LEN: usize = FRAME_PIXELS + 1;

/// Map a raster-order sample index to its `(row, col)` storage cell.
///
/// The grid is mirrored on both axes: index 0 is `(34, 34)` and index 1224 is
/// `(0, 0)`. Indices past the end wrap modulo [`FRAME_PIXELS`].
#[inline]
pub const fn storage_cell(index: usize) -> (usize, usize) {
    let index = index % FRAME_PIXELS;
    (
        FRAME_SIDE - (index / FRAME_SIDE) - 1,
        FRAME_SIDE - (index % FRAME_SIDE) - 1,
    )
}

/// One 35x35 grayscale image, indexed `[row][col]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: [[u8; FRAME_SIDE]; FRAME_SIDE],
}

impl Default for Frame {
    fn default() -> Self {
        Self::blank()
    }
}

impl Frame {
    /// Create an all-zero frame
    pub const fn blank() -> Self {
        Self {
            cells: [[0; FRAME_SIDE]; FRAME_SIDE],
        }
    }

    /// Build a frame from a capture in sensor raster order
    ///
    /// Produces the same image the decoder reconstructs when the capture is
    /// streamed through [`encode_frame`].
    pub fn from_sensor_raster(raster: &[u8; FRAME_PIXELS]) -> Self {
        let mut frame = Self::blank();
        for (index, &sample) in raster.iter().enumerate() {
            frame.write_sample(index, sample);
        }
        frame
    }

    /// Write a raster-order sample into its mirrored storage cell
    #[inline]
    pub(crate) fn write_sample(&mut self, index: usize, sample: u8) {
        let (row, col) = storage_cell(index);
        self.cells[row][col] = sample;
    }

    /// Get the sample at `(row, col)`, or `None` if out of range
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Set the sample at `(row, col)`
    ///
    /// Returns `false` if the position is out of range.
    pub fn set(&mut self, row: usize, col: usize, value: u8) -> bool {
        match self.cells.get_mut(row).and_then(|r| r.get_mut(col)) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    /// Rows from top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[u8; FRAME_SIDE]> {
        self.cells.iter()
    }

    /// All samples in row-major order
    pub fn pixels(&self) -> impl Iterator<Item = u8> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    /// Row-major view of the whole frame
    pub fn as_bytes(&self) -> &[u8] {
        self.cells.as_flattened()
    }

    /// Smallest and largest sample
    pub fn min_max(&self) -> (u8, u8) {
        self.pixels()
            .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p), hi.max(p)))
    }

    /// Mean intensity, rounded down
    pub fn mean(&self) -> u8 {
        let sum: u32 = self.pixels().map(u32::from).sum();
        (sum / FRAME_PIXELS as u32) as u8
    }

    /// Width and height in samples
    pub const fn side(&self) -> usize {
        FRAME_SIDE
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for Frame {
    fn format(&self, f: defmt::Formatter) {
        let (lo, hi) = self.min_max();
        defmt::write!(f, "Frame[{}x{}, min={}, max={}]", FRAME_SIDE, FRAME_SIDE, lo, hi);
    }
}

/// Encode a raster-order capture as the sensor streams it
///
/// Samples equal to [`SENTINEL`] are clamped to [`MAX_INTENSITY`], since the
/// protocol has no escape for them.
pub fn encode_frame(raster: &[u8; FRAME_PIXELS]) -> Vec<u8, WIRE_FRAME_LEN> {
    let mut wire = Vec::new();
    for &sample in raster {
        // Capacity is exactly FRAME_PIXELS + 1
        let _ = wire.push(sample.min(MAX_INTENSITY));
    }
    let _ = wire.push(SENTINEL);
    wire
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_cell_corners() {
        assert_eq!(storage_cell(0), (34, 34));
        assert_eq!(storage_cell(34), (34, 0));
        assert_eq!(storage_cell(35), (33, 34));
        assert_eq!(storage_cell(FRAME_PIXELS - 1), (0, 0));
    }

    #[test]
    fn test_storage_cell_wraps() {
        assert_eq!(storage_cell(FRAME_PIXELS), (34, 34));
        assert_eq!(storage_cell(FRAME_PIXELS + 4), (34, 30));
    }

    #[test]
    fn test_blank_frame() {
        let frame = Frame::blank();
        assert!(frame.pixels().all(|p| p == 0));
        assert_eq!(frame.pixels().count(), FRAME_PIXELS);
        assert_eq!(frame.as_bytes().len(), FRAME_PIXELS);
    }

    #[test]
    fn test_get_set_bounds() {
        let mut frame = Frame::blank();
        assert!(frame.set(3, 4, 99));
        assert_eq!(frame.get(3, 4), Some(99));
        assert_eq!(frame.as_bytes()[3 * FRAME_SIDE + 4], 99);

        assert!(!frame.set(FRAME_SIDE, 0, 1));
        assert_eq!(frame.get(0, FRAME_SIDE), None);
    }

    #[test]
    fn test_from_sensor_raster_mirrors() {
        let mut raster = [0u8; FRAME_PIXELS];
        raster[0] = 1;
        raster[FRAME_SIDE] = 2; // start of the sensor's second row
        raster[FRAME_PIXELS - 1] = 3;

        let frame = Frame::from_sensor_raster(&raster);
        assert_eq!(frame.get(34, 34), Some(1));
        assert_eq!(frame.get(33, 34), Some(2));
        assert_eq!(frame.get(0, 0), Some(3));
    }

    #[test]
    fn test_min_max_and_mean() {
        let mut frame = Frame::blank();
        frame.set(0, 0, 200);
        frame.set(10, 10, 5);
        assert_eq!(frame.min_max(), (0, 200));

        let full = Frame::from_sensor_raster(&[40u8; FRAME_PIXELS]);
        assert_eq!(full.min_max(), (40, 40));
        assert_eq!(full.mean(), 40);
    }

    #[test]
    fn test_encode_frame_layout() {
        let mut raster = [0u8; FRAME_PIXELS];
        raster[0] = 12;
        raster[1] = 34;

        let wire = encode_frame(&raster);
        assert_eq!(wire.len(), WIRE_FRAME_LEN);
        assert_eq!(wire[0], 12);
        assert_eq!(wire[1], 34);
        assert_eq!(wire[WIRE_FRAME_LEN - 1], SENTINEL);
    }

    #[test]
    fn test_encode_frame_clamps_sentinel_value() {
        let raster = [SENTINEL; FRAME_PIXELS];
        let wire = encode_frame(&raster);

        assert!(wire[..FRAME_PIXELS].iter().all(|&b| b == MAX_INTENSITY));
        assert_eq!(wire.iter().filter(|&&b| b == SENTINEL).count(), 1);
    }
}
