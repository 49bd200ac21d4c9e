//! Nearest-neighbour upscaling and pixel format conversion

use paa3905_protocol::{Frame, FRAME_SIDE};

use crate::sink::DisplayError;

/// Side length in pixels of a frame upscaled by `scale`
///
/// Fails for a zero scale, or one whose upscaled image would not fit in
/// memory.
pub fn scaled_side(scale: usize) -> Result<usize, DisplayError> {
    if scale == 0 {
        return Err(DisplayError::InvalidScale);
    }
    let side = FRAME_SIDE
        .checked_mul(scale)
        .ok_or(DisplayError::InvalidScale)?;
    side.checked_mul(side).ok_or(DisplayError::InvalidScale)?;
    Ok(side)
}

/// Upscale `frame` by an integer factor into `out`
///
/// Each sample becomes a `scale x scale` block. `out` is row-major with a
/// stride of `scaled_side(scale)`. Returns the number of bytes written.
pub fn upscale(frame: &Frame, scale: usize, out: &mut [u8]) -> Result<usize, DisplayError> {
    let side = scaled_side(scale)?;
    let len = side * side;
    if out.len() < len {
        return Err(DisplayError::BufferTooSmall);
    }

    for (y, line) in out[..len].chunks_exact_mut(side).enumerate() {
        let src = &frame.as_bytes()[(y / scale) * FRAME_SIDE..][..FRAME_SIDE];
        for (x, px) in line.iter_mut().enumerate() {
            *px = src[x / scale];
        }
    }

    Ok(len)
}

/// Expand 8-bit gray samples to packed RGB24
///
/// Returns the number of bytes written.
pub fn gray_to_rgb(gray: &[u8], out: &mut [u8]) -> Result<usize, DisplayError> {
    let len = gray.len() * 3;
    if out.len() < len {
        return Err(DisplayError::BufferTooSmall);
    }
    for (&g, rgb) in gray.iter().zip(out.chunks_exact_mut(3)) {
        rgb.fill(g);
    }
    Ok(len)
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec;

    #[test]
    fn test_scale_one_is_identity() {
        let mut frame = Frame::blank();
        frame.set(1, 2, 77);
        let mut out = vec![0u8; FRAME_SIDE * FRAME_SIDE];

        assert_eq!(upscale(&frame, 1, &mut out), Ok(FRAME_SIDE * FRAME_SIDE));
        assert_eq!(&out[..], frame.as_bytes());
    }

    #[test]
    fn test_nearest_neighbour_blocks() {
        let mut frame = Frame::blank();
        frame.set(0, 0, 10);
        frame.set(34, 34, 20);
        let scale = 3;
        let side = scaled_side(scale).unwrap();
        assert_eq!(side, 105);
        let mut out = vec![0u8; side * side];

        upscale(&frame, scale, &mut out).unwrap();

        for y in 0..scale {
            for x in 0..scale {
                assert_eq!(out[y * side + x], 10);
                assert_eq!(out[(side - 1 - y) * side + (side - 1 - x)], 20);
            }
        }
        assert_eq!(out[scale], 0);
    }

    #[test]
    fn test_upscale_rejects_bad_input() {
        let frame = Frame::blank();
        let mut small = [0u8; 16];
        assert_eq!(upscale(&frame, 0, &mut small), Err(DisplayError::InvalidScale));
        assert_eq!(upscale(&frame, 2, &mut small), Err(DisplayError::BufferTooSmall));
    }

    #[test]
    fn test_oversized_scale_is_rejected() {
        assert_eq!(scaled_side(0), Err(DisplayError::InvalidScale));
        assert_eq!(scaled_side(usize::MAX), Err(DisplayError::InvalidScale));
        // Side fits but its square does not
        assert_eq!(scaled_side(usize::MAX / FRAME_SIDE), Err(DisplayError::InvalidScale));

        let mut small = [0u8; 16];
        assert_eq!(
            upscale(&Frame::blank(), usize::MAX, &mut small),
            Err(DisplayError::InvalidScale)
        );
    }

    #[test]
    fn test_gray_to_rgb() {
        let mut out = [0u8; 6];
        assert_eq!(gray_to_rgb(&[5, 200], &mut out), Ok(6));
        assert_eq!(out, [5, 5, 5, 200, 200, 200]);
        assert_eq!(gray_to_rgb(&[1, 2, 3], &mut out), Err(DisplayError::BufferTooSmall));
    }
}
