//! Frame buffers handed over by a capture pipeline.

use std::path::Path;

use image::RgbImage;

/// Errors produced when turning raw buffers or files into frames.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidBuffer { expected: usize, got: usize },

    #[error("invalid frame dimensions (width={width}, height={height})")]
    InvalidDimensions { width: u32, height: u32 },

    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Wrap a tightly packed `RGB8` buffer, row-major.
pub fn rgb_image_from_slice(width: u32, height: u32, pixels: &[u8]) -> Result<RgbImage, FrameError> {
    if width == 0 || height == 0 {
        return Err(FrameError::InvalidDimensions { width, height });
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(FrameError::InvalidDimensions { width, height })?;
    if pixels.len() != expected {
        return Err(FrameError::InvalidBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec()).ok_or(FrameError::InvalidBuffer {
        expected,
        got: pixels.len(),
    })
}

/// Decode an image file into an RGB frame.
pub fn load_rgb(path: impl AsRef<Path>) -> Result<RgbImage, FrameError> {
    Ok(image::open(path)?.to_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_exact_buffers() {
        let frame = rgb_image_from_slice(2, 1, &[1, 2, 3, 4, 5, 6]).expect("frame");
        assert_eq!(frame.get_pixel(1, 0).0, [4, 5, 6]);
    }

    #[test]
    fn rejects_short_buffers_and_empty_frames() {
        assert!(matches!(
            rgb_image_from_slice(2, 2, &[0; 11]),
            Err(FrameError::InvalidBuffer {
                expected: 12,
                got: 11
            })
        ));
        assert!(matches!(
            rgb_image_from_slice(0, 4, &[]),
            Err(FrameError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn missing_file_is_an_image_error() {
        assert!(matches!(
            load_rgb("/definitely/not/here.png"),
            Err(FrameError::Image(_))
        ));
    }
}
