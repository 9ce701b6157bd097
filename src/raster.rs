//! Owned `height × width × channels` byte raster, row-major and channel-minor:
//! sample `(i, j, c)` lives at `(i·width + j)·channels + c`.

use crate::error::{ChaosError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageBuffer {
    height: usize,
    width: usize,
    channels: usize,
    samples: Vec<u8>,
}

impl ImageBuffer {
    /// Wraps `samples`; every dimension must be at least 1 and the sample
    /// count must equal `height·width·channels`.
    pub fn new(height: usize, width: usize, channels: usize, samples: Vec<u8>) -> Result<Self> {
        for size in [height, width, channels] {
            if size < 1 {
                return Err(ChaosError::InvalidSize { size });
            }
        }
        let expected = sample_count(height, width, channels).ok_or(ChaosError::ShapeMismatch {
            height,
            width,
            channels,
            expected: usize::MAX,
            actual: samples.len(),
        })?;
        if samples.len() != expected {
            return Err(ChaosError::ShapeMismatch {
                height,
                width,
                channels,
                expected,
                actual: samples.len(),
            });
        }
        Ok(Self {
            height,
            width,
            channels,
            samples,
        })
    }

    pub fn zeroed(height: usize, width: usize, channels: usize) -> Result<Self> {
        let len = sample_count(height, width, channels).ok_or(ChaosError::InvalidSize {
            size: usize::MAX,
        })?;
        Self::new(height, width, channels, vec![0; len])
    }

    /// Single-channel image from equally long rows.
    pub fn from_rows<R: AsRef<[u8]>>(rows: &[R]) -> Result<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().len());
        let mut samples = Vec::with_capacity(rows.len() * width);
        for row in rows {
            samples.extend_from_slice(row.as_ref());
        }
        Self::new(rows.len(), width, 1, samples)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Same shape as `other`.
    pub fn same_shape(&self, other: &ImageBuffer) -> bool {
        (self.height, self.width, self.channels) == (other.height, other.width, other.channels)
    }

    #[inline(always)]
    fn offset(&self, i: usize, j: usize) -> usize {
        (i * self.width + j) * self.channels
    }

    pub fn sample(&self, i: usize, j: usize, c: usize) -> u8 {
        self.samples[self.offset(i, j) + c]
    }

    /// All channels of pixel `(i, j)`.
    pub fn pixel(&self, i: usize, j: usize) -> &[u8] {
        let o = self.offset(i, j);
        &self.samples[o..o + self.channels]
    }

    /// One row, `width·channels` samples.
    pub fn row(&self, i: usize) -> &[u8] {
        let stride = self.width * self.channels;
        &self.samples[i * stride..(i + 1) * stride]
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.samples
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    pub fn into_samples(self) -> Vec<u8> {
        self.samples
    }
}

/// `None` when the shape does not fit in `usize`.
fn sample_count(height: usize, width: usize, channels: usize) -> Option<usize> {
    height.checked_mul(width)?.checked_mul(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_row_major_channel_minor() {
        let img = ImageBuffer::new(2, 3, 2, (0..12).collect()).unwrap();
        assert_eq!(img.sample(0, 0, 1), 1);
        assert_eq!(img.sample(0, 2, 0), 4);
        assert_eq!(img.sample(1, 0, 0), 6);
        assert_eq!(img.pixel(1, 2), &[10, 11]);
        assert_eq!(img.row(1), &[6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn rejects_bad_shapes() {
        assert_eq!(
            ImageBuffer::new(2, 2, 1, vec![0; 3]),
            Err(ChaosError::ShapeMismatch {
                height: 2,
                width: 2,
                channels: 1,
                expected: 4,
                actual: 3
            })
        );
        assert_eq!(
            ImageBuffer::new(0, 2, 1, vec![]),
            Err(ChaosError::InvalidSize { size: 0 })
        );
        assert!(ImageBuffer::from_rows(&[vec![1, 2], vec![3]]).is_err());
    }

    #[test]
    fn rejects_overflowing_shape() {
        assert!(matches!(
            ImageBuffer::new(1 << (usize::BITS - 1), 2, 1, vec![]),
            Err(ChaosError::ShapeMismatch { actual: 0, .. })
        ));
        assert!(ImageBuffer::new(usize::MAX, 1, 3, vec![]).is_err());
        assert!(ImageBuffer::zeroed(usize::MAX, usize::MAX, 1).is_err());
    }

    #[test]
    fn from_rows_builds_grayscale() {
        let img = ImageBuffer::from_rows(&[[1u8, 2], [3, 4]]).unwrap();
        assert_eq!((img.height(), img.width(), img.channels()), (2, 2, 1));
        assert_eq!(img.as_bytes(), &[1, 2, 3, 4]);
    }
}
