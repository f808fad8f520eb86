//! Owned contiguous RGB image buffer.

use crate::image::ImageView;
use crate::util::{LoopAlignError, LoopAlignResult};

/// One 8-bit RGB pixel.
pub type Rgb = [u8; 3];

/// Fill value for pixels that have no source data.
pub const BLACK: Rgb = [0, 0, 0];

/// Owned contiguous RGB image with non-zero dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OwnedImage {
    data: Vec<Rgb>,
    width: usize,
    height: usize,
}

impl OwnedImage {
    /// Creates an image from a row-major pixel buffer of exactly `width * height` pixels.
    pub fn new(data: Vec<Rgb>, width: usize, height: usize) -> LoopAlignResult<Self> {
        if width == 0 || height == 0 {
            return Err(LoopAlignError::InvalidDimensions { width, height });
        }
        let needed = width
            .checked_mul(height)
            .ok_or(LoopAlignError::InvalidDimensions { width, height })?;
        if data.len() < needed {
            return Err(LoopAlignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(LoopAlignError::InvalidDimensions { width, height });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates an image where every pixel is `value`.
    pub fn filled(width: usize, height: usize, value: Rgb) -> LoopAlignResult<Self> {
        let len = width
            .checked_mul(height)
            .ok_or(LoopAlignError::InvalidDimensions { width, height })?;
        Self::new(vec![value; len], width, height)
    }

    /// Creates an image by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> LoopAlignResult<Self>
    where
        F: FnMut(usize, usize) -> Rgb,
    {
        let len = width
            .checked_mul(height)
            .ok_or(LoopAlignError::InvalidDimensions { width, height })?;
        let mut data = Vec::with_capacity(len);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Creates an image from interleaved `RGBRGB...` bytes.
    pub fn from_interleaved(bytes: &[u8], width: usize, height: usize) -> LoopAlignResult<Self> {
        let needed = width
            .checked_mul(height)
            .and_then(|v| v.checked_mul(3))
            .ok_or(LoopAlignError::InvalidDimensions { width, height })?;
        if bytes.len() != needed {
            return Err(LoopAlignError::BufferTooSmall {
                needed,
                got: bytes.len(),
            });
        }
        let data = bytes
            .chunks_exact(3)
            .map(|px| [px[0], px[1], px[2]])
            .collect();
        Self::new(data, width, height)
    }

    /// Copies the pixels of a (possibly strided) view into a new buffer.
    pub fn from_view(view: ImageView<'_, Rgb>) -> LoopAlignResult<Self> {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for row in view.rows() {
            data.extend_from_slice(row);
        }
        Self::new(data, view.width(), view.height())
    }

    /// Returns the pixels as interleaved `RGBRGB...` bytes.
    pub fn to_interleaved(&self) -> Vec<u8> {
        self.data.iter().flatten().copied().collect()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major pixel buffer.
    pub fn data(&self) -> &[Rgb] {
        &self.data
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        self.view().get(x, y).copied()
    }

    /// Returns a borrowed view of the whole image.
    pub fn view(&self) -> ImageView<'_, Rgb> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }
}
