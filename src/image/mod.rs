//! Pixel buffers and the buffer operations used by the alignment stages.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride
//! counted in pixels. Sub-views produced by [`ImageView::sub_rect`] are
//! zero-copy and keep the parent stride. `OwnedImage` is the contiguous RGB
//! buffer that flows between stages.

use crate::geometry::Rect;
use crate::util::{LoopAlignError, LoopAlignResult};

#[cfg(feature = "image-io")]
pub mod io;
pub mod ops;
mod owned;

pub use owned::{OwnedImage, Rgb, BLACK};

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> LoopAlignResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> LoopAlignResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(LoopAlignError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in pixels between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the pixel at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.data.get(y * self.stride + x)
    }

    /// Returns row `y` as a slice of length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.data.get(start..start + self.width)
    }

    /// Returns a zero-copy view of `rect`.
    ///
    /// The rectangle must be non-empty and lie inside the view.
    pub fn sub_rect(&self, rect: Rect) -> LoopAlignResult<ImageView<'a, T>> {
        if rect.is_empty() {
            return Err(LoopAlignError::InvalidDimensions {
                width: rect.width(),
                height: rect.height(),
            });
        }
        if !rect.fits_within(self.width, self.height) {
            return Err(LoopAlignError::RoiOutOfBounds {
                x: rect.left,
                y: rect.top,
                width: rect.width(),
                height: rect.height(),
                img_width: self.width,
                img_height: self.height,
            });
        }
        let start = rect.top * self.stride + rect.left;
        ImageView::new(&self.data[start..], rect.width(), rect.height(), self.stride)
    }

    /// Iterates over the rows of the view from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> LoopAlignResult<usize> {
    if width == 0 || height == 0 {
        return Err(LoopAlignError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(LoopAlignError::InvalidInput("stride is smaller than width"));
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(LoopAlignError::InvalidDimensions { width, height })
}
