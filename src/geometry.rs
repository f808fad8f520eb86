//! Minimal geometric value types shared by the alignment stages.
//!
//! Coordinates follow image conventions: origin at the top-left, `x` grows to
//! the right and `y` grows downwards. Rectangles are half-open on the
//! bottom/right edges.

use crate::util::math::round_to_i64;
use crate::util::{LoopAlignError, LoopAlignResult};

/// Point in the pixel coordinate space of one image.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a point from `(x, y)`.
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

/// Integer displacement applied to one image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Translation {
    pub dx: i64,
    pub dy: i64,
}

impl Translation {
    /// Creates a translation from `(dx, dy)`.
    pub const fn new(dx: i64, dy: i64) -> Self {
        Self { dx, dy }
    }
}

/// Integer rectangle, half-open on `bottom` and `right`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub top: usize,
    pub left: usize,
    pub bottom: usize,
    pub right: usize,
}

impl Rect {
    /// Creates a rectangle, rejecting inverted bounds.
    pub fn new(top: usize, left: usize, bottom: usize, right: usize) -> LoopAlignResult<Self> {
        if top > bottom || left > right {
            return Err(LoopAlignError::InvalidInput("rect bounds are inverted"));
        }
        Ok(Self {
            top,
            left,
            bottom,
            right,
        })
    }

    /// Rectangle anchored at the origin with the given extent.
    pub const fn from_size(width: usize, height: usize) -> Self {
        Self {
            top: 0,
            left: 0,
            bottom: height,
            right: width,
        }
    }

    pub fn width(&self) -> usize {
        self.right - self.left
    }

    pub fn height(&self) -> usize {
        self.bottom - self.top
    }

    /// Returns true if the rectangle covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// Returns true if the rectangle lies within a `width x height` image.
    pub fn fits_within(&self, width: usize, height: usize) -> bool {
        self.right <= width && self.bottom <= height
    }
}

/// Rule for rounding fractional coordinates to whole pixels.
///
/// Used for both translations and the crop center; the choice can move the
/// crop window by one pixel on exact `.5` ties.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rounding {
    /// Ties go to the even neighbour (`0.5 -> 0`, `1.5 -> 2`, `-0.5 -> 0`).
    #[default]
    TiesToEven,
    /// Ties go away from zero (`0.5 -> 1`, `-0.5 -> -1`).
    TiesAwayFromZero,
}

impl Rounding {
    /// Rounds `value` to the nearest integer using this rule.
    pub fn round(self, value: f64) -> i64 {
        round_to_i64(value, self)
    }
}
