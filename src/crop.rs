//! Common-overlap cropping to a target aspect ratio.
//!
//! The crop window is computed once from the smallest width and height in the
//! set and applied at the same absolute coordinates to every image. One axis
//! is kept whole and the other is cut to a window centered on the alignment
//! anchor:
//!
//! - `min_height / min_width > ratio`: width-constrained. Columns
//!   `0..min_width` are kept and a vertical window of
//!   `ceil(min_width * ratio)` rows is centered on `anchor.y`.
//! - otherwise: height-constrained. Rows `0..min_height` are kept and a
//!   horizontal window of `ceil(min_height / ratio)` columns is centered on
//!   `anchor.x`.
//!
//! The centered window spans `center - len / 2 .. center + len / 2`, so an
//! odd target length loses one pixel. A window that runs past one end of the
//! axis is shifted back by the overrun instead of being clipped.

use crate::geometry::{Point, Rect, Rounding};
use crate::image::ops::crop;
use crate::image::OwnedImage;
use crate::trace::{trace_event, trace_span};
use crate::util::math::ceil_len;
use crate::util::{LoopAlignError, LoopAlignResult};

/// Which axis the aspect crop cuts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CropBranch {
    /// Full width kept; rows are cut.
    WidthConstrained,
    /// Full height kept; columns are cut.
    HeightConstrained,
}

/// Crop rectangle shared by every image of a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CropWindow {
    pub rect: Rect,
    pub branch: CropBranch,
    /// Length derived from the ratio for the cut axis, before centering.
    pub target_len: usize,
    pub min_width: usize,
    pub min_height: usize,
}

/// Output of [`crop_to_ratio`].
#[derive(Clone, Debug)]
pub struct CroppedSet {
    pub window: CropWindow,
    pub images: Vec<OwnedImage>,
}

/// Places a window of `2 * (target_len / 2)` pixels around `center` on `0..bound`.
///
/// Overrun past either end is moved to the opposite end; the result is then
/// clamped, which only shortens the window when it is longer than `bound`.
pub fn centered_window(center: i64, target_len: usize, bound: usize) -> (usize, usize) {
    let half = (target_len / 2) as i64;
    let bound = bound as i64;
    let low = center.saturating_sub(half);
    let high = center.saturating_add(half);

    let shifted_low = low.saturating_sub(high.saturating_sub(bound).max(0));
    let shifted_high = high.saturating_sub(low.min(0));

    let low = shifted_low.clamp(0, bound);
    let high = shifted_high.clamp(low, bound);
    (low as usize, high as usize)
}

/// Computes the shared crop window for a set with the given minimum extent.
pub fn crop_window(
    min_width: usize,
    min_height: usize,
    ratio: f64,
    anchor: Point,
    rounding: Rounding,
) -> LoopAlignResult<CropWindow> {
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(LoopAlignError::InvalidRatio { ratio });
    }
    if min_width == 0 || min_height == 0 {
        return Err(LoopAlignError::EmptyOverlap {
            width: min_width,
            height: min_height,
        });
    }
    if !anchor.is_finite() {
        return Err(LoopAlignError::InvalidInput("crop anchor must be finite"));
    }

    let window = if min_height as f64 / min_width as f64 > ratio {
        let target_len = ceil_len(min_width as f64 * ratio);
        let (top, bottom) = centered_window(rounding.round(anchor.y), target_len, min_height);
        CropWindow {
            rect: Rect {
                top,
                left: 0,
                bottom,
                right: min_width,
            },
            branch: CropBranch::WidthConstrained,
            target_len,
            min_width,
            min_height,
        }
    } else {
        let target_len = ceil_len(min_height as f64 / ratio);
        let (left, right) = centered_window(rounding.round(anchor.x), target_len, min_width);
        CropWindow {
            rect: Rect {
                top: 0,
                left,
                bottom: min_height,
                right,
            },
            branch: CropBranch::HeightConstrained,
            target_len,
            min_width,
            min_height,
        }
    };

    if window.rect.is_empty() {
        return Err(LoopAlignError::EmptyOverlap {
            width: window.rect.width(),
            height: window.rect.height(),
        });
    }
    Ok(window)
}

/// Crops every image to one rectangle matching `ratio`, centered on `anchor`.
pub fn crop_to_ratio(
    images: &[OwnedImage],
    ratio: f64,
    anchor: Point,
    rounding: Rounding,
) -> LoopAlignResult<CroppedSet> {
    let _span = trace_span!("crop_to_ratio", images = images.len(), ratio = ratio).entered();

    if images.is_empty() {
        return Err(LoopAlignError::InvalidInput("no images to crop"));
    }
    let min_width = images.iter().map(OwnedImage::width).min().unwrap_or(0);
    let min_height = images.iter().map(OwnedImage::height).min().unwrap_or(0);
    trace_event!("min_extent", min_width = min_width, min_height = min_height);

    let window = crop_window(min_width, min_height, ratio, anchor, rounding)?;
    trace_event!(
        "crop_window",
        width_constrained = window.branch == CropBranch::WidthConstrained,
        top = window.rect.top,
        left = window.rect.left,
        bottom = window.rect.bottom,
        right = window.rect.right
    );

    let images = images
        .iter()
        .map(|image| crop(image, window.rect))
        .collect::<LoopAlignResult<Vec<_>>>()?;
    Ok(CroppedSet { window, images })
}

#[cfg(test)]
mod tests {
    use super::{centered_window, crop_window, CropBranch};
    use crate::geometry::{Point, Rounding};
    use crate::util::LoopAlignError;

    #[test]
    fn centered_window_inside_bounds_is_symmetric() {
        assert_eq!(centered_window(50, 20, 100), (40, 60));
        assert_eq!(centered_window(50, 21, 100), (40, 60));
    }

    #[test]
    fn centered_window_moves_low_overrun_to_high_end() {
        assert_eq!(centered_window(3, 20, 100), (0, 20));
    }

    #[test]
    fn centered_window_moves_high_overrun_to_low_end() {
        assert_eq!(centered_window(97, 20, 100), (80, 100));
    }

    #[test]
    fn centered_window_clamps_only_when_too_long() {
        assert_eq!(centered_window(5, 30, 10), (0, 10));
    }

    #[test]
    fn centered_window_handles_far_outside_center() {
        assert_eq!(centered_window(500, 10, 100), (90, 100));
        assert_eq!(centered_window(-500, 10, 100), (0, 10));
    }

    #[test]
    fn centered_window_saturates_at_extreme_centers() {
        assert_eq!(centered_window(i64::MAX, 10, 100), (95, 100));
        let (low, high) = centered_window(i64::MIN, 10, 100);
        assert!(low <= high && high <= 100);
        let window = crop_window(10, 10, 1.0, Point::new(1e19, 5.0), Rounding::default()).unwrap();
        assert_eq!((window.rect.left, window.rect.right), (5, 10));
    }

    #[test]
    fn square_overlap_takes_height_constrained_branch() {
        let window = crop_window(900, 900, 16.0 / 9.0, Point::new(500.0, 500.0), Rounding::default())
            .unwrap();
        assert_eq!(window.branch, CropBranch::HeightConstrained);
        assert_eq!(window.target_len, 507);
        assert_eq!((window.rect.left, window.rect.right), (247, 753));
        assert_eq!((window.rect.top, window.rect.bottom), (0, 900));
    }

    #[test]
    fn tall_overlap_takes_width_constrained_branch() {
        let window =
            crop_window(90, 400, 1.5, Point::new(10.0, 100.0), Rounding::default()).unwrap();
        assert_eq!(window.branch, CropBranch::WidthConstrained);
        assert_eq!(window.target_len, 135);
        assert_eq!((window.rect.top, window.rect.bottom), (33, 167));
        assert_eq!((window.rect.left, window.rect.right), (0, 90));
    }

    #[test]
    fn crop_center_tie_follows_rounding_rule() {
        let anchor = Point::new(100.5, 0.0);
        let even = crop_window(400, 100, 1.0, anchor, Rounding::TiesToEven).unwrap();
        let away = crop_window(400, 100, 1.0, anchor, Rounding::TiesAwayFromZero).unwrap();
        assert_eq!((even.rect.left, even.rect.right), (50, 150));
        assert_eq!((away.rect.left, away.rect.right), (51, 151));
    }

    #[test]
    fn rejects_bad_ratio_and_empty_extent() {
        let anchor = Point::new(0.0, 0.0);
        assert_eq!(
            crop_window(10, 10, 0.0, anchor, Rounding::default()).err(),
            Some(LoopAlignError::InvalidRatio { ratio: 0.0 })
        );
        assert_eq!(
            crop_window(0, 10, 1.0, anchor, Rounding::default()).err(),
            Some(LoopAlignError::EmptyOverlap {
                width: 0,
                height: 10
            })
        );
    }

    #[test]
    fn single_pixel_target_collapses_to_empty_overlap() {
        // ceil(1 / 2.0) = 1, half = 0: the window has no columns left.
        let err = crop_window(10, 1, 2.0, Point::new(5.0, 0.0), Rounding::default())
            .err()
            .unwrap();
        assert_eq!(
            err,
            LoopAlignError::EmptyOverlap {
                width: 0,
                height: 1
            }
        );
    }
}
