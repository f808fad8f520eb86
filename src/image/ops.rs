//! Whole-image buffer operations: translation, cropping and quarter-turn rotation.

use crate::geometry::{Rect, Translation};
use crate::image::{ImageView, OwnedImage, Rgb};
use crate::util::LoopAlignResult;

/// Shifts an image by an integer translation on a canvas of the same size.
///
/// The output pixel at `(x + dx, y + dy)` is the input pixel at `(x, y)`.
/// Output pixels whose source falls outside the input are set to `fill`.
pub fn translate(
    src: ImageView<'_, Rgb>,
    translation: Translation,
    fill: Rgb,
) -> LoopAlignResult<OwnedImage> {
    let width = src.width();
    let height = src.height();
    let mut out = vec![fill; width * height];

    let (w, h) = (width as i64, height as i64);
    let Translation { dx, dy } = translation;
    // Source columns that land inside the canvas.
    let src_x0 = (-dx).clamp(0, w) as usize;
    let src_x1 = (w - dx).clamp(0, w) as usize;

    if src_x0 < src_x1 {
        for y in 0..h {
            let dst_y = y + dy;
            if !(0..h).contains(&dst_y) {
                continue;
            }
            let Some(row) = src.row(y as usize) else {
                continue;
            };
            let dst_start = dst_y as usize * width + (src_x0 as i64 + dx) as usize;
            let span = src_x1 - src_x0;
            out[dst_start..dst_start + span].copy_from_slice(&row[src_x0..src_x1]);
        }
    }

    OwnedImage::new(out, width, height)
}

/// Copies `rect` out of `src` into a new contiguous image.
pub fn crop(src: &OwnedImage, rect: Rect) -> LoopAlignResult<OwnedImage> {
    OwnedImage::from_view(src.view().sub_rect(rect)?)
}

/// Rotates an image by 90 degrees counter-clockwise.
///
/// A `w x h` input becomes an `h x w` output; the source pixel `(x, y)` lands
/// at `(y, w - 1 - x)`.
pub fn rotate_ccw(src: ImageView<'_, Rgb>) -> LoopAlignResult<OwnedImage> {
    let src_w = src.width();
    let src_h = src.height();
    let mut out = Vec::with_capacity(src_w * src_h);
    for y in 0..src_w {
        let src_x = src_w - 1 - y;
        for x in 0..src_h {
            let px = src.get(src_x, x).copied().unwrap_or_default();
            out.push(px);
        }
    }
    OwnedImage::new(out, src_h, src_w)
}

#[cfg(test)]
mod tests {
    use super::{crop, rotate_ccw, translate};
    use crate::geometry::{Rect, Translation};
    use crate::image::{OwnedImage, BLACK};

    fn gradient(width: usize, height: usize) -> OwnedImage {
        OwnedImage::from_fn(width, height, |x, y| [x as u8 + 1, y as u8 + 1, 7]).unwrap()
    }

    #[test]
    fn translate_moves_pixels_and_fills_border() {
        let img = gradient(4, 3);
        let shifted = translate(img.view(), Translation::new(1, -1), BLACK).unwrap();
        assert_eq!((shifted.width(), shifted.height()), (4, 3));
        // (0, 1) moves to (1, 0).
        assert_eq!(shifted.get(1, 0), img.get(0, 1));
        assert_eq!(shifted.get(3, 1), img.get(2, 2));
        assert_eq!(shifted.get(0, 0), Some(BLACK));
        assert_eq!(shifted.get(2, 2), Some(BLACK));
    }

    #[test]
    fn translate_beyond_extent_is_all_fill() {
        let img = gradient(3, 3);
        let shifted = translate(img.view(), Translation::new(-3, 0), BLACK).unwrap();
        assert!(shifted.data().iter().all(|px| *px == BLACK));
    }

    #[test]
    fn crop_copies_rect() {
        let img = gradient(5, 4);
        let out = crop(&img, Rect::new(1, 2, 3, 5).unwrap()).unwrap();
        assert_eq!((out.width(), out.height()), (3, 2));
        assert_eq!(out.get(0, 0), img.get(2, 1));
        assert_eq!(out.get(2, 1), img.get(4, 2));
    }

    #[test]
    fn rotate_ccw_swaps_extent_and_moves_corners() {
        let img = gradient(4, 2);
        let rot = rotate_ccw(img.view()).unwrap();
        assert_eq!((rot.width(), rot.height()), (2, 4));
        // Top-right corner becomes top-left.
        assert_eq!(rot.get(0, 0), img.get(3, 0));
        // Top-left corner becomes bottom-left.
        assert_eq!(rot.get(0, 3), img.get(0, 0));
        assert_eq!(rot.get(1, 3), img.get(0, 1));
    }
}
