//! Point-anchored translational alignment.
//!
//! Every image is shifted so that its marked point lands on the reference
//! point, the per-axis minimum of all marked points. Because the reference is
//! never to the right of or below any point, every translation is `<= 0` on
//! both axes and each trimmed image starts at the canvas origin. In the
//! trimmed frame the reference point therefore sits at the same pixel in
//! every image, up to half a pixel of rounding per axis.

use crate::geometry::{Point, Rect, Rounding, Translation};
use crate::image::ops::{crop, rotate_ccw, translate};
use crate::image::{OwnedImage, BLACK};
use crate::trace::{trace_event, trace_span};
use crate::util::{LoopAlignError, LoopAlignResult};

/// Minimum number of points needed to compute any translation.
pub const MIN_POINTS: usize = 2;

/// Maximum number of images accepted in one run.
pub const MAX_IMAGES: usize = 4;

/// Output of [`align`].
#[derive(Clone, Debug)]
pub struct AlignedSet {
    /// Trimmed (and optionally rotated) images, in input order.
    pub images: Vec<OwnedImage>,
    /// Rounded translation applied to each image.
    pub translations: Vec<Translation>,
    /// Border-free region of each translated canvas.
    pub regions: Vec<Rect>,
    /// Per-axis minimum of the input points.
    pub reference: Point,
    /// Location of the reference point in the output images' frame.
    pub anchor: Point,
}

/// Computes the per-axis minimum of `points`.
pub fn reference_point(points: &[Point]) -> LoopAlignResult<Point> {
    if points.len() < MIN_POINTS {
        return Err(LoopAlignError::InsufficientPoints {
            required: MIN_POINTS,
            got: points.len(),
        });
    }
    if let Some(index) = points.iter().position(|p| !p.is_finite()) {
        return Err(LoopAlignError::InvalidPoint { index });
    }
    let x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    Ok(Point::new(x, y))
}

/// Rounded displacement that moves `point` onto `reference`.
pub fn translation_for(reference: Point, point: Point, rounding: Rounding) -> Translation {
    Translation::new(
        rounding.round(reference.x - point.x),
        rounding.round(reference.y - point.y),
    )
}

/// Region of a translated `width x height` canvas that holds source pixels.
///
/// Returns an empty rectangle when the translation moves the image entirely
/// off the canvas.
pub fn valid_region(width: usize, height: usize, translation: Translation) -> Rect {
    let (w, h) = (width as i64, height as i64);
    let left = translation.dx.clamp(0, w);
    let right = (w + translation.dx).clamp(left, w);
    let top = translation.dy.clamp(0, h);
    let bottom = (h + translation.dy).clamp(top, h);
    Rect {
        top: top as usize,
        left: left as usize,
        bottom: bottom as usize,
        right: right as usize,
    }
}

/// Aligns `images` on their marked `points`.
///
/// Each image is translated onto a same-size canvas with black fill, then
/// trimmed to its border-free region. With `rotate`, the trimmed images are
/// cut to their common extent and turned 90 degrees counter-clockwise, and
/// the anchor is carried into the rotated frame.
pub fn align(
    images: &[OwnedImage],
    points: &[Point],
    rotate: bool,
    rounding: Rounding,
) -> LoopAlignResult<AlignedSet> {
    let _span = trace_span!("align", images = images.len(), rotate = rotate).entered();

    if points.len() < MIN_POINTS {
        return Err(LoopAlignError::InsufficientPoints {
            required: MIN_POINTS,
            got: points.len(),
        });
    }
    if images.len() != points.len() {
        return Err(LoopAlignError::PointCountMismatch {
            images: images.len(),
            points: points.len(),
        });
    }
    if images.len() > MAX_IMAGES {
        return Err(LoopAlignError::TooManyImages {
            max: MAX_IMAGES,
            got: images.len(),
        });
    }

    if let Some(index) = images
        .iter()
        .zip(points)
        .position(|(image, point)| !point_within(image, *point))
    {
        return Err(LoopAlignError::InvalidPoint { index });
    }

    let reference = reference_point(points)?;
    trace_event!("reference_point", x = reference.x, y = reference.y);

    let mut trimmed = Vec::with_capacity(images.len());
    let mut translations = Vec::with_capacity(images.len());
    let mut regions = Vec::with_capacity(images.len());
    for (index, (image, point)) in images.iter().zip(points).enumerate() {
        let translation = translation_for(reference, *point, rounding);
        let region = valid_region(image.width(), image.height(), translation);
        trace_event!(
            "translation",
            index = index,
            dx = translation.dx,
            dy = translation.dy,
            width = region.width(),
            height = region.height()
        );
        if region.is_empty() {
            return Err(LoopAlignError::EmptyOverlap {
                width: region.width(),
                height: region.height(),
            });
        }
        let shifted = translate(image.view(), translation, BLACK)?;
        trimmed.push(crop(&shifted, region)?);
        translations.push(translation);
        regions.push(region);
    }

    let (images, anchor) = if rotate {
        rotate_common(&trimmed, reference)?
    } else {
        (trimmed, reference)
    };

    Ok(AlignedSet {
        images,
        translations,
        regions,
        reference,
        anchor,
    })
}

/// True when `point` is finite and inside the closed extent of `image`.
fn point_within(image: &OwnedImage, point: Point) -> bool {
    point.is_finite()
        && (0.0..=image.width() as f64).contains(&point.x)
        && (0.0..=image.height() as f64).contains(&point.y)
}

/// Cuts every image to the common extent and rotates it counter-clockwise.
fn rotate_common(images: &[OwnedImage], anchor: Point) -> LoopAlignResult<(Vec<OwnedImage>, Point)> {
    let common_w = images.iter().map(OwnedImage::width).min().unwrap_or(0);
    let common_h = images.iter().map(OwnedImage::height).min().unwrap_or(0);
    let common = Rect::from_size(common_w, common_h);
    let rotated = images
        .iter()
        .map(|image| rotate_ccw(image.view().sub_rect(common)?))
        .collect::<LoopAlignResult<Vec<_>>>()?;
    let anchor = Point::new(anchor.y, (common_w as f64 - 1.0) - anchor.x);
    Ok((rotated, anchor))
}
