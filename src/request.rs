//! Caller-owned description of one alignment run.
//!
//! A [`RequestBuilder`] collects up to [`MAX_IMAGES`] images and one marked
//! point per image while a user is still choosing them. Once complete it is
//! frozen into an [`AlignmentRequest`], which is the only input the pipeline
//! reads.

use std::path::PathBuf;

use crate::align::{MAX_IMAGES, MIN_POINTS};
use crate::geometry::{Point, Rounding};
use crate::image::OwnedImage;
use crate::util::{LoopAlignError, LoopAlignResult};

/// Default target ratio (16:9).
pub const DEFAULT_RATIO: f64 = 16.0 / 9.0;

/// Default display time per frame.
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// Number of marked points required before generation is offered.
///
/// Two points are enough to compute a translation; three is a usability
/// policy for interactive front ends.
pub const DEFAULT_MIN_POINTS_FOR_GENERATION: usize = 3;

/// Where the pixels of one image come from.
#[derive(Clone, Debug, PartialEq)]
pub enum ImageSource {
    /// Decoded from a file when the run starts.
    Path(PathBuf),
    /// Already in memory.
    Decoded(OwnedImage),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<OwnedImage> for ImageSource {
    fn from(image: OwnedImage) -> Self {
        Self::Decoded(image)
    }
}

/// Run-wide options.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlignOptions {
    /// Rotate every aligned image 90 degrees counter-clockwise.
    pub rotate: bool,
    /// Target aspect ratio used by the cropper.
    pub ratio: f64,
    /// Display time of each animation frame.
    pub frame_duration_ms: u32,
    /// Rounding rule for translations and the crop center.
    pub rounding: Rounding,
    /// Points needed before [`RequestBuilder::can_generate`] reports ready.
    pub min_points_for_generation: usize,
}

impl Default for AlignOptions {
    fn default() -> Self {
        Self {
            rotate: false,
            ratio: DEFAULT_RATIO,
            frame_duration_ms: DEFAULT_FRAME_DURATION_MS,
            rounding: Rounding::default(),
            min_points_for_generation: DEFAULT_MIN_POINTS_FOR_GENERATION,
        }
    }
}

impl AlignOptions {
    /// Checks the ratio and frame duration.
    pub fn validate(&self) -> LoopAlignResult<()> {
        if !self.ratio.is_finite() || self.ratio <= 0.0 {
            return Err(LoopAlignError::InvalidRatio { ratio: self.ratio });
        }
        if self.frame_duration_ms == 0 {
            return Err(LoopAlignError::InvalidFrameDuration {
                duration_ms: self.frame_duration_ms,
            });
        }
        Ok(())
    }
}

/// Parses a ratio written as `"16:9"`, `"16/9"` or a plain number such as `"1.5"`.
pub fn parse_ratio(text: &str) -> LoopAlignResult<f64> {
    let invalid = || LoopAlignError::InvalidInput("ratio must look like 16:9, 16/9 or 1.78");
    let text = text.trim();
    let ratio = match text.split_once(|c: char| c == ':' || c == '/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().map_err(|_| invalid())?;
            let den: f64 = den.trim().parse().map_err(|_| invalid())?;
            num / den
        }
        None => text.parse().map_err(|_| invalid())?,
    };
    if !ratio.is_finite() || ratio <= 0.0 {
        return Err(LoopAlignError::InvalidRatio { ratio });
    }
    Ok(ratio)
}

/// One image slot and its marked point, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageEntry {
    pub source: ImageSource,
    pub point: Option<Point>,
}

/// Mutable collection of images and points for an interactive session.
#[derive(Clone, Debug, Default)]
pub struct RequestBuilder {
    entries: Vec<ImageEntry>,
    options: AlignOptions,
}

impl RequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the run options.
    pub fn with_options(mut self, options: AlignOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &AlignOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut AlignOptions {
        &mut self.options
    }

    pub fn entries(&self) -> &[ImageEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Adds an image without a point and returns its index.
    pub fn push_image(&mut self, source: impl Into<ImageSource>) -> LoopAlignResult<usize> {
        self.push_images([source.into()])?;
        Ok(self.entries.len() - 1)
    }

    /// Adds several images at once; the batch is rejected as a whole if it
    /// would exceed [`MAX_IMAGES`].
    pub fn push_images<I>(&mut self, sources: I) -> LoopAlignResult<()>
    where
        I: IntoIterator,
        I::Item: Into<ImageSource>,
    {
        let sources: Vec<ImageSource> = sources.into_iter().map(Into::into).collect();
        let total = self.entries.len() + sources.len();
        if total > MAX_IMAGES {
            return Err(LoopAlignError::TooManyImages {
                max: MAX_IMAGES,
                got: total,
            });
        }
        self.entries.extend(sources.into_iter().map(|source| ImageEntry {
            source,
            point: None,
        }));
        Ok(())
    }

    /// Sets or replaces the point of the image at `index`.
    pub fn set_point(&mut self, index: usize, point: Point) -> LoopAlignResult<()> {
        if !point.is_finite() {
            return Err(LoopAlignError::InvalidPoint { index });
        }
        let len = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(LoopAlignError::IndexOutOfRange { index, len })?;
        entry.point = Some(point);
        Ok(())
    }

    /// Assigns `point` to the first image that has none and returns its index.
    pub fn append_point(&mut self, point: Point) -> LoopAlignResult<usize> {
        let index = self
            .entries
            .iter()
            .position(|entry| entry.point.is_none())
            .ok_or(LoopAlignError::IndexOutOfRange {
                index: self.entries.len(),
                len: self.entries.len(),
            })?;
        self.set_point(index, point)?;
        Ok(index)
    }

    /// Number of images that have a point.
    pub fn point_count(&self) -> usize {
        self.entries.iter().filter(|e| e.point.is_some()).count()
    }

    /// True once every image has a point and the generation policy is met.
    pub fn can_generate(&self) -> bool {
        let needed = self.options.min_points_for_generation.max(MIN_POINTS);
        let count = self.point_count();
        count == self.entries.len() && count >= needed
    }

    /// Drops all images and points; options are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Freezes the builder into a request.
    ///
    /// Fails if any image lacks a point or fewer than two images are present.
    /// The interactive three-point policy is not enforced here.
    pub fn build(self) -> LoopAlignResult<AlignmentRequest> {
        let images = self.entries.len();
        let mut pairs = Vec::with_capacity(images);
        for entry in self.entries {
            let Some(point) = entry.point else {
                return Err(LoopAlignError::PointCountMismatch {
                    images,
                    points: pairs.len(),
                });
            };
            pairs.push((entry.source, point));
        }
        AlignmentRequest::new(pairs, self.options)
    }
}

/// Ordered image/point pairs plus options for one run.
#[derive(Clone, Debug, PartialEq)]
pub struct AlignmentRequest {
    pairs: Vec<(ImageSource, Point)>,
    options: AlignOptions,
}

impl AlignmentRequest {
    /// Validates and wraps image/point pairs.
    pub fn new(pairs: Vec<(ImageSource, Point)>, options: AlignOptions) -> LoopAlignResult<Self> {
        if pairs.len() < MIN_POINTS {
            return Err(LoopAlignError::InsufficientPoints {
                required: MIN_POINTS,
                got: pairs.len(),
            });
        }
        if pairs.len() > MAX_IMAGES {
            return Err(LoopAlignError::TooManyImages {
                max: MAX_IMAGES,
                got: pairs.len(),
            });
        }
        if let Some(index) = pairs.iter().position(|(_, p)| !p.is_finite()) {
            return Err(LoopAlignError::InvalidPoint { index });
        }
        options.validate()?;
        Ok(Self { pairs, options })
    }

    pub fn pairs(&self) -> &[(ImageSource, Point)] {
        &self.pairs
    }

    pub fn points(&self) -> Vec<Point> {
        self.pairs.iter().map(|(_, p)| *p).collect()
    }

    pub fn options(&self) -> &AlignOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// True if the interactive generation policy is met.
    pub fn is_ready(&self) -> bool {
        self.pairs.len() >= self.options.min_points_for_generation.max(MIN_POINTS)
    }
}
