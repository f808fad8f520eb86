//! End-to-end run: load, align, crop and write the loop.
//!
//! A run is synchronous and keeps no state between calls. Any error aborts
//! it before the writer is invoked, so nothing is written on failure.

use std::path::{Path, PathBuf};

use crate::align::{align, AlignedSet};
use crate::animate::{assemble_loop, ping_pong_frames, AnimationWriter};
use crate::crop::{crop_to_ratio, CropWindow};
use crate::geometry::{Point, Rect, Translation};
use crate::image::OwnedImage;
use crate::request::{AlignOptions, AlignmentRequest, ImageSource};
use crate::trace::{trace_event, trace_span};
use crate::util::LoopAlignResult;

/// Decodes image files for a run.
pub trait ImageLoader {
    fn load(&self, path: &Path) -> LoopAlignResult<OwnedImage>;
}

impl<F> ImageLoader for F
where
    F: Fn(&Path) -> LoopAlignResult<OwnedImage>,
{
    fn load(&self, path: &Path) -> LoopAlignResult<OwnedImage> {
        self(path)
    }
}

/// Aligned and cropped forward frames plus the geometry that produced them.
#[derive(Clone, Debug)]
pub struct LoopFrames {
    pub reference: Point,
    pub anchor: Point,
    pub translations: Vec<Translation>,
    pub regions: Vec<Rect>,
    pub window: CropWindow,
    /// Forward frames in input order, all of identical size.
    pub frames: Vec<OwnedImage>,
}

impl LoopFrames {
    /// Frames in emitted ping-pong order.
    pub fn ping_pong(&self) -> Vec<&OwnedImage> {
        ping_pong_frames(&self.frames)
    }

    /// Width and height shared by every frame.
    pub fn frame_size(&self) -> (usize, usize) {
        (self.window.rect.width(), self.window.rect.height())
    }
}

/// Summary of a written loop.
#[derive(Clone, Debug, PartialEq)]
pub struct LoopReport {
    pub output_path: PathBuf,
    pub frame_count: usize,
    pub frame_size: (usize, usize),
    pub reference: Point,
    pub translations: Vec<Translation>,
    pub window: CropWindow,
}

/// Aligns and crops decoded images without writing anything.
pub fn run(
    images: &[OwnedImage],
    points: &[Point],
    options: &AlignOptions,
) -> LoopAlignResult<LoopFrames> {
    options.validate()?;
    let AlignedSet {
        images,
        translations,
        regions,
        reference,
        anchor,
    } = align(images, points, options.rotate, options.rounding)?;
    let cropped = crop_to_ratio(&images, options.ratio, anchor, options.rounding)?;
    Ok(LoopFrames {
        reference,
        anchor,
        translations,
        regions,
        window: cropped.window,
        frames: cropped.images,
    })
}

/// Decodes every source of `request`, failing on the first unreadable one.
pub fn load_sources<L>(request: &AlignmentRequest, loader: &L) -> LoopAlignResult<Vec<OwnedImage>>
where
    L: ImageLoader + ?Sized,
{
    request
        .pairs()
        .iter()
        .map(|(source, _)| match source {
            ImageSource::Path(path) => loader.load(path),
            ImageSource::Decoded(image) => Ok(image.clone()),
        })
        .collect()
}

/// Runs the whole pipeline for `request` and writes the loop to `output_path`.
pub fn generate<L, W>(
    request: &AlignmentRequest,
    loader: &L,
    writer: &W,
    output_path: &Path,
) -> LoopAlignResult<LoopReport>
where
    L: ImageLoader + ?Sized,
    W: AnimationWriter + ?Sized,
{
    let _span = trace_span!("generate", images = request.len()).entered();

    let options = request.options();
    options.validate()?;
    let images = load_sources(request, loader)?;
    let frames = run(&images, &request.points(), options)?;
    let frame_count = assemble_loop(
        writer,
        &frames.frames,
        options.frame_duration_ms,
        output_path,
    )?;

    let path_text = output_path.display().to_string();
    trace_event!(
        "generated",
        path = path_text.as_str(),
        frames = frame_count
    );

    Ok(LoopReport {
        output_path: output_path.to_path_buf(),
        frame_count,
        frame_size: frames.frame_size(),
        reference: frames.reference,
        translations: frames.translations,
        window: frames.window,
    })
}
