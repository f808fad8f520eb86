//! File input and GIF output through the `image` crate.
//!
//! Available when the `image-io` feature is enabled.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ::image::codecs::gif::{GifEncoder, Repeat};
use ::image::{Delay, DynamicImage, Frame, RgbImage, RgbaImage};

use crate::align::MAX_IMAGES;
use crate::animate::AnimationWriter;
use crate::image::OwnedImage;
use crate::pipeline::ImageLoader;
use crate::util::{LoopAlignError, LoopAlignResult};

/// File extensions picked up by [`collect_folder_images`], compared case-insensitively.
pub const FOLDER_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Creates an owned image from an RGB buffer.
pub fn owned_from_rgb_image(img: &RgbImage) -> LoopAlignResult<OwnedImage> {
    OwnedImage::from_interleaved(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Creates an owned RGB image from any decoded image, dropping alpha.
pub fn owned_from_dynamic_image(img: &DynamicImage) -> LoopAlignResult<OwnedImage> {
    owned_from_rgb_image(&img.to_rgb8())
}

/// Converts an owned image into an `image` RGB buffer.
pub fn to_rgb_image(img: &OwnedImage) -> LoopAlignResult<RgbImage> {
    let (width, height) = dims_u32(img)?;
    RgbImage::from_raw(width, height, img.to_interleaved())
        .ok_or(LoopAlignError::InvalidInput("pixel buffer does not match dimensions"))
}

/// Converts an owned image into an opaque `image` RGBA buffer.
pub fn to_rgba_image(img: &OwnedImage) -> LoopAlignResult<RgbaImage> {
    let (width, height) = dims_u32(img)?;
    let raw = img
        .data()
        .iter()
        .flat_map(|&[r, g, b]| [r, g, b, u8::MAX])
        .collect();
    RgbaImage::from_raw(width, height, raw)
        .ok_or(LoopAlignError::InvalidInput("pixel buffer does not match dimensions"))
}

fn dims_u32(img: &OwnedImage) -> LoopAlignResult<(u32, u32)> {
    let invalid = LoopAlignError::InvalidDimensions {
        width: img.width(),
        height: img.height(),
    };
    let width = u32::try_from(img.width()).map_err(|_| invalid.clone())?;
    let height = u32::try_from(img.height()).map_err(|_| invalid)?;
    Ok((width, height))
}

/// Loads an image from disk and converts it to RGB.
pub fn load_rgb_image<P: AsRef<Path>>(path: P) -> LoopAlignResult<OwnedImage> {
    let path = path.as_ref();
    let img = ::image::open(path).map_err(|err| LoopAlignError::ImageLoad {
        path: path.display().to_string(),
        reason: err.to_string(),
    })?;
    owned_from_dynamic_image(&img)
}

/// [`ImageLoader`] that decodes files with [`load_rgb_image`].
#[derive(Clone, Copy, Debug, Default)]
pub struct FileLoader;

impl ImageLoader for FileLoader {
    fn load(&self, path: &Path) -> LoopAlignResult<OwnedImage> {
        load_rgb_image(path)
    }
}

/// Lists the JPEG/PNG files in `dir`, newest modification time first.
///
/// Fails if the folder holds more than [`MAX_IMAGES`] matching files.
pub fn collect_folder_images<P: AsRef<Path>>(dir: P) -> LoopAlignResult<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let read_err = |err: std::io::Error| LoopAlignError::ImageLoad {
        path: dir.display().to_string(),
        reason: err.to_string(),
    };

    let mut found: Vec<(SystemTime, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let path = entry.path();
        if !path.is_file() || !has_image_extension(&path) {
            continue;
        }
        let modified = entry
            .metadata()
            .and_then(|meta| meta.modified())
            .map_err(read_err)?;
        found.push((modified, path));
    }

    if found.len() > MAX_IMAGES {
        return Err(LoopAlignError::TooManyImages {
            max: MAX_IMAGES,
            got: found.len(),
        });
    }
    found.sort_by(|a, b| Reverse(a.0).cmp(&Reverse(b.0)).then_with(|| a.1.cmp(&b.1)));
    Ok(found.into_iter().map(|(_, path)| path).collect())
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            FOLDER_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Writes infinitely looping GIFs.
///
/// Frames are quantized to a per-frame palette by the `image` crate. The file
/// is encoded in memory, written next to the target and renamed into place.
#[derive(Clone, Copy, Debug)]
pub struct GifWriter {
    /// Quantization speed, 1 (best) to 30 (fastest).
    pub speed: i32,
}

impl Default for GifWriter {
    fn default() -> Self {
        Self { speed: 10 }
    }
}

impl GifWriter {
    /// Encodes `frames` into GIF bytes.
    pub fn encode(&self, frames: &[&OwnedImage], frame_duration_ms: u32) -> LoopAlignResult<Vec<u8>> {
        let write_err = |err: ::image::ImageError| LoopAlignError::AnimationWrite {
            reason: err.to_string(),
        };
        let mut bytes = Vec::new();
        {
            let mut encoder = GifEncoder::new_with_speed(&mut bytes, self.speed.clamp(1, 30));
            encoder.set_repeat(Repeat::Infinite).map_err(write_err)?;
            let delay = Delay::from_numer_denom_ms(frame_duration_ms, 1);
            for frame in frames {
                let rgba = to_rgba_image(frame)?;
                encoder
                    .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                    .map_err(write_err)?;
            }
        }
        Ok(bytes)
    }
}

impl AnimationWriter for GifWriter {
    fn write_looping_animation(
        &self,
        frames: &[&OwnedImage],
        frame_duration_ms: u32,
        path: &Path,
    ) -> LoopAlignResult<()> {
        if frame_duration_ms == 0 {
            return Err(LoopAlignError::InvalidFrameDuration {
                duration_ms: frame_duration_ms,
            });
        }
        if frames.is_empty() {
            return Err(LoopAlignError::InvalidInput("no frames to write"));
        }
        let bytes = self.encode(frames, frame_duration_ms)?;

        let io_err = |err: std::io::Error| LoopAlignError::AnimationWrite {
            reason: format!("{}: {err}", path.display()),
        };
        let mut partial = path.as_os_str().to_owned();
        partial.push(".partial");
        let partial = PathBuf::from(partial);
        if let Err(err) = fs::write(&partial, &bytes).and_then(|()| fs::rename(&partial, path)) {
            let _ = fs::remove_file(&partial);
            return Err(io_err(err));
        }
        Ok(())
    }
}
