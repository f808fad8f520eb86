//! loopalign aligns a handful of photos on one user-marked point each, crops
//! them to a shared aspect-ratio window and assembles a ping-pong loop.
//!
//! The stages can be used one by one ([`align`], [`crop_to_ratio`],
//! [`assemble_loop`]) or through [`pipeline::generate`], which takes an
//! [`AlignmentRequest`] and writes the loop through an [`AnimationWriter`].
//! File decoding and GIF output live behind the `image-io` feature.

pub mod align;
pub mod animate;
pub mod crop;
pub mod geometry;
pub mod image;
pub mod pipeline;
pub mod request;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;

pub use align::{align, reference_point, translation_for, valid_region, AlignedSet};
pub use animate::{assemble_loop, ping_pong_frames, ping_pong_order, AnimationWriter};
pub use crop::{centered_window, crop_to_ratio, crop_window, CropBranch, CropWindow, CroppedSet};
pub use geometry::{Point, Rect, Rounding, Translation};
pub use crate::image::{ImageView, OwnedImage, Rgb};
pub use pipeline::{generate, run, ImageLoader, LoopFrames, LoopReport};
pub use request::{parse_ratio, AlignOptions, AlignmentRequest, ImageSource, RequestBuilder};
pub use util::{LoopAlignError, LoopAlignResult};
