//! Error types for loopalign.

use thiserror::Error;

/// Result alias for loopalign operations.
pub type LoopAlignResult<T> = std::result::Result<T, LoopAlignError>;

/// Errors that can occur while aligning, cropping or assembling a loop.
///
/// Every variant aborts the whole run; no partial output is produced.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum LoopAlignError {
    /// The input data or parameters are invalid.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// Fewer marked points than needed to compute a translation.
    #[error("insufficient points: need at least {required}, got {got}")]
    InsufficientPoints { required: usize, got: usize },
    /// The aligned images share no non-empty common region.
    #[error("empty overlap: common region is {width}x{height}")]
    EmptyOverlap { width: usize, height: usize },
    /// The target aspect ratio is not a positive finite number.
    #[error("invalid aspect ratio {ratio}: must be finite and > 0")]
    InvalidRatio { ratio: f64 },
    /// The per-frame duration is not a positive number of milliseconds.
    #[error("invalid frame duration {duration_ms} ms: must be > 0")]
    InvalidFrameDuration { duration_ms: u32 },
    /// A source image could not be read or decoded.
    #[error("failed to load image {path}: {reason}")]
    ImageLoad { path: String, reason: String },
    /// The number of points does not match the number of images.
    #[error("point count mismatch: {images} images, {points} points")]
    PointCountMismatch { images: usize, points: usize },
    /// More images than a single run accepts.
    #[error("too many images: at most {max} allowed, got {got}")]
    TooManyImages { max: usize, got: usize },
    /// A point is non-finite or lies outside its image.
    #[error("point {index} is not finite or lies outside its image")]
    InvalidPoint { index: usize },
    /// An index does not address an existing entry.
    #[error("index {index} out of range for {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    /// Image dimensions are zero or overflow.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },
    /// The backing buffer is too small for the requested layout.
    #[error("buffer too small: need {needed}, got {got}")]
    BufferTooSmall { needed: usize, got: usize },
    /// A region of interest does not fit inside the image.
    #[error(
        "roi out of bounds: x={x}, y={y}, width={width}, height={height} for {img_width}x{img_height}"
    )]
    RoiOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
        img_width: usize,
        img_height: usize,
    },
    /// The animation could not be encoded or written.
    #[error("failed to write animation: {reason}")]
    AnimationWrite { reason: String },
}
