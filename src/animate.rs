//! Ping-pong loop assembly.
//!
//! A loop over `n` frames plays `0, 1, .., n-1` and then walks back through
//! the interior frames `n-2, .., 1`, so repeating it has no jump cut and no
//! doubled endpoints. Encoding is delegated to an [`AnimationWriter`].

use std::path::Path;

use crate::image::OwnedImage;
use crate::trace::{trace_event, trace_span};
use crate::util::{LoopAlignError, LoopAlignResult};

/// Encodes a sequence of equally sized frames as an endlessly looping animation.
pub trait AnimationWriter {
    /// Writes `frames` to `path`, each shown for `frame_duration_ms`.
    ///
    /// Implementations must either write the complete file or leave nothing
    /// at `path`.
    fn write_looping_animation(
        &self,
        frames: &[&OwnedImage],
        frame_duration_ms: u32,
        path: &Path,
    ) -> LoopAlignResult<()>;
}

impl<W: AnimationWriter + ?Sized> AnimationWriter for &W {
    fn write_looping_animation(
        &self,
        frames: &[&OwnedImage],
        frame_duration_ms: u32,
        path: &Path,
    ) -> LoopAlignResult<()> {
        (**self).write_looping_animation(frames, frame_duration_ms, path)
    }
}

/// Frame indices of the ping-pong loop over `n` frames.
///
/// Yields `2 * n - 2` indices for `n >= 2`, `[0]` for `n == 1` and nothing
/// for `n == 0`.
pub fn ping_pong_order(n: usize) -> Vec<usize> {
    let interior = n.saturating_sub(1);
    (0..n).chain((1..interior).rev()).collect()
}

/// Borrows `frames` in ping-pong order.
pub fn ping_pong_frames(frames: &[OwnedImage]) -> Vec<&OwnedImage> {
    ping_pong_order(frames.len())
        .into_iter()
        .map(|index| &frames[index])
        .collect()
}

/// Writes `images` as a ping-pong loop and returns the emitted frame count.
pub fn assemble_loop<W>(
    writer: &W,
    images: &[OwnedImage],
    frame_duration_ms: u32,
    output_path: &Path,
) -> LoopAlignResult<usize>
where
    W: AnimationWriter + ?Sized,
{
    let _span = trace_span!("assemble_loop", images = images.len()).entered();

    if frame_duration_ms == 0 {
        return Err(LoopAlignError::InvalidFrameDuration {
            duration_ms: frame_duration_ms,
        });
    }
    let Some(first) = images.first() else {
        return Err(LoopAlignError::InvalidInput("no frames to assemble"));
    };
    if images
        .iter()
        .any(|img| img.width() != first.width() || img.height() != first.height())
    {
        return Err(LoopAlignError::InvalidInput("frames must share dimensions"));
    }

    let frames = ping_pong_frames(images);
    writer.write_looping_animation(&frames, frame_duration_ms, output_path)?;
    trace_event!(
        "loop_written",
        frames = frames.len(),
        duration_ms = frame_duration_ms
    );
    Ok(frames.len())
}

#[cfg(test)]
mod tests {
    use super::{assemble_loop, ping_pong_order, AnimationWriter};
    use crate::image::OwnedImage;
    use crate::util::{LoopAlignError, LoopAlignResult};
    use std::cell::RefCell;
    use std::path::Path;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(Vec<u8>, u32)>>,
    }

    impl AnimationWriter for Recorder {
        fn write_looping_animation(
            &self,
            frames: &[&OwnedImage],
            frame_duration_ms: u32,
            _path: &Path,
        ) -> LoopAlignResult<()> {
            let tags = frames.iter().map(|f| f.data()[0][0]).collect();
            self.calls.borrow_mut().push((tags, frame_duration_ms));
            Ok(())
        }
    }

    fn tagged(tag: u8) -> OwnedImage {
        OwnedImage::filled(2, 2, [tag, 0, 0]).unwrap()
    }

    #[test]
    fn order_plays_forward_then_interior_backwards() {
        assert_eq!(ping_pong_order(0), Vec::<usize>::new());
        assert_eq!(ping_pong_order(1), vec![0]);
        assert_eq!(ping_pong_order(2), vec![0, 1]);
        assert_eq!(ping_pong_order(3), vec![0, 1, 2, 1]);
        assert_eq!(ping_pong_order(4), vec![0, 1, 2, 3, 2, 1]);
    }

    #[test]
    fn assemble_hands_ping_pong_frames_to_writer() {
        let recorder = Recorder::default();
        let images: Vec<_> = (0..4).map(tagged).collect();
        let count = assemble_loop(&recorder, &images, 120, Path::new("loop.gif")).unwrap();
        assert_eq!(count, 6);
        let calls = recorder.calls.borrow();
        assert_eq!(*calls, vec![(vec![0u8, 1, 2, 3, 2, 1], 120u32)]);
    }

    #[test]
    fn assemble_rejects_zero_duration_and_mixed_sizes() {
        let recorder = Recorder::default();
        let images = vec![tagged(0), tagged(1)];
        assert_eq!(
            assemble_loop(&recorder, &images, 0, Path::new("x.gif")).err(),
            Some(LoopAlignError::InvalidFrameDuration { duration_ms: 0 })
        );

        let mixed = vec![tagged(0), OwnedImage::filled(3, 2, [1, 0, 0]).unwrap()];
        assert!(assemble_loop(&recorder, &mixed, 50, Path::new("x.gif")).is_err());
        assert!(recorder.calls.borrow().is_empty());
    }
}
