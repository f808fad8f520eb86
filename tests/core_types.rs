use loopalign::{ImageView, LoopAlignError, OwnedImage, Rect};

#[test]
fn image_view_rejects_invalid_dimensions() {
    let data = [0u8; 4];

    let err = ImageView::from_slice(&data, 0, 1).err().unwrap();
    assert_eq!(
        err,
        LoopAlignError::InvalidDimensions {
            width: 0,
            height: 1,
        }
    );

    let err = ImageView::from_slice(&data, 1, 0).err().unwrap();
    assert_eq!(
        err,
        LoopAlignError::InvalidDimensions {
            width: 1,
            height: 0,
        }
    );
}

#[test]
fn image_view_rejects_small_buffer() {
    let data = [0u8; 3];

    let err = ImageView::new(&data, 2, 2, 2).err().unwrap();
    assert_eq!(err, LoopAlignError::BufferTooSmall { needed: 4, got: 3 });
}

#[test]
fn sub_rect_matches_expected_values() {
    let data: Vec<u8> = (0u8..16).collect();
    let view = ImageView::from_slice(&data, 4, 4).unwrap();

    let sub = view.sub_rect(Rect::new(1, 1, 3, 3).unwrap()).unwrap();
    assert_eq!((sub.width(), sub.height(), sub.stride()), (2, 2, 4));
    assert_eq!(sub.row(0).unwrap(), &[5u8, 6u8]);
    assert_eq!(sub.row(1).unwrap(), &[9u8, 10u8]);
    assert_eq!(sub.get(0, 0).copied(), Some(5u8));
    assert!(sub.get(2, 0).is_none());

    let err = view.sub_rect(Rect::new(3, 3, 5, 5).unwrap()).err().unwrap();
    assert_eq!(
        err,
        LoopAlignError::RoiOutOfBounds {
            x: 3,
            y: 3,
            width: 2,
            height: 2,
            img_width: 4,
            img_height: 4,
        }
    );
}

#[test]
fn empty_sub_rect_is_rejected() {
    let data = [0u8; 16];
    let view = ImageView::from_slice(&data, 4, 4).unwrap();
    let err = view.sub_rect(Rect::new(1, 1, 1, 3).unwrap()).err().unwrap();
    assert_eq!(
        err,
        LoopAlignError::InvalidDimensions {
            width: 2,
            height: 0,
        }
    );
}

#[test]
fn rect_rejects_inverted_bounds_and_reports_extent() {
    assert!(Rect::new(5, 0, 4, 10).is_err());
    assert!(Rect::new(0, 5, 4, 4).is_err());

    let rect = Rect::new(2, 3, 10, 7).unwrap();
    assert_eq!((rect.width(), rect.height()), (4, 8));
    assert!(rect.fits_within(7, 10));
    assert!(!rect.fits_within(6, 10));
    assert_eq!(Rect::from_size(4, 3), Rect::new(0, 0, 3, 4).unwrap());
}

#[test]
fn owned_image_view_exposes_pixels() {
    let img = OwnedImage::from_fn(3, 2, |x, y| [x as u8, y as u8, 9]).unwrap();
    let view = img.view();
    assert_eq!(view.stride(), 3);
    assert_eq!(view.get(2, 1).copied(), Some([2, 1, 9]));
    assert_eq!(view.rows().count(), 2);
}
