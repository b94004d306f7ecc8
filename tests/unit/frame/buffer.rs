use super::*;

#[test]
fn new_pads_rows_to_alignment() {
    let f = FrameBuffer::new(5, 3, PixelFormat::Argb8, 32).unwrap();
    assert_eq!(f.row_bytes(), 20);
    assert_eq!(f.stride(), 32);
    assert_eq!(f.pixels().len(), 96);

    let g = FrameBuffer::new(5, 3, PixelFormat::Gray8, 1).unwrap();
    assert_eq!(g.stride(), 5);
}

#[test]
fn rejects_bad_geometry() {
    assert!(FrameBuffer::new(0, 3, PixelFormat::Gray8, 1).is_err());
    assert!(FrameBuffer::new(3, 3, PixelFormat::Gray8, 0).is_err());
    assert!(FrameBuffer::with_stride(4, 2, PixelFormat::Gray8, 3, vec![0; 6]).is_err());
    assert!(FrameBuffer::with_stride(4, 2, PixelFormat::Gray8, 4, vec![0; 7]).is_err());
}

#[test]
fn oversized_alignment_and_stride_are_errors() {
    assert!(matches!(
        FrameBuffer::new(40, 30, PixelFormat::Gray8, usize::MAX),
        Err(BouncerError::Validation(_))
    ));
    assert!(matches!(
        FrameBuffer::new(40, 30, PixelFormat::Argb8, usize::MAX / 2 + 1),
        Err(BouncerError::Validation(_))
    ));
    assert!(matches!(
        FrameBuffer::with_stride(4, 2, PixelFormat::Gray8, usize::MAX, vec![0; 8]),
        Err(BouncerError::Validation(_))
    ));
}

#[test]
fn packed_round_trip_drops_padding() {
    let packed: Vec<u8> = (0..12).collect();
    let f = FrameBuffer::from_packed(3, 4, PixelFormat::Gray8, &packed, 8).unwrap();
    assert_eq!(f.stride(), 8);
    assert_eq!(f.row(1).unwrap(), &[3, 4, 5]);
    assert_eq!(f.pixel(2, 3).unwrap(), &[11]);
    assert_eq!(f.to_packed(), packed);
}

#[test]
fn pixel_addressing_uses_stride() {
    let mut f = FrameBuffer::new(2, 2, PixelFormat::Argb8, 16).unwrap();
    f.pixel_mut(1, 1).unwrap().copy_from_slice(&[1, 2, 3, 4]);
    assert_eq!(f.offset(1, 1), 16 + 4);
    assert_eq!(&f.pixels()[20..24], &[1, 2, 3, 4]);
    assert!(f.pixel(2, 0).is_none());
    assert!(f.pixel_mut(0, 2).is_none());
}
