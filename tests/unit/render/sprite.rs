use super::*;
use crate::foundation::core::PixelFormat;
use crate::physics::ball::Arena;
use proptest::prelude::*;

fn ball_at(x: i64, y: i64, radius: i64) -> BallState {
    BallState {
        x,
        y,
        tentative_y: y,
        velocity_y: 0,
        acceleration_y: 1,
        radius,
        horizontal_step: 1,
        arena: Arena {
            width: 100,
            height: 100,
        },
    }
}

fn filled(width: u32, height: u32, format: PixelFormat, align: usize, value: u8) -> FrameBuffer {
    let mut f = FrameBuffer::new(width, height, format, align).unwrap();
    f.pixels_mut().fill(value);
    f
}

#[test]
fn shade_formula_reference_values() {
    assert_eq!(shade(0, 20), 255);
    // floor(sqrt(200) * 150 / 20) = 106
    assert_eq!(shade(200, 20), 149);
    assert_eq!(shade(24 * 24 * 2, 20), 1);
    assert_eq!(shade(30 * 30 + 10 * 10, 20), 18);
    assert_eq!(shade(1_000_000, 20), 0);
}

#[test]
fn shade_at_uses_offset_light_source() {
    assert_eq!(shade_at(3, 3, 4, 4, 3), Some(255));
    assert_eq!(shade_at(4, 4, 4, 4, 3), Some(185));
    assert_eq!(shade_at(7, 4, 4, 4, 3), Some(49));
    assert_eq!(shade_at(7, 5, 4, 4, 3), None);
    assert_eq!(shade_at(4, 4, 4, 4, 0), None);
}

#[test]
fn gray_frame_gets_shade_inside_disc_only() {
    let base = filled(10, 10, PixelFormat::Gray8, 1, 7);
    let mut frame = base.clone();
    render_ball(&mut frame, &ball_at(4, 4, 3));

    assert_eq!(frame.pixel(3, 3).unwrap(), &[255]);
    assert_eq!(frame.pixel(4, 4).unwrap(), &[185]);
    assert_eq!(frame.pixel(4, 1).unwrap(), &[144]);
    assert_eq!(frame.pixel(5, 1).unwrap(), &[7]);

    let changed = base
        .pixels()
        .iter()
        .zip(frame.pixels())
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(changed, 29);
}

#[test]
fn color_pixels_get_marker_and_flat_gray() {
    let mut frame = filled(10, 10, PixelFormat::Argb8, 1, 3);
    render_ball(&mut frame, &ball_at(4, 4, 3));
    assert_eq!(frame.pixel(4, 4).unwrap(), &[MARKER_BYTE, 185, 185, 185]);
    assert_eq!(frame.pixel(0, 0).unwrap(), &[3, 3, 3, 3]);
}

#[test]
fn padded_rows_render_like_tight_rows() {
    let mut tight = filled(13, 9, PixelFormat::Argb8, 1, 40);
    let mut padded = filled(13, 9, PixelFormat::Argb8, 64, 40);
    assert!(padded.stride() > padded.row_bytes());

    let ball = ball_at(6, 4, 4);
    render_ball(&mut tight, &ball);
    render_ball(&mut padded, &ball);
    assert_eq!(tight.to_packed(), padded.to_packed());
}

#[test]
fn disc_is_clipped_at_frame_edges() {
    let mut frame = filled(8, 8, PixelFormat::Gray8, 1, 0);
    render_ball(&mut frame, &ball_at(0, 7, 5));
    assert_ne!(frame.pixel(0, 7).unwrap(), &[0]);
    assert_eq!(frame.pixel(7, 0).unwrap(), &[0]);

    let mut far = filled(8, 8, PixelFormat::Gray8, 1, 9);
    render_ball(&mut far, &ball_at(-50, -50, 5));
    assert!(far.pixels().iter().all(|&b| b == 9));
}

#[test]
fn base_frame_is_untouched_by_rendering_a_clone() {
    let base = filled(16, 16, PixelFormat::Argb8, 32, 11);
    let mut copy = base.clone();
    render_ball(&mut copy, &ball_at(8, 8, 4));
    assert!(base.pixels().iter().all(|&b| b == 11));
    assert_ne!(copy, base);
}

proptest! {
    #[test]
    fn shade_is_non_increasing_with_light_distance(
        radius in 1i64..400,
        d_near in 0i64..1_000_000,
        extra in 0i64..1_000_000,
    ) {
        prop_assert!(shade(d_near, radius) >= shade(d_near + extra, radius));
    }

    #[test]
    fn outside_disc_is_bit_identical(
        cx in -4i64..34,
        cy in -4i64..28,
        radius in 1i64..12,
        seed in any::<u8>(),
    ) {
        let mut base = FrameBuffer::new(30, 24, PixelFormat::Argb8, 32).unwrap();
        for (i, b) in base.pixels_mut().iter_mut().enumerate() {
            *b = seed.wrapping_add(i as u8);
        }
        let mut frame = base.clone();
        render_ball(&mut frame, &ball_at(cx, cy, radius));

        for y in 0..24u32 {
            for x in 0..30u32 {
                let (dx, dy) = (i64::from(x) - cx, i64::from(y) - cy);
                if dx * dx + dy * dy > radius * radius {
                    prop_assert_eq!(frame.pixel(x, y), base.pixel(x, y));
                }
            }
        }
        // Row padding is never written.
        for y in 0..24u32 {
            let start = y as usize * frame.stride() + frame.row_bytes();
            let end = (y as usize + 1) * frame.stride();
            prop_assert_eq!(&frame.pixels()[start..end], &base.pixels()[start..end]);
        }
    }
}
