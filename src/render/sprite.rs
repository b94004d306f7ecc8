use crate::frame::buffer::FrameBuffer;
use crate::physics::ball::BallState;

/// Byte written into the leading (alpha/marker) channel of multi-byte pixels inside the ball.
pub const MARKER_BYTE: u8 = 0xff;

/// Brightness lost per radius of distance from the light source.
pub const SHADE_FALLOFF: f64 = 150.0;

/// Shade for a pixel whose squared distance to the light source is `light_dist2`.
///
/// `255 - floor(sqrt(light_dist2) * 150 / radius)`, clamped at 0. Non-increasing in
/// `light_dist2`. `radius` must be positive.
pub fn shade(light_dist2: i64, radius: i64) -> u8 {
    let falloff = ((light_dist2 as f64).sqrt() * SHADE_FALLOFF / radius as f64).floor() as i64;
    (255 - falloff).clamp(0, 255) as u8
}

/// Shade of pixel `(px, py)` for a ball at `(cx, cy)`, or `None` outside the disc.
///
/// The light source sits half a radius up and to the left of the center.
pub fn shade_at(px: i64, py: i64, cx: i64, cy: i64, radius: i64) -> Option<u8> {
    if radius <= 0 {
        return None;
    }
    let (dx, dy) = (px - cx, py - cy);
    if dx * dx + dy * dy > radius * radius {
        return None;
    }
    let (lx, ly) = (px - (cx - radius / 2), py - (cy - radius / 2));
    Some(shade(lx * lx + ly * ly, radius))
}

/// Composite the shaded ball onto `frame` in place.
///
/// Single-byte pixels receive the shade directly. Wider pixels get [`MARKER_BYTE`] in the first
/// byte and the shade in every remaining byte. Pixels outside the disc, and any part of the disc
/// that falls outside the frame, are left untouched.
pub fn render_ball(frame: &mut FrameBuffer, ball: &BallState) {
    let (cx, cy, r) = (ball.x, ball.y, ball.radius);
    if r <= 0 {
        return;
    }
    let max_x = i64::from(frame.width()) - 1;
    let max_y = i64::from(frame.height()) - 1;
    let (x0, x1) = ((cx - r).max(0), (cx + r).min(max_x));
    let (y0, y1) = ((cy - r).max(0), (cy + r).min(max_y));
    if x0 > x1 || y0 > y1 {
        return;
    }

    for py in y0..=y1 {
        for px in x0..=x1 {
            let Some(value) = shade_at(px, py, cx, cy, r) else {
                continue;
            };
            let Some(pixel) = frame.pixel_mut(px as u32, py as u32) else {
                continue;
            };
            match pixel {
                [single] => *single = value,
                [marker, rest @ ..] => {
                    *marker = MARKER_BYTE;
                    rest.fill(value);
                }
                [] => {}
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/sprite.rs"]
mod tests;
