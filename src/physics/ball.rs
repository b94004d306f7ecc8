use crate::foundation::error::{BouncerError, BouncerResult};
use crate::pipeline::config::BounceConfig;

/// Pixel extent the ball moves inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arena {
    /// Width in pixels.
    pub width: i64,
    /// Height in pixels.
    pub height: i64,
}

/// Physics state of the single ball.
///
/// Positions live on the integer pixel lattice. `tentative_y` is the unclamped vertical
/// accumulator: it keeps integrating velocity even while `y` is pinned to the floor, which is what
/// makes successive bounces settle into a fixed period instead of gaining height.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BallState {
    /// Center column.
    pub x: i64,
    /// Center row (clamped).
    pub y: i64,
    /// Unclamped vertical accumulator.
    pub tentative_y: i64,
    /// Vertical velocity in pixels per tick, positive downwards.
    pub velocity_y: i64,
    /// Gravity added to `velocity_y` every tick (>= 1).
    pub acceleration_y: i64,
    /// Ball radius in pixels.
    pub radius: i64,
    /// Signed horizontal displacement per tick.
    pub horizontal_step: i64,
    /// Bounds used for wall and floor contacts.
    pub arena: Arena,
}

impl BallState {
    /// Derive the initial state from image dimensions.
    ///
    /// With the default policy: `radius = h/10`, start at `(w/4, h/4)` at rest,
    /// `horizontal_step = max(1, w/100)`, `acceleration_y = max(1, h/200)`.
    pub fn from_geometry(width: u32, height: u32, cfg: &BounceConfig) -> BouncerResult<Self> {
        cfg.validate()?;
        if width == 0 || height == 0 {
            return Err(BouncerError::validation(
                "arena width/height must be non-zero",
            ));
        }
        let w = i64::from(width);
        let h = i64::from(height);
        let radius = h / i64::from(cfg.radius_divisor);
        if 2 * radius > w.min(h) {
            return Err(BouncerError::validation(format!(
                "ball of radius {radius} does not fit a {width}x{height} frame"
            )));
        }
        let y = h / i64::from(cfg.start_y_divisor);
        Ok(Self {
            x: w / i64::from(cfg.start_x_divisor),
            y,
            tentative_y: y,
            velocity_y: 0,
            acceleration_y: (h / i64::from(cfg.accel_divisor)).max(cfg.accel_floor),
            radius,
            horizontal_step: (w / i64::from(cfg.hstep_divisor)).max(cfg.hstep_floor),
            arena: Arena {
                width: w,
                height: h,
            },
        })
    }

    /// Advance one tick.
    ///
    /// Vertical: integrate `tentative_y`; past the floor the ball is pinned at `height - radius` and
    /// its velocity reflected to `-v - a`. Gravity is then added unconditionally.
    /// Horizontal: move by `horizontal_step`, clamp to `[radius, width - radius]` and reverse on
    /// contact.
    #[must_use]
    pub fn step(&self) -> Self {
        let mut next = *self;
        let floor = self.arena.height - self.radius;

        next.tentative_y = self.tentative_y + self.velocity_y;
        if next.tentative_y > floor {
            next.y = floor;
            next.velocity_y = -self.velocity_y - self.acceleration_y;
        } else {
            next.y = next.tentative_y;
        }
        next.velocity_y += self.acceleration_y;

        let right = self.arena.width - self.radius;
        next.x = self.x + self.horizontal_step;
        if next.x > right {
            next.x = right;
            next.horizontal_step = -self.horizontal_step;
        } else if next.x < self.radius {
            next.x = self.radius;
            next.horizontal_step = -self.horizontal_step;
        }

        next
    }

    /// Whether the ball is resting on the floor.
    pub fn on_floor(&self) -> bool {
        self.y == self.arena.height - self.radius
    }

    /// Whether the step that produced this state took the floor-collision branch.
    pub fn hit_floor(&self) -> bool {
        self.tentative_y > self.arena.height - self.radius
    }

    /// States for frames `0..frames`; frame `n` is the state after `n + 1` steps.
    pub fn trajectory(&self, frames: u64) -> Vec<BallState> {
        let mut out = Vec::with_capacity(frames.min(4096) as usize);
        let mut state = *self;
        for _ in 0..frames {
            state = state.step();
            out.push(state);
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/physics/ball.rs"]
mod tests;
