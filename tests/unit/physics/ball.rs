use super::*;
use proptest::prelude::*;

fn arena_400x300() -> BallState {
    BallState::from_geometry(400, 300, &BounceConfig::default()).unwrap()
}

#[test]
fn derives_constants_from_geometry() {
    let s = arena_400x300();
    assert_eq!(s.radius, 30);
    assert_eq!((s.x, s.y), (100, 75));
    assert_eq!(s.tentative_y, 75);
    assert_eq!(s.horizontal_step, 4);
    // max(1, 300 / 200)
    assert_eq!(s.acceleration_y, 1);
    assert_eq!(s.velocity_y, 0);
}

#[test]
fn floors_keep_tiny_images_moving() {
    let s = BallState::from_geometry(20, 20, &BounceConfig::default()).unwrap();
    assert_eq!(s.radius, 2);
    assert_eq!(s.horizontal_step, 1);
    assert_eq!(s.acceleration_y, 1);
}

#[test]
fn rejects_radius_that_does_not_fit() {
    // radius = 100 / 10 = 10 >= width
    assert!(BallState::from_geometry(10, 100, &BounceConfig::default()).is_err());
    assert!(BallState::from_geometry(0, 100, &BounceConfig::default()).is_err());
    // radius < width but the clamp interval [10, 19 - 10] is empty
    assert!(BallState::from_geometry(19, 100, &BounceConfig::default()).is_err());
    // exactly one legal column
    let pinned = BallState::from_geometry(20, 100, &BounceConfig::default()).unwrap();
    assert!(pinned.trajectory(10).iter().all(|s| s.x == 10));
}

#[test]
fn largest_floors_step_without_overflow() {
    let cfg = BounceConfig {
        accel_floor: crate::pipeline::config::MAX_FLOOR,
        hstep_floor: crate::pipeline::config::MAX_FLOOR,
        ..BounceConfig::default()
    };
    let start = BallState::from_geometry(400, 300, &cfg).unwrap();
    for s in start.trajectory(1000) {
        assert!(s.x >= 30 && s.x <= 370);
        assert!(s.y >= 30 && s.y <= 270);
    }
}

#[test]
fn single_free_fall_step() {
    let s = BallState {
        acceleration_y: 2,
        ..arena_400x300()
    };
    let next = s.step();
    assert_eq!(next.velocity_y, 2);
    assert_eq!(next.y, 75);
    assert_eq!(next.x, 104);
    assert_eq!(next.horizontal_step, 4);
}

#[test]
fn floor_contact_pins_to_floor_and_reflects() {
    let s = BallState {
        tentative_y: 260,
        y: 260,
        velocity_y: 20,
        acceleration_y: 2,
        ..arena_400x300()
    };
    let next = s.step();
    assert_eq!(next.y, 300 - 30);
    assert_eq!(next.tentative_y, 280);
    // -v - a, then gravity
    assert_eq!(next.velocity_y, -20 - 2 + 2);
    assert!(next.on_floor());
    assert!(next.hit_floor());
}

#[test]
fn exact_floor_landing_is_not_a_bounce() {
    let s = BallState {
        tentative_y: 260,
        y: 260,
        velocity_y: 10,
        ..arena_400x300()
    };
    let next = s.step();
    assert_eq!(next.y, 270);
    assert_eq!(next.velocity_y, 11);
    assert!(next.on_floor());
    assert!(!next.hit_floor());
}

#[test]
fn wall_contact_reverses_once() {
    let s = BallState {
        x: 368,
        ..arena_400x300()
    };
    let hit = s.step();
    assert_eq!(hit.x, 370);
    assert_eq!(hit.horizontal_step, -4);
    let after = hit.step();
    assert_eq!(after.x, 366);
    assert_eq!(after.horizontal_step, -4);

    let s = BallState {
        x: 32,
        horizontal_step: -4,
        ..arena_400x300()
    };
    let hit = s.step();
    assert_eq!(hit.x, 30);
    assert_eq!(hit.horizontal_step, 4);
}

#[test]
fn trajectory_frame_zero_is_after_first_step() {
    let s = arena_400x300();
    let states = s.trajectory(300);
    assert_eq!(states.len(), 300);
    assert_eq!(states[0], s.step());
    assert_eq!((states[0].x, states[0].y, states[0].velocity_y), (104, 75, 1));
}

#[test]
fn default_sequence_bounces_periodically() {
    let states = arena_400x300().trajectory(300);
    let floor_frames: Vec<usize> = states
        .iter()
        .enumerate()
        .filter(|(_, s)| s.on_floor())
        .map(|(i, _)| i)
        .collect();
    assert_eq!(floor_frames, vec![20, 61, 102, 143, 184, 225, 266]);

    // Each bounce climbs back to the release height and no higher.
    assert_eq!(states[40].y, 75);
    assert!(states.iter().all(|s| s.y >= 75));

    let wall_frames: Vec<(usize, i64)> = states
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0].horizontal_step != w[1].horizontal_step)
        .map(|(i, w)| (i + 1, w[1].x))
        .collect();
    assert_eq!(wall_frames, vec![(67, 370), (153, 30), (239, 370)]);
}

proptest! {
    #[test]
    fn stays_inside_arena(width in 4u32..640, height in 10u32..640) {
        let cfg = BounceConfig::default();
        let radius = i64::from(height / cfg.radius_divisor);
        if i64::from(width) < 2 * radius {
            prop_assert!(BallState::from_geometry(width, height, &cfg).is_err());
            return Ok(());
        }

        let start = BallState::from_geometry(width, height, &cfg).unwrap();
        let mut s = start;
        for _ in 0..600 {
            let next = s.step();
            prop_assert!(next.x >= next.radius && next.x <= i64::from(width) - next.radius);
            prop_assert!(next.y >= next.radius && next.y <= i64::from(height) - next.radius);
            prop_assert!(next.y >= start.y);

            let clamped_x = next.x == next.radius || next.x == i64::from(width) - next.radius;
            let reversed = next.horizontal_step == -s.horizontal_step;
            if next.horizontal_step != s.horizontal_step {
                prop_assert!(clamped_x && reversed);
            }
            s = next;
        }
    }

    #[test]
    fn bounce_speed_never_grows(height in 10u32..800) {
        let cfg = BounceConfig::default();
        let start = BallState::from_geometry(height, height, &cfg).unwrap();
        let mut s = start;
        let mut release_speeds = Vec::new();
        for _ in 0..1000 {
            let next = s.step();
            if next.hit_floor() {
                release_speeds.push(next.velocity_y.abs());
            }
            s = next;
        }
        prop_assert!(!release_speeds.is_empty());
        for pair in release_speeds.windows(2) {
            prop_assert!(pair[1] <= pair[0]);
        }
    }
}
