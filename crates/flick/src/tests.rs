//! End-to-end scenarios for the scrollview state machine.
//!
//! Everything here drives the `_at` surface with a synthetic timeline so
//! the physics is deterministic.

use std::time::{Duration, Instant};

use crate::{InputSource, Options, PhaseKind, Scrollview, ScrollviewConfig};

fn ms(base: Instant, offset: u64) -> Instant {
    base + Duration::from_millis(offset)
}

/// A 2000x2000 content area behind a 500x500 viewport, no bounce.
fn plain_view() -> Scrollview {
    Scrollview::with_config(ScrollviewConfig::new(2000, 2000, 500, 500)).unwrap()
}

#[test]
fn test_touchscreen_drag_and_release() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    view.set_predict(0.0, 0.0);
    let t0 = Instant::now();

    // Five 100-ms-spaced drags of (0, -50): content follows the finger, so
    // the viewport offset grows by 50 each time.
    for i in 0..5u64 {
        let at = ms(t0, i * 100);
        view.add_scroll_at(at, 0, -50);
        let pan = view.get_pan_at(at);

        assert!(pan.panned);
        assert_eq!(view.get_pos_y(), 50 * (i as i64 + 1));
        assert_eq!(view.get_pos_x(), 0);
        assert_eq!(view.phase(), PhaseKind::Engaged);
    }

    view.add_scroll_release_at(ms(t0, 410));
    let pan = view.get_pan_at(ms(t0, 410));

    assert_eq!(view.phase(), PhaseKind::Kinetic);
    // Reported velocity is in device space: the finger moved -y.
    assert!((pan.velocity_y + 500.0).abs() < 1.0);

    // 650 ms of decay: 250 + 500 * tau * (1 - e^(-0.65/0.325)) ~ 390 dp.
    view.get_pan_at(ms(t0, 410 + 650));
    assert!((view.get_pos_y() as f64 - 390.0).abs() <= 5.0);
}

#[test]
fn test_kinetic_speed_never_increases() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, -20);
    }
    view.add_scroll_release_at(ms(t0, 45));
    let pan = view.get_pan_at(ms(t0, 45));
    assert_eq!(view.phase(), PhaseKind::Kinetic);

    let mut prev_speed = pan.velocity_y.abs();
    let mut offset = 45;
    while view.phase() == PhaseKind::Kinetic {
        offset += 16;
        let pan = view.get_pan_at(ms(t0, offset));
        let speed = pan.velocity_y.abs();

        assert!(speed <= prev_speed);
        prev_speed = speed;
    }

    assert_eq!(view.phase(), PhaseKind::Idle);
    assert_eq!(prev_speed, 0.0);
}

#[test]
fn test_wheel_detent_instant() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Mousewheel);
    view.set_options(Options::empty());
    let t0 = Instant::now();

    view.add_scroll_at(t0, 0, 1);
    let pan = view.get_pan_at(t0);

    assert!(pan.panned);
    assert_eq!(pan.y, 40);
    assert_eq!(pan.x, 0);
    assert_eq!(pan.velocity_y, 0.0);
    assert_eq!(view.phase(), PhaseKind::Idle);

    let pan = view.get_pan_at(ms(t0, 16));
    assert!(!pan.panned);
    assert_eq!(pan.y, 0);
}

#[test]
fn test_wheel_detent_smooth() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Mousewheel);
    view.set_options(Options::IMPRECISE_SCROLLS_SMOOTHLY);
    let t0 = Instant::now();

    view.add_scroll_at(t0, 0, 1);
    let first = view.get_pan_at(t0); // animation starts at this poll
    assert!(first.panned);
    let mut total = first.y;

    let mut saw_velocity = false;
    for offset in [30u64, 60, 90, 120, 150] {
        let pan = view.get_pan_at(ms(t0, offset));

        assert!(pan.y >= 0, "eased detent never moves backwards");
        total += pan.y;
        saw_velocity |= pan.velocity_y > 0.0;
    }

    assert_eq!(total, 40);
    assert!(saw_velocity);
    assert_eq!(view.phase(), PhaseKind::Idle);

    let pan = view.get_pan_at(ms(t0, 170));
    assert!(!pan.panned);
    assert_eq!(pan.y, 0);
}

#[test]
fn test_overscroll_bounce() {
    let mut config = ScrollviewConfig::new(500, 1000, 500, 500);
    config.bounce_bottom = true;
    let mut view = Scrollview::with_config(config).unwrap();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    // A hard upward flick: 4000 dp/s at release.
    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, -40);
    }
    view.add_scroll_release_at(ms(t0, 45));
    view.get_pan_at(ms(t0, 45));
    assert_eq!(view.phase(), PhaseKind::Kinetic);

    let mut max_pos = 0i64;
    let mut settled_after = None;
    for frame in 1..=120u64 {
        view.get_pan_at(ms(t0, 45 + frame * 16));
        max_pos = max_pos.max(view.get_pos_y());

        if view.phase() == PhaseKind::Idle {
            settled_after = Some(frame * 16);
            break;
        }
    }

    // Overscrolled past the bottom edge, but never past the rubber limit.
    assert!(max_pos > 500);
    assert!(max_pos as f64 <= 500.0 + 0.55 * 500.0);
    // Sprang back exactly to the edge within 1.5 s.
    assert_eq!(view.get_pos_y(), 500);
    assert!(settled_after.expect("bounce should settle") <= 1500);
}

#[test]
fn test_engaged_overscroll_stretch_and_springback() {
    let mut config = ScrollviewConfig::new(500, 1000, 500, 500);
    config.bounce_bottom = true;
    let mut view = Scrollview::with_config(config).unwrap();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    // Scroll to the bottom edge, then keep dragging.
    view.force_jump_at(t0, 0, 500);
    view.get_pan_at(t0);

    let mut prev = 500i64;
    let mut growth = Vec::new();
    for i in 1..=6u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, -60);
        view.get_pan_at(ms(t0, i * 10));
        let pos = view.get_pos_y();

        assert!(pos > prev, "stretching must keep moving outward");
        assert!((pos as f64) < 500.0 + 0.55 * 500.0);
        growth.push(pos - prev);
        prev = pos;
    }

    // Rubber resistance: each equal drag yields less displayed motion.
    assert!(growth.first().unwrap() > growth.last().unwrap());

    // Release: springs back to the edge and goes idle.
    view.add_scroll_release_at(ms(t0, 70));
    for frame in 1..=120u64 {
        view.get_pan_at(ms(t0, 70 + frame * 16));
        if view.phase() == PhaseKind::Idle {
            break;
        }
    }
    assert_eq!(view.get_pos_y(), 500);
    assert_eq!(view.phase(), PhaseKind::Idle);
}

#[test]
fn test_interrupt_mid_kinetic() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 100), 0, -50);
        view.get_pan_at(ms(t0, i * 100));
    }
    view.add_scroll_release_at(ms(t0, 410));
    view.get_pan_at(ms(t0, 410));
    assert_eq!(view.phase(), PhaseKind::Kinetic);

    // 200 ms into the fling the finger comes back down.
    view.add_scroll_interrupt_at(ms(t0, 610));
    let pan = view.get_pan_at(ms(t0, 650));

    assert_eq!(view.phase(), PhaseKind::Idle);
    assert_eq!(pan.velocity_y, 0.0);

    // Frozen at the interrupt-time position: 250 + 500 * tau * (1 - e^(-0.2/0.325)).
    let frozen = view.get_pos_y();
    assert!((frozen as f64 - 324.7).abs() < 2.0);

    let pan = view.get_pan_at(ms(t0, 700));
    assert!(!pan.panned);
    assert_eq!(pan.y, 0);
    assert_eq!(view.get_pos_y(), frozen);
}

#[test]
fn test_interrupt_during_bounce_freezes() {
    let mut config = ScrollviewConfig::new(500, 1000, 500, 500);
    config.bounce_bottom = true;
    let mut view = Scrollview::with_config(config).unwrap();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, -40);
    }
    view.add_scroll_release_at(ms(t0, 45));

    // Let the fling cross the edge into bounce.
    let mut offset = 45u64;
    while view.phase() != PhaseKind::Bounce {
        offset += 16;
        view.get_pan_at(ms(t0, offset));
        assert!(offset < 2000, "fling should reach the bounce phase");
    }
    assert!(view.get_pos_y() > 500);

    view.add_scroll_interrupt_at(ms(t0, offset + 8));
    view.get_pan_at(ms(t0, offset + 16));

    // Frozen over the edge, engaged, waiting for the next delta.
    assert_eq!(view.phase(), PhaseKind::Engaged);
    let frozen = view.get_pos_y();
    assert!(frozen > 500);

    let pan = view.get_pan_at(ms(t0, offset + 100));
    assert!(!pan.panned);
    assert_eq!(view.get_pos_y(), frozen);

    // The next drag continues from the frozen stretch.
    view.add_scroll_at(ms(t0, offset + 120), 0, -30);
    view.get_pan_at(ms(t0, offset + 120));
    assert_eq!(view.phase(), PhaseKind::Engaged);
    assert!(view.get_pos_y() > frozen);
}

#[test]
fn test_force_jump_clamps() {
    let mut view = plain_view();

    view.force_jump(10_000, 10_000);
    view.get_pan();

    assert_eq!(view.get_pos_x(), 1500);
    assert_eq!(view.get_pos_y(), 1500);
    assert_eq!(view.phase(), PhaseKind::Idle);
}

#[test]
fn test_force_jump_round_trip() {
    let mut view = plain_view();
    let t0 = Instant::now();

    view.force_jump_at(t0, 300, 400);
    assert_eq!(view.get_pos_x(), 300);
    assert_eq!(view.get_pos_y(), 400);

    // Smooth variant: position holds at the start until polled past the
    // animation, then lands exactly on the target.
    view.set_options(Options::IMPRECISE_SCROLLS_SMOOTHLY);
    view.force_jump_at(ms(t0, 100), 600, 800);
    assert_eq!(view.get_pos_x(), 300);
    assert_eq!(view.get_pos_y(), 400);

    view.get_pan_at(ms(t0, 100 + 200));
    assert_eq!(view.get_pos_x(), 600);
    assert_eq!(view.get_pos_y(), 800);
    assert_eq!(view.phase(), PhaseKind::Idle);
}

#[test]
fn test_delta_during_jump_abandons_it() {
    let mut view = plain_view();
    view.set_options(Options::IMPRECISE_SCROLLS_SMOOTHLY);
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    view.force_jump_at(t0, 0, 1000);
    view.get_pan_at(ms(t0, 50));
    assert_eq!(view.phase(), PhaseKind::Jumping);
    let mid = view.get_pos_y();
    assert!(mid > 0 && mid < 1000);

    view.add_scroll_at(ms(t0, 60), 0, -10);
    view.get_pan_at(ms(t0, 60));

    // The animated position at abandon time is the new origin.
    assert_eq!(view.phase(), PhaseKind::Engaged);
    let pos = view.get_pos_y();
    assert!(pos < 1000, "jump no longer completes");
    assert!(pos >= mid, "origin is the mid-animation position");
}

#[test]
fn test_idle_poll_reports_nothing() {
    let mut view = plain_view();
    let t0 = Instant::now();

    let pan = view.get_pan_at(t0);
    assert!(!pan.panned);
    assert_eq!((pan.x, pan.y), (0, 0));
    assert_eq!(pan.velocity_x, 0.0);
    assert_eq!(pan.velocity_y, 0.0);

    let pan = view.get_pan_at(ms(t0, 500));
    assert!(!pan.panned);
    assert_eq!((pan.x, pan.y), (0, 0));
}

#[test]
fn test_position_stays_in_bounds_without_bounce() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    // Drag hard past the top edge, fling, jump around: the offset must
    // stay inside [0, 1500] at every poll.
    let mut offset = 0u64;
    let check = |view: &mut Scrollview, at: Instant| {
        view.get_pan_at(at);
        for value in [view.get_pos_x(), view.get_pos_y()] {
            assert!((0..=1500).contains(&value));
        }
    };

    for _ in 0..10 {
        offset += 10;
        view.add_scroll_at(ms(t0, offset), 30, 80);
        check(&mut view, ms(t0, offset));
    }
    view.add_scroll_release_at(ms(t0, offset + 5));
    for _ in 0..40 {
        offset += 16;
        check(&mut view, ms(t0, offset));
    }

    view.force_jump_at(ms(t0, offset), 1400, 1400);
    for _ in 0..10 {
        offset += 10;
        view.add_scroll_at(ms(t0, offset), 0, -90);
        check(&mut view, ms(t0, offset));
    }
    view.add_scroll_release_at(ms(t0, offset + 5));
    for _ in 0..60 {
        offset += 16;
        check(&mut view, ms(t0, offset));
    }
    assert_eq!(view.phase(), PhaseKind::Idle);
}

#[test]
fn test_release_without_recent_motion_goes_idle() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    view.add_scroll_at(t0, 0, -50);
    view.add_scroll_at(ms(t0, 10), 0, -50);
    view.get_pan_at(ms(t0, 10));
    assert_eq!(view.phase(), PhaseKind::Engaged);

    // The finger rests for 300 ms before lifting: no momentum left.
    view.add_scroll_release_at(ms(t0, 310));
    let pan = view.get_pan_at(ms(t0, 310));

    assert_eq!(view.phase(), PhaseKind::Idle);
    assert_eq!(pan.velocity_y, 0.0);
}

#[test]
fn test_passthrough_release_never_coasts() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Passthrough);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, 40);
    }
    view.add_scroll_release_at(ms(t0, 45));
    view.get_pan_at(ms(t0, 45));

    assert_eq!(view.phase(), PhaseKind::Idle);
    assert_eq!(view.get_pos_y(), 200);
}

#[test]
fn test_interrupt_beats_release_in_one_window() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), 0, -40);
    }
    // Lifted and touched again before the host polled.
    view.add_scroll_release_at(ms(t0, 45));
    view.add_scroll_interrupt_at(ms(t0, 46));
    view.get_pan_at(ms(t0, 50));

    assert_ne!(view.phase(), PhaseKind::Kinetic);
}

#[test]
fn test_content_smaller_than_viewport_locks() {
    let mut view = Scrollview::with_config(ScrollviewConfig::new(300, 300, 500, 500)).unwrap();
    view.set_input_source(InputSource::Touchscreen);
    let t0 = Instant::now();

    for i in 0..5u64 {
        view.add_scroll_at(ms(t0, i * 10), -30, -30);
        view.get_pan_at(ms(t0, i * 10));

        assert_eq!(view.get_pos_x(), 0);
        assert_eq!(view.get_pos_y(), 0);
        assert_eq!(view.phase(), PhaseKind::Idle);
    }
}

#[test]
fn test_input_source_setting_is_idempotent() {
    let drive = |view: &mut Scrollview, t0: Instant| {
        for i in 0..5u64 {
            view.add_scroll_at(ms(t0, i * 20), 0, -25);
            view.get_pan_at(ms(t0, i * 20));
        }
        view.add_scroll_release_at(ms(t0, 85));
        view.get_pan_at(ms(t0, 300));
        (view.get_pos_y(), view.phase())
    };

    let t0 = Instant::now();

    let mut once = plain_view();
    once.set_input_source(InputSource::Touchscreen);
    let expected = drive(&mut once, t0);

    let mut twice = plain_view();
    twice.set_input_source(InputSource::Touchscreen);
    twice.set_input_source(InputSource::Touchscreen);
    assert_eq!(drive(&mut twice, t0), expected);
}

#[test]
fn test_delta_getters_sum_to_absolute_movement() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchscreen);
    view.set_predict(0.0, 0.0);
    let t0 = Instant::now();

    view.get_pan_x_at(t0);
    let start = view.get_pos_x();

    let mut summed = 0i64;
    for i in 1..=8u64 {
        view.add_scroll_at(ms(t0, i * 15), -37, 0);
        summed += view.get_pan_x_at(ms(t0, i * 15));
    }
    view.add_scroll_release_at(ms(t0, 125));
    summed += view.get_pan_x_at(ms(t0, 400));
    summed += view.get_pan_x_at(ms(t0, 900));

    let travelled = view.get_pos_x() - start;
    assert!((summed - travelled).abs() <= 1);
}

#[test]
fn test_pan_getters_track_independent_axes() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Passthrough);
    let t0 = Instant::now();

    view.add_scroll_at(t0, 30, 70);
    assert_eq!(view.get_pan_x_at(t0), 30);
    // The y marker was untouched by the x getter.
    assert_eq!(view.get_pan_y_at(t0), 70);
    // Both markers now caught up.
    assert_eq!(view.get_pan_x_at(ms(t0, 10)), 0);
    assert_eq!(view.get_pan_y_at(ms(t0, 10)), 0);
}

#[test]
fn test_initial_offset_reported_as_first_pan() {
    let mut config = ScrollviewConfig::new(2000, 2000, 500, 500);
    config.initial_x = 200;
    config.initial_y = 3000; // clamps to 1500
    let mut view = Scrollview::with_config(config).unwrap();

    let pan = view.get_pan();
    assert!(pan.panned);
    assert_eq!(pan.x, 200);
    assert_eq!(pan.y, 1500);
}

#[test]
fn test_invalid_geometry_rejected() {
    assert!(Scrollview::with_config(ScrollviewConfig::new(100, 100, 0, 500)).is_err());
    assert!(Scrollview::with_config(ScrollviewConfig::new(100, 100, 500, 0)).is_err());

    let mut view = plain_view();
    view.force_jump(100, 100);
    view.get_pan();

    // A bad geometry update is rejected and the old one keeps working.
    let result = view.set_geometry(ScrollviewConfig::new(2000, 2000, 0, 0));
    assert!(result.is_err());
    assert_eq!(view.get_pos_x(), 100);
    assert_eq!(view.config().viewport_width, 500);
}

#[test]
fn test_geometry_shrink_reclamps_position() {
    let mut view = plain_view();
    view.force_jump(1500, 1500);
    view.get_pan();

    view.set_geometry(ScrollviewConfig::new(1000, 1000, 500, 500))
        .unwrap();
    let pan = view.get_pan();

    assert!(pan.panned);
    assert_eq!(view.get_pos_x(), 500);
    assert_eq!(view.get_pos_y(), 500);
}

#[test]
fn test_prediction_biases_engaged_report_forward() {
    let run = |predict: bool| {
        let mut view = plain_view();
        view.set_input_source(InputSource::Touchscreen);
        if predict {
            view.set_predict(8.0, 16.0);
        }
        let t0 = Instant::now();

        let mut total = 0i64;
        for i in 0..6u64 {
            view.add_scroll_at(ms(t0, i * 10), 0, -50);
            total += view.get_pan_y_at(ms(t0, i * 10));
        }
        total
    };

    // Steady 5000 dp/s downward: the predicted report runs ahead.
    assert!(run(true) > run(false));
}

#[test]
fn test_hostile_numeric_input_is_contained() {
    let mut view = plain_view();
    view.set_input_source(InputSource::Touchpad);
    view.set_predict(f64::NAN, f64::INFINITY);
    view.set_scale_factor(f64::NAN, 0.0);
    let t0 = Instant::now();

    view.add_scroll_at(t0, 10, 10);
    view.add_scroll_at(ms(t0, 8), 10, 10);
    let pan = view.get_pan_at(ms(t0, 8));

    assert!(pan.velocity_x.is_finite());
    assert!(pan.velocity_y.is_finite());
    assert!((0..=1500).contains(&view.get_pos_x()));
    assert!((0..=1500).contains(&view.get_pos_y()));
}
