// Lifecycle, scheduling and error-handling behavior of the controller,
// driven through mock tap/surface/scheduler implementations.

mod common;

use common::*;
use sonic_core::constants::{DEFAULT_VOLUME, VISIBILITY_THRESHOLD};
use sonic_core::*;

#[test]
fn connecting_twice_leaves_one_tap() {
    let mut viz = visualizer();
    viz.connect_audio(&1);
    viz.connect_audio(&1);

    assert_eq!(viz.tap().connect_calls, 1);
    assert_eq!(viz.tap().nodes_created, 1);
    assert_eq!(viz.phase(), Phase::ConnectedSilent);
    assert!(!viz.is_inert());
}

#[test]
fn connecting_a_new_source_while_attached_is_ignored() {
    let mut viz = visualizer();
    viz.connect_audio(&1);
    viz.connect_audio(&2);

    assert_eq!(viz.tap().nodes_created, 1);
    assert!(viz.tap().wrapped.contains(&1));
    assert!(!viz.tap().wrapped.contains(&2));
}

#[test]
fn already_wrapped_source_is_suppressed() {
    let mut tap = MockTap::default();
    tap.wrapped.insert(7);
    let mut viz = visualizer_with(tap);

    viz.connect_audio(&7);

    assert_eq!(viz.phase(), Phase::Idle);
    assert!(!viz.tap().attached);
    assert!(!viz.is_inert());
}

#[test]
fn unsupported_platform_leaves_visualizer_inert() {
    let tap = MockTap {
        fail_with: Some(VisualizerError::Unsupported("no AudioContext".into())),
        ..Default::default()
    };
    let mut viz = visualizer_with(tap);
    viz.set_draw_target(MockSurface::new(400.0, 100.0, 1.0, Backdrop::Trail));

    viz.connect_audio(&1);
    assert!(viz.is_inert());

    viz.connect_audio(&1);
    viz.start();
    assert_eq!(viz.tap().connect_calls, 1);
    assert!(!viz.is_scheduled());
    assert_eq!(viz.scheduler().total_scheduled, 0);
    assert_eq!(viz.phase(), Phase::Idle);
}

#[test]
fn start_schedules_exactly_one_frame() {
    let mut viz = playing_visualizer();
    viz.start();
    viz.start();

    assert_eq!(viz.phase(), Phase::Playing);
    assert_eq!(viz.scheduler().live_count(), 1);
    assert_eq!(viz.scheduler().total_scheduled, 1);
    assert_eq!(viz.tap().resumes, 1);
    assert!(viz.surface().is_some_and(|s| s.active));
}

#[test]
fn each_frame_keeps_one_callback_in_flight() {
    let mut viz = playing_visualizer();
    for _ in 0..10 {
        assert_eq!(fire(&mut viz), Some(FrameOutcome::Rendered));
        assert_eq!(viz.scheduler().live_count(), 1);
    }
    assert_eq!(viz.render_state().frame, 10);
    assert_eq!(viz.tap().samples_taken, 10);
}

#[test]
fn fade_out_is_monotonic_and_bounded() {
    let mut viz = playing_visualizer();
    for _ in 0..30 {
        fire(&mut viz);
    }
    let peak = viz.render_state().alpha;
    assert!(peak > 0.9);

    viz.stop();
    assert_eq!(viz.phase(), Phase::FadingOut);
    assert!(viz.surface().is_some_and(|s| !s.active));

    let mut previous = peak;
    let mut rendered = 0;
    loop {
        match fire(&mut viz) {
            Some(FrameOutcome::Rendered) => {
                let alpha = viz.render_state().alpha;
                assert!(alpha <= previous, "alpha rose from {} to {}", previous, alpha);
                previous = alpha;
                rendered += 1;
                assert!(rendered <= 60, "fade did not finish within 60 frames");
            }
            Some(FrameOutcome::Finished) => break,
            other => panic!("unexpected frame outcome {:?}", other),
        }
    }

    assert!(viz.render_state().alpha < VISIBILITY_THRESHOLD);
    assert_eq!(viz.phase(), Phase::ConnectedSilent);
}

#[test]
fn no_frames_scheduled_after_fade_completes() {
    let mut viz = playing_visualizer();
    for _ in 0..5 {
        fire(&mut viz);
    }
    viz.stop();
    while let Some(outcome) = fire(&mut viz) {
        if outcome == FrameOutcome::Finished {
            break;
        }
    }

    let scheduled = viz.scheduler().total_scheduled;
    let sampled = viz.tap().samples_taken;
    assert_eq!(viz.scheduler().live_count(), 0);
    assert!(!viz.is_scheduled());
    assert_eq!(fire(&mut viz), None);
    assert_eq!(viz.scheduler().total_scheduled, scheduled);
    assert_eq!(viz.tap().samples_taken, sampled);
    assert_eq!(*viz.energy(), EnergyState::default());
    // final clear left nothing on the canvas
    assert!(viz.surface().is_some_and(|s| s.strokes.is_empty()));
}

#[test]
fn start_during_fade_resumes_without_double_scheduling() {
    let mut viz = playing_visualizer();
    for _ in 0..10 {
        fire(&mut viz);
    }
    viz.stop();
    for _ in 0..5 {
        fire(&mut viz);
    }
    let faded = viz.render_state().alpha;

    viz.start();
    assert_eq!(viz.phase(), Phase::Playing);
    assert_eq!(viz.scheduler().live_count(), 1);

    fire(&mut viz);
    assert!(viz.render_state().alpha > faded);
}

#[test]
fn stop_outside_playing_does_nothing() {
    let mut viz = visualizer();
    viz.connect_audio(&1);
    viz.stop();

    assert_eq!(viz.phase(), Phase::ConnectedSilent);
    assert_eq!(viz.scheduler().total_scheduled, 0);
}

#[test]
fn stale_tokens_are_ignored() {
    let mut viz = playing_visualizer();
    let (_, first) = viz.scheduler().live[0];
    assert_eq!(fire(&mut viz), Some(FrameOutcome::Rendered));

    let strokes_before = viz.surface().map(|s| s.strokes.len());
    assert_eq!(viz.on_frame(first), FrameOutcome::Stale);
    assert_eq!(viz.surface().map(|s| s.strokes.len()), strokes_before);
    assert_eq!(viz.render_state().frame, 1);
}

#[test]
fn callback_firing_after_destroy_draws_nothing() {
    let mut viz = playing_visualizer();
    let (_, pending) = viz.scheduler().live[0];
    viz.destroy();

    assert_eq!(viz.on_frame(pending), FrameOutcome::Stale);
    assert_eq!(viz.tap().samples_taken, 0);
    assert_eq!(viz.scheduler().live_count(), 0);
}

#[test]
fn hidden_page_stays_scheduled_without_work() {
    let mut viz = playing_visualizer();
    viz.scheduler_mut().hidden = true;

    for _ in 0..3 {
        assert_eq!(fire(&mut viz), Some(FrameOutcome::Skipped));
    }
    assert_eq!(viz.tap().samples_taken, 0);
    assert_eq!(viz.scheduler().live_count(), 1);
    assert_eq!(viz.render_state().frame, 0);

    viz.scheduler_mut().hidden = false;
    assert_eq!(fire(&mut viz), Some(FrameOutcome::Rendered));
    assert_eq!(viz.tap().samples_taken, 1);
}

#[test]
fn playing_without_a_surface_skips_frames() {
    let mut viz = visualizer();
    viz.connect_audio(&1);
    viz.start();

    assert_eq!(fire(&mut viz), Some(FrameOutcome::Skipped));
    assert_eq!(viz.tap().samples_taken, 0);
    assert!(viz.is_scheduled());
}

#[test]
fn undrawable_surface_while_fading_finishes_immediately() {
    let mut viz = playing_visualizer();
    for _ in 0..10 {
        fire(&mut viz);
    }
    if let Some(surface) = viz.surface_mut() {
        surface.drawable = false;
    }
    viz.stop();

    assert_eq!(fire(&mut viz), Some(FrameOutcome::Finished));
    assert!(!viz.is_scheduled());
    assert_eq!(viz.render_state().alpha, 0.0);
}

#[test]
fn swapping_draw_target_preserves_energy_and_fade() {
    let mut viz = playing_visualizer();
    for _ in 0..12 {
        fire(&mut viz);
    }
    let energy = *viz.energy();
    let alpha = viz.render_state().alpha;
    let frame = viz.render_state().frame;

    let previous = viz.set_draw_target(MockSurface::new(320.0, 320.0, 2.0, Backdrop::Overlay));

    let previous = previous.expect("old target returned");
    assert!(!previous.active);
    assert!(previous.clears >= 1);

    let current = viz.surface().expect("new target bound");
    assert!(current.active);
    assert_eq!(
        current.backing,
        Some(BackingSize {
            width: 640,
            height: 640
        })
    );
    assert_eq!(current.scale, 2.0);
    assert_eq!(*viz.energy(), energy);
    assert_eq!(viz.render_state().alpha, alpha);
    assert_eq!(viz.render_state().frame, frame);
    assert_eq!(viz.render_state().viewport.width, 320.0);

    assert_eq!(fire(&mut viz), Some(FrameOutcome::Rendered));
    let current = viz.surface().expect("new target bound");
    assert_eq!(current.clears, 1);
    assert!(current.fills.is_empty());
}

#[test]
fn take_draw_target_unbinds_and_clears() {
    let mut viz = playing_visualizer();
    fire(&mut viz);

    let taken = viz.take_draw_target().expect("surface was bound");
    assert!(!taken.active);
    assert!(taken.strokes.is_empty());
    assert!(viz.surface().is_none());
}

#[test]
fn refresh_size_tracks_new_css_box() {
    let mut viz = playing_visualizer();
    if let Some(surface) = viz.surface_mut() {
        surface.metrics = Some(SurfaceMetrics {
            css_width: 1280.0,
            css_height: 180.0,
            device_pixel_ratio: 1.5,
        });
    }
    viz.refresh_size();

    let surface = viz.surface().expect("bound");
    assert_eq!(
        surface.backing,
        Some(BackingSize {
            width: 1920,
            height: 270
        })
    );
    assert_eq!(viz.render_state().viewport.width, 1280.0);
    assert_eq!(viz.render_state().device_pixel_ratio, 1.5);
}

#[test]
fn unmeasurable_target_keeps_previous_size() {
    let mut viz = playing_visualizer();
    if let Some(surface) = viz.surface_mut() {
        surface.metrics = None;
    }
    viz.refresh_size();
    assert_eq!(viz.render_state().viewport.width, 400.0);
}

#[test]
fn set_volume_clamps() {
    let mut viz = visualizer();
    assert_eq!(viz.volume(), DEFAULT_VOLUME);

    viz.set_volume(1.7);
    assert_eq!(viz.volume(), 1.0);
    viz.set_volume(-0.2);
    assert_eq!(viz.volume(), 0.0);
    viz.set_volume(f32::NAN);
    assert_eq!(viz.volume(), 0.0);
    viz.set_volume(0.3);
    assert_eq!(viz.volume(), 0.3);
}

#[test]
fn destroy_is_terminal() {
    let mut viz = playing_visualizer();
    fire(&mut viz);
    viz.destroy();

    assert_eq!(viz.phase(), Phase::Destroyed);
    assert!(viz.tap().released);
    assert_eq!(viz.scheduler().live_count(), 0);
    assert!(viz.surface().is_some_and(|s| !s.active));

    viz.start();
    viz.connect_audio(&2);
    assert_eq!(viz.phase(), Phase::Destroyed);
    assert_eq!(viz.scheduler().live_count(), 0);
    assert_eq!(viz.tap().connect_calls, 1);

    let refused = viz.set_draw_target(MockSurface::new(10.0, 10.0, 1.0, Backdrop::Trail));
    assert!(refused.is_some());
}

#[test]
fn average_amplitude_reflects_last_frame() {
    let mut viz = playing_visualizer();
    assert!((viz.average_amplitude() - 128.0 / 255.0).abs() < 1e-6);
    fire(&mut viz);
    assert!((viz.average_amplitude() - 1.0).abs() < 1e-6);
}

#[test]
fn invalid_window_size_is_rejected() {
    let config = VisualizerConfig {
        tap: TapSettings {
            fft_size: 1000,
            smoothing: 0.85,
        },
        ..Default::default()
    };
    let result = Visualizer::<MockTap, MockSurface, MockScheduler>::new(
        MockTap::default(),
        MockScheduler::default(),
        config,
    );
    assert_eq!(result.err(), Some(VisualizerError::InvalidWindowSize(1000)));
}
