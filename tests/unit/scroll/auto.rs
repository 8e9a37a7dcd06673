use super::*;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn running(extent: f64) -> AutoScroll {
    let mut s = AutoScroll::default();
    s.set_extent(extent);
    s.set_enabled(true, 10, ms(0));
    s
}

#[test]
fn too_few_notes_keeps_idle() {
    let mut s = AutoScroll::default();
    s.set_extent(1000.0);
    s.set_enabled(true, 3, ms(0));
    assert_eq!(s.state(), ScrollState::Idle);
    assert_eq!(s.tick(ms(10_000)), 0.0);
}

#[test]
fn starts_after_delay_and_scrolls_down() {
    let mut s = running(1000.0);
    s.tick(ms(499));
    assert!(matches!(s.state(), ScrollState::Paused { reason: PauseReason::StartDelay, .. }));

    s.tick(ms(500));
    // 1000 px * 0.02 s/px = 20 s.
    assert_eq!(
        s.state(),
        ScrollState::Scrolling {
            from: 0.0,
            to: 1000.0,
            started_at: ms(500),
            duration: Duration::from_secs(20),
        }
    );
    let mid = s.tick(ms(10_500));
    assert!((mid - 500.0).abs() < 1e-6);
    assert_eq!(s.tick(ms(20_500)), 1000.0);
    assert!(matches!(s.state(), ScrollState::Paused { reason: PauseReason::AtEnd, .. }));
}

#[test]
fn reverses_to_top_after_end_delay() {
    let mut s = running(1000.0);
    s.tick(ms(500));
    s.tick(ms(20_500));
    s.tick(ms(23_499));
    assert!(matches!(s.state(), ScrollState::Paused { .. }));
    s.tick(ms(23_500));
    let ScrollState::Scrolling { from, to, .. } = s.state() else {
        panic!("expected Scrolling");
    };
    assert_eq!((from, to), (1000.0, 0.0));
}

#[test]
fn short_extent_uses_minimum_duration() {
    let mut s = running(100.0);
    s.tick(ms(500));
    let ScrollState::Scrolling { duration, .. } = s.state() else {
        panic!("expected Scrolling");
    };
    assert_eq!(duration, Duration::from_secs(5));
}

#[test]
fn interaction_pauses_and_debounces() {
    let mut s = running(1000.0);
    s.tick(ms(500));
    s.tick(ms(5_500));
    s.interact(ms(6_000), 300.0);
    assert_eq!(s.tick(ms(8_000)), 300.0);

    // A second interaction pushes the resume time out again.
    s.interact(ms(12_000), 320.0);
    s.tick(ms(13_000));
    assert!(matches!(s.state(), ScrollState::Paused { reason: PauseReason::Interaction, .. }));
    s.tick(ms(19_000));
    let ScrollState::Scrolling { from, to, .. } = s.state() else {
        panic!("expected Scrolling");
    };
    assert_eq!((from, to), (320.0, 1000.0));
}

#[test]
fn disabling_returns_to_idle() {
    let mut s = running(1000.0);
    s.tick(ms(500));
    s.set_enabled(false, 10, ms(600));
    assert_eq!(s.state(), ScrollState::Idle);
    s.interact(ms(700), 50.0);
    assert_eq!(s.state(), ScrollState::Idle);
}

#[test]
fn nothing_to_scroll_waits_and_retries() {
    let mut s = running(0.0);
    s.tick(ms(500));
    assert!(matches!(s.state(), ScrollState::Paused { reason: PauseReason::AtEnd, .. }));
    s.set_extent(400.0);
    s.tick(ms(3_500));
    assert!(matches!(s.state(), ScrollState::Scrolling { .. }));
}

#[test]
fn non_finite_positions_and_extents_are_ignored() {
    let mut s = running(1000.0);
    s.tick(ms(500));
    s.tick(ms(5_500));
    let before = s.position();
    s.interact(ms(6_000), f64::NAN);
    assert_eq!(s.position(), before);
    s.set_extent(f64::INFINITY);
    s.tick(ms(60_000));
    assert!(s.position().is_finite());
    assert!(matches!(s.state(), ScrollState::Scrolling { .. }));
}

#[test]
fn negative_speed_is_rejected_and_never_panics() {
    let cfg: AutoScrollConfig = serde_json::from_str(r#"{ "secs_per_px": -0.02 }"#).unwrap();
    assert!(cfg.validate().is_err());
    assert!(AutoScroll::try_new(cfg).is_err());
    assert!(AutoScrollConfig::default().validate().is_ok());

    // Unvalidated configs still fall back to the minimum duration.
    let mut s = AutoScroll::new(cfg);
    s.set_extent(1000.0);
    s.set_enabled(true, 10, ms(0));
    s.tick(ms(500));
    let ScrollState::Scrolling { duration, .. } = s.state() else {
        panic!("expected Scrolling");
    };
    assert_eq!(duration, Duration::from_secs(5));
}
