use super::*;

const ALL: [Ease; 3] = [Ease::Linear, Ease::InOutQuad, Ease::InOutCubic];

#[test]
fn endpoints_and_midpoint_are_fixed() {
    for ease in ALL {
        assert_eq!(ease.apply(0.0), 0.0);
        assert_eq!(ease.apply(1.0), 1.0);
        assert!((ease.apply(0.5) - 0.5).abs() < 1e-12, "{ease:?}");
    }
}

#[test]
fn progress_is_clamped() {
    for ease in ALL {
        assert_eq!(ease.apply(-1.0), 0.0);
        assert_eq!(ease.apply(2.0), 1.0);
    }
}

#[test]
fn in_out_quad_is_slow_at_the_ends() {
    assert!((Ease::InOutQuad.apply(0.25) - 0.125).abs() < 1e-12);
    assert!((Ease::InOutQuad.apply(0.75) - 0.875).abs() < 1e-12);
}

#[test]
fn lerp_runs_in_either_direction() {
    assert_eq!(Ease::Linear.lerp(100.0, 0.0, 0.25), 75.0);
    assert_eq!(Ease::InOutQuad.lerp(0.0, 800.0, 1.0), 800.0);
}
