//! Per-frame motion of a single body.
//!
//! Everything here is a pure function of its inputs: the caller owns the
//! state and writes the returned values wherever it renders from.

use glam::DVec3;

/// Spin rate shared by every planet, in radians per second.
pub const FIXED_AXIAL_RATE: f64 = 0.02;

/// The animated part of a body.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OrbitState {
    /// Position along the circular path, in radians. Never normalized.
    pub orbital_angle: f64,
    /// Spin about the body's own vertical axis, in radians.
    pub axial_rotation: f64,
}

/// Where a body is drawn this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BodyTransform {
    pub position: DVec3,
    /// Rotation about the Y axis, in radians.
    pub rotation_y: f64,
}

/// Turns whatever the control surface holds into a usable speed.
///
/// Missing, non-finite and negative speeds all mean "hold still".
pub fn sanitize_speed(speed: Option<f64>) -> f64 {
    match speed {
        Some(s) if s.is_finite() && s > 0.0 => s,
        _ => 0.0,
    }
}

fn sanitize_dt(dt: f64) -> f64 {
    if dt.is_finite() && dt > 0.0 { dt } else { 0.0 }
}

/// Advances a body by `dt` seconds.
///
/// Nothing moves while `paused`, regardless of speed or `dt`.
pub fn advance(
    state: OrbitState,
    speed: Option<f64>,
    axial_rate: f64,
    paused: bool,
    dt: f64,
) -> OrbitState {
    if paused {
        return state;
    }

    let dt = sanitize_dt(dt);

    OrbitState {
        orbital_angle: state.orbital_angle + sanitize_speed(speed) * dt,
        axial_rotation: state.axial_rotation + axial_rate * dt,
    }
}

/// Position on a circle of radius `distance` in the XZ plane.
pub fn orbit_position(distance: f64, angle: f64) -> DVec3 {
    let (sin, cos) = angle.sin_cos();
    DVec3::new(distance * cos, 0.0, distance * sin)
}

pub fn transform(orbit_distance: f64, state: OrbitState) -> BodyTransform {
    BodyTransform {
        position: orbit_position(orbit_distance, state.orbital_angle),
        rotation_y: state.axial_rotation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const EPSILON: f64 = 1e-9;

    fn start() -> OrbitState {
        OrbitState {
            orbital_angle: 0.7,
            axial_rotation: 1.3,
        }
    }

    #[rstest]
    #[case(None)]
    #[case(Some(0.0))]
    #[case(Some(3.0))]
    #[case(Some(1e12))]
    #[case(Some(f64::NAN))]
    fn paused_never_moves(#[case] speed: Option<f64>) {
        let mut state = start();
        for dt in [0.016, 1.0, 1000.0, -3.0, f64::INFINITY] {
            state = advance(state, speed, FIXED_AXIAL_RATE, true, dt);
        }
        assert_eq!(state, start());
    }

    #[test]
    fn angle_accumulates_speed_times_elapsed() {
        let speed = 2.5;
        let deltas = [0.016, 0.017, 0.033, 0.5, 0.008];
        let mut state = start();
        for dt in deltas {
            state = advance(state, Some(speed), FIXED_AXIAL_RATE, false, dt);
        }
        let total: f64 = deltas.iter().sum();

        assert!((state.orbital_angle - (0.7 + speed * total)).abs() < EPSILON);
        assert!((state.axial_rotation - (1.3 + FIXED_AXIAL_RATE * total)).abs() < EPSILON);
    }

    #[rstest]
    #[case(None)]
    #[case(Some(f64::NAN))]
    #[case(Some(f64::INFINITY))]
    #[case(Some(-4.0))]
    fn invalid_speed_holds_position_but_still_spins(#[case] speed: Option<f64>) {
        let state = advance(start(), speed, FIXED_AXIAL_RATE, false, 1.0);
        assert_eq!(state.orbital_angle, 0.7);
        assert!((state.axial_rotation - (1.3 + FIXED_AXIAL_RATE)).abs() < EPSILON);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(f64::NAN)]
    #[case(f64::NEG_INFINITY)]
    fn invalid_dt_is_ignored(#[case] dt: f64) {
        assert_eq!(advance(start(), Some(3.0), FIXED_AXIAL_RATE, false, dt), start());
    }

    #[rstest]
    #[case(0.0, DVec3::new(64.0, 0.0, 0.0))]
    #[case(std::f64::consts::FRAC_PI_2, DVec3::new(0.0, 0.0, 64.0))]
    #[case(std::f64::consts::PI, DVec3::new(-64.0, 0.0, 0.0))]
    #[case(std::f64::consts::TAU * 3.0, DVec3::new(64.0, 0.0, 0.0))]
    fn position_on_circle(#[case] angle: f64, #[case] expected: DVec3) {
        let position = orbit_position(64.0, angle);
        assert!(position.distance(expected) < 1e-9);
        assert_eq!(position.y, 0.0);
    }

    #[test]
    fn transform_keeps_distance() {
        let state = OrbitState {
            orbital_angle: 12.345,
            axial_rotation: 0.5,
        };
        let transform = transform(118.0, state);
        assert!((transform.position.length() - 118.0).abs() < EPSILON);
        assert_eq!(transform.rotation_y, 0.5);
    }
}
