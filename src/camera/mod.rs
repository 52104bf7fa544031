//! Animated camera moves: flying to a clicked body and back to the overview.
//!
//! The controller never touches a renderer camera. It is fed the live camera
//! position each frame and answers with where the camera should be next.

use glam::DVec3;
use log::debug;
use serde::Deserialize;
use strum_macros::{Display, EnumIter};

pub(crate) mod control;

/// Where the camera sits before any interaction and after a reset.
pub const DEFAULT_POSITION: DVec3 = DVec3::new(0.0, 40.0, 100.0);
pub const DEFAULT_LOOK_AT: DVec3 = DVec3::ZERO;

/// Camera placement relative to a focused body.
pub const FOCUS_OFFSET: DVec3 = DVec3::new(0.0, 5.0, 10.0);

/// Fraction of the remaining distance covered per frame.
pub const LERP_FACTOR: f64 = 0.08;

/// A move is finished once the camera is closer than this to its destination.
pub const ARRIVAL_EPSILON: f64 = 0.2;

/// Frame rate at which both interpolation modes behave identically.
const REFERENCE_FRAME_RATE: f64 = 60.0;

/// A camera destination.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusTarget {
    pub position: DVec3,
    pub look_at: DVec3,
}

impl FocusTarget {
    pub const DEFAULT: Self = Self {
        position: DEFAULT_POSITION,
        look_at: DEFAULT_LOOK_AT,
    };

    /// Frames a body from slightly above and in front of it.
    pub fn for_body(body_position: DVec3) -> Self {
        Self {
            position: body_position + FOCUS_OFFSET,
            look_at: body_position,
        }
    }
}

/// A focus request as it comes from input. Both fields must be present for
/// the request to do anything.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FocusRequest {
    pub position: Option<DVec3>,
    pub look_at: Option<DVec3>,
}

impl FocusRequest {
    pub fn on_body(body_position: DVec3) -> Self {
        let target = FocusTarget::for_body(body_position);
        Self {
            position: Some(target.position),
            look_at: Some(target.look_at),
        }
    }

    pub fn target(&self) -> Option<FocusTarget> {
        Some(FocusTarget {
            position: self.position?,
            look_at: self.look_at?,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraCommand {
    Focus(FocusRequest),
    Reset,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CameraMode {
    Idle,
    ReturningToDefault,
    FocusingOnTarget(FocusTarget),
}

/// How the per-frame step toward the destination is sized.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Display, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationMode {
    /// A fixed [`LERP_FACTOR`] every frame. Moves finish faster on faster
    /// displays.
    #[default]
    #[strum(to_string = "per-frame")]
    PerFrame,
    /// The factor is scaled by frame time so that a move takes the same
    /// wall-clock time at any frame rate.
    #[strum(to_string = "time-scaled")]
    TimeScaled,
}

impl InterpolationMode {
    /// The lerp factor for a frame that took `dt` seconds.
    pub fn factor(self, dt: f64) -> f64 {
        match self {
            Self::PerFrame => LERP_FACTOR,
            Self::TimeScaled => {
                let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
                let factor = 1.0 - (1.0 - LERP_FACTOR).powf(dt * REFERENCE_FRAME_RATE);
                factor.clamp(0.0, 1.0)
            }
        }
    }
}

/// What the camera should do this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraUpdate {
    pub position: DVec3,
    pub look_at: DVec3,
    /// Set on the frame a move finishes: the orbit control should pivot
    /// around this point from now on.
    pub anchor: Option<DVec3>,
}

impl CameraUpdate {
    #[inline]
    pub fn arrived(&self) -> bool {
        self.anchor.is_some()
    }
}

#[derive(Clone, Debug)]
pub struct CameraController {
    mode: CameraMode,
    interpolation: InterpolationMode,
}

impl CameraController {
    pub fn new(interpolation: InterpolationMode) -> Self {
        Self {
            mode: CameraMode::Idle,
            interpolation,
        }
    }

    #[inline]
    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.mode == CameraMode::Idle
    }

    /// Consumes this frame's commands.
    ///
    /// A valid focus beats a reset from the same frame no matter the order;
    /// among several focuses the last one wins. Malformed focus requests are
    /// dropped.
    ///
    /// Returns the point the orbit control should pivot around immediately,
    /// which only happens on reset.
    pub fn apply_commands(
        &mut self,
        commands: impl IntoIterator<Item = CameraCommand>,
    ) -> Option<DVec3> {
        let mut focus = None;
        let mut reset = false;

        for command in commands {
            match command {
                CameraCommand::Focus(request) => match request.target() {
                    Some(target) => focus = Some(target),
                    None => debug!("ignoring incomplete focus request {request:?}"),
                },
                CameraCommand::Reset => reset = true,
            }
        }

        if let Some(target) = focus {
            debug!("camera focusing on {:?}", target.look_at);
            self.mode = CameraMode::FocusingOnTarget(target);
            None
        } else if reset {
            debug!("camera returning to default view");
            self.mode = CameraMode::ReturningToDefault;
            Some(DEFAULT_LOOK_AT)
        } else {
            None
        }
    }

    /// Moves the camera one frame closer to its destination.
    ///
    /// Returns `None` while idle, meaning the camera is left alone.
    pub fn step(&mut self, position: DVec3, dt: f64) -> Option<CameraUpdate> {
        let target = match self.mode {
            CameraMode::Idle => return None,
            CameraMode::ReturningToDefault => FocusTarget::DEFAULT,
            CameraMode::FocusingOnTarget(target) => target,
        };

        let factor = self.interpolation.factor(dt);
        let position = position.lerp(target.position, factor);

        let anchor = if position.distance(target.position) < ARRIVAL_EPSILON {
            debug!("camera arrived at {:?}", target.position);
            self.mode = CameraMode::Idle;
            Some(target.look_at)
        } else {
            None
        };

        Some(CameraUpdate {
            position,
            look_at: target.look_at,
            anchor,
        })
    }
}

impl Default for CameraController {
    fn default() -> Self {
        Self::new(InterpolationMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    const FRAME: f64 = 1.0 / 60.0;

    fn focus(position: DVec3) -> CameraCommand {
        CameraCommand::Focus(FocusRequest::on_body(position))
    }

    /// Runs frames until idle, returning the final position and how many
    /// updates reported an arrival.
    fn run(controller: &mut CameraController, mut position: DVec3, frames: usize) -> (DVec3, usize) {
        let mut arrivals = 0;
        for _ in 0..frames {
            if let Some(update) = controller.step(position, FRAME) {
                position = update.position;
                arrivals += usize::from(update.arrived());
            }
        }
        (position, arrivals)
    }

    #[rstest]
    fn focus_converges_once(
        #[values(InterpolationMode::PerFrame, InterpolationMode::TimeScaled)]
        interpolation: InterpolationMode,
    ) {
        let mut controller = CameraController::new(interpolation);
        let body = DVec3::new(64.0, 0.0, 0.0);
        controller.apply_commands([focus(body)]);

        let (position, arrivals) = run(&mut controller, DEFAULT_POSITION, 2000);

        assert!(position.distance(body + FOCUS_OFFSET) < ARRIVAL_EPSILON);
        assert_eq!(arrivals, 1);
        assert!(controller.is_idle());
    }

    #[test]
    fn idle_leaves_camera_alone() {
        let mut controller = CameraController::default();
        assert_eq!(controller.step(DVec3::new(1.0, 2.0, 3.0), FRAME), None);
    }

    #[test]
    fn arrival_snaps_anchor_to_look_at() {
        let mut controller = CameraController::default();
        let body = DVec3::new(0.0, 0.0, -46.0);
        controller.apply_commands([focus(body)]);

        let mut position = DEFAULT_POSITION;
        let last = loop {
            let update = controller.step(position, FRAME).unwrap();
            position = update.position;
            assert_eq!(update.look_at, body);
            if update.arrived() {
                break update;
            }
        };

        assert_eq!(last.anchor, Some(body));
        assert_eq!(controller.mode(), CameraMode::Idle);
    }

    #[test]
    fn second_focus_redirects_immediately() {
        let mut controller = CameraController::default();
        let first = DVec3::new(28.0, 0.0, 0.0);
        let second = DVec3::new(-154.0, 0.0, 0.0);
        controller.apply_commands([focus(first)]);

        let mut position = DEFAULT_POSITION;
        for _ in 0..5 {
            position = controller.step(position, FRAME).unwrap().position;
        }

        controller.apply_commands([focus(second)]);
        let update = controller.step(position, FRAME).unwrap();
        let expected = position.lerp(second + FOCUS_OFFSET, LERP_FACTOR);

        assert_eq!(update.position, expected);
        assert_eq!(update.look_at, second);

        let (position, arrivals) = run(&mut controller, update.position, 2000);
        assert!(position.distance(second + FOCUS_OFFSET) < ARRIVAL_EPSILON);
        assert_eq!(arrivals, 1);
    }

    #[rstest]
    #[case::focus_first([focus(DVec3::X * 64.0), CameraCommand::Reset])]
    #[case::reset_first([CameraCommand::Reset, focus(DVec3::X * 64.0)])]
    fn focus_beats_reset_in_same_frame(#[case] commands: [CameraCommand; 2]) {
        let mut controller = CameraController::default();
        let anchor = controller.apply_commands(commands);

        assert_eq!(anchor, None);
        assert_eq!(
            controller.mode(),
            CameraMode::FocusingOnTarget(FocusTarget::for_body(DVec3::X * 64.0))
        );
    }

    #[test]
    fn reset_returns_to_default() {
        let mut controller = CameraController::default();
        controller.apply_commands([focus(DVec3::new(100.0, 0.0, 0.0))]);
        let (position, _) = run(&mut controller, DEFAULT_POSITION, 2000);

        let anchor = controller.apply_commands([CameraCommand::Reset]);
        assert_eq!(anchor, Some(DEFAULT_LOOK_AT));
        assert_eq!(controller.mode(), CameraMode::ReturningToDefault);

        let (position, arrivals) = run(&mut controller, position, 2000);
        assert!(position.distance(DEFAULT_POSITION) < ARRIVAL_EPSILON);
        assert_eq!(arrivals, 1);
    }

    #[test]
    fn reset_abandons_focus_in_flight() {
        let mut controller = CameraController::default();
        controller.apply_commands([focus(DVec3::new(100.0, 0.0, 0.0))]);
        controller.step(DEFAULT_POSITION, FRAME);

        controller.apply_commands([CameraCommand::Reset]);
        let update = controller.step(DEFAULT_POSITION + DVec3::X, FRAME).unwrap();
        assert_eq!(update.look_at, DEFAULT_LOOK_AT);
    }

    #[rstest]
    #[case(FocusRequest { position: None, look_at: Some(DVec3::ONE) })]
    #[case(FocusRequest { position: Some(DVec3::ONE), look_at: None })]
    #[case(FocusRequest::default())]
    fn incomplete_focus_is_ignored(#[case] request: FocusRequest) {
        let mut controller = CameraController::default();
        assert_eq!(controller.apply_commands([CameraCommand::Focus(request)]), None);
        assert!(controller.is_idle());

        // Incomplete focus does not shadow a reset.
        controller.apply_commands([CameraCommand::Focus(request), CameraCommand::Reset]);
        assert_eq!(controller.mode(), CameraMode::ReturningToDefault);
    }

    #[test]
    fn no_commands_keeps_mode() {
        let mut controller = CameraController::default();
        controller.apply_commands([CameraCommand::Reset]);
        assert_eq!(controller.apply_commands([]), None);
        assert_eq!(controller.mode(), CameraMode::ReturningToDefault);
    }

    #[rstest]
    #[case(1.0 / 60.0, LERP_FACTOR)]
    #[case(0.0, 0.0)]
    #[case(f64::NAN, 0.0)]
    #[case(1000.0, 1.0)]
    fn time_scaled_factor(#[case] dt: f64, #[case] expected: f64) {
        let factor = InterpolationMode::TimeScaled.factor(dt);
        assert!((factor - expected).abs() < 1e-9, "{factor} != {expected}");
    }

    #[test]
    fn time_scaled_matches_per_frame_over_a_second() {
        // Two frames at 30 FPS should cover what one 15 FPS frame does.
        let one = InterpolationMode::TimeScaled.factor(2.0 / 30.0);
        let half = InterpolationMode::TimeScaled.factor(1.0 / 30.0);
        assert!(((1.0 - half) * (1.0 - half) - (1.0 - one)).abs() < 1e-12);
    }

    #[test]
    fn per_frame_factor_ignores_dt() {
        for dt in [0.001, 1.0 / 144.0, 0.5] {
            assert_eq!(InterpolationMode::PerFrame.factor(dt), LERP_FACTOR);
        }
    }

    #[test]
    fn interpolation_names() {
        let names: Vec<String> = InterpolationMode::iter().map(|m| m.to_string()).collect();
        assert_eq!(names, ["per-frame", "time-scaled"]);
    }
}
