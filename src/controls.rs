use std::{collections::BTreeMap, ops::RangeInclusive};

use glam::DVec3;
use log::debug;

use crate::{
    camera::{CameraCommand, FocusRequest},
    sim::system::{FrameParams, Id},
    theme::Theme,
};

pub const SPEED_RANGE: RangeInclusive<f64> = 0.0..=20.0;
pub const SPEED_STEP: f64 = 0.01;

/// Everything the user can change. The simulation and camera only ever
/// read from here.
#[derive(Clone, Debug, Default)]
pub struct ControlSurface {
    speeds: BTreeMap<String, f64>,
    paused: bool,
    theme: Theme,
    camera_commands: Vec<CameraCommand>,
    /// The last body focus was requested on, for cycling through bodies.
    focused_body: Option<Id>,
}

impl ControlSurface {
    pub fn new(speeds: BTreeMap<String, f64>, theme: Theme) -> Self {
        Self {
            speeds,
            theme,
            ..Default::default()
        }
    }

    #[inline]
    pub fn speeds(&self) -> &BTreeMap<String, f64> {
        &self.speeds
    }

    pub fn speed(&self, name: &str) -> Option<f64> {
        self.speeds.get(name).copied()
    }

    /// Sets a body's speed, clamped to [`SPEED_RANGE`]. NaN is ignored.
    pub fn set_speed(&mut self, name: &str, value: f64) {
        if value.is_nan() {
            return;
        }
        let value = value.clamp(*SPEED_RANGE.start(), *SPEED_RANGE.end());
        match self.speeds.get_mut(name) {
            Some(speed) => *speed = value,
            None => {
                self.speeds.insert(name.to_owned(), value);
            }
        }
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        debug!("paused: {}", self.paused);
    }

    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        debug!("theme: {}", self.theme);
    }

    pub fn request_camera_reset(&mut self) {
        self.focused_body = None;
        self.camera_commands.push(CameraCommand::Reset);
    }

    pub fn request_focus(&mut self, request: FocusRequest) {
        self.camera_commands.push(CameraCommand::Focus(request));
    }

    /// Requests focus on a body at its present position.
    pub fn focus_body(&mut self, id: Id, position: DVec3) {
        self.focused_body = Some(id);
        self.request_focus(FocusRequest::on_body(position));
    }

    #[inline]
    pub fn focused_body(&self) -> Option<Id> {
        self.focused_body
    }

    /// Drains the commands queued since the last call.
    pub fn take_camera_commands(&mut self) -> Vec<CameraCommand> {
        std::mem::take(&mut self.camera_commands)
    }

    pub fn frame_params(&self) -> FrameParams<'_> {
        FrameParams {
            speeds: &self.speeds,
            paused: self.paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn surface() -> ControlSurface {
        ControlSurface::new(crate::sim::default_speeds(), Theme::Dark)
    }

    #[rstest]
    #[case(5.5, 5.5)]
    #[case(-1.0, 0.0)]
    #[case(25.0, 20.0)]
    #[case(f64::INFINITY, 20.0)]
    fn set_speed_clamps(#[case] value: f64, #[case] expected: f64) {
        let mut controls = surface();
        controls.set_speed("earth", value);
        assert_eq!(controls.speed("earth"), Some(expected));
    }

    #[test]
    fn nan_speed_is_ignored() {
        let mut controls = surface();
        controls.set_speed("earth", f64::NAN);
        assert_eq!(controls.speed("earth"), Some(2.5));
    }

    #[test]
    fn toggles() {
        let mut controls = surface();
        assert!(!controls.is_paused());
        controls.toggle_pause();
        assert!(controls.frame_params().paused);

        controls.toggle_theme();
        assert_eq!(controls.theme(), Theme::Light);
        controls.toggle_theme();
        assert_eq!(controls.theme(), Theme::Dark);
    }

    #[test]
    fn commands_drain_in_order() {
        let mut controls = surface();
        controls.focus_body(2, DVec3::new(64.0, 0.0, 0.0));
        controls.request_camera_reset();

        assert_eq!(
            controls.take_camera_commands(),
            [
                CameraCommand::Focus(FocusRequest::on_body(DVec3::new(64.0, 0.0, 0.0))),
                CameraCommand::Reset,
            ]
        );
        assert!(controls.take_camera_commands().is_empty());
        assert_eq!(controls.focused_body(), None);
    }

    #[test]
    fn frame_params_see_speed_changes() {
        let mut controls = surface();
        controls.set_speed("mars", 7.0);
        assert_eq!(controls.frame_params().speed_of("mars"), Some(7.0));
        assert_eq!(controls.frame_params().speed_of("pluto"), None);
    }
}
