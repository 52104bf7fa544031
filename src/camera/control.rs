// Modified from three-d's OrbitControl struct.

#[cfg(target_family = "wasm")]
use std::sync::LazyLock;

use glam::DVec3;
use three_d::{Camera, Event, MouseButton};

use crate::gfx::{to_dvec3, to_vec3};

/// Closest the camera may get to the anchor.
pub const MIN_DISTANCE: f64 = 10.0;
/// Farthest the camera may get from the anchor.
pub const MAX_DISTANCE: f64 = 400.0;

const ZOOM_APPROACH_SPEED: f64 = 0.03;
const ROTATE_SPEED: f32 = 0.01;

///
/// A control that makes the camera orbit around an anchor point.
///
/// Dragging with the left button rotates, the wheel and pinch zoom.
/// There is no panning: the anchor only moves when a camera animation ends.
///
#[derive(Clone, Copy, Debug)]
pub struct OrbitControl {
    /// The point the camera orbits around and looks at.
    pub anchor: DVec3,
    /// The minimum distance to the anchor.
    pub min_distance: f64,
    /// The maximum distance to the anchor.
    pub max_distance: f64,
    /// The desired distance to the anchor.
    pub desired_distance: f64,
    /// The current distance to the anchor.
    pub current_distance: f64,
}

impl OrbitControl {
    pub fn new(anchor: DVec3, min_distance: f64, max_distance: f64, distance: f64) -> Self {
        let distance = distance.clamp(min_distance, max_distance);
        Self {
            anchor,
            min_distance,
            max_distance,
            desired_distance: distance,
            current_distance: distance,
        }
    }

    /// Orbit control around `anchor` at the camera's present distance from it.
    pub fn around(camera: &Camera, anchor: DVec3) -> Self {
        let distance = to_dvec3(camera.position()).distance(anchor);
        Self::new(anchor, MIN_DISTANCE, MAX_DISTANCE, distance)
    }

    /// Re-anchors on `anchor`, adopting the camera's present distance.
    ///
    /// Called when a camera animation hands control back to the user.
    pub fn sync(&mut self, camera: &mut Camera, anchor: DVec3) {
        let distance = to_dvec3(camera.position()).distance(anchor);
        let distance = if distance.is_finite() {
            distance.clamp(self.min_distance, self.max_distance)
        } else {
            self.min_distance
        };
        self.anchor = anchor;
        self.desired_distance = distance;
        self.current_distance = distance;
        self.apply_distance(camera);
    }

    /// Handles the events. Must be called each frame while the user is in control.
    pub fn handle_events(&mut self, camera: &mut Camera, events: &mut [Event], elapsed_time: f64) {
        for event in events.iter_mut() {
            self.handle_event(camera, event);
        }
        self.reclamp();
        self.update_zoom(elapsed_time);
        self.apply_distance(camera);
    }

    fn handle_event(&mut self, camera: &mut Camera, event: &mut Event) {
        match event {
            Event::MouseMotion {
                delta,
                button,
                handled,
                ..
            } => {
                if *handled {
                    return;
                }
                if Some(MouseButton::Left) == *button {
                    camera.rotate_around_with_fixed_up(
                        to_vec3(self.anchor),
                        ROTATE_SPEED * delta.0,
                        ROTATE_SPEED * delta.1,
                    );
                    *handled = true;
                }
            }
            Event::MouseWheel { delta, handled, .. } => {
                if *handled {
                    return;
                }

                let delta = delta.1 as f64 * -0.02;

                #[cfg(target_family = "wasm")]
                let delta = if *IS_WEB_MOBILE {
                    delta * 1.2
                } else {
                    delta * 0.1
                };

                self.zoom(delta);
                *handled = true;
            }
            Event::PinchGesture { delta, handled, .. } => {
                if *handled {
                    return;
                }
                self.zoom(-*delta as f64);
                *handled = true;
            }
            _ => {}
        }
    }

    fn zoom(&mut self, delta: f64) {
        self.desired_distance =
            (self.current_distance * delta.exp()).clamp(self.min_distance, self.max_distance);
    }

    fn reclamp(&mut self) {
        self.desired_distance = self
            .desired_distance
            .clamp(self.min_distance, self.max_distance);
    }

    fn update_zoom(&mut self, elapsed_time: f64) {
        self.current_distance = approach(
            self.current_distance,
            self.desired_distance,
            elapsed_time,
        );
    }

    /// Puts the camera `current_distance` away from the anchor, keeping its
    /// direction, looking at the anchor.
    fn apply_distance(&self, camera: &mut Camera) {
        let offset = to_dvec3(camera.position()) - self.anchor;
        let direction = offset.try_normalize().unwrap_or(DVec3::Z);
        let position = self.anchor + direction * self.current_distance;
        camera.set_view(
            to_vec3(position),
            to_vec3(self.anchor),
            three_d::Vec3::unit_y(),
        );
    }
}

/// Exponentially approaches `desired` over `elapsed_time` milliseconds.
fn approach(current: f64, desired: f64, elapsed_time: f64) -> f64 {
    let elapsed_time = if elapsed_time.is_finite() {
        elapsed_time.max(0.0)
    } else {
        0.0
    };
    let factor = (-ZOOM_APPROACH_SPEED * elapsed_time).exp().min(1.0);
    desired - (desired - current) * factor
}

#[cfg(target_family = "wasm")]
static IS_WEB_MOBILE: LazyLock<bool> = LazyLock::new(|| {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return false,
    };
    let ua = match window.navigator().user_agent().ok() {
        Some(ua) => ua.to_lowercase(),
        None => return false,
    };
    ua.contains("mobi") || ua.contains("android") || ua.contains("iphone") || ua.contains("ios")
});
