use std::collections::BTreeMap;

use glam::DVec3;

use super::{
    body::{CelestialBody, Sun},
    catalog::{CatalogEntry, SunEntry},
};

/// Index of a body within its system. Stable for the whole session.
pub type Id = usize;

/// Everything the animator reads from the control surface for one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameParams<'a> {
    /// Orbital speed per body name. A missing entry means the body holds still.
    pub speeds: &'a BTreeMap<String, f64>,
    pub paused: bool,
}

impl FrameParams<'_> {
    pub fn speed_of(&self, name: &str) -> Option<f64> {
        self.speeds.get(name).copied()
    }
}

/// Struct that represents the sun and its planets.
#[derive(Clone, Debug)]
pub struct SolarSystem {
    sun: Sun,
    /// Ordered by distance from the sun, like the catalog.
    bodies: Vec<CelestialBody>,
}

impl SolarSystem {
    pub fn new(sun: &SunEntry, catalog: &[CatalogEntry]) -> Self {
        Self {
            sun: Sun::from(sun),
            bodies: catalog.iter().map(CelestialBody::from).collect(),
        }
    }

    #[inline]
    pub fn sun(&self) -> &Sun {
        &self.sun
    }

    /// Gets all bodies, ordered by distance from the sun.
    #[inline]
    pub fn get_bodies(&self) -> &[CelestialBody] {
        &self.bodies
    }

    pub fn get_body(&self, id: Id) -> Option<&CelestialBody> {
        self.bodies.get(id)
    }

    pub fn get_body_index_with_name(&self, name: &str) -> Option<Id> {
        self.bodies.iter().position(|body| body.name == name)
    }

    /// Advances every body by `dt` seconds.
    pub fn tick(&mut self, dt: f64, params: &FrameParams<'_>) {
        self.sun.advance(params.paused, dt);
        for body in &mut self.bodies {
            let speed = params.speed_of(&body.name);
            body.advance(speed, params.paused, dt);
        }
    }

    /// Gets the current world position of a body.
    pub fn get_body_position(&self, id: Id) -> Option<DVec3> {
        self.bodies.get(id).map(|body| body.transform().position)
    }

    /// Gets the world position of every body, indexed by [`Id`].
    pub fn get_all_body_positions(&self) -> Vec<DVec3> {
        self.bodies
            .iter()
            .map(|body| body.transform().position)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::catalog::{CATALOG, SUN};

    fn speeds(value: f64) -> BTreeMap<String, f64> {
        CATALOG
            .iter()
            .map(|entry| (entry.name.to_string(), value))
            .collect()
    }

    fn angles(system: &SolarSystem) -> Vec<(f64, f64)> {
        system
            .get_bodies()
            .iter()
            .map(|b| (b.state.orbital_angle, b.state.axial_rotation))
            .collect()
    }

    #[test]
    fn paused_system_ignores_huge_speeds() {
        let mut system = SolarSystem::new(&SUN, CATALOG);
        let before = angles(&system);
        let sun_before = system.sun().state;
        let speeds = speeds(1e9);
        let params = FrameParams {
            speeds: &speeds,
            paused: true,
        };

        for _ in 0..10_000 {
            system.tick(0.25, &params);
        }

        assert_eq!(angles(&system), before);
        assert_eq!(system.sun().state, sun_before);
    }

    #[test]
    fn missing_speed_holds_still() {
        let mut system = SolarSystem::new(&SUN, CATALOG);
        let mut speeds = speeds(1.0);
        speeds.remove("earth");
        let params = FrameParams {
            speeds: &speeds,
            paused: false,
        };
        let earth = system.get_body_index_with_name("earth").unwrap();
        let mars = system.get_body_index_with_name("mars").unwrap();
        let earth_start = system.get_body_position(earth).unwrap();

        system.tick(0.5, &params);

        assert_eq!(system.get_body_position(earth), Some(earth_start));
        assert_eq!(system.get_bodies()[mars].state.orbital_angle, 0.5);
    }

    #[test]
    fn positions_follow_orbit_distance() {
        let mut system = SolarSystem::new(&SUN, CATALOG);
        let speeds = speeds(2.0);
        system.tick(
            1.234,
            &FrameParams {
                speeds: &speeds,
                paused: false,
            },
        );

        let positions = system.get_all_body_positions();
        assert_eq!(positions.len(), CATALOG.len());
        for (position, entry) in positions.iter().zip(CATALOG) {
            assert!((position.length() - entry.orbit_distance).abs() < 1e-9);
        }
    }

    #[test]
    fn lookup() {
        let system = SolarSystem::new(&SUN, CATALOG);
        assert_eq!(system.get_body_index_with_name("mercury"), Some(0));
        assert_eq!(system.get_body_index_with_name("sun"), None);
        assert!(system.get_body(CATALOG.len()).is_none());
        assert_eq!(
            system.get_body_position(0),
            Some(DVec3::new(CATALOG[0].orbit_distance, 0.0, 0.0))
        );
    }
}
