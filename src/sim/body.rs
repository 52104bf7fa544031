use three_d::Srgba;

use super::{
    animator::{self, BodyTransform, FIXED_AXIAL_RATE, OrbitState},
    catalog::{CatalogEntry, RingSpec, SunEntry},
};

/// A struct representing a planet orbiting the sun.
#[derive(Clone, Debug, PartialEq)]
pub struct CelestialBody {
    /// The name of the body. Unique within a system.
    pub name: String,

    /// The render size of the body.
    pub radius: f64,

    /// The radius of the circular orbit path.
    pub orbit_distance: f64,

    /// The mean distance from the sun, in astronomical units.
    pub au: f64,

    /// The mean distance from the sun, in millions of kilometres.
    pub physical_distance: f64,

    /// The color of the body.
    pub color: Srgba,

    /// The ring around the body, if it has one.
    pub ring: Option<RingSpec>,

    /// Orbital angle and axial rotation, advanced every unpaused frame.
    pub state: OrbitState,
}

impl CelestialBody {
    #[inline]
    pub fn has_ring(&self) -> bool {
        self.ring.is_some()
    }

    pub fn transform(&self) -> BodyTransform {
        animator::transform(self.orbit_distance, self.state)
    }

    pub(crate) fn advance(&mut self, speed: Option<f64>, paused: bool, dt: f64) {
        self.state = animator::advance(self.state, speed, FIXED_AXIAL_RATE, paused, dt);
    }
}

impl From<&CatalogEntry> for CelestialBody {
    fn from(entry: &CatalogEntry) -> Self {
        let [r, g, b] = entry.color;
        Self {
            name: entry.name.to_string(),
            radius: entry.radius,
            orbit_distance: entry.orbit_distance,
            au: entry.au,
            physical_distance: entry.physical_distance,
            color: Srgba::new_opaque(r, g, b),
            ring: entry.ring,
            state: OrbitState::default(),
        }
    }
}

/// The star at the origin. It only spins.
#[derive(Clone, Debug, PartialEq)]
pub struct Sun {
    pub radius: f64,
    pub axial_rate: f64,
    pub color: Srgba,
    pub state: OrbitState,
}

impl Sun {
    pub(crate) fn advance(&mut self, paused: bool, dt: f64) {
        self.state = animator::advance(self.state, None, self.axial_rate, paused, dt);
    }
}

impl From<&SunEntry> for Sun {
    fn from(entry: &SunEntry) -> Self {
        let [r, g, b] = entry.color;
        Self {
            radius: entry.radius,
            axial_rate: entry.axial_rate,
            color: Srgba::new_opaque(r, g, b),
            state: OrbitState::default(),
        }
    }
}
