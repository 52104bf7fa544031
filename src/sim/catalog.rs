//! The fixed table of bodies the system is built from.
//!
//! The entries live in `catalog.toml` and are turned into Rust constants by
//! `build.rs`, so a malformed catalog fails the build instead of the app.

/// A ring around a body, e.g. Saturn's.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingSpec {
    /// Inner radius, in scene units.
    pub inner: f64,
    /// Outer radius, in scene units.
    pub outer: f64,
    /// Rotation about the body's X axis, in radians.
    pub tilt: f64,
}

/// One orbiting body as authored in the catalog.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CatalogEntry {
    /// Unique, lowercase identifier.
    pub name: &'static str,
    /// Render size.
    pub radius: f64,
    /// Radius of the circular orbit path.
    pub orbit_distance: f64,
    /// Mean distance from the sun in astronomical units.
    pub au: f64,
    /// Mean distance from the sun in millions of kilometres.
    pub physical_distance: f64,
    /// Orbital speed before the user touches the sliders, in radians per second.
    pub default_speed: f64,
    pub color: [u8; 3],
    pub ring: Option<RingSpec>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunEntry {
    pub radius: f64,
    /// Spin rate, in radians per second.
    pub axial_rate: f64,
    pub color: [u8; 3],
}

include!(concat!(env!("OUT_DIR"), "/catalog.rs"));

pub fn find(name: &str) -> Option<&'static CatalogEntry> {
    CATALOG.iter().find(|entry| entry.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let names: HashSet<&str> = CATALOG.iter().map(|e| e.name).collect();
        assert_eq!(names.len(), CATALOG.len());
    }

    #[test]
    fn ordered_by_distance() {
        for pair in CATALOG.windows(2) {
            assert!(pair[0].orbit_distance < pair[1].orbit_distance);
            assert!(pair[0].physical_distance < pair[1].physical_distance);
        }
    }

    #[test]
    fn orbits_clear_the_sun() {
        let innermost = &CATALOG[0];
        assert!(innermost.orbit_distance - innermost.radius > SUN.radius);
    }

    #[test]
    fn ringed_bodies() {
        let ringed: Vec<&str> = CATALOG
            .iter()
            .filter(|e| e.ring.is_some())
            .map(|e| e.name)
            .collect();
        assert_eq!(ringed, ["saturn", "uranus"]);

        let saturn = find("saturn").and_then(|e| e.ring);
        assert_eq!(
            saturn,
            Some(RingSpec {
                inner: 10.0,
                outer: 20.0,
                tilt: -0.5
            })
        );
    }

    #[test]
    fn find_by_name() {
        assert_eq!(find("earth").map(|e| e.orbit_distance), Some(64.0));
        assert_eq!(find("pluto"), None);
    }
}
