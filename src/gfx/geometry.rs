//! Pure generators for everything drawn besides the bodies themselves.
//!
//! Nothing here touches the GPU. Meshes come out as plain position/index
//! lists and are uploaded by the scene.

use std::f64::consts::{FRAC_PI_2, TAU};

use glam::{DMat4, DVec3};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use three_d::{CpuMesh, Indices, Positions};

use super::to_vec3;
use crate::sim::body::CelestialBody;

/// Half the width of an orbit ring.
pub const ORBIT_RING_HALF_WIDTH: f64 = 0.05;
pub const ORBIT_RING_SEGMENTS: u32 = 128;
pub const PLANETARY_RING_SEGMENTS: u32 = 64;

/// Number of steps along an arc. An arc has one more point than this.
pub const ARC_STEPS: usize = 32;
/// Angular extent of an arc, symmetric around angle zero.
pub const ARC_HALF_ANGLE: f64 = 0.2;
/// How far above the arc midpoint its label floats.
pub const ARC_LABEL_LIFT: f64 = 3.0;

/// Triangle soup ready to upload.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn transformed(mut self, matrix: DMat4) -> Self {
        for p in &mut self.positions {
            *p = matrix.transform_point3(*p);
        }
        self
    }

    pub fn to_cpu_mesh(&self) -> CpuMesh {
        CpuMesh {
            positions: Positions::F32(self.positions.iter().copied().map(to_vec3).collect()),
            indices: Indices::U32(self.indices.clone()),
            ..Default::default()
        }
    }
}

/// Indices of a triangle strip laid out as (top, bottom) vertex pairs.
fn strip_indices(segment_count: u32) -> Vec<u32> {
    let mut indices: Vec<u32> = Vec::with_capacity((segment_count * 6) as usize);
    for i in 0..segment_count {
        let base = i * 2;
        // triangle A: curr_top (base), curr_bot (base+1), next_top (base+2)
        indices.push(base);
        indices.push(base + 1);
        indices.push(base + 2);
        // triangle B: next_top (base+2), curr_bot (base+1), next_bot (base+3)
        indices.push(base + 2);
        indices.push(base + 1);
        indices.push(base + 3);
    }
    indices
}

/// A flat ring in the XY plane, centered on the origin.
///
/// The seam vertex pair is duplicated so the strip closes.
pub fn annulus(inner: f64, outer: f64, segments: u32) -> MeshData {
    let segments = segments.max(3);
    let positions = (0..=segments)
        .flat_map(|i| {
            let (sin, cos) = (TAU * i as f64 / segments as f64).sin_cos();
            [
                DVec3::new(inner * cos, inner * sin, 0.0),
                DVec3::new(outer * cos, outer * sin, 0.0),
            ]
        })
        .collect();

    MeshData {
        positions,
        indices: strip_indices(segments),
    }
}

/// The thin ring marking where a body orbits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitRing {
    pub inner: f64,
    pub outer: f64,
    pub segments: u32,
}

impl OrbitRing {
    /// Annulus lying in the orbital (XZ) plane.
    pub fn mesh(&self) -> MeshData {
        annulus(self.inner, self.outer, self.segments)
            .transformed(DMat4::from_rotation_x(-FRAC_PI_2))
    }
}

pub fn orbit_ring(distance: f64) -> OrbitRing {
    OrbitRing {
        inner: distance - ORBIT_RING_HALF_WIDTH,
        outer: distance + ORBIT_RING_HALF_WIDTH,
        segments: ORBIT_RING_SEGMENTS,
    }
}

/// The part of a body an arc needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArcEndpoint {
    /// Scene distance from the sun.
    pub orbit_distance: f64,
    /// Real distance from the sun, in millions of kilometres.
    pub physical_distance: f64,
}

impl From<&CelestialBody> for ArcEndpoint {
    fn from(body: &CelestialBody) -> Self {
        Self {
            orbit_distance: body.orbit_distance,
            physical_distance: body.physical_distance,
        }
    }
}

/// A short curve bridging two adjacent orbits, labelled with the real gap.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitArc {
    pub points: Vec<DVec3>,
    pub label_anchor: DVec3,
    /// Millions of kilometres.
    pub distance: f64,
}

/// Spirals from `p1`'s orbit out to `p2`'s between angles `-0.2` and `0.2`.
pub fn generate_arc(p1: ArcEndpoint, p2: ArcEndpoint) -> OrbitArc {
    let points: Vec<DVec3> = (0..=ARC_STEPS)
        .map(|i| {
            let t = i as f64 / ARC_STEPS as f64;
            let angle = -ARC_HALF_ANGLE + t * 2.0 * ARC_HALF_ANGLE;
            let radius = p1.orbit_distance + t * (p2.orbit_distance - p1.orbit_distance);
            let (sin, cos) = angle.sin_cos();
            DVec3::new(radius * cos, 0.0, radius * sin)
        })
        .collect();

    let label_anchor = points[points.len() / 2] + DVec3::Y * ARC_LABEL_LIFT;

    OrbitArc {
        points,
        label_anchor,
        distance: (p2.physical_distance - p1.physical_distance).abs(),
    }
}

/// One arc between each pair of neighbouring bodies.
pub fn arcs_between(bodies: &[CelestialBody]) -> Vec<OrbitArc> {
    bodies
        .windows(2)
        .map(|pair| generate_arc((&pair[0]).into(), (&pair[1]).into()))
        .collect()
}

/// A flat strip of the given width following `points` in the XZ plane.
pub fn ribbon(points: &[DVec3], width: f64) -> MeshData {
    if points.len() < 2 {
        return MeshData::default();
    }

    let half = width * 0.5;
    let last = points.len() - 1;
    let positions = points
        .iter()
        .enumerate()
        .flat_map(|(i, &p)| {
            let tangent = points[(i + 1).min(last)] - points[i.saturating_sub(1)];
            let side = tangent.cross(DVec3::Y).try_normalize().unwrap_or(DVec3::X) * half;
            [p + side, p - side]
        })
        .collect();

    MeshData {
        positions,
        indices: strip_indices(last as u32),
    }
}

/// A background star.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    pub position: DVec3,
    /// In `0..1`, spread evenly across the field.
    pub hue: f64,
    /// In `0.5..1`, multiplied by the theme's size factor.
    pub size: f64,
}

/// Stars scattered uniformly over directions, between `radius` and
/// `radius + depth` from the origin. The same seed always yields the same field.
pub fn star_field(count: usize, radius: f64, depth: f64, seed: u64) -> Vec<Star> {
    let mut rng = SmallRng::seed_from_u64(seed);

    (0..count)
        .map(|i| {
            let r = radius + depth * rng.random::<f64>();
            let phi = rng.random::<f64>() * TAU;
            let cos_theta = rng.random_range(-1.0..=1.0_f64);
            let sin_theta = (1.0 - cos_theta * cos_theta).sqrt();
            let (sin_phi, cos_phi) = phi.sin_cos();
            Star {
                position: r * DVec3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi),
                hue: i as f64 / count as f64,
                size: 0.5 + 0.5 * rng.random::<f64>(),
            }
        })
        .collect()
}

/// Formats a distance in millions of kilometres, e.g. `"1,427 million km"`.
pub fn format_distance(million_km: f64) -> String {
    format!("{} million km", format_grouped(million_km, 3))
}

/// Comma-grouped thousands, at most `decimals` fraction digits, trailing
/// zeros trimmed.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    let fixed = format!("{:.*}", decimals, value.abs());
    let (int, frac) = fixed.split_once('.').unwrap_or((&fixed, ""));
    let frac = frac.trim_end_matches('0');

    let mut grouped = String::with_capacity(fixed.len() + int.len() / 3 + 1);
    for (i, digit) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    if !frac.is_empty() {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let is_zero = int.bytes().all(|b| b == b'0') && frac.is_empty();
    if value.is_sign_negative() && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn endpoint(orbit_distance: f64, physical_distance: f64) -> ArcEndpoint {
        ArcEndpoint {
            orbit_distance,
            physical_distance,
        }
    }

    #[test]
    fn earth_orbit_ring() {
        let ring = orbit_ring(64.0);
        assert!((ring.inner - 63.95).abs() < 1e-12);
        assert!((ring.outer - 64.05).abs() < 1e-12);
        assert_eq!(ring.segments, 128);
    }

    #[test]
    fn orbit_ring_mesh_lies_flat() {
        let mesh = orbit_ring(64.0).mesh();
        assert_eq!(mesh.positions.len(), 2 * (128 + 1));
        assert_eq!(mesh.indices.len(), 128 * 6);
        for (i, p) in mesh.positions.iter().enumerate() {
            assert!(p.y.abs() < 1e-9);
            let expected = if i % 2 == 0 { 63.95 } else { 64.05 };
            assert!((p.length() - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn annulus_indices_in_bounds() {
        let mesh = annulus(10.0, 20.0, 64);
        let count = mesh.positions.len() as u32;
        assert!(mesh.indices.iter().all(|&i| i < count));
        assert!(mesh.positions.iter().all(|p| p.z == 0.0));
    }

    #[test]
    fn mercury_to_venus_arc() {
        let arc = generate_arc(endpoint(28.0, 57.9), endpoint(46.0, 108.2));
        assert!((arc.distance - 50.3).abs() < 0.05);
        assert_eq!(arc.points.len(), ARC_STEPS + 1);
        assert_eq!(format_distance(arc.distance), "50.3 million km");
    }

    #[test]
    fn arc_shape() {
        let arc = generate_arc(endpoint(28.0, 57.9), endpoint(46.0, 108.2));
        let first = arc.points[0];
        let last = arc.points[ARC_STEPS];

        assert!((first.length() - 28.0).abs() < 1e-9);
        assert!((last.length() - 46.0).abs() < 1e-9);
        assert!((first.z.atan2(first.x) + ARC_HALF_ANGLE).abs() < 1e-12);
        assert!((last.z.atan2(last.x) - ARC_HALF_ANGLE).abs() < 1e-12);
        assert!(arc.points.iter().all(|p| p.y == 0.0));
        assert_eq!(arc.label_anchor, arc.points[16] + DVec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn arc_is_deterministic() {
        let a = generate_arc(endpoint(100.0, 778.3), endpoint(118.0, 1427.0));
        let b = generate_arc(endpoint(100.0, 778.3), endpoint(118.0, 1427.0));
        let bits = |arc: &OrbitArc| -> Vec<[u64; 3]> {
            arc.points
                .iter()
                .map(|p| [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()])
                .collect()
        };
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(a.distance.to_bits(), b.distance.to_bits());
    }

    #[test]
    fn arc_distance_ignores_order() {
        let forward = generate_arc(endpoint(28.0, 57.9), endpoint(46.0, 108.2));
        let backward = generate_arc(endpoint(46.0, 108.2), endpoint(28.0, 57.9));
        assert_eq!(forward.distance, backward.distance);
    }

    #[test]
    fn ribbon_has_requested_width() {
        let points = [DVec3::new(10.0, 0.0, 0.0), DVec3::new(10.0, 0.0, 5.0)];
        let mesh = ribbon(&points, 0.4);
        assert_eq!(mesh.positions.len(), 4);
        assert_eq!(mesh.indices.len(), 6);
        assert!((mesh.positions[0].distance(mesh.positions[1]) - 0.4).abs() < 1e-12);
    }

    #[rstest]
    #[case(&[])]
    #[case(&[DVec3::ONE])]
    fn degenerate_ribbon_is_empty(#[case] points: &[DVec3]) {
        assert_eq!(ribbon(points, 1.0), MeshData::default());
    }

    #[test]
    fn star_field_in_shell() {
        let stars = star_field(500, 120.0, 80.0, 7);
        assert_eq!(stars.len(), 500);
        for star in &stars {
            let r = star.position.length();
            assert!((120.0 - 1e-9..=200.0 + 1e-9).contains(&r), "{r}");
            assert!((0.5..=1.0).contains(&star.size));
            assert!((0.0..1.0).contains(&star.hue));
        }
    }

    #[test]
    fn star_field_is_seeded() {
        assert_eq!(star_field(50, 120.0, 80.0, 1), star_field(50, 120.0, 80.0, 1));
        assert_ne!(star_field(50, 120.0, 80.0, 1), star_field(50, 120.0, 80.0, 2));
    }

    #[rstest]
    #[case(50.3, "50.3")]
    #[case(50.300000000000004, "50.3")]
    #[case(1427.0, "1,427")]
    #[case(1626.1, "1,626.1")]
    #[case(1234567.891, "1,234,567.891")]
    #[case(0.12345, "0.123")]
    #[case(0.0, "0")]
    #[case(-0.0001, "0")]
    #[case(-2500.5, "-2,500.5")]
    #[case(999.9999, "1,000")]
    fn grouped(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_grouped(value, 3), expected);
    }
}
