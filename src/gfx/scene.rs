use std::sync::LazyLock;

use glam::{DMat4, DQuat, DVec3};
use three_d::{
    Blend, ColorMaterial, Context, CpuMaterial, CpuMesh, Cull, Gm, InstancedMesh, Instances, Mat4,
    Mesh, Object, PhysicalMaterial, RenderStates, Srgba, WriteMask,
};

use super::{
    geometry::{self, OrbitArc, PLANETARY_RING_SEGMENTS, Star},
    to_mat4,
};
use crate::{
    sim::{body::CelestialBody, system::SolarSystem},
    theme::Theme,
};

pub const LOD_LEVEL_COUNT: usize = 8;

/// Level of detail subdivisions for the celestial object(s).
///
/// Smaller indices mean smaller distance which means higher detail.
pub const LOD_SUBDIVS: [u32; LOD_LEVEL_COUNT] = [32, 24, 16, 12, 9, 7, 5, 3];

/// Level of detail cutoffs, in radians.
///
/// If the radial size of a sphere `theta` >= a cutoff `c_i`,
/// then subdivision index `i` should be used. If theta is less
/// than all the cutoffs, then the sphere should not be rendered at all.
pub const LOD_CUTOFFS: [f64; LOD_LEVEL_COUNT] =
    [0.5, 0.25, 0.125, 0.062, 0.031, 0.015, 0.007, 0.002];

const fn get_lod_type(radial_size: f64) -> Option<usize> {
    let mut i = 0;
    while i < LOD_LEVEL_COUNT {
        if radial_size >= LOD_CUTOFFS[i] {
            return Some(i);
        }
        i += 1;
    }
    None
}

const _: () = {
    assert!(
        LOD_SUBDIVS.len() == LOD_CUTOFFS.len(),
        "LOD_SUBDIVS and LOD_CUTOFFS should have the same length"
    )
};

static SPHERE_MESHES: LazyLock<[CpuMesh; LOD_LEVEL_COUNT]> =
    LazyLock::new(|| LOD_SUBDIVS.map(CpuMesh::sphere));

const SUN_SUBDIVS: u32 = 48;
const STAR_SUBDIVS: u32 = 3;

pub const STAR_COUNT: usize = 500;
pub const STAR_RADIUS: f64 = 120.0;
pub const STAR_DEPTH: f64 = 80.0;
const STAR_SEED: u64 = 0x5EED_0F_57A25;
/// Radius of a star sphere before the theme's size factor.
const STAR_BASE_RADIUS: f64 = 0.06;

const ORBIT_RING_COLOR: Srgba = Srgba::new(0xaa, 0xaa, 0xaa, 46);
const ARC_COLOR: Srgba = Srgba::new_opaque(0x7f, 0x5a, 0xf0);
const ARC_WIDTH: f64 = 0.3;
const PLANETARY_RING_OPACITY: u8 = 200;

fn get_radial_size(radius: f64, distance: f64) -> f64 {
    2.0 * radius / distance
}

fn get_matrix(position: DVec3, rotation_y: f64, radius: f64) -> Mat4 {
    to_mat4(DMat4::from_scale_rotation_translation(
        DVec3::splat(radius),
        DQuat::from_rotation_y(rotation_y),
        position,
    ))
}

fn double_sided() -> RenderStates {
    RenderStates {
        cull: Cull::None,
        ..Default::default()
    }
}

fn translucent() -> RenderStates {
    RenderStates {
        cull: Cull::None,
        blend: Blend::TRANSPARENCY,
        write_mask: WriteMask::COLOR,
        ..Default::default()
    }
}

/// Everything drawn in the 3D view.
///
/// Orbit rings and arcs never move and are built once; bodies, the sun and
/// planetary rings are repositioned every frame.
pub(crate) struct Scene {
    sun: Gm<Mesh, ColorMaterial>,
    bodies: [Gm<InstancedMesh, PhysicalMaterial>; LOD_LEVEL_COUNT],
    /// Indexed like the bodies that own them.
    planetary_rings: Vec<Option<Gm<Mesh, ColorMaterial>>>,
    orbit_rings: Vec<Gm<Mesh, ColorMaterial>>,
    arc_ribbons: Vec<Gm<Mesh, ColorMaterial>>,
    arcs: Vec<OrbitArc>,
    stars: Gm<InstancedMesh, ColorMaterial>,
    star_field: Vec<Star>,
    star_theme: Theme,
}

impl Scene {
    pub(crate) fn new(context: &Context, system: &SolarSystem, theme: Theme) -> Self {
        let sun_source = system.sun();
        let sun = Gm::new(
            Mesh::new(context, &CpuMesh::sphere(SUN_SUBDIVS)),
            ColorMaterial {
                color: sun_source.color,
                ..Default::default()
            },
        );

        let material = PhysicalMaterial::new_opaque(context, &CpuMaterial::default());
        let bodies = core::array::from_fn(|index| {
            Gm::new(
                InstancedMesh::new(context, &empty_instances(), &SPHERE_MESHES[index]),
                material.clone(),
            )
        });

        let planetary_rings = system
            .get_bodies()
            .iter()
            .map(|body| Self::new_planetary_ring(context, body))
            .collect();

        let orbit_rings = system
            .get_bodies()
            .iter()
            .map(|body| {
                let mesh = geometry::orbit_ring(body.orbit_distance).mesh();
                Gm::new(
                    Mesh::new(context, &mesh.to_cpu_mesh()),
                    ColorMaterial {
                        color: ORBIT_RING_COLOR,
                        texture: None,
                        render_states: translucent(),
                        is_transparent: true,
                    },
                )
            })
            .collect();

        let arcs = geometry::arcs_between(system.get_bodies());
        let arc_ribbons = arcs
            .iter()
            .map(|arc| {
                let mesh = geometry::ribbon(&arc.points, ARC_WIDTH);
                Gm::new(
                    Mesh::new(context, &mesh.to_cpu_mesh()),
                    ColorMaterial {
                        color: ARC_COLOR,
                        texture: None,
                        render_states: double_sided(),
                        is_transparent: false,
                    },
                )
            })
            .collect();

        let star_field = geometry::star_field(STAR_COUNT, STAR_RADIUS, STAR_DEPTH, STAR_SEED);
        let stars = Gm::new(
            InstancedMesh::new(
                context,
                &star_instances(&star_field, theme),
                &CpuMesh::sphere(STAR_SUBDIVS),
            ),
            ColorMaterial::default(),
        );

        let mut scene = Self {
            sun,
            bodies,
            planetary_rings,
            orbit_rings,
            arc_ribbons,
            arcs,
            stars,
            star_field,
            star_theme: theme,
        };
        scene.update(system, DVec3::ZERO, theme);
        scene
    }

    fn new_planetary_ring(context: &Context, body: &CelestialBody) -> Option<Gm<Mesh, ColorMaterial>> {
        let ring = body.ring?;
        let mesh = geometry::annulus(ring.inner, ring.outer, PLANETARY_RING_SEGMENTS);
        let color = Srgba {
            a: PLANETARY_RING_OPACITY,
            ..body.color
        };
        Some(Gm::new(
            Mesh::new(context, &mesh.to_cpu_mesh()),
            ColorMaterial {
                color,
                texture: None,
                render_states: translucent(),
                is_transparent: true,
            },
        ))
    }

    /// Moves everything animated to its present place.
    pub(crate) fn update(&mut self, system: &SolarSystem, camera_position: DVec3, theme: Theme) {
        let sun = system.sun();
        self.sun.set_transformation(get_matrix(
            DVec3::ZERO,
            sun.state.axial_rotation,
            sun.radius,
        ));

        let mut instances_arr: [Instances; LOD_LEVEL_COUNT] =
            core::array::from_fn(|_| empty_instances());

        for (body, ring) in system.get_bodies().iter().zip(&mut self.planetary_rings) {
            let transform = body.transform();
            add_body_instance(body, transform.position, transform.rotation_y, camera_position, &mut instances_arr);

            if let (Some(gm), Some(spec)) = (ring, body.ring) {
                let matrix = DMat4::from_translation(transform.position)
                    * DMat4::from_rotation_x(spec.tilt);
                gm.set_transformation(to_mat4(matrix));
            }
        }

        for (gm, instances) in self.bodies.iter_mut().zip(&instances_arr) {
            gm.geometry.set_instances(instances);
        }

        if theme != self.star_theme {
            self.stars
                .geometry
                .set_instances(&star_instances(&self.star_field, theme));
            self.star_theme = theme;
        }
    }

    /// The arcs between neighbouring orbits, for labelling.
    #[inline]
    pub(crate) fn arcs(&self) -> &[OrbitArc] {
        &self.arcs
    }

    /// Opaque objects first, then translucent ones.
    pub(crate) fn objects(&self) -> impl Iterator<Item = &dyn Object> {
        std::iter::once(&self.stars as &dyn Object)
            .chain(std::iter::once(&self.sun as &dyn Object))
            .chain(self.bodies.iter().map(|gm| gm as &dyn Object))
            .chain(self.arc_ribbons.iter().map(|gm| gm as &dyn Object))
            .chain(self.orbit_rings.iter().map(|gm| gm as &dyn Object))
            .chain(self.planetary_rings.iter().flatten().map(|gm| gm as &dyn Object))
    }
}

fn empty_instances() -> Instances {
    Instances {
        transformations: Vec::new(),
        colors: Some(Vec::new()),
        texture_transformations: None,
    }
}

fn add_body_instance(
    body: &CelestialBody,
    position: DVec3,
    rotation_y: f64,
    camera_position: DVec3,
    instances_arr: &mut [Instances; LOD_LEVEL_COUNT],
) {
    let distance = position.distance(camera_position);
    let size = get_radial_size(body.radius, distance);
    let lod_group = match get_lod_type(size) {
        Some(l) => l,
        None => return,
    };
    let instances = &mut instances_arr[lod_group];
    instances
        .transformations
        .push(get_matrix(position, rotation_y, body.radius));

    if let Some(colors) = &mut instances.colors {
        colors.push(body.color);
    }
}

fn star_instances(stars: &[Star], theme: Theme) -> Instances {
    let factor = theme.star_style().factor;
    Instances {
        transformations: stars
            .iter()
            .map(|star| get_matrix(star.position, 0.0, STAR_BASE_RADIUS * star.size * factor))
            .collect(),
        colors: Some(stars.iter().map(|star| theme.star_color(star.hue)).collect()),
        texture_transformations: None,
    }
}
