use glam::{DMat4, DVec2, DVec3, DVec4};

use crate::sim::system::Id;

/// A body as seen by the pointer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickSphere {
    pub id: Id,
    pub center: DVec3,
    pub radius: f64,
}

/// Distance along the ray to the nearest intersection in front of the origin.
///
/// `direction` need not be normalized; the result is in units of its length.
pub fn ray_sphere(origin: DVec3, direction: DVec3, center: DVec3, radius: f64) -> Option<f64> {
    let a = direction.length_squared();
    if a == 0.0 || !a.is_finite() {
        return None;
    }
    let oc = origin - center;
    let half_b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let root = discriminant.sqrt();
    [(-half_b - root) / a, (-half_b + root) / a]
        .into_iter()
        .find(|&t| t > 0.0)
}

/// The body whose sphere the ray hits first.
pub fn pick_body(
    origin: DVec3,
    direction: DVec3,
    spheres: impl IntoIterator<Item = PickSphere>,
) -> Option<Id> {
    spheres
        .into_iter()
        .filter_map(|s| ray_sphere(origin, direction, s.center, s.radius).map(|t| (t, s.id)))
        .min_by(|(a, _), (b, _)| a.total_cmp(b))
        .map(|(_, id)| id)
}

/// Projects a world point to a position within a `width` x `height` area,
/// origin at the top left. Points behind the camera yield `None`.
pub fn project_to_screen(
    view_projection: DMat4,
    world: DVec3,
    width: f64,
    height: f64,
) -> Option<DVec2> {
    let clip = view_projection * DVec4::new(world.x, world.y, world.z, 1.0);
    if clip.w <= 0.0 {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    if !ndc.is_finite() {
        return None;
    }

    Some(DVec2::new(
        (ndc.x * 0.5 + 0.5) * width,
        (-ndc.y * 0.5 + 0.5) * height,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sphere(id: Id, x: f64, radius: f64) -> PickSphere {
        PickSphere {
            id,
            center: DVec3::new(x, 0.0, 0.0),
            radius,
        }
    }

    #[rstest]
    #[case(DVec3::new(-10.0, 0.0, 0.0), DVec3::X, Some(9.0))]
    #[case(DVec3::new(-10.0, 0.0, 0.0), DVec3::X * 2.0, Some(4.5))]
    #[case(DVec3::ZERO, DVec3::X, Some(1.0))]
    #[case(DVec3::new(-10.0, 0.0, 0.0), -DVec3::X, None)]
    #[case(DVec3::new(-10.0, 5.0, 0.0), DVec3::X, None)]
    #[case(DVec3::new(-10.0, 0.0, 0.0), DVec3::ZERO, None)]
    fn ray_hits(#[case] origin: DVec3, #[case] direction: DVec3, #[case] expected: Option<f64>) {
        let t = ray_sphere(origin, direction, DVec3::ZERO, 1.0);
        match (t, expected) {
            (Some(t), Some(e)) => assert!((t - e).abs() < 1e-12, "{t} != {e}"),
            (t, e) => assert_eq!(t, e),
        }
    }

    #[test]
    fn nearest_body_wins() {
        let spheres = [sphere(0, 30.0, 3.0), sphere(1, 20.0, 3.0), sphere(2, 40.0, 10.0)];
        assert_eq!(pick_body(DVec3::ZERO, DVec3::X, spheres), Some(1));
        assert_eq!(pick_body(DVec3::new(50.0, 0.0, 0.0), -DVec3::X, spheres), Some(2));
        assert_eq!(pick_body(DVec3::ZERO, DVec3::Y, spheres), None);
    }

    #[test]
    fn projection_center_and_behind() {
        let view = DMat4::look_at_rh(DVec3::new(0.0, 0.0, 10.0), DVec3::ZERO, DVec3::Y);
        let projection = DMat4::perspective_rh_gl(1.0, 2.0, 0.1, 100.0);
        let vp = projection * view;

        let center = project_to_screen(vp, DVec3::ZERO, 800.0, 400.0).unwrap();
        assert!(center.distance(DVec2::new(400.0, 200.0)) < 1e-9);

        let above = project_to_screen(vp, DVec3::new(0.0, 1.0, 0.0), 800.0, 400.0).unwrap();
        assert!(above.y < 200.0);

        assert_eq!(project_to_screen(vp, DVec3::new(0.0, 0.0, 20.0), 800.0, 400.0), None);
    }
}
