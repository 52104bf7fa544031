use glam::{DMat4, DVec3};
use three_d::{Mat4, Vec3, Vec4};

pub(crate) mod geometry;
pub(crate) mod picking;
pub(crate) mod scene;

pub(crate) fn to_vec3(v: DVec3) -> Vec3 {
    Vec3::new(v.x as f32, v.y as f32, v.z as f32)
}

pub(crate) fn to_dvec3(v: Vec3) -> DVec3 {
    DVec3::new(v.x as f64, v.y as f64, v.z as f64)
}

pub(crate) fn to_mat4(m: DMat4) -> Mat4 {
    let [x, y, z, w] = m.to_cols_array_2d().map(|c| c.map(|v| v as f32));
    Mat4 {
        x: Vec4::new(x[0], x[1], x[2], x[3]),
        y: Vec4::new(y[0], y[1], y[2], y[3]),
        z: Vec4::new(z[0], z[1], z[2], z[3]),
        w: Vec4::new(w[0], w[1], w[2], w[3]),
    }
}

pub(crate) fn to_dmat4(m: Mat4) -> DMat4 {
    let col = |c: Vec4| [c.x as f64, c.y as f64, c.z as f64, c.w as f64];
    DMat4::from_cols_array_2d(&[col(m.x), col(m.y), col(m.z), col(m.w)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_conversion_keeps_columns() {
        let m = DMat4::from_translation(DVec3::new(1.0, 2.0, 3.0))
            * DMat4::from_rotation_x(0.5)
            * DMat4::from_scale(DVec3::splat(4.0));
        let back = to_dmat4(to_mat4(m));
        assert!(back.abs_diff_eq(m, 1e-6));

        let converted = to_mat4(m);
        assert_eq!(converted.w, Vec4::new(1.0, 2.0, 3.0, 1.0));
    }
}
