//! Column-major 4x4 matrices in the layout WGSL expects (`m[col][row]`).

use super::Vec3;

pub type Mat4 = [[f32; 4]; 4];

pub const MAT4_IDENTITY: Mat4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

pub fn mat4_mul(a: Mat4, b: Mat4) -> Mat4 {
    // c = a * b
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective projection with depth range [0, 1].
pub fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    // Column-major form of:
    // [ m00,  0,   0,   0 ]
    // [  0,  m11,  0,   0 ]
    // [  0,   0,  m22, m23 ]
    // [  0,   0,  -1,   0 ]
    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalize_or_zero();
    let s = f.cross(up).normalize_or_zero();
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

/// Affine transform from an orthonormal basis and a translation.
pub fn mat4_from_basis(x: Vec3, y: Vec3, z: Vec3, translation: Vec3) -> Mat4 {
    [
        [x.x as f32, x.y as f32, x.z as f32, 0.0],
        [y.x as f32, y.y as f32, y.z as f32, 0.0],
        [z.x as f32, z.y as f32, z.z as f32, 0.0],
        [
            translation.x as f32,
            translation.y as f32,
            translation.z as f32,
            1.0,
        ],
    ]
}

pub fn mat4_transform_point(m: Mat4, p: [f32; 3]) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    for (row, o) in out.iter_mut().enumerate() {
        *o = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    out
}

pub fn mat4_transform_dir(m: Mat4, d: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 3];
    for (row, o) in out.iter_mut().enumerate() {
        *o = m[0][row] * d[0] + m[1][row] * d[1] + m[2][row] * d[2];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let m = mat4_perspective_rh_z0(1.0, 1.5, 1.0, 100.0);
        assert_eq!(mat4_mul(MAT4_IDENTITY, m), m);
        assert_eq!(mat4_mul(m, MAT4_IDENTITY), m);
    }

    #[test]
    fn look_at_moves_eye_to_origin() {
        let eye = Vec3::new(0.0, 0.0, 100.0);
        let view = mat4_look_at_rh(eye, Vec3::ZERO, Vec3::Y);
        let p = mat4_transform_point(view, [0.0, 0.0, 100.0]);
        assert!(p[0].abs() < 1e-4 && p[1].abs() < 1e-4 && p[2].abs() < 1e-4);

        // The target sits straight ahead, down -Z in view space.
        let t = mat4_transform_point(view, [0.0, 0.0, 0.0]);
        assert!((t[2] + 100.0).abs() < 1e-4);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let proj = mat4_perspective_rh_z0(30f64.to_radians(), 1.0, 1.0, 1000.0);
        let near = mat4_transform_point(proj, [0.0, 0.0, -1.0]);
        let far = mat4_transform_point(proj, [0.0, 0.0, -1000.0]);
        assert!((near[2] / near[3]).abs() < 1e-5);
        assert!((far[2] / far[3] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn basis_transform_rotates_and_translates() {
        let m = mat4_from_basis(
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(5.0, 0.0, 0.0),
        );
        assert_eq!(mat4_transform_point(m, [1.0, 0.0, 0.0]), [5.0, 1.0, 0.0, 1.0]);
        assert_eq!(mat4_transform_dir(m, [0.0, 1.0, 0.0]), [-1.0, 0.0, 0.0]);
    }
}
