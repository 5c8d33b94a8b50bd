//! Per-dot instance data.
//!
//! Two parallel buffers indexed identically: one model matrix and one phase
//! offset per dot. Index `i` in both always refers to dot `i` of the field.

use foundation::math::{Mat4, Vec3, mat4_from_basis};
use scene::DotField;

/// Model matrix that places a +Z-facing disc at `position`, facing away from
/// the globe center.
pub fn dot_instance_matrix(position: Vec3) -> Mat4 {
    let n = position.normalize_or_zero();
    let x = Vec3::Y
        .cross(n)
        .try_normalize()
        .or_else(|| Vec3::new(0.0, 0.0, 1.0).cross(n).try_normalize())
        .unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let y = n.cross(x);
    mat4_from_basis(x, y, n, position)
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InstanceBuffers {
    transforms: Vec<Mat4>,
    offsets: Vec<f32>,
}

impl InstanceBuffers {
    pub fn from_dot_field(field: &DotField) -> Self {
        let mut transforms = Vec::with_capacity(field.len());
        let mut offsets = Vec::with_capacity(field.len());
        for dot in field.iter() {
            transforms.push(dot_instance_matrix(dot.position));
            offsets.push(dot.phase as f32);
        }
        tracing::debug!(instances = offsets.len(), "built dot instances");
        Self {
            transforms,
            offsets,
        }
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn transforms(&self) -> &[Mat4] {
        &self.transforms
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn transform_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    pub fn offset_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.offsets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::{LatLon, lat_lon_to_position, mat4_transform_dir, mat4_transform_point};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use scene::{DotFieldParams, MapSample, sample_dot_field};

    fn close(a: [f32; 3], b: Vec3) -> bool {
        let b = b.to_f32();
        (0..3).all(|i| (a[i] - b[i]).abs() < 1e-4)
    }

    #[test]
    fn disc_normal_points_outward() {
        for (lat, lon) in [(0.0, 0.0), (45.0, 120.0), (-70.0, -33.0), (89.0, 10.0)] {
            let p = lat_lon_to_position(LatLon::new(lat, lon), 24.0);
            let m = dot_instance_matrix(p);
            let z = mat4_transform_dir(m, [0.0, 0.0, 1.0]);
            assert!(close(z, p.normalize_or_zero()), "lat {lat} lon {lon}");

            let origin = mat4_transform_point(m, [0.0, 0.0, 0.0]);
            assert!(close([origin[0], origin[1], origin[2]], p));
        }
    }

    #[test]
    fn basis_is_orthonormal() {
        let p = lat_lon_to_position(LatLon::new(30.0, 60.0), 24.0);
        let m = dot_instance_matrix(p);
        let x = Vec3::new(m[0][0] as f64, m[0][1] as f64, m[0][2] as f64);
        let y = Vec3::new(m[1][0] as f64, m[1][1] as f64, m[1][2] as f64);
        let z = Vec3::new(m[2][0] as f64, m[2][1] as f64, m[2][2] as f64);
        assert!((x.length() - 1.0).abs() < 1e-5);
        assert!((y.length() - 1.0).abs() < 1e-5);
        assert!(x.dot(y).abs() < 1e-5 && x.dot(z).abs() < 1e-5);
        // Right-handed.
        assert!((x.cross(y) - z).length() < 1e-5);
    }

    #[test]
    fn degenerate_up_still_yields_a_basis() {
        let m = dot_instance_matrix(Vec3::new(0.0, 24.0, 0.0));
        let z = mat4_transform_dir(m, [0.0, 0.0, 1.0]);
        assert!(close(z, Vec3::Y));
        assert!(m.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn buffers_follow_dot_order() {
        let map = MapSample::filled(16, 8, [0, 0, 0, 255]);
        let field = sample_dot_field(
            &map,
            &DotFieldParams::default(),
            &mut StdRng::seed_from_u64(7),
        );
        let buffers = InstanceBuffers::from_dot_field(&field);

        assert_eq!(buffers.len(), field.len());
        assert_eq!(buffers.transforms().len(), buffers.offsets().len());
        assert_eq!(buffers.transform_bytes().len(), field.len() * 64);
        assert_eq!(buffers.offset_bytes().len(), field.len() * 4);
        for (i, dot) in field.iter().enumerate() {
            assert_eq!(buffers.offsets()[i], dot.phase as f32);
            assert_eq!(buffers.transforms()[i][3][0], dot.position.x as f32);
        }
    }

    #[test]
    fn empty_field_gives_empty_buffers() {
        let buffers = InstanceBuffers::from_dot_field(&DotField::empty());
        assert!(buffers.is_empty());
        assert!(buffers.transform_bytes().is_empty());
    }
}
