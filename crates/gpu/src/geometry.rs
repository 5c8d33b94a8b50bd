//! CPU-side meshes: the base sphere and the dot disc.

use std::f32::consts::{PI, TAU};

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

impl Mesh {
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Largest segment count that keeps a sphere within 16-bit indices.
const MAX_SPHERE_SEGMENTS: u32 = 254;

/// UV sphere centered on the origin.
pub fn sphere_mesh(radius: f32, lat_segments: u32, lon_segments: u32) -> Mesh {
    let lat_segments = lat_segments.clamp(3, MAX_SPHERE_SEGMENTS);
    let lon_segments = lon_segments.clamp(3, MAX_SPHERE_SEGMENTS);

    let mut vertices = Vec::with_capacity(((lat_segments + 1) * (lon_segments + 1)) as usize);
    for lat in 0..=lat_segments {
        let theta = lat as f32 / lat_segments as f32 * PI;
        let (sin_t, cos_t) = theta.sin_cos();

        for lon in 0..=lon_segments {
            let phi = lon as f32 / lon_segments as f32 * TAU;
            let (sin_p, cos_p) = phi.sin_cos();

            let n = [sin_t * cos_p, cos_t, sin_t * sin_p];
            vertices.push(MeshVertex {
                position: [n[0] * radius, n[1] * radius, n[2] * radius],
                normal: n,
            });
        }
    }

    let stride = lon_segments + 1;
    let mut indices = Vec::with_capacity((lat_segments * lon_segments * 6) as usize);
    for lat in 0..lat_segments {
        for lon in 0..lon_segments {
            let i0 = lat * stride + lon;
            let i1 = i0 + 1;
            let i2 = i0 + stride;
            let i3 = i2 + 1;
            // Counter-clockwise seen from outside.
            indices.extend([i0, i1, i2, i1, i3, i2].map(|i| i as u16));
        }
    }

    Mesh { vertices, indices }
}

/// Flat triangle fan in the XY plane facing +Z: a center vertex plus
/// `segments + 1` rim vertices (first and last coincide).
pub fn disc_mesh(radius: f32, segments: u32) -> Mesh {
    let segments = segments.max(3);
    let normal = [0.0, 0.0, 1.0];

    let mut vertices = Vec::with_capacity(segments as usize + 2);
    vertices.push(MeshVertex {
        position: [0.0, 0.0, 0.0],
        normal,
    });
    for s in 0..=segments {
        let a = s as f32 / segments as f32 * TAU;
        vertices.push(MeshVertex {
            position: [radius * a.cos(), radius * a.sin(), 0.0],
            normal,
        });
    }

    let mut indices = Vec::with_capacity(segments as usize * 3);
    for i in 1..=segments {
        indices.extend([i as u16, (i + 1) as u16, 0]);
    }

    Mesh { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_vertices_lie_on_radius() {
        let mesh = sphere_mesh(22.0, 50, 50);
        assert_eq!(mesh.vertices.len(), 51 * 51);
        assert_eq!(mesh.indices.len(), 50 * 50 * 6);
        for v in &mesh.vertices {
            let [x, y, z] = v.position;
            let r = (x * x + y * y + z * z).sqrt();
            assert!((r - 22.0).abs() < 1e-3);
        }
        let max = *mesh.indices.iter().max().expect("indices");
        assert!((max as usize) < mesh.vertices.len());
    }

    #[test]
    fn sphere_triangles_face_outward() {
        let mesh = sphere_mesh(1.0, 12, 16);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| mesh.vertices[tri[k] as usize].position);
            let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                u[1] * v[2] - u[2] * v[1],
                u[2] * v[0] - u[0] * v[2],
                u[0] * v[1] - u[1] * v[0],
            ];
            let area2 = n[0] * n[0] + n[1] * n[1] + n[2] * n[2];
            if area2 < 1e-10 {
                // Collapsed triangles at the poles.
                continue;
            }
            let centroid = [a[0] + b[0] + c[0], a[1] + b[1] + c[1], a[2] + b[2] + c[2]];
            let outward = n[0] * centroid[0] + n[1] * centroid[1] + n[2] * centroid[2];
            assert!(outward > 0.0, "triangle {tri:?} faces inward");
        }
    }

    #[test]
    fn sphere_segments_fit_u16() {
        let mesh = sphere_mesh(1.0, 10_000, 10_000);
        assert!(mesh.vertices.len() <= u16::MAX as usize + 1);
    }

    #[test]
    fn disc_is_a_fan_facing_z() {
        let mesh = disc_mesh(0.12, 5);
        assert_eq!(mesh.vertices.len(), 7);
        assert_eq!(mesh.index_count(), 15);
        assert_eq!(&mesh.indices[..3], &[1, 2, 0]);
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
        for v in &mesh.vertices[1..] {
            let [x, y, _] = v.position;
            assert!(((x * x + y * y).sqrt() - 0.12).abs() < 1e-6);
        }
    }

    #[test]
    fn disc_triangles_wind_counter_clockwise_from_front() {
        let mesh = disc_mesh(1.0, 6);
        for tri in mesh.indices.chunks_exact(3) {
            let a = mesh.vertices[tri[0] as usize].position;
            let b = mesh.vertices[tri[1] as usize].position;
            let c = mesh.vertices[tri[2] as usize].position;
            let cross_z = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
            assert!(cross_z > 0.0);
        }
    }
}
