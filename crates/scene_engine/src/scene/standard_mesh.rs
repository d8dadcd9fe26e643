//! Builders for common triangle meshes

use crate::foundation::math::{constants, Point3, Vec3};
use crate::scene::geometry::{
    IndexBuffer, PrimitiveType, VertexAttributes, VertexBuffer, VertexFormat,
};
use crate::scene::visual::Visual;

/// Factory for simple closed meshes with positions and normals
pub struct StandardMesh;

impl StandardMesh {
    /// Axis-aligned box centered at the origin with the given half-extents
    pub fn box_mesh(half_extents: Vec3) -> Visual {
        let format = VertexFormat::new(VertexAttributes::NORMAL);
        let mut vertices = VertexBuffer::new(format, 8);
        for i in 0..8 {
            let sign = |bit: usize| if i & bit == 0 { -1.0 } else { 1.0 };
            let corner = Vec3::new(
                sign(1) * half_extents.x,
                sign(2) * half_extents.y,
                sign(4) * half_extents.z,
            );
            vertices.set_position(i, Point3::from(corner));
            let normal = corner.normalize();
            vertices.set_attribute(i, VertexAttributes::NORMAL, &[normal.x, normal.y, normal.z]);
        }

        // Corner index bits: x = 1, y = 2, z = 4. Outward counter-clockwise winding.
        let indices = vec![
            0, 2, 3, 0, 3, 1, // -z
            4, 5, 7, 4, 7, 6, // +z
            0, 4, 6, 0, 6, 2, // -x
            1, 3, 7, 1, 7, 5, // +x
            0, 1, 5, 0, 5, 4, // -y
            2, 6, 7, 2, 7, 3, // +y
        ];
        Visual::new(PrimitiveType::TriMesh, vertices, IndexBuffer::new(indices))
    }

    /// UV sphere of `radius` with `z_samples` latitude bands and
    /// `radial_samples` longitude segments
    ///
    /// # Panics
    /// If `z_samples < 2` or `radial_samples < 3`.
    pub fn sphere(z_samples: usize, radial_samples: usize, radius: f32) -> Visual {
        assert!(z_samples >= 2 && radial_samples >= 3, "sphere needs at least 2x3 samples");

        let format = VertexFormat::new(VertexAttributes::NORMAL);
        let vertex_count = (z_samples + 1) * radial_samples;
        let mut vertices = VertexBuffer::new(format, vertex_count);
        for ring in 0..=z_samples {
            let theta = constants::PI * ring as f32 / z_samples as f32;
            for segment in 0..radial_samples {
                let phi = constants::TAU * segment as f32 / radial_samples as f32;
                let normal =
                    Vec3::new(theta.sin() * phi.cos(), theta.sin() * phi.sin(), theta.cos());
                let index = ring * radial_samples + segment;
                vertices.set_position(index, Point3::from(normal * radius));
                vertices.set_attribute(
                    index,
                    VertexAttributes::NORMAL,
                    &[normal.x, normal.y, normal.z],
                );
            }
        }

        let mut indices = Vec::with_capacity(z_samples * radial_samples * 6);
        for ring in 0..z_samples {
            for segment in 0..radial_samples {
                let next = (segment + 1) % radial_samples;
                let a = (ring * radial_samples + segment) as u32;
                let b = (ring * radial_samples + next) as u32;
                let c = ((ring + 1) * radial_samples + segment) as u32;
                let d = ((ring + 1) * radial_samples + next) as u32;
                indices.extend_from_slice(&[a, c, b, b, c, d]);
            }
        }
        Visual::new(PrimitiveType::TriMesh, vertices, IndexBuffer::new(indices))
    }
}
