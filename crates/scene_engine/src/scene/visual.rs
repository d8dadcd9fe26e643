//! Leaf spatial carrying drawable geometry

use crate::scene::bound::Bound;
use crate::scene::geometry::{IndexBuffer, PrimitiveType, VertexBuffer};
use crate::scene::transform::Transform;

/// Drawable leaf: geometry plus its model-space bound.
///
/// The model bound is kept in sync with the vertex positions; the world bound
/// is this bound mapped through the owning spatial's world transform.
#[derive(Debug, Clone)]
pub struct Visual {
    primitive_type: PrimitiveType,
    vertices: VertexBuffer,
    indices: IndexBuffer,
    model_bound: Bound,
}

impl Visual {
    /// Create a visual and compute its model bound
    pub fn new(
        primitive_type: PrimitiveType,
        vertices: VertexBuffer,
        indices: IndexBuffer,
    ) -> Self {
        let model_bound = Bound::compute_from_data(vertices.positions());
        Self {
            primitive_type,
            vertices,
            indices,
            model_bound,
        }
    }

    /// Primitive assembly
    pub fn primitive_type(&self) -> PrimitiveType {
        self.primitive_type
    }

    /// Vertex data
    pub fn vertices(&self) -> &VertexBuffer {
        &self.vertices
    }

    /// Index data
    pub fn indices(&self) -> &IndexBuffer {
        &self.indices
    }

    /// Bound in model space
    pub fn model_bound(&self) -> &Bound {
        &self.model_bound
    }

    /// Number of primitives drawn from the index buffer
    pub fn primitive_count(&self) -> usize {
        self.primitive_type.primitive_count(self.indices.len())
    }

    /// Replace the geometry; the model bound is recomputed
    pub fn set_geometry(&mut self, mut vertices: VertexBuffer, indices: IndexBuffer) {
        vertices.supersede(self.vertices.version());
        self.vertices = vertices;
        self.indices = indices;
        self.update_model_bound();
    }

    /// Edit vertex data in place; the model bound is recomputed afterwards
    pub fn modify_vertices<R>(&mut self, edit: impl FnOnce(&mut VertexBuffer) -> R) -> R {
        let result = edit(&mut self.vertices);
        self.update_model_bound();
        result
    }

    /// Recompute the model bound from the current vertex positions
    pub fn update_model_bound(&mut self) {
        self.model_bound = Bound::compute_from_data(self.vertices.positions());
    }

    /// World bound under the given world transform
    pub fn world_bound(&self, world: &Transform) -> Bound {
        self.model_bound.transform_by(world)
    }

    /// Vertex access for controllers, which refresh the bound themselves
    pub(crate) fn vertices_mut_unbounded(&mut self) -> &mut VertexBuffer {
        &mut self.vertices
    }
}
