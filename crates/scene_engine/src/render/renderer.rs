//! Backend abstraction consumed by the per-frame draw loop
//!
//! A backend implements the primitive operations. The provided methods walk a
//! [`VisibleSet`], refresh vertex buffers whose contents changed since their
//! last upload, and draw every visual with its world transform.

use thiserror::Error;

use crate::render::visible_set::VisibleSet;
use crate::scene::{SceneGraph, SpatialKey, Transform, VertexBuffer, Visual};

/// Errors reported by a rendering backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A visible-set entry is stale or does not name a visual
    #[error("Visible set entry {0:?} is not a live visual")]
    MissingVisual(SpatialKey),

    /// Geometry cannot be drawn, e.g. an index past the end of the vertex buffer
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    /// Backend-specific failure
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for backend operations
pub type RenderResult<T> = Result<T, RenderError>;

/// Rendering backend
pub trait Renderer {
    /// Clear the color and depth buffers for a new frame
    fn clear_buffers(&mut self);

    /// Upload (or replace) the device copy of the vertex buffer owned by `key`
    fn upload_vertex_buffer(
        &mut self,
        key: SpatialKey,
        vertices: &VertexBuffer,
    ) -> RenderResult<()>;

    /// Version of the last upload for `key`, if any
    fn uploaded_version(&self, key: SpatialKey) -> Option<u64>;

    /// Issue the draw call for one visual
    fn draw(&mut self, key: SpatialKey, visual: &Visual, world: &Transform) -> RenderResult<()>;

    /// Present the finished frame
    fn display_color_buffer(&mut self);

    /// Draw every entry of `visible` in order.
    ///
    /// Vertex buffers whose version differs from the uploaded one are
    /// re-uploaded first.
    fn draw_scene(&mut self, graph: &SceneGraph, visible: &VisibleSet) -> RenderResult<()> {
        for key in visible {
            let spatial = graph.get(key).ok_or(RenderError::MissingVisual(key))?;
            let visual = spatial.as_visual().ok_or(RenderError::MissingVisual(key))?;

            if self.uploaded_version(key) != Some(visual.vertices().version()) {
                self.upload_vertex_buffer(key, visual.vertices())?;
            }
            self.draw(key, visual, spatial.world_transform())?;
        }
        Ok(())
    }

    /// Clear, draw the visible set, and present
    fn draw_frame(&mut self, graph: &SceneGraph, visible: &VisibleSet) -> RenderResult<()> {
        self.clear_buffers();
        self.draw_scene(graph, visible)?;
        self.display_color_buffer();
        Ok(())
    }
}
