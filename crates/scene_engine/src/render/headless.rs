//! Renderer without a device
//!
//! Records uploads and draw calls instead of submitting them. Used by the demo
//! and by tests that exercise the draw loop.

use std::collections::HashMap;

use log::{debug, trace};

use crate::render::renderer::{RenderError, RenderResult, Renderer};
use crate::scene::{SpatialKey, Transform, VertexBuffer, Visual};

/// Counters accumulated since the renderer was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames presented
    pub frames: u64,
    /// Draw calls issued
    pub draw_calls: u64,
    /// Primitives submitted
    pub primitives: u64,
    /// Vertex buffer uploads
    pub uploads: u64,
    /// Bytes of vertex data uploaded
    pub bytes_uploaded: u64,
}

/// Headless rendering backend
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    uploaded: HashMap<SpatialKey, u64>,
    frame_draws: Vec<SpatialKey>,
    last_frame_draws: usize,
    stats: RenderStats,
}

impl HeadlessRenderer {
    /// Create a renderer with nothing uploaded
    pub fn new() -> Self {
        Self::default()
    }

    /// Lifetime counters
    pub fn stats(&self) -> &RenderStats {
        &self.stats
    }

    /// Visuals drawn since the last clear, in draw order
    pub fn frame_draws(&self) -> &[SpatialKey] {
        &self.frame_draws
    }

    /// Draw calls in the last presented frame
    pub fn last_frame_draw_count(&self) -> usize {
        self.last_frame_draws
    }

    /// Drop the upload record of `key`, e.g. after removing it from the scene
    pub fn release(&mut self, key: SpatialKey) -> bool {
        self.uploaded.remove(&key).is_some()
    }
}

impl Renderer for HeadlessRenderer {
    fn clear_buffers(&mut self) {
        self.frame_draws.clear();
    }

    fn upload_vertex_buffer(
        &mut self,
        key: SpatialKey,
        vertices: &VertexBuffer,
    ) -> RenderResult<()> {
        let bytes = vertices.as_bytes();
        let previous = self.uploaded.insert(key, vertices.version());
        self.stats.uploads += 1;
        self.stats.bytes_uploaded += bytes.len() as u64;
        trace!(
            "Uploaded {} bytes for {:?} (version {:?} -> {})",
            bytes.len(),
            key,
            previous,
            vertices.version()
        );
        Ok(())
    }

    fn uploaded_version(&self, key: SpatialKey) -> Option<u64> {
        self.uploaded.get(&key).copied()
    }

    fn draw(&mut self, key: SpatialKey, visual: &Visual, _world: &Transform) -> RenderResult<()> {
        let vertex_count = visual.vertices().vertex_count();
        let out_of_range = visual.indices().indices().iter().find(|&&i| i as usize >= vertex_count);
        if let Some(&bad) = out_of_range {
            return Err(RenderError::InvalidGeometry(format!(
                "index {bad} out of range for {vertex_count} vertices"
            )));
        }

        self.frame_draws.push(key);
        self.stats.draw_calls += 1;
        self.stats.primitives += visual.primitive_count() as u64;
        Ok(())
    }

    fn display_color_buffer(&mut self) {
        self.stats.frames += 1;
        self.last_frame_draws = self.frame_draws.len();
        debug!(
            "Frame {} presented with {} draw calls",
            self.stats.frames, self.last_frame_draws
        );
    }
}
