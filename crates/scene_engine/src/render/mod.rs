//! Visibility and drawing
//!
//! ## Per-Frame Flow
//!
//! ```text
//! SceneGraph::update ──→ Culler::compute_visible_set ──→ Renderer::draw_frame
//!   transforms, bounds      frustum planes + plane mask      uploads + draw calls
//! ```

pub mod camera;
pub mod culler;
pub mod headless;
pub mod renderer;
pub mod visible_set;

pub use camera::{Camera, Frustum};
pub use culler::{plane_index, Culler, FRUSTUM_PLANE_QUANTITY, MAX_PLANE_QUANTITY};
pub use headless::{HeadlessRenderer, RenderStats};
pub use renderer::{RenderError, RenderResult, Renderer};
pub use visible_set::VisibleSet;
