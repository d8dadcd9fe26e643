//! Orbit demo application
//!
//! Scatters spheres and boxes around spinning group nodes, then runs a fixed
//! number of update → cull → draw frames through the headless renderer and
//! reports how much of the scene survived culling.
//!
//! Usage: `orbit_demo [scene.toml|scene.ron]`

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use scene_engine::config::{Config, ConfigError, SceneConfig};
use scene_engine::foundation::logging;
use scene_engine::foundation::math::{constants, Vec3};
use scene_engine::foundation::time::{FrameClock, Stopwatch};
use scene_engine::render::{Culler, HeadlessRenderer, RenderError, Renderer};
use scene_engine::scene::{CullingMode, SceneGraph, SpatialKey, SpinController, StandardMesh};
use thiserror::Error;

/// Distance from the camera to the ring of groups
const RING_RADIUS: f32 = 40.0;

/// Spread of visuals around their group center
const GROUP_SPREAD: f32 = 8.0;

/// Frames between progress reports
const REPORT_INTERVAL: u32 = 30;

#[derive(Error, Debug)]
enum DemoError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),
}

struct OrbitDemo {
    config: SceneConfig,
    graph: SceneGraph,
    root: SpatialKey,
    culler: Culler,
    renderer: HeadlessRenderer,
}

impl OrbitDemo {
    fn new(config: SceneConfig) -> Self {
        let mut rng = StdRng::seed_from_u64(config.seed);
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");

        for group_index in 0..config.group_count {
            let group = Self::build_group(&mut graph, &mut rng, group_index, &config);
            graph.attach_child(root, group);
        }

        // Drawn every frame regardless of where it sits.
        let marker_mesh = StandardMesh::box_mesh(Vec3::new(0.5, 0.5, 0.5));
        let marker = graph.insert_visual("marker", marker_mesh);
        graph[marker].local_transform_mut().set_translate(Vec3::new(0.0, -5.0, 10.0));
        graph[marker].set_culling(CullingMode::Never);
        graph.attach_child(root, marker);

        log::info!(
            "Built scene with {} spatials in {} groups",
            graph.len(),
            config.group_count
        );

        let culler = Culler::new(config.view.build_camera());
        Self {
            config,
            graph,
            root,
            culler,
            renderer: HeadlessRenderer::new(),
        }
    }

    /// Group node on a ring around the camera with a spin controller and
    /// randomly placed children
    fn build_group(
        graph: &mut SceneGraph,
        rng: &mut StdRng,
        group_index: usize,
        config: &SceneConfig,
    ) -> SpatialKey {
        let group = graph.insert_node(format!("group_{group_index}"));
        let angle = constants::TAU * group_index as f32 / config.group_count.max(1) as f32;
        graph[group]
            .local_transform_mut()
            .set_translate(Vec3::new(RING_RADIUS * angle.sin(), 0.0, -RING_RADIUS * angle.cos()));

        let speed = rng.gen_range(0.2..1.5) * if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        graph.attach_controller(group, Box::new(SpinController::new(Vec3::y(), speed)));

        for visual_index in 0..config.visuals_per_group {
            let size = rng.gen_range(0.3..1.2);
            let mesh = if rng.gen_bool(0.5) {
                StandardMesh::sphere(8, 12, size)
            } else {
                StandardMesh::box_mesh(Vec3::new(size, size, size))
            };
            let name = format!("group_{group_index}_visual_{visual_index}");
            let visual = graph.insert_visual(name, mesh);
            let offset = Vec3::new(
                rng.gen_range(-GROUP_SPREAD..GROUP_SPREAD),
                rng.gen_range(-GROUP_SPREAD..GROUP_SPREAD) * 0.25,
                rng.gen_range(-GROUP_SPREAD..GROUP_SPREAD),
            );
            graph[visual].local_transform_mut().set_translate(offset);
            graph.attach_child(group, visual);
        }
        group
    }

    fn run(&mut self) -> Result<(), DemoError> {
        let mut clock = FrameClock::fixed(self.config.time_step);
        let stopwatch = Stopwatch::start_new();
        let mut visible_total = 0_usize;

        for frame in 1..=self.config.frame_count {
            let time = clock.tick();
            self.graph.update(self.root, time);
            let visible = self.culler.compute_visible_set(&self.graph, self.root);
            visible_total += visible.len();
            self.renderer.draw_frame(&self.graph, visible)?;

            if frame % REPORT_INTERVAL == 0 {
                log::info!(
                    "Frame {frame} (t={time:.2}s): {} visible",
                    self.renderer.last_frame_draw_count()
                );
            }
        }

        let stats = self.renderer.stats();
        log::info!(
            "Ran {} frames in {:.2} ms: {} draw calls, {} primitives, {} uploads ({} bytes)",
            stats.frames,
            stopwatch.elapsed_millis(),
            stats.draw_calls,
            stats.primitives,
            stats.uploads,
            stats.bytes_uploaded
        );
        if stats.frames > 0 {
            log::info!(
                "Average visible set: {:.1} of {} spatials",
                visible_total as f64 / stats.frames as f64,
                self.graph.len()
            );
        }
        Ok(())
    }
}

fn main() -> Result<(), DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => SceneConfig::load_from_file(&path)?,
        None => SceneConfig::default(),
    };
    logging::init_with_level(logging::parse_level(&config.log_level));

    log::info!("=== Orbit Demo ===");
    let mut demo = OrbitDemo::new(config);
    demo.run()
}
