//! Whole-frame scenarios: update, cull, draw

use crate::config::{Config, SceneConfig};
use crate::foundation::math::{Point3, Vec3};
use crate::foundation::time::FrameClock;
use crate::render::{Camera, Culler, HeadlessRenderer, Renderer};
use crate::scene::{
    IndexBuffer, PrimitiveType, SceneGraph, SpinController, StandardMesh, VertexBuffer, Visual,
    WaveController,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_narrow_view_down_x_sees_only_the_far_ball() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let child0 = graph.insert_visual("child0", StandardMesh::sphere(8, 16, 1.0));
        let child1 = graph.insert_visual("child1", StandardMesh::sphere(8, 16, 1.0));
        graph[child1].local_transform_mut().set_translate(Vec3::new(10.0, 0.0, 0.0));
        graph.attach_child(root, child0);
        graph.attach_child(root, child1);
        graph.update(root, 0.0);

        assert_relative_eq!(graph[child0].world_bound().center, Point3::origin(), epsilon = 1e-5);
        assert_relative_eq!(
            graph[child1].world_bound().center,
            Point3::new(10.0, 0.0, 0.0),
            epsilon = 1e-5
        );
        assert_relative_eq!(graph[child1].world_bound().radius, 1.0, epsilon = 1e-5);

        // Near plane at 2 puts the whole unit ball around the eye behind it.
        let mut camera = Camera::default();
        camera.look_at(Point3::origin(), Point3::new(1.0, 0.0, 0.0), Vec3::y());
        camera.set_frustum_fov(10.0, 1.0, 2.0, 100.0);
        assert_relative_eq!(*camera.r_vector(), Vec3::z(), epsilon = 1e-6);

        let mut culler = Culler::new(camera);
        let visible = culler.compute_visible_set(&graph, root);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible.get(0), Some(child1));
    }

    #[test]
    fn test_headless_frames_reupload_only_animated_geometry() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let spinner = graph.insert_node("spinner");
        graph.attach_child(root, spinner);
        graph[spinner].local_transform_mut().set_translate(Vec3::new(0.0, 0.0, -10.0));
        graph.attach_controller(spinner, Box::new(SpinController::new(Vec3::y(), 1.5)));

        let cube = graph.insert_visual("cube", StandardMesh::box_mesh(Vec3::new(1.0, 1.0, 1.0)));
        graph[cube].local_transform_mut().set_translate(Vec3::new(2.0, 0.0, 0.0));
        graph.attach_child(spinner, cube);

        let positions: Vec<Point3> = (0..16)
            .map(|i| Point3::new(i as f32 * 0.5 - 4.0, -2.0, -20.0))
            .collect();
        let ribbon = Visual::new(
            PrimitiveType::PolylineOpen,
            VertexBuffer::from_positions(&positions),
            IndexBuffer::sequential(positions.len()),
        );
        let wave = graph.insert_visual("wave", ribbon);
        graph.attach_child(root, wave);
        graph.attach_controller(wave, Box::new(WaveController::new(0.5, 1.0, 3.0)));

        let view = SceneConfig::from_toml_str(
            r#"
            [view]
            up_fov_degrees = 60.0
            aspect_ratio = 1.0
            near = 0.5
            far = 100.0
            "#,
        )
        .unwrap()
        .view;
        let mut culler = Culler::new(view.build_camera());
        let mut renderer = HeadlessRenderer::new();
        let mut clock = FrameClock::fixed(1.0 / 30.0);

        const FRAMES: u64 = 5;
        for _ in 0..FRAMES {
            let time = clock.tick();
            graph.update(root, time);
            let visible = culler.compute_visible_set(&graph, root);
            assert_eq!(visible.len(), 2);
            renderer.draw_frame(&graph, visible).unwrap();
        }

        let stats = renderer.stats();
        assert_eq!(stats.frames, FRAMES);
        assert_eq!(stats.draw_calls, 2 * FRAMES);
        assert_eq!(stats.primitives, FRAMES * (12 + 15));
        assert_eq!(stats.uploads, 1 + FRAMES);
        assert_eq!(renderer.frame_draws(), &[cube, wave]);
        assert_relative_eq!(clock.total_time(), FRAMES as f64 / 30.0, epsilon = 1e-9);

        let spinner_center = Vec3::new(0.0, 0.0, -10.0);
        let radius = (graph[cube].world_transform().translate() - spinner_center).norm();
        assert_relative_eq!(radius, 2.0, epsilon = 1e-4);
    }
}
