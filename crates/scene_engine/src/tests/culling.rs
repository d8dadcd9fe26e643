//! Culling tests against updated scene graphs

use crate::foundation::math::{Point3, Vec3};
use crate::render::{Camera, Culler};
use crate::scene::{
    Bound, CullingMode, IndexBuffer, PrimitiveType, SceneGraph, SpatialKey, StandardMesh,
    VertexBuffer, Visual,
};

/// Camera at the origin looking down -Z with a 90 degree square frustum
fn wide_culler() -> Culler {
    let mut camera = Camera::default();
    camera.set_frustum_fov(90.0, 1.0, 1.0, 100.0);
    Culler::new(camera)
}

fn ball(graph: &mut SceneGraph, name: &str, center: Vec3, radius: f32) -> SpatialKey {
    let key = graph.insert_visual(name, StandardMesh::sphere(6, 8, radius));
    graph[key].local_transform_mut().set_translate(center);
    key
}

/// Node holding a single ball; returns (node, ball)
fn group_with_ball(graph: &mut SceneGraph, name: &str, center: Vec3) -> (SpatialKey, SpatialKey) {
    let group = graph.insert_node(name);
    let leaf = ball(graph, &format!("{name}_ball"), center, 1.0);
    graph.attach_child(group, leaf);
    (group, leaf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_radius_visual_is_never_collected() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let point = Visual::new(
            PrimitiveType::Polypoint,
            VertexBuffer::from_positions(&[Point3::origin()]),
            IndexBuffer::sequential(1),
        );
        let dot = graph.insert_visual("dot", point);
        graph[dot].local_transform_mut().set_translate(Vec3::new(0.0, 0.0, -10.0));
        graph.attach_child(root, dot);
        graph.update(root, 0.0);
        assert!(graph[dot].world_bound().is_empty());

        let mut culler = wide_culler();
        assert!(culler.compute_visible_set(&graph, root).is_empty());
        assert!(!culler.is_visible(&Bound::new(Point3::new(0.0, 0.0, -10.0), 0.0)));
    }

    #[test]
    fn test_bound_around_the_eye_is_visible() {
        let mut camera = Camera::default();
        camera.set_frustum_fov(60.0, 4.0 / 3.0, 0.1, 100.0);
        let mut culler = Culler::new(camera);
        assert!(culler.is_visible(&Bound::new(Point3::origin(), 0.5)));
    }

    #[test]
    fn test_sibling_results_do_not_depend_on_order() {
        // `inside` clears every plane bit; `outside` is rejected only by the
        // left plane.
        let inside_center = Vec3::new(0.0, 0.0, -10.0);
        let outside_center = Vec3::new(-20.0, 0.0, -10.0);

        for inside_first in [true, false] {
            let mut graph = SceneGraph::new();
            let root = graph.insert_node("root");
            let (inside, inside_ball) = group_with_ball(&mut graph, "inside", inside_center);
            let (outside, outside_ball) = group_with_ball(&mut graph, "outside", outside_center);
            if inside_first {
                graph.attach_child(root, inside);
                graph.attach_child(root, outside);
            } else {
                graph.attach_child(root, outside);
                graph.attach_child(root, inside);
            }
            graph.update(root, 0.0);

            let mut culler = wide_culler();
            let visible = culler.compute_visible_set(&graph, root);
            assert_eq!(visible.as_slice(), &[inside_ball], "inside_first = {inside_first}");
            assert!(!visible.contains(outside_ball));
            assert_eq!(culler.plane_state(), !0);
        }
    }

    #[test]
    fn test_plane_state_is_restored_after_each_subtree() {
        let mut graph = SceneGraph::new();
        let (inside, _) = group_with_ball(&mut graph, "inside", Vec3::new(0.0, 0.0, -10.0));
        let (outside, _) = group_with_ball(&mut graph, "outside", Vec3::new(-20.0, 0.0, -10.0));
        graph.update(inside, 0.0);
        graph.update(outside, 0.0);

        let mut culler = wide_culler();
        culler.on_get_visible_set(&graph, inside, false);
        assert_eq!(culler.plane_state(), !0);
        culler.on_get_visible_set(&graph, outside, false);
        assert_eq!(culler.plane_state(), !0);
        assert_eq!(culler.visible_set().len(), 1);
    }

    #[test]
    fn test_culling_always_excludes_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let (group, grouped) = group_with_ball(&mut graph, "group", Vec3::new(0.0, 0.0, -10.0));
        let hidden = ball(&mut graph, "hidden", Vec3::new(0.0, 0.0, -5.0), 1.0);
        graph.attach_child(root, group);
        graph.attach_child(root, hidden);
        graph.update(root, 0.0);

        let mut culler = wide_culler();
        assert_eq!(culler.compute_visible_set(&graph, root).len(), 2);

        graph[hidden].set_culling(CullingMode::Always);
        graph[group].set_culling(CullingMode::Always);
        let visible = culler.compute_visible_set(&graph, root);
        assert!(visible.is_empty());
        assert!(!visible.contains(grouped));
    }

    #[test]
    fn test_culling_never_includes_whole_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let (group, in_front) = group_with_ball(&mut graph, "group", Vec3::new(0.0, 0.0, -10.0));
        let behind = ball(&mut graph, "behind", Vec3::new(0.0, 0.0, 50.0), 1.0);
        let far_away = ball(&mut graph, "far_away", Vec3::new(0.0, 0.0, -500.0), 1.0);
        graph.attach_child(group, behind);
        graph.attach_child(root, group);
        graph.attach_child(root, far_away);
        graph.update(root, 0.0);

        let mut culler = wide_culler();
        assert_eq!(culler.compute_visible_set(&graph, root).as_slice(), &[in_front]);

        graph[group].set_culling(CullingMode::Never);
        graph[far_away].set_culling(CullingMode::Never);
        let visible = culler.compute_visible_set(&graph, root);
        assert_eq!(visible.as_slice(), &[in_front, behind, far_away]);
    }

    #[test]
    fn test_always_wins_inside_a_never_subtree() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let (group, shown) = group_with_ball(&mut graph, "group", Vec3::new(0.0, 0.0, -10.0));
        let suppressed = ball(&mut graph, "suppressed", Vec3::new(0.0, 0.0, -12.0), 1.0);
        graph.attach_child(group, suppressed);
        graph.attach_child(root, group);
        graph.update(root, 0.0);
        graph[root].set_culling(CullingMode::Never);
        graph[suppressed].set_culling(CullingMode::Always);

        let mut culler = wide_culler();
        assert_eq!(culler.compute_visible_set(&graph, root).as_slice(), &[shown]);
    }

    #[test]
    fn test_each_pass_replaces_the_previous_set() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let mover = ball(&mut graph, "mover", Vec3::new(0.0, 0.0, -10.0), 1.0);
        graph.attach_child(root, mover);
        graph.update(root, 0.0);

        let mut culler = wide_culler();
        assert_eq!(culler.compute_visible_set(&graph, root).len(), 1);

        graph[mover].local_transform_mut().set_translate(Vec3::new(0.0, 0.0, 10.0));
        graph.update(mover, 0.0);
        assert!(culler.compute_visible_set(&graph, root).is_empty());
        assert!(culler.visible_set().is_empty());
    }

    #[test]
    fn test_moving_the_camera_requires_new_planes() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        let target = ball(&mut graph, "target", Vec3::new(0.0, 0.0, 10.0), 1.0);
        graph.attach_child(root, target);
        graph.update(root, 0.0);

        let mut culler = wide_culler();
        assert!(culler.compute_visible_set(&graph, root).is_empty());

        let mut camera = culler.camera().clone();
        camera.look_at(Point3::origin(), Point3::new(0.0, 0.0, 10.0), Vec3::y());
        culler.set_camera(camera);
        assert_eq!(culler.compute_visible_set(&graph, root).as_slice(), &[target]);
    }

    #[test]
    #[should_panic(expected = "stale root")]
    fn test_stale_root_panics() {
        let mut graph = SceneGraph::new();
        let root = graph.insert_node("root");
        graph.remove(root);
        wide_culler().compute_visible_set(&graph, root);
    }
}
