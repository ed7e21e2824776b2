use strut::{
    data_structures::{
        scene_graph::{Aabb, SceneGraph},
        transform::Transform,
    },
    Vector3,
};

#[test]
fn aabb_from_points_and_union() {
    let a = Aabb::from_points([[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [-1.0, 1.0, 0.5]]).unwrap();
    assert_eq!(a.min, Vector3::new(-1.0, 0.0, 0.0));
    assert_eq!(a.max, Vector3::new(1.0, 2.0, 3.0));

    let b = Aabb::from_points([[5.0, -1.0, 0.0], [6.0, 0.0, 1.0]]).unwrap();
    let u = a.union(&b);
    assert_eq!(u.min, Vector3::new(-1.0, -1.0, 0.0));
    assert_eq!(u.max, Vector3::new(6.0, 2.0, 3.0));

    assert!(Aabb::from_points(std::iter::empty()).is_none());
}

#[test]
fn aabb_transformed_scales_and_moves() {
    let a = Aabb::from_points([[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]).unwrap();
    let transform = Transform {
        position: Vector3::new(10.0, 0.0, 0.0),
        scale: Vector3::new(2.0, 2.0, 2.0),
        ..Transform::new()
    };
    let moved = a.transformed(&transform);
    assert_eq!(moved.min, Vector3::new(10.0, 0.0, 0.0));
    assert_eq!(moved.max, Vector3::new(12.0, 2.0, 2.0));
}

#[test]
fn normalize_centers_and_scales_the_graph() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node("model", Transform::new(), None, None);
    graph.add_node(
        "left",
        Transform::from(Vector3::new(-2.0, 0.0, 0.0)),
        Some(0),
        Some(root),
    );
    graph.add_node(
        "right",
        Transform::from(Vector3::new(4.0, 2.0, 0.0)),
        Some(0),
        Some(root),
    );
    // Unit cube around each node's origin.
    let mesh_bounds = vec![Aabb::from_points([[-0.5, -0.5, -0.5], [0.5, 0.5, 0.5]]).unwrap()];

    let scale = graph.normalize(&mesh_bounds, 2.0).unwrap();
    // Pre-normalization bounds span (-2.5,-0.5,-0.5)..(4.5,2.5,0.5).
    let diagonal = (49.0f32 + 9.0 + 1.0).sqrt();
    assert!((scale - 2.0 / diagonal).abs() < 1e-5);

    let after = graph.bounds(&mesh_bounds).unwrap();
    assert!((after.diagonal() - 2.0).abs() < 1e-5);
    let center = after.center();
    assert!(center.x.abs() < 1e-5);
    assert!(center.y.abs() < 1e-5);
    assert!(center.z.abs() < 1e-5);
}

#[test]
fn normalize_without_meshes_is_a_no_op() {
    let mut graph = SceneGraph::new();
    graph.add_node("empty", Transform::new(), None, None);
    assert!(graph.normalize(&[], 2.0).is_none());
}

#[test]
fn world_transforms_compose_down_the_tree() {
    let mut graph = SceneGraph::new();
    let root = graph.add_node(
        "root",
        Transform {
            scale: Vector3::new(2.0, 2.0, 2.0),
            ..Transform::new()
        },
        None,
        None,
    );
    let child = graph.add_node(
        "child",
        Transform::from(Vector3::new(1.0, 0.0, 0.0)),
        None,
        Some(root),
    );
    graph.update_world_transforms();
    let world = &graph.node(child).world;
    assert_eq!(world.position, Vector3::new(2.0, 0.0, 0.0));
    assert_eq!(world.scale, Vector3::new(2.0, 2.0, 2.0));
}
