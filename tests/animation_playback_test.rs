use instant::Duration;
use strut::{
    data_structures::{
        scene_graph::SceneGraph,
        transform::Transform,
    },
    resources::animation::{AnimationClip, Animator, Channel, Keyframes, Track},
    Deg, Quaternion, Rotation3, Vector3,
};

fn single_node_graph() -> SceneGraph {
    let mut graph = SceneGraph::new();
    graph.add_node("animated", Transform::new(), None, None);
    graph
}

fn translation_clip(node: usize) -> AnimationClip {
    AnimationClip {
        name: "rise".to_string(),
        channels: vec![Channel {
            node,
            track: Track {
                timestamps: vec![0.0, 1.0],
                keyframes: Keyframes::Translation(vec![
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(0.0, 1.0, 0.0),
                ]),
            },
        }],
    }
}

#[test]
fn translation_keyframes_interpolate_linearly() {
    let mut graph = single_node_graph();
    let mut animator = Animator::from_clips(vec![translation_clip(0)]).unwrap();

    animator.update(Duration::from_millis(250), &mut graph);
    let y = graph.node(0).local.position.y;
    assert!((y - 0.25).abs() < 1e-4);

    animator.update(Duration::from_millis(500), &mut graph);
    let y = graph.node(0).local.position.y;
    assert!((y - 0.75).abs() < 1e-4);
}

#[test]
fn looping_wraps_past_the_clip_duration() {
    let mut graph = single_node_graph();
    let mut animator = Animator::from_clips(vec![translation_clip(0)]).unwrap();

    // 1.25s into a 1s looping clip lands at 0.25s.
    animator.update(Duration::from_millis(1250), &mut graph);
    assert!((animator.active_clips()[0].time - 0.25).abs() < 1e-4);
    let y = graph.node(0).local.position.y;
    assert!((y - 0.25).abs() < 1e-4);
}

#[test]
fn rotation_keyframes_hit_their_endpoints() {
    let start = Quaternion::from_angle_y(Deg(0.0));
    let end = Quaternion::from_angle_y(Deg(90.0));
    let clip = AnimationClip {
        name: "turn".to_string(),
        channels: vec![Channel {
            node: 0,
            track: Track {
                timestamps: vec![0.0, 2.0],
                keyframes: Keyframes::Rotation(vec![start, end]),
            },
        }],
    };
    let mut graph = single_node_graph();
    let mut animator = Animator::from_clips(vec![clip]).unwrap();

    // Just before the end of the non-wrapped first pass.
    animator.update(Duration::from_millis(1999), &mut graph);
    let rotation = graph.node(0).local.rotation;
    let expected = Quaternion::from_angle_y(Deg(89.91));
    assert!((rotation.s - expected.s).abs() < 1e-2);
    assert!((rotation.v.y - expected.v.y).abs() < 1e-2);
}

#[test]
fn clips_advance_independently() {
    let mut graph = SceneGraph::new();
    graph.add_node("a", Transform::new(), None, None);
    graph.add_node("b", Transform::new(), None, None);

    let short = translation_clip(0);
    let long = AnimationClip {
        name: "drift".to_string(),
        channels: vec![Channel {
            node: 1,
            track: Track {
                timestamps: vec![0.0, 4.0],
                keyframes: Keyframes::Translation(vec![
                    Vector3::new(0.0, 0.0, 0.0),
                    Vector3::new(4.0, 0.0, 0.0),
                ]),
            },
        }],
    };
    let mut animator = Animator::from_clips(vec![short, long]).unwrap();
    animator.update(Duration::from_millis(500), &mut graph);

    assert!((graph.node(0).local.position.y - 0.5).abs() < 1e-4);
    assert!((graph.node(1).local.position.x - 0.5).abs() < 1e-4);
}

#[test]
fn paused_clips_hold_their_pose() {
    let mut graph = single_node_graph();
    let mut animator = Animator::from_clips(vec![translation_clip(0)]).unwrap();
    animator.update(Duration::from_millis(250), &mut graph);

    // Freezing playback keeps both the cursor and the pose.
    for active in animator.active_clips_mut() {
        active.playing = false;
    }
    animator.update(Duration::from_millis(500), &mut graph);
    assert!((animator.active_clips()[0].time - 0.25).abs() < 1e-4);
    assert!((graph.node(0).local.position.y - 0.25).abs() < 1e-4);
}
