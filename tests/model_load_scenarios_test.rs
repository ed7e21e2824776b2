use strut::resources::{animation::Animator, parse_glb};

mod common;

use crate::common::test_utils::{animated_glb, static_glb};

#[test]
fn parses_meshes_nodes_and_clips() {
    let parsed = parse_glb(&animated_glb()).expect("asset should parse");

    // Synthetic root plus the two authored nodes.
    assert_eq!(parsed.graph.len(), 3);
    assert_eq!(parsed.graph.mesh_nodes().count(), 2);
    assert_eq!(parsed.meshes.len(), 2);
    assert_eq!(parsed.meshes[0].vertices.len(), 3);
    assert_eq!(parsed.meshes[0].indices, vec![0, 1, 2]);

    assert_eq!(parsed.clips.len(), 1);
    assert_eq!(parsed.clips[0].name, "flap");
    assert!((parsed.clips[0].duration() - 1.0).abs() < 1e-6);
}

#[test]
fn normalizes_to_target_size_at_origin() {
    let mut parsed = parse_glb(&animated_glb()).expect("asset should parse");
    let mesh_bounds: Vec<_> = parsed.meshes.iter().map(|m| m.bounds).collect();

    let before = parsed.graph.bounds(&mesh_bounds).unwrap();
    assert!((before.diagonal() - 10.0f32.sqrt()).abs() < 1e-5);

    let scale = parsed
        .graph
        .normalize(&mesh_bounds, 2.0)
        .expect("graph has geometry");
    assert!((scale - 2.0 / 10.0f32.sqrt()).abs() < 1e-5);

    let after = parsed.graph.bounds(&mesh_bounds).unwrap();
    assert!((after.diagonal() - 2.0).abs() < 1e-5);
    let center = after.center();
    assert!(center.x.abs() < 1e-5);
    assert!(center.y.abs() < 1e-5);
    assert!(center.z.abs() < 1e-5);
}

#[test]
fn all_clips_start_playing_and_looping() {
    let parsed = parse_glb(&animated_glb()).expect("asset should parse");
    let animator = Animator::from_clips(parsed.clips).expect("asset has clips");
    assert!(!animator.active_clips().is_empty());
    for active in animator.active_clips() {
        assert!(active.playing);
        assert!(active.looping);
        assert_eq!(active.time, 0.0);
    }
}

#[test]
fn asset_without_clips_yields_no_animator() {
    let parsed = parse_glb(&static_glb()).expect("asset should parse");
    assert!(parsed.clips.is_empty());
    assert!(Animator::from_clips(parsed.clips).is_none());
}

#[test]
fn garbage_bytes_fail_to_parse() {
    assert!(parse_glb(b"not a gltf binary").is_err());
}
