//! Builds small binary glTF assets in memory so the loader can be exercised
//! without any files on disk.

/// Binary payload shared by both test assets: one triangle plus one
/// translation track with two keyframes.
///
/// Layout: positions at 0 (36 bytes), u16 indices at 36 (6 bytes + 2 pad),
/// animation input at 44 (8 bytes), animation output at 52 (24 bytes).
fn bin_chunk() -> Vec<u8> {
    let mut bin = Vec::new();
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    for v in positions {
        bin.extend_from_slice(&v.to_le_bytes());
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin.extend_from_slice(&[0, 0]); // align to 4
    for t in [0.0f32, 1.0] {
        bin.extend_from_slice(&t.to_le_bytes());
    }
    let translations: [f32; 6] = [0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    for v in translations {
        bin.extend_from_slice(&v.to_le_bytes());
    }
    assert_eq!(bin.len(), 76);
    bin
}

fn glb(json: &str) -> Vec<u8> {
    let mut json_bytes = json.as_bytes().to_vec();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin = bin_chunk();
    while bin.len() % 4 != 0 {
        bin.push(0);
    }

    let total = 12 + 8 + json_bytes.len() + 8 + bin.len();
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&0x46546C67u32.to_le_bytes()); // "glTF"
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x4E4F534Au32.to_le_bytes()); // "JSON"
    out.extend_from_slice(&json_bytes);
    out.extend_from_slice(&(bin.len() as u32).to_le_bytes());
    out.extend_from_slice(&0x004E4942u32.to_le_bytes()); // "BIN\0"
    out.extend_from_slice(&bin);
    out
}

const ASSET_COMMON: &str = r#"
  "asset": { "version": "2.0" },
  "scene": 0,
  "scenes": [ { "nodes": [0, 1] } ],
  "nodes": [
    { "mesh": 0, "name": "body" },
    { "mesh": 1, "name": "wing", "translation": [2.0, 0.0, 0.0] }
  ],
  "meshes": [
    { "name": "body", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] },
    { "name": "wing", "primitives": [ { "attributes": { "POSITION": 0 }, "indices": 1 } ] }
  ],
  "accessors": [
    { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
      "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
    { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" },
    { "bufferView": 2, "componentType": 5126, "count": 2, "type": "SCALAR",
      "min": [0.0], "max": [1.0] },
    { "bufferView": 3, "componentType": 5126, "count": 2, "type": "VEC3" }
  ],
  "bufferViews": [
    { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
    { "buffer": 0, "byteOffset": 36, "byteLength": 6 },
    { "buffer": 0, "byteOffset": 44, "byteLength": 8 },
    { "buffer": 0, "byteOffset": 52, "byteLength": 24 }
  ],
  "buffers": [ { "byteLength": 76 } ]
"#;

/// A two-node asset with one looping translation clip named "flap".
pub fn animated_glb() -> Vec<u8> {
    let json = format!(
        r#"{{{ASSET_COMMON},
  "animations": [
    {{
      "name": "flap",
      "channels": [ {{ "sampler": 0, "target": {{ "node": 0, "path": "translation" }} }} ],
      "samplers": [ {{ "input": 2, "output": 3, "interpolation": "LINEAR" }} ]
    }}
  ]
}}"#
    );
    glb(&json)
}

/// The same geometry without any animation.
pub fn static_glb() -> Vec<u8> {
    glb(&format!("{{{ASSET_COMMON}}}"))
}
