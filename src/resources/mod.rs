//! Loading of the model file and its textures from external storage.
//!
//! Loading happens in two stages. The parse stage walks a glTF document into
//! [`ParsedModel`]: plain CPU data (scene graph, geometry, animation clips)
//! with no GPU types involved, so it can be exercised directly in tests. The
//! upload stage turns parsed geometry into GPU buffers and attaches the
//! standard lit material to every mesh.

use std::{
    collections::HashMap,
    io::{BufReader, Cursor},
};

use anyhow::Context as _;
use cgmath::Vector3;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{Material, MaterialFactors, Mesh, Model, ModelVertex},
        scene_graph::{Aabb, NodeId, SceneGraph},
        texture::Texture,
    },
    resources::{
        animation::{AnimationClip, Channel, Keyframes, Track},
        texture::{load_binary, load_texture_or},
    },
    scene::LoadedModel,
};

pub mod animation;
pub mod texture;

/// Asset file names, resolved against the platform base path by
/// [`texture::load_binary`]. Fixed constants, no configuration surface.
pub const MODEL_FILE: &str = "models/Chicken.glb";
pub const DIFFUSE_MAP: &str = "models/gltf_embedded_0.png";
pub const ROUGHNESS_MAP: &str = "models/gltf_embedded_2.png";
pub const NORMAL_MAP: &str = "models/gltf_embedded_3@channels=R.png";

/// The one third-party extension this asset is known to carry. Its material
/// definition is discarded anyway, so it is not worth a warning.
const LEGACY_MATERIAL_EXTENSION: &str = "KHR_materials_pbrSpecularGlossiness";

/// CPU-side geometry of one mesh node, all primitives merged.
#[derive(Clone, Debug)]
pub struct MeshData {
    pub name: String,
    pub vertices: Vec<ModelVertex>,
    pub indices: Vec<u32>,
    pub bounds: Aabb,
}

/// Everything the parse stage extracts from a glTF document.
#[derive(Debug, Default)]
pub struct ParsedModel {
    pub graph: SceneGraph,
    pub meshes: Vec<MeshData>,
    pub clips: Vec<AnimationClip>,
}

/// Parse a binary glTF with embedded buffers. Synchronous; the async
/// [`load_viewer_model`] path also resolves external buffer URIs.
pub fn parse_glb(bytes: &[u8]) -> anyhow::Result<ParsedModel> {
    let gltf = gltf::Gltf::from_slice(bytes)?;
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().context("glb carries no binary chunk")?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                anyhow::bail!("external buffer {uri} not supported here");
            }
        }
    }
    parse_gltf(&gltf.document, &buffer_data)
}

/// Walk the document into a [`ParsedModel`].
///
/// The whole asset hangs under a synthetic root node so centering and scale
/// normalization have a single transform to write to. glTF materials are not
/// read at all: every mesh is later bound to the standard lit material.
pub fn parse_gltf(
    document: &gltf::Document,
    buffer_data: &[Vec<u8>],
) -> anyhow::Result<ParsedModel> {
    for ext in document.extensions_required() {
        if ext == LEGACY_MATERIAL_EXTENSION {
            log::debug!("asset requires {ext}; its materials are replaced anyway");
        } else {
            log::warn!("asset requires unsupported extension {}", ext);
        }
    }
    if document.materials().len() > 0 {
        log::info!(
            "discarding {} asset material(s) in favour of the standard lit material",
            document.materials().len()
        );
    }

    let mut parsed = ParsedModel::default();
    let root = parsed
        .graph
        .add_node("model", Default::default(), None, None);

    // glTF node index -> our node id, needed to retarget animation channels.
    let mut node_ids: HashMap<usize, NodeId> = HashMap::new();
    for scene in document.scenes() {
        for node in scene.nodes() {
            add_node_recursive(&node, root, buffer_data, &mut parsed, &mut node_ids)?;
        }
    }

    for animation in document.animations() {
        let name = animation.name().unwrap_or("Default").to_string();
        let mut channels = Vec::new();
        for channel in animation.channels() {
            let reader = channel.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
            let timestamps: Vec<f32> = match reader.read_inputs() {
                Some(gltf::accessor::Iter::Standard(times)) => times.collect(),
                Some(gltf::accessor::Iter::Sparse(_)) | None => {
                    log::debug!(
                        "channel targeting node {} has no usable timestamps",
                        channel.target().node().index()
                    );
                    Vec::new()
                }
            };
            let keyframes = match reader.read_outputs() {
                Some(gltf::animation::util::ReadOutputs::Translations(translations)) => {
                    Keyframes::Translation(translations.map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::Rotations(rotations)) => {
                    Keyframes::Rotation(rotations.into_f32().map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::Scales(scales)) => {
                    Keyframes::Scale(scales.map(Into::into).collect())
                }
                Some(gltf::animation::util::ReadOutputs::MorphTargetWeights(_)) => {
                    log::debug!("skipping morph-target channel in {}", name);
                    continue;
                }
                None => continue,
            };
            let Some(&node) = node_ids.get(&channel.target().node().index()) else {
                continue;
            };
            channels.push(Channel {
                node,
                track: Track {
                    timestamps,
                    keyframes,
                },
            });
        }
        if !channels.is_empty() {
            parsed.clips.push(AnimationClip { name, channels });
        }
    }

    parsed.graph.update_world_transforms();
    Ok(parsed)
}

fn add_node_recursive(
    node: &gltf::Node,
    parent: NodeId,
    buffer_data: &[Vec<u8>],
    parsed: &mut ParsedModel,
    node_ids: &mut HashMap<usize, NodeId>,
) -> anyhow::Result<()> {
    let mesh = match node.mesh() {
        Some(mesh) => {
            let data = read_mesh(&mesh, buffer_data)?;
            match data {
                Some(data) => {
                    parsed.meshes.push(data);
                    Some(parsed.meshes.len() - 1)
                }
                None => None,
            }
        }
        None => None,
    };

    let (position, rotation, scale) = node.transform().decomposed();
    let local = crate::data_structures::transform::Transform {
        position: position.into(),
        rotation: rotation.into(),
        scale: scale.into(),
    };
    let name = node.name().unwrap_or("node").to_string();
    let id = parsed.graph.add_node(name, local, mesh, Some(parent));
    node_ids.insert(node.index(), id);

    for child in node.children() {
        add_node_recursive(&child, id, buffer_data, parsed, node_ids)?;
    }
    Ok(())
}

/// Read all primitives of a glTF mesh into one vertex/index soup.
/// Returns `None` for a mesh with no position data.
fn read_mesh(mesh: &gltf::Mesh, buffer_data: &[Vec<u8>]) -> anyhow::Result<Option<MeshData>> {
    let mut vertices: Vec<ModelVertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();
    let mut had_tangents = true;

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffer_data.get(buffer.index()).map(Vec::as_slice));
        let base = vertices.len() as u32;

        let Some(positions) = reader.read_positions() else {
            continue;
        };
        let first = vertices.len();
        for position in positions {
            vertices.push(ModelVertex {
                position,
                tex_coords: Default::default(),
                normal: Default::default(),
                tangent: Default::default(),
                bitangent: Default::default(),
            });
        }
        if let Some(normals) = reader.read_normals() {
            for (i, normal) in normals.enumerate() {
                vertices[first + i].normal = normal;
            }
        }
        if let Some(tex_coords) = reader.read_tex_coords(0).map(|v| v.into_f32()) {
            for (i, tex_coord) in tex_coords.enumerate() {
                vertices[first + i].tex_coords = tex_coord;
            }
        }
        match reader.read_tangents() {
            Some(tangents) => {
                for (i, tangent) in tangents.enumerate() {
                    // glTF tangents are vec4; w reconstructs the bitangent.
                    let tangent: cgmath::Vector4<f32> = tangent.into();
                    let normal: Vector3<f32> = vertices[first + i].normal.into();
                    let bitangent = normal.cross(tangent.truncate()) * tangent.w;
                    vertices[first + i].tangent = tangent.truncate().into();
                    vertices[first + i].bitangent = bitangent.into();
                }
            }
            None => had_tangents = false,
        }

        match reader.read_indices() {
            Some(indices_raw) => indices.extend(indices_raw.into_u32().map(|i| i + base)),
            None => indices.extend(base..vertices.len() as u32),
        }
    }

    if vertices.is_empty() {
        log::warn!("mesh {:?} carries no geometry", mesh.name());
        return Ok(None);
    }
    if !had_tangents {
        compute_tangents(&mut vertices, &indices);
    }

    let bounds = Aabb::from_points(vertices.iter().map(|v| v.position))
        .context("mesh without vertices")?;
    Ok(Some(MeshData {
        name: mesh.name().unwrap_or("unknown_mesh").to_string(),
        vertices,
        indices,
        bounds,
    }))
}

/// Derive tangents and bitangents from UV-space triangle edges for assets
/// that ship without them, so the normal map still has a basis to work in.
pub(crate) fn compute_tangents(vertices: &mut [ModelVertex], indices: &[u32]) {
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in indices.chunks(3) {
        if c.len() < 3 {
            continue;
        }
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: Vector3<f32> = v0.position.into();
        let pos1: Vector3<f32> = v1.position.into();
        let pos2: Vector3<f32> = v2.position.into();

        let uv0: cgmath::Vector2<f32> = v0.tex_coords.into();
        let uv1: cgmath::Vector2<f32> = v1.tex_coords.into();
        let uv2: cgmath::Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Degenerate UVs give no tangent direction, skip the triangle.
        let denom = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if denom.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / denom;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // Flipped to match wgpu's texture coordinate handedness.
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for &i in c {
            let v = &mut vertices[i as usize];
            v.tangent = (tangent + Vector3::from(v.tangent)).into();
            v.bitangent = (bitangent + Vector3::from(v.bitangent)).into();
            triangles_included[i as usize] += 1;
        }
    }

    for (i, n) in triangles_included.into_iter().enumerate() {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        let v = &mut vertices[i];
        v.tangent = (Vector3::from(v.tangent) * denom).into();
        v.bitangent = (Vector3::from(v.bitangent) * denom).into();
    }
}

/// Upload parsed geometry into GPU meshes bound to material 0, with shadow
/// casting and receiving enabled.
pub fn upload_meshes(meshes: &[MeshData], device: &wgpu::Device) -> Vec<Mesh> {
    meshes
        .iter()
        .map(|data| {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Vertex Buffer", data.name)),
                contents: bytemuck::cast_slice(&data.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
            let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Index Buffer", data.name)),
                contents: bytemuck::cast_slice(&data.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
            Mesh {
                name: data.name.clone(),
                vertex_buffer,
                index_buffer,
                num_elements: data.indices.len() as u32,
                material: 0,
                bounds: data.bounds,
                cast_shadow: true,
                receive_shadow: true,
            }
        })
        .collect()
}

async fn collect_buffer_data(gltf: &gltf::Gltf) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut buffer_data = Vec::new();
    for buffer in gltf.buffers() {
        match buffer.source() {
            gltf::buffer::Source::Bin => {
                let blob = gltf.blob.as_deref().context("glb carries no binary chunk")?;
                buffer_data.push(blob.to_vec());
            }
            gltf::buffer::Source::Uri(uri) => {
                let bin = load_binary(uri).await?;
                buffer_data.push(bin);
            }
        }
    }
    Ok(buffer_data)
}

/// Fetch, parse and upload the viewer's model and its three texture maps.
///
/// All four requests run concurrently. Texture failures degrade to solid
/// fallbacks; only a model failure makes the whole load fail.
pub async fn load_viewer_model(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> anyhow::Result<LoadedModel> {
    let (glb, diffuse, roughness, normal) = futures::join!(
        load_binary(MODEL_FILE),
        load_texture_or(DIFFUSE_MAP, false, [255, 255, 255, 255], device, queue),
        // Roughness is data, not color: keep it linear like the normal map.
        load_texture_or(ROUGHNESS_MAP, true, [255, 255, 255, 255], device, queue),
        load_texture_or(NORMAL_MAP, true, [127, 127, 255, 255], device, queue),
    );
    let glb = glb.with_context(|| format!("reading {MODEL_FILE}"))?;
    let gltf_cursor = Cursor::new(glb);
    let gltf_reader = BufReader::new(gltf_cursor);
    let gltf = gltf::Gltf::from_reader(gltf_reader)?;
    let buffer_data = collect_buffer_data(&gltf).await?;
    let parsed = parse_gltf(&gltf.document, &buffer_data)?;

    // The materially-correct channel assignment: diffuse to base color,
    // roughness to the roughness channel.
    let material = Material::new(
        device,
        MODEL_FILE,
        diffuse,
        roughness,
        normal,
        MaterialFactors::default(),
        layout,
    );
    let meshes = upload_meshes(&parsed.meshes, device);
    log::info!(
        "loaded {}: {} mesh(es), {} animation clip(s), standard material applied",
        MODEL_FILE,
        meshes.len(),
        parsed.clips.len()
    );

    let model = Model {
        meshes,
        materials: vec![material],
    };
    Ok(LoadedModel::new(device, model, parsed.graph, parsed.clips))
}

/// The ground plane: a fixed-size flat green quad in the XZ plane that only
/// receives shadows. Added to the scene before any model arrives.
pub fn mk_floor_model(
    size: f32,
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
) -> Model {
    let h = size / 2.0;
    let vertices = [
        floor_vertex([-h, 0.0, -h], [0.0, 0.0]),
        floor_vertex([-h, 0.0, h], [0.0, 1.0]),
        floor_vertex([h, 0.0, h], [1.0, 1.0]),
        floor_vertex([h, 0.0, -h], [1.0, 0.0]),
    ];
    let indices: [u32; 6] = [0, 1, 2, 0, 2, 3];

    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("floor Vertex Buffer"),
        contents: bytemuck::cast_slice(&vertices),
        usage: wgpu::BufferUsages::VERTEX,
    });
    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("floor Index Buffer"),
        contents: bytemuck::cast_slice(&indices),
        usage: wgpu::BufferUsages::INDEX,
    });

    let green = Texture::from_pixel(device, queue, [0, 128, 0, 255], true, "floor diffuse");
    let white = Texture::from_pixel(device, queue, [255, 255, 255, 255], false, "floor roughness");
    let flat_normal = Texture::create_default_normal_map(device, queue);
    let material = Material::new(
        device,
        "floor",
        green,
        white,
        flat_normal,
        MaterialFactors::default(),
        layout,
    );

    let bounds = Aabb::from_points(vertices.iter().map(|v| v.position)).unwrap();
    Model {
        meshes: vec![Mesh {
            name: "floor".to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
            material: 0,
            bounds,
            cast_shadow: false,
            receive_shadow: true,
        }],
        materials: vec![material],
    }
}

fn floor_vertex(position: [f32; 3], tex_coords: [f32; 2]) -> ModelVertex {
    ModelVertex {
        position,
        tex_coords,
        normal: [0.0, 1.0, 0.0],
        tangent: [1.0, 0.0, 0.0],
        bitangent: [0.0, 0.0, 1.0],
    }
}
