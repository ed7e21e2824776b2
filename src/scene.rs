//! Scene contents and their per-frame bookkeeping.
//!
//! The scene always holds the floor. The model slot starts empty and is
//! filled once the asynchronous load completes; a failed load simply leaves
//! it empty and the viewer keeps rendering what it has.

use std::mem;

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        model::{DrawModel, DrawShadow, Model},
        scene_graph::{NodeId, SceneGraph},
        transform::Transform,
    },
    resources::{
        animation::{AnimationClip, Animator},
        mk_floor_model,
    },
};

/// Target bounding-box diagonal after normalization.
pub const TARGET_SIZE: f32 = 2.0;
/// Floor quad edge length.
pub const FLOOR_SIZE: f32 = 20.0;

/// A fully uploaded model: GPU meshes, the scene graph posing them and one
/// instance buffer per mesh node holding that node's world transform.
pub struct LoadedModel {
    pub model: Model,
    pub graph: SceneGraph,
    pub clips: Vec<AnimationClip>,
    node_buffers: Vec<(NodeId, wgpu::Buffer)>,
}

impl LoadedModel {
    pub fn new(
        device: &wgpu::Device,
        model: Model,
        graph: SceneGraph,
        clips: Vec<AnimationClip>,
    ) -> Self {
        let node_buffers = graph
            .mesh_nodes()
            .map(|(node, _)| {
                let raw = graph.node(node).world.to_raw();
                let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("node instance buffer"),
                    contents: bytemuck::cast_slice(&[raw]),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                });
                (node, buffer)
            })
            .collect();
        Self {
            model,
            graph,
            clips,
            node_buffers,
        }
    }

    /// Upload the current world transforms into the instance buffers.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue) {
        for (node, buffer) in &self.node_buffers {
            let raw = self.graph.node(*node).world.to_raw();
            queue.write_buffer(buffer, 0, bytemuck::cast_slice(&[raw]));
        }
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    ) {
        for (node, buffer) in &self.node_buffers {
            let Some(mesh_index) = self.graph.node(*node).mesh else {
                continue;
            };
            let mesh = &self.model.meshes[mesh_index];
            let material = &self.model.materials[mesh.material];
            render_pass.set_vertex_buffer(1, buffer.slice(..));
            render_pass.draw_mesh(mesh, material, camera_bind_group, light_bind_group);
        }
    }

    pub fn draw_shadow<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        shadow_bind_group: &'a wgpu::BindGroup,
    ) {
        for (node, buffer) in &self.node_buffers {
            let Some(mesh_index) = self.graph.node(*node).mesh else {
                continue;
            };
            let mesh = &self.model.meshes[mesh_index];
            if !mesh.cast_shadow {
                continue;
            }
            render_pass.set_vertex_buffer(1, buffer.slice(..));
            render_pass.draw_mesh_shadow(mesh, shadow_bind_group);
        }
    }
}

/// The static ground plane with its identity instance buffer.
pub struct Floor {
    model: Model,
    instance_buffer: wgpu::Buffer,
}

impl Floor {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let model = mk_floor_model(FLOOR_SIZE, device, queue, material_layout);
        let raw = Transform::new().to_raw();
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("floor instance buffer"),
            contents: bytemuck::cast_slice(&[raw]),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self {
            model,
            instance_buffer,
        }
    }

    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        camera_bind_group: &'a wgpu::BindGroup,
        light_bind_group: &'a wgpu::BindGroup,
    ) {
        render_pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        for mesh in &self.model.meshes {
            let material = &self.model.materials[mesh.material];
            render_pass.draw_mesh(mesh, material, camera_bind_group, light_bind_group);
        }
    }
}

/// Everything the render loop draws and advances.
pub struct Scene {
    pub floor: Floor,
    pub model: Option<LoadedModel>,
    pub animator: Option<Animator>,
}

impl Scene {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        material_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            floor: Floor::new(device, queue, material_layout),
            model: None,
            animator: None,
        }
    }

    /// Place a freshly loaded model: normalize its size, center it at the
    /// origin and start its animation clips.
    pub fn install_model(&mut self, queue: &wgpu::Queue, mut loaded: LoadedModel) {
        let mesh_bounds = loaded.model.mesh_bounds();
        if let Some(scale) = loaded.graph.normalize(&mesh_bounds, TARGET_SIZE) {
            log::info!("model normalized with scale factor {scale}");
        }
        loaded.write_to_buffers(queue);

        let clips = mem::take(&mut loaded.clips);
        self.animator = Animator::from_clips(clips);
        match &self.animator {
            Some(animator) => {
                log::info!("playing {} animation clip(s)", animator.active_clips().len())
            }
            None => log::info!("model carries no animation clips"),
        }
        self.model = Some(loaded);
    }

    /// Advance animation by `dt` and upload the new node transforms.
    pub fn advance(&mut self, dt: instant::Duration, queue: &wgpu::Queue) {
        let (Some(animator), Some(model)) = (&mut self.animator, &mut self.model) else {
            return;
        };
        animator.update(dt, &mut model.graph);
        model.write_to_buffers(queue);
    }
}
