//! Light rig and its GPU resources.
//!
//! The rig is fixed: one ambient term, one shadow-casting directional sun and
//! one distant point light. Everything lives in a single uniform written once
//! at startup. The sun's view-projection doubles as the shadow pass camera.

use cgmath::{ortho, EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};
use wgpu::util::DeviceExt;

use crate::{camera::OPENGL_TO_WGPU_MATRIX, data_structures::texture::Texture};

/// Shadow map edge length in texels.
pub const SHADOW_MAP_SIZE: u32 = 1024;

/// Near and far planes of the sun's shadow frustum.
const SHADOW_NEAR: f32 = 1.0;
const SHADOW_FAR: f32 = 50.0;

/// Half-extent of the orthographic shadow volume around the origin. Generous
/// enough for a normalized model plus the floor area it shades.
const SHADOW_EXTENT: f32 = 10.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightsUniform {
    light_view_proj: [[f32; 4]; 4],
    ambient_color: [f32; 3],
    ambient_intensity: f32,
    sun_direction: [f32; 3],
    sun_intensity: f32,
    sun_color: [f32; 3],
    _pad0: f32,
    point_position: [f32; 3],
    point_intensity: f32,
    point_color: [f32; 3],
    point_range: f32,
}

impl LightsUniform {
    /// The viewer's light rig: white ambient at half strength, a strong white
    /// sun shining from above and a red point light far out in the corner.
    pub fn viewer_defaults() -> Self {
        let sun_position = Point3::new(5.0, 10.0, 7.5);
        let view = Matrix4::look_at_rh(sun_position, Point3::origin(), Vector3::unit_y());
        let proj = ortho(
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            -SHADOW_EXTENT,
            SHADOW_EXTENT,
            SHADOW_NEAR,
            SHADOW_FAR,
        );
        let sun_direction = (Point3::origin() - sun_position).normalize();

        Self {
            light_view_proj: (OPENGL_TO_WGPU_MATRIX * proj * view).into(),
            ambient_color: [1.0, 1.0, 1.0],
            ambient_intensity: 0.5,
            sun_direction: sun_direction.into(),
            sun_intensity: 2.0,
            sun_color: [1.0, 1.0, 1.0],
            _pad0: 0.0,
            point_position: [50.0, 50.0, 50.0],
            point_intensity: 1.0,
            point_color: [1.0, 0.0, 0.0],
            point_range: 100.0,
        }
    }
}

/// GPU resources of the light rig: the uniform buffer, the shadow map and the
/// two bind groups built from them. The lit pass binds the uniform together
/// with the shadow map for sampling; the shadow pass binds only the uniform's
/// view-projection.
pub struct LightResources {
    pub uniform: LightsUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
    pub shadow_map: Texture,
    pub shadow_bind_group: wgpu::BindGroup,
    pub shadow_bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform = LightsUniform::viewer_defaults();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Lights Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let shadow_map = Texture::create_shadow_map(device, SHADOW_MAP_SIZE, "sun shadow map");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Depth,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
            label: Some("lights_bind_group_layout"),
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(
                        shadow_map.sampler.as_ref().unwrap(),
                    ),
                },
            ],
            label: Some("lights_bind_group"),
        });

        let shadow_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("shadow_bind_group_layout"),
            });
        let shadow_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &shadow_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("shadow_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
            shadow_map,
            shadow_bind_group,
            shadow_bind_group_layout,
        }
    }
}
