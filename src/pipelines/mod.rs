pub mod basic;
pub mod light;
pub mod shadow;

/// All render pipelines of the viewer, created once at startup.
pub struct Pipelines {
    pub basic: wgpu::RenderPipeline,
    pub shadow: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        material_bind_group_layout: &wgpu::BindGroupLayout,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        light_bind_group_layout: &wgpu::BindGroupLayout,
        shadow_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            basic: basic::mk_basic_pipeline(
                device,
                config,
                material_bind_group_layout,
                camera_bind_group_layout,
                light_bind_group_layout,
            ),
            shadow: shadow::mk_shadow_pipeline(device, shadow_bind_group_layout),
        }
    }
}
