use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::{
    camera::{Camera, CameraResources, OrbitController, Projection},
    data_structures::texture,
    pipelines::{light::LightResources, Pipelines},
    resources::texture::standard_material_layout,
};

/// Starting camera pose, slightly above the model looking at the origin.
const CAMERA_POSITION: (f32, f32, f32) = (0.0, 1.0, 4.0);
const CAMERA_FOVY_DEG: f32 = 45.0;
const CAMERA_ZNEAR: f32 = 0.1;
const CAMERA_ZFAR: f32 = 1000.0;

const ORBIT_SENSITIVITY: f32 = 0.08;
const ORBIT_DAMPING: f32 = 8.0;

/// Everything tied to the GPU device: surface, pipelines, camera and light
/// resources, the shared material layout and the depth buffer.
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub light: LightResources,
    pub pipelines: Pipelines,
    pub material_layout: wgpu::BindGroupLayout,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no compatible graphics adapter")?;
        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL exposes a reduced limit set.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface; colors come out darker on a
        // linear format.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let camera = Camera::new(
            cgmath::Point3::from(CAMERA_POSITION),
            cgmath::Point3::new(0.0, 0.0, 0.0),
        );
        let controller = OrbitController::from_view(
            camera.position,
            camera.target,
            ORBIT_SENSITIVITY,
            ORBIT_DAMPING,
        );
        let projection = Projection::new(
            config.width,
            config.height,
            cgmath::Deg(CAMERA_FOVY_DEG),
            CAMERA_ZNEAR,
            CAMERA_ZFAR,
        );
        let camera = CameraResources::new(&device, camera, controller);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let light = LightResources::new(&device);
        let material_layout = standard_material_layout(&device);
        let pipelines = Pipelines::new(
            &device,
            &config,
            &material_layout,
            &camera.bind_group_layout,
            &light.bind_group_layout,
            &light.shadow_bind_group_layout,
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            light,
            pipelines,
            material_layout,
            clear_colour: wgpu::Color::WHITE,
            window,
            depth_texture,
        })
    }
}
