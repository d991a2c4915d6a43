use std::collections::HashMap;

use wgpu::util::DeviceExt;
use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::{ConfigChange, SceneConfig};
use crate::core::{DisplayContext, GeometryHandle, GpuContext, GraphicsBackend, MaterialHandle};
use crate::error::{Result, SceneError};
use crate::geometry::MeshData;
use crate::material::Material;
use crate::overlay::{Overlay, PaintJob};
use crate::scene::SceneState;
use crate::types::{CameraUniform, LightsUniform, MaterialUniform, ModelUniform, Vertex};

/// Edge overlay sits just outside the surface so it wins the depth test
const WIRE_SCALE: f32 = 1.002;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.06,
    g: 0.06,
    b: 0.08,
    a: 1.0,
};

enum RenderTarget {
    Surface {
        surface: wgpu::Surface<'static>,
        config: wgpu::SurfaceConfiguration,
    },
    Offscreen {
        texture: wgpu::Texture,
    },
}

struct GpuMesh {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    edge_buffer: wgpu::Buffer,
    edge_count: u32,
}

struct GpuMaterial {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    wireframe: bool,
}

/// Bind group plus the uniform buffer behind it
struct UniformBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// wgpu implementation of the graphics boundary
pub struct WgpuBackend {
    gpu: GpuContext,
    target: RenderTarget,
    size: DisplayContext,
    depth_view: wgpu::TextureView,
    pipeline: wgpu::RenderPipeline,
    wire_pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    lights_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    model: UniformBinding,
    wire_model: UniformBinding,
    wire_material: UniformBinding,
    material_layout: wgpu::BindGroupLayout,
    meshes: HashMap<GeometryHandle, GpuMesh>,
    materials: HashMap<MaterialHandle, GpuMaterial>,
    next_handle: u64,
    overlay: Option<Overlay>,
    overlay_job: Option<PaintJob>,
}

impl WgpuBackend {
    /// Render into a window surface, optionally with the control panel
    pub fn for_window(
        gpu: GpuContext,
        surface: wgpu::Surface<'static>,
        window: &Window,
        show_ui: bool,
    ) -> Result<Self> {
        let size = window.inner_size();
        let display = DisplayContext::new(size.width.max(1), size.height.max(1));
        let config = Self::create_surface_config(&surface, gpu.adapter(), display)?;
        surface.configure(gpu.device(), &config);

        let format = config.format;
        let overlay = show_ui.then(|| Overlay::new(window, gpu.device(), format));
        log::info!(
            "surface {}x{} {:?}, ui {}",
            display.width,
            display.height,
            format,
            if show_ui { "on" } else { "off" }
        );

        Ok(Self::build(gpu, RenderTarget::Surface { surface, config }, format, display, overlay))
    }

    /// Render into a texture with no window attached
    pub fn offscreen(gpu: GpuContext, display: DisplayContext) -> Result<Self> {
        if display.is_empty() {
            return Err(SceneError::MissingMountPoint(format!(
                "offscreen target {}x{}",
                display.width, display.height
            )));
        }
        let texture = Self::create_offscreen_texture(gpu.device(), display);
        log::info!("offscreen target {}x{}", display.width, display.height);
        Ok(Self::build(
            gpu,
            RenderTarget::Offscreen { texture },
            OFFSCREEN_FORMAT,
            display,
            None,
        ))
    }

    fn build(
        gpu: GpuContext,
        target: RenderTarget,
        format: wgpu::TextureFormat,
        size: DisplayContext,
        overlay: Option<Overlay>,
    ) -> Self {
        let device = gpu.device();

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame_bind_group_layout"),
            entries: &[
                Self::uniform_entry(0, wgpu::ShaderStages::VERTEX_FRAGMENT),
                Self::uniform_entry(1, wgpu::ShaderStages::FRAGMENT),
            ],
        });
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("material_bind_group_layout"),
            entries: &[Self::uniform_entry(0, wgpu::ShaderStages::FRAGMENT)],
        });
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("model_bind_group_layout"),
            entries: &[Self::uniform_entry(0, wgpu::ShaderStages::VERTEX)],
        });

        let camera_buffer = Self::create_uniform_buffer::<CameraUniform>(device, "Camera Buffer");
        let lights_buffer = Self::create_uniform_buffer::<LightsUniform>(device, "Lights Buffer");

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame_bind_group"),
            layout: &frame_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: lights_buffer.as_entire_binding(),
                },
            ],
        });
        let model = Self::create_binding::<ModelUniform>(device, &model_layout, "Model");
        let wire_model = Self::create_binding::<ModelUniform>(device, &model_layout, "Wire Model");
        let wire_material = Self::create_binding::<MaterialUniform>(device, &material_layout, "Wire Material");
        gpu.queue().write_buffer(
            &wire_material.buffer,
            0,
            bytemuck::cast_slice(&[Material::wire_uniform()]),
        );

        let layouts = [&frame_layout, &material_layout, &model_layout];
        let pipeline = Self::create_mesh_pipeline(device, format, &layouts, wgpu::PrimitiveTopology::TriangleList);
        let wire_pipeline = Self::create_mesh_pipeline(device, format, &layouts, wgpu::PrimitiveTopology::LineList);
        let depth_view = Self::create_depth_view(device, size);

        Self {
            gpu,
            target,
            size,
            depth_view,
            pipeline,
            wire_pipeline,
            camera_buffer,
            lights_buffer,
            frame_bind_group,
            model,
            wire_model,
            wire_material,
            material_layout,
            meshes: HashMap::new(),
            materials: HashMap::new(),
            next_handle: 0,
            overlay,
            overlay_job: None,
        }
    }

    /// Forward a window event to the overlay; true if the UI consumed it
    pub fn overlay_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        match &mut self.overlay {
            Some(overlay) => overlay.on_window_event(window, event),
            None => false,
        }
    }

    /// Run the control panel for the coming frame
    pub fn prepare_overlay(&mut self, window: &Window, config: &SceneConfig, fps: f32) -> Vec<ConfigChange> {
        let Some(overlay) = &mut self.overlay else {
            return Vec::new();
        };
        overlay.set_fps(fps);
        let (changes, mut job) = overlay.run(window, config);
        // A skipped frame never painted its job; its texture uploads still apply
        if let Some(pending) = self.overlay_job.take() {
            job.carry_textures(pending);
        }
        self.overlay_job = Some(job);
        changes
    }

    fn uniform_entry(binding: u32, visibility: wgpu::ShaderStages) -> wgpu::BindGroupLayoutEntry {
        wgpu::BindGroupLayoutEntry {
            binding,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }
    }

    fn create_uniform_buffer<T>(device: &wgpu::Device, label: &str) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: std::mem::size_of::<T>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_binding<T>(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str) -> UniformBinding {
        let buffer = Self::create_uniform_buffer::<T>(device, &format!("{} Buffer", label));
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });
        UniformBinding { buffer, bind_group }
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: DisplayContext,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| SceneError::MissingMountPoint("surface reports no formats".into()))?;

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps
                .present_modes
                .first()
                .copied()
                .unwrap_or(wgpu::PresentMode::Fifo),
            alpha_mode: surface_caps
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_offscreen_texture(device: &wgpu::Device, size: DisplayContext) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Offscreen Target"),
            size: wgpu::Extent3d {
                width: size.width,
                height: size.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn create_depth_view(device: &wgpu::Device, size: DisplayContext) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: size.width.max(1),
                height: size.height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    fn create_mesh_pipeline(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layouts: &[&wgpu::BindGroupLayout],
        topology: wgpu::PrimitiveTopology,
    ) -> wgpu::RenderPipeline {
        let lines = topology == wgpu::PrimitiveTopology::LineList;
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("mesh.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: layouts,
            push_constant_ranges: &[],
        });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(if lines { "Wire Pipeline" } else { "Mesh Pipeline" }),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: if lines { None } else { Some(wgpu::Face::Back) },
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn allocate_handle(&mut self) -> u64 {
        let id = self.next_handle;
        self.next_handle += 1;
        id
    }

    /// Current frame's color target, or None when the frame should be skipped
    fn acquire(&self) -> Result<Option<(Option<wgpu::SurfaceTexture>, wgpu::TextureView)>> {
        match &self.target {
            RenderTarget::Offscreen { texture } => {
                let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
                Ok(Some((None, view)))
            }
            RenderTarget::Surface { surface, config } => match surface.get_current_texture() {
                Ok(frame) => {
                    let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());
                    Ok(Some((Some(frame), view)))
                }
                Err(e @ (wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                    log::warn!("surface {}, reconfiguring", e);
                    surface.configure(self.gpu.device(), config);
                    Ok(None)
                }
                Err(wgpu::SurfaceError::Timeout) => {
                    log::warn!("surface acquire timed out, skipping frame");
                    Ok(None)
                }
                Err(e) => Err(e.into()),
            },
        }
    }
}

impl GraphicsBackend for WgpuBackend {
    fn create_geometry(&mut self, mesh: &MeshData) -> Result<GeometryHandle> {
        let device = self.gpu.device();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let edges = mesh.edge_indices();
        let edge_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Edge Index Buffer"),
            contents: bytemuck::cast_slice(&edges),
            usage: wgpu::BufferUsages::INDEX,
        });

        let handle = GeometryHandle(self.allocate_handle());
        self.meshes.insert(
            handle,
            GpuMesh {
                vertex_buffer,
                index_buffer,
                index_count: mesh.indices.len() as u32,
                edge_buffer,
                edge_count: edges.len() as u32,
            },
        );
        Ok(handle)
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialHandle> {
        let device = self.gpu.device();
        let uniform: MaterialUniform = material.to_uniform();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Material Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("material_bind_group"),
            layout: &self.material_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
        });

        let handle = MaterialHandle(self.allocate_handle());
        self.materials.insert(
            handle,
            GpuMaterial {
                buffer,
                bind_group,
                wireframe: material.wireframe,
            },
        );
        Ok(handle)
    }

    fn update_material(&mut self, handle: MaterialHandle, material: &Material) -> Result<()> {
        let gpu_material = self.materials.get_mut(&handle).ok_or(SceneError::UnknownHandle {
            kind: "material",
            id: handle.0,
        })?;
        gpu_material.wireframe = material.wireframe;
        self.gpu.queue().write_buffer(
            &gpu_material.buffer,
            0,
            bytemuck::cast_slice(&[material.to_uniform()]),
        );
        Ok(())
    }

    fn release_geometry(&mut self, handle: GeometryHandle) {
        if let Some(mesh) = self.meshes.remove(&handle) {
            mesh.vertex_buffer.destroy();
            mesh.index_buffer.destroy();
            mesh.edge_buffer.destroy();
        }
    }

    fn release_material(&mut self, handle: MaterialHandle) {
        if let Some(material) = self.materials.remove(&handle) {
            material.buffer.destroy();
        }
    }

    fn resize(&mut self, display: DisplayContext) {
        if display.is_empty() || display == self.size {
            return;
        }
        self.size = display;

        let device = self.gpu.device();
        match &mut self.target {
            RenderTarget::Surface { surface, config } => {
                config.width = display.width;
                config.height = display.height;
                surface.configure(device, config);
            }
            RenderTarget::Offscreen { texture } => {
                texture.destroy();
                *texture = Self::create_offscreen_texture(device, display);
            }
        }
        self.depth_view = Self::create_depth_view(device, display);
        log::debug!("resized to {}x{}", display.width, display.height);
    }

    fn render(&mut self, state: &SceneState) -> Result<()> {
        let Some((frame, view)) = self.acquire()? else {
            return Ok(());
        };

        let queue = self.gpu.queue();
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[state.camera.to_uniform()]),
        );
        queue.write_buffer(
            &self.lights_buffer,
            0,
            bytemuck::cast_slice(&[state.lights.to_uniform()]),
        );

        let draw = match &state.object {
            Some(object) => {
                queue.write_buffer(
                    &self.model.buffer,
                    0,
                    bytemuck::cast_slice(&[object.transform.to_uniform()]),
                );
                queue.write_buffer(
                    &self.wire_model.buffer,
                    0,
                    bytemuck::cast_slice(&[object.transform.scaled_uniform(WIRE_SCALE)]),
                );
                let mesh = self.meshes.get(&object.geometry_handle).ok_or(SceneError::UnknownHandle {
                    kind: "geometry",
                    id: object.geometry_handle.0,
                })?;
                let material = self.materials.get(&object.material_handle).ok_or(SceneError::UnknownHandle {
                    kind: "material",
                    id: object.material_handle.0,
                })?;
                Some((mesh, material))
            }
            None => None,
        };

        let device = self.gpu.device();
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if let Some((mesh, material)) = draw {
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &self.frame_bind_group, &[]);
                pass.set_bind_group(1, &material.bind_group, &[]);
                pass.set_bind_group(2, &self.model.bind_group, &[]);
                pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
                pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..mesh.index_count, 0, 0..1);

                if material.wireframe && mesh.edge_count > 0 {
                    pass.set_pipeline(&self.wire_pipeline);
                    pass.set_bind_group(1, &self.wire_material.bind_group, &[]);
                    pass.set_bind_group(2, &self.wire_model.bind_group, &[]);
                    pass.set_index_buffer(mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..mesh.edge_count, 0, 0..1);
                }
            }
        }

        let mut commands = Vec::new();
        if let (Some(overlay), Some(job)) = (&mut self.overlay, self.overlay_job.take()) {
            commands = overlay.paint(device, queue, &mut encoder, &view, job);
        }
        commands.push(encoder.finish());
        queue.submit(commands);

        if let Some(frame) = frame {
            frame.present();
        }
        Ok(())
    }

    fn dispose_overlay(&mut self) {
        if self.overlay.take().is_some() {
            self.overlay_job = None;
            log::debug!("overlay disposed");
        }
    }
}
