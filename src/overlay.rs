use winit::event::WindowEvent;
use winit::window::Window;

use crate::config::{ConfigChange, SceneConfig};
use crate::controls;

/// Tessellated UI waiting to be painted over the next frame
pub struct PaintJob {
    primitives: Vec<egui::ClippedPrimitive>,
    textures: egui::TexturesDelta,
    screen: egui_wgpu::ScreenDescriptor,
}

impl PaintJob {
    /// Keep the texture updates of a job that was never painted, ahead of ours
    pub fn carry_textures(&mut self, earlier: PaintJob) {
        let mut textures = earlier.textures;
        textures.append(std::mem::take(&mut self.textures));
        self.textures = textures;
    }
}

/// egui control panel drawn on top of the scene
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
    fps: f32,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self {
            ctx,
            state,
            renderer,
            fps: 0.0,
        }
    }

    /// Feed a window event to egui; true if egui consumed it
    pub fn on_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    pub fn set_fps(&mut self, fps: f32) {
        self.fps = fps;
    }

    /// Run the UI for this frame, returning the edits made in it
    pub fn run(&mut self, window: &Window, config: &SceneConfig) -> (Vec<ConfigChange>, PaintJob) {
        let raw_input = self.state.take_egui_input(window);
        let fps = self.fps;
        let mut changes = Vec::new();

        let full_output = self.ctx.run(raw_input, |ctx| {
            changes = controls::show_panel(ctx, config);

            egui::Area::new(egui::Id::new("fps"))
                .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-10.0, 10.0))
                .show(ctx, |ui| {
                    ui.label(
                        egui::RichText::new(format!("{:.0} FPS", fps))
                            .size(14.0)
                            .color(egui::Color32::from_rgb(74, 158, 255)),
                    );
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let size = window.inner_size();
        let job = PaintJob {
            primitives,
            textures: full_output.textures_delta,
            screen: egui_wgpu::ScreenDescriptor {
                size_in_pixels: [size.width, size.height],
                pixels_per_point: full_output.pixels_per_point,
            },
        };
        (changes, job)
    }

    /// Upload textures and buffers and draw `job` over `view`
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        job: PaintJob,
    ) -> Vec<wgpu::CommandBuffer> {
        for (id, image_delta) in &job.textures.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let extra = self
            .renderer
            .update_buffers(device, queue, encoder, &job.primitives, &job.screen);

        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                        depth_slice: None,
                    })],
                    depth_stencil_attachment: None,
                    occlusion_query_set: None,
                    timestamp_writes: None,
                })
                .forget_lifetime();

            self.renderer.render(&mut pass, &job.primitives, &job.screen);
        }

        for id in &job.textures.free {
            self.renderer.free_texture(id);
        }
        extra
    }
}
