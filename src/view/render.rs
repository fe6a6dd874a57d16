use wgpu::*;

use super::GpuContext;

/// Egui output of one frame, ready to paint
pub struct UiFrame {
    pub primitives: Vec<egui::ClippedPrimitive>,
    pub textures_delta: egui::TexturesDelta,
    pub pixels_per_point: f32,
}

/// Clears the surface to the scene background and paints the overlay on top
pub struct RenderState {
    pub clear_color: Color,
    pub egui_renderer: egui_wgpu::Renderer,
}

pub fn background_color(rgb: [u8; 3]) -> Color {
    let [r, g, b] = rgb.map(|c| c as f64 / 255.0);
    Color { r, g, b, a: 1.0 }
}

impl RenderState {
    pub fn new(gpu: &GpuContext, background: [u8; 3]) -> Self {
        Self {
            clear_color: background_color(background),
            egui_renderer: egui_wgpu::Renderer::new(
                gpu.device.as_ref(),
                gpu.format,
                egui_wgpu::RendererOptions::default(),
            ),
        }
    }

    pub fn draw_frame(&mut self, gpu: &GpuContext, ui: UiFrame) -> Result<(), SurfaceError> {
        let device = gpu.device.as_ref();
        let queue = gpu.queue.as_ref();

        let frame = match gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(SurfaceError::Lost | SurfaceError::Outdated) => {
                gpu.reconfigure();
                gpu.surface.get_current_texture()?
            }
            Err(e) => return Err(e),
        };

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: ui.pixels_per_point,
        };

        let view = frame.texture.create_view(&TextureViewDescriptor::default());
        let mut encoder = device.create_command_encoder(&CommandEncoderDescriptor {
            label: Some("encoder"),
        });

        for (id, image_delta) in &ui.textures_delta.set {
            self.egui_renderer.update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer
            .update_buffers(device, queue, &mut encoder, &ui.primitives, &screen_descriptor);

        {
            let pass = encoder.begin_render_pass(&RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: Operations {
                        load: LoadOp::Clear(self.clear_color),
                        store: StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.egui_renderer
                .render(&mut pass.forget_lifetime(), &ui.primitives, &screen_descriptor);
        }

        for id in &ui.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }

        queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }
}
