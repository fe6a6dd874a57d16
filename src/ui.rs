use egui::{Context, RichText};

use crate::controller::FrameUpdater;

/// Per-host counters shown next to the scene state
#[derive(Debug, Default)]
pub struct HudStats {
    pub fps: f32,
    /// Ticks on which the billboard's video texture needed a refresh
    pub video_frames: u64,
}

impl HudStats {
    /// Consume the billboard's refresh request for this tick.
    pub fn record_video(&mut self, frame: &mut FrameUpdater) {
        if frame.billboard.take_texture_dirty() {
            self.video_frames += 1;
        }
    }
}

/// Build the overlay and return egui output
pub fn build_ui(egui_ctx: &Context, raw_input: egui::RawInput, frame: &FrameUpdater, stats: &HudStats) -> egui::FullOutput {
    egui_ctx.run(raw_input, |ctx| {
        draw_crosshair(ctx, frame.input.is_engaged());
        draw_debug_window(ctx, frame, stats);
    })
}

fn draw_crosshair(ctx: &Context, engaged: bool) {
    let painter = ctx.layer_painter(egui::LayerId::new(egui::Order::Foreground, egui::Id::new("crosshair")));
    let center = ctx.available_rect().center();
    if !engaged {
        painter.text(
            center,
            egui::Align2::CENTER_CENTER,
            "Click to look around",
            egui::FontId::proportional(16.0),
            egui::Color32::LIGHT_GRAY,
        );
        return;
    }
    let size = 10.0;
    let stroke = egui::Stroke::new(1.0, egui::Color32::WHITE);
    painter.line_segment([center - egui::vec2(size, 0.0), center + egui::vec2(size, 0.0)], stroke);
    painter.line_segment([center - egui::vec2(0.0, size), center + egui::vec2(0.0, size)], stroke);
}

fn draw_debug_window(ctx: &Context, frame: &FrameUpdater, stats: &HudStats) {
    let cam = &frame.camera;
    let billboard = &frame.billboard;

    egui::Window::new("Debug")
        .default_pos([8.0, 8.0])
        .show(ctx, |ui| {
            ui.label(RichText::new(format!("FPS: {:.0}  Tick: {}", stats.fps, frame.ticks())).small());
            ui.label(RichText::new(format!("Pos: x: {:.1} y: {:.1} z: {:.1}", cam.eye.x, cam.eye.y, cam.eye.z)).small());
            ui.label(RichText::new(format!("Yaw: {:.1} Pitch: {:.1}", cam.yaw.to_degrees(), cam.pitch.to_degrees())).small());
            ui.label(RichText::new(format!(
                "Billboard: {:.4} rad at ({:.0}, {:.0}, {:.0})",
                billboard.angle,
                billboard.transform.position.x,
                billboard.transform.position.y,
                billboard.transform.position.z,
            )).small());
            ui.label(RichText::new(format!(
                "Particles: {} drift {:.4}",
                frame.particles.len(),
                frame.particles.transform.rotation.y,
            )).small());
            let video = if frame.has_video() {
                format!("Video: {} refreshes", stats.video_frames)
            } else {
                "Video: no feed".to_string()
            };
            ui.label(RichText::new(video).small());
            ui.separator();
            if frame.models.is_empty() {
                ui.label(RichText::new("Models: none loaded").small());
            }
            for model in frame.models.values() {
                let [r, g, b] = model.color;
                ui.label(
                    RichText::new(format!("{} {:?}: {:.2} rad", model.name, model.axis, model.angle()))
                        .color(egui::Color32::from_rgb(r, g, b))
                        .small(),
                );
            }
            ui.separator();
            ui.label(RichText::new("Controls:").small());
            ui.label(RichText::new("Click - Look around").small());
            ui.label(RichText::new("WASD - Move").small());
            ui.label(RichText::new("Space - Up").small());
            ui.label(RichText::new("Shift - Down").small());
            ui.label(RichText::new("R - Reset camera").small());
            ui.label(RichText::new("Esc - Release mouse").small());
        });
}
