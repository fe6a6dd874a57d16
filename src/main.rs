use std::sync::Arc;
use std::time::Instant;

use anyhow::Context as _;
use winit::{
    event::*,
    event_loop::EventLoop,
    keyboard::PhysicalKey,
    window::{CursorGrabMode, Window},
};

use flyscene::{
    assets, logging, ui,
    config::SceneConfig,
    controller::{FrameUpdater, InputEvent},
    view::{GpuContext, RenderState, UiFrame},
};

struct App {
    window: Arc<Window>,
    gpu: GpuContext,
    render_state: RenderState,

    // egui
    egui_state: egui_winit::State,
    egui_ctx: egui::Context,

    // Scene state
    frame: FrameUpdater,

    // Frame timing
    last_frame_time: Instant,
    stats: ui::HudStats,
    frame_count: u32,
    fps_timer: f32,
}

impl App {
    async fn new(window: Arc<Window>, config: &SceneConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();
        let gpu = GpuContext::new_native(window.clone(), size.width, size.height)
            .await
            .context("GPU init failed")?;
        let render_state = RenderState::new(&gpu, config.background);

        let egui_ctx = egui::Context::default();
        let egui_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            None,
            None,
            None,
        );

        let frame = FrameUpdater::new(config, size.width, size.height);
        assets::load_models(&config.models, &frame.assets().sender());
        if let Some(video) = &config.billboard.video {
            tracing::info!(%video, "no video decoder on native, billboard stays untextured");
        }

        Ok(Self {
            window,
            gpu,
            render_state,
            egui_state,
            egui_ctx,
            frame,
            last_frame_time: Instant::now(),
            stats: ui::HudStats::default(),
            frame_count: 0,
            fps_timer: 0.0,
        })
    }

    fn set_pointer_lock(&mut self, locked: bool) {
        if locked {
            let grabbed = self
                .window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined));
            if let Err(e) = grabbed {
                tracing::warn!("pointer lock unavailable: {e}");
                return;
            }
        } else {
            if let Err(e) = self.window.set_cursor_grab(CursorGrabMode::None) {
                tracing::debug!("cursor release failed: {e}");
            }
        }
        self.window.set_cursor_visible(!locked);
        self.frame.handle_event(&InputEvent::PointerLockChanged { locked });
        tracing::info!(locked, "look mode changed");
    }

    fn input(&mut self, event: &WindowEvent) -> bool {
        // egui only sees the mouse while the pointer is free
        if !self.frame.input.is_engaged()
            && self.egui_state.on_window_event(self.window.as_ref(), event).consumed
        {
            return true;
        }

        match event {
            WindowEvent::KeyboardInput { event: KeyEvent { state, physical_key: PhysicalKey::Code(code), .. }, .. } => {
                let code = format!("{code:?}");
                match state {
                    ElementState::Pressed => {
                        if self.frame.input.bindings().is_escape(&code) {
                            self.set_pointer_lock(false);
                        } else {
                            self.frame.handle_event(&InputEvent::KeyDown(code));
                        }
                    }
                    ElementState::Released => {
                        self.frame.handle_event(&InputEvent::KeyUp(code));
                    }
                }
                true
            }
            WindowEvent::MouseInput { state: ElementState::Pressed, button: MouseButton::Left, .. } => {
                if !self.frame.input.is_engaged() {
                    self.set_pointer_lock(true);
                }
                true
            }
            WindowEvent::Focused(false) => {
                self.frame.handle_event(&InputEvent::FocusLost);
                if self.frame.input.is_engaged() {
                    self.set_pointer_lock(false);
                }
                true
            }
            WindowEvent::Occluded(occluded) => {
                self.frame.handle_event(&InputEvent::VisibilityChanged { visible: !occluded });
                true
            }
            _ => false,
        }
    }

    fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if self.gpu.resize(new_size.width, new_size.height) {
            self.frame.camera.set_aspect(new_size.width, new_size.height);
            tracing::debug!(width = new_size.width, height = new_size.height, "resized");
        }
    }

    fn update(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.stats.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }

        self.frame.update();
        self.stats.record_video(&mut self.frame);
    }

    fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        let raw_input = self.egui_state.take_egui_input(&self.window);
        let output = ui::build_ui(&self.egui_ctx, raw_input, &self.frame, &self.stats);
        self.egui_state.handle_platform_output(&self.window, output.platform_output);

        let ui_frame = UiFrame {
            primitives: self.egui_ctx.tessellate(output.shapes, output.pixels_per_point),
            textures_delta: output.textures_delta,
            pixels_per_point: output.pixels_per_point,
        };
        self.render_state.draw_frame(&self.gpu, ui_frame)
    }
}

#[allow(deprecated)]
fn main() -> anyhow::Result<()> {
    logging::init();
    let config = SceneConfig::from_env();

    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_attributes = Window::default_attributes()
        .with_title("flyscene")
        .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));
    let window = Arc::new(
        event_loop
            .create_window(window_attributes)
            .context("failed to create window")?,
    );

    let mut app = pollster::block_on(App::new(window, &config))?;
    tracing::info!(models = config.models.len(), "scene ready");

    event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent {
                ref event,
                window_id,
            } if window_id == app.window.id() => {
                if !app.input(event) {
                    match event {
                        WindowEvent::CloseRequested => elwt.exit(),
                        WindowEvent::Resized(physical_size) => {
                            app.resize(*physical_size);
                        }
                        WindowEvent::RedrawRequested => {
                            let now = Instant::now();
                            let dt = (now - app.last_frame_time).as_secs_f32();
                            app.last_frame_time = now;

                            app.update(dt);

                            match app.render() {
                                Ok(_) => {}
                                Err(wgpu::SurfaceError::OutOfMemory) => {
                                    tracing::error!("GPU out of memory, exiting");
                                    elwt.exit();
                                }
                                Err(e) => tracing::warn!("dropped frame: {e:?}"),
                            }
                        }
                        _ => {}
                    }
                }
            }
            Event::DeviceEvent { event: DeviceEvent::MouseMotion { delta }, .. } => {
                app.frame.handle_event(&InputEvent::MouseMove { dx: delta.0 as f32, dy: delta.1 as f32 });
            }
            Event::AboutToWait => {
                app.window.request_redraw();
            }
            _ => {}
        }
    })?;

    Ok(())
}
