//! First-person fly camera over a small animated scene.
//!
//! [`controller::FrameUpdater`] owns the camera, the input tracker and every
//! animated object; the host calls its `update` once per display frame and
//! forwards platform input through `handle_event`.

pub mod logging;
pub mod config;
pub mod assets;
pub mod ui;

// MVC Architecture
pub mod model;
pub mod view;
pub mod controller;

#[cfg(target_arch = "wasm32")]
mod web {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::{prelude::wasm_bindgen, JsCast, JsValue};
    use web_sys::{
        Document, Event, HtmlCanvasElement, HtmlElement, HtmlVideoElement, KeyboardEvent, MouseEvent, Window,
    };

    use crate::config::SceneConfig;
    use crate::controller::input::wasm::{keyboard_event_to_input, mouse_move_to_input};
    use crate::controller::{FrameUpdater, InputEvent};
    use crate::model::{has_frame_data, VideoFeed};
    use crate::view::{GpuContext, RenderState, UiFrame};
    use crate::{assets, logging, ui};
    use crate::ui::HudStats;

    #[wasm_bindgen(start)]
    pub async fn start() -> Result<(), JsValue> {
        logging::init();
        let (window, document, canvas) = init_canvas(800, 600)?;
        setup_app(&window, &document, &canvas).await
    }

    /// Main application setup for WASM
    async fn setup_app(
        window: &Window,
        document: &Document,
        canvas: &HtmlCanvasElement,
    ) -> Result<(), JsValue> {
        let config = SceneConfig::default();

        let mut gpu = GpuContext::new(canvas, canvas.width(), canvas.height())
            .await
            .map_err(|e| js_error(format!("GPU init failed: {e}")))?;
        let mut render_state = RenderState::new(&gpu, config.background);

        let frame = Rc::new(RefCell::new(FrameUpdater::new(
            &config,
            gpu.config.width,
            gpu.config.height,
        )));
        assets::load_models(&config.models, &frame.borrow().assets().sender());

        if let Some(src) = &config.billboard.video {
            match create_video(document, src) {
                Ok(video) => frame.borrow_mut().set_video(Box::new(HtmlVideoFeed(video))),
                Err(e) => tracing::warn!(%src, "video unavailable: {e:?}"),
            }
        }

        setup_input_listeners(document, window, canvas, frame.clone())?;

        let egui_ctx = egui::Context::default();
        let mut stats = HudStats::default();
        let performance = window.performance();
        let mut last_time = performance.as_ref().map(|p| p.now()).unwrap_or(0.0);

        let window_for_loop = window.clone();
        let f = RcCellCallback::new(window.clone(), move || {
            let now = performance.as_ref().map(|p| p.now()).unwrap_or(last_time);
            let dt = ((now - last_time) / 1000.0).clamp(0.0, 0.1) as f32;
            last_time = now;

            // Resize handling
            if let (Ok(w), Ok(h)) = (window_for_loop.inner_width(), window_for_loop.inner_height()) {
                let nw = w.as_f64().unwrap_or(800.0) as u32;
                let nh = h.as_f64().unwrap_or(600.0) as u32;
                if gpu.resize(nw, nh) {
                    frame.borrow_mut().camera.set_aspect(nw, nh);
                }
            }

            frame.borrow_mut().update();
            stats.record_video(&mut frame.borrow_mut());

            let dpr = window_for_loop.device_pixel_ratio() as f32;
            let mut raw_input = egui::RawInput::default();
            raw_input.time = Some(now / 1000.0);
            raw_input.screen_rect = Some(egui::Rect::from_min_size(
                egui::Pos2::ZERO,
                egui::vec2(gpu.config.width as f32 / dpr, gpu.config.height as f32 / dpr),
            ));
            egui_ctx.set_pixels_per_point(dpr);

            stats.fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
            let output = ui::build_ui(&egui_ctx, raw_input, &frame.borrow(), &stats);
            let ui_frame = UiFrame {
                primitives: egui_ctx.tessellate(output.shapes, output.pixels_per_point),
                textures_delta: output.textures_delta,
                pixels_per_point: output.pixels_per_point,
            };
            if let Err(e) = render_state.draw_frame(&gpu, ui_frame) {
                tracing::warn!("dropped frame: {e:?}");
            }
        });
        f.start()?;

        Ok(())
    }

    /// Readiness of a looping `<video>` element that feeds the billboard.
    struct HtmlVideoFeed(HtmlVideoElement);

    impl VideoFeed for HtmlVideoFeed {
        fn has_current_frame(&self) -> bool {
            has_frame_data(self.0.ready_state())
        }
    }

    /// Create a muted, looping, hidden video and start playback.
    fn create_video(document: &Document, src: &str) -> Result<HtmlVideoElement, JsValue> {
        let video = document
            .create_element("video")?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| js_error("failed to create video element"))?;
        video.set_src(src);
        video.set_muted(true);
        video.set_loop(true);
        video.set_autoplay(true);
        video.set_attribute("playsinline", "")?;

        let src_for_log = src.to_string();
        listen(video.as_ref(), "play", move |_e: Event| {
            tracing::info!(src = %src_for_log, "video is playing");
        })?;

        let playback = video.play()?;
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(playback).await {
                tracing::warn!("video playback refused: {e:?}");
            }
        });
        Ok(video)
    }

    /// Register a listener for the lifetime of the page.
    fn listen<E: JsCast + 'static>(
        target: &web_sys::EventTarget,
        name: &str,
        handler: impl FnMut(E) + 'static,
    ) -> Result<(), JsValue> {
        let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(E)>);
        target.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Setup all input event listeners with platform-agnostic abstractions
    fn setup_input_listeners(
        document: &Document,
        window: &Window,
        canvas: &HtmlCanvasElement,
        frame: Rc<RefCell<FrameUpdater>>,
    ) -> Result<(), JsValue> {
        // Keyboard down
        {
            let frame = frame.clone();
            let doc = document.clone();
            listen(document.as_ref(), "keydown", move |e: KeyboardEvent| {
                let mut frame = frame.borrow_mut();
                if frame.input.bindings().is_escape(&e.code()) {
                    doc.exit_pointer_lock();
                    return;
                }
                if frame.input.bindings().is_bound(&e.code()) {
                    e.prevent_default();
                }
                frame.handle_event(&keyboard_event_to_input(&e, true));
            })?;
        }

        // Keyboard up
        {
            let frame = frame.clone();
            listen(document.as_ref(), "keyup", move |e: KeyboardEvent| {
                frame.borrow_mut().handle_event(&keyboard_event_to_input(&e, false));
            })?;
        }

        // Focus loss - clear all intents
        {
            let frame = frame.clone();
            listen(window.as_ref(), "blur", move |_e: Event| {
                frame.borrow_mut().handle_event(&InputEvent::FocusLost);
            })?;
        }

        // Visibility change - clear all intents
        {
            let frame = frame.clone();
            let doc = document.clone();
            listen(document.as_ref(), "visibilitychange", move |_e: Event| {
                let visible = !doc.hidden();
                frame.borrow_mut().handle_event(&InputEvent::VisibilityChanged { visible });
            })?;
        }

        // Pointer lock change
        {
            let frame = frame.clone();
            let doc = document.clone();
            listen(document.as_ref(), "pointerlockchange", move |_e: Event| {
                let locked = doc.pointer_lock_element().is_some();
                tracing::info!(locked, "look mode changed");
                frame.borrow_mut().handle_event(&InputEvent::PointerLockChanged { locked });
            })?;
        }

        // Canvas click to enter pointer lock
        {
            let canvas_click = canvas.clone();
            listen(canvas.as_ref(), "click", move |_e: MouseEvent| {
                if let Ok(html_el) = canvas_click.clone().dyn_into::<HtmlElement>() {
                    html_el.request_pointer_lock();
                }
            })?;
        }

        // Mouse move
        {
            let frame = frame.clone();
            listen(document.as_ref(), "mousemove", move |e: MouseEvent| {
                frame.borrow_mut().handle_event(&mouse_move_to_input(&e));
            })?;
        }

        Ok(())
    }

    fn init_canvas(width: u32, height: u32) -> Result<(Window, Document, HtmlCanvasElement), JsValue> {
        let window = web_sys::window().ok_or(js_error("no global `window`"))?;
        let document = window.document().ok_or(js_error("no document on window"))?;
        let body = document.body().ok_or(js_error("no body on document"))?;
        let canvas_el = document
            .create_element("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| js_error("failed to create canvas"))?;
        canvas_el.set_width(width);
        canvas_el.set_height(height);
        body.append_child(&canvas_el)?;
        Ok((window, document, canvas_el))
    }

    fn js_error<E: Into<String>>(msg: E) -> JsValue {
        JsValue::from_str(&msg.into())
    }

    /// Re-arms itself with `requestAnimationFrame` after every call.
    struct RcCellCallback {
        inner: Rc<RefCell<Box<dyn FnMut()>>>,
        window: Window,
    }

    impl RcCellCallback {
        fn new(window: Window, f: impl FnMut() + 'static) -> Self {
            Self {
                inner: Rc::new(RefCell::new(Box::new(f))),
                window,
            }
        }

        fn start(self) -> Result<(), JsValue> {
            let inner = self.inner.clone();
            let window = self.window.clone();

            let callback = Rc::new(RefCell::new(None::<Closure<dyn FnMut()>>));
            let callback_clone = callback.clone();

            *callback.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                inner.borrow_mut().as_mut()();

                // Recursively schedule next frame
                if let Some(cb) = callback_clone.borrow().as_ref() {
                    if let Err(e) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                        tracing::error!("requestAnimationFrame failed: {e:?}");
                    }
                }
            }) as Box<dyn FnMut()>));

            if let Some(cb) = callback.borrow().as_ref() {
                self.window.request_animation_frame(cb.as_ref().unchecked_ref())?;
            }

            // Leak the closure to keep it alive
            std::mem::forget(callback);
            Ok(())
        }
    }
}
