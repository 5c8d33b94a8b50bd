//! DOM wiring: element lookup, listeners, the animation-frame loop and the
//! async GPU/bitmap startup. All state lives in [`GlobeApp`]; this layer only
//! translates browser events into timestamped calls.

#[cfg(target_arch = "wasm32")]
mod imp {
    use std::cell::RefCell;
    use std::rc::Rc;

    use gloo_net::http::Request;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::spawn_local;

    use foundation::Time;
    use runtime::{CancelToken, Frame, FrameLoop, LoopState};
    use scene::{Cursor, GlobeConfig, Viewport};

    use crate::app::GlobeApp;
    use crate::wgpu::{
        WgpuContext, init_wgpu_from_canvas, render_globe, resize_wgpu, set_dot_instances,
    };

    type SharedApp = Rc<RefCell<GlobeApp>>;
    type SharedGpu = Rc<RefCell<Option<WgpuContext>>>;

    struct Listener {
        target: web_sys::EventTarget,
        kind: &'static str,
        closure: Closure<dyn FnMut(web_sys::Event)>,
    }

    impl Listener {
        fn attach<F>(target: &web_sys::EventTarget, kind: &'static str, f: F) -> Result<Self, JsValue>
        where
            F: FnMut(web_sys::Event) + 'static,
        {
            let closure = Closure::wrap(Box::new(f) as Box<dyn FnMut(web_sys::Event)>);
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())?;
            Ok(Self {
                target: target.clone(),
                kind,
                closure,
            })
        }

        fn detach(&self) {
            let _ = self
                .target
                .remove_event_listener_with_callback(self.kind, self.closure.as_ref().unchecked_ref());
        }
    }

    impl Drop for Listener {
        fn drop(&mut self) {
            self.detach();
        }
    }

    pub struct Mounted {
        app: SharedApp,
        token: CancelToken,
        listeners: Vec<Listener>,
        disposed: bool,
    }

    impl Mounted {
        pub fn dot_count(&self) -> usize {
            self.app.borrow().dot_count()
        }

        pub fn is_disposed(&self) -> bool {
            self.disposed
        }

        pub fn dispose(&mut self) {
            if self.disposed {
                return;
            }
            self.disposed = true;
            self.token.cancel();
            self.app.borrow_mut().dispose();
            self.listeners.clear();
            set_cursor(Cursor::Default);
            tracing::info!("globe disposed");
        }
    }

    impl Drop for Mounted {
        fn drop(&mut self) {
            self.dispose();
        }
    }

    fn now() -> Time {
        let ms = web_sys::window()
            .and_then(|w| w.performance())
            .map_or(0.0, |p| p.now());
        Time::from_millis(ms)
    }

    fn set_cursor(cursor: Cursor) {
        let Some(body) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.body())
        else {
            return;
        };
        let _ = body.style().set_property("cursor", cursor.as_css());
    }

    fn apply_cursor(cursor: Option<Cursor>) {
        if let Some(c) = cursor {
            set_cursor(c);
        }
    }

    fn client_pos(ev: &web_sys::Event) -> Option<(f64, f64)> {
        let ev = ev.dyn_ref::<web_sys::MouseEvent>()?;
        Some((f64::from(ev.client_x()), f64::from(ev.client_y())))
    }

    fn window_size(window: &web_sys::Window) -> (f64, f64) {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0);
        (w, h)
    }

    /// Read sizes, update the app and size the canvas drawing buffer.
    fn apply_resize(
        window: &web_sys::Window,
        container: &web_sys::HtmlElement,
        canvas: &web_sys::HtmlCanvasElement,
        app: &SharedApp,
        gpu: &SharedGpu,
    ) {
        let (window_width, window_height) = window_size(window);
        let viewport = Viewport {
            width: f64::from(container.client_width()),
            height: f64::from(container.client_height()),
            window_width,
            device_pixel_ratio: window.device_pixel_ratio(),
        };
        let outcome = app.borrow_mut().resize(viewport, window_height);

        canvas.set_width(outcome.buffer_width);
        canvas.set_height(outcome.buffer_height);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", viewport.width));
        let _ = style.set_property("height", &format!("{}px", viewport.height));

        if let Some(ctx) = gpu.borrow_mut().as_mut() {
            resize_wgpu(ctx, outcome.buffer_width, outcome.buffer_height);
        }
    }

    async fn fetch_bitmap(url: &str) -> Result<Vec<u8>, JsValue> {
        let resp = Request::get(url)
            .send()
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        if !resp.ok() {
            return Err(JsValue::from_str(&format!(
                "map fetch failed: HTTP {}",
                resp.status()
            )));
        }
        resp.binary()
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    fn spawn_gpu_init(canvas: web_sys::HtmlCanvasElement, app: SharedApp, gpu: SharedGpu, token: CancelToken) {
        let scene = *app.borrow().scene();
        spawn_local(async move {
            match init_wgpu_from_canvas(canvas, &scene).await {
                Ok(ctx) => {
                    if token.is_cancelled() {
                        return;
                    }
                    *gpu.borrow_mut() = Some(ctx);
                    app.borrow_mut().mark_instances_dirty();
                }
                Err(err) => {
                    tracing::warn!(error = ?err, "wgpu init failed; globe will not render");
                }
            }
        });
    }

    fn spawn_map_load(app: SharedApp, token: CancelToken) {
        let url = app.borrow().config().map_url.clone();
        spawn_local(async move {
            let bytes = match fetch_bitmap(&url).await {
                Ok(b) => b,
                Err(err) => {
                    tracing::warn!(url = %url, error = ?err, "map bitmap unavailable");
                    return;
                }
            };
            let map = match formats::decode_bitmap(&bytes) {
                Ok(m) => m,
                Err(err) => {
                    tracing::warn!(url = %url, error = %err, "map bitmap could not be decoded");
                    return;
                }
            };
            if token.is_cancelled() {
                return;
            }
            let mut rng = StdRng::seed_from_u64(js_sys::Date::now() as u64);
            app.borrow_mut().set_map(&map, &mut rng);
        });
    }

    fn start_frame_loop(app: SharedApp, gpu: SharedGpu, token: CancelToken) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let clock = app.borrow().frame_clock();

        let body = move |frame: Frame| {
            let (render, cursor) = app.borrow_mut().frame(frame, now());
            apply_cursor(cursor);

            let mut gpu = gpu.borrow_mut();
            let Some(ctx) = gpu.as_mut() else {
                return;
            };
            {
                let mut app = app.borrow_mut();
                if let Some(buffers) = app.take_instance_upload() {
                    set_dot_instances(ctx, buffers);
                }
            }
            if let Err(err) = render_globe(ctx, &render) {
                tracing::warn!(error = ?err, "render failed");
            }
        };
        let mut frame_loop = FrameLoop::new(clock, token, body);

        let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let g = f.clone();
        let raf_window = window.clone();

        *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            if frame_loop.step() == LoopState::Stopped {
                // Release the closure so the loop can be collected.
                let _ = f.borrow_mut().take();
                return;
            }
            if let Some(cb) = f.borrow().as_ref() {
                if let Err(err) = raf_window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                    tracing::warn!(error = ?err, "requestAnimationFrame failed");
                }
            }
        }) as Box<dyn FnMut()>));

        if let Some(cb) = g.borrow().as_ref() {
            window.request_animation_frame(cb.as_ref().unchecked_ref())?;
        }
        Ok(())
    }

    pub fn mount(
        container_id: &str,
        canvas_selector: &str,
        cfg: GlobeConfig,
    ) -> Result<Option<Mounted>, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let Some(container) = document
            .get_element_by_id(container_id)
            .and_then(|e| e.dyn_into::<web_sys::HtmlElement>().ok())
        else {
            tracing::debug!(container_id, "globe container not found");
            return Ok(None);
        };
        let Some(canvas) = document
            .query_selector(canvas_selector)?
            .and_then(|e| e.dyn_into::<web_sys::HtmlCanvasElement>().ok())
        else {
            tracing::debug!(canvas_selector, "globe canvas not found");
            return Ok(None);
        };

        let app: SharedApp = Rc::new(RefCell::new(GlobeApp::new(cfg)));
        let gpu: SharedGpu = Rc::new(RefCell::new(None));
        let token = CancelToken::new();
        // Any early return below stops the tasks already spawned; listeners
        // pushed so far detach on drop.
        let setup = token.guard();

        apply_resize(&window, &container, &canvas, &app, &gpu);

        let mut listeners = Vec::new();
        {
            let (w, c, cv, a, g) = (
                window.clone(),
                container.clone(),
                canvas.clone(),
                app.clone(),
                gpu.clone(),
            );
            listeners.push(Listener::attach(&window, "resize", move |_ev| {
                apply_resize(&w, &c, &cv, &a, &g);
            })?);
        }
        {
            let a = app.clone();
            listeners.push(Listener::attach(&window, "pointermove", move |ev| {
                if let Some((x, y)) = client_pos(&ev) {
                    apply_cursor(a.borrow_mut().pointer_move(x, y, now()));
                }
            })?);
        }
        {
            let a = app.clone();
            listeners.push(Listener::attach(&window, "pointerdown", move |_ev| {
                apply_cursor(a.borrow_mut().pointer_down(now()));
            })?);
        }
        {
            let a = app.clone();
            listeners.push(Listener::attach(&window, "pointerup", move |_ev| {
                apply_cursor(a.borrow_mut().pointer_up(now()));
            })?);
        }
        {
            let a = app.clone();
            listeners.push(Listener::attach(&canvas, "pointerdown", move |ev| {
                if let Some((x, y)) = client_pos(&ev) {
                    a.borrow_mut().begin_orbit_drag(x, y);
                }
            })?);
        }

        spawn_gpu_init(canvas, app.clone(), gpu.clone(), token.clone());
        spawn_map_load(app.clone(), token.clone());
        start_frame_loop(app.clone(), gpu, token.clone())?;
        setup.disarm();

        tracing::info!(container_id, canvas_selector, "globe mounted");
        Ok(Some(Mounted {
            app,
            token,
            listeners,
            disposed: false,
        }))
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod imp {
    use wasm_bindgen::prelude::JsValue;

    use scene::GlobeConfig;

    use crate::app::GlobeApp;

    /// Host builds have no DOM; the state is kept so the handle API is
    /// uniform.
    pub struct Mounted {
        app: GlobeApp,
        disposed: bool,
    }

    impl Mounted {
        pub fn dot_count(&self) -> usize {
            self.app.dot_count()
        }

        pub fn is_disposed(&self) -> bool {
            self.disposed
        }

        pub fn dispose(&mut self) {
            if !self.disposed {
                self.disposed = true;
                self.app.dispose();
            }
        }
    }

    pub fn mount(
        container_id: &str,
        _canvas_selector: &str,
        _cfg: GlobeConfig,
    ) -> Result<Option<Mounted>, JsValue> {
        tracing::debug!(container_id, "no DOM on this target; globe not mounted");
        Ok(None)
    }
}

pub use imp::{Mounted, mount};
