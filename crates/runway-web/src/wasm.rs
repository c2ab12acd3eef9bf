#![forbid(unsafe_code)]

use core::f64::consts::TAU;
use core::time::Duration;
use std::cell::RefCell;
use std::rc::Rc;

use runway_fx::color::Hsl;
use runway_fx::driver::FrameDriver;
use runway_fx::error::FxError;
use runway_fx::geometry::{Bounds, Viewport};
use runway_fx::nav::{NavBindings, Navigation};
use runway_fx::page::PageHost;
use runway_fx::surface::{DrawCmd, EMBER_STOPS, Surface};
use tracing_subscriber::layer::SubscriberExt;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CanvasRenderingContext2d, Document, Element, Event, EventTarget, HtmlCanvasElement,
    HtmlElement, MouseEvent, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

use crate::{FrameStats, LOGGING_INSTALLED, LoopTurn, WebOptions, install_logging_once};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// Module start hook: panics and `tracing` events go to the browser console.
#[wasm_bindgen(start)]
pub fn install_console_logging() {
    install_logging_once(&LOGGING_INSTALLED, || {
        console_error_panic_hook::set_once();
        let layer = tracing_wasm::WASMLayer::new(
            tracing_wasm::WASMLayerConfigBuilder::new()
                .set_max_level(tracing::Level::INFO)
                .build(),
        );
        let subscriber = tracing_subscriber::registry().with(layer);
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            web_sys::console::warn_1(&"runway-web: a tracing subscriber is already installed".into());
        }
    });
}

fn js_err(err: FxError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn entropy_seed() -> u32 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

// ---------------------------------------------------------------------------
// Page host
// ---------------------------------------------------------------------------

/// [`PageHost`] over the live DOM.
struct DomHost {
    window: Window,
    document: Document,
}

impl DomHost {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }
}

impl PageHost for DomHost {
    type Element = Element;

    fn viewport(&self) -> Viewport {
        let dim = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport::new(
            dim(self.window.inner_width()),
            dim(self.window.inner_height()),
        )
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_visible(&self, selector: &str) -> Option<Element> {
        let el = self.query(selector)?;
        // `offsetParent` is null for elements that are not rendered. Non-HTML
        // elements (SVG) have no offsetParent at all and count as visible.
        match el.dyn_ref::<HtmlElement>() {
            Some(html) if html.offset_parent().is_none() => None,
            _ => Some(el),
        }
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn bounding_rect(&self, el: &Element) -> Option<Bounds> {
        if !el.is_connected() {
            return None;
        }
        let r = el.get_bounding_client_rect();
        Some(Bounds::new(r.left(), r.top(), r.width(), r.height()))
    }

    fn scroll_into_view(&mut self, el: &Element) {
        let opts = ScrollIntoViewOptions::new();
        opts.set_behavior(ScrollBehavior::Smooth);
        opts.set_block(ScrollLogicalPosition::Start);
        el.scroll_into_view_with_scroll_into_view_options(&opts);
    }

    fn toggle_class(&mut self, el: &Element, class: &str) -> bool {
        el.class_list().toggle(class).unwrap_or(false)
    }

    fn set_background(&mut self, el: &Element, css: &str) {
        let Some(html) = el.dyn_ref::<HtmlElement>() else {
            return;
        };
        if let Err(err) = html.style().set_property("background-color", css) {
            tracing::debug!(?err, "background write rejected");
        }
    }
}

// ---------------------------------------------------------------------------
// Canvas surface
// ---------------------------------------------------------------------------

/// [`Surface`] over a 2D canvas context.
struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    fn from_id(document: &Document, id: &str) -> Result<Self, FxError> {
        let canvas = document
            .get_element_by_id(id)
            .ok_or_else(|| FxError::MissingElement(format!("#{id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| FxError::Host(format!("#{id} is not a <canvas>")))?;
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| FxError::Host(format!("#{id}: getContext failed")))?
            .ok_or_else(|| FxError::Host(format!("#{id}: 2d context unavailable")))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| FxError::Host(format!("#{id}: unexpected context type")))?;
        Ok(Self { canvas, ctx })
    }

    fn fill_circle(&self, x: f64, y: f64, r: f64) -> Result<(), JsValue> {
        self.ctx.begin_path();
        self.ctx.arc(x, y, r, 0.0, TAU)?;
        self.ctx.fill();
        Ok(())
    }

    fn paint(&self, cmd: &DrawCmd) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.save();
        let result = match cmd {
            DrawCmd::DashedLine {
                from,
                to,
                color,
                width,
                dash,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(*width);
                let pattern = js_sys::Array::of2(&dash[0].into(), &dash[1].into());
                ctx.set_line_dash(&pattern).map(|()| {
                    ctx.begin_path();
                    ctx.move_to(from.x, from.y);
                    ctx.line_to(to.x, to.y);
                    ctx.stroke();
                })
            }
            DrawCmd::Dot {
                center,
                radius,
                color,
                alpha,
                blur,
            } => {
                let css = color.to_css();
                ctx.set_global_alpha(*alpha);
                ctx.set_fill_style_str(&css);
                ctx.set_shadow_blur(*blur);
                ctx.set_shadow_color(&css);
                self.fill_circle(center.x, center.y, *radius)
            }
            DrawCmd::Ember {
                center,
                radius,
                color,
                alpha,
                glow_blur,
                glow_alpha,
            } => self.paint_ember(*center, *radius, *color, *alpha, *glow_blur, *glow_alpha),
        };
        ctx.restore();
        result
    }

    fn paint_ember(
        &self,
        center: runway_fx::geometry::Point,
        radius: f64,
        color: Hsl,
        alpha: f64,
        glow_blur: f64,
        glow_alpha: f64,
    ) -> Result<(), JsValue> {
        let ctx = &self.ctx;
        ctx.set_global_alpha(alpha);
        let gradient =
            ctx.create_radial_gradient(center.x, center.y, 0.0, center.x, center.y, radius)?;
        for (offset, stop_alpha) in EMBER_STOPS {
            gradient.add_color_stop(offset as f32, &color.hsla_css(stop_alpha))?;
        }
        ctx.set_fill_style_canvas_gradient(&gradient);
        self.fill_circle(center.x, center.y, radius)?;
        // Glow pass reuses the same path.
        ctx.set_shadow_blur(glow_blur);
        ctx.set_shadow_color(&color.hsla_css(glow_alpha));
        ctx.fill();
        Ok(())
    }
}

impl Surface for CanvasSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.canvas.set_width(width.max(0.0) as u32);
        self.canvas.set_height(height.max(0.0) as u32);
    }

    fn clear(&mut self) {
        let w = f64::from(self.canvas.width());
        let h = f64::from(self.canvas.height());
        self.ctx.clear_rect(0.0, 0.0, w, h);
    }

    fn draw(&mut self, cmd: &DrawCmd) {
        if let Err(err) = self.paint(cmd) {
            tracing::debug!(?err, "canvas draw failed");
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

struct Runtime {
    host: DomHost,
    driver: FrameDriver<Element>,
    nav: Navigation,
    line: CanvasSurface,
    fire: CanvasSurface,
    stats: FrameStats,
    running: bool,
    raf_id: Option<i32>,
}

impl Runtime {
    fn now(&self) -> Option<Duration> {
        let ms = self.host.window.performance()?.now();
        Self::timestamp(ms)
    }

    fn timestamp(ms: f64) -> Option<Duration> {
        (ms.is_finite() && ms >= 0.0).then(|| Duration::from_secs_f64(ms / 1000.0))
    }

    fn first_frame(&mut self) {
        if let Some(now) = self.now() {
            self.driver.set_time(now);
        }
        let report = self.driver.init(&self.host, &mut self.line, &mut self.fire);
        self.stats.observe(&self.driver, Some(report), 0);
    }

    fn tick(&mut self, timestamp_ms: f64) {
        let Some(now) = Self::timestamp(timestamp_ms) else {
            return;
        };
        self.driver.set_time(now);
        let step = self.driver.step(&self.host, &mut self.line, &mut self.fire);
        self.stats
            .observe(&self.driver, step.last_frame, step.frames_dropped);
    }

    fn resized(&mut self) {
        let viewport = self.host.viewport();
        self.driver
            .fx()
            .resize(viewport, &mut self.line, &mut self.fire);
    }
}

type Shared = Rc<RefCell<Runtime>>;

fn request_frame(window: &Window, slot: &FrameCallback) -> Option<i32> {
    let slot = slot.borrow();
    let cb = slot.as_ref()?;
    window
        .request_animation_frame(cb.as_ref().unchecked_ref())
        .ok()
}

/// Landing-page effects bound to the current document.
#[wasm_bindgen]
pub struct RunwayWeb {
    options: WebOptions,
    runtime: Option<Shared>,
    frame_cb: FrameCallback,
    listeners: Vec<Listener>,
}

#[wasm_bindgen]
impl RunwayWeb {
    /// Create an instance. `options` is an optional JSON string; see
    /// `WebOptions`.
    #[wasm_bindgen(constructor)]
    pub fn new(options: Option<String>) -> Result<RunwayWeb, JsValue> {
        let options = WebOptions::from_json(options.as_deref()).map_err(js_err)?;
        Ok(Self {
            options,
            runtime: None,
            frame_cb: Rc::new(RefCell::new(None)),
            listeners: Vec::new(),
        })
    }

    /// Find the canvases, install listeners, render the first frame and start
    /// the animation loop. Calling `start` on a running instance is a no-op.
    pub fn start(&mut self) -> Result<(), JsValue> {
        if self.runtime.is_some() {
            return Ok(());
        }
        let window = web_sys::window().ok_or_else(|| js_err(FxError::Host("no window".into())))?;
        let document = window
            .document()
            .ok_or_else(|| js_err(FxError::Host("no document".into())))?;

        let line = CanvasSurface::from_id(&document, &self.options.line_canvas_id).map_err(js_err)?;
        let fire = CanvasSurface::from_id(&document, &self.options.fire_canvas_id).map_err(js_err)?;
        let driver = FrameDriver::new(self.options.fx.clone(), entropy_seed()).map_err(js_err)?;
        let nav = Navigation::new(self.options.fx.nav.clone());
        let host = DomHost {
            window: window.clone(),
            document: document.clone(),
        };
        let bindings = nav.bind(&host);

        let runtime = Rc::new(RefCell::new(Runtime {
            host,
            driver,
            nav,
            line,
            fire,
            stats: FrameStats::default(),
            running: true,
            raf_id: None,
        }));
        runtime.borrow_mut().first_frame();

        self.install_listeners(&window, &document, &runtime, bindings);
        self.start_loop(&window, &runtime);
        self.runtime = Some(runtime);
        tracing::info!(listeners = self.listeners.len(), "runway effects started");
        Ok(())
    }

    /// Stop the loop and remove every listener. The canvases keep their last
    /// frame.
    pub fn destroy(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            let mut rt = runtime.borrow_mut();
            rt.running = false;
            if let Some(id) = rt.raf_id.take() {
                let _ = rt.host.window.cancel_animation_frame(id);
            }
        }
        self.frame_cb.borrow_mut().take();
        for l in self.listeners.drain(..) {
            let _ = l
                .target
                .remove_event_listener_with_callback(l.kind, l.callback.as_ref().unchecked_ref());
        }
    }

    /// Frame statistics as a JSON string.
    pub fn stats(&self) -> String {
        self.runtime
            .as_ref()
            .map(|rt| rt.borrow().stats)
            .unwrap_or_default()
            .to_json()
    }
}

impl RunwayWeb {
    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        runtime: &Shared,
        mut handler: impl FnMut(&mut Runtime, &Event) + 'static,
    ) {
        let rt = Rc::clone(runtime);
        let callback = Closure::wrap(Box::new(move |event: Event| {
            // Re-entrant dispatch (an event fired from inside a handler) is
            // dropped rather than panicking on the borrow.
            if let Ok(mut guard) = rt.try_borrow_mut() {
                handler(&mut guard, &event);
            }
        }) as Box<dyn FnMut(Event)>);
        match target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref()) {
            Ok(()) => self.listeners.push(Listener {
                target: target.clone(),
                kind,
                callback,
            }),
            Err(err) => tracing::warn!(kind, ?err, "listener not installed"),
        }
    }

    fn install_listeners(
        &mut self,
        window: &Window,
        document: &Document,
        runtime: &Shared,
        bindings: NavBindings,
    ) {
        self.listen(document, "mousemove", runtime, |rt, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                rt.driver
                    .pointer_moved(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
            }
        });
        self.listen(window, "resize", runtime, |rt, _| rt.resized());
        self.listen(window, "scroll", runtime, |rt, _| {
            let y = rt.host.scroll_y();
            rt.nav.scrolled(&mut rt.host, y);
        });

        if let Ok(anchors) = document.query_selector_all("a[href^=\"#\"]") {
            for i in 0..anchors.length() {
                let Some(anchor) = anchors.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                    continue;
                };
                let href_source = anchor.clone();
                self.listen(&anchor, "click", runtime, move |rt, event| {
                    let href = href_source.get_attribute("href").unwrap_or_default();
                    if rt.nav.anchor_activated(&mut rt.host, &href).prevents_default() {
                        event.prevent_default();
                    }
                });
            }
        }

        let nav_cfg = self.options.fx.nav.clone();
        if bindings.cta
            && let Ok(Some(cta)) = document.query_selector(&nav_cfg.cta_selector)
        {
            self.listen(&cta, "click", runtime, |rt, _| {
                rt.nav.cta_activated(&mut rt.host);
            });
        }
        if bindings.menu_toggle()
            && let Ok(Some(button)) = document.query_selector(&nav_cfg.menu_button_selector)
        {
            self.listen(&button, "click", runtime, |rt, _| {
                rt.nav.menu_toggled(&mut rt.host);
            });
        }
    }

    fn start_loop(&mut self, window: &Window, runtime: &Shared) {
        let rt = Rc::clone(runtime);
        let slot = Rc::clone(&self.frame_cb);
        let win = window.clone();
        *self.frame_cb.borrow_mut() = Some(Closure::wrap(Box::new(move |timestamp: f64| {
            let mut guard = rt.try_borrow_mut().ok();
            let turn = LoopTurn::decide(guard.as_ref().map(|g| g.running));
            if !turn.reschedules() {
                return;
            }
            let id = request_frame(&win, &slot);
            if let Some(state) = guard.as_mut() {
                state.tick(timestamp);
                state.raf_id = id;
            }
        }) as Box<dyn FnMut(f64)>));
        runtime.borrow_mut().raf_id = request_frame(window, &self.frame_cb);
    }
}

impl Drop for RunwayWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}
