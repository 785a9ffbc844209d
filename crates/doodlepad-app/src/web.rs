//! WebAssembly entry point: drives an HTML canvas from DOM events.
//!
//! The page owns the DOM listeners and forwards them to [`DrawingBoard`];
//! everything stateful lives on the Rust side.

use crate::app::{App, AppConfig, connect_feedback, request_analysis, send_chat};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use doodlepad_core::{
    KeyEvent, LineCap, Modifiers, MouseButton, Point, PointerEvent, Rgba, Surface, ToolbarEvent,
};
use doodlepad_feedback::{FeedbackClient, FeedbackConfig, FeedbackError};
use doodlepad_render::EXPORT_FILE_NAME;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlAnchorElement, HtmlCanvasElement};

const TEXT_PROMPT: &str = "Enter your text:";

/// A canvas 2D context as a drawing surface.
pub struct CanvasSurface {
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(ctx: CanvasRenderingContext2d) -> Self {
        Self { ctx }
    }

    pub fn from_canvas(canvas: &HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        Ok(Self::new(ctx))
    }
}

impl Surface for CanvasSurface {
    fn size(&self) -> (f64, f64) {
        self.ctx
            .canvas()
            .map(|c| (f64::from(c.width()), f64::from(c.height())))
            .unwrap_or((0.0, 0.0))
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ctx.clear_rect(x, y, width, height);
    }

    fn begin_path(&mut self) {
        self.ctx.begin_path();
    }

    fn move_to(&mut self, point: Point) {
        self.ctx.move_to(point.x, point.y);
    }

    fn line_to(&mut self, point: Point) {
        self.ctx.line_to(point.x, point.y);
    }

    fn arc(&mut self, center: Point, radius: f64, start_angle: f64, end_angle: f64) {
        if let Err(e) = self.ctx.arc(center.x, center.y, radius, start_angle, end_angle) {
            log::warn!("arc rejected: {:?}", e);
        }
    }

    fn stroke(&mut self) {
        self.ctx.stroke();
    }

    fn fill_text(&mut self, text: &str, position: Point) {
        if let Err(e) = self.ctx.fill_text(text, position.x, position.y) {
            log::warn!("fillText rejected: {:?}", e);
        }
    }

    fn set_stroke_color(&mut self, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_hex());
    }

    fn set_fill_color(&mut self, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_hex());
    }

    fn set_line_width(&mut self, width: f64) {
        self.ctx.set_line_width(width);
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.ctx.set_line_cap(cap.as_str());
    }

    fn set_font(&mut self, font: &str) {
        self.ctx.set_font(font);
    }
}

fn mouse_button(button: i16) -> MouseButton {
    match button {
        1 => MouseButton::Middle,
        2 => MouseButton::Right,
        _ => MouseButton::Left,
    }
}

/// Copy `canvas` onto a white canvas of the same size and return its PNG data URL.
fn flattened_data_url(canvas: &HtmlCanvasElement) -> Result<String, JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document"))?;
    let temp = document
        .create_element("canvas")?
        .dyn_into::<HtmlCanvasElement>()?;
    temp.set_width(canvas.width());
    temp.set_height(canvas.height());

    let ctx = CanvasSurface::from_canvas(&temp)?.ctx;
    ctx.set_fill_style_str(&Rgba::WHITE.to_hex());
    ctx.fill_rect(0.0, 0.0, f64::from(temp.width()), f64::from(temp.height()));
    ctx.draw_image_with_html_canvas_element(canvas, 0.0, 0.0)?;
    temp.to_data_url_with_type("image/png")
}

/// Browser drawing board bound to one `<canvas>`.
#[wasm_bindgen]
pub struct DrawingBoard {
    app: App,
    canvas: HtmlCanvasElement,
    surface: CanvasSurface,
    client: Option<FeedbackClient>,
}

#[wasm_bindgen]
impl DrawingBoard {
    /// Attach to the canvas with element id `canvas_id`. Without `api_key`
    /// the feedback features answer with their fallback messages.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, api_key: Option<String>) -> Result<DrawingBoard, JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let canvas = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("No element #{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()?;
        let surface = CanvasSurface::from_canvas(&canvas)?;

        let client = connect_feedback(
            api_key
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty())
                .ok_or(FeedbackError::MissingApiKey)
                .and_then(FeedbackConfig::new),
        );

        let config = AppConfig {
            width: canvas.width(),
            height: canvas.height(),
            ..AppConfig::default()
        };
        document.set_title(&config.title);
        log::info!("Drawing board attached to #{} ({}x{})", canvas_id, config.width, config.height);

        Ok(DrawingBoard {
            app: App::new(config),
            canvas,
            surface,
            client,
        })
    }

    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) {
        let event = PointerEvent::Down {
            position: Point::new(x, y),
            button: mouse_button(button),
        };
        self.app.pad_mut().handle_pointer(&event, &mut self.surface);
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) {
        let event = PointerEvent::Move {
            position: Point::new(x, y),
        };
        self.app.pad_mut().handle_pointer(&event, &mut self.surface);
    }

    /// Returns true when a stroke was committed.
    pub fn pointer_up(&mut self, x: f64, y: f64, button: i16) -> bool {
        let event = PointerEvent::Up {
            position: Point::new(x, y),
            button: mouse_button(button),
        };
        self.app.pad_mut().handle_pointer(&event, &mut self.surface)
    }

    /// Canvas click; in text mode asks for the text with `window.prompt`.
    pub fn click(&mut self, x: f64, y: f64) -> bool {
        self.app
            .pad_mut()
            .handle_click(Point::new(x, y), &mut self.surface, || {
                web_sys::window()?
                    .prompt_with_message(TEXT_PROMPT)
                    .ok()
                    .flatten()
            })
    }

    /// Returns true when the key was bound; the caller must then call
    /// `preventDefault`.
    pub fn key_down(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> bool {
        let event = KeyEvent::new(
            key,
            Modifiers {
                shift,
                ctrl,
                alt,
                meta,
            },
        );
        self.app.pad_mut().handle_key(&event, &mut self.surface).handled
    }

    /// Toolbar `change` event from control `id`.
    pub fn toolbar_change(&mut self, id: &str, value: &str) -> bool {
        self.app
            .pad_mut()
            .handle_toolbar(&ToolbarEvent::change(id, value), &mut self.surface)
    }

    /// Toolbar `click` event on control `id`.
    pub fn toolbar_click(&mut self, id: &str) -> bool {
        self.app
            .pad_mut()
            .handle_toolbar(&ToolbarEvent::click(id), &mut self.surface)
    }

    /// Label for the eraser toggle button.
    pub fn eraser_label(&self) -> String {
        self.app.pad().tools().eraser_label().to_string()
    }

    pub fn is_erasing(&self) -> bool {
        self.app.pad().tools().is_erasing()
    }

    pub fn is_text_mode(&self) -> bool {
        self.app.pad().tools().is_text_mode()
    }

    pub fn can_undo(&self) -> bool {
        self.app.pad().history().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.app.pad().history().can_redo()
    }

    /// Download the drawing on white as `drawing.png`.
    pub fn export_png(&self) -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("No document"))?;
        let link = document
            .create_element("a")?
            .dyn_into::<HtmlAnchorElement>()?;
        link.set_href(&flattened_data_url(&self.canvas)?);
        link.set_download(EXPORT_FILE_NAME);
        link.click();
        log::info!("Exported {}", EXPORT_FILE_NAME);
        Ok(())
    }

    /// Ask for feedback on the current drawing. Resolves to the reply text.
    pub fn analyze(&self) -> Result<js_sys::Promise, JsValue> {
        let data_url = self.canvas.to_data_url_with_type("image/png")?;
        let encoded = data_url.split_once(',').map(|(_, data)| data).unwrap_or_default();
        let png = STANDARD
            .decode(encoded)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        let chat = self.app.chat().clone();
        let client = self.client.clone();

        Ok(wasm_bindgen_futures::future_to_promise(async move {
            let reply = request_analysis(&chat, client.as_ref(), &png).await;
            Ok(JsValue::from_str(&reply))
        }))
    }

    /// Send a chat message. Resolves to the reply, or `undefined` for blank input.
    pub fn chat(&self, message: String) -> js_sys::Promise {
        let chat = self.app.chat().clone();
        let client = self.client.clone();

        wasm_bindgen_futures::future_to_promise(async move {
            let reply = send_chat(&chat, client.as_ref(), &message).await;
            Ok(reply.map(|r| JsValue::from_str(&r)).unwrap_or(JsValue::UNDEFINED))
        })
    }

    /// Chat log as JSON, for the page to render or persist.
    pub fn chat_json(&self) -> Result<String, JsValue> {
        self.app
            .chat()
            .borrow()
            .to_json()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Restore a chat log saved with [`Self::chat_json`].
    pub fn load_chat_json(&self, json: &str) -> Result<(), JsValue> {
        let restored = doodlepad_feedback::ChatLog::from_json(json)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        *self.app.chat().borrow_mut() = restored;
        Ok(())
    }
}

/// Initialize logging and panic reporting.
#[wasm_bindgen(start)]
pub fn run_wasm() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Starting Doodlepad (WASM)");
    doodlepad_core::ShortcutRegistry::log_all();
}
