//! Application state shared by the browser and native shells.

use crate::error::AppResult;
use doodlepad_core::{RenderEngine, Rgba, Sketchpad, ToolManager};
use doodlepad_feedback::{ChatLog, FeedbackClient, FeedbackConfig, FeedbackResult, prompt};
use doodlepad_render::{RasterSurface, export_png};
use peniko::Color;
use std::cell::RefCell;
use std::rc::Rc;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Canvas background; the eraser paints with it.
    pub background_color: Color,
    pub font_family: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Doodlepad".to_string(),
            width: 1280,
            height: 800,
            background_color: Color::WHITE,
            font_family: doodlepad_core::tools::TEXT_FONT_FAMILY.to_string(),
        }
    }
}

/// The drawing plus the feedback conversation about it.
#[derive(Debug)]
pub struct App {
    config: AppConfig,
    pad: Sketchpad,
    chat: Rc<RefCell<ChatLog>>,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let tools = ToolManager::with_background(Rgba::from(config.background_color));
        let engine = RenderEngine::new().with_font_family(config.font_family.clone());
        Self {
            pad: Sketchpad::with_parts(tools, engine),
            chat: Rc::new(RefCell::new(ChatLog::new())),
            config,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn pad(&self) -> &Sketchpad {
        &self.pad
    }

    pub fn pad_mut(&mut self) -> &mut Sketchpad {
        &mut self.pad
    }

    /// The conversation, shareable with in-flight requests.
    pub fn chat(&self) -> &Rc<RefCell<ChatLog>> {
        &self.chat
    }

    /// Replay the history onto a fresh CPU surface of the configured size.
    pub fn render_offscreen(&self) -> AppResult<RasterSurface> {
        let mut surface = RasterSurface::new(self.config.width, self.config.height)?;
        self.pad.repaint(&mut surface);
        Ok(surface)
    }

    /// Render the history and encode it as PNG on white.
    pub fn export_png(&self) -> AppResult<Vec<u8>> {
        let surface = self.render_offscreen()?;
        Ok(export_png(&surface)?)
    }
}

/// Build the feedback client from `config`. On `None` the feedback requests
/// still answer, with the fallback replies.
pub fn connect_feedback(config: FeedbackResult<FeedbackConfig>) -> Option<FeedbackClient> {
    match config.and_then(|config| FeedbackClient::new(&config)) {
        Ok(client) => {
            log::info!("AI feedback enabled with model {}", client.model());
            Some(client)
        }
        Err(e) => {
            log::warn!("AI feedback disabled: {}", e);
            None
        }
    }
}

/// Post the analysis request line, wait for feedback on `png`, and replace
/// the typing placeholder with the reply. Without a client the placeholder
/// resolves to the analysis fallback.
pub async fn request_analysis(chat: &RefCell<ChatLog>, client: Option<&FeedbackClient>, png: &[u8]) -> String {
    let typing = {
        let mut log = chat.borrow_mut();
        log.push_analysis_request();
        log.push_typing()
    };
    let reply = match client {
        Some(client) => client.analyze_drawing(png).await,
        None => {
            log::warn!("No feedback client configured");
            prompt::ANALYSIS_FALLBACK.to_string()
        }
    };
    chat.borrow_mut().resolve(typing, reply.clone());
    reply
}

/// Post a chat message and wait for the reply. Blank input sends nothing.
/// Without a client the reply is the chat fallback.
pub async fn send_chat(chat: &RefCell<ChatLog>, client: Option<&FeedbackClient>, input: &str) -> Option<String> {
    let (message, typing) = {
        let mut log = chat.borrow_mut();
        let message = log.push_user(input)?;
        (message, log.push_typing())
    };
    let reply = match client {
        Some(client) => client.chat(&message).await,
        None => {
            log::warn!("No feedback client configured");
            prompt::CHAT_FALLBACK.to_string()
        }
    };
    chat.borrow_mut().resolve(typing, reply.clone());
    Some(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doodlepad_core::{MouseButton, Point, PointerEvent, ToolbarEvent};
    use pretty_assertions::assert_eq;

    fn small_app() -> App {
        App::new(AppConfig {
            width: 40,
            height: 30,
            ..AppConfig::default()
        })
    }

    #[test]
    fn test_eraser_uses_configured_background() {
        let mut app = App::new(AppConfig {
            background_color: Color::from_rgba8(10, 20, 30, 255),
            ..AppConfig::default()
        });
        let mut surface = app.render_offscreen().unwrap();
        app.pad_mut().handle_toolbar(&ToolbarEvent::click("eraser"), &mut surface);
        assert_eq!(app.pad().tools().snapshot().color, Rgba::rgb(10, 20, 30));
    }

    #[test]
    fn test_export_matches_size() {
        let mut app = small_app();
        let mut surface = app.render_offscreen().unwrap();
        let pad = app.pad_mut();
        pad.handle_pointer(
            &PointerEvent::Down {
                position: Point::new(2.0, 2.0),
                button: MouseButton::Left,
            },
            &mut surface,
        );
        pad.handle_pointer(&PointerEvent::Move { position: Point::new(30.0, 20.0) }, &mut surface);
        pad.handle_pointer(
            &PointerEvent::Up {
                position: Point::new(30.0, 20.0),
                button: MouseButton::Left,
            },
            &mut surface,
        );

        let png_data = app.export_png().unwrap();
        assert_eq!(&png_data[1..4], b"PNG");
        assert_eq!(app.render_offscreen().unwrap().pixels(), surface.pixels());
    }

    #[tokio::test]
    async fn test_unreachable_service_falls_back() {
        let config = FeedbackConfig::new("k")
            .unwrap()
            .with_api_base("http://127.0.0.1:9/")
            .unwrap()
            .with_timeout(std::time::Duration::from_millis(200));
        let client = FeedbackClient::new(&config).unwrap();
        let app = small_app();

        assert_eq!(send_chat(app.chat(), Some(&client), "   ").await, None);
        assert!(app.chat().borrow().is_empty());

        let reply = send_chat(app.chat(), Some(&client), "hello").await;
        assert_eq!(reply.as_deref(), Some(prompt::CHAT_FALLBACK));

        let reply = request_analysis(app.chat(), Some(&client), &[1, 2, 3]).await;
        assert_eq!(reply, prompt::ANALYSIS_FALLBACK);

        let log = app.chat().borrow();
        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "hello",
                prompt::CHAT_FALLBACK,
                prompt::ANALYSIS_REQUEST_LINE,
                prompt::ANALYSIS_FALLBACK
            ]
        );
    }

    #[test]
    fn test_connect_feedback() {
        assert!(connect_feedback(FeedbackConfig::from_lookup(|_| None)).is_none());
        let client = connect_feedback(FeedbackConfig::new("k")).unwrap();
        assert_eq!(client.model(), doodlepad_feedback::config::DEFAULT_MODEL);
    }

    #[tokio::test]
    async fn test_missing_client_answers_with_fallbacks() {
        let app = small_app();
        let client = connect_feedback(FeedbackConfig::from_lookup(|_| None));
        assert!(client.is_none());

        assert_eq!(send_chat(app.chat(), client.as_ref(), "").await, None);
        let reply = request_analysis(app.chat(), client.as_ref(), &[]).await;
        assert_eq!(reply, prompt::ANALYSIS_FALLBACK);
        let reply = send_chat(app.chat(), client.as_ref(), "  any tips?  ").await;
        assert_eq!(reply.as_deref(), Some(prompt::CHAT_FALLBACK));

        let log = app.chat().borrow();
        assert!(!log.is_waiting());
        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                prompt::ANALYSIS_REQUEST_LINE,
                prompt::ANALYSIS_FALLBACK,
                "any tips?",
                prompt::CHAT_FALLBACK
            ]
        );
    }
}
