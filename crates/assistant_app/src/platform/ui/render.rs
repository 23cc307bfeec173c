use std::sync::Arc;

use assistant_core::{
    AppViewModel, BackendStatus, MessageView, Role, Screen, THINKING_TEXT, WELCOME_HINT,
    WELCOME_TEXT,
};
use chrono::Local;

use super::constants::*;

pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

pub fn local_clock() -> Clock {
    Arc::new(|| Local::now().format("%H:%M").to_string())
}

/// Turns successive view models into the terminal lines that changed.
///
/// The transcript is append-only, so each message is printed exactly once.
pub struct Renderer {
    clock: Clock,
    screen: Option<Screen>,
    printed_messages: usize,
    thinking: bool,
    upload_status: Option<String>,
    backend_status: BackendStatus,
}

impl Renderer {
    pub fn new(clock: Clock) -> Self {
        Self {
            clock,
            screen: None,
            printed_messages: 0,
            thinking: false,
            upload_status: None,
            backend_status: BackendStatus::Unknown,
        }
    }

    /// True until the first frame has been drawn.
    pub fn is_pristine(&self) -> bool {
        self.screen.is_none()
    }

    pub fn render(&mut self, view: &AppViewModel) -> Vec<String> {
        let mut lines = Vec::new();

        if self.screen.is_none() {
            lines.push(format!("{APP_TITLE} - {APP_SUBTITLE}"));
        }

        if view.backend_status != self.backend_status {
            match &view.backend_status {
                BackendStatus::Unknown => {}
                BackendStatus::Ready => lines.push("Backend: ready".to_string()),
                BackendStatus::NotReady(detail) => {
                    lines.push(format!("Backend: not ready ({detail})"))
                }
            }
            self.backend_status = view.backend_status.clone();
        }

        if self.screen != Some(view.screen) {
            self.screen = Some(view.screen);
            match view.screen {
                Screen::Upload => {
                    lines.push(UPLOAD_HEADING.to_string());
                    lines.push(UPLOAD_HELP.to_string());
                }
                Screen::Chat => {
                    lines.push(CHAT_HEADING.to_string());
                    if view.show_welcome {
                        lines.push(WELCOME_TEXT.to_string());
                        lines.push(WELCOME_HINT.to_string());
                    }
                    lines.push(CHAT_HELP.to_string());
                }
            }
        }

        match view.screen {
            Screen::Upload => self.render_upload(view, &mut lines),
            Screen::Chat => self.render_chat(view, &mut lines),
        }

        lines
    }

    fn render_upload(&mut self, view: &AppViewModel, lines: &mut Vec<String>) {
        let file = view.selected_file.as_deref().unwrap_or("none");
        let button = if view.upload_enabled {
            format!("[{}]", view.upload_button_label)
        } else {
            format!("({})", view.upload_button_label)
        };
        let status = format!("File: {file} | {button}");
        if self.upload_status.as_deref() != Some(status.as_str()) {
            lines.push(status.clone());
            self.upload_status = Some(status);
        }
    }

    fn render_chat(&mut self, view: &AppViewModel, lines: &mut Vec<String>) {
        for message in view.messages.iter().skip(self.printed_messages) {
            lines.extend(format_message(&(self.clock)(), message));
        }
        self.printed_messages = view.messages.len();

        if view.thinking && !self.thinking {
            lines.push(format!("Bot: {THINKING_TEXT}"));
        }
        self.thinking = view.thinking;
    }
}

pub fn notice(text: &str) -> String {
    format!(">> {text}")
}

fn format_message(time: &str, message: &MessageView) -> Vec<String> {
    let speaker = match message.role {
        Role::User => "You",
        Role::Bot => "Bot",
    };
    let mut lines = Vec::new();
    for (index, text_line) in message.text.lines().enumerate() {
        if index == 0 {
            lines.push(format!("[{time}] {speaker}: {text_line}"));
        } else {
            lines.push(format!("        {text_line}"));
        }
    }
    if lines.is_empty() {
        lines.push(format!("[{time}] {speaker}:"));
    }
    if let Some(sources) = &message.sources {
        lines.push(format!("        Sources: {sources}"));
    }
    lines
}
