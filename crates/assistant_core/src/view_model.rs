use crate::{BackendStatus, Role};

pub const WELCOME_TEXT: &str = "Manual uploaded! Ask anything about your vehicle.";
pub const WELCOME_HINT: &str = "Try: \"How do I change the oil?\"";
pub const THINKING_TEXT: &str = "Thinking...";

/// The two mutually exclusive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Upload,
    Chat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub screen: Screen,
    pub selected_file: Option<String>,
    pub file_picker_enabled: bool,
    pub upload_enabled: bool,
    pub upload_button_label: &'static str,
    pub upload_error: Option<String>,
    pub messages: Vec<MessageView>,
    pub show_welcome: bool,
    pub thinking: bool,
    pub question: String,
    pub question_input_enabled: bool,
    pub send_enabled: bool,
    pub backend_status: BackendStatus,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub role: Role,
    pub text: String,
    pub sources: Option<String>,
}
