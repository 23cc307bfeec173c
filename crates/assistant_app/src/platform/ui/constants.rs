pub const APP_TITLE: &str = "Manual Assistant";
pub const APP_SUBTITLE: &str = "Your personal service manual chatbot";

pub const CMD_OPEN: &str = "open";
pub const CMD_UPLOAD: &str = "upload";
pub const CMD_QUIT: &str = "quit";
pub const CMD_CHAT_QUIT: &str = "/quit";

/// A chat line ending with this marker behaves like Shift+Enter.
pub const CONTINUATION_MARKER: char = '\\';

pub const UPLOAD_HEADING: &str = "== Upload Your Manual ==";
pub const UPLOAD_HELP: &str = "Commands: open <path-to-pdf>, upload, quit";
pub const CHAT_HEADING: &str = "== Chat ==";
pub const CHAT_HELP: &str =
    "Type a question and press Enter. End a line with \\ to keep writing. /quit exits.";
pub const BUSY_HINT: &str = "Still waiting for the previous answer.";

pub const FALLBACK_MIME: &str = "application/octet-stream";
