//! Assistant core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{Key, KeyPress, Msg};
pub use state::{
    AppState, BackendStatus, FileCandidate, Message, Role, SelectedFile, UploadState, PDF_MIME,
};
pub use update::{is_submit_key, update, NOT_PDF_NOTICE, NO_FILE_NOTICE};
pub use view_model::{
    AppViewModel, MessageView, Screen, THINKING_TEXT, WELCOME_HINT, WELCOME_TEXT,
};
