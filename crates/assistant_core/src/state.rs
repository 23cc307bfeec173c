use std::path::PathBuf;

use crate::view_model::{AppViewModel, MessageView, Screen};

/// MIME type the upload form accepts.
pub const PDF_MIME: &str = "application/pdf";

/// A file offered by the picker, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub path: PathBuf,
    pub name: String,
    /// Declared MIME type as reported by the picker.
    pub mime: String,
}

impl FileCandidate {
    pub fn is_pdf(&self) -> bool {
        self.mime == PDF_MIME
    }
}

/// A validated PDF waiting to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub path: PathBuf,
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadState {
    #[default]
    NotUploaded,
    Uploading,
    Uploaded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Bot,
}

/// One transcript entry. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub sources: Option<String>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
            sources: None,
        }
    }

    pub fn bot(text: impl Into<String>, sources: Option<String>) -> Self {
        Self {
            role: Role::Bot,
            text: text.into(),
            sources,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BackendStatus {
    #[default]
    Unknown,
    Ready,
    NotReady(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    selected_file: Option<SelectedFile>,
    upload: UploadState,
    upload_error: Option<String>,
    transcript: Vec<Message>,
    question: String,
    loading: bool,
    backend: BackendStatus,
    health_requested: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_file(&self) -> Option<&SelectedFile> {
        self.selected_file.as_ref()
    }

    pub fn upload_state(&self) -> UploadState {
        self.upload
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn pending_question(&self) -> &str {
        &self.question
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn backend_status(&self) -> &BackendStatus {
        &self.backend
    }

    pub fn view(&self) -> AppViewModel {
        let screen = match self.upload {
            UploadState::Uploaded => Screen::Chat,
            UploadState::NotUploaded | UploadState::Uploading => Screen::Upload,
        };
        let uploading = self.upload == UploadState::Uploading;
        AppViewModel {
            screen,
            selected_file: self.selected_file.as_ref().map(|file| file.name.clone()),
            file_picker_enabled: !uploading,
            upload_enabled: self.selected_file.is_some() && !uploading,
            upload_button_label: if uploading {
                "Uploading..."
            } else {
                "Upload & Process"
            },
            upload_error: self.upload_error.clone(),
            messages: self
                .transcript
                .iter()
                .map(|message| MessageView {
                    role: message.role,
                    text: message.text.clone(),
                    sources: message.sources.clone(),
                })
                .collect(),
            show_welcome: screen == Screen::Chat && self.transcript.is_empty(),
            thinking: self.loading,
            question: self.question.clone(),
            question_input_enabled: !self.loading,
            send_enabled: !self.loading && !self.question.trim().is_empty(),
            backend_status: self.backend.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a re-render is needed and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn select_file(&mut self, candidate: FileCandidate) {
        self.selected_file = Some(SelectedFile {
            path: candidate.path,
            name: candidate.name,
        });
        self.dirty = true;
    }

    pub(crate) fn begin_upload(&mut self) {
        self.upload = UploadState::Uploading;
        self.upload_error = None;
        self.dirty = true;
    }

    pub(crate) fn finish_upload(&mut self) {
        self.upload = UploadState::Uploaded;
        self.selected_file = None;
        self.upload_error = None;
        self.dirty = true;
    }

    pub(crate) fn fail_upload(&mut self, error: String) {
        self.upload = UploadState::NotUploaded;
        self.upload_error = Some(error);
        self.dirty = true;
    }

    pub(crate) fn set_question(&mut self, text: String) {
        if self.question != text {
            self.question = text;
            self.dirty = true;
        }
    }

    /// Appends the user message, clears the composer and raises the loading flag.
    pub(crate) fn dispatch_question(&mut self, text: String) {
        self.transcript.push(Message::user(text));
        self.question.clear();
        self.loading = true;
        self.dirty = true;
    }

    pub(crate) fn settle_question(&mut self, reply: Message) {
        self.transcript.push(reply);
        self.loading = false;
        self.dirty = true;
    }

    /// Marks the health probe as sent. Returns false if it was already requested.
    pub(crate) fn request_health(&mut self) -> bool {
        !std::mem::replace(&mut self.health_requested, true)
    }

    pub(crate) fn set_backend_status(&mut self, status: BackendStatus) {
        if self.backend != status {
            self.backend = status;
            self.dirty = true;
        }
    }
}
