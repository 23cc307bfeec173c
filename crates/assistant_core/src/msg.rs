use crate::FileCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Enter,
    Other,
}

/// A keystroke in the question composer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPress {
    pub key: Key,
    pub shift: bool,
}

impl KeyPress {
    pub fn enter() -> Self {
        Self {
            key: Key::Enter,
            shift: false,
        }
    }

    pub fn shift_enter() -> Self {
        Self {
            key: Key::Enter,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Front end finished start-up.
    Started,
    /// User picked a file in the file picker.
    FileChosen(FileCandidate),
    /// User clicked "Upload & Process".
    UploadClicked,
    /// Backend accepted the upload.
    UploadSucceeded { message: String },
    /// Upload failed at the transport or with a non-2xx status.
    UploadFailed { reason: String },
    /// User edited the question box.
    QuestionEdited(String),
    /// User clicked Send.
    SendClicked,
    /// Keystroke in the question box.
    KeyPressed(KeyPress),
    /// Backend answered the pending question.
    AnswerReceived {
        answer: String,
        sources: Option<String>,
    },
    /// Pending question failed at the transport or with a non-2xx status.
    AnswerFailed { reason: String },
    /// Result of the readiness probe.
    HealthChecked { ready: bool, detail: String },
    /// UI/render tick to coalesce rendering.
    Tick,
}
