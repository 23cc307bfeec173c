use assistant_logging::{assistant_debug, assistant_info};

use crate::{AppState, BackendStatus, Effect, Key, KeyPress, Message, Msg, UploadState};

pub const NOT_PDF_NOTICE: &str = "Please select a PDF file";
pub const NO_FILE_NOTICE: &str = "Please select a file first";

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.request_health() {
                vec![Effect::CheckHealth]
            } else {
                Vec::new()
            }
        }
        Msg::FileChosen(candidate) => {
            // The picker is disabled while an upload is in flight.
            if state.upload_state() == UploadState::Uploading {
                return (state, Vec::new());
            }
            if !candidate.is_pdf() {
                assistant_debug!(
                    "Rejected file {} with mime {}",
                    candidate.name,
                    candidate.mime
                );
                return (state, vec![Effect::Notify(NOT_PDF_NOTICE.to_string())]);
            }
            state.select_file(candidate);
            Vec::new()
        }
        Msg::UploadClicked => {
            if state.upload_state() == UploadState::Uploading {
                return (state, Vec::new());
            }
            match state.selected_file().cloned() {
                Some(file) => {
                    state.begin_upload();
                    vec![Effect::UploadFile { file }]
                }
                None => vec![Effect::Notify(NO_FILE_NOTICE.to_string())],
            }
        }
        Msg::UploadSucceeded { message } => {
            if state.upload_state() != UploadState::Uploading {
                assistant_debug!("Ignoring upload result outside of an upload");
                return (state, Vec::new());
            }
            assistant_info!("Upload finished: {}", message);
            state.finish_upload();
            vec![Effect::Notify(message)]
        }
        Msg::UploadFailed { reason } => {
            if state.upload_state() != UploadState::Uploading {
                assistant_debug!("Ignoring upload failure outside of an upload");
                return (state, Vec::new());
            }
            let text = error_text(&reason);
            state.fail_upload(text.clone());
            vec![Effect::Notify(text)]
        }
        Msg::QuestionEdited(text) => {
            // The question box is disabled while an answer is pending.
            if !state.is_loading() {
                state.set_question(text);
            }
            Vec::new()
        }
        Msg::SendClicked => submit_question(&mut state),
        Msg::KeyPressed(key) => {
            if is_submit_key(key) {
                submit_question(&mut state)
            } else {
                Vec::new()
            }
        }
        Msg::AnswerReceived { answer, sources } => {
            if !state.is_loading() {
                return (state, Vec::new());
            }
            state.settle_question(Message::bot(answer, sources));
            Vec::new()
        }
        Msg::AnswerFailed { reason } => {
            if !state.is_loading() {
                return (state, Vec::new());
            }
            state.settle_question(Message::bot(error_text(&reason), None));
            Vec::new()
        }
        Msg::HealthChecked { ready, detail } => {
            let status = if ready {
                BackendStatus::Ready
            } else {
                BackendStatus::NotReady(detail)
            };
            state.set_backend_status(status);
            Vec::new()
        }
        Msg::Tick => Vec::new(),
    };

    (state, effects)
}

/// Enter without Shift submits the question; everything else is left to the text box.
pub fn is_submit_key(key: KeyPress) -> bool {
    key.key == Key::Enter && !key.shift
}

fn submit_question(state: &mut AppState) -> Vec<Effect> {
    if state.is_loading() || state.pending_question().trim().is_empty() {
        return Vec::new();
    }
    let question = state.pending_question().to_string();
    state.dispatch_question(question.clone());
    vec![Effect::AskQuestion { question }]
}

fn error_text(reason: &str) -> String {
    format!("Error: {reason}")
}
