//! Maps terminal lines to core messages for the active screen.

use std::path::Path;

use assistant_core::{FileCandidate, KeyPress, Msg, Screen};

use super::ui::constants::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Dispatch(Vec<Msg>),
    Quit,
    /// Input the current screen cannot use; the text explains why.
    Rejected(String),
}

pub fn parse_line(screen: Screen, line: &str, pending_question: &str) -> InputAction {
    match screen {
        Screen::Upload => parse_upload_line(line),
        Screen::Chat => parse_chat_line(line, pending_question),
    }
}

fn parse_upload_line(line: &str) -> InputAction {
    let trimmed = line.trim();
    let (command, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (trimmed, ""),
    };
    match command {
        "" => InputAction::Dispatch(Vec::new()),
        CMD_QUIT => InputAction::Quit,
        CMD_UPLOAD => InputAction::Dispatch(vec![Msg::UploadClicked]),
        CMD_OPEN if rest.is_empty() => InputAction::Rejected(format!("Usage: {CMD_OPEN} <path>")),
        CMD_OPEN => match file_candidate(Path::new(rest)) {
            Some(candidate) => InputAction::Dispatch(vec![Msg::FileChosen(candidate)]),
            None => InputAction::Rejected(format!("No such file: {rest}")),
        },
        _ => InputAction::Rejected(UPLOAD_HELP.to_string()),
    }
}

fn parse_chat_line(line: &str, pending_question: &str) -> InputAction {
    // A blank draft is never shown, so it must not leak into the next line.
    let pending_question = if pending_question.trim().is_empty() {
        ""
    } else {
        pending_question
    };
    if pending_question.is_empty() && line.trim() == CMD_CHAT_QUIT {
        return InputAction::Quit;
    }
    let (text, key) = match line.strip_suffix(CONTINUATION_MARKER) {
        Some(head) => (format!("{pending_question}{head}\n"), KeyPress::shift_enter()),
        None => (format!("{pending_question}{line}"), KeyPress::enter()),
    };
    InputAction::Dispatch(vec![Msg::QuestionEdited(text), Msg::KeyPressed(key)])
}

/// Builds what a native picker would hand over: name plus declared MIME type.
pub fn file_candidate(path: &Path) -> Option<FileCandidate> {
    if !path.is_file() {
        return None;
    }
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mime = mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(FALLBACK_MIME)
        .to_string();
    Some(FileCandidate {
        path: path.to_path_buf(),
        name,
        mime,
    })
}
