use crate::SelectedFile;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Show a message to the user right away (modal alert in a GUI).
    Notify(String),
    UploadFile { file: SelectedFile },
    AskQuestion { question: String },
    CheckHealth,
}
