use thiserror::Error;

use super::models::UserId;

#[derive(Error, Debug)]
pub enum DrugSpeakError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reqwest error: {0}")]
    Reqwest(Box<reqwest::Error>),

    #[error("No study record found for user {0}")]
    RecordNotFound(UserId),

    #[error("HTTP error {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Unsupported playback speed: {0}")]
    InvalidSpeed(f32),

    #[error("No pronunciation at index {0}")]
    UnknownSound(usize),

    #[error("DrugSpeakError: {0}")]
    Custom(String),
}

impl DrugSpeakError {
    /// True for the "first-time user" branch of a record fetch.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DrugSpeakError::RecordNotFound(_))
    }
}

impl From<std::io::Error> for DrugSpeakError {
    fn from(error: std::io::Error) -> Self {
        DrugSpeakError::Io(Box::new(error))
    }
}

impl From<reqwest::Error> for DrugSpeakError {
    fn from(error: reqwest::Error) -> Self {
        DrugSpeakError::Reqwest(Box::new(error))
    }
}
