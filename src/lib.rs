pub mod core;
#[cfg(test)]
mod log_capture;
pub mod persistence;
pub mod player;
pub mod screen;
pub mod settings;
pub mod study;

pub use crate::core::{
    Drug,
    DrugSpeakError,
    UserIdentity,
};
pub use screen::DrugDetailScreen;
pub use settings::Settings;
pub use study::StudyRecordReconciler;
