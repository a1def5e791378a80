pub mod api;
pub mod reconciler;
pub mod types;

pub use api::{
    HttpStudyRecordService,
    StudyRecordService,
};
pub use reconciler::{
    RecordLoad,
    StudyError,
    StudyRecordReconciler,
};
pub use types::{
    StudyCounters,
    StudyRecord,
};
