use thiserror::Error;

use super::{
    api::StudyRecordService,
    types::{
        StudyCounters,
        StudyRecord,
    },
};
use crate::core::{
    learning_list::LearningListStore,
    Drug,
    DrugId,
    DrugSpeakError,
    UserIdentity,
};

#[derive(Error, Debug)]
pub enum StudyError {
    #[error("{0} is already in the learning list")]
    AlreadyLearning(DrugId),

    #[error("No authenticated user; study record not updated")]
    Anonymous,

    #[error("Failed to update study record: {0}")]
    Persist(#[source] DrugSpeakError),
}

#[derive(Debug)]
pub enum RecordLoad {
    /// Anonymous identity, no request made.
    Skipped,
    Found,
    /// First-time user; the record is created on the first study press.
    NotFound,
    Failed(DrugSpeakError),
}

/// Keeps the learning list, the cached study record and the remote record in step.
///
/// Futures returned here may be dropped at any await point (screen torn down);
/// state is only written after a response arrives, so a dropped call leaves
/// the cache as it was.
pub struct StudyRecordReconciler<S, L> {
    service: S,
    learning: L,
    identity: Option<UserIdentity>,
    cached: Option<StudyRecord>,
}

impl<S: StudyRecordService, L: LearningListStore> StudyRecordReconciler<S, L> {
    pub fn new(service: S, learning: L) -> Self {
        Self { service, learning, identity: None, cached: None }
    }

    pub fn cached_record(&self) -> Option<&StudyRecord> {
        self.cached.as_ref()
    }

    pub fn identity(&self) -> Option<&UserIdentity> {
        self.identity.as_ref()
    }

    pub fn learning_list(&self) -> &L {
        &self.learning
    }

    pub fn is_learning(&self, drug_id: &DrugId) -> bool {
        self.learning.contains(drug_id)
    }

    /// Reloads the record only when the identity differs from the last one seen.
    /// Returns `None` when nothing changed.
    pub async fn observe_identity(&mut self, identity: UserIdentity) -> Option<RecordLoad> {
        if self.identity.as_ref() == Some(&identity) {
            return None;
        }

        self.identity = Some(identity.clone());
        self.cached = None;
        Some(self.load_record(&identity).await)
    }

    pub async fn load_record(&mut self, identity: &UserIdentity) -> RecordLoad {
        let Some(user_id) = identity.user_id() else {
            return RecordLoad::Skipped;
        };

        match self.service.get_study_record(user_id).await {
            Ok(record) => {
                log::info!("[Study] Study record found for {}: {:?}", user_id, record.counters);
                self.cached = Some(record);
                RecordLoad::Found
            }
            Err(e) if e.is_not_found() => {
                log::info!("[Study] No study record for {}, will create one on study", user_id);
                RecordLoad::NotFound
            }
            Err(e) => {
                log::warn!("[Study] Failed to load study record for {}: {}", user_id, e);
                RecordLoad::Failed(e)
            }
        }
    }

    /// Puts `drug` on the learning list and persists the bumped counters.
    ///
    /// The local insert happens first and is never undone: on `Anonymous` or
    /// `Persist` the drug stays listed and the cached record is untouched.
    pub async fn add_to_learning(&mut self, drug: &Drug) -> Result<StudyRecord, StudyError> {
        if !self.learning.add(drug) {
            return Err(StudyError::AlreadyLearning(drug.id.clone()));
        }

        let Some(user_id) = self.identity.as_ref().and_then(|i| i.user_id()).cloned() else {
            log::error!("[Study] Added {} locally but no user is signed in", drug.id);
            return Err(StudyError::Anonymous);
        };

        let counters = StudyCounters::after_adding(self.cached.as_ref());
        if let Err(e) = self.service.create_or_update_record(&user_id, &counters).await {
            log::error!("[Study] Failed to update study record for {}: {}", user_id, e);
            return Err(StudyError::Persist(e));
        }

        let record = match self.cached.as_mut() {
            Some(record) => {
                record.merge_counters(counters);
                record.clone()
            }
            None => {
                let record = StudyRecord::new(user_id, counters);
                self.cached = Some(record.clone());
                record
            }
        };
        Ok(record)
    }
}
