use std::{
    path::PathBuf,
    sync::{
        Arc,
        Mutex,
        MutexGuard,
    },
};

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

use super::{
    models::{
        Drug,
        DrugId,
    },
    DrugSpeakError,
};
use crate::persistence::{
    get_data_file_path,
    load_json_from,
    save_json_to,
};

const LEARNING_LIST_FILE: &str = "learning_list.json";

/// Drugs the user is currently studying, shared by every screen.
pub trait LearningListStore {
    /// Appends the drug. Returns false and changes nothing if its id is already present.
    fn add(&self, drug: &Drug) -> bool;
    fn contains(&self, drug_id: &DrugId) -> bool;
    fn list(&self) -> Vec<LearningListEntry>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningListEntry {
    pub drug: Drug,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LearningListData {
    pub current: Vec<LearningListEntry>,
}

#[derive(Debug, Default)]
pub struct LearningList {
    data: LearningListData,
    file_path: Option<PathBuf>,
}

impl LearningList {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn load() -> Result<Self, DrugSpeakError> {
        Self::load_from(get_data_file_path(LEARNING_LIST_FILE))
    }

    pub fn load_from(file_path: PathBuf) -> Result<Self, DrugSpeakError> {
        let data: LearningListData = load_json_from(&file_path)?;
        Ok(Self { data, file_path: Some(file_path) })
    }

    pub fn save(&self) -> Result<(), DrugSpeakError> {
        match &self.file_path {
            Some(path) => save_json_to(&self.data, path),
            None => Ok(()),
        }
    }

    pub fn add(&mut self, drug: &Drug) -> bool {
        if self.contains(&drug.id) {
            return false;
        }

        self.data.current.push(LearningListEntry { drug: drug.clone(), added_at: Utc::now() });
        if let Err(e) = self.save() {
            log::warn!("[LearningList] Failed to save after adding {}: {}", drug.id, e);
        }
        true
    }

    pub fn contains(&self, drug_id: &DrugId) -> bool {
        self.data.current.iter().any(|entry| &entry.drug.id == drug_id)
    }

    pub fn entries(&self) -> &[LearningListEntry] {
        &self.data.current
    }

    pub fn len(&self) -> usize {
        self.data.current.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.current.is_empty()
    }
}

/// Process-wide handle; clones see the same collection.
#[derive(Debug, Clone, Default)]
pub struct SharedLearningList {
    inner: Arc<Mutex<LearningList>>,
}

impl SharedLearningList {
    pub fn new(list: LearningList) -> Self {
        Self { inner: Arc::new(Mutex::new(list)) }
    }

    fn lock(&self) -> MutexGuard<'_, LearningList> {
        // Entries are only appended, so a poisoned list is still consistent.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl LearningListStore for SharedLearningList {
    fn add(&self, drug: &Drug) -> bool {
        self.lock().add(drug)
    }

    fn contains(&self, drug_id: &DrugId) -> bool {
        self.lock().contains(drug_id)
    }

    fn list(&self) -> Vec<LearningListEntry> {
        self.lock().entries().to_vec()
    }
}
