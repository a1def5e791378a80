use serde::{
    Deserialize,
    Deserializer,
    Serialize,
};

use crate::core::UserId;

/// The three aggregate counters the client sends. The service stores them as
/// given; it never adds its own delta.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudyCounters {
    #[serde(deserialize_with = "null_as_zero")]
    pub current_learning: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub finished_learning: u32,
    #[serde(deserialize_with = "null_as_zero")]
    pub total_score: f64,
}

/// The service may send `null` for a counter it never set.
fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl StudyCounters {
    /// Counters to persist after one more drug joins the learning list.
    /// Without a cached record the user is treated as first-time.
    pub fn after_adding(cached: Option<&StudyRecord>) -> Self {
        match cached {
            Some(record) => Self {
                current_learning: record.counters.current_learning.saturating_add(1),
                finished_learning: record.counters.finished_learning,
                total_score: record.counters.total_score,
            },
            None => Self { current_learning: 1, finished_learning: 0, total_score: 0.0 },
        }
    }
}

/// One record per user, not per drug.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyRecord {
    #[serde(default)]
    pub user_id: UserId,
    #[serde(flatten)]
    pub counters: StudyCounters,
    /// Server-side fields this client doesn't interpret, kept across merges.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StudyRecord {
    pub fn new(user_id: UserId, counters: StudyCounters) -> Self {
        Self { user_id, counters, extra: serde_json::Map::new() }
    }

    pub fn current_learning(&self) -> u32 {
        self.counters.current_learning
    }

    pub fn finished_learning(&self) -> u32 {
        self.counters.finished_learning
    }

    pub fn total_score(&self) -> f64 {
        self.counters.total_score
    }

    /// Overwrites the counters, leaves everything else as it was.
    pub fn merge_counters(&mut self, counters: StudyCounters) {
        self.counters = counters;
    }

    pub(crate) fn stamped(mut self, user_id: &UserId) -> Self {
        if self.user_id.is_empty() {
            self.user_id = user_id.clone();
        }
        self
    }
}
