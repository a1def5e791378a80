pub mod categories;
pub mod errors;
pub mod http;
pub mod learning_list;
pub mod models;

pub use categories::CategoryLookup;
pub use errors::DrugSpeakError;
pub use learning_list::{ LearningList, LearningListEntry, LearningListStore, SharedLearningList };
pub use models::{ Drug, DrugId, Gender, Sound, UserId, UserIdentity };
