use std::{
    collections::HashMap,
    path::Path,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::DrugSpeakError;
use crate::persistence::load_json_from;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
}

/// Category id -> display name. Ids without an entry display as themselves.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryLookup {
    categories: HashMap<String, Category>,
}

impl CategoryLookup {
    pub fn new(categories: HashMap<String, Category>) -> Self {
        Self { categories }
    }

    pub fn load(path: &Path) -> Result<Self, DrugSpeakError> {
        load_json_from(path)
    }

    pub fn insert(&mut self, id: &str, name: &str) {
        self.categories.insert(id.to_string(), Category { name: name.to_string() });
    }

    pub fn name_for<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories.get(id).map(|c| c.name.as_str()).unwrap_or(id)
    }

    pub fn display_names(&self, ids: &[String]) -> String {
        ids.iter().map(|id| self.name_for(id)).collect::<Vec<_>>().join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_fall_back_to_id() {
        let lookup: CategoryLookup =
            serde_json::from_str(r#"{ "1": { "name": "Antibiotic" } }"#).unwrap();
        let ids = vec!["1".to_string(), "99".to_string()];

        assert_eq!(lookup.display_names(&ids), "Antibiotic, 99");
        assert_eq!(CategoryLookup::default().display_names(&[]), "");
    }
}
