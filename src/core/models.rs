use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrugId(pub String);

impl fmt::Display for DrugId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DrugId {
    fn from(id: &str) -> Self {
        DrugId(id.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        UserId(id.to_string())
    }
}

/// Who is looking at the screen. Only an authenticated user has a study record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserIdentity {
    Authenticated(UserId),
    Anonymous,
}

impl UserIdentity {
    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            UserIdentity::Authenticated(id) => Some(id),
            UserIdentity::Anonymous => None,
        }
    }
}

impl From<Option<UserId>> for UserIdentity {
    fn from(user_id: Option<UserId>) -> Self {
        match user_id {
            Some(id) if !id.is_empty() => UserIdentity::Authenticated(id),
            _ => UserIdentity::Anonymous,
        }
    }
}

/// Speaker tag of a recording. Unrecognised tags are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

impl From<String> for Gender {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "male" => Gender::Male,
            "female" => Gender::Female,
            _ => Gender::Other(tag),
        }
    }
}

impl From<Gender> for String {
    fn from(gender: Gender) -> Self {
        gender.to_string()
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => f.write_str("male"),
            Gender::Female => f.write_str("female"),
            Gender::Other(tag) => f.write_str(tag),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sound {
    pub gender: Gender,
    pub file: String, // Audio file reference, relative to the audio base url or absolute
}

impl Sound {
    pub fn key(&self) -> String {
        format!("{}-{}", self.gender, self.file)
    }

    pub fn uri(&self, audio_base_url: &str) -> String {
        if self.file.starts_with("http://") || self.file.starts_with("https://") {
            return self.file.clone();
        }
        format!("{}/{}", audio_base_url.trim_end_matches('/'), self.file.trim_start_matches('/'))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drug {
    pub id: DrugId,
    pub name: String,
    #[serde(default)]
    pub molecular_formula: String,
    #[serde(rename = "desc", default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>, // Category ids, resolved through a CategoryLookup
    #[serde(default)]
    pub sounds: Vec<Sound>,
}
