use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::DrugSpeakError,
    persistence::{
        get_data_file_path,
        load_json_or_default,
        save_json_to,
    },
};

const SETTINGS_FILE: &str = "settings.json";
pub const API_URL_ENV: &str = "DRUGSPEAK_API_URL";
pub const AUDIO_URL_ENV: &str = "DRUGSPEAK_AUDIO_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub api_base_url: String,
    pub audio_base_url: String,
    pub request_timeout_secs: u64,
    pub playback_speed: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            audio_base_url: "http://localhost:3000/audio".to_string(),
            request_timeout_secs: 30,
            playback_speed: 1.0,
        }
    }
}

impl Settings {
    pub fn settings_path() -> PathBuf {
        get_data_file_path(SETTINGS_FILE)
    }

    /// Loads from the app data dir, then applies environment overrides.
    pub fn load() -> Self {
        Self::load_from(&Self::settings_path()).with_overrides(|key| std::env::var(key).ok())
    }

    pub fn load_from(path: &Path) -> Self {
        load_json_or_default(path)
    }

    pub fn save(&self) -> Result<(), DrugSpeakError> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), DrugSpeakError> {
        save_json_to(self, path)?;
        log::info!("[Settings] Saved to {}", path.display());
        Ok(())
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(API_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(AUDIO_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.audio_base_url = url;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "api_base_url": "https://api.example.com" }"#).unwrap();

        let settings = Settings::load_from(&path);
        assert_eq!(settings.api_base_url, "https://api.example.com");
        assert_eq!(settings.request_timeout_secs, 30);
        assert_eq!(settings.playback_speed, 1.0);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings { playback_speed: 0.75, ..Settings::default() };

        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path), settings);
    }

    #[test]
    fn test_env_overrides() {
        let settings = Settings::default().with_overrides(|key| match key {
            API_URL_ENV => Some("http://staging:8080".to_string()),
            AUDIO_URL_ENV => Some("  ".to_string()),
            _ => None,
        });

        assert_eq!(settings.api_base_url, "http://staging:8080");
        assert_eq!(settings.audio_base_url, Settings::default().audio_base_url);
    }
}
