use std::sync::Arc;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::core::errors::DrugSpeakError;

pub mod speed;

pub use speed::{
    PlaybackSpeed,
    SPEED_OPTIONS,
};

/// Media SDK seam. `unload` takes the handle by value so a sound is released once.
#[async_trait]
pub trait AudioBackend: Send + Sync + 'static {
    type Handle: Send + Sync + 'static;

    async fn load(&self, uri: &str) -> Result<Self::Handle, DrugSpeakError>;
    async fn set_rate(&self, handle: &Self::Handle, rate: f32) -> Result<(), DrugSpeakError>;
    /// Resolves when playback finishes naturally.
    async fn play_to_end(&self, handle: &Self::Handle) -> Result<(), DrugSpeakError>;
    async fn unload(&self, handle: Self::Handle);
}

/// A loaded sound. Released explicitly after playback, or from `Drop` when the
/// playing task is aborted.
struct LoadedSound<B: AudioBackend> {
    backend: Arc<B>,
    handle: Option<B::Handle>,
}

impl<B: AudioBackend> LoadedSound<B> {
    async fn release(mut self) {
        if let Some(handle) = self.handle.take() {
            self.backend.unload(handle).await;
        }
    }
}

impl<B: AudioBackend> Drop for LoadedSound<B> {
    fn drop(&mut self) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        let backend = self.backend.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move { backend.unload(handle).await });
            }
            Err(_) => log::warn!("[Player] No runtime left to release an interrupted sound"),
        }
    }
}

pub struct PronunciationPlayer<B> {
    backend: Arc<B>,
}

impl<B> Clone for PronunciationPlayer<B> {
    fn clone(&self) -> Self {
        Self { backend: self.backend.clone() }
    }
}

impl<B: AudioBackend> PronunciationPlayer<B> {
    pub fn new(backend: Arc<B>) -> Self {
        Self { backend }
    }

    pub async fn play(&self, uri: &str, speed: PlaybackSpeed) -> Result<(), DrugSpeakError> {
        let handle = self.backend.load(uri).await?;
        let sound = LoadedSound { backend: self.backend.clone(), handle: Some(handle) };

        let result = match sound.handle.as_ref() {
            Some(handle) => self.play_loaded(handle, speed).await,
            None => Ok(()),
        };
        sound.release().await;
        result
    }

    async fn play_loaded(
        &self,
        handle: &B::Handle,
        speed: PlaybackSpeed,
    ) -> Result<(), DrugSpeakError> {
        self.backend.set_rate(handle, speed.rate()).await?;
        self.backend.play_to_end(handle).await
    }

    /// Plays on a detached task; failures only reach the log.
    pub fn spawn_play(&self, uri: String, speed: PlaybackSpeed) -> JoinHandle<()> {
        let player = self.clone();
        tokio::spawn(async move {
            if let Err(e) = player.play(&uri, speed).await {
                log::error!("[Player] Error playing audio {}: {}", uri, e);
            }
        })
    }
}
