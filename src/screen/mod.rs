use std::collections::HashMap;

use tokio::task::JoinHandle;

use crate::{
    core::{
        CategoryLookup,
        Drug,
        DrugSpeakError,
        Gender,
        LearningListStore,
        UserIdentity,
    },
    player::{
        AudioBackend,
        PlaybackSpeed,
        PronunciationPlayer,
    },
    settings::Settings,
    study::{
        RecordLoad,
        StudyError,
        StudyRecord,
        StudyRecordReconciler,
        StudyRecordService,
    },
};

pub const STUDY_ADDED_TITLE: &str = "Added to Learning List";

/// User-visible alerts.
pub trait Notifier {
    fn notify(&self, title: &str, message: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct SoundRow {
    pub key: String,
    pub label: String,
    pub gender: Gender,
    pub speed: PlaybackSpeed,
    pub is_open: bool,
}

pub struct DrugDetailScreen<S, L, B, N> {
    drug: Drug,
    categories: String,
    audio_base_url: String,
    reconciler: StudyRecordReconciler<S, L>,
    player: PronunciationPlayer<B>,
    notifier: N,
    playback_speed: PlaybackSpeed,
    sound_speeds: HashMap<usize, PlaybackSpeed>,
    open_index: Option<usize>,
}

impl<S, L, B, N> DrugDetailScreen<S, L, B, N>
where
    S: StudyRecordService,
    L: LearningListStore,
    B: AudioBackend,
    N: Notifier,
{
    pub fn new(
        drug: Drug,
        categories: &CategoryLookup,
        settings: &Settings,
        reconciler: StudyRecordReconciler<S, L>,
        player: PronunciationPlayer<B>,
        notifier: N,
    ) -> Self {
        let playback_speed = PlaybackSpeed::new(settings.playback_speed).unwrap_or_else(|e| {
            log::warn!("[Settings] {}, using {}", e, PlaybackSpeed::NORMAL);
            PlaybackSpeed::NORMAL
        });

        Self {
            categories: categories.display_names(&drug.categories),
            drug,
            audio_base_url: settings.audio_base_url.clone(),
            reconciler,
            player,
            notifier,
            playback_speed,
            sound_speeds: HashMap::new(),
            open_index: None,
        }
    }

    pub fn drug(&self) -> &Drug {
        &self.drug
    }

    pub fn title(&self) -> &str {
        &self.drug.name
    }

    pub fn formula_line(&self) -> String {
        format!("({})", self.drug.molecular_formula)
    }

    pub fn categories_line(&self) -> String {
        format!("Categories: {}", self.categories)
    }

    pub fn description(&self) -> &str {
        &self.drug.description
    }

    pub fn study_record(&self) -> Option<&StudyRecord> {
        self.reconciler.cached_record()
    }

    pub fn reconciler(&self) -> &StudyRecordReconciler<S, L> {
        &self.reconciler
    }

    /// Called on activation and whenever the signed-in user may have changed.
    pub async fn activate(&mut self, identity: UserIdentity) -> Option<RecordLoad> {
        self.reconciler.observe_identity(identity).await
    }

    pub fn playback_speed(&self) -> PlaybackSpeed {
        self.playback_speed
    }

    pub fn set_playback_speed(&mut self, rate: f32) -> Result<(), DrugSpeakError> {
        self.playback_speed = PlaybackSpeed::new(rate)?;
        Ok(())
    }

    pub fn sound_speed(&self, index: usize) -> PlaybackSpeed {
        self.sound_speeds.get(&index).copied().unwrap_or(self.playback_speed)
    }

    pub fn set_sound_speed(&mut self, index: usize, rate: f32) -> Result<(), DrugSpeakError> {
        self.check_sound(index)?;
        self.sound_speeds.insert(index, PlaybackSpeed::new(rate)?);
        Ok(())
    }

    /// Opening one sound's speed picker closes any other.
    pub fn open_player(&mut self, index: usize) -> Result<(), DrugSpeakError> {
        self.check_sound(index)?;
        self.open_index = Some(index);
        Ok(())
    }

    pub fn close_player(&mut self) {
        self.open_index = None;
    }

    pub fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    pub fn sound_rows(&self) -> Vec<SoundRow> {
        self.drug
            .sounds
            .iter()
            .enumerate()
            .map(|(index, sound)| SoundRow {
                key: sound.key(),
                label: self.drug.name.clone(),
                gender: sound.gender.clone(),
                speed: self.sound_speed(index),
                is_open: self.open_index == Some(index),
            })
            .collect()
    }

    pub fn play_sound(&self, index: usize) -> Result<JoinHandle<()>, DrugSpeakError> {
        let sound = self.drug.sounds.get(index).ok_or(DrugSpeakError::UnknownSound(index))?;
        Ok(self.player.spawn_play(sound.uri(&self.audio_base_url), self.sound_speed(index)))
    }

    pub fn show_study_button(&self) -> bool {
        !self.reconciler.is_learning(&self.drug.id)
    }

    /// Failures are already in the operator log; the user only hears about success.
    pub async fn press_study(&mut self) -> Result<StudyRecord, StudyError> {
        let record = self.reconciler.add_to_learning(&self.drug).await?;
        self.notifier.notify(
            STUDY_ADDED_TITLE,
            &format!("{} has been added to your study list", self.drug.name),
        );
        Ok(record)
    }

    fn check_sound(&self, index: usize) -> Result<(), DrugSpeakError> {
        if index < self.drug.sounds.len() {
            Ok(())
        } else {
            Err(DrugSpeakError::UnknownSound(index))
        }
    }
}
