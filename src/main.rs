use std::{
    path::{
        Path,
        PathBuf,
    },
    process::ExitCode,
    sync::Arc,
};

use async_trait::async_trait;
use clap::{
    Parser,
    Subcommand,
};
use drugspeak::{
    core::{
        CategoryLookup,
        LearningList,
        LearningListStore,
        SharedLearningList,
        UserId,
    },
    player::{
        AudioBackend,
        PlaybackSpeed,
        PronunciationPlayer,
    },
    screen::Notifier,
    study::{
        HttpStudyRecordService,
        RecordLoad,
        StudyError,
        StudyRecord,
    },
    Drug,
    DrugDetailScreen,
    DrugSpeakError,
    Settings,
    StudyRecordReconciler,
    UserIdentity,
};

#[derive(Parser)]
#[command(name = "drugspeak", about = "Drug pronunciation study list", version)]
struct Cli {
    /// Category lookup file (JSON map of id -> { "name": ... })
    #[arg(long, global = true)]
    categories: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show a drug's details and pronunciations
    Show {
        drug: PathBuf,
        #[arg(long)]
        user: Option<String>,
    },

    /// Add a drug to the learning list and update the study record
    Study {
        drug: PathBuf,
        #[arg(long)]
        user: String,
    },

    /// Print a user's study record
    Record {
        #[arg(long)]
        user: String,
    },

    /// Show or change saved settings
    Config {
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        audio_url: Option<String>,
        #[arg(long)]
        speed: Option<f32>,
    },
}

struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, title: &str, message: &str) {
        println!("{title}: {message}");
    }
}

/// The CLI has no audio device.
struct NoAudio;

#[async_trait]
impl AudioBackend for NoAudio {
    type Handle = ();

    async fn load(&self, uri: &str) -> Result<(), DrugSpeakError> {
        Err(DrugSpeakError::Custom(format!("audio playback unavailable for {uri}")))
    }

    async fn set_rate(&self, _handle: &(), _rate: f32) -> Result<(), DrugSpeakError> {
        Ok(())
    }

    async fn play_to_end(&self, _handle: &()) -> Result<(), DrugSpeakError> {
        Ok(())
    }

    async fn unload(&self, _handle: ()) {}
}

type CliScreen =
    DrugDetailScreen<HttpStudyRecordService, SharedLearningList, NoAudio, ConsoleNotifier>;

fn load_drug(path: &Path) -> Result<Drug, DrugSpeakError> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn open_screen(cli: &Cli, settings: &Settings, drug: Drug) -> Result<CliScreen, DrugSpeakError> {
    let categories: CategoryLookup = match &cli.categories {
        Some(path) => CategoryLookup::load(path)?,
        None => CategoryLookup::default(),
    };
    let learning = SharedLearningList::new(LearningList::load()?);
    let reconciler =
        StudyRecordReconciler::new(HttpStudyRecordService::from_settings(settings)?, learning);

    Ok(DrugDetailScreen::new(
        drug,
        &categories,
        settings,
        reconciler,
        PronunciationPlayer::new(Arc::new(NoAudio)),
        ConsoleNotifier,
    ))
}

fn print_screen(screen: &CliScreen) {
    println!("{}", screen.title());
    println!("{}", screen.formula_line());
    println!("{}", screen.categories_line());
    println!("{}", screen.description());
    for row in screen.sound_rows() {
        println!("  [{}] {} ({})", row.gender, row.key, row.speed);
    }
    if let Some(record) = screen.study_record() {
        println!(
            "Learning: {}  Finished: {}  Score: {}",
            record.current_learning(),
            record.finished_learning(),
            record.total_score()
        );
    }
    if screen.show_study_button() {
        println!("Not in your learning list yet");
    }
}

/// Ok(true) when the record was updated and the list is worth printing.
/// The drug stays in the local list even when the record update fails.
fn finish_study(result: Result<StudyRecord, StudyError>) -> Result<bool, DrugSpeakError> {
    match result {
        Ok(_) => Ok(true),
        Err(StudyError::AlreadyLearning(id)) => {
            println!("{id} is already in your learning list");
            Ok(false)
        }
        Err(StudyError::Anonymous) => Err(DrugSpeakError::Custom(StudyError::Anonymous.to_string())),
        Err(StudyError::Persist(e)) => Err(e),
    }
}

async fn run(cli: Cli) -> Result<(), DrugSpeakError> {
    let settings = Settings::load();

    match &cli.command {
        Command::Show { drug, user } => {
            let mut screen = open_screen(&cli, &settings, load_drug(drug)?)?;
            screen.activate(UserIdentity::from(user.as_deref().map(UserId::from))).await;
            print_screen(&screen);
        }
        Command::Study { drug, user } => {
            let mut screen = open_screen(&cli, &settings, load_drug(drug)?)?;
            screen.activate(UserIdentity::Authenticated(UserId::from(user.as_str()))).await;
            if !screen.show_study_button() {
                println!("{} is already in your learning list", screen.title());
                return Ok(());
            }
            if !finish_study(screen.press_study().await)? {
                return Ok(());
            }
            println!("Learning list:");
            for entry in screen.reconciler().learning_list().list() {
                let added = entry.added_at.format("%Y-%m-%d %H:%M");
                println!("  {} (added {})", entry.drug.name, added);
            }
        }
        Command::Record { user } => {
            let service = HttpStudyRecordService::from_settings(&settings)?;
            let learning = SharedLearningList::new(LearningList::in_memory());
            let mut reconciler = StudyRecordReconciler::new(service, learning);
            let identity = UserIdentity::Authenticated(UserId::from(user.as_str()));
            match reconciler.load_record(&identity).await {
                RecordLoad::Found => {
                    if let Some(record) = reconciler.cached_record() {
                        println!("{}", serde_json::to_string_pretty(record)?);
                    }
                }
                RecordLoad::NotFound | RecordLoad::Skipped => println!("No study record yet"),
                RecordLoad::Failed(e) => return Err(e),
            }
        }
        Command::Config { api_url, audio_url, speed } => {
            let mut settings = settings;
            if let Some(url) = api_url {
                settings.api_base_url = url.clone();
            }
            if let Some(url) = audio_url {
                settings.audio_base_url = url.clone();
            }
            if let Some(rate) = speed {
                settings.playback_speed = PlaybackSpeed::new(*rate)?.rate();
            }
            if api_url.is_some() || audio_url.is_some() || speed.is_some() {
                settings.save()?;
            }
            println!("{}", Settings::settings_path().display());
            println!("{}", serde_json::to_string_pretty(&settings)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use drugspeak::core::DrugId;

    use super::*;

    #[test]
    fn test_finish_study_outcomes() {
        let record = StudyRecord::new(UserId::from("u1"), Default::default());
        assert!(matches!(finish_study(Ok(record)), Ok(true)));

        let already = finish_study(Err(StudyError::AlreadyLearning(DrugId::from("D1"))));
        assert!(matches!(already, Ok(false)));

        assert!(matches!(finish_study(Err(StudyError::Anonymous)), Err(DrugSpeakError::Custom(_))));
    }

    #[test]
    fn test_finish_study_fails_when_record_not_saved() {
        let failed = StudyError::Persist(DrugSpeakError::HttpStatus {
            status: 503,
            url: "http://api/study-records/u1".to_string(),
        });

        match finish_study(Err(failed)) {
            Err(DrugSpeakError::HttpStatus { status, .. }) => assert_eq!(status, 503),
            other => panic!("expected the persist error, got {other:?}"),
        }
    }
}
