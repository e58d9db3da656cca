//! Operator commands read from stdin. Form setters edit local input state;
//! every action maps to exactly one mutation pipeline entry point.

use std::{io::Write as _, path::PathBuf, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use clap::{
    builder::BoolishValueParser, error::ErrorKind, ArgAction, Args, CommandFactory, Parser,
    Subcommand,
};
use log::{info, warn};
use tokio::{
    io::{AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::{watch, Mutex},
    task::JoinHandle,
};

use crate::{
    console::{Confirm, Console},
    mutations::{Action, MutationOutcome},
    presentation::format_dashboard,
    utils::files::load_upload,
};

/// One line typed at the console prompt.
#[derive(Debug, Parser)]
#[command(
    name = "facedash",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "commands:\n{subcommands}"
)]
struct CommandLine {
    #[command(subcommand)]
    command: ConsoleCommand,
}

/// Free text for a form field. Words are joined with single spaces; quote a
/// value to keep its spacing. No words clears the field.
#[derive(Debug, Clone, PartialEq, Args)]
pub struct Text {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    words: Vec<String>,
}

impl Text {
    pub fn value(&self) -> String {
        self.words.join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum SetCommand {
    PersonName(Text),
    PersonDescription(Text),
    StreamId(Text),
    StreamUrl(Text),
    YoutubeUrl(Text),
    /// YouTube download quality
    Quality(Text),
    /// Report format for YouTube jobs
    ReportFormat(Text),
    /// Seconds between sampled video frames
    FrameInterval { secs: f64 },
    MaxFrames { count: u32 },
    /// Render an annotated copy of processed videos
    Annotated {
        #[arg(action = ArgAction::Set, value_parser = BoolishValueParser::new())]
        enabled: bool,
    },
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum ConsoleCommand {
    /// Edit a form input
    #[command(subcommand)]
    Set(SetCommand),
    /// Person that images are uploaded for; no id clears it
    SelectPerson { person_id: Option<i64> },
    /// Attach images for upload-images
    AttachImages {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Attach the image to recognize
    AttachRecognition { path: PathBuf },
    /// Attach a video for upload-video
    AttachVideo { path: PathBuf },
    AddPerson,
    DeletePerson { person_id: i64 },
    UploadImages,
    Recognize,
    AddStream,
    RemoveStream { stream_id: String },
    UploadVideo,
    /// Start a job for the YouTube url form
    #[command(name = "youtube")]
    YouTube,
    /// Cancel a running job or remove a finished one
    CancelJob { job_id: String },
    /// Reload every resource now
    Refresh,
    /// Hide notification number <index>
    Dismiss { index: usize },
    /// Print the dashboard
    Show,
    #[command(alias = "exit")]
    Quit,
}

/// Command list printed at startup and by `help`.
pub fn help() -> String {
    CommandLine::command().render_help().to_string()
}

/// Parse one input line, splitting words the way a shell would. Blank lines
/// yield `None`.
pub fn parse(line: &str) -> Result<Option<ConsoleCommand>, clap::Error> {
    let Some(words) = shlex::split(line) else {
        return Err(CommandLine::command().error(ErrorKind::InvalidValue, "unbalanced quotes"));
    };
    if words.is_empty() {
        return Ok(None);
    }
    CommandLine::try_parse_from(words).map(|parsed| Some(parsed.command))
}

#[derive(Debug)]
pub enum Flow {
    Continue,
    /// A request went out on its own task.
    Pending(JoinHandle<MutationOutcome>),
    Quit,
}

async fn apply_set(console: &Console, set: SetCommand) {
    console
        .update_forms(move |forms| match set {
            SetCommand::PersonName(text) => forms.person.name = text.value(),
            SetCommand::PersonDescription(text) => forms.person.description = text.value(),
            SetCommand::StreamId(text) => forms.stream.stream_id = text.value(),
            SetCommand::StreamUrl(text) => forms.stream.rtsp_url = text.value(),
            SetCommand::YoutubeUrl(text) => forms.youtube.url = text.value(),
            SetCommand::Quality(text) => forms.youtube.quality = text.value(),
            SetCommand::ReportFormat(text) => forms.youtube.report_format = text.value(),
            SetCommand::FrameInterval { secs } => forms.video_options.frame_interval = secs,
            SetCommand::MaxFrames { count } => forms.video_options.max_frames = count,
            SetCommand::Annotated { enabled } => {
                forms.video_options.generate_annotated = enabled
            }
        })
        .await;
}

/// Run one command against the console. File errors bubble up so the caller
/// can report them; request failures are already notifications.
///
/// Confirmation reads the same stdin as the command loop, so it is collected
/// here. The request itself runs on a spawned task and never holds the loop.
pub async fn execute(console: &Console, command: ConsoleCommand) -> Result<Flow> {
    let action = match command {
        ConsoleCommand::Set(set) => {
            apply_set(console, set).await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::SelectPerson { person_id } => {
            console
                .update_forms(move |forms| forms.images.person_id = person_id)
                .await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::AttachImages { paths } => {
            let mut files = Vec::with_capacity(paths.len());
            for path in &paths {
                files.push(load_upload(path).await?);
            }
            console.update_forms(move |forms| forms.images.files = files).await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::AttachRecognition { path } => {
            let file = load_upload(&path).await?;
            console
                .update_forms(move |forms| forms.recognition_file = Some(file))
                .await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::AttachVideo { path } => {
            let file = load_upload(&path).await?;
            console
                .update_forms(move |forms| forms.video_file = Some(file))
                .await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Refresh => {
            console.poller().refresh_all().await;
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Dismiss { index } => {
            let visible = console.notifications().visible().await;
            match index.checked_sub(1).and_then(|i| visible.get(i)) {
                Some(item) => {
                    console.notifications().dismiss(item.id).await;
                }
                None => warn!("no notification #{index}"),
            }
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Show => {
            println!("{}", format_dashboard(&console.render().await));
            return Ok(Flow::Continue);
        }
        ConsoleCommand::Quit => return Ok(Flow::Quit),
        ConsoleCommand::AddPerson => Action::AddPerson,
        ConsoleCommand::DeletePerson { person_id } => Action::DeletePerson(person_id),
        ConsoleCommand::UploadImages => Action::UploadImages,
        ConsoleCommand::Recognize => Action::Recognize,
        ConsoleCommand::AddStream => Action::AddStream,
        ConsoleCommand::RemoveStream { stream_id } => Action::RemoveStream(stream_id),
        ConsoleCommand::UploadVideo => Action::UploadVideo,
        ConsoleCommand::YouTube => Action::YouTube,
        ConsoleCommand::CancelJob { job_id } => Action::CancelJob(job_id),
    };

    if !console.mutations().confirm(&action).await {
        return Ok(Flow::Continue);
    }

    let console = console.clone();
    Ok(Flow::Pending(tokio::spawn(async move {
        let outcome = console.mutations().perform(action).await;
        if outcome == MutationOutcome::Invalid {
            info!("required inputs are missing; nothing was sent");
        }
        outcome
    })))
}

pub type SharedLines = Arc<Mutex<Lines<BufReader<Stdin>>>>;

pub fn stdin_lines() -> SharedLines {
    Arc::new(Mutex::new(BufReader::new(tokio::io::stdin()).lines()))
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

/// Asks on stdout and reads the answer from the same stdin the command loop
/// uses. Anything but `y`/`yes` declines, including end of input.
pub struct StdinConfirm {
    lines: SharedLines,
    prompting: watch::Sender<bool>,
}

impl StdinConfirm {
    pub fn new(lines: SharedLines) -> Self {
        let (prompting, _) = watch::channel(false);
        Self { lines, prompting }
    }

    /// The stdin reader shared with the command loop.
    pub fn lines(&self) -> SharedLines {
        self.lines.clone()
    }

    /// True while a `[y/N]` question waits for its answer.
    pub fn prompting(&self) -> watch::Receiver<bool> {
        self.prompting.subscribe()
    }
}

#[async_trait]
impl Confirm for StdinConfirm {
    async fn confirm(&self, prompt: &str) -> bool {
        self.prompting.send_replace(true);
        print!("{prompt} [y/N] ");
        let _ = std::io::stdout().flush();

        let answer = match self.lines.lock().await.next_line().await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(err) => {
                warn!("failed to read confirmation: {err}");
                false
            }
        };
        self.prompting.send_replace(false);
        answer
    }
}
