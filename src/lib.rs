pub mod api;
pub mod commands;
pub mod console;
pub mod forms;
pub mod jobs;
pub mod models;
pub mod mutations;
pub mod notifications;
pub mod poller;
pub mod presentation;
pub mod settings;
pub mod store;
pub mod utils;

use std::{path::PathBuf, sync::Arc};

use anyhow::Result;
use clap::Parser;
use log::{error, info, warn};
use tokio::{sync::watch, task::JoinHandle};

use api::{ApiClient, ReqwestTransport};
use commands::{execute, Flow, StdinConfirm};
use console::Console;
use presentation::format_dashboard;
use settings::{ConsoleSettings, SettingsStore};

/// Operator console for the face recognition service.
#[derive(Debug, Parser)]
#[command(name = "facedash", version)]
struct Cli {
    /// Server to sync with. Remembered in the settings file for later runs.
    base_url: Option<String>,
    /// Settings file to use instead of `FACEDASH_SETTINGS` or `facedash.json`.
    #[arg(long)]
    settings: Option<PathBuf>,
}

/// Redraw whenever the store, the notifications or the forms change. Frames
/// are held back while `prompting` is true and drawn once it clears.
fn spawn_redraw(
    console: Console,
    mut prompting: watch::Receiver<bool>,
    draw: impl Fn(String) + Send + Sync + 'static,
) -> JoinHandle<()> {
    let mut changes = console.subscribe();
    tokio::spawn(async move {
        let mut dirty = false;
        loop {
            tokio::select! {
                changed = changes.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    dirty = true;
                }
                changed = prompting.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }

            let paused = *prompting.borrow();
            if dirty && !paused {
                dirty = false;
                draw(format_dashboard(&console.render().await));
            }
        }
    })
}

async fn serve(settings: ConsoleSettings) -> Result<()> {
    let transport = ReqwestTransport::new(&settings.base_url, settings.request_timeout())?;
    let api = ApiClient::new(Arc::new(transport), &settings.base_url)?;

    let confirm = Arc::new(StdinConfirm::new(commands::stdin_lines()));
    let lines = confirm.lines();
    let prompting = confirm.prompting();
    let console = Console::new(api, settings, confirm);

    console.start().await;
    let redraw = spawn_redraw(console.clone(), prompting, |frame| println!("{frame}"));
    println!("{}", commands::help());

    loop {
        let line = match lines.lock().await.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("failed to read command: {err}");
                break;
            }
        };

        let command = match commands::parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(err) => {
                let _ = err.print();
                continue;
            }
        };

        match execute(&console, command).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue | Flow::Pending(_)) => {}
            Err(err) => warn!("{err:#}"),
        }
    }

    redraw.abort();
    console.shutdown().await;
    Ok(())
}

/// Entry point of the `facedash` binary.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    utils::logging::init();
    info!("facedash starting up...");

    let settings_store =
        SettingsStore::new(cli.settings.unwrap_or_else(SettingsStore::default_path))?;
    let mut settings = settings_store.current();
    // An explicit url beats `FACEDASH_BASE_URL` for this run.
    if let Some(base_url) = &cli.base_url {
        settings_store.update_base_url(base_url)?;
        settings.base_url = base_url.trim_end_matches('/').to_string();
    }

    // One cooperative thread: polls and mutations interleave, never run in parallel.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(serve(settings))?;

    info!("facedash stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{sync::Mutex, time::Duration};

    use super::*;
    use crate::{
        api::testing::FakeTransport,
        console::testing::{console, ScriptedConfirm},
    };

    #[test]
    fn cli_takes_an_optional_url_and_settings_path() {
        let cli = Cli::try_parse_from(["facedash"]).unwrap();
        assert_eq!(cli.base_url, None);
        assert_eq!(cli.settings, None);

        let cli = Cli::try_parse_from([
            "facedash",
            "http://10.0.0.5:8000",
            "--settings",
            "/tmp/console.json",
        ])
        .unwrap();
        assert_eq!(cli.base_url.as_deref(), Some("http://10.0.0.5:8000"));
        assert_eq!(cli.settings, Some(PathBuf::from("/tmp/console.json")));

        assert!(Cli::try_parse_from(["facedash", "a", "b"]).is_err());
    }

    #[tokio::test]
    async fn redraws_wait_for_an_open_prompt() {
        let transport = FakeTransport::new();
        let console = console(&transport, ScriptedConfirm::new(true));
        let (prompting, prompting_rx) = watch::channel(false);
        let frames = Arc::new(Mutex::new(Vec::new()));
        let sink = frames.clone();
        let redraw = spawn_redraw(console.clone(), prompting_rx, move |frame| {
            sink.lock().unwrap().push(frame)
        });

        prompting.send_replace(true);
        console
            .update_forms(|forms| forms.person.name = "Ana".into())
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(frames.lock().unwrap().is_empty());

        prompting.send_replace(false);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(frames.lock().unwrap().len(), 1);

        console
            .update_forms(|forms| forms.person.name = "Bruno".into())
            .await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(frames.lock().unwrap().len(), 2);
        redraw.abort();
    }
}
