#![deny(clippy::implicit_return)]
#![allow(clippy::needless_return)]

mod application;
mod configuration;
mod domain;
mod infrastructure;

use std::env;
use std::process;

use anyhow::Error;
use domain::models::Action;
use domain::models::Event;
use domain::services::clipboard::ClipboardService;
use infrastructure::api::ApiManager;
use tokio::sync::mpsc;
use tokio::task;
use yansi::Paint;

use crate::application::cli;
use crate::application::ui;
use crate::configuration::Config;
use crate::configuration::ConfigKey;
use crate::domain::services::actions::ActionsService;

fn handle_error(err: Error) {
    eprintln!(
        "{}",
        Paint::red(format!(
            "Oh no! Monshin has failed with the following app version and error.\n\nVersion: {}\nError: {}",
            env!("CARGO_PKG_VERSION"),
            err
        ))
    );

    let backtrace = err.backtrace();
    if backtrace.to_string() == "disabled backtrace" {
        let args = env::args().collect::<Vec<String>>().join(" ");
        eprintln!("\nRunning the following can help explain further what the issue is:");
        eprintln!("\nRUST_BACKTRACE=1 {args}");
    } else {
        eprintln!("\n{}", backtrace);
    }

    process::exit(1);
}

/// Binds the process to an encounter before the chat view opens: reuse the
/// id passed on the command line, or open a fresh one.
async fn bind_encounter() -> anyhow::Result<()> {
    if !Config::get(ConfigKey::EncounterId).is_empty() {
        return Ok(());
    }

    let api = ApiManager::get()?;
    let chief_complaint = Config::get(ConfigKey::ChiefComplaint);
    let chief_complaint_opt = if chief_complaint.is_empty() {
        None
    } else {
        Some(chief_complaint.as_str())
    };

    let encounter_id = api.create_encounter(chief_complaint_opt).await?;
    Config::set(ConfigKey::EncounterId, &encounter_id);

    return Ok(());
}

#[tokio::main]
async fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        ui::destruct_terminal_for_panic();
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let debug_log_dir = env::var("MONSHIN_LOG_DIR").unwrap_or_else(|_| {
        return dirs::cache_dir()
            .unwrap()
            .join("monshin")
            .to_string_lossy()
            .to_string();
    });

    let file_appender = tracing_appender::rolling::never(debug_log_dir, "debug.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    if env::var("RUST_LOG")
        .unwrap_or_else(|_| return "".to_string())
        .contains("monshin")
    {
        tracing_subscriber::fmt()
            .json()
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(writer)
            .init();
    }

    let ready_res = cli::parse().await;
    if let Err(ready_err) = ready_res {
        handle_error(ready_err);
        return;
    }
    if !ready_res.unwrap() {
        process::exit(0);
    }

    let startup_res = async {
        let api = ApiManager::get()?;
        api.health_check().await?;
        bind_encounter().await?;
        return anyhow::Ok(api.fetch_greeting().await.ok());
    }
    .await;

    let greeting = match startup_res {
        Ok(greeting) => greeting,
        Err(startup_err) => {
            handle_error(startup_err);
            return;
        }
    };

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

    let mut background_futures = task::JoinSet::new();
    background_futures.spawn(async move {
        return ActionsService::start(ApiManager::get()?, event_tx, &mut action_rx).await;
    });

    if let Err(clipboard_err) = ClipboardService::healthcheck() {
        tracing::warn!(err = ?clipboard_err, "Clipboard service is unable to start")
    } else {
        background_futures.spawn(async move {
            return ClipboardService::start().await;
        });
    }

    let ui_future = ui::start(greeting, action_tx, event_rx);

    let res = tokio::select!(
        res = background_futures.join_next() => res.unwrap().unwrap(),
        res = ui_future => res,
    );

    if res.is_err() {
        ui::destruct_terminal_for_panic();
        handle_error(res.unwrap_err());
    }

    process::exit(0);
}
