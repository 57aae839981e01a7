//! Tracing setup and the `serve` / `explore` commands.

use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use autoprobe_api::{ApiServer, ApiServerConfig, AppState};
use autoprobe_runtime::{InitRequest, OutcomeStatus, SessionController, TaskBrief};

use crate::adapters::{autoprobe_dir, build_services, load_config, root_dir, session_config};
use crate::cli::ExploreArgs;

/// Initialize tracing with console and file output.
///
/// Log files are written to ~/.autoprobe/logs/ with daily rotation.
pub(crate) fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
    let log_dir = autoprobe_dir().join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("autoprobe")
        .filename_suffix("log")
        .max_log_files(30)
        .build(&log_dir)?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    // The guard flushes on drop; keep it for the life of the process.
    static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
        std::sync::OnceLock::new();
    let _ = GUARD.set(guard);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true).with_ansi(true))
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(())
}

/// Run the control surface until Ctrl-C.
pub(crate) async fn run_server(
    config_path: &Path,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let services = build_services(&config)?;
    let controller = Arc::new(SessionController::new(
        services,
        session_config(&config.exploration),
    ));
    let state = Arc::new(AppState::new(
        controller.clone(),
        root_dir(&config.exploration),
    ));

    let server_config = ApiServerConfig::new(
        host.unwrap_or(config.server.host),
        port.unwrap_or(config.server.port),
    );
    let server = ApiServer::new(server_config, state);

    server
        .run_until(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    // Release the browser if a session was still open.
    if let Err(e) = controller.stop().await {
        warn!("Failed to stop exploration on shutdown: {}", e);
    }
    info!("AutoProbe server stopped");
    Ok(())
}

/// Explore one prototype in the foreground.
///
/// Ctrl-C lets the current round finish, then ends the run.
pub(crate) async fn run_explore(
    config_path: &Path,
    args: ExploreArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;

    let app = match args.app {
        Some(app) => app,
        None => prompt("What is the name of the app you want to explore?")?,
    };
    let request = InitRequest {
        app,
        url: args.url,
        password: args.password,
        root_dir: args.root_dir.unwrap_or_else(|| root_dir(&config.exploration)),
    };

    let services = build_services(&config)?;
    let controller = Arc::new(SessionController::new(
        services,
        session_config(&config.exploration),
    ));

    let summary = controller.initialize(request).await?;
    info!(
        "Initialized {} at {} ({}x{} at {},{})",
        summary.app, summary.task_dir, summary.width, summary.height, summary.x, summary.y
    );

    let task_description = match args.task_desc {
        Some(task) => task,
        None => prompt("Please describe the task you want to perform on the prototype.")?,
    };
    let persona_description = match args.persona_desc {
        Some(persona) => Some(persona).filter(|p| !p.trim().is_empty()),
        None => prompt_optional(
            "(Optional) Please enter the description of the user persona you'd like me to emulate:",
        )?,
    };
    let brief = TaskBrief {
        task_description,
        persona_description,
    };

    controller.start(brief).await?;

    let watcher = {
        let controller = controller.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                warn!("Stop requested, finishing the current round");
                controller.request_stop();
            }
        })
    };

    let outcome = controller.wait().await;
    watcher.abort();
    controller.stop().await?;

    match outcome {
        Some(outcome) => {
            println!("{}", outcome.message);
            if outcome.status == OutcomeStatus::Error {
                return Err(outcome.message.into());
            }
        }
        None => return Err("exploration ended without an outcome".into()),
    }
    Ok(())
}

/// Ask on stdout and read one non-empty line from stdin.
fn prompt(question: &str) -> io::Result<String> {
    prompt_from(question, &mut io::stdin().lock(), &mut io::stdout())
}

fn prompt_from(
    question: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<String> {
    loop {
        writeln!(output, "{}", question)?;
        output.flush()?;
        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "no input for required value",
            ));
        }
        let answer = line.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

/// Ask once; an empty answer or closed stdin means no value.
fn prompt_optional(question: &str) -> io::Result<Option<String>> {
    prompt_optional_from(question, &mut io::stdin().lock(), &mut io::stdout())
}

fn prompt_optional_from(
    question: &str,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> io::Result<Option<String>> {
    writeln!(output, "{}", question)?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    let answer = line.trim();
    Ok((!answer.is_empty()).then(|| answer.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_skips_blank_lines() {
        let mut input = io::Cursor::new("\n  \n My Shop \n");
        let mut output = Vec::new();
        let answer = prompt_from("App name?", &mut input, &mut output).unwrap();
        assert_eq!(answer, "My Shop");
        let shown = String::from_utf8(output).unwrap();
        assert_eq!(shown.matches("App name?").count(), 3);
    }

    #[test]
    fn test_prompt_eof() {
        let mut input = io::Cursor::new("");
        let mut output = Vec::new();
        let err = prompt_from("Task?", &mut input, &mut output).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_optional_prompt() {
        let mut output = Vec::new();
        let answer =
            prompt_optional_from("Persona?", &mut io::Cursor::new(" a busy parent \n"), &mut output)
                .unwrap();
        assert_eq!(answer.as_deref(), Some("a busy parent"));
        assert_eq!(String::from_utf8(output).unwrap(), "Persona?\n");

        let mut output = Vec::new();
        let blank = prompt_optional_from("Persona?", &mut io::Cursor::new("\nignored\n"), &mut output);
        assert_eq!(blank.unwrap(), None);

        let mut output = Vec::new();
        let eof = prompt_optional_from("Persona?", &mut io::Cursor::new(""), &mut output);
        assert_eq!(eof.unwrap(), None);
    }
}
