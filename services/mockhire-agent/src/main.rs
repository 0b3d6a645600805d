mod config;
mod interview;
mod relay;

use crate::config::Config;
use crate::interview::InterviewPlan;
use crate::relay::RelayTransport;
use anyhow::{Context, Result};
use clap::Parser;
use mockhire_core::Command;
use mockhire_core::feedback::FeedbackServiceClient;
use mockhire_core::session::{CallSession, SessionMode, SessionParams};
use std::path::PathBuf;
use tracing_subscriber::fmt::time::ChronoLocal;

/// Conducts an AI mock interview over the VoiceGate call relay.
#[derive(Parser)]
struct Cli {
    /// Path to the interview plan JSON. Required for scored interviews.
    #[arg(long)]
    interview: Option<PathBuf>,

    /// Run a question-generation session instead of a scored interview.
    #[arg(long)]
    generate: bool,

    /// Candidate display name.
    #[arg(long)]
    name: Option<String>,

    /// Candidate id, as known to the feedback service.
    #[arg(long)]
    user: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load application configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(ChronoLocal::rfc_3339())
        .init();

    tracing::info!("Configuration loaded. Starting the interview agent...");

    // --- 3. Parse Command-Line Arguments ---
    let args = Cli::parse();
    let mode = if args.generate {
        SessionMode::Generate
    } else {
        SessionMode::Evaluate
    };

    // --- 4. Load the Interview Plan ---
    let plan: Option<InterviewPlan> = match mode {
        SessionMode::Evaluate => {
            let path = args.interview.as_deref().context(
                "scored interviews need --interview <plan.json>; pass --generate to run without one",
            )?;
            let plan = interview::load_plan(path).context("Failed to load the interview plan")?;
            tracing::info!(
                interview = %plan.interview_id,
                role = %plan.role.as_deref().unwrap_or("unspecified"),
                questions = plan.questions.len(),
                "interview plan loaded"
            );
            Some(plan)
        }
        SessionMode::Generate => {
            if args.interview.is_some() {
                tracing::warn!("--interview is ignored for generate sessions");
            }
            None
        }
    };

    // --- 5. Connect to the Relay ---
    let mut relay_config = voicegate_realtime::Config::builder().with_api_key(&config.relay_api_key);
    if let Some(url) = &config.relay_url {
        relay_config = relay_config.with_base_url(url);
    }
    let client = voicegate_realtime::connect_with_config(256, relay_config.build())
        .await
        .context("Failed to connect to the VoiceGate relay")?;
    let mut transport = RelayTransport::new(client);

    // --- 6. Wire the Session ---
    let feedback =
        FeedbackServiceClient::new(config.feedback_url.clone(), config.feedback_api_key.clone());
    // The command channel decouples the session's decisions from this
    // runtime's handling of them.
    let (command_tx, mut command_rx) = tokio::sync::mpsc::channel::<Command>(32);

    let mut session = CallSession::new(SessionParams {
        mode,
        participant_name: args.name,
        participant_id: args.user,
        interview_id: plan.as_ref().map(|plan| plan.interview_id.clone()),
        feedback_id: plan.as_ref().and_then(|plan| plan.feedback_id.clone()),
        questions: plan.as_ref().map(|plan| plan.questions.clone()),
    });

    let Some(mut events) = session.start(&mut transport, &config.targets()).await else {
        anyhow::bail!(
            "could not start the call: {}",
            session.last_error().unwrap_or("unknown failure")
        );
    };

    // --- 7. Run the Call ---
    let mut shown = String::new();
    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => {
                        session.handle_event(event, &feedback, &command_tx).await;
                        if let Some(line) = session.last_line() {
                            if line != shown {
                                println!("{line}");
                                shown = line.to_string();
                            }
                        }
                        if session.is_finished() {
                            break;
                        }
                    }
                    None => {
                        tracing::warn!("event stream closed before the call ended");
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received Ctrl-C, hanging up...");
                session.stop(&mut transport, &feedback, &command_tx).await;
                break;
            }
        }
    }

    // --- 8. Hand Off ---
    // Completion has already run by the time the loop exits, so closing our
    // sender leaves exactly the buffered navigation to drain.
    drop(command_tx);
    while let Some(Command::Navigate(route)) = command_rx.recv().await {
        println!("next: {}", route.path());
    }

    if let Some(error) = session.last_error() {
        tracing::warn!("session ended with an error surfaced: {}", error);
    }
    tracing::info!("session {}", session.status());
    Ok(())
}
