//! Terminal front end for the assistant.
//!
//! Typed lines stand in for speech. While the wake-word monitor is
//! listening, each line is one recognition turn; saying the wake phrase
//! opens a foreground session and the next line is answered as a command.

mod console_engine;

use anyhow::Context;
use clap::Parser;
use console_engine::ConsoleRecognizerFactory;
use futures::stream::{self, StreamExt};
use murmur_apps::{AppResolver, StaticCatalog};
use murmur_assistant::{provider_from_config, Assistant};
use murmur_config::AssistantConfig;
use murmur_dispatch::mock::MockDevice;
use murmur_dispatch::SystemActionDispatcher;
use murmur_events::{
    event_names, BroadcastEventBus, EmittedEvent, MonitorStatusChangedEvent,
    WakeWordDetectedEvent,
};
use murmur_wake::{
    ForegroundSession, MicrophoneArbiter, MonitorDeps, MonitorHandle, TimedWakeLock,
    WakeWordService,
};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

/// Apps offered by the simulated device.
const DEMO_APPS: &[(&str, &str)] = &[
    ("com.whatsapp", "WhatsApp"),
    ("com.spotify.music", "Spotify"),
    ("com.google.android.apps.photos", "Google Photos"),
    ("com.google.android.apps.docs", "Google Drive"),
    ("com.google.android.apps.maps", "Google Maps"),
    ("com.android.chrome", "Chrome"),
    ("com.android.camera", "Camera"),
    ("com.android.calculator2", "Calculator"),
    ("com.netflix.mediaclient", "Netflix"),
];

#[derive(Debug, Parser)]
#[command(name = "murmur", version, about = "Voice assistant core, driven from the terminal")]
struct Args {
    /// Config file (defaults to the per-user config directory).
    #[arg(long, env = "MURMUR_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured wake phrase.
    #[arg(long)]
    wake_phrase: Option<String>,

    /// Skip the wake word and treat every line as a command.
    #[arg(long)]
    no_wake: bool,
}

enum Input {
    Line(String),
    Eof,
    Bus(EmittedEvent),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,murmur=debug")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    let device = Arc::new(MockDevice::new());
    let resolver = AppResolver::new(Arc::new(StaticCatalog::from_pairs(DEMO_APPS)));
    let dispatcher = SystemActionDispatcher::new(device, resolver);
    let ai = provider_from_config(&config.ai).context("Failed to set up the AI provider")?;
    tracing::info!(model = ai.model_name(), "AI provider ready");
    let assistant = Assistant::new(dispatcher, ai);

    let bus = Arc::new(BroadcastEventBus::new(64));
    let events = bus.subscribe();
    let engine = ConsoleRecognizerFactory::new();
    let service = WakeWordService::spawn(
        &config,
        MonitorDeps {
            factory: Arc::new(engine.clone()),
            bus: bus.clone(),
            microphone: MicrophoneArbiter::new(),
            wake_lock: Box::new(TimedWakeLock::new()),
        },
    )
    .context("Failed to start wake word detection")?;
    let monitor = service.as_ref().map(WakeWordService::handle);

    match &monitor {
        Some(_) => println!(
            "Say '{}' to wake me. :status, :pause, :resume, :quit control the monitor.",
            config.wake_phrase
        ),
        None => println!("Wake word off. Every line is a command. :quit to exit."),
    }

    let mut inputs = Box::pin(stream::select(stdin_lines(), bus_events(events)));
    let mut foreground: Option<ForegroundSession> = None;

    loop {
        let input = tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            input = inputs.next() => input,
        };

        match input {
            None | Some(Input::Eof) => break,
            Some(Input::Bus(event)) => {
                if let Some(session) = on_bus_event(&event, monitor.as_ref()).await {
                    foreground = Some(session);
                }
            }
            Some(Input::Line(line)) => {
                let line = line.trim();
                match line_target(line, monitor.is_some(), foreground.is_some()) {
                    LineTarget::Control(control) => {
                        if !run_control(control, monitor.as_ref()).await {
                            break;
                        }
                    }
                    LineTarget::Ignore => {}
                    LineTarget::Assistant => {
                        answer(&assistant, line).await;
                        // Answering ends the foreground turn.
                        if let Some(session) = foreground.take() {
                            session.close();
                        }
                    }
                    LineTarget::Recognizer => {
                        if !engine.feed(line) {
                            if let Some(handle) = &monitor {
                                println!("({})", handle.status().text);
                            }
                        }
                    }
                }
            }
        }
    }

    drop(foreground);
    if let Some(service) = service {
        service.shutdown().await;
    }
    Ok(())
}

/// Where a typed line goes.
#[derive(Debug, PartialEq, Eq)]
enum LineTarget<'a> {
    Control(&'a str),
    /// Blank line while waiting for a command; keep waiting.
    Ignore,
    Assistant,
    Recognizer,
}

fn line_target(line: &str, wake_enabled: bool, in_session: bool) -> LineTarget<'_> {
    if let Some(control) = line.strip_prefix(':') {
        return LineTarget::Control(control);
    }
    match (wake_enabled, in_session) {
        (true, false) => LineTarget::Recognizer,
        _ if line.is_empty() => LineTarget::Ignore,
        _ => LineTarget::Assistant,
    }
}

fn load_config(args: &Args) -> anyhow::Result<AssistantConfig> {
    let mut config = match &args.config {
        Some(path) => AssistantConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AssistantConfig::load().context("Failed to load config")?,
    };
    if let Some(phrase) = &args.wake_phrase {
        config.wake_phrase = phrase.clone();
    }
    if args.no_wake {
        config.wake_word_enabled = false;
    }
    config.validate().context("Invalid config")?;
    Ok(config)
}

fn stdin_lines() -> impl futures::Stream<Item = Input> {
    let lines = BufReader::new(tokio::io::stdin()).lines();
    stream::unfold(lines, |mut lines| async move {
        match lines.next_line().await {
            Ok(Some(line)) => Some((Input::Line(line), lines)),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stdin");
                None
            }
        }
    })
    .chain(stream::once(async { Input::Eof }))
}

fn bus_events(rx: broadcast::Receiver<EmittedEvent>) -> impl futures::Stream<Item = Input> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((Input::Bus(event), rx)),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Console fell behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
}

/// Print status changes; open a foreground session on wake.
async fn on_bus_event(
    event: &EmittedEvent,
    monitor: Option<&MonitorHandle>,
) -> Option<ForegroundSession> {
    match event.topic.as_str() {
        event_names::MONITOR_STATUS_CHANGED => {
            if let Ok(status) =
                serde_json::from_value::<MonitorStatusChangedEvent>(event.payload.clone())
            {
                println!("[{}] {}", status.state, status.text);
            }
            None
        }
        event_names::WAKE_WORD_DETECTED => {
            let detected =
                serde_json::from_value::<WakeWordDetectedEvent>(event.payload.clone()).ok()?;
            tracing::debug!(transcript = %detected.transcript, "Wake phrase heard");
            match monitor?.open_chat_session().await {
                Ok(session) => {
                    println!("Yes? (listening for a command)");
                    Some(session)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Could not open a foreground session");
                    None
                }
            }
        }
        _ => None,
    }
}

/// Handle a `:command`. Returns false when the console should exit.
async fn run_control(control: &str, monitor: Option<&MonitorHandle>) -> bool {
    let command = control.trim();
    if command == "quit" {
        return false;
    }
    let Some(handle) = monitor else {
        println!("Wake word detection is off");
        return true;
    };
    let result = match command {
        "status" => {
            let status = handle.status();
            println!(
                "{} ({}, {} mode, {} errors)",
                status.text, status.state, status.mode, status.consecutive_errors
            );
            Ok(())
        }
        "pause" => handle.pause().await,
        "resume" => handle.resume().await,
        other => {
            println!("Unknown command :{other}");
            Ok(())
        }
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "Monitor control failed");
    }
    true
}

async fn answer(assistant: &Assistant, line: &str) {
    let reply = assistant.handle(line).await;
    println!("TARS: {}", reply.text);
}
