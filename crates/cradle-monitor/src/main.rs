//! # cradle-monitor
//!
//! Console client for the Cradle baby-health monitor — wires settings, auth,
//! the realtime pipeline, and the alert engine with console sinks.

#![deny(unsafe_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cradle_alerts::{AlertConfig, AlertEngine, ConsoleHaptics, ConsoleNotices, ConsoleSound, Sinks};
use cradle_api::HealthApi;
use cradle_auth::{AuthClient, CredentialProvider, TokenStore};
use cradle_core::RealtimeEvent;
use cradle_realtime::{Dispatcher, SocketClient, SocketConfig};
use cradle_settings::CradleSettings;
use tracing_subscriber::EnvFilter;

/// Cradle monitor console client.
#[derive(Parser, Debug)]
#[command(name = "cradle-monitor", about = "Cradle baby-health monitor console client")]
struct Cli {
    /// Path to a settings file (defaults to `~/.cradle/settings.json`).
    #[arg(long)]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and persist the token.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Account password.
        #[arg(long)]
        password: String,
    },
    /// Drop the stored token.
    Logout,
    /// Connect and stream live updates until Ctrl-C.
    Run,
    /// Print aggregate health statistics.
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = match &cli.settings {
        Some(path) => cradle_settings::load_settings_from_path(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => cradle_settings::load_settings().context("loading settings")?,
    };

    let store = TokenStore::new(TokenStore::default_path());
    let auth = Arc::new(
        AuthClient::new(
            settings.api.base_url.as_str(),
            store,
            Duration::from_millis(settings.api.timeout_ms),
        )
        .context("building auth client")?,
    );

    match cli.command {
        Command::Login { email, password } => {
            let session = auth.login(&email, &password).await?;
            match session.user {
                Some(user) => println!("logged in as {} ({})", user.name, user.email),
                None => println!("logged in"),
            }
        }
        Command::Logout => {
            auth.logout().await?;
            println!("logged out");
        }
        Command::Stats => {
            let api = HealthApi::new(
                settings.api.base_url.as_str(),
                Arc::clone(&auth) as Arc<dyn CredentialProvider>,
                Duration::from_millis(settings.api.timeout_ms),
            )?;
            let stats = api.stats().await?;
            println!("records:        {}", stats.total_records);
            println!("cries detected: {}", stats.cry_detected_count);
            println!("sick detected:  {}", stats.sick_detected_count);
            println!("avg temp:       {:.1} °C", stats.avg_temperature);
            println!("avg humidity:   {:.0} %", stats.avg_humidity);
        }
        Command::Run => run(&settings, auth).await?,
    }

    Ok(())
}

/// Connect the realtime pipeline and print updates until Ctrl-C.
async fn run(settings: &CradleSettings, auth: Arc<AuthClient>) -> Result<()> {
    let dispatcher = Arc::new(Dispatcher::new());

    let engine = Arc::new(AlertEngine::new(
        Sinks {
            sound: Arc::new(ConsoleSound),
            haptics: Arc::new(ConsoleHaptics),
            notices: Arc::new(ConsoleNotices),
        },
        AlertConfig {
            history_limit: settings.alerts.history_limit,
            history_policy: settings.alerts.history_policy,
        },
    ));
    let _engine_sub = AlertEngine::attach(&engine, &dispatcher);

    let _update_sub = dispatcher.on("health_update", |event| {
        if let RealtimeEvent::Message(msg) = event {
            println!(
                "{}  {:.1} °C  {:.0} %  cry={}  sick={}",
                msg.data.created_at.format("%H:%M:%S"),
                msg.data.temperature,
                msg.data.humidity,
                msg.data.cry_detected,
                msg.data.sick_detected,
            );
        }
    });
    let _connection_sub = dispatcher.on("connection", |event| {
        if let RealtimeEvent::Connection { status } = event {
            println!("connection: {status}");
        }
    });
    let _error_sub = dispatcher.on("error", |event| {
        if let RealtimeEvent::Error { message } = event {
            eprintln!("transport error: {message}");
        }
    });

    let socket = SocketClient::new(
        SocketConfig::from(&settings.socket),
        Arc::clone(&auth) as Arc<dyn CredentialProvider>,
        Arc::clone(&dispatcher),
    );
    socket.connect().await;

    tokio::signal::ctrl_c().await.context("waiting for ctrl-c")?;
    socket.disconnect();
    Ok(())
}
