//! CLI for medlink
//!
//! Subcommands:
//! - `relay`: run the local chat relay
//! - `chat`: join the chat as a doctor or pharmacist, reading lines from stdin
//! - `api`: issue one request against the hospital REST API

use std::error::Error;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use medlink::api::{ApiClient, StaticCredentials};
use medlink::config::{Settings, load_config};
use medlink::connection::SendOutcome;
use medlink::message::{ChatMessage, Role};
use medlink::session::{ChatSession, SessionEvent};
use medlink::transport::start_relay_server;
use medlink::utils::logging;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "medlink")]
enum Command {
    /// Run the local chat relay
    Relay {
        #[arg(long)]
        host: Option<String>,
        #[arg(long)]
        port: Option<u16>,
    },
    /// Join the doctor/pharmacist chat; type `/quit` to leave
    Chat {
        /// doctor or pharmacist
        #[arg(long)]
        role: Role,
        /// Messaging endpoint, overrides `chat.endpoint`
        #[arg(long)]
        url: Option<String>,
    },
    /// Call the hospital REST API and print the response data
    Api {
        #[command(subcommand)]
        request: ApiRequest,
        /// Bearer token; falls back to MEDLINK_TOKEN
        #[arg(long)]
        token: Option<String>,
    },
}

#[derive(Subcommand)]
enum ApiRequest {
    Get { path: String },
    Delete { path: String },
    Post { path: String, body: String },
    Put { path: String, body: String },
    Patch { path: String, body: String },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cmd = Command::parse();

    let settings = match load_config() {
        Ok(settings) => settings,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    logging::init(&settings.log.level);

    let result = match cmd {
        Command::Relay { host, port } => run_relay(&settings, host, port).await,
        Command::Chat { role, url } => run_chat(settings, role, url).await,
        Command::Api { request, token } => run_api(&settings, request, token).await,
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

async fn run_relay(
    settings: &Settings,
    host: Option<String>,
    port: Option<u16>,
) -> Result<(), Box<dyn Error>> {
    let host = host.unwrap_or_else(|| settings.relay.host.clone());
    let port = port.unwrap_or(settings.relay.port);
    let addr = format!("{host}:{port}");

    tokio::select! {
        result = start_relay_server(&addr) => {
            result?;
            error!("Relay exited unexpectedly.");
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
    Ok(())
}

async fn run_chat(
    mut settings: Settings,
    role: Role,
    url: Option<String>,
) -> Result<(), Box<dyn Error>> {
    if let Some(url) = url {
        settings.chat.endpoint = url;
    }
    info!(%role, endpoint = %settings.chat.endpoint, "joining chat");

    let mut session = ChatSession::connect(&settings.chat, role);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) if text.trim() == "/quit" => break,
                Some(text) if text.trim().is_empty() => {}
                Some(text) => {
                    let (message, outcome) = session.submit(text)?;
                    print_message(&message);
                    if outcome == SendOutcome::Dropped {
                        warn!("not connected, message kept locally only");
                    }
                }
                None => break,
            },
            event = session.next_event() => match event {
                Some(SessionEvent::Message(message)) => print_message(&message),
                Some(SessionEvent::Connection(state)) => info!(%state, "connection"),
                None => break,
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    session.close().await;
    Ok(())
}

fn print_message(message: &ChatMessage) {
    println!("[{}] {}: {}", message.timestamp, message.sender, message.text);
}

async fn run_api(
    settings: &Settings,
    request: ApiRequest,
    token: Option<String>,
) -> Result<(), Box<dyn Error>> {
    let token = token.or_else(|| std::env::var("MEDLINK_TOKEN").ok());
    let credentials = match token {
        Some(token) => StaticCredentials::new(token),
        None => StaticCredentials::anonymous(),
    };
    let api = ApiClient::new(&settings.api, Arc::new(credentials))?;

    let response = match request {
        ApiRequest::Get { path } => api.get::<Value>(&path).await,
        ApiRequest::Delete { path } => api.delete::<Value>(&path).await,
        ApiRequest::Post { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            api.post::<_, Value>(&path, &body).await
        }
        ApiRequest::Put { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            api.put::<_, Value>(&path, &body).await
        }
        ApiRequest::Patch { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            api.patch::<_, Value>(&path, &body).await
        }
    };

    match response {
        Ok(envelope) => {
            if let Some(message) = envelope.message {
                info!("{message}");
            }
            println!("{}", serde_json::to_string_pretty(&envelope.data)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
