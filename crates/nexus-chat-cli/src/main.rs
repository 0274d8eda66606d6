//! Terminal client for Nexus chat.
//!
//! Lines typed on stdin are chat messages unless they start with `/`:
//!
//!   /join <room>            switch rooms
//!   /login <user> <room>    start a new session
//!   /logout                 end the session, stay running
//!   /quit                   log out and exit
//!
//! Run:
//!   cargo run -p nexus-chat-cli -- --username alice --room general

mod command;
mod terminal;

use clap::Parser;
use command::Command;
use nexus_chat_client::{ChatClient, ClientConfig};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "nexus-chat", version, about = "Terminal client for Nexus chat")]
struct Args {
    /// TOML file with endpoint and timer settings.
    #[arg(long, env = "NEXUS_CHAT_CONFIG")]
    config: Option<PathBuf>,
    /// Server address, overrides the config file.
    #[arg(long, env = "NEXUS_CHAT_ENDPOINT")]
    endpoint: Option<String>,
    #[arg(long, short)]
    username: String,
    #[arg(long, short, default_value = "general")]
    room: String,
    /// Wait between reconnect attempts, overrides the config file.
    #[arg(long)]
    reconnect_delay_ms: Option<u64>,
}

impl Args {
    fn client_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::load(path)?,
            None => ClientConfig::default(),
        };
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(delay) = self.reconnect_delay_ms {
            config.reconnect_delay_ms = delay;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nexus_chat=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.client_config()?;
    tracing::info!("connecting to {}", config.endpoint);

    let (client, task) = ChatClient::spawn(config, terminal::Terminal);
    client.login(&args.username, &args.room)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match command::parse(&line) {
            Command::Say(text) => client.send_chat(text)?,
            Command::Join(room) => client.switch_room(room)?,
            Command::Login { username, room } => {
                if let Err(e) = client.login(&username, &room) {
                    eprintln!("! {e}");
                }
            }
            Command::Logout => client.logout()?,
            Command::Quit => break,
            Command::Empty => {}
            Command::Invalid(reason) => eprintln!("! {reason}"),
        }
    }

    client.shutdown()?;
    task.await?;
    Ok(())
}
