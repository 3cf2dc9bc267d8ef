//! Command bot example
//!
//! Reads `HOST`, `PORT`, `USER`, `PASS` and an optional `CHANNEL` from
//! `bot.env`, connects, joins the channel, and answers:
//!
//! - `PING` from the server with `PONG`
//! - `~ping` in chat with a `PING` to the server
//! - `~sendsomething <word>` in chat by echoing `<word>` to the channel
//!
//! Run with: `cargo run --example bot` (set `RUST_LOG=debug` for more detail)

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use twitchline::{config, BotConfig, Client, ClientError, ConnectionError, Handler, Message};

const ENV_PATH: &str = "bot.env";
const COMMAND_PREFIX: &str = "~";
const DEFAULT_CHANNEL: &str = "#gravitybotv2";

struct Commands;

impl Handler for Commands {
    async fn handle(&mut self, client: &mut Client, message: &Message) -> Result<(), ClientError> {
        match message.command() {
            "PING" => return client.pong().await,
            "PRIVMSG" => {
                if let Some(rest) = message.contents().strip_prefix(COMMAND_PREFIX) {
                    let mut args = rest.split(' ');
                    let command = args.next().unwrap_or_default().to_lowercase();

                    match command.as_str() {
                        "ping" => return client.ping().await,
                        "sendsomething" => {
                            if let Some(word) = args.next() {
                                return client.send_message(word, message.channel()).await;
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }

        info!("{:?}", message);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let env = config::read_env_file(ENV_PATH).with_context(|| format!("loading {}", ENV_PATH))?;
    let bot_config = BotConfig::from_map(&env)?;
    let channel = env
        .get("CHANNEL")
        .cloned()
        .unwrap_or_else(|| DEFAULT_CHANNEL.to_string());

    info!("Dialing into {}...", bot_config.endpoint());
    let mut bot = bot_config.into_client();
    bot.connect(true).await?;
    bot.join_channel(&channel).await?;

    let mut handler = Commands;
    loop {
        match bot.receive_and_dispatch(&mut handler).await {
            Ok(dispatched) => {
                if let Err(e) = dispatched.outcome {
                    warn!("handler failed: {}", e);
                }
            }
            Err(ClientError::Connection(ConnectionError::LineTooLong { limit })) => {
                warn!("skipped a line longer than {} bytes", limit);
            }
            Err(e) if e.is_eof() => {
                info!("server closed the connection");
                break;
            }
            Err(e) => {
                warn!("receive failed: {}", e);
                break;
            }
        }
    }

    if let Err(e) = bot.disconnect().await {
        warn!("disconnect failed: {}", e);
    }
    Ok(())
}
