use anyhow::{bail, Result};
use clap::Parser;
use std::fmt::Debug;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::instrument;

#[derive(Parser, Debug)]
#[clap(
    author = "Alex Markov",
    version = "0.1.0",
    about = "Ask the beatbox guru through the chat proxy"
)]
struct Args {
    #[clap(short, long, env = "CHAT_PROXY_ADDRESS", default_value = "127.0.0.1:8080")]
    server: String,
    /// Message to send. Reads one message per line from stdin when omitted.
    message: Option<String>,
}

#[derive(serde::Deserialize, Debug, PartialEq)]
#[serde(untagged)]
enum HttpResponse {
    Reply { reply: String },
    Error { error: String },
}

struct HttpClient {
    client: reqwest::Client,
    url: String,
}
impl Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("url", &self.url)
            .finish()
    }
}

impl HttpClient {
    fn new(address: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("http://{}/api/chat", address),
        }
    }

    #[instrument(skip_all, fields(status))]
    async fn send_request(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(&self.url)
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await?;
        let status = response.status();
        tracing::Span::current().record("status", status.as_u16());

        match response.json().await? {
            HttpResponse::Reply { reply } => Ok(reply),
            HttpResponse::Error { error } => bail!("{} {}", status, error),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let client = HttpClient::new(&args.server);
    tracing::info!("Using chat proxy at {:?}", client);

    if let Some(message) = args.message {
        let reply = client.send_request(&message).await?;
        println!("{}", reply);
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        match client.send_request(message).await {
            Ok(reply) => println!("{}\n", reply),
            Err(e) => tracing::error!("Error sending message: {:?}", e),
        }
    }
    Ok(())
}
