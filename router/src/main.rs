use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tokio::net::TcpListener;

use chat_proxy::config::{EnvApiKey, ProxyConfig, DEFAULT_API_KEY_VAR};
use chat_proxy::persona::PromptTemplate;
use chat_proxy::{app, AppState, CHAT_ROUTE};
use provider_client::{Client, GenerationConfig};

#[derive(Parser, Debug)]
struct Args {
    #[clap(short, long, env = "CHAT_PROXY_ADDRESS", default_value = "127.0.0.1:8080")]
    address: String,
    #[clap(
        long,
        env = "CHAT_PROXY_PROVIDER_URL",
        default_value = "https://generativelanguage.googleapis.com/v1beta"
    )]
    provider_url: String,
    #[clap(short, long, env = "CHAT_PROXY_MODEL", default_value = "gemini-2.0-flash")]
    model: String,
    /// Environment variable holding the provider API key, read on every request.
    #[clap(long, default_value = DEFAULT_API_KEY_VAR)]
    api_key_var: String,
    /// Prompt template file containing a `{message}` placeholder.
    #[clap(long, env = "CHAT_PROXY_PERSONA_FILE")]
    persona_file: Option<PathBuf>,
    #[clap(long, default_value = "0.7")]
    temperature: f32,
    #[clap(long, default_value = "1024")]
    max_output_tokens: u32,
    #[clap(long, env = "CHAT_PROXY_MAX_MESSAGE_CHARS")]
    max_message_chars: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let args = Args::parse();
    tracing::info!("args: {:?}", &args);

    let persona = match &args.persona_file {
        Some(path) => PromptTemplate::from_file(path)?,
        None => PromptTemplate::default(),
    };
    let config = ProxyConfig {
        generation: GenerationConfig {
            temperature: args.temperature,
            max_output_tokens: args.max_output_tokens,
        },
        max_message_chars: args.max_message_chars,
    };

    let client = Client::new(&args.provider_url, &args.model);
    tracing::info!("Provider endpoint: {}", client.endpoint());

    let state = AppState::new(client, EnvApiKey::new(&args.api_key_var), persona, config);
    let app = app(state);

    tracing::info!("Listening on {}{}", &args.address, CHAT_ROUTE);
    let listener = TcpListener::bind(&args.address).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server shutdown");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Error: {:?}", e);
    }
}
