use clap::{ Parser, Subcommand };
use std::time::Duration;

use crate::llm::{ LlmConfig, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS };

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Run the chat relay HTTP server.
    Serve(ServeArgs),
    /// Chat with a running relay from the terminal.
    Chat(ChatArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct ServeArgs {
    /// Host address and port for the server to listen on.
    #[arg(long, env = "SERVER_ADDR", default_value = "127.0.0.1:3000")]
    pub server_addr: String,

    // --- Completion Service Args ---
    /// API key for the completion service. Leave empty to run without one;
    /// chat requests then get a "temporarily unavailable" reply.
    #[arg(long, env = "GROQ_API_KEY", default_value = "", hide_env_values = true)]
    pub chat_api_key: String,

    /// Full URL of the chat completions endpoint.
    #[arg(long, env = "CHAT_BASE_URL")] // No default, let the client pick the Groq endpoint
    pub chat_base_url: Option<String>,

    /// Model name for chat completion (e.g., llama-3.3-70b-versatile)
    #[arg(long, env = "CHAT_MODEL")]
    pub chat_model: Option<String>,

    /// Per-attempt timeout for completion requests, in seconds.
    #[arg(long, env = "CHAT_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub chat_timeout_secs: u64,

    /// Extra attempts after a connect error or timeout.
    #[arg(long, env = "CHAT_MAX_RETRIES", default_value_t = DEFAULT_MAX_RETRIES)]
    pub chat_max_retries: u32,

    // --- Persona Args ---
    /// Optional path to a text file replacing the built-in persona prompt.
    #[arg(long, env = "PERSONA_PATH")]
    pub persona_path: Option<String>,

    /// Seed for picking fallback wisdom. Random per process when unset.
    #[arg(long, env = "FALLBACK_SEED")]
    pub fallback_seed: Option<u64>,

    // --- TLS Args ---
    /// Optional path to the TLS certificate file (PEM format). Requires --tls-key-path.
    #[arg(long, env = "TLS_CERT_PATH")]
    pub tls_cert_path: Option<String>,

    /// Optional path to the TLS private key file (PEM format). Requires --tls-cert-path.
    #[arg(long, env = "TLS_KEY_PATH")]
    pub tls_key_path: Option<String>,

    #[arg(long, env = "ENABLE_TLS", default_value = "false")]
    pub enable_tls: bool,
}

impl ServeArgs {
    pub fn llm_config(&self) -> LlmConfig {
        LlmConfig {
            api_key: Some(self.chat_api_key.clone()).filter(|k| !k.trim().is_empty()),
            completion_model: self.chat_model.clone(),
            base_url: self.chat_base_url.clone(),
            timeout: Duration::from_secs(self.chat_timeout_secs),
            max_retries: self.chat_max_retries,
        }
    }
}

#[derive(clap::Args, Debug, Clone)]
pub struct ChatArgs {
    /// Base URL of the relay server.
    #[arg(long, env = "RELAY_URL", default_value = "http://127.0.0.1:3000")]
    pub relay_url: String,

    /// Timeout for a single relay request, in seconds.
    #[arg(long, env = "RELAY_TIMEOUT_SECS", default_value = "60")]
    pub relay_timeout_secs: u64,
}
