pub mod cli;
pub mod config;
pub mod llm;
pub mod models;
pub mod relay;
pub mod server;
pub mod session;

use cli::{ Args, ChatArgs, Command, ServeArgs };
use log::info;
use relay::Relay;
use server::Server;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    match args.command {
        Command::Serve(serve_args) => serve(serve_args).await,
        Command::Chat(chat_args) => chat(chat_args).await,
    }
}

async fn serve(args: ServeArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("--- Core Configuration ---");
    info!("Server Address: {}", args.server_addr);
    info!("Completion API Key: {}", if args.llm_config().has_api_key() { "configured" } else { "missing" });
    info!("Completion Base URL: {}", args.chat_base_url.as_deref().unwrap_or("client default"));
    info!("Completion Model: {}", args.chat_model.as_deref().unwrap_or("client default"));
    info!("Persona Path: {}", args.persona_path.as_deref().unwrap_or("built-in"));
    info!("TLS Enabled: {}", args.enable_tls);
    info!("-------------------------");

    let relay = Relay::from_args(&args)?;
    let addr = args.server_addr.clone();
    info!("Starting server on: {}", addr);
    let server = Server::new(addr, relay, args);
    server.run().await?;

    Ok(())
}

async fn chat(args: ChatArgs) -> Result<(), Box<dyn Error + Send + Sync>> {
    session::terminal::run(&args).await
}
