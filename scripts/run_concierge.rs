use anyhow::Context;
use clap::{Parser, Subcommand};
use concierge_adaptor_terminal::{HttpRelay, TerminalAdaptor, DEFAULT_RELAY_URL};
use concierge_adaptor_web::{RelayServer, WebConfig};
use concierge_core::{
    init_logging, load_env, load_env_from_path, ChatRelay, ControllerConfig,
    ConversationController, KnowledgeBase, Logger,
};
use concierge_provider_openai::OpenAIClient;
use concierge_provider_voice::CommandSpeech;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(author, version, about = "Hotel AI concierge")]
struct Cli {
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "CONCIERGE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Environment file to load instead of ./.env
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the relay, the browser UI and the session API
    Serve {
        /// Bind address
        #[arg(long, env = "CONCIERGE_HOST", default_value = "127.0.0.1")]
        host: String,

        /// Bind port
        #[arg(short, long, env = "CONCIERGE_PORT", default_value_t = 3000)]
        port: u16,
    },
    /// Chat in the terminal
    Chat {
        /// Relay endpoint to talk to
        #[arg(long, env = "CONCIERGE_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
        relay_url: String,

        /// Call the upstream model directly instead of a running relay
        #[arg(long, conflicts_with = "offline")]
        direct: bool,

        /// Answer from the knowledge base only
        #[arg(long)]
        offline: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first so clap's env fallbacks see it
    let early_env_file = std::env::args()
        .skip_while(|a| a != "--env-file")
        .nth(1)
        .map(PathBuf::from);
    match &early_env_file {
        Some(path) => load_env_from_path(path)?,
        None => load_env()?,
    }

    let cli = Cli::parse();
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("CONCIERGE_LOG_LEVEL", &cli.log_level);
    }
    init_logging();
    let log = Logger::new("run-concierge");
    if let Some(path) = &cli.env_file {
        log.debug(&format!("Environment loaded from {}", path.display()));
    }

    match cli.command {
        Commands::Serve { host, port } => {
            let mut config = WebConfig::from_env()?;
            config.host = host;
            config.port = port;
            let knowledge = KnowledgeBase::load(config.knowledge_path.as_deref())
                .context("loading knowledge base")?;
            if std::env::var("OPENAI_API_KEY").map_or(true, |k| k.trim().is_empty()) {
                log.warn("OPENAI_API_KEY is not set; relay calls will fail until it is");
            }

            let server = RelayServer::new(config, Arc::new(knowledge), OpenAIClient::from_env())?;
            log.success(&format!("Starting on http://{}", server.config().addr()));
            if let Err(e) = server.run().await {
                log.error(&format!("Server stopped: {}", e));
                return Err(e.into());
            }
        }
        Commands::Chat {
            relay_url,
            direct,
            offline,
        } => {
            let mut config = ControllerConfig::from_env()?;
            if offline {
                config.ai_enabled = false;
            }
            let knowledge = KnowledgeBase::load(
                std::env::var("CONCIERGE_KB_PATH")
                    .ok()
                    .filter(|p| !p.trim().is_empty())
                    .map(PathBuf::from)
                    .as_deref(),
            )
            .context("loading knowledge base")?;

            let relay: Arc<dyn ChatRelay> = if direct {
                log.info("Calling the upstream model directly");
                Arc::new(OpenAIClient::from_env())
            } else {
                log.info(&format!("Using relay at {}", relay_url));
                Arc::new(HttpRelay::new(relay_url))
            };

            let controller = ConversationController::new(
                config,
                Arc::new(knowledge),
                relay,
                Arc::new(CommandSpeech::from_env()),
            )?;
            if let Err(e) = TerminalAdaptor::new(controller).run_stdio().await {
                log.error(&format!("Chat ended with an error: {}", e));
                return Err(e.into());
            }
        }
    }

    Ok(())
}
