//! Starter configuration generator for the hotel concierge
//!
//! Writes a `.env` with every setting the relay, the web server and the
//! terminal front end read, filled with defaults for the chosen mode.

use clap::{Parser, ValueEnum};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Output file path
    #[arg(short, long, default_value = ".env")]
    output: PathBuf,

    /// Force overwrite if file exists
    #[arg(short, long)]
    force: bool,

    /// Whether replies come from the model or from the local knowledge base
    #[arg(short, long, value_enum, default_value = "live")]
    mode: Mode,

    /// System prompt style
    #[arg(long, value_enum, default_value = "conversational")]
    prompt_style: PromptStyle,

    /// Web server port
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Text-to-speech command (reads text on stdin)
    #[arg(long)]
    tts_command: Option<String>,

    /// Speech-to-text command (prints one transcript line)
    #[arg(long)]
    stt_command: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Relay questions to the model (needs OPENAI_API_KEY)
    Live,
    /// Answer from the knowledge base only, no API key needed
    Offline,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PromptStyle {
    /// Concierge instructions with compact knowledge base JSON
    Conversational,
    /// Plain knowledge base dump, model may answer from general knowledge
    Reference,
}

impl PromptStyle {
    fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Conversational => "conversational",
            PromptStyle::Reference => "reference",
        }
    }
}

fn optional_setting(key: &str, value: Option<&str>, example: &str) -> String {
    match value {
        Some(v) => format!("{}={}", key, v),
        None => format!("# {}={}", key, example),
    }
}

fn generate_env_content(cli: &Cli, generated_at: &str) -> String {
    let api_key_line = match cli.mode {
        Mode::Live => "OPENAI_API_KEY=",
        Mode::Offline => "# OPENAI_API_KEY=",
    };

    format!(
        "# ========================================\n\
         # Hotel Concierge - Environment Configuration\n\
         # ========================================\n\
         # Generated: {}\n\
         # Mode: {:?}\n\
         #\n\
         # Never commit this file once the API key is filled in.\n\
         \n\
         # Upstream model\n\
         {}\n\
         OPENAI_BASE_URL=https://api.openai.com/v1\n\
         OPENAI_MODEL=gpt-4o-mini\n\
         \n\
         # Web server\n\
         CONCIERGE_HOST=127.0.0.1\n\
         CONCIERGE_PORT={}\n\
         CONCIERGE_SESSION_TTL_SECS=3600\n\
         \n\
         # Conversation\n\
         CONCIERGE_AI_ENABLED={}\n\
         CONCIERGE_PROMPT_STYLE={}\n\
         # CONCIERGE_KB_PATH=data/hotel_knowledge.json\n\
         \n\
         # Speech\n\
         {}\n\
         {}\n\
         \n\
         # Logging\n\
         CONCIERGE_LOG_LEVEL=info\n",
        generated_at,
        cli.mode,
        api_key_line,
        cli.port,
        cli.mode == Mode::Live,
        cli.prompt_style.as_str(),
        optional_setting(
            "CONCIERGE_TTS_COMMAND",
            cli.tts_command.as_deref(),
            "espeak-ng --stdin"
        ),
        optional_setting(
            "CONCIERGE_STT_COMMAND",
            cli.stt_command.as_deref(),
            "my-recognizer --once"
        ),
    )
}

fn main() {
    let cli = Cli::parse();

    if cli.output.exists() && !cli.force {
        eprintln!("Error: File {:?} already exists!", cli.output);
        eprintln!("   Use --force to overwrite");
        std::process::exit(1);
    }

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let content = generate_env_content(&cli, &generated_at);

    if let Err(e) = fs::write(&cli.output, content) {
        eprintln!("Failed to write file: {}", e);
        std::process::exit(1);
    }
    println!("Configuration written to: {:?}", cli.output);

    // The file will hold the API key
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        if let Err(e) = fs::set_permissions(&cli.output, perms) {
            eprintln!("Warning: Could not set file permissions: {}", e);
        }
    }

    println!();
    println!("Next steps:");
    match cli.mode {
        Mode::Live => {
            println!("   1. Put your key in OPENAI_API_KEY in {:?}", cli.output);
            println!("   2. Start the server: run-concierge serve");
        }
        Mode::Offline => {
            println!("   1. Start a local conversation: run-concierge chat --offline");
        }
    }
    println!("   Open http://127.0.0.1:{}/ in a browser", cli.port);
}
