//! Cloakroom CLI — the main entry point.
//!
//! Commands:
//! - `init`      — Write a default config file
//! - `mask`      — Mask PII in text and print the result
//! - `roundtrip` — Mask then immediately unmask, verifying the round trip
//! - `rules`     — Show the active detection rule set
//! - `demo`      — Run a full masked agent turn against the demo provider

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "cloakroom",
    about = "Cloakroom — PII masking for LLM-driven agents",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Mask PII in the given text (or stdin)
    Mask {
        /// Text to mask; reads stdin when omitted
        text: Option<String>,

        /// Also print the compendium export
        #[arg(long)]
        show_compendium: bool,

        /// Print the compendium as a tree instead of a flat mapping
        #[arg(long, requires = "show_compendium")]
        tree: bool,
    },

    /// Mask then unmask, verifying the text survives the round trip
    Roundtrip {
        /// Text to round-trip; reads stdin when omitted
        text: Option<String>,
    },

    /// Show the active detection rule set
    Rules,

    /// Run one masked agent turn against the demo provider
    Demo {
        /// The question to ask; a built-in demo question when omitted
        text: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Mask {
            text,
            show_compendium,
            tree,
        } => commands::mask::run(text, show_compendium, tree).await?,
        Commands::Roundtrip { text } => commands::roundtrip::run(text).await?,
        Commands::Rules => commands::rules::run().await?,
        Commands::Demo { text } => commands::demo::run(text).await?,
    }

    Ok(())
}
