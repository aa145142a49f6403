use anyhow::Result;
use clap::{Parser, Subcommand};
use sage_core::{Assistant, Config};
use std::io::{BufRead, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sage")]
#[command(about = "Ask a hosted AI assistant from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question and print the answer
    Ask {
        /// The question to ask
        question: String,

        /// Conversation id to continue (enables follow-ups across runs of `repl`)
        #[arg(short, long, default_value = "cli")]
        conversation: String,
    },

    /// Interactive question loop with conversation memory
    Repl {
        /// Conversation id for the session
        #[arg(short, long, default_value = "repl")]
        conversation: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing; set RUST_LOG=sage_core=debug to see token accounting
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .with_level(true)
        .init();

    // Load .env
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let assistant = Assistant::new(config)?;

    match cli.command {
        Commands::Ask {
            question,
            conversation,
        } => {
            let answer = assistant.ask(&conversation, &question).await?;
            println!("{answer}");
        }
        Commands::Repl { conversation } => {
            repl(&assistant, &conversation).await?;
        }
    }

    Ok(())
}

async fn repl(assistant: &Assistant, conversation: &str) -> Result<()> {
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    println!("sage repl - empty line or Ctrl-D to quit");
    loop {
        print!("> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            break;
        }

        match assistant.ask(conversation, question).await {
            Ok(answer) => println!("{answer}\n"),
            Err(e) => tracing::error!("Exchange failed: {e:#}"),
        }
    }

    Ok(())
}
