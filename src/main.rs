use anyhow::Result;
use clap::Parser;
use console::style;
use pricebot::config::AppConfig;
use pricebot::engine::Engine;
use pricebot::format::{HELP_TEXT, Outcome};
use pricebot::log::init_logging;
use std::io::{self, BufRead, Write};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// Print the outcome as a {"result"}/{"error"} JSON envelope
    #[arg(short, long)]
    json: bool,

    /// Query to evaluate; omit to start an interactive chat loop
    query: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

async fn run(cli: Cli) -> Result<()> {
    let config = match cli.config_path.as_deref() {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    let engine = pricebot::engine_from_config(&config);

    if cli.query.is_empty() {
        chat_loop(&engine, cli.json).await
    } else {
        let outcome = engine.evaluate(&cli.query.join(" ")).await;
        print_outcome(&outcome, cli.json)
    }
}

async fn chat_loop(engine: &Engine, json: bool) -> Result<()> {
    println!("{HELP_TEXT}\n");

    let stdin = io::stdin();
    loop {
        print!("{} ", style(">").cyan().bold());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break; // EOF
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "exit" || line == "quit" {
            break;
        }

        let outcome = engine.evaluate(line).await;
        print_outcome(&outcome, json)?;
    }
    Ok(())
}

fn print_outcome(outcome: &Outcome, json: bool) -> Result<()> {
    if json {
        let envelope = match outcome {
            Outcome::Error(err) => serde_json::json!({ "error": err.to_string() }),
            other => serde_json::json!({ "result": other.render() }),
        };
        println!("{}", serde_json::to_string(&envelope)?);
    } else if outcome.is_error() {
        println!("{}", style(outcome.render()).red());
    } else {
        println!("{}", outcome.render());
    }
    Ok(())
}
