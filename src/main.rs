// ABOUTME: Entry point for scout — a TUI chatbot that can search the web.
// ABOUTME: Loads .env and config, parses CLI args, and launches the app.

use clap::Parser;

use scout::app::App;
use scout::config::Config;

#[derive(Parser)]
#[command(name = "scout")]
#[command(about = "Terminal chatbot that can search the web, Wikipedia, and arXiv")]
struct Cli {
    /// Model to use (overrides config)
    #[arg(long)]
    model: Option<String>,

    /// Groq API key. Prefer GROQ_API_KEY in the environment or .env; without
    /// either, the UI prompts for one.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true)]
    api_key: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before clap so GROQ_API_KEY from the file is picked up.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(model) = cli.model {
        config.llm.model = model;
    }

    App::new(config, cli.api_key).run().await
}
