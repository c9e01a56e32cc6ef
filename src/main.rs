use std::{fs, path::PathBuf};

use anyhow::Context as _;
use clap::Parser;
use design_tokens::Output;
use design_tokens_core::{config::Config, generate, session::Session, FigmaClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "design-tokens", version)]
struct Cli {
    /// Export configuration (JSON).
    #[arg(long, default_value = "design-tokens.json")]
    config: PathBuf,

    /// Personal access token, takes precedence over `figmaToken` in the config.
    #[arg(long, env = "FIGMA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Also write the extracted tokens as JSON.
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::load(&cli.config)
        .with_context(|| format!("loading {}", cli.config.display()))?;
    let token = cli
        .token
        .or_else(|| config.figma_token.clone())
        .context("no access token: pass --token, set FIGMA_TOKEN or add figmaToken to the config")?;

    let session = Session::new(FigmaClient::new(&config.project_id, token));
    let root = session
        .load_root()
        .await
        .context("loading document root")?;
    let tokens = generate(&session, &root.document, &config).await;

    if let Some(path) = &cli.dump {
        fs::write(path, serde_json::to_string_pretty(&tokens)?)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Output::new(&config).write(&tokens, &config)
}
