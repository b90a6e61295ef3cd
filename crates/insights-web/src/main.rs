//! Financial Insights Agent web server
//!
//! # Usage
//!
//! ```bash
//! # Point at a local OpenAI-compatible runtime hosting the weights
//! export OPENAI_API_BASE="http://localhost:8080/v1"
//!
//! cargo run --bin insights-web -- --bind 127.0.0.1:8501
//! ```

use clap::Parser;
use insights_finance::{InsightPipeline, InsightsConfig, PromptGrounding};
use insights_llm::{LocalModelConfig, ModelHandle};
use insights_utils::ServerConfig;
use insights_web::{AppState, create_app};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "insights-web")]
#[command(about = "Financial Insights Agent", long_about = None)]
struct Args {
    /// Address to listen on (overrides INSIGHTS_BIND_ADDR)
    #[arg(short, long)]
    bind: Option<SocketAddr>,

    /// Path to the model weights (overrides INSIGHTS_MODEL_PATH)
    #[arg(long)]
    model_path: Option<PathBuf>,

    /// Load the model before accepting requests
    #[arg(long)]
    preload_model: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    insights_utils::init_tracing();

    let args = Args::parse();

    let mut server = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        server = server.with_bind_addr(bind);
    }

    let insights = InsightsConfig::from_env()?;
    let mut model_config = LocalModelConfig::from_env();
    if let Some(path) = args.model_path {
        model_config = model_config.with_weights_path(path);
    }

    let model = Arc::new(ModelHandle::new(model_config));
    if args.preload_model || insights.preload_model {
        let loaded = model.get().await?;
        info!(model = loaded.model_id(), "Model loaded at startup");
    }

    if insights.grounding == PromptGrounding::TickerOnly {
        debug!(
            "Section prompts carry only the ticker and value proposition; \
             fetched figures are displayed but not sent to the model"
        );
    }

    let pipeline = InsightPipeline::from_config(&insights, model)?;
    let state = AppState::new(server.clone(), pipeline)?;
    let app = create_app(state);

    let listener = TcpListener::bind(server.bind_addr).await?;
    info!(
        addr = %server.bind_addr,
        environment = %server.environment,
        frequency = insights.frequency.prefix(),
        mode = ?insights.generation_mode,
        "Starting {}", server.app_name
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
