use anyhow::Result;
use axum::Router;
use clap::Parser;
use retrieval::RecordSchema;
use server::{build_app, ServerConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tools::HttpConfig;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
struct Args {
    /// Guest corpus: a .json/.jsonl file or a directory of them
    #[arg(long, env = "GALA_CORPUS", default_value = "./data/guests.jsonl")]
    corpus: PathBuf,
    /// Record schema: "guest" or "text:<field>[:<id_field>]"
    #[arg(long, env = "GALA_SCHEMA", default_value = "guest")]
    schema: String,
    /// Host to bind
    #[arg(long, env = "GALA_HOST", default_value = "0.0.0.0")]
    host: String,
    /// Port to bind
    #[arg(long, env = "GALA_PORT", default_value_t = 8080)]
    port: u16,
    /// Token required by admin endpoints
    #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
    admin_token: Option<String>,
    /// Comma-separated CORS origins
    #[arg(long, env = "CORS_ALLOW_ORIGIN")]
    cors_allow_origin: Option<String>,
    /// Model hub API token
    #[arg(long, env = "HF_TOKEN", hide_env_values = true)]
    hf_token: Option<String>,
    /// Model hub API base URL
    #[arg(long, env = "HF_ENDPOINT", default_value = tools::http::DEFAULT_HF_ENDPOINT)]
    hf_endpoint: String,
    /// Timeout for outbound requests, in seconds
    #[arg(long, env = "GALA_HTTP_TIMEOUT_SECS", default_value_t = 12)]
    http_timeout_secs: u64,
    /// User-Agent for outbound requests
    #[arg(long, env = "GALA_USER_AGENT", default_value = tools::http::DEFAULT_USER_AGENT)]
    user_agent: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let args = Args::parse();
    let config = ServerConfig {
        corpus: args.corpus,
        schema: RecordSchema::from_name(&args.schema)?,
        admin_token: args.admin_token,
        cors_allow_origin: args.cors_allow_origin,
        http: HttpConfig {
            user_agent: args.user_agent,
            timeout: Duration::from_secs(args.http_timeout_secs),
            hf_endpoint: args.hf_endpoint,
            hf_token: args.hf_token,
        },
    };
    let app: Router = build_app(config)?;

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "server listening");
    axum::serve(listener, app).await?;
    Ok(())
}
