//! scrapefn - request-driven browser-automation worker.
//!
//! Local entry points for the invocation handler: an HTTP harness that maps
//! requests onto the legacy trigger shape, and a one-shot event runner. The
//! serverless host supplies the real transport framing in production.

use std::collections::HashMap;
use std::io::Read;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scrapefn_browser::{launcher_for, ExecutionEnvironment, SessionManager};
use scrapefn_core::{Handler, RoutineRegistry};
use scrapefn_protocols::{ResponseEnvelope, Trigger};
use scrapefn_routine_scrape::{ScrapePost, SCRAPE_POST_PATH};

/// scrapefn CLI.
#[derive(Parser)]
#[command(name = "scrapefn")]
#[command(about = "Request-driven browser-automation worker")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the handler over local HTTP (default)
    Serve {
        /// Server host
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Server port
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },

    /// Run a single invocation from a trigger event file
    Invoke {
        /// Path to the trigger JSON (reads stdin when omitted)
        #[arg(short, long)]
        event: Option<PathBuf>,
    },
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(true))
        .init();
}

/// Wire the handler: routine registry, environment snapshot, session manager.
fn build_handler() -> Handler {
    let env_vars: HashMap<String, String> = std::env::vars().collect();
    let environment = ExecutionEnvironment::from_vars(&env_vars);
    info!(?environment, "Resolved execution environment");

    let mut registry = RoutineRegistry::new();
    registry.register(SCRAPE_POST_PATH, Arc::new(ScrapePost));

    let sessions = Arc::new(SessionManager::new(launcher_for(&environment)));
    Handler::new(registry, sessions, environment, env_vars)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        None => serve("127.0.0.1".to_string(), 8080).await,
        Some(Commands::Serve { host, port }) => serve(host, port).await,
        Some(Commands::Invoke { event }) => invoke(event).await,
    }
}

/// Run the local HTTP harness.
async fn serve(host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let handler = Arc::new(build_handler());
    let app = Router::new().fallback(handle_http).with_state(handler);

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!("scrapefn listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Convert any inbound HTTP request into a legacy-shape trigger and reply
/// with the handler's envelope verbatim.
async fn handle_http(
    State(handler): State<Arc<Handler>>,
    method: Method,
    uri: Uri,
    body: String,
) -> Response {
    let trigger = Trigger {
        body: if body.is_empty() { None } else { Some(body) },
        http_method: Some(method.to_string()),
        path: Some(uri.path().to_string()),
        ..Default::default()
    };

    let envelope = handler.handle(&trigger).await;
    to_http_response(envelope)
}

fn to_http_response(envelope: ResponseEnvelope) -> Response {
    let mut builder = Response::builder().status(envelope.status_code);
    for (key, value) in &envelope.headers {
        builder = builder.header(key, value);
    }
    builder
        .body(Body::from(envelope.body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
}

/// Run a single invocation and print the response envelope.
async fn invoke(event: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let raw = match event {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    let trigger: Trigger = serde_json::from_str(&raw)?;

    let handler = build_handler();
    let envelope = handler.handle(&trigger).await;
    println!("{}", serde_json::to_string_pretty(&envelope)?);

    Ok(())
}
