use std::{error::Error, net::SocketAddr, path::PathBuf};

use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;

use momo_ledger::{
    AppState, ImportConfig, build_router, graceful_shutdown, run_import, setup_logging,
};

/// The web server for browsing imported mobile money transactions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, default_value = "momo_pay.db")]
    db_path: PathBuf,

    /// File path to an SMS backup XML export to import before serving.
    #[arg(long)]
    batch_path: Option<PathBuf>,

    /// File path to write the report of uncategorized messages to.
    #[arg(long, default_value = "uncategorized_logs.json")]
    report_path: PathBuf,

    /// The port to serve the API from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to write debug logs to.
    #[arg(long, default_value = "debug.log")]
    log_path: PathBuf,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    setup_logging(&args.log_path)?;

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection)?;

    match args.batch_path {
        Some(batch_path) => {
            let config = ImportConfig {
                batch_path,
                report_path: args.report_path,
            };
            let connection = state
                .db_connection
                .lock()
                .map_err(|error| format!("could not acquire database lock: {error}"))?;
            run_import(&config, &connection)?;
        }
        None => tracing::info!("No batch path given, skipping import."),
    }

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    tracing::info!("HTTP server listening on {}", addr);
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // By default, `TraceLayer` will log 5xx responses but we're doing our specific
        // logging of errors so disable that
        .on_failure(());

    router.layer(tracing_layer)
}
