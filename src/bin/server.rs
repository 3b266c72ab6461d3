use std::{fs::OpenOptions, net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use tower_http::trace::TraceLayer;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use spendview::{
    AppState, BackendClient, ChartConfig, PaginationConfig, Palette, build_router,
    graceful_shutdown, logging_middleware,
};

/// The web server for spendview.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The base URL of the transaction backend.
    #[arg(long, env = "SPENDVIEW_BACKEND_URL", default_value = "http://localhost:8000")]
    backend_url: String,

    /// The port to serve the app from.
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// File path to write debug logs to.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// How long to wait for the transaction backend before giving up.
    #[arg(long, default_value_t = 10)]
    request_timeout_secs: u64,

    /// Comma separated colors for the spending chart, e.g. "#3B82F6,#EF4444".
    #[arg(long, value_delimiter = ',')]
    palette: Option<Vec<String>>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    setup_logging(args.log_file.as_ref());

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));

    let backend = BackendClient::new(
        &args.backend_url,
        Duration::from_secs(args.request_timeout_secs),
    )
    .expect("Could not create the transaction backend client");

    let palette = match args.palette {
        Some(colors) => Palette::new(colors).expect("Could not create the chart palette"),
        None => Palette::default(),
    };
    let chart_config = ChartConfig {
        palette,
        ..Default::default()
    };

    let state = AppState::new(backend, PaginationConfig::default(), chart_config);

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(
        build_router(state).layer(middleware::from_fn(logging_middleware)),
    );

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    tracing::info!(
        "HTTP server listening on {addr}, reading transactions from {}",
        args.backend_url
    );
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .expect("Could not start the server");
}

fn setup_logging(log_file: Option<&PathBuf>) {
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));

    let debug_log = log_file.map(|path| {
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .expect("Could not create log file");

        tracing_subscriber::fmt::layer()
            .pretty()
            .with_ansi(false)
            .with_writer(Arc::new(log_file))
            .with_filter(filter::LevelFilter::DEBUG)
    });

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(debug_log)
        .init();
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
