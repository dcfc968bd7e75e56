use axum::{
    Json, Router,
    http::StatusCode,
    routing::{get, post},
};
use serde::Serialize;
use shelf_packer::config::PackingTask;
use shelf_packer::shelf::Shelf;
use shelf_packer::solver::{Solution, Strategy};
use shelf_packer::types::Point;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[derive(Serialize)]
struct PackResponse {
    bins: Vec<BinResponse>,
    bin_size: Point,
    strategy: Strategy,
    bin_count: usize,
    filled_percent: f64,
}

#[derive(Serialize)]
struct BinResponse {
    size: Point,
    filled_area_ratio: f64,
    shelves: Vec<(Shelf, Point)>,
}

impl From<Solution> for PackResponse {
    fn from(solution: Solution) -> Self {
        Self {
            bin_count: solution.bin_count(),
            filled_percent: solution.filled_percent(),
            bin_size: solution.bin_size,
            strategy: solution.strategy,
            bins: solution
                .bins
                .iter()
                .map(|b| BinResponse {
                    size: b.size(),
                    filled_area_ratio: b.filled_area_ratio(),
                    shelves: b.shelves().to_vec(),
                })
                .collect(),
        }
    }
}

async fn pack(Json(task): Json<PackingTask>) -> Result<Json<PackResponse>, (StatusCode, String)> {
    tracing::info!(
        body = serde_json::to_string(&task).unwrap_or_default(),
        "POST /pack"
    );

    let solution = task
        .solver()
        .solve()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    Ok(Json(solution.into()))
}

fn main() -> std::io::Result<()> {
    let _sentry = std::env::var("SENTRY_DSN").ok().map(|dsn| {
        sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                ..Default::default()
            },
        ))
    });

    let log_path = std::env::var("LOG_FILE").unwrap_or_else(|_| "development.log".to_string());
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_max_level(Level::INFO)
        .init();

    let port = std::env::var("PORT").unwrap_or_else(|_| "3001".to_string());
    let addr = format!("0.0.0.0:{port}");

    let app = Router::new()
        .route("/up", get(|| async { "ok" }))
        .route("/pack", post(pack))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        );

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async move {
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            eprintln!("Listening on {addr}");
            axum::serve(listener, app).await
        })
}
