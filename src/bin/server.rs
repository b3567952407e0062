use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Json, Router, routing::post};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use neighborhoods::config::Params;
use neighborhoods::render::RenderError;
use neighborhoods::scenario::Scenario;
use neighborhoods::{Coordinate, coverage, count_neighborhood_cells, neighborhood_cells, render};

#[derive(Deserialize)]
struct NeighborhoodRequest {
    height: i64,
    width: i64,
    threshold: i64,
    #[serde(default)]
    positives: Vec<[i64; 2]>,
    list_cells: Option<bool>,
    render: Option<bool>,
    cell_px: Option<usize>,
}

#[derive(Debug, Serialize)]
struct NeighborhoodResponse {
    count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    cells: Option<Vec<Coordinate>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<String>,
    ms: f64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, error: impl ToString) -> ApiError {
    (status, Json(ErrorBody { error: error.to_string() }))
}

fn compute(req: NeighborhoodRequest, params: &Params) -> Result<NeighborhoodResponse, ApiError> {
    let t = Instant::now();
    let scenario = Scenario::new("", req.height, req.width, req.threshold, &req.positives);
    let bad = |e: neighborhoods::NeighborhoodError| api_error(StatusCode::BAD_REQUEST, e);
    let grid = scenario.grid().map_err(bad)?;

    let (count, cells) = if req.list_cells.unwrap_or(params.list_cells) {
        let mut cells: Vec<_> = neighborhood_cells(&grid, req.threshold)
            .map_err(bad)?
            .into_iter()
            .collect();
        cells.sort();
        (cells.len(), Some(cells))
    } else {
        (count_neighborhood_cells(&grid, req.threshold).map_err(bad)?, None)
    };

    let image = if req.render.unwrap_or(false) {
        let mask = coverage(&grid, req.threshold).map_err(bad)?;
        let params = Params {
            cell_px: req.cell_px.unwrap_or(params.cell_px),
            ..params.clone()
        };
        let url = render::render_coverage(&mask, &params).and_then(|img| render::data_url(&img));
        Some(url.map_err(|e| match e {
            RenderError::TooLarge { .. } => api_error(StatusCode::BAD_REQUEST, e),
            RenderError::Encode(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e),
        })?)
    } else {
        None
    };

    Ok(NeighborhoodResponse {
        count,
        cells,
        image,
        ms: t.elapsed().as_secs_f64() * 1000.0,
    })
}

async fn neighborhoods_handler(
    State(params): State<Arc<Params>>,
    Json(req): Json<NeighborhoodRequest>,
) -> Result<Json<NeighborhoodResponse>, ApiError> {
    // Only positive sizes can overflow here; non-positive ones fail validation below.
    let area = req.height.max(0).saturating_mul(req.width.max(0));
    if area as u128 > params.max_area as u128 {
        warn!(height = req.height, width = req.width, "grid too large");
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            format!("grid area {} exceeds limit {}", area, params.max_area),
        ));
    }

    let response = tokio::task::spawn_blocking(move || compute(req, &params))
        .await
        .map_err(|e| api_error(StatusCode::INTERNAL_SERVER_ERROR, e))??;
    info!(count = response.count, ms = response.ms, "neighborhood served");
    Ok(Json(response))
}

fn app(params: Params) -> Router {
    Router::new()
        .route("/api/neighborhoods", post(neighborhoods_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(params))
}

/// Serve neighborhood counts over HTTP.
#[derive(Debug, Parser)]
struct Args {
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
    /// JSON file overriding default parameters.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Listen address, overriding the config.
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    neighborhoods::init_tracing(args.verbose);

    let mut params = match &args.config {
        Some(path) => Params::from_json_file(path)?,
        None => Params::default(),
    };
    if let Some(bind) = args.bind {
        params.bind = bind;
    }
    let addr = params.bind;

    info!("neighborhoods server at http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(params)).await?;
    Ok(())
}
